use tracing::debug;

use super::properties::parse_rows;
use super::sections::HeadingBlock;
use super::DocContext;
use crate::model::{Directive, DirectiveKind, DirectiveProperty};
use crate::settings::Rules;

/// `[foo]` is an attribute directive named `foo`; anything else is a component.
pub fn detect_kind(raw: &str) -> (String, DirectiveKind) {
    match raw.strip_prefix('[') {
        Some(rest) => (
            rest.strip_suffix(']').unwrap_or(rest).trim().to_string(),
            DirectiveKind::Directive,
        ),
        None => (raw.trim().to_string(), DirectiveKind::Component),
    }
}

/// Properties of the shared heading (e.g. "Common API") named for `selector`.
fn common_properties(ctx: &DocContext, selector: &str) -> Vec<DirectiveProperty> {
    let Some(heading) = ctx.rules.common_heading(selector, ctx.locale) else {
        return Vec::new();
    };
    let tokens = ctx.tokens();
    match tokens.find_heading(heading) {
        Some(idx) => parse_rows(&tokens.table(idx, false), ctx.rules),
        None => {
            debug!("{}: common heading `{}` not found", ctx.path.display(), heading);
            Vec::new()
        }
    }
}

/// One directive per selector of the heading, each with its own copy of the
/// table. Only a single-selector heading gets the common API and the heading
/// description; copies of a shared heading keep just the table.
pub fn expand(ctx: &DocContext, block: &HeadingBlock) -> Vec<Directive> {
    let shared = block.selectors.len() > 1;
    block
        .selectors
        .iter()
        .filter_map(|raw| {
            let (selector, kind) = detect_kind(raw);
            if ctx.rules.is_ignored_component(&selector) {
                debug!("{}: ignoring `{}`", ctx.path.display(), selector);
                return None;
            }
            if shared {
                return Some(Directive::new(&selector, kind, block.properties.clone()));
            }
            let mut properties = common_properties(ctx, &selector);
            properties.extend(block.properties.iter().cloned());

            let mut directive = Directive::new(&selector, kind, properties);
            directive.description = block.description.clone();
            Some(directive)
        })
        .collect()
}

/// Components usable as attributes too are emitted twice, the copy as a directive.
pub fn duplicate_dual_role(directives: Vec<Directive>, rules: &Rules) -> Vec<Directive> {
    let mut out = Vec::with_capacity(directives.len());
    for directive in directives {
        let twin = (directive.kind == DirectiveKind::Component
            && rules.is_dual_role(&directive.selector))
        .then(|| Directive {
            kind: DirectiveKind::Directive,
            ..directive.clone()
        });
        out.push(directive);
        out.extend(twin);
    }
    out
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::document::Document;
    use crate::model::InputType;
    use crate::parser::sections::collect_blocks;
    use crate::settings::Locale;

    const PICKERS: &str = "\
## API

### 共同的 API

| 参数 | 说明 | 类型 | 默认值 |
| --- | --- | --- | --- |
| `[nzAllowClear]` | 是否显示清除按钮 | `boolean` | `true` |
| `(nzOnOpenChange)` | 弹出日历和关闭日历的回调 | `EventEmitter<boolean>` | - |

### nz-date-picker

| 参数 | 说明 | 类型 | 默认值 |
| --- | --- | --- | --- |
| `[(ngModel)]` | 日期 | `Date` | - |

### nz-range-picker | nz-year-picker

| 参数 | 说明 | 类型 | 默认值 |
| --- | --- | --- | --- |
| `[nzRanges]` | 预设时间范围 | `{ [key: string]: Date[] }` | - |
";

    fn blocks_for(md: &str, locale: Locale) -> Vec<Directive> {
        let document = Document::parse(md).unwrap();
        let rules = Rules::default();
        let ctx = DocContext {
            path: Path::new("components/date-picker/doc/index.zh-CN.md"),
            locale,
            document: &document,
            rules: &rules,
        };
        collect_blocks(&ctx)
            .iter()
            .flat_map(|b| expand(&ctx, b))
            .collect()
    }

    fn names(d: &Directive) -> Vec<&str> {
        d.properties.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn kind_detection() {
        assert_eq!(detect_kind("[foo]"), ("foo".to_string(), DirectiveKind::Directive));
        assert_eq!(detect_kind("a"), ("a".to_string(), DirectiveKind::Component));
    }

    #[test]
    fn multi_selector_heading_yields_copies() {
        let md = "\
## API

### nz-a | [foo]

| P | D | T | V |
| - | - | - | - |
| `[disabled]` | d | `boolean` | - |
";
        let directives = blocks_for(md, Locale::En);
        assert_eq!(directives.len(), 2);
        assert_eq!(directives[0].selector, "nz-a");
        assert_eq!(directives[0].kind, DirectiveKind::Component);
        assert_eq!(directives[1].selector, "foo");
        assert_eq!(directives[1].kind, DirectiveKind::Directive);
        assert_eq!(directives[0].properties, directives[1].properties);
    }

    #[test]
    fn common_properties_prepended() {
        let directives = blocks_for(PICKERS, Locale::Zh);
        let date = directives.iter().find(|d| d.selector == "nz-date-picker").unwrap();
        assert_eq!(names(date), vec!["nzAllowClear", "nzOnOpenChange", "ngModel"]);
        assert_eq!(date.properties[2].input_type, InputType::InputOutput);

        // copies of a shared heading keep only their own table
        let range = directives.iter().find(|d| d.selector == "nz-range-picker").unwrap();
        assert_eq!(names(range), vec!["nzRanges"]);
        let year = directives.iter().find(|d| d.selector == "nz-year-picker").unwrap();
        assert_eq!(names(year), names(range));
    }

    #[test]
    fn shared_heading_copies_skip_description() {
        let md = "\
## API

### Common API

| P | D | T | V |
| - | - | - | - |
| `[nzA]` | a | `boolean` | - |

### nz-date-picker | nz-range-picker

Heading desc.

| P | D | T | V |
| - | - | - | - |
| `[nzB]` | b | `boolean` | - |
";
        let directives = blocks_for(md, Locale::En);
        assert_eq!(directives.len(), 2);
        for d in &directives {
            assert_eq!(names(d), vec!["nzB"]);
            assert!(d.description.is_none());
        }
    }

    #[test]
    fn common_heading_missing_in_locale() {
        // the en heading "Common API" is not in this zh document
        let directives = blocks_for(PICKERS, Locale::En);
        let date = directives.iter().find(|d| d.selector == "nz-date-picker").unwrap();
        assert_eq!(names(date), vec!["ngModel"]);
    }

    #[test]
    fn ignored_selector_dropped() {
        let md = "## API\n\n### nz-icon\n\n### [nz-icon] | nz-button\n";
        let directives = blocks_for(md, Locale::En);
        let selectors: Vec<&str> = directives.iter().map(|d| d.selector.as_str()).collect();
        assert_eq!(selectors, vec!["nz-button"]);
    }

    #[test]
    fn dual_role_duplicated() {
        let rules = Rules::default();
        let input = vec![
            Directive::new("sf", DirectiveKind::Component, vec![]),
            Directive::new("nz-button", DirectiveKind::Component, vec![]),
        ];
        let out = duplicate_dual_role(input, &rules);
        let shape: Vec<(&str, DirectiveKind)> =
            out.iter().map(|d| (d.selector.as_str(), d.kind)).collect();
        assert_eq!(
            shape,
            vec![
                ("sf", DirectiveKind::Component),
                ("sf", DirectiveKind::Directive),
                ("nz-button", DirectiveKind::Component),
            ]
        );
    }

    #[test]
    fn dual_role_directive_not_duplicated_again() {
        let rules = Rules::default();
        let input = vec![Directive::new("sv-container", DirectiveKind::Directive, vec![])];
        assert_eq!(duplicate_dual_role(input, &rules).len(), 1);
    }

    #[test]
    fn duplicate_is_a_deep_copy() {
        let md = "\
## API

### se-container

| P | D | T | V |
| - | - | - | - |
| `[col]` | columns | `number` | - |
";
        let rules = Rules::default();
        let mut out = duplicate_dual_role(blocks_for(md, Locale::En), &rules);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].properties, out[1].properties);
        out[1].properties[0].name = "changed".to_string();
        assert_eq!(out[0].properties[0].name, "col");
    }
}
