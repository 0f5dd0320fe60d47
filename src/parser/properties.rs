use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::model::{DirectiveProperty, InputType, PropertyType, TypeOption};
use crate::settings::Rules;

/// First bracket form in a name cell. Group order decides the binding:
/// `[(x)]`, `[x]`, `(x)`, `#x`.
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\(([-A-Za-z0-9]+)\)\]|\[([-A-Za-z0-9]+)\]|\(([-A-Za-z0-9]+)\)|#([-A-Za-z0-9]+)")
        .unwrap()
});
static VALID_NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-A-Za-z0-9]+$").unwrap());

const NAME_FORMS: [InputType; 4] = [
    InputType::InputOutput,
    InputType::Input,
    InputType::Output,
    InputType::TemplateRef,
];

/// Spellings of "no default" in both locales.
const EMPTY_DEFAULTS: &[&str] = &["`-`", "-", "`无`", "无"];
/// Description phrases marking a two-way binding, either locale.
const TWO_WAY_MARKERS: &[&str] = &["双向绑定", "double binding", "Two-way"];
/// A union containing any of these is a plain type, not a set of choices.
const NON_UNION_MEMBERS: &[&str] = &["any", "string", "EventEmitter", "HTMLElement"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameMatch {
    Bracketed { name: String, input_type: InputType },
    Bare(String),
    NoMatch,
}

pub fn match_name(cell: &str) -> NameMatch {
    let cell = cell.trim();
    if let Some(caps) = NAME_RE.captures(cell) {
        for (group, input_type) in NAME_FORMS.iter().enumerate() {
            if let Some(m) = caps.get(group + 1) {
                return NameMatch::Bracketed {
                    name: m.as_str().to_string(),
                    input_type: *input_type,
                };
            }
        }
    }
    let bare = strip_wrapping(cell, '`', '`');
    if bare.is_empty() {
        NameMatch::NoMatch
    } else {
        NameMatch::Bare(bare.to_string())
    }
}

/// Drop `open`/`close` when both surround `text`.
fn strip_wrapping(text: &str, open: char, close: char) -> &str {
    let text = text.trim();
    if text.len() >= 2 && text.starts_with(open) && text.ends_with(close) {
        text[open.len_utf8()..text.len() - close.len_utf8()].trim()
    } else {
        text
    }
}

fn clean_member(member: &str) -> String {
    member
        .trim()
        .trim_matches(|c: char| matches!(c, '\'' | '"' | '`'))
        .trim()
        .to_string()
}

/// Ordered members of a type cell: comma separated if any comma, else pipe separated.
pub fn type_members(type_raw: &str) -> Vec<String> {
    let payload = match type_raw.strip_prefix("Enum") {
        Some(rest) => strip_wrapping(rest, '{', '}'),
        None => type_raw,
    };
    let sep = if payload.contains(',') { ',' } else { '|' };
    payload.split(sep).map(clean_member).collect()
}

/// First matching rule wins.
pub fn classify(token: &str) -> PropertyType {
    if token.starts_with("TemplateRef") {
        PropertyType::TemplateRef
    } else if token.starts_with('(') {
        PropertyType::Function
    } else if token.starts_with('{') {
        PropertyType::Object
    } else if token.starts_with("EventEmitter") {
        PropertyType::EventEmitter
    } else if token.starts_with("Array") {
        PropertyType::Array
    } else if token.starts_with("Enum") {
        PropertyType::Enum
    } else {
        match token {
            "boolean" => PropertyType::Boolean,
            "number" => PropertyType::Number,
            "Date" => PropertyType::Date,
            "HTMLElement" => PropertyType::HTMLElement,
            _ => PropertyType::String,
        }
    }
}

fn type_definition(kind: PropertyType, members: &[String]) -> Option<Vec<TypeOption>> {
    let is_union = kind == PropertyType::String
        && members.len() > 1
        && !members
            .iter()
            .any(|m| NON_UNION_MEMBERS.contains(&m.as_str()));
    if kind != PropertyType::Enum && !is_union {
        return None;
    }
    Some(
        members
            .iter()
            .filter(|m| !m.is_empty() && m.as_str() != "null")
            .map(|m| TypeOption::new(m))
            .collect(),
    )
}

fn normalize_default(cell: &str) -> String {
    let cell = cell.trim();
    if EMPTY_DEFAULTS.contains(&cell) {
        String::new()
    } else {
        cell.to_string()
    }
}

fn is_two_way(name: &str, description: &str) -> bool {
    name == "ngModel" || TWO_WAY_MARKERS.iter().any(|m| description.contains(m))
}

/// Turn one `[name, description, type, default]` row into a property.
/// Anything malformed yields `None`.
pub fn parse_row(cells: &[String], rules: &Rules) -> Option<DirectiveProperty> {
    let [name_cell, description, type_cell, default] = cells else {
        debug!("dropping row with {} cells", cells.len());
        return None;
    };

    let name_cell = name_cell.trim();
    if rules.is_ignored_property(name_cell)
        || rules.is_ignored_property(strip_wrapping(name_cell, '`', '`'))
    {
        return None;
    }

    let (name, mut input_type) = match match_name(name_cell) {
        NameMatch::Bracketed { name, input_type } => (name, input_type),
        NameMatch::Bare(name) => (name, InputType::Input),
        NameMatch::NoMatch => {
            debug!("dropping row without a property name");
            return None;
        }
    };

    let description = description.trim().to_string();
    let type_raw = strip_wrapping(type_cell, '`', '`').replace('丨', "|");
    let members = type_members(&type_raw);
    // `Enum{...}` cells are classified on the raw text, not the unwrapped members
    let lead = if type_raw.starts_with("Enum") {
        type_raw.as_str()
    } else {
        members.first().map(String::as_str).unwrap_or_default()
    };
    let kind = classify(lead.split_whitespace().next().unwrap_or_default());
    let type_definition = type_definition(kind, &members);

    if is_two_way(&name, &description) {
        input_type = InputType::InputOutput;
    }

    if !VALID_NAME_RE.is_match(&name) {
        debug!("dropping property with invalid name `{}`", name);
        return None;
    }

    Some(DirectiveProperty {
        name,
        input_type,
        description,
        kind,
        type_raw,
        type_definition,
        default: normalize_default(default),
    })
}

pub fn parse_rows(rows: &[Vec<String>], rules: &Rules) -> Vec<DirectiveProperty> {
    rows.iter().filter_map(|row| parse_row(row, rules)).collect()
}
