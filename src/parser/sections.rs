use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::properties::parse_rows;
use super::DocContext;
use crate::document::tokens::{heading_tag, TokenKind, TokenStream};
use crate::model::DirectiveProperty;
use crate::settings::Rules;

/// A lowercase tag name, optionally wrapped as an attribute: `nz-button`, `[nz-tooltip]`.
static SELECTOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[?[a-z][-a-z0-9]+\]?$").unwrap());

/// Offset from a heading's `Open` token to the block right after it.
const AFTER_HEADING: usize = 3;

/// One level-3 heading of the API section and everything harvested under it.
#[derive(Debug, Clone)]
pub struct HeadingBlock {
    pub index: usize,
    /// Aliased selectors, brackets still attached.
    pub selectors: Vec<String>,
    pub properties: Vec<DirectiveProperty>,
    pub description: Option<String>,
}

/// Token range of the API section: from its heading up to the closing tag of
/// the next heading of the same or a higher level.
pub fn api_range(ctx: &DocContext) -> Option<Range<usize>> {
    let tokens = ctx.tokens();
    let start = tokens.find_heading(ctx.locale.api_heading())?;
    let level = tokens.heading_level(start)?;
    let end = (1..=level)
        .filter_map(|l| tokens.find_next(TokenKind::Close, heading_tag(l), start + AFTER_HEADING))
        .min()
        .unwrap_or(tokens.len());
    Some(start..end)
}

/// Split a heading on `|` and keep the parts that look like selectors. A
/// heading left with none is prose rather than a component.
pub fn heading_selectors(text: &str, rules: &Rules) -> Option<Vec<String>> {
    let selectors: Vec<String> = text
        .split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter(|s| {
            let valid = SELECTOR_RE.is_match(s) || rules.is_extra_valid(s);
            if !valid {
                debug!("dropping selector `{}` of heading `{}`", s, text);
            }
            valid
        })
        .map(|s| rules.alias(s).to_string())
        .collect();
    (!selectors.is_empty()).then_some(selectors)
}

/// The paragraph under the heading when it comes before the table, else the
/// block right after the heading if that is a paragraph.
pub fn heading_description(tokens: &TokenStream, heading: usize) -> Option<String> {
    let boundary = tokens.next_heading(heading).unwrap_or(tokens.len());
    let paragraph = tokens.find_next(TokenKind::Open, "p", heading + 1);
    let table = tokens.find_next(TokenKind::Open, "table", heading + 1);
    if let (Some(p), Some(t)) = (paragraph, table) {
        if p < t && p < boundary {
            return Some(tokens.text(p));
        }
    }
    let fallback = heading + AFTER_HEADING;
    if fallback < tokens.len() && tokens.is_paragraph(fallback) {
        return Some(tokens.text(fallback));
    }
    None
}

/// Every candidate directive heading of the API section, in document order.
pub fn collect_blocks(ctx: &DocContext) -> Vec<HeadingBlock> {
    let Some(range) = api_range(ctx) else {
        debug!("{}: no API section", ctx.path.display());
        return Vec::new();
    };
    let tokens = ctx.tokens();

    tokens
        .headings(3, range.start + 1..range.end)
        .into_iter()
        .filter_map(|idx| {
            let text = tokens.text(idx);
            let Some(selectors) = heading_selectors(&text, ctx.rules) else {
                debug!("{}: skipping heading `{}`", ctx.path.display(), text);
                return None;
            };
            let split = ctx.rules.splits_columns(&selectors[0]);
            let properties = parse_rows(&tokens.table(idx, split), ctx.rules);
            Some(HeadingBlock {
                index: idx,
                selectors,
                properties,
                description: heading_description(tokens, idx),
            })
        })
        .collect()
}
