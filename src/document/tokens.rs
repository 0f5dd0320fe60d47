use std::ops::Range;
use std::sync::LazyLock;

use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{parse_document, Arena, Options};
use regex::Regex;

/// One bracketed attribute inside a name cell: `[x]`, `(x)` or `[(x)]`.
static ATTRIBUTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\([-A-Za-z0-9]+\)\]|\[[-A-Za-z0-9]+\]|\([-A-Za-z0-9]+\)").unwrap());

pub const FRONT_MATTER_DELIMITER: &str = "---";

const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

pub fn heading_tag(level: u8) -> &'static str {
    HEADING_TAGS[(level.clamp(1, 6) - 1) as usize]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Open,
    Close,
    Inline,
    Leaf,
}

/// A flat token in document order. Block containers become an `Open`/`Close`
/// pair; headings and paragraphs carry their text in an `Inline` between them.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub tag: &'static str,
    /// Heading level for `h1`..`h6` tokens, 0 otherwise.
    pub level: u8,
    pub content: String,
    /// Body rows of a table, stored on its `Open` token.
    rows: Vec<Vec<String>>,
}

impl Token {
    fn new(kind: TokenKind, tag: &'static str) -> Self {
        Token {
            kind,
            tag,
            level: 0,
            content: String::new(),
            rows: Vec::new(),
        }
    }

    fn heading(kind: TokenKind, level: u8) -> Self {
        Token {
            level,
            ..Token::new(kind, heading_tag(level))
        }
    }

    fn inline(content: String) -> Self {
        Token {
            content,
            ..Token::new(TokenKind::Inline, "")
        }
    }

    fn leaf(tag: &'static str, content: String) -> Self {
        Token {
            content,
            ..Token::new(TokenKind::Leaf, tag)
        }
    }

    fn is_heading_open(&self) -> bool {
        self.kind == TokenKind::Open && self.level > 0
    }
}

/// Indexed, read-only view over a parsed markdown body.
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
    /// Raw front matter block, delimiters included, as comrak found it.
    front_matter: Option<String>,
}

impl TokenStream {
    pub fn parse(markdown: &str) -> Self {
        let arena = Arena::new();
        let mut options = Options::default();
        options.extension.table = true;
        options.extension.strikethrough = true;
        options.extension.front_matter_delimiter = Some(FRONT_MATTER_DELIMITER.to_string());
        let root = parse_document(&arena, markdown, &options);

        let front_matter = root.children().find_map(|node| match &node.data.borrow().value {
            NodeValue::FrontMatter(raw) => Some(raw.clone()),
            _ => None,
        });
        let mut tokens = Vec::new();
        flatten_block(root, &mut tokens);
        TokenStream {
            tokens,
            front_matter,
        }
    }

    pub fn front_matter(&self) -> Option<&str> {
        self.front_matter.as_deref()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn get(&self, idx: usize) -> Option<&Token> {
        self.tokens.get(idx)
    }

    /// Index of the `Open` token of the first heading whose text is exactly `text`.
    pub fn find_heading(&self, text: &str) -> Option<usize> {
        self.tokens
            .iter()
            .enumerate()
            .position(|(i, t)| {
                t.is_heading_open()
                    && self
                        .tokens
                        .get(i + 1)
                        .is_some_and(|n| n.kind == TokenKind::Inline && n.content == text)
            })
    }

    /// First token at or after `from` with the given kind and tag.
    pub fn find_next(&self, kind: TokenKind, tag: &str, from: usize) -> Option<usize> {
        self.tokens
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, t)| t.kind == kind && t.tag == tag)
            .map(|(i, _)| i)
    }

    /// Heading `Open` indices of exactly `level` inside `range`, in order.
    pub fn headings(&self, level: u8, range: Range<usize>) -> Vec<usize> {
        let end = range.end.min(self.tokens.len());
        (range.start..end)
            .filter(|&i| self.tokens[i].is_heading_open() && self.tokens[i].level == level)
            .collect()
    }

    pub fn heading_level(&self, idx: usize) -> Option<u8> {
        self.tokens
            .get(idx)
            .filter(|t| t.level > 0)
            .map(|t| t.level)
    }

    /// Next heading `Open` token strictly after `idx`.
    pub fn next_heading(&self, idx: usize) -> Option<usize> {
        (idx + 1..self.tokens.len()).find(|&i| self.tokens[i].is_heading_open())
    }

    /// Rows of the table following the heading at `heading`, stopping at the
    /// next heading. With `split`, every table under the heading is read and
    /// name cells listing several attributes become one row each.
    pub fn table(&self, heading: usize, split: bool) -> Vec<Vec<String>> {
        let end = self.next_heading(heading).unwrap_or(self.tokens.len());
        let mut tables = (heading + 1..end)
            .map(|i| &self.tokens[i])
            .filter(|t| t.kind == TokenKind::Open && t.tag == "table");

        if !split {
            return tables.next().map(|t| t.rows.clone()).unwrap_or_default();
        }
        tables
            .flat_map(|t| t.rows.iter())
            .flat_map(|row| expand_attribute_row(row))
            .collect()
    }

    /// Text of an inline/leaf token, or of the inline child of a heading/paragraph.
    pub fn text(&self, idx: usize) -> String {
        match self.tokens.get(idx) {
            Some(t) if matches!(t.kind, TokenKind::Inline | TokenKind::Leaf) => t.content.clone(),
            Some(t) if t.kind == TokenKind::Open => self
                .tokens
                .get(idx + 1)
                .filter(|n| n.kind == TokenKind::Inline)
                .map(|n| n.content.clone())
                .unwrap_or_default(),
            _ => String::new(),
        }
    }

    pub fn is_paragraph(&self, idx: usize) -> bool {
        self.tokens
            .get(idx)
            .is_some_and(|t| t.kind == TokenKind::Open && t.tag == "p")
    }

    /// First paragraph under the heading titled `heading_text`, or empty.
    pub fn section_paragraph(&self, heading_text: &str) -> String {
        let Some(start) = self.find_heading(heading_text) else {
            return String::new();
        };
        let end = self.next_heading(start).unwrap_or(self.tokens.len());
        (start + 1..end)
            .find(|&i| self.is_paragraph(i))
            .map(|i| self.text(i))
            .unwrap_or_default()
    }

    /// First paragraph before any heading, or empty.
    pub fn lead_paragraph(&self) -> String {
        self.tokens
            .iter()
            .enumerate()
            .take_while(|(_, t)| !t.is_heading_open())
            .find(|(i, _)| self.is_paragraph(*i))
            .map(|(i, _)| self.text(i))
            .unwrap_or_default()
    }
}

fn expand_attribute_row(row: &[String]) -> Vec<Vec<String>> {
    let Some(name_cell) = row.first() else {
        return vec![row.to_vec()];
    };
    let attributes: Vec<&str> = ATTRIBUTE_RE
        .find_iter(name_cell)
        .map(|m| m.as_str())
        .collect();
    if attributes.len() < 2 {
        return vec![row.to_vec()];
    }
    attributes
        .into_iter()
        .map(|attr| {
            let mut split = row.to_vec();
            split[0] = attr.to_string();
            split
        })
        .collect()
}

fn flatten_block<'a>(node: &'a AstNode<'a>, out: &mut Vec<Token>) {
    let data = node.data.borrow();
    match &data.value {
        NodeValue::Document => flatten_children(node, out),
        NodeValue::Heading(heading) => {
            out.push(Token::heading(TokenKind::Open, heading.level));
            out.push(Token::inline(inline_text(node)));
            out.push(Token::heading(TokenKind::Close, heading.level));
        }
        NodeValue::Paragraph => {
            out.push(Token::new(TokenKind::Open, "p"));
            out.push(Token::inline(inline_text(node)));
            out.push(Token::new(TokenKind::Close, "p"));
        }
        NodeValue::Table(..) => {
            let mut open = Token::new(TokenKind::Open, "table");
            open.rows = table_rows(node);
            out.push(open);
            out.push(Token::new(TokenKind::Close, "table"));
        }
        NodeValue::List(list) => {
            let tag = match list.list_type {
                ListType::Ordered => "ol",
                ListType::Bullet => "ul",
            };
            out.push(Token::new(TokenKind::Open, tag));
            flatten_children(node, out);
            out.push(Token::new(TokenKind::Close, tag));
        }
        NodeValue::Item(_) => {
            out.push(Token::new(TokenKind::Open, "li"));
            flatten_children(node, out);
            out.push(Token::new(TokenKind::Close, "li"));
        }
        NodeValue::BlockQuote => {
            out.push(Token::new(TokenKind::Open, "blockquote"));
            flatten_children(node, out);
            out.push(Token::new(TokenKind::Close, "blockquote"));
        }
        NodeValue::CodeBlock(code) => out.push(Token::leaf("pre", code.literal.clone())),
        NodeValue::HtmlBlock(html) => out.push(Token::leaf("html", html.literal.clone())),
        NodeValue::ThematicBreak => out.push(Token::leaf("hr", String::new())),
        NodeValue::FrontMatter(_) => {}
        _ => flatten_children(node, out),
    }
}

fn flatten_children<'a>(node: &'a AstNode<'a>, out: &mut Vec<Token>) {
    for child in node.children() {
        flatten_block(child, out);
    }
}

/// Body rows only; the header row is skipped.
fn table_rows<'a>(table: &'a AstNode<'a>) -> Vec<Vec<String>> {
    table
        .children()
        .filter(|row| matches!(row.data.borrow().value, NodeValue::TableRow(false)))
        .map(|row| row.children().map(inline_text).collect())
        .collect()
}

/// Inline content rendered back close to its source: code spans keep their
/// backticks, links keep their destination, emphasis keeps its markers.
fn inline_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut out = String::new();
    collect_inline(node, &mut out);
    out.trim().to_string()
}

fn collect_inline<'a>(node: &'a AstNode<'a>, out: &mut String) {
    for child in node.children() {
        match &child.data.borrow().value {
            NodeValue::Text(text) => out.push_str(text),
            NodeValue::Code(code) => {
                out.push('`');
                out.push_str(&code.literal);
                out.push('`');
            }
            NodeValue::HtmlInline(html) => out.push_str(html),
            NodeValue::SoftBreak | NodeValue::LineBreak => out.push(' '),
            NodeValue::Link(link) => {
                out.push('[');
                collect_inline(child, out);
                out.push_str("](");
                out.push_str(&link.url);
                out.push(')');
            }
            NodeValue::Image(link) => {
                out.push_str("![");
                collect_inline(child, out);
                out.push_str("](");
                out.push_str(&link.url);
                out.push(')');
            }
            NodeValue::Emph => wrap_inline(child, "*", out),
            NodeValue::Strong => wrap_inline(child, "**", out),
            NodeValue::Strikethrough => wrap_inline(child, "~~", out),
            _ => collect_inline(child, out),
        }
    }
}

fn wrap_inline<'a>(node: &'a AstNode<'a>, marker: &str, out: &mut String) {
    out.push_str(marker);
    collect_inline(node, out);
    out.push_str(marker);
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "\
Lead paragraph.

## When To Use

Use it when needed.

- a list item

## API

### nz-button

Button description.

| Property | Description | Type | Default |
| --- | --- | --- | --- |
| `[nzGhost]` | ghost mode | `boolean` | `false` |
| `(nzClick)` | click | `EventEmitter<void>` | - |

### nz-button-group

| Property | Description | Type | Default |
| --- | --- | --- | --- |
| `[nzSize]` | size | `'large'丨'small'` | `'default'` |

## FAQ

Nothing here.
";

    #[test]
    fn heading_triplet_layout() {
        let ts = TokenStream::parse(DOC);
        let api = ts.find_heading("API").unwrap();
        assert_eq!(ts.get(api).unwrap().tag, "h2");
        assert_eq!(ts.get(api + 1).unwrap().kind, TokenKind::Inline);
        assert_eq!(ts.get(api + 2).unwrap().kind, TokenKind::Close);
        assert_eq!(ts.text(api), "API");
    }

    #[test]
    fn find_heading_missing() {
        let ts = TokenStream::parse(DOC);
        assert!(ts.find_heading("Nope").is_none());
    }

    #[test]
    fn headings_in_range() {
        let ts = TokenStream::parse(DOC);
        let api = ts.find_heading("API").unwrap();
        let end = ts.find_next(TokenKind::Close, "h2", api + 3).unwrap();
        let h3 = ts.headings(3, api + 1..end);
        let names: Vec<String> = h3.iter().map(|&i| ts.text(i)).collect();
        assert_eq!(names, vec!["nz-button", "nz-button-group"]);
    }

    #[test]
    fn table_skips_header_and_keeps_code_quotes() {
        let ts = TokenStream::parse(DOC);
        let idx = ts.find_heading("nz-button").unwrap();
        let rows = ts.table(idx, false);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["`[nzGhost]`", "ghost mode", "`boolean`", "`false`"]);
        assert_eq!(rows[1][3], "-");
    }

    #[test]
    fn table_does_not_cross_next_heading() {
        let md = "### a\n\ntext\n\n### b\n\n| P | D | T | V |\n| - | - | - | - |\n| x | y | z | w |\n";
        let ts = TokenStream::parse(md);
        let a = ts.find_heading("a").unwrap();
        let b = ts.find_heading("b").unwrap();
        assert!(ts.table(a, false).is_empty());
        assert_eq!(ts.table(b, false).len(), 1);
    }

    #[test]
    fn split_table_reads_all_tables_and_expands_attributes() {
        let md = "\
### th

| P | D | T | V |
| - | - | - | - |
| `[nzShowSort]` `[nzSortKey]` | sort | `boolean` | - |

| P | D | T | V |
| - | - | - | - |
| `[nzShowFilter]` | filter | `boolean` | - |
";
        let ts = TokenStream::parse(md);
        let th = ts.find_heading("th").unwrap();
        assert_eq!(ts.table(th, false).len(), 1);
        let rows = ts.table(th, true);
        let names: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(names, vec!["[nzShowSort]", "[nzSortKey]", "`[nzShowFilter]`"]);
        assert!(rows.iter().all(|r| r.len() == 4));
    }

    #[test]
    fn paragraphs() {
        let ts = TokenStream::parse(DOC);
        assert_eq!(ts.lead_paragraph(), "Lead paragraph.");
        assert_eq!(ts.section_paragraph("When To Use"), "Use it when needed.");
        assert_eq!(ts.section_paragraph("Missing"), "");
        let idx = ts.find_heading("nz-button").unwrap();
        assert!(ts.is_paragraph(idx + 3));
        assert_eq!(ts.text(idx + 3), "Button description.");
    }

    #[test]
    fn lead_paragraph_absent_when_heading_first() {
        let ts = TokenStream::parse("## API\n\ntext\n");
        assert_eq!(ts.lead_paragraph(), "");
    }

    #[test]
    fn bracketed_heading_text_survives() {
        let ts = TokenStream::parse("### [nz-tooltip] | nz-tooltip\n");
        assert_eq!(ts.text(0), "[nz-tooltip] | nz-tooltip");
        assert_eq!(ts.heading_level(0), Some(3));
    }

    #[test]
    fn inline_text_keeps_links_and_emphasis() {
        let ts = TokenStream::parse(
            "See [the guide](https://ng.ant.design/docs/i18n/en) for **global** *defaults*.\n",
        );
        assert_eq!(
            ts.text(0),
            "See [the guide](https://ng.ant.design/docs/i18n/en) for **global** *defaults*."
        );
    }

    #[test]
    fn link_in_table_cell_keeps_destination() {
        let md = "\
### nz-a

| P | D | T | V |
| - | - | - | - |
| `[nzHref]` | see [router](https://angular.dev) | `string` | - |
";
        let ts = TokenStream::parse(md);
        let rows = ts.table(0, false);
        assert_eq!(rows[0][1], "see [router](https://angular.dev)");
    }

    #[test]
    fn front_matter_kept_out_of_tokens() {
        let ts = TokenStream::parse("---\ntitle: Button\n---\n\n## API\n");
        let raw = ts.front_matter().unwrap();
        assert!(raw.contains("title: Button"));
        assert_eq!(ts.find_heading("API"), Some(0));
        assert!(TokenStream::parse("## API\n").front_matter().is_none());
    }
}
