pub mod front_matter;
pub mod tokens;

use std::path::Path;

use crate::error::{ExtractError, Result};
use front_matter::FrontMatter;
use tokens::TokenStream;

/// A doc page split into its front matter and tokenized body.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub front_matter: FrontMatter,
    pub tokens: TokenStream,
}

impl Document {
    pub fn parse(source: &str) -> std::result::Result<Self, serde_yaml::Error> {
        let source = source.strip_prefix('\u{feff}').unwrap_or(source);
        let tokens = TokenStream::parse(source);
        let front_matter = match tokens.front_matter() {
            Some(block) => FrontMatter::parse(front_matter::yaml_body(block))?,
            None => FrontMatter::default(),
        };
        Ok(Document {
            front_matter,
            tokens,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| ExtractError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Document::parse(&source).map_err(|source| ExtractError::FrontMatter {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_front_matter_from_body() {
        let doc = Document::parse("---\ntitle: Button\n---\n\n## API\n").unwrap();
        assert_eq!(doc.front_matter.display_title(), "Button");
        assert!(doc.tokens.find_heading("API").is_some());
        // the yaml block never reaches the tokenizer
        assert!(doc.tokens.find_heading("title: Button").is_none());
    }

    #[test]
    fn load_missing_file() {
        let err = Document::load(Path::new("tests/fixtures/does-not-exist.md")).unwrap_err();
        assert!(matches!(err, ExtractError::Read { .. }));
    }

    #[test]
    fn load_bad_front_matter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.en-US.md");
        std::fs::write(&path, "---\ntitle: [oops\n---\n## API\n").unwrap();
        let err = Document::load(&path).unwrap_err();
        assert!(matches!(err, ExtractError::FrontMatter { .. }));
    }

    #[test]
    fn unclosed_front_matter_is_body() {
        let doc = Document::parse("---\ntitle: Button\n").unwrap();
        assert!(doc.tokens.front_matter().is_none());
        assert_eq!(doc.front_matter.display_title(), "");
    }

    #[test]
    fn byte_order_mark_before_front_matter() {
        let doc = Document::parse("\u{feff}---\nsubtitle: 按钮\n---\n\n## API\n").unwrap();
        assert_eq!(doc.front_matter.display_title(), "按钮");
    }
}
