use std::path::PathBuf;

use thiserror::Error;

/// File-level failures. Row and heading problems never surface here; they are
/// dropped during extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported locale `{0}` (expected a zh-* or en-* tag)")]
    UnsupportedLocale(String),

    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed front matter in {path}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

pub type Result<T> = std::result::Result<T, ExtractError>;
