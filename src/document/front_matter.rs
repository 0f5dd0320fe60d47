use serde::Deserialize;
use serde_yaml::Value;

use super::tokens::FRONT_MATTER_DELIMITER;

/// The `---` delimited YAML block at the top of a doc page. Only the title
/// fields are read; everything else is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrontMatter {
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub subtitle: Option<Value>,
}

impl FrontMatter {
    pub fn parse(yaml: &str) -> Result<Self, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(FrontMatter::default());
        }
        serde_yaml::from_str(yaml)
    }

    /// `subtitle` wins over `title`. A locale-keyed mapping resolves to its first value.
    pub fn display_title(&self) -> String {
        let chosen = [&self.subtitle, &self.title]
            .into_iter()
            .flatten()
            .find(|v| is_present(v));
        match chosen {
            Some(Value::Mapping(map)) => map.values().next().map(scalar_text).unwrap_or_default(),
            Some(v) => scalar_text(v),
            None => String::new(),
        }
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// The YAML between the delimiters of a front matter block as comrak reports
/// it (`---` lines and trailing blank lines included).
pub fn yaml_body(block: &str) -> &str {
    let block = block.trim();
    block
        .strip_prefix(FRONT_MATTER_DELIMITER)
        .and_then(|rest| rest.strip_suffix(FRONT_MATTER_DELIMITER))
        .unwrap_or(block)
        .trim()
}
