use std::collections::{HashMap, HashSet};
use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::error::{ExtractError, Result};

/// Extra selectors accepted even though they fail the tag-name pattern.
const VALID_COMPONENT_NAMES: &[&str] = &["th", "td", "thead"];
/// Selectors usable both as an element and as an attribute.
const DUAL_ROLE_SELECTORS: &[&str] = &[
    "se-container",
    "se-title",
    "error-collect",
    "sg-container",
    "sv-container",
    "sv-title",
    "sf",
];
/// Selectors whose property tables are documented per column variant.
const SPLIT_PROPERTY_SELECTORS: &[&str] = &["th", "td"];
const IGNORED_COMPONENTS: &[&str] = &["nz-icon"];
const IGNORED_PROPERTIES: &[&str] = &["ng-content"];
/// Known stale selector names in the docs.
const SELECTOR_ALIASES: &[(&str, &str)] = &[("nz-tr", "tr")];
const MERGE_PROPERTIES: &[&str] = &[
    "nz-date-picker",
    "nz-year-picker",
    "nz-month-picker",
    "nz-range-picker",
    "nz-week-picker",
];
const COMMON_API_ZH: &str = "共同的 API";
const COMMON_API_EN: &str = "Common API";

/// The two documentation zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    Zh,
    En,
}

impl Locale {
    /// `zh-CN` → `Zh`, `en-US` → `En`. Only the part before the first `-` counts.
    pub fn from_lang(lang: &str) -> Result<Self> {
        let zone = lang.trim().split('-').next().unwrap_or_default();
        match zone.to_ascii_lowercase().as_str() {
            "zh" => Ok(Locale::Zh),
            "en" => Ok(Locale::En),
            _ => Err(ExtractError::UnsupportedLocale(lang.to_string())),
        }
    }

    pub fn zone(self) -> &'static str {
        match self {
            Locale::Zh => "zh",
            Locale::En => "en",
        }
    }

    pub fn api_heading(self) -> &'static str {
        "API"
    }

    pub fn when_to_use_heading(self) -> &'static str {
        match self {
            Locale::Zh => "何时使用",
            Locale::En => "When To Use",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LocalizedHeading {
    pub zh: String,
    pub en: String,
}

impl LocalizedHeading {
    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::Zh => &self.zh,
            Locale::En => &self.en,
        }
    }
}

/// Static lookup tables driving extraction. Frozen before the first file is read.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub valid_component_names: HashSet<String>,
    pub dual_role_selectors: HashSet<String>,
    pub split_property_selectors: HashSet<String>,
    pub ignored_components: HashSet<String>,
    pub ignored_properties: HashSet<String>,
    pub selector_aliases: HashMap<String, String>,
    pub merge_properties: HashMap<String, LocalizedHeading>,
}

fn to_set(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for Rules {
    fn default() -> Self {
        let common = LocalizedHeading {
            zh: COMMON_API_ZH.to_string(),
            en: COMMON_API_EN.to_string(),
        };
        Rules {
            valid_component_names: to_set(VALID_COMPONENT_NAMES),
            dual_role_selectors: to_set(DUAL_ROLE_SELECTORS),
            split_property_selectors: to_set(SPLIT_PROPERTY_SELECTORS),
            ignored_components: to_set(IGNORED_COMPONENTS),
            ignored_properties: to_set(IGNORED_PROPERTIES),
            selector_aliases: SELECTOR_ALIASES
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            merge_properties: MERGE_PROPERTIES
                .iter()
                .map(|sel| (sel.to_string(), common.clone()))
                .collect(),
        }
    }
}

impl Rules {
    pub fn alias<'a>(&'a self, selector: &'a str) -> &'a str {
        self.selector_aliases
            .get(selector)
            .map(String::as_str)
            .unwrap_or(selector)
    }

    pub fn is_extra_valid(&self, selector: &str) -> bool {
        self.valid_component_names.contains(selector)
    }

    pub fn is_dual_role(&self, selector: &str) -> bool {
        self.dual_role_selectors.contains(selector)
    }

    pub fn splits_columns(&self, selector: &str) -> bool {
        self.split_property_selectors.contains(selector)
    }

    pub fn is_ignored_component(&self, selector: &str) -> bool {
        self.ignored_components.contains(selector)
    }

    pub fn is_ignored_property(&self, name_cell: &str) -> bool {
        self.ignored_properties.contains(name_cell)
    }

    pub fn common_heading(&self, selector: &str, locale: Locale) -> Option<&str> {
        self.merge_properties.get(selector).map(|h| h.get(locale))
    }
}

/// Layered settings: built-in rules, then an optional file, then `MAGIC_*` env vars.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub lang: Option<String>,
    pub rules: Rules,
}

impl Settings {
    pub fn load(file: Option<&Path>) -> std::result::Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(File::from(path));
        }
        builder
            .add_source(
                Environment::with_prefix("MAGIC")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}
