use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectiveKind {
    Component,
    Directive,
}

/// How a property is bound on the host element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputType {
    #[serde(rename = "input")]
    Input,
    #[serde(rename = "output")]
    Output,
    #[serde(rename = "input-output")]
    InputOutput,
    #[serde(rename = "template-ref")]
    TemplateRef,
}

/// Semantic category of a property's type cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyType {
    TemplateRef,
    #[serde(rename = "function")]
    Function,
    #[serde(rename = "object")]
    Object,
    EventEmitter,
    Array,
    Enum,
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "number")]
    Number,
    Date,
    HTMLElement,
    #[serde(rename = "string")]
    String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeOption {
    pub value: String,
    pub label: String,
}

impl TypeOption {
    pub fn new(value: &str) -> Self {
        TypeOption {
            value: value.to_string(),
            label: value.to_string(),
        }
    }
}

/// One row of a component's API table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveProperty {
    pub name: String,
    pub input_type: InputType,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: PropertyType,
    pub type_raw: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub type_definition: Option<Vec<TypeOption>>,
    pub default: String,
}

/// One documented component or attribute directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Directive {
    pub selector: String,
    pub kind: DirectiveKind,
    pub properties: Vec<DirectiveProperty>,
    pub description: Option<String>,
    pub title: String,
    pub source_library: String,
    pub doc_url: String,
    pub when_to_use: String,
}

impl Directive {
    /// A bare entry as produced by the section locator, before metadata is attached.
    pub fn new(selector: &str, kind: DirectiveKind, properties: Vec<DirectiveProperty>) -> Self {
        Directive {
            selector: selector.to_string(),
            kind,
            properties,
            description: None,
            title: String::new(),
            source_library: String::new(),
            doc_url: String::new(),
            when_to_use: String::new(),
        }
    }
}
