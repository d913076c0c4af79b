use serde::{Deserialize, Serialize};

/// Custom data in the format of the VS Code html custom data files
#[derive(Debug, Serialize, Deserialize)]
pub struct HTMLDataV1 {
    pub version: f32,
    pub tags: Option<Vec<ITagData>>,
    #[serde(rename = "globalAttributes")]
    pub global_attributes: Option<Vec<IAttributeData>>,
    #[serde(rename = "valueSets")]
    pub value_sets: Option<Vec<IValueSet>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ITagData {
    pub name: String,
    pub description: Option<Description>,
    #[serde(default)]
    pub attributes: Vec<IAttributeData>,
    pub void: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IAttributeData {
    pub name: String,
    pub description: Option<Description>,
    #[serde(rename = "valueSet")]
    pub value_set: Option<String>,
    pub values: Option<Vec<IValueData>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IValueSet {
    pub name: String,
    pub values: Vec<IValueData>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IValueData {
    pub name: String,
    pub description: Option<Description>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Description {
    String(String),
    MarkupContent(MarkupContent),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MarkupContent {
    pub kind: MarkupKind,
    pub value: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub enum MarkupKind {
    #[serde(rename = "plaintext")]
    Plaintext,
    #[serde(rename = "markdown")]
    Markdown,
}
