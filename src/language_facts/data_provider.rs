use std::collections::HashMap;

use thiserror::Error;

use super::html_data::{HTMLDataV1, IAttributeData, ITagData, IValueData};

#[derive(Debug, Error)]
pub enum DataError {
    #[error("invalid html custom data for provider `{id}`: {source}")]
    InvalidJson {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Schema data provider consulted by `HTMLDataManager`
pub struct HTMLDataProvider {
    id: String,
    tags: Vec<ITagData>,
    tag_map: HashMap<String, usize>,
    global_attributes: Vec<IAttributeData>,
    value_set_map: HashMap<String, Vec<IValueData>>,
    case_sensitive: bool,
}

/// To implement that the data provider can provide information to the `HTMLDataManager`
pub trait IHTMLDataProvider: Send + Sync {
    /// The ID of the data provider, which cannot be duplicated,
    /// note that the ID of the built-in data provider is "html5"
    fn get_id(&self) -> &str;
    fn is_applicable(&self, language_id: &str) -> bool;
    fn provide_tags(&self) -> &Vec<ITagData>;
    /// Every value known for `attribute` of `tag`, global attributes included
    fn provide_values(&self, tag: &str, attribute: &str) -> Vec<&IValueData>;
}

impl HTMLDataProvider {
    pub fn new(id: String, custom_data: HTMLDataV1, case_sensitive: bool) -> HTMLDataProvider {
        let mut tag_map = HashMap::new();
        if let Some(tags) = &custom_data.tags {
            for (i, tag) in tags.iter().enumerate() {
                let name = if case_sensitive {
                    tag.name.clone()
                } else {
                    tag.name.to_lowercase()
                };
                tag_map.insert(name, i);
            }
        }

        let mut value_set_map = HashMap::new();
        if let Some(value_sets) = custom_data.value_sets {
            for vs in value_sets {
                value_set_map.insert(vs.name, vs.values);
            }
        }

        HTMLDataProvider {
            id,
            tags: custom_data.tags.unwrap_or_default(),
            tag_map,
            global_attributes: custom_data.global_attributes.unwrap_or_default(),
            value_set_map,
            case_sensitive,
        }
    }

    /// Case-insensitive provider from a custom data JSON document
    pub fn from_json(id: &str, json: &str) -> Result<HTMLDataProvider, DataError> {
        let data = serde_json::from_str(json).map_err(|source| DataError::InvalidJson {
            id: id.to_string(),
            source,
        })?;
        Ok(HTMLDataProvider::new(id.to_string(), data, false))
    }

    fn attribute_values<'a>(&'a self, attr: &'a IAttributeData, values: &mut Vec<&'a IValueData>) {
        if let Some(attr_values) = &attr.values {
            values.extend(attr_values);
        }
        if let Some(set) = attr
            .value_set
            .as_ref()
            .and_then(|name| self.value_set_map.get(name))
        {
            values.extend(set);
        }
    }

    fn name_equals(&self, name: &str, expected: &str) -> bool {
        if self.case_sensitive {
            name == expected
        } else {
            name.to_lowercase() == expected
        }
    }
}

impl IHTMLDataProvider for HTMLDataProvider {
    fn get_id(&self) -> &str {
        &self.id
    }

    fn is_applicable(&self, _language_id: &str) -> bool {
        true
    }

    fn provide_tags(&self) -> &Vec<ITagData> {
        &self.tags
    }

    fn provide_values(&self, tag: &str, attribute: &str) -> Vec<&IValueData> {
        let mut values = vec![];

        let (tag, attribute) = if self.case_sensitive {
            (tag.to_string(), attribute.to_string())
        } else {
            (tag.to_lowercase(), attribute.to_lowercase())
        };

        if let Some(tag_entry_index) = self.tag_map.get(&tag) {
            let tag_entry = &self.tags[*tag_entry_index];
            for a in &tag_entry.attributes {
                if self.name_equals(&a.name, &attribute) {
                    self.attribute_values(a, &mut values);
                }
            }
        }
        for a in &self.global_attributes {
            if self.name_equals(&a.name, &attribute) {
                self.attribute_values(a, &mut values);
            }
        }

        values
    }
}
