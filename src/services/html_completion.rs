use std::collections::HashMap;

use lsp_textdocument::FullTextDocument;
use lsp_types::{
    CompletionItem, CompletionItemKind, CompletionList, CompletionTextEdit, Position, Range,
    TextEdit,
};
use serde::Deserialize;

use crate::{
    language_facts::data_manager::HTMLDataManager,
    parser::html_element::{element_at, Element},
};

/// What kind of list a provider fills in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionType {
    Values,
}

/// Everything known about the attribute value under the cursor
pub struct HtmlCompletionContext<'a> {
    pub document: &'a FullTextDocument,
    pub position: &'a Position,
    pub element: &'a Element,
    pub attribute: String,
    pub value: String,
    /// range of the value without quotes
    pub range: Range,
}

pub trait CompletionListProvider: Send + Sync {
    /// Used to switch the provider off in `CompletionConfiguration::provider`
    fn get_id(&self) -> &str;
    fn completion_type(&self) -> CompletionType;
    fn element_name(&self) -> &str;
    fn attribute_name(&self) -> &str;
    fn get_entries(&self, context: &HtmlCompletionContext) -> Vec<CompletionItem>;
}

/// Values chosen by the value of another attribute of the same element
pub struct StaticListCompletion {
    id: String,
    element_name: String,
    attribute_name: String,
    key_attribute: String,
    /// (key value, completion values), keys compared case-insensitively
    values: Vec<(String, Vec<String>)>,
}

impl StaticListCompletion {
    pub fn new(
        id: &str,
        element_name: &str,
        attribute_name: &str,
        key_attribute: &str,
        values: Vec<(String, Vec<String>)>,
    ) -> StaticListCompletion {
        StaticListCompletion {
            id: id.to_string(),
            element_name: element_name.to_string(),
            attribute_name: attribute_name.to_string(),
            key_attribute: key_attribute.to_string(),
            values,
        }
    }

    /// The attribute whose value selects the list
    pub fn key_attribute(&self) -> &str {
        &self.key_attribute
    }

    pub fn values_for(&self, key: &str) -> &[String] {
        self.values
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, values)| values.as_slice())
            .unwrap_or_default()
    }
}

impl CompletionListProvider for StaticListCompletion {
    fn get_id(&self) -> &str {
        &self.id
    }

    fn completion_type(&self) -> CompletionType {
        CompletionType::Values
    }

    fn element_name(&self) -> &str {
        &self.element_name
    }

    fn attribute_name(&self) -> &str {
        &self.attribute_name
    }

    fn get_entries(&self, context: &HtmlCompletionContext) -> Vec<CompletionItem> {
        let Some(key) = context.element.get_attribute(&self.key_attribute, true) else {
            return vec![];
        };

        self.values_for(key.value())
            .iter()
            .map(|value| CompletionItem {
                label: value.clone(),
                kind: Some(CompletionItemKind::VALUE),
                text_edit: Some(CompletionTextEdit::Edit(TextEdit::new(
                    context.range,
                    value.clone(),
                ))),
                ..Default::default()
            })
            .collect()
    }
}

/// Values for `<meta content>` chosen by `http-equiv`
pub fn meta_http_equiv_completion(data_manager: &HTMLDataManager) -> StaticListCompletion {
    let values = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<String>>();
    let charsets = data_manager
        .get_attribute_values("meta", "charset", "html")
        .into_iter()
        .map(|charset| format!("text/html; charset={charset}"))
        .collect();
    let languages = data_manager.get_attribute_values("html", "lang", "html");

    StaticListCompletion::new(
        "meta-http-equiv",
        "meta",
        "content",
        "http-equiv",
        vec![
            (
                "X-UA-Compatible".to_string(),
                values(&["IE=edge", "IE=7", "IE=8", "IE=9", "FF=3"]),
            ),
            ("Content-Type".to_string(), charsets),
            (
                "refresh".to_string(),
                values(&["3", "3; url=http://example.com"]),
            ),
            ("Content-Language".to_string(), languages),
            (
                "Set-Cookie".to_string(),
                values(&[
                    "name=value; expires=Fri, 30 Dec 2019 12:00:00 GMT; path=/",
                    "name=value; expires=Fri, 30 Dec 2019 12:00:00 GMT; path=http://example.com",
                ]),
            ),
        ],
    )
}

pub struct HTMLCompletion {
    providers: Vec<Box<dyn CompletionListProvider>>,
}

impl HTMLCompletion {
    pub fn new(data_manager: &HTMLDataManager) -> HTMLCompletion {
        HTMLCompletion {
            providers: vec![Box::new(meta_http_equiv_completion(data_manager))],
        }
    }

    pub fn set_completion_providers(&mut self, providers: Vec<Box<dyn CompletionListProvider>>) {
        self.providers = providers;
    }

    pub fn add_completion_provider(&mut self, provider: Box<dyn CompletionListProvider>) {
        self.providers.push(provider);
    }

    /// Value suggestions for the attribute value under `position`
    pub fn do_complete(
        &self,
        document: &FullTextDocument,
        position: &Position,
        settings: Option<&CompletionConfiguration>,
    ) -> CompletionList {
        let mut result = CompletionList::default();

        let text = document.get_content(None);
        let offset = document.offset_at(*position) as usize;
        let Some(element) = element_at(text, offset) else {
            return result;
        };
        let Some(attribute) = element.attribute_value_at(offset) else {
            return result;
        };

        let context = HtmlCompletionContext {
            document,
            position,
            element: &element,
            attribute: attribute.name.clone(),
            value: attribute.value().to_string(),
            range: Range::new(
                document.position_at(attribute.value_offset as u32),
                document.position_at(attribute.value_end as u32),
            ),
        };

        for provider in &self.providers {
            if settings.is_some_and(|s| !s.is_enabled(provider.get_id())) {
                continue;
            }
            if provider.completion_type() != CompletionType::Values
                || !provider.element_name().eq_ignore_ascii_case(&element.name)
                || !provider.attribute_name().eq_ignore_ascii_case(&context.attribute)
            {
                continue;
            }
            result.items.extend(provider.get_entries(&context));
        }

        tracing::trace!(
            element = %element.name,
            attribute = %context.attribute,
            items = result.items.len(),
            "Attribute value completion"
        );
        result
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionConfiguration {
    /// Provider id to enabled, providers not listed are enabled
    #[serde(default)]
    pub provider: HashMap<String, bool>,
}

impl CompletionConfiguration {
    pub fn is_enabled(&self, provider_id: &str) -> bool {
        self.provider.get(provider_id).copied().unwrap_or(true)
    }
}
