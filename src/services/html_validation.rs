use lsp_textdocument::FullTextDocument;
use lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString, Range};
use serde::Deserialize;

use crate::parser::html_element::{scan_elements, Element};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorLocation {
    AttributeName,
    AttributeValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub code: &'static str,
    pub message: String,
    pub location: ValidationErrorLocation,
    /// index into `Element::attributes`
    pub attribute_index: usize,
    pub start: usize,
    pub end: usize,
}

impl ValidationError {
    /// Error on the name or value of the attribute at `index`
    pub fn attribute_error(
        element: &Element,
        index: usize,
        code: &'static str,
        message: &str,
        location: ValidationErrorLocation,
    ) -> Option<ValidationError> {
        let attribute = element.attributes.get(index)?;
        let (start, end) = match location {
            ValidationErrorLocation::AttributeValue => {
                (attribute.value_offset, attribute.value_end)
            }
            ValidationErrorLocation::AttributeName => {
                (attribute.offset, attribute.offset + attribute.name.len())
            }
        };
        Some(ValidationError {
            code,
            message: message.to_string(),
            location,
            attribute_index: index,
            start,
            end,
        })
    }

    pub fn to_diagnostic(&self, document: &FullTextDocument) -> Diagnostic {
        Diagnostic {
            range: Range::new(
                document.position_at(self.start as u32),
                document.position_at(self.end as u32),
            ),
            severity: Some(DiagnosticSeverity::WARNING),
            code: Some(NumberOrString::String(self.code.to_string())),
            source: Some("html".to_string()),
            message: self.message.clone(),
            ..Default::default()
        }
    }
}

pub trait ElementValidator: Send + Sync {
    /// Name used in `ValidationSettings`
    fn get_id(&self) -> &str;
    fn validate_element(&self, element: &Element) -> Vec<ValidationError>;
}

/// `<link rel="logo">` must point at an svg image
pub struct RelLogoValidator;

impl ElementValidator for RelLogoValidator {
    fn get_id(&self) -> &str {
        "relLogo"
    }

    fn validate_element(&self, element: &Element) -> Vec<ValidationError> {
        if element.name != "link" {
            return vec![];
        }
        let (Some(rel), Some(index)) = (
            element.get_attribute("rel", true),
            element.attribute_index("type", true),
        ) else {
            return vec![];
        };

        let type_value = element.attributes[index].value();
        if rel.value() != "logo" || type_value.eq_ignore_ascii_case("image/svg") {
            return vec![];
        }

        ValidationError::attribute_error(
            element,
            index,
            "rel-logo-type",
            "The type attribute value must be \"image/svg\" for rel=\"logo\" links.",
            ValidationErrorLocation::AttributeValue,
        )
        .into_iter()
        .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSettings {
    /// Defaults to true
    pub enabled: Option<bool>,
    /// Validator ids that are switched off
    #[serde(default)]
    pub disabled: Vec<String>,
}

impl ValidationSettings {
    pub fn is_disabled(&self, validator_id: &str) -> bool {
        self.disabled.iter().any(|id| id == validator_id)
    }
}

pub struct HTMLValidation {
    validators: Vec<Box<dyn ElementValidator>>,
}

impl Default for HTMLValidation {
    fn default() -> Self {
        HTMLValidation {
            validators: vec![Box::new(RelLogoValidator)],
        }
    }
}

impl HTMLValidation {
    pub fn add_validator(&mut self, validator: Box<dyn ElementValidator>) {
        self.validators.push(validator);
    }

    /// Run every enabled validator over every element of `document`
    pub fn do_validation(
        &self,
        document: &FullTextDocument,
        settings: Option<&ValidationSettings>,
    ) -> Vec<Diagnostic> {
        if settings.is_some_and(|s| s.enabled == Some(false)) {
            return vec![];
        }
        let validators: Vec<&dyn ElementValidator> = self
            .validators
            .iter()
            .filter(|v| settings.map_or(true, |s| !s.is_disabled(v.get_id())))
            .map(|v| v.as_ref())
            .collect();

        let mut diagnostics = vec![];
        for element in scan_elements(document.get_content(None)) {
            for validator in &validators {
                diagnostics.extend(
                    validator
                        .validate_element(&element)
                        .iter()
                        .map(|error| error.to_diagnostic(document)),
                );
            }
        }
        tracing::debug!(diagnostics = diagnostics.len(), "Validated document");
        diagnostics
    }
}
