use serde::Deserialize;

#[cfg(feature = "completion")]
use crate::services::html_completion::CompletionConfiguration;
#[cfg(feature = "validation")]
use crate::services::html_validation::ValidationSettings;

/// Service settings, usually sent by the client as JSON
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HTMLLanguageServiceOptions {
    /**
     * Unless set to false, the built-in schema data is used
     * for schema derived completion values.
     * Defaults to true.
     */
    pub use_default_data_provider: Option<bool>,

    #[cfg(feature = "completion")]
    pub completion: Option<CompletionConfiguration>,

    #[cfg(feature = "validation")]
    pub validation: Option<ValidationSettings>,
}
