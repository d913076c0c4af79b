pub mod html_language_service;
pub mod html_language_types;
pub mod language_facts;
#[cfg(feature = "outlining")]
pub mod outlining;
pub mod parser;
pub mod services;
pub mod text;

pub use html_language_service::HTMLLanguageService;
pub use html_language_types::HTMLLanguageServiceOptions;
pub use language_facts::data_manager::HTMLDataManager;
pub use language_facts::data_provider::{DataError, HTMLDataProvider, IHTMLDataProvider};
#[cfg(feature = "outlining")]
pub use outlining::{
    outlining_worker::OutliningWorker,
    region_parser::Region,
    region_tagger::{OutliningTag, RegionTagger, TagsChanged},
};
pub use parser::html_element::{Element, ElementAttribute};
#[cfg(feature = "completion")]
pub use services::html_completion::{
    CompletionConfiguration, CompletionListProvider, HtmlCompletionContext, StaticListCompletion,
};
#[cfg(feature = "outlining")]
pub use services::html_outlining::FoldingRangeContext;
#[cfg(feature = "validation")]
pub use services::html_validation::{
    ElementValidator, RelLogoValidator, ValidationError, ValidationErrorLocation,
    ValidationSettings,
};
pub use text::{
    span::Span,
    text_buffer::{BufferChanged, BufferState, TextBuffer, TextSnapshot, TextSource},
};
