#[cfg(feature = "outlining")]
use std::sync::Arc;

#[cfg(feature = "completion")]
use lsp_types::{CompletionList, Position};
#[cfg(feature = "validation")]
use lsp_types::Diagnostic;
#[cfg(feature = "outlining")]
use lsp_types::{FoldingRange, Range};
#[cfg(feature = "outlining")]
use tokio::sync::RwLock;

#[cfg(any(feature = "completion", feature = "validation"))]
use lsp_textdocument::FullTextDocument;

use crate::html_language_types::HTMLLanguageServiceOptions;
use crate::language_facts::data_manager::HTMLDataManager;
#[cfg(feature = "outlining")]
use crate::outlining::{
    outlining_worker::OutliningWorker,
    region_tagger::{OutliningTag, RegionTagger},
};
#[cfg(feature = "completion")]
use crate::services::html_completion::{CompletionListProvider, HTMLCompletion};
#[cfg(feature = "outlining")]
use crate::services::html_outlining::{get_folding_ranges, FoldingRangeContext};
#[cfg(feature = "validation")]
use crate::services::html_validation::{ElementValidator, HTMLValidation};
#[cfg(feature = "outlining")]
use crate::text::text_buffer::{TextBuffer, TextSource};

pub struct HTMLLanguageService {
    #[cfg_attr(
        not(any(feature = "completion", feature = "validation")),
        allow(dead_code)
    )]
    options: HTMLLanguageServiceOptions,
    #[cfg(feature = "completion")]
    html_completion: HTMLCompletion,
    #[cfg(feature = "validation")]
    html_validation: HTMLValidation,
}

impl HTMLLanguageService {
    pub fn new(options: HTMLLanguageServiceOptions) -> HTMLLanguageService {
        let data_manager =
            HTMLDataManager::new(options.use_default_data_provider.unwrap_or(true), None);
        HTMLLanguageService::with_data_manager(options, &data_manager)
    }

    /// Schema derived completion values are read from `data_manager` once, here
    #[cfg_attr(not(feature = "completion"), allow(unused_variables))]
    pub fn with_data_manager(
        options: HTMLLanguageServiceOptions,
        data_manager: &HTMLDataManager,
    ) -> HTMLLanguageService {
        HTMLLanguageService {
            options,
            #[cfg(feature = "completion")]
            html_completion: HTMLCompletion::new(data_manager),
            #[cfg(feature = "validation")]
            html_validation: HTMLValidation::default(),
        }
    }

    #[cfg(feature = "completion")]
    pub fn do_complete(&self, document: &FullTextDocument, position: &Position) -> CompletionList {
        self.html_completion
            .do_complete(document, position, self.options.completion.as_ref())
    }

    #[cfg(feature = "completion")]
    pub fn add_completion_provider(&mut self, provider: Box<dyn CompletionListProvider>) {
        self.html_completion.add_completion_provider(provider);
    }

    #[cfg(feature = "completion")]
    pub fn set_completion_providers(&mut self, providers: Vec<Box<dyn CompletionListProvider>>) {
        self.html_completion.set_completion_providers(providers);
    }

    #[cfg(feature = "validation")]
    pub fn do_validation(&self, document: &FullTextDocument) -> Vec<Diagnostic> {
        self.html_validation
            .do_validation(document, self.options.validation.as_ref())
    }

    #[cfg(feature = "validation")]
    pub fn add_validator(&mut self, validator: Box<dyn ElementValidator>) {
        self.html_validation.add_validator(validator);
    }

    /// A tagger that is kept up to date by the caller through `RegionTagger::reparse`
    #[cfg(feature = "outlining")]
    pub fn create_region_tagger(buffer: &impl TextSource) -> RegionTagger {
        RegionTagger::new(buffer)
    }

    /// A worker that reparses after every buffer change, spawn `OutliningWorker::run`
    #[cfg(feature = "outlining")]
    pub async fn create_outlining_worker(buffer: Arc<RwLock<TextBuffer>>) -> OutliningWorker {
        OutliningWorker::new(buffer).await
    }

    #[cfg(feature = "outlining")]
    pub fn get_outlining_tags(tagger: &RegionTagger, ranges: &[Range]) -> Vec<OutliningTag> {
        tagger.get_tags(ranges)
    }

    #[cfg(feature = "outlining")]
    pub fn get_folding_ranges(
        tagger: &RegionTagger,
        context: &FoldingRangeContext,
    ) -> Vec<FoldingRange> {
        get_folding_ranges(tagger, context)
    }
}
