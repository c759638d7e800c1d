//! Main Samarth struct and public API.

use crate::catalog::EntityCatalog;
use crate::error::Result;
use crate::normalize::{normalize_crop, normalize_rainfall};
use crate::query::{QueryEngine, QueryResult};
use crate::question::{self, StructuredQuery};
use crate::registry::DatasetRegistry;
use crate::resource::ResourceLoader;

/// The question-answering engine.
///
/// One call to [`Samarth::answer`] runs the whole pipeline: build the
/// entity catalog, extract query parameters from the question, then load,
/// normalize and aggregate both datasets. Nothing is cached between calls;
/// every question reconstructs its inputs from scratch.
pub struct Samarth {
    registry: DatasetRegistry,
    loader: ResourceLoader,
}

impl Samarth {
    /// Create an engine with the built-in registry and the default
    /// HTTP-backed loader.
    pub fn new() -> Result<Self> {
        Ok(Self {
            registry: DatasetRegistry::default(),
            loader: ResourceLoader::new()?,
        })
    }

    /// Replace the dataset registry.
    pub fn with_registry(mut self, registry: DatasetRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the resource loader.
    pub fn with_loader(mut self, loader: ResourceLoader) -> Self {
        self.loader = loader;
        self
    }

    /// Answer a free-text question.
    ///
    /// Errors from loading, normalization, or windowing propagate to the
    /// caller; there are no partial results.
    pub fn answer(&self, question: &str) -> Result<QueryResult> {
        let query = self.plan(question);
        self.engine().compare(&query)
    }

    /// Extract the structured query a question would run, without running it.
    pub fn plan(&self, question: &str) -> StructuredQuery {
        let catalog = self.catalog();
        question::extract(question, &catalog)
    }

    /// Build the entity catalog from the normalized datasets. Falls back to
    /// the fixed default catalog when either dataset cannot be loaded, so
    /// extraction always has names to match against.
    pub fn catalog(&self) -> EntityCatalog {
        let rainfall = self
            .registry
            .rainfall()
            .and_then(|info| self.loader.load(info))
            .and_then(|loaded| normalize_rainfall(&loaded.records));
        let crops = self
            .registry
            .crop_production()
            .and_then(|info| self.loader.load(info))
            .and_then(|loaded| normalize_crop(&loaded.records));

        match (rainfall, crops) {
            (Ok(rainfall), Ok(crops)) => EntityCatalog::from_tables(&rainfall, &crops),
            _ => EntityCatalog::fallback(),
        }
    }

    /// The registry this engine answers from.
    pub fn registry(&self) -> &DatasetRegistry {
        &self.registry
    }

    fn engine(&self) -> QueryEngine<'_> {
        QueryEngine::new(&self.registry, &self.loader)
    }
}

/// Example questions the engine is good at, for interactive surfaces.
pub fn suggested_questions() -> [&'static str; 5] {
    [
        "Compare average rainfall between Gujarat and Maharashtra in 2022.",
        "What were the top crops in Karnataka last 3 years?",
        "Which state had the highest rainfall recently?",
        "Show rainfall and crop info for Andhra Pradesh in 2021.",
        "How does rainfall trend relate to rice production?",
    ]
}
