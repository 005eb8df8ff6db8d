//! Enrichment of generated question files.
//!
//! Enrichment is an opaque file-to-file transform run after validation. The
//! pipeline only depends on the [`Enricher`] trait; [`NodeScriptEnricher`]
//! implements it by running the companion `enrich_questions.js` script.
//!
//! An enrichment failure never aborts a run. Callers log the error and fall
//! back to the unenriched questions.

pub mod node_script;

use std::path::Path;

use async_trait::async_trait;

use crate::error::EnrichmentError;

pub use node_script::{NodeScriptEnricher, DEFAULT_RUNTIME, ENRICH_SCRIPT_NAME};

/// A transform from a question file to an enriched question file.
#[async_trait]
pub trait Enricher: Send + Sync {
    /// Reads questions from `input` and writes the enriched set to `output`.
    ///
    /// Returning `Ok(())` means `output` now holds the enriched questions.
    async fn enrich(&self, input: &Path, output: &Path) -> Result<(), EnrichmentError>;

    /// Short name used in logs.
    fn name(&self) -> &str;
}
