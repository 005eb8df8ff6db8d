//! Quiz generation pipeline.
//!
//! Runs the stages in order for one theme:
//! prompt → completion → fence extraction → validation/repair → raw file →
//! optional enrichment → final file → optional merge into a question bank.
//!
//! Stages are awaited one after another; nothing runs concurrently.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::config::QuizConfig;
use crate::enrich::Enricher;
use crate::error::{LlmError, OutputError, ValidationError};
use crate::export::{merge_into_bank, read_questions, write_questions, MergeStats, OutputPaths};
use crate::llm::{GenerationRequest, LlmProvider, Message};
use crate::prompts::build_questions_prompt;
use crate::quiz::QuestionSet;
use crate::utils::json_extraction::{extract_json_payload, is_fenced};
use crate::validation::{AnswerRepair, QuestionValidator, ValidationReport};

/// Fatal pipeline errors. Any of these aborts the run before the final file is written.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

/// Parameters of one generation run.
#[derive(Debug, Clone)]
pub struct QuizRequest {
    /// Theme of the questions, passed verbatim to the prompt.
    pub theme: String,
    /// Number of questions requested. Not range-checked; it is only echoed
    /// into the prompt.
    pub count: i64,
    /// Directory receiving the raw file (and the default final file).
    pub work_dir: PathBuf,
    /// Explicit final file path.
    pub output: Option<PathBuf>,
    /// Whether to run the enricher.
    pub enrich: bool,
    /// Question bank to append the final questions to.
    pub merge_into: Option<PathBuf>,
}

impl QuizRequest {
    pub fn new(theme: impl Into<String>, count: i64, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            theme: theme.into(),
            count,
            work_dir: work_dir.into(),
            output: None,
            enrich: true,
            merge_into: None,
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_enrichment(mut self, enrich: bool) -> Self {
        self.enrich = enrich;
        self
    }

    pub fn with_merge_into(mut self, bank: impl Into<PathBuf>) -> Self {
        self.merge_into = Some(bank.into());
        self
    }

    /// Resolves the raw and final file locations for this request.
    pub fn paths(&self) -> OutputPaths {
        OutputPaths::resolve(&self.theme, &self.work_dir, self.output.as_deref())
    }
}

/// What happened to the enrichment step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EnrichmentOutcome {
    /// The enricher produced the final file.
    Enriched,
    /// Enrichment was attempted but unavailable or failed; the final file holds
    /// the unenriched questions.
    Fallback { reason: String },
    /// Enrichment was turned off for this run.
    Disabled,
}

impl EnrichmentOutcome {
    pub fn is_enriched(&self) -> bool {
        matches!(self, EnrichmentOutcome::Enriched)
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub theme: String,
    pub requested: i64,
    pub generated: usize,
    pub repairs: Vec<AnswerRepair>,
    pub warnings: Vec<String>,
    pub raw_path: PathBuf,
    pub final_path: PathBuf,
    pub enrichment: EnrichmentOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge: Option<MergeStats>,
    pub finished_at: String,
}

/// The question generation pipeline.
pub struct QuizPipeline {
    provider: Arc<dyn LlmProvider>,
    enricher: Option<Arc<dyn Enricher>>,
    config: QuizConfig,
}

impl QuizPipeline {
    /// Creates a pipeline without an enricher.
    pub fn new(provider: Arc<dyn LlmProvider>, config: QuizConfig) -> Self {
        Self {
            provider,
            enricher: None,
            config,
        }
    }

    /// Sets the enricher used when a request asks for enrichment.
    pub fn with_enricher(mut self, enricher: Arc<dyn Enricher>) -> Self {
        self.enricher = Some(enricher);
        self
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    /// Requests `count` questions on `theme` and validates the reply.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Llm` on transport, HTTP, or empty-reply failures and
    /// `PipelineError::Validation` on malformed JSON or structurally invalid records.
    pub async fn generate(
        &self,
        theme: &str,
        count: i64,
    ) -> Result<ValidationReport, PipelineError> {
        info!(
            theme = %theme,
            count,
            model = %self.config.model,
            "Generating {} questions on theme '{}'",
            count,
            theme
        );

        let request = GenerationRequest::new(
            self.config.model.clone(),
            vec![Message::user(build_questions_prompt(theme, count))],
        )
        .with_max_tokens(self.config.max_tokens)
        .with_temperature(self.config.temperature);

        let response = self.provider.generate(request).await?;
        let text = response.completion_text()?;

        if is_fenced(text) {
            debug!("Stripping code fence from model reply");
        }
        let payload = extract_json_payload(text);

        let report = QuestionValidator::validate(&payload)?;
        info!(
            generated = report.success_count(),
            repairs = report.repairs.len(),
            "{} questions generated",
            report.success_count()
        );

        Ok(report)
    }

    /// Runs the full pipeline for `request`.
    ///
    /// The raw file is always written once validation succeeds. Enrichment
    /// failures are absorbed; the final file then holds the raw questions.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError` for generation, validation, or file errors.
    /// Nothing is written when generation or validation fails.
    pub async fn run(&self, request: &QuizRequest) -> Result<RunSummary, PipelineError> {
        let report = self.generate(&request.theme, request.count).await?;
        let paths = request.paths();

        write_questions(&paths.raw, &report.questions)?;
        info!(path = %paths.raw.display(), "Raw questions saved");

        let enrichment = if request.enrich {
            self.enrich_or_fallback(&paths, &report.questions).await?
        } else {
            write_questions(&paths.final_path, &report.questions)?;
            EnrichmentOutcome::Disabled
        };
        info!(path = %paths.final_path.display(), enriched = enrichment.is_enriched(), "Final questions saved");

        let merge = match &request.merge_into {
            Some(bank) => {
                let final_set = final_questions(&paths.final_path, &enrichment, &report.questions);
                Some(merge_into_bank(bank, &final_set)?)
            }
            None => None,
        };

        Ok(RunSummary {
            theme: request.theme.clone(),
            requested: request.count,
            generated: report.success_count(),
            repairs: report.repairs,
            warnings: report.warnings,
            raw_path: paths.raw,
            final_path: paths.final_path,
            enrichment,
            merge,
            finished_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    /// Runs the enricher, writing the raw questions to the final path if it
    /// is missing or fails.
    async fn enrich_or_fallback(
        &self,
        paths: &OutputPaths,
        questions: &QuestionSet,
    ) -> Result<EnrichmentOutcome, PipelineError> {
        let reason = match &self.enricher {
            Some(enricher) => {
                info!(enricher = enricher.name(), "Enriching questions");
                match enricher.enrich(&paths.raw, &paths.final_path).await {
                    Ok(()) => return Ok(EnrichmentOutcome::Enriched),
                    Err(e) => e.to_string(),
                }
            }
            None => "no enricher configured".to_string(),
        };

        warn!(reason = %reason, "Enrichment unavailable, saving questions without enrichment");
        write_questions(&paths.final_path, questions)?;

        Ok(EnrichmentOutcome::Fallback { reason })
    }
}

/// Questions as they ended up in the final file.
///
/// Enriched output is re-read so merged questions carry the enrichment fields.
fn final_questions(
    final_path: &Path,
    enrichment: &EnrichmentOutcome,
    validated: &QuestionSet,
) -> QuestionSet {
    if !enrichment.is_enriched() {
        return validated.clone();
    }

    match read_questions(final_path) {
        Ok(set) => set,
        Err(e) => {
            warn!(error = %e, "Could not read enriched file, merging unenriched questions");
            validated.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EnrichmentError;
    use crate::llm::{Choice, GenerationResponse};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct CannedProvider {
        reply: String,
        requests: Mutex<Vec<GenerationRequest>>,
    }

    impl CannedProvider {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for CannedProvider {
        async fn generate(
            &self,
            request: GenerationRequest,
        ) -> Result<GenerationResponse, LlmError> {
            self.requests.lock().expect("lock").push(request);
            Ok(GenerationResponse {
                id: "test".to_string(),
                model: "test".to_string(),
                choices: vec![Choice {
                    index: 0,
                    message: Message::assistant(self.reply.clone()),
                    finish_reason: Some("stop".to_string()),
                }],
                usage: None,
            })
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl LlmProvider for FailingProvider {
        async fn generate(&self, _: GenerationRequest) -> Result<GenerationResponse, LlmError> {
            Err(LlmError::RequestFailed("connection refused".to_string()))
        }
    }

    struct BrokenEnricher;

    #[async_trait]
    impl Enricher for BrokenEnricher {
        async fn enrich(&self, _: &Path, output: &Path) -> Result<(), EnrichmentError> {
            std::fs::write(output, "[{\"half")?;
            Err(EnrichmentError::NonZeroExit {
                code: 1,
                stderr: "boom".to_string(),
            })
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    const VALID_REPLY: &str = r#"[
        {"question": "Q1 ?", "options": ["a", "b", "c", "d"], "reponseCorrecte": "a"},
        {"question": "Q2 ?", "options": ["e", "f", "g", "h"], "reponseCorrecte": "x"}
    ]"#;

    #[tokio::test]
    async fn test_generate_sends_configured_request() {
        let provider = Arc::new(CannedProvider::new(VALID_REPLY));
        let config = QuizConfig::new().with_model("test-model").with_max_tokens(512);
        let pipeline = QuizPipeline::new(provider.clone(), config);

        let report = pipeline.generate("astronomie", 2).await.expect("should generate");
        assert_eq!(report.success_count(), 2);
        assert_eq!(report.repairs.len(), 1);

        let requests = provider.requests.lock().expect("lock");
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.model, "test-model");
        assert_eq!(request.max_tokens, Some(512));
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, "user");
        assert!(request.messages[0].content.contains("astronomie"));
    }

    #[tokio::test]
    async fn test_generate_strips_fence() {
        let reply = format!("```json\n{}\n```", VALID_REPLY);
        let pipeline = QuizPipeline::new(Arc::new(CannedProvider::new(&reply)), QuizConfig::new());

        let report = pipeline.generate("t", 2).await.expect("should generate");
        assert_eq!(report.success_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_reply_is_fatal() {
        let pipeline = QuizPipeline::new(Arc::new(CannedProvider::new("  ")), QuizConfig::new());
        let err = pipeline.generate("t", 2).await.expect_err("should fail");
        assert!(matches!(err, PipelineError::Llm(LlmError::EmptyCompletion)));
    }

    #[tokio::test]
    async fn test_transport_error_writes_nothing() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let pipeline = QuizPipeline::new(Arc::new(FailingProvider), QuizConfig::new());
        let request = QuizRequest::new("t", 2, dir.path());

        let err = pipeline.run(&request).await.expect_err("should fail");
        assert!(matches!(err, PipelineError::Llm(LlmError::RequestFailed(_))));
        assert!(!request.paths().raw.exists());
        assert!(!request.paths().final_path.exists());
    }

    #[tokio::test]
    async fn test_failed_enrichment_overwrites_partial_output() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let pipeline = QuizPipeline::new(Arc::new(CannedProvider::new(VALID_REPLY)), QuizConfig::new())
            .with_enricher(Arc::new(BrokenEnricher));
        let request = QuizRequest::new("t", 2, dir.path());

        let summary = pipeline.run(&request).await.expect("should run");

        assert!(matches!(summary.enrichment, EnrichmentOutcome::Fallback { ref reason } if reason.contains("boom")));
        let raw = std::fs::read(&summary.raw_path).expect("raw exists");
        let final_bytes = std::fs::read(&summary.final_path).expect("final exists");
        assert_eq!(raw, final_bytes);
    }

    #[tokio::test]
    async fn test_disabled_enrichment_skips_enricher() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let pipeline = QuizPipeline::new(Arc::new(CannedProvider::new(VALID_REPLY)), QuizConfig::new())
            .with_enricher(Arc::new(BrokenEnricher));
        let request = QuizRequest::new("t", 2, dir.path()).with_enrichment(false);

        let summary = pipeline.run(&request).await.expect("should run");
        assert_eq!(summary.enrichment, EnrichmentOutcome::Disabled);
        assert!(summary.final_path.exists());
    }

    #[test]
    fn test_enrichment_outcome_serialization() {
        let json = serde_json::to_string(&EnrichmentOutcome::Fallback {
            reason: "missing".to_string(),
        })
        .expect("should serialize");
        assert_eq!(json, r#"{"status":"fallback","reason":"missing"}"#);

        let json = serde_json::to_string(&EnrichmentOutcome::Enriched).expect("should serialize");
        assert_eq!(json, r#"{"status":"enriched"}"#);
    }
}
