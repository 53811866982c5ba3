//! The Mind contract: one analyzer stage per analytical dimension
//!
//! A Mind declares its upstream dependencies, consumes the raw
//! extracted sources plus the results of earlier stages, and produces
//! one scored, evidence-backed `MindResult` per run. The orchestrator
//! never hands a Mind a context whose dependencies are unpublished;
//! each Mind still re-checks that contract at the top of `analyze`.

use crate::error::MindError;
use crate::generator::ContentGenerator;
use crate::types::{
    ExtractedData, MindHealth, MindId, MindPersona, MindResult, PipelineOptions, TraitCategory,
    ValidationResult,
};
use crate::validation;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

/// Everything a Mind sees during a run. Each stage receives its own
/// snapshot (cheap Arc clones); only the orchestrator appends to
/// `previous_results` between stages, so a running Mind cannot observe
/// or cause mutation.
#[derive(Clone)]
pub struct MindContext {
    pub extracted_data: Arc<Vec<ExtractedData>>,
    pub previous_results: HashMap<MindId, Arc<MindResult>>,
    pub options: PipelineOptions,
    pub session_id: String,
    /// Run-scoped clock reading; age computations use this instead of
    /// the wall clock so re-running with the same context reproduces
    /// the same scores.
    pub now: DateTime<Utc>,
    pub generator: Arc<dyn ContentGenerator>,
}

impl MindContext {
    pub fn new(
        extracted_data: Vec<ExtractedData>,
        options: PipelineOptions,
        generator: Arc<dyn ContentGenerator>,
    ) -> Self {
        Self {
            extracted_data: Arc::new(extracted_data),
            previous_results: HashMap::new(),
            options,
            session_id: Uuid::new_v4().to_string(),
            now: Utc::now(),
            generator,
        }
    }

    /// Result of an earlier stage, if it has been published.
    pub fn result_for(&self, id: MindId) -> Option<&MindResult> {
        self.previous_results.get(&id).map(|r| r.as_ref())
    }

    /// Bounded call into the external content generator. This is the
    /// only suspension point inside an analysis; on timeout the stage
    /// fails rather than degrading to a partial result.
    pub async fn generate(&self, mind: MindId, prompt: &str) -> Result<String, MindError> {
        let timeout_ms = self.options.generator_timeout_ms;
        match tokio::time::timeout(
            Duration::from_millis(timeout_ms),
            self.generator.generate(prompt),
        )
        .await
        {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(err)) => Err(MindError::Generator {
                mind,
                message: err.to_string(),
            }),
            Err(_) => Err(MindError::GeneratorTimeout { mind, timeout_ms }),
        }
    }
}

/// Shared lifecycle state every Mind embeds. Interior mutability so a
/// Mind stays `&self` across concurrent stages.
#[derive(Debug, Default)]
pub struct MindState {
    ready: AtomicBool,
    last_success: Mutex<Option<DateTime<Utc>>>,
    last_error: Mutex<Option<String>>,
}

impl MindState {
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::SeqCst);
    }

    pub fn clear(&self) {
        self.ready.store(false, Ordering::SeqCst);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    pub fn record_success(&self) {
        if let Ok(mut slot) = self.last_success.lock() {
            *slot = Some(Utc::now());
        }
        if let Ok(mut slot) = self.last_error.lock() {
            *slot = None;
        }
    }

    pub fn record_error(&self, message: &str) {
        if let Ok(mut slot) = self.last_error.lock() {
            *slot = Some(message.to_string());
        }
    }

    fn last_success(&self) -> Option<DateTime<Utc>> {
        self.last_success.lock().ok().and_then(|slot| *slot)
    }

    fn last_error(&self) -> Option<String> {
        self.last_error.lock().ok().and_then(|slot| slot.clone())
    }
}

/// One analyzer stage in the pipeline.
#[async_trait]
pub trait Mind: Send + Sync {
    fn id(&self) -> MindId;

    fn persona(&self) -> MindPersona;

    /// Shared lifecycle state; implementors return their embedded
    /// `MindState`.
    fn state(&self) -> &MindState;

    /// Upstream stages whose results must be published before this
    /// Mind runs. Static and pure; acyclic across the registry.
    fn dependencies(&self) -> Vec<MindId> {
        Vec::new()
    }

    /// Trait categories the validation rubric expects in this Mind's
    /// output.
    fn expected_categories(&self) -> Vec<TraitCategory> {
        Vec::new()
    }

    /// Minimum validation score for a result to count as valid.
    fn validity_threshold(&self) -> u8 {
        50
    }

    /// Whether this Mind can run against the given context.
    fn can_handle(&self, context: &MindContext) -> bool {
        self.check_preconditions(context).is_ok()
    }

    /// Contract check shared by `can_handle` and `analyze`: non-empty
    /// input and every declared dependency published.
    fn check_preconditions(&self, context: &MindContext) -> Result<(), MindError> {
        if context.extracted_data.is_empty() {
            return Err(MindError::Precondition {
                mind: self.id(),
                reason: "no extracted data".to_string(),
            });
        }
        for dependency in self.dependencies() {
            if !context.previous_results.contains_key(&dependency) {
                return Err(MindError::Precondition {
                    mind: self.id(),
                    reason: format!("missing dependency result: {dependency}"),
                });
            }
        }
        Ok(())
    }

    /// Merge option overrides onto defaults and flip the ready flag.
    fn initialize(&self, options: &PipelineOptions) -> anyhow::Result<()> {
        let _ = options;
        self.state().mark_ready();
        Ok(())
    }

    /// Produce this Mind's result. Must fail with a precondition error
    /// when `can_handle` is false, and must be reproducible from the
    /// context alone (modulo the external generator).
    async fn analyze(&self, context: &MindContext) -> Result<MindResult, MindError>;

    /// Pure self-assessment of a result against the scoring rubric.
    fn validate(&self, result: &MindResult) -> ValidationResult {
        validation::validate_result(
            result,
            &self.expected_categories(),
            self.validity_threshold(),
        )
    }

    fn health_check(&self) -> MindHealth {
        MindHealth {
            mind_id: self.id(),
            healthy: self.state().is_ready(),
            last_success: self.state().last_success(),
            error: self.state().last_error(),
        }
    }

    /// Idempotent teardown; clears the ready flag.
    fn dispose(&self) {
        self.state().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::NoopGenerator;
    use crate::types::SourceType;

    struct ProbeMind {
        state: MindState,
    }

    #[async_trait]
    impl Mind for ProbeMind {
        fn id(&self) -> MindId {
            MindId::Growth
        }

        fn persona(&self) -> MindPersona {
            MindPersona {
                id: MindId::Growth,
                name: "Probe".into(),
                expertise: vec![],
                tone: "plain".into(),
                version: "0".into(),
            }
        }

        fn state(&self) -> &MindState {
            &self.state
        }

        fn dependencies(&self) -> Vec<MindId> {
            vec![MindId::SourceQuality]
        }

        async fn analyze(&self, context: &MindContext) -> Result<MindResult, MindError> {
            self.check_preconditions(context)?;
            Ok(MindResult::new(self.id()))
        }
    }

    fn context_with(data: Vec<ExtractedData>) -> MindContext {
        MindContext::new(data, PipelineOptions::default(), Arc::new(NoopGenerator))
    }

    fn sample_source(id: &str) -> ExtractedData {
        ExtractedData {
            id: id.to_string(),
            source_type: SourceType::Chat,
            content: "hello world".to_string(),
            timestamp: None,
            metadata: Default::default(),
        }
    }

    #[test]
    fn can_handle_is_false_on_empty_input() {
        let mind = ProbeMind {
            state: MindState::default(),
        };
        let ctx = context_with(vec![]);
        assert!(!mind.can_handle(&ctx));
    }

    #[test]
    fn can_handle_requires_published_dependencies() {
        let mind = ProbeMind {
            state: MindState::default(),
        };
        let mut ctx = context_with(vec![sample_source("s1")]);
        assert!(!mind.can_handle(&ctx));

        ctx.previous_results.insert(
            MindId::SourceQuality,
            Arc::new(MindResult::new(MindId::SourceQuality)),
        );
        assert!(mind.can_handle(&ctx));
    }

    #[tokio::test]
    async fn analyze_rejects_unmet_preconditions() {
        let mind = ProbeMind {
            state: MindState::default(),
        };
        let ctx = context_with(vec![sample_source("s1")]);
        let err = mind.analyze(&ctx).await.unwrap_err();
        match err {
            MindError::Precondition { mind: id, reason } => {
                assert_eq!(id, MindId::Growth);
                assert!(reason.contains("source-quality"));
            }
            other => panic!("expected precondition error, got {other:?}"),
        }
    }

    #[test]
    fn health_tracks_initialize_and_dispose() {
        let mind = ProbeMind {
            state: MindState::default(),
        };
        assert!(!mind.health_check().healthy);

        mind.initialize(&PipelineOptions::default()).unwrap();
        assert!(mind.health_check().healthy);

        mind.dispose();
        mind.dispose();
        assert!(!mind.health_check().healthy);
    }

    #[tokio::test]
    async fn generator_timeout_surfaces_as_mind_error() {
        struct SlowGenerator;

        #[async_trait]
        impl ContentGenerator for SlowGenerator {
            fn name(&self) -> &'static str {
                "slow"
            }

            async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok("too late".into())
            }
        }

        let mut ctx = context_with(vec![sample_source("s1")]);
        ctx.options.generator_timeout_ms = 10;
        ctx.generator = Arc::new(SlowGenerator);

        let err = ctx.generate(MindId::Feasibility, "hi").await.unwrap_err();
        assert!(matches!(err, MindError::GeneratorTimeout { .. }));
    }
}
