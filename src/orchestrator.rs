//! Pipeline orchestrator
//!
//! Resolves the dependency graph at construction, then runs the Minds
//! layer by layer: every Mind in a layer is independent of the others
//! and runs concurrently on its own context snapshot. Only the
//! orchestrator writes to `previous_results`, and only after a stage's
//! `analyze` returns - publish-after-complete is the sole
//! synchronization point. An aborted run still reports the results of
//! every stage that finished.

use crate::error::{MindError, PipelineError};
use crate::generator::ContentGenerator;
use crate::mind::{Mind, MindContext};
use crate::registry::MindRegistry;
use crate::types::{
    ExtractedData, MindHealth, MindId, MindResult, PipelineOptions, ValidationResult,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

/// Base delay for generator-retry backoff; doubles per attempt.
const RETRY_BACKOFF_MS: u64 = 200;

/// Which stage aborted the run, and why.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageFailure {
    pub mind: MindId,
    pub message: String,
}

/// The full artifact of one pipeline run. `results` holds every stage
/// that completed, even when `failure` is set; downstream stages of a
/// failed one are simply absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    pub session_id: String,
    pub results: HashMap<MindId, MindResult>,
    pub validations: HashMap<MindId, ValidationResult>,
    pub failure: Option<StageFailure>,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl PipelineReport {
    pub fn completed(&self) -> bool {
        self.failure.is_none()
    }
}

/// Runs registered Minds in dependency order over a source set.
pub struct Orchestrator {
    registry: MindRegistry,
    options: PipelineOptions,
    generator: Arc<dyn ContentGenerator>,
}

impl Orchestrator {
    /// Validates the dependency graph and initializes every Mind.
    /// Unknown dependencies and cycles are rejected here, never at run
    /// time.
    pub fn new(
        registry: MindRegistry,
        options: PipelineOptions,
        generator: Arc<dyn ContentGenerator>,
    ) -> Result<Self, PipelineError> {
        registry.validate_graph()?;
        for mind in registry.minds() {
            mind.initialize(&options)
                .map_err(|e| PipelineError::InitializationFailed {
                    mind: mind.id(),
                    message: e.to_string(),
                })?;
        }
        Ok(Self {
            registry,
            options,
            generator,
        })
    }

    pub fn registry(&self) -> &MindRegistry {
        &self.registry
    }

    pub fn health(&self) -> Vec<MindHealth> {
        self.registry.minds().iter().map(|m| m.health_check()).collect()
    }

    /// Run the pipeline over the given sources. Returns `Err` only for
    /// problems caught before any stage executes; a stage failure
    /// mid-run comes back as `Ok` with `failure` set and the completed
    /// upstream results retained. Dropping the returned future cancels
    /// the run: in-flight stages are aborted with their JoinSet and
    /// later layers are never spawned.
    pub async fn run(
        &self,
        extracted_data: Vec<ExtractedData>,
    ) -> Result<PipelineReport, PipelineError> {
        self.run_with_session(extracted_data, None).await
    }

    /// Like [`run`](Self::run), with a caller-chosen session id instead
    /// of a generated one.
    pub async fn run_with_session(
        &self,
        extracted_data: Vec<ExtractedData>,
        session_id: Option<String>,
    ) -> Result<PipelineReport, PipelineError> {
        if extracted_data.is_empty() {
            return Err(PipelineError::EmptyInput);
        }
        let layers = self.registry.execution_layers()?;

        let mut context =
            MindContext::new(extracted_data, self.options.clone(), self.generator.clone());
        if let Some(id) = session_id {
            context.session_id = id;
        }
        let started_at = Utc::now();
        let clock = Instant::now();
        tracing::info!(
            session = %context.session_id,
            sources = context.extracted_data.len(),
            "pipeline run starting"
        );

        let mut failure: Option<StageFailure> = None;

        for layer in layers {
            let mut join_set: JoinSet<(MindId, Result<MindResult, MindError>)> = JoinSet::new();
            let layer_ids = layer.clone();
            let mut panicked: Option<String> = None;
            for id in layer {
                // construction validated the graph, so the lookup holds
                let mind = self
                    .registry
                    .get(id)
                    .cloned()
                    .ok_or(PipelineError::UnknownDependency {
                        mind: id,
                        dependency: id,
                    })?;
                let snapshot = context.clone();
                let max_retries = self.options.max_generator_retries;
                join_set.spawn(async move { (id, run_stage(mind, snapshot, max_retries).await) });
            }

            // drain the whole layer so concurrently finished results
            // are kept even when a sibling stage fails
            while let Some(joined) = join_set.join_next().await {
                match joined {
                    Ok((id, Ok(result))) => {
                        tracing::info!(mind = %id, traits = result.traits.len(), "stage complete");
                        context.previous_results.insert(id, Arc::new(result));
                    }
                    Ok((id, Err(err))) => {
                        tracing::warn!(mind = %id, error = %err, "stage failed");
                        if failure.is_none() {
                            failure = Some(StageFailure {
                                mind: id,
                                message: err.to_string(),
                            });
                        }
                    }
                    Err(join_err) => {
                        panicked = Some(join_err.to_string());
                    }
                }
            }

            // a panicked task never reported its id; whichever layer
            // member is missing from the published results is it
            if let (Some(message), None) = (&panicked, &failure) {
                let culprit = layer_ids
                    .iter()
                    .copied()
                    .find(|id| !context.previous_results.contains_key(id))
                    .unwrap_or(layer_ids[0]);
                failure = Some(StageFailure {
                    mind: culprit,
                    message: format!("stage task panicked: {message}"),
                });
            }

            if failure.is_some() {
                break;
            }
        }

        let results: HashMap<MindId, MindResult> = context
            .previous_results
            .iter()
            .map(|(id, result)| (*id, result.as_ref().clone()))
            .collect();

        // every completed stage assesses its own output; issues are
        // advisory and never halt anything
        let validations: HashMap<MindId, ValidationResult> = results
            .iter()
            .filter_map(|(id, result)| {
                self.registry.get(*id).map(|mind| (*id, mind.validate(result)))
            })
            .collect();

        let report = PipelineReport {
            session_id: context.session_id.clone(),
            results,
            validations,
            failure,
            started_at,
            duration_ms: clock.elapsed().as_millis() as u64,
        };
        match &report.failure {
            None => tracing::info!(
                session = %report.session_id,
                duration_ms = report.duration_ms,
                "pipeline run complete"
            ),
            Some(failure) => tracing::warn!(
                session = %report.session_id,
                mind = %failure.mind,
                "pipeline run aborted"
            ),
        }
        Ok(report)
    }
}

/// Run one stage, retrying generator trouble with exponential backoff.
/// Precondition violations are contract bugs and are never retried.
async fn run_stage(
    mind: Arc<dyn Mind>,
    context: MindContext,
    max_retries: u32,
) -> Result<MindResult, MindError> {
    let mut attempt: u32 = 0;
    loop {
        match mind.analyze(&context).await {
            Ok(result) => {
                mind.state().record_success();
                return Ok(result);
            }
            Err(err) if err.is_retryable() && attempt < max_retries => {
                let backoff = Duration::from_millis(RETRY_BACKOFF_MS << attempt);
                attempt += 1;
                tracing::warn!(
                    mind = %mind.id(),
                    attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %err,
                    "generator trouble, retrying"
                );
                tokio::time::sleep(backoff).await;
            }
            Err(err) => {
                mind.state().record_error(&err.to_string());
                return Err(err);
            }
        }
    }
}

/// Print a human-readable run report.
pub fn print_report(report: &PipelineReport) {
    println!("\n┌──────────────────────────────────────────────────────────┐");
    println!("│ MINDS PIPELINE REPORT                                    │");
    println!("└──────────────────────────────────────────────────────────┘\n");
    println!("Session:  {}", report.session_id);
    println!("Started:  {}", report.started_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("Duration: {}ms", report.duration_ms);

    if let Some(failure) = &report.failure {
        println!("\nABORTED at {}: {}", failure.mind, failure.message);
        println!("Upstream results below are still usable.");
    }

    println!("\nSTAGES:");
    for id in MindId::ALL {
        let Some(result) = report.results.get(&id) else {
            if report.failure.is_some() {
                println!("   {:20} (not run)", id.to_string());
            }
            continue;
        };
        let validation = report.validations.get(&id);
        let bar = "█".repeat((result.confidence * 10.0).round() as usize);
        let verdict = match validation {
            Some(v) if v.valid => format!("valid   {:3}/100", v.score),
            Some(v) => format!("INVALID {:3}/100", v.score),
            None => "unvalidated".to_string(),
        };
        println!(
            "   {:20} {:2} trait(s)  conf {:.2} {:10} {}",
            id.to_string(),
            result.traits.len(),
            result.confidence,
            bar,
            verdict
        );
        for issue in validation.map(|v| v.issues.as_slice()).unwrap_or(&[]) {
            println!("      [{:?}] {}", issue.severity, issue.message);
        }
    }

    let mut recommendations: Vec<(&MindId, &String)> = Vec::new();
    for id in &MindId::ALL {
        if let Some(result) = report.results.get(id) {
            for rec in &result.recommendations {
                recommendations.push((id, rec));
            }
        }
    }
    if !recommendations.is_empty() {
        println!("\nRECOMMENDATIONS:");
        for (id, rec) in recommendations {
            println!("   • [{id}] {rec}");
        }
    }
}
