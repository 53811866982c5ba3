//! Error taxonomy for the pipeline
//!
//! Two layers: `MindError` for failures inside a single stage, and
//! `PipelineError` for problems that reject a run before any Mind
//! executes. Validation issues are not errors; they live on
//! `ValidationResult` and never halt anything.

use crate::types::MindId;
use thiserror::Error;

/// A failure raised by one Mind's analyze call.
#[derive(Debug, Error)]
pub enum MindError {
    /// The stage was invoked with its contract unmet. Fatal for the
    /// run, never retried.
    #[error("{mind} precondition violated: {reason}")]
    Precondition { mind: MindId, reason: String },

    /// The external content generator failed. Retryable with backoff.
    #[error("{mind} content generator failed: {message}")]
    Generator { mind: MindId, message: String },

    /// The external content generator exceeded its per-Mind bound.
    /// Retryable with backoff.
    #[error("{mind} content generator timed out after {timeout_ms}ms")]
    GeneratorTimeout { mind: MindId, timeout_ms: u64 },

    /// Anything else that broke inside the stage.
    #[error("{mind} analysis failed: {message}")]
    Internal { mind: MindId, message: String },
}

impl MindError {
    pub fn mind(&self) -> MindId {
        match self {
            MindError::Precondition { mind, .. }
            | MindError::Generator { mind, .. }
            | MindError::GeneratorTimeout { mind, .. }
            | MindError::Internal { mind, .. } => *mind,
        }
    }

    /// Only generator trouble is worth retrying; a precondition
    /// violation is a programming-contract bug.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MindError::Generator { .. } | MindError::GeneratorTimeout { .. }
        )
    }
}

/// A problem that rejects a run at setup or before any stage executes.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no extracted data supplied")]
    EmptyInput,

    #[error("{mind} declares a dependency on unregistered mind {dependency}")]
    UnknownDependency { mind: MindId, dependency: MindId },

    #[error("dependency cycle detected: {path}")]
    DependencyCycle { path: String },

    #[error("{mind} is registered more than once")]
    DuplicateRegistration { mind: MindId },

    #[error("{mind} failed to initialize: {message}")]
    InitializationFailed { mind: MindId, message: String },
}
