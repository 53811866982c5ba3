//! minds-pipeline - a dependency-ordered council of analyzer Minds
//!
//! Runs a multi-stage personality analysis over raw extracted source
//! material. Each Mind declares its upstream dependencies, consumes the
//! sources plus earlier results, and produces scored, evidence-backed
//! trait assertions; the orchestrator resolves the graph, runs
//! independent stages concurrently, and has every stage validate its
//! own output against a fixed scoring rubric.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use minds_pipeline::{MindRegistry, NoopGenerator, Orchestrator, PipelineOptions};
//! use std::sync::Arc;
//!
//! let orchestrator = Orchestrator::new(
//!     MindRegistry::with_default_minds(),
//!     PipelineOptions::default(),
//!     Arc::new(NoopGenerator),
//! )?;
//!
//! let report = orchestrator.run(sources).await?;
//! for (mind, result) in &report.results {
//!     println!("{mind}: {} trait(s), valid={}",
//!         result.traits.len(), report.validations[mind].valid);
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! ExtractedData[] ──▶ Orchestrator ──▶ { MindId → MindResult }
//!                        │                 + ValidationResult each
//!                        ▼
//!              source-quality (stage 1)
//!               quality / duplicates / coverage / prioritization
//!                        │
//!          ┌─────────┬───┴────┬──────────┬─────────────┐
//!          ▼         ▼        ▼          ▼             ▼
//!     personality  values  interests  emotional   feasibility
//!                     │               communication
//!                     ▼                  growth
//! ```

pub mod analysis;
pub mod error;
pub mod generator;
pub mod mind;
pub mod minds;
pub mod orchestrator;
pub mod registry;
pub mod types;
pub mod validation;

// Core surface
pub use error::{MindError, PipelineError};
pub use mind::{Mind, MindContext, MindState};
pub use orchestrator::{print_report, Orchestrator, PipelineReport, StageFailure};
pub use registry::MindRegistry;
pub use types::*;

// First-stage analysis artifact
pub use analysis::{SourceAnalysis, SOURCE_ANALYSIS_KEY};

// Content-generator capability
pub use generator::{ContentGenerator, GeneratorConfig, HttpGenerator, NoopGenerator};
