//! Core types for the minds-pipeline analyzer council
//!
//! Everything downstream of the orchestrator speaks these types:
//! raw extracted sources in, scored and evidenced trait assertions out.
//! All confidences are normalized floats in [0,1]; all quality-style
//! scores are integers in [0,100]. Values are clamped at the boundary
//! before they are stored, never after.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Where a piece of source material came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Chat,
    Document,
    Video,
    Audio,
    Social,
    Other,
}

/// A single raw source record produced by an external collector.
/// Immutable once handed to the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedData {
    pub id: String,
    pub source_type: SourceType,
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl ExtractedData {
    /// Whitespace-tokenized word count of the content.
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}

/// Identity of one analyzer stage. Closed set: the dependency graph
/// is checked against a known-finite node set, not runtime plugins.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum MindId {
    SourceQuality,
    Personality,
    Values,
    Interests,
    EmotionalProfile,
    Communication,
    Growth,
    Feasibility,
}

impl MindId {
    /// Every registered identity, in canonical order.
    pub const ALL: [MindId; 8] = [
        MindId::SourceQuality,
        MindId::Personality,
        MindId::Values,
        MindId::Interests,
        MindId::EmotionalProfile,
        MindId::Communication,
        MindId::Growth,
        MindId::Feasibility,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MindId::SourceQuality => "source-quality",
            MindId::Personality => "personality",
            MindId::Values => "values",
            MindId::Interests => "interests",
            MindId::EmotionalProfile => "emotional-profile",
            MindId::Communication => "communication",
            MindId::Growth => "growth",
            MindId::Feasibility => "feasibility",
        }
    }
}

impl fmt::Display for MindId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive identity card for an analyzer. Read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MindPersona {
    pub id: MindId,
    pub name: String,
    pub expertise: Vec<String>,
    pub tone: String,
    pub version: String,
}

/// The analytical dimension a trait belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TraitCategory {
    Quality,
    Coverage,
    Personality,
    Values,
    Interests,
    Emotional,
    Communication,
    Growth,
    TradeOff,
    Constraint,
    Risk,
    DecisionStyle,
    Feasibility,
}

/// A trait value can be textual, numeric, or boolean
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TraitValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

/// A single scored, evidenced assertion about the analyzed subject
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalityTrait {
    pub category: TraitCategory,
    pub name: String,
    pub value: TraitValue,
    pub confidence: f64,
    /// Source ids this trait was derived from
    pub sources: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// An excerpt from a source supporting a trait or finding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
    pub source: String,
    pub excerpt: String,
    pub relevance: f64,
    #[serde(default)]
    pub kind: Option<String>,
}

/// Output of one Mind for one run. Immutable after creation; owned by
/// the orchestrator's results map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MindResult {
    pub mind_id: MindId,
    pub traits: Vec<PersonalityTrait>,
    pub confidence: f64,
    pub evidence: Vec<Evidence>,
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl MindResult {
    pub fn new(mind_id: MindId) -> Self {
        Self {
            mind_id,
            traits: Vec::new(),
            confidence: 0.0,
            evidence: Vec::new(),
            recommendations: Vec::new(),
            metadata: HashMap::new(),
            created_at: Utc::now(),
        }
    }

    /// First trait in the given category, if any.
    pub fn trait_in(&self, category: TraitCategory) -> Option<&PersonalityTrait> {
        self.traits.iter().find(|t| t.category == category)
    }
}

/// Severity of a validation issue
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// One problem found while validating a MindResult
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub path: Option<String>,
}

/// Self-assessment of a MindResult against the scoring rubric.
/// Issues are advisory: an invalid result never halts the run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationResult {
    pub valid: bool,
    pub score: u8,
    pub issues: Vec<ValidationIssue>,
}

/// Health snapshot for a Mind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MindHealth {
    pub mind_id: MindId,
    pub healthy: bool,
    pub last_success: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

/// Credibility sub-score with the factors that earned it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredibilityScore {
    pub score: u8,
    pub factors: Vec<String>,
}

/// Recency sub-score derived from content age
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecencyScore {
    pub score: u8,
    pub age_in_days: Option<i64>,
}

/// Depth sub-score derived from word count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepthScore {
    pub score: u8,
    pub word_count: usize,
    pub is_substantive: bool,
}

/// Relevance sub-score with the first-person topic categories matched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelevanceScore {
    pub score: u8,
    pub topics: Vec<String>,
}

/// Per-source quality record, recomputed each run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceQuality {
    pub source_id: String,
    pub score: u8,
    pub credibility: CredibilityScore,
    pub recency: RecencyScore,
    pub depth: DepthScore,
    pub relevance: RelevanceScore,
}

/// How tight a duplicate group is
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateKind {
    Exact,
    Near,
    Semantic,
}

/// A set of sources judged to be duplicates of each other.
/// Always has at least two members, and the primary is one of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub group_id: String,
    pub kind: DuplicateKind,
    pub similarity: f64,
    pub source_ids: Vec<String>,
    pub primary_source_id: String,
    pub primary_reason: String,
}

/// Coverage of one topic across the source set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicCoverage {
    pub topic: String,
    pub source_ids: Vec<String>,
    pub average_quality: f64,
}

/// Severity of a coverage gap
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GapSeverity {
    Critical,
    Moderate,
}

/// An essential or underrepresented topic lacking support
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageGap {
    pub topic: String,
    pub severity: GapSeverity,
    pub source_count: usize,
    pub message: String,
}

/// Spread of sources over time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalDistribution {
    pub earliest: Option<DateTime<Utc>>,
    pub latest: Option<DateTime<Utc>>,
    pub span_days: Option<i64>,
    /// Month buckets keyed "YYYY-MM", sorted
    pub months: std::collections::BTreeMap<String, usize>,
    pub spread_score: u8,
}

/// Variety of source formats
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatDiversity {
    pub types: Vec<SourceType>,
    pub score: u8,
    pub has_variety: bool,
}

/// Aggregate coverage picture for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageResult {
    pub topics: Vec<TopicCoverage>,
    pub gaps: Vec<CoverageGap>,
    pub temporal: TemporalDistribution,
    pub format_diversity: FormatDiversity,
    pub overall_score: u8,
}

/// Configuration bag for a pipeline run. Callers supply a partial JSON
/// object; serde defaults fill everything they leave out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Sources scoring below this are dropped from prioritization
    pub min_quality_score: u8,
    /// Jaccard similarity at or above this groups two sources
    pub duplicate_threshold: f64,
    /// Derived constructs below this confidence are discarded
    pub confidence_threshold: f64,
    /// Keep low-quality sources in the prioritized ordering
    pub include_low_quality: bool,
    /// Let Minds call the external content generator for narratives
    pub use_generator: bool,
    /// Per-Mind bound on a single generator call
    pub generator_timeout_ms: u64,
    /// Retries (with backoff) for generator failures before aborting
    pub max_generator_retries: u32,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            min_quality_score: 40,
            duplicate_threshold: 0.85,
            confidence_threshold: 0.5,
            include_low_quality: false,
            use_generator: false,
            generator_timeout_ms: 30_000,
            max_generator_retries: 2,
        }
    }
}

impl PipelineOptions {
    /// Merge a partial JSON override bag onto the defaults.
    pub fn from_value(value: serde_json::Value) -> anyhow::Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

/// Clamp a float to the unit interval.
pub fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Round and clamp a float into a 0-100 integer score.
pub fn clamp_score(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mind_id_round_trips_through_serde() {
        for id in MindId::ALL {
            let json = serde_json::to_string(&id).unwrap();
            let back: MindId = serde_json::from_str(&json).unwrap();
            assert_eq!(id, back);
        }
        assert_eq!(
            serde_json::to_string(&MindId::SourceQuality).unwrap(),
            "\"source-quality\""
        );
    }

    #[test]
    fn options_merge_partial_overrides_onto_defaults() {
        let opts =
            PipelineOptions::from_value(serde_json::json!({"duplicate_threshold": 0.9})).unwrap();
        assert_eq!(opts.duplicate_threshold, 0.9);
        assert_eq!(opts.min_quality_score, 40);
        assert_eq!(opts.confidence_threshold, 0.5);
    }

    #[test]
    fn extracted_data_defaults_optional_fields() {
        let data: ExtractedData = serde_json::from_str(
            r#"{"id":"s1","source_type":"chat","content":"hello there"}"#,
        )
        .unwrap();
        assert!(data.timestamp.is_none());
        assert!(data.metadata.is_empty());
        assert_eq!(data.word_count(), 2);
    }

    #[test]
    fn clamping_holds_at_boundaries() {
        assert_eq!(clamp_score(120.4), 100);
        assert_eq!(clamp_score(-3.0), 0);
        assert_eq!(clamp_score(49.5), 50);
        assert_eq!(clamp01(1.7), 1.0);
        assert_eq!(clamp01(-0.2), 0.0);
    }
}
