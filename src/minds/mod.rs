//! The eight analyzer Minds
//!
//! One variant per analytical dimension. The first stage
//! (`source-quality`) is dependency-free and publishes the source
//! analysis every later stage builds on; the rest are keyword-heuristic
//! analyzers over the prioritized sources plus prior results.

pub mod communication;
pub mod emotional;
pub mod feasibility;
pub mod growth;
pub mod interests;
pub mod personality;
pub mod source_quality;
pub mod values;

use crate::analysis::{SourceAnalysis, SOURCE_ANALYSIS_KEY};
use crate::mind::{Mind, MindContext};
use crate::types::{Evidence, ExtractedData, MindId};
use std::sync::Arc;

/// All eight built-in analyzers, in canonical order.
pub fn default_minds() -> Vec<Arc<dyn Mind>> {
    vec![
        Arc::new(source_quality::SourceQualityMind::new()),
        Arc::new(personality::PersonalityMind::new()),
        Arc::new(values::ValuesMind::new()),
        Arc::new(interests::InterestsMind::new()),
        Arc::new(emotional::EmotionalProfileMind::new()),
        Arc::new(communication::CommunicationMind::new()),
        Arc::new(growth::GrowthMind::new()),
        Arc::new(feasibility::FeasibilityMind::new()),
    ]
}

/// Confidence derived from keyword hit density.
pub(crate) fn hit_confidence(hits: usize) -> f64 {
    if hits == 0 {
        return 0.0;
    }
    (0.3 + 0.15 * hits as f64).min(0.95)
}

/// Recover the first stage's published analysis from the context.
pub(crate) fn source_analysis(context: &MindContext) -> Option<SourceAnalysis> {
    let result = context.result_for(MindId::SourceQuality)?;
    let value = result.metadata.get(SOURCE_ANALYSIS_KEY)?;
    serde_json::from_value(value.clone()).ok()
}

/// Sources worth scanning, best first: the prioritized ordering from
/// the first stage when available, otherwise everything.
pub(crate) fn prioritized_sources<'a>(context: &'a MindContext) -> Vec<&'a ExtractedData> {
    if let Some(analysis) = source_analysis(context) {
        let picked: Vec<&ExtractedData> = analysis
            .prioritized_sources
            .iter()
            .filter_map(|id| context.extracted_data.iter().find(|d| &d.id == id))
            .collect();
        if !picked.is_empty() {
            return picked;
        }
    }
    context.extracted_data.iter().collect()
}

/// One keyword match inside one source.
pub(crate) struct ScanHit {
    pub keyword: &'static str,
    pub source_id: String,
    pub excerpt: String,
}

/// Scan sources for any of the keywords; at most one hit per
/// keyword-source pair.
pub(crate) fn scan_sources(sources: &[&ExtractedData], keywords: &[&'static str]) -> Vec<ScanHit> {
    let mut hits = Vec::new();
    for source in sources {
        let content = source.content.to_lowercase();
        for keyword in keywords {
            if content.contains(keyword) {
                hits.push(ScanHit {
                    keyword,
                    source_id: source.id.clone(),
                    excerpt: excerpt_around(&source.content, keyword),
                });
            }
        }
    }
    hits
}

/// A short window of the original text around the first match,
/// trimmed on char boundaries.
pub(crate) fn excerpt_around(content: &str, keyword: &str) -> String {
    const WINDOW: usize = 60;

    // lowercasing can shift byte offsets for non-ASCII text, so only
    // trust positions that land on a boundary in the original
    let lower = content.to_lowercase();
    let position = match lower.find(keyword) {
        Some(p) if content.is_char_boundary(p) && p < content.len() => p,
        _ => return truncate(content, WINDOW * 2),
    };

    let start = content[..position]
        .char_indices()
        .rev()
        .take(WINDOW)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(position);
    let excerpt: String = content[start..].chars().take(WINDOW * 2).collect();
    excerpt.trim().to_string()
}

pub(crate) fn truncate(content: &str, max_chars: usize) -> String {
    content.chars().take(max_chars).collect::<String>().trim().to_string()
}

/// Evidence entries for the first few hits.
pub(crate) fn evidence_from_hits(hits: &[ScanHit], relevance: f64, limit: usize) -> Vec<Evidence> {
    hits.iter()
        .take(limit)
        .map(|hit| Evidence {
            source: hit.source_id.clone(),
            excerpt: hit.excerpt.clone(),
            relevance,
            kind: Some(format!("keyword:{}", hit.keyword)),
        })
        .collect()
}

/// Distinct source ids across hits, in first-hit order.
pub(crate) fn sources_from_hits(hits: &[ScanHit]) -> Vec<String> {
    let mut sources = Vec::new();
    for hit in hits {
        if !sources.contains(&hit.source_id) {
            sources.push(hit.source_id.clone());
        }
    }
    sources
}
