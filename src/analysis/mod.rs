//! First-stage source analysis
//!
//! Turns raw extracted sources into per-source quality scores,
//! duplicate groups, a coverage picture, and a prioritized source
//! ordering. Everything here is deterministic and recomputed each run.

pub mod coverage;
pub mod duplicates;
pub mod quality;

use crate::types::{
    CoverageResult, DuplicateGroup, ExtractedData, PipelineOptions, SourceQuality,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Metadata key under which the first-stage Mind publishes its full
/// analysis for downstream stages.
pub const SOURCE_ANALYSIS_KEY: &str = "source_analysis";

/// The first-stage Mind's complete artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceAnalysis {
    pub qualities: Vec<SourceQuality>,
    pub duplicates: Vec<DuplicateGroup>,
    pub coverage: CoverageResult,
    /// Source ids worth analyzing downstream, best first
    pub prioritized_sources: Vec<String>,
}

impl SourceAnalysis {
    pub fn quality_for(&self, source_id: &str) -> Option<&SourceQuality> {
        self.qualities.iter().find(|q| q.source_id == source_id)
    }

    pub fn average_quality(&self) -> f64 {
        if self.qualities.is_empty() {
            return 0.0;
        }
        let total: u32 = self.qualities.iter().map(|q| q.score as u32).sum();
        total as f64 / self.qualities.len() as f64
    }
}

/// Run the full first-stage analysis over the source set.
pub fn analyze_sources(
    sources: &[ExtractedData],
    options: &PipelineOptions,
    now: DateTime<Utc>,
) -> SourceAnalysis {
    let qualities: Vec<SourceQuality> =
        sources.iter().map(|s| quality::score_source(s, now)).collect();
    let duplicates =
        duplicates::find_duplicate_groups(sources, &qualities, options.duplicate_threshold);
    let coverage = coverage::analyze_coverage(sources, &qualities);
    let prioritized_sources = prioritize(sources, &qualities, &duplicates, options);

    SourceAnalysis {
        qualities,
        duplicates,
        coverage,
        prioritized_sources,
    }
}

/// Exclude non-primary duplicate members and (unless configured
/// otherwise) sources below the quality floor, then order the rest by
/// descending quality. Equal scores keep original input order.
fn prioritize(
    sources: &[ExtractedData],
    qualities: &[SourceQuality],
    duplicates: &[DuplicateGroup],
    options: &PipelineOptions,
) -> Vec<String> {
    let redundant: HashSet<&str> = duplicates
        .iter()
        .flat_map(|g| {
            g.source_ids
                .iter()
                .filter(|id| **id != g.primary_source_id)
                .map(String::as_str)
        })
        .collect();

    let mut ranked: Vec<(&str, u8)> = sources
        .iter()
        .zip(qualities)
        .filter(|(source, quality)| {
            !redundant.contains(source.id.as_str())
                && (options.include_low_quality || quality.score >= options.min_quality_score)
        })
        .map(|(source, quality)| (source.id.as_str(), quality.score))
        .collect();

    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().map(|(id, _)| id.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceType;
    use std::collections::HashMap;

    fn source(id: &str, source_type: SourceType, content: &str) -> ExtractedData {
        ExtractedData {
            id: id.to_string(),
            source_type,
            content: content.to_string(),
            timestamp: None,
            metadata: HashMap::new(),
        }
    }

    #[test]
    fn duplicates_lose_their_secondary_members() {
        let sources = vec![
            source("a", SourceType::Chat, "same little message as the other one"),
            source("b", SourceType::Chat, "same little message as the other one"),
            source("c", SourceType::Document, &"i think my career matters to me ".repeat(40)),
        ];
        let analysis = analyze_sources(&sources, &PipelineOptions::default(), Utc::now());

        assert_eq!(analysis.duplicates.len(), 1);
        assert!(analysis.prioritized_sources.contains(&"a".to_string()));
        assert!(!analysis.prioritized_sources.contains(&"b".to_string()));
    }

    #[test]
    fn prioritization_orders_by_descending_quality() {
        let sources = vec![
            source("thin", SourceType::Chat, "ok"),
            source("rich", SourceType::Document, &"i think my career matters to me ".repeat(40)),
        ];
        let options = PipelineOptions {
            include_low_quality: true,
            ..PipelineOptions::default()
        };
        let analysis = analyze_sources(&sources, &options, Utc::now());
        assert_eq!(analysis.prioritized_sources[0], "rich");
    }

    #[test]
    fn quality_floor_drops_weak_sources_unless_included() {
        let mut stale = source("weak", SourceType::Other, "");
        stale.timestamp = Some(Utc::now() - chrono::Duration::days(1000));
        let sources = vec![
            stale,
            source("strong", SourceType::Document, &"i think my career matters to me ".repeat(40)),
        ];

        let strict = analyze_sources(&sources, &PipelineOptions::default(), Utc::now());
        assert_eq!(strict.prioritized_sources, vec!["strong".to_string()]);

        let lenient = analyze_sources(
            &sources,
            &PipelineOptions {
                include_low_quality: true,
                ..PipelineOptions::default()
            },
            Utc::now(),
        );
        assert_eq!(lenient.prioritized_sources.len(), 2);
    }

    #[test]
    fn triage_scenario_with_duplicates_and_gaps() {
        let essay = "I think my career matters to me and I value honest work. ".repeat(20);
        let sources = vec![
            source("chat-1", SourceType::Chat, "quick note about my job today"),
            source("chat-2", SourceType::Chat, "quick note about my job today"),
            source("essay", SourceType::Document, &essay),
        ];
        let analysis = analyze_sources(&sources, &PipelineOptions::default(), Utc::now());

        // the identical chats form one exact group; the essay is untouched
        assert_eq!(analysis.duplicates.len(), 1);
        let group = &analysis.duplicates[0];
        assert_eq!(group.kind, crate::types::DuplicateKind::Exact);
        assert_eq!(group.source_ids, vec!["chat-1".to_string(), "chat-2".to_string()]);

        // the substantive document outranks the surviving chat
        assert_eq!(analysis.prioritized_sources[0], "essay");

        // career is covered by all three; untouched essential topics are
        // critical gaps
        assert!(!analysis.coverage.gaps.iter().any(|g| g.topic == "career"));
        assert!(analysis.coverage.gaps.iter().any(|g| {
            g.topic == "relationships" && g.severity == crate::types::GapSeverity::Critical
        }));
    }

    #[test]
    fn analysis_round_trips_through_json() {
        let sources = vec![source("a", SourceType::Chat, "i feel good about my career")];
        let analysis = analyze_sources(&sources, &PipelineOptions::default(), Utc::now());
        let value = serde_json::to_value(&analysis).unwrap();
        let back: SourceAnalysis = serde_json::from_value(value).unwrap();
        assert_eq!(back.qualities.len(), 1);
        assert_eq!(back.prioritized_sources, analysis.prioritized_sources);
    }
}
