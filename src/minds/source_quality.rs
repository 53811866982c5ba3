//! First-stage Mind: source quality, duplicates, coverage
//!
//! Dependency-free. Publishes the full `SourceAnalysis` in its result
//! metadata so every later stage can read the prioritized ordering and
//! per-source quality without recomputing anything.

use crate::analysis::{self, SOURCE_ANALYSIS_KEY};
use crate::error::MindError;
use crate::mind::{Mind, MindContext, MindState};
use crate::minds::truncate;
use crate::types::{
    clamp01, Evidence, GapSeverity, MindId, MindPersona, MindResult, PersonalityTrait,
    TraitCategory, TraitValue,
};
use async_trait::async_trait;

pub struct SourceQualityMind {
    state: MindState,
}

impl SourceQualityMind {
    pub fn new() -> Self {
        Self {
            state: MindState::default(),
        }
    }
}

impl Default for SourceQualityMind {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mind for SourceQualityMind {
    fn id(&self) -> MindId {
        MindId::SourceQuality
    }

    fn persona(&self) -> MindPersona {
        MindPersona {
            id: MindId::SourceQuality,
            name: "The Curator".to_string(),
            expertise: vec![
                "source triage".to_string(),
                "duplicate detection".to_string(),
                "coverage analysis".to_string(),
            ],
            tone: "meticulous".to_string(),
            version: "1.0.0".to_string(),
        }
    }

    fn state(&self) -> &MindState {
        &self.state
    }

    fn expected_categories(&self) -> Vec<TraitCategory> {
        vec![TraitCategory::Quality, TraitCategory::Coverage]
    }

    /// The gatekeeper stage is held to a stricter bar than the rest.
    fn validity_threshold(&self) -> u8 {
        60
    }

    async fn analyze(&self, context: &MindContext) -> Result<MindResult, MindError> {
        self.check_preconditions(context)?;

        let analysis =
            analysis::analyze_sources(&context.extracted_data, &context.options, context.now);

        let all_ids: Vec<String> = analysis
            .qualities
            .iter()
            .map(|q| q.source_id.clone())
            .collect();
        let average = analysis.average_quality();
        let substantive = analysis
            .qualities
            .iter()
            .filter(|q| q.depth.is_substantive)
            .count();
        let coverage = &analysis.coverage;

        let traits = vec![
            PersonalityTrait {
                category: TraitCategory::Quality,
                name: "average-source-quality".to_string(),
                value: TraitValue::Number(average),
                confidence: clamp01(average / 100.0),
                sources: all_ids.clone(),
                notes: None,
            },
            PersonalityTrait {
                category: TraitCategory::Quality,
                name: "substantive-sources".to_string(),
                value: TraitValue::Number(substantive as f64),
                confidence: 0.9,
                sources: all_ids.clone(),
                notes: None,
            },
            PersonalityTrait {
                category: TraitCategory::Quality,
                name: "duplicate-groups".to_string(),
                value: TraitValue::Number(analysis.duplicates.len() as f64),
                confidence: 0.9,
                sources: analysis
                    .duplicates
                    .iter()
                    .flat_map(|g| g.source_ids.clone())
                    .collect(),
                notes: None,
            },
            PersonalityTrait {
                category: TraitCategory::Coverage,
                name: "coverage-score".to_string(),
                value: TraitValue::Number(coverage.overall_score as f64),
                confidence: clamp01(coverage.overall_score as f64 / 100.0),
                sources: all_ids.clone(),
                notes: None,
            },
            PersonalityTrait {
                category: TraitCategory::Coverage,
                name: "format-variety".to_string(),
                value: TraitValue::Bool(coverage.format_diversity.has_variety),
                confidence: 0.9,
                sources: all_ids.clone(),
                notes: None,
            },
        ];

        // best sources stand in as evidence for the triage itself
        let evidence: Vec<Evidence> = analysis
            .prioritized_sources
            .iter()
            .take(3)
            .filter_map(|id| {
                let source = context.extracted_data.iter().find(|d| &d.id == id)?;
                let quality = analysis.quality_for(id)?;
                Some(Evidence {
                    source: id.clone(),
                    excerpt: truncate(&source.content, 120),
                    relevance: clamp01(quality.score as f64 / 100.0),
                    kind: Some("prioritized-source".to_string()),
                })
            })
            .collect();

        let mut recommendations = Vec::new();
        for gap in &coverage.gaps {
            match gap.severity {
                GapSeverity::Critical => recommendations.push(format!(
                    "Collect sources covering '{}' - nothing touches it yet",
                    gap.topic
                )),
                GapSeverity::Moderate => recommendations.push(format!(
                    "Add a second source for '{}' to corroborate it",
                    gap.topic
                )),
            }
        }
        if !analysis.duplicates.is_empty() {
            let redundant: usize = analysis
                .duplicates
                .iter()
                .map(|g| g.source_ids.len() - 1)
                .sum();
            recommendations.push(format!(
                "Drop {redundant} redundant source(s) across {} duplicate group(s)",
                analysis.duplicates.len()
            ));
        }
        if !coverage.format_diversity.has_variety {
            recommendations
                .push("Source formats are narrow; add another medium for balance".to_string());
        }

        if context.options.use_generator {
            let prompt = format!(
                "In two sentences, characterize a source set with average quality {:.0}/100, \
                 {} duplicate group(s), and coverage score {}/100.",
                average,
                analysis.duplicates.len(),
                coverage.overall_score
            );
            let narrative = context.generate(self.id(), &prompt).await?;
            if !narrative.is_empty() {
                recommendations.push(narrative);
            }
        }

        let confidence = clamp01((average / 100.0 + coverage.overall_score as f64 / 100.0) / 2.0);

        let mut result = MindResult::new(self.id());
        result.traits = traits;
        result.confidence = confidence;
        result.evidence = evidence;
        result.recommendations = recommendations;
        result.metadata.insert(
            SOURCE_ANALYSIS_KEY.to_string(),
            serde_json::to_value(&analysis).map_err(|e| MindError::Internal {
                mind: self.id(),
                message: e.to_string(),
            })?,
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::SourceAnalysis;
    use crate::generator::NoopGenerator;
    use crate::types::{ExtractedData, PipelineOptions, SourceType};
    use std::collections::HashMap;
    use std::sync::Arc;

    fn source(id: &str, source_type: SourceType, content: &str) -> ExtractedData {
        ExtractedData {
            id: id.to_string(),
            source_type,
            content: content.to_string(),
            timestamp: None,
            metadata: HashMap::new(),
        }
    }

    fn context(data: Vec<ExtractedData>) -> MindContext {
        MindContext::new(data, PipelineOptions::default(), Arc::new(NoopGenerator))
    }

    #[tokio::test]
    async fn publishes_source_analysis_for_downstream_stages() {
        let mind = SourceQualityMind::new();
        let ctx = context(vec![
            source("a", SourceType::Chat, "same exact message right here"),
            source("b", SourceType::Chat, "same exact message right here"),
            source(
                "c",
                SourceType::Document,
                &"i think my career matters to me and i value honest work ".repeat(30),
            ),
        ]);

        let result = mind.analyze(&ctx).await.unwrap();
        let analysis: SourceAnalysis =
            serde_json::from_value(result.metadata[SOURCE_ANALYSIS_KEY].clone()).unwrap();

        assert_eq!(analysis.duplicates.len(), 1);
        assert_eq!(analysis.prioritized_sources[0], "c");
        assert!(result.trait_in(TraitCategory::Quality).is_some());
        assert!(result.trait_in(TraitCategory::Coverage).is_some());
        assert!(result.confidence > 0.0 && result.confidence <= 1.0);
        assert!(!result.evidence.is_empty());
    }

    #[tokio::test]
    async fn empty_input_is_a_precondition_violation() {
        let mind = SourceQualityMind::new();
        let ctx = context(vec![]);
        assert!(!mind.can_handle(&ctx));
        let err = mind.analyze(&ctx).await.unwrap_err();
        assert!(matches!(err, MindError::Precondition { .. }));
    }

    #[tokio::test]
    async fn gaps_turn_into_recommendations() {
        let mind = SourceQualityMind::new();
        let ctx = context(vec![source("a", SourceType::Chat, "my job is fine")]);
        let result = mind.analyze(&ctx).await.unwrap();
        assert!(result
            .recommendations
            .iter()
            .any(|r| r.contains("values") || r.contains("relationships")));
    }
}
