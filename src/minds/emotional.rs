//! Emotional-profile analyzer
//!
//! Valence is the share of positive words among all emotion words;
//! expressiveness is emotion-word density per source. Reads the
//! personality stage's extraversion signal to annotate expressiveness.

use crate::error::MindError;
use crate::mind::{Mind, MindContext, MindState};
use crate::minds::{evidence_from_hits, hit_confidence, prioritized_sources, scan_sources};
use crate::types::{
    clamp01, MindId, MindPersona, MindResult, PersonalityTrait, TraitCategory, TraitValue,
};
use async_trait::async_trait;

const POSITIVE_WORDS: &[&str] = &[
    "happy", "excited", "grateful", "proud", "love", "joy", "calm", "hopeful",
];
const NEGATIVE_WORDS: &[&str] = &[
    "sad", "angry", "anxious", "worried", "frustrated", "afraid", "stressed", "lonely",
];

pub struct EmotionalProfileMind {
    state: MindState,
}

impl EmotionalProfileMind {
    pub fn new() -> Self {
        Self {
            state: MindState::default(),
        }
    }
}

impl Default for EmotionalProfileMind {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mind for EmotionalProfileMind {
    fn id(&self) -> MindId {
        MindId::EmotionalProfile
    }

    fn persona(&self) -> MindPersona {
        MindPersona {
            id: MindId::EmotionalProfile,
            name: "The Empath".to_string(),
            expertise: vec!["affect".to_string(), "emotional tone".to_string()],
            tone: "warm".to_string(),
            version: "1.0.0".to_string(),
        }
    }

    fn state(&self) -> &MindState {
        &self.state
    }

    fn dependencies(&self) -> Vec<MindId> {
        vec![MindId::SourceQuality, MindId::Personality]
    }

    fn expected_categories(&self) -> Vec<TraitCategory> {
        vec![TraitCategory::Emotional]
    }

    async fn analyze(&self, context: &MindContext) -> Result<MindResult, MindError> {
        self.check_preconditions(context)?;

        let sources = prioritized_sources(context);
        let positive = scan_sources(&sources, POSITIVE_WORDS);
        let negative = scan_sources(&sources, NEGATIVE_WORDS);
        let total = positive.len() + negative.len();

        let mut traits = Vec::new();
        let mut evidence = Vec::new();

        if total > 0 {
            let valence = positive.len() as f64 / total as f64;
            let confidence = hit_confidence(total);

            evidence.extend(evidence_from_hits(&positive, confidence, 2));
            evidence.extend(evidence_from_hits(&negative, confidence, 2));

            let mut valence_sources: Vec<String> = Vec::new();
            for hit in positive.iter().chain(negative.iter()) {
                if !valence_sources.contains(&hit.source_id) {
                    valence_sources.push(hit.source_id.clone());
                }
            }

            traits.push(PersonalityTrait {
                category: TraitCategory::Emotional,
                name: "emotional-valence".to_string(),
                value: TraitValue::Number(valence),
                confidence,
                sources: valence_sources.clone(),
                notes: None,
            });

            let density = total as f64 / sources.len().max(1) as f64;
            let extraversion_note = context
                .result_for(MindId::Personality)
                .and_then(|r| r.traits.iter().find(|t| t.name == "extraversion"))
                .map(|t| format!("extraversion signal at {:.2} confidence", t.confidence));

            traits.push(PersonalityTrait {
                category: TraitCategory::Emotional,
                name: "expressiveness".to_string(),
                value: TraitValue::Number(clamp01(density / 4.0)),
                confidence,
                sources: valence_sources,
                notes: extraversion_note,
            });
        }

        let confidence = if total == 0 { 0.3 } else { hit_confidence(total) };

        let mut result = MindResult::new(self.id());
        result.traits = traits;
        result.confidence = confidence;
        result.evidence = evidence;
        if total == 0 {
            result
                .recommendations
                .push("No emotional language found; profile may be guarded".to_string());
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::NoopGenerator;
    use crate::types::{ExtractedData, PipelineOptions, SourceType};
    use std::collections::HashMap;
    use std::sync::Arc;

    fn ctx_with_deps(content: &str) -> MindContext {
        let data = vec![ExtractedData {
            id: "s1".to_string(),
            source_type: SourceType::Chat,
            content: content.to_string(),
            timestamp: None,
            metadata: HashMap::new(),
        }];
        let mut ctx =
            MindContext::new(data, PipelineOptions::default(), Arc::new(NoopGenerator));
        ctx.previous_results.insert(
            MindId::SourceQuality,
            Arc::new(MindResult::new(MindId::SourceQuality)),
        );
        ctx.previous_results.insert(
            MindId::Personality,
            Arc::new(MindResult::new(MindId::Personality)),
        );
        ctx
    }

    #[tokio::test]
    async fn valence_is_the_positive_share() {
        let ctx = ctx_with_deps("I was happy and excited, though a bit worried at the end.");
        let result = EmotionalProfileMind::new().analyze(&ctx).await.unwrap();
        let valence = result
            .traits
            .iter()
            .find(|t| t.name == "emotional-valence")
            .expect("valence trait");
        assert_eq!(valence.value, TraitValue::Number(2.0 / 3.0));
    }

    #[tokio::test]
    async fn requires_both_dependencies() {
        let mut ctx = ctx_with_deps("happy");
        ctx.previous_results.remove(&MindId::Personality);
        let err = EmotionalProfileMind::new().analyze(&ctx).await.unwrap_err();
        match err {
            MindError::Precondition { reason, .. } => assert!(reason.contains("personality")),
            other => panic!("expected precondition, got {other:?}"),
        }
    }
}
