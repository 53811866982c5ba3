//! Personality dimension analyzer
//!
//! Scans the prioritized sources for signals on four broad
//! dimensions. Strength is hit count normalized into [0,1]; the
//! keyword lists are heuristics, not contract.

use crate::error::MindError;
use crate::mind::{Mind, MindContext, MindState};
use crate::minds::{
    evidence_from_hits, hit_confidence, prioritized_sources, scan_sources, sources_from_hits,
};
use crate::types::{
    MindId, MindPersona, MindResult, PersonalityTrait, TraitCategory, TraitValue,
};
use async_trait::async_trait;

const DIMENSIONS: &[(&str, &[&'static str])] = &[
    (
        "openness",
        &["curious", "new ideas", "creative", "explore", "imagine"],
    ),
    (
        "conscientiousness",
        &["organized", "discipline", "on time", "careful plan", "checklist"],
    ),
    (
        "extraversion",
        &["outgoing", "party", "meeting people", "energized by people", "social"],
    ),
    (
        "agreeableness",
        &["kind", "help others", "compromise", "empathize", "considerate"],
    ),
];

pub struct PersonalityMind {
    state: MindState,
}

impl PersonalityMind {
    pub fn new() -> Self {
        Self {
            state: MindState::default(),
        }
    }
}

impl Default for PersonalityMind {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mind for PersonalityMind {
    fn id(&self) -> MindId {
        MindId::Personality
    }

    fn persona(&self) -> MindPersona {
        MindPersona {
            id: MindId::Personality,
            name: "The Profiler".to_string(),
            expertise: vec!["trait psychology".to_string(), "behavioral signals".to_string()],
            tone: "measured".to_string(),
            version: "1.0.0".to_string(),
        }
    }

    fn state(&self) -> &MindState {
        &self.state
    }

    fn dependencies(&self) -> Vec<MindId> {
        vec![MindId::SourceQuality]
    }

    fn expected_categories(&self) -> Vec<TraitCategory> {
        vec![TraitCategory::Personality]
    }

    async fn analyze(&self, context: &MindContext) -> Result<MindResult, MindError> {
        self.check_preconditions(context)?;

        let sources = prioritized_sources(context);
        let mut traits = Vec::new();
        let mut evidence = Vec::new();
        let mut confidences = Vec::new();

        for (dimension, keywords) in DIMENSIONS {
            let hits = scan_sources(&sources, keywords);
            if hits.is_empty() {
                continue;
            }
            let confidence = hit_confidence(hits.len());
            let strength = (hits.len() as f64 / (hits.len() as f64 + 2.0)).min(1.0);

            evidence.extend(evidence_from_hits(&hits, confidence, 2));
            confidences.push(confidence);
            traits.push(PersonalityTrait {
                category: TraitCategory::Personality,
                name: (*dimension).to_string(),
                value: TraitValue::Number(strength),
                confidence,
                sources: sources_from_hits(&hits),
                notes: None,
            });
        }

        let confidence = if confidences.is_empty() {
            0.3
        } else {
            confidences.iter().sum::<f64>() / confidences.len() as f64
        };

        let mut recommendations = Vec::new();
        if traits.len() < DIMENSIONS.len() / 2 {
            recommendations.push(
                "Few personality signals found; gather more reflective first-person material"
                    .to_string(),
            );
        }

        let mut result = MindResult::new(self.id());
        result.traits = traits;
        result.confidence = confidence;
        result.evidence = evidence;
        result.recommendations = recommendations;
        Ok(result)
    }
}
