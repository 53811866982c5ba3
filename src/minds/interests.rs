//! Interests and hobbies analyzer

use crate::error::MindError;
use crate::mind::{Mind, MindContext, MindState};
use crate::minds::{
    evidence_from_hits, hit_confidence, prioritized_sources, scan_sources, sources_from_hits,
};
use crate::types::{
    MindId, MindPersona, MindResult, PersonalityTrait, TraitCategory, TraitValue,
};
use async_trait::async_trait;

const INTEREST_SIGNALS: &[(&str, &[&'static str])] = &[
    ("technology", &["coding", "software", "gadget", "computer"]),
    ("music", &["music", "concert", "playlist", "instrument"]),
    ("sports", &["gym", "running", "football", "training"]),
    ("reading", &["reading", "book", "novel", "library"]),
    ("travel", &["travel", "trip abroad", "backpacking", "visiting"]),
    ("cooking", &["cooking", "recipe", "baking", "kitchen"]),
    ("gaming", &["gaming", "video game", "board game", "playthrough"]),
    ("outdoors", &["hiking", "camping", "fishing", "garden"]),
];

pub struct InterestsMind {
    state: MindState,
}

impl InterestsMind {
    pub fn new() -> Self {
        Self {
            state: MindState::default(),
        }
    }
}

impl Default for InterestsMind {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mind for InterestsMind {
    fn id(&self) -> MindId {
        MindId::Interests
    }

    fn persona(&self) -> MindPersona {
        MindPersona {
            id: MindId::Interests,
            name: "The Enthusiast".to_string(),
            expertise: vec!["hobbies".to_string(), "leisure patterns".to_string()],
            tone: "curious".to_string(),
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
        vec![TraitCategory::Interests]
    }

    async fn analyze(&self, context: &MindContext) -> Result<MindResult, MindError> {
        self.check_preconditions(context)?;

        let sources = prioritized_sources(context);
        let mut traits = Vec::new();
        let mut evidence = Vec::new();
        let mut confidences = Vec::new();

        for (interest, keywords) in INTEREST_SIGNALS {
            let hits = scan_sources(&sources, keywords);
            if hits.is_empty() {
                continue;
            }
            let confidence = hit_confidence(hits.len());
            evidence.extend(evidence_from_hits(&hits, confidence, 1));
            confidences.push(confidence);
            traits.push(PersonalityTrait {
                category: TraitCategory::Interests,
                name: (*interest).to_string(),
                value: TraitValue::Number(
                    (hits.len() as f64 / (hits.len() as f64 + 2.0)).min(1.0),
                ),
                confidence,
                sources: sources_from_hits(&hits),
                notes: None,
            });
        }

        let breadth = traits.len();
        if breadth > 0 {
            traits.push(PersonalityTrait {
                category: TraitCategory::Interests,
                name: "interest-breadth".to_string(),
                value: TraitValue::Number(breadth as f64),
                confidence: 0.8,
                sources: Vec::new(),
                notes: None,
            });
        }

        let confidence = if confidences.is_empty() {
            0.3
        } else {
            confidences.iter().sum::<f64>() / confidences.len() as f64
        };

        let mut result = MindResult::new(self.id());
        result.traits = traits;
        result.confidence = confidence;
        result.evidence = evidence;
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

    #[tokio::test]
    async fn breadth_counts_distinct_interests() {
        let data = vec![ExtractedData {
            id: "s1".to_string(),
            source_type: SourceType::Chat,
            content: "Spent the weekend hiking, then home to a good book and some music."
                .to_string(),
            timestamp: None,
            metadata: HashMap::new(),
        }];
        let mut ctx =
            MindContext::new(data, PipelineOptions::default(), Arc::new(NoopGenerator));
        ctx.previous_results.insert(
            MindId::SourceQuality,
            Arc::new(MindResult::new(MindId::SourceQuality)),
        );

        let result = InterestsMind::new().analyze(&ctx).await.unwrap();
        let breadth = result
            .traits
            .iter()
            .find(|t| t.name == "interest-breadth")
            .expect("breadth trait");
        assert_eq!(breadth.value, TraitValue::Number(3.0));
    }
}
