//! Core-values analyzer

use crate::error::MindError;
use crate::mind::{Mind, MindContext, MindState};
use crate::minds::{
    evidence_from_hits, hit_confidence, prioritized_sources, scan_sources, sources_from_hits,
};
use crate::types::{
    MindId, MindPersona, MindResult, PersonalityTrait, TraitCategory, TraitValue,
};
use async_trait::async_trait;

const VALUE_SIGNALS: &[(&str, &[&'static str])] = &[
    ("honesty", &["honest", "truth", "integrity", "sincere"]),
    ("family", &["family", "my kids", "my parents", "loved ones"]),
    ("freedom", &["freedom", "independence", "my own terms", "autonomy"]),
    ("achievement", &["achieve", "accomplish", "success", "ambition"]),
    ("security", &["security", "stability", "safety net", "reliable income"]),
    ("creativity", &["creativity", "self expression", "art", "making things"]),
];

pub struct ValuesMind {
    state: MindState,
}

impl ValuesMind {
    pub fn new() -> Self {
        Self {
            state: MindState::default(),
        }
    }
}

impl Default for ValuesMind {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mind for ValuesMind {
    fn id(&self) -> MindId {
        MindId::Values
    }

    fn persona(&self) -> MindPersona {
        MindPersona {
            id: MindId::Values,
            name: "The Ethicist".to_string(),
            expertise: vec!["value systems".to_string(), "motivation".to_string()],
            tone: "reflective".to_string(),
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
        vec![TraitCategory::Values]
    }

    async fn analyze(&self, context: &MindContext) -> Result<MindResult, MindError> {
        self.check_preconditions(context)?;

        let sources = prioritized_sources(context);
        let mut traits = Vec::new();
        let mut evidence = Vec::new();
        let mut confidences = Vec::new();
        let mut strongest: Option<(&str, usize)> = None;

        for (value, keywords) in VALUE_SIGNALS {
            let hits = scan_sources(&sources, keywords);
            if hits.is_empty() {
                continue;
            }
            let confidence = hit_confidence(hits.len());
            if strongest.map(|(_, n)| hits.len() > n).unwrap_or(true) {
                strongest = Some((value, hits.len()));
            }

            evidence.extend(evidence_from_hits(&hits, confidence, 2));
            confidences.push(confidence);
            traits.push(PersonalityTrait {
                category: TraitCategory::Values,
                name: (*value).to_string(),
                value: TraitValue::Number(
                    (hits.len() as f64 / (hits.len() as f64 + 2.0)).min(1.0),
                ),
                confidence,
                sources: sources_from_hits(&hits),
                notes: None,
            });
        }

        if let Some((value, hits)) = strongest {
            traits.push(PersonalityTrait {
                category: TraitCategory::Values,
                name: "dominant-value".to_string(),
                value: TraitValue::Text(value.to_string()),
                confidence: hit_confidence(hits),
                sources: Vec::new(),
                notes: Some("value with the most supporting mentions".to_string()),
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
