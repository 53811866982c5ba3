//! Communication-style analyzer
//!
//! Works from surface statistics rather than keyword tables: sentence
//! length, question frequency, and first-person density.

use crate::error::MindError;
use crate::mind::{Mind, MindContext, MindState};
use crate::minds::{prioritized_sources, truncate};
use crate::types::{
    clamp01, Evidence, MindId, MindPersona, MindResult, PersonalityTrait, TraitCategory,
    TraitValue,
};
use async_trait::async_trait;

pub struct CommunicationMind {
    state: MindState,
}

impl CommunicationMind {
    pub fn new() -> Self {
        Self {
            state: MindState::default(),
        }
    }
}

impl Default for CommunicationMind {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mind for CommunicationMind {
    fn id(&self) -> MindId {
        MindId::Communication
    }

    fn persona(&self) -> MindPersona {
        MindPersona {
            id: MindId::Communication,
            name: "The Rhetorician".to_string(),
            expertise: vec!["writing style".to_string(), "discourse".to_string()],
            tone: "precise".to_string(),
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
        vec![TraitCategory::Communication]
    }

    async fn analyze(&self, context: &MindContext) -> Result<MindResult, MindError> {
        self.check_preconditions(context)?;

        let sources = prioritized_sources(context);

        let mut sentence_count = 0usize;
        let mut word_total = 0usize;
        let mut question_count = 0usize;
        let mut first_person = 0usize;

        for source in &sources {
            for sentence in source
                .content
                .split(['.', '!', '?'])
                .map(str::trim)
                .filter(|s| !s.is_empty())
            {
                sentence_count += 1;
                word_total += sentence.split_whitespace().count();
            }
            question_count += source.content.matches('?').count();
            first_person += source
                .content
                .to_lowercase()
                .split_whitespace()
                .filter(|w| matches!(*w, "i" | "me" | "my" | "mine"))
                .count();
        }

        let mut traits = Vec::new();
        let source_ids: Vec<String> = sources.iter().map(|s| s.id.clone()).collect();

        if sentence_count > 0 {
            let avg_sentence_len = word_total as f64 / sentence_count as f64;
            let style = if avg_sentence_len < 9.0 {
                "concise"
            } else if avg_sentence_len < 20.0 {
                "balanced"
            } else {
                "elaborate"
            };
            // confidence scales with how much text backs the estimate
            let confidence = clamp01(0.3 + sentence_count as f64 * 0.05).min(0.9);

            traits.push(PersonalityTrait {
                category: TraitCategory::Communication,
                name: "sentence-style".to_string(),
                value: TraitValue::Text(style.to_string()),
                confidence,
                sources: source_ids.clone(),
                notes: Some(format!("average sentence length {avg_sentence_len:.1} words")),
            });
            traits.push(PersonalityTrait {
                category: TraitCategory::Communication,
                name: "question-frequency".to_string(),
                value: TraitValue::Number(question_count as f64 / sentence_count as f64),
                confidence,
                sources: source_ids.clone(),
                notes: None,
            });
            if word_total > 0 {
                traits.push(PersonalityTrait {
                    category: TraitCategory::Communication,
                    name: "self-reference-density".to_string(),
                    value: TraitValue::Number(first_person as f64 / word_total as f64),
                    confidence,
                    sources: source_ids.clone(),
                    notes: None,
                });
            }
        }

        let evidence: Vec<Evidence> = sources
            .iter()
            .take(2)
            .map(|s| Evidence {
                source: s.id.clone(),
                excerpt: truncate(&s.content, 100),
                relevance: 0.6,
                kind: Some("style-sample".to_string()),
            })
            .collect();

        let confidence = traits.first().map(|t| t.confidence).unwrap_or(0.3);

        let mut result = MindResult::new(self.id());
        result.traits = traits;
        result.confidence = confidence;
        result.evidence = evidence;
        Ok(result)
    }
}
