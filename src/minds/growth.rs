//! Growth-orientation analyzer

use crate::error::MindError;
use crate::mind::{Mind, MindContext, MindState};
use crate::minds::{
    evidence_from_hits, hit_confidence, prioritized_sources, scan_sources, sources_from_hits,
};
use crate::types::{
    MindId, MindPersona, MindResult, PersonalityTrait, TraitCategory, TraitValue,
};
use async_trait::async_trait;

const GROWTH_SIGNALS: &[&str] = &[
    "i learned",
    "i improved",
    "i changed",
    "i overcame",
    "working on myself",
    "getting better at",
    "new skill",
];

const STAGNATION_SIGNALS: &[&str] = &[
    "stuck in a rut",
    "always been this way",
    "never change",
    "given up on",
];

pub struct GrowthMind {
    state: MindState,
}

impl GrowthMind {
    pub fn new() -> Self {
        Self {
            state: MindState::default(),
        }
    }
}

impl Default for GrowthMind {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mind for GrowthMind {
    fn id(&self) -> MindId {
        MindId::Growth
    }

    fn persona(&self) -> MindPersona {
        MindPersona {
            id: MindId::Growth,
            name: "The Mentor".to_string(),
            expertise: vec!["personal development".to_string(), "learning".to_string()],
            tone: "encouraging".to_string(),
            version: "1.0.0".to_string(),
        }
    }

    fn state(&self) -> &MindState {
        &self.state
    }

    fn dependencies(&self) -> Vec<MindId> {
        vec![MindId::SourceQuality, MindId::Values]
    }

    fn expected_categories(&self) -> Vec<TraitCategory> {
        vec![TraitCategory::Growth]
    }

    async fn analyze(&self, context: &MindContext) -> Result<MindResult, MindError> {
        self.check_preconditions(context)?;

        let sources = prioritized_sources(context);
        let growth = scan_sources(&sources, GROWTH_SIGNALS);
        let stagnation = scan_sources(&sources, STAGNATION_SIGNALS);
        let total = growth.len() + stagnation.len();

        let mut traits = Vec::new();
        let mut evidence = Vec::new();

        if total > 0 {
            let orientation = growth.len() as f64 / (total as f64 + 1.0);
            let confidence = hit_confidence(total);

            // a stated achievement value strengthens the reading
            let value_note = context
                .result_for(MindId::Values)
                .and_then(|r| r.traits.iter().find(|t| t.name == "achievement"))
                .map(|t| format!("aligned with achievement value ({:.2})", t.confidence));

            evidence.extend(evidence_from_hits(&growth, confidence, 3));
            evidence.extend(evidence_from_hits(&stagnation, confidence, 1));
            traits.push(PersonalityTrait {
                category: TraitCategory::Growth,
                name: "growth-orientation".to_string(),
                value: TraitValue::Number(orientation),
                confidence,
                sources: sources_from_hits(&growth),
                notes: value_note,
            });
        }

        let mut result = MindResult::new(self.id());
        result.confidence = if total == 0 { 0.3 } else { hit_confidence(total) };
        result.traits = traits;
        result.evidence = evidence;
        if !stagnation.is_empty() {
            result.recommendations.push(
                "Stagnation language present; probe for areas felt as fixed".to_string(),
            );
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

    #[tokio::test]
    async fn growth_signals_produce_an_orientation_trait() {
        let data = vec![ExtractedData {
            id: "s1".to_string(),
            source_type: SourceType::Document,
            content: "Last year I learned woodworking and I improved a lot.".to_string(),
            timestamp: None,
            metadata: HashMap::new(),
        }];
        let mut ctx =
            MindContext::new(data, PipelineOptions::default(), Arc::new(NoopGenerator));
        ctx.previous_results.insert(
            MindId::SourceQuality,
            Arc::new(MindResult::new(MindId::SourceQuality)),
        );
        ctx.previous_results
            .insert(MindId::Values, Arc::new(MindResult::new(MindId::Values)));

        let result = GrowthMind::new().analyze(&ctx).await.unwrap();
        let orientation = result
            .traits
            .iter()
            .find(|t| t.name == "growth-orientation")
            .expect("orientation trait");
        assert_eq!(orientation.value, TraitValue::Number(2.0 / 3.0));
    }
}
