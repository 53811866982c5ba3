//! Feasibility analyzer
//!
//! Derives trade-off preferences, constraints, risks, and a decision
//! style from the prioritized sources, then scores feasibility across
//! five independently floored dimensions. The dimension penalties and
//! recommendation thresholds are fixed; the keyword tables are
//! heuristics, not contract.

use crate::error::MindError;
use crate::mind::{Mind, MindContext, MindState};
use crate::minds::{
    evidence_from_hits, hit_confidence, prioritized_sources, scan_sources, sources_from_hits,
};
use crate::types::{
    clamp01, MindId, MindPersona, MindResult, PersonalityTrait, TraitCategory, TraitValue,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Metadata key under which the full dimension breakdown is published.
pub const FEASIBILITY_KEY: &str = "feasibility";

const DIMENSION_FLOOR: f64 = 20.0;
const STRATEGIC_BASELINE: f64 = 70.0;

const TECHNICAL_PENALTY: f64 = 15.0;
const RESOURCE_PENALTY: f64 = 20.0;
const TIME_PENALTY: f64 = 25.0;
const RISK_PENALTY: f64 = 20.0;

/// Risk score at or above which a high-severity risk also drags the
/// technical dimension down.
const TECHNICAL_RISK_CUTOFF: f64 = 0.6;

/// Competing-factor pairs. Preference leans toward the first factor.
const TRADE_OFFS: &[(&str, &[&'static str], &[&'static str])] = &[
    (
        "speed-over-polish",
        &["quickly", "as soon as possible", "move fast", "ship it", "deadline"],
        &["polish", "thorough", "get it right", "take my time", "well crafted"],
    ),
    (
        "stability-over-novelty",
        &["proven", "reliable", "stable", "safe choice", "stick with"],
        &["cutting edge", "experiment", "try something new", "latest", "novel"],
    ),
    (
        "savings-over-scope",
        &["budget", "save money", "keep costs", "afford", "cheaper"],
        &["more features", "expand", "bigger scope", "extra capability"],
    ),
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum ConstraintKind {
    Resource,
    Time,
    Technical,
}

/// Constraint signal table: kind, whether the constraint is hard, and
/// the phrases that betray it.
const CONSTRAINTS: &[(&str, ConstraintKind, bool, &[&'static str])] = &[
    (
        "limited-budget",
        ConstraintKind::Resource,
        false,
        &["limited budget", "tight budget", "can't afford", "no budget"],
    ),
    (
        "short-staffed",
        ConstraintKind::Resource,
        false,
        &["short staffed", "not enough people", "on my own", "no help"],
    ),
    (
        "hard-deadline",
        ConstraintKind::Time,
        true,
        &["hard deadline", "no later than", "due date", "must be done by"],
    ),
    (
        "limited-hours",
        ConstraintKind::Time,
        false,
        &["only have evenings", "few hours a week", "spare time", "after work"],
    ),
    (
        "legacy-burden",
        ConstraintKind::Technical,
        false,
        &["legacy system", "technical debt", "doesn't scale", "outdated stack"],
    ),
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum RiskSeverity {
    High,
    Medium,
}

const RISKS: &[(&str, RiskSeverity, &[&'static str])] = &[
    (
        "burnout",
        RiskSeverity::High,
        &["burnout", "burned out", "exhausted", "overworked"],
    ),
    (
        "funding-shortfall",
        RiskSeverity::High,
        &["running out of money", "funding dries up", "cash flow", "can't pay"],
    ),
    (
        "external-dependency",
        RiskSeverity::Medium,
        &["blocked by", "waiting on", "out of my hands", "depends on them"],
    ),
    (
        "loss-of-interest",
        RiskSeverity::Medium,
        &["losing interest", "motivation fading", "not sure i care", "might give up"],
    ),
];

const DECISION_STYLES: &[(&str, &[&'static str])] = &[
    (
        "analytical",
        &["pros and cons", "weighed the options", "looked at the data", "compared"],
    ),
    (
        "intuitive",
        &["gut feeling", "instinct", "felt right", "just knew"],
    ),
    (
        "consultative",
        &["asked for advice", "talked it over", "second opinion", "asked around"],
    ),
    (
        "decisive",
        &["made the call", "just decided", "pulled the trigger", "committed on the spot"],
    ),
];

#[derive(Debug, Clone)]
struct TradeOffFinding {
    name: &'static str,
    preference: f64,
    confidence: f64,
    sources: Vec<String>,
}

#[derive(Debug, Clone)]
struct ConstraintFinding {
    name: &'static str,
    kind: ConstraintKind,
    hard: bool,
    confidence: f64,
    sources: Vec<String>,
}

#[derive(Debug, Clone)]
struct RiskFinding {
    name: &'static str,
    severity: RiskSeverity,
    score: f64,
    confidence: f64,
    sources: Vec<String>,
}

/// Per-dimension breakdown published in the result metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeasibilityBreakdown {
    pub technical: f64,
    pub resource: f64,
    pub time: f64,
    pub risk: f64,
    pub strategic: f64,
    pub overall: f64,
    pub recommendation: String,
}

impl FeasibilityBreakdown {
    fn dimensions(&self) -> [f64; 5] {
        [self.technical, self.resource, self.time, self.risk, self.strategic]
    }
}

fn recommendation_for(overall: f64) -> &'static str {
    if overall >= 80.0 {
        "proceed"
    } else if overall >= 60.0 {
        "proceed-with-caution"
    } else if overall >= 40.0 {
        "reconsider"
    } else {
        "not-feasible"
    }
}

fn score_dimensions(constraints: &[ConstraintFinding], risks: &[RiskFinding]) -> FeasibilityBreakdown {
    let high_risks = risks
        .iter()
        .filter(|r| r.severity == RiskSeverity::High)
        .count();
    let severe_technical_risks = risks
        .iter()
        .filter(|r| r.severity == RiskSeverity::High && r.score >= TECHNICAL_RISK_CUTOFF)
        .count();
    let resource_constraints = constraints
        .iter()
        .filter(|c| c.kind == ConstraintKind::Resource)
        .count();
    let hard_time_constraints = constraints
        .iter()
        .filter(|c| c.kind == ConstraintKind::Time && c.hard)
        .count();

    let floor = |value: f64| value.max(DIMENSION_FLOOR);
    let technical = floor(100.0 - TECHNICAL_PENALTY * severe_technical_risks as f64);
    let resource = floor(100.0 - RESOURCE_PENALTY * resource_constraints as f64);
    let time = floor(100.0 - TIME_PENALTY * hard_time_constraints as f64);
    let risk = floor(100.0 - RISK_PENALTY * high_risks as f64);
    let strategic = STRATEGIC_BASELINE;

    let overall = (technical + resource + time + risk + strategic) / 5.0;

    FeasibilityBreakdown {
        technical,
        resource,
        time,
        risk,
        strategic,
        overall,
        recommendation: recommendation_for(overall).to_string(),
    }
}

pub struct FeasibilityMind {
    state: MindState,
}

impl FeasibilityMind {
    pub fn new() -> Self {
        Self {
            state: MindState::default(),
        }
    }
}

impl Default for FeasibilityMind {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mind for FeasibilityMind {
    fn id(&self) -> MindId {
        MindId::Feasibility
    }

    fn persona(&self) -> MindPersona {
        MindPersona {
            id: MindId::Feasibility,
            name: "The Pragmatist".to_string(),
            expertise: vec![
                "trade-off analysis".to_string(),
                "risk assessment".to_string(),
                "feasibility scoring".to_string(),
            ],
            tone: "blunt".to_string(),
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
        vec![TraitCategory::Feasibility]
    }

    async fn analyze(&self, context: &MindContext) -> Result<MindResult, MindError> {
        self.check_preconditions(context)?;

        let sources = prioritized_sources(context);
        let threshold = context.options.confidence_threshold;

        let mut evidence = Vec::new();

        // trade-offs: preference = countA / (countA + countB + 1), the
        // +1 biasing toward the middle under sparse evidence; dropped
        // below the confidence threshold
        let mut trade_offs: Vec<TradeOffFinding> = Vec::new();
        for (name, toward, away) in TRADE_OFFS {
            let toward_hits = scan_sources(&sources, toward);
            let away_hits = scan_sources(&sources, away);
            let total = toward_hits.len() + away_hits.len();
            if total == 0 {
                continue;
            }
            let confidence = hit_confidence(total);
            if confidence < threshold {
                continue;
            }
            let preference = toward_hits.len() as f64 / (total as f64 + 1.0);

            evidence.extend(evidence_from_hits(&toward_hits, confidence, 2));
            evidence.extend(evidence_from_hits(&away_hits, confidence, 1));
            let mut finding_sources = sources_from_hits(&toward_hits);
            for id in sources_from_hits(&away_hits) {
                if !finding_sources.contains(&id) {
                    finding_sources.push(id);
                }
            }
            trade_offs.push(TradeOffFinding {
                name,
                preference,
                confidence,
                sources: finding_sources,
            });
        }

        // constraints and risks are always retained, whatever their
        // confidence: a weakly evidenced constraint is still a constraint
        let mut constraints: Vec<ConstraintFinding> = Vec::new();
        for (name, kind, hard, keywords) in CONSTRAINTS {
            let hits = scan_sources(&sources, keywords);
            if hits.is_empty() {
                continue;
            }
            let confidence = hit_confidence(hits.len());
            evidence.extend(evidence_from_hits(&hits, confidence, 1));
            constraints.push(ConstraintFinding {
                name,
                kind: *kind,
                hard: *hard,
                confidence,
                sources: sources_from_hits(&hits),
            });
        }

        let mut risks: Vec<RiskFinding> = Vec::new();
        for (name, severity, keywords) in RISKS {
            let hits = scan_sources(&sources, keywords);
            if hits.is_empty() {
                continue;
            }
            let confidence = hit_confidence(hits.len());
            let score = clamp01(hits.len() as f64 / (hits.len() as f64 + 1.0));
            evidence.extend(evidence_from_hits(&hits, confidence, 1));
            risks.push(RiskFinding {
                name,
                severity: *severity,
                score,
                confidence,
                sources: sources_from_hits(&hits),
            });
        }

        // decision style: the one with the most supporting mentions wins
        let mut style: Option<(&str, usize)> = None;
        for (name, keywords) in DECISION_STYLES {
            let hits = scan_sources(&sources, keywords);
            if hits.is_empty() {
                continue;
            }
            if style.map(|(_, n)| hits.len() > n).unwrap_or(true) {
                style = Some((name, hits.len()));
            }
        }
        let style = style
            .map(|(name, n)| (name, hit_confidence(n)))
            .filter(|(_, confidence)| *confidence >= threshold);

        let breakdown = score_dimensions(&constraints, &risks);

        // result confidence: mean over the four construct categories,
        // absent ones defaulting to 0.5 so the mean is always defined
        let category_mean = |items: &[f64]| {
            if items.is_empty() {
                0.5
            } else {
                items.iter().sum::<f64>() / items.len() as f64
            }
        };
        let trade_off_conf = category_mean(&trade_offs.iter().map(|t| t.confidence).collect::<Vec<_>>());
        let constraint_conf = category_mean(&constraints.iter().map(|c| c.confidence).collect::<Vec<_>>());
        let risk_conf = category_mean(&risks.iter().map(|r| r.confidence).collect::<Vec<_>>());
        let style_conf = style.map(|(_, c)| c).unwrap_or(0.5);
        let confidence = clamp01((trade_off_conf + constraint_conf + risk_conf + style_conf) / 4.0);

        let mut traits = Vec::new();
        for finding in &trade_offs {
            traits.push(PersonalityTrait {
                category: TraitCategory::TradeOff,
                name: finding.name.to_string(),
                value: TraitValue::Number(finding.preference),
                confidence: finding.confidence,
                sources: finding.sources.clone(),
                notes: None,
            });
        }
        for finding in &constraints {
            traits.push(PersonalityTrait {
                category: TraitCategory::Constraint,
                name: finding.name.to_string(),
                value: TraitValue::Bool(finding.hard),
                confidence: finding.confidence,
                sources: finding.sources.clone(),
                notes: Some(format!("{:?} constraint", finding.kind).to_lowercase()),
            });
        }
        for finding in &risks {
            traits.push(PersonalityTrait {
                category: TraitCategory::Risk,
                name: finding.name.to_string(),
                value: TraitValue::Number(finding.score),
                confidence: finding.confidence,
                sources: finding.sources.clone(),
                notes: Some(format!("{:?} severity", finding.severity).to_lowercase()),
            });
        }
        if let Some((name, style_confidence)) = style {
            traits.push(PersonalityTrait {
                category: TraitCategory::DecisionStyle,
                name: "decision-style".to_string(),
                value: TraitValue::Text(name.to_string()),
                confidence: style_confidence,
                sources: Vec::new(),
                notes: None,
            });
        }
        traits.push(PersonalityTrait {
            category: TraitCategory::Feasibility,
            name: "feasibility-score".to_string(),
            value: TraitValue::Number(breakdown.overall),
            confidence,
            sources: Vec::new(),
            notes: Some(breakdown.recommendation.clone()),
        });

        let mut recommendations = vec![match breakdown.recommendation.as_str() {
            "proceed" => "Feasibility is strong; proceed".to_string(),
            "proceed-with-caution" => {
                "Feasible, with caveats worth resolving first".to_string()
            }
            "reconsider" => "Significant obstacles; reconsider the plan".to_string(),
            _ => "Not feasible as described".to_string(),
        }];
        for risk in risks.iter().filter(|r| r.severity == RiskSeverity::High) {
            recommendations.push(format!("Mitigate the {} risk before committing", risk.name));
        }

        if context.options.use_generator {
            let prompt = format!(
                "In two sentences, explain a feasibility verdict of '{}' given {} constraint(s) \
                 and {} risk(s).",
                breakdown.recommendation,
                constraints.len(),
                risks.len()
            );
            let narrative = context.generate(self.id(), &prompt).await?;
            if !narrative.is_empty() {
                recommendations.push(narrative);
            }
        }

        let mut result = MindResult::new(self.id());
        result.traits = traits;
        result.confidence = confidence;
        result.evidence = evidence;
        result.recommendations = recommendations;
        result.metadata.insert(
            FEASIBILITY_KEY.to_string(),
            serde_json::to_value(&breakdown).map_err(|e| MindError::Internal {
                mind: self.id(),
                message: e.to_string(),
            })?,
        );
        Ok(result)
    }
}
