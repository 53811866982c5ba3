//! Per-source quality scoring
//!
//! Quality is a weighted average of four sub-scores, each in [0,100]:
//! credibility 0.30, recency 0.20, depth 0.25, relevance 0.25. The
//! final score is rounded to the nearest integer and clamped.

use crate::types::{
    clamp_score, CredibilityScore, DepthScore, ExtractedData, RecencyScore, RelevanceScore,
    SourceQuality, SourceType,
};
use chrono::{DateTime, Utc};

const CREDIBILITY_WEIGHT: f64 = 0.30;
const RECENCY_WEIGHT: f64 = 0.20;
const DEPTH_WEIGHT: f64 = 0.25;
const RELEVANCE_WEIGHT: f64 = 0.25;

/// Word count at or above which a source counts as substantive.
const SUBSTANTIVE_WORDS: usize = 200;

/// First-person indicator categories with their relevance bonus.
/// Each category is counted at most once per source. The specific
/// keyword lists are heuristics, not contract.
const INDICATOR_CATEGORIES: &[(&str, u32, &[&str])] = &[
    ("opinions", 10, &["i think", "i believe", "in my opinion", "personally i"]),
    ("emotions", 10, &["i feel", "i love", "i hate", "makes me"]),
    ("goals", 10, &["i want", "my goal", "i plan", "i hope to"]),
    ("values", 10, &["important to me", "i value", "i care about", "matters to me"]),
    ("behaviors", 8, &["i always", "i usually", "i tend to", "every morning"]),
    ("growth", 8, &["i learned", "i realized", "i changed", "i improved"]),
    ("experiences", 8, &["i remember", "when i was", "i experienced", "back then"]),
];

/// Score a single source against the four quality dimensions.
pub fn score_source(source: &ExtractedData, now: DateTime<Utc>) -> SourceQuality {
    let credibility = credibility_score(source);
    let recency = recency_score(source, now);
    let depth = depth_score(source);
    let relevance = relevance_score(source);

    let weighted = credibility.score as f64 * CREDIBILITY_WEIGHT
        + recency.score as f64 * RECENCY_WEIGHT
        + depth.score as f64 * DEPTH_WEIGHT
        + relevance.score as f64 * RELEVANCE_WEIGHT;

    SourceQuality {
        source_id: source.id.clone(),
        score: clamp_score(weighted),
        credibility,
        recency,
        depth,
        relevance,
    }
}

fn credibility_score(source: &ExtractedData) -> CredibilityScore {
    let mut score: i32 = 50;
    let mut factors = Vec::new();

    match source.source_type {
        SourceType::Document => {
            score += 15;
            factors.push("document source".to_string());
        }
        SourceType::Chat => {
            score += 5;
            factors.push("conversational source".to_string());
        }
        SourceType::Video | SourceType::Audio => {
            score += 10;
            factors.push("recorded media source".to_string());
        }
        SourceType::Social | SourceType::Other => {}
    }

    if source.word_count() > 500 {
        score += 10;
        factors.push("long-form content".to_string());
    }

    if !source.metadata.is_empty() {
        score += 5;
        factors.push("metadata present".to_string());
    }

    CredibilityScore {
        score: score.clamp(0, 100) as u8,
        factors,
    }
}

fn recency_score(source: &ExtractedData, now: DateTime<Utc>) -> RecencyScore {
    match source.timestamp {
        Some(ts) => {
            let age_in_days = (now - ts).num_days();
            let score = match age_in_days {
                d if d < 30 => 100,
                d if d < 90 => 85,
                d if d < 180 => 70,
                d if d < 365 => 50,
                d if d < 730 => 30,
                _ => 15,
            };
            RecencyScore {
                score,
                age_in_days: Some(age_in_days),
            }
        }
        None => RecencyScore {
            score: 50,
            age_in_days: None,
        },
    }
}

fn depth_score(source: &ExtractedData) -> DepthScore {
    let word_count = source.word_count();
    let score = match word_count {
        w if w >= 1000 => 100,
        w if w >= 500 => 80,
        w if w >= 200 => 60,
        w if w >= 100 => 40,
        w if w >= 50 => 20,
        _ => 10,
    };
    DepthScore {
        score,
        word_count,
        is_substantive: word_count >= SUBSTANTIVE_WORDS,
    }
}

fn relevance_score(source: &ExtractedData) -> RelevanceScore {
    let content = source.content.to_lowercase();
    let mut score: u32 = 50;
    let mut topics = Vec::new();

    for (category, bonus, patterns) in INDICATOR_CATEGORIES {
        if patterns.iter().any(|p| content.contains(p)) {
            score += bonus;
            topics.push((*category).to_string());
        }
    }

    RelevanceScore {
        score: score.min(100) as u8,
        topics,
    }
}
