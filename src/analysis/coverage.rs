//! Topic coverage, gap detection, temporal and format diversity
//!
//! Answers the questions the later stages depend on:
//! - Which life topics do the sources actually cover, and how well?
//! - Which essential topics are missing or thin?
//! - How spread out are the sources in time and format?

use crate::types::{
    clamp_score, CoverageGap, CoverageResult, ExtractedData, FormatDiversity, GapSeverity,
    SourceQuality, SourceType, TemporalDistribution, TopicCoverage,
};
use std::collections::{BTreeMap, HashMap, HashSet};

const TOPIC_WEIGHT: f64 = 0.4;
const TEMPORAL_WEIGHT: f64 = 0.2;
const FORMAT_WEIGHT: f64 = 0.2;
const GAP_WEIGHT: f64 = 0.2;

/// Fixed topic table. A source contributes to a topic once, however
/// many keywords match.
const TOPIC_KEYWORDS: &[(&str, &[&str])] = &[
    ("career", &["career", "job", "work", "profession", "promotion"]),
    ("values", &["values", "principle", "integrity", "belief", "important to me"]),
    ("relationships", &["friend", "family", "partner", "relationship", "marriage"]),
    ("goals", &["goal", "ambition", "aspiration", "dream", "plan to"]),
    ("personality", &["personality", "introvert", "extrovert", "temperament", "character"]),
    ("interests", &["hobby", "interest", "passion", "enjoy", "pastime"]),
    ("emotions", &["feel", "emotion", "happy", "anxious", "stressed"]),
    ("education", &["school", "university", "degree", "studied", "course"]),
    ("health", &["health", "exercise", "sleep", "diet", "wellbeing"]),
    ("finances", &["money", "salary", "budget", "savings", "invest"]),
    ("lifestyle", &["routine", "travel", "home", "daily", "lifestyle"]),
    ("background", &["grew up", "childhood", "hometown", "born in", "raised"]),
];

/// Topics a personality profile cannot do without.
const ESSENTIAL_TOPICS: &[&str] = &["career", "values", "relationships", "goals", "personality"];

/// Analyze topic, temporal, and format coverage across the source set.
pub fn analyze_coverage(sources: &[ExtractedData], qualities: &[SourceQuality]) -> CoverageResult {
    let quality_by_id: HashMap<&str, u8> = qualities
        .iter()
        .map(|q| (q.source_id.as_str(), q.score))
        .collect();

    let topics = topic_coverage(sources, &quality_by_id);
    let gaps = detect_gaps(&topics);
    let temporal = temporal_distribution(sources);
    let format_diversity = format_diversity(sources);

    let topic_score = 100.0 * topics.len() as f64 / TOPIC_KEYWORDS.len() as f64;
    let gap_penalty = if gaps.is_empty() {
        100.0
    } else {
        (100.0 - 15.0 * gaps.len() as f64).max(0.0)
    };

    let overall = topic_score * TOPIC_WEIGHT
        + temporal.spread_score as f64 * TEMPORAL_WEIGHT
        + format_diversity.score as f64 * FORMAT_WEIGHT
        + gap_penalty * GAP_WEIGHT;

    CoverageResult {
        topics,
        gaps,
        temporal,
        format_diversity,
        overall_score: clamp_score(overall),
    }
}

fn topic_coverage(
    sources: &[ExtractedData],
    quality_by_id: &HashMap<&str, u8>,
) -> Vec<TopicCoverage> {
    let mut covered = Vec::new();

    for (topic, keywords) in TOPIC_KEYWORDS {
        let mut source_ids = Vec::new();
        for source in sources {
            let content = source.content.to_lowercase();
            if keywords.iter().any(|k| content.contains(k)) {
                source_ids.push(source.id.clone());
            }
        }
        if source_ids.is_empty() {
            continue;
        }

        let total: u32 = source_ids
            .iter()
            .map(|id| quality_by_id.get(id.as_str()).copied().unwrap_or(0) as u32)
            .sum();
        covered.push(TopicCoverage {
            topic: (*topic).to_string(),
            average_quality: total as f64 / source_ids.len() as f64,
            source_ids,
        });
    }

    covered
}

fn detect_gaps(topics: &[TopicCoverage]) -> Vec<CoverageGap> {
    let present: HashMap<&str, &TopicCoverage> =
        topics.iter().map(|t| (t.topic.as_str(), t)).collect();
    let mut gaps = Vec::new();

    for essential in ESSENTIAL_TOPICS {
        if !present.contains_key(essential) {
            gaps.push(CoverageGap {
                topic: (*essential).to_string(),
                severity: GapSeverity::Critical,
                source_count: 0,
                message: format!("essential topic '{essential}' has no supporting sources"),
            });
        }
    }

    for topic in topics {
        if topic.source_ids.len() < 2 {
            gaps.push(CoverageGap {
                topic: topic.topic.clone(),
                severity: GapSeverity::Moderate,
                source_count: topic.source_ids.len(),
                message: format!(
                    "topic '{}' rests on a single source",
                    topic.topic
                ),
            });
        }
    }

    gaps
}

fn temporal_distribution(sources: &[ExtractedData]) -> TemporalDistribution {
    let mut timestamps: Vec<_> = sources.iter().filter_map(|s| s.timestamp).collect();
    timestamps.sort();

    if timestamps.is_empty() {
        return TemporalDistribution {
            earliest: None,
            latest: None,
            span_days: None,
            months: BTreeMap::new(),
            spread_score: 30,
        };
    }

    let earliest = timestamps[0];
    let latest = timestamps[timestamps.len() - 1];
    let span_days = (latest - earliest).num_days();

    let mut months = BTreeMap::new();
    for ts in &timestamps {
        *months.entry(ts.format("%Y-%m").to_string()).or_insert(0) += 1;
    }

    let spread_score = match span_days {
        d if d > 365 => 100,
        d if d > 180 => 80,
        d if d > 90 => 60,
        d if d > 30 => 50,
        _ => 30,
    };

    TemporalDistribution {
        earliest: Some(earliest),
        latest: Some(latest),
        span_days: Some(span_days),
        months,
        spread_score,
    }
}

fn format_diversity(sources: &[ExtractedData]) -> FormatDiversity {
    let mut seen = HashSet::new();
    let mut types = Vec::new();
    for source in sources {
        if seen.insert(source.source_type) {
            types.push(source.source_type);
        }
    }

    let score = match types.len() {
        n if n >= 5 => 100,
        4 => 80,
        3 => 60,
        2 => 40,
        _ => 20,
    };

    FormatDiversity {
        has_variety: types.len() >= 3,
        score,
        types,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::quality::score_source;
    use chrono::{Duration, Utc};
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

    fn analyze(sources: &[ExtractedData]) -> CoverageResult {
        let now = Utc::now();
        let qualities: Vec<_> = sources.iter().map(|s| score_source(s, now)).collect();
        analyze_coverage(sources, &qualities)
    }

    #[test]
    fn topic_matches_count_a_source_once() {
        let sources = vec![
            source("a", SourceType::Document, "my job and my career and my work"),
            source("b", SourceType::Chat, "thinking about a promotion at work"),
        ];
        let coverage = analyze(&sources);
        let career = coverage
            .topics
            .iter()
            .find(|t| t.topic == "career")
            .expect("career covered");
        assert_eq!(career.source_ids, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn absent_essential_topic_is_a_critical_gap() {
        let sources = vec![
            source("a", SourceType::Document, "my career and my job"),
            source("b", SourceType::Chat, "my career is going well"),
        ];
        let coverage = analyze(&sources);
        assert!(coverage
            .gaps
            .iter()
            .any(|g| g.topic == "values" && g.severity == GapSeverity::Critical));
        assert!(coverage
            .gaps
            .iter()
            .any(|g| g.topic == "relationships" && g.severity == GapSeverity::Critical));
        assert!(!coverage.gaps.iter().any(|g| g.topic == "career"));
    }

    #[test]
    fn single_source_topic_is_a_moderate_gap() {
        let sources = vec![
            source("a", SourceType::Document, "my hobby is photography"),
            source("b", SourceType::Chat, "nothing topical in this one xyzzy"),
        ];
        let coverage = analyze(&sources);
        let gap = coverage
            .gaps
            .iter()
            .find(|g| g.topic == "interests")
            .expect("interests gap");
        assert_eq!(gap.severity, GapSeverity::Moderate);
        assert_eq!(gap.source_count, 1);
    }

    #[test]
    fn temporal_spread_buckets_by_range() {
        let now = Utc::now();
        let cases = [(400, 100), (200, 80), (120, 60), (45, 50), (10, 30)];
        for (days, expected) in cases {
            let mut a = source("a", SourceType::Chat, "hello");
            let mut b = source("b", SourceType::Chat, "goodbye");
            a.timestamp = Some(now - Duration::days(days));
            b.timestamp = Some(now);
            let coverage = analyze(&[a, b]);
            assert_eq!(coverage.temporal.spread_score, expected, "span {days} days");
            assert_eq!(coverage.temporal.span_days, Some(days));
        }
    }

    #[test]
    fn missing_timestamps_mean_minimal_spread() {
        let coverage = analyze(&[source("a", SourceType::Chat, "hello")]);
        assert_eq!(coverage.temporal.spread_score, 30);
        assert!(coverage.temporal.months.is_empty());
        assert!(coverage.temporal.earliest.is_none());
    }

    #[test]
    fn format_diversity_scales_with_distinct_types() {
        let sources = vec![
            source("a", SourceType::Chat, "x"),
            source("b", SourceType::Document, "y"),
            source("c", SourceType::Video, "z"),
        ];
        let coverage = analyze(&sources);
        assert_eq!(coverage.format_diversity.score, 60);
        assert!(coverage.format_diversity.has_variety);

        let narrow = analyze(&[source("a", SourceType::Chat, "x")]);
        assert_eq!(narrow.format_diversity.score, 20);
        assert!(!narrow.format_diversity.has_variety);
    }

    #[test]
    fn overall_score_stays_in_bounds() {
        let empty_ish = analyze(&[source("a", SourceType::Other, "qwerty asdf")]);
        assert!(empty_ish.overall_score <= 100);

        let rich: Vec<_> = TOPIC_KEYWORDS
            .iter()
            .enumerate()
            .flat_map(|(i, (_, keywords))| {
                let text = keywords.join(" ");
                vec![
                    source(&format!("s{i}a"), SourceType::Document, &text),
                    source(&format!("s{i}b"), SourceType::Chat, &text),
                ]
            })
            .collect();
        let coverage = analyze(&rich);
        assert!(coverage.overall_score <= 100);
        assert!(coverage.gaps.is_empty());
    }
}
