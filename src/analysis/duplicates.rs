//! Duplicate and near-duplicate detection
//!
//! Pairwise Jaccard similarity over lower-cased, whitespace-tokenized
//! word sets, grouped by a single left-to-right sweep: each unprocessed
//! source collects every later unprocessed source that clears the
//! threshold, and the group similarity is the running average across
//! merges. Only groups with at least two members survive.

use crate::types::{DuplicateGroup, DuplicateKind, ExtractedData, SourceQuality};
use std::collections::{HashMap, HashSet};

/// Jaccard similarity of two texts' word sets. 0 when both are empty.
pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let a_set = token_set(a);
    let b_set = token_set(b);

    let union = a_set.union(&b_set).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a_set.intersection(&b_set).count();
    intersection as f64 / union as f64
}

fn token_set(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Sweep the sources for duplicate groups at the given threshold.
pub fn find_duplicate_groups(
    sources: &[ExtractedData],
    qualities: &[SourceQuality],
    threshold: f64,
) -> Vec<DuplicateGroup> {
    let quality_by_id: HashMap<&str, u8> = qualities
        .iter()
        .map(|q| (q.source_id.as_str(), q.score))
        .collect();

    let mut processed = vec![false; sources.len()];
    let mut groups = Vec::new();

    for i in 0..sources.len() {
        if processed[i] {
            continue;
        }

        let mut members = vec![i];
        let mut similarity = 0.0;
        let mut merges = 0usize;

        for j in (i + 1)..sources.len() {
            if processed[j] {
                continue;
            }
            let pair = jaccard_similarity(&sources[i].content, &sources[j].content);
            if pair >= threshold {
                processed[j] = true;
                merges += 1;
                similarity += (pair - similarity) / merges as f64;
                members.push(j);
            }
        }

        if members.len() < 2 {
            continue;
        }
        processed[i] = true;

        let primary = primary_member(&members, sources, &quality_by_id);
        let primary_score = quality_by_id
            .get(sources[primary].id.as_str())
            .copied()
            .unwrap_or(0);

        groups.push(DuplicateGroup {
            group_id: format!("dup-{}", groups.len() + 1),
            kind: classify(similarity),
            similarity,
            source_ids: members.iter().map(|&m| sources[m].id.clone()).collect(),
            primary_source_id: sources[primary].id.clone(),
            primary_reason: format!("highest quality score ({primary_score})"),
        });
    }

    groups
}

fn classify(similarity: f64) -> DuplicateKind {
    if similarity > 0.98 {
        DuplicateKind::Exact
    } else if similarity > 0.90 {
        DuplicateKind::Near
    } else {
        DuplicateKind::Semantic
    }
}

/// Highest quality score wins; ties break toward the earliest source
/// in original input order.
fn primary_member(
    members: &[usize],
    sources: &[ExtractedData],
    quality_by_id: &HashMap<&str, u8>,
) -> usize {
    let mut best = members[0];
    let mut best_score = quality_by_id
        .get(sources[best].id.as_str())
        .copied()
        .unwrap_or(0);

    for &member in &members[1..] {
        let score = quality_by_id
            .get(sources[member].id.as_str())
            .copied()
            .unwrap_or(0);
        if score > best_score {
            best = member;
            best_score = score;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::quality::score_source;
    use crate::types::SourceType;
    use chrono::Utc;
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

    fn qualities_for(sources: &[ExtractedData]) -> Vec<SourceQuality> {
        let now = Utc::now();
        sources.iter().map(|s| score_source(s, now)).collect()
    }

    #[test]
    fn identical_content_has_similarity_one() {
        assert_eq!(jaccard_similarity("hello world again", "hello world again"), 1.0);
    }

    #[test]
    fn similarity_is_case_insensitive() {
        assert_eq!(jaccard_similarity("Hello World", "hello world"), 1.0);
    }

    #[test]
    fn both_empty_means_zero() {
        assert_eq!(jaccard_similarity("", ""), 0.0);
        assert_eq!(jaccard_similarity("", "something"), 0.0);
    }

    #[test]
    fn disjoint_texts_score_zero() {
        assert_eq!(jaccard_similarity("alpha beta", "gamma delta"), 0.0);
    }

    #[test]
    fn identical_sources_group_as_exact() {
        let sources = vec![
            source("a", SourceType::Chat, "are you around later today"),
            source("b", SourceType::Chat, "are you around later today"),
            source("c", SourceType::Document, "a completely different essay about mountains"),
        ];
        let qualities = qualities_for(&sources);
        let groups = find_duplicate_groups(&sources, &qualities, 0.85);

        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.kind, DuplicateKind::Exact);
        assert_eq!(group.similarity, 1.0);
        assert_eq!(group.source_ids, vec!["a".to_string(), "b".to_string()]);
        assert!(group.source_ids.contains(&group.primary_source_id));
    }

    #[test]
    fn ties_break_toward_original_order() {
        let sources = vec![
            source("first", SourceType::Chat, "same words here"),
            source("second", SourceType::Chat, "same words here"),
        ];
        let qualities = qualities_for(&sources);
        let groups = find_duplicate_groups(&sources, &qualities, 0.85);
        assert_eq!(groups[0].primary_source_id, "first");
    }

    #[test]
    fn higher_quality_member_becomes_primary() {
        // same word set, but the document form scores higher on credibility
        let sources = vec![
            source("chat", SourceType::Chat, "notes about my week and my plans"),
            source("doc", SourceType::Document, "notes about my week and my plans"),
        ];
        let qualities = qualities_for(&sources);
        let groups = find_duplicate_groups(&sources, &qualities, 0.85);
        assert_eq!(groups[0].primary_source_id, "doc");
        assert!(groups[0].primary_reason.contains("highest quality score"));
    }

    #[test]
    fn below_threshold_pairs_stay_ungrouped() {
        let sources = vec![
            source("a", SourceType::Chat, "one two three four"),
            source("b", SourceType::Chat, "one two five six"),
        ];
        let qualities = qualities_for(&sources);
        // similarity = 2/6
        assert!(find_duplicate_groups(&sources, &qualities, 0.85).is_empty());
    }

    #[test]
    fn sweep_groups_transitively_from_the_left() {
        let sources = vec![
            source("a", SourceType::Chat, "the quick brown fox jumps over the lazy dog"),
            source("b", SourceType::Chat, "the quick brown fox jumps over the lazy dog"),
            source("c", SourceType::Chat, "the quick brown fox jumps over the lazy cat"),
            source("d", SourceType::Document, "unrelated reflections on learning music"),
        ];
        let qualities = qualities_for(&sources);
        let groups = find_duplicate_groups(&sources, &qualities, 0.75);

        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.source_ids.len(), 3);
        // running average of 1.0 and 7/9
        assert!((group.similarity - 8.0 / 9.0).abs() < 1e-9);
        assert_eq!(group.kind, DuplicateKind::Semantic);
    }
}
