//! Scoring-rubric validation of Mind output
//!
//! Pure function from a MindResult to a ValidationResult. Each issue
//! class deducts a fixed penalty from a 100-point score; the score
//! floors at 0. A result is valid when it clears the Mind's threshold
//! and carries no error-severity issue.

use crate::types::{
    MindResult, PersonalityTrait, Severity, TraitCategory, ValidationIssue, ValidationResult,
};

const NO_TRAITS_PENALTY: i32 = 30;
const LOW_CONFIDENCE_PENALTY: i32 = 15;
const NO_EVIDENCE_PENALTY: i32 = 20;
const CONFIDENCE_RANGE_PENALTY: i32 = 20;
const MISSING_CATEGORY_PENALTY: i32 = 10;

/// Validate a result against the rubric. Never mutates the result;
/// identical input always yields an identical assessment.
pub fn validate_result(
    result: &MindResult,
    expected_categories: &[TraitCategory],
    threshold: u8,
) -> ValidationResult {
    let mut issues: Vec<ValidationIssue> = Vec::new();
    let mut score: i32 = 100;

    if result.traits.is_empty() {
        issues.push(ValidationIssue {
            severity: Severity::Error,
            code: "no-traits".to_string(),
            message: format!("{} extracted no traits", result.mind_id),
            path: Some("traits".to_string()),
        });
        score -= NO_TRAITS_PENALTY;
    } else if majority_low_confidence(&result.traits) {
        issues.push(ValidationIssue {
            severity: Severity::Warning,
            code: "low-confidence-traits".to_string(),
            message: "more than half of the traits have confidence below 0.3".to_string(),
            path: Some("traits".to_string()),
        });
        score -= LOW_CONFIDENCE_PENALTY;
    }

    if result.evidence.is_empty() {
        issues.push(ValidationIssue {
            severity: Severity::Warning,
            code: "no-evidence".to_string(),
            message: "result cites no supporting evidence".to_string(),
            path: Some("evidence".to_string()),
        });
        score -= NO_EVIDENCE_PENALTY;
    }

    if !(0.0..=1.0).contains(&result.confidence) {
        issues.push(ValidationIssue {
            severity: Severity::Error,
            code: "confidence-out-of-range".to_string(),
            message: format!("confidence {} is outside [0,1]", result.confidence),
            path: Some("confidence".to_string()),
        });
        score -= CONFIDENCE_RANGE_PENALTY;
    }

    for category in expected_categories {
        if result.trait_in(*category).is_none() {
            issues.push(ValidationIssue {
                severity: Severity::Warning,
                code: "missing-category".to_string(),
                message: format!("no trait in expected category {category:?}"),
                path: Some("traits".to_string()),
            });
            score -= MISSING_CATEGORY_PENALTY;
        }
    }

    let score = score.max(0) as u8;
    let has_error = issues.iter().any(|i| i.severity == Severity::Error);
    ValidationResult {
        valid: score >= threshold && !has_error,
        score,
        issues,
    }
}

fn majority_low_confidence(traits: &[PersonalityTrait]) -> bool {
    let low = traits.iter().filter(|t| t.confidence < 0.3).count();
    low * 2 > traits.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Evidence, MindId, TraitValue};

    fn trait_with_confidence(confidence: f64) -> PersonalityTrait {
        PersonalityTrait {
            category: TraitCategory::Personality,
            name: "openness".to_string(),
            value: TraitValue::Number(0.7),
            confidence,
            sources: vec!["s1".to_string()],
            notes: None,
        }
    }

    fn decent_result() -> MindResult {
        let mut result = MindResult::new(MindId::Personality);
        result.traits = vec![trait_with_confidence(0.8), trait_with_confidence(0.6)];
        result.confidence = 0.7;
        result.evidence = vec![Evidence {
            source: "s1".to_string(),
            excerpt: "i think this matters".to_string(),
            relevance: 0.8,
            kind: None,
        }];
        result
    }

    #[test]
    fn clean_result_scores_full_marks() {
        let result = decent_result();
        let report = validate_result(&result, &[TraitCategory::Personality], 50);
        assert!(report.valid);
        assert_eq!(report.score, 100);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn empty_result_stacks_penalties_and_fails() {
        let result = MindResult::new(MindId::Personality);
        let report = validate_result(&result, &[TraitCategory::Personality], 50);
        // 100 - 30 (no traits) - 20 (no evidence) - 10 (missing category)
        assert_eq!(report.score, 40);
        assert!(!report.valid);
        assert!(report
            .issues
            .iter()
            .any(|i| i.severity == Severity::Error && i.code == "no-traits"));
    }

    #[test]
    fn out_of_range_confidence_is_an_error() {
        let mut result = decent_result();
        result.confidence = 1.4;
        let report = validate_result(&result, &[], 50);
        assert_eq!(report.score, 80);
        // score clears the threshold but the error severity vetoes it
        assert!(!report.valid);
    }

    #[test]
    fn majority_low_confidence_deducts_once() {
        let mut result = decent_result();
        result.traits = vec![
            trait_with_confidence(0.1),
            trait_with_confidence(0.2),
            trait_with_confidence(0.9),
        ];
        let report = validate_result(&result, &[], 50);
        assert_eq!(report.score, 85);
        assert!(report.valid);
    }

    #[test]
    fn score_floors_at_zero() {
        let mut result = MindResult::new(MindId::SourceQuality);
        result.confidence = -2.0;
        let expected = [
            TraitCategory::Quality,
            TraitCategory::Coverage,
            TraitCategory::Personality,
            TraitCategory::Values,
        ];
        let report = validate_result(&result, &expected, 60);
        // 100 - 30 - 20 - 20 - 40 would be -10
        assert_eq!(report.score, 0);
        assert!(!report.valid);
    }

    #[test]
    fn validation_is_pure() {
        let result = decent_result();
        let first = validate_result(&result, &[TraitCategory::Personality], 50);
        let second = validate_result(&result, &[TraitCategory::Personality], 50);
        assert_eq!(first, second);
    }

    #[test]
    fn first_stage_threshold_is_stricter() {
        let mut result = decent_result();
        result.evidence.clear();
        result.traits = vec![trait_with_confidence(0.8)];
        // 100 - 20 (no evidence) - 20 (missing quality + coverage)
        let report = validate_result(
            &result,
            &[TraitCategory::Quality, TraitCategory::Coverage],
            60,
        );
        assert_eq!(report.score, 60);
        assert!(report.valid);

        let mut stricter = result.clone();
        stricter.traits.clear();
        let report = validate_result(
            &stricter,
            &[TraitCategory::Quality, TraitCategory::Coverage],
            60,
        );
        assert!(report.score < 60);
        assert!(!report.valid);
    }
}
