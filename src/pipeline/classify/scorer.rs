use std::collections::BTreeMap;
use std::sync::Arc;

use crate::models::{ClassificationResult, Field, QuestionUnit};
use crate::pipeline::keywords::KeywordModel;
use crate::pipeline_config::PipelineConfig;

use super::normalize::fold_width;

/// Keyword-weighted field classifier.
///
/// Override rules add their bonus first, then every keyword contributes
/// `weight * min(occurrences, cap)`. The top field wins, ties go to
/// history, then geography, then civics.
#[derive(Debug, Clone)]
pub struct FieldClassifier {
    model: Arc<KeywordModel>,
    min_confidence_score: f32,
    default_cap: u32,
}

impl FieldClassifier {
    pub fn new(model: Arc<KeywordModel>, config: &PipelineConfig) -> Self {
        Self {
            model,
            min_confidence_score: config.min_confidence_score,
            default_cap: config.default_keyword_cap,
        }
    }

    pub fn classify(&self, unit: &QuestionUnit) -> ClassificationResult {
        self.classify_text(&unit.raw_text)
    }

    pub fn classify_text(&self, text: &str) -> ClassificationResult {
        let folded = fold_width(text);
        self.classify_folded(&folded)
    }

    /// Classify text that has already been through `fold_width`.
    pub fn classify_folded(&self, folded: &str) -> ClassificationResult {
        if folded.trim().is_empty() {
            return ClassificationResult::unknown();
        }

        let mut scores: BTreeMap<Field, f32> =
            Field::scored().iter().map(|f| (*f, 0.0)).collect();

        for rule in &self.model.overrides {
            if !rule.predicate.matches(folded) {
                continue;
            }
            if let Some(score) = scores.get_mut(&rule.field) {
                *score += rule.bonus;
                tracing::debug!(rule = %rule.name, field = %rule.field, bonus = rule.bonus, "Override rule matched");
            }
        }

        for field in Field::scored() {
            let total: f32 = self
                .model
                .keywords(*field)
                .iter()
                .map(|keyword| {
                    let occurrences = folded.matches(keyword.term.as_str()).count() as u32;
                    let cap = keyword.cap.unwrap_or(self.default_cap);
                    keyword.weight * occurrences.min(cap) as f32
                })
                .sum();
            if let Some(score) = scores.get_mut(field) {
                *score += total;
            }
        }

        let (field, confidence) = self.decide(&scores);
        ClassificationResult {
            field,
            scores,
            confidence,
        }
    }

    fn decide(&self, scores: &BTreeMap<Field, f32>) -> (Field, f32) {
        let score = |f: &Field| scores.get(f).copied().unwrap_or(0.0);

        // Strict comparison keeps the earlier, higher-priority field on ties.
        let mut top = Field::scored()[0];
        for field in &Field::scored()[1..] {
            if score(field) > score(&top) {
                top = *field;
            }
        }
        let top_score = score(&top);
        let second_score = Field::scored()
            .iter()
            .filter(|f| **f != top)
            .map(score)
            .fold(f32::NEG_INFINITY, f32::max);

        let confidence = (top_score - second_score) / top_score.max(1.0);
        if top_score <= self.min_confidence_score {
            return (Field::Unknown, confidence);
        }
        (top, confidence)
    }
}
