use std::collections::BTreeMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::enums::{Field, QuestionFormat, RejectReason, ResourceKind, ThemeSource};

/// One question (or sub-question) cut out of a document.
///
/// `raw_text` is always the document text at `char_range` (byte offsets).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionUnit {
    pub major_number: u32,
    pub minor_label: Option<String>,
    pub raw_text: String,
    pub char_range: Range<usize>,
}

impl QuestionUnit {
    /// Display id such as `大問2-問3`, or `大問2` for an unlabelled unit.
    pub fn display_id(&self) -> String {
        match &self.minor_label {
            Some(label) => format!("大問{}-{}", self.major_number, label),
            None => format!("大問{}", self.major_number),
        }
    }
}

/// Field decision for one unit. Replaced wholesale on recomputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub field: Field,
    pub scores: BTreeMap<Field, f32>,
    /// (top - second) / max(1, top). Informational only.
    pub confidence: f32,
}

impl ClassificationResult {
    pub fn unknown() -> Self {
        Self {
            field: Field::Unknown,
            scores: Field::scored().iter().map(|f| (*f, 0.0)).collect(),
            confidence: 0.0,
        }
    }

    pub fn score(&self, field: Field) -> f32 {
        self.scores.get(&field).copied().unwrap_or(0.0)
    }
}

/// Theme decision for one unit.
///
/// A rejected result never carries a theme string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeResult {
    pub theme: Option<String>,
    pub source: ThemeSource,
    pub rejected: bool,
    pub reject_reason: Option<RejectReason>,
}

impl ThemeResult {
    pub fn accepted(theme: impl Into<String>, source: ThemeSource) -> Self {
        Self {
            theme: Some(theme.into()),
            source,
            rejected: false,
            reject_reason: None,
        }
    }

    pub fn rejected(source: ThemeSource, reason: RejectReason) -> Self {
        Self {
            theme: None,
            source,
            rejected: true,
            reject_reason: Some(reason),
        }
    }

    /// Theme usable in reports, if any.
    pub fn reportable(&self) -> Option<&str> {
        if self.rejected {
            return None;
        }
        self.theme.as_deref()
    }
}

/// A unit plus everything the pipeline attached to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedQuestion {
    pub unit: QuestionUnit,
    pub classification: ClassificationResult,
    pub theme: ThemeResult,
    pub format: QuestionFormat,
    pub resources: Vec<ResourceKind>,
    pub current_affairs: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_id_with_and_without_label() {
        let mut unit = QuestionUnit {
            major_number: 2,
            minor_label: Some("問3".into()),
            raw_text: "問3 鎌倉幕府について".into(),
            char_range: 0..10,
        };
        assert_eq!(unit.display_id(), "大問2-問3");
        unit.minor_label = None;
        assert_eq!(unit.display_id(), "大問2");
    }

    #[test]
    fn unknown_classification_has_zero_scores() {
        let result = ClassificationResult::unknown();
        assert_eq!(result.field, Field::Unknown);
        for field in Field::scored() {
            assert_eq!(result.score(*field), 0.0);
        }
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn rejected_theme_has_no_text() {
        let result = ThemeResult::rejected(ThemeSource::KeywordFallback, RejectReason::TooShort);
        assert!(result.rejected);
        assert!(result.theme.is_none());
        assert_eq!(result.reportable(), None);
    }

    #[test]
    fn accepted_theme_is_reportable() {
        let result = ThemeResult::accepted("鎌倉幕府の成立", ThemeSource::CuratedMapping);
        assert_eq!(result.reportable(), Some("鎌倉幕府の成立"));
        assert!(result.reject_reason.is_none());
    }
}
