use std::sync::Arc;

use crate::models::{Field, QuestionUnit, RejectReason, ThemeResult, ThemeSource};
use crate::pipeline::classify::normalize::fold_width;
use crate::pipeline::keywords::{KeywordModel, TermsCatalog};
use crate::pipeline_config::PipelineConfig;

use super::curated::{match_composite, match_curated, match_dated};
use super::fallback::FallbackExtractor;
use super::filter::reject_reason;

/// Assigns one theme per unit.
///
/// Composite rules run first, then the curated table, then year-qualified
/// rules, then the heuristic fallback. Whatever comes out is passed through the invalid-theme filter,
/// so a curated theme can still be rejected.
#[derive(Debug, Clone)]
pub struct ThemeExtractor {
    model: Arc<KeywordModel>,
    fallback: FallbackExtractor,
    min_theme_chars: usize,
}

impl ThemeExtractor {
    pub fn new(
        model: Arc<KeywordModel>,
        catalog: Option<Arc<TermsCatalog>>,
        config: &PipelineConfig,
    ) -> Self {
        let fallback = FallbackExtractor::new(Arc::clone(&model), catalog, config);
        Self {
            model,
            fallback,
            min_theme_chars: config.min_theme_chars,
        }
    }

    pub fn extract(&self, unit: &QuestionUnit, field: Field) -> ThemeResult {
        self.extract_text(&unit.raw_text, field)
    }

    pub fn extract_text(&self, text: &str, field: Field) -> ThemeResult {
        let folded = fold_width(text);
        self.extract_folded(&folded, field)
    }

    /// Extract from text that has already been through `fold_width`.
    pub fn extract_folded(&self, folded: &str, field: Field) -> ThemeResult {
        if folded.trim().is_empty() {
            return ThemeResult::rejected(ThemeSource::None, RejectReason::Empty);
        }

        let (theme, source) = if let Some(theme) = match_composite(&self.model, folded) {
            (theme, ThemeSource::CuratedMapping)
        } else if let Some(entry) = match_curated(&self.model, field, folded) {
            (entry.theme.clone(), ThemeSource::CuratedMapping)
        } else if let Some(theme) = match_dated(&self.model, folded) {
            (theme, ThemeSource::CuratedMapping)
        } else if let Some(span) = self.fallback.extract(folded, field) {
            (span, ThemeSource::KeywordFallback)
        } else {
            // Nothing topical left; report why the text itself is not a theme.
            let reason =
                reject_reason(folded, self.min_theme_chars).unwrap_or(RejectReason::Empty);
            tracing::debug!(reason = %reason, "No theme candidate");
            return ThemeResult::rejected(ThemeSource::KeywordFallback, reason);
        };

        match reject_reason(&theme, self.min_theme_chars) {
            Some(reason) => {
                tracing::debug!(theme = %theme, source = %source, reason = %reason, "Theme rejected");
                ThemeResult::rejected(source, reason)
            }
            None => ThemeResult::accepted(theme.trim(), source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_extractor() -> ThemeExtractor {
        ThemeExtractor::new(
            Arc::new(KeywordModel::builtin().unwrap()),
            None,
            &PipelineConfig::default(),
        )
    }

    #[test]
    fn empty_text_is_rejected_without_source() {
        let result = make_extractor().extract_text(" \u{3000}", Field::History);
        assert!(result.rejected);
        assert_eq!(result.source, ThemeSource::None);
        assert_eq!(result.reject_reason, Some(RejectReason::Empty));
        assert!(result.theme.is_none());
    }

    #[test]
    fn composite_rule_beats_curated_entity() {
        let result = make_extractor().extract_text(
            "鎌倉時代に建てられた寺院について説明しなさい。",
            Field::History,
        );
        assert_eq!(result.theme.as_deref(), Some("鎌倉時代の寺院"));
        assert_eq!(result.source, ThemeSource::CuratedMapping);
        assert!(!result.rejected);
    }

    #[test]
    fn curated_entity_maps_to_theme() {
        let result = make_extractor().extract_text("鎌倉幕府の成立について答えなさい。", Field::History);
        assert_eq!(result.theme.as_deref(), Some("鎌倉幕府の成立"));
        assert_eq!(result.source, ThemeSource::CuratedMapping);
    }

    #[test]
    fn year_qualifies_event_without_curated_entity() {
        let result = make_extractor().extract_text(
            "問4 1964年に開かれた東京オリンピックについて説明しなさい。",
            Field::History,
        );
        assert_eq!(result.reportable(), Some("1964年のオリンピック"));
        assert_eq!(result.source, ThemeSource::CuratedMapping);
    }

    #[test]
    fn curated_entity_beats_dated_rule() {
        let result = make_extractor().extract_text(
            "1951年に結ばれた日米安全保障条約について答えなさい。",
            Field::History,
        );
        assert_eq!(result.reportable(), Some("日米安全保障条約の内容"));
        assert_eq!(result.source, ThemeSource::CuratedMapping);
    }

    #[test]
    fn reference_only_text_is_rejected_as_fallback() {
        let result = make_extractor().extract_text("下線部①について", Field::History);
        assert!(result.rejected);
        assert_eq!(result.source, ThemeSource::KeywordFallback);
        assert_eq!(result.reject_reason, Some(RejectReason::ReferenceMarkerOnly));
        assert!(result.theme.is_none());
        assert!(result.reportable().is_none());
    }

    #[test]
    fn marker_laden_instructions_are_never_accepted() {
        let extractor = make_extractor();
        for text in [
            "問5 空欄Ａにはいる人物はだれか",
            "空欄にはいる語句",
            "問2 ア～エのうちあやまっているものはどれか、ひとつえらんでその記号を書け",
        ] {
            let result = extractor.extract_text(text, Field::History);
            assert!(result.rejected, "{text} -> {result:?}");
            assert!(result.theme.is_none());
            assert_eq!(result.source, ThemeSource::KeywordFallback);
            assert_eq!(result.reject_reason, Some(RejectReason::GenericPhrase));
        }
    }

    #[test]
    fn fallback_span_is_accepted() {
        let result = make_extractor()
            .extract_text("問3 扇状地の土地利用について説明しなさい。", Field::Geography);
        assert_eq!(result.source, ThemeSource::KeywordFallback);
        assert_eq!(result.reportable(), Some("土地利用"));
    }

    #[test]
    fn instruction_only_text_is_generic() {
        let result = make_extractor().extract_text("つぎのもんだいにこたえなさい", Field::Unknown);
        assert!(result.rejected);
        assert_eq!(result.reject_reason, Some(RejectReason::GenericPhrase));
    }

    #[test]
    fn extraction_is_deterministic() {
        let extractor = make_extractor();
        let text = "問2 唐の都である長安の様子について答えなさい。";
        assert_eq!(
            extractor.extract_text(text, Field::History),
            extractor.extract_text(text, Field::History)
        );
    }
}
