//! Heuristic theme fallback.
//!
//! Picks the most salient kanji/katakana run from the unit text. Runs are
//! ranked by length, closeness to the field's keywords, presence in the
//! terms catalog, and whether they are followed by a topic phrase such as
//! 「について」.

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::models::Field;
use crate::pipeline::keywords::{KeywordModel, TermsCatalog};
use crate::pipeline_config::PipelineConfig;

const LENGTH_WEIGHT: f32 = 1.0;
const PROXIMITY_BONUS: f32 = 6.0;
const CATALOG_BONUS: f32 = 8.0;
const TOPIC_BONUS: f32 = 4.0;

/// Phrases that mark the preceding span as the topic of the question.
const TOPIC_SUFFIXES: &[&str] = &[
    "について",
    "に関して",
    "に関する",
    "の特徴",
    "の役割",
    "の影響",
    "の目的",
    "の仕組み",
];

/// Candidate runs that are exam furniture rather than topics.
const STOP_WORDS: &[&str] = &[
    "説明", "記号", "語句", "漢字", "解答", "理由", "文章", "資料", "史料", "内容", "特徴", "原因",
    "結果", "影響", "意味", "目的", "名前", "人物", "地図", "年表", "写真", "表", "図", "次",
    "以内", "以下", "以上", "適切", "正", "誤", "選択肢", "記述", "番号", "具体的", "本文",
    "文中", "図中", "表中", "地図中", "下線部", "傍線部", "空欄", "問題", "各問", "問", "設問",
    "会話文", "出来事", "時代", "世紀", "場合", "部分", "現在", "当時", "用語", "カタカナ",
    "ひらがな", "様子", "関係", "特色", "変化", "仕組", "役割", "考え", "最", "同",
];

const KANJI_NUMERALS: &str = "一二三四五六七八九十百千万";

/// Reference markers and question furniture removed before span search.
static STRIP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(下線部|傍線部|波線部|点線部|空欄|空らん|空所)[①-⑳0-9a-zア-ン]*|(設問|問)\s*\d+|[①-⑳]|\d+字(以内|以上|程度)?|[(【\[〔][^)】\]〕]{0,3}[)】\]〕]",
    )
    .expect("Invalid fallback strip regex")
});

static SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{Han}\p{Katakana}ー・]+").expect("Invalid span regex"));

static STOP_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOP_WORDS.iter().copied().collect());

#[derive(Debug, Clone, PartialEq)]
struct Candidate {
    text: String,
    /// Char offsets into the cleaned text.
    start: usize,
    end: usize,
}

#[derive(Debug, Clone)]
pub struct FallbackExtractor {
    model: Arc<KeywordModel>,
    catalog: Option<Arc<TermsCatalog>>,
    min_chars: usize,
    max_chars: usize,
    window: usize,
}

impl FallbackExtractor {
    pub fn new(
        model: Arc<KeywordModel>,
        catalog: Option<Arc<TermsCatalog>>,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            model,
            catalog,
            min_chars: config.fallback_min_chars,
            max_chars: config.fallback_max_chars,
            window: config.fallback_proximity_window,
        }
    }

    /// Best span of `folded`, or `None` when no span qualifies.
    pub fn extract(&self, folded: &str, field: Field) -> Option<String> {
        let cleaned = STRIP.replace_all(folded, " ");
        let char_starts: Vec<usize> = cleaned.char_indices().map(|(b, _)| b).collect();
        let to_char = |byte: usize| char_starts.partition_point(|&b| b < byte);

        let mut candidates = self.span_candidates(&cleaned, &to_char);
        self.add_catalog_candidates(&cleaned, field, &to_char, &mut candidates);
        candidates.sort_by_key(|c| (c.start, std::cmp::Reverse(c.end)));

        let keyword_spans = self.keyword_spans(&cleaned, field, &to_char);
        let cleaned_chars: Vec<char> = cleaned.chars().collect();

        let mut best: Option<(&Candidate, f32)> = None;
        for candidate in &candidates {
            let score = self.score(candidate, field, &keyword_spans, &cleaned_chars);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((candidate, score));
            }
        }

        match best {
            Some((candidate, score)) => {
                tracing::debug!(span = %candidate.text, score, "Fallback span selected");
                Some(candidate.text.clone())
            }
            None => {
                tracing::debug!("No fallback span");
                None
            }
        }
    }

    fn span_candidates(&self, cleaned: &str, to_char: &impl Fn(usize) -> usize) -> Vec<Candidate> {
        SPAN.find_iter(cleaned)
            .filter_map(|m| {
                let text = m.as_str().trim_matches('・');
                let len = text.chars().count();
                if len < self.min_chars || len > self.max_chars || is_stop_word(text) {
                    return None;
                }
                let offset = m.as_str().find(text).unwrap_or(0);
                let start = to_char(m.start() + offset);
                Some(Candidate {
                    text: text.to_string(),
                    start,
                    end: start + len,
                })
            })
            .collect()
    }

    fn add_catalog_candidates(
        &self,
        cleaned: &str,
        field: Field,
        to_char: &impl Fn(usize) -> usize,
        candidates: &mut Vec<Candidate>,
    ) {
        let Some(catalog) = &self.catalog else {
            return;
        };
        for term in catalog.terms_in(field, cleaned) {
            let len = term.chars().count();
            if len < self.min_chars || len > self.max_chars {
                continue;
            }
            let Some(byte) = cleaned.find(term) else {
                continue;
            };
            let start = to_char(byte);
            if candidates.iter().any(|c| c.start == start && c.text == term) {
                continue;
            }
            candidates.push(Candidate {
                text: term.to_string(),
                start,
                end: start + len,
            });
        }
    }

    /// Char spans of positively weighted field keywords.
    fn keyword_spans(
        &self,
        cleaned: &str,
        field: Field,
        to_char: &impl Fn(usize) -> usize,
    ) -> Vec<(usize, usize)> {
        let fields: &[Field] = match field {
            Field::Unknown => Field::scored(),
            _ => std::slice::from_ref(&field),
        };
        let mut spans = Vec::new();
        for f in fields {
            for keyword in self.model.keywords(*f).iter().filter(|k| k.weight > 0.0) {
                for (byte, _) in cleaned.match_indices(keyword.term.as_str()) {
                    let start = to_char(byte);
                    spans.push((start, start + keyword.term.chars().count()));
                }
            }
        }
        spans
    }

    fn score(
        &self,
        candidate: &Candidate,
        field: Field,
        keyword_spans: &[(usize, usize)],
        cleaned_chars: &[char],
    ) -> f32 {
        let mut score = candidate.text.chars().count() as f32 * LENGTH_WEIGHT;

        let nearest = keyword_spans
            .iter()
            .map(|(ks, ke)| gap(candidate.start, candidate.end, *ks, *ke))
            .min();
        if let Some(distance) = nearest.filter(|d| *d <= self.window) {
            score += PROXIMITY_BONUS * (1.0 - distance as f32 / (self.window + 1) as f32);
        }

        if self
            .catalog
            .as_ref()
            .is_some_and(|c| c.contains(field, &candidate.text))
        {
            score += CATALOG_BONUS;
        }

        let following: String = cleaned_chars
            .iter()
            .skip(candidate.end)
            .take(4)
            .collect();
        if TOPIC_SUFFIXES.iter().any(|s| following.starts_with(s)) {
            score += TOPIC_BONUS;
        }

        score
    }
}

fn is_stop_word(text: &str) -> bool {
    STOP_SET.contains(text) || text.chars().all(|c| KANJI_NUMERALS.contains(c))
}

/// Char distance between two half-open spans, zero when they overlap.
fn gap(a_start: usize, a_end: usize, b_start: usize, b_end: usize) -> usize {
    if a_end <= b_start {
        b_start - a_end
    } else if b_end <= a_start {
        a_start - b_end
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::classify::normalize::fold_width;

    fn make_extractor(catalog: Option<TermsCatalog>) -> FallbackExtractor {
        FallbackExtractor::new(
            Arc::new(KeywordModel::builtin().unwrap()),
            catalog.map(Arc::new),
            &PipelineConfig::default(),
        )
    }

    fn extract(text: &str, field: Field) -> Option<String> {
        make_extractor(None).extract(&fold_width(text), field)
    }

    #[test]
    fn topic_phrase_wins() {
        assert_eq!(
            extract("問3 扇状地の土地利用について説明しなさい。", Field::Geography).as_deref(),
            Some("土地利用")
        );
    }

    #[test]
    fn catalog_term_outranks_heuristics() {
        let catalog = TermsCatalog::from_terms([(Field::Geography, "扇状地")]);
        let extractor = make_extractor(Some(catalog));
        let text = fold_width("問3 扇状地の土地利用について説明しなさい。");
        assert_eq!(extractor.extract(&text, Field::Geography).as_deref(), Some("扇状地"));
    }

    #[test]
    fn catalog_supplies_spans_inside_longer_runs() {
        let catalog = TermsCatalog::from_terms([(Field::History, "班田収授法")]);
        let extractor = make_extractor(Some(catalog));
        let text = fold_width("班田収授法施行後の農民の生活");
        assert_eq!(extractor.extract(&text, Field::History).as_deref(), Some("班田収授法"));
    }

    #[test]
    fn keyword_proximity_breaks_length_ties() {
        // both runs are three chars; 国会議 contains the civics keyword 国会
        let text = "国会議の様子と自然林の様子";
        assert_eq!(extract(text, Field::Civics).as_deref(), Some("国会議"));
    }

    #[test]
    fn reference_markers_and_stop_words_are_skipped() {
        assert_eq!(
            extract("下線部②の人物が行った政治改革を説明しなさい。", Field::History).as_deref(),
            Some("政治改革")
        );
    }

    #[test]
    fn overlong_runs_are_skipped() {
        let text = "東京大阪名古屋札幌仙台広島福岡那覇と京都";
        assert_eq!(extract(text, Field::Geography).as_deref(), Some("京都"));
    }

    #[test]
    fn no_span_yields_nothing() {
        assert_eq!(extract("下線部①について", Field::History), None);
        assert_eq!(extract("  つぎのもんだい  ", Field::Unknown), None);
    }

    #[test]
    fn instruction_sentences_yield_nothing() {
        for text in [
            "問5 空欄Ａにはいる人物はだれか",
            "空欄にはいる語句",
            "問2 ア～エのうちあやまっているものはどれか、ひとつえらんでその記号を書け",
        ] {
            assert_eq!(extract(text, Field::History), None, "{text}");
        }
    }

    #[test]
    fn selected_span_respects_length_bounds() {
        let config = PipelineConfig::default();
        let text = "問1 日本列島の太平洋側に広がる工業地帯と臨海部の埋立地の利用について説明しなさい。";
        let span = extract(text, Field::Geography).unwrap();
        let len = span.chars().count();
        assert!(len >= config.fallback_min_chars && len <= config.fallback_max_chars);
    }

    #[test]
    fn earliest_candidate_wins_exact_ties() {
        assert_eq!(extract("平野と盆地", Field::Unknown).as_deref(), Some("平野"));
    }

    #[test]
    fn gap_between_spans() {
        assert_eq!(gap(0, 2, 5, 7), 3);
        assert_eq!(gap(5, 7, 0, 2), 3);
        assert_eq!(gap(0, 5, 3, 4), 0);
    }
}
