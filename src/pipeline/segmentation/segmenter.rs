use std::ops::Range;

use crate::models::QuestionUnit;
use crate::pipeline_config::{PipelineConfig, RedistributionPolicy};

use super::markers::{scan_major, scan_minor, select_boundaries};
use super::noise::is_noise;
use super::normalize::{disambiguate_labels, group_count, redistribute, renumber};

/// Splits OCR exam text into ordered question units.
///
/// Major groups come from line-anchored 大問 markers, minor units from a
/// tiered 問/(N)/①/(ア) scan inside each group. Output majors are always
/// contiguous from 1 and never exceed `max_major`.
#[derive(Debug, Clone)]
pub struct Segmenter {
    max_major: u32,
    min_group_size: usize,
    min_marker_distance: usize,
    min_unit_chars: usize,
    redistribution: RedistributionPolicy,
}

impl Segmenter {
    pub fn new(max_major: u32) -> Self {
        Self {
            max_major,
            ..Self::from_config(&PipelineConfig::default())
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            max_major: config.max_major,
            min_group_size: config.min_group_size,
            min_marker_distance: config.min_marker_distance,
            min_unit_chars: config.min_unit_chars,
            redistribution: config.redistribution,
        }
    }

    pub fn segment(&self, text: &str) -> Vec<QuestionUnit> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let boundaries = select_boundaries(text, scan_major(text), self.min_marker_distance);
        let starts: Vec<usize> = boundaries.iter().map(|m| m.start).collect();
        let groups = group_ranges(text, &starts);
        if boundaries.is_empty() {
            tracing::warn!(
                chars = text.chars().count(),
                "No major markers found, treating document as one group"
            );
        }

        let mut units = Vec::new();
        for (index, range) in groups.iter().enumerate() {
            let number = index as u32 + 1;
            let minors = scan_minor(&text[range.clone()]);

            if minors.is_empty() {
                push_unit(&mut units, text, range.clone(), number, None);
                continue;
            }

            for (i, minor) in minors.iter().enumerate() {
                let start = range.start + minor.start;
                let end = minors
                    .get(i + 1)
                    .map_or(range.end, |next| range.start + next.start);
                push_unit(&mut units, text, start..end, number, Some(minor.label.clone()));
            }
        }

        let before = units.len();
        units.retain(|u| !is_noise(&u.raw_text, self.min_unit_chars));
        if units.len() < before {
            tracing::debug!(dropped = before - units.len(), "Dropped answer-sheet noise units");
        }

        renumber(&mut units);
        let detected = group_count(&units);
        if detected > self.max_major {
            tracing::warn!(
                detected,
                max_major = self.max_major,
                policy = ?self.redistribution,
                "Too many major groups, redistributing"
            );
            redistribute(
                &mut units,
                self.max_major,
                self.min_group_size,
                self.redistribution,
            );
        }
        disambiguate_labels(&mut units);

        tracing::debug!(
            units = units.len(),
            majors = group_count(&units),
            "Segmented document"
        );
        units
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

/// Segment with default thresholds and the given major bound.
pub fn segment(text: &str, max_major: u32) -> Vec<QuestionUnit> {
    Segmenter::new(max_major).segment(text)
}

/// Byte ranges of each group. Text before the first boundary joins the
/// first group when it holds questions and is dropped otherwise.
fn group_ranges(text: &str, starts: &[usize]) -> Vec<Range<usize>> {
    let Some(&first) = starts.first() else {
        return vec![0..text.len()];
    };
    let lead = if scan_minor(&text[..first]).is_empty() {
        first
    } else {
        0
    };

    starts
        .iter()
        .enumerate()
        .map(|(i, start)| {
            let begin = if i == 0 { lead } else { *start };
            begin..starts.get(i + 1).copied().unwrap_or(text.len())
        })
        .collect()
}

/// Push a unit with whitespace-trimmed bounds. Blank ranges are skipped.
fn push_unit(
    units: &mut Vec<QuestionUnit>,
    text: &str,
    range: Range<usize>,
    major_number: u32,
    minor_label: Option<String>,
) {
    let slice = &text[range.clone()];
    let leading = slice.len() - slice.trim_start().len();
    let trailing = slice.len() - slice.trim_end().len();
    if leading == slice.len() {
        return;
    }
    let trimmed = range.start + leading..range.end - trailing;
    units.push(QuestionUnit {
        major_number,
        minor_label,
        raw_text: text[trimmed.clone()].to_string(),
        char_range: trimmed,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILLER: &str = "日本の各地方の自然や産業について調べた資料を読み、あとの問いに答えなさい。";

    fn make_segmenter() -> Segmenter {
        Segmenter::from_config(&PipelineConfig {
            min_marker_distance: 10,
            ..Default::default()
        })
    }

    fn majors(units: &[QuestionUnit]) -> Vec<u32> {
        units.iter().map(|u| u.major_number).collect()
    }

    fn labels(units: &[QuestionUnit]) -> Vec<Option<&str>> {
        units.iter().map(|u| u.minor_label.as_deref()).collect()
    }

    fn exam(majors: usize, minors: usize) -> String {
        let mut text = String::new();
        for m in 1..=majors {
            text.push_str(&format!("大問{m}\n{FILLER}\n"));
            for q in 1..=minors {
                text.push_str(&format!("問{q} {FILLER}\n"));
            }
        }
        text
    }

    #[test]
    fn empty_text_yields_no_units() {
        assert!(make_segmenter().segment("").is_empty());
        assert!(make_segmenter().segment(" \n\u{3000}\n").is_empty());
    }

    #[test]
    fn splits_majors_and_minors() {
        let units = make_segmenter().segment(&exam(2, 3));
        assert_eq!(majors(&units), vec![1, 1, 1, 2, 2, 2]);
        assert_eq!(
            labels(&units),
            vec![Some("問1"), Some("問2"), Some("問3"), Some("問1"), Some("問2"), Some("問3")]
        );
    }

    #[test]
    fn raw_text_matches_char_range() {
        let text = exam(3, 2);
        for unit in make_segmenter().segment(&text) {
            assert_eq!(&text[unit.char_range.clone()], unit.raw_text);
            assert_eq!(unit.raw_text, unit.raw_text.trim());
        }
    }

    #[test]
    fn group_without_minors_is_one_unit() {
        let text = format!("大問1\n{FILLER}\n大問2\n{FILLER}");
        let units = make_segmenter().segment(&text);
        assert_eq!(majors(&units), vec![1, 2]);
        assert_eq!(labels(&units), vec![None, None]);
        assert!(units[0].raw_text.starts_with("大問1"));
    }

    #[test]
    fn no_markers_at_all_gives_single_unit() {
        let units = make_segmenter().segment(FILLER);
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].major_number, 1);
        assert_eq!(units[0].minor_label, None);
        assert_eq!(units[0].raw_text, FILLER);
    }

    #[test]
    fn no_major_markers_keeps_minors_in_group_one() {
        let text = format!("問1 {FILLER}\n問2 {FILLER}");
        let units = make_segmenter().segment(&text);
        assert_eq!(majors(&units), vec![1, 1]);
        assert_eq!(labels(&units), vec![Some("問1"), Some("問2")]);
    }

    #[test]
    fn too_many_majors_are_redistributed() {
        let units = make_segmenter().segment(&exam(8, 1));
        assert_eq!(majors(&units), vec![1, 2, 3, 4, 5, 5, 5, 5]);
    }

    #[test]
    fn merge_overflow_policy() {
        let segmenter = Segmenter::from_config(&PipelineConfig {
            min_marker_distance: 10,
            redistribution: RedistributionPolicy::MergeOverflow,
            ..Default::default()
        });
        let units = segmenter.segment(&exam(7, 2));
        let distinct: std::collections::BTreeSet<u32> = majors(&units).into_iter().collect();
        assert_eq!(distinct.into_iter().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        assert_eq!(units.iter().filter(|u| u.major_number == 5).count(), 6);
    }

    #[test]
    fn duplicate_minor_labels_are_suffixed() {
        let text = format!("大問1\n問1 {FILLER}\n問1 {FILLER}\n問2 {FILLER}");
        let units = make_segmenter().segment(&text);
        assert_eq!(labels(&units), vec![Some("問1"), Some("問1_2"), Some("問2")]);
    }

    #[test]
    fn answer_sheet_units_are_dropped() {
        let text = format!("大問1\n問1 {FILLER}\n問2 解答用紙 受験番号 氏名\n");
        let units = make_segmenter().segment(&text);
        assert_eq!(labels(&units), vec![Some("問1")]);
    }

    #[test]
    fn preamble_without_questions_is_discarded() {
        let text = format!("令和6年度 入学試験 社会\n注意事項をよく読みなさい。\n大問1\n{FILLER}");
        let units = make_segmenter().segment(&text);
        assert_eq!(units.len(), 1);
        assert!(units[0].raw_text.starts_with("大問1"));
    }

    #[test]
    fn questions_before_first_major_join_group_one() {
        let text = format!("問1 {FILLER}\n大問1\n問1 {FILLER}\n大問2\n問1 {FILLER}");
        let units = make_segmenter().segment(&text);
        assert_eq!(majors(&units), vec![1, 1, 2]);
        assert_eq!(labels(&units), vec![Some("問1"), Some("問1_2"), Some("問1")]);
        assert!(units[0].raw_text.starts_with("問1"));
    }

    #[test]
    fn default_distance_merges_close_markers() {
        let text = format!("1 次の文を読みなさい。\n2 次の表を見なさい。\n{FILLER}");
        let units = Segmenter::default().segment(&text);
        assert_eq!(majors(&units), vec![1]);
    }

    #[test]
    fn free_function_uses_max_major() {
        let filler = FILLER.repeat(3);
        let mut text = String::new();
        for m in 1..=4 {
            text.push_str(&format!("大問{m}\n{filler}\n"));
        }
        let units = segment(&text, 2);
        assert_eq!(majors(&units), vec![1, 1, 2, 2]);
    }
}
