use std::sync::LazyLock;

use regex::Regex;

use super::normalize::parse_numeral;

/// Markers at or above this priority are trusted even when their number
/// goes backwards.
pub const STRONG_PRIORITY: u8 = 8;

/// A major-question marker candidate. `start` is the byte offset of its line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MajorMarker {
    pub start: usize,
    pub number: u32,
    pub priority: u8,
    pub kind: &'static str,
}

impl MajorMarker {
    pub fn is_strong(&self) -> bool {
        self.priority >= STRONG_PRIORITY
    }
}

/// A minor-question marker with its canonical label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinorMarker {
    pub start: usize,
    pub label: String,
}

struct MajorPattern {
    regex: Regex,
    priority: u8,
    kind: &'static str,
}

fn major(regex_str: &str, priority: u8, kind: &'static str) -> MajorPattern {
    MajorPattern {
        regex: Regex::new(regex_str).expect("Invalid major marker regex"),
        priority,
        kind,
    }
}

/// Line-anchored major markers. Capture group 1 is the number.
static MAJOR_PATTERNS: LazyLock<Vec<MajorPattern>> = LazyLock::new(|| {
    vec![
        major(
            r"(?m)^[\t \x{3000}]*大問[\t \x{3000}]*([0-9０-９]{1,2}|[一二三四五六七八九十]{1,2})",
            10,
            "daimon",
        ),
        major(
            r"(?m)^[\t \x{3000}]*第([0-9０-９]{1,2}|[一二三四五六七八九十]{1,2})問",
            9,
            "dai_n_mon",
        ),
        major(
            r"(?m)^[\t \x{3000}]*[□■▢▣][\t \x{3000}]*([0-9０-９一二三四五六七八九])[\t \x{3000}]*[□■▢▣]",
            8,
            "boxed",
        ),
        major(
            r"(?m)^[\t \x{3000}]*([一二三四五六七八九十])[、，,][\t \x{3000}]*次の",
            7,
            "kanji_next",
        ),
        major(
            r"(?m)^[\t \x{3000}]*([1-9１-９])[\t \x{3000}]+次の",
            7,
            "number_next",
        ),
        major(
            r"(?m)^[\t \x{3000}]*[【〔\[［][\t \x{3000}]*([0-9０-９一二三四五六七八九])[\t \x{3000}]*[】〕\]］]",
            6,
            "bracketed",
        ),
    ]
});

/// Scan every line for a major marker. At most one candidate per line (the
/// highest priority), returned in text order.
pub fn scan_major(text: &str) -> Vec<MajorMarker> {
    let mut candidates: Vec<MajorMarker> = Vec::new();
    for pattern in MAJOR_PATTERNS.iter() {
        for caps in pattern.regex.captures_iter(text) {
            let (Some(whole), Some(num)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let Some(number) = parse_numeral(num.as_str()) else {
                continue;
            };
            if number == 0 {
                continue;
            }
            candidates.push(MajorMarker {
                start: whole.start(),
                number,
                priority: pattern.priority,
                kind: pattern.kind,
            });
        }
    }
    candidates.sort_by(|a, b| a.start.cmp(&b.start).then(b.priority.cmp(&a.priority)));
    candidates.dedup_by_key(|c| c.start);
    candidates
}

/// Keep candidates that look like real section boundaries.
///
/// A candidate closer than `min_distance` chars to the previously accepted
/// boundary replaces it only if it has higher priority. A non-strong
/// candidate whose number does not increase is treated as OCR noise.
pub fn select_boundaries(
    text: &str,
    candidates: Vec<MajorMarker>,
    min_distance: usize,
) -> Vec<MajorMarker> {
    let mut accepted: Vec<MajorMarker> = Vec::new();
    for candidate in candidates {
        let Some(previous) = accepted.last() else {
            accepted.push(candidate);
            continue;
        };

        let distance = text[previous.start..candidate.start].chars().count();
        if distance < min_distance {
            if candidate.priority > previous.priority {
                tracing::debug!(
                    kind = candidate.kind,
                    number = candidate.number,
                    replaced = previous.kind,
                    "Replacing nearby lower-priority marker"
                );
                if let Some(last) = accepted.last_mut() {
                    *last = candidate;
                }
            } else {
                tracing::debug!(
                    kind = candidate.kind,
                    number = candidate.number,
                    distance,
                    "Rejecting marker too close to previous boundary"
                );
            }
            continue;
        }

        if !candidate.is_strong() && candidate.number <= previous.number {
            tracing::debug!(
                kind = candidate.kind,
                number = candidate.number,
                previous = previous.number,
                "Rejecting non-increasing marker"
            );
            continue;
        }

        accepted.push(candidate);
    }
    accepted
}

// ═══════════════════════════════════════════════════════════
// Minor markers
// ═══════════════════════════════════════════════════════════

struct MinorTier {
    regex: Regex,
    label: fn(&str, &str) -> Option<String>,
}

fn tier(regex_str: &str, label: fn(&str, &str) -> Option<String>) -> MinorTier {
    MinorTier {
        regex: Regex::new(regex_str).expect("Invalid minor marker regex"),
        label,
    }
}

fn mon_label(prefix: &str, num: &str) -> Option<String> {
    parse_numeral(num).map(|n| format!("{prefix}{n}"))
}

fn paren_number_label(_: &str, num: &str) -> Option<String> {
    parse_numeral(num).map(|n| format!("({n})"))
}

fn circled_label(_: &str, num: &str) -> Option<String> {
    Some(num.to_string())
}

fn paren_kana_label(_: &str, kana: &str) -> Option<String> {
    Some(format!("({kana})"))
}

/// Minor marker tiers in precedence order. Group 1 is a prefix (may be
/// empty), group 2 the number or kana.
static MINOR_TIERS: LazyLock<Vec<MinorTier>> = LazyLock::new(|| {
    vec![
        tier(
            r"(?m)^[\t \x{3000}]*【?[\t \x{3000}]*(設問|問)[\t \x{3000}]*([0-9０-９]{1,2}|[一二三四五六七八九十]{1,3})",
            mon_label,
        ),
        tier(
            r"(?m)^[\t \x{3000}]*[（(]()[\t \x{3000}]*([0-9０-９]{1,2})[\t \x{3000}]*[）)]",
            paren_number_label,
        ),
        tier(r"(?m)^[\t \x{3000}]*()([①-⑳])", circled_label),
        tier(
            r"(?m)^[\t \x{3000}]*[（(]()[\t \x{3000}]*([ア-ンあ-ん])[\t \x{3000}]*[）)]",
            paren_kana_label,
        ),
    ]
});

/// Minor markers of the first tier that has any hit in `text`.
pub fn scan_minor(text: &str) -> Vec<MinorMarker> {
    for tier in MINOR_TIERS.iter() {
        let markers: Vec<MinorMarker> = tier
            .regex
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let prefix = caps.get(1).map_or("", |m| m.as_str());
                let value = caps.get(2)?.as_str();
                let label = (tier.label)(prefix, value)?;
                Some(MinorMarker {
                    start: whole.start(),
                    label,
                })
            })
            .collect();
        if !markers.is_empty() {
            return markers;
        }
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(markers: &[MajorMarker]) -> Vec<u32> {
        markers.iter().map(|m| m.number).collect()
    }

    fn labels(markers: &[MinorMarker]) -> Vec<&str> {
        markers.iter().map(|m| m.label.as_str()).collect()
    }

    #[test]
    fn detects_common_major_forms() {
        let text = "大問1 地理\n第２問 歴史\n□3□ 公民\n四、次の文章を読んで\n5 次の表を見て\n【6】資料";
        let markers = scan_major(text);
        assert_eq!(numbers(&markers), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(markers[0].kind, "daimon");
        assert_eq!(markers[1].kind, "dai_n_mon");
        assert_eq!(markers[2].kind, "boxed");
        assert_eq!(markers[5].kind, "bracketed");
    }

    #[test]
    fn major_marker_must_start_a_line() {
        let text = "これは大問1ではない\n本文に 3 次の語が出てくる";
        assert!(scan_major(text).is_empty());
    }

    #[test]
    fn one_candidate_per_line_keeps_highest_priority() {
        let markers = scan_major("大問1\n");
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].priority, 10);
    }

    #[test]
    fn nearby_markers_are_rejected() {
        let text = "1 次の文を読んで答えなさい。\n2 次の問い";
        let selected = select_boundaries(text, scan_major(text), 100);
        assert_eq!(numbers(&selected), vec![1]);
    }

    #[test]
    fn nearby_higher_priority_marker_replaces_previous() {
        let text = "【1】表紙\n大問1 地理";
        let selected = select_boundaries(text, scan_major(text), 100);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].kind, "daimon");
    }

    #[test]
    fn medium_marker_number_reset_is_noise() {
        let filler = "あ".repeat(120);
        let text = format!("1 次の問い{filler}\n2 次の問い{filler}\n1 次の引用{filler}\n3 次の問い");
        let selected = select_boundaries(&text, scan_major(&text), 100);
        assert_eq!(numbers(&selected), vec![1, 2, 3]);
    }

    #[test]
    fn strong_marker_number_reset_is_trusted() {
        let filler = "あ".repeat(120);
        let text = format!("大問1{filler}\n大問2{filler}\n大問1{filler}");
        let selected = select_boundaries(&text, scan_major(&text), 100);
        assert_eq!(numbers(&selected), vec![1, 2, 1]);
    }

    #[test]
    fn minor_mon_labels_are_canonical() {
        let text = "問一 鎌倉幕府\n問２ 室町幕府\n【問3】江戸幕府\n設問4 明治";
        assert_eq!(labels(&scan_minor(text)), vec!["問1", "問2", "問3", "設問4"]);
    }

    #[test]
    fn mon_tier_wins_over_parenthesised_numbers() {
        let text = "問1 次の文\n(1) 小問\n問2 次の文";
        assert_eq!(labels(&scan_minor(text)), vec!["問1", "問2"]);
    }

    #[test]
    fn falls_back_to_lower_tiers() {
        assert_eq!(labels(&scan_minor("（１）平野\n(2) 山地")), vec!["(1)", "(2)"]);
        assert_eq!(labels(&scan_minor("① 平野\n② 山地")), vec!["①", "②"]);
        assert_eq!(labels(&scan_minor("(ア) 平野\n（イ）山地")), vec!["(ア)", "(イ)"]);
    }

    #[test]
    fn inline_references_are_not_minor_markers() {
        assert!(scan_minor("下線部①について説明しなさい。").is_empty());
        assert!(scan_minor("次の問いに答えなさい。").is_empty());
    }
}
