//! Numbering normalisation.
//!
//! Numeral parsing for marker numbers, contiguous renumbering of detected
//! groups, redistribution when too many groups were detected, and label
//! disambiguation within a major group.

use std::collections::HashMap;

use crate::models::QuestionUnit;
use crate::pipeline_config::RedistributionPolicy;

// ═══════════════════════════════════════════════════════════
// Numerals
// ═══════════════════════════════════════════════════════════

const KANJI_DIGITS: &str = "一二三四五六七八九";

fn kanji_digit(c: char) -> Option<u32> {
    KANJI_DIGITS
        .chars()
        .position(|k| k == c)
        .map(|p| p as u32 + 1)
}

/// Parse ASCII, full-width, kanji (一..九十九) or circled (①..⑳) numerals.
pub fn parse_numeral(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if raw.chars().all(|c| c.is_ascii_digit() || ('０'..='９').contains(&c)) {
        let ascii: String = raw
            .chars()
            .map(|c| match c {
                '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
                _ => c,
            })
            .collect();
        return ascii.parse().ok();
    }

    let mut chars = raw.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if ('①'..='⑳').contains(&c) {
            return Some(c as u32 - '①' as u32 + 1);
        }
    }

    parse_kanji(raw)
}

fn parse_kanji(raw: &str) -> Option<u32> {
    match raw.split_once('十') {
        None => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => kanji_digit(c),
                _ => None,
            }
        }
        Some((tens, ones)) => {
            let tens = if tens.is_empty() { 1 } else { parse_kanji(tens)? };
            let ones = if ones.is_empty() { 0 } else { parse_kanji(ones)? };
            if tens > 9 || ones > 9 {
                return None;
            }
            Some(tens * 10 + ones)
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Renumbering and redistribution
// ═══════════════════════════════════════════════════════════

/// Renumber majors 1..k in order of appearance.
pub fn renumber(units: &mut [QuestionUnit]) {
    let mut next = 0;
    let mut previous: Option<u32> = None;
    for unit in units.iter_mut() {
        if previous != Some(unit.major_number) {
            previous = Some(unit.major_number);
            next += 1;
        }
        unit.major_number = next;
    }
}

/// Number of distinct majors in an already renumbered sequence.
pub fn group_count(units: &[QuestionUnit]) -> u32 {
    units.last().map_or(0, |u| u.major_number)
}

/// Fold a renumbered sequence with more than `max_major` groups into exactly
/// `max_major` (or fewer when `min_group_size` forces larger buckets).
pub fn redistribute(
    units: &mut [QuestionUnit],
    max_major: u32,
    min_group_size: usize,
    policy: RedistributionPolicy,
) {
    if max_major == 0 || group_count(units) <= max_major {
        return;
    }

    match policy {
        RedistributionPolicy::EvenUnits => {
            let bucket_size = min_group_size.max(units.len() / max_major as usize).max(1);
            let last_bucket = max_major as usize - 1;
            for (i, unit) in units.iter_mut().enumerate() {
                unit.major_number = ((i / bucket_size).min(last_bucket) + 1) as u32;
            }
        }
        RedistributionPolicy::MergeOverflow => {
            for unit in units.iter_mut() {
                unit.major_number = unit.major_number.min(max_major);
            }
        }
    }
}

/// Suffix repeated minor labels within one major with `_2`, `_3`, ...
pub fn disambiguate_labels(units: &mut [QuestionUnit]) {
    let mut seen: HashMap<(u32, String), u32> = HashMap::new();
    for unit in units.iter_mut() {
        let Some(label) = unit.minor_label.as_ref() else {
            continue;
        };
        let count = seen
            .entry((unit.major_number, label.clone()))
            .and_modify(|n| *n += 1)
            .or_insert(1);
        if *count > 1 {
            unit.minor_label = Some(format!("{label}_{count}"));
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
