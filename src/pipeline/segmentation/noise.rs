/// Answer-sheet furniture that shows up in OCR output but is never a question.
const ANSWER_SHEET_WORDS: &[&str] = &["解答用紙", "受験番号", "採点欄", "氏名", "得点", "配点"];

/// Chars a unit must keep once answer-sheet words are removed.
const MIN_CONTENT_CHARS: usize = 10;

/// True if the unit is too short or is mostly answer-sheet furniture.
pub fn is_noise(text: &str, min_unit_chars: usize) -> bool {
    let trimmed = text.trim();
    if trimmed.chars().count() < min_unit_chars {
        return true;
    }
    if !ANSWER_SHEET_WORDS.iter().any(|w| trimmed.contains(w)) {
        return false;
    }
    let mut remainder = trimmed.to_string();
    for word in ANSWER_SHEET_WORDS {
        remainder = remainder.replace(word, "");
    }
    remainder.chars().filter(|c| !c.is_whitespace()).count() < MIN_CONTENT_CHARS
}
