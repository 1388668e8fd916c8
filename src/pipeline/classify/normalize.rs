//! Width and case folding for OCR text.
//!
//! Full-width ASCII becomes ASCII, the ideographic space becomes a space,
//! ASCII letters are lowercased and half-width katakana is widened (with
//! voiced marks composed). Nothing else is touched: no stemming, no kana
//! conversion between scripts.

/// Full-width forms of U+FF61..=U+FF9F, in code point order.
const HALF_WIDTH_KATAKANA: &str = "。「」、・ヲァィゥェォャュョッーアイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワン゛゜";

const HALF_WIDTH_START: u32 = 0xFF61;
const HALF_VOICED_MARK: char = '\u{FF9E}';
const HALF_SEMI_VOICED_MARK: char = '\u{FF9F}';

pub fn fold_width(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            HALF_VOICED_MARK => {
                if let Some(voiced) = out.chars().last().and_then(voiced) {
                    out.pop();
                    out.push(voiced);
                } else {
                    out.push('゛');
                }
            }
            HALF_SEMI_VOICED_MARK => {
                if let Some(semi) = out.chars().last().and_then(semi_voiced) {
                    out.pop();
                    out.push(semi);
                } else {
                    out.push('゜');
                }
            }
            '\u{FF61}'..='\u{FF9D}' => {
                let index = (c as u32 - HALF_WIDTH_START) as usize;
                out.extend(HALF_WIDTH_KATAKANA.chars().nth(index));
            }
            '\u{FF01}'..='\u{FF5E}' => {
                let ascii = char::from_u32(c as u32 - 0xFEE0).unwrap_or(c);
                out.push(ascii.to_ascii_lowercase());
            }
            '\u{3000}' => out.push(' '),
            _ => out.push(c.to_ascii_lowercase()),
        }
    }
    out
}

/// Number of chars in a string (not bytes).
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Kana whose voiced form is the next code point.
const VOICEABLE: &str = "カキクケコサシスセソタチツテトハヒフヘホ";
/// Kana whose semi-voiced form is two code points on.
const SEMI_VOICEABLE: &str = "ハヒフヘホ";

fn voiced(c: char) -> Option<char> {
    if c == 'ウ' {
        return Some('ヴ');
    }
    if VOICEABLE.contains(c) {
        return char::from_u32(c as u32 + 1);
    }
    None
}

fn semi_voiced(c: char) -> Option<char> {
    if SEMI_VOICEABLE.contains(c) {
        return char::from_u32(c as u32 + 2);
    }
    None
}
