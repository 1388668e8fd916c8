//! Invalid-theme filter.
//!
//! Applied to every produced theme, curated or fallback. A rejected theme
//! never reaches statistics or reports.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::RejectReason;

/// Tokens that only point at something else in the paper.
static REFERENCE_TOKENS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(下線部|傍線部|波線部|点線部|下線|傍線|空欄|空らん|空所|について|に関して|に関する|設問\d*|問\d*|[①-⑳]|[（(【\[［〔]\s*[ア-ンあ-おa-zA-Z0-9０-９]?\s*[）)】\]］〕]|\d+)",
    )
    .expect("Invalid reference token regex")
});

/// Phrases that are well-formed but carry no topic.
static GENERIC_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^(内容|特徴|理由|原因|結果|影響|意味|目的|説明|記号|語句|名前|人物|時期|場所)$",
        r"^(にあてはまる|あてはまる|答えなさい|選びなさい|として)$",
        r"^.{1,3}(として|の仕組み|の説明|の内容)$",
        r"^(空欄補充|穴埋め|選択肢|以下のうち|次のうち)$",
        r"^\d+字(以上|以内|程度)",
        r"^次の(図|グラフ|資料|写真|地図|表|文章|文)$",
        r"(下線|傍線|波線|点線|空欄|空所|空らん|設問|問\d+)",
        r"^(この|その|当時の|同年|その後|それ以降|以前|以後|同時期)",
        r"^この(県|府|道|都|地方|地域|国)",
        r"^[A-Z](国|地点|地域|都市|県)",
        r"^具体的な",
        r"(なさい|答えよ|選べ|述べよ)$",
        r"。",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid generic phrase regex"))
    .collect()
});

/// Why `theme` is not a genuine topic, or `None` if it is acceptable.
pub fn reject_reason(theme: &str, min_chars: usize) -> Option<RejectReason> {
    let trimmed = theme.trim();
    if trimmed.is_empty() {
        return Some(RejectReason::Empty);
    }

    let remainder = REFERENCE_TOKENS.replace_all(trimmed, "");
    if remainder
        .chars()
        .all(|c| c.is_whitespace() || !c.is_alphanumeric())
    {
        return Some(RejectReason::ReferenceMarkerOnly);
    }

    if trimmed.chars().count() < min_chars {
        return Some(RejectReason::TooShort);
    }

    if GENERIC_PATTERNS.iter().any(|p| p.is_match(trimmed)) {
        return Some(RejectReason::GenericPhrase);
    }

    None
}
