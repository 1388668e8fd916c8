//! Question annotations: answer format, referenced resources and the
//! current-affairs flag. All matching runs on width-folded text.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{QuestionFormat, ResourceKind};

struct FormatPattern {
    regex: Regex,
    format: QuestionFormat,
}

struct ResourcePattern {
    regex: Regex,
    kind: ResourceKind,
}

fn format(regex_str: &str, format: QuestionFormat) -> FormatPattern {
    FormatPattern {
        regex: Regex::new(regex_str).expect("Invalid format regex"),
        format,
    }
}

fn resource(regex_str: &str, kind: ResourceKind) -> ResourcePattern {
    ResourcePattern {
        regex: Regex::new(regex_str).expect("Invalid resource regex"),
        kind,
    }
}

/// First match wins, so narrower formats come first.
static FORMAT_PATTERNS: LazyLock<Vec<FormatPattern>> = LazyLock::new(|| {
    vec![
        format(r"組み合わせ", QuestionFormat::Combination),
        format(
            r"(説明しなさい|論じなさい|述べなさい|理由を.+書きなさい|\d+字(以内|程度|以上))",
            QuestionFormat::Descriptive,
        ),
        format(
            r"(空欄|空所|空らん|に当てはまる|にあてはまる|\(\s*\)|〔\s*〕|\[\s*\])",
            QuestionFormat::FillInBlank,
        ),
        format(
            r"(選びなさい|選択肢|選べ|ア\s*~?\s*エ|次の.+から.+選)",
            QuestionFormat::MultipleChoice,
        ),
        format(r"(正しい|正しければ|誤り|誤って|○×|正誤)", QuestionFormat::TrueFalse),
        format(r"(答えなさい|書きなさい|答えよ)", QuestionFormat::ShortAnswer),
    ]
});

static RESOURCE_PATTERNS: LazyLock<Vec<ResourcePattern>> = LazyLock::new(|| {
    vec![
        resource(r"(地図|地形図|分布図|白地図|路線図|雨温図)", ResourceKind::Map),
        resource(r"(グラフ|折れ線|棒グラフ|円グラフ|帯グラフ)", ResourceKind::Graph),
        resource(r"(年表|時系列)", ResourceKind::Timeline),
        resource(r"(表\d+|次の表|統計|一覧)", ResourceKind::Table),
        resource(r"(写真|画像|図版)", ResourceKind::Photo),
        resource(r"(史料|資料\d+|条文|憲章|文書)", ResourceKind::Document),
    ]
});

static RECENT_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"20[2-9]\d年").expect("Invalid year regex"));

/// Topical vocabulary, already folded.
const CURRENT_AFFAIRS_TERMS: &[&str] = &[
    "sdgs",
    "持続可能",
    "気候変動",
    "温暖化",
    "カーボンニュートラル",
    "コロナ",
    "パンデミック",
    "ワクチン",
    "オリンピック",
    "パラリンピック",
    "人工知能",
    "デジタル",
    "sns",
    "少子高齢化",
    "人口減少",
    "働き方改革",
    "ジェンダー",
    "多様性",
    "ウクライナ",
    "ミサイル",
    "憲法改正",
    "防災",
    "復興",
    "豪雨",
];

pub fn detect_format(folded: &str) -> QuestionFormat {
    FORMAT_PATTERNS
        .iter()
        .find(|p| p.regex.is_match(folded))
        .map_or(QuestionFormat::Other, |p| p.format)
}

/// Resource kinds referenced by the text, in a fixed order, without repeats.
pub fn detect_resources(folded: &str) -> Vec<ResourceKind> {
    RESOURCE_PATTERNS
        .iter()
        .filter(|p| p.regex.is_match(folded))
        .map(|p| p.kind)
        .collect()
}

pub fn is_current_affairs(folded: &str) -> bool {
    RECENT_YEAR.is_match(folded) || CURRENT_AFFAIRS_TERMS.iter().any(|t| folded.contains(t))
}
