//! Builtin keyword model.
//!
//! Tables are curated from past entrance-exam social-studies papers. Bump
//! `BUILTIN_VERSION` whenever a weight, entry or rule changes so reports can
//! be traced back to the tables that produced them.

use std::collections::BTreeMap;

use crate::models::Field;
use crate::pipeline::error::ConfigError;

use super::{CompositeRule, CuratedEntry, KeywordModel, OverrideRule, Predicate, WeightedKeyword};

pub const BUILTIN_VERSION: &str = "builtin-2024.5";

/// Era names without the 時代 suffix, oldest first.
pub const ERAS: &[&str] = &[
    "縄文", "弥生", "古墳", "飛鳥", "奈良", "平安", "鎌倉", "室町", "戦国", "安土桃山", "江戸",
    "明治", "大正", "昭和", "平成", "令和",
];

/// Well-known temples and monastic centres.
pub const TEMPLES: &[&str] = &[
    "延暦寺", "東大寺", "法隆寺", "薬師寺", "平等院", "金閣寺", "銀閣寺", "清水寺", "唐招提寺",
    "興福寺", "東寺", "中尊寺", "比叡山", "高野山",
];

/// Building-type markers used with an era to form a composite temple theme.
const SACRED_BUILDINGS: &[&str] = &[
    "寺院", "神社", "大仏", "五重塔", "仏閣", "伽藍", "仏堂", "延暦寺", "東大寺", "法隆寺",
    "薬師寺", "平等院", "金閣寺", "銀閣寺", "中尊寺", "興福寺",
];

const DYNASTIES: &[&str] = &["殷", "秦", "漢", "隋", "唐", "宋"];

const GEOGRAPHY: &[(&str, f32)] = &[
    ("地図", 2.0),
    ("地形", 2.0),
    ("地形図", 3.0),
    ("雨温図", 3.0),
    ("気候", 2.0),
    ("産業", 1.0),
    ("人口", 1.0),
    ("都市", 1.0),
    ("農業", 2.0),
    ("工業", 2.0),
    ("貿易", 1.0),
    ("資源", 1.0),
    ("平野", 2.0),
    ("山地", 2.0),
    ("山脈", 2.0),
    ("盆地", 2.0),
    ("半島", 2.0),
    ("海流", 2.0),
    ("緯度", 2.0),
    ("経度", 2.0),
    ("標高", 2.0),
    ("漁業", 2.0),
    ("林業", 2.0),
    ("畜産", 2.0),
    ("野菜", 1.0),
    ("果物", 1.0),
    ("工業地帯", 2.0),
    ("港", 1.0),
    ("空港", 1.0),
    ("新幹線", 1.0),
    ("観光", 1.0),
    ("地方", 1.0),
    ("地方自治", -2.0),
    ("北海道", 2.0),
    ("東北地方", 2.0),
    ("関東地方", 2.0),
    ("中部地方", 2.0),
    ("近畿地方", 2.0),
    ("中国地方", 2.0),
    ("四国地方", 2.0),
    ("九州地方", 2.0),
    ("アジア", 1.0),
    ("ヨーロッパ", 1.0),
    ("アフリカ", 1.0),
    ("北アメリカ", 1.0),
    ("南アメリカ", 1.0),
    ("オセアニア", 1.0),
];

const HISTORY: &[(&str, f32)] = &[
    ("時代", 1.0),
    ("世紀", 1.0),
    ("歴史", 1.0),
    ("幕府", 2.0),
    ("天皇", 2.0),
    ("将軍", 2.0),
    ("上皇", 2.0),
    ("藩", 1.0),
    ("武士", 2.0),
    ("貴族", 1.0),
    ("の乱", 2.0),
    ("本能寺の変", 2.0),
    ("桜田門外の変", 2.0),
    ("事変", 2.0),
    ("文永の役", 2.0),
    ("弘安の役", 2.0),
    ("西南戦争", 2.0),
    ("の戦い", 2.0),
    ("維新", 2.0),
    ("開国", 2.0),
    ("鎖国", 2.0),
    ("遣唐使", 2.0),
    ("遣隋使", 2.0),
    ("王朝", 2.0),
    ("世界大戦", 2.0),
    ("太平洋戦争", 2.0),
    ("織田信長", 3.0),
    ("豊臣秀吉", 3.0),
    ("徳川家康", 3.0),
    ("源頼朝", 3.0),
    ("聖徳太子", 3.0),
    ("足利", 2.0),
    ("北条", 2.0),
    ("藤原", 2.0),
    // cancels the bare dynasty 漢 in 「漢字で答えなさい」
    ("漢字", -2.0),
];

const CIVICS: &[(&str, f32)] = &[
    ("憲法", 3.0),
    ("国会", 3.0),
    ("内閣", 3.0),
    ("選挙", 3.0),
    ("裁判所", 3.0),
    ("三権分立", 3.0),
    ("衆議院", 3.0),
    ("参議院", 3.0),
    ("地方自治", 3.0),
    ("首相", 2.0),
    ("大臣", 2.0),
    ("議員", 2.0),
    ("政党", 2.0),
    ("司法", 2.0),
    ("立法", 2.0),
    ("行政", 2.0),
    ("権利", 2.0),
    ("主権", 2.0),
    ("民主", 2.0),
    ("税金", 2.0),
    ("消費税", 2.0),
    ("予算", 2.0),
    ("財政", 2.0),
    ("金融", 2.0),
    ("社会保障", 2.0),
    ("国際連合", 2.0),
    ("国連", 2.0),
    ("義務", 1.0),
    ("経済", 1.0),
    ("外交", 1.0),
];

/// (entity, theme, field) pairs. Longest entity wins at lookup time.
const CURATED: &[(&str, &str, Field)] = &[
    // events
    ("建武の新政", "建武の新政の内容", Field::History),
    ("大化の改新", "大化の改新の内容", Field::History),
    ("鎌倉幕府", "鎌倉幕府の成立", Field::History),
    ("室町幕府", "室町幕府の成立", Field::History),
    ("江戸幕府", "江戸幕府の成立", Field::History),
    ("承久の乱", "承久の乱の経過", Field::History),
    ("応仁の乱", "応仁の乱の影響", Field::History),
    ("本能寺の変", "本能寺の変の経過", Field::History),
    ("関ヶ原の戦い", "関ヶ原の戦いの結果", Field::History),
    ("明治維新", "明治維新の改革", Field::History),
    ("太平洋戦争", "太平洋戦争の経過", Field::History),
    ("日露戦争", "日露戦争の結果", Field::History),
    ("第一次世界大戦", "第一次世界大戦の影響", Field::History),
    ("満州事変", "満州事変の経過", Field::History),
    ("高度経済成長", "高度経済成長の特徴", Field::History),
    ("アヘン戦争", "アヘン戦争の影響", Field::History),
    ("日独伊三国同盟", "日独伊三国同盟の成立", Field::History),
    // policies and documents
    ("上米の制", "上米の制の内容", Field::History),
    ("楽市楽座", "楽市楽座の政策", Field::History),
    ("刀狩", "刀狩の目的", Field::History),
    ("太閤検地", "太閤検地の実施", Field::History),
    ("鎖国", "鎖国政策の影響", Field::History),
    ("墾田永年私財法", "墾田永年私財法の内容", Field::History),
    ("ポツダム宣言", "ポツダム宣言の内容", Field::History),
    ("日米安全保障条約", "日米安全保障条約の内容", Field::History),
    // persons
    ("源頼朝", "源頼朝の業績", Field::History),
    ("源義経", "源義経の生涯", Field::History),
    ("平清盛", "平清盛の政治", Field::History),
    ("足利尊氏", "足利尊氏の政権", Field::History),
    ("足利義満", "足利義満の政治", Field::History),
    ("織田信長", "織田信長の統一事業", Field::History),
    ("豊臣秀吉", "豊臣秀吉の政策", Field::History),
    ("徳川家康", "徳川家康の統治", Field::History),
    ("徳川家光", "徳川家光の政策", Field::History),
    ("徳川吉宗", "徳川吉宗の改革", Field::History),
    ("田沼意次", "田沼意次の政治", Field::History),
    ("松平定信", "松平定信の改革", Field::History),
    ("水野忠邦", "水野忠邦の改革", Field::History),
    ("西郷隆盛", "西郷隆盛の功績", Field::History),
    ("大久保利通", "大久保利通の政策", Field::History),
    ("伊藤博文", "伊藤博文の政治", Field::History),
    ("板垣退助", "板垣退助の自由民権運動", Field::History),
    ("大隈重信", "大隈重信の政党政治", Field::History),
    ("福沢諭吉", "福沢諭吉の思想", Field::History),
    ("聖徳太子", "聖徳太子の政治", Field::History),
    ("中大兄皇子", "中大兄皇子の改革", Field::History),
    ("聖武天皇", "聖武天皇の政治", Field::History),
    ("桓武天皇", "桓武天皇の政策", Field::History),
    ("藤原道長", "藤原道長の摂関政治", Field::History),
    ("白河上皇", "白河上皇の院政", Field::History),
    ("後白河上皇", "後白河上皇の院政", Field::History),
    ("北条時宗", "北条時宗の政治", Field::History),
    ("北条泰時", "北条泰時の政策", Field::History),
    ("鑑真", "鑑真の時代", Field::History),
    // culture
    ("延暦寺", "延暦寺の歴史", Field::History),
    ("伊勢物語", "伊勢物語の成立", Field::History),
    ("枕草子", "平安時代の文学", Field::History),
    ("源氏物語", "平安時代の文学", Field::History),
    ("古今和歌集", "平安時代の和歌", Field::History),
    ("万葉集", "奈良時代の和歌", Field::History),
    ("日本書紀", "奈良時代の歴史書", Field::History),
    ("古事記", "奈良時代の歴史書", Field::History),
    ("正倉院", "正倉院と医薬", Field::History),
    ("関東大震災", "関東大震災の被害", Field::History),
    // geography
    ("阪神・淡路大震災", "阪神・淡路大震災の被害", Field::Geography),
    ("東日本大震災", "東日本大震災の影響", Field::Geography),
    ("青函トンネル", "青函トンネルの役割", Field::Geography),
    ("瀬戸大橋", "瀬戸大橋の建設", Field::Geography),
    ("明石海峡大橋", "明石海峡大橋の構造", Field::Geography),
    ("東海道新幹線", "東海道新幹線の発展", Field::Geography),
    ("半導体", "半導体産業の発展", Field::Geography),
    ("プラスチック製品", "プラスチック製品の生産", Field::Geography),
    ("阪神工業地帯", "阪神工業地帯の特徴", Field::Geography),
    ("関西国際空港", "大阪府の地理", Field::Geography),
    ("大阪・関西万博", "大阪・関西万博", Field::Geography),
    ("地形図", "地形図の読み取り", Field::Geography),
    ("雨温図", "雨温図の読み取り", Field::Geography),
    ("三大都市圏", "三大都市圏", Field::Geography),
    // civics
    ("日本国憲法", "日本国憲法の三原則", Field::Civics),
    ("三権分立", "三権分立の仕組み", Field::Civics),
    ("議院内閣制", "議院内閣制の特徴", Field::Civics),
    ("地方自治", "地方自治の仕組み", Field::Civics),
    ("選挙制度", "選挙制度の仕組み", Field::Civics),
    ("地方交付税", "地方交付税の仕組み", Field::Civics),
    ("ストライキ", "ストライキの権利", Field::Civics),
    ("人口ピラミッド", "人口ピラミッドの分析", Field::Civics),
    ("国際連合", "国連の役割", Field::Civics),
    ("核兵器禁止条約", "核兵器禁止条約の内容", Field::Civics),
    ("NPT", "核不拡散条約の内容", Field::Civics),
    ("NATO", "NATOの役割", Field::Civics),
    ("欧州連合", "EUの仕組み", Field::Civics),
    ("ASEAN", "ASEANの役割", Field::Civics),
    ("TPP", "TPPの内容", Field::Civics),
    ("空き家", "空き家問題の現状", Field::Civics),
    ("少子高齢化", "少子高齢化の影響", Field::Civics),
    ("男女共同参画", "男女共同参画社会の推進", Field::Civics),
    ("SDGs", "SDGsの目標", Field::Civics),
    ("持続可能な開発", "持続可能な開発目標", Field::Civics),
    ("地球温暖化", "地球温暖化の対策", Field::Civics),
    ("気候変動", "気候変動の影響", Field::Civics),
    ("再生可能エネルギー", "再生可能エネルギーの活用", Field::Civics),
    ("消費税", "消費税の仕組み", Field::Civics),
    ("社会保障", "社会保障制度", Field::Civics),
];

fn table(entries: &[(&str, f32)]) -> Vec<WeightedKeyword> {
    entries
        .iter()
        .map(|(term, weight)| WeightedKeyword::new(*term, *weight))
        .collect()
}

fn strings(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|t| t.to_string()).collect()
}

fn curated() -> Vec<CuratedEntry> {
    let mut entries: Vec<CuratedEntry> = CURATED
        .iter()
        .map(|(entity, theme, field)| CuratedEntry {
            entity: entity.to_string(),
            theme: theme.to_string(),
            field: *field,
        })
        .collect();
    entries.extend(ERAS.iter().map(|era| CuratedEntry {
        entity: format!("{era}時代"),
        theme: format!("{era}時代の特徴"),
        field: Field::History,
    }));
    entries
}

fn overrides() -> Vec<OverrideRule> {
    vec![
        OverrideRule {
            name: "sacred_sites".into(),
            predicate: Predicate::AnyOf {
                terms: strings(&["寺院", "神社", "仏教", "大仏", "五重塔", "仏像", "僧", "寺"]),
            },
            field: Field::History,
            bonus: 5.0,
        },
        OverrideRule {
            name: "named_era".into(),
            predicate: Predicate::AnyOf {
                terms: ERAS.iter().map(|era| format!("{era}時代")).collect(),
            },
            field: Field::History,
            bonus: 3.0,
        },
        OverrideRule {
            name: "separation_of_powers".into(),
            predicate: Predicate::AtLeast {
                terms: strings(&["三権分立", "国会", "内閣", "裁判所", "衆議院", "参議院"]),
                count: 2,
            },
            field: Field::Civics,
            bonus: 5.0,
        },
        OverrideRule {
            name: "map_reading".into(),
            predicate: Predicate::AnyOf {
                terms: strings(&["地形図", "雨温図", "等高線", "地図記号"]),
            },
            field: Field::Geography,
            bonus: 5.0,
        },
    ]
}

fn composite(name: &str, terms: &[&str], count: usize, theme: &str, field: Field) -> CompositeRule {
    CompositeRule {
        name: name.into(),
        predicate: Predicate::AtLeast {
            terms: strings(terms),
            count,
        },
        theme: theme.into(),
        field,
    }
}

fn composites() -> Vec<CompositeRule> {
    vec![
        CompositeRule {
            name: "era_sacred_building".into(),
            predicate: Predicate::Cooccur {
                groups: vec![strings(ERAS), strings(SACRED_BUILDINGS)],
            },
            theme: "{0}時代の寺院".into(),
            field: Field::History,
        },
        composite("temple_cluster", TEMPLES, 2, "日本の中世の寺院", Field::History),
        composite(
            "industry_cluster",
            &["半導体", "鉄鋼", "自動車", "電子機器", "石油化学", "プラスチック"],
            2,
            "日本の工業の特徴",
            Field::Geography,
        ),
        composite(
            "population_statistics",
            &["人口ピラミッド", "合計特殊出生率", "高齢化率", "年少人口", "生産年齢人口"],
            2,
            "人口統計の分析",
            Field::Civics,
        ),
        composite(
            "classical_literature",
            &["伊勢物語", "源氏物語", "竹取物語", "平家物語"],
            2,
            "日本の古典文学",
            Field::History,
        ),
        composite("chinese_dynasties", DYNASTIES, 2, "中国の王朝", Field::History),
        composite(
            "buddhist_monks",
            &["栄西", "道元", "日蓮", "法然", "親鸞", "最澄", "空海"],
            2,
            "日本の仏教宗派",
            Field::History,
        ),
        composite(
            "modern_asia",
            &["韓国併合", "五・四運動", "二十一か条の要求", "柳条湖事件"],
            2,
            "近現代アジア史の出来事",
            Field::History,
        ),
        composite(
            "modern_world",
            &["ヴェルサイユ条約", "ワシントン会議", "ロカルノ条約", "国際連盟", "大西洋憲章"],
            2,
            "近現代世界史の出来事",
            Field::History,
        ),
    ]
}

fn dated(name: &str, terms: &[&str], theme: &str, field: Field) -> CompositeRule {
    CompositeRule {
        name: name.into(),
        predicate: Predicate::AnyOf {
            terms: strings(terms),
        },
        theme: theme.into(),
        field,
    }
}

/// Event words qualified by the year they appear with. First match wins.
fn dated_rules() -> Vec<CompositeRule> {
    vec![
        dated("olympics", &["オリンピック", "五輪"], "{year}年のオリンピック", Field::History),
        dated("expo", &["万博", "博覧会"], "{year}年の万博", Field::Geography),
        dated("election", &["選挙"], "{year}年の選挙", Field::Civics),
        dated("treaty", &["条約"], "{year}年の条約", Field::History),
        dated("war", &["戦争", "大戦"], "{year}年の戦争", Field::History),
    ]
}

impl KeywordModel {
    /// The versioned default tables, validated and folded.
    pub fn builtin() -> Result<Self, ConfigError> {
        let mut fields = BTreeMap::new();
        fields.insert(Field::Geography, table(GEOGRAPHY));
        fields.insert(Field::History, table(HISTORY));
        fields.insert(Field::Civics, table(CIVICS));

        if let Some(history) = fields.get_mut(&Field::History) {
            for era in ERAS {
                history.push(WeightedKeyword::new(*era, 3.0));
            }
            for dynasty in DYNASTIES {
                history.push(WeightedKeyword::new(*dynasty, 2.0));
            }
            // 時代 recurs in most history prose; let a few mentions count.
            if let Some(jidai) = history.iter_mut().find(|k| k.term == "時代") {
                jidai.cap = Some(3);
            }
        }

        KeywordModel {
            version: BUILTIN_VERSION.into(),
            fields,
            overrides: overrides(),
            curated: curated(),
            composites: composites(),
            dated: dated_rules(),
        }
        .prepare()
    }
}
