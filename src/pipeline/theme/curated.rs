use crate::models::Field;
use crate::pipeline::keywords::{CompositeRule, CuratedEntry, KeywordModel};

/// First composite rule that holds for `folded`, rendered.
pub fn match_composite(model: &KeywordModel, folded: &str) -> Option<String> {
    first_rendered(&model.composites, folded, "Composite theme matched")
}

/// First year-qualified rule that holds for `folded`, rendered.
pub fn match_dated(model: &KeywordModel, folded: &str) -> Option<String> {
    first_rendered(&model.dated, folded, "Dated theme matched")
}

fn first_rendered(rules: &[CompositeRule], folded: &str, message: &str) -> Option<String> {
    rules.iter().find_map(|rule| {
        let theme = rule.render(folded)?;
        tracing::debug!(rule = %rule.name, theme = %theme, "{}", message);
        Some(theme)
    })
}

/// Longest curated entity present in `folded`.
///
/// The unit's own field is searched first. Other fields are a second pass, so
/// a misclassified unit still gets its curated theme. `Unknown` searches all.
pub fn match_curated<'a>(
    model: &'a KeywordModel,
    field: Field,
    folded: &str,
) -> Option<&'a CuratedEntry> {
    if field != Field::Unknown {
        if let Some(entry) = longest(model.curated.iter().filter(|e| e.field == field), folded) {
            return Some(entry);
        }
    }
    longest(model.curated.iter().filter(|e| e.field != field), folded)
}

fn longest<'a>(
    entries: impl Iterator<Item = &'a CuratedEntry>,
    folded: &str,
) -> Option<&'a CuratedEntry> {
    let mut best: Option<&CuratedEntry> = None;
    for entry in entries.filter(|e| folded.contains(e.entity.as_str())) {
        let len = entry.entity.chars().count();
        if best.map_or(true, |b| len > b.entity.chars().count()) {
            best = Some(entry);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> KeywordModel {
        KeywordModel::builtin().unwrap()
    }

    #[test]
    fn longest_entity_wins() {
        let model = model();
        let entry = match_curated(&model, Field::History, "後白河上皇の院政について").unwrap();
        assert_eq!(entry.theme, "後白河上皇の院政");
    }

    #[test]
    fn own_field_is_searched_first() {
        let model = model();
        // 地方自治 is curated under civics, 地形図 under geography
        let entry = match_curated(&model, Field::Geography, "地方自治と地形図").unwrap();
        assert_eq!(entry.theme, "地形図の読み取り");
    }

    #[test]
    fn other_fields_are_a_second_pass() {
        let model = model();
        let entry = match_curated(&model, Field::Geography, "日本国憲法の前文").unwrap();
        assert_eq!(entry.field, Field::Civics);
        assert_eq!(entry.theme, "日本国憲法の三原則");
    }

    #[test]
    fn unknown_field_searches_everything() {
        let model = model();
        let entry = match_curated(&model, Field::Unknown, "鎌倉幕府の成立").unwrap();
        assert_eq!(entry.theme, "鎌倉幕府の成立");
    }

    #[test]
    fn no_entity_no_match() {
        assert!(match_curated(&model(), Field::History, "つぎのもんだい").is_none());
    }

    #[test]
    fn composite_era_and_temple() {
        let model = model();
        let theme = match_composite(&model, "鎌倉時代に建てられた寺院について").unwrap();
        assert_eq!(theme, "鎌倉時代の寺院");
    }

    #[test]
    fn composite_dynasties_need_two() {
        let model = model();
        assert!(match_composite(&model, "唐の都").is_none());
        let theme = match_composite(&model, "隋と唐の制度").unwrap();
        assert_eq!(theme, "中国の王朝");
    }

    #[test]
    fn dated_event_takes_the_year() {
        let model = model();
        assert_eq!(
            match_dated(&model, "1964年の東京オリンピックについて").as_deref(),
            Some("1964年のオリンピック")
        );
        assert_eq!(
            match_dated(&model, "2024年に行われた衆議院議員選挙").as_deref(),
            Some("2024年の選挙")
        );
    }

    #[test]
    fn dated_rules_need_a_year() {
        let model = model();
        assert!(match_dated(&model, "東京オリンピックの開催").is_none());
        assert!(match_dated(&model, "1964年の新幹線開業").is_none());
    }
}
