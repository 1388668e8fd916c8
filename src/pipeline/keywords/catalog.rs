//! Optional terms catalog.
//!
//! A field → term list produced out of band. It only biases fallback theme
//! ranking, so a missing or broken catalog degrades to heuristics alone.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::models::Field;
use crate::pipeline::classify::normalize::fold_width;
use crate::pipeline::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermsCatalog {
    terms: BTreeMap<Field, BTreeSet<String>>,
}

impl TermsCatalog {
    pub fn from_terms<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Field, S)>,
        S: AsRef<str>,
    {
        let mut terms: BTreeMap<Field, BTreeSet<String>> = BTreeMap::new();
        for (field, term) in entries {
            let folded = fold_width(term.as_ref().trim());
            if !folded.is_empty() {
                terms.entry(field).or_default().insert(folded);
            }
        }
        Self { terms }
    }

    /// Parse `{ "geography": [...], "history": [...], "civics": [...] }`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: BTreeMap<Field, Vec<String>> = serde_json::from_str(json)?;
        Ok(Self::from_terms(raw.into_iter().flat_map(|(field, list)| {
            list.into_iter().map(move |term| (field, term))
        })))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::from_json(&json)
    }

    /// Load the catalog if it is there and readable. Never an error.
    pub fn load_optional(path: &Path) -> Option<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "No terms catalog, using heuristics only");
            return None;
        }
        match Self::from_file(path) {
            Ok(catalog) => {
                tracing::info!(
                    path = %path.display(),
                    terms = catalog.len(),
                    "Loaded terms catalog"
                );
                Some(catalog)
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Ignoring unreadable terms catalog"
                );
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.terms.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `term` is catalogued under `field`. `Unknown` checks every field.
    pub fn contains(&self, field: Field, term: &str) -> bool {
        match field {
            Field::Unknown => self.terms.values().any(|set| set.contains(term)),
            _ => self.terms.get(&field).is_some_and(|set| set.contains(term)),
        }
    }

    /// Catalogued terms of `field` occurring in `text`, in catalog order.
    pub fn terms_in<'a>(&'a self, field: Field, text: &str) -> Vec<&'a str> {
        let mut hits = Vec::new();
        for (f, set) in &self.terms {
            if field != Field::Unknown && *f != field {
                continue;
            }
            hits.extend(
                set.iter()
                    .filter(|term| text.contains(term.as_str()))
                    .map(String::as_str),
            );
        }
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn make_catalog() -> TermsCatalog {
        TermsCatalog::from_json(
            r#"{"history": ["墾田永年私財法", "班田収授法"], "geography": ["扇状地"], "civics": []}"#,
        )
        .unwrap()
    }

    #[test]
    fn parses_field_keyed_json() {
        let catalog = make_catalog();
        assert_eq!(catalog.len(), 3);
        assert!(catalog.contains(Field::History, "班田収授法"));
        assert!(!catalog.contains(Field::Geography, "班田収授法"));
        assert!(catalog.contains(Field::Unknown, "扇状地"));
    }

    #[test]
    fn terms_in_text_are_field_scoped() {
        let catalog = make_catalog();
        let text = "班田収授法と扇状地";
        assert_eq!(catalog.terms_in(Field::History, text), vec!["班田収授法"]);
        assert_eq!(catalog.terms_in(Field::Unknown, text).len(), 2);
    }

    #[test]
    fn blank_terms_are_skipped() {
        let catalog = TermsCatalog::from_terms([(Field::Civics, " "), (Field::Civics, "国民審査")]);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn missing_file_degrades_to_none() {
        assert!(TermsCatalog::load_optional(Path::new("/nonexistent/terms.json")).is_none());
    }

    #[test]
    fn malformed_file_degrades_to_none() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(TermsCatalog::load_optional(file.path()).is_none());
    }

    #[test]
    fn valid_file_loads() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"geography": ["扇状地", "三角州"]}}"#).unwrap();
        let catalog = TermsCatalog::load_optional(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(!catalog.is_empty());
    }
}
