//! Keyword model: the data that drives field scoring and theme extraction.
//!
//! A `KeywordModel` is plain data. It is loaded once (builtin tables, JSON
//! string or file), validated, width-folded, and then shared read-only by
//! every pipeline stage. Domain knowledge changes are edits to this data.

pub mod builtin;
pub mod catalog;

pub use catalog::TermsCatalog;

use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::Field;
use crate::pipeline::classify::normalize::fold_width;
use crate::pipeline::error::ConfigError;

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// Template slot filled with the first four-digit year in the text.
pub const YEAR_SLOT: &str = "{year}";

static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})年").expect("Invalid year regex"));

/// A field keyword. `cap` bounds how many occurrences count toward the score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedKeyword {
    pub term: String,
    pub weight: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap: Option<u32>,
}

impl WeightedKeyword {
    pub fn new(term: impl Into<String>, weight: f32) -> Self {
        Self {
            term: term.into(),
            weight,
            cap: None,
        }
    }

    pub fn capped(term: impl Into<String>, weight: f32, cap: u32) -> Self {
        Self {
            term: term.into(),
            weight,
            cap: Some(cap),
        }
    }
}

/// Condition evaluated against folded unit text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    /// Any one term occurs.
    AnyOf { terms: Vec<String> },
    /// At least `count` distinct terms occur.
    AtLeast { terms: Vec<String>, count: usize },
    /// Every group has at least one term occurring.
    Cooccur { groups: Vec<Vec<String>> },
}

impl Predicate {
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Self::AnyOf { terms } => terms.iter().any(|t| text.contains(t.as_str())),
            Self::AtLeast { terms, count } => {
                terms.iter().filter(|t| text.contains(t.as_str())).count() >= *count
            }
            Self::Cooccur { groups } => groups
                .iter()
                .all(|g| g.iter().any(|t| text.contains(t.as_str()))),
        }
    }

    /// Term groups addressable from a theme template (`{0}`, `{1}`, ...).
    pub fn groups(&self) -> Vec<&[String]> {
        match self {
            Self::AnyOf { terms } | Self::AtLeast { terms, .. } => vec![terms.as_slice()],
            Self::Cooccur { groups } => groups.iter().map(Vec::as_slice).collect(),
        }
    }

    /// Longest term of `group` present in `text`. Earlier terms win ties.
    pub fn longest_match<'a>(&'a self, group: usize, text: &str) -> Option<&'a str> {
        let terms: &'a [String] = *self.groups().get(group)?;
        let mut best: Option<&str> = None;
        for term in terms.iter().filter(|t| text.contains(t.as_str())) {
            if best.map_or(true, |b| term.chars().count() > b.chars().count()) {
                best = Some(term.as_str());
            }
        }
        best
    }

    fn is_empty(&self) -> bool {
        match self {
            Self::AnyOf { terms } => terms.iter().all(|t| t.is_empty()),
            Self::AtLeast { terms, count } => {
                *count == 0 || terms.iter().filter(|t| !t.is_empty()).count() < *count
            }
            Self::Cooccur { groups } => {
                groups.is_empty() || groups.iter().any(|g| g.iter().all(|t| t.is_empty()))
            }
        }
    }

    fn fold_terms(&mut self) {
        match self {
            Self::AnyOf { terms } | Self::AtLeast { terms, .. } => fold_all(terms),
            Self::Cooccur { groups } => groups.iter_mut().for_each(|g| fold_all(g)),
        }
    }
}

/// High-precision signal applied before plain summation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideRule {
    pub name: String,
    pub predicate: Predicate,
    pub field: Field,
    pub bonus: f32,
}

/// Entity name mapped to a canonical theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuratedEntry {
    pub entity: String,
    pub theme: String,
    pub field: Field,
}

/// Co-occurrence rule producing a theme more specific than any single entity.
///
/// `theme` may contain `{N}`, replaced by the longest term matched in group N,
/// and `{year}`, replaced by the first 「NNNN年」 in the text. A rule whose
/// template wants a year does not hold for text without one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeRule {
    pub name: String,
    pub predicate: Predicate,
    pub theme: String,
    pub field: Field,
}

impl CompositeRule {
    /// Render the theme for `text`, or `None` if the predicate does not hold.
    pub fn render(&self, text: &str) -> Option<String> {
        if !self.predicate.matches(text) {
            return None;
        }
        let mut theme = self.theme.clone();
        if theme.contains(YEAR_SLOT) {
            let year = YEAR.captures(text)?.get(1)?.as_str();
            theme = theme.replace(YEAR_SLOT, year);
        }
        for index in template_groups(&self.theme) {
            let term = self.predicate.longest_match(index, text).unwrap_or_default();
            theme = theme.replace(&format!("{{{index}}}"), term);
        }
        Some(theme)
    }
}

/// Versioned keyword tables, override rules, curated entries and composites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordModel {
    pub version: String,
    pub fields: BTreeMap<Field, Vec<WeightedKeyword>>,
    #[serde(default)]
    pub overrides: Vec<OverrideRule>,
    #[serde(default)]
    pub curated: Vec<CuratedEntry>,
    #[serde(default)]
    pub composites: Vec<CompositeRule>,
    /// Year-qualified rules, tried after the curated table.
    #[serde(default)]
    pub dated: Vec<CompositeRule>,
}

// ═══════════════════════════════════════════════════════════
// Loading
// ═══════════════════════════════════════════════════════════

impl KeywordModel {
    /// Validated, folded model from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let model: Self = serde_json::from_str(json)?;
        model.prepare()
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let model = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            version = %model.version,
            "Loaded keyword model"
        );
        Ok(model)
    }

    /// Validate, then fold every match term the same way unit text is folded.
    pub fn prepare(mut self) -> Result<Self, ConfigError> {
        self.validate()?;
        for keywords in self.fields.values_mut() {
            for keyword in keywords.iter_mut() {
                keyword.term = fold_width(&keyword.term);
            }
        }
        for rule in &mut self.overrides {
            rule.predicate.fold_terms();
        }
        for entry in &mut self.curated {
            entry.entity = fold_width(&entry.entity);
        }
        for rule in self.composites.iter_mut().chain(self.dated.iter_mut()) {
            rule.predicate.fold_terms();
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for field in Field::scored() {
            let keywords = self.fields.get(field).map(Vec::as_slice).unwrap_or(&[]);
            if keywords.is_empty() {
                return Err(ConfigError::EmptyKeywordTable(field.to_string()));
            }
        }

        for (field, keywords) in &self.fields {
            let mut seen = HashSet::new();
            for keyword in keywords {
                let folded = fold_width(keyword.term.trim());
                if folded.is_empty() {
                    return Err(ConfigError::EmptyTerm(field.to_string()));
                }
                if !seen.insert(folded) {
                    return Err(ConfigError::DuplicateTerm {
                        field: field.to_string(),
                        term: keyword.term.clone(),
                    });
                }
                if !keyword.weight.is_finite() {
                    return Err(ConfigError::InvalidWeight {
                        term: keyword.term.clone(),
                    });
                }
                if keyword.cap == Some(0) {
                    return Err(ConfigError::ZeroCap {
                        term: keyword.term.clone(),
                    });
                }
            }
        }

        for rule in &self.overrides {
            if rule.predicate.is_empty() {
                return Err(ConfigError::EmptyPredicate(rule.name.clone()));
            }
            if !rule.bonus.is_finite() {
                return Err(ConfigError::InvalidWeight {
                    term: rule.name.clone(),
                });
            }
        }

        for entry in &self.curated {
            if entry.entity.trim().is_empty() {
                return Err(ConfigError::IncompleteCuratedEntry("entity"));
            }
            if entry.theme.trim().is_empty() {
                return Err(ConfigError::IncompleteCuratedEntry("theme"));
            }
        }

        for rule in &self.dated {
            if !rule.theme.contains(YEAR_SLOT) {
                return Err(ConfigError::MissingYearSlot(rule.name.clone()));
            }
        }

        for rule in self.composites.iter().chain(&self.dated) {
            if rule.predicate.is_empty() {
                return Err(ConfigError::EmptyPredicate(rule.name.clone()));
            }
            let group_count = rule.predicate.groups().len();
            if let Some(group) = template_groups(&rule.theme)
                .into_iter()
                .find(|g| *g >= group_count)
            {
                return Err(ConfigError::TemplateGroup {
                    rule: rule.name.clone(),
                    group,
                });
            }
        }

        Ok(())
    }

    pub fn keywords(&self, field: Field) -> &[WeightedKeyword] {
        self.fields.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn fold_all(terms: &mut [String]) {
    for term in terms.iter_mut() {
        *term = fold_width(term);
    }
}

/// Group indices referenced as `{N}` in a theme template.
fn template_groups(template: &str) -> Vec<usize> {
    let mut groups = Vec::new();
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                if let Ok(index) = after[..close].parse::<usize>() {
                    if !groups.contains(&index) {
                        groups.push(index);
                    }
                }
                rest = &after[close + 1..];
            }
            None => break,
        }
    }
    groups
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
