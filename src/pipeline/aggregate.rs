//! Statistics over classified questions.
//!
//! `aggregate` is a pure fold. All maps are `BTreeMap`s and keyed counts are
//! sorted, so two runs over the same input serialise identically.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{ClassifiedQuestion, DocumentMeta, Field, QuestionFormat, ResourceKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FieldCount {
    pub count: usize,
    /// Share of all questions, rounded to one decimal.
    pub percentage: f64,
}

/// Question count for one (school, year, field, theme) combination.
///
/// `theme` is `None` for questions whose theme was rejected.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct KeyedCount {
    pub school: Option<String>,
    pub year: Option<i32>,
    pub field: Field,
    pub theme: Option<String>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct DocumentTotal {
    pub school: Option<String>,
    pub year: Option<i32>,
    pub questions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub total_questions: usize,
    /// Questions with a field other than `unknown`.
    pub classified: usize,
    /// Questions with an accepted theme.
    pub themed: usize,
    pub by_field: BTreeMap<Field, FieldCount>,
    pub by_theme: BTreeMap<String, usize>,
    pub by_format: BTreeMap<QuestionFormat, usize>,
    pub by_resource: BTreeMap<ResourceKind, usize>,
    pub current_affairs: FieldCount,
    pub keyed: Vec<KeyedCount>,
    pub by_document: Vec<DocumentTotal>,
}

impl Statistics {
    pub fn field_count(&self, field: Field) -> usize {
        self.by_field.get(&field).map_or(0, |c| c.count)
    }

    pub fn theme_count(&self, theme: &str) -> usize {
        self.by_theme.get(theme).copied().unwrap_or(0)
    }
}

type Key = (Option<String>, Option<i32>, Field, Option<String>);

/// Fold `(meta, question)` pairs into statistics.
pub fn aggregate<'a, I>(questions: I) -> Statistics
where
    I: IntoIterator<Item = (&'a DocumentMeta, &'a ClassifiedQuestion)>,
{
    let mut total = 0usize;
    let mut field_counts: BTreeMap<Field, usize> = Field::all().iter().map(|f| (*f, 0)).collect();
    let mut by_theme: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_format: BTreeMap<QuestionFormat, usize> = BTreeMap::new();
    let mut by_resource: BTreeMap<ResourceKind, usize> = BTreeMap::new();
    let mut current_affairs = 0usize;
    let mut keyed: BTreeMap<Key, usize> = BTreeMap::new();
    let mut documents: BTreeMap<(Option<String>, Option<i32>), usize> = BTreeMap::new();

    for (meta, question) in questions {
        total += 1;
        let field = question.classification.field;
        *field_counts.entry(field).or_default() += 1;

        let theme = question.theme.reportable();
        if let Some(theme) = theme {
            *by_theme.entry(theme.to_string()).or_default() += 1;
        }

        *by_format.entry(question.format).or_default() += 1;
        for resource in &question.resources {
            *by_resource.entry(*resource).or_default() += 1;
        }
        if question.current_affairs {
            current_affairs += 1;
        }

        let key = (
            meta.school.clone(),
            meta.year,
            field,
            theme.map(str::to_string),
        );
        *keyed.entry(key).or_default() += 1;
        *documents
            .entry((meta.school.clone(), meta.year))
            .or_default() += 1;
    }

    let unknown = field_counts.get(&Field::Unknown).copied().unwrap_or(0);
    let by_field = field_counts
        .into_iter()
        .map(|(field, count)| (field, share(count, total)))
        .collect();

    Statistics {
        total_questions: total,
        classified: total - unknown,
        themed: by_theme.values().sum(),
        by_field,
        by_theme,
        by_format,
        by_resource,
        current_affairs: share(current_affairs, total),
        keyed: keyed
            .into_iter()
            .map(|((school, year, field, theme), count)| KeyedCount {
                school,
                year,
                field,
                theme,
                count,
            })
            .collect(),
        by_document: documents
            .into_iter()
            .map(|((school, year), questions)| DocumentTotal {
                school,
                year,
                questions,
            })
            .collect(),
    }
}

/// Statistics for the questions of a single document.
pub fn aggregate_document(meta: &DocumentMeta, questions: &[ClassifiedQuestion]) -> Statistics {
    aggregate(questions.iter().map(|q| (meta, q)))
}

fn share(count: usize, total: usize) -> FieldCount {
    let percentage = if total == 0 {
        0.0
    } else {
        (count as f64 * 1000.0 / total as f64).round() / 10.0
    };
    FieldCount { count, percentage }
}
