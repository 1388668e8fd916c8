//! Load-time error types.
//!
//! Only configuration problems are errors. Empty input, numbering anomalies
//! and ambiguous classification are carried as data in the result types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid {field} value: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Keyword table for {0} is empty")]
    EmptyKeywordTable(String),

    #[error("Empty keyword term in {0} table")]
    EmptyTerm(String),

    #[error("Duplicate keyword '{term}' in {field} table")]
    DuplicateTerm { field: String, term: String },

    #[error("Keyword '{term}' has a non-finite weight")]
    InvalidWeight { term: String },

    #[error("Keyword '{term}' has a zero multiplicity cap")]
    ZeroCap { term: String },

    #[error("Curated entry is missing its {0}")]
    IncompleteCuratedEntry(&'static str),

    #[error("Rule '{0}' has an empty predicate")]
    EmptyPredicate(String),

    #[error("Rule '{rule}' template refers to missing group {group}")]
    TemplateGroup { rule: String, group: usize },

    #[error("Dated rule '{0}' has no {{year}} slot in its theme")]
    MissingYearSlot(String),

    #[error("Invalid pipeline parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
