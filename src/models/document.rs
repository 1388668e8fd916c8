use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Caller-supplied exam metadata. The pipeline never derives these.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub school: Option<String>,
    pub year: Option<i32>,
}

impl DocumentMeta {
    pub fn new(school: impl Into<String>, year: i32) -> Self {
        Self {
            school: Some(school.into()),
            year: Some(year),
        }
    }
}

/// Full OCR text of one exam. Immutable once created.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    id: Uuid,
    text: String,
    meta: DocumentMeta,
}

impl Document {
    pub fn new(text: impl Into<String>, meta: DocumentMeta) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            meta,
        }
    }

    /// Document with no school/year attached.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(text, DocumentMeta::default())
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn meta(&self) -> &DocumentMeta {
        &self.meta
    }
}
