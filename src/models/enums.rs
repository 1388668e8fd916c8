use crate::pipeline::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ConfigError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(Field {
    Geography => "geography",
    History => "history",
    Civics => "civics",
    Unknown => "unknown",
});

impl Field {
    /// Scored fields in tie-break order (history > geography > civics).
    pub fn scored() -> &'static [Field] {
        &[Self::History, Self::Geography, Self::Civics]
    }

    pub fn all() -> &'static [Field] {
        &[Self::Geography, Self::History, Self::Civics, Self::Unknown]
    }

    /// Label used on exam reports.
    pub fn label_ja(&self) -> &'static str {
        match self {
            Self::Geography => "地理",
            Self::History => "歴史",
            Self::Civics => "公民",
            Self::Unknown => "不明",
        }
    }
}

str_enum!(ThemeSource {
    CuratedMapping => "curated_mapping",
    KeywordFallback => "keyword_fallback",
    None => "none",
});

str_enum!(RejectReason {
    Empty => "empty",
    ReferenceMarkerOnly => "reference_marker_only",
    TooShort => "too_short",
    GenericPhrase => "generic_phrase",
});

str_enum!(QuestionFormat {
    MultipleChoice => "multiple_choice",
    Descriptive => "descriptive",
    FillInBlank => "fill_in_blank",
    TrueFalse => "true_false",
    Combination => "combination",
    ShortAnswer => "short_answer",
    Other => "other",
});

str_enum!(ResourceKind {
    Map => "map",
    Graph => "graph",
    Timeline => "timeline",
    Table => "table",
    Photo => "photo",
    Document => "document",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn field_round_trip() {
        for (variant, s) in [
            (Field::Geography, "geography"),
            (Field::History, "history"),
            (Field::Civics, "civics"),
            (Field::Unknown, "unknown"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(Field::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn field_serde_matches_as_str() {
        let json = serde_json::to_string(&Field::History).unwrap();
        assert_eq!(json, "\"history\"");
        let back: Field = serde_json::from_str("\"civics\"").unwrap();
        assert_eq!(back, Field::Civics);
    }

    #[test]
    fn theme_source_serde_matches_as_str() {
        for source in [
            ThemeSource::CuratedMapping,
            ThemeSource::KeywordFallback,
            ThemeSource::None,
        ] {
            let json = serde_json::to_string(&source).unwrap();
            assert_eq!(json, format!("\"{}\"", source.as_str()));
        }
    }

    #[test]
    fn scored_fields_follow_tie_break_priority() {
        assert_eq!(
            Field::scored(),
            &[Field::History, Field::Geography, Field::Civics]
        );
        assert!(!Field::scored().contains(&Field::Unknown));
    }

    #[test]
    fn japanese_labels() {
        assert_eq!(Field::Geography.label_ja(), "地理");
        assert_eq!(Field::History.label_ja(), "歴史");
        assert_eq!(Field::Civics.label_ja(), "公民");
    }

    #[test]
    fn unknown_value_is_rejected() {
        let err = Field::from_str("economics").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnum { .. }));
        assert!(err.to_string().contains("economics"));
    }

    #[test]
    fn resource_kind_round_trip() {
        for (variant, s) in [
            (ResourceKind::Map, "map"),
            (ResourceKind::Graph, "graph"),
            (ResourceKind::Timeline, "timeline"),
            (ResourceKind::Table, "table"),
            (ResourceKind::Photo, "photo"),
            (ResourceKind::Document, "document"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(ResourceKind::from_str(s).unwrap(), variant);
        }
    }
}
