// src/highlight.rs
//! Syntax-highlighting categories and the engine-name normalizer.
//!
//! The engine emits category names in a loose camel case
//! (`structuredComment`, `keywordLight`, ...). The platform enumeration is
//! all-caps with underscores, so the normalizer inserts a separator at each
//! lower-to-upper case boundary before the lookup. Kept as a pure function:
//! it is a fragile textual transform and is tested on its own.

use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

/// The platform's fixed highlighting token classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HighlightCategory {
    Annotation,
    Comment,
    Constant,
    Keyword,
    KeywordLight,
    PreprocessDirective,
    String,
    StructuredComment,
}

impl FromStr for HighlightCategory {
    type Err = UnknownCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ANNOTATION" => Ok(Self::Annotation),
            "COMMENT" => Ok(Self::Comment),
            "CONSTANT" => Ok(Self::Constant),
            "KEYWORD" => Ok(Self::Keyword),
            "KEYWORD_LIGHT" => Ok(Self::KeywordLight),
            "PREPROCESS_DIRECTIVE" => Ok(Self::PreprocessDirective),
            "STRING" => Ok(Self::String),
            "STRUCTURED_COMMENT" => Ok(Self::StructuredComment),
            other => Err(UnknownCategoryError(other.to_string())),
        }
    }
}

/// The engine reported a highlighting category outside the platform
/// enumeration. A contract violation, surfaced as an analysis error for the
/// file rather than silently dropped.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown highlighting category '{0}'")]
pub struct UnknownCategoryError(pub String);

fn case_boundary() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new("([a-z])([A-Z])").unwrap_or_else(|_| unreachable!()))
}

/// Normalizes an engine-supplied category name and resolves it against the
/// platform enumeration.
pub fn normalize_category(raw: &str) -> Result<HighlightCategory, UnknownCategoryError> {
    let separated = case_boundary().replace_all(raw, "${1}_${2}");
    separated.to_uppercase().parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_multi_word() {
        assert_eq!(
            normalize_category("structuredComment"),
            Ok(HighlightCategory::StructuredComment)
        );
        assert_eq!(
            normalize_category("keywordLight"),
            Ok(HighlightCategory::KeywordLight)
        );
    }

    #[test]
    fn single_word_lowercase() {
        assert_eq!(normalize_category("keyword"), Ok(HighlightCategory::Keyword));
        assert_eq!(normalize_category("string"), Ok(HighlightCategory::String));
    }

    #[test]
    fn idempotent_on_normalized_input() {
        assert_eq!(
            normalize_category("STRUCTURED_COMMENT"),
            Ok(HighlightCategory::StructuredComment)
        );
        assert_eq!(normalize_category("COMMENT"), Ok(HighlightCategory::Comment));
    }

    #[test]
    fn unknown_category_is_an_error() {
        let err = normalize_category("vaporwave").unwrap_err();
        assert_eq!(err, UnknownCategoryError("VAPORWAVE".to_string()));
    }
}
