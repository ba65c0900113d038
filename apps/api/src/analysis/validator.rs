//! Response validation — turns untrusted oracle text into a typed record.
//!
//! Oracle output is expected to be bare JSON, but models occasionally wrap it
//! in code fences or add a sentence around it. `extract_json` recovers the
//! JSON span first; only then is the text classified as malformed or as a
//! schema mismatch.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::schema::OutputSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    MalformedJson,
    SchemaMismatch,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationErrorKind::MalformedJson => f.write_str("malformed JSON"),
            ValidationErrorKind::SchemaMismatch => f.write_str("schema mismatch"),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
#[error("{schema}: {kind}: {details}")]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub schema: &'static str,
    pub details: String,
}

/// Parses `raw_text` into `T`. Never panics; every failure is a typed error.
pub fn validate<T: OutputSchema>(raw_text: &str) -> Result<T, ValidationError> {
    let candidate = extract_json(raw_text);

    let value: Value = serde_json::from_str(candidate).map_err(|e| ValidationError {
        kind: ValidationErrorKind::MalformedJson,
        schema: T::NAME,
        details: e.to_string(),
    })?;

    serde_json::from_value(value).map_err(|e| ValidationError {
        kind: ValidationErrorKind::SchemaMismatch,
        schema: T::NAME,
        details: e.to_string(),
    })
}

/// Best-effort recovery of the JSON object inside oracle output.
///
/// 1. Trim and strip ```json / ``` fences.
/// 2. If the result does not parse as JSON, take the span from the first `{`
///    to the last `}`.
pub fn extract_json(text: &str) -> &str {
    let text = strip_json_fences(text);
    if serde_json::from_str::<Value>(text).is_ok() {
        return text;
    }
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from oracle output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analysis::{ComparisonResult, GeneratedQuestions, ResumeFeedback};
    use crate::models::resume::ParsedResume;

    const COMPARISON: &str = r#"{"name": "Ada", "match_score": 91, "summary": "Strong", "strengths": ["Python"], "gaps": ["Go"]}"#;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_extract_json_from_surrounding_prose() {
        let input = "Here is the analysis:\n{\"a\": {\"b\": 1}}\nHope this helps!";
        assert_eq!(extract_json(input), "{\"a\": {\"b\": 1}}");
    }

    #[test]
    fn test_extract_json_drops_trailing_prose() {
        let input = "{\"a\": 1}\nHope this helps!";
        assert_eq!(extract_json(input), "{\"a\": 1}");
    }

    #[test]
    fn test_object_followed_by_prose_still_validates() {
        let raw = format!("{COMPARISON}\nHope this helps!");
        let result: ComparisonResult = validate(&raw).unwrap();
        assert_eq!(result.name, "Ada");
        assert_eq!(result.match_score, 91);
    }

    #[test]
    fn test_valid_json_materializes_all_fields() {
        let result: ComparisonResult = validate(COMPARISON).unwrap();
        assert_eq!(
            result,
            ComparisonResult {
                name: "Ada".to_string(),
                match_score: 91,
                summary: "Strong".to_string(),
                strengths: vec!["Python".to_string()],
                gaps: vec!["Go".to_string()],
            }
        );
    }

    #[test]
    fn test_fenced_json_is_accepted() {
        let fenced = format!("```json\n{COMPARISON}\n```");
        let result: ComparisonResult = validate(&fenced).unwrap();
        assert_eq!(result.match_score, 91);
    }

    #[test]
    fn test_malformed_json_is_reported_not_raised() {
        for input in ["", "not json at all", "{\"name\": \"Ada\",", "{ broken }"] {
            let err = validate::<ComparisonResult>(input).unwrap_err();
            assert_eq!(err.kind, ValidationErrorKind::MalformedJson, "input: {input:?}");
            assert_eq!(err.schema, "ComparisonResult");
        }
    }

    #[test]
    fn test_missing_field_is_schema_mismatch() {
        let err = validate::<ResumeFeedback>(r#"{"match_score": 50, "keyword_opportunities": []}"#)
            .unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::SchemaMismatch);
        assert!(err.details.contains("improvement_suggestions"));
    }

    #[test]
    fn test_wrong_primitive_type_is_schema_mismatch() {
        let err = validate::<ParsedResume>(
            r#"{"name": 42, "skills": [], "education": [], "experience": []}"#,
        )
        .unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::SchemaMismatch);
    }

    #[test]
    fn test_null_list_is_schema_mismatch() {
        let err = validate::<GeneratedQuestions>(
            r#"{"behavioral": null, "technical": [], "resume_specific": []}"#,
        )
        .unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::SchemaMismatch);
    }

    #[test]
    fn test_error_display_names_schema_and_kind() {
        let err = validate::<ComparisonResult>("nope").unwrap_err();
        assert!(err.to_string().starts_with("ComparisonResult: malformed JSON"));
    }
}
