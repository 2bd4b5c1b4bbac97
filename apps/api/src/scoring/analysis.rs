//! Decoding of the externally produced qualitative analysis.
//!
//! The payload comes from an upstream analyzer (typically an LLM) and is untrusted.
//! Decoding never fails: it ends in exactly one of three outcomes, and the two failure
//! outcomes carry sentinel text in place of real findings.

use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Placed in both output lists when the payload is not well-formed JSON.
pub const MALFORMED_ANALYSIS_SENTINEL: &str = "Could not parse analysis output.";

/// Decoded payload. Fields are read one at a time from the JSON object, so a field of
/// an unexpected type inside an entry is skipped instead of failing the decode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisPayload {
    /// Informational only; upstream analyzers emit it as a number or a quoted number.
    pub match_score: Option<Value>,
    pub missing_elements: Vec<MissingElement>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MissingElement {
    pub element: Option<String>,
    pub suggestion: Option<String>,
}

impl AnalysisPayload {
    /// An absent `missing_elements` means no findings. Any other non-array value,
    /// including `null`, is a shape error, as is a non-object entry.
    pub fn from_object(fields: &Map<String, Value>) -> Result<Self, String> {
        let entries = match fields.get("missing_elements") {
            None => &[][..],
            Some(Value::Array(entries)) => entries.as_slice(),
            Some(other) => {
                return Err(format!(
                    "missing_elements must be an array, found {}",
                    json_kind(other)
                ))
            }
        };

        let missing_elements = entries
            .iter()
            .map(MissingElement::from_entry)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            match_score: fields.get("match_score").cloned(),
            missing_elements,
        })
    }
}

impl MissingElement {
    /// Non-string and empty-string fields count as absent.
    fn from_entry(entry: &Value) -> Result<Self, String> {
        let fields = entry.as_object().ok_or_else(|| {
            format!(
                "missing_elements entries must be objects, found {}",
                json_kind(entry)
            )
        })?;
        let text = |key: &str| {
            fields
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Ok(Self {
            element: text("element"),
            suggestion: text("suggestion"),
        })
    }
}

/// Terminal state of a decode attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Decoded {
        missing_elements: Vec<String>,
        suggestions: Vec<String>,
    },
    /// Payload text is not well-formed JSON.
    MalformedPayload,
    /// Well-formed JSON of the wrong shape.
    DecodeError(String),
}

impl AnalysisOutcome {
    /// Splits the outcome into `(missing_elements, improvement_suggestions)`.
    pub fn into_lists(self) -> (Vec<String>, Vec<String>) {
        match self {
            AnalysisOutcome::Decoded {
                missing_elements,
                suggestions,
            } => (missing_elements, suggestions),
            AnalysisOutcome::MalformedPayload => (
                vec![MALFORMED_ANALYSIS_SENTINEL.to_string()],
                vec![MALFORMED_ANALYSIS_SENTINEL.to_string()],
            ),
            AnalysisOutcome::DecodeError(description) => {
                let message = format!("Error processing analysis output: {description}");
                (vec![message.clone()], vec![message])
            }
        }
    }
}

/// Decodes `payload` into an [`AnalysisOutcome`].
///
/// Within each missing-element entry, `element` and `suggestion` are collected
/// independently: an entry lacking one still contributes the other.
pub fn decode_analysis(payload: &str) -> AnalysisOutcome {
    let value: Value = match serde_json::from_str(payload) {
        Ok(v) => v,
        Err(e) => {
            warn!("Analysis payload is not well-formed JSON: {e}");
            return AnalysisOutcome::MalformedPayload;
        }
    };

    let Value::Object(fields) = &value else {
        warn!("Analysis payload is not a JSON object");
        return AnalysisOutcome::DecodeError(format!(
            "expected a JSON object, found {}",
            json_kind(&value)
        ));
    };

    let parsed = match AnalysisPayload::from_object(fields) {
        Ok(p) => p,
        Err(e) => {
            warn!("Analysis payload has an unexpected shape: {e}");
            return AnalysisOutcome::DecodeError(e);
        }
    };

    if let Some(score) = &parsed.match_score {
        debug!("Analysis reported match_score={score}");
    }

    let mut missing_elements = Vec::new();
    let mut suggestions = Vec::new();
    for entry in parsed.missing_elements {
        missing_elements.extend(entry.element);
        suggestions.extend(entry.suggestion);
    }

    AnalysisOutcome::Decoded {
        missing_elements,
        suggestions,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_ANALYSIS: &str = r#"{
        "match_score": 80,
        "missing_elements": [
            {"element": "Experience with FastAPI", "suggestion": "Highlight API development with Flask or Django."},
            {"element": "Cloud Deployment (AWS/Azure)", "suggestion": "Complete a project deployed on AWS."},
            {"element": "NoSQL Database experience", "suggestion": "Include work with MongoDB or Cassandra."}
        ],
        "improvement_suggestions": ["Quantify achievements."]
    }"#;

    #[test]
    fn test_decodes_well_formed_payload() {
        let outcome = decode_analysis(SAMPLE_ANALYSIS);
        assert!(matches!(outcome, AnalysisOutcome::Decoded { .. }));

        let (missing_elements, suggestions) = outcome.into_lists();
        assert_eq!(missing_elements.len(), 3);
        assert_eq!(missing_elements[0], "Experience with FastAPI");
        assert_eq!(suggestions.len(), 3);
        assert_eq!(suggestions[1], "Complete a project deployed on AWS.");
    }

    #[test]
    fn test_entries_missing_fields_are_skipped_per_field() {
        let payload = r#"{"missing_elements": [
            {"element": "Kafka"},
            {"suggestion": "Add a Kubernetes project"},
            {},
            {"element": "", "suggestion": "Mention CI/CD"}
        ]}"#;
        let (missing, suggestions) = decode_analysis(payload).into_lists();
        assert_eq!(missing, vec!["Kafka"]);
        assert_eq!(suggestions, vec!["Add a Kubernetes project", "Mention CI/CD"]);
    }

    #[test]
    fn test_missing_list_decodes_to_empty() {
        let outcome = decode_analysis(r#"{"match_score": 40}"#);
        assert_eq!(
            outcome,
            AnalysisOutcome::Decoded {
                missing_elements: vec![],
                suggestions: vec![],
            }
        );
    }

    #[test]
    fn test_malformed_payload_yields_sentinel_in_both_lists() {
        let outcome = decode_analysis("this is not json {");
        assert_eq!(outcome, AnalysisOutcome::MalformedPayload);

        let (missing, suggestions) = outcome.into_lists();
        assert_eq!(missing, vec![MALFORMED_ANALYSIS_SENTINEL]);
        assert_eq!(missing, suggestions);
    }

    #[test]
    fn test_empty_payload_is_malformed() {
        assert_eq!(decode_analysis(""), AnalysisOutcome::MalformedPayload);
    }

    #[test]
    fn test_wrong_shape_is_decode_error_with_description() {
        let outcome = decode_analysis(r#"{"missing_elements": "none"}"#);
        assert!(matches!(outcome, AnalysisOutcome::DecodeError(_)));

        let (missing, suggestions) = outcome.into_lists();
        assert_eq!(missing.len(), 1);
        assert!(missing[0].starts_with("Error processing analysis output: "));
        assert_eq!(missing, suggestions);
    }

    #[test]
    fn test_top_level_array_is_decode_error() {
        assert_eq!(
            decode_analysis("[]"),
            AnalysisOutcome::DecodeError("expected a JSON object, found an array".to_string())
        );
    }

    #[test]
    fn test_quoted_match_score_keeps_findings() {
        let payload = r#"{"match_score": "80", "missing_elements": [
            {"element": "AWS", "suggestion": "Deploy a project on AWS"}
        ]}"#;
        let (missing, suggestions) = decode_analysis(payload).into_lists();
        assert_eq!(missing, vec!["AWS"]);
        assert_eq!(suggestions, vec!["Deploy a project on AWS"]);
    }

    #[test]
    fn test_non_string_field_is_skipped_not_fatal() {
        let payload = r#"{"missing_elements": [
            {"element": 5, "suggestion": "x"},
            {"element": "Docker", "suggestion": ["nested"]}
        ]}"#;
        assert_eq!(
            decode_analysis(payload),
            AnalysisOutcome::Decoded {
                missing_elements: vec!["Docker".to_string()],
                suggestions: vec!["x".to_string()],
            }
        );
    }

    #[test]
    fn test_null_missing_elements_is_decode_error() {
        let (missing, suggestions) =
            decode_analysis(r#"{"missing_elements": null}"#).into_lists();
        assert_eq!(
            missing,
            vec!["Error processing analysis output: missing_elements must be an array, found null"]
        );
        assert_eq!(missing, suggestions);
    }

    #[test]
    fn test_non_object_entry_is_decode_error() {
        assert!(matches!(
            decode_analysis(r#"{"missing_elements": ["just a string"]}"#),
            AnalysisOutcome::DecodeError(_)
        ));
    }
}
