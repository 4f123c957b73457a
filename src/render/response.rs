// src/render/response.rs
use serde::Deserialize;
use serde_json::Value;

/// What the backend said, reduced to the three shapes the client acts on.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisResponse {
    /// `{"status": "success", "result": ...}`. `result` is normally a string
    /// but any truthy JSON value is kept as sent.
    Success { result: Value },
    /// `{"error": ...}`, already turned into display text.
    Failure { error: String },
    /// Anything else, including bodies that are not JSON at all.
    Unknown,
}

// Fields are loosely typed so a wrong type in one of them does not hide the others.
#[derive(Deserialize)]
struct WireBody {
    #[serde(default)]
    status: Option<Value>,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

impl AnalysisResponse {
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<WireBody>(body) {
            Ok(wire) => Self::from_wire(wire),
            Err(_) => AnalysisResponse::Unknown,
        }
    }

    fn from_wire(wire: WireBody) -> Self {
        let succeeded = matches!(&wire.status, Some(Value::String(s)) if s == "success");
        if succeeded {
            if let Some(result) = wire.result.filter(is_truthy) {
                return AnalysisResponse::Success { result };
            }
        }
        match wire.error.filter(is_truthy) {
            Some(error) => AnalysisResponse::Failure {
                error: display_text(&error),
            },
            None => AnalysisResponse::Unknown,
        }
    }
}

/// Presence test for `result` and `error`: `null`, `false`, `0` and `""`
/// count as absent; objects and arrays count as present even when empty.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Strings as-is, everything else as compact JSON.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_shape() {
        let response = AnalysisResponse::from_body(
            r#"{"status":"success","query":"what is this?","result":"Maize leaf"}"#,
        );
        assert_eq!(
            response,
            AnalysisResponse::Success {
                result: json!("Maize leaf")
            }
        );
    }

    #[test]
    fn test_error_shape() {
        assert_eq!(
            AnalysisResponse::from_body(r#"{"error":"No image uploaded"}"#),
            AnalysisResponse::Failure {
                error: "No image uploaded".to_string()
            }
        );
    }

    #[test]
    fn test_success_without_result_falls_through_to_error() {
        assert_eq!(
            AnalysisResponse::from_body(r#"{"status":"success","result":"","error":"empty"}"#),
            AnalysisResponse::Failure {
                error: "empty".to_string()
            }
        );
    }

    #[test]
    fn test_non_string_result_still_counts_as_success() {
        assert_eq!(
            AnalysisResponse::from_body(r#"{"status":"success","result":42}"#),
            AnalysisResponse::Success { result: json!(42) }
        );
        assert_eq!(
            AnalysisResponse::from_body(r#"{"status":"success","result":{"disease":"rust"}}"#),
            AnalysisResponse::Success {
                result: json!({"disease": "rust"})
            }
        );
    }

    #[test]
    fn test_non_string_error_is_shown_as_json() {
        assert_eq!(
            AnalysisResponse::from_body(r#"{"error":{"code":7}}"#),
            AnalysisResponse::Failure {
                error: r#"{"code":7}"#.to_string()
            }
        );
        assert_eq!(
            AnalysisResponse::from_body(r#"{"error":true}"#),
            AnalysisResponse::Failure {
                error: "true".to_string()
            }
        );
    }

    #[test]
    fn test_falsy_values_count_as_absent() {
        for body in [
            r#"{"status":"success","result":0}"#,
            r#"{"status":"success","result":false}"#,
            r#"{"status":"success","result":null}"#,
            r#"{"error":""}"#,
            r#"{"error":0}"#,
        ] {
            assert_eq!(AnalysisResponse::from_body(body), AnalysisResponse::Unknown, "body: {}", body);
        }
    }

    #[test]
    fn test_unknown_shapes() {
        assert_eq!(AnalysisResponse::from_body("{}"), AnalysisResponse::Unknown);
        assert_eq!(
            AnalysisResponse::from_body(r#"{"status":"pending"}"#),
            AnalysisResponse::Unknown
        );
        assert_eq!(
            AnalysisResponse::from_body(r#"{"status":"failed","result":"ignored"}"#),
            AnalysisResponse::Unknown
        );
        assert_eq!(AnalysisResponse::from_body("<html>oops</html>"), AnalysisResponse::Unknown);
        assert_eq!(AnalysisResponse::from_body(""), AnalysisResponse::Unknown);
    }
}
