use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /bookmarks`. Fields are kept as raw JSON so that absent and falsy values
/// (`null`, `false`, `0`, `""`) are reported by the handler's own validation rather than
/// by the JSON extractor.
#[derive(Debug, Deserialize, Default)]
pub struct CreateBookmark {
    pub title: Option<Value>,
    pub content: Option<Value>,
}

impl CreateBookmark {
    pub fn title(&self) -> Option<String> {
        truthy_text(self.title.as_ref())
    }

    pub fn content(&self) -> Option<String> {
        truthy_text(self.content.as_ref())
    }
}

/// Text form of a truthy JSON value. Strings are taken as-is, anything else is stored as
/// its JSON rendering.
fn truthy_text(field: Option<&Value>) -> Option<String> {
    match field? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorMessage {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub detail: String,
}

/// JSON body of a 500 response.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum FailureResponse {
    Generic { error: ErrorMessage },
    Detailed { message: String, error: ErrorDetail },
}

impl FailureResponse {
    pub fn generic() -> Self {
        FailureResponse::Generic {
            error: ErrorMessage {
                message: "server error".to_owned(),
            },
        }
    }

    pub fn detailed(message: &str, detail: &str) -> Self {
        FailureResponse::Detailed {
            message: message.to_owned(),
            error: ErrorDetail {
                detail: detail.to_owned(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fields_count_as_missing() {
        let payload: CreateBookmark =
            serde_json::from_str(r#"{"title": "", "content": null}"#).unwrap();
        assert_eq!(payload.title(), None);
        assert_eq!(payload.content(), None);

        let payload: CreateBookmark = serde_json::from_str("{}").unwrap();
        assert_eq!(payload.title(), None);
    }

    #[test]
    fn test_whitespace_title_is_accepted() {
        let payload: CreateBookmark =
            serde_json::from_str(r#"{"title": " ", "content": "c"}"#).unwrap();
        assert_eq!(payload.title().as_deref(), Some(" "));
        assert_eq!(payload.content().as_deref(), Some("c"));
    }

    #[test]
    fn test_falsy_values_count_as_missing() {
        for body in [
            r#"{"title": false, "content": 0}"#,
            r#"{"title": 0.0, "content": -0}"#,
        ] {
            let payload: CreateBookmark = serde_json::from_str(body).unwrap();
            assert_eq!(payload.title(), None, "body: {}", body);
            assert_eq!(payload.content(), None, "body: {}", body);
        }
    }

    #[test]
    fn test_truthy_non_strings_keep_their_json_text() {
        let payload: CreateBookmark =
            serde_json::from_str(r#"{"title": 5, "content": true}"#).unwrap();
        assert_eq!(payload.title().as_deref(), Some("5"));
        assert_eq!(payload.content().as_deref(), Some("true"));

        let payload: CreateBookmark =
            serde_json::from_str(r#"{"title": ["a"], "content": {"k": 1}}"#).unwrap();
        assert_eq!(payload.title().as_deref(), Some(r#"["a"]"#));
        assert_eq!(payload.content().as_deref(), Some(r#"{"k":1}"#));
    }

    #[test]
    fn test_failure_response_shapes() {
        assert_eq!(
            serde_json::to_value(FailureResponse::generic()).unwrap(),
            serde_json::json!({"error": {"message": "server error"}})
        );
        assert_eq!(
            serde_json::to_value(FailureResponse::detailed("boom", "boom: cause")).unwrap(),
            serde_json::json!({"message": "boom", "error": {"detail": "boom: cause"}})
        );
    }
}
