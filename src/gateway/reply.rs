//! Normalization of backend replies into display text.
//!
//! The backend does not have a fixed response contract. A body may be a bare
//! JSON string, an object carrying `text` or `response`, or anything else.
//! [`Reply`] classifies the decoded body once, in this order:
//!
//! 1. a JSON string is used as-is
//! 2. a truthy `text` field
//! 3. a truthy `response` field
//! 4. the compact JSON serialization of the whole body
//!
//! `null`, `false`, `0` and `""` count as absent. Serialization keeps the
//! backend's key order.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The body was a bare JSON string.
    Plain(String),
    /// Taken from the `text` field.
    Text(String),
    /// Taken from the `response` field.
    Response(String),
    /// No usable field; the serialized body.
    Raw(String),
}

impl Reply {
    pub fn into_text(self) -> String {
        match self {
            Reply::Plain(s) | Reply::Text(s) | Reply::Response(s) | Reply::Raw(s) => s,
        }
    }

    pub fn as_text(&self) -> &str {
        match self {
            Reply::Plain(s) | Reply::Text(s) | Reply::Response(s) | Reply::Raw(s) => s,
        }
    }
}

impl From<Value> for Reply {
    fn from(value: Value) -> Self {
        if let Value::String(s) = value {
            return Reply::Plain(s);
        }
        if let Some(text) = truthy_field(&value, "text") {
            return Reply::Text(text);
        }
        if let Some(text) = truthy_field(&value, "response") {
            return Reply::Response(text);
        }
        Reply::Raw(value.to_string())
    }
}

fn truthy_field(value: &Value, key: &str) -> Option<String> {
    let field = value.get(key)?;
    if !is_truthy(field) {
        return None;
    }
    Some(match field {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_string_used_directly() {
        assert_eq!(Reply::from(json!("hello")), Reply::Plain("hello".to_string()));
    }

    #[test]
    fn test_text_field_preferred() {
        let reply = Reply::from(json!({"text": "hi", "response": "ignored"}));
        assert_eq!(reply, Reply::Text("hi".to_string()));
    }

    #[test]
    fn test_response_field_fallback() {
        assert_eq!(
            Reply::from(json!({"response": "hi"})),
            Reply::Response("hi".to_string())
        );
    }

    #[test]
    fn test_unknown_object_serialized() {
        let reply = Reply::from(json!({"foo": "bar"}));
        assert_eq!(reply.as_text(), r#"{"foo":"bar"}"#);
        assert!(matches!(reply, Reply::Raw(_)));
    }

    #[test]
    fn test_empty_text_falls_through_to_response() {
        let reply = Reply::from(json!({"text": "", "response": "from response"}));
        assert_eq!(reply, Reply::Response("from response".to_string()));
    }

    #[test]
    fn test_falsy_fields_fall_back_to_raw() {
        let reply = Reply::from(json!({"text": null, "response": 0}));
        assert_eq!(reply.into_text(), r#"{"text":null,"response":0}"#);
    }

    #[test]
    fn test_raw_fallback_keeps_key_order() {
        let body: Value =
            serde_json::from_str(r#"{"status":"ok","data":{"wbc":6.2,"hb":13.5}}"#)
                .expect("parse body");
        assert_eq!(
            Reply::from(body).into_text(),
            r#"{"status":"ok","data":{"wbc":6.2,"hb":13.5}}"#
        );
    }

    #[test]
    fn test_non_string_truthy_field_is_serialized() {
        assert_eq!(Reply::from(json!({"text": 42})).into_text(), "42");
        assert_eq!(
            Reply::from(json!({"response": {"answer": "ok"}})).into_text(),
            r#"{"answer":"ok"}"#
        );
    }

    #[test]
    fn test_non_object_bodies() {
        assert_eq!(Reply::from(json!(42)).into_text(), "42");
        assert_eq!(Reply::from(json!(["a", "b"])).into_text(), r#"["a","b"]"#);
    }

    #[test]
    fn test_error_body_shown_verbatim() {
        let reply = Reply::from(json!({"error": "Message is required"}));
        assert_eq!(reply.into_text(), r#"{"error":"Message is required"}"#);
    }
}
