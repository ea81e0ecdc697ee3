use serde_json::{json, Value};

use super::transport::HttpResponse;

/// Decode a response body without ever failing.
///
/// A JSON content type is parsed strictly and a parse failure yields `None`.
/// Any other body is parsed best-effort, and text that is not JSON comes back
/// as `{"message": text}`. An empty body yields `None`.
pub fn decode_body(response: &HttpResponse) -> Option<Value> {
    let declares_json = response
        .content_type
        .as_deref()
        .is_some_and(|content_type| content_type.contains("application/json"));

    if declares_json {
        return serde_json::from_str(&response.body).ok();
    }

    if response.body.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(&response.body).unwrap_or_else(|_| json!({ "message": response.body })))
}

/// Failure text for a non-successful response: the body's `error` field, else
/// its `message` field, else the status line.
pub fn error_message(data: Option<&Value>, response: &HttpResponse) -> String {
    ["error", "message"]
        .iter()
        .find_map(|field| {
            data.and_then(|value| value.get(field))
                .and_then(Value::as_str)
                .filter(|text| !text.is_empty())
        })
        .map(str::to_string)
        .unwrap_or_else(|| response.status_line())
}

/// The value handed back for a successful call. Falsy bodies become `{}`.
pub(crate) fn success_value(data: Option<Value>) -> Value {
    match data {
        None | Some(Value::Null) | Some(Value::Bool(false)) => json!({}),
        Some(Value::String(ref text)) if text.is_empty() => json!({}),
        Some(Value::Number(ref n)) if n.as_f64() == Some(0.0) => json!({}),
        Some(value) => value,
    }
}
