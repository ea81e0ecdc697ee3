use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use crate::error::ExamPrepError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// One outgoing request, fully resolved against a base address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// Pre-serialized JSON text.
    pub body: Option<String>,
}

impl HttpRequest {
    /// First header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// How much of a response the caller is allowed to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseKind {
    #[default]
    Basic,
    Cors,
    /// Status and body hidden by a cross-origin policy. Status reads as 0.
    Opaque,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub kind: ResponseKind,
    pub content_type: Option<String>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            status_text: reason_phrase(status),
            kind: ResponseKind::Basic,
            content_type: None,
            body: body.into(),
        }
    }

    /// A response declaring `application/json`.
    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self::new(status, body).with_content_type("application/json; charset=utf-8")
    }

    /// A response declaring `text/plain`.
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self::new(status, body).with_content_type("text/plain; charset=utf-8")
    }

    pub fn opaque() -> Self {
        Self {
            status: 0,
            status_text: String::new(),
            kind: ResponseKind::Opaque,
            content_type: None,
            body: String::new(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_status_text(mut self, status_text: impl Into<String>) -> Self {
        self.status_text = status_text.into();
        self
    }

    /// 2xx and visible to the caller.
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status) && self.kind != ResponseKind::Opaque
    }

    /// The current address cannot serve this request and another one should be tried.
    pub fn wants_fallback(&self) -> bool {
        (!self.is_ok() && matches!(self.status, 404 | 405)) || self.kind == ResponseKind::Opaque
    }

    /// `"<status> <status text>"`, e.g. `404 Not Found`.
    pub fn status_line(&self) -> String {
        format!("{} {}", self.status, self.status_text)
    }
}

fn reason_phrase(status: u16) -> String {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or_default()
        .to_string()
}

/// The request never produced a response: refused connection, DNS failure, reset.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<TransportError> for ExamPrepError {
    fn from(err: TransportError) -> Self {
        ExamPrepError::RequestFailed(err.0)
    }
}

/// Sends requests over the network.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_triggers() {
        assert!(HttpResponse::new(404, "").wants_fallback());
        assert!(HttpResponse::new(405, "").wants_fallback());
        assert!(HttpResponse::opaque().wants_fallback());
        assert!(!HttpResponse::new(500, "").wants_fallback());
        assert!(!HttpResponse::new(401, "").wants_fallback());
        assert!(!HttpResponse::json(200, "{}").wants_fallback());
    }

    #[test]
    fn test_status_line_uses_reason_phrase() {
        assert_eq!(HttpResponse::new(404, "").status_line(), "404 Not Found");
        assert_eq!(
            HttpResponse::new(500, "").with_status_text("Boom").status_line(),
            "500 Boom"
        );
    }

    #[test]
    fn test_opaque_is_never_ok() {
        let mut response = HttpResponse::opaque();
        response.status = 200;
        assert!(!response.is_ok());
    }
}
