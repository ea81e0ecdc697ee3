use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use super::address::{fallback_set, normalize_base};
use super::decode::{decode_body, error_message, success_value};
use super::token_store::{TokenStore, AUTH_TOKEN_KEY};
use super::transport::{HttpRequest, HttpResponse, HttpTransport, Method};
use crate::config::ClientConfig;
use crate::error::{ExamPrepError, Result};

/// Per-call options. Defaults to a GET without a body.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Option<Method>,
    /// Pre-serialized JSON text.
    pub body: Option<String>,
    /// Merged over the client's own headers; a caller header replaces a client
    /// header of the same name.
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn method(method: Method) -> Self {
        Self {
            method: Some(method),
            ..Self::default()
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// A client session against the portal API.
///
/// Holds the current base address and the authentication token. Both are
/// plain last-writer-wins fields; concurrent calls may discover the same
/// fallback redundantly and converge on it.
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    store: Arc<dyn TokenStore>,
    base: RwLock<String>,
    fallbacks: Vec<String>,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    /// Start a session at the base address `config` resolves to, picking up any
    /// token left in `store` by an earlier session.
    pub fn new(
        config: &ClientConfig,
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn TokenStore>,
    ) -> Result<Self> {
        Self::with_base(config.base_address(), transport, store)
    }

    /// Start a session at an explicit base address.
    pub fn with_base(
        base: impl AsRef<str>,
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn TokenStore>,
    ) -> Result<Self> {
        let base = normalize_base(base.as_ref());
        let fallbacks = fallback_set(&base);
        let token = store.get(AUTH_TOKEN_KEY)?;

        tracing::debug!(base = %base, fallbacks = ?fallbacks, "API client created");
        Ok(Self {
            transport,
            store,
            base: RwLock::new(base),
            fallbacks,
            token: RwLock::new(token),
        })
    }

    /// The address calls are currently sent to.
    pub fn current_base(&self) -> String {
        self.base.read().clone()
    }

    /// Addresses tried when the current one cannot route a call.
    ///
    /// Fixed at construction and never recomputed. After a fallback is adopted it
    /// stays in this list, so a later routing failure on it requests it once more
    /// before moving on to the next candidate.
    pub fn fallbacks(&self) -> &[String] {
        &self.fallbacks
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    /// Hold `token` and persist it, or forget and unpersist it on `None`.
    ///
    /// The held token changes even when persisting fails.
    pub fn set_token(&self, token: Option<&str>) -> Result<()> {
        let token = token.filter(|t| !t.is_empty());
        *self.token.write() = token.map(str::to_string);
        match token {
            Some(token) => self.store.set(AUTH_TOKEN_KEY, token),
            None => self.store.remove(AUTH_TOKEN_KEY),
        }
    }

    fn headers(&self, overrides: &[(String, String)]) -> Vec<(String, String)> {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        if let Some(token) = self.token.read().as_deref() {
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }
        for (name, value) in overrides {
            headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
            headers.push((name.clone(), value.clone()));
        }
        headers
    }

    /// Call `endpoint` (a path starting with `/`) and decode the JSON answer.
    pub async fn request(&self, endpoint: &str, options: RequestOptions) -> Result<Value> {
        let outcome = self.dispatch(endpoint, &options).await;
        if let Err(ref e) = outcome {
            tracing::warn!(endpoint, error = %e, "API error");
        }
        outcome
    }

    async fn dispatch(&self, endpoint: &str, options: &RequestOptions) -> Result<Value> {
        let mut request = HttpRequest {
            method: options.method.unwrap_or(Method::Get),
            url: format!("{}{}", self.current_base(), endpoint),
            headers: self.headers(&options.headers),
            body: options.body.clone(),
        };

        let mut response = self.transport.send(&request).await?;
        if response.wants_fallback() {
            if let Some(adopted) = self.try_fallbacks(&mut request, endpoint).await {
                response = adopted;
            }
        }

        let data = decode_body(&response);
        if !response.is_ok() {
            return Err(ExamPrepError::RequestFailed(error_message(
                data.as_ref(),
                &response,
            )));
        }
        Ok(success_value(data))
    }

    /// Reissue `request` against each fallback in order. The first candidate that
    /// succeeds or reports a real status becomes the current base address.
    async fn try_fallbacks(&self, request: &mut HttpRequest, endpoint: &str) -> Option<HttpResponse> {
        for candidate in &self.fallbacks {
            request.url = format!("{}{}", candidate, endpoint);
            match self.transport.send(request).await {
                Ok(response) if response.is_ok() || response.status != 0 => {
                    tracing::info!(base = %candidate, status = response.status, "Switched API base address");
                    *self.base.write() = normalize_base(candidate);
                    return Some(response);
                }
                Ok(_) => continue,
                Err(e) => {
                    tracing::debug!(base = %candidate, error = %e, "Fallback address unreachable");
                    continue;
                }
            }
        }
        None
    }
}
