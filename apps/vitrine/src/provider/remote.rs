//! # Remote Provider
//!
//! Data provider talking to a Vitrine endpoint over HTTP. Every call goes to
//! the same URL; the `action` query parameter selects the operation:
//!
//! | action | method | body |
//! |---|---|---|
//! | `get_storage&key=…` | GET | |
//! | `save_storage` | POST | `{key, data}` |
//! | `get_logs` | GET | |
//! | `add_log` | POST | audit entry |
//! | `login` | POST | `{email, pass}` |
//!
//! Responses are wrapped in `{success, data?, error?, status?}`. A non-2xx
//! status, a transport failure, an undecodable body or `success: false`
//! surfaces as [`ProviderError::BackendUnavailable`]. The server owns the
//! audit cap; this client never trims.

use super::{DataProvider, ProviderError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use vitrine_core::{
    AppConfig, AppContent, AuditLogEntry, CoreError, FeatureFlags, MemberPanel, ProviderKind,
    StorageKey, config_from_value, content_from_value, features_from_value,
};

/// Response envelope shared by every action.
#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

/// Body of a `save_storage` call.
#[derive(Debug, Serialize)]
struct SaveRequest<'a, T> {
    key: &'a str,
    data: &'a T,
}

/// Body of a `login` call.
#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    pass: &'a str,
}

/// HTTP client for the multiplexed endpoint.
#[derive(Debug, Clone)]
pub struct RemoteProvider {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl RemoteProvider {
    /// Create a client for `endpoint` (full URL including the route, e.g.
    /// `http://127.0.0.1:8080/api`).
    ///
    /// Without a `timeout` the transport default applies.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ProviderError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ProviderError::BackendUnavailable(format!("HTTP client: {e}")))?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    // =========================================================================
    // TRANSPORT
    // =========================================================================

    /// Build a request for `action` with optional Bearer auth.
    fn request(&self, method: reqwest::Method, action: &str) -> reqwest::RequestBuilder {
        let mut req = self
            .http
            .request(method, &self.endpoint)
            .query(&[("action", action)]);
        if let Some(ref key) = self.api_key {
            req = req.bearer_auth(key);
        }
        req
    }

    /// Send a request and decode the envelope.
    async fn call(&self, action: &str, req: reqwest::RequestBuilder) -> Result<Envelope, ProviderError> {
        let resp = req.send().await.map_err(|e| {
            tracing::debug!(action, error = %e, "Remote request failed");
            ProviderError::BackendUnavailable(format!("{}: {e}", self.endpoint))
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::BackendUnavailable(format!(
                "{action}: HTTP {}",
                status.as_u16()
            )));
        }

        resp.json::<Envelope>()
            .await
            .map_err(|e| ProviderError::BackendUnavailable(format!("{action}: bad response: {e}")))
    }

    /// Call and require `success: true`.
    async fn call_ok(&self, action: &str, req: reqwest::RequestBuilder) -> Result<Value, ProviderError> {
        let envelope = self.call(action, req).await?;
        if envelope.success {
            Ok(envelope.data)
        } else {
            Err(ProviderError::BackendUnavailable(format!(
                "{action}: {}",
                envelope.error.unwrap_or_else(|| "request failed".to_string())
            )))
        }
    }

    async fn get_storage(&self, key: StorageKey) -> Result<Option<Value>, ProviderError> {
        let req = self
            .request(reqwest::Method::GET, "get_storage")
            .query(&[("key", key.as_str())]);
        match self.call_ok("get_storage", req).await? {
            Value::Null => Ok(None),
            data => Ok(Some(data)),
        }
    }

    /// Fetch a document and decode it; missing fields are filled by `decode`.
    async fn get_decoded<T>(
        &self,
        key: StorageKey,
        decode: fn(Value) -> Result<T, CoreError>,
    ) -> Result<Option<T>, ProviderError> {
        let Some(data) = self.get_storage(key).await? else {
            return Ok(None);
        };
        decode(data)
            .map(Some)
            .map_err(|e| ProviderError::BackendUnavailable(format!("corrupt {key} document: {e}")))
    }

    async fn save_storage<T: Serialize + Sync>(&self, key: StorageKey, data: &T) -> Result<(), ProviderError> {
        let body = SaveRequest {
            key: key.as_str(),
            data,
        };
        let req = self.request(reqwest::Method::POST, "save_storage").json(&body);
        self.call_ok("save_storage", req).await.map(|_| ())
    }

    // =========================================================================
    // EXTRA ACTIONS
    // =========================================================================

    /// Default action: returns the online status marker.
    pub async fn health(&self) -> Result<String, ProviderError> {
        let req = self.request(reqwest::Method::GET, "status");
        let envelope = self.call("status", req).await?;
        match (envelope.success, envelope.status) {
            (true, Some(status)) => Ok(status),
            _ => Err(ProviderError::BackendUnavailable(
                "endpoint did not report an online status".to_string(),
            )),
        }
    }

    /// Member panel login.
    pub async fn login(&self, email: &str, pass: &str) -> Result<MemberPanel, ProviderError> {
        let req = self
            .request(reqwest::Method::POST, "login")
            .json(&LoginRequest { email, pass });
        let envelope = self.call("login", req).await?;
        if !envelope.success {
            return Err(ProviderError::Rejected(
                envelope.error.unwrap_or_else(|| "login refused".to_string()),
            ));
        }
        serde_json::from_value(envelope.data)
            .map_err(|e| ProviderError::BackendUnavailable(format!("login: bad panel payload: {e}")))
    }
}

#[async_trait]
impl DataProvider for RemoteProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Remote
    }

    /// The endpoint provisions its own storage.
    async fn init(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    async fn get_config(&self) -> Result<Option<AppConfig>, ProviderError> {
        self.get_decoded(StorageKey::Config, config_from_value).await
    }

    async fn save_config(&self, config: &AppConfig) -> Result<(), ProviderError> {
        self.save_storage(StorageKey::Config, config).await
    }

    async fn get_features(&self) -> Result<Option<FeatureFlags>, ProviderError> {
        self.get_decoded(StorageKey::Features, features_from_value).await
    }

    async fn save_features(&self, features: &FeatureFlags) -> Result<(), ProviderError> {
        self.save_storage(StorageKey::Features, features).await
    }

    async fn get_content(&self) -> Result<Option<AppContent>, ProviderError> {
        self.get_decoded(StorageKey::Content, content_from_value).await
    }

    async fn save_content(&self, content: &AppContent) -> Result<(), ProviderError> {
        self.save_storage(StorageKey::Content, content).await
    }

    async fn get_logs(&self) -> Result<Vec<AuditLogEntry>, ProviderError> {
        let req = self.request(reqwest::Method::GET, "get_logs");
        match self.call_ok("get_logs", req).await? {
            Value::Null => Ok(Vec::new()),
            data => serde_json::from_value(data)
                .map_err(|e| ProviderError::BackendUnavailable(format!("get_logs: {e}"))),
        }
    }

    async fn add_log(&self, entry: &AuditLogEntry) -> Result<(), ProviderError> {
        let req = self.request(reqwest::Method::POST, "add_log").json(entry);
        self.call_ok("add_log", req).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_api_key_is_ignored() {
        let provider = RemoteProvider::new("http://127.0.0.1:1/api", Some(String::new()), None)
            .expect("client");
        assert!(provider.api_key.is_none());
        assert_eq!(provider.endpoint(), "http://127.0.0.1:1/api");
    }

    #[test]
    fn envelope_tolerates_missing_fields() {
        let envelope: Envelope = serde_json::from_str(r#"{"success":true}"#).expect("decode");
        assert!(envelope.success);
        assert!(envelope.data.is_null());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_unavailable() {
        let provider = RemoteProvider::new(
            "http://127.0.0.1:9/api",
            None,
            Some(Duration::from_millis(500)),
        )
        .expect("client");
        let err = provider.get_config().await.expect_err("must fail");
        assert!(matches!(err, ProviderError::BackendUnavailable(_)));
    }
}
