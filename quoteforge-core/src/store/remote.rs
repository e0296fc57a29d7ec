//! Remote domain store over HTTP.
//!
//! The remote store holds one JSON payload per (domain, user). It is a
//! best-effort mirror: configuration may be absent entirely, and any
//! failure degrades to local-only operation at the call site.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::Domain;

/// Errors that can occur talking to the remote store.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Remote sync is not configured; expected degraded mode, not a fault.
    #[error("remote sync is not configured")]
    NotConfigured,
    /// Network-level failure.
    #[error("HTTP error: {0}")]
    Http(String),
    /// Server answered with a non-success status.
    #[error("server returned status {0}")]
    Status(u16),
    /// Response body did not decode as the expected envelope.
    #[error("malformed response body: {0}")]
    Body(String),
}

impl RemoteError {
    /// True for conditions that are part of normal operation rather than
    /// faults worth logging.
    pub fn is_expected(&self) -> bool {
        matches!(self, RemoteError::NotConfigured)
    }
}

/// Async access to the per-user remote domain store.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch the payload for (domain, user). `Ok(None)` means the server
    /// is reachable but holds no record yet.
    async fn fetch(&self, domain: Domain, user_id: &str) -> Result<Option<Value>, RemoteError>;

    /// Replace the payload for (domain, user).
    async fn push(&self, domain: Domain, user_id: &str, payload: &Value) -> Result<(), RemoteError>;
}

#[derive(Debug, Deserialize)]
struct FetchEnvelope {
    ok: bool,
    #[serde(default)]
    payload: Option<Value>,
}

#[derive(Debug, Serialize)]
struct PushEnvelope<'a> {
    #[serde(rename = "userId")]
    user_id: &'a str,
    payload: &'a Value,
}

#[derive(Debug, Deserialize)]
struct PushAck {
    ok: bool,
}

/// HTTP implementation of the remote domain store.
#[derive(Debug, Clone)]
pub struct HttpRemoteStore {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpRemoteStore {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn domain_url(&self, domain: Domain) -> String {
        format!("{}/{}", self.base_url, domain.name())
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => req.header("Authorization", format!("Bearer {}", key)),
            None => req,
        }
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn fetch(&self, domain: Domain, user_id: &str) -> Result<Option<Value>, RemoteError> {
        let req = self
            .client
            .get(self.domain_url(domain))
            .query(&[("userId", user_id)]);

        let response = self
            .authorize(req)
            .send()
            .await
            .map_err(|e| RemoteError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status.as_u16()));
        }

        let envelope: FetchEnvelope = response
            .json()
            .await
            .map_err(|e| RemoteError::Body(e.to_string()))?;

        if envelope.ok {
            Ok(envelope.payload)
        } else {
            Ok(None)
        }
    }

    async fn push(&self, domain: Domain, user_id: &str, payload: &Value) -> Result<(), RemoteError> {
        let req = self.client.post(self.domain_url(domain)).json(&PushEnvelope {
            user_id,
            payload,
        });

        let response = self
            .authorize(req)
            .send()
            .await
            .map_err(|e| RemoteError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status.as_u16()));
        }

        let ack: PushAck = response
            .json()
            .await
            .map_err(|e| RemoteError::Body(e.to_string()))?;

        if ack.ok {
            Ok(())
        } else {
            Err(RemoteError::Body("server rejected the push".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_url() {
        let store = HttpRemoteStore::new("https://sync.example.com/", None);
        assert_eq!(store.base_url(), "https://sync.example.com");
        assert_eq!(
            store.domain_url(Domain::PriceOverrides),
            "https://sync.example.com/priceOverrides"
        );
    }

    #[test]
    fn test_fetch_envelope_decoding() {
        let envelope: FetchEnvelope =
            serde_json::from_str(r#"{"ok":true,"payload":{"business_name":"Acme"}}"#).unwrap();
        assert!(envelope.ok);
        assert!(envelope.payload.is_some());

        let empty: FetchEnvelope = serde_json::from_str(r#"{"ok":true}"#).unwrap();
        assert!(empty.payload.is_none());
    }

    #[test]
    fn test_push_envelope_field_names() {
        let payload = serde_json::json!([1, 2]);
        let envelope = PushEnvelope {
            user_id: "u-1",
            payload: &payload,
        };
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["userId"], "u-1");
        assert_eq!(json["payload"], payload);
    }
}
