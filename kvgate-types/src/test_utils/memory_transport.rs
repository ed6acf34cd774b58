//! HashMap-backed transport for tests.

use crate::transport::{Transport, TransportError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Serves canned bodies by path and records every call.
///
/// Paths with no body answer HTTP 404. Individual paths can be made to fail
/// with any status via [`MemoryTransport::with_status`].
#[derive(Default)]
pub struct MemoryTransport {
    bodies: HashMap<String, String>,
    statuses: HashMap<String, (u16, String)>,
    calls: Mutex<Vec<String>>,
}

impl MemoryTransport {
    /// Create an empty transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` at `path`.
    pub fn with_body(mut self, path: impl Into<String>, body: impl Into<String>) -> Self {
        self.bodies.insert(path.into(), body.into());
        self
    }

    /// Serve a JSON value at `path`.
    pub fn with_json(self, path: impl Into<String>, body: serde_json::Value) -> Self {
        self.with_body(path, body.to_string())
    }

    /// Answer `path` with an HTTP error.
    pub fn with_status(
        mut self,
        path: impl Into<String>,
        status: u16,
        body: impl Into<String>,
    ) -> Self {
        self.statuses.insert(path.into(), (status, body.into()));
        self
    }

    /// Paths requested so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of calls made for `path`.
    pub fn call_count(&self, path: &str) -> usize {
        self.calls().iter().filter(|p| p.as_str() == path).count()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn get(&self, path: &str) -> Result<String, TransportError> {
        self.calls
            .lock()
            .map_err(|e| TransportError::Other(e.to_string().into()))?
            .push(path.to_owned());
        if let Some((status, body)) = self.statuses.get(path) {
            return Err(TransportError::Status {
                status: *status,
                body: body.clone(),
            });
        }
        self.bodies
            .get(path)
            .cloned()
            .ok_or_else(|| TransportError::Status {
                status: 404,
                body: "{\"errors\":[]}\n".into(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_bodies_and_records_calls() {
        let transport = MemoryTransport::new()
            .with_json("v1/secret/a", serde_json::json!({"data": {"k": "v"}}));
        let body = transport.get("v1/secret/a").await.unwrap();
        assert!(body.contains("\"k\""));
        assert_eq!(transport.call_count("v1/secret/a"), 1);
    }

    #[tokio::test]
    async fn missing_path_is_404() {
        let transport = MemoryTransport::new();
        let err = transport.get("v1/nope").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(transport.calls(), vec!["v1/nope".to_string()]);
    }

    #[tokio::test]
    async fn configured_status_wins() {
        let transport = MemoryTransport::new()
            .with_body("v1/x", "{}")
            .with_status("v1/x", 403, "permission denied");
        let err = transport.get("v1/x").await.unwrap_err();
        assert!(matches!(err, TransportError::Status { status: 403, .. }));
    }
}
