//! Browsing and editing Realtime Database content over its REST API.
//!
//! Every node is addressed as `{database_url}/{path}.json`.

use crate::core::middleware::AuthMiddleware;
use crate::core::{build_client, ConsoleError};
use reqwest::header;
use reqwest_middleware::{ClientWithMiddleware, RequestBuilder};
use serde::Deserialize;
use serde_json::Value;
use url::Url;


/// Error body of the Realtime Database REST API.
#[derive(Debug, Deserialize)]
struct RealtimeErrorResponse {
    error: String,
}

#[derive(Debug, Deserialize)]
struct PushResponse {
    name: String,
}

/// Client for one Realtime Database instance.
#[derive(Clone)]
pub struct RealtimeDatabase {
    client: ClientWithMiddleware,
    base_url: Url,
}

impl RealtimeDatabase {
    /// # Arguments
    ///
    /// * `database_url` - The instance URL, e.g. `https://demo-project-default-rtdb.firebaseio.com`.
    pub fn new(middleware: AuthMiddleware, database_url: &str) -> Result<Self, ConsoleError> {
        Self::new_with_client(build_client(middleware), database_url)
    }

    pub(crate) fn new_with_client(
        client: ClientWithMiddleware,
        database_url: &str,
    ) -> Result<Self, ConsoleError> {
        let normalized = format!("{}/", database_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized)
            .map_err(|e| ConsoleError::InvalidArgument(format!("Invalid database URL: {}", e)))?;
        Ok(Self { client, base_url })
    }

    fn url_for_path(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, ConsoleError> {
        let path = path.trim_matches('/');
        if path.split('/').any(|key| key.contains(['.', '#', '$', '[', ']'])) {
            return Err(ConsoleError::InvalidArgument(format!(
                "Path '{}' contains '.', '#', '$', '[' or ']'",
                path
            )));
        }

        let mut url = self
            .base_url
            .join(&format!("{}.json", path))
            .map_err(|e| ConsoleError::InvalidArgument(format!("Invalid path '{}': {}", path, e)))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder, default_msg: &str) -> Result<Value, ConsoleError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = match response.json::<RealtimeErrorResponse>().await {
                Ok(body) => format!("{} (code: {})", body.error, status.as_u16()),
                Err(_) => format!("{}: {}", default_msg, status),
            };
            return Err(ConsoleError::ApiError(message));
        }

        Ok(response.json().await?)
    }

    fn with_body(request: RequestBuilder, value: &Value) -> Result<RequestBuilder, ConsoleError> {
        Ok(request
            .header(header::CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(value)?))
    }

    /// Reads the node at `path`. An empty node reads as `null`.
    pub async fn get(&self, path: &str) -> Result<Value, ConsoleError> {
        let url = self.url_for_path(path, &[])?;
        self.send(self.client.get(url), "Read failed").await
    }

    /// The keys of the direct children of `path`, without their contents.
    pub async fn child_keys(&self, path: &str) -> Result<Vec<String>, ConsoleError> {
        let url = self.url_for_path(path, &[("shallow", "true")])?;
        let value = self.send(self.client.get(url), "Read failed").await?;
        Ok(match value {
            Value::Object(map) => map.into_iter().map(|(key, _)| key).collect(),
            _ => Vec::new(),
        })
    }

    /// Replaces the node at `path`.
    pub async fn set(&self, path: &str, value: &Value) -> Result<Value, ConsoleError> {
        let url = self.url_for_path(path, &[])?;
        let req = Self::with_body(self.client.put(url), value)?;
        self.send(req, "Write failed").await
    }

    /// Merges the children of `value` into the node at `path`.
    pub async fn update(&self, path: &str, value: &Value) -> Result<Value, ConsoleError> {
        if !value.is_object() {
            return Err(ConsoleError::InvalidArgument(
                "Updates must be JSON objects".to_string(),
            ));
        }
        let url = self.url_for_path(path, &[])?;
        let req = Self::with_body(self.client.patch(url), value)?;
        self.send(req, "Update failed").await
    }

    /// Appends `value` under a generated key and returns that key.
    pub async fn push(&self, path: &str, value: &Value) -> Result<String, ConsoleError> {
        let url = self.url_for_path(path, &[])?;
        let req = Self::with_body(self.client.post(url), value)?;
        let body = self.send(req, "Push failed").await?;
        let pushed: PushResponse = serde_json::from_value(body)?;
        Ok(pushed.name)
    }

    pub async fn delete(&self, path: &str) -> Result<(), ConsoleError> {
        let url = self.url_for_path(path, &[])?;
        self.send(self.client.delete(url), "Delete failed").await?;
        Ok(())
    }
}
