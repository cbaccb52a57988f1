//! Firebase Test Lab matrices.
//!
//! A test matrix is not an `Operation`: it carries its own `state` field and is read
//! back through `testMatrices.get` until that state settles. The same poll loop as
//! for operations drives it.

pub mod models;

use self::models::{CancelTestMatrixResponse, TestMatrix};
use crate::core::middleware::AuthMiddleware;
use crate::core::{build_client, build_status_client, send_json, ConsoleError};
use crate::operation::{poll_until, DEFAULT_POLL_INTERVAL};
use reqwest::header;
use reqwest_middleware::ClientWithMiddleware;
use std::time::Duration;


const TESTING_V1_API: &str = "https://testing.googleapis.com/v1";

/// Client for the Cloud Testing API.
#[derive(Clone)]
pub struct TestLab {
    client: ClientWithMiddleware,
    status_client: ClientWithMiddleware,
    base_url: String,
    interval: Duration,
}

impl TestLab {
    pub fn new(middleware: AuthMiddleware) -> Self {
        Self::with_base_url(middleware, TESTING_V1_API.to_string())
    }

    pub(crate) fn with_base_url(middleware: AuthMiddleware, base_url: String) -> Self {
        Self {
            client: build_client(middleware.clone()),
            status_client: build_status_client(middleware),
            base_url,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    #[allow(dead_code)]
    pub(crate) fn new_with_client(client: ClientWithMiddleware, base_url: String) -> Self {
        Self {
            status_client: client.clone(),
            client,
            base_url,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Sets the delay between two reads in [`wait_for_matrix`](Self::wait_for_matrix).
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Submits `matrix` for execution. The returned matrix is usually still `VALIDATING`.
    pub async fn create_matrix(
        &self,
        project_id: &str,
        matrix: &TestMatrix,
    ) -> Result<TestMatrix, ConsoleError> {
        let url = format!("{}/projects/{}/testMatrices", self.base_url, project_id);

        let req = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(matrix)?);
        send_json(req, "Create test matrix failed").await
    }

    pub async fn get_matrix(
        &self,
        project_id: &str,
        matrix_id: &str,
    ) -> Result<TestMatrix, ConsoleError> {
        self.read_matrix(&self.client, project_id, matrix_id).await
    }

    async fn read_matrix(
        &self,
        client: &ClientWithMiddleware,
        project_id: &str,
        matrix_id: &str,
    ) -> Result<TestMatrix, ConsoleError> {
        let url = format!(
            "{}/projects/{}/testMatrices/{}",
            self.base_url, project_id, matrix_id
        );
        send_json(client.get(&url), "Get test matrix failed").await
    }

    pub async fn cancel_matrix(
        &self,
        project_id: &str,
        matrix_id: &str,
    ) -> Result<CancelTestMatrixResponse, ConsoleError> {
        let url = format!(
            "{}/projects/{}/testMatrices/{}:cancel",
            self.base_url, project_id, matrix_id
        );
        send_json(self.client.post(&url), "Cancel test matrix failed").await
    }

    /// Reads the matrix until it reaches a terminal state.
    ///
    /// A transport or API error ends the wait immediately and is returned; the reads
    /// are not retried.
    pub async fn wait_for_matrix(
        &self,
        project_id: &str,
        matrix_id: &str,
    ) -> Result<TestMatrix, ConsoleError> {
        tracing::info!(project_id, matrix_id, "waiting for test matrix");
        let matrix = poll_until(self.interval, || self.read_matrix(&self.status_client, project_id, matrix_id)).await?;
        tracing::info!(matrix_id, state = ?matrix.state, outcome = ?matrix.outcome_summary, "test matrix settled");
        Ok(matrix)
    }
}
