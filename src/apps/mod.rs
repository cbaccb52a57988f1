//! App registration.
//!
//! Registering an Android, Apple or Web app is a long-running operation on the
//! Firebase Management API; the finished operation's `response` is the new app,
//! whose `appId` later calls need.

pub mod flow;
pub mod models;

use self::models::{
    AppPlatform, CreateAndroidAppRequest, CreateIosAppRequest, CreateWebAppRequest,
    ShaCertificate,
};
use crate::core::middleware::AuthMiddleware;
use crate::core::{build_client, build_status_client, send_json, ConsoleError};
use crate::operation::{Operation, OperationsClient};
use reqwest::header;
use reqwest_middleware::ClientWithMiddleware;
use serde::Serialize;

#[cfg(test)]
mod tests;

const FIREBASE_V1BETA1_API: &str = "https://firebase.googleapis.com/v1beta1";

/// Client for the app endpoints of the Firebase Management API.
#[derive(Clone)]
pub struct FirebaseApps {
    client: ClientWithMiddleware,
    status_client: ClientWithMiddleware,
    base_url: String,
}

impl FirebaseApps {
    pub fn new(middleware: AuthMiddleware) -> Self {
        Self::with_base_url(middleware, FIREBASE_V1BETA1_API.to_string())
    }

    pub(crate) fn with_base_url(middleware: AuthMiddleware, base_url: String) -> Self {
        Self {
            client: build_client(middleware.clone()),
            status_client: build_status_client(middleware),
            base_url,
        }
    }

    #[allow(dead_code)]
    pub(crate) fn new_with_client(client: ClientWithMiddleware, base_url: String) -> Self {
        Self {
            status_client: client.clone(),
            client,
            base_url,
        }
    }

    /// Status endpoint for the operations this client starts. Status reads are not retried.
    pub fn operations(&self) -> OperationsClient {
        OperationsClient::new_with_client(self.status_client.clone(), self.base_url.clone())
    }

    pub async fn create_android_app(
        &self,
        project_id: &str,
        request: &CreateAndroidAppRequest,
    ) -> Result<Operation, ConsoleError> {
        self.create_app(project_id, AppPlatform::Android, request).await
    }

    pub async fn create_ios_app(
        &self,
        project_id: &str,
        request: &CreateIosAppRequest,
    ) -> Result<Operation, ConsoleError> {
        self.create_app(project_id, AppPlatform::Ios, request).await
    }

    pub async fn create_web_app(
        &self,
        project_id: &str,
        request: &CreateWebAppRequest,
    ) -> Result<Operation, ConsoleError> {
        self.create_app(project_id, AppPlatform::Web, request).await
    }

    async fn create_app<T: Serialize + Sync>(
        &self,
        project_id: &str,
        platform: AppPlatform,
        request: &T,
    ) -> Result<Operation, ConsoleError> {
        let url = format!(
            "{}/projects/{}/{}",
            self.base_url,
            project_id,
            platform.collection()
        );

        let req = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(request)?);
        send_json(req, "Create app failed").await
    }

    /// Adds a signing certificate fingerprint to an Android app.
    pub async fn add_sha_certificate(
        &self,
        project_id: &str,
        app_id: &str,
        certificate: &ShaCertificate,
    ) -> Result<ShaCertificate, ConsoleError> {
        let url = format!(
            "{}/projects/{}/androidApps/{}/sha",
            self.base_url, project_id, app_id
        );

        let req = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(certificate)?);
        send_json(req, "Add SHA certificate failed").await
    }
}
