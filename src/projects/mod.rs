//! Project management.
//!
//! Creating a Firebase project takes up to three long-running operations: the Google
//! Cloud project is created through the Cloud Resource Manager API, then Firebase and
//! optionally Google Analytics are added through the Firebase Management API. Each API
//! reports progress on its own `operations` endpoint, exposed here as
//! [`FirebaseProjects::crm_operations`] and [`FirebaseProjects::firebase_operations`].
//!
//! [`flow::CreateProjectFlow`] drives the whole sequence from a wizard.

pub mod flow;
pub mod models;

use self::models::{
    AddGoogleAnalyticsRequest, AnalyticsDetails, CreateProjectRequest, FirebaseProject,
    ListProjectsResponse,
};
use crate::core::middleware::AuthMiddleware;
use crate::core::{build_client, build_status_client, send_json, ConsoleError};
use crate::operation::{Operation, OperationsClient};
use reqwest::header;
use reqwest_middleware::ClientWithMiddleware;
use url::Url;

#[cfg(test)]
mod tests;

const CRM_V1_API: &str = "https://cloudresourcemanager.googleapis.com/v1";
const FIREBASE_V1BETA1_API: &str = "https://firebase.googleapis.com/v1beta1";

/// Client for the project endpoints of the Resource Manager and Firebase Management APIs.
#[derive(Clone)]
pub struct FirebaseProjects {
    client: ClientWithMiddleware,
    status_client: ClientWithMiddleware,
    crm_base_url: String,
    firebase_base_url: String,
}

impl FirebaseProjects {
    /// Creates a new `FirebaseProjects` client.
    ///
    /// This is typically called via `FirebaseConsole::projects()`.
    pub fn new(middleware: AuthMiddleware) -> Self {
        Self::with_base_urls(middleware, CRM_V1_API.to_string(), FIREBASE_V1BETA1_API.to_string())
    }

    pub(crate) fn with_base_urls(
        middleware: AuthMiddleware,
        crm_base_url: String,
        firebase_base_url: String,
    ) -> Self {
        Self {
            client: build_client(middleware.clone()),
            status_client: build_status_client(middleware),
            crm_base_url,
            firebase_base_url,
        }
    }

    /// Creates a client with custom base URLs. Internal use only, primarily for testing.
    #[allow(dead_code)]
    pub(crate) fn new_with_client(
        client: ClientWithMiddleware,
        crm_base_url: String,
        firebase_base_url: String,
    ) -> Self {
        Self {
            status_client: client.clone(),
            client,
            crm_base_url,
            firebase_base_url,
        }
    }

    /// Status endpoint for operations returned by [`create_gcp_project`](Self::create_gcp_project).
    ///
    /// Status reads are not retried; a failed read ends the poll.
    pub fn crm_operations(&self) -> OperationsClient {
        OperationsClient::new_with_client(self.status_client.clone(), self.crm_base_url.clone())
    }

    /// Status endpoint for operations returned by the Firebase Management API.
    pub fn firebase_operations(&self) -> OperationsClient {
        OperationsClient::new_with_client(self.status_client.clone(), self.firebase_base_url.clone())
    }

    /// Starts creating a Google Cloud project.
    ///
    /// # Arguments
    ///
    /// * `project_id` - The globally unique project id, e.g. `my-app-42`.
    /// * `display_name` - The human readable project name.
    pub async fn create_gcp_project(
        &self,
        project_id: &str,
        display_name: &str,
    ) -> Result<Operation, ConsoleError> {
        let url = format!("{}/projects", self.crm_base_url);
        let request = CreateProjectRequest {
            project_id,
            name: display_name,
        };

        let req = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(&request)?);
        send_json(req, "Create project failed").await
    }

    /// Starts adding Firebase resources to an existing Google Cloud project.
    pub async fn add_firebase(&self, project_id: &str) -> Result<Operation, ConsoleError> {
        let url = format!("{}/projects/{}:addFirebase", self.firebase_base_url, project_id);

        let req = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .body("{}");
        send_json(req, "Add Firebase failed").await
    }

    /// Starts linking the project to a Google Analytics account.
    ///
    /// A new Analytics property is provisioned under `analytics_account_id`.
    pub async fn add_google_analytics(
        &self,
        project_id: &str,
        analytics_account_id: &str,
    ) -> Result<Operation, ConsoleError> {
        let url = format!(
            "{}/projects/{}:addGoogleAnalytics",
            self.firebase_base_url, project_id
        );
        let request = AddGoogleAnalyticsRequest {
            analytics_account_id,
        };

        let req = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(&request)?);
        send_json(req, "Add Google Analytics failed").await
    }

    pub async fn get_project(&self, project_id: &str) -> Result<FirebaseProject, ConsoleError> {
        let url = format!("{}/projects/{}", self.firebase_base_url, project_id);
        send_json(self.client.get(&url), "Get project failed").await
    }

    pub async fn get_analytics_details(
        &self,
        project_id: &str,
    ) -> Result<AnalyticsDetails, ConsoleError> {
        let url = format!("{}/projects/{}/analyticsDetails", self.firebase_base_url, project_id);
        send_json(self.client.get(&url), "Get analytics details failed").await
    }

    /// Lists Firebase projects visible to the service account, one page at a time.
    pub async fn list_projects(
        &self,
        page_size: Option<u32>,
        page_token: Option<&str>,
    ) -> Result<ListProjectsResponse, ConsoleError> {
        let url = format!("{}/projects", self.firebase_base_url);
        let mut url_obj = Url::parse(&url).map_err(|e| ConsoleError::ApiError(e.to_string()))?;
        {
            let mut query_pairs = url_obj.query_pairs_mut();
            if let Some(size) = page_size {
                query_pairs.append_pair("pageSize", &size.to_string());
            }
            if let Some(token) = page_token {
                query_pairs.append_pair("pageToken", token);
            }
        }

        send_json(self.client.get(url_obj), "List projects failed").await
    }
}
