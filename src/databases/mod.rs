//! Cloud Firestore database management.
//!
//! Creating and patching a database are long-running operations of the Firestore
//! Admin API, reported on its own `operations` endpoint.

pub mod flow;
pub mod models;

use self::models::{Database, DatabasePatch, ListDatabasesResponse};
use crate::core::middleware::AuthMiddleware;
use crate::core::{build_client, build_status_client, send_json, ConsoleError};
use crate::operation::{Operation, OperationsClient};
use reqwest::header;
use reqwest_middleware::ClientWithMiddleware;
use url::Url;


const FIRESTORE_V1_API: &str = "https://firestore.googleapis.com/v1";

/// Client for the database endpoints of the Firestore Admin API.
#[derive(Clone)]
pub struct FirestoreDatabases {
    client: ClientWithMiddleware,
    status_client: ClientWithMiddleware,
    base_url: String,
}

impl FirestoreDatabases {
    pub fn new(middleware: AuthMiddleware) -> Self {
        Self::with_base_url(middleware, FIRESTORE_V1_API.to_string())
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

    pub async fn list_databases(&self, project_id: &str) -> Result<ListDatabasesResponse, ConsoleError> {
        let url = format!("{}/projects/{}/databases", self.base_url, project_id);
        send_json(self.client.get(&url), "List databases failed").await
    }

    pub async fn get_database(
        &self,
        project_id: &str,
        database_id: &str,
    ) -> Result<Database, ConsoleError> {
        let url = format!(
            "{}/projects/{}/databases/{}",
            self.base_url, project_id, database_id
        );
        send_json(self.client.get(&url), "Get database failed").await
    }

    /// Starts creating `database` under the id `database_id`.
    ///
    /// # Arguments
    ///
    /// * `database_id` - `(default)` or a 4 to 63 character id.
    /// * `database` - Location, type and protection settings; the name is ignored.
    pub async fn create_database(
        &self,
        project_id: &str,
        database_id: &str,
        database: &Database,
    ) -> Result<Operation, ConsoleError> {
        let url = format!("{}/projects/{}/databases", self.base_url, project_id);
        let mut url_obj = Url::parse(&url).map_err(|e| ConsoleError::ApiError(e.to_string()))?;
        url_obj.query_pairs_mut().append_pair("databaseId", database_id);

        let req = self
            .client
            .post(url_obj)
            .header(header::CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(database)?);
        send_json(req, "Create database failed").await
    }

    /// Starts updating the fields set on `patch`.
    pub async fn patch_database(
        &self,
        project_id: &str,
        database_id: &str,
        patch: &DatabasePatch,
    ) -> Result<Operation, ConsoleError> {
        let url = format!(
            "{}/projects/{}/databases/{}",
            self.base_url, project_id, database_id
        );
        let mut url_obj = Url::parse(&url).map_err(|e| ConsoleError::ApiError(e.to_string()))?;
        url_obj
            .query_pairs_mut()
            .append_pair("updateMask", &patch.update_mask());

        let req = self
            .client
            .patch(url_obj)
            .header(header::CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(patch)?);
        send_json(req, "Update database failed").await
    }
}
