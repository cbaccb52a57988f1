//! Browsing and editing Cloud Firestore content.
//!
//! Plain one-shot REST calls: nothing here returns an operation.

pub mod models;

use self::models::{
    Document, ListCollectionIdsRequest, ListCollectionIdsResponse, ListDocumentsResponse,
};
use crate::core::middleware::AuthMiddleware;
use crate::core::{build_client, parse_error_response, send_empty, send_json, ConsoleError};
use reqwest::{header, StatusCode};
use reqwest_middleware::ClientWithMiddleware;
use serde_json::Value as JsonValue;
use url::Url;


const FIRESTORE_V1_API: &str = "https://firestore.googleapis.com/v1";

/// Client for the document endpoints of the Firestore REST API.
#[derive(Clone)]
pub struct FirestoreDocuments {
    client: ClientWithMiddleware,
    base_url: String,
}

impl FirestoreDocuments {
    pub fn new(middleware: AuthMiddleware) -> Self {
        Self {
            client: build_client(middleware),
            base_url: FIRESTORE_V1_API.to_string(),
        }
    }

    #[allow(dead_code)]
    pub(crate) fn new_with_client(client: ClientWithMiddleware, base_url: String) -> Self {
        Self { client, base_url }
    }

    fn documents_url(&self, project_id: &str, database_id: &str, path: &str) -> String {
        let root = format!(
            "{}/projects/{}/databases/{}/documents",
            self.base_url, project_id, database_id
        );
        let path = path.trim_matches('/');
        if path.is_empty() {
            root
        } else {
            format!("{}/{}", root, path)
        }
    }

    /// Lists the collection ids under `parent_path`, or the root collections when it is empty.
    ///
    /// Follows `nextPageToken` until the last page.
    pub async fn list_collection_ids(
        &self,
        project_id: &str,
        database_id: &str,
        parent_path: &str,
    ) -> Result<Vec<String>, ConsoleError> {
        let url = format!(
            "{}:listCollectionIds",
            self.documents_url(project_id, database_id, parent_path)
        );
        let mut ids = Vec::new();
        let mut next_page_token = None;

        loop {
            let request = ListCollectionIdsRequest {
                page_size: Some(100),
                page_token: next_page_token.take(),
            };
            let req = self
                .client
                .post(&url)
                .header(header::CONTENT_TYPE, "application/json")
                .body(serde_json::to_vec(&request)?);
            let page: ListCollectionIdsResponse = send_json(req, "List collections failed").await?;
            ids.extend(page.collection_ids);

            match page.next_page_token {
                Some(token) if !token.is_empty() => next_page_token = Some(token),
                _ => break,
            }
        }

        Ok(ids)
    }

    /// Reads one page of the documents in `collection_path`.
    pub async fn list_documents(
        &self,
        project_id: &str,
        database_id: &str,
        collection_path: &str,
        page_size: Option<u32>,
        page_token: Option<&str>,
    ) -> Result<ListDocumentsResponse, ConsoleError> {
        let url = self.documents_url(project_id, database_id, collection_path);
        let mut url_obj = Url::parse(&url).map_err(|e| ConsoleError::ApiError(e.to_string()))?;
        {
            let mut pairs = url_obj.query_pairs_mut();
            if let Some(size) = page_size {
                pairs.append_pair("pageSize", &size.to_string());
            }
            if let Some(token) = page_token {
                pairs.append_pair("pageToken", token);
            }
        }

        send_json(self.client.get(url_obj), "List documents failed").await
    }

    /// Reads the document at `document_path`. A missing document is `None`.
    pub async fn get_document(
        &self,
        project_id: &str,
        database_id: &str,
        document_path: &str,
    ) -> Result<Option<Document>, ConsoleError> {
        let url = self.documents_url(project_id, database_id, document_path);
        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(ConsoleError::ApiError(
                parse_error_response(response, "Get document failed").await,
            ));
        }

        Ok(Some(response.json().await?))
    }

    /// Writes `data` to the document at `document_path`, creating it if needed.
    ///
    /// With `update_mask`, only the listed field paths are written and other fields are
    /// kept. Without it, the document is replaced.
    pub async fn patch_document(
        &self,
        project_id: &str,
        database_id: &str,
        document_path: &str,
        data: &JsonValue,
        update_mask: Option<&[&str]>,
    ) -> Result<Document, ConsoleError> {
        let url = self.documents_url(project_id, database_id, document_path);
        let mut url_obj = Url::parse(&url).map_err(|e| ConsoleError::ApiError(e.to_string()))?;
        if let Some(paths) = update_mask {
            let mut pairs = url_obj.query_pairs_mut();
            for path in paths {
                pairs.append_pair("updateMask.fieldPaths", path);
            }
        }

        let body = Document::from_json(data)?;
        let req = self
            .client
            .patch(url_obj)
            .header(header::CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(&body)?);
        send_json(req, "Update document failed").await
    }

    pub async fn delete_document(
        &self,
        project_id: &str,
        database_id: &str,
        document_path: &str,
    ) -> Result<(), ConsoleError> {
        let url = self.documents_url(project_id, database_id, document_path);
        send_empty(self.client.delete(&url), "Delete document failed").await
    }
}
