//! Browsing Cloud Storage for Firebase buckets.
//!
//! Listing, metadata reads and deletes through the JSON API. Uploads and downloads are
//! left to the storage SDKs.

pub mod models;

use self::models::{ListBucketsResponse, ListObjectsOptions, ListObjectsResponse, ObjectMetadata};
use crate::core::middleware::AuthMiddleware;
use crate::core::{build_client, send_empty, send_json, ConsoleError};
use reqwest_middleware::ClientWithMiddleware;
use url::Url;

#[cfg(test)]
mod tests;

const STORAGE_V1_API: &str = "https://storage.googleapis.com/storage/v1";

/// The bucket Firebase provisions for a project.
pub fn default_bucket_name(project_id: &str) -> String {
    format!("{}.appspot.com", project_id)
}

/// Client for the bucket and object endpoints of the Cloud Storage JSON API.
#[derive(Clone)]
pub struct CloudStorage {
    client: ClientWithMiddleware,
    base_url: String,
}

impl CloudStorage {
    pub fn new(middleware: AuthMiddleware) -> Self {
        Self {
            client: build_client(middleware),
            base_url: STORAGE_V1_API.to_string(),
        }
    }

    #[allow(dead_code)]
    pub(crate) fn new_with_client(client: ClientWithMiddleware, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// `{base}/b/{bucket}/o[/{object}]` with each part encoded as one path segment, so
    /// the slashes of an object name are escaped.
    pub(crate) fn objects_url(&self, bucket: &str, object: Option<&str>) -> Result<Url, ConsoleError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| ConsoleError::ApiError(e.to_string()))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ConsoleError::ApiError(format!("Invalid base URL: {}", self.base_url)))?;
            segments.pop_if_empty().extend(["b", bucket, "o"]);
            if let Some(object) = object {
                segments.push(object);
            }
        }
        Ok(url)
    }

    /// Reads one page of the project's buckets.
    pub async fn list_buckets(
        &self,
        project_id: &str,
        page_token: Option<&str>,
    ) -> Result<ListBucketsResponse, ConsoleError> {
        let url = format!("{}/b", self.base_url);
        let mut query = vec![("project", project_id)];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }
        send_json(self.client.get(&url).query(&query), "List buckets failed").await
    }

    /// Reads one page of the objects in `bucket`.
    pub async fn list_objects(
        &self,
        bucket: &str,
        options: &ListObjectsOptions,
    ) -> Result<ListObjectsResponse, ConsoleError> {
        let url = self.objects_url(bucket, None)?;
        send_json(
            self.client.get(url).query(&options.query()),
            "List objects failed",
        )
        .await
    }

    pub async fn get_object_metadata(
        &self,
        bucket: &str,
        object: &str,
    ) -> Result<ObjectMetadata, ConsoleError> {
        let url = self.objects_url(bucket, Some(object))?;
        send_json(self.client.get(url), "Get metadata failed").await
    }

    pub async fn delete_object(&self, bucket: &str, object: &str) -> Result<(), ConsoleError> {
        let url = self.objects_url(bucket, Some(object))?;
        send_empty(self.client.delete(url), "Delete failed").await
    }
}
