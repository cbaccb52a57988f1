use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A Cloud Storage bucket.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    pub name: String,
    pub location: Option<String>,
    pub storage_class: Option<String>,
    pub time_created: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListBucketsResponse {
    #[serde(default)]
    pub items: Vec<Bucket>,
    pub next_page_token: Option<String>,
}

/// Metadata of a Cloud Storage object.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMetadata {
    pub name: Option<String>,
    pub bucket: Option<String>,
    pub generation: Option<String>,
    pub content_type: Option<String>,
    pub time_created: Option<String>,
    pub updated: Option<String>,
    pub storage_class: Option<String>,
    /// Decimal byte count.
    pub size: Option<String>,
    pub md5_hash: Option<String>,
    pub media_link: Option<String>,
    pub metadata: Option<BTreeMap<String, String>>,
    pub etag: Option<String>,
}

impl ObjectMetadata {
    pub fn size_bytes(&self) -> Option<u64> {
        self.size.as_deref().and_then(|size| size.parse().ok())
    }
}

/// One page of a bucket listing.
///
/// With a delimiter, objects under deeper "folders" are folded into `prefixes`.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListObjectsResponse {
    #[serde(default)]
    pub items: Vec<ObjectMetadata>,
    #[serde(default)]
    pub prefixes: Vec<String>,
    pub next_page_token: Option<String>,
}

/// Filters for [`CloudStorage::list_objects`](super::CloudStorage::list_objects).
#[derive(Debug, Clone, Default)]
pub struct ListObjectsOptions {
    pub prefix: Option<String>,
    pub delimiter: Option<String>,
    pub max_results: Option<u32>,
    pub page_token: Option<String>,
}

impl ListObjectsOptions {
    /// Lists one folder level under `prefix`, as the console file browser does.
    pub fn folder(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()).filter(|p: &String| !p.is_empty()),
            delimiter: Some("/".to_string()),
            ..Default::default()
        }
    }

    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(prefix) = &self.prefix {
            query.push(("prefix", prefix.clone()));
        }
        if let Some(delimiter) = &self.delimiter {
            query.push(("delimiter", delimiter.clone()));
        }
        if let Some(max) = self.max_results {
            query.push(("maxResults", max.to_string()));
        }
        if let Some(token) = &self.page_token {
            query.push(("pageToken", token.clone()));
        }
        query
    }
}
