use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AppPlatform {
    #[default]
    Android,
    Ios,
    Web,
}

impl AppPlatform {
    /// The collection name under `projects/{project_id}`.
    pub(crate) fn collection(&self) -> &'static str {
        match self {
            AppPlatform::Android => "androidApps",
            AppPlatform::Ios => "iosApps",
            AppPlatform::Web => "webApps",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAndroidAppRequest {
    pub package_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIosAppRequest {
    pub bundle_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_store_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWebAppRequest {
    pub display_name: String,
}

/// The app resource carried in the `response` of a finished create operation.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FirebaseAppInfo {
    pub name: String,
    pub app_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub package_name: Option<String>,
    #[serde(default)]
    pub bundle_id: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShaCertificateType {
    #[serde(rename = "SHA_1")]
    Sha1,
    #[serde(rename = "SHA_256")]
    Sha256,
    #[serde(rename = "SHA_CERTIFICATE_TYPE_UNSPECIFIED", other)]
    Unspecified,
}

/// A signing certificate fingerprint attached to an Android app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShaCertificate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub sha_hash: String,
    pub cert_type: ShaCertificateType,
}

impl ShaCertificate {
    /// Normalizes a colon separated fingerprint and infers its type from its length.
    pub fn from_fingerprint(fingerprint: &str) -> Self {
        let sha_hash: String = fingerprint
            .trim()
            .chars()
            .filter(|c| *c != ':')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let cert_type = match sha_hash.len() {
            40 => ShaCertificateType::Sha1,
            64 => ShaCertificateType::Sha256,
            _ => ShaCertificateType::Unspecified,
        };
        Self {
            name: None,
            sha_hash,
            cert_type,
        }
    }
}
