use serde::{Deserialize, Serialize};

/// Body of `POST /v1/projects` on the Cloud Resource Manager API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateProjectRequest<'a> {
    pub(crate) project_id: &'a str,
    pub(crate) name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddGoogleAnalyticsRequest<'a> {
    pub(crate) analytics_account_id: &'a str,
}

/// A project with Firebase services enabled.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FirebaseProject {
    /// Resource name, `projects/{project_id}`.
    pub name: String,
    pub project_id: String,
    #[serde(default)]
    pub project_number: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub resources: Option<DefaultResources>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DefaultResources {
    pub hosting_site: Option<String>,
    pub realtime_database_instance: Option<String>,
    pub storage_bucket: Option<String>,
    pub location_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProjectsResponse {
    #[serde(default)]
    pub results: Vec<FirebaseProject>,
    pub next_page_token: Option<String>,
}

/// Google Analytics details linked to a project.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsDetails {
    pub analytics_property: Option<AnalyticsProperty>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsProperty {
    pub id: String,
    pub display_name: Option<String>,
    pub analytics_account_id: Option<String>,
}
