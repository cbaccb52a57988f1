use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DatabaseType {
    #[default]
    FirestoreNative,
    DatastoreMode,
    #[serde(rename = "DATABASE_TYPE_UNSPECIFIED", other)]
    Unspecified,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeleteProtectionState {
    #[serde(rename = "DELETE_PROTECTION_ENABLED")]
    Enabled,
    #[default]
    #[serde(rename = "DELETE_PROTECTION_DISABLED")]
    Disabled,
    #[serde(rename = "DELETE_PROTECTION_STATE_UNSPECIFIED", other)]
    Unspecified,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointInTimeRecoveryEnablement {
    #[serde(rename = "POINT_IN_TIME_RECOVERY_ENABLED")]
    Enabled,
    #[default]
    #[serde(rename = "POINT_IN_TIME_RECOVERY_DISABLED")]
    Disabled,
    #[serde(rename = "POINT_IN_TIME_RECOVERY_ENABLEMENT_UNSPECIFIED", other)]
    Unspecified,
}

/// A Cloud Firestore database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Database {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub location_id: String,
    #[serde(rename = "type", default)]
    pub database_type: DatabaseType,
    #[serde(default)]
    pub delete_protection_state: DeleteProtectionState,
    #[serde(default)]
    pub point_in_time_recovery_enablement: PointInTimeRecoveryEnablement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

/// Fields to change on an existing database; unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabasePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_protection_state: Option<DeleteProtectionState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_in_time_recovery_enablement: Option<PointInTimeRecoveryEnablement>,
}

impl DatabasePatch {
    /// The `updateMask` naming every field set on this patch.
    pub(crate) fn update_mask(&self) -> String {
        let mut mask_parts = Vec::new();
        if self.delete_protection_state.is_some() {
            mask_parts.push("deleteProtectionState");
        }
        if self.point_in_time_recovery_enablement.is_some() {
            mask_parts.push("pointInTimeRecoveryEnablement");
        }
        mask_parts.join(",")
    }

    pub fn is_empty(&self) -> bool {
        self.delete_protection_state.is_none() && self.point_in_time_recovery_enablement.is_none()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDatabasesResponse {
    #[serde(default)]
    pub databases: Vec<Database>,
    #[serde(default)]
    pub unreachable: Vec<String>,
}
