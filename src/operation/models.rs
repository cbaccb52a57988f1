use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A `google.longrunning.Operation` returned by a mutating management API call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// The server-assigned name, e.g. `operations/cp.123` or
    /// `projects/p/databases/d/operations/abc`.
    pub name: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
}

impl Operation {
    /// An operation is terminal once it is done or carries an error.
    pub fn is_terminal(&self) -> bool {
        self.done || self.error.is_some()
    }

    /// True only for a terminal operation without an error.
    pub fn succeeded(&self) -> bool {
        self.is_terminal() && self.error.is_none()
    }

    /// Decodes the `response` payload of a finished operation.
    pub fn response_as<T: DeserializeOwned>(&self) -> Result<Option<T>, serde_json::Error> {
        self.response
            .clone()
            .map(serde_json::from_value)
            .transpose()
    }

    /// A terminal operation carrying an error synthesized on this side of the wire.
    pub(crate) fn failed_locally(name: &str, status: Status) -> Self {
        Self {
            name: name.to_string(),
            done: true,
            error: Some(status),
            ..Default::default()
        }
    }
}

/// A `google.rpc.Status` error attached to an operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<Value>,
    /// Set on statuses made up locally after a failed request, never on server errors.
    #[serde(skip)]
    synthesized: bool,
}

impl Status {
    pub const INTERNAL: i32 = 13;
    pub const UNAVAILABLE: i32 = 14;

    /// A status as a server would report it.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            ..Self::default()
        }
    }

    /// Synthesized when the status endpoint could not be reached.
    pub fn no_connection() -> Self {
        Self {
            synthesized: true,
            ..Self::new(Self::UNAVAILABLE, "no connection")
        }
    }

    /// Synthesized for any other failure while reading operation status.
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        Self {
            synthesized: true,
            ..Self::new(Self::INTERNAL, format!("internal error: {}", detail))
        }
    }

    /// Whether this status was made up locally rather than returned by the server.
    pub fn is_synthesized(&self) -> bool {
        self.synthesized
    }

    /// True only for the local "no connection" status; a server `UNAVAILABLE` is not.
    pub fn is_no_connection(&self) -> bool {
        self.synthesized && self.code == Self::UNAVAILABLE
    }
}
