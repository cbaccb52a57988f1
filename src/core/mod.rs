pub mod middleware;

use self::middleware::AuthMiddleware;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::Deserialize;
use thiserror::Error;

/// Errors returned by the management API clients.
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// Wrapper for `reqwest::Error`.
    #[error("HTTP Request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    /// Wrapper for `reqwest_middleware::Error`.
    #[error("Middleware error: {0}")]
    MiddlewareError(#[from] reqwest_middleware::Error),
    /// Errors returned by the remote API.
    #[error("API error: {0}")]
    ApiError(String),
    /// Wrapper for `serde_json::Error`.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    /// A request rejected before it was sent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// The service account key does not name a project.
    #[error("Project ID is missing in service account key")]
    ProjectIdMissing,
}

impl ConsoleError {
    /// Whether the request never reached the server (refused, unresolved or timed out).
    pub fn is_connectivity(&self) -> bool {
        match self {
            ConsoleError::RequestError(e) => e.is_connect() || e.is_timeout(),
            ConsoleError::MiddlewareError(reqwest_middleware::Error::Reqwest(e)) => {
                e.is_connect() || e.is_timeout()
            }
            _ => false,
        }
    }
}

/// The error envelope returned by Google REST APIs.
#[derive(Debug, Deserialize)]
pub struct GoogleErrorResponse {
    pub error: GoogleErrorDetails,
}

#[derive(Debug, Deserialize)]
pub struct GoogleErrorDetails {
    pub code: u16,
    pub message: String,
    pub status: Option<String>,
}

impl GoogleErrorResponse {
    pub fn display_message(&self) -> String {
        match &self.error.status {
            Some(status) => format!("{} (code: {}, status: {})", self.error.message, self.error.code, status),
            None => format!("{} (code: {})", self.error.message, self.error.code),
        }
    }
}

/// Reads the error envelope of a failed response into a display message.
pub async fn parse_error_response(response: reqwest::Response, default_msg: &str) -> String {
    let status = response.status();
    match response.json::<GoogleErrorResponse>().await {
        Ok(error_resp) => error_resp.display_message(),
        Err(_) => format!("{}: {}", default_msg, status),
    }
}

/// Builds the authenticated client used for mutations and one-shot reads.
///
/// Transient HTTP failures are retried here, three times with exponential backoff.
pub(crate) fn build_client(middleware: AuthMiddleware) -> ClientWithMiddleware {
    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(3);

    ClientBuilder::new(Client::new())
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .with(middleware)
        .build()
}

/// Builds the authenticated client used for operation status reads.
///
/// It has no retry layer: a failed status read is final and ends the poll.
pub(crate) fn build_status_client(middleware: AuthMiddleware) -> ClientWithMiddleware {
    ClientBuilder::new(Client::new()).with(middleware).build()
}

/// Sends a prepared request and decodes a JSON body, mapping non-2xx responses to `ApiError`.
pub(crate) async fn send_json<T: serde::de::DeserializeOwned>(
    request: reqwest_middleware::RequestBuilder,
    default_msg: &str,
) -> Result<T, ConsoleError> {
    let response = request.send().await?;

    if !response.status().is_success() {
        return Err(ConsoleError::ApiError(parse_error_response(response, default_msg).await));
    }

    Ok(response.json().await?)
}

/// Sends a prepared request whose response body is ignored.
pub(crate) async fn send_empty(
    request: reqwest_middleware::RequestBuilder,
    default_msg: &str,
) -> Result<(), ConsoleError> {
    let response = request.send().await?;

    if !response.status().is_success() {
        return Err(ConsoleError::ApiError(parse_error_response(response, default_msg).await));
    }

    Ok(())
}


#[cfg(test)]
pub(crate) mod testing;
