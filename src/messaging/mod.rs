//! Sending Cloud Messaging notifications and campaigns.

pub mod models;

use self::models::{Campaign, Message, SendResponse};
use crate::core::middleware::AuthMiddleware;
use crate::core::{build_client, send_json, ConsoleError};
use crate::wizard::validation::is_valid_topic_name;
use reqwest::header;
use reqwest_middleware::ClientWithMiddleware;
use serde::Serialize;
use tracing::info;


const FCM_V1_API: &str = "https://fcm.googleapis.com/v1";

#[derive(Serialize)]
struct SendRequest<'a> {
    validate_only: bool,
    message: &'a Message,
}

/// Client for the Cloud Messaging v1 send endpoint.
#[derive(Clone)]
pub struct FirebaseMessaging {
    client: ClientWithMiddleware,
    base_url: String,
}

impl FirebaseMessaging {
    pub fn new(middleware: AuthMiddleware) -> Self {
        Self {
            client: build_client(middleware),
            base_url: FCM_V1_API.to_string(),
        }
    }

    #[allow(dead_code)]
    pub(crate) fn new_with_client(client: ClientWithMiddleware, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Sends `message` and returns its id.
    pub async fn send(&self, project_id: &str, message: &Message) -> Result<String, ConsoleError> {
        validate_message(message)?;
        self.send_request(project_id, message, false).await
    }

    /// Validates `message` on the server without delivering it.
    pub async fn send_dry_run(
        &self,
        project_id: &str,
        message: &Message,
    ) -> Result<String, ConsoleError> {
        validate_message(message)?;
        self.send_request(project_id, message, true).await
    }

    /// Sends a composed campaign.
    pub async fn send_campaign(
        &self,
        project_id: &str,
        campaign: &Campaign,
    ) -> Result<String, ConsoleError> {
        if campaign.title.trim().is_empty() || campaign.body.trim().is_empty() {
            return Err(ConsoleError::InvalidArgument(
                "A campaign needs a title and a body".to_string(),
            ));
        }
        let name = self.send(project_id, &campaign.to_message()).await?;
        info!(campaign = %campaign.name, message = %name, "campaign sent");
        Ok(name)
    }

    async fn send_request(
        &self,
        project_id: &str,
        message: &Message,
        dry_run: bool,
    ) -> Result<String, ConsoleError> {
        let url = format!("{}/projects/{}/messages:send", self.base_url, project_id);
        let request = SendRequest {
            validate_only: dry_run,
            message,
        };

        let req = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(&request)?);
        let sent: SendResponse = send_json(req, "FCM send failed").await?;
        Ok(sent.name)
    }
}

fn validate_message(message: &Message) -> Result<(), ConsoleError> {
    let targets = [
        message.token.is_some(),
        message.topic.is_some(),
        message.condition.is_some(),
    ]
    .iter()
    .filter(|&&t| t)
    .count();

    if targets != 1 {
        return Err(ConsoleError::InvalidArgument(
            "Message must have exactly one of token, topic, or condition.".to_string(),
        ));
    }

    if let Some(topic) = &message.topic {
        if !is_valid_topic_name(topic) {
            return Err(ConsoleError::InvalidArgument(format!(
                "Invalid topic name '{}'",
                topic
            )));
        }
    }

    Ok(())
}
