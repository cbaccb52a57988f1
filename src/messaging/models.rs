use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A Cloud Messaging v1 message.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Output only. The id of the sent message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<BTreeMap<String, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub android: Option<AndroidConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fcm_options: Option<FcmOptions>,

    /// Registration token of a single device.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Topic name, without the `/topics/` prefix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,

    /// Topic condition, e.g. `'news' in topics && 'sports' in topics`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AndroidConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collapse_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<AndroidMessagePriority>,
    /// Seconds with an `s` suffix, e.g. `3600s`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AndroidMessagePriority {
    Normal,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FcmOptions {
    /// Label attached to delivery data in reports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analytics_label: Option<String>,
}

/// Who a campaign is delivered to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CampaignTarget {
    Token(String),
    Topic(String),
    Condition(String),
}

/// A notification campaign as composed in the console.
#[derive(Debug, Clone, PartialEq)]
pub struct Campaign {
    /// Campaign name, sent as the analytics label.
    pub name: String,
    pub title: String,
    pub body: String,
    pub image: Option<String>,
    pub target: CampaignTarget,
    pub data: BTreeMap<String, String>,
    pub ttl_seconds: Option<u64>,
}

impl Campaign {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        target: CampaignTarget,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            body: body.into(),
            image: None,
            target,
            data: BTreeMap::new(),
            ttl_seconds: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn with_ttl_seconds(mut self, seconds: u64) -> Self {
        self.ttl_seconds = Some(seconds);
        self
    }

    /// The message sent for this campaign.
    pub fn to_message(&self) -> Message {
        let mut message = Message {
            notification: Some(Notification {
                title: Some(self.title.clone()),
                body: Some(self.body.clone()),
                image: self.image.clone(),
            }),
            data: (!self.data.is_empty()).then(|| self.data.clone()),
            android: self.ttl_seconds.map(|seconds| AndroidConfig {
                ttl: Some(format!("{}s", seconds)),
                ..Default::default()
            }),
            fcm_options: Some(FcmOptions {
                analytics_label: Some(analytics_label(&self.name)),
            }),
            ..Default::default()
        };
        match &self.target {
            CampaignTarget::Token(token) => message.token = Some(token.clone()),
            CampaignTarget::Topic(topic) => message.topic = Some(topic.clone()),
            CampaignTarget::Condition(condition) => message.condition = Some(condition.clone()),
        }
        message
    }
}

/// Analytics labels allow `[a-zA-Z0-9-_.~%]` and at most 50 characters.
fn analytics_label(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || "-_.~%".contains(c) {
                c
            } else {
                '_'
            }
        })
        .take(50)
        .collect()
}

#[derive(Deserialize)]
pub(crate) struct SendResponse {
    pub name: String,
}
