use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{AlertError, ConfigError};

/// Delivers a text message to the user.
#[allow(async_fn_in_trait)]
pub trait Notifier {
    async fn send(&self, text: &str) -> Result<(), AlertError>;
}

pub const LINE_PUSH_URL: &str = "https://api.line.me/v2/bot/message/push";

/// LINE Messaging API push client.
#[derive(Clone)]
pub struct LineNotifier {
    http: Client,
    url: String,
    user_id: String,
    channel_access_token: String,
}

impl LineNotifier {
    pub fn new(user_id: impl Into<String>, channel_access_token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            url: LINE_PUSH_URL.to_string(),
            user_id: user_id.into(),
            channel_access_token: channel_access_token.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(config.user_id()?, config.channel_access_token()?))
    }

    /// Point the client at a different push endpoint.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn payload<'a>(&'a self, text: &'a str) -> PushRequest<'a> {
        PushRequest {
            to: &self.user_id,
            messages: vec![TextMessage { kind: "text", text }],
        }
    }
}

impl Notifier for LineNotifier {
    async fn send(&self, text: &str) -> Result<(), AlertError> {
        let res = self
            .http
            .post(&self.url)
            .bearer_auth(&self.channel_access_token)
            .json(&self.payload(text))
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &body));
        }

        Ok(())
    }
}

/// Build the error for a rejected push from the response body.
pub fn api_error(status_code: u16, body: &str) -> AlertError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|r| r.message)
        .unwrap_or_else(|_| body.trim().to_string());

    AlertError::Api {
        status_code,
        message,
    }
}

#[derive(Debug, Serialize)]
pub struct PushRequest<'a> {
    pub to: &'a str,
    pub messages: Vec<TextMessage<'a>>,
}

#[derive(Debug, Serialize)]
pub struct TextMessage<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
}
