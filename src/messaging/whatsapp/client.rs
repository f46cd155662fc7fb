//! src/messaging/whatsapp/client.rs
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
pub struct TextMessage<'a> {
    session: &'a str,
    #[serde(rename = "chatId")]
    pub chat_id: &'a str,
    pub text: &'a str,
}

/// Session status as reported by the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    Starting,
    ScanQrCode,
    Working,
    Failed,
    Stopped,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionInfo {
    pub status: SessionStatus,
    #[serde(default)]
    pub qr: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SendReceipt {
    #[serde(default)]
    id: Option<String>,
}

/// Thin HTTP client for the bridge that owns the WhatsApp Web session.
#[derive(Debug)]
pub struct BridgeClient {
    http_client: Client,
    base_url: String,
    session: String,
    api_key: Secret<String>,
}

impl BridgeClient {
    pub fn new(
        base_url: String,
        session: String,
        api_key: Secret<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            api_key,
        })
    }

    pub async fn session_info(&self) -> Result<SessionInfo, reqwest::Error> {
        let url = format!("{}/api/sessions/{}", self.base_url, self.session);

        self.http_client
            .get(&url)
            .header("X-Api-Key", self.api_key.expose_secret())
            .header("accept", "application/json")
            .send()
            .await?
            .error_for_status()?
            .json::<SessionInfo>()
            .await
    }

    /// Returns the message id assigned by the bridge, when it reports one.
    pub async fn send_text(&self, chat_id: &str, text: &str) -> Result<Option<String>, reqwest::Error> {
        let url = format!("{}/api/sendText", self.base_url);
        let message = TextMessage {
            session: &self.session,
            chat_id,
            text,
        };

        let body = self
            .http_client
            .post(&url)
            .header("X-Api-Key", self.api_key.expose_secret())
            .header("accept", "application/json")
            .json(&message)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let receipt = serde_json::from_str::<SendReceipt>(&body).unwrap_or_default();
        Ok(receipt.id)
    }
}
