//! src/messaging/mod.rs
use crate::domain::RecipientHandle;
use async_trait::async_trait;
use tokio::sync::watch;

pub mod whatsapp;
pub use whatsapp::WhatsApp;

/// Lifecycle of the messaging session.
///
/// `Uninitialized -> AwaitingPairing -> Ready`, with `Failed` reachable from
/// any state that is not `Ready`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    /// The account has to be linked, usually by scanning `pairing_code` as a QR code.
    AwaitingPairing { pairing_code: Option<String> },
    Ready,
    Failed { reason: String },
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::AwaitingPairing { .. } => "awaiting_pairing",
            SessionState::Ready => "ready",
            SessionState::Failed { .. } => "failed",
        }
    }
}

/// Acknowledgement of an accepted message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ack {
    pub id: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum DeliveryError {
    #[error("The messaging session is not ready (state: {})", .0.as_str())]
    NotReady(SessionState),
    #[error("Failed to deliver the message")]
    Transport(#[source] reqwest::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum GatewayError {
    #[error("Failed to query the messaging session")]
    Status(#[source] reqwest::Error),
    #[error("The messaging session failed: {0}")]
    SessionFailed(String),
}

/// Sends text messages on behalf of the service.
///
/// One instance is created at startup and shared by every request.
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    /// Starts the session lifecycle. Calling it more than once has no effect.
    async fn initialize(&self) -> Result<(), GatewayError>;

    fn state(&self) -> SessionState;

    fn is_ready(&self) -> bool {
        self.state() == SessionState::Ready
    }

    /// Receiver that observes every state transition.
    fn subscribe(&self) -> watch::Receiver<SessionState>;

    async fn send(&self, recipient: &RecipientHandle, body: &str) -> Result<Ack, DeliveryError>;
}
