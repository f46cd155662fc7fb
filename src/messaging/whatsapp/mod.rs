//! src/messaging/whatsapp/mod.rs
use crate::configuration::WhatsAppSettings;
use crate::domain::RecipientHandle;
use crate::messaging::{Ack, DeliveryError, GatewayError, MessagingGateway, SessionState};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

mod client;
use client::{BridgeClient, SessionInfo, SessionStatus};

/// Gateway backed by a WhatsApp Web session living in an HTTP bridge.
///
/// Cloning is cheap; all clones share the same session state.
#[derive(Debug, Clone)]
pub struct WhatsApp {
    client: Arc<BridgeClient>,
    state: Arc<watch::Sender<SessionState>>,
    started: Arc<AtomicBool>,
    poll_interval: Duration,
}

impl WhatsApp {
    pub fn new(settings: &WhatsAppSettings) -> Result<Self, reqwest::Error> {
        let client = BridgeClient::new(
            settings.base_url.clone(),
            settings.session.clone(),
            settings.api_key.clone(),
            settings.timeout(),
        )?;
        let (state, _) = watch::channel(SessionState::Uninitialized);

        Ok(Self {
            client: Arc::new(client),
            state: Arc::new(state),
            started: Arc::new(AtomicBool::new(false)),
            poll_interval: settings.pairing_poll_interval(),
        })
    }

    fn transition(&self, next: SessionState) {
        let changed = self.state.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next.clone();
            true
        });
        if !changed {
            return;
        }

        match &next {
            SessionState::AwaitingPairing {
                pairing_code: Some(code),
            } => tracing::warn!(
                pairing_code = %code,
                "Scan the QR code with WhatsApp on your phone to pair the session"
            ),
            SessionState::AwaitingPairing { pairing_code: None } => {
                tracing::info!("Waiting for the WhatsApp session to start")
            }
            SessionState::Ready => tracing::info!("WhatsApp session is ready"),
            SessionState::Failed { reason } => {
                tracing::error!(reason = %reason, "WhatsApp session failed")
            }
            SessionState::Uninitialized => {}
        }
    }

    fn apply(&self, info: SessionInfo) -> SessionState {
        let next = match info.status {
            SessionStatus::Working => SessionState::Ready,
            SessionStatus::ScanQrCode | SessionStatus::Starting => SessionState::AwaitingPairing {
                pairing_code: info.qr,
            },
            SessionStatus::Failed => SessionState::Failed {
                reason: "the bridge reported the session as failed".to_string(),
            },
            SessionStatus::Stopped => SessionState::Failed {
                reason: "the session is stopped on the bridge".to_string(),
            },
            SessionStatus::Unknown => SessionState::Failed {
                reason: "the bridge reported an unknown session status".to_string(),
            },
        };
        self.transition(next.clone());
        next
    }

    async fn refresh(&self) -> Result<SessionState, GatewayError> {
        let info = self
            .client
            .session_info()
            .await
            .map_err(GatewayError::Status)?;
        Ok(self.apply(info))
    }

    /// Keeps the session state in step with the bridge for as long as the
    /// gateway is in use. `Failed` and `Ready` are not final: a bridge that
    /// comes back, or a session that gets logged out, shows up on the next poll.
    #[tracing::instrument(name = "Watching the WhatsApp session", skip(self))]
    async fn watch_session(self) {
        let mut interval = tokio::time::interval(self.poll_interval);
        // The first tick completes immediately.
        interval.tick().await;

        loop {
            interval.tick().await;
            // Every other handle is gone.
            if Arc::strong_count(&self.client) == 1 {
                break;
            }
            if let Err(e) = self.refresh().await {
                tracing::warn!(
                    error.cause_chain = ?e,
                    "Failed to poll the WhatsApp session status"
                );
            }
        }
    }
}

#[async_trait]
impl MessagingGateway for WhatsApp {
    #[tracing::instrument(name = "Initializing the WhatsApp session", skip(self))]
    async fn initialize(&self) -> Result<(), GatewayError> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let result = match self.refresh().await {
            Ok(SessionState::Failed { reason }) => Err(GatewayError::SessionFailed(reason)),
            Ok(_) => Ok(()),
            Err(e) => {
                self.transition(SessionState::Failed {
                    reason: e.to_string(),
                });
                Err(e)
            }
        };

        tokio::spawn(self.clone().watch_session());
        result
    }

    fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    #[tracing::instrument(
        name = "Sending a WhatsApp message",
        skip(self, recipient, body),
        fields(chat_id = %recipient.chat_id())
    )]
    async fn send(&self, recipient: &RecipientHandle, body: &str) -> Result<Ack, DeliveryError> {
        let state = self.state();
        if state != SessionState::Ready {
            return Err(DeliveryError::NotReady(state));
        }

        let id = self
            .client
            .send_text(&recipient.chat_id(), body)
            .await
            .map_err(DeliveryError::Transport)?;

        Ok(Ack { id })
    }
}
