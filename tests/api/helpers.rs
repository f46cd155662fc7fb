//! tests/api/helpers.rs

use chrono::NaiveDate;
use medicine_notifier::clock::FixedClock;
use medicine_notifier::configuration::get_configuration;
use medicine_notifier::messaging::MessagingGateway;
use medicine_notifier::startup::build_with_clock;
use medicine_notifier::telemetry::{get_subscriber, init_subscriber};
use once_cell::sync::Lazy;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    // Set TEST_LOG=true to see logs during tests
    // Use bunyan to format the logs nicely:
    // $ TEST_LOG=true cargo test | bunyan
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    };
});

pub struct TestApp {
    pub address: String,
    pub whatsapp_server: MockServer,
    pub gateway: Arc<dyn MessagingGateway>,
}

impl TestApp {
    pub async fn get(&self, path: &str) -> reqwest::Response {
        reqwest::get(&format!("{}{}", self.address, path))
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_medicine(&self, body: serde_json::Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(&format!("{}/api/medicine", self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_medicine_raw(&self, content_type: &str, body: String) -> reqwest::Response {
        reqwest::Client::new()
            .post(&format!("{}/api/medicine", self.address))
            .header("Content-Type", content_type)
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Messages the bridge was asked to deliver.
    pub async fn sent_messages(&self) -> Vec<SentMessage> {
        self.whatsapp_server
            .received_requests()
            .await
            .unwrap()
            .into_iter()
            .filter(|request| request.url.path() == "/api/sendText")
            .map(|request| {
                serde_json::from_slice(&request.body).expect("Failed to parse sent message")
            })
            .collect()
    }
}

#[derive(serde::Deserialize, Debug)]
pub struct SentMessage {
    #[serde(rename = "chatId")]
    pub chat_id: String,
    pub text: String,
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("Failed to parse date")
}

/// Launches the application with a paired WhatsApp session, as if today were `today`.
pub async fn spawn_app(today: &str) -> TestApp {
    spawn_app_with_session(today, serde_json::json!({ "status": "WORKING" })).await
}

pub async fn spawn_app_with_session(today: &str, session: serde_json::Value) -> TestApp {
    Lazy::force(&TRACING);

    // The bridge has to answer the startup status check.
    let whatsapp_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sessions/default"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session))
        .mount(&whatsapp_server)
        .await;

    let mut config = get_configuration().expect("Failed to read configuration.");
    config.application.port = 0;
    config.set_whatsapp_url(whatsapp_server.uri());
    if let Some(whatsapp) = config.whatsapp.as_mut() {
        whatsapp.session = "default".to_string();
        whatsapp.timeout_milliseconds = 2_000;
    }

    let clock = Arc::new(FixedClock::new(date(today)));
    let app = build_with_clock(config, clock)
        .await
        .expect("Failed to build application.");
    let address = format!("http://127.0.0.1:{}", app.port());
    let gateway = app.gateway();

    // Launch the server as a background task
    let _ = tokio::spawn(app.run());

    TestApp {
        address,
        whatsapp_server,
        gateway,
    }
}
