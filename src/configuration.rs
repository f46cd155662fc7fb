//! src/configuration.rs
use config::{Config, File};
use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    #[serde(default)]
    pub whatsapp: Option<WhatsAppSettings>,
}

impl Settings {
    pub fn set_whatsapp_url(&mut self, base_url: String) {
        if let Some(whatsapp_settings) = &mut self.whatsapp {
            whatsapp_settings.base_url = base_url;
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    pub port: u16,
    pub host: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct WhatsAppSettings {
    pub base_url: String,
    pub api_key: Secret<String>,
    #[serde(default = "default_session")]
    pub session: String,
    #[serde(default = "default_timeout_milliseconds")]
    pub timeout_milliseconds: u64,
    #[serde(default = "default_pairing_poll_interval_milliseconds")]
    pub pairing_poll_interval_milliseconds: u64,
}

fn default_session() -> String {
    "default".to_string()
}

fn default_timeout_milliseconds() -> u64 {
    10_000
}

fn default_pairing_poll_interval_milliseconds() -> u64 {
    2_000
}

impl WhatsAppSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }

    pub fn pairing_poll_interval(&self) -> Duration {
        // tokio refuses a zero-length interval
        Duration::from_millis(self.pairing_poll_interval_milliseconds.max(1))
    }
}

#[derive(PartialEq, Debug)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "production" => Ok(Environment::Production),
            _ => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                s
            )),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigurationError {
    #[error("Failed to determine the current directory")]
    CurrentDir(#[source] std::io::Error),
    #[error("Failed to parse APP_ENVIRONMENT: {0}")]
    Environment(String),
    #[error("Failed to load the configuration files")]
    Files(#[from] config::ConfigError),
    #[error("Failed to read WhatsApp settings file")]
    WhatsAppFile(#[source] dotenvy::Error),
    #[error("Failed to parse WhatsApp settings from the environment")]
    WhatsAppEnv(#[from] envy::Error),
    #[error("PORT must be a valid port number, got {0}")]
    Port(String),
}

pub fn get_configuration() -> Result<Settings, ConfigurationError> {
    let base_path = std::env::current_dir().map_err(ConfigurationError::CurrentDir)?;
    let configuration_directory = base_path.join("configuration");

    // Detect the running environment.
    // Default to `local` if not specified.
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(ConfigurationError::Environment)?;

    let settings = Config::builder()
        .add_source(File::from(configuration_directory.join("base")).required(true))
        .add_source(File::from(configuration_directory.join(environment.as_str())).required(true))
        // E.g. `APP_APPLICATION__PORT=5001` sets `Settings.application.port`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let mut settings: Settings = settings.try_deserialize()?;

    if let Ok(port) = std::env::var("PORT") {
        settings.application.port = port.parse().map_err(|_| ConfigurationError::Port(port))?;
    }

    if environment == Environment::Local {
        let whatsapp_file_path = configuration_directory.join("whatsapp.env");
        dotenvy::from_filename(whatsapp_file_path).map_err(ConfigurationError::WhatsAppFile)?;
    }

    let whatsapp_settings = envy::prefixed("WHATSAPP_").from_env::<WhatsAppSettings>()?;
    settings.whatsapp = Some(whatsapp_settings);

    Ok(settings)
}
