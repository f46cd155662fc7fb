//! src/startup.rs
use crate::clock::{Clock, SystemClock};
use crate::configuration::Settings;
use crate::messaging::{MessagingGateway, WhatsApp};
use crate::routes::{health_check, json_error_handler, register_medicine};
use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

pub struct Application {
    port: u16,
    server: Server,
    gateway: Arc<dyn MessagingGateway>,
}

impl Application {
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn gateway(&self) -> Arc<dyn MessagingGateway> {
        self.gateway.clone()
    }

    pub async fn run(self) -> std::io::Result<()> {
        self.server.await
    }
}

pub async fn build(config: Settings) -> Result<Application, anyhow::Error> {
    build_with_clock(config, Arc::new(SystemClock)).await
}

/// Like [`build`], with the date source supplied by the caller.
pub async fn build_with_clock(
    config: Settings,
    clock: Arc<dyn Clock>,
) -> Result<Application, anyhow::Error> {
    let address = format!("{}:{}", config.application.host, config.application.port);
    let tcp_listener =
        TcpListener::bind(&address).with_context(|| format!("Failed to bind {}", address))?;
    let port = tcp_listener.local_addr()?.port();

    let whatsapp_settings = config
        .whatsapp
        .context("WhatsApp settings are missing")?;
    let whatsapp = WhatsApp::new(&whatsapp_settings).context("Failed to build the WhatsApp client")?;
    let gateway: Arc<dyn MessagingGateway> = Arc::new(whatsapp);

    // Pairing may still be pending afterwards; requests are served regardless
    // and report delivery failures until the session is ready.
    if let Err(e) = gateway.initialize().await {
        tracing::error!(error.cause_chain = ?e, "Failed to initialize the WhatsApp session");
    }

    let server = run(tcp_listener, gateway.clone(), clock)?;

    Ok(Application {
        port,
        server,
        gateway,
    })
}

pub fn run(
    listener: TcpListener,
    gateway: Arc<dyn MessagingGateway>,
    clock: Arc<dyn Clock>,
) -> Result<Server, std::io::Error> {
    let address = listener.local_addr()?;
    let gateway = web::Data::from(gateway);
    let clock = web::Data::from(clock);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .route("/api/medicine", web::post().to(register_medicine))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(gateway.clone())
            .app_data(clock.clone())
    })
    .listen(listener)?
    .run();

    tracing::info!("Server is running on {}", address);
    Ok(server)
}
