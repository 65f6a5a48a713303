//! Tachikoma Bridge - nodemailer JSON intake and delivery-event webhook relay.
//!
//! This binary runs two tasks for the lifetime of the process:
//! - the HTTP intake, translating `POST /tachikoma/sendEmail` into Tachikoma sends
//! - the notification consumer, forwarding delivery events to the webhook
//!
//! Whichever stops first decides how the process exits.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::{net::TcpListener, signal};
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tachikoma_bridge::tachikoma::{self, TlsMaterial};
use tachikoma_bridge::{notifications, web, AppState, Config, LogFormat, TachikomaMailer, WebhookEmitter};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    init_tracing(&config);

    info!("bridge_starting");

    config.validate()?;
    info!(
        port = config.port,
        tachikoma_uri = %config.uri,
        webhook_uri = %config.webhook_uri,
        certificate = %config.certificate.display(),
        "config_loaded"
    );

    let tls = TlsMaterial::load(&config).await?;
    let channel = tachikoma::connect(&config, &tls).await?;

    // HTTP intake
    let state = AppState::new(Arc::new(TachikomaMailer::new(channel.clone())));
    let app = web::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "web_server_listening");

    let mut server = tokio::spawn(async move { axum::serve(listener, app).await });

    // Notification stream
    let client = reqwest::Client::builder()
        .build()
        .context("Failed to create HTTP client")?;
    let emitter = WebhookEmitter::new(client, config.webhook_uri.clone());

    let mut stream =
        tokio::spawn(async move { notifications::run(channel, &emitter).await });

    tokio::select! {
        result = &mut stream => {
            server.abort();
            match result.context("notification task panicked")? {
                Ok(summary) => {
                    info!(
                        notifications = summary.notifications,
                        forwarded = summary.forwarded,
                        "bridge_stream_finished"
                    );
                    Ok(())
                }
                Err(e) => {
                    error!(error = %e, "failed to receive notification");
                    Err(e).context("notification stream failed")
                }
            }
        }
        result = &mut server => {
            stream.abort();
            match result.context("web server task panicked")? {
                Ok(()) => bail!("web server stopped unexpectedly"),
                Err(e) => Err(e).context("Server error"),
            }
        }
        _ = shutdown_signal() => {
            server.abort();
            stream.abort();
            info!("bridge_shutdown_complete");
            Ok(())
        }
    }
}

/// Install the tracing subscriber for the configured format and verbosity.
///
/// `RUST_LOG`, when set, takes precedence over -v/-q.
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_directive()));

    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry
            .with(fmt::layer().json().flatten_event(true))
            .init(),
        LogFormat::Coloured => registry
            .with(fmt::layer().with_writer(std::io::stderr).with_ansi(true))
            .init(),
        LogFormat::Plain => registry
            .with(fmt::layer().with_writer(std::io::stderr).with_ansi(false))
            .init(),
    }
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("bridge_shutting_down");
}
