use std::sync::Arc;

use color_eyre::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use livefeed::adapters::ReqwestHttpClient;
use livefeed::auth::CredentialsManager;
use livefeed::cli::{self, CliCommand, CredentialSource, RunOptions};
use livefeed::live::{ChannelListener, EventHistory, LiveNotification, ResilientClient};
use livefeed::LiveConfig;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let options = match cli::parse_args(std::env::args()) {
        Ok(CliCommand::Version) => {
            println!("livefeed {}", cli::VERSION);
            return Ok(());
        }
        Ok(CliCommand::Help) => {
            println!("{}", cli::USAGE);
            return Ok(());
        }
        Ok(CliCommand::Run(options)) => options,
        Err(e) => {
            eprintln!("Error: {}\n\n{}", e, cli::USAGE);
            std::process::exit(2);
        }
    };

    init_logging();
    run(options).await
}

/// Log to stderr so stdout carries only events.
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("livefeed=info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(options: RunOptions) -> Result<()> {
    let mut config = LiveConfig::from_env();
    if let Some(url) = &options.url {
        config = config.with_path(url.clone());
    }

    config.validate()?;

    let source = cli::resolve_credential_source(
        &options,
        |key| std::env::var(key).ok(),
        CredentialsManager::new(),
    )?;
    if let CredentialSource::File(provider) = &source {
        info!(
            path = %provider.manager().credentials_path().display(),
            "Reading credentials from file on every attempt"
        );
    }

    let http = ReqwestHttpClient::with_connect_timeout(config.connect_timeout)?;
    let (listener, mut notifications) = ChannelListener::new();
    let client = ResilientClient::new(
        &config,
        Arc::new(http),
        source.into_provider(),
        Arc::new(listener),
    );
    let mut history = EventHistory::new(config.history_capacity);

    info!(url = client.url(), "Streaming live feed");
    client.connect();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            result = &mut ctrl_c => {
                if let Err(e) = result {
                    warn!(error = %e, "Failed to listen for Ctrl-C");
                }
                break;
            }
            notification = notifications.recv() => match notification {
                Some(notification) => report(notification, &mut history, options.show_pings),
                None => break,
            },
        }
    }

    client.close();

    if let Some(path) = &options.snapshot {
        history.snapshot().write_to(path)?;
        eprintln!("Wrote {} events to {}", history.len(), path.display());
    }

    Ok(())
}

fn report(notification: LiveNotification, history: &mut EventHistory, show_pings: bool) {
    match notification {
        LiveNotification::Open(info) => {
            eprintln!("connected (after {} retries)", info.attempts);
        }
        LiveNotification::Message(message) => {
            if message.is_heartbeat() && !show_pings {
                return;
            }
            let entry = history.record(&message);
            println!("{}", cli::format_entry(entry));
        }
        LiveNotification::Error(err) => {
            eprintln!("error: {}", err.user_message());
        }
        LiveNotification::Close(info) => {
            eprintln!("stream closed ({})", info.reason);
        }
        LiveNotification::ReconnectScheduled { attempt, delay } => {
            eprintln!(
                "reconnecting in {:.1}s (attempt {})",
                delay.as_secs_f64(),
                attempt
            );
        }
    }
}
