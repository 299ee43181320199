mod cli;
mod feed_view;

use std::path::Path;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use pulse_config::{PulseConfig, StreamSection};
use pulse_stream::{NotificationClient, StreamConfig};

fn load_app_config(args: &cli::Args) -> PulseConfig {
    let result = match args.config.as_deref() {
        Some(path) => pulse_config::load_from_path(Path::new(path)),
        None => pulse_config::load_config(),
    };
    result.unwrap_or_else(|e| {
        eprintln!("config load failed, using defaults: {e}");
        PulseConfig::default()
    })
}

fn stream_config(section: &StreamSection) -> StreamConfig {
    StreamConfig {
        url: section.url.clone(),
        reconnect_delay: Duration::from_millis(section.reconnect_delay_ms),
        connect_timeout: Duration::from_secs(section.connect_timeout_secs),
        max_buffer_len: (section.max_buffer_len > 0).then_some(section.max_buffer_len),
    }
}

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let args = cli::parse();

    // Load config before logging so the filter directive can come from it
    let config = load_app_config(&args);

    // Initialize logging
    let log_directive = args.log_level.as_deref().unwrap_or(&config.log.filter);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| "pulse=info".parse().unwrap()),
            ),
        )
        .init();

    tracing::info!("Pulse v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut stream = stream_config(&config.stream);
    if let Some(ref url) = args.url {
        tracing::info!("Using stream URL override: {url}");
        stream.url = url.clone();
    }

    let client = NotificationClient::connect(stream);

    if let Err(e) = feed_view::run(&client).await {
        tracing::error!("Feed view error: {e}");
    }

    client.shutdown().await;
    tracing::info!("Shutdown complete");
}
