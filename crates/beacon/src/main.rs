use beacon::{Bridge, Config};
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins when set; otherwise the `DEBUG` flag picks between
/// the quiet and verbose defaults.
fn init_tracing(debug: bool) {
    let default = if debug { "info,beacon=debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() {
    let config = Config::from_env();
    init_tracing(config.debug);

    tracing::info!(
        rcon_host = %config.rcon_host,
        rcon_port = config.rcon_port,
        listen_port = config.listen_port,
        poll_ms = config.poll_interval.as_millis() as u64,
        "starting beacon bridge"
    );

    Bridge::new(config).run().await;
}
