//! Bridge configuration, read once from the environment at startup.

use std::str::FromStr;
use std::time::Duration;

/// Immutable configuration for the bridge.
///
/// Populated by [`from_env`](Self::from_env) and never mutated afterwards.
/// A malformed numeric value falls back to its default with a logged
/// warning; a missing host or credential is not an error here — the
/// remote-console session will simply fail to connect and keep retrying.
#[derive(Debug, Clone)]
pub struct Config {
    /// Remote-console host (`RCON_HOST`).
    pub rcon_host: String,
    /// Remote-console port (`RCON_PORT`, default 25575).
    pub rcon_port: u16,
    /// Shared remote-console credential (`RCON_PASSWORD`).
    pub rcon_password: String,
    /// Per-request remote-console timeout (`RCON_TIMEOUT`, ms, default 5000).
    pub rcon_timeout: Duration,
    /// Subscriber WebSocket listen port (`WEBSOCKET_PORT`, default 8888).
    pub listen_port: u16,
    /// Poll frequency (`POLL_INTERVAL`, ms, default 1000).
    pub poll_interval: Duration,
    /// Verbose logging flag (`DEBUG`).
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rcon_host: "127.0.0.1".to_string(),
            rcon_port: 25575,
            rcon_password: String::new(),
            rcon_timeout: Duration::from_millis(5000),
            listen_port: 8888,
            poll_interval: Duration::from_millis(1000),
            debug: false,
        }
    }
}

impl Config {
    /// Reads the configuration from the environment.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            rcon_host: std::env::var("RCON_HOST")
                .unwrap_or(defaults.rcon_host),
            rcon_port: parse_or("RCON_PORT", env("RCON_PORT"), defaults.rcon_port),
            rcon_password: std::env::var("RCON_PASSWORD").unwrap_or_default(),
            rcon_timeout: Duration::from_millis(parse_or(
                "RCON_TIMEOUT",
                env("RCON_TIMEOUT"),
                5000,
            )),
            listen_port: parse_or(
                "WEBSOCKET_PORT",
                env("WEBSOCKET_PORT"),
                defaults.listen_port,
            ),
            poll_interval: Duration::from_millis(parse_or(
                "POLL_INTERVAL",
                env("POLL_INTERVAL"),
                1000,
            )),
            debug: flag(env("DEBUG")),
        }
    }
}

fn env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Parses `raw` or falls back to `default`, warning on malformed input.
fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> T {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(key, value = %raw, "malformed configuration value, using default");
            default
        }
    }
}

/// Truthy unless unset, empty, `0`, or `false`.
fn flag(raw: Option<String>) -> bool {
    raw.is_some_and(|v| {
        !v.is_empty() && v != "0" && !v.eq_ignore_ascii_case("false")
    })
}
