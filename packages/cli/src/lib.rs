// ABOUTME: Server wiring and configuration for the lispbook binary
// ABOUTME: Environment config, middleware, and state assembly

pub mod config;
pub mod middleware;
pub mod server;

pub use config::{Config, ConfigError, MailConfig};
pub use server::{build_app, build_state, run_server};

/// Install the global tracing subscriber, honouring `RUST_LOG`
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();
}

#[cfg(test)]
mod tests;
