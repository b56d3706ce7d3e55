use std::path::PathBuf;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::api::{self, docs};
use crate::config::{Config, LogFormat, DEFAULT_LOG_FILTER};
use crate::error::Result;

/// Install the global tracing subscriber.
fn init_logging(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|e| {
        eprintln!(
            "Warning: invalid log filter '{}' ({}), using default",
            config.log_filter, e
        );
        EnvFilter::new(DEFAULT_LOG_FILTER)
    });

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_ansi(atty::is(atty::Stream::Stdout)))
            .init(),
    }
}

pub fn handle_serve(host: Option<String>, port: Option<u16>, database: Option<PathBuf>) -> Result<()> {
    let mut config = Config::from_env()?;
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(database) = database {
        config.store.path = database;
    }

    init_logging(&config);
    tracing::debug!(?config, "Loaded configuration");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(api::serve(&config))
}

pub fn handle_openapi(yaml: bool, port: Option<u16>) -> Result<()> {
    let config = Config::from_env()?;
    let doc = docs::openapi(port.unwrap_or(config.port));

    if yaml {
        print!("{}", docs::to_yaml(&doc)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&doc)?);
    }

    Ok(())
}
