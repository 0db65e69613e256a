//! cms-router binary.
//!
//! Loads configuration, installs logging and metrics, then serves the CMS
//! request layer until SIGINT/SIGTERM.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use cms_router::config::validation::validate_config;
use cms_router::config::{load_config, CmsConfig, ConfigError};
use cms_router::lifecycle::Shutdown;
use cms_router::observability::{logging, metrics, TracingReporter};
use cms_router::HttpServer;

#[derive(Parser, Debug)]
#[command(name = "cms-router")]
#[command(about = "Serve CMS-published pages with redirects and editor support", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override `content.path`.
    #[arg(long)]
    content_path: Option<PathBuf>,
}

impl Cli {
    fn load(&self) -> Result<CmsConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => CmsConfig::default(),
        };
        if let Some(bind) = &self.bind {
            config.listener.bind_address = bind.clone();
        }
        if let Some(content_path) = &self.content_path {
            config.content.path = content_path.clone();
        }
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.load()?;

    logging::init_logging(&config.observability)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "cms-router starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        content_path = %config.content.path.display(),
        redirect_file = %config.redirect_file().display(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Address already checked by validate_config.
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(config, TracingReporter::shared());
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
