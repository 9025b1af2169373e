use crate::application::catalog::RequestCatalog;
use crate::application::dispatcher::{CommandSource, Dispatcher, Termination, Timeouts};
use crate::application::services::HttpRequestService;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::http_client::HyperHttpClient;
use crate::infrastructure::logging::{self, LogLevel};
use crate::infrastructure::schema::SchemaRegistry;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// CLI configuration for Peeper
#[derive(Parser, Debug)]
#[command(name = "peeper", version)]
#[command(about = "Peeper: fire configured HTTP requests from a menu", long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "conf.yaml")]
    pub config: PathBuf,

    /// Path to the log file (stdout when omitted)
    #[arg(short, long)]
    pub log: Option<PathBuf>,

    /// Logging level
    #[arg(long, value_enum, default_value = "INFO", ignore_case = true)]
    pub log_level: LogLevel,

    /// Seconds to wait for a response, 0 waits forever
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Seconds to wait for a command before exiting
    #[arg(long)]
    pub input_timeout: Option<u64>,
}

impl Cli {
    pub async fn run(&self, source: &mut dyn CommandSource) -> Result<Termination> {
        let log = logging::dispatch(self.log.as_deref(), self.log_level)?;
        tracing::dispatcher::with_default(&log, || info!("Loading configuration..."));

        let loader = ConfigLoader::new(SchemaRegistry::new(), log.clone());
        let config = loader.load_file(Some(&self.config));

        let catalog = RequestCatalog::build(&config.requests);
        tracing::dispatcher::with_default(&log, || {
            if catalog.is_empty() {
                info!("No requests configured");
            } else {
                info!(entries = catalog.len(), "Request catalog ready");
            }
        });

        let service = HttpRequestService::new(Box::new(HyperHttpClient::new()));
        let dispatcher = Dispatcher::new(catalog, config.endpoint(), service, log)
            .with_timeouts(self.timeouts());

        Ok(dispatcher.run(source).await)
    }

    fn timeouts(&self) -> Timeouts {
        Timeouts {
            request: Some(self.timeout)
                .filter(|seconds| *seconds > 0)
                .map(Duration::from_secs),
            input: self.input_timeout.map(Duration::from_secs),
        }
    }
}
