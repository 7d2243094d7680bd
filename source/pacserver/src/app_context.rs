//! Process bootstrap (C9).
//!
//! Grounded in the teacher's `app_context.rs`/`main.rs` split: CLI parsing
//! via `clap::CommandFactory`, config loading through an injectable
//! `ConfigLoaderProvider`, then construction of the Pingora [`Server`] and
//! its single listening service, handed back to `main` for
//! `bootstrap()`/`add_services()`/`run_forever()`.

use std::process;
use std::sync::Arc;

use clap::{CommandFactory, FromArgMatches};
use pingora::server::Server;
use pingora::services::Service;

use pacserver_config::cli::{apply_cli, Cli};
use pacserver_config::{Config, ConfigLoader, ConfigLoaderProvider};

use crate::core::Cache;
use crate::logging::{self, LoggingGuards};
use crate::server::QueryService;

pub struct AppContext {
    config: Config,
    cache: Arc<Cache>,
    server: Server,
    _logging: LoggingGuards,
}

impl AppContext {
    /// Parse CLI flags, load `config.yml`, init logging, and build the
    /// initial lookup-tree cache. Any failure here is fatal to startup
    /// (§7: `ConfigLoad`, initial `ZonesLoadIO`/`TemplatesLoadIO`).
    pub async fn bootstrap() -> miette::Result<AppContext> {
        let command = Cli::command().before_help(BANNER).get_matches();
        let cli = Cli::from_arg_matches(&command).expect("failed to parse CLI arguments");

        let config = Self::load_config(&cli).await?;

        let logging = logging::init(config.event_log_file.as_deref(), config.access_log_file.as_deref());
        tracing::debug!(?config, "configuration loaded");

        if cli.validate_config {
            tracing::info!("configuration is valid, exiting (--validate-config)");
            process::exit(0);
        }

        let cache = Arc::new(Cache::init(&config).await.map_err(|source| {
            miette::miette!("failed to build the initial lookup tree: {source}")
        })?);
        tracing::info!("initial lookup tree cache ready");

        let server = Server::new(None)
            .map_err(|source| miette::miette!("failed to construct Pingora server: {source}"))?;

        Ok(AppContext {
            config,
            cache,
            server,
            _logging: logging,
        })
    }

    /// Build the query façade service and bind it to the configured
    /// listener address.
    pub async fn build_services(&mut self) -> miette::Result<Vec<Box<dyn Service>>> {
        tracing::info!("configuring query service...");

        let mut service = pingora_proxy::http_proxy_service(
            &self.server.configuration,
            QueryService::new(self.cache.clone()),
        );
        service.add_tcp(LISTEN_ADDR);

        Ok(vec![Box::new(service)])
    }

    /// Hand back the bootstrapped server, the cache (so the caller can wire
    /// up the background refresher), and the resolved configuration.
    pub fn ready(self) -> (Server, Arc<Cache>, Config) {
        (self.server, self.cache, self.config)
    }

    async fn load_config(cli: &Cli) -> miette::Result<Config> {
        tracing::info!(path = ?cli.config, "loading configuration");

        let loader = ConfigLoader::default();
        let mut config = loader.load(&cli.config).await?;

        apply_cli(&mut config, cli);
        Ok(config)
    }
}

/// `0.0.0.0:8080`, per §6.3.
const LISTEN_ADDR: &str = "0.0.0.0:8080";

const BANNER: &str = r#"
  ____   _    ____
 |  _ \ / \  / ___|  ___ _ ____   _____ _ __
 | |_) / _ \| |     / __| '__\ \ / / _ \ '__|
 |  __/ ___ \ |___ _\__ \ |   \ V /  __/ |
 |_| /_/   \_\____(_)___/_|    \_/ \___|_|
"#;
