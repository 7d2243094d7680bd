use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Failures that can occur while loading `config.yml`.
///
/// Every variant here is fatal to startup (§7, `ConfigLoad`) — there is no
/// partial-failure recovery for the top-level config file the way there is
/// for zones/templates at refresh time.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file at {path}")]
    #[diagnostic(help("check that the file exists and is readable"))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file at {path} as YAML")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
