use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::ConfigError;
use crate::model::{Config, RawConfig};

/// Loads the YAML config file at a given path. Implemented as a trait (the
/// teacher's `ConfigLoaderProvider` pattern in `builder.rs`) so that
/// `AppContext::bootstrap` and its tests can swap in a fake loader without
/// touching disk.
#[async_trait]
pub trait ConfigLoaderProvider {
    async fn load(&self, path: &Path) -> Result<Config, ConfigError>;
}

#[derive(Default, Clone)]
pub struct ConfigLoader;

#[async_trait]
impl ConfigLoaderProvider for ConfigLoader {
    async fn load(&self, path: &Path) -> Result<Config, ConfigError> {
        tracing::info!("Loading config file: {:?}", path);

        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let raw: RawConfig = serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Config::from(raw);
        warn_on_questionable(&config);
        Ok(config)
    }
}

impl ConfigLoader {
    pub fn default_path() -> PathBuf {
        PathBuf::from("config.yml")
    }
}

/// Ad-hoc checks for configurations that parse fine but won't behave the way
/// an operator probably intends, the way the teacher's `Config::validate`
/// warns on a relative `pid_file`/`upgrade_socket` rather than rejecting it.
fn warn_on_questionable(config: &Config) {
    if config.do_auto_refresh && config.max_cache_age.is_zero() {
        tracing::warn!(
            "doAutoRefresh is true but maxCacheAge is 0; the background refresh timer will not be scheduled at a sane period"
        );
    }
}
