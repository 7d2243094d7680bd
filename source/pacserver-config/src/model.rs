use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Mirrors the YAML keys verbatim (§6.1). Every field is optional; a missing
/// key defaults to zero/empty/false, matching the Python original's
/// `data.get(key, default)` loading.
#[derive(Debug, Default, Deserialize)]
pub struct RawConfig {
    #[serde(default, rename = "maxCacheAge")]
    pub max_cache_age: u64,
    #[serde(default, rename = "ipMapFile")]
    pub ip_map_file: String,
    #[serde(default, rename = "pacRoot")]
    pub pac_root: String,
    #[serde(default, rename = "contactInfo")]
    pub contact_info: String,
    #[serde(default, rename = "accessLogFile")]
    pub access_log_file: String,
    #[serde(default, rename = "eventLogFile")]
    pub event_log_file: String,
    #[serde(default, rename = "doAutoRefresh")]
    pub do_auto_refresh: bool,
}

/// The typed, internal configuration structure used by the rest of the
/// crate. Kept separate from [`RawConfig`] the way the teacher keeps
/// `internal::Config` separate from any externally-deserialised shape — the
/// YAML surface can stay dumb strings while call sites get `Duration`s and
/// `PathBuf`s.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub max_cache_age: Duration,
    pub ip_map_file: PathBuf,
    pub pac_root: PathBuf,
    pub contact_info: String,
    pub access_log_file: Option<PathBuf>,
    pub event_log_file: Option<PathBuf>,
    pub do_auto_refresh: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_cache_age: Duration::from_secs(0),
            ip_map_file: PathBuf::new(),
            pac_root: PathBuf::new(),
            contact_info: String::new(),
            access_log_file: None,
            event_log_file: None,
            do_auto_refresh: false,
        }
    }
}

impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        let non_empty = |s: String| if s.is_empty() { None } else { Some(PathBuf::from(s)) };

        Self {
            max_cache_age: Duration::from_secs(raw.max_cache_age),
            ip_map_file: PathBuf::from(raw.ip_map_file),
            pac_root: PathBuf::from(raw.pac_root),
            contact_info: raw.contact_info,
            access_log_file: non_empty(raw.access_log_file),
            event_log_file: non_empty(raw.event_log_file),
            do_auto_refresh: raw.do_auto_refresh,
        }
    }
}
