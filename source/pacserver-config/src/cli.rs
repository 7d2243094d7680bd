//! Configuration sourced from the CLI

use std::path::PathBuf;

use clap::Parser;

use crate::model::Config;

#[derive(Parser, Debug)]
#[command(version, about = "Serves PAC files chosen by longest-prefix match on the requester's IP")]
pub struct Cli {
    /// Path to the YAML configuration file
    #[arg(long, default_value = "config.yml")]
    pub config: PathBuf,

    /// Load and validate the configuration, then exit without serving
    #[arg(long)]
    pub validate_config: bool,

    /// Force-disable the background cache refresh timer, regardless of `doAutoRefresh`
    #[arg(long)]
    pub no_auto_refresh: bool,
}

/// Layer CLI overrides onto a loaded [`Config`], the way the teacher's
/// `apply_cli` layers `Cli` fields onto its KDL-sourced `Config`.
pub fn apply_cli(conf: &mut Config, cli: &Cli) {
    if cli.no_auto_refresh {
        conf.do_auto_refresh = false;
    }
}
