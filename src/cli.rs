use std::path::PathBuf;

pub const DEFAULT_CONFIG_PATH: &str = "config/gatehouse.yaml";

/// Static file server with IP allow/deny filtering.
#[derive(Debug, clap::Parser)]
#[command(name = "gatehouse", version)]
pub struct Cli {
    /// Path to the YAML configuration file.
    #[arg(default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
}
