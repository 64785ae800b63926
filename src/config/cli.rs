use crate::config::app_config::AppConfig;
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "gift-lane")]
#[command(about = "Gift suggestion service exposing POST /curate")]
pub struct CliArgs {
    /// Path to a TOML configuration file; environment variables are used when omitted
    #[arg(short, long, env = "GIFT_LANE_CONFIG")]
    pub config: Option<String>,

    /// Override the bind address
    #[arg(long)]
    pub bind: Option<String>,

    /// Override the listen port
    #[arg(short, long)]
    pub port: Option<u16>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliArgs {
    /// Loads the file (or environment) configuration and applies command-line overrides.
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::from_env()?,
        };

        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }

        Ok(config)
    }
}
