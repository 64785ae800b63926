pub mod app_config;
pub mod cli;

pub use app_config::{AppConfig, GenerationConfig, SanitizerConfig, ServerConfig};
pub use cli::CliArgs;
