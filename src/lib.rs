pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

pub use adapters::OpenAiGenerator;
pub use config::{AppConfig, CliArgs};
pub use crate::core::{
    affiliate::{AffiliateResolver, AffiliateTable},
    directive::DirectiveBuilder,
    pipeline::CurationPipeline,
    sanitizer::{LinkPolicy, Sanitizer},
};
pub use domain::model::{CurationResult, GiftRequest, ProductSuggestion};
pub use domain::ports::TextGenerator;
pub use utils::error::{CurateError, Result};
