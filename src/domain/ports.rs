use crate::domain::model::Directive;
use crate::utils::error::GenerationError;
use async_trait::async_trait;

/// Opaque text-generation capability. Output is untrusted.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Sends the directive and returns the full raw text output.
    async fn generate(&self, directive: &Directive) -> Result<String, GenerationError>;

    fn provider_name(&self) -> &'static str;

    fn model_name(&self) -> &str;
}
