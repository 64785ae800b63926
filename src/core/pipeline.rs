use crate::core::affiliate::{AffiliateResolver, AffiliateTable};
use crate::core::directive::DirectiveBuilder;
use crate::core::sanitizer::{LinkPolicy, Sanitizer};
use crate::domain::model::{CurationResult, GiftRequest};
use crate::domain::ports::TextGenerator;
use crate::utils::error::{CurateError, Result};
use std::sync::Arc;

/// Characters of offending generator output kept in log lines.
const LOG_EXCERPT_CHARS: usize = 500;

/// Request-to-suggestion pipeline: directive, generation, sanitize, affiliate override.
///
/// Cheap to clone and holds no per-request state, so one instance serves all
/// concurrent requests.
#[derive(Clone)]
pub struct CurationPipeline {
    generator: Arc<dyn TextGenerator>,
    directives: DirectiveBuilder,
    sanitizer: Sanitizer,
    resolver: AffiliateResolver,
}

impl CurationPipeline {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        partners: AffiliateTable,
        link_policy: LinkPolicy,
    ) -> Self {
        Self {
            generator,
            directives: DirectiveBuilder::new(partners.clone()),
            sanitizer: Sanitizer::new(link_policy),
            resolver: AffiliateResolver::new(partners),
        }
    }

    pub async fn curate(&self, request: &GiftRequest) -> Result<CurationResult> {
        let directive = self.directives.build(request);
        tracing::debug!(
            band = directive.band.as_str(),
            idea_count = directive.idea_count,
            "Directive built"
        );

        let raw_output = self.generator.generate(&directive).await.map_err(|e| {
            tracing::error!(
                provider = self.generator.provider_name(),
                model = self.generator.model_name(),
                "Generation failed: {}",
                e
            );
            CurateError::from(e)
        })?;
        tracing::debug!("Generator returned {} bytes", raw_output.len());

        let sanitized = self.sanitizer.sanitize(&raw_output).map_err(|e| {
            match e.diagnostic_excerpt(LOG_EXCERPT_CHARS) {
                Some(excerpt) => tracing::error!("{} (output: {:?})", e, excerpt),
                None => tracing::error!("{}", e),
            }
            CurateError::from(e)
        })?;

        let products = self.resolver.resolve(&sanitized.products);
        tracing::info!(
            band = directive.band.as_str(),
            requested = directive.idea_count,
            returned = products.len(),
            "Curation complete"
        );

        Ok(CurationResult { products })
    }
}
