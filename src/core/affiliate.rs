use crate::domain::model::{AffiliatePartner, ProductSuggestion};
use std::sync::Arc;

/// Read-only partner table, shared by every request.
///
/// Keywords are lower-cased once here so matching only lower-cases the
/// suggestion text. Table order is match precedence.
#[derive(Debug, Clone)]
pub struct AffiliateTable {
    partners: Arc<[AffiliatePartner]>,
}

impl AffiliateTable {
    pub fn new(partners: Vec<AffiliatePartner>) -> Self {
        let partners: Vec<AffiliatePartner> = partners
            .into_iter()
            .map(|mut partner| {
                partner.keywords = partner
                    .keywords
                    .iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect();
                partner
            })
            .collect();
        Self {
            partners: partners.into(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Will & Bear and YCZ Fragrance, the partners approved at launch.
    pub fn builtin() -> Self {
        Self::new(default_partners())
    }

    pub fn partners(&self) -> &[AffiliatePartner] {
        &self.partners
    }

    pub fn is_empty(&self) -> bool {
        self.partners.is_empty()
    }

    /// First partner (in table order) with a keyword contained in `text`.
    pub fn detect(&self, text: &str) -> Option<&AffiliatePartner> {
        let haystack = text.to_lowercase();
        self.partners
            .iter()
            .find(|p| p.keywords.iter().any(|k| haystack.contains(k.as_str())))
    }
}

pub fn default_partners() -> Vec<AffiliatePartner> {
    vec![
        AffiliatePartner {
            brand_key: "will-and-bear".to_string(),
            brand: "Will & Bear".to_string(),
            affiliate_url: "https://www.awin1.com/cread.php?awinmid=119813&awinaffid=2689862&ued=https%3A%2F%2Fwillandbear.com.au".to_string(),
            homepage: Some("https://willandbear.com.au".to_string()),
            description: Some("premium sustainable hats & accessories, Australia".to_string()),
            keywords: vec!["will & bear".to_string(), "will and bear".to_string()],
        },
        AffiliatePartner {
            brand_key: "ycz-fragrance".to_string(),
            brand: "YCZ Fragrance".to_string(),
            affiliate_url: "https://www.awin1.com/cread.php?awinmid=121156&awinaffid=2689862&ued=https%3A%2F%2Fyczfragrance.com".to_string(),
            homepage: Some("https://yczfragrance.com".to_string()),
            description: Some("luxury fragrances, Australia".to_string()),
            keywords: vec!["ycz".to_string()],
        },
    ]
}

/// Swaps generated links for a partner's affiliate link when a suggestion
/// mentions that partner.
#[derive(Debug, Clone)]
pub struct AffiliateResolver {
    table: AffiliateTable,
}

impl AffiliateResolver {
    pub fn new(table: AffiliateTable) -> Self {
        Self { table }
    }

    /// Returns a new sequence; matched suggestions get exactly one link,
    /// everything else passes through untouched.
    pub fn resolve(&self, products: &[ProductSuggestion]) -> Vec<ProductSuggestion> {
        products.iter().map(|p| self.resolve_one(p)).collect()
    }

    fn resolve_one(&self, product: &ProductSuggestion) -> ProductSuggestion {
        let text = format!("{} {}", product.title, product.why);
        match self.table.detect(&text) {
            Some(partner) => {
                tracing::debug!(
                    brand = %partner.brand,
                    title = %product.title,
                    "Affiliate override applied"
                );
                ProductSuggestion {
                    links: vec![partner.affiliate_link()],
                    ..product.clone()
                }
            }
            None => product.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::LinkRef;

    fn product(title: &str, why: &str) -> ProductSuggestion {
        ProductSuggestion {
            title: title.to_string(),
            why: why.to_string(),
            price_note: "Approx $100".to_string(),
            links: vec![LinkRef {
                label: "Amazon AU".to_string(),
                url: "https://www.amazon.com.au/s?k=hat".to_string(),
            }],
        }
    }

    #[test]
    fn test_title_match_replaces_links() {
        let resolver = AffiliateResolver::new(AffiliateTable::builtin());
        let input = vec![product("Will & Bear Explorer Hat", "Great for travel")];

        let output = resolver.resolve(&input);

        let table = AffiliateTable::builtin();
        let partner = &table.partners()[0];
        assert_eq!(output[0].links, vec![partner.affiliate_link()]);
        assert_eq!(output[0].links[0].label, "Will & Bear");
        // 原始輸入不被修改
        assert_eq!(input[0].links[0].label, "Amazon AU");
    }

    #[test]
    fn test_match_in_why_is_case_insensitive() {
        let resolver = AffiliateResolver::new(AffiliateTable::builtin());
        let output = resolver.resolve(&[product("Eau de Parfum", "A modern scent by ycz FRAGRANCE")]);
        assert_eq!(output[0].links.len(), 1);
        assert_eq!(output[0].links[0].label, "YCZ Fragrance");
    }

    #[test]
    fn test_alternate_keyword_spelling() {
        let resolver = AffiliateResolver::new(AffiliateTable::builtin());
        let output = resolver.resolve(&[product("Fedora", "From WILL AND BEAR")]);
        assert_eq!(output[0].links[0].label, "Will & Bear");
    }

    #[test]
    fn test_no_match_passes_through() {
        let resolver = AffiliateResolver::new(AffiliateTable::builtin());
        let input = vec![product("Leather Wallet", "Classic and durable")];
        assert_eq!(resolver.resolve(&input), input);
    }

    #[test]
    fn test_suggestion_without_links_gains_affiliate_link() {
        let resolver = AffiliateResolver::new(AffiliateTable::builtin());
        let mut bare = product("YCZ Oud", "Warm");
        bare.links.clear();
        let output = resolver.resolve(&[bare]);
        assert_eq!(output[0].links.len(), 1);
    }

    #[test]
    fn test_first_registered_partner_wins() {
        let resolver = AffiliateResolver::new(AffiliateTable::builtin());
        let output = resolver.resolve(&[product("YCZ x Will & Bear gift set", "")]);
        assert_eq!(output[0].links[0].label, "Will & Bear");
    }

    #[test]
    fn test_substring_false_positive_is_accepted() {
        let resolver = AffiliateResolver::new(AffiliateTable::builtin());
        let output = resolver.resolve(&[product("Bicycle", "Fits the abcycz frame")]);
        assert_eq!(output[0].links[0].label, "YCZ Fragrance");
    }

    #[test]
    fn test_keywords_are_normalized() {
        let table = AffiliateTable::new(vec![AffiliatePartner {
            brand_key: "acme".to_string(),
            brand: "Acme".to_string(),
            affiliate_url: "https://acme.example/aff".to_string(),
            homepage: None,
            description: None,
            keywords: vec!["  ACME Co ".to_string(), "".to_string()],
        }]);
        assert_eq!(table.partners()[0].keywords, vec!["acme co".to_string()]);
        assert!(table.detect("Rocket skates by Acme Co").is_some());
        assert!(table.detect("anything").is_none());
    }

    #[test]
    fn test_empty_table_never_matches() {
        let resolver = AffiliateResolver::new(AffiliateTable::empty());
        let input = vec![product("Will & Bear Hat", "")];
        assert_eq!(resolver.resolve(&input), input);
    }
}
