use crate::utils::error::{CurateError, Result};
use crate::utils::validation::{validate_non_empty_string, Validate};
use serde::{Deserialize, Serialize};

/// Numeric reading of a free-text budget.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BudgetRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub raw: Option<String>,
}

impl BudgetRange {
    /// Midpoint when both bounds are known, otherwise whichever bound exists.
    pub fn central(&self) -> Option<f64> {
        match (self.min, self.max) {
            (Some(min), Some(max)) => Some((min + max) / 2.0),
            (Some(min), None) => Some(min),
            (None, Some(max)) => Some(max),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetBand {
    Low,
    Mid,
    High,
    Unknown,
}

impl BudgetBand {
    pub const LOW_CEILING: f64 = 150.0;
    pub const MID_CEILING: f64 = 400.0;

    pub fn from_central(central: Option<f64>) -> Self {
        match central {
            None => BudgetBand::Unknown,
            Some(c) if c < Self::LOW_CEILING => BudgetBand::Low,
            Some(c) if c <= Self::MID_CEILING => BudgetBand::Mid,
            Some(_) => BudgetBand::High,
        }
    }

    pub fn from_range(range: &BudgetRange) -> Self {
        Self::from_central(range.central())
    }

    /// Number of suggestions the generator is asked for.
    pub fn idea_count(self) -> usize {
        match self {
            BudgetBand::Low => 3,
            BudgetBand::Mid | BudgetBand::Unknown => 5,
            BudgetBand::High => 8,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BudgetBand::Low => "low",
            BudgetBand::Mid => "mid",
            BudgetBand::High => "high",
            BudgetBand::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GiftRequest {
    pub recipient: String,
    pub occasion: String,
    pub budget_text: String,
}

impl GiftRequest {
    /// Builds a request from untrimmed input, rejecting blank fields.
    pub fn new(recipient: &str, occasion: &str, budget_text: &str) -> Result<Self> {
        let request = Self {
            recipient: recipient.trim().to_string(),
            occasion: occasion.trim().to_string(),
            budget_text: budget_text.trim().to_string(),
        };
        request.validate()?;
        Ok(request)
    }
}

impl Validate for GiftRequest {
    fn validate(&self) -> Result<()> {
        let fields = [
            ("recipient", &self.recipient),
            ("occasion", &self.occasion),
            ("budget", &self.budget_text),
        ];
        for (name, value) in fields {
            validate_non_empty_string(name, value).map_err(|_| CurateError::ValidationError {
                message: format!("{} is required", name),
            })?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRef {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSuggestion {
    pub title: String,
    pub why: String,
    pub price_note: String,
    pub links: Vec<LinkRef>,
}

/// An approved partner whose affiliate link replaces generated links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffiliatePartner {
    pub brand_key: String,
    pub brand: String,
    pub affiliate_url: String,
    #[serde(default)]
    pub homepage: Option<String>,
    /// Short blurb shown to the generator next to the brand name.
    #[serde(default)]
    pub description: Option<String>,
    pub keywords: Vec<String>,
}

impl AffiliatePartner {
    pub fn affiliate_link(&self) -> LinkRef {
        LinkRef {
            label: self.brand.clone(),
            url: self.affiliate_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CurationResult {
    pub products: Vec<ProductSuggestion>,
}

/// Rendered instruction for the text generator.
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    pub text: String,
    pub band: BudgetBand,
    pub idea_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(min: Option<f64>, max: Option<f64>) -> BudgetRange {
        BudgetRange {
            min,
            max,
            raw: Some("x".to_string()),
        }
    }

    #[test]
    fn test_central_value() {
        assert_eq!(range(Some(80.0), Some(120.0)).central(), Some(100.0));
        assert_eq!(range(None, Some(150.0)).central(), Some(150.0));
        assert_eq!(range(Some(400.0), None).central(), Some(400.0));
        assert_eq!(range(None, None).central(), None);
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(BudgetBand::from_central(None), BudgetBand::Unknown);
        assert_eq!(BudgetBand::from_central(Some(0.0)), BudgetBand::Low);
        assert_eq!(BudgetBand::from_central(Some(149.99)), BudgetBand::Low);
        assert_eq!(BudgetBand::from_central(Some(150.0)), BudgetBand::Mid);
        assert_eq!(BudgetBand::from_central(Some(400.0)), BudgetBand::Mid);
        assert_eq!(BudgetBand::from_central(Some(400.01)), BudgetBand::High);
        assert_eq!(BudgetBand::from_central(Some(f64::INFINITY)), BudgetBand::High);
    }

    #[test]
    fn test_band_is_total_over_sampled_values() {
        for cents in (0..100_000).step_by(7) {
            let c = cents as f64 / 100.0;
            let band = BudgetBand::from_central(Some(c));
            let expected = if c < 150.0 {
                BudgetBand::Low
            } else if c <= 400.0 {
                BudgetBand::Mid
            } else {
                BudgetBand::High
            };
            assert_eq!(band, expected, "central {}", c);
        }
    }

    #[test]
    fn test_idea_counts() {
        assert_eq!(BudgetBand::Low.idea_count(), 3);
        assert_eq!(BudgetBand::Mid.idea_count(), 5);
        assert_eq!(BudgetBand::High.idea_count(), 8);
        assert_eq!(BudgetBand::Unknown.idea_count(), 5);
    }

    #[test]
    fn test_gift_request_trims_fields() {
        let request = GiftRequest::new("  my dad ", "birthday\n", " under $100").unwrap();
        assert_eq!(request.recipient, "my dad");
        assert_eq!(request.occasion, "birthday");
        assert_eq!(request.budget_text, "under $100");
    }

    #[test]
    fn test_gift_request_rejects_blank_fields() {
        let err = GiftRequest::new("my dad", "   ", "100").unwrap_err();
        match err {
            CurateError::ValidationError { message } => assert!(message.contains("occasion")),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(GiftRequest::new("", "birthday", "100").is_err());
        assert!(GiftRequest::new("mum", "birthday", "").is_err());
    }

    #[test]
    fn test_product_serializes_price_note_key() {
        let product = ProductSuggestion {
            title: "Hat".to_string(),
            why: "Sun".to_string(),
            price_note: "Approx $90".to_string(),
            links: vec![],
        };
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["price_note"], "Approx $90");
    }
}
