use crate::core::affiliate::AffiliateTable;
use crate::core::budget;
use crate::domain::model::{BudgetBand, Directive, GiftRequest};

const OUTPUT_CONTRACT: &str = r#"Output ONLY valid JSON in this exact shape (no markdown, no backticks, no commentary):

{
  "products": [
    {
      "title": "Product name",
      "why": "1-2 sentences on why it fits",
      "price_note": "Approx $XX-$YY",
      "links": [
        { "label": "Amazon AU", "url": "https://www.amazon.com.au/s?k=..." }
      ]
    }
  ]
}"#;

/// Renders the instruction sent to the text generator.
#[derive(Debug, Clone)]
pub struct DirectiveBuilder {
    partners: AffiliateTable,
}

impl DirectiveBuilder {
    pub fn new(partners: AffiliateTable) -> Self {
        Self { partners }
    }

    pub fn build(&self, request: &GiftRequest) -> Directive {
        let range = budget::parse(Some(&request.budget_text));
        let band = BudgetBand::from_range(&range);
        let idea_count = band.idea_count();
        let budget_line = range.raw.as_deref().unwrap_or(&request.budget_text);

        let mut lines = vec![
            "You are Gift Lane's calm, luxe-feeling gift concierge.".to_string(),
            String::new(),
            format!("Recipient: {}", request.recipient),
            format!("Occasion: {}", request.occasion),
            format!("Budget: {}", budget_line),
            format!("Budget band: {}", band.as_str()),
            String::new(),
            format!("Return EXACTLY {} product suggestions.", idea_count),
            String::new(),
            "IMPORTANT:".to_string(),
            "- Suggest REAL, commonly available products and brands.".to_string(),
            "- Do NOT invent obscure one-off shop items.".to_string(),
            "- Provide links as retailer SEARCH links or official brand site links (avoid deep product links).".to_string(),
            "- Every link url must start with https://.".to_string(),
        ];

        if !self.partners.is_empty() {
            lines.push("- If a suggestion fits an approved partner brand, you MAY include it.".to_string());
            lines.push("- Approved partner brands:".to_string());
            for partner in self.partners.partners() {
                match &partner.description {
                    Some(description) => lines.push(format!("  - {} ({})", partner.brand, description)),
                    None => lines.push(format!("  - {}", partner.brand)),
                }
            }
        }

        lines.push(String::new());
        lines.push(OUTPUT_CONTRACT.to_string());
        let text = lines.join("\n");

        Directive {
            text,
            band,
            idea_count,
        }
    }
}
