pub mod affiliate;
pub mod budget;
pub mod directive;
pub mod pipeline;
pub mod sanitizer;

pub use crate::domain::model::{
    AffiliatePartner, BudgetBand, BudgetRange, CurationResult, Directive, GiftRequest, LinkRef,
    ProductSuggestion,
};
pub use crate::domain::ports::TextGenerator;
pub use crate::utils::error::Result;
