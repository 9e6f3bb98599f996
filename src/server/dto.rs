use serde::Deserialize;

use crate::types::{Scope, id};

#[derive(Debug, Default, Deserialize)]
pub struct ScopeParams {
    #[serde(default)]
    pub include_discarded: Option<bool>,
}

impl ScopeParams {
    #[must_use]
    pub fn scope(&self) -> Scope {
        Scope::include_discarded(self.include_discarded.unwrap_or(false))
    }
}

#[derive(Debug, Deserialize)]
pub struct AddPortfolioItemRequest {
    #[serde(with = "id")]
    pub portfolio_item_id: i64,
}

/// Creates a portfolio item from a topology service offering.
#[derive(Debug, Deserialize)]
pub struct CreatePortfolioItemRequest {
    #[serde(with = "id")]
    pub portfolio_id: i64,
    pub service_offering_ref: String,
}
