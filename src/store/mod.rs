pub mod discard;
mod schema;
mod sqlite;
pub mod validation;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Store defines the database interface.
///
/// Every portfolio and portfolio item operation takes the caller's tenant id
/// explicitly; records belonging to other tenants behave as if they did not
/// exist. Reads default to kept records unless a `Scope` says otherwise.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    /// Runs the schema followed by additional SQL batches.
    fn initialize_with_extensions(&self, extensions: &[&str]) -> Result<()>;

    // Tenant operations
    fn find_or_create_tenant(&self, external_tenant: &str) -> Result<Tenant>;
    fn get_tenant(&self, id: i64) -> Result<Option<Tenant>>;

    // Portfolio operations
    fn create_portfolio(&self, tenant_id: i64, attrs: &NewPortfolio) -> Result<Portfolio>;
    fn get_portfolio(&self, tenant_id: i64, id: i64, scope: Scope) -> Result<Option<Portfolio>>;
    fn list_portfolios(&self, tenant_id: i64, scope: Scope) -> Result<Vec<Portfolio>>;
    fn update_portfolio(&self, tenant_id: i64, id: i64, patch: &PortfolioPatch)
    -> Result<Portfolio>;
    /// Discards the portfolio and all of its kept items atomically.
    fn discard_portfolio(&self, tenant_id: i64, id: i64) -> Result<Portfolio>;
    /// Hard-deletes the portfolio; its items go with it.
    fn destroy_portfolio(&self, tenant_id: i64, id: i64) -> Result<bool>;

    // Portfolio item operations
    fn create_portfolio_item(&self, tenant_id: i64, attrs: &NewPortfolioItem)
    -> Result<PortfolioItem>;
    fn get_portfolio_item(
        &self,
        tenant_id: i64,
        id: i64,
        scope: Scope,
    ) -> Result<Option<PortfolioItem>>;
    fn list_portfolio_items(&self, tenant_id: i64, scope: Scope) -> Result<Vec<PortfolioItem>>;
    /// Kept items of a kept portfolio, in insertion order.
    fn list_portfolio_children(&self, tenant_id: i64, portfolio_id: i64)
    -> Result<Vec<PortfolioItem>>;
    fn update_portfolio_item(
        &self,
        tenant_id: i64,
        id: i64,
        patch: &PortfolioItemPatch,
    ) -> Result<PortfolioItem>;
    /// Discards a single item. Never touches its portfolio.
    fn discard_portfolio_item(&self, tenant_id: i64, id: i64) -> Result<PortfolioItem>;
    /// Re-links an existing item to the given portfolio.
    fn add_portfolio_item(
        &self,
        tenant_id: i64,
        portfolio_id: i64,
        item_id: i64,
    ) -> Result<PortfolioItem>;

    fn close(&self) -> Result<()>;
}
