mod attributes;
pub mod id;
mod models;

pub use attributes::{NewPortfolio, NewPortfolioItem, PortfolioItemPatch, PortfolioPatch, RawFlag};
pub use models::{Discardable, DiscardState, Portfolio, PortfolioItem, Scope, Tenant};
