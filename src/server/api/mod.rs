mod portfolio_items;
mod portfolios;

use std::sync::Arc;

use axum::{Router, routing::get};

use crate::server::AppState;

pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Portfolios
        .route(
            "/portfolios",
            get(portfolios::list_portfolios).post(portfolios::create_portfolio),
        )
        .route(
            "/portfolios/{id}",
            get(portfolios::get_portfolio)
                .patch(portfolios::update_portfolio)
                .delete(portfolios::discard_portfolio),
        )
        .route(
            "/portfolios/{id}/portfolio_items",
            get(portfolios::list_portfolio_items).post(portfolios::add_portfolio_item),
        )
        // Portfolio items
        .route(
            "/portfolio_items",
            get(portfolio_items::list_portfolio_items).post(portfolio_items::create_portfolio_item),
        )
        .route(
            "/portfolio_items/{id}",
            get(portfolio_items::get_portfolio_item)
                .patch(portfolio_items::update_portfolio_item)
                .delete(portfolio_items::discard_portfolio_item),
        )
        .route(
            "/portfolio_items/{id}/service_plans",
            get(portfolio_items::list_service_plans),
        )
        .route(
            "/portfolio_items/{id}/provider_control_parameters",
            get(portfolio_items::get_provider_control_parameters),
        )
}
