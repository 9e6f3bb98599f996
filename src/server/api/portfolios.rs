use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::auth::RequireTenant;
use crate::server::AppState;
use crate::server::extract::{EntityId, JsonBody};
use crate::server::dto::{AddPortfolioItemRequest, ScopeParams};
use crate::server::response::{ApiError, CollectionResponse, StoreOptionExt};
use crate::types::{NewPortfolio, PortfolioPatch};

pub async fn list_portfolios(
    tenant: RequireTenant,
    State(state): State<Arc<AppState>>,
    Query(params): Query<ScopeParams>,
) -> impl IntoResponse {
    let portfolios = state.store.list_portfolios(tenant.id(), params.scope())?;

    Ok::<_, ApiError>(Json(CollectionResponse::new(portfolios)))
}

pub async fn create_portfolio(
    tenant: RequireTenant,
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<NewPortfolio>,
) -> impl IntoResponse {
    let portfolio = state.store.create_portfolio(tenant.id(), &req)?;

    tracing::info!("Created Portfolio {} for tenant {}", portfolio.id, tenant.id());

    Ok::<_, ApiError>((StatusCode::CREATED, Json(portfolio)))
}

pub async fn get_portfolio(
    tenant: RequireTenant,
    State(state): State<Arc<AppState>>,
    EntityId(id): EntityId,
    Query(params): Query<ScopeParams>,
) -> impl IntoResponse {
    let portfolio = state
        .store
        .get_portfolio(tenant.id(), id, params.scope())?
        .or_not_found()?;

    Ok::<_, ApiError>(Json(portfolio))
}

pub async fn update_portfolio(
    tenant: RequireTenant,
    State(state): State<Arc<AppState>>,
    EntityId(id): EntityId,
    JsonBody(req): JsonBody<PortfolioPatch>,
) -> impl IntoResponse {
    let portfolio = state.store.update_portfolio(tenant.id(), id, &req)?;

    Ok::<_, ApiError>(Json(portfolio))
}

pub async fn discard_portfolio(
    tenant: RequireTenant,
    State(state): State<Arc<AppState>>,
    EntityId(id): EntityId,
) -> impl IntoResponse {
    state.store.discard_portfolio(tenant.id(), id)?;

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}

pub async fn list_portfolio_items(
    tenant: RequireTenant,
    State(state): State<Arc<AppState>>,
    EntityId(id): EntityId,
) -> impl IntoResponse {
    let items = state.store.list_portfolio_children(tenant.id(), id)?;

    Ok::<_, ApiError>(Json(CollectionResponse::new(items)))
}

pub async fn add_portfolio_item(
    tenant: RequireTenant,
    State(state): State<Arc<AppState>>,
    EntityId(id): EntityId,
    JsonBody(req): JsonBody<AddPortfolioItemRequest>,
) -> impl IntoResponse {
    let item = state
        .store
        .add_portfolio_item(tenant.id(), id, req.portfolio_item_id)?;

    Ok::<_, ApiError>(Json(vec![item]))
}
