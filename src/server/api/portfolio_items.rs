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
use crate::server::dto::{CreatePortfolioItemRequest, ScopeParams};
use crate::server::response::{ApiError, CollectionResponse, StoreOptionExt};
use crate::topology::{provider_control_parameters, service_plans};
use crate::types::{NewPortfolioItem, PortfolioItemPatch, Scope};

pub async fn list_portfolio_items(
    tenant: RequireTenant,
    State(state): State<Arc<AppState>>,
    Query(params): Query<ScopeParams>,
) -> impl IntoResponse {
    let items = state
        .store
        .list_portfolio_items(tenant.id(), params.scope())?;

    Ok::<_, ApiError>(Json(CollectionResponse::new(items)))
}

pub async fn create_portfolio_item(
    tenant: RequireTenant,
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreatePortfolioItemRequest>,
) -> impl IntoResponse {
    let offering = state
        .topology
        .service_offering(&req.service_offering_ref)
        .await
        .map_err(|e| {
            tracing::warn!(
                "Service offering {} not available: {}",
                req.service_offering_ref,
                e
            );
            ApiError::not_found(e.to_string())
        })?;

    let attrs = NewPortfolioItem {
        portfolio_id: req.portfolio_id,
        name: offering.name,
        description: offering.description,
        workflow_ref: None,
        service_offering_ref: req.service_offering_ref,
        service_offering_source_ref: offering.source_id,
    };

    let item = state.store.create_portfolio_item(tenant.id(), &attrs)?;

    Ok::<_, ApiError>(Json(item))
}

pub async fn get_portfolio_item(
    tenant: RequireTenant,
    State(state): State<Arc<AppState>>,
    EntityId(id): EntityId,
    Query(params): Query<ScopeParams>,
) -> impl IntoResponse {
    let item = state
        .store
        .get_portfolio_item(tenant.id(), id, params.scope())?
        .or_not_found()?;

    Ok::<_, ApiError>(Json(item))
}

pub async fn update_portfolio_item(
    tenant: RequireTenant,
    State(state): State<Arc<AppState>>,
    EntityId(id): EntityId,
    JsonBody(req): JsonBody<PortfolioItemPatch>,
) -> impl IntoResponse {
    let item = state.store.update_portfolio_item(tenant.id(), id, &req)?;

    Ok::<_, ApiError>(Json(item))
}

pub async fn discard_portfolio_item(
    tenant: RequireTenant,
    State(state): State<Arc<AppState>>,
    EntityId(id): EntityId,
) -> impl IntoResponse {
    state.store.discard_portfolio_item(tenant.id(), id)?;

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}

pub async fn list_service_plans(
    tenant: RequireTenant,
    State(state): State<Arc<AppState>>,
    EntityId(id): EntityId,
) -> impl IntoResponse {
    let item = state
        .store
        .get_portfolio_item(tenant.id(), id, Scope::Kept)?
        .or_not_found()?;

    let plans = service_plans(state.topology.as_ref(), &item)
        .await?;

    Ok::<_, ApiError>(Json(plans))
}

pub async fn get_provider_control_parameters(
    tenant: RequireTenant,
    State(state): State<Arc<AppState>>,
    EntityId(id): EntityId,
) -> impl IntoResponse {
    let item = state
        .store
        .get_portfolio_item(tenant.id(), id, Scope::Kept)?
        .or_not_found()?;

    let schema = provider_control_parameters(state.topology.as_ref(), &item)
        .await?;

    Ok::<_, ApiError>(Json(schema))
}
