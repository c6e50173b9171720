use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::Utc;
use tracing::info;

use geoitems_core::{GeoFields, Item, ItemDraft, ItemId, ItemPatch};

use crate::app::dto;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::app::routes::system;
use crate::context::PrincipalContext;
use crate::middleware::{auth_middleware, AuthState};

/// Item routes. Reads are public; mutating methods require a bearer token.
///
/// Authentication is layered per method, so unsupported methods get a 405
/// rather than an authentication error.
pub fn router(auth: AuthState) -> Router {
    let auth = from_fn_with_state(auth, auth_middleware);

    Router::new()
        .route(
            "/items",
            post(create_item)
                .route_layer(auth.clone())
                .merge(get(list_items))
                .fallback(system::method_not_allowed),
        )
        .route(
            "/items/:id",
            patch(update_item)
                .delete(delete_item)
                .route_layer(auth)
                .merge(get(get_item))
                .fallback(system::method_not_allowed),
        )
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    payload: Result<Json<dto::CreateItemRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let Json(body) = payload?;
    let new = ItemDraft::from(body).validate(Utc::now())?;

    let point = services
        .resolver
        .resolve(&new.postcode)
        .await
        .ok_or_else(ApiError::invalid_postcode)?;

    let item = Item::create(ItemId::new(), new, GeoFields::derive(point));
    services.store.put(item.clone()).await?;

    info!(item_id = %item.id, subject = principal.subject(), "item created");
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<dto::ItemsResponse>, ApiError> {
    let items = services.store.scan().await?;
    Ok(Json(dto::ItemsResponse { items }))
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<Item>, ApiError> {
    let id: ItemId = id.parse()?;
    let item = services.store.get(&id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(item))
}

pub async fn update_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    payload: Result<Json<dto::UpdateItemRequest>, JsonRejection>,
) -> Result<Json<Item>, ApiError> {
    let id: ItemId = id.parse()?;
    let Json(body) = payload?;
    let mut changes = ItemPatch::from(body).validate(Utc::now())?;

    let existing = services.store.get(&id).await?.ok_or(ApiError::NotFound)?;

    // Location is only recomputed when the item actually moves.
    let moved_to = changes
        .postcode
        .clone()
        .filter(|_| changes.changes_postcode(&existing));
    if let Some(postcode) = moved_to {
        let point = services
            .resolver
            .resolve(&postcode)
            .await
            .ok_or_else(ApiError::invalid_postcode)?;
        changes = changes.with_geo(GeoFields::derive(point));
    }

    let updated = services.store.update(&id, &changes).await?;

    info!(item_id = %id, subject = principal.subject(), "item updated");
    Ok(Json(updated))
}

pub async fn delete_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: ItemId = id.parse()?;
    services.store.get(&id).await?.ok_or(ApiError::NotFound)?;

    if !services.store.delete(&id).await? {
        return Err(ApiError::NotFound);
    }

    info!(item_id = %id, subject = principal.subject(), "item deleted");
    Ok(StatusCode::NO_CONTENT)
}
