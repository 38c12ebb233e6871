//! Item endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{error::AppResult, models::item::ItemDetails, AppState};

use super::SharerUser;

/// Get an item; its owner also gets the last and next approved bookings
#[utoipa::path(
    get,
    path = "/items/{item_id}",
    tag = "items",
    params(
        ("item_id" = i64, Path, description = "Item ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Caller id")
    ),
    responses(
        (status = 200, description = "Item details", body = ItemDetails),
        (status = 404, description = "Item or user not found")
    )
)]
pub async fn get_item(
    State(state): State<AppState>,
    SharerUser(user_id): SharerUser,
    Path(item_id): Path<i64>,
) -> AppResult<Json<ItemDetails>> {
    tracing::info!("Getting item {} for user {}", item_id, user_id);

    let item = state.services.items.get_item(item_id, user_id).await?;
    Ok(Json(item))
}
