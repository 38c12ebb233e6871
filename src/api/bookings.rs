//! Booking endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::{
    error::{AppError, AppResult, ErrorResponse},
    models::booking::{BookingDetails, CreateBooking},
    AppState,
};

use super::{AppJson, AppQuery, SharerUser};

/// Owner decision query
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DecisionQuery {
    /// `true` approves, `false` rejects
    pub approved: bool,
}

/// Listing query
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookingsQuery {
    /// ALL, CURRENT, FUTURE, PAST, WAITING or REJECTED
    #[serde(default = "default_state")]
    pub state: String,
    /// Offset of the first booking; paging applies only with `size`
    pub from: Option<i64>,
    /// Page size
    pub size: Option<i64>,
}

fn default_state() -> String {
    "ALL".to_string()
}

/// Request a booking
///
/// `start` and `end` carry no zone offset and are read as UTC.
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    params(("X-Sharer-User-Id" = i64, Header, description = "Caller id")),
    request_body = CreateBooking,
    responses(
        (status = 200, description = "Booking created, waiting for the owner", body = BookingDetails),
        (status = 400, description = "Invalid window, malformed body, own item or unavailable item", body = ErrorResponse),
        (status = 404, description = "User or item not found")
    )
)]
pub async fn create_booking(
    State(state): State<AppState>,
    SharerUser(user_id): SharerUser,
    AppJson(request): AppJson<CreateBooking>,
) -> AppResult<Json<BookingDetails>> {
    tracing::info!("Creating booking of item {} by user {}", request.item_id, user_id);
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let booking = state.services.bookings.create_booking(user_id, request).await?;
    Ok(Json(booking.into()))
}

/// Approve or reject a booking
#[utoipa::path(
    patch,
    path = "/bookings/{booking_id}",
    tag = "bookings",
    params(
        ("booking_id" = i64, Path, description = "Booking ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Caller id"),
        DecisionQuery
    ),
    responses(
        (status = 200, description = "Booking decided", body = BookingDetails),
        (status = 400, description = "Booking already decided or item unavailable"),
        (status = 404, description = "Booking not found or caller is not the owner")
    )
)]
pub async fn decide_booking(
    State(state): State<AppState>,
    SharerUser(user_id): SharerUser,
    Path(booking_id): Path<i64>,
    AppQuery(query): AppQuery<DecisionQuery>,
) -> AppResult<Json<BookingDetails>> {
    if query.approved {
        tracing::info!("Approving booking {} by user {}", booking_id, user_id);
    } else {
        tracing::info!("Rejecting booking {} by user {}", booking_id, user_id);
    }

    let booking = state
        .services
        .bookings
        .decide_booking(user_id, booking_id, query.approved)
        .await?;
    Ok(Json(booking.into()))
}

/// Get one booking
#[utoipa::path(
    get,
    path = "/bookings/{booking_id}",
    tag = "bookings",
    params(
        ("booking_id" = i64, Path, description = "Booking ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Caller id")
    ),
    responses(
        (status = 200, description = "Booking details", body = BookingDetails),
        (status = 404, description = "Booking not found for this caller")
    )
)]
pub async fn get_booking(
    State(state): State<AppState>,
    SharerUser(user_id): SharerUser,
    Path(booking_id): Path<i64>,
) -> AppResult<Json<BookingDetails>> {
    tracing::info!("Getting booking {} for user {}", booking_id, user_id);

    let booking = state.services.bookings.get_booking(user_id, booking_id).await?;
    Ok(Json(booking.into()))
}

/// List the caller's bookings
#[utoipa::path(
    get,
    path = "/bookings",
    tag = "bookings",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Caller id"),
        BookingsQuery
    ),
    responses(
        (status = 200, description = "Bookings, newest start first", body = Vec<BookingDetails>),
        (status = 400, description = "Unknown state or invalid pagination"),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_booker_bookings(
    State(state): State<AppState>,
    SharerUser(user_id): SharerUser,
    AppQuery(query): AppQuery<BookingsQuery>,
) -> AppResult<Json<Vec<BookingDetails>>> {
    tracing::info!(
        "Listing bookings of user {} state {} from {:?} size {:?}",
        user_id, query.state, query.from, query.size
    );
    list(&state, user_id, query, false).await
}

/// List bookings on the caller's items
#[utoipa::path(
    get,
    path = "/bookings/owner",
    tag = "bookings",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Caller id"),
        BookingsQuery
    ),
    responses(
        (status = 200, description = "Bookings, newest start first", body = Vec<BookingDetails>),
        (status = 400, description = "Unknown state or invalid pagination"),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_owner_bookings(
    State(state): State<AppState>,
    SharerUser(user_id): SharerUser,
    AppQuery(query): AppQuery<BookingsQuery>,
) -> AppResult<Json<Vec<BookingDetails>>> {
    tracing::info!(
        "Listing bookings on items of user {} state {} from {:?} size {:?}",
        user_id, query.state, query.from, query.size
    );
    list(&state, user_id, query, true).await
}

async fn list(
    state: &AppState,
    user_id: i64,
    query: BookingsQuery,
    as_owner: bool,
) -> AppResult<Json<Vec<BookingDetails>>> {
    let bookings = state
        .services
        .bookings
        .list_bookings(user_id, &query.state, as_owner, query.from, query.size)
        .await?;

    Ok(Json(bookings.into_iter().map(BookingDetails::from).collect()))
}
