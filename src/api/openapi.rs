//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{bookings, health, items};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ShareIt API",
        version = "0.1.0",
        description = "Item sharing and booking REST API"
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Bookings
        bookings::create_booking,
        bookings::decide_booking,
        bookings::get_booking,
        bookings::list_booker_bookings,
        bookings::list_owner_bookings,
        // Items
        items::get_item,
    ),
    components(
        schemas(
            crate::models::booking::CreateBooking,
            crate::models::booking::BookingDetails,
            crate::models::booking::BookingShort,
            crate::models::booking::BookingStatus,
            crate::models::item::ItemShort,
            crate::models::item::ItemDetails,
            crate::models::user::UserShort,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "bookings", description = "Booking lifecycle"),
        (name = "items", description = "Item lookups")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
