//! API handlers for ShareIt REST endpoints

pub mod bookings;
pub mod health;
pub mod items;
pub mod openapi;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts},
    http::request::Parts,
};

use crate::error::AppError;

/// Header carrying the caller's user id, set by the trusted front proxy
pub const SHARER_USER_HEADER: &str = "x-sharer-user-id";

/// JSON body whose rejections are reported as validation errors
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Query string whose rejections are reported as validation errors
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// Extractor for the calling user's id
#[derive(Debug, Clone, Copy)]
pub struct SharerUser(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for SharerUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(SHARER_USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::BadRequest("Missing X-Sharer-User-Id header".to_string()))?;

        let user_id = value
            .trim()
            .parse::<i64>()
            .map_err(|_| AppError::BadRequest(format!("Invalid X-Sharer-User-Id header: {}", value)))?;

        Ok(SharerUser(user_id))
    }
}
