//! Item model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::booking::BookingShort;

/// Item as stored in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Item {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub description: String,
    #[sqlx(rename = "is_available")]
    pub available: bool,
}

/// Short item representation embedded in booking responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ItemShort {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
}

impl From<Item> for ItemShort {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            available: item.available,
        }
    }
}

/// Item with its surrounding approved bookings.
///
/// `last_booking` and `next_booking` are only filled in for the owner.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetails {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub last_booking: Option<BookingShort>,
    pub next_booking: Option<BookingShort>,
}

impl ItemDetails {
    pub fn new(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            available: item.available,
            last_booking: None,
            next_booking: None,
        }
    }
}
