//! Booking model, status machine and query filters

use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::item::{Item, ItemShort};
use super::page::PageRequest;
use super::user::{User, UserShort};
use crate::error::AppError;

/// Booking status.
///
/// `Waiting` is the only initial state; `Approved` and `Rejected` are
/// terminal and reachable only from `Waiting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "booking_status", rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Waiting,
    Approved,
    Rejected,
}

impl BookingStatus {
    /// Status an owner's decision moves a waiting booking to
    pub fn decided(approved: bool) -> Self {
        if approved {
            BookingStatus::Approved
        } else {
            BookingStatus::Rejected
        }
    }

    pub fn is_terminal(self) -> bool {
        match self {
            BookingStatus::Waiting => false,
            BookingStatus::Approved | BookingStatus::Rejected => true,
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BookingStatus::Waiting => "WAITING",
            BookingStatus::Approved => "APPROVED",
            BookingStatus::Rejected => "REJECTED",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// Listing filters
// ---------------------------------------------------------------------------

/// State filter accepted by the listing endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingState {
    All,
    Current,
    Future,
    Past,
    Waiting,
    Rejected,
}

impl FromStr for BookingState {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALL" => Ok(BookingState::All),
            "CURRENT" => Ok(BookingState::Current),
            "FUTURE" => Ok(BookingState::Future),
            "PAST" => Ok(BookingState::Past),
            "WAITING" => Ok(BookingState::Waiting),
            "REJECTED" => Ok(BookingState::Rejected),
            _ => Err(AppError::Validation(
                "Unknown state: UNSUPPORTED_STATUS".to_string(),
            )),
        }
    }
}

impl BookingState {
    /// Row predicate for this state, evaluated against `now`
    pub fn predicate(self, now: NaiveDateTime) -> BookingPredicate {
        match self {
            BookingState::All => BookingPredicate::Any,
            BookingState::Current => BookingPredicate::ActiveAt(now),
            BookingState::Future => BookingPredicate::StartsAfter(now),
            BookingState::Past => BookingPredicate::EndedBefore(now),
            BookingState::Waiting => BookingPredicate::Status(BookingStatus::Waiting),
            BookingState::Rejected => BookingPredicate::Status(BookingStatus::Rejected),
        }
    }
}

/// Whose bookings a listing selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    /// Bookings made by this user
    Booker(i64),
    /// Bookings on items owned by this user
    Owner(i64),
}

impl Party {
    pub fn new(user_id: i64, as_owner: bool) -> Self {
        if as_owner {
            Party::Owner(user_id)
        } else {
            Party::Booker(user_id)
        }
    }

    pub fn user_id(&self) -> i64 {
        match *self {
            Party::Booker(id) | Party::Owner(id) => id,
        }
    }

    pub fn matches(&self, booking: &Booking) -> bool {
        match *self {
            Party::Booker(id) => booking.booker.id == id,
            Party::Owner(id) => booking.item.owner_id == id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingPredicate {
    Any,
    /// `start <= t <= end`
    ActiveAt(NaiveDateTime),
    /// `start > t`
    StartsAfter(NaiveDateTime),
    /// `end < t`
    EndedBefore(NaiveDateTime),
    Status(BookingStatus),
}

impl BookingPredicate {
    pub fn matches(&self, booking: &Booking) -> bool {
        match *self {
            BookingPredicate::Any => true,
            BookingPredicate::ActiveAt(t) => booking.start <= t && t <= booking.end,
            BookingPredicate::StartsAfter(t) => booking.start > t,
            BookingPredicate::EndedBefore(t) => booking.end < t,
            BookingPredicate::Status(status) => booking.status == status,
        }
    }
}

/// A listing query against the booking store. Results are always ordered by
/// start time, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingQuery {
    pub party: Party,
    pub predicate: BookingPredicate,
    pub page: Option<PageRequest>,
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Booking with its booker and item resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub id: i64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub status: BookingStatus,
    pub booker: User,
    pub item: Item,
}

impl Booking {
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.item.owner_id == user_id
    }

    pub fn is_visible_to(&self, user_id: i64) -> bool {
        self.booker.id == user_id || self.is_owned_by(user_id)
    }
}

/// Flat row of `bookings` joined with `users` and `items`
#[derive(Debug, FromRow)]
pub struct BookingRow {
    pub id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub status: BookingStatus,
    pub booker_id: i64,
    pub booker_name: String,
    pub booker_email: String,
    pub item_id: i64,
    pub item_owner_id: i64,
    pub item_name: String,
    pub item_description: String,
    pub item_available: bool,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Self {
            id: row.id,
            start: row.start_time,
            end: row.end_time,
            status: row.status,
            booker: User {
                id: row.booker_id,
                name: row.booker_name,
                email: row.booker_email,
            },
            item: Item {
                id: row.item_id,
                owner_id: row.item_owner_id,
                name: row.item_name,
                description: row.item_description,
                available: row.item_available,
            },
        }
    }
}

/// Booking about to be persisted. Status is always `WAITING`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub booker_id: i64,
    pub item_id: i64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Create booking request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBooking {
    #[validate(range(min = 1, message = "Item id must be positive"))]
    pub item_id: i64,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

/// Booking as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookingDetails {
    pub id: i64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub status: BookingStatus,
    pub booker: UserShort,
    pub item: ItemShort,
}

impl From<Booking> for BookingDetails {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            start: booking.start,
            end: booking.end,
            status: booking.status,
            booker: booking.booker.into(),
            item: booking.item.into(),
        }
    }
}

/// Booking reference shown on an item's last/next slots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingShort {
    pub id: i64,
    pub booker_id: i64,
}
