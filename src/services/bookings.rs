//! Booking lifecycle service
//!
//! Creation, owner decisions, single lookups and state-filtered listings.
//! Unauthorized access is reported as "not found" so that callers cannot
//! discover bookings they have no part in.

use std::sync::Arc;

use crate::{
    clock::Clock,
    error::{AppError, AppResult},
    models::{
        booking::{Booking, BookingQuery, BookingState, BookingStatus, CreateBooking, NewBooking, Party},
        page::PageRequest,
    },
    repository::{BookingStore, ItemCatalog, UserDirectory},
};

fn user_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("User id {} not found", id))
}

fn booking_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Booking id {} not found", id))
}

fn item_unavailable(id: i64) -> AppError {
    AppError::Validation(format!("Item id {} is unavailable", id))
}

fn undecidable() -> AppError {
    AppError::Conflict("Unable to approve booking".to_string())
}

#[derive(Clone)]
pub struct BookingsService {
    users: Arc<dyn UserDirectory>,
    items: Arc<dyn ItemCatalog>,
    bookings: Arc<dyn BookingStore>,
    clock: Arc<dyn Clock>,
}

impl BookingsService {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        items: Arc<dyn ItemCatalog>,
        bookings: Arc<dyn BookingStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            items,
            bookings,
            clock,
        }
    }

    /// Request a booking of someone else's item. The booking starts out
    /// `WAITING`; the item's availability flag is left untouched.
    pub async fn create_booking(&self, booker_id: i64, request: CreateBooking) -> AppResult<Booking> {
        let (start, end) = match (request.start, request.end) {
            (Some(start), Some(end)) if start < end => (start, end),
            _ => return Err(AppError::Validation("start/end data is incorrect".to_string())),
        };

        let booker = self
            .users
            .find_by_id(booker_id)
            .await?
            .ok_or_else(|| user_not_found(booker_id))?;

        let item = self
            .items
            .find_by_id(request.item_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item id {} not found", request.item_id)))?;

        if item.owner_id == booker.id {
            return Err(AppError::Conflict(format!("Item id {} already booked", item.id)));
        }

        if !item.available {
            return Err(item_unavailable(item.id));
        }

        let new_booking = NewBooking {
            booker_id: booker.id,
            item_id: item.id,
            start,
            end,
        };

        let booking = self
            .bookings
            .insert(&new_booking)
            .await?
            .ok_or_else(|| item_unavailable(item.id))?;

        tracing::debug!(booking_id = booking.id, item_id = item.id, "booking created");
        Ok(booking)
    }

    /// Approve or reject a waiting booking. Only the item owner may decide,
    /// and only once.
    pub async fn decide_booking(&self, actor_id: i64, booking_id: i64, approved: bool) -> AppResult<Booking> {
        if !self.users.exists(actor_id).await? {
            return Err(user_not_found(actor_id));
        }

        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| booking_not_found(booking_id))?;

        if !booking.is_owned_by(actor_id) {
            return Err(AppError::NotFound(format!(
                "User id {} has no rights to approve booking id {}",
                actor_id, booking_id
            )));
        }

        if booking.status.is_terminal() || !booking.item.available {
            return Err(undecidable());
        }

        // The store re-checks both conditions while writing; a concurrent
        // decision that got there first makes this one fail the same way.
        let decided = self
            .bookings
            .transition(booking.id, BookingStatus::Waiting, BookingStatus::decided(approved))
            .await?
            .ok_or_else(undecidable)?;

        tracing::debug!(booking_id, status = %decided.status, "booking decided");
        Ok(decided)
    }

    /// Fetch a booking visible to its booker or the item owner
    pub async fn get_booking(&self, requester_id: i64, booking_id: i64) -> AppResult<Booking> {
        if !self.users.exists(requester_id).await? {
            return Err(user_not_found(requester_id));
        }

        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| booking_not_found(booking_id))?;

        if !booking.is_visible_to(requester_id) {
            return Err(AppError::NotFound(format!(
                "No booking id {} found for user {}",
                booking_id, requester_id
            )));
        }

        Ok(booking)
    }

    /// List the requester's bookings (or bookings on their items when
    /// `as_owner`), filtered by `state` and newest start first.
    pub async fn list_bookings(
        &self,
        requester_id: i64,
        state: &str,
        as_owner: bool,
        from: Option<i64>,
        size: Option<i64>,
    ) -> AppResult<Vec<Booking>> {
        if !self.users.exists(requester_id).await? {
            return Err(user_not_found(requester_id));
        }

        let page = PageRequest::from_params(from, size)?;
        let state: BookingState = state.parse()?;

        let query = BookingQuery {
            party: Party::new(requester_id, as_owner),
            predicate: state.predicate(self.clock.now()),
            page,
        };

        self.bookings.find(&query).await
    }
}
