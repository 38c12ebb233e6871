//! In-memory store used by service tests

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::{BookingStore, ItemCatalog, UserDirectory};
use crate::{
    error::AppResult,
    models::{
        booking::{Booking, BookingQuery, BookingShort, BookingStatus, NewBooking},
        item::Item,
        user::User,
    },
};

#[derive(Debug, Clone)]
struct StoredBooking {
    id: i64,
    start: NaiveDateTime,
    end: NaiveDateTime,
    status: BookingStatus,
    booker_id: i64,
    item_id: i64,
}

#[derive(Default)]
struct State {
    users: Vec<User>,
    items: Vec<Item>,
    bookings: Vec<StoredBooking>,
}

impl State {
    /// Join a stored row with its booker and item, as the SQL select does
    fn resolve(&self, stored: &StoredBooking) -> Option<Booking> {
        let booker = self.users.iter().find(|u| u.id == stored.booker_id)?;
        let item = self.items.iter().find(|i| i.id == stored.item_id)?;
        Some(Booking {
            id: stored.id,
            start: stored.start,
            end: stored.end,
            status: stored.status,
            booker: booker.clone(),
            item: item.clone(),
        })
    }

    fn item_available(&self, item_id: i64) -> bool {
        self.items.iter().any(|i| i.id == item_id && i.available)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, id: i64, name: &str) -> User {
        let user = User {
            id,
            name: name.to_string(),
            email: format!("{}@example.com", name),
        };
        self.state.lock().unwrap().users.push(user.clone());
        user
    }

    pub fn add_item(&self, id: i64, owner_id: i64, available: bool) -> Item {
        let item = Item {
            id,
            owner_id,
            name: format!("item-{}", id),
            description: String::new(),
            available,
        };
        self.state.lock().unwrap().items.push(item.clone());
        item
    }

    pub fn set_available(&self, item_id: i64, available: bool) {
        let mut state = self.state.lock().unwrap();
        if let Some(item) = state.items.iter_mut().find(|i| i.id == item_id) {
            item.available = available;
        }
    }

    /// Store a booking in any status, bypassing the engine
    pub fn put_booking(
        &self,
        booker_id: i64,
        item_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
        status: BookingStatus,
    ) -> i64 {
        let mut state = self.state.lock().unwrap();
        let id = state.bookings.len() as i64 + 1;
        state.bookings.push(StoredBooking {
            id,
            start,
            end,
            status,
            booker_id,
            item_id,
        });
        id
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn exists(&self, id: i64) -> AppResult<bool> {
        Ok(self.state.lock().unwrap().users.iter().any(|u| u.id == id))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }
}

#[async_trait]
impl ItemCatalog for MemoryStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Item>> {
        let state = self.state.lock().unwrap();
        Ok(state.items.iter().find(|i| i.id == id).cloned())
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Booking>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .bookings
            .iter()
            .find(|b| b.id == id)
            .and_then(|b| state.resolve(b)))
    }

    async fn insert(&self, booking: &NewBooking) -> AppResult<Option<Booking>> {
        let mut state = self.state.lock().unwrap();
        if !state.item_available(booking.item_id) {
            return Ok(None);
        }

        let stored = StoredBooking {
            id: state.bookings.len() as i64 + 1,
            start: booking.start,
            end: booking.end,
            status: BookingStatus::Waiting,
            booker_id: booking.booker_id,
            item_id: booking.item_id,
        };
        state.bookings.push(stored.clone());
        Ok(state.resolve(&stored))
    }

    async fn transition(
        &self,
        id: i64,
        from: BookingStatus,
        to: BookingStatus,
    ) -> AppResult<Option<Booking>> {
        let mut state = self.state.lock().unwrap();
        let Some(pos) = state.bookings.iter().position(|b| b.id == id) else {
            return Ok(None);
        };

        let item_id = state.bookings[pos].item_id;
        if state.bookings[pos].status != from || !state.item_available(item_id) {
            return Ok(None);
        }

        state.bookings[pos].status = to;
        let stored = state.bookings[pos].clone();
        Ok(state.resolve(&stored))
    }

    async fn find(&self, query: &BookingQuery) -> AppResult<Vec<Booking>> {
        let state = self.state.lock().unwrap();
        let mut bookings: Vec<Booking> = state
            .bookings
            .iter()
            .filter_map(|b| state.resolve(b))
            .filter(|b| query.party.matches(b) && query.predicate.matches(b))
            .collect();

        bookings.sort_by(|a, b| b.start.cmp(&a.start).then(b.id.cmp(&a.id)));

        Ok(match query.page {
            Some(page) => bookings
                .into_iter()
                .skip(page.offset() as usize)
                .take(page.limit() as usize)
                .collect(),
            None => bookings,
        })
    }

    async fn find_last_for_item(
        &self,
        item_id: i64,
        now: NaiveDateTime,
    ) -> AppResult<Option<BookingShort>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .bookings
            .iter()
            .filter(|b| b.item_id == item_id && b.start < now && b.status == BookingStatus::Approved)
            .max_by_key(|b| b.end)
            .map(|b| BookingShort {
                id: b.id,
                booker_id: b.booker_id,
            }))
    }

    async fn find_next_for_item(
        &self,
        item_id: i64,
        now: NaiveDateTime,
    ) -> AppResult<Option<BookingShort>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .bookings
            .iter()
            .filter(|b| b.item_id == item_id && b.start > now && b.status == BookingStatus::Approved)
            .min_by_key(|b| b.start)
            .map(|b| BookingShort {
                id: b.id,
                booker_id: b.booker_id,
            }))
    }
}
