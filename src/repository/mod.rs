//! Repository layer for database operations
//!
//! The booking engine only sees the traits below; [`Repository`] wires the
//! PostgreSQL implementations together.

pub mod bookings;
pub mod items;
pub mod users;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        booking::{Booking, BookingQuery, BookingShort, BookingStatus, NewBooking},
        item::Item,
        user::User,
    },
};

/// Identity lookups
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn exists(&self, id: i64) -> AppResult<bool>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;
}

/// Item lookups
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemCatalog: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Item>>;
}

/// Persistent booking collection
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Booking>>;

    /// Insert a `WAITING` booking. Returns `None` without writing anything
    /// when the item is no longer available.
    async fn insert(&self, booking: &NewBooking) -> AppResult<Option<Booking>>;

    /// Move a booking from `from` to `to` in one atomic step. Returns `None`
    /// when the booking is not in `from` any more or its item is no longer
    /// available.
    async fn transition(
        &self,
        id: i64,
        from: BookingStatus,
        to: BookingStatus,
    ) -> AppResult<Option<Booking>>;

    /// Bookings matching `query`, newest start first
    async fn find(&self, query: &BookingQuery) -> AppResult<Vec<Booking>>;

    /// Most recent approved booking of an item that started before `now`
    async fn find_last_for_item(
        &self,
        item_id: i64,
        now: NaiveDateTime,
    ) -> AppResult<Option<BookingShort>>;

    /// Earliest approved booking of an item that starts after `now`
    async fn find_next_for_item(
        &self,
        item_id: i64,
        now: NaiveDateTime,
    ) -> AppResult<Option<BookingShort>>;
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: users::UsersRepository,
    pub items: items::ItemsRepository,
    pub bookings: bookings::BookingsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            items: items::ItemsRepository::new(pool.clone()),
            bookings: bookings::BookingsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Round-trip to the database
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
