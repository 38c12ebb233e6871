//! Business logic services

pub mod bookings;
pub mod items;

use std::sync::Arc;

use crate::{clock::Clock, error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub bookings: bookings::BookingsService,
    pub items: items::ItemsService,
    repository: Repository,
}

impl Services {
    /// Create all services over the PostgreSQL repository
    pub fn new(repository: Repository, clock: Arc<dyn Clock>) -> Self {
        let user_directory = Arc::new(repository.users.clone());
        let item_catalog = Arc::new(repository.items.clone());
        let booking_store = Arc::new(repository.bookings.clone());

        Self {
            bookings: bookings::BookingsService::new(
                user_directory.clone(),
                item_catalog.clone(),
                booking_store.clone(),
                clock.clone(),
            ),
            items: items::ItemsService::new(user_directory, item_catalog, booking_store, clock),
            repository,
        }
    }

    /// Check that the database answers
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
