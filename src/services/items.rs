//! Item read view with surrounding bookings

use std::sync::Arc;

use crate::{
    clock::Clock,
    error::{AppError, AppResult},
    models::item::ItemDetails,
    repository::{BookingStore, ItemCatalog, UserDirectory},
};

#[derive(Clone)]
pub struct ItemsService {
    users: Arc<dyn UserDirectory>,
    items: Arc<dyn ItemCatalog>,
    bookings: Arc<dyn BookingStore>,
    clock: Arc<dyn Clock>,
}

impl ItemsService {
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

    /// Get an item. Its owner also sees the last and next approved bookings.
    pub async fn get_item(&self, item_id: i64, requester_id: i64) -> AppResult<ItemDetails> {
        let item = self
            .items
            .find_by_id(item_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item id {} not found", item_id)))?;

        if !self.users.exists(requester_id).await? {
            return Err(AppError::NotFound(format!("User id {} not found", requester_id)));
        }

        let is_owner = item.owner_id == requester_id;
        let mut details = ItemDetails::new(item);

        if is_owner {
            let now = self.clock.now();
            details.last_booking = self.bookings.find_last_for_item(item_id, now).await?;
            details.next_booking = self.bookings.find_next_for_item(item_id, now).await?;
        }

        Ok(details)
    }
}
