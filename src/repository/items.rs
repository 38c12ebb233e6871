//! Items repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::ItemCatalog;
use crate::{error::AppResult, models::item::Item};

#[derive(Clone)]
pub struct ItemsRepository {
    pool: Pool<Postgres>,
}

impl ItemsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemCatalog for ItemsRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(
            "SELECT id, owner_id, name, description, is_available FROM items WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }
}
