//! Bookings repository for database operations

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{Pool, Postgres};

use super::BookingStore;
use crate::{
    error::AppResult,
    models::booking::{
        Booking, BookingPredicate, BookingQuery, BookingRow, BookingShort, BookingStatus,
        NewBooking, Party,
    },
};

const BOOKING_SELECT: &str = r#"
    SELECT b.id, b.start_time, b.end_time, b.status,
           u.id AS booker_id, u.name AS booker_name, u.email AS booker_email,
           i.id AS item_id, i.owner_id AS item_owner_id, i.name AS item_name,
           i.description AS item_description, i.is_available AS item_available
    FROM bookings b
    JOIN users u ON b.user_id = u.id
    JOIN items i ON b.item_id = i.id
"#;

#[derive(Clone)]
pub struct BookingsRepository {
    pool: Pool<Postgres>,
}

impl BookingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// SQL for a listing query. The party id is always `$1`; time and status
    /// predicates bind their value as `$2`.
    fn find_sql(query: &BookingQuery) -> String {
        let party = match query.party {
            Party::Booker(_) => "b.user_id = $1",
            Party::Owner(_) => "i.owner_id = $1",
        };

        let predicate = match query.predicate {
            BookingPredicate::Any => None,
            BookingPredicate::ActiveAt(_) => Some("b.start_time <= $2 AND b.end_time >= $2"),
            BookingPredicate::StartsAfter(_) => Some("b.start_time > $2"),
            BookingPredicate::EndedBefore(_) => Some("b.end_time < $2"),
            BookingPredicate::Status(_) => Some("b.status = $2"),
        };

        let mut sql = format!("{} WHERE {}", BOOKING_SELECT.trim_end(), party);
        if let Some(predicate) = predicate {
            sql.push_str(" AND ");
            sql.push_str(predicate);
        }
        sql.push_str(" ORDER BY b.start_time DESC, b.id DESC");
        if let Some(page) = query.page {
            sql.push_str(&format!(" LIMIT {} OFFSET {}", page.limit(), page.offset()));
        }
        sql
    }
}

#[async_trait]
impl BookingStore for BookingsRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Booking>> {
        let sql = format!("{} WHERE b.id = $1", BOOKING_SELECT.trim_end());
        let row = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Booking::from))
    }

    async fn insert(&self, booking: &NewBooking) -> AppResult<Option<Booking>> {
        let mut tx = self.pool.begin().await?;

        // Guarded insert: nothing is written if the item was withdrawn since
        // the caller looked at it.
        let id: Option<i64> = sqlx::query_scalar(
            r#"
            INSERT INTO bookings (start_time, end_time, status, user_id, item_id)
            SELECT $1, $2, $3, $4, i.id
            FROM items i
            WHERE i.id = $5 AND i.is_available
            RETURNING id
            "#,
        )
        .bind(booking.start)
        .bind(booking.end)
        .bind(BookingStatus::Waiting)
        .bind(booking.booker_id)
        .bind(booking.item_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(id) = id else {
            tx.rollback().await?;
            return Ok(None);
        };

        let sql = format!("{} WHERE b.id = $1", BOOKING_SELECT.trim_end());
        let row = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(row.into()))
    }

    async fn transition(
        &self,
        id: i64,
        from: BookingStatus,
        to: BookingStatus,
    ) -> AppResult<Option<Booking>> {
        let mut tx = self.pool.begin().await?;

        let updated: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE bookings AS b
            SET status = $1
            FROM items AS i
            WHERE b.id = $2
              AND b.status = $3
              AND i.id = b.item_id
              AND i.is_available
            RETURNING b.id
            "#,
        )
        .bind(to)
        .bind(id)
        .bind(from)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        let sql = format!("{} WHERE b.id = $1", BOOKING_SELECT.trim_end());
        let row = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(row.into()))
    }

    async fn find(&self, query: &BookingQuery) -> AppResult<Vec<Booking>> {
        let sql = Self::find_sql(query);

        let mut builder = sqlx::query_as::<_, BookingRow>(&sql).bind(query.party.user_id());
        builder = match query.predicate {
            BookingPredicate::Any => builder,
            BookingPredicate::ActiveAt(t)
            | BookingPredicate::StartsAfter(t)
            | BookingPredicate::EndedBefore(t) => builder.bind(t),
            BookingPredicate::Status(status) => builder.bind(status),
        };

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Booking::from).collect())
    }

    async fn find_last_for_item(
        &self,
        item_id: i64,
        now: NaiveDateTime,
    ) -> AppResult<Option<BookingShort>> {
        let booking = sqlx::query_as::<_, BookingShort>(
            r#"
            SELECT b.id, b.user_id AS booker_id
            FROM bookings b
            WHERE b.item_id = $1 AND b.start_time < $2 AND b.status = $3
            ORDER BY b.end_time DESC
            LIMIT 1
            "#,
        )
        .bind(item_id)
        .bind(now)
        .bind(BookingStatus::Approved)
        .fetch_optional(&self.pool)
        .await?;
        Ok(booking)
    }

    async fn find_next_for_item(
        &self,
        item_id: i64,
        now: NaiveDateTime,
    ) -> AppResult<Option<BookingShort>> {
        let booking = sqlx::query_as::<_, BookingShort>(
            r#"
            SELECT b.id, b.user_id AS booker_id
            FROM bookings b
            WHERE b.item_id = $1 AND b.start_time > $2 AND b.status = $3
            ORDER BY b.start_time ASC
            LIMIT 1
            "#,
        )
        .bind(item_id)
        .bind(now)
        .bind(BookingStatus::Approved)
        .fetch_optional(&self.pool)
        .await?;
        Ok(booking)
    }
}
