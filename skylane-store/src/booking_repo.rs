use crate::StoreError;
use skylane_core::booking::{Booking, BookingPut};
use sqlx::{PgExecutor, Postgres, Transaction};

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: i32,
    account_info_id: i32,
    class_id: i32,
    from_id: i32,
    to_id: i32,
    departure_date: chrono::DateTime<chrono::Utc>,
    return_date: Option<chrono::DateTime<chrono::Utc>>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Booking {
            id: row.id,
            account_info_id: row.account_info_id,
            class_id: row.class_id,
            from_id: row.from_id,
            to_id: row.to_id,
            departure_date: row.departure_date,
            return_date: row.return_date,
            created_at: row.created_at,
        }
    }
}

const BOOKING_COLUMNS: &str =
    "b.id, b.account_info_id, b.class_id, b.from_id, b.to_id, b.departure_date, b.return_date, b.created_at";

pub struct BookingRepository;

impl BookingRepository {
    /// Bookings owned (via accounts_info) by the given account.
    pub async fn list_for_account<'e>(
        executor: impl PgExecutor<'e>,
        account_id: i32,
    ) -> Result<Vec<Booking>, StoreError> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            r#"
            SELECT {BOOKING_COLUMNS}
            FROM bookings b
            JOIN accounts_info ai ON ai.id = b.account_info_id
            WHERE ai.account_id = $1
            ORDER BY b.id
            "#
        ))
        .bind(account_id)
        .fetch_all(executor)
        .await?;

        Ok(rows.into_iter().map(Booking::from).collect())
    }

    /// Existence and ownership in one query: a booking that exists but
    /// belongs to another account is indistinguishable from an absent id.
    pub async fn find_for_account<'e>(
        executor: impl PgExecutor<'e>,
        account_id: i32,
        booking_id: i32,
    ) -> Result<Option<Booking>, StoreError> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            r#"
            SELECT {BOOKING_COLUMNS}
            FROM bookings b
            JOIN accounts_info ai ON ai.id = b.account_info_id
            WHERE ai.account_id = $1 AND b.id = $2
            "#
        ))
        .bind(account_id)
        .bind(booking_id)
        .fetch_optional(executor)
        .await?;

        Ok(row.map(Booking::from))
    }

    /// `account_info_id` comes from the resolved ancestor, never from the
    /// request body.
    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        account_info_id: i32,
        booking: &BookingPut,
    ) -> Result<Booking, StoreError> {
        let row = sqlx::query_as::<_, BookingRow>(
            r#"
            INSERT INTO bookings (account_info_id, class_id, from_id, to_id, departure_date, return_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, account_info_id, class_id, from_id, to_id, departure_date, return_date, created_at
            "#,
        )
        .bind(account_info_id)
        .bind(booking.class_id)
        .bind(booking.from_id)
        .bind(booking.to_id)
        .bind(booking.departure_date)
        .bind(booking.return_date)
        .fetch_one(&mut **tx)
        .await?;

        Ok(row.into())
    }

    /// Writes every mutable column from the in-memory booking; callers
    /// decide replace vs merge before this point.
    pub async fn update(
        tx: &mut Transaction<'_, Postgres>,
        booking: &Booking,
    ) -> Result<Booking, StoreError> {
        let row = sqlx::query_as::<_, BookingRow>(
            r#"
            UPDATE bookings
            SET class_id = $2, from_id = $3, to_id = $4, departure_date = $5, return_date = $6
            WHERE id = $1
            RETURNING id, account_info_id, class_id, from_id, to_id, departure_date, return_date, created_at
            "#,
        )
        .bind(booking.id)
        .bind(booking.class_id)
        .bind(booking.from_id)
        .bind(booking.to_id)
        .bind(booking.departure_date)
        .bind(booking.return_date)
        .fetch_one(&mut **tx)
        .await?;

        Ok(row.into())
    }

    /// Flights under this booking go with it via ON DELETE CASCADE.
    pub async fn delete(
        tx: &mut Transaction<'_, Postgres>,
        booking_id: i32,
    ) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(booking_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}
