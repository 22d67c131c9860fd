use crate::StoreError;
use skylane_core::booking::{Flight, FlightPut, FlightStatus};
use sqlx::{PgExecutor, Postgres, Transaction};

#[derive(sqlx::FromRow)]
struct FlightRow {
    id: i32,
    booking_id: i32,
    account_info_id: i32,
    flight_number: String,
    seat_number: String,
    status: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<FlightRow> for Flight {
    type Error = StoreError;

    fn try_from(row: FlightRow) -> Result<Self, Self::Error> {
        Ok(Flight {
            id: row.id,
            booking_id: row.booking_id,
            account_info_id: row.account_info_id,
            flight_number: row.flight_number,
            seat_number: row.seat_number,
            status: row.status.parse::<FlightStatus>()?,
            created_at: row.created_at,
        })
    }
}

const FLIGHT_COLUMNS: &str =
    "f.id, f.booking_id, f.account_info_id, f.flight_number, f.seat_number, f.status::text AS status, f.created_at";

pub struct FlightRepository;

impl FlightRepository {
    /// Flights under one booking, scoped to the owning account via the
    /// denormalized accounts_info join.
    pub async fn list_for_booking<'e>(
        executor: impl PgExecutor<'e>,
        account_id: i32,
        booking_id: i32,
    ) -> Result<Vec<Flight>, StoreError> {
        let rows = sqlx::query_as::<_, FlightRow>(&format!(
            r#"
            SELECT {FLIGHT_COLUMNS}
            FROM flights f
            JOIN accounts_info ai ON ai.id = f.account_info_id
            WHERE ai.account_id = $1 AND f.booking_id = $2
            ORDER BY f.id
            "#
        ))
        .bind(account_id)
        .bind(booking_id)
        .fetch_all(executor)
        .await?;

        rows.into_iter().map(Flight::try_from).collect()
    }

    /// Every flight owned by the account, across bookings.
    pub async fn list_for_account<'e>(
        executor: impl PgExecutor<'e>,
        account_id: i32,
    ) -> Result<Vec<Flight>, StoreError> {
        let rows = sqlx::query_as::<_, FlightRow>(&format!(
            r#"
            SELECT {FLIGHT_COLUMNS}
            FROM flights f
            JOIN accounts_info ai ON ai.id = f.account_info_id
            WHERE ai.account_id = $1
            ORDER BY f.id
            "#
        ))
        .bind(account_id)
        .fetch_all(executor)
        .await?;

        rows.into_iter().map(Flight::try_from).collect()
    }

    /// Same join-and-mask as bookings: not yours reads as not found.
    pub async fn find_for_booking<'e>(
        executor: impl PgExecutor<'e>,
        account_id: i32,
        booking_id: i32,
        flight_id: i32,
    ) -> Result<Option<Flight>, StoreError> {
        let row = sqlx::query_as::<_, FlightRow>(&format!(
            r#"
            SELECT {FLIGHT_COLUMNS}
            FROM flights f
            JOIN accounts_info ai ON ai.id = f.account_info_id
            WHERE ai.account_id = $1 AND f.booking_id = $2 AND f.id = $3
            "#
        ))
        .bind(account_id)
        .bind(booking_id)
        .bind(flight_id)
        .fetch_optional(executor)
        .await?;

        row.map(Flight::try_from).transpose()
    }

    /// Both foreign keys are derived from the resolved parent booking;
    /// the denormalized owner can never disagree with it.
    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        booking_id: i32,
        account_info_id: i32,
        flight: &FlightPut,
    ) -> Result<Flight, StoreError> {
        let row = sqlx::query_as::<_, FlightRow>(
            r#"
            INSERT INTO flights (booking_id, account_info_id, flight_number, seat_number, status)
            VALUES ($1, $2, $3, $4, $5::flight_status)
            RETURNING id, booking_id, account_info_id, flight_number, seat_number, status::text AS status, created_at
            "#,
        )
        .bind(booking_id)
        .bind(account_info_id)
        .bind(flight.flight_number.as_str())
        .bind(flight.seat_number.as_str())
        .bind(flight.status.as_str())
        .fetch_one(&mut **tx)
        .await?;

        row.try_into()
    }

    pub async fn update(
        tx: &mut Transaction<'_, Postgres>,
        flight: &Flight,
    ) -> Result<Flight, StoreError> {
        let row = sqlx::query_as::<_, FlightRow>(
            r#"
            UPDATE flights
            SET flight_number = $2, seat_number = $3, status = $4::flight_status
            WHERE id = $1
            RETURNING id, booking_id, account_info_id, flight_number, seat_number, status::text AS status, created_at
            "#,
        )
        .bind(flight.id)
        .bind(flight.flight_number.as_str())
        .bind(flight.seat_number.as_str())
        .bind(flight.status.as_str())
        .fetch_one(&mut **tx)
        .await?;

        row.try_into()
    }

    pub async fn delete(
        tx: &mut Transaction<'_, Postgres>,
        flight_id: i32,
    ) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM flights WHERE id = $1")
            .bind(flight_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}
