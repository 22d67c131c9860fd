//! Nested response assembly. Callers hand in the already-resolved entity;
//! related records are read back through the ownership-scoped repositories
//! so a response can never embed another account's rows.

use chrono::{DateTime, Utc};
use serde::Serialize;
use skylane_core::account::{Account, AccountInfo};
use skylane_core::booking::{Booking, Flight, FlightStatus};
use skylane_core::catalog::{Airport, ClassType};
use skylane_store::{
    AirportRepository, BookingRepository, ClassRepository, FlightRepository, InfoRepository,
};
use sqlx::PgPool;

use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct FlightNested {
    pub id: i32,
    pub flight_number: String,
    pub seat_number: String,
    pub status: FlightStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Flight> for FlightNested {
    fn from(flight: Flight) -> Self {
        FlightNested {
            id: flight.id,
            flight_number: flight.flight_number,
            seat_number: flight.seat_number,
            status: flight.status,
            created_at: flight.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookingNested {
    pub id: i32,
    pub departure_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&Booking> for BookingNested {
    fn from(booking: &Booking) -> Self {
        BookingNested {
            id: booking.id,
            departure_date: booking.departure_date,
            return_date: booking.return_date,
            created_at: booking.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FlightResponse {
    pub id: i32,
    pub flight_number: String,
    pub seat_number: String,
    pub status: FlightStatus,
    pub created_at: DateTime<Utc>,
    pub account_info_id: i32,
    pub booking: BookingNested,
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: i32,
    pub departure_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub account_info_id: i32,
    pub class_id: i32,
    pub from_id: i32,
    pub to_id: i32,
    pub class_type: Option<ClassType>,
    pub from_airport: Option<Airport>,
    pub to_airport: Option<Airport>,
    pub flights: Vec<FlightNested>,
}

#[derive(Debug, Serialize)]
pub struct AccountInfoResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub bookings: Vec<BookingResponse>,
    pub flights: Vec<FlightNested>,
}

#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: i32,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub account_info: Option<AccountInfoResponse>,
}

pub async fn flight_response(
    pool: &PgPool,
    account_id: i32,
    flight: Flight,
) -> Result<FlightResponse, AppError> {
    let booking = BookingRepository::find_for_account(pool, account_id, flight.booking_id)
        .await?
        .ok_or_else(|| AppError::booking_not_found(flight.booking_id))?;

    Ok(FlightResponse {
        id: flight.id,
        flight_number: flight.flight_number,
        seat_number: flight.seat_number,
        status: flight.status,
        created_at: flight.created_at,
        account_info_id: flight.account_info_id,
        booking: BookingNested::from(&booking),
    })
}

pub async fn booking_response(
    pool: &PgPool,
    account_id: i32,
    booking: Booking,
) -> Result<BookingResponse, AppError> {
    let class_type = ClassRepository::find_by_id(pool, booking.class_id).await?;
    let from_airport = AirportRepository::find_by_id(pool, booking.from_id).await?;
    let to_airport = AirportRepository::find_by_id(pool, booking.to_id).await?;
    let flights = FlightRepository::list_for_booking(pool, account_id, booking.id)
        .await?
        .into_iter()
        .map(FlightNested::from)
        .collect();

    Ok(BookingResponse {
        id: booking.id,
        departure_date: booking.departure_date,
        return_date: booking.return_date,
        created_at: booking.created_at,
        account_info_id: booking.account_info_id,
        class_id: booking.class_id,
        from_id: booking.from_id,
        to_id: booking.to_id,
        class_type,
        from_airport,
        to_airport,
        flights,
    })
}

pub async fn booking_responses(
    pool: &PgPool,
    account_id: i32,
    bookings: Vec<Booking>,
) -> Result<Vec<BookingResponse>, AppError> {
    let mut responses = Vec::with_capacity(bookings.len());
    for booking in bookings {
        responses.push(booking_response(pool, account_id, booking).await?);
    }
    Ok(responses)
}

pub async fn account_info_response(
    pool: &PgPool,
    info: AccountInfo,
) -> Result<AccountInfoResponse, AppError> {
    let bookings = BookingRepository::list_for_account(pool, info.account_id).await?;
    let bookings = booking_responses(pool, info.account_id, bookings).await?;
    let flights = FlightRepository::list_for_account(pool, info.account_id)
        .await?
        .into_iter()
        .map(FlightNested::from)
        .collect();

    Ok(AccountInfoResponse {
        id: info.id,
        first_name: info.first_name,
        last_name: info.last_name,
        created_at: info.created_at,
        bookings,
        flights,
    })
}

pub async fn account_response(
    pool: &PgPool,
    account: Account,
) -> Result<AccountResponse, AppError> {
    let info = InfoRepository::find_by_account(pool, account.id).await?;
    let account_info = match info {
        Some(info) => Some(account_info_response(pool, info).await?),
        None => None,
    };

    Ok(AccountResponse {
        id: account.id,
        email: account.email,
        created_at: account.created_at,
        account_info,
    })
}
