use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use skylane_core::booking::{FlightPatch, FlightPut};
use skylane_store::{AccountRepository, BookingRepository, FlightRepository, InfoRepository};

use crate::auth::{ensure_owner, TokenClaims};
use crate::error::AppError;
use crate::state::AppState;
use crate::views::{self, FlightResponse};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/accounts/{account_id}/bookings/{booking_id}/flights",
            get(list_flights).post(create_flight),
        )
        .route(
            "/accounts/{account_id}/bookings/{booking_id}/flights/{flight_id}",
            get(get_flight)
                .put(put_flight)
                .patch(patch_flight)
                .delete(delete_flight),
        )
}

async fn list_flights(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path((account_id, booking_id)): Path<(i32, i32)>,
) -> Result<Json<Vec<FlightResponse>>, AppError> {
    ensure_owner(account_id, &claims)?;

    AccountRepository::find_by_id(&state.db.pool, account_id)
        .await?
        .ok_or_else(|| AppError::account_not_found(account_id))?;

    BookingRepository::find_for_account(&state.db.pool, account_id, booking_id)
        .await?
        .ok_or_else(|| AppError::booking_not_found(booking_id))?;

    let flights =
        FlightRepository::list_for_booking(&state.db.pool, account_id, booking_id).await?;

    let mut responses = Vec::with_capacity(flights.len());
    for flight in flights {
        responses.push(views::flight_response(&state.db.pool, account_id, flight).await?);
    }

    Ok(Json(responses))
}

/// Both booking_id and the denormalized account_info_id come from the
/// resolved parent booking, so the stored owner can never drift from it.
async fn create_flight(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path((account_id, booking_id)): Path<(i32, i32)>,
    Json(payload): Json<FlightPut>,
) -> Result<(StatusCode, Json<FlightResponse>), AppError> {
    ensure_owner(account_id, &claims)?;

    let mut tx = state.db.pool.begin().await?;

    AccountRepository::find_by_id(&mut *tx, account_id)
        .await?
        .ok_or_else(|| AppError::account_not_found(account_id))?;

    InfoRepository::find_by_account(&mut *tx, account_id)
        .await?
        .ok_or_else(AppError::info_not_found)?;

    let booking = BookingRepository::find_for_account(&mut *tx, account_id, booking_id)
        .await?
        .ok_or_else(|| AppError::booking_not_found(booking_id))?;

    let flight =
        FlightRepository::create(&mut tx, booking.id, booking.account_info_id, &payload).await?;

    tx.commit().await?;

    tracing::info!(flight_id = flight.id, booking_id, "flight created");

    let response = views::flight_response(&state.db.pool, account_id, flight).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_flight(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path((account_id, booking_id, flight_id)): Path<(i32, i32, i32)>,
) -> Result<Json<FlightResponse>, AppError> {
    ensure_owner(account_id, &claims)?;

    AccountRepository::find_by_id(&state.db.pool, account_id)
        .await?
        .ok_or_else(|| AppError::account_not_found(account_id))?;

    BookingRepository::find_for_account(&state.db.pool, account_id, booking_id)
        .await?
        .ok_or_else(|| AppError::booking_not_found(booking_id))?;

    let flight =
        FlightRepository::find_for_booking(&state.db.pool, account_id, booking_id, flight_id)
            .await?
            .ok_or_else(|| AppError::flight_not_found(flight_id))?;

    Ok(Json(
        views::flight_response(&state.db.pool, account_id, flight).await?,
    ))
}

async fn put_flight(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path((account_id, booking_id, flight_id)): Path<(i32, i32, i32)>,
    Json(payload): Json<FlightPut>,
) -> Result<Json<FlightResponse>, AppError> {
    ensure_owner(account_id, &claims)?;

    let mut tx = state.db.pool.begin().await?;

    AccountRepository::find_by_id(&mut *tx, account_id)
        .await?
        .ok_or_else(|| AppError::account_not_found(account_id))?;

    BookingRepository::find_for_account(&mut *tx, account_id, booking_id)
        .await?
        .ok_or_else(|| AppError::booking_not_found(booking_id))?;

    let mut flight =
        FlightRepository::find_for_booking(&mut *tx, account_id, booking_id, flight_id)
            .await?
            .ok_or_else(|| AppError::flight_not_found(flight_id))?;

    flight.flight_number = payload.flight_number;
    flight.seat_number = payload.seat_number;
    flight.status = payload.status;

    let flight = FlightRepository::update(&mut tx, &flight).await?;

    tx.commit().await?;

    Ok(Json(
        views::flight_response(&state.db.pool, account_id, flight).await?,
    ))
}

async fn patch_flight(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path((account_id, booking_id, flight_id)): Path<(i32, i32, i32)>,
    Json(payload): Json<FlightPatch>,
) -> Result<Json<FlightResponse>, AppError> {
    ensure_owner(account_id, &claims)?;

    let mut tx = state.db.pool.begin().await?;

    AccountRepository::find_by_id(&mut *tx, account_id)
        .await?
        .ok_or_else(|| AppError::account_not_found(account_id))?;

    BookingRepository::find_for_account(&mut *tx, account_id, booking_id)
        .await?
        .ok_or_else(|| AppError::booking_not_found(booking_id))?;

    let mut flight =
        FlightRepository::find_for_booking(&mut *tx, account_id, booking_id, flight_id)
            .await?
            .ok_or_else(|| AppError::flight_not_found(flight_id))?;

    payload.apply(&mut flight);

    let flight = FlightRepository::update(&mut tx, &flight).await?;

    tx.commit().await?;

    Ok(Json(
        views::flight_response(&state.db.pool, account_id, flight).await?,
    ))
}

async fn delete_flight(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path((account_id, booking_id, flight_id)): Path<(i32, i32, i32)>,
) -> Result<StatusCode, AppError> {
    ensure_owner(account_id, &claims)?;

    let mut tx = state.db.pool.begin().await?;

    AccountRepository::find_by_id(&mut *tx, account_id)
        .await?
        .ok_or_else(|| AppError::account_not_found(account_id))?;

    BookingRepository::find_for_account(&mut *tx, account_id, booking_id)
        .await?
        .ok_or_else(|| AppError::booking_not_found(booking_id))?;

    FlightRepository::find_for_booking(&mut *tx, account_id, booking_id, flight_id)
        .await?
        .ok_or_else(|| AppError::flight_not_found(flight_id))?;

    FlightRepository::delete(&mut tx, flight_id).await?;

    tx.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}
