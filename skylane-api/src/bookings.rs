use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use skylane_core::booking::{BookingPatch, BookingPut};
use skylane_store::{AccountRepository, BookingRepository, InfoRepository};

use crate::auth::{ensure_owner, TokenClaims};
use crate::error::AppError;
use crate::state::AppState;
use crate::views::{self, BookingResponse};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/accounts/{account_id}/bookings",
            get(list_bookings).post(create_booking),
        )
        .route(
            "/accounts/{account_id}/bookings/{booking_id}",
            get(get_booking)
                .put(put_booking)
                .patch(patch_booking)
                .delete(delete_booking),
        )
}

async fn list_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path(account_id): Path<i32>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    ensure_owner(account_id, &claims)?;

    AccountRepository::find_by_id(&state.db.pool, account_id)
        .await?
        .ok_or_else(|| AppError::account_not_found(account_id))?;

    let bookings = BookingRepository::list_for_account(&state.db.pool, account_id).await?;
    let responses = views::booking_responses(&state.db.pool, account_id, bookings).await?;

    Ok(Json(responses))
}

/// The owning account_info_id is derived from the resolved ancestor chain,
/// never read from the body. An equal origin/destination pair fails the
/// check constraint and nothing is persisted.
async fn create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path(account_id): Path<i32>,
    Json(payload): Json<BookingPut>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    ensure_owner(account_id, &claims)?;

    let mut tx = state.db.pool.begin().await?;

    AccountRepository::find_by_id(&mut *tx, account_id)
        .await?
        .ok_or_else(|| AppError::account_not_found(account_id))?;

    let info = InfoRepository::find_by_account(&mut *tx, account_id)
        .await?
        .ok_or_else(AppError::info_not_found)?;

    let booking = BookingRepository::create(&mut tx, info.id, &payload).await?;

    tx.commit().await?;

    tracing::info!(booking_id = booking.id, account_id, "booking created");

    let response = views::booking_response(&state.db.pool, account_id, booking).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path((account_id, booking_id)): Path<(i32, i32)>,
) -> Result<Json<BookingResponse>, AppError> {
    ensure_owner(account_id, &claims)?;

    AccountRepository::find_by_id(&state.db.pool, account_id)
        .await?
        .ok_or_else(|| AppError::account_not_found(account_id))?;

    let booking = BookingRepository::find_for_account(&state.db.pool, account_id, booking_id)
        .await?
        .ok_or_else(|| AppError::booking_not_found(booking_id))?;

    Ok(Json(
        views::booking_response(&state.db.pool, account_id, booking).await?,
    ))
}

async fn put_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path((account_id, booking_id)): Path<(i32, i32)>,
    Json(payload): Json<BookingPut>,
) -> Result<Json<BookingResponse>, AppError> {
    ensure_owner(account_id, &claims)?;

    let mut tx = state.db.pool.begin().await?;

    AccountRepository::find_by_id(&mut *tx, account_id)
        .await?
        .ok_or_else(|| AppError::account_not_found(account_id))?;

    let mut booking = BookingRepository::find_for_account(&mut *tx, account_id, booking_id)
        .await?
        .ok_or_else(|| AppError::booking_not_found(booking_id))?;

    // Replace semantics: every mutable field is overwritten, including an
    // omitted return_date, which clears it.
    booking.class_id = payload.class_id;
    booking.from_id = payload.from_id;
    booking.to_id = payload.to_id;
    booking.departure_date = payload.departure_date;
    booking.return_date = payload.return_date;

    let booking = BookingRepository::update(&mut tx, &booking).await?;

    tx.commit().await?;

    Ok(Json(
        views::booking_response(&state.db.pool, account_id, booking).await?,
    ))
}

async fn patch_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path((account_id, booking_id)): Path<(i32, i32)>,
    Json(payload): Json<BookingPatch>,
) -> Result<Json<BookingResponse>, AppError> {
    ensure_owner(account_id, &claims)?;

    let mut tx = state.db.pool.begin().await?;

    AccountRepository::find_by_id(&mut *tx, account_id)
        .await?
        .ok_or_else(|| AppError::account_not_found(account_id))?;

    let mut booking = BookingRepository::find_for_account(&mut *tx, account_id, booking_id)
        .await?
        .ok_or_else(|| AppError::booking_not_found(booking_id))?;

    payload.apply(&mut booking);

    let booking = BookingRepository::update(&mut tx, &booking).await?;

    tx.commit().await?;

    Ok(Json(
        views::booking_response(&state.db.pool, account_id, booking).await?,
    ))
}

async fn delete_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path((account_id, booking_id)): Path<(i32, i32)>,
) -> Result<StatusCode, AppError> {
    ensure_owner(account_id, &claims)?;

    let mut tx = state.db.pool.begin().await?;

    AccountRepository::find_by_id(&mut *tx, account_id)
        .await?
        .ok_or_else(|| AppError::account_not_found(account_id))?;

    BookingRepository::find_for_account(&mut *tx, account_id, booking_id)
        .await?
        .ok_or_else(|| AppError::booking_not_found(booking_id))?;

    BookingRepository::delete(&mut tx, booking_id).await?;

    tx.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}
