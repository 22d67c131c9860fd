use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use skylane_core::account::{AccountInfoPatch, AccountInfoPut};
use skylane_store::{AccountRepository, InfoRepository};

use crate::auth::{ensure_owner, TokenClaims};
use crate::error::AppError;
use crate::state::AppState;
use crate::views::{self, AccountInfoResponse};

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/accounts/{account_id}/info",
        get(get_info)
            .post(create_info)
            .put(put_info)
            .patch(patch_info)
            .delete(delete_info),
    )
}

async fn get_info(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path(account_id): Path<i32>,
) -> Result<Json<AccountInfoResponse>, AppError> {
    ensure_owner(account_id, &claims)?;

    AccountRepository::find_by_id(&state.db.pool, account_id)
        .await?
        .ok_or_else(|| AppError::account_not_found(account_id))?;

    let info = InfoRepository::find_by_account(&state.db.pool, account_id)
        .await?
        .ok_or_else(AppError::info_not_found)?;

    Ok(Json(views::account_info_response(&state.db.pool, info).await?))
}

/// At most one info record per account; a second create trips the unique
/// constraint and surfaces as a validation failure.
async fn create_info(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path(account_id): Path<i32>,
    Json(payload): Json<AccountInfoPut>,
) -> Result<(StatusCode, Json<AccountInfoResponse>), AppError> {
    ensure_owner(account_id, &claims)?;

    let mut tx = state.db.pool.begin().await?;

    AccountRepository::find_by_id(&mut *tx, account_id)
        .await?
        .ok_or_else(|| AppError::account_not_found(account_id))?;

    let info =
        InfoRepository::create(&mut tx, account_id, &payload.first_name, &payload.last_name)
            .await?;

    tx.commit().await?;

    let response = views::account_info_response(&state.db.pool, info).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn put_info(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path(account_id): Path<i32>,
    Json(payload): Json<AccountInfoPut>,
) -> Result<Json<AccountInfoResponse>, AppError> {
    ensure_owner(account_id, &claims)?;

    let mut tx = state.db.pool.begin().await?;

    AccountRepository::find_by_id(&mut *tx, account_id)
        .await?
        .ok_or_else(|| AppError::account_not_found(account_id))?;

    InfoRepository::find_by_account(&mut *tx, account_id)
        .await?
        .ok_or_else(AppError::info_not_found)?;

    let info =
        InfoRepository::update(&mut tx, account_id, &payload.first_name, &payload.last_name)
            .await?;

    tx.commit().await?;

    Ok(Json(views::account_info_response(&state.db.pool, info).await?))
}

async fn patch_info(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path(account_id): Path<i32>,
    Json(payload): Json<AccountInfoPatch>,
) -> Result<Json<AccountInfoResponse>, AppError> {
    ensure_owner(account_id, &claims)?;

    let mut tx = state.db.pool.begin().await?;

    AccountRepository::find_by_id(&mut *tx, account_id)
        .await?
        .ok_or_else(|| AppError::account_not_found(account_id))?;

    let mut info = InfoRepository::find_by_account(&mut *tx, account_id)
        .await?
        .ok_or_else(AppError::info_not_found)?;

    payload.apply(&mut info);

    let info =
        InfoRepository::update(&mut tx, account_id, &info.first_name, &info.last_name).await?;

    tx.commit().await?;

    Ok(Json(views::account_info_response(&state.db.pool, info).await?))
}

/// Cascades to the account's bookings and flights.
async fn delete_info(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path(account_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    ensure_owner(account_id, &claims)?;

    let mut tx = state.db.pool.begin().await?;

    AccountRepository::find_by_id(&mut *tx, account_id)
        .await?
        .ok_or_else(|| AppError::account_not_found(account_id))?;

    InfoRepository::find_by_account(&mut *tx, account_id)
        .await?
        .ok_or_else(AppError::info_not_found)?;

    InfoRepository::delete(&mut tx, account_id).await?;

    tx.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}
