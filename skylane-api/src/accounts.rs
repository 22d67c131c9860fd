use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use skylane_core::account::{AccountPatch, AccountPut};
use skylane_core::password;
use skylane_store::AccountRepository;

use crate::auth::{ensure_owner, TokenClaims};
use crate::error::AppError;
use crate::state::AppState;
use crate::views::{self, AccountResponse};

/// Signup and the account listing need no token.
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/accounts", get(list_accounts).post(create_account))
}

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/accounts/{account_id}",
        get(get_account)
            .put(put_account)
            .patch(patch_account)
            .delete(delete_account),
    )
}

async fn list_accounts(
    State(state): State<AppState>,
) -> Result<Json<Vec<AccountResponse>>, AppError> {
    let accounts = AccountRepository::list(&state.db.pool).await?;

    let mut responses = Vec::with_capacity(accounts.len());
    for account in accounts {
        responses.push(views::account_response(&state.db.pool, account).await?);
    }

    Ok(Json(responses))
}

async fn create_account(
    State(state): State<AppState>,
    Json(payload): Json<AccountPut>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    let password_hash = password::hash(&payload.password)?;

    let mut tx = state.db.pool.begin().await?;
    let account = AccountRepository::create(&mut tx, &payload.email, &password_hash).await?;
    tx.commit().await?;

    tracing::info!(account_id = account.id, "account created");

    let response = views::account_response(&state.db.pool, account).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_account(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path(account_id): Path<i32>,
) -> Result<Json<AccountResponse>, AppError> {
    ensure_owner(account_id, &claims)?;

    let account = AccountRepository::find_by_id(&state.db.pool, account_id)
        .await?
        .ok_or_else(|| AppError::account_not_found(account_id))?;

    Ok(Json(views::account_response(&state.db.pool, account).await?))
}

/// Whole-resource replacement: both mutable fields are required and both
/// are overwritten. The password is re-hashed on every replace.
async fn put_account(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path(account_id): Path<i32>,
    Json(payload): Json<AccountPut>,
) -> Result<Json<AccountResponse>, AppError> {
    ensure_owner(account_id, &claims)?;

    let mut tx = state.db.pool.begin().await?;

    AccountRepository::find_by_id(&mut *tx, account_id)
        .await?
        .ok_or_else(|| AppError::account_not_found(account_id))?;

    let password_hash = password::hash(&payload.password)?;
    let account =
        AccountRepository::update(&mut tx, account_id, &payload.email, &password_hash).await?;

    tx.commit().await?;

    Ok(Json(views::account_response(&state.db.pool, account).await?))
}

/// Merge-patch: only supplied fields change; a supplied password goes
/// through the same one-way transform as signup.
async fn patch_account(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path(account_id): Path<i32>,
    Json(payload): Json<AccountPatch>,
) -> Result<Json<AccountResponse>, AppError> {
    ensure_owner(account_id, &claims)?;

    let mut tx = state.db.pool.begin().await?;

    let mut account = AccountRepository::find_by_id(&mut *tx, account_id)
        .await?
        .ok_or_else(|| AppError::account_not_found(account_id))?;

    let mut patch = payload.clone();
    if let Some(plaintext) = &payload.password {
        patch.password = Some(password::hash(plaintext)?);
    }
    patch.apply(&mut account);

    let account =
        AccountRepository::update(&mut tx, account_id, &account.email, &account.password).await?;

    tx.commit().await?;

    Ok(Json(views::account_response(&state.db.pool, account).await?))
}

/// Deleting the account cascades through its info, bookings and flights
/// via the declared foreign keys.
async fn delete_account(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path(account_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    ensure_owner(account_id, &claims)?;

    let mut tx = state.db.pool.begin().await?;

    AccountRepository::find_by_id(&mut *tx, account_id)
        .await?
        .ok_or_else(|| AppError::account_not_found(account_id))?;

    AccountRepository::delete(&mut tx, account_id).await?;

    tx.commit().await?;

    tracing::info!(account_id, "account deleted");

    Ok(StatusCode::NO_CONTENT)
}
