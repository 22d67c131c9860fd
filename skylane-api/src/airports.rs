use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use skylane_core::catalog::{Airport, AirportPatch, AirportPut};
use skylane_store::AirportRepository;

use crate::error::AppError;
use crate::state::AppState;

// Global reference data: no authentication on any verb, preserved from
// the observed design. Candidate for an admin gate; see DESIGN.md.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/airports", get(list_airports).post(create_airport))
        .route(
            "/airports/{airport_id}",
            get(get_airport)
                .put(put_airport)
                .patch(patch_airport)
                .delete(delete_airport),
        )
}

async fn list_airports(State(state): State<AppState>) -> Result<Json<Vec<Airport>>, AppError> {
    let airports = AirportRepository::list(&state.db.pool).await?;
    Ok(Json(airports))
}

async fn create_airport(
    State(state): State<AppState>,
    Json(payload): Json<AirportPut>,
) -> Result<(StatusCode, Json<Airport>), AppError> {
    let mut tx = state.db.pool.begin().await?;
    let airport =
        AirportRepository::create(&mut tx, &payload.name, &payload.country, &payload.city).await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(airport)))
}

async fn get_airport(
    State(state): State<AppState>,
    Path(airport_id): Path<i32>,
) -> Result<Json<Airport>, AppError> {
    let airport = AirportRepository::find_by_id(&state.db.pool, airport_id)
        .await?
        .ok_or_else(|| AppError::airport_not_found(airport_id))?;

    Ok(Json(airport))
}

async fn put_airport(
    State(state): State<AppState>,
    Path(airport_id): Path<i32>,
    Json(payload): Json<AirportPut>,
) -> Result<Json<Airport>, AppError> {
    let mut tx = state.db.pool.begin().await?;

    let mut airport = AirportRepository::find_by_id(&mut *tx, airport_id)
        .await?
        .ok_or_else(|| AppError::airport_not_found(airport_id))?;

    airport.name = payload.name;
    airport.country = payload.country;
    airport.city = payload.city;

    let airport = AirportRepository::update(&mut tx, &airport).await?;

    tx.commit().await?;

    Ok(Json(airport))
}

async fn patch_airport(
    State(state): State<AppState>,
    Path(airport_id): Path<i32>,
    Json(payload): Json<AirportPatch>,
) -> Result<Json<Airport>, AppError> {
    let mut tx = state.db.pool.begin().await?;

    let mut airport = AirportRepository::find_by_id(&mut *tx, airport_id)
        .await?
        .ok_or_else(|| AppError::airport_not_found(airport_id))?;

    payload.apply(&mut airport);

    let airport = AirportRepository::update(&mut tx, &airport).await?;

    tx.commit().await?;

    Ok(Json(airport))
}

async fn delete_airport(
    State(state): State<AppState>,
    Path(airport_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let mut tx = state.db.pool.begin().await?;

    AirportRepository::find_by_id(&mut *tx, airport_id)
        .await?
        .ok_or_else(|| AppError::airport_not_found(airport_id))?;

    AirportRepository::delete(&mut tx, airport_id).await?;

    tx.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}
