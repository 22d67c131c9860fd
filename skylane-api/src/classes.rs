use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use skylane_core::catalog::{ClassType, ClassTypePatch, ClassTypePut};
use skylane_store::ClassRepository;

use crate::error::AppError;
use crate::state::AppState;

// Global reference data, unauthenticated like airports.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/classes", get(list_classes).post(create_class))
        .route(
            "/classes/{class_id}",
            get(get_class)
                .put(put_class)
                .patch(patch_class)
                .delete(delete_class),
        )
}

async fn list_classes(State(state): State<AppState>) -> Result<Json<Vec<ClassType>>, AppError> {
    let classes = ClassRepository::list(&state.db.pool).await?;
    Ok(Json(classes))
}

/// Class kinds are unique table-wide; a duplicate kind is a validation
/// failure, not a second row.
async fn create_class(
    State(state): State<AppState>,
    Json(payload): Json<ClassTypePut>,
) -> Result<(StatusCode, Json<ClassType>), AppError> {
    let mut tx = state.db.pool.begin().await?;
    let class_type = ClassRepository::create(&mut tx, payload.kind).await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(class_type)))
}

async fn get_class(
    State(state): State<AppState>,
    Path(class_id): Path<i32>,
) -> Result<Json<ClassType>, AppError> {
    let class_type = ClassRepository::find_by_id(&state.db.pool, class_id)
        .await?
        .ok_or_else(|| AppError::class_not_found(class_id))?;

    Ok(Json(class_type))
}

async fn put_class(
    State(state): State<AppState>,
    Path(class_id): Path<i32>,
    Json(payload): Json<ClassTypePut>,
) -> Result<Json<ClassType>, AppError> {
    let mut tx = state.db.pool.begin().await?;

    ClassRepository::find_by_id(&mut *tx, class_id)
        .await?
        .ok_or_else(|| AppError::class_not_found(class_id))?;

    let class_type = ClassRepository::update(&mut tx, class_id, payload.kind).await?;

    tx.commit().await?;

    Ok(Json(class_type))
}

async fn patch_class(
    State(state): State<AppState>,
    Path(class_id): Path<i32>,
    Json(payload): Json<ClassTypePatch>,
) -> Result<Json<ClassType>, AppError> {
    let mut tx = state.db.pool.begin().await?;

    let mut class_type = ClassRepository::find_by_id(&mut *tx, class_id)
        .await?
        .ok_or_else(|| AppError::class_not_found(class_id))?;

    payload.apply(&mut class_type);

    let class_type = ClassRepository::update(&mut tx, class_id, class_type.kind).await?;

    tx.commit().await?;

    Ok(Json(class_type))
}

async fn delete_class(
    State(state): State<AppState>,
    Path(class_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let mut tx = state.db.pool.begin().await?;

    ClassRepository::find_by_id(&mut *tx, class_id)
        .await?
        .ok_or_else(|| AppError::class_not_found(class_id))?;

    ClassRepository::delete(&mut tx, class_id).await?;

    tx.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}
