use axum::{http::Method, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod accounts;
pub mod airports;
pub mod auth;
pub mod bookings;
pub mod classes;
pub mod error;
pub mod flights;
pub mod info;
pub mod middleware;
pub mod state;
pub mod views;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    // Everything nested under an account id requires a verified token;
    // the ownership guard inside each handler does the rest.
    let protected = Router::new()
        .merge(accounts::routes())
        .merge(info::routes())
        .merge(bookings::routes())
        .merge(flights::routes())
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(auth::routes())
        .merge(accounts::public_routes())
        .merge(airports::routes())
        .merge(classes::routes())
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
