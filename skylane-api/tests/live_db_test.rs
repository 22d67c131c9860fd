//! End-to-end scenarios against a live Postgres, exercising the
//! constraints the database itself enforces. Gated on DATABASE_URL:
//! without it every test returns early, so the default suite stays
//! self-contained.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use skylane_api::{
    app,
    state::{AppState, AuthConfig},
};
use skylane_store::DbClient;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

async fn live_state() -> Option<AppState> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let db = DbClient::new(&url, 5).await.expect("connect to Postgres");
    db.migrate().await.expect("run migrations");

    Some(AppState {
        db: Arc::new(db),
        auth: AuthConfig {
            secret: "live-db-test-secret".to_string(),
            token_minutes: 30,
        },
    })
}

/// Emails are unique table-wide, so each run mints fresh ones.
fn unique_email(tag: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{tag}-{nanos}@example.com")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(state: &AppState, request: Request<Body>) -> axum::response::Response {
    app(state.clone()).oneshot(request).await.unwrap()
}

async fn send_json(
    state: &AppState,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Value,
) -> axum::response::Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    send(state, builder.body(Body::from(body.to_string())).unwrap()).await
}

async fn get(state: &AppState, uri: &str, token: &str) -> axum::response::Response {
    send(
        state,
        Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

/// Signup, login and profile creation; returns (account_id, token).
async fn onboard_account(state: &AppState, tag: &str) -> (i64, String) {
    let email = unique_email(tag);

    let response = send_json(
        state,
        Method::POST,
        "/accounts",
        None,
        json!({"email": email, "password": "s3cret-pw"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let account_id = body_json(response).await["id"].as_i64().unwrap();

    let response = send(
        state,
        Request::builder()
            .method(Method::POST)
            .uri("/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!("username={email}&password=s3cret-pw")))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let token = body_json(response).await["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = send_json(
        state,
        Method::POST,
        &format!("/accounts/{account_id}/info"),
        Some(&token),
        json!({"first_name": "Live", "last_name": "Tester"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    (account_id, token)
}

async fn create_airport(state: &AppState, name: &str) -> i64 {
    let response = send_json(
        state,
        Method::POST,
        "/airports",
        None,
        json!({"name": name, "country": "Testland", "city": "Testville"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

/// Class kinds are unique table-wide, so reuse an existing economy row
/// when a previous run already created it.
async fn economy_class_id(state: &AppState) -> i64 {
    let response = send(
        state,
        Request::builder().uri("/classes").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let classes = body_json(response).await;
    if let Some(existing) = classes
        .as_array()
        .unwrap()
        .iter()
        .find(|class| class["type"] == "economy")
    {
        return existing["id"].as_i64().unwrap();
    }

    let response = send_json(state, Method::POST, "/classes", None, json!({"type": "economy"})).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

#[tokio::test]
async fn booking_with_equal_airports_is_rejected_and_not_persisted() {
    let Some(state) = live_state().await else { return };
    let (account_id, token) = onboard_account(&state, "same-airports").await;
    let airport_id = create_airport(&state, "Solo Field").await;
    let class_id = economy_class_id(&state).await;

    let response = send_json(
        &state,
        Method::POST,
        &format!("/accounts/{account_id}/bookings"),
        Some(&token),
        json!({
            "class_id": class_id,
            "from_id": airport_id,
            "to_id": airport_id,
            "departure_date": "2027-03-01T08:00:00Z",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["detail"],
        "Departure and destination airports must be different"
    );

    // The rejected insert left no row behind.
    let response = get(&state, &format!("/accounts/{account_id}/bookings"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn deleting_an_account_cascades_to_its_subtree() {
    let Some(state) = live_state().await else { return };
    let (account_id, token) = onboard_account(&state, "cascade").await;
    let from_id = create_airport(&state, "Cascade Origin").await;
    let to_id = create_airport(&state, "Cascade Destination").await;
    let class_id = economy_class_id(&state).await;

    let response = send_json(
        &state,
        Method::POST,
        &format!("/accounts/{account_id}/bookings"),
        Some(&token),
        json!({
            "class_id": class_id,
            "from_id": from_id,
            "to_id": to_id,
            "departure_date": "2027-04-01T09:00:00Z",
            "return_date": "2027-04-08T18:00:00Z",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let booking_id = body_json(response).await["id"].as_i64().unwrap();

    let response = send_json(
        &state,
        Method::POST,
        &format!("/accounts/{account_id}/bookings/{booking_id}/flights"),
        Some(&token),
        json!({"flight_number": "SK100", "seat_number": "12A", "status": "pending"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let flight_id = body_json(response).await["id"].as_i64().unwrap();

    let response = send(
        &state,
        Request::builder()
            .method(Method::DELETE)
            .uri(format!("/accounts/{account_id}"))
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The still-valid token now finds nothing anywhere in the subtree.
    for uri in [
        format!("/accounts/{account_id}/info"),
        format!("/accounts/{account_id}/bookings/{booking_id}"),
        format!("/accounts/{account_id}/bookings/{booking_id}/flights/{flight_id}"),
    ] {
        let response = get(&state, &uri, &token).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "GET {uri}");
    }

    // The rows themselves are gone, not just masked.
    for (table, id) in [("bookings", booking_id), ("flights", flight_id)] {
        let row = sqlx::query(&format!("SELECT id FROM {table} WHERE id = $1"))
            .bind(id as i32)
            .fetch_optional(&state.db.pool)
            .await
            .unwrap();
        assert!(row.is_none(), "{table} row {id} survived the cascade");
    }
    let row = sqlx::query("SELECT id FROM accounts_info WHERE account_id = $1")
        .bind(account_id as i32)
        .fetch_optional(&state.db.pool)
        .await
        .unwrap();
    assert!(row.is_none());
}
