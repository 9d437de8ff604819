//! Minimal booking backend for driving the screens end to end.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{TimeZone, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use skybook_app::AppState;
use skybook_shared::Flight;
use skybook_store::app_config::{ApiConfig, Config, HttpConfig, OAuthConfig, SessionConfig};
use skybook_store::{CookieStore, MemoryCookieStore};

pub const ALICE_ID: i64 = 7;

#[derive(Clone, Default)]
pub struct Backend {
    catalogue: Arc<Vec<Flight>>,
    bookings: Arc<Mutex<HashMap<i64, Vec<Flight>>>>,
}

pub fn flight(id: i64, from: &str, to: &str, available: bool) -> Flight {
    Flight {
        id,
        name: format!("SB-{}", id),
        price: 100.0,
        start_date: Utc.with_ymd_and_hms(2024, 7, 2, 8, 0, 0).unwrap(),
        end_date: Some(Utc.with_ymd_and_hms(2024, 7, 2, 11, 0, 0).unwrap()),
        start_location: from.to_string(),
        end_location: Some(to.to_string()),
        is_available: available,
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .is_some_and(|h| h.starts_with("Bearer "))
}

async fn list_flights(
    State(backend): State<Backend>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let only_available = params.get("filterUnavailable").map(String::as_str) == Some("true");
    let rows: Vec<Flight> = backend
        .catalogue
        .iter()
        .filter(|f| params.get("startLocation").map_or(true, |s| &f.start_location == s))
        .filter(|f| params.get("endLocation").map_or(true, |e| f.end_location.as_ref() == Some(e)))
        .filter(|f| !only_available || f.is_available)
        .cloned()
        .collect();
    if rows.is_empty() {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(rows).into_response()
}

async fn customer_role(Path(login): Path<String>) -> impl IntoResponse {
    match login.as_str() {
        "alice" => Json(json!({ "role": "USER" })).into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn create_customer(Json(body): Json<serde_json::Value>) -> impl IntoResponse {
    if body["username"] == "alice" {
        return (StatusCode::CONFLICT, "Username already exists").into_response();
    }
    (
        StatusCode::CREATED,
        Json(json!({ "id": 12, "username": body["username"], "role": "USER", "bookedFlights": [] })),
    )
        .into_response()
}

async fn get_bookings(State(backend): State<Backend>, headers: HeaderMap, Path(id): Path<i64>) -> impl IntoResponse {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let booked = backend.bookings.lock().unwrap().get(&id).cloned().unwrap_or_default();
    Json(json!({ "bookedFlights": booked })).into_response()
}

async fn add_booking(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let flight_id = body["flightId"].as_i64().unwrap_or_default();
    let Some(flight) = backend.catalogue.iter().find(|f| f.id == flight_id && f.is_available).cloned() else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let mut bookings = backend.bookings.lock().unwrap();
    let booked = bookings.entry(id).or_default();
    booked.push(flight);
    Json(json!({ "bookedFlights": booked.clone() })).into_response()
}

async fn remove_booking(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path((id, flight_id)): Path<(i64, i64)>,
) -> StatusCode {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED;
    }
    if let Some(booked) = backend.bookings.lock().unwrap().get_mut(&id) {
        booked.retain(|f| f.id != flight_id);
    }
    StatusCode::OK
}

async fn issue_token(headers: HeaderMap) -> impl IntoResponse {
    // base64("alice:secret")
    if headers.get("authorization").and_then(|h| h.to_str().ok()) != Some("Basic YWxpY2U6c2VjcmV0") {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let token = encode(
        &Header::default(),
        &json!({ "sub": "alice", "id": ALICE_ID, "exp": 4_102_444_800_i64 }),
        &EncodingKey::from_secret(b"fake-auth-server"),
    )
    .unwrap();
    Json(json!({ "access_token": token, "scope": "user.read", "expires_in": 299 })).into_response()
}

pub async fn spawn_backend() -> String {
    let backend = Backend {
        catalogue: Arc::new(vec![
            flight(1, "Oslo", "Rome", true),
            flight(2, "Oslo", "Rome", false),
            flight(3, "Berlin", "Rome", true),
        ]),
        ..Backend::default()
    };
    let app = Router::new()
        .route("/v1/api/flights", get(list_flights))
        .route("/v1/api/customers", post(create_customer))
        .route("/v1/api/customers/role/{login}", get(customer_role))
        .route("/v1/api/customers/{id}/bookings", get(get_bookings).post(add_booking))
        .route("/v1/api/customers/{id}/bookings/{flight_id}", delete(remove_booking))
        .route("/oauth2/token", post(issue_token))
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

pub fn config(base: &str, cookie_file: PathBuf) -> Config {
    Config {
        api: ApiConfig {
            base_url: format!("{}/v1/api", base),
            flights_path: "flights".to_string(),
            customers_path: "customers".to_string(),
        },
        oauth: OAuthConfig { token_url: format!("{}/oauth2/token", base) },
        session: SessionConfig { cookie_file, poll_interval_seconds: 100 },
        http: HttpConfig { timeout_seconds: 5 },
    }
}

/// App state over an in-memory cookie jar.
pub async fn app() -> AppState {
    let base = spawn_backend().await;
    let cookies: Arc<dyn CookieStore> = Arc::new(MemoryCookieStore::new());
    AppState::with_cookies(&config(&base, PathBuf::from("unused.json")), cookies).unwrap()
}
