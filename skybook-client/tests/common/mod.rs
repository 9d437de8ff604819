//! In-process stand-in for the booking backend and its OAuth server.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Form, Json, Router,
};
use chrono::{NaiveDate, TimeZone, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use skybook_client::{CustomerClient, FlightClient};
use skybook_shared::Flight;
use skybook_store::{MemoryCookieStore, SessionState};

pub const ALICE_ID: i64 = 7;

#[derive(Clone, Default)]
pub struct Backend {
    pub catalogue: Arc<Vec<Flight>>,
    pub bookings: Arc<Mutex<HashMap<i64, Vec<Flight>>>>,
    pub requests: Arc<Mutex<Vec<String>>>,
    pub granted_scopes: Arc<Mutex<Vec<String>>>,
}

impl Backend {
    fn log(&self, line: impl Into<String>) {
        self.requests.lock().unwrap().push(line.into());
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

pub fn flight(id: i64, from: &str, to: &str, start: u32, end: u32, available: bool) -> Flight {
    Flight {
        id,
        name: format!("SB-{}", id),
        price: 80.0 + id as f64,
        start_date: Utc.with_ymd_and_hms(2024, 7, start, 9, 30, 0).unwrap(),
        end_date: Some(Utc.with_ymd_and_hms(2024, 7, end, 18, 0, 0).unwrap()),
        start_location: from.to_string(),
        end_location: Some(to.to_string()),
        is_available: available,
    }
}

pub fn july(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, day).unwrap()
}

pub fn catalogue() -> Vec<Flight> {
    vec![
        flight(1, "Oslo", "Rome", 1, 5, true),
        flight(2, "Oslo", "Rome", 3, 9, false),
        flight(3, "Berlin", "Rome", 1, 5, true),
        flight(4, "Oslo", "Paris", 1, 5, true),
    ]
}

pub fn mint_token(sub: &str, id: i64) -> String {
    encode(
        &Header::default(),
        &json!({ "sub": sub, "id": id, "exp": 4_102_444_800_i64 }),
        &EncodingKey::from_secret(b"fake-auth-server"),
    )
    .unwrap()
}

fn is_authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .is_some_and(|h| h.starts_with("Bearer ") && h.len() > "Bearer ".len())
}

async fn list_flights(
    State(backend): State<Backend>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let mut keys: Vec<_> = params.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    keys.sort();
    backend.log(format!("GET /flights?{}", keys.join("&")));

    let only_available = params.get("filterUnavailable").map(String::as_str) == Some("true");
    let rows: Vec<Flight> = backend
        .catalogue
        .iter()
        .filter(|f| params.get("startLocation").map_or(true, |s| &f.start_location == s))
        .filter(|f| params.get("endLocation").map_or(true, |e| f.end_location.as_ref() == Some(e)))
        .filter(|f| {
            match (params.get("startDate"), params.get("endDate")) {
                (Some(s), Some(e)) => {
                    let s = NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
                    let e = NaiveDate::parse_from_str(e, "%Y-%m-%d").unwrap();
                    f.matches_timeframe(s, e)
                }
                _ => true,
            }
        })
        .filter(|f| !only_available || f.is_available)
        .cloned()
        .collect();

    if rows.is_empty() {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "Flights not found" }))).into_response();
    }
    Json(rows).into_response()
}

async fn create_flight(State(backend): State<Backend>, headers: HeaderMap, Json(body): Json<serde_json::Value>) -> impl IntoResponse {
    backend.log("POST /flights");
    if !is_authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let mut created = body;
    created["id"] = json!(99);
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn delete_flight(State(backend): State<Backend>, headers: HeaderMap, Path(id): Path<i64>) -> StatusCode {
    backend.log(format!("DELETE /flights/{}", id));
    if !is_authorized(&headers) {
        return StatusCode::UNAUTHORIZED;
    }
    if backend.catalogue.iter().any(|f| f.id == id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn customer_role(State(backend): State<Backend>, Path(login): Path<String>) -> impl IntoResponse {
    backend.log(format!("GET /customers/role/{}", login));
    match login.as_str() {
        "alice" => Json(json!({ "role": "USER" })).into_response(),
        "root" => Json(json!({ "role": "ADMIN" })).into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn create_customer(State(backend): State<Backend>, Json(body): Json<serde_json::Value>) -> impl IntoResponse {
    backend.log("POST /customers");
    if body["username"] == "taken" {
        return (StatusCode::CONFLICT, "Username already exists").into_response();
    }
    (
        StatusCode::CREATED,
        Json(json!({
            "id": 11,
            "username": body["username"],
            "password": "$2a$10$hash",
            "role": "USER",
            "bookedFlights": []
        })),
    )
        .into_response()
}

async fn get_customer(State(backend): State<Backend>, headers: HeaderMap, Path(id): Path<i64>) -> impl IntoResponse {
    backend.log(format!("GET /customers/{}", id));
    if !is_authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if id != ALICE_ID {
        return StatusCode::NOT_FOUND.into_response();
    }
    let booked = backend.bookings.lock().unwrap().get(&id).cloned().unwrap_or_default();
    Json(json!({ "id": id, "username": "alice", "role": "USER", "bookedFlights": booked })).into_response()
}

async fn edit_customer(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    backend.log(format!("PATCH /customers/{}", id));
    if !is_authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if id != ALICE_ID {
        return StatusCode::NOT_FOUND.into_response();
    }
    if body["password"].as_str().unwrap_or_default().is_empty() {
        return StatusCode::BAD_REQUEST.into_response();
    }
    Json(json!({ "id": id, "username": body["username"], "role": "USER", "bookedFlights": [] })).into_response()
}

async fn delete_customer(State(backend): State<Backend>, headers: HeaderMap, Path(id): Path<i64>) -> StatusCode {
    backend.log(format!("DELETE /customers/{}", id));
    if !is_authorized(&headers) {
        return StatusCode::UNAUTHORIZED;
    }
    backend.bookings.lock().unwrap().remove(&id);
    StatusCode::NO_CONTENT
}

async fn get_bookings(State(backend): State<Backend>, headers: HeaderMap, Path(id): Path<i64>) -> impl IntoResponse {
    backend.log(format!("GET /customers/{}/bookings", id));
    if !is_authorized(&headers) {
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
    backend.log(format!("POST /customers/{}/bookings", id));
    if !is_authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let flight_id = body["flightId"].as_i64().unwrap_or_default();
    let Some(flight) = backend.catalogue.iter().find(|f| f.id == flight_id).cloned() else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let mut bookings = backend.bookings.lock().unwrap();
    let booked = bookings.entry(id).or_default();
    booked.push(flight);
    (StatusCode::CREATED, Json(json!({ "bookedFlights": booked.clone() }))).into_response()
}

async fn remove_booking(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path((id, flight_id)): Path<(i64, i64)>,
) -> impl IntoResponse {
    backend.log(format!("DELETE /customers/{}/bookings/{}", id, flight_id));
    if !is_authorized(&headers) {
        return StatusCode::UNAUTHORIZED;
    }
    let mut bookings = backend.bookings.lock().unwrap();
    match bookings.get_mut(&id) {
        Some(booked) if booked.iter().any(|f| f.id == flight_id) => {
            booked.retain(|f| f.id != flight_id);
            StatusCode::OK
        }
        _ => StatusCode::NOT_FOUND,
    }
}

async fn issue_token(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    backend.log("POST /oauth2/token");
    let basic = headers.get("authorization").and_then(|h| h.to_str().ok()).unwrap_or_default();
    // base64("alice:secret") and base64("root:secret")
    let subject = match basic {
        "Basic YWxpY2U6c2VjcmV0" => ("alice", ALICE_ID),
        "Basic cm9vdDpzZWNyZXQ=" => ("root", 1),
        _ => return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "invalid_client" }))).into_response(),
    };
    if form.get("grant_type").map(String::as_str) != Some("client_credentials") {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "unsupported_grant_type" }))).into_response();
    }
    let scope = form.get("scope").cloned().unwrap_or_default();
    backend.granted_scopes.lock().unwrap().push(scope.clone());

    Json(json!({
        "access_token": mint_token(subject.0, subject.1),
        "scope": scope,
        "token_type": "Bearer",
        "expires_in": 299
    }))
    .into_response()
}

pub fn router(backend: Backend) -> Router {
    Router::new()
        .route("/v1/api/flights", get(list_flights).post(create_flight))
        .route("/v1/api/flights/{id}", delete(delete_flight))
        .route("/v1/api/customers", post(create_customer))
        .route("/v1/api/customers/role/{login}", get(customer_role))
        .route("/v1/api/customers/{id}", get(get_customer).patch(edit_customer).delete(delete_customer))
        .route("/v1/api/customers/{id}/bookings", get(get_bookings).post(add_booking))
        .route("/v1/api/customers/{id}/bookings/{flight_id}", delete(remove_booking))
        .route("/oauth2/token", post(issue_token))
        .with_state(backend)
}

pub async fn spawn_backend(backend: Backend) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(backend)).await.unwrap();
    });
    addr
}

pub struct Harness {
    pub backend: Backend,
    pub session: Arc<SessionState>,
    pub flights: FlightClient,
    pub customers: CustomerClient,
}

pub async fn harness() -> Harness {
    let backend = Backend {
        catalogue: Arc::new(catalogue()),
        ..Backend::default()
    };
    let addr = spawn_backend(backend.clone()).await;
    let session = Arc::new(SessionState::new(Arc::new(MemoryCookieStore::new())));
    let http = skybook_client::http_client(std::time::Duration::from_secs(5)).unwrap();

    Harness {
        flights: FlightClient::new(http.clone(), format!("http://{}/v1/api/flights", addr), session.clone()),
        customers: CustomerClient::new(
            http,
            format!("http://{}/v1/api/customers", addr),
            format!("http://{}/oauth2/token", addr),
            session.clone(),
        ),
        backend,
        session,
    }
}
