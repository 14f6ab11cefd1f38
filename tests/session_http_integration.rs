//! Integration tests for the session HTTP endpoints.
//!
//! Drives the full axum router with in-memory adapters:
//! 1. Identity comes from the `x-user-id` header
//! 2. Domain errors map to the documented status codes
//! 3. Response bodies carry counts and participant rows

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Duration, NaiveTime, Weekday};
use serde_json::{json, Value};
use tower::ServiceExt;

use badbuddy::adapters::events::InMemoryEventBus;
use badbuddy::adapters::http::middleware::USER_ID_HEADER;
use badbuddy::adapters::http::{api_router, SessionHandlers};
use badbuddy::adapters::memory::{InMemorySessionStore, InMemoryVenueDirectory};
use badbuddy::domain::foundation::{format_date, local_now, CourtId, UserId, VenueId};
use badbuddy::domain::session::ScheduleLimits;
use badbuddy::domain::venue::{OperatingDay, OperatingRange, Venue, VenueStatus};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

struct TestApp {
    router: Router,
    venue_id: VenueId,
    court: CourtId,
    events: Arc<InMemoryEventBus>,
}

async fn test_app() -> TestApp {
    let store = Arc::new(InMemorySessionStore::new());
    let venues = Arc::new(InMemoryVenueDirectory::new());
    let events = Arc::new(InMemoryEventBus::new());

    let venue = Venue {
        id: VenueId::new(),
        name: "Court Ten".to_string(),
        location: "Khon Kaen".to_string(),
        status: VenueStatus::Active,
        operating_ranges: [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]
        .iter()
        .map(|d| OperatingRange::new(OperatingDay::Weekday(*d), true, t(8, 0), t(22, 0)))
        .collect(),
    };
    let venue_id = venue.id;
    venues.insert(venue).await;

    let handlers = SessionHandlers::new(
        store.clone(),
        store,
        venues,
        events.clone(),
        ScheduleLimits::default(),
    );

    TestApp {
        router: api_router(handlers),
        venue_id,
        court: CourtId::new(),
        events,
    }
}

fn create_body(app: &TestApp, start: &str, end: &str, max: u32) -> Value {
    json!({
        "venue_id": app.venue_id.to_string(),
        "title": "Sunday social",
        "date": format_date(local_now().date() + Duration::days(7)),
        "start_time": start,
        "end_time": end,
        "player_level": "beginner",
        "max_participants": max,
        "court_ids": [app.court.to_string()],
    })
}

async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    user: Option<UserId>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(USER_ID_HEADER, user.to_string());
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn health_check_responds() {
    let app = test_app().await;
    let (status, _) = send(&app.router, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn create_requires_caller_identity() {
    let app = test_app().await;
    let body = create_body(&app, "18:00", "20:00", 4);

    let (status, _) = send(&app.router, "POST", "/api/sessions", None, Some(body)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_then_fetch_session_detail() {
    let app = test_app().await;
    let host = UserId::new();
    let body = create_body(&app, "18:00", "20:00", 4);

    let (status, created) =
        send(&app.router, "POST", "/api/sessions", Some(host), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "open");
    assert_eq!(created["confirmed_count"], 1);
    assert_eq!(created["host_id"], host.to_string());

    let id = created["id"].as_str().unwrap().to_string();
    let (status, detail) = send(&app.router, "GET", &format!("/api/sessions/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["participants"].as_array().unwrap().len(), 1);
    assert_eq!(detail["participants"][0]["status"], "confirmed");
    assert!(app.events.has_event("session.created.v1"));
}

#[tokio::test]
async fn outside_venue_hours_is_a_policy_error() {
    let app = test_app().await;
    let body = create_body(&app, "21:45", "22:30", 4);

    let (status, error) =
        send(&app.router, "POST", "/api/sessions", Some(UserId::new()), Some(body)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["code"], "OUTSIDE_VENUE_HOURS");
}

#[tokio::test]
async fn overlapping_create_is_rejected_as_court_booked() {
    let app = test_app().await;
    let first = create_body(&app, "18:00", "20:00", 4);
    let second = create_body(&app, "19:00", "21:00", 4);

    let (status, _) = send(&app.router, "POST", "/api/sessions", Some(UserId::new()), Some(first)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, error) =
        send(&app.router, "POST", "/api/sessions", Some(UserId::new()), Some(second)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["code"], "COURT_BOOKED");
}

#[tokio::test]
async fn malformed_time_is_a_bad_request() {
    let app = test_app().await;
    let body = create_body(&app, "6pm", "20:00", 4);

    let (status, error) =
        send(&app.router, "POST", "/api/sessions", Some(UserId::new()), Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn join_leave_and_cancel_over_http() {
    let app = test_app().await;
    let host = UserId::new();
    let player = UserId::new();
    let waiter = UserId::new();

    let (_, created) = send(
        &app.router,
        "POST",
        "/api/sessions",
        Some(host),
        Some(create_body(&app, "18:00", "20:00", 2)),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, joined) =
        send(&app.router, "POST", &format!("/api/sessions/{id}/join"), Some(player), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(joined["participant"]["status"], "confirmed");
    assert_eq!(joined["session_status"], "full");

    let (_, waiting) =
        send(&app.router, "POST", &format!("/api/sessions/{id}/join"), Some(waiter), None).await;
    assert_eq!(waiting["participant"]["status"], "pending");

    let (status, again) =
        send(&app.router, "POST", &format!("/api/sessions/{id}/join"), Some(player), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(again["code"], "ALREADY_JOINED");

    let (status, left) =
        send(&app.router, "POST", &format!("/api/sessions/{id}/leave"), Some(player), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(left["promoted_user_id"], waiter.to_string());

    let (status, _) =
        send(&app.router, "POST", &format!("/api/sessions/{id}/cancel"), Some(player), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, cancelled) =
        send(&app.router, "POST", &format!("/api/sessions/{id}/cancel"), Some(host), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");
    assert_eq!(cancelled["participants_cancelled"], 2);
}

#[tokio::test]
async fn list_and_mine_reflect_participation() {
    let app = test_app().await;
    let host = UserId::new();
    let player = UserId::new();

    let (_, created) = send(
        &app.router,
        "POST",
        "/api/sessions",
        Some(host),
        Some(create_body(&app, "09:00", "11:00", 6)),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();
    send(&app.router, "POST", &format!("/api/sessions/{id}/join"), Some(player), None).await;

    let (status, page) = send(
        &app.router,
        "GET",
        &format!("/api/sessions?venue_id={}&limit=10", app.venue_id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);
    assert_eq!(page["has_more"], false);
    assert_eq!(page["items"][0]["confirmed_count"], 2);

    let (status, mine) = send(&app.router, "GET", "/api/sessions/mine", Some(player), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let (_, other) =
        send(&app.router, "GET", "/api/sessions/mine", Some(UserId::new()), None).await;
    assert_eq!(other.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let app = test_app().await;
    let missing = badbuddy::domain::foundation::SessionId::new();

    let (status, error) =
        send(&app.router, "GET", &format!("/api/sessions/{missing}"), None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "SESSION_NOT_FOUND");
}
