use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use motorpool::clock::SystemClock;
use motorpool::engine::{Engine, ReservationPolicy, ReservationStore, ResourceStore};
use motorpool::http;

const H: i64 = 3_600_000;
const M: i64 = 60_000;

// ── Test infrastructure ──────────────────────────────────────

async fn start_test_server() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let engine = Arc::new(Engine::new(
        Arc::new(ResourceStore::new()),
        Arc::new(ReservationStore::new()),
        ReservationPolicy::default(),
        Arc::new(SystemClock),
    ));

    tokio::spawn(async move {
        axum::serve(listener, http::router(engine)).await.unwrap();
    });

    addr
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as i64
}

async fn create_resource(
    client: &reqwest::Client,
    addr: SocketAddr,
    make: &str,
    model: &str,
) -> String {
    let res = client
        .post(format!("http://{addr}/api/v1/resources"))
        .json(&serde_json::json!({ "make": make, "model": model }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);
    let body: serde_json::Value = res.json().await.unwrap();
    body["resourceId"].as_str().unwrap().to_string()
}

async fn reserve(
    client: &reqwest::Client,
    addr: SocketAddr,
    start: i64,
    duration_minutes: i64,
) -> (u16, serde_json::Value) {
    let res = client
        .post(format!("http://{addr}/api/v1/reservations"))
        .json(&serde_json::json!({ "start": start, "durationMinutes": duration_minutes }))
        .send()
        .await
        .unwrap();
    let status = res.status().as_u16();
    let body: serde_json::Value = res.json().await.unwrap();
    (status, body)
}

// ── Tests ────────────────────────────────────────────────────

#[tokio::test]
async fn healthz_responds() {
    let addr = start_test_server().await;
    let res = reqwest::get(format!("http://{addr}/healthz")).await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn resource_crud_flow() {
    let addr = start_test_server().await;
    let client = reqwest::Client::new();

    // Create
    let id = create_resource(&client, addr, "Tesla", "Model 3").await;
    assert_eq!(id, "R1");

    // List
    let res = reqwest::get(format!("http://{addr}/api/v1/resources")).await.unwrap();
    assert_eq!(res.status(), 200);
    let list: serde_json::Value = res.json().await.unwrap();
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["make"], "Tesla");

    // Get by id
    let res = reqwest::get(format!("http://{addr}/api/v1/resources/R1")).await.unwrap();
    assert_eq!(res.status(), 200);
    let fetched: serde_json::Value = res.json().await.unwrap();
    assert_eq!(fetched["id"], "R1");

    // Update
    let res = client
        .put(format!("http://{addr}/api/v1/resources/R1"))
        .json(&serde_json::json!({ "make": "Honda", "model": "Civic" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 202);
    let updated: serde_json::Value = res.json().await.unwrap();
    assert_eq!(updated["id"], "R1");
    assert_eq!(updated["make"], "Honda");

    // Delete
    let res = client
        .delete(format!("http://{addr}/api/v1/resources/R1"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 204);

    // Gone now
    let res = reqwest::get(format!("http://{addr}/api/v1/resources/R1")).await.unwrap();
    assert_eq!(res.status(), 404);
}

#[tokio::test]
async fn unknown_resource_operations_are_404() {
    let addr = start_test_server().await;
    let client = reqwest::Client::new();

    let res = client
        .put(format!("http://{addr}/api/v1/resources/R42"))
        .json(&serde_json::json!({ "make": "Ford", "model": "Focus" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);

    let res = client
        .delete(format!("http://{addr}/api/v1/resources/R42"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
}

#[tokio::test]
async fn resource_validation_returns_422_with_all_errors() {
    let addr = start_test_server().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("http://{addr}/api/v1/resources"))
        .json(&serde_json::json!({ "make": "", "model": "X" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 422);
    let errors: serde_json::Value = res.json().await.unwrap();
    assert_eq!(errors.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn reserve_happy_path() {
    let addr = start_test_server().await;
    let client = reqwest::Client::new();

    create_resource(&client, addr, "Tesla", "Model 3").await;

    let (status, body) = reserve(&client, addr, now_ms() + H, 60).await;
    assert_eq!(status, 200);
    assert_eq!(body["resourceId"], "R1");
    assert!(body["reservationId"].is_string());
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("successfully created")
    );
}

#[tokio::test]
async fn reserve_with_empty_pool_is_rejected() {
    let addr = start_test_server().await;
    let client = reqwest::Client::new();

    let (status, body) = reserve(&client, addr, now_ms() + H, 60).await;
    assert_eq!(status, 400);
    assert!(body["reservationId"].is_null());
    assert!(body["resourceId"].is_null());
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("no resource available")
    );
}

#[tokio::test]
async fn reserve_validation_failure_lists_violations() {
    let addr = start_test_server().await;
    let client = reqwest::Client::new();
    create_resource(&client, addr, "Tesla", "Model 3").await;

    let (status, body) = reserve(&client, addr, 0, 0).await;
    assert_eq!(status, 400);
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("must not be empty"));
    assert!(message.contains("greater than zero"));
}

#[tokio::test]
async fn overlapping_reserve_on_single_resource_is_rejected() {
    let addr = start_test_server().await;
    let client = reqwest::Client::new();
    create_resource(&client, addr, "Tesla", "Model 3").await;

    let start = now_ms() + H;
    let (first_status, first) = reserve(&client, addr, start, 60).await;
    assert_eq!(first_status, 200);
    assert_eq!(first["resourceId"], "R1");

    let (second_status, second) = reserve(&client, addr, start + 30 * M, 15).await;
    assert_eq!(second_status, 400);
    assert!(second["reservationId"].is_null());
}

#[tokio::test]
async fn upcoming_reservations_respect_limit() {
    let addr = start_test_server().await;
    let client = reqwest::Client::new();
    create_resource(&client, addr, "Tesla", "Model 3").await;

    let now = now_ms();
    // Three disjoint 15-minute reservations on one resource
    for offset in [10 * M, 30 * M, 2 * H] {
        let (status, _) = reserve(&client, addr, now + offset, 15).await;
        assert_eq!(status, 200);
    }

    let limit = now + 90 * M;
    let res = reqwest::get(format!("http://{addr}/api/v1/reservations?limit={limit}"))
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let bounded: serde_json::Value = res.json().await.unwrap();
    assert_eq!(bounded.as_array().unwrap().len(), 2);

    let res = reqwest::get(format!("http://{addr}/api/v1/reservations")).await.unwrap();
    let all: serde_json::Value = res.json().await.unwrap();
    assert_eq!(all.as_array().unwrap().len(), 3);
}
