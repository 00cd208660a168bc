#![cfg(feature = "api")]

mod common;

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::util::ServiceExt;

use meter_sim::api::{AppState, router};

use common::{evening_peak, fixed_scheduler, night};

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

#[tokio::test]
async fn empty_store_serves_empty_array() {
    let (scheduler, _) = fixed_scheduler("METER", night());
    let app = router(AppState::new(scheduler));

    let (status, json) = get(app.clone(), "/api/energy/telemetry").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, Value::Array(vec![]));

    let (_, summary) = get(app, "/api/energy/summary").await;
    assert_eq!(summary["deviceCount"], 0);
    assert_eq!(summary["meanKwh"], 0.0);
}

#[tokio::test(start_paused = true)]
async fn live_run_is_visible_through_the_api() {
    let (scheduler, clock) = fixed_scheduler("METER", night());
    let app = router(AppState::new(scheduler.clone()));

    scheduler.start(12, Duration::from_secs(2)).unwrap();
    tokio::time::sleep(Duration::from_millis(2500)).await;

    let (status, json) = get(app.clone(), "/api/energy/telemetry").await;
    assert_eq!(status, StatusCode::OK);
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 12);
    assert_eq!(rows[0]["deviceId"], "METER-001");
    assert_eq!(rows[11]["deviceId"], "METER-012");
    assert!(rows.iter().all(|r| r["status"] == "Normal"));
    assert_eq!(rows[0]["timestamp"], "2024-06-01T02:00:00+00:00");

    let (_, summary) = get(app.clone(), "/api/energy/summary").await;
    assert_eq!(summary["running"], true);
    assert_eq!(summary["normalCount"], 12);

    clock.set(evening_peak());
    tokio::time::sleep(Duration::from_secs(2)).await;

    let (_, peaks) = get(app.clone(), "/api/energy/telemetry?status=peak&limit=5").await;
    let peaks = peaks.as_array().unwrap();
    assert_eq!(peaks.len(), 5);
    assert!(peaks.iter().all(|r| r["value"] == 25.0));

    scheduler.stop().await;

    let (_, summary) = get(app.clone(), "/api/energy/summary").await;
    assert_eq!(summary["running"], false);
    assert_eq!(summary["peakCount"], 12);

    let (status, one) = get(app, "/api/energy/telemetry/METER-007").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(one["status"], "Peak");
    assert_eq!(one["unit"], "kWh");
}
