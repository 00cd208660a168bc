//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use tracing::debug;

use super::AppState;
use super::types::{ErrorResponse, TelemetryQuery};
use crate::meter::{Reading, Status};
use crate::sim::summary::Summary;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: String) -> ApiError {
    (status, Json(ErrorResponse { error }))
}

/// Returns the latest reading of every meter, sorted by device id.
///
/// `GET /api/energy/telemetry` → 200 + `Vec<Reading>` JSON
/// `GET /api/energy/telemetry?status=Peak&limit=8` → filtered, then truncated
/// `GET /api/energy/telemetry?status=Offline` → 400 + `ErrorResponse`
/// `GET /api/energy/telemetry?limit=abc` → 400 + `ErrorResponse`
pub async fn get_telemetry(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TelemetryQuery>, QueryRejection>,
) -> Result<Json<Vec<Reading>>, ApiError> {
    let Query(query) = query.map_err(|e| api_error(e.status(), e.body_text()))?;
    let status = query
        .status
        .as_deref()
        .map(str::parse::<Status>)
        .transpose()
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?;

    let mut readings = state.scheduler.store().snapshot();
    readings.sort_by(|a, b| a.device_id.cmp(&b.device_id));
    if let Some(status) = status {
        readings.retain(|r| r.status == status);
    }
    if let Some(limit) = query.limit {
        readings.truncate(limit);
    }

    debug!(count = readings.len(), "serving telemetry snapshot");
    Ok(Json(readings))
}

/// Answers CORS preflight requests with an empty 200.
///
/// `OPTIONS /api/energy/telemetry` → 200
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Returns the latest reading of a single meter.
///
/// `GET /api/energy/telemetry/{device_id}` → 200 + `Reading` JSON, or 404
pub async fn get_device(
    State(state): State<Arc<AppState>>,
    Path(device_id): Path<String>,
) -> Result<Json<Reading>, ApiError> {
    state
        .scheduler
        .store()
        .get(&device_id)
        .map(Json)
        .ok_or_else(|| {
            api_error(
                StatusCode::NOT_FOUND,
                format!("no readings for device \"{device_id}\""),
            )
        })
}

/// Returns fleet-wide aggregates over the current snapshot.
///
/// `GET /api/energy/summary` → 200 + `Summary` JSON
pub async fn get_summary(State(state): State<Arc<AppState>>) -> Json<Summary> {
    let readings = state.scheduler.store().snapshot();
    Json(Summary::from_readings(
        &readings,
        state.scheduler.is_running(),
    ))
}

/// Readiness probe.
///
/// `GET /health` → 200 `OK`
pub async fn health() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Method, Request};
    use chrono::{DateTime, FixedOffset};
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::meter::{generate, meter_id};
    use crate::sim::clock::FixedClock;
    use crate::sim::scheduler::Scheduler;
    use crate::sim::store::StateStore;

    fn at(hour: u32) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(&format!("2024-06-01T{hour:02}:00:00+00:00")).unwrap()
    }

    /// Six meters: odd ones read at 20:00 (Peak), even ones at 02:00 (Normal).
    fn make_test_state() -> Arc<AppState> {
        let store = Arc::new(StateStore::new());
        for i in (1..=6).rev() {
            let id = meter_id("METER", i);
            let hour = if i % 2 == 1 { 20 } else { 2 };
            store.write(&id, generate(&id, at(hour)));
        }
        let scheduler = Scheduler::new(store).with_clock(Arc::new(FixedClock::new(at(2))));
        AppState::new(Arc::new(scheduler))
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let app = router(make_test_state());
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn telemetry_returns_all_meters_sorted() {
        let (status, json) = get_json("/api/energy/telemetry").await;
        assert_eq!(status, StatusCode::OK);

        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0]["deviceId"], "METER-001");
        assert_eq!(rows[5]["deviceId"], "METER-006");
        for row in rows {
            for key in ["deviceId", "timestamp", "value", "unit", "status"] {
                assert!(row.get(key).is_some(), "missing key: {key}");
            }
        }
    }

    #[tokio::test]
    async fn telemetry_status_filter() {
        let (status, json) = get_json("/api/energy/telemetry?status=Peak").await;
        assert_eq!(status, StatusCode::OK);
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r["status"] == "Peak"));
        assert!(rows.iter().all(|r| r["value"] == 25.0));
    }

    #[tokio::test]
    async fn telemetry_limit_applies_after_sorting() {
        let (_, json) = get_json("/api/energy/telemetry?limit=2").await;
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["deviceId"], "METER-001");
        assert_eq!(rows[1]["deviceId"], "METER-002");
    }

    #[tokio::test]
    async fn telemetry_unknown_status_returns_400() {
        let (status, json) = get_json("/api/energy/telemetry?status=Offline").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json.get("error").is_some());
    }

    #[tokio::test]
    async fn malformed_limit_returns_json_400() {
        let (status, json) = get_json("/api/energy/telemetry?limit=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("limit"));
    }

    #[tokio::test]
    async fn preflight_returns_200() {
        let app = router(make_test_state());
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/energy/telemetry")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn single_device_found_and_missing() {
        let (status, json) = get_json("/api/energy/telemetry/METER-004").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["deviceId"], "METER-004");
        assert_eq!(json["status"], "Normal");

        let (status, json) = get_json("/api/energy/telemetry/METER-999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"].as_str().unwrap().contains("METER-999"));
    }

    #[tokio::test]
    async fn summary_counts_statuses() {
        let (status, json) = get_json("/api/energy/summary").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["deviceCount"], 6);
        assert_eq!(json["peakCount"], 3);
        assert_eq!(json["normalCount"], 3);
        assert_eq!(json["maxKwh"], 25.0);
        assert_eq!(json["running"], false);
    }

    #[tokio::test]
    async fn health_returns_ok_text() {
        let app = router(make_test_state());
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"OK");
    }
}
