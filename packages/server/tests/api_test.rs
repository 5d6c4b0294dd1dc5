//! HTTP API tests
//!
//! Drive the full router (envelope, status mapping, routing) against a real
//! database in a temporary directory.

use anyhow::Result;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use event_planner_server::{build_state, create_router, ServerConfig};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

async fn create_test_app() -> Result<(Router, TempDir)> {
    let temp_dir = TempDir::new()?;
    let config = ServerConfig {
        database_path: temp_dir.path().join("test.db"),
        ..Default::default()
    };
    let state = build_state(&config).await?;
    Ok((create_router(state, None), temp_dir))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Result<(StatusCode, Value)> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body)?))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, json))
}

async fn create(app: &Router, title: &str, event_type: &str, day: u32) -> Result<String> {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/events",
        Some(json!({
            "title": title,
            "type": event_type,
            "start": format!("2025-04-{:02}T09:00:00Z", day),
            "end": format!("2025-04-{:02}T10:00:00Z", day),
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    Ok(body["data"]["id"].as_str().unwrap_or_default().to_string())
}

async fn listed_titles(app: &Router) -> Result<Vec<String>> {
    let (status, body) = send(
        app,
        Method::GET,
        "/api/events?startDate=2025-04-01&endDate=2025-04-30",
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    Ok(body["data"]
        .as_array()
        .map(|events| {
            events
                .iter()
                .map(|e| e["title"].as_str().unwrap_or_default().to_string())
                .collect()
        })
        .unwrap_or_default())
}

#[tokio::test]
async fn test_health_check() -> Result<()> {
    let (app, _temp_dir) = create_test_app().await?;

    let (status, body) = send(&app, Method::GET, "/api", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "API is running");
    Ok(())
}

#[tokio::test]
async fn test_event_crud_round() -> Result<()> {
    let (app, _temp_dir) = create_test_app().await?;
    let id = create(&app, "Q1 Earnings Call", "Earnings", 15).await?;

    let (status, body) = send(&app, Method::GET, &format!("/api/events/{}", id), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Q1 Earnings Call");
    assert_eq!(body["data"]["type"], "Earnings");
    assert_eq!(body["data"]["priority"], Value::Null);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/events/{}", id),
        Some(json!({ "title": "Q1 Earnings Call (rescheduled)" })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Q1 Earnings Call (rescheduled)");

    let (status, body) = send(&app, Method::DELETE, &format!("/api/events/{}", id), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id.as_str());

    let (status, body) = send(&app, Method::GET, &format!("/api/events/{}", id), None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "EVENT_NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn test_create_validation_errors() -> Result<()> {
    let (app, _temp_dir) = create_test_app().await?;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/events",
        Some(json!({ "title": "No dates", "type": "Meeting" })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing required fields");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/events",
        Some(json!({
            "title": "Backwards",
            "type": "Meeting",
            "start": "2025-04-15T10:00:00Z",
            "end": "2025-04-15T09:00:00Z"
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Start date must be before end date");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/events")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))?;
    let response = app.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_list_requires_date_range() -> Result<()> {
    let (app, _temp_dir) = create_test_app().await?;

    let (status, body) = send(&app, Method::GET, "/api/events?startDate=2025-04-01", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing required date parameters");

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/events?startDate=April&endDate=2025-04-30",
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid date format");
    Ok(())
}

#[tokio::test]
async fn test_list_range_excluding_all_events_is_empty() -> Result<()> {
    let (app, _temp_dir) = create_test_app().await?;
    create(&app, "Standup", "Meeting", 15).await?;

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/events?startDate=2024-01-01&endDate=2024-01-31",
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
    Ok(())
}

#[tokio::test]
async fn test_reorder_reset_and_normalize() -> Result<()> {
    let (app, _temp_dir) = create_test_app().await?;
    let a = create(&app, "A", "Meeting", 14).await?;
    let b = create(&app, "B", "Meeting", 15).await?;
    let c = create(&app, "C", "Meeting", 16).await?;

    let (status, body) = send(&app, Method::POST, "/api/events/normalize", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["normalized"], 3);

    // C between A and B
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/events/reorder",
        Some(json!({ "movedId": c, "beforeId": a, "afterId": b })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["priority"], 500.0);
    assert_eq!(body["data"]["normalized"], false);
    assert_eq!(listed_titles(&app).await?, vec!["A", "C", "B"]);

    // Legacy field name, moved to the front
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/events/reorder",
        Some(json!({ "draggedId": b, "beforeId": null, "afterId": a })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["priority"], -1000.0);
    assert_eq!(listed_titles(&app).await?, vec!["B", "A", "C"]);

    let (status, body) = send(&app, Method::POST, "/api/events/resetOrder", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["cleared"], 3);
    assert_eq!(listed_titles(&app).await?, vec!["A", "B", "C"]);
    Ok(())
}

#[tokio::test]
async fn test_reorder_rejects_invalid_input() -> Result<()> {
    let (app, _temp_dir) = create_test_app().await?;
    let a = create(&app, "A", "Meeting", 14).await?;
    let b = create(&app, "B", "Meeting", 15).await?;

    let invalid = [
        json!({ "beforeId": a }),
        json!({ "movedId": a, "beforeId": b, "afterId": b }),
        json!({ "movedId": a, "beforeId": a }),
        json!({ "movedId": "not-a-uuid" }),
    ];
    for body in invalid {
        let (status, response) = send(&app, Method::POST, "/api/events/reorder", Some(body)).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", response);
        assert_eq!(response["success"], false);
    }
    Ok(())
}

#[tokio::test]
async fn test_event_types_follow_events() -> Result<()> {
    let (app, _temp_dir) = create_test_app().await?;
    let id = create(&app, "Dividend payout", "Dividends", 14).await?;
    create(&app, "Earnings call", "Earnings", 15).await?;

    let (status, body) = send(&app, Method::GET, "/api/eventTypes", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!(["Dividends", "Earnings"]));

    let (_, body) = send(&app, Method::GET, "/api/eventTypes?search=ARN", None).await?;
    assert_eq!(body["data"], json!(["Earnings"]));

    send(&app, Method::DELETE, &format!("/api/events/{}", id), None).await?;
    let (_, body) = send(&app, Method::GET, "/api/eventTypes", None).await?;
    assert_eq!(body["data"], json!(["Earnings"]));
    Ok(())
}

#[tokio::test]
async fn test_unknown_route() -> Result<()> {
    let (app, _temp_dir) = create_test_app().await?;

    let (status, body) = send(&app, Method::GET, "/api/nothing-here", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "ROUTE_NOT_FOUND");
    Ok(())
}
