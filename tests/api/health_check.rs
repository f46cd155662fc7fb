//! tests/api/health_check.rs

use crate::helpers::{spawn_app, spawn_app_with_session};

#[tokio::test]
async fn health_check_works() {
    let app = spawn_app("2024-06-01").await;

    let response = app.get("/health_check").await;

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["whatsapp"], "ready");
}

#[tokio::test]
async fn health_check_reports_a_session_waiting_for_pairing() {
    let app = spawn_app_with_session(
        "2024-06-01",
        serde_json::json!({ "status": "SCAN_QR_CODE", "qr": "2@code" }),
    )
    .await;

    let response = app.get("/health_check").await;

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["whatsapp"], "awaiting_pairing");
}
