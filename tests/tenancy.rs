// Multi-tenant mode: every operation requires a resolved identity and is
// scoped to it.

mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn operations_require_a_bearer_token() -> Result<()> {
    let (app, _store) = common::multi_tenant_app().await;

    for (method, path, body) in [
        ("POST", "/entries", Some(json!({ "score": 50 }))),
        ("GET", "/entries", None),
        ("GET", "/stats", None),
        ("PUT", "/entries/1", Some(json!({ "score": 50 }))),
        ("DELETE", "/entries/1", None),
    ] {
        let (status, resp) = common::send(&app, method, path, None, body).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}: {}", method, path, resp);
        assert!(resp["error"].is_string());
    }

    Ok(())
}

#[tokio::test]
async fn unknown_token_fails_closed() -> Result<()> {
    let (app, _store) = common::multi_tenant_app().await;

    let (status, _) = common::send(
        &app,
        "POST",
        "/entries",
        Some("not-a-real-token"),
        Some(json!({ "score": 50 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn created_entries_carry_the_resolved_identity() -> Result<()> {
    let (app, _store) = common::multi_tenant_app().await;

    let (status, created) = common::send(
        &app,
        "POST",
        "/entries",
        Some("token-a"),
        Some(json!({ "score": 75, "text": "mine" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["user_id"], "user-a");

    Ok(())
}

#[tokio::test]
async fn tenants_are_isolated() -> Result<()> {
    let (app, _store) = common::multi_tenant_app().await;

    let (_, created) = common::send(
        &app,
        "POST",
        "/entries",
        Some("token-a"),
        Some(json!({ "score": 75, "text": "mine" })),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    // B sees nothing
    let (_, listed) = common::send(&app, "GET", "/entries", Some("token-b"), None).await;
    assert_eq!(listed.as_array().unwrap().len(), 0);

    let (_, stats) = common::send(&app, "GET", "/stats", Some("token-b"), None).await;
    assert_eq!(stats["count"], 0);

    // B cannot update A's entry
    let (status, _) = common::send(
        &app,
        "PUT",
        &format!("/entries/{}", id),
        Some("token-b"),
        Some(json!({ "score": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // B's delete reports success but has no effect on A's entry
    let (status, body) = common::send(
        &app,
        "DELETE",
        &format!("/entries/{}", id),
        Some("token-b"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, listed) = common::send(&app, "GET", "/entries", Some("token-a"), None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["score"], 75);

    Ok(())
}
