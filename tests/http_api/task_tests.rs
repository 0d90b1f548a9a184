//! Task CRUD through the session middleware.

use axum::http::{Method, StatusCode};
use eyre::{Result, eyre};
use rstest::rstest;
use serde_json::json;
use taskdesk::task::domain::TaskId;

use super::helpers::{TestApp, app};

#[rstest]
#[case(Method::GET, "/api/tasks")]
#[case(Method::GET, "/api/tasks/1")]
#[case(Method::POST, "/api/tasks")]
#[case(Method::PUT, "/api/tasks/1")]
#[case(Method::DELETE, "/api/tasks/1")]
#[tokio::test(flavor = "multi_thread")]
async fn task_routes_require_a_session(
    app: TestApp,
    #[case] method: Method,
    #[case] uri: &str,
) -> Result<()> {
    let response = app.send(method, uri, None, None).await?;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body, json!({ "message": "Authentication required." }));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bearer_token_is_accepted(app: TestApp) -> Result<()> {
    let token = app.login().await?;
    let request = axum::http::Request::builder()
        .uri("/api/tasks")
        .header("authorization", format!("Bearer {token}"))
        .body(axum::body::Body::empty())?;

    let response = tower::ServiceExt::oneshot(app.router.clone(), request).await?;

    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_returns_the_stored_task(app: TestApp) -> Result<()> {
    let token = app.login().await?;

    let response = app
        .send(
            Method::POST,
            "/api/tasks",
            Some(&token),
            Some(json!({
                "title": "X",
                "status": "TO_DO",
                "priority": "LOW",
                "dueDate": "2025-01-01T00:00:00Z",
            })),
        )
        .await?;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(
        response.body,
        json!({
            "id": 1,
            "title": "X",
            "description": null,
            "status": "TO_DO",
            "priority": "LOW",
            "dueDate": "2025-01-01T00:00:00Z",
            "deletedAt": null,
            "readOnly": false,
        })
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_reports_every_invalid_field(app: TestApp) -> Result<()> {
    let token = app.login().await?;

    let response = app
        .send(
            Method::POST,
            "/api/tasks",
            Some(&token),
            Some(json!({ "title": " ", "status": "done", "priority": "urgent", "dueDate": "soon" })),
        )
        .await?;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["message"], "Validation failed");
    let fields: Vec<&str> = response.body["errors"]
        .as_array()
        .ok_or_else(|| eyre!("errors should be an array"))?
        .iter()
        .filter_map(|error| error["field"].as_str())
        .collect();
    assert_eq!(fields, ["title", "status", "priority", "dueDate"]);
    assert!(app.repository.find_any(TaskId::new(1)?)?.is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_and_get_skip_deleted_tasks(app: TestApp) -> Result<()> {
    let token = app.login().await?;
    let kept = app.seed("Kept", false).await?;
    let removed = app.seed("Removed", false).await?;

    let deleted = app
        .send(
            Method::DELETE,
            &format!("/api/tasks/{}", removed.id()),
            Some(&token),
            None,
        )
        .await?;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let list = app.send(Method::GET, "/api/tasks", Some(&token), None).await?;
    let ids: Vec<i64> = list
        .body
        .as_array()
        .ok_or_else(|| eyre!("list should be an array"))?
        .iter()
        .filter_map(|task| task["id"].as_i64())
        .collect();
    assert_eq!(ids, [kept.id().value()]);

    let missing = app
        .send(
            Method::GET,
            &format!("/api/tasks/{}", removed.id()),
            Some(&token),
            None,
        )
        .await?;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body, json!({ "message": "Task not found" }));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn second_delete_is_not_found(app: TestApp) -> Result<()> {
    let token = app.login().await?;
    let task = app.seed("Once", false).await?;
    let uri = format!("/api/tasks/{}", task.id());

    let first = app.send(Method::DELETE, &uri, Some(&token), None).await?;
    let second = app.send(Method::DELETE, &uri, Some(&token), None).await?;

    assert_eq!(first.status, StatusCode::NO_CONTENT);
    assert_eq!(second.status, StatusCode::NOT_FOUND);
    assert_eq!(
        second.body,
        json!({ "message": "Task not found or already deleted" })
    );
    let stored = app
        .repository
        .find_any(task.id())?
        .ok_or_else(|| eyre!("soft-deleted row should remain"))?;
    assert!(stored.deleted_at().is_some());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn read_only_task_refuses_mutation(app: TestApp) -> Result<()> {
    let token = app.login().await?;
    let task = app.seed("Locked", true).await?;
    let uri = format!("/api/tasks/{}", task.id());

    let update = app
        .send(Method::PUT, &uri, Some(&token), Some(json!({ "title": "Changed" })))
        .await?;
    assert_eq!(update.status, StatusCode::FORBIDDEN);
    assert_eq!(
        update.body,
        json!({ "message": "Task is read-only and cannot be updated" })
    );

    let delete = app.send(Method::DELETE, &uri, Some(&token), None).await?;
    assert_eq!(delete.status, StatusCode::FORBIDDEN);

    let stored = app
        .repository
        .find_any(task.id())?
        .ok_or_else(|| eyre!("task should remain"))?;
    assert_eq!(stored, task);

    let read = app.send(Method::GET, &uri, Some(&token), None).await?;
    assert_eq!(read.status, StatusCode::OK);
    assert_eq!(read.body["readOnly"], true);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_changes_only_given_fields(app: TestApp) -> Result<()> {
    let token = app.login().await?;
    let task = app.seed("Draft", false).await?;
    let uri = format!("/api/tasks/{}", task.id());

    let response = app
        .send(
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({ "status": "COMPLETED", "description": null })),
        )
        .await?;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["title"], "Draft");
    assert_eq!(response.body["status"], "COMPLETED");
    assert_eq!(response.body["priority"], "LOW");
    assert_eq!(response.body["description"], serde_json::Value::Null);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_rejects_null_title(app: TestApp) -> Result<()> {
    let token = app.login().await?;
    let task = app.seed("Draft", false).await?;
    let uri = format!("/api/tasks/{}", task.id());

    let response = app
        .send(Method::PUT, &uri, Some(&token), Some(json!({ "title": null })))
        .await?;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["errors"][0]["field"], "title");
    let stored = app
        .repository
        .find_any(task.id())?
        .ok_or_else(|| eyre!("task should still exist"))?;
    assert_eq!(stored.title().as_str(), "Draft");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn long_titles_are_accepted(app: TestApp) -> Result<()> {
    let token = app.login().await?;
    let title = "t".repeat(300);

    let response = app
        .send(
            Method::POST,
            "/api/tasks",
            Some(&token),
            Some(json!({
                "title": title,
                "status": "TO_DO",
                "priority": "LOW",
                "dueDate": "2025-01-01T00:00:00Z",
            })),
        )
        .await?;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["title"], title.as_str());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_of_unknown_task_is_not_found(app: TestApp) -> Result<()> {
    let token = app.login().await?;

    let response = app
        .send(
            Method::PUT,
            "/api/tasks/42",
            Some(&token),
            Some(json!({ "title": "Ghost" })),
        )
        .await?;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(app.repository.find_any(TaskId::new(42)?)?.is_none());
    Ok(())
}

#[rstest]
#[case("abc", StatusCode::UNPROCESSABLE_ENTITY)]
#[case("1.5", StatusCode::UNPROCESSABLE_ENTITY)]
#[case("0", StatusCode::NOT_FOUND)]
#[case("-3", StatusCode::NOT_FOUND)]
#[tokio::test(flavor = "multi_thread")]
async fn path_ids_are_validated(
    app: TestApp,
    #[case] raw_id: &str,
    #[case] expected: StatusCode,
) -> Result<()> {
    let token = app.login().await?;

    let response = app
        .send(Method::GET, &format!("/api/tasks/{raw_id}"), Some(&token), None)
        .await?;

    assert_eq!(response.status, expected);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_json_is_a_bad_request(app: TestApp) -> Result<()> {
    let token = app.login().await?;
    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/api/tasks")
        .header("cookie", format!("authToken={token}"))
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))?;

    let response = tower::ServiceExt::oneshot(app.router.clone(), request).await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}
