//! The `OpenAPI` document behind the API docs flag.

use axum::http::{Method, StatusCode};
use eyre::{Result, eyre};
use rstest::rstest;

use super::helpers::{TestApp, app, docs_app};

const DOCS_URI: &str = "/api-docs/openapi.json";

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn docs_are_not_routed_by_default(app: TestApp) -> Result<()> {
    let response = app.send(Method::GET, DOCS_URI, None, None).await?;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn docs_describe_the_task_and_auth_routes(docs_app: TestApp) -> Result<()> {
    let response = docs_app.send(Method::GET, DOCS_URI, None, None).await?;

    assert_eq!(response.status, StatusCode::OK);
    let paths = response.body["paths"]
        .as_object()
        .ok_or_else(|| eyre!("document should list paths"))?;
    for path in [
        "/api/tasks",
        "/api/tasks/{id}",
        "/api/auth/login",
        "/api/auth/logout",
        "/api/auth/status",
        "/api/auth/validate",
    ] {
        assert!(paths.contains_key(path), "missing {path}");
    }
    assert!(paths["/api/tasks/{id}"].get("delete").is_some());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn docs_declare_the_session_schemes(docs_app: TestApp) -> Result<()> {
    let response = docs_app.send(Method::GET, DOCS_URI, None, None).await?;

    let schemes = &response.body["components"]["securitySchemes"];
    assert_eq!(schemes["session_cookie"]["in"], "cookie");
    assert_eq!(schemes["session_cookie"]["name"], "authToken");
    assert_eq!(schemes["bearer_token"]["scheme"], "bearer");
    assert!(response.body["components"]["schemas"]["TaskResponse"].is_object());
    Ok(())
}
