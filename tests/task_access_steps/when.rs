//! When steps for task access control BDD scenarios.

use axum::http::Method;
use rstest_bdd_macros::when;
use serde_json::json;
use taskdesk::task::domain::TaskId;

use super::world::TaskAccessWorld;

#[when(r#"the user creates a task titled "{title}""#)]
fn create_task(world: &mut TaskAccessWorld, title: String) -> Result<(), eyre::Report> {
    let response = world.send(
        Method::POST,
        "/api/tasks",
        Some(json!({
            "title": title,
            "status": "TO_DO",
            "priority": "MEDIUM",
            "dueDate": "2025-06-30",
        })),
    )?;
    if let Some(id) = response.body["id"].as_i64() {
        world.task_id = Some(TaskId::new(id)?);
    }
    world.last_response = Some(response);
    Ok(())
}

#[when(r#"the user renames the task to "{title}""#)]
fn rename_task(world: &mut TaskAccessWorld, title: String) -> Result<(), eyre::Report> {
    let uri = world.task_uri()?;
    let response = world.send(Method::PUT, &uri, Some(json!({ "title": title })))?;
    world.last_response = Some(response);
    Ok(())
}

#[when("the user deletes the task")]
fn delete_task(world: &mut TaskAccessWorld) -> Result<(), eyre::Report> {
    let uri = world.task_uri()?;
    let response = world.send(Method::DELETE, &uri, None)?;
    world.last_response = Some(response);
    Ok(())
}

#[when("the user lists the tasks")]
fn list_tasks(world: &mut TaskAccessWorld) -> Result<(), eyre::Report> {
    let response = world.send(Method::GET, "/api/tasks", None)?;
    world.last_response = Some(response);
    Ok(())
}
