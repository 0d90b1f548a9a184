//! Then steps for task access control BDD scenarios.

use rstest_bdd_macros::then;

use super::world::TaskAccessWorld;

#[then("the response status is {status:u16}")]
fn response_status_is(world: &TaskAccessWorld, status: u16) -> Result<(), eyre::Report> {
    let response = world
        .last_response
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no request was sent"))?;
    if response.status.as_u16() != status {
        return Err(eyre::eyre!(
            "expected status {status}, got {} with body {}",
            response.status,
            response.body
        ));
    }
    Ok(())
}

#[then(r#"the task list contains "{title}""#)]
fn task_list_contains(world: &TaskAccessWorld, title: String) -> Result<(), eyre::Report> {
    let titles = world.listed_titles()?;
    if !titles.contains(&title) {
        return Err(eyre::eyre!("expected {title:?} in {titles:?}"));
    }
    Ok(())
}

#[then("the task list is empty")]
fn task_list_is_empty(world: &TaskAccessWorld) -> Result<(), eyre::Report> {
    let titles = world.listed_titles()?;
    if !titles.is_empty() {
        return Err(eyre::eyre!("expected no tasks, found {titles:?}"));
    }
    Ok(())
}

#[then(r#"the task is still titled "{title}""#)]
fn task_is_still_titled(world: &TaskAccessWorld, title: String) -> Result<(), eyre::Report> {
    let id = world
        .task_id
        .ok_or_else(|| eyre::eyre!("missing task in scenario world"))?;
    let stored = world
        .app
        .repository
        .find_any(id)?
        .ok_or_else(|| eyre::eyre!("task {id} vanished"))?;
    if stored.title().as_str() != title {
        return Err(eyre::eyre!(
            "expected title {title:?}, found {:?}",
            stored.title().as_str()
        ));
    }
    Ok(())
}
