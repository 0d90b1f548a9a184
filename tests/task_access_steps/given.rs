//! Given steps for task access control BDD scenarios.

use eyre::WrapErr;
use rstest_bdd_macros::given;

use super::world::{TaskAccessWorld, run_async};

#[given("a signed-in user")]
fn signed_in_user(world: &mut TaskAccessWorld) -> Result<(), eyre::Report> {
    let token = run_async(world.app.login()).wrap_err("log in for scenario")?;
    world.token = Some(token);
    Ok(())
}

#[given("an anonymous visitor")]
fn anonymous_visitor(world: &mut TaskAccessWorld) {
    world.token = None;
}

#[given(r#"a read-only task titled "{title}""#)]
fn read_only_task(world: &mut TaskAccessWorld, title: String) -> Result<(), eyre::Report> {
    let task = run_async(world.app.seed(&title, true)).wrap_err("seed read-only task")?;
    world.task_id = Some(task.id());
    Ok(())
}

#[given(r#"an editable task titled "{title}""#)]
fn editable_task(world: &mut TaskAccessWorld, title: String) -> Result<(), eyre::Report> {
    let task = run_async(world.app.seed(&title, false)).wrap_err("seed editable task")?;
    world.task_id = Some(task.id());
    Ok(())
}
