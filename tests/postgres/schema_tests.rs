//! Schema application and truncation.

use eyre::Result;
use rstest::rstest;
use taskdesk::task::ports::TaskRepository;

use super::helpers::{TestDatabase, database};

#[rstest]
fn migrate_is_idempotent(database: Result<Option<TestDatabase>>) -> Result<()> {
    let Some(db) = database? else {
        return Ok(());
    };
    db.seed("Survives migration", false)?;

    db.runtime.block_on(db.repository.migrate())?;
    db.runtime.block_on(db.repository.migrate())?;

    let tasks = db.runtime.block_on(db.repository.list_active())?;
    assert_eq!(tasks.len(), 1);
    Ok(())
}

#[rstest]
fn truncate_removes_rows_and_restarts_ids(database: Result<Option<TestDatabase>>) -> Result<()> {
    let Some(db) = database? else {
        return Ok(());
    };
    db.seed("First", false)?;
    db.seed("Second", false)?;

    db.runtime.block_on(db.repository.truncate())?;
    assert_eq!(db.row_count()?, 0);

    let reseeded = db.seed("Again", false)?;
    assert_eq!(reseeded.id().value(), 1);
    Ok(())
}

#[rstest]
fn long_titles_are_stored(database: Result<Option<TestDatabase>>) -> Result<()> {
    let Some(db) = database? else {
        return Ok(());
    };
    let title = "x".repeat(300);

    let task = db.seed(&title, false)?;

    let stored = db
        .runtime
        .block_on(db.repository.find_active(task.id()))?
        .map(|found| found.title().as_str().len());
    assert_eq!(stored, Some(300));
    Ok(())
}
