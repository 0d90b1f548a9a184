//! Soft-delete visibility, ordering and the read-only guard against a real
//! database.

use std::sync::Arc;

use chrono::Utc;
use eyre::{Result, eyre};
use rstest::rstest;
use taskdesk::task::{
    domain::{TaskChanges, TaskDomainError, TaskMutation, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError},
};

use super::helpers::{StoredRow, TestDatabase, database};

fn soft_delete() -> TaskMutation {
    TaskMutation::SoftDelete {
        deleted_at: Utc::now(),
    }
}

fn complete() -> TaskMutation {
    TaskMutation::Update(TaskChanges {
        status: Some(TaskStatus::Completed),
        ..TaskChanges::default()
    })
}

#[rstest]
fn list_is_ordered_by_id_and_skips_deleted(
    database: Result<Option<TestDatabase>>,
) -> Result<()> {
    let Some(db) = database? else {
        return Ok(());
    };
    let first = db.seed("First", false)?;
    let second = db.seed("Second", false)?;
    let third = db.seed("Third", false)?;

    db.runtime
        .block_on(db.repository.modify_active(second.id(), &soft_delete()))?;

    let listed: Vec<i64> = db
        .runtime
        .block_on(db.repository.list_active())?
        .iter()
        .map(|task| task.id().value())
        .collect();
    assert_eq!(listed, [first.id().value(), third.id().value()]);
    assert!(
        db.runtime
            .block_on(db.repository.find_active(second.id()))?
            .is_none()
    );
    assert_eq!(
        db.stored_row(second.id())?.map(|row| row.deleted),
        Some(true),
        "soft delete keeps the row"
    );
    Ok(())
}

#[rstest]
fn second_delete_is_not_found(database: Result<Option<TestDatabase>>) -> Result<()> {
    let Some(db) = database? else {
        return Ok(());
    };
    let task = db.seed("Once", false)?;

    db.runtime
        .block_on(db.repository.modify_active(task.id(), &soft_delete()))?;
    let again = db
        .runtime
        .block_on(db.repository.modify_active(task.id(), &soft_delete()));

    assert!(matches!(again, Err(TaskRepositoryError::NotFound(id)) if id == task.id()));
    Ok(())
}

#[rstest]
fn updating_a_deleted_task_is_not_found(database: Result<Option<TestDatabase>>) -> Result<()> {
    let Some(db) = database? else {
        return Ok(());
    };
    let task = db.seed("Gone", false)?;
    db.runtime
        .block_on(db.repository.modify_active(task.id(), &soft_delete()))?;

    let result = db
        .runtime
        .block_on(db.repository.modify_active(task.id(), &complete()));

    assert!(matches!(result, Err(TaskRepositoryError::NotFound(_))));
    assert_eq!(
        db.stored_row(task.id())?.map(|row| row.status),
        Some("TO_DO".to_owned())
    );
    Ok(())
}

#[rstest]
#[case::update(complete())]
#[case::delete(soft_delete())]
fn read_only_rejection_writes_nothing(
    database: Result<Option<TestDatabase>>,
    #[case] mutation: TaskMutation,
) -> Result<()> {
    let Some(db) = database? else {
        return Ok(());
    };
    let task = db.seed("Locked", true)?;
    let before = db.stored_row(task.id())?;

    let result = db
        .runtime
        .block_on(db.repository.modify_active(task.id(), &mutation));

    assert!(matches!(
        result,
        Err(TaskRepositoryError::Rejected(TaskDomainError::ReadOnly(_)))
    ));
    assert_eq!(db.stored_row(task.id())?, before);
    assert_eq!(
        before,
        Some(StoredRow {
            title: "Locked".to_owned(),
            status: "TO_DO".to_owned(),
            read_only: true,
            deleted: false,
        })
    );
    Ok(())
}

#[rstest]
fn update_persists_only_given_fields(database: Result<Option<TestDatabase>>) -> Result<()> {
    let Some(db) = database? else {
        return Ok(());
    };
    let task = db.seed("Draft", false)?;

    let updated = db
        .runtime
        .block_on(db.repository.modify_active(task.id(), &complete()))?;

    assert_eq!(updated.status(), TaskStatus::Completed);
    let reloaded = db
        .runtime
        .block_on(db.repository.find_active(task.id()))?
        .ok_or_else(|| eyre!("task should still be active"))?;
    assert_eq!(reloaded, updated);
    assert_eq!(reloaded.title().as_str(), "Draft");
    assert_eq!(reloaded.description(), Some("seeded"));
    Ok(())
}

/// A delete racing an update that locks the task: exactly one of them wins.
#[rstest]
fn concurrent_lock_and_delete_never_both_succeed(
    database: Result<Option<TestDatabase>>,
) -> Result<()> {
    let Some(db) = database? else {
        return Ok(());
    };
    let repository = Arc::new(db.repository.clone());

    for round in 0..10 {
        let id = db.seed(&format!("Race {round}"), false)?.id();
        let lock = TaskMutation::Update(TaskChanges {
            read_only: Some(true),
            ..TaskChanges::default()
        });

        let (lock_join, delete_join) = db.runtime.block_on(async {
            let locker = Arc::clone(&repository);
            let deleter = Arc::clone(&repository);
            let lock_task = tokio::spawn(async move { locker.modify_active(id, &lock).await });
            let delete_task =
                tokio::spawn(async move { deleter.modify_active(id, &soft_delete()).await });
            (lock_task.await, delete_task.await)
        });
        let locked = lock_join?;
        let deleted = delete_join?;
        let row = db
            .stored_row(id)?
            .ok_or_else(|| eyre!("row {round} should exist"))?;

        match (locked, deleted) {
            (Ok(_), Err(TaskRepositoryError::Rejected(TaskDomainError::ReadOnly(_)))) => {
                assert!(row.read_only && !row.deleted);
            }
            (Err(TaskRepositoryError::NotFound(_)), Ok(_)) => {
                assert!(!row.read_only && row.deleted);
            }
            (lock_outcome, delete_outcome) => {
                return Err(eyre!(
                    "round {round}: unexpected outcome lock={lock_outcome:?} delete={delete_outcome:?}"
                ));
            }
        }
    }
    Ok(())
}
