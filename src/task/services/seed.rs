//! Sample tasks for populating an empty database.

use crate::task::domain::{NewTask, TaskDomainError, TaskPriority, TaskStatus, TaskTitle};
use chrono::{TimeZone, Utc};

type SeedRow = (&'static str, &'static str, TaskStatus, TaskPriority, i32, u32, bool);

const SEED_ROWS: [SeedRow; 20] = [
    ("Task One", "First sample task", TaskStatus::Pending, TaskPriority::High, 2024, 1, true),
    ("Task Two", "Another test task", TaskStatus::Completed, TaskPriority::Medium, 2024, 2, true),
    ("Task Three", "Third example task", TaskStatus::Pending, TaskPriority::Low, 2024, 3, true),
    ("Task Four", "Fourth test task", TaskStatus::InProgress, TaskPriority::High, 2024, 4, true),
    ("Task Five", "Fifth test task", TaskStatus::Pending, TaskPriority::Medium, 2024, 5, true),
    ("Task Six", "Sixth sample task", TaskStatus::Completed, TaskPriority::Low, 2024, 6, true),
    ("Task Seven", "Seventh test task", TaskStatus::InProgress, TaskPriority::High, 2024, 7, true),
    ("Task Eight", "Eighth test task", TaskStatus::Pending, TaskPriority::Medium, 2024, 8, true),
    ("Task Nine", "Ninth test task", TaskStatus::Pending, TaskPriority::Low, 2024, 9, true),
    ("Task Ten", "Tenth test task", TaskStatus::Completed, TaskPriority::High, 2024, 10, true),
    ("Task Eleven", "Eleventh sample task", TaskStatus::Pending, TaskPriority::Medium, 2024, 11, false),
    ("Task Twelve", "Twelfth sample task", TaskStatus::InProgress, TaskPriority::Low, 2024, 12, false),
    ("Task Thirteen", "Thirteenth test task", TaskStatus::Completed, TaskPriority::High, 2025, 1, false),
    ("Task Fourteen", "Fourteenth test task", TaskStatus::Pending, TaskPriority::Medium, 2025, 2, false),
    ("Task Fifteen", "Fifteenth test task", TaskStatus::InProgress, TaskPriority::Low, 2025, 3, false),
    ("Task Sixteen", "Sixteenth test task", TaskStatus::Completed, TaskPriority::High, 2025, 4, false),
    ("Task Seventeen", "Seventeenth sample task", TaskStatus::Pending, TaskPriority::Medium, 2025, 5, false),
    ("Task Eighteen", "Eighteenth sample task", TaskStatus::Pending, TaskPriority::Low, 2025, 6, false),
    ("Task Nineteen", "Nineteenth test task", TaskStatus::InProgress, TaskPriority::High, 2025, 7, false),
    ("Task Twenty", "Twentieth test task", TaskStatus::Completed, TaskPriority::Medium, 2025, 8, false),
];

/// Returns twenty sample tasks; the first ten are read-only.
///
/// Due dates fall on the first of consecutive months starting January 2024.
///
/// # Errors
///
/// Returns [`TaskDomainError`] if a built-in title fails validation.
pub fn sample_tasks() -> Result<Vec<NewTask>, TaskDomainError> {
    SEED_ROWS
        .iter()
        .map(|&(title, description, status, priority, year, month, read_only)| {
            let due_date = Utc
                .with_ymd_and_hms(year, month, 1, 0, 0, 0)
                .single()
                .unwrap_or_default();
            Ok(NewTask::new(TaskTitle::new(title)?, status, priority, due_date)
                .with_description(description)
                .with_read_only(read_only))
        })
        .collect()
}
