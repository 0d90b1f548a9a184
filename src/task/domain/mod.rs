//! Domain model for task lifecycle management.
//!
//! The task domain models creation, partial updates, soft deletion and the
//! read-only guard while keeping all infrastructure concerns outside of the
//! domain boundary.

mod due_date;
mod error;
mod ids;
mod status;
mod task;

pub use due_date::parse_due_date;
pub use error::{ParseTaskPriorityError, ParseTaskStatusError, TaskDomainError};
pub use ids::{TaskId, TaskTitle};
pub use status::{TaskPriority, TaskStatus};
pub use task::{NewTask, PersistedTaskData, Task, TaskChanges, TaskMutation};
