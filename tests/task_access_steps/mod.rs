//! Step definitions for task access control scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
