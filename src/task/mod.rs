//! Task lifecycle management for taskdesk.
//!
//! This module creates tasks, applies partial updates, and soft-deletes
//! them while enforcing two access-control rules: soft-deleted tasks are
//! invisible to every read and write, and read-only tasks can be read but
//! never mutated. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
