//! taskdesk: a task tracker with a REST backend and front-end logic.
//!
//! The backend serves authenticated CRUD endpoints over tasks. Tasks are
//! soft-deleted, and read-only tasks reject every mutation. The client side
//! holds the request helper, authentication gate, pagination, task
//! controllers and route guard a front end needs to talk to that backend.
//!
//! # Architecture
//!
//! The backend modules follow hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, APIs, etc.)
//!
//! # Modules
//!
//! - [`task`]: Task lifecycle with soft delete and the read-only guard
//! - [`auth`]: Credential checks against an external identity provider
//! - [`http`]: REST routes, session cookies and request validation
//! - [`client`]: Front-end request helper, auth gate and controllers
//! - [`config`]: Environment configuration
//! - [`telemetry`]: Log subscriber set-up

pub mod auth;
pub mod client;
pub mod config;
pub mod http;
pub mod task;
pub mod telemetry;
