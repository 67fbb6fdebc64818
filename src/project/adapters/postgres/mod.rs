//! `PostgreSQL` adapters for the project/task store ports.
//!
//! Multi-record mutations run inside a single Diesel transaction; the
//! close guard re-verifies the all-tasks-closed condition in the same
//! transaction that writes the status.

pub mod models;
pub mod schema;
mod store;

pub use store::{PostgresProjectStore, PostgresTaskStore, WorkspacePgPool};
