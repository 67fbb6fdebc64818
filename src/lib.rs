//! Atelier: multi-tenant project and task coordination core.
//!
//! This crate implements the project/task workflow subsystem of a
//! multi-tenant back office: creating projects under a company, assigning
//! group leaders and participants, scheduling tasks, transitioning task and
//! project status, and enforcing a role-based permission matrix on every
//! mutation.
//!
//! # Architecture
//!
//! Atelier follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, APIs, etc.)
//!
//! # Modules
//!
//! - [`project`]: Project/participant/task aggregates, authorization, and
//!   the workflow orchestrator

pub mod project;
