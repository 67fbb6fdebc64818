//! Step definitions for project workflow BDD scenarios.

pub mod world;

mod given;
mod then;
mod when;
