//! Cloud Solver — Store.
//!
//! Adapters for the `ProgressRepository` port: PostgreSQL for deployments and
//! an in-process map for local runs without a database.

pub mod memory_progress_repository;
pub mod pg_progress_repository;
pub mod schema;
