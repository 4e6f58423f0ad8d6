//! Translate the incoming query string to an ExecutionPlan (SQL) to be run against the database.

pub mod error;
pub mod filter;
pub mod query;
