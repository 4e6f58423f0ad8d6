//! Query execution against a PostgreSQL database, and shaping of the results.

pub mod database;
pub mod error;
pub mod metrics;
pub mod mutation;
pub mod query;
pub mod schema;
pub mod shape;
