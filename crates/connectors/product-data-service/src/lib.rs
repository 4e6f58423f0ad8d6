//! The HTTP surface over the query engine.

pub mod error;
pub mod routes;
pub mod state;
