//! Metadata information regarding the storage schema and the fields clients may query.

pub mod database;
pub mod fields;

// re-export without modules
pub use database::*;
pub use fields::*;
