//! Building, rendering and packaging parameterized SQL.

pub mod ast;
pub mod convert;
pub mod execution_plan;
pub mod helpers;
pub mod string;
