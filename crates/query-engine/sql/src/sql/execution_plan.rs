//! The statements a single request needs to run.

use super::string::SQL;

/// The compiled statements of a request.
///
/// `count` is present when the client asked for a total, `data` when it asked for rows.
/// A plan always holds at least one of the two.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionPlan {
    pub count: Option<SQL>,
    pub data: Option<SQL>,
}

impl ExecutionPlan {
    /// Every statement of the plan in execution order.
    pub fn statements(&self) -> impl Iterator<Item = &SQL> {
        self.count.iter().chain(self.data.iter())
    }
}
