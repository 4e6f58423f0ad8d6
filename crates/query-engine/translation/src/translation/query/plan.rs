//! The validated form of a request.

use query_engine_metadata::metadata::{Column, FieldDescriptor};

use crate::translation::filter::{ComparisonOperator, FilterNode, Literal};

/// A request whose every field reference has been checked against the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub filter: Option<FilterNode<FieldDescriptor>>,
    pub order_by: Vec<OrderByElement>,
    pub top: Option<u32>,
    pub skip: Option<u32>,
    /// `None` selects every field.
    pub select: Option<Vec<FieldDescriptor>>,
    pub want_count: bool,
    pub inline_count: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderByElement {
    pub field: FieldDescriptor,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Default for QueryPlan {
    fn default() -> Self {
        QueryPlan {
            filter: None,
            order_by: vec![],
            top: None,
            skip: None,
            select: None,
            want_count: false,
            inline_count: false,
        }
    }
}

impl QueryPlan {
    /// Whether the data statement runs. `$count` on its own skips it.
    pub fn returns_rows(&self) -> bool {
        !self.want_count || self.inline_count
    }

    /// Whether the count statement runs.
    pub fn returns_count(&self) -> bool {
        self.want_count || self.inline_count
    }

    /// Narrow the plan to the entries of a single product.
    pub fn restrict_to_product(mut self, product_id: &str) -> QueryPlan {
        let restriction = FilterNode::Comparison {
            field: Column::ProductId.descriptor(),
            operator: ComparisonOperator::Eq,
            literal: Literal::String(product_id.to_string()),
        };
        self.filter = Some(match self.filter.take() {
            None => restriction,
            Some(filter) => FilterNode::and(restriction, filter),
        });
        self
    }
}
