//! Abstract syntax of `$filter` expressions.

use std::fmt;

/// A filter expression.
///
/// `F` is how fields are identified: raw names straight out of the parser, or resolved
/// descriptors once the query plan has validated them.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode<F = String> {
    /// `field op literal`
    Comparison {
        field: F,
        operator: ComparisonOperator,
        literal: Literal,
    },
    /// `left and right`, `left or right`
    Logical {
        operator: LogicalOperator,
        left: Box<FilterNode<F>>,
        right: Box<FilterNode<F>>,
    },
    /// `function(field,literal)`
    FunctionCall {
        function: StringFunction,
        field: F,
        literal: Literal,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFunction {
    StartsWith,
    EndsWith,
    Contains,
}

/// A literal value. Never interpreted, only ever bound as a query parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Number(f64),
    Boolean(bool),
}

impl<F> FilterNode<F> {
    /// Combine two filters with `and`.
    pub fn and(left: FilterNode<F>, right: FilterNode<F>) -> FilterNode<F> {
        FilterNode::Logical {
            operator: LogicalOperator::And,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// The literals of the expression, left to right.
    pub fn literals(&self) -> Vec<&Literal> {
        match self {
            FilterNode::Comparison { literal, .. } | FilterNode::FunctionCall { literal, .. } => {
                vec![literal]
            }
            FilterNode::Logical { left, right, .. } => {
                let mut literals = left.literals();
                literals.extend(right.literals());
                literals
            }
        }
    }
}

impl ComparisonOperator {
    pub fn from_keyword(word: &str) -> Option<ComparisonOperator> {
        match word.to_ascii_lowercase().as_str() {
            "eq" => Some(ComparisonOperator::Eq),
            "ne" => Some(ComparisonOperator::Ne),
            "gt" => Some(ComparisonOperator::Gt),
            "ge" => Some(ComparisonOperator::Ge),
            "lt" => Some(ComparisonOperator::Lt),
            "le" => Some(ComparisonOperator::Le),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            ComparisonOperator::Eq => "eq",
            ComparisonOperator::Ne => "ne",
            ComparisonOperator::Gt => "gt",
            ComparisonOperator::Ge => "ge",
            ComparisonOperator::Lt => "lt",
            ComparisonOperator::Le => "le",
        }
    }
}

impl LogicalOperator {
    pub fn from_keyword(word: &str) -> Option<LogicalOperator> {
        if word.eq_ignore_ascii_case("and") {
            Some(LogicalOperator::And)
        } else if word.eq_ignore_ascii_case("or") {
            Some(LogicalOperator::Or)
        } else {
            None
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            LogicalOperator::And => "and",
            LogicalOperator::Or => "or",
        }
    }
}

impl StringFunction {
    pub fn from_name(name: &str) -> Option<StringFunction> {
        match name.to_ascii_lowercase().as_str() {
            "startswith" => Some(StringFunction::StartsWith),
            "endswith" => Some(StringFunction::EndsWith),
            "contains" => Some(StringFunction::Contains),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StringFunction::StartsWith => "startswith",
            StringFunction::EndsWith => "endswith",
            StringFunction::Contains => "contains",
        }
    }
}

// Canonical rendering. Parsing the output again yields an equal tree.

impl<F: fmt::Display> fmt::Display for FilterNode<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterNode::Comparison {
                field,
                operator,
                literal,
            } => write!(f, "{field} {} {literal}", operator.keyword()),
            FilterNode::Logical {
                operator,
                left,
                right,
            } => write!(f, "({left} {} {right})", operator.keyword()),
            FilterNode::FunctionCall {
                function,
                field,
                literal,
            } => write!(f, "{}({field},{literal})", function.name()),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Literal::Number(n) => write!(f, "{n}"),
            Literal::Boolean(b) => write!(f, "{b}"),
        }
    }
}
