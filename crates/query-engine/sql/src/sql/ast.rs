//! Type definitions of a SQL AST representation.

/// A SELECT clause
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub select_list: SelectList,
    pub from: Option<From>,
    pub where_: Where,
    pub order_by: OrderBy,
    pub limit: Limit,
}

/// A select list
#[derive(Debug, Clone, PartialEq)]
pub enum SelectList {
    SelectList(Vec<(ColumnAlias, Expression)>),
}

/// A FROM clause
#[derive(Debug, Clone, PartialEq)]
pub enum From {
    /// Select from a table reference
    Table { reference: TableReference },
}

/// A WHERE clause
#[derive(Debug, Clone, PartialEq)]
pub struct Where(pub Expression);

/// An ORDER BY clause
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub elements: Vec<OrderByElement>,
}

/// A single element in an ORDER BY clause
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByElement {
    pub target: Expression,
    pub direction: OrderByDirection,
}

/// A direction for a single ORDER BY element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderByDirection {
    Asc,
    Desc,
}

/// LIMIT and OFFSET clauses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limit {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// A scalar expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// AND clause
    And {
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// OR clause
    Or {
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// A binary operation on two scalar expression
    BinaryOperation {
        left: Box<Expression>,
        operator: BinaryOperator,
        right: Box<Expression>,
    },
    /// A LIKE predicate. Backslash is the escape character of the pattern.
    Like {
        expression: Box<Expression>,
        pattern: Box<Expression>,
    },
    /// Text extraction of a single key from a JSON value: `expr ->> 'key'`
    JsonTextField {
        expression: Box<Expression>,
        key: JsonKey,
    },
    /// A single member of a JSON object, kept as JSON: `expr -> 'key'`
    JsonField {
        expression: Box<Expression>,
        key: JsonKey,
    },
    /// A JSON object member converted to a SQL type. NULL when the member is missing
    /// or holds a value of another JSON type, so the conversion itself never fails.
    TypedJsonField {
        expression: Box<Expression>,
        key: JsonKey,
        r#type: ScalarType,
    },
    /// A COUNT clause
    Count(CountType),
    /// A column reference
    ColumnReference(ColumnReference),
    /// An irreducible value
    Value(Value),
}

/// A comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanOrEqualTo,
    LessThan,
    LessThanOrEqualTo,
}

/// Types we convert JSON members to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    DoublePrecision,
    Boolean,
}

impl ScalarType {
    /// What `jsonb_typeof` reports for members holding this type.
    pub fn json_type_name(self) -> &'static str {
        match self {
            ScalarType::DoublePrecision => "number",
            ScalarType::Boolean => "boolean",
        }
    }
}

/// COUNT clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountType {
    Star,
}

/// Value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A constant we write into the query text, used for empty clauses.
    Bool(bool),
    /// Bound as a parameter.
    String(String),
    /// Bound as a parameter.
    Float8(f64),
    /// A boolean supplied by a client. Bound as a parameter.
    BoundBool(bool),
}

/// A key of a JSON object which is safe to write into the query text.
///
/// Only `[A-Za-z0-9_]+` is accepted, so it never needs quoting or escaping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JsonKey(String);

impl JsonKey {
    pub fn new(key: &str) -> Option<JsonKey> {
        let valid = !key.is_empty() && key.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_');
        valid.then(|| JsonKey(key.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A database table name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName(pub String);

/// A reference to a table. Used when we want to query it,
/// for example in a FROM clause.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TableReference {
    /// refers to a db table object name
    DBTable { table: TableName },
}

/// A database table's column name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnName(pub String);

/// A reference to a column. Used when we want to query it,
/// for example in a SELECT list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnReference {
    /// refers to a db column object name
    TableColumn {
        table: TableReference,
        name: ColumnName,
    },
}

/// aliases that we give to columns
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnAlias {
    pub name: String,
}
