use query_engine_sql::sql::ast::*;
use query_engine_sql::sql::convert::select_to_sql;
use query_engine_sql::sql::helpers;
use query_engine_sql::sql::string::{Param, SQL};

fn table() -> TableReference {
    helpers::table_reference("bamba")
}

fn from_table() -> From {
    From::Table {
        reference: table(),
    }
}

#[test]
fn it_converts_simple_select() {
    let select = helpers::simple_select(
        vec![(
            helpers::make_column_alias("x".to_string()),
            helpers::make_column(table(), "x"),
        )],
        from_table(),
    );
    similar_asserts::assert_eq!(
        select_to_sql(&select),
        SQL {
            sql: r#"SELECT "bamba"."x" AS "x" FROM "bamba""#.to_string(),
            params: vec![],
        }
    );
}

#[test]
fn it_numbers_parameters_in_order() {
    let mut select = helpers::simple_select(
        vec![(
            helpers::make_column_alias("x".to_string()),
            helpers::make_column(table(), "x"),
        )],
        from_table(),
    );
    select.where_ = Where(Expression::Or {
        left: Box::new(Expression::BinaryOperation {
            left: Box::new(helpers::make_column(table(), "x")),
            operator: BinaryOperator::NotEquals,
            right: Box::new(Expression::Value(Value::String("a".to_string()))),
        }),
        right: Box::new(Expression::BinaryOperation {
            left: Box::new(Expression::TypedJsonField {
                expression: Box::new(helpers::make_column(table(), "doc")),
                key: JsonKey::new("weight").unwrap(),
                r#type: ScalarType::DoublePrecision,
            }),
            operator: BinaryOperator::GreaterThanOrEqualTo,
            right: Box::new(Expression::Value(Value::Float8(2.5))),
        }),
    });
    select.limit = Limit {
        limit: Some(5),
        offset: Some(10),
    };

    let sql = select_to_sql(&select);
    insta::assert_snapshot!(
        sql.sql,
        @r#"SELECT "bamba"."x" AS "x" FROM "bamba" WHERE (("bamba"."x" <> $1) OR ((CASE WHEN jsonb_typeof("bamba"."doc" -> 'weight') = 'number' THEN CAST(("bamba"."doc" ->> 'weight') AS double precision) END) >= $2)) LIMIT 5 OFFSET 10"#
    );
    assert_eq!(
        sql.params,
        vec![Param::String("a".to_string()), Param::Float8(2.5)]
    );
}

#[test]
fn it_renders_like_with_an_escape_character() {
    let mut select = helpers::simple_select(
        vec![(
            helpers::make_column_alias("x".to_string()),
            helpers::make_column(table(), "x"),
        )],
        from_table(),
    );
    select.where_ = Where(Expression::Like {
        expression: Box::new(helpers::make_column(table(), "x")),
        pattern: Box::new(Expression::Value(Value::String("m%".to_string()))),
    });

    let sql = select_to_sql(&select);
    assert_eq!(
        sql.sql,
        r#"SELECT "bamba"."x" AS "x" FROM "bamba" WHERE ("bamba"."x" LIKE $1 ESCAPE '\')"#
    );
    assert_eq!(sql.params, vec![Param::String("m%".to_string())]);
}

#[test]
fn it_omits_the_trivial_where_clause() {
    let select = helpers::count_select(from_table(), Where(helpers::empty_where()));
    assert_eq!(
        select_to_sql(&select).sql,
        r#"SELECT COUNT(*) AS "count" FROM "bamba""#
    );
}

#[test]
fn it_escapes_quotes_in_identifiers() {
    let select = helpers::simple_select(
        vec![(
            helpers::make_column_alias("we\"ird".to_string()),
            helpers::make_column(table(), "x"),
        )],
        from_table(),
    );
    assert_eq!(
        select_to_sql(&select).sql,
        r#"SELECT "bamba"."x" AS "we""ird" FROM "bamba""#
    );
}

#[test]
fn json_keys_are_restricted() {
    assert!(JsonKey::new("color_2").is_some());
    assert!(JsonKey::new("").is_none());
    assert!(JsonKey::new("a'b").is_none());
    assert!(JsonKey::new("a b").is_none());
}

#[test]
fn order_by_renders_directions() {
    let mut select = helpers::simple_select(
        vec![(
            helpers::make_column_alias("x".to_string()),
            helpers::make_column(table(), "x"),
        )],
        from_table(),
    );
    select.order_by = OrderBy {
        elements: vec![
            OrderByElement {
                target: helpers::make_column(table(), "x"),
                direction: OrderByDirection::Desc,
            },
            OrderByElement {
                target: helpers::make_column(table(), "y"),
                direction: OrderByDirection::Asc,
            },
        ],
    };
    assert_eq!(
        select_to_sql(&select).sql,
        r#"SELECT "bamba"."x" AS "x" FROM "bamba" ORDER BY "bamba"."x" DESC, "bamba"."y" ASC"#
    );
}

#[test]
fn it_projects_json_members_as_json() {
    let select = helpers::simple_select(
        vec![(
            helpers::make_column_alias("doc.active".to_string()),
            Expression::JsonField {
                expression: Box::new(helpers::make_column(table(), "doc")),
                key: JsonKey::new("active").unwrap(),
            },
        )],
        from_table(),
    );
    assert_eq!(
        select_to_sql(&select).sql,
        r#"SELECT ("bamba"."doc" -> 'active') AS "doc.active" FROM "bamba""#
    );
}

#[test]
fn it_guards_conversions_of_json_members_by_type() {
    let mut select = helpers::simple_select(
        vec![(
            helpers::make_column_alias("x".to_string()),
            helpers::make_column(table(), "x"),
        )],
        from_table(),
    );
    select.where_ = Where(Expression::BinaryOperation {
        left: Box::new(Expression::TypedJsonField {
            expression: Box::new(helpers::make_column(table(), "doc")),
            key: JsonKey::new("active").unwrap(),
            r#type: ScalarType::Boolean,
        }),
        operator: BinaryOperator::Equals,
        right: Box::new(Expression::Value(Value::BoundBool(true))),
    });

    let sql = select_to_sql(&select);
    assert_eq!(
        sql.sql,
        r#"SELECT "bamba"."x" AS "x" FROM "bamba" WHERE ((CASE WHEN jsonb_typeof("bamba"."doc" -> 'active') = 'boolean' THEN CAST(("bamba"."doc" ->> 'active') AS boolean) END) = $1)"#
    );
    assert_eq!(sql.params, vec![Param::Bool(true)]);
}
