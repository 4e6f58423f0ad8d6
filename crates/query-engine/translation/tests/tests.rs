mod common;

use common::{compile, describe, string};
use query_engine_metadata::metadata::ScalarType;
use query_engine_sql::sql::string::Param;
use query_engine_translation::translation::error::{ErrorKind, Parameter};
use query_engine_translation::translation::filter::SyntaxError;
use query_engine_translation::translation::query;

const DEFAULT_ORDER: &str =
    r#" ORDER BY "sku_products"."sku" ASC, "sku_products"."product_id" ASC"#;

const ALL_FIELDS: &str = r#"SELECT "sku_products"."sku" AS "sku", "sku_products"."product_id" AS "productList.productId", "sku_products"."metadata" AS "productList.metadata" FROM "sku_products""#;

#[test]
fn filter_top_and_select() {
    let plan = compile(
        "$filter=(sku eq '12345678') and (productList.metadata.color eq 'red')&$top=10&$select=sku",
    )
    .unwrap();
    assert_eq!(plan.count, None);
    let data = plan.data.unwrap();

    insta::assert_snapshot!(describe(&data), @r###"
SELECT "sku_products"."sku" AS "sku" FROM "sku_products" WHERE (("sku_products"."sku" = $1) AND (("sku_products"."metadata" ->> 'color') = $2)) ORDER BY "sku_products"."sku" ASC, "sku_products"."product_id" ASC LIMIT 10

[(1, String("12345678")), (2, String("red"))]
"###);
}

#[test]
fn startswith_binds_a_prefix_pattern() {
    let data = compile("$filter=startswith(sku,'m')").unwrap().data.unwrap();
    similar_asserts::assert_eq!(
        data.sql,
        format!(
            r#"{ALL_FIELDS} WHERE ("sku_products"."sku" LIKE $1 ESCAPE '\'){DEFAULT_ORDER}"#
        )
    );
    assert_eq!(data.params, vec![string("m%")]);
}

#[test]
fn like_wildcards_in_literals_are_escaped() {
    let data = compile("$filter=contains(productList.metadata.name,'100%25_sure')")
        .unwrap()
        .data
        .unwrap();
    assert_eq!(data.params, vec![string("%100\\%\\_sure%")]);
}

#[test]
fn coerced_comparisons_bind_typed_parameters() {
    let data = compile(
        "$filter=productList.metadata.weight ge 2.5 or productList.metadata.active eq false",
    )
    .unwrap()
    .data
    .unwrap();
    similar_asserts::assert_eq!(
        data.sql,
        format!(
            r#"{ALL_FIELDS} WHERE (((CASE WHEN jsonb_typeof("sku_products"."metadata" -> 'weight') = 'number' THEN CAST(("sku_products"."metadata" ->> 'weight') AS double precision) END) >= $1) OR ((CASE WHEN jsonb_typeof("sku_products"."metadata" -> 'active') = 'boolean' THEN CAST(("sku_products"."metadata" ->> 'active') AS boolean) END) = $2)){DEFAULT_ORDER}"#
        )
    );
    assert_eq!(data.params, vec![Param::Float8(2.5), Param::Bool(false)]);
}

#[test]
fn numeric_comparisons_only_convert_numeric_members() {
    // {"size": 4} and {"size": "small"} may sit side by side; only the first converts
    let data = compile("$filter=productList.metadata.size gt 3")
        .unwrap()
        .data
        .unwrap();
    assert!(data.sql.contains(
        r#"WHERE ((CASE WHEN jsonb_typeof("sku_products"."metadata" -> 'size') = 'number' THEN CAST(("sku_products"."metadata" ->> 'size') AS double precision) END) > $1)"#
    ));
    assert!(!data.sql.contains(r#"CAST(("sku_products"."metadata" ->> 'size') AS double precision) >"#));
    assert_eq!(data.params, vec![Param::Float8(3.0)]);
}

#[test]
fn selected_metadata_members_keep_their_json_type() {
    let data = compile("$select=sku,productList.metadata.size&$filter=productList.metadata.size eq '4'")
        .unwrap()
        .data
        .unwrap();
    similar_asserts::assert_eq!(
        data.sql,
        format!(
            r#"SELECT "sku_products"."sku" AS "sku", ("sku_products"."metadata" -> 'size') AS "productList.metadata.size" FROM "sku_products" WHERE (("sku_products"."metadata" ->> 'size') = $1){DEFAULT_ORDER}"#
        )
    );
}

#[test]
fn paging_and_sorting() {
    let data = compile("$orderby=productList.metadata.price desc&$top=5&$skip=20")
        .unwrap()
        .data
        .unwrap();
    similar_asserts::assert_eq!(
        data.sql,
        format!(
            r#"{ALL_FIELDS} ORDER BY ("sku_products"."metadata" ->> 'price') DESC, "sku_products"."sku" ASC, "sku_products"."product_id" ASC LIMIT 5 OFFSET 20"#
        )
    );
}

#[test]
fn top_is_clamped_to_the_maximum() {
    let plan = query::translate("$top=500", &query::Options { max_top: 100 }).unwrap();
    assert_eq!(plan.top, Some(100));
}

#[test]
fn count_alone_skips_the_data_statement() {
    let plan = compile("$count&$filter=(sku eq '12345678')").unwrap();
    assert_eq!(plan.data, None);
    let count = plan.count.unwrap();
    similar_asserts::assert_eq!(
        count.sql,
        r#"SELECT COUNT(*) AS "count" FROM "sku_products" WHERE ("sku_products"."sku" = $1)"#
    );
    assert_eq!(count.params, vec![string("12345678")]);
}

#[test]
fn inline_count_ignores_paging() {
    let plan = compile("$top=0&$skip=3&$inlinecount=allpages&$orderby=sku desc").unwrap();
    similar_asserts::assert_eq!(
        plan.count.unwrap().sql,
        r#"SELECT COUNT(*) AS "count" FROM "sku_products""#
    );
    similar_asserts::assert_eq!(
        plan.data.unwrap().sql,
        format!(
            r#"{ALL_FIELDS} ORDER BY "sku_products"."sku" DESC, "sku_products"."product_id" ASC LIMIT 0 OFFSET 3"#
        )
    );
}

#[test]
fn count_with_inline_count_returns_both() {
    let plan = compile("$count=true&$inlinecount=allpages").unwrap();
    assert!(plan.count.is_some());
    assert!(plan.data.is_some());
}

#[test]
fn literals_never_reach_the_query_text() {
    let hostile = [
        "x' OR 1=1 --",
        "'; DROP TABLE sku_products; --",
        "50%_off",
        "back\\slash",
    ];
    for literal in hostile {
        let quoted = literal.replace('\'', "''");
        let filter = format!(
            "sku eq '{quoted}' or endswith(productList.metadata.note,'{quoted}')"
        );
        let encoded: String = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("$filter", &filter)
            .append_pair("$inlinecount", "allpages")
            .finish();
        let plan = compile(&encoded).unwrap();
        for statement in plan.statements() {
            assert!(
                !statement.sql.contains(literal),
                "{literal} leaked into {}",
                statement.sql
            );
            assert_eq!(statement.params[0], string(literal));
        }
    }
}

#[test]
fn unknown_fields_are_reported() {
    let error = compile("$filter=(bogus eq 'x')").unwrap_err();
    assert_eq!(error.parameter, Parameter::Filter);
    assert_eq!(error.kind, ErrorKind::UnknownField("bogus".to_string()));
}

#[test]
fn metadata_keys_outside_the_character_class_are_unknown() {
    let error = compile("$filter=productList.metadata.a-b eq 'x'").unwrap_err();
    assert_eq!(
        error.kind,
        ErrorKind::UnknownField("productList.metadata.a-b".to_string())
    );
}

#[test]
fn duplicate_sort_fields_are_reported() {
    let error = compile("$orderby=sku desc,sku asc").unwrap_err();
    assert_eq!(error.parameter, Parameter::OrderBy);
    assert_eq!(error.kind, ErrorKind::DuplicateSortField("sku".to_string()));
}

#[test]
fn syntax_errors_carry_positions() {
    let error = compile("$filter=sku eq 'x')").unwrap_err();
    assert_eq!(
        error.kind,
        ErrorKind::SyntaxError(SyntaxError::new(10, "unmatched ')'"))
    );
}

#[test]
fn type_mismatches_are_reported() {
    let error = compile("$filter=productList.productId gt 3").unwrap_err();
    assert_eq!(
        error.kind,
        ErrorKind::TypeMismatch {
            field: "productList.productId".to_string(),
            expected: ScalarType::String,
            found: ScalarType::Number,
        }
    );
}

#[test]
fn malformed_system_parameters_are_reported() {
    for (raw, parameter) in [
        ("$top=-1", Parameter::Top),
        ("$skip=x", Parameter::Skip),
        ("$count=maybe", Parameter::Count),
        ("$inlinecount=some", Parameter::InlineCount),
        ("$select=", Parameter::Select),
        ("$orderby=sku up", Parameter::OrderBy),
        ("$filter=a&$filter=b", Parameter::Filter),
    ] {
        let error = compile(raw).unwrap_err();
        assert_eq!(error.parameter, parameter, "{raw}");
        assert!(matches!(error.kind, ErrorKind::InvalidParameter(_)), "{raw}");
    }
}

#[test]
fn restricting_to_a_product() {
    let plan = query::translate("$select=productList.metadata", &query::Options::default())
        .unwrap()
        .restrict_to_product("p-1");
    let data = query::compile(&plan).data.unwrap();
    similar_asserts::assert_eq!(
        data.sql,
        format!(
            r#"SELECT "sku_products"."sku" AS "sku", "sku_products"."metadata" AS "productList.metadata" FROM "sku_products" WHERE ("sku_products"."product_id" = $1){DEFAULT_ORDER}"#
        )
    );
    assert_eq!(data.params, vec![string("p-1")]);
}
