//! End-to-end rendering scenarios across products.

use sqlparser::dialect::{
    BigQueryDialect, GenericDialect, MsSqlDialect, MySqlDialect, PostgreSqlDialect,
    SnowflakeDialect,
};
use sqlparser::parser::Parser;

use sqlshift::prelude::*;
use sqlshift::sql::dialect::ScaleRange;
use sqlshift::sql::node::{
    ceil_to, cube, dense_rank, grouping_sets, lag, lead, ntile, position, rank, rollup, trim,
};

fn profile(dialect: Dialect) -> DialectProfile {
    DialectProfile::new(dialect, None).unwrap()
}

fn render(dialect: Dialect, node: &Node) -> String {
    unparse(&profile(dialect), node).unwrap()
}

fn parses(sql: &str, dialect: &dyn sqlparser::dialect::Dialect) {
    if let Err(e) = Parser::parse_sql(dialect, sql) {
        panic!("failed to parse:\n{sql}\n{e}");
    }
}

fn sales_report() -> Query {
    Query::new()
        .select(vec![SelectItem::from(col("region")), sum(col("amount")).alias("total")])
        .from(TableRef::new("sales"))
        .filter(col("sale_year").eq(2024))
        .group_by(vec![col("region")])
        .order_by(vec![OrderItem::desc(col("total"))])
        .limit(10)
}

// =============================================================================
// Operand reordering
// =============================================================================

#[test]
fn test_position_reorders_operands() {
    let expr = position(lit_str("A"), lit_str("ABC"), None);
    assert_eq!(render(Dialect::Hive, &expr), "INSTR('ABC', 'A')");
    assert_eq!(render(Dialect::BigQuery, &expr), "STRPOS('ABC', 'A')");
    assert_eq!(render(Dialect::Ansi, &expr), "POSITION('A' IN 'ABC')");
}

#[test]
fn test_position_with_start_needs_three_operand_target() {
    let expr = position(lit_str("A"), col("s"), Some(lit_int(2)));
    let err = unparse(&profile(Dialect::BigQuery), &expr).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::UnsupportedEmulation);
    assert!(unparse(&profile(Dialect::Hive), &expr).is_ok());
}

// =============================================================================
// TRIM
// =============================================================================

#[test]
fn test_trim_leading_characters() {
    let expr = trim(TrimFlag::Leading, "A", col("col"));
    assert_eq!(render(Dialect::BigQuery, &expr), "LTRIM(col, 'A')");
    assert_eq!(render(Dialect::Hive, &expr), "REGEXP_REPLACE(col, '^(A)*', '')");
    assert_eq!(render(Dialect::Ansi, &expr), "TRIM(LEADING 'A' FROM \"col\")");
}

#[test]
fn test_trim_whitespace_uses_plain_functions() {
    let expr = trim(TrimFlag::Trailing, " ", col("col"));
    assert_eq!(render(Dialect::Hive, &expr), "RTRIM(col)");
    assert_eq!(render(Dialect::Spark, &expr), "RTRIM(`col`)");
    assert_eq!(render(Dialect::BigQuery, &expr), "RTRIM(col)");
}

// =============================================================================
// Null ordering
// =============================================================================

#[test]
fn test_nulls_first_on_descending_key() {
    let query = Query::new()
        .select(vec![col("c")])
        .from(TableRef::new("t"))
        .order_by(vec![OrderItem::desc(col("c")).nulls_first()]);

    let mysql = query.to_sql(&profile(Dialect::MySql)).unwrap();
    assert!(mysql.ends_with("ORDER BY `c` IS NULL DESC, `c` DESC"), "{mysql}");

    let postgres = query.to_sql(&profile(Dialect::Postgres)).unwrap();
    assert!(postgres.ends_with("ORDER BY \"c\" DESC"), "{postgres}");
}

#[test]
fn test_native_collation_adds_no_sort_key() {
    let query = Query::new()
        .select(vec![col("c")])
        .from(TableRef::new("t"))
        .order_by(vec![OrderItem::asc(col("c")).nulls_first()]);
    // NULLs sort low on MySQL, so ascending already puts them first
    let mysql = query.to_sql(&profile(Dialect::MySql)).unwrap();
    assert!(mysql.ends_with("ORDER BY `c`"), "{mysql}");
}

// =============================================================================
// GROUP BY lowering
// =============================================================================

#[test]
fn test_single_column_cube_is_rollup_everywhere() {
    for dialect in Dialect::ALL {
        let p = profile(*dialect);
        assert_eq!(
            unparse(&p, &cube(vec![col("product_class_id")])),
            unparse(&p, &rollup(vec![col("product_class_id")])),
            "{dialect}"
        );
    }
}

// =============================================================================
// Numeric scale
// =============================================================================

#[test]
fn test_truncate_rewrites_clamp_scale() {
    let range = ScaleRange::new(-12, 38).unwrap();
    let truncate = sqlshift::sql::node::truncate(col("x"), Some(lit_int(99)));
    let round = sqlshift::sql::node::round(col("x"), Some(lit_int(99)));
    for (dialect, truncated, rounded) in [
        (Dialect::Oracle, "TRUNC(\"x\", 38)", "ROUND(\"x\", 38)"),
        (Dialect::Postgres, "TRUNC(\"x\", 38)", "ROUND(\"x\", 38)"),
        (Dialect::TSql, "ROUND([x], 38, 1)", "ROUND([x], 38)"),
        (Dialect::BigQuery, "TRUNC(x, 38)", "ROUND(x, 38)"),
    ] {
        let p = profile(dialect).with_numeric_scale_range(range);
        assert_eq!(unparse(&p, &truncate).unwrap(), truncated, "{dialect}");
        assert_eq!(unparse(&p, &round).unwrap(), rounded, "{dialect}");
    }
}

#[test]
fn test_truncate_column_scale_is_bounded() {
    let range = ScaleRange::new(-12, 38).unwrap();
    let p = profile(Dialect::Oracle).with_numeric_scale_range(range);
    let sql = unparse(&p, &sqlshift::sql::node::truncate(col("x"), Some(col("s")))).unwrap();
    assert!(sql.starts_with("TRUNC(\"x\", CASE"), "{sql}");
}

// =============================================================================
// Literals
// =============================================================================

#[test]
fn test_empty_string_literal_everywhere() {
    for dialect in Dialect::ALL {
        let p = profile(*dialect);
        let sql = unparse(&p, &lit_str("")).unwrap();
        assert_eq!(sql, "''", "{dialect}");
        assert_eq!(p.unquote_string(&sql).as_deref(), Some(""), "{dialect}");
    }
}

#[test]
fn test_quote_in_string_literal() {
    assert_eq!(render(Dialect::Postgres, &lit_str("it's")), "'it''s'");
    assert_eq!(render(Dialect::MySql, &lit_str("it's")), "'it\\'s'");
}

// =============================================================================
// Whole queries
// =============================================================================

#[test]
fn test_sales_report_mysql() {
    let sql = sales_report().to_sql(&profile(Dialect::MySql)).unwrap();
    parses(&sql, &MySqlDialect {});
    insta::assert_snapshot!(sql, @r"
    SELECT `region`, SUM(`amount`) AS `total`
    FROM `sales`
    WHERE `sale_year` = 2024
    GROUP BY `region`
    ORDER BY `total` DESC
    LIMIT 10
    ");
}

#[test]
fn test_sales_report_mssql() {
    let sql = sales_report().to_sql(&profile(Dialect::TSql)).unwrap();
    parses(&sql, &MsSqlDialect {});
    insta::assert_snapshot!(sql, @r"
    SELECT TOP (10) [region], SUM([amount]) AS [total]
    FROM [sales]
    WHERE [sale_year] = 2024
    GROUP BY [region]
    ORDER BY [total] DESC
    ");
}

#[test]
fn test_sales_report_parses_elsewhere() {
    let query = sales_report();
    parses(&query.to_sql(&profile(Dialect::Postgres)).unwrap(), &PostgreSqlDialect {});
    parses(&query.to_sql(&profile(Dialect::Snowflake)).unwrap(), &SnowflakeDialect {});
    parses(&query.to_sql(&profile(Dialect::BigQuery)).unwrap(), &BigQueryDialect {});
    parses(&query.to_sql(&profile(Dialect::Ansi)).unwrap(), &GenericDialect {});
}

#[test]
fn test_joins_and_rankings_parse() {
    let recent = Query::new()
        .select(vec![col("id"), col("customer_id")])
        .from(TableRef::new("orders"))
        .filter(col("status").eq("open"));
    let query = Query::new()
        .select(vec![
            SelectItem::from(table_col("o", "id")),
            rank().over().order_by(vec![OrderItem::desc(col("amount"))]).build().alias("r"),
            dense_rank().over().order_by(vec![OrderItem::asc(col("amount"))]).build().alias("dr"),
            ntile(4).over().order_by(vec![OrderItem::asc(col("amount"))]).build().alias("q"),
            lag(col("amount"), 1).over().order_by(vec![OrderItem::asc(col("id"))]).build().alias("prev"),
            lead(col("amount"), 1).over().order_by(vec![OrderItem::asc(col("id"))]).build().alias("next"),
        ])
        .from(TableRef::subquery(recent).with_alias("o"))
        .left_join(
            TableRef::new("customers").with_alias("c"),
            table_col("o", "customer_id").eq(table_col("c", "id")),
        )
        .right_join(
            TableRef::new("regions").with_alias("r2"),
            table_col("c", "region_id").eq(table_col("r2", "id")),
        )
        .cross_join(TableRef::new("calendar"));

    let sql = query.to_sql(&profile(Dialect::Postgres)).unwrap();
    assert!(sql.contains("LEFT JOIN"), "{sql}");
    assert!(sql.contains("RIGHT JOIN"), "{sql}");
    assert!(sql.contains("CROSS JOIN"), "{sql}");
    parses(&sql, &PostgreSqlDialect {});
    parses(&query.to_sql(&profile(Dialect::MySql)).unwrap(), &MySqlDialect {});
}

#[test]
fn test_grouping_sets_parse() {
    let query = Query::new()
        .select(vec![col("region"), col("product")])
        .from(TableRef::new("sales"))
        .group_by(vec![grouping_sets(vec![col("region"), col("product")])]);
    let sql = query.to_sql(&profile(Dialect::Postgres)).unwrap();
    assert!(sql.contains("GROUPING SETS"), "{sql}");
    parses(&sql, &PostgreSqlDialect {});
}

#[test]
fn test_ceil_to_unit_needs_feature() {
    let expr = ceil_to(col("ts"), TimeUnit::Day);
    let sql = render(Dialect::Ansi, &expr);
    assert!(sql.starts_with("CEIL(") && sql.contains("TO"), "{sql}");
    let err = unparse(&profile(Dialect::MySql), &expr).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::UnsupportedEmulation);
}

#[test]
fn test_version_changes_pagination() {
    let query = Query::new()
        .select(vec![col("a")])
        .from(TableRef::new("t"))
        .order_by(vec![OrderItem::asc(col("a"))])
        .offset(20)
        .limit(10);

    let oracle_12 = DialectProfile::for_name("oracle", Some("12")).unwrap();
    assert_eq!(
        query.to_sql(&oracle_12).unwrap(),
        "SELECT \"a\"\nFROM \"t\"\nORDER BY \"a\"\nOFFSET 20 ROWS\nFETCH NEXT 10 ROWS ONLY"
    );
    let oracle_11 = DialectProfile::for_name("oracle", Some("11")).unwrap();
    let err = query.to_sql(&oracle_11).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::UnsupportedEmulation);
}

#[test]
fn test_row_counts_above_i64_range() {
    let query = Query::new()
        .select(vec![col("id")])
        .from(TableRef::new("t"))
        .limit(u64::MAX);
    assert_eq!(
        query.to_sql(&profile(Dialect::Postgres)).unwrap(),
        "SELECT \"id\"\nFROM \"t\"\nLIMIT 18446744073709551615"
    );
}

#[test]
fn test_unknown_product_is_configuration_error() {
    let err = DialectProfile::for_name("db2", None).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownProduct(_)));
    let err: UnparseError = err.into();
    assert_eq!(err.category(), ErrorCategory::Configuration);
}
