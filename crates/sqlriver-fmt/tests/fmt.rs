use pretty_assertions::assert_eq;
use sqlriver_fmt::{format_source, Options};
use sqlriver_syntax::{Dialect, ParseOptions};
use test_case::test_case;

fn fmt(src: &str) -> String {
    format_source(src, &Options::default(), ParseOptions::default()).unwrap()
}

fn fmt_dialect(src: &str, dialect: Dialect) -> String {
    format_source(
        src,
        &Options::default(),
        ParseOptions::default().dialect(dialect),
    )
    .unwrap()
}

macro_rules! assert_fmt {
    ($src:expr, $expected:expr) => {{
        assert_eq!(fmt($src), $expected);
    }};
}

#[test]
fn river_aligns_clause_keywords() {
    assert_fmt!(
        "select 1, 2 from t where x = 1;",
        "SELECT 1,\n       2\n  FROM t\n WHERE x = 1;\n"
    );
}

#[test]
fn select_with_joins_and_grouping() {
    assert_fmt!(
        "select count(*) as total from orders o join customers c on c.id = o.customer_id group by c.region;",
        "SELECT count(*) AS total\n  FROM orders AS o\n  JOIN customers AS c ON c.id = o.customer_id\n GROUP BY c.region;\n"
    );
}

#[test]
fn union_members_stack_at_the_margin() {
    assert_fmt!(
        "SELECT 1 UNION ALL SELECT 2 ORDER BY 1;",
        "SELECT 1\nUNION ALL\nSELECT 2\nORDER BY 1;\n"
    );
}

#[test]
fn insert_values_river() {
    assert_fmt!(
        "insert into t (a) values (1) returning id;",
        "   INSERT INTO t (a)\n   VALUES (1)\nRETURNING id;\n"
    );
}

#[test]
fn update_sets_align() {
    assert_fmt!(
        "update accounts set balance = balance - 100 where id = 1;",
        "UPDATE accounts\n   SET balance = balance - 100\n WHERE id = 1;\n"
    );
}

#[test]
fn create_table_elements_indent() {
    assert_fmt!(
        "create table t (id int primary key, name varchar(255));",
        "CREATE TABLE t (\n  id int primary key,\n  name varchar(255)\n);\n"
    );
}

#[test]
fn leading_comments_stay_on_top() {
    assert_fmt!("-- note\nselect 1;", "-- note\nSELECT 1;\n");
}

#[test]
fn trailing_comment_stays_after_the_terminator() {
    assert_fmt!("select 1; -- done\n", "SELECT 1; -- done\n");
}

#[test]
fn column_trailing_comments_stay_on_their_line() {
    assert_fmt!(
        "select a, -- first\n b from t;",
        "SELECT a, -- first\n       b\n  FROM t;\n"
    );
}

#[test]
fn raw_statements_pass_through_unchanged() {
    assert_fmt!("FLUSH PRIVILEGES;", "FLUSH PRIVILEGES;\n");
    assert_fmt!("BEGIN;", "BEGIN;\n");
}

#[test]
fn blank_lines_between_statements_survive_capped() {
    assert_fmt!(
        "SELECT 1;\n\n\n\n\nSELECT 2;",
        "SELECT 1;\n\n\nSELECT 2;\n"
    );
}

#[test]
fn cte_bodies_indent() {
    assert_fmt!(
        "with c as (select 1) select * from c;",
        "WITH c AS (\n  SELECT 1\n)\nSELECT *\n  FROM c;\n"
    );
}

#[test]
fn explain_prefixes_the_target() {
    assert_fmt!("explain analyze select 1;", "EXPLAIN analyze\nSELECT 1;\n");
}

#[test]
fn lowercase_keyword_option() {
    let options = Options {
        uppercase_keywords: false,
        ..Options::default()
    };
    let out = format_source("SELECT 1 FROM t;", &options, ParseOptions::default()).unwrap();
    assert_eq!(out, "select 1\n  from t;\n");
}

#[test_case("simple", Dialect::Ansi, include_str!("../../../testdata/simple.sql"))]
#[test_case("cte", Dialect::Ansi, include_str!("../../../testdata/cte.sql"))]
#[test_case("dml", Dialect::Ansi, include_str!("../../../testdata/dml.sql"))]
#[test_case("ddl", Dialect::Ansi, include_str!("../../../testdata/ddl.sql"))]
#[test_case("expressions", Dialect::Ansi, include_str!("../../../testdata/expressions.sql"))]
#[test_case("window", Dialect::Ansi, include_str!("../../../testdata/window.sql"))]
#[test_case("union", Dialect::Ansi, include_str!("../../../testdata/union.sql"))]
#[test_case("comments", Dialect::Ansi, include_str!("../../../testdata/comments.sql"))]
#[test_case("postgres", Dialect::Postgres, include_str!("../../../testdata/postgres.sql"))]
#[test_case("mysql", Dialect::Mysql, include_str!("../../../testdata/mysql.sql"))]
#[test_case("tsql", Dialect::Tsql, include_str!("../../../testdata/tsql.sql"))]
fn formatting_is_idempotent(name: &str, dialect: Dialect, src: &str) {
    let once = fmt_dialect(src, dialect);
    let twice = fmt_dialect(&once, dialect);
    assert_eq!(once, twice, "formatting {name} is not a fixed point");
}
