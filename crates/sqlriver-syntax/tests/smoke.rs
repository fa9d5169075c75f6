use sqlriver_syntax::ast::RawReason;
use sqlriver_syntax::{parse, Dialect, ParseOptions};
use test_case::test_case;

fn options(dialect: Dialect) -> ParseOptions {
    ParseOptions {
        dialect,
        recover: false,
        ..ParseOptions::default()
    }
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
fn parse_valid(name: &str, dialect: Dialect, src: &str) {
    let statements = parse(src, options(dialect))
        .unwrap_or_else(|e| panic!("{name}: strict parse failed: {e}"));
    assert!(!statements.is_empty(), "{name}: no statements parsed");
    for statement in &statements {
        if let Some(raw) = statement.as_raw() {
            assert_ne!(
                raw.reason,
                RawReason::ParseError,
                "{name}: unexpected recovery in strict corpus: {:?}",
                raw.text
            );
        }
    }
}
