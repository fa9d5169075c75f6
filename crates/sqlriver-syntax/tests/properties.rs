//! Cross-cutting invariants: token coverage, offset monotonicity, raw
//! round-trips and bounded-work guarantees.

use pretty_assertions::assert_eq;
use sqlriver_syntax::ast::{RawReason, StatementKind};
use sqlriver_syntax::{parse, tokenize, Dialect, Error, ParseOptions, TokenizeOptions};
use test_case::test_case;

const CORPUS: &[(&str, Dialect, &str)] = &[
    ("simple", Dialect::Ansi, include_str!("../../../testdata/simple.sql")),
    ("cte", Dialect::Ansi, include_str!("../../../testdata/cte.sql")),
    ("dml", Dialect::Ansi, include_str!("../../../testdata/dml.sql")),
    ("ddl", Dialect::Ansi, include_str!("../../../testdata/ddl.sql")),
    (
        "expressions",
        Dialect::Ansi,
        include_str!("../../../testdata/expressions.sql"),
    ),
    ("window", Dialect::Ansi, include_str!("../../../testdata/window.sql")),
    ("union", Dialect::Ansi, include_str!("../../../testdata/union.sql")),
    ("comments", Dialect::Ansi, include_str!("../../../testdata/comments.sql")),
    (
        "postgres",
        Dialect::Postgres,
        include_str!("../../../testdata/postgres.sql"),
    ),
    ("mysql", Dialect::Mysql, include_str!("../../../testdata/mysql.sql")),
    ("tsql", Dialect::Tsql, include_str!("../../../testdata/tsql.sql")),
];

fn tokenize_options(dialect: Dialect) -> TokenizeOptions {
    TokenizeOptions {
        dialect,
        ..TokenizeOptions::default()
    }
}

#[test]
fn token_values_cover_the_source() {
    for (name, dialect, src) in CORPUS {
        let tokens = tokenize(src, &tokenize_options(*dialect)).unwrap();
        let rebuilt: String = tokens.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(&rebuilt, src, "coverage broken for {name}");
    }
}

#[test]
fn token_offsets_are_monotonic() {
    for (name, dialect, src) in CORPUS {
        let tokens = tokenize(src, &tokenize_options(*dialect)).unwrap();
        for pair in tokens.windows(2) {
            assert!(
                pair[0].offset + pair[0].value.len() <= pair[1].offset,
                "offsets overlap in {name}: {:?} then {:?}",
                pair[0],
                pair[1]
            );
        }
    }
}

#[test_case("SELECT 1", 1; "no_trailing_semicolon")]
#[test_case("SELECT 1;", 1; "single_trailing_semicolon")]
#[test_case("SELECT 1; SELECT 2;", 2; "two_statements_spaced")]
#[test_case("SELECT 1;;SELECT 2", 2; "two_statements_extra_semicolon")]
#[test_case(";;", 0; "only_semicolons")]
fn statement_count_matches_regions(src: &str, expected: usize) {
    let statements = parse(src, ParseOptions::default().recover(false)).unwrap();
    assert_eq!(statements.len(), expected, "for {src:?}");
}

#[test]
fn raw_nodes_round_trip_to_themselves() {
    let inputs = [
        ("SELECT FROM;", Dialect::Ansi),
        ("FLUSH PRIVILEGES;", Dialect::Ansi),
        ("BEGIN;", Dialect::Ansi),
        ("GO", Dialect::Tsql),
        ("SET search_path TO app;", Dialect::Postgres),
    ];
    for (src, dialect) in inputs {
        let statements = parse(src, ParseOptions::default().dialect(dialect)).unwrap();
        assert_eq!(statements.len(), 1, "for {src:?}");
        let raw = statements[0].as_raw().unwrap_or_else(|| {
            panic!("{src:?} should come back raw");
        });
        let reparsed = parse(&raw.text, ParseOptions::default().dialect(dialect)).unwrap();
        assert_eq!(reparsed.len(), 1, "raw {src:?} split on reparse");
        let reparsed_raw = reparsed[0].as_raw().expect("raw text must stay raw");
        assert_eq!(reparsed_raw.text, raw.text, "raw text drifted for {src:?}");
    }
}

#[test_case("((((((" ; "unbalanced parens")]
#[test_case("???" ; "stray operators")]
#[test_case("SELECT (" ; "dangling paren")]
#[test_case("WITH x AS" ; "half a cte")]
#[test_case("INSERT INTO" ; "half an insert")]
#[test_case("SELECT a FROM WHERE;" ; "missing table")]
#[test_case("CREATE TABLE (" ; "nameless table")]
#[test_case("{ fn now() }" ; "odbc escape")]
#[test_case("]] [[ ;;" ; "bracket soup")]
fn recovery_never_panics(src: &str) {
    match parse(src, ParseOptions::default()) {
        Ok(_) => {}
        Err(Error::Tokenize(_)) => {}
        Err(other) => panic!("unexpected error class for {src:?}: {other}"),
    }
}

#[test]
fn strict_success_implies_recover_equality() {
    for (name, dialect, src) in CORPUS {
        let strict = parse(src, ParseOptions::default().dialect(*dialect).recover(false));
        let Ok(strict) = strict else {
            panic!("{name} failed strict parse");
        };
        let recovered = parse(src, ParseOptions::default().dialect(*dialect)).unwrap();
        assert_eq!(strict, recovered, "strict/recover divergence in {name}");
    }
}

#[test]
fn deep_nesting_errors_instead_of_overflowing() {
    let src = format!("SELECT {}1{};", "(".repeat(3000), ")".repeat(3000));
    let err = parse(&src, ParseOptions::default()).unwrap_err();
    match err {
        Error::Parse(e) => assert!(e.is_depth_limit()),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn token_budget_bounds_work() {
    let src = "SELECT 1;".repeat(10);
    let err = parse(
        &src,
        ParseOptions {
            max_token_count: 10,
            ..ParseOptions::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, Error::Tokenize(_)));
}

#[test]
fn oversized_input_is_rejected_before_tokenizing() {
    let err = parse(
        "SELECT 1;",
        ParseOptions {
            max_input_size: 4,
            ..ParseOptions::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, Error::InputTooLarge { .. }));
}

#[test]
fn statements_preserve_source_order() {
    let statements = parse("SELECT 3; SELECT 1; SELECT 2;", ParseOptions::default()).unwrap();
    let literals: Vec<String> = statements
        .iter()
        .map(|s| match &s.kind {
            StatementKind::Select(select) => format!("{:?}", select.columns[0].expr),
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(literals.len(), 3);
    assert!(literals[0].contains('3'));
    assert!(literals[1].contains('1'));
    assert!(literals[2].contains('2'));
}

#[test]
fn unparseable_text_never_vanishes() {
    let statements = parse("SELECT FROM; ??; SELECT 1;", ParseOptions::default()).unwrap();
    let raw_reasons: Vec<RawReason> = statements
        .iter()
        .filter_map(|s| s.as_raw().map(|r| r.reason))
        .collect();
    assert_eq!(raw_reasons.len(), 2);
    let rebuilt: Vec<&str> = statements
        .iter()
        .filter_map(|s| s.as_raw().map(|r| r.text.as_str()))
        .collect();
    assert_eq!(rebuilt, vec!["SELECT FROM;", "??;"]);
}
