//! End-to-end parser behavior: statement shapes, recovery, comments,
//! depth and dialect handling.

use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use sqlriver_syntax::ast::*;
use sqlriver_syntax::{parse, Dialect, Error, ParseOptions};

fn parse_ok(src: &str) -> Vec<Statement> {
    parse(src, ParseOptions::default()).unwrap()
}

fn parse_strict(src: &str) -> Result<Vec<Statement>, Error> {
    parse(src, ParseOptions::default().recover(false))
}

fn parse_dialect(src: &str, dialect: Dialect) -> Vec<Statement> {
    parse(src, ParseOptions::default().dialect(dialect)).unwrap()
}

fn select_of(statement: &Statement) -> &Select {
    match &statement.kind {
        StatementKind::Select(select) => select,
        other => panic!("expected a SELECT, got {other:?}"),
    }
}

#[test]
fn two_selects() {
    let statements = parse_ok("SELECT 1; SELECT 2;");
    assert_eq!(statements.len(), 2);
    let first = select_of(&statements[0]);
    assert_eq!(first.columns[0].expr, Expr::Literal("1".to_string()));
    let second = select_of(&statements[1]);
    assert_eq!(second.columns[0].expr, Expr::Literal("2".to_string()));
}

#[test]
fn empty_input_yields_no_statements() {
    assert_eq!(parse_ok(""), vec![]);
    assert_eq!(parse_ok("   \n\t  "), vec![]);
    assert_eq!(parse_ok(";;;"), vec![]);
}

#[test]
fn strict_mode_reports_position() {
    let err = parse_strict("SELECT FROM;").unwrap_err();
    match err {
        Error::Parse(e) => {
            assert!(e.expected().unwrap().contains("expression"), "{e}");
            assert_eq!((e.line, e.column), (1, 8));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn recover_mode_captures_the_statement() {
    let statements = parse_ok("SELECT FROM;");
    assert_eq!(statements.len(), 1);
    let raw = statements[0].as_raw().expect("should have recovered");
    assert_eq!(raw.reason, RawReason::ParseError);
    assert_eq!(raw.text, "SELECT FROM;");
}

#[test]
fn recovery_resumes_at_the_next_statement() {
    let statements = parse_ok("SELECT FROM; SELECT 2;");
    assert_eq!(statements.len(), 2);
    assert!(statements[0].as_raw().is_some());
    assert_eq!(
        select_of(&statements[1]).columns[0].expr,
        Expr::Literal("2".to_string())
    );
}

#[test]
fn depth_limit_is_never_recovered() {
    let src = format!("SELECT {}1{};", "(".repeat(120), ")".repeat(120));
    for recover in [true, false] {
        let err = parse(
            &src,
            ParseOptions::default().recover(recover).max_depth(100),
        )
        .unwrap_err();
        match err {
            Error::Parse(e) => {
                assert!(e.is_depth_limit(), "{e}");
                assert!(e.to_string().contains("100"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}

#[test]
fn comment_only_statement() {
    let statements = parse_ok("-- only a comment\n");
    assert_eq!(statements.len(), 1);
    let raw = statements[0].as_raw().unwrap();
    assert_eq!(raw.reason, RawReason::CommentOnly);
    assert_eq!(raw.text, "-- only a comment");
}

#[test]
fn cte_with_insert_main() {
    let statements = parse_ok("WITH cte AS (SELECT 1) INSERT INTO t SELECT * FROM cte;");
    assert_eq!(statements.len(), 1);
    match &statements[0].kind {
        StatementKind::Cte(with) => {
            assert_eq!(with.ctes.len(), 1);
            assert_eq!(with.ctes[0].name, "cte");
            assert!(matches!(with.main, WithMain::Insert(_)));
        }
        other => panic!("expected a CTE, got {other:?}"),
    }
}

#[test]
fn union_owns_the_trailing_order_by() {
    let statements = parse_ok("SELECT 1 UNION SELECT 2 ORDER BY 1;");
    assert_eq!(statements.len(), 1);
    match &statements[0].kind {
        StatementKind::Union(union) => {
            assert_eq!(union.arms.len(), 1);
            assert_eq!(union.arms[0].op, SetOp::Union);
            assert_eq!(union.order_by.len(), 1);
            assert_eq!(union.order_by[0].expr, Expr::Literal("1".to_string()));
            match &union.first {
                Query::Select(select) => {
                    assert!(select.order_by.is_empty());
                }
                other => panic!("expected a SELECT member, got {other:?}"),
            }
        }
        other => panic!("expected a UNION, got {other:?}"),
    }
}

#[test]
fn copy_payload_is_sliced_through_the_terminator_line() {
    let statements = parse_ok("COPY t FROM stdin;\n1\ta\n\\.\nSELECT 1;");
    assert_eq!(statements.len(), 2);
    let raw = statements[0].as_raw().unwrap();
    assert_eq!(raw.reason, RawReason::Unsupported);
    assert_eq!(raw.text, "COPY t FROM stdin;\n1\ta\n\\.");
    assert!(matches!(statements[1].kind, StatementKind::Select(_)));
}

#[test]
fn transaction_control_passes_through() {
    let statements = parse_ok("BEGIN; SELECT 1; COMMIT;");
    assert_eq!(statements.len(), 3);
    assert_eq!(
        statements[0].as_raw().unwrap().reason,
        RawReason::TransactionControl
    );
    assert_eq!(
        statements[2].as_raw().unwrap().reason,
        RawReason::TransactionControl
    );
}

#[test]
fn unknown_starter_becomes_unsupported_raw() {
    let statements = parse_ok("FLUSH PRIVILEGES; SELECT 1;");
    assert_eq!(statements.len(), 2);
    let raw = statements[0].as_raw().unwrap();
    assert_eq!(raw.reason, RawReason::Unsupported);
    assert_eq!(raw.text, "FLUSH PRIVILEGES;");
}

#[test]
fn create_function_body_is_kept_verbatim() {
    let src = "CREATE FUNCTION f() RETURNS int AS $$ SELECT 1; $$ LANGUAGE sql; SELECT 2;";
    let statements = parse_ok(src);
    assert_eq!(statements.len(), 2);
    let raw = statements[0].as_raw().unwrap();
    assert!(raw.text.starts_with("CREATE FUNCTION"));
    assert!(raw.text.ends_with("LANGUAGE sql;"));
}

#[test]
fn tsql_go_is_a_single_line_statement() {
    let statements = parse_dialect("GO\nSELECT 1;", Dialect::Tsql);
    assert_eq!(statements.len(), 2);
    assert_eq!(statements[0].as_raw().unwrap().text, "GO");
}

#[test]
fn mysql_delimiter_script_swallows_the_rest() {
    let src = "DELIMITER $$\nCREATE PROCEDURE p() BEGIN SELECT 1; END$$\nDELIMITER ;";
    let statements = parse_dialect(src, Dialect::Mysql);
    assert_eq!(statements.len(), 1);
    let raw = statements[0].as_raw().unwrap();
    assert_eq!(raw.reason, RawReason::Verbatim);
    assert!(raw.text.starts_with("DELIMITER $$"));
    assert!(raw.text.ends_with("DELIMITER ;"));
}

#[test]
fn on_recover_hook_sees_the_raw_node() {
    let seen: Rc<RefCell<Vec<(usize, usize, String)>>> = Rc::default();
    let sink = Rc::clone(&seen);
    let options = ParseOptions::default().on_recover(Box::new(move |err, raw, ctx| {
        sink.borrow_mut().push((
            ctx.statement_index,
            ctx.total_statements,
            format!("{err}: {:?}", raw.map(|s| s.as_raw().unwrap().text.clone())),
        ));
    }));
    let statements = parse("SELECT 1; SELECT FROM; SELECT 3;", options).unwrap();
    assert_eq!(statements.len(), 3);
    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, 1);
    assert_eq!(seen[0].1, 2);
    assert!(seen[0].2.contains("SELECT FROM;"));
}

#[test]
fn leading_and_trailing_comments_attach() {
    let statements = parse_ok("-- header\nSELECT 1; -- done\n");
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].leading_comments.len(), 1);
    assert_eq!(statements[0].leading_comments[0].text, "-- header");
    assert_eq!(statements[0].trailing_comments.len(), 1);
    assert_eq!(statements[0].trailing_comments[0].text, "-- done");
}

#[test]
fn select_column_trailing_comment() {
    let statements = parse_ok("SELECT a, -- first\n  b\nFROM t;");
    let select = select_of(&statements[0]);
    assert_eq!(
        select.columns[0].trailing_comment.as_ref().unwrap().text,
        "-- first"
    );
    assert!(select.columns[1].trailing_comment.is_none());
}

#[test]
fn blank_lines_are_recorded() {
    let statements = parse_ok("SELECT 1;\n\n\nSELECT 2;");
    assert_eq!(statements[0].blank_lines_before, 0);
    assert_eq!(statements[1].blank_lines_before, 2);
}

#[test]
fn alias_detection_stops_at_clause_keywords() {
    let statements = parse_ok("SELECT a value FROM t u WHERE x = 1;");
    let select = select_of(&statements[0]);
    assert_eq!(select.columns[0].alias.as_ref().unwrap().name, "value");
    assert_eq!(select.from[0].alias.as_ref().unwrap().name, "u");
    assert!(select.where_clause.is_some());
}

#[test]
fn clause_keyword_extension_stops_aliases() {
    let strict_base = parse("SELECT a FROM t qualify;", ParseOptions::default().recover(false));
    assert!(strict_base.is_ok(), "qualify should be a plain alias");

    let mut options = ParseOptions::default().recover(false);
    options.extra_clause_keywords = vec!["qualify".to_string()];
    let strict_extended = parse("SELECT a FROM t qualify;", options);
    assert!(
        strict_extended.is_err(),
        "qualify must stop alias scanning once registered"
    );
}

#[test]
fn explain_wraps_the_target_statement() {
    let statements = parse_ok("EXPLAIN ANALYZE SELECT 1;");
    match &statements[0].kind {
        StatementKind::Explain(explain) => {
            assert_eq!(explain.options.as_deref(), Some("ANALYZE"));
            assert!(matches!(*explain.target, StatementKind::Select(_)));
        }
        other => panic!("expected EXPLAIN, got {other:?}"),
    }
}

#[test]
fn merge_clauses_are_structured() {
    let src = "MERGE INTO t USING s ON t.id = s.id \
               WHEN MATCHED THEN UPDATE SET v = s.v \
               WHEN NOT MATCHED THEN INSERT (id) VALUES (s.id);";
    let statements = parse_ok(src);
    match &statements[0].kind {
        StatementKind::Merge(merge) => {
            assert_eq!(merge.clauses.len(), 2);
            assert_eq!(merge.clauses[0].when, "WHEN MATCHED");
            assert!(matches!(merge.clauses[0].action, MergeAction::Update { .. }));
            assert_eq!(merge.clauses[1].when, "WHEN NOT MATCHED");
            assert!(matches!(merge.clauses[1].action, MergeAction::Insert { .. }));
        }
        other => panic!("expected MERGE, got {other:?}"),
    }
}

#[test]
fn alter_table_actions() {
    let statements = parse_ok("ALTER TABLE t ADD COLUMN x int, DROP COLUMN y, OWNER TO app;");
    match &statements[0].kind {
        StatementKind::AlterTable(alter) => {
            assert_eq!(alter.actions.len(), 3);
            assert!(matches!(alter.actions[0], AlterAction::AddColumn { .. }));
            assert!(matches!(alter.actions[1], AlterAction::DropColumn { .. }));
            assert!(matches!(alter.actions[2], AlterAction::OwnerTo(_)));
        }
        other => panic!("expected ALTER TABLE, got {other:?}"),
    }
}

#[test]
fn insert_on_conflict_do_update() {
    let statements =
        parse_ok("INSERT INTO t (a) VALUES (1) ON CONFLICT (a) DO UPDATE SET a = 2 WHERE t.a < 2;");
    match &statements[0].kind {
        StatementKind::Insert(insert) => {
            let on_conflict = insert.on_conflict.as_ref().unwrap();
            assert_eq!(on_conflict.target.as_deref(), Some("(a)"));
            assert!(matches!(
                on_conflict.action,
                OnConflictAction::DoUpdate { .. }
            ));
        }
        other => panic!("expected INSERT, got {other:?}"),
    }
}

#[test]
fn strict_and_recover_agree_on_valid_input() {
    let src = "SELECT a, b FROM t WHERE x = 1 ORDER BY a DESC NULLS LAST;";
    let strict = parse_strict(src).unwrap();
    let recovered = parse_ok(src);
    assert_eq!(strict, recovered);
}

#[test]
fn bracketed_identifiers_classify_as_dialect_foreign() {
    let statements = parse_ok("UPDATE [dbo].[t] SET [x] = 1 WHERE;");
    let raw = statements[0].as_raw().unwrap();
    assert_eq!(raw.reason, RawReason::Unsupported);
}
