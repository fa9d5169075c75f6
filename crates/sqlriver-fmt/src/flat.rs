//! Single-line query rendering, used wherever a query is embedded in an
//! expression position.

use sqlriver_syntax::ast::*;

use crate::expr::*;
use crate::util::comment_inline;
use crate::Options;

pub(crate) fn query_flat(query: &Query, o: &Options) -> String {
    match query {
        Query::Select(select) => select_flat(select, o),
        Query::Union(union) => union_flat(union, o),
        Query::Values(values) => values_flat(values, o),
        Query::Paren(inner) => format!("({})", query_flat(inner, o)),
        Query::With(with) => with_flat(with, o),
    }
}

pub(crate) fn select_column_str(column: &SelectColumn, o: &Options) -> String {
    let mut s = String::new();
    for comment in &column.leading_comments {
        s.push_str(&comment_inline(comment));
        s.push(' ');
    }
    s.push_str(&expr_str(&column.expr, o));
    if let Some(alias) = &column.alias {
        s.push(' ');
        s.push_str(&alias_str(alias, o));
    }
    s
}

pub(crate) fn from_item_str(item: &FromItem, o: &Options) -> String {
    let mut s = String::new();
    for comment in &item.leading_comments {
        s.push_str(&comment_inline(comment));
        s.push(' ');
    }
    if item.lateral {
        s.push_str(&kw(o, "LATERAL"));
        s.push(' ');
    }
    match &item.expr {
        TableExpr::Name(name) => s.push_str(&name.joined()),
        TableExpr::Subquery(query) => {
            s.push('(');
            s.push_str(&query_flat(query, o));
            s.push(')');
        }
        TableExpr::Function(call) => s.push_str(&function_call_str(call, o)),
    }
    if let Some(tablesample) = &item.tablesample {
        s.push(' ');
        s.push_str(tablesample);
    }
    if item.ordinality {
        s.push(' ');
        s.push_str(&kw(o, "WITH ORDINALITY"));
    }
    if let Some(hints) = &item.hints {
        s.push(' ');
        s.push_str(hints);
    }
    if let Some(alias) = &item.alias {
        s.push(' ');
        s.push_str(&alias_str(alias, o));
    }
    s
}

pub(crate) fn join_str(join: &Join, o: &Options) -> String {
    let mut s = format!("{} {}", kw(o, &join.kind), from_item_str(&join.item, o));
    match &join.constraint {
        Some(JoinConstraint::On(condition)) => {
            s.push_str(&format!(" {} {}", kw(o, "ON"), expr_str(&condition.expr, o)));
            if let Some(comment) = &condition.trailing_comment {
                s.push(' ');
                s.push_str(&comment_inline(comment));
            }
        }
        Some(JoinConstraint::Using(columns)) => {
            s.push_str(&format!(" {} ({})", kw(o, "USING"), columns.join(", ")));
        }
        None => {}
    }
    s
}

pub(crate) fn group_item_str(item: &GroupItem, o: &Options) -> String {
    match item {
        GroupItem::Expr(expr) => expr_str(expr, o),
        GroupItem::GroupingSets(items) => {
            format!("{} ({})", kw(o, "GROUPING SETS"), group_items_str(items, o))
        }
        GroupItem::Rollup(items) => format!("{} ({})", kw(o, "ROLLUP"), group_items_str(items, o)),
        GroupItem::Cube(items) => format!("{} ({})", kw(o, "CUBE"), group_items_str(items, o)),
        GroupItem::Paren(items) => format!("({})", group_items_str(items, o)),
    }
}

pub(crate) fn group_items_str(items: &[GroupItem], o: &Options) -> String {
    items
        .iter()
        .map(|i| group_item_str(i, o))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn limit_str(limit: &Limit, o: &Options) -> String {
    format!("{} {}", kw(o, "LIMIT"), expr_list_str(&limit.values, o))
}

pub(crate) fn offset_str(offset: &Offset, o: &Options) -> String {
    let mut s = format!("{} {}", kw(o, "OFFSET"), expr_str(&offset.value, o));
    if let Some(rows) = &offset.rows {
        s.push(' ');
        s.push_str(&kw(o, rows));
    }
    s
}

pub(crate) fn values_row_str(row: &ValuesRow, o: &Options) -> String {
    let mut s = String::new();
    for comment in &row.leading_comments {
        s.push_str(&comment_inline(comment));
        s.push(' ');
    }
    s.push('(');
    s.push_str(&expr_list_str(&row.exprs, o));
    s.push(')');
    s
}

pub(crate) fn distinct_str(distinct: &Distinct, o: &Options) -> String {
    match distinct {
        Distinct::All => kw(o, "ALL"),
        Distinct::Distinct => kw(o, "DISTINCT"),
        Distinct::DistinctOn(exprs) => format!(
            "{} ({})",
            kw(o, "DISTINCT ON"),
            expr_list_str(exprs, o)
        ),
    }
}

fn select_flat(select: &Select, o: &Options) -> String {
    let mut parts = vec![kw(o, "SELECT")];
    if let Some(distinct) = &select.distinct {
        parts.push(distinct_str(distinct, o));
    }
    if let Some(top) = &select.top {
        parts.push(top.clone());
    }
    parts.push(
        select
            .columns
            .iter()
            .map(|c| {
                let mut s = select_column_str(c, o);
                if let Some(comment) = &c.trailing_comment {
                    s.push(' ');
                    s.push_str(&comment_inline(comment));
                }
                s
            })
            .collect::<Vec<_>>()
            .join(", "),
    );
    if let Some(into) = &select.into {
        parts.push(format!("{} {}", kw(o, "INTO"), into.joined()));
    }
    if !select.from.is_empty() {
        parts.push(format!(
            "{} {}",
            kw(o, "FROM"),
            select
                .from
                .iter()
                .map(|i| {
                    let mut s = from_item_str(i, o);
                    if let Some(comment) = &i.trailing_comment {
                        s.push(' ');
                        s.push_str(&comment_inline(comment));
                    }
                    s
                })
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }
    for join in &select.joins {
        parts.push(join_str(join, o));
    }
    if let Some(where_clause) = &select.where_clause {
        parts.push(format!(
            "{} {}",
            kw(o, "WHERE"),
            expr_str(&where_clause.expr, o)
        ));
        if let Some(comment) = &where_clause.trailing_comment {
            parts.push(comment_inline(comment));
        }
    }
    if let Some(group_by) = &select.group_by {
        parts.push(format!(
            "{} {}",
            kw(o, "GROUP BY"),
            group_items_str(&group_by.items, o)
        ));
    }
    if let Some(having) = &select.having {
        parts.push(format!("{} {}", kw(o, "HAVING"), expr_str(&having.expr, o)));
    }
    if !select.windows.is_empty() {
        parts.push(format!(
            "{} {}",
            kw(o, "WINDOW"),
            select
                .windows
                .iter()
                .map(|w| format!("{} {} {}", w.name, kw(o, "AS"), window_spec_str(&w.spec, o)))
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }
    if !select.order_by.is_empty() {
        parts.push(format!(
            "{} {}",
            kw(o, "ORDER BY"),
            order_items_str(&select.order_by, o)
        ));
    }
    if let Some(limit) = &select.limit {
        parts.push(limit_str(limit, o));
    }
    if let Some(offset) = &select.offset {
        parts.push(offset_str(offset, o));
    }
    if let Some(fetch) = &select.fetch {
        parts.push(fetch.clone());
    }
    if let Some(locking) = &select.locking {
        parts.push(locking.clone());
    }
    parts.join(" ")
}

fn union_flat(union: &Union, o: &Options) -> String {
    let mut s = query_flat(&union.first, o);
    for arm in &union.arms {
        s.push(' ');
        s.push_str(&kw(o, arm.op.as_str()));
        match arm.quantifier {
            Some(SetQuantifier::All) => {
                s.push(' ');
                s.push_str(&kw(o, "ALL"));
            }
            Some(SetQuantifier::Distinct) => {
                s.push(' ');
                s.push_str(&kw(o, "DISTINCT"));
            }
            None => {}
        }
        s.push(' ');
        s.push_str(&query_flat(&arm.query, o));
    }
    if !union.order_by.is_empty() {
        s.push_str(&format!(
            " {} {}",
            kw(o, "ORDER BY"),
            order_items_str(&union.order_by, o)
        ));
    }
    if let Some(limit) = &union.limit {
        s.push(' ');
        s.push_str(&limit_str(limit, o));
    }
    if let Some(offset) = &union.offset {
        s.push(' ');
        s.push_str(&offset_str(offset, o));
    }
    if let Some(fetch) = &union.fetch {
        s.push(' ');
        s.push_str(fetch);
    }
    if let Some(locking) = &union.locking {
        s.push(' ');
        s.push_str(locking);
    }
    s
}

fn values_flat(values: &Values, o: &Options) -> String {
    let mut s = format!(
        "{} {}",
        kw(o, "VALUES"),
        values
            .rows
            .iter()
            .map(|r| values_row_str(r, o))
            .collect::<Vec<_>>()
            .join(", ")
    );
    if !values.order_by.is_empty() {
        s.push_str(&format!(
            " {} {}",
            kw(o, "ORDER BY"),
            order_items_str(&values.order_by, o)
        ));
    }
    if let Some(limit) = &values.limit {
        s.push(' ');
        s.push_str(&limit_str(limit, o));
    }
    if let Some(offset) = &values.offset {
        s.push(' ');
        s.push_str(&offset_str(offset, o));
    }
    s
}

pub(crate) fn cte_head_str(cte: &CteDef, o: &Options) -> String {
    let mut s = String::new();
    for comment in &cte.leading_comments {
        s.push_str(&comment_inline(comment));
        s.push(' ');
    }
    s.push_str(&cte.name);
    if !cte.columns.is_empty() {
        s.push_str(&format!(" ({})", cte.columns.join(", ")));
    }
    s.push(' ');
    s.push_str(&kw(o, "AS"));
    match cte.materialized {
        Some(Materialized::Materialized) => {
            s.push(' ');
            s.push_str(&kw(o, "MATERIALIZED"));
        }
        Some(Materialized::NotMaterialized) => {
            s.push(' ');
            s.push_str(&kw(o, "NOT MATERIALIZED"));
        }
        None => {}
    }
    s
}

fn with_flat(with: &With, o: &Options) -> String {
    let mut s = kw(o, "WITH");
    if with.recursive {
        s.push(' ');
        s.push_str(&kw(o, "RECURSIVE"));
    }
    s.push(' ');
    let ctes = with
        .ctes
        .iter()
        .map(|cte| {
            let mut c = cte_head_str(cte, o);
            c.push_str(&format!(" ({})", query_flat(&cte.body, o)));
            if let Some(search) = &cte.search {
                c.push(' ');
                c.push_str(search);
            }
            if let Some(cycle) = &cte.cycle {
                c.push(' ');
                c.push_str(cycle);
            }
            c
        })
        .collect::<Vec<_>>()
        .join(", ");
    s.push_str(&ctes);
    s.push(' ');
    match &with.main {
        WithMain::Query(query) => s.push_str(&query_flat(query, o)),
        // DML mains only occur at the top level, where the tall renderer is
        // used; collapse to one line if one reaches a flat context.
        WithMain::Insert(_) | WithMain::Update(_) | WithMain::Delete(_) | WithMain::Merge(_) => {
            let kind = match &with.main {
                WithMain::Insert(i) => StatementKind::Insert(i.clone()),
                WithMain::Update(u) => StatementKind::Update(u.clone()),
                WithMain::Delete(d) => StatementKind::Delete(d.clone()),
                WithMain::Merge(m) => StatementKind::Merge(m.clone()),
                WithMain::Query(_) => unreachable!(),
            };
            let lines = crate::stmt::statement_kind_lines(&kind, o);
            s.push_str(
                &lines
                    .iter()
                    .map(|l| l.flush().trim().to_string())
                    .collect::<Vec<_>>()
                    .join(" "),
            );
        }
    }
    s
}
