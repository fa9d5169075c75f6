//! Tall (river-aligned) statement rendering.

use std::io::{self, Write};

use sqlriver_syntax::ast::*;

use crate::expr::*;
use crate::flat::*;
use crate::util::{render_lines, Line, Rendered};
use crate::{Formatter, Options};

impl<W: Write> Formatter<W> {
    pub(crate) fn fmt_statement(&mut self, statement: &Statement) -> io::Result<()> {
        if let StatementKind::Raw(raw) = &statement.kind {
            if raw.reason == RawReason::ParseError {
                tracing::warn!("keeping an unparseable statement verbatim");
            }
        }
        for (idx, comment) in statement.leading_comments.iter().enumerate() {
            if idx > 0 {
                let blanks =
                    (comment.blank_lines_before as u64).min(self.options.max_empty_lines);
                for _ in 0..blanks {
                    self.newline()?;
                }
            }
            self.line(comment.text.trim_end())?;
        }
        let mut lines = statement_kind_lines(&statement.kind, &self.options);
        if !matches!(statement.kind, StatementKind::Raw(_)) {
            if let Some(last) = lines.last_mut() {
                if !last.text.trim_end().ends_with(';') {
                    last.text.push(';');
                }
            }
        }
        let mut trailing = statement.trailing_comments.iter();
        if let Some(first) = trailing.next() {
            match lines.last_mut() {
                Some(last) if last.comment.is_none() => {
                    last.comment = Some(first.text.trim_end().to_string());
                }
                _ => lines.push(Rendered {
                    text: String::new(),
                    comment: Some(first.text.trim_end().to_string()),
                }),
            }
        }
        for line in &lines {
            self.line(&line.flush())?;
        }
        for comment in trailing {
            self.line(comment.text.trim_end())?;
        }
        Ok(())
    }
}

pub(crate) fn statement_kind_lines(kind: &StatementKind, o: &Options) -> Vec<Rendered> {
    match kind {
        StatementKind::Select(select) => render_lines(&select_group(select, o)),
        StatementKind::Union(union) => union_lines(union, o),
        StatementKind::Insert(insert) => insert_lines(insert, o),
        StatementKind::Update(update) => render_lines(&update_group(update, o)),
        StatementKind::Delete(delete) => render_lines(&delete_group(delete, o)),
        StatementKind::Merge(merge) => render_lines(&merge_group(merge, o)),
        StatementKind::CreateTable(create) => create_table_lines(create, o),
        StatementKind::CreateIndex(create) => render_lines(&create_index_group(create, o)),
        StatementKind::CreateView(create) => create_view_lines(create, o),
        StatementKind::CreatePolicy(create) => render_lines(&create_policy_group(create, o)),
        StatementKind::AlterTable(alter) => render_lines(&alter_group(alter, o)),
        StatementKind::DropTable(drop) => render_lines(&drop_group(drop, o)),
        StatementKind::Explain(explain) => explain_lines(explain, o),
        StatementKind::Grant(grant) => render_lines(&grant_group(grant, o)),
        StatementKind::Truncate(truncate) => render_lines(&truncate_group(truncate, o)),
        StatementKind::StandaloneValues(values) => render_lines(&values_group(values, o)),
        StatementKind::Cte(with) => with_lines(with, o),
        StatementKind::Raw(raw) => raw.text.split('\n').map(Rendered::plain).collect(),
    }
}

fn indent_block(lines: Vec<Rendered>, indent: &str) -> Vec<Rendered> {
    lines
        .into_iter()
        .map(|mut l| {
            if !l.text.is_empty() {
                l.text = format!("{indent}{}", l.text);
            }
            l
        })
        .collect()
}

pub(crate) fn query_lines(query: &Query, o: &Options) -> Vec<Rendered> {
    match query {
        Query::Select(select) => render_lines(&select_group(select, o)),
        Query::Union(union) => union_lines(union, o),
        Query::Values(values) => render_lines(&values_group(values, o)),
        Query::Paren(inner) => {
            let mut lines = vec![Rendered::plain("(")];
            lines.extend(indent_block(query_lines(inner, o), &o.indent_string));
            lines.push(Rendered::plain(")"));
            lines
        }
        Query::With(with) => with_lines(with, o),
    }
}

// region: SELECT

fn select_group(select: &Select, o: &Options) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut head = String::new();
    if let Some(distinct) = &select.distinct {
        head.push_str(&distinct_str(distinct, o));
        head.push(' ');
    }
    if let Some(top) = &select.top {
        head.push_str(top);
        head.push(' ');
    }
    let count = select.columns.len();
    for (idx, column) in select.columns.iter().enumerate() {
        let mut text = select_column_str(column, o);
        if idx + 1 < count {
            text.push(',');
        }
        let line = if idx == 0 {
            Line::new(kw(o, "SELECT"), format!("{head}{text}"))
        } else {
            Line::cont(text)
        };
        lines.push(line.with_comment(column.trailing_comment.as_ref()));
    }
    if let Some(into) = &select.into {
        lines.push(Line::new(kw(o, "INTO"), into.joined()));
    }
    push_from_items(&mut lines, &select.from, kw(o, "FROM"), o);
    for join in &select.joins {
        lines.push(join_line(join, o));
    }
    if let Some(where_clause) = &select.where_clause {
        lines.push(
            Line::new(kw(o, "WHERE"), expr_str(&where_clause.expr, o))
                .with_comment(where_clause.trailing_comment.as_ref()),
        );
    }
    if let Some(group_by) = &select.group_by {
        let count = group_by.items.len();
        for (idx, item) in group_by.items.iter().enumerate() {
            let mut text = group_item_str(item, o);
            if idx + 1 < count {
                text.push(',');
            }
            lines.push(if idx == 0 {
                Line::new(kw(o, "GROUP BY"), text)
            } else {
                Line::cont(text)
            });
        }
    }
    if let Some(having) = &select.having {
        lines.push(
            Line::new(kw(o, "HAVING"), expr_str(&having.expr, o))
                .with_comment(having.trailing_comment.as_ref()),
        );
    }
    let window_count = select.windows.len();
    for (idx, window) in select.windows.iter().enumerate() {
        let mut text = format!(
            "{} {} {}",
            window.name,
            kw(o, "AS"),
            window_spec_str(&window.spec, o)
        );
        if idx + 1 < window_count {
            text.push(',');
        }
        lines.push(if idx == 0 {
            Line::new(kw(o, "WINDOW"), text)
        } else {
            Line::cont(text)
        });
    }
    push_order_by(&mut lines, &select.order_by, o);
    push_limits(
        &mut lines,
        select.limit.as_ref(),
        select.offset.as_ref(),
        select.fetch.as_deref(),
        select.locking.as_deref(),
        o,
    );
    lines
}

fn push_from_items(lines: &mut Vec<Line>, items: &[FromItem], keyword: String, o: &Options) {
    let count = items.len();
    for (idx, item) in items.iter().enumerate() {
        let mut text = from_item_str(item, o);
        if idx + 1 < count {
            text.push(',');
        }
        let line = if idx == 0 {
            Line::new(keyword.clone(), text)
        } else {
            Line::cont(text)
        };
        lines.push(line.with_comment(item.trailing_comment.as_ref()));
    }
}

fn join_line(join: &Join, o: &Options) -> Line {
    let mut text = from_item_str(&join.item, o);
    match &join.constraint {
        Some(JoinConstraint::On(condition)) => {
            text.push_str(&format!(" {} {}", kw(o, "ON"), expr_str(&condition.expr, o)));
        }
        Some(JoinConstraint::Using(columns)) => {
            text.push_str(&format!(" {} ({})", kw(o, "USING"), columns.join(", ")));
        }
        None => {}
    }
    let mut line = Line::new(kw(o, &join.kind), text).with_comment(join.trailing_comment.as_ref());
    if line.comment.is_none() {
        if let Some(JoinConstraint::On(condition)) = &join.constraint {
            line = line.with_comment(condition.trailing_comment.as_ref());
        }
    }
    line
}

fn push_order_by(lines: &mut Vec<Line>, items: &[OrderItem], o: &Options) {
    let count = items.len();
    for (idx, item) in items.iter().enumerate() {
        let mut text = order_item_str(item, o);
        if idx + 1 < count {
            text.push(',');
        }
        let line = if idx == 0 {
            Line::new(kw(o, "ORDER BY"), text)
        } else {
            Line::cont(text)
        };
        lines.push(line.with_comment(item.trailing_comment.as_ref()));
    }
}

fn push_limits(
    lines: &mut Vec<Line>,
    limit: Option<&Limit>,
    offset: Option<&Offset>,
    fetch: Option<&str>,
    locking: Option<&str>,
    o: &Options,
) {
    if let Some(limit) = limit {
        lines.push(Line::new(kw(o, "LIMIT"), expr_list_str(&limit.values, o)));
    }
    if let Some(offset) = offset {
        let mut text = expr_str(&offset.value, o);
        if let Some(rows) = &offset.rows {
            text.push(' ');
            text.push_str(&kw(o, rows));
        }
        lines.push(Line::new(kw(o, "OFFSET"), text));
    }
    if let Some(fetch) = fetch {
        lines.push(Line::new(fetch.to_string(), ""));
    }
    if let Some(locking) = locking {
        lines.push(Line::new(locking.to_string(), ""));
    }
}

fn union_lines(union: &Union, o: &Options) -> Vec<Rendered> {
    let mut out = query_lines(&union.first, o);
    for arm in &union.arms {
        let mut op = kw(o, arm.op.as_str());
        match arm.quantifier {
            Some(SetQuantifier::All) => op.push_str(&format!(" {}", kw(o, "ALL"))),
            Some(SetQuantifier::Distinct) => op.push_str(&format!(" {}", kw(o, "DISTINCT"))),
            None => {}
        }
        out.push(Rendered::plain(op));
        out.extend(query_lines(&arm.query, o));
    }
    let mut trailing = Vec::new();
    push_order_by(&mut trailing, &union.order_by, o);
    push_limits(
        &mut trailing,
        union.limit.as_ref(),
        union.offset.as_ref(),
        union.fetch.as_deref(),
        union.locking.as_deref(),
        o,
    );
    out.extend(render_lines(&trailing));
    out
}

fn values_group(values: &Values, o: &Options) -> Vec<Line> {
    let mut lines = Vec::new();
    let count = values.rows.len();
    for (idx, row) in values.rows.iter().enumerate() {
        let mut text = values_row_str(row, o);
        if idx + 1 < count {
            text.push(',');
        }
        let line = if idx == 0 {
            Line::new(kw(o, "VALUES"), text)
        } else {
            Line::cont(text)
        };
        lines.push(line.with_comment(row.trailing_comment.as_ref()));
    }
    push_order_by(&mut lines, &values.order_by, o);
    push_limits(
        &mut lines,
        values.limit.as_ref(),
        values.offset.as_ref(),
        None,
        None,
        o,
    );
    lines
}

// endregion

// region: WITH

fn with_lines(with: &With, o: &Options) -> Vec<Rendered> {
    let mut out = Vec::new();
    let count = with.ctes.len();
    for (idx, cte) in with.ctes.iter().enumerate() {
        let head = cte_head_str(cte, o);
        if idx == 0 {
            let mut prefix = kw(o, "WITH");
            if with.recursive {
                prefix.push(' ');
                prefix.push_str(&kw(o, "RECURSIVE"));
            }
            out.push(Rendered::plain(format!("{prefix} {head} (")));
        } else {
            out.push(Rendered::plain(format!("{head} (")));
        }
        out.extend(indent_block(query_lines(&cte.body, o), &o.indent_string));
        let mut closer = ")".to_string();
        if let Some(search) = &cte.search {
            closer.push(' ');
            closer.push_str(search);
        }
        if let Some(cycle) = &cte.cycle {
            closer.push(' ');
            closer.push_str(cycle);
        }
        if idx + 1 < count {
            closer.push(',');
        }
        out.push(Rendered {
            text: closer,
            comment: cte
                .trailing_comment
                .as_ref()
                .map(|c| c.text.trim_end().to_string()),
        });
    }
    let main = match &with.main {
        WithMain::Query(query) => query_lines(query, o),
        WithMain::Insert(insert) => insert_lines(insert, o),
        WithMain::Update(update) => render_lines(&update_group(update, o)),
        WithMain::Delete(delete) => render_lines(&delete_group(delete, o)),
        WithMain::Merge(merge) => render_lines(&merge_group(merge, o)),
    };
    out.extend(main);
    out
}

// endregion

// region: DML

fn assignment_str(assignment: &Assignment, o: &Options) -> String {
    let target = match &assignment.target {
        AssignTarget::Column(name) => name.joined(),
        AssignTarget::Columns(names) => format!(
            "({})",
            names.iter().map(Name::joined).collect::<Vec<_>>().join(", ")
        ),
    };
    format!("{target} = {}", expr_str(&assignment.value, o))
}

fn push_assignments(lines: &mut Vec<Line>, set: &[Assignment], o: &Options) {
    let count = set.len();
    for (idx, assignment) in set.iter().enumerate() {
        let mut text = assignment_str(assignment, o);
        if idx + 1 < count {
            text.push(',');
        }
        let line = if idx == 0 {
            Line::new(kw(o, "SET"), text)
        } else {
            Line::cont(text)
        };
        lines.push(line.with_comment(assignment.trailing_comment.as_ref()));
    }
}

fn push_returning(lines: &mut Vec<Line>, items: &[SelectColumn], o: &Options) {
    let count = items.len();
    for (idx, column) in items.iter().enumerate() {
        let mut text = select_column_str(column, o);
        if idx + 1 < count {
            text.push(',');
        }
        let line = if idx == 0 {
            Line::new(kw(o, "RETURNING"), text)
        } else {
            Line::cont(text)
        };
        lines.push(line.with_comment(column.trailing_comment.as_ref()));
    }
}

fn insert_head(insert: &Insert, o: &Options) -> String {
    let mut head = String::new();
    for modifier in &insert.modifiers {
        head.push_str(&kw(o, modifier));
        head.push(' ');
    }
    head.push_str(&kw(o, "INTO"));
    head.push(' ');
    head.push_str(&insert.table.joined());
    if let Some(alias) = &insert.table_alias {
        head.push(' ');
        head.push_str(&alias_str(alias, o));
    }
    if !insert.columns.is_empty() {
        head.push_str(&format!(" ({})", insert.columns.join(", ")));
    }
    head
}

fn insert_tail_group(insert: &Insert, o: &Options) -> Vec<Line> {
    let mut lines = Vec::new();
    if let Some(on_conflict) = &insert.on_conflict {
        let mut text = kw(o, "CONFLICT");
        if let Some(target) = &on_conflict.target {
            text.push(' ');
            text.push_str(target);
        }
        match &on_conflict.action {
            OnConflictAction::DoNothing => {
                text.push_str(&format!(" {}", kw(o, "DO NOTHING")));
                lines.push(Line::new(kw(o, "ON"), text));
            }
            OnConflictAction::DoUpdate { set, where_clause } => {
                text.push_str(&format!(" {}", kw(o, "DO UPDATE")));
                lines.push(Line::new(kw(o, "ON"), text));
                push_assignments(&mut lines, set, o);
                if let Some(where_clause) = where_clause {
                    lines.push(
                        Line::new(kw(o, "WHERE"), expr_str(&where_clause.expr, o))
                            .with_comment(where_clause.trailing_comment.as_ref()),
                    );
                }
            }
        }
    }
    if !insert.on_duplicate.is_empty() {
        lines.push(Line::new(kw(o, "ON DUPLICATE KEY UPDATE"), ""));
        let count = insert.on_duplicate.len();
        for (idx, assignment) in insert.on_duplicate.iter().enumerate() {
            let mut text = assignment_str(assignment, o);
            if idx + 1 < count {
                text.push(',');
            }
            lines.push(Line::cont(text).with_comment(assignment.trailing_comment.as_ref()));
        }
    }
    push_returning(&mut lines, &insert.returning, o);
    lines
}

fn insert_lines(insert: &Insert, o: &Options) -> Vec<Rendered> {
    let mut head_group = vec![Line::new(kw(o, "INSERT"), insert_head(insert, o))];
    if let Some(overriding) = &insert.overriding {
        head_group.push(Line::new(overriding.clone(), ""));
    }
    if let Some(output) = &insert.output {
        head_group.push(Line::new(output.clone(), ""));
    }
    match &insert.source {
        InsertSource::Values(values) => {
            head_group.extend(values_group(values, o));
            head_group.extend(insert_tail_group(insert, o));
            render_lines(&head_group)
        }
        InsertSource::DefaultValues => {
            head_group.push(Line::new(kw(o, "DEFAULT VALUES"), ""));
            head_group.extend(insert_tail_group(insert, o));
            render_lines(&head_group)
        }
        InsertSource::Set(assignments) => {
            push_assignments(&mut head_group, assignments, o);
            head_group.extend(insert_tail_group(insert, o));
            render_lines(&head_group)
        }
        InsertSource::Query(query) => {
            let mut out = render_lines(&head_group);
            out.extend(query_lines(query, o));
            let tail = insert_tail_group(insert, o);
            if !tail.is_empty() {
                out.extend(render_lines(&tail));
            }
            out
        }
    }
}

fn update_group(update: &Update, o: &Options) -> Vec<Line> {
    let mut lines = vec![Line::new(kw(o, "UPDATE"), from_item_str(&update.table, o))];
    for join in &update.joins {
        lines.push(join_line(join, o));
    }
    push_assignments(&mut lines, &update.set, o);
    if let Some(output) = &update.output {
        lines.push(Line::new(output.clone(), ""));
    }
    push_from_items(&mut lines, &update.from, kw(o, "FROM"), o);
    for join in &update.from_joins {
        lines.push(join_line(join, o));
    }
    if let Some(where_clause) = &update.where_clause {
        lines.push(
            Line::new(kw(o, "WHERE"), expr_str(&where_clause.expr, o))
                .with_comment(where_clause.trailing_comment.as_ref()),
        );
    }
    push_order_by(&mut lines, &update.order_by, o);
    push_limits(&mut lines, update.limit.as_ref(), None, None, None, o);
    push_returning(&mut lines, &update.returning, o);
    lines
}

fn delete_group(delete: &Delete, o: &Options) -> Vec<Line> {
    let mut lines = Vec::new();
    if delete.targets.is_empty() {
        if delete.from.is_empty() {
            lines.push(Line::new(kw(o, "DELETE"), ""));
        } else {
            push_from_items(&mut lines, &delete.from, kw(o, "DELETE FROM"), o);
        }
    } else {
        lines.push(Line::new(
            kw(o, "DELETE"),
            delete
                .targets
                .iter()
                .map(Name::joined)
                .collect::<Vec<_>>()
                .join(", "),
        ));
        push_from_items(&mut lines, &delete.from, kw(o, "FROM"), o);
    }
    for join in &delete.joins {
        lines.push(join_line(join, o));
    }
    push_from_items(&mut lines, &delete.using, kw(o, "USING"), o);
    if let Some(output) = &delete.output {
        lines.push(Line::new(output.clone(), ""));
    }
    if let Some(where_clause) = &delete.where_clause {
        lines.push(
            Line::new(kw(o, "WHERE"), expr_str(&where_clause.expr, o))
                .with_comment(where_clause.trailing_comment.as_ref()),
        );
    }
    push_order_by(&mut lines, &delete.order_by, o);
    push_limits(&mut lines, delete.limit.as_ref(), None, None, None, o);
    push_returning(&mut lines, &delete.returning, o);
    lines
}

fn merge_group(merge: &Merge, o: &Options) -> Vec<Line> {
    let mut lines = vec![Line::new(
        kw(o, "MERGE"),
        format!("{} {}", kw(o, "INTO"), from_item_str(&merge.target, o)),
    )];
    lines.push(Line::new(kw(o, "USING"), from_item_str(&merge.source, o)));
    lines.push(
        Line::new(kw(o, "ON"), expr_str(&merge.on.expr, o))
            .with_comment(merge.on.trailing_comment.as_ref()),
    );
    for clause in &merge.clauses {
        let mut text = kw(o, clause.when.trim_start_matches("WHEN "));
        if let Some(condition) = &clause.condition {
            text.push_str(&format!(" {} {}", kw(o, "AND"), expr_str(condition, o)));
        }
        text.push_str(&format!(" {}", kw(o, "THEN")));
        lines.push(Line::new(kw(o, "WHEN"), text));
        lines.push(Line::cont(merge_action_str(&clause.action, o)));
    }
    if let Some(output) = &merge.output {
        lines.push(Line::new(output.clone(), ""));
    }
    lines
}

fn merge_action_str(action: &MergeAction, o: &Options) -> String {
    match action {
        MergeAction::Update { set } => {
            let assignments = set
                .iter()
                .map(|a| assignment_str(a, o))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{} {}", kw(o, "UPDATE SET"), assignments)
        }
        MergeAction::Insert { columns, values } => {
            let mut s = kw(o, "INSERT");
            if !columns.is_empty() {
                s.push_str(&format!(" ({})", columns.join(", ")));
            }
            s.push_str(&format!(" {} ({})", kw(o, "VALUES"), expr_list_str(values, o)));
            s
        }
        MergeAction::InsertDefaultValues => kw(o, "INSERT DEFAULT VALUES"),
        MergeAction::Delete => kw(o, "DELETE"),
        MergeAction::DoNothing => kw(o, "DO NOTHING"),
        MergeAction::Raw(text) => text.clone(),
    }
}

// endregion

// region: DDL

fn create_table_lines(create: &CreateTable, o: &Options) -> Vec<Rendered> {
    let mut head = kw(o, "CREATE");
    if create.or_replace {
        head.push_str(&format!(" {}", kw(o, "OR REPLACE")));
    }
    for modifier in &create.modifiers {
        head.push_str(&format!(" {}", kw(o, modifier)));
    }
    head.push_str(&format!(" {}", kw(o, "TABLE")));
    if create.if_not_exists {
        head.push_str(&format!(" {}", kw(o, "IF NOT EXISTS")));
    }
    head.push(' ');
    head.push_str(&create.name.joined());

    let mut out = Vec::new();
    match &create.body {
        CreateTableBody::Elements { elements, .. } => {
            out.push(Rendered::plain(format!("{head} (")));
            let count = elements.len();
            for (idx, element) in elements.iter().enumerate() {
                for comment in element_leading_comments(element) {
                    out.push(Rendered::plain(format!(
                        "{}{}",
                        o.indent_string,
                        comment.text.trim_end()
                    )));
                }
                let mut text = format!("{}{}", o.indent_string, element_str(element, o));
                if idx + 1 < count {
                    text.push(',');
                }
                out.push(Rendered {
                    text,
                    comment: element_trailing_comment(element)
                        .map(|c| c.text.trim_end().to_string()),
                });
            }
            let mut closer = ")".to_string();
            if let Some(options) = &create.options {
                closer.push(' ');
                closer.push_str(options);
            }
            out.push(Rendered::plain(closer));
        }
        CreateTableBody::AsQuery(query) => {
            out.push(Rendered::plain(format!("{head} {}", kw(o, "AS"))));
            out.extend(query_lines(query, o));
            if let Some(options) = &create.options {
                out.push(Rendered::plain(options.clone()));
            }
        }
        CreateTableBody::Like(name) => {
            let mut line = format!("{head} {} {}", kw(o, "LIKE"), name.joined());
            if let Some(options) = &create.options {
                line.push(' ');
                line.push_str(options);
            }
            out.push(Rendered::plain(line));
        }
        CreateTableBody::ParenQuery(query) => {
            out.push(Rendered::plain(format!("{head} (")));
            out.extend(indent_block(query_lines(query, o), &o.indent_string));
            let mut closer = ")".to_string();
            if let Some(options) = &create.options {
                closer.push(' ');
                closer.push_str(options);
            }
            out.push(Rendered::plain(closer));
        }
        CreateTableBody::None => {
            let mut line = head;
            if let Some(options) = &create.options {
                line.push(' ');
                line.push_str(options);
            }
            out.push(Rendered::plain(line));
        }
    }
    out
}

fn element_leading_comments(element: &TableElement) -> &[Comment] {
    match element {
        TableElement::Column(c) => &c.leading_comments,
        TableElement::Constraint(c) => &c.leading_comments,
        TableElement::Raw(r) => &r.leading_comments,
    }
}

fn element_trailing_comment(element: &TableElement) -> Option<&Comment> {
    match element {
        TableElement::Column(c) => c.trailing_comment.as_ref(),
        TableElement::Constraint(c) => c.trailing_comment.as_ref(),
        TableElement::Raw(r) => r.trailing_comment.as_ref(),
    }
}

fn element_str(element: &TableElement, o: &Options) -> String {
    match element {
        TableElement::Column(column) => {
            let mut s = column.name.clone();
            if let Some(ty) = &column.ty {
                s.push(' ');
                s.push_str(&type_str(ty));
            }
            if let Some(constraints) = &column.constraints {
                s.push(' ');
                s.push_str(constraints);
            }
            s
        }
        TableElement::Constraint(constraint) => constraint_str(constraint, o),
        TableElement::Raw(raw) => raw.text.clone(),
    }
}

fn constraint_str(constraint: &TableConstraint, o: &Options) -> String {
    match &constraint.name {
        Some(name) => format!("{} {name} {}", kw(o, "CONSTRAINT"), constraint.body),
        None => constraint.body.clone(),
    }
}

fn create_index_group(create: &CreateIndex, o: &Options) -> Vec<Line> {
    let mut text = String::new();
    if create.unique {
        text.push_str(&kw(o, "UNIQUE"));
        text.push(' ');
    }
    text.push_str(&kw(o, "INDEX"));
    if create.concurrently {
        text.push_str(&format!(" {}", kw(o, "CONCURRENTLY")));
    }
    if create.if_not_exists {
        text.push_str(&format!(" {}", kw(o, "IF NOT EXISTS")));
    }
    if let Some(name) = &create.name {
        text.push(' ');
        text.push_str(&name.joined());
    }
    text.push_str(&format!(" {} {}", kw(o, "ON"), create.table.joined()));
    if let Some(using) = &create.using {
        text.push_str(&format!(" {} {using}", kw(o, "USING")));
    }
    text.push_str(&format!(" ({})", order_items_str(&create.columns, o)));
    if !create.include.is_empty() {
        text.push_str(&format!(
            " {} ({})",
            kw(o, "INCLUDE"),
            create.include.join(", ")
        ));
    }
    let mut lines = vec![Line::new(kw(o, "CREATE"), text)];
    if let Some(options) = &create.options {
        lines.push(Line::new(options.clone(), ""));
    }
    if let Some(where_clause) = &create.where_clause {
        lines.push(
            Line::new(kw(o, "WHERE"), expr_str(&where_clause.expr, o))
                .with_comment(where_clause.trailing_comment.as_ref()),
        );
    }
    lines
}

fn create_view_lines(create: &CreateView, o: &Options) -> Vec<Rendered> {
    let mut head = kw(o, "CREATE");
    if create.or_replace {
        head.push_str(&format!(" {}", kw(o, "OR REPLACE")));
    }
    if create.temporary {
        head.push_str(&format!(" {}", kw(o, "TEMPORARY")));
    }
    if create.materialized {
        head.push_str(&format!(" {}", kw(o, "MATERIALIZED")));
    }
    head.push_str(&format!(" {} {}", kw(o, "VIEW"), create.name.joined()));
    if !create.columns.is_empty() {
        head.push_str(&format!(" ({})", create.columns.join(", ")));
    }
    if let Some(options) = &create.options {
        head.push(' ');
        head.push_str(options);
    }
    head.push_str(&format!(" {}", kw(o, "AS")));
    let mut out = vec![Rendered::plain(head)];
    out.extend(query_lines(&create.query, o));
    if let Some(check_option) = &create.check_option {
        out.push(Rendered::plain(check_option.clone()));
    }
    out
}

fn create_policy_group(create: &CreatePolicy, o: &Options) -> Vec<Line> {
    let mut lines = vec![Line::new(
        kw(o, "CREATE"),
        format!(
            "{} {} {} {}",
            kw(o, "POLICY"),
            create.name,
            kw(o, "ON"),
            create.table.joined()
        ),
    )];
    if let Some(as_) = &create.as_ {
        lines.push(Line::new(kw(o, "AS"), kw(o, as_)));
    }
    if let Some(for_) = &create.for_ {
        lines.push(Line::new(kw(o, "FOR"), kw(o, for_)));
    }
    if !create.to.is_empty() {
        lines.push(Line::new(kw(o, "TO"), create.to.join(", ")));
    }
    if let Some(using) = &create.using {
        lines.push(Line::new(kw(o, "USING"), format!("({})", expr_str(using, o))));
    }
    if let Some(with_check) = &create.with_check {
        lines.push(Line::new(
            kw(o, "WITH CHECK"),
            format!("({})", expr_str(with_check, o)),
        ));
    }
    lines
}

fn alter_group(alter: &AlterTable, o: &Options) -> Vec<Line> {
    let mut text = kw(o, "TABLE");
    if alter.if_exists {
        text.push_str(&format!(" {}", kw(o, "IF EXISTS")));
    }
    if alter.only {
        text.push_str(&format!(" {}", kw(o, "ONLY")));
    }
    text.push(' ');
    text.push_str(&alter.name.joined());
    let mut lines = vec![Line::new(kw(o, "ALTER"), text)];
    let count = alter.actions.len();
    for (idx, action) in alter.actions.iter().enumerate() {
        let (verb, mut rest) = alter_action_parts(action, o);
        if idx + 1 < count {
            rest.push(',');
        }
        if verb.is_empty() {
            lines.push(Line::cont(rest));
        } else {
            lines.push(Line::new(verb, rest));
        }
    }
    lines
}

fn alter_action_parts(action: &AlterAction, o: &Options) -> (String, String) {
    match action {
        AlterAction::AddColumn { if_not_exists, def } => {
            let mut rest = kw(o, "COLUMN");
            if *if_not_exists {
                rest.push_str(&format!(" {}", kw(o, "IF NOT EXISTS")));
            }
            rest.push(' ');
            rest.push_str(&def.name);
            if let Some(ty) = &def.ty {
                rest.push(' ');
                rest.push_str(&type_str(ty));
            }
            if let Some(constraints) = &def.constraints {
                rest.push(' ');
                rest.push_str(constraints);
            }
            (kw(o, "ADD"), rest)
        }
        AlterAction::DropColumn {
            if_exists,
            name,
            behavior,
        } => {
            let mut rest = kw(o, "COLUMN");
            if *if_exists {
                rest.push_str(&format!(" {}", kw(o, "IF EXISTS")));
            }
            rest.push(' ');
            rest.push_str(name);
            if let Some(behavior) = behavior {
                rest.push_str(&format!(" {}", kw(o, behavior)));
            }
            (kw(o, "DROP"), rest)
        }
        AlterAction::AlterColumn { name, action } => (
            kw(o, "ALTER"),
            format!("{} {name} {action}", kw(o, "COLUMN")),
        ),
        AlterAction::RenameColumn { from, to } => (
            kw(o, "RENAME"),
            format!("{} {from} {} {to}", kw(o, "COLUMN"), kw(o, "TO")),
        ),
        AlterAction::RenameTo { to } => (kw(o, "RENAME"), format!("{} {to}", kw(o, "TO"))),
        AlterAction::DropConstraint {
            if_exists,
            name,
            behavior,
        } => {
            let mut rest = kw(o, "CONSTRAINT");
            if *if_exists {
                rest.push_str(&format!(" {}", kw(o, "IF EXISTS")));
            }
            rest.push(' ');
            rest.push_str(name);
            if let Some(behavior) = behavior {
                rest.push_str(&format!(" {}", kw(o, behavior)));
            }
            (kw(o, "DROP"), rest)
        }
        AlterAction::AddConstraint(constraint) => (kw(o, "ADD"), constraint_str(constraint, o)),
        AlterAction::OwnerTo(owner) => (kw(o, "OWNER"), format!("{} {owner}", kw(o, "TO"))),
        AlterAction::SetSchema(schema) => (kw(o, "SET"), format!("{} {schema}", kw(o, "SCHEMA"))),
        AlterAction::SetTablespace(tablespace) => (
            kw(o, "SET"),
            format!("{} {tablespace}", kw(o, "TABLESPACE")),
        ),
        AlterAction::Raw(text) => (String::new(), text.clone()),
    }
}

fn drop_group(drop: &DropTable, o: &Options) -> Vec<Line> {
    let mut text = kw(o, &drop.object);
    if drop.concurrently {
        text.push_str(&format!(" {}", kw(o, "CONCURRENTLY")));
    }
    if drop.if_exists {
        text.push_str(&format!(" {}", kw(o, "IF EXISTS")));
    }
    text.push(' ');
    text.push_str(
        &drop
            .names
            .iter()
            .map(Name::joined)
            .collect::<Vec<_>>()
            .join(", "),
    );
    if let Some(behavior) = &drop.behavior {
        text.push_str(&format!(" {}", kw(o, behavior)));
    }
    vec![Line::new(kw(o, "DROP"), text)]
}

fn explain_lines(explain: &Explain, o: &Options) -> Vec<Rendered> {
    let mut head = kw(o, "EXPLAIN");
    if let Some(options) = &explain.options {
        head.push(' ');
        head.push_str(options);
    }
    let mut out = vec![Rendered::plain(head)];
    out.extend(statement_kind_lines(&explain.target, o));
    out
}

fn grant_group(grant: &Grant, o: &Options) -> Vec<Line> {
    let verb = if grant.revoke { "REVOKE" } else { "GRANT" };
    let mut lines = vec![Line::new(kw(o, verb), grant.privileges.clone())];
    if let Some(object) = &grant.object {
        lines.push(Line::new(kw(o, "ON"), object.clone()));
    }
    if let Some(grantees) = &grant.grantees {
        lines.push(Line::new(kw(o, &grant.grantees_kw), grantees.clone()));
    }
    if let Some(tail) = &grant.tail {
        lines.push(Line::new(tail.clone(), ""));
    }
    lines
}

fn truncate_group(truncate: &Truncate, o: &Options) -> Vec<Line> {
    let mut text = String::new();
    if truncate.table_kw {
        text.push_str(&kw(o, "TABLE"));
        text.push(' ');
    }
    if truncate.only {
        text.push_str(&kw(o, "ONLY"));
        text.push(' ');
    }
    text.push_str(
        &truncate
            .tables
            .iter()
            .map(Name::joined)
            .collect::<Vec<_>>()
            .join(", "),
    );
    if let Some(tail) = &truncate.tail {
        text.push(' ');
        text.push_str(tail);
    }
    vec![Line::new(kw(o, "TRUNCATE"), text)]
}

// endregion
