//! Single-line expression rendering.

use sqlriver_syntax::ast::*;

use crate::flat::query_flat;
use crate::Options;

pub(crate) fn kw(options: &Options, word: &str) -> String {
    if options.uppercase_keywords {
        word.to_string()
    } else {
        word.to_lowercase()
    }
}

fn is_word_op(op: &str) -> bool {
    op.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
}

pub(crate) fn expr_str(expr: &Expr, o: &Options) -> String {
    match expr {
        Expr::Identifier(name) => name.joined(),
        Expr::Literal(text) => text.clone(),
        Expr::Star { qualifier } => match qualifier {
            Some(q) => format!("{}.*", q.joined()),
            None => "*".to_string(),
        },
        Expr::Binary { left, op, right } => {
            let op = if is_word_op(op) { kw(o, op) } else { op.clone() };
            format!("{} {} {}", expr_str(left, o), op, expr_str(right, o))
        }
        Expr::Unary { op, expr, postfix } => {
            let rendered_op = if is_word_op(op) { kw(o, op) } else { op.clone() };
            if *postfix {
                format!("{} {}", expr_str(expr, o), rendered_op)
            } else if is_word_op(op) {
                format!("{} {}", rendered_op, expr_str(expr, o))
            } else {
                format!("{}{}", rendered_op, expr_str(expr, o))
            }
        }
        Expr::FunctionCall(call) => function_call_str(call, o),
        Expr::Case(case) => case_str(case, o),
        Expr::Cast { expr, ty } => format!(
            "{}({} {} {})",
            kw(o, "CAST"),
            expr_str(expr, o),
            kw(o, "AS"),
            type_str(ty)
        ),
        Expr::PgCast { expr, ty } => format!("{}::{}", expr_str(expr, o), type_str(ty)),
        Expr::Extract { field, expr } => format!(
            "{}({} {} {})",
            kw(o, "EXTRACT"),
            field,
            kw(o, "FROM"),
            expr_str(expr, o)
        ),
        Expr::Position { needle, haystack } => format!(
            "{}({} {} {})",
            kw(o, "POSITION"),
            expr_str(needle, o),
            kw(o, "IN"),
            expr_str(haystack, o)
        ),
        Expr::Substring { expr, from, for_ } => {
            let mut s = format!("{}({}", kw(o, "SUBSTRING"), expr_str(expr, o));
            if let Some(from) = from {
                s.push_str(&format!(" {} {}", kw(o, "FROM"), expr_str(from, o)));
            }
            if let Some(for_) = for_ {
                s.push_str(&format!(" {} {}", kw(o, "FOR"), expr_str(for_, o)));
            }
            s.push(')');
            s
        }
        Expr::Overlay {
            expr,
            placing,
            from,
            for_,
        } => {
            let mut s = format!(
                "{}({} {} {} {} {}",
                kw(o, "OVERLAY"),
                expr_str(expr, o),
                kw(o, "PLACING"),
                expr_str(placing, o),
                kw(o, "FROM"),
                expr_str(from, o)
            );
            if let Some(for_) = for_ {
                s.push_str(&format!(" {} {}", kw(o, "FOR"), expr_str(for_, o)));
            }
            s.push(')');
            s
        }
        Expr::Trim {
            spec,
            pattern,
            expr,
        } => {
            let mut s = format!("{}(", kw(o, "TRIM"));
            let mut need_from = false;
            if let Some(spec) = spec {
                s.push_str(&kw(o, spec));
                s.push(' ');
                need_from = true;
            }
            if let Some(pattern) = pattern {
                s.push_str(&expr_str(pattern, o));
                s.push(' ');
                need_from = true;
            }
            if need_from {
                s.push_str(&kw(o, "FROM"));
                s.push(' ');
            }
            s.push_str(&expr_str(expr, o));
            s.push(')');
            s
        }
        Expr::Subquery(query) => format!("({})", query_flat(query, o)),
        Expr::Paren(inner) => format!("({})", expr_str(inner, o)),
        Expr::Row(items) => format!("({})", expr_list_str(items, o)),
        Expr::ArraySubscript { expr, index } => {
            let mut s = format!("{}[", expr_str(expr, o));
            if let Some(lower) = &index.lower {
                s.push_str(&expr_str(lower, o));
            }
            if index.slice {
                s.push(':');
                if let Some(upper) = &index.upper {
                    s.push_str(&expr_str(upper, o));
                }
            }
            s.push(']');
            s
        }
        Expr::Collate { expr, collation } => format!(
            "{} {} {}",
            expr_str(expr, o),
            kw(o, "COLLATE"),
            collation.joined()
        ),
        Expr::Raw(text) => text.clone(),
    }
}

pub(crate) fn expr_list_str(items: &[Expr], o: &Options) -> String {
    items
        .iter()
        .map(|e| expr_str(e, o))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn type_str(ty: &TypeName) -> String {
    let mut s = ty.name.clone();
    if let Some(params) = &ty.params {
        s.push('(');
        s.push_str(params);
        s.push(')');
    }
    if let Some(suffix) = &ty.suffix {
        s.push(' ');
        s.push_str(suffix);
    }
    for _ in 0..ty.array_dims {
        s.push_str("[]");
    }
    s
}

pub(crate) fn function_call_str(call: &FunctionCall, o: &Options) -> String {
    let mut s = call.name.joined();
    s.push('(');
    if call.distinct {
        s.push_str(&kw(o, "DISTINCT"));
        if !call.args.is_empty() {
            s.push(' ');
        }
    }
    s.push_str(&expr_list_str(&call.args, o));
    if !call.order_by.is_empty() {
        s.push_str(&format!(" {} {}", kw(o, "ORDER BY"), order_items_str(&call.order_by, o)));
    }
    if let Some(separator) = &call.separator {
        s.push_str(&format!(" {} {}", kw(o, "SEPARATOR"), separator));
    }
    s.push(')');
    if !call.within_group.is_empty() {
        s.push_str(&format!(
            " {} ({} {})",
            kw(o, "WITHIN GROUP"),
            kw(o, "ORDER BY"),
            order_items_str(&call.within_group, o)
        ));
    }
    if let Some(filter) = &call.filter {
        s.push_str(&format!(
            " {} ({} {})",
            kw(o, "FILTER"),
            kw(o, "WHERE"),
            expr_str(filter, o)
        ));
    }
    match &call.over {
        Some(Over::Name(name)) => {
            s.push_str(&format!(" {} {name}", kw(o, "OVER")));
        }
        Some(Over::Spec(spec)) => {
            s.push_str(&format!(" {} {}", kw(o, "OVER"), window_spec_str(spec, o)));
        }
        None => {}
    }
    s
}

pub(crate) fn window_spec_str(spec: &WindowSpec, o: &Options) -> String {
    let mut parts = Vec::new();
    if let Some(base) = &spec.base {
        parts.push(base.clone());
    }
    if !spec.partition_by.is_empty() {
        parts.push(format!(
            "{} {}",
            kw(o, "PARTITION BY"),
            expr_list_str(&spec.partition_by, o)
        ));
    }
    if !spec.order_by.is_empty() {
        parts.push(format!(
            "{} {}",
            kw(o, "ORDER BY"),
            order_items_str(&spec.order_by, o)
        ));
    }
    if let Some(frame) = &spec.frame {
        let mut s = kw(o, &frame.units);
        match &frame.end {
            Some(end) => {
                s.push_str(&format!(
                    " {} {} {} {}",
                    kw(o, "BETWEEN"),
                    frame_bound_str(&frame.start, o),
                    kw(o, "AND"),
                    frame_bound_str(end, o)
                ));
            }
            None => {
                s.push_str(&format!(" {}", frame_bound_str(&frame.start, o)));
            }
        }
        if let Some(exclude) = &frame.exclude {
            s.push_str(&format!(" {exclude}"));
        }
        parts.push(s);
    }
    format!("({})", parts.join(" "))
}

fn frame_bound_str(bound: &FrameBound, o: &Options) -> String {
    match bound {
        FrameBound::CurrentRow => kw(o, "CURRENT ROW"),
        FrameBound::UnboundedPreceding => kw(o, "UNBOUNDED PRECEDING"),
        FrameBound::UnboundedFollowing => kw(o, "UNBOUNDED FOLLOWING"),
        FrameBound::Preceding(e) => format!("{} {}", expr_str(e, o), kw(o, "PRECEDING")),
        FrameBound::Following(e) => format!("{} {}", expr_str(e, o), kw(o, "FOLLOWING")),
    }
}

fn case_str(case: &CaseExpr, o: &Options) -> String {
    let mut s = kw(o, "CASE");
    if let Some(operand) = &case.operand {
        s.push(' ');
        s.push_str(&expr_str(operand, o));
    }
    for branch in &case.branches {
        s.push_str(&format!(
            " {} {} {} {}",
            kw(o, "WHEN"),
            expr_str(&branch.condition, o),
            kw(o, "THEN"),
            expr_str(&branch.result, o)
        ));
    }
    if let Some(else_) = &case.else_ {
        s.push_str(&format!(" {} {}", kw(o, "ELSE"), expr_str(else_, o)));
    }
    s.push(' ');
    s.push_str(&kw(o, "END"));
    s
}

pub(crate) fn order_items_str(items: &[OrderItem], o: &Options) -> String {
    items
        .iter()
        .map(|i| order_item_str(i, o))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn order_item_str(item: &OrderItem, o: &Options) -> String {
    let mut s = expr_str(&item.expr, o);
    match &item.direction {
        Some(OrderDirection::Asc) => s.push_str(&format!(" {}", kw(o, "ASC"))),
        Some(OrderDirection::Desc) => s.push_str(&format!(" {}", kw(o, "DESC"))),
        Some(OrderDirection::Using(op)) => s.push_str(&format!(" {} {op}", kw(o, "USING"))),
        None => {}
    }
    match &item.nulls {
        Some(NullsOrder::First) => s.push_str(&format!(" {}", kw(o, "NULLS FIRST"))),
        Some(NullsOrder::Last) => s.push_str(&format!(" {}", kw(o, "NULLS LAST"))),
        None => {}
    }
    s
}

pub(crate) fn alias_str(alias: &Alias, o: &Options) -> String {
    let mut s = format!("{} {}", kw(o, "AS"), alias.name);
    if !alias.columns.is_empty() {
        s.push_str(&format!(" ({})", alias.columns.join(", ")));
    }
    s
}
