//! Query expressions: SELECT, set operations, VALUES, CTEs, FROM items,
//! joins, grouping and window clauses.

use crate::ast::*;
use crate::tokens::TokenKind;

use super::{PResult, Parser};

const JOIN_STARTERS: &[&str] = &[
    "JOIN",
    "INNER",
    "LEFT",
    "RIGHT",
    "FULL",
    "CROSS",
    "NATURAL",
    "STRAIGHT_JOIN",
];

impl Parser<'_> {
    /// Parse a full query expression including set operations and trailing
    /// ORDER BY/LIMIT clauses.
    pub(crate) fn parse_query(&mut self) -> PResult<Query> {
        self.with_depth(Self::parse_set_expr)
    }

    fn parse_set_expr(&mut self) -> PResult<Query> {
        let mut first = self.parse_query_primary()?;
        let mut arms = Vec::new();
        loop {
            let op = if self.at_word("UNION") {
                SetOp::Union
            } else if self.at_word("INTERSECT") {
                SetOp::Intersect
            } else if self.at_word("EXCEPT") {
                SetOp::Except
            } else {
                break;
            };
            self.advance();
            let quantifier = if self.eat_word("ALL") {
                Some(SetQuantifier::All)
            } else if self.eat_word("DISTINCT") {
                Some(SetQuantifier::Distinct)
            } else {
                None
            };
            let query = self.parse_query_primary()?;
            arms.push(UnionArm {
                op,
                quantifier,
                query,
            });
        }
        if arms.is_empty() {
            if let Query::Select(select) = &mut first {
                self.parse_select_trailing(select)?;
                return Ok(first);
            }
            if let Query::Values(values) = &mut first {
                self.parse_values_trailing(values)?;
                return Ok(first);
            }
            if matches!(first, Query::Paren(_)) && self.at_trailing_clause() {
                let mut union = Union {
                    first,
                    arms: Vec::new(),
                    order_by: Vec::new(),
                    limit: None,
                    offset: None,
                    fetch: None,
                    locking: None,
                };
                self.parse_union_trailing(&mut union)?;
                return Ok(Query::Union(Box::new(union)));
            }
            return Ok(first);
        }
        let mut union = Union {
            first,
            arms,
            order_by: Vec::new(),
            limit: None,
            offset: None,
            fetch: None,
            locking: None,
        };
        self.parse_union_trailing(&mut union)?;
        Ok(Query::Union(Box::new(union)))
    }

    fn at_trailing_clause(&self) -> bool {
        self.at_any_word(&["ORDER", "LIMIT", "OFFSET", "FETCH", "FOR"])
    }

    fn parse_query_primary(&mut self) -> PResult<Query> {
        if self.at_punct("(") {
            return self.with_depth(|p| {
                p.advance();
                let inner = p.parse_query()?;
                p.expect_punct(")")?;
                Ok(Query::Paren(Box::new(inner)))
            });
        }
        if self.at_word("SELECT") {
            return Ok(Query::Select(Box::new(self.parse_select_core()?)));
        }
        if self.at_word("VALUES") {
            return Ok(Query::Values(Box::new(self.parse_values_core()?)));
        }
        if self.at_word("WITH") {
            let (recursive, ctes) = self.parse_with_prefix()?;
            let main = WithMain::Query(self.parse_query()?);
            return Ok(Query::With(Box::new(With {
                recursive,
                ctes,
                main,
            })));
        }
        Err(self.expected("a query"))
    }

    // region: SELECT

    /// The SELECT clauses up to WINDOW; trailing ORDER BY/LIMIT clauses are
    /// parsed separately so set operations can claim them.
    fn parse_select_core(&mut self) -> PResult<Select> {
        self.expect_word("SELECT")?;
        let mut select = Select::default();

        if self.eat_word("ALL") {
            select.distinct = Some(Distinct::All);
        } else if self.eat_word("DISTINCT") {
            if self.eat_word("ON") {
                self.expect_punct("(")?;
                let mut exprs = vec![self.parse_expr()?];
                while self.eat_punct(",") {
                    exprs.push(self.parse_expr()?);
                }
                self.expect_punct(")")?;
                select.distinct = Some(Distinct::DistinctOn(exprs));
            } else {
                select.distinct = Some(Distinct::Distinct);
            }
        }
        if self.at_word("TOP")
            && (self.peek_nth(1).kind == TokenKind::Number || self.peek_nth(1).is_punct("("))
        {
            select.top = self.parse_top_clause();
        }

        loop {
            let leading_comments = self.take_pending_comments();
            let expr = self.parse_expr()?;
            let alias = self.parse_alias(false, &[])?;
            let mut column = SelectColumn {
                expr,
                alias,
                leading_comments,
                trailing_comment: self.trailing_line_comment(),
            };
            if self.eat_punct(",") {
                if column.trailing_comment.is_none() {
                    column.trailing_comment = self.trailing_line_comment();
                }
                select.columns.push(column);
                continue;
            }
            select.columns.push(column);
            break;
        }

        if self.eat_word("INTO") {
            select.into = Some(self.parse_object_name()?);
        }
        if self.eat_word("FROM") {
            select.from = self.parse_from_items()?;
            select.joins = self.parse_joins()?;
        }
        if self.eat_word("WHERE") {
            select.where_clause = Some(self.parse_condition()?);
        }
        if self.at_word("GROUP") {
            self.advance();
            self.expect_word("BY")?;
            select.group_by = Some(self.parse_group_by()?);
        }
        if self.eat_word("HAVING") {
            select.having = Some(self.parse_condition()?);
        }
        if self.at_word("WINDOW") {
            self.advance();
            loop {
                let name = self.expect_name_token("a window name")?;
                self.expect_word("AS")?;
                let spec = self.parse_window_spec()?;
                select.windows.push(NamedWindow {
                    name: name.value,
                    spec,
                });
                if !self.eat_punct(",") {
                    break;
                }
            }
        }
        Ok(select)
    }

    fn parse_top_clause(&mut self) -> Option<String> {
        let start = self.peek().offset;
        let mut end = self.advance().end_offset();
        if self.at_punct("(") {
            self.advance();
            while !self.at_punct(")") && !self.peek().is_eof() {
                end = self.advance().end_offset();
            }
            if self.at_punct(")") {
                end = self.advance().end_offset();
            }
        } else if self.peek().kind == TokenKind::Number {
            end = self.advance().end_offset();
        }
        if self.at_word("PERCENT") {
            end = self.advance().end_offset();
        }
        if self.at_word("WITH") && self.peek_nth(1).is_word("TIES") {
            self.advance();
            end = self.advance().end_offset();
        }
        Some(self.src[start..end].to_string())
    }

    pub(crate) fn parse_select_trailing(&mut self, select: &mut Select) -> PResult<()> {
        if self.at_word("ORDER") {
            self.advance();
            self.expect_word("BY")?;
            select.order_by = self.parse_order_items()?;
        }
        if self.at_word("LIMIT") {
            select.limit = Some(self.parse_limit()?);
        }
        if self.at_word("OFFSET") {
            select.offset = Some(self.parse_offset()?);
        }
        if self.at_word("FETCH") {
            select.fetch = self.verbatim_until(&[";", ")"], &["FOR", "UNION", "INTERSECT", "EXCEPT"]);
        }
        if self.at_word("FOR") {
            select.locking = self.verbatim_until(&[";", ")"], &["UNION", "INTERSECT", "EXCEPT"]);
        }
        Ok(())
    }

    fn parse_union_trailing(&mut self, union: &mut Union) -> PResult<()> {
        if self.at_word("ORDER") {
            self.advance();
            self.expect_word("BY")?;
            union.order_by = self.parse_order_items()?;
        }
        if self.at_word("LIMIT") {
            union.limit = Some(self.parse_limit()?);
        }
        if self.at_word("OFFSET") {
            union.offset = Some(self.parse_offset()?);
        }
        if self.at_word("FETCH") {
            union.fetch = self.verbatim_until(&[";", ")"], &["FOR"]);
        }
        if self.at_word("FOR") {
            union.locking = self.verbatim_until(&[";", ")"], &[]);
        }
        Ok(())
    }

    fn parse_limit(&mut self) -> PResult<Limit> {
        self.expect_word("LIMIT")?;
        if self.eat_word("ALL") {
            return Ok(Limit {
                values: vec![Expr::Literal("ALL".to_string())],
            });
        }
        let mut values = vec![self.parse_expr()?];
        if self.eat_punct(",") {
            values.push(self.parse_expr()?);
        }
        Ok(Limit { values })
    }

    fn parse_offset(&mut self) -> PResult<Offset> {
        self.expect_word("OFFSET")?;
        let value = self.parse_expr()?;
        let rows = if self.at_word("ROW") || self.at_word("ROWS") {
            Some(self.advance().upper)
        } else {
            None
        };
        Ok(Offset { value, rows })
    }

    pub(crate) fn parse_condition(&mut self) -> PResult<Condition> {
        let expr = self.parse_expr()?;
        Ok(Condition {
            expr,
            trailing_comment: self.trailing_line_comment(),
        })
    }

    // endregion

    // region: FROM and JOIN

    pub(crate) fn parse_from_items(&mut self) -> PResult<Vec<FromItem>> {
        let mut items = vec![self.parse_from_item()?];
        while self.eat_punct(",") {
            if let Some(prev) = items.last_mut() {
                if prev.trailing_comment.is_none() {
                    prev.trailing_comment = self.trailing_line_comment();
                }
            }
            items.push(self.parse_from_item()?);
        }
        Ok(items)
    }

    pub(crate) fn parse_from_item(&mut self) -> PResult<FromItem> {
        let leading_comments = self.take_pending_comments();
        let lateral = self.eat_word("LATERAL");
        let expr = if self.at_punct("(") {
            self.expect_punct("(")?;
            let query = self.parse_query()?;
            self.expect_punct(")")?;
            TableExpr::Subquery(Box::new(query))
        } else {
            let name = self.parse_object_name()?;
            if self.at_punct("(") {
                TableExpr::Function(Box::new(self.parse_function_call(name)?))
            } else {
                TableExpr::Name(name)
            }
        };
        let mut item = FromItem {
            lateral,
            expr,
            ordinality: false,
            tablesample: None,
            hints: None,
            alias: None,
            leading_comments,
            trailing_comment: None,
        };
        loop {
            if self.at_word("TABLESAMPLE") {
                item.tablesample = self.capture_tablesample();
                continue;
            }
            if self.at_word("WITH") {
                if self.peek_nth(1).is_word("ORDINALITY") {
                    self.advance();
                    self.advance();
                    item.ordinality = true;
                    continue;
                }
                if self.peek_nth(1).is_punct("(") {
                    // T-SQL table hints.
                    let start = self.peek().offset;
                    self.advance();
                    self.advance();
                    let mut end = start;
                    while !self.at_punct(")") && !self.peek().is_eof() {
                        end = self.advance().end_offset();
                    }
                    if self.at_punct(")") {
                        end = self.advance().end_offset();
                    }
                    item.hints = Some(self.src[start..end].to_string());
                    continue;
                }
                break;
            }
            break;
        }
        item.alias = self.parse_alias(true, &[])?;
        item.trailing_comment = self.trailing_line_comment();
        Ok(item)
    }

    fn capture_tablesample(&mut self) -> Option<String> {
        let start = self.peek().offset;
        let mut end = self.advance().end_offset(); // TABLESAMPLE
        if !self.peek().is_eof() && !self.at_punct("(") {
            end = self.advance().end_offset(); // method name
        }
        if self.at_punct("(") {
            let mut depth = 0_usize;
            loop {
                let token = self.peek();
                if token.is_eof() {
                    break;
                }
                if token.is_punct("(") {
                    depth += 1;
                } else if token.is_punct(")") {
                    depth -= 1;
                    end = self.advance().end_offset();
                    if depth == 0 {
                        break;
                    }
                    continue;
                }
                end = self.advance().end_offset();
            }
        }
        if self.at_word("REPEATABLE") {
            end = self.advance().end_offset();
            if self.at_punct("(") {
                self.advance();
                while !self.at_punct(")") && !self.peek().is_eof() {
                    self.advance();
                }
                if self.at_punct(")") {
                    end = self.advance().end_offset();
                }
            }
        }
        Some(self.src[start..end].to_string())
    }

    pub(crate) fn at_join_start(&self) -> bool {
        self.at_any_word(JOIN_STARTERS)
    }

    pub(crate) fn parse_joins(&mut self) -> PResult<Vec<Join>> {
        let mut joins = Vec::new();
        while self.at_join_start() {
            joins.push(self.parse_join()?);
        }
        Ok(joins)
    }

    fn parse_join(&mut self) -> PResult<Join> {
        let mut words = Vec::new();
        if self.at_word("STRAIGHT_JOIN") {
            words.push(self.advance().upper);
        } else {
            while self.at_any_word(&["NATURAL", "INNER", "LEFT", "RIGHT", "FULL", "CROSS", "OUTER"])
            {
                words.push(self.advance().upper);
            }
            words.push(self.expect_word("JOIN")?.upper);
        }
        let item = self.parse_from_item()?;
        let constraint = if self.eat_word("ON") {
            Some(JoinConstraint::On(self.parse_condition()?))
        } else if self.eat_word("USING") {
            self.expect_punct("(")?;
            let mut columns = vec![self.expect_name_token("a column name")?.value];
            while self.eat_punct(",") {
                columns.push(self.expect_name_token("a column name")?.value);
            }
            self.expect_punct(")")?;
            Some(JoinConstraint::Using(columns))
        } else {
            None
        };
        let trailing_comment = self.trailing_line_comment();
        Ok(Join {
            kind: words.join(" "),
            item,
            constraint,
            trailing_comment,
        })
    }

    // endregion

    // region: GROUP BY

    fn parse_group_by(&mut self) -> PResult<GroupBy> {
        let mut items = vec![self.parse_group_item()?];
        while self.eat_punct(",") {
            items.push(self.parse_group_item()?);
        }
        Ok(GroupBy { items })
    }

    fn parse_group_item(&mut self) -> PResult<GroupItem> {
        if self.at_word("GROUPING") && self.peek_nth(1).is_word("SETS") {
            self.advance();
            self.advance();
            return self.with_depth(|p| Ok(GroupItem::GroupingSets(p.parse_group_item_list()?)));
        }
        if self.at_word("ROLLUP") && self.peek_nth(1).is_punct("(") {
            self.advance();
            return self.with_depth(|p| Ok(GroupItem::Rollup(p.parse_group_item_list_inner()?)));
        }
        if self.at_word("CUBE") && self.peek_nth(1).is_punct("(") {
            self.advance();
            return self.with_depth(|p| Ok(GroupItem::Cube(p.parse_group_item_list_inner()?)));
        }
        if self.at_punct("(") && self.group_paren_is_list() {
            return self.with_depth(|p| Ok(GroupItem::Paren(p.parse_group_item_list_inner()?)));
        }
        Ok(GroupItem::Expr(self.parse_expr()?))
    }

    fn parse_group_item_list(&mut self) -> PResult<Vec<GroupItem>> {
        self.parse_group_item_list_inner()
    }

    fn parse_group_item_list_inner(&mut self) -> PResult<Vec<GroupItem>> {
        self.expect_punct("(")?;
        if self.eat_punct(")") {
            return Ok(Vec::new());
        }
        let mut items = vec![self.parse_group_item()?];
        while self.eat_punct(",") {
            items.push(self.parse_group_item()?);
        }
        self.expect_punct(")")?;
        Ok(items)
    }

    /// Distinguish a grouping-element list `(a, b)` or `()` from a
    /// parenthesized scalar expression.
    fn group_paren_is_list(&self) -> bool {
        // Empty parens are always a grouping element; anything else is
        // parsed as an expression, so `(a, b)` comes back as a row value.
        self.peek_nth(1).is_punct(")")
    }

    // endregion

    // region: VALUES

    pub(crate) fn parse_values_core(&mut self) -> PResult<Values> {
        self.expect_word("VALUES")?;
        let mut values = Values::default();
        loop {
            let leading_comments = self.take_pending_comments();
            self.expect_punct("(")?;
            let mut exprs = Vec::new();
            if !self.at_punct(")") {
                exprs.push(self.parse_expr()?);
                while self.eat_punct(",") {
                    exprs.push(self.parse_expr()?);
                }
            }
            self.expect_punct(")")?;
            let mut row = ValuesRow {
                exprs,
                leading_comments,
                trailing_comment: self.trailing_line_comment(),
            };
            if self.eat_punct(",") {
                if row.trailing_comment.is_none() {
                    row.trailing_comment = self.trailing_line_comment();
                }
                values.rows.push(row);
                continue;
            }
            values.rows.push(row);
            break;
        }
        Ok(values)
    }

    fn parse_values_trailing(&mut self, values: &mut Values) -> PResult<()> {
        if self.at_word("ORDER") {
            self.advance();
            self.expect_word("BY")?;
            values.order_by = self.parse_order_items()?;
        }
        if self.at_word("LIMIT") {
            values.limit = Some(self.parse_limit()?);
        }
        if self.at_word("OFFSET") {
            values.offset = Some(self.parse_offset()?);
        }
        Ok(())
    }

    // endregion

    // region: WITH

    pub(crate) fn parse_with_statement(&mut self) -> PResult<StatementKind> {
        let (recursive, ctes) = self.parse_with_prefix()?;
        let main = if self.at_word("INSERT") {
            WithMain::Insert(Box::new(self.parse_insert()?))
        } else if self.at_word("UPDATE") {
            WithMain::Update(Box::new(self.parse_update()?))
        } else if self.at_word("DELETE") {
            WithMain::Delete(Box::new(self.parse_delete()?))
        } else if self.at_word("MERGE") {
            WithMain::Merge(Box::new(self.parse_merge()?))
        } else {
            WithMain::Query(self.parse_query()?)
        };
        Ok(StatementKind::Cte(Box::new(With {
            recursive,
            ctes,
            main,
        })))
    }

    pub(crate) fn parse_with_prefix(&mut self) -> PResult<(bool, Vec<CteDef>)> {
        self.expect_word("WITH")?;
        let recursive = self.eat_word("RECURSIVE");
        let mut ctes = Vec::new();
        loop {
            ctes.push(self.parse_cte_def()?);
            if !self.eat_punct(",") {
                break;
            }
            if let Some(prev) = ctes.last_mut() {
                if prev.trailing_comment.is_none() {
                    prev.trailing_comment = self.trailing_line_comment();
                }
            }
        }
        Ok((recursive, ctes))
    }

    fn parse_cte_def(&mut self) -> PResult<CteDef> {
        let leading_comments = self.take_pending_comments();
        let name = self.expect_name_token("a CTE name")?;
        let mut columns = Vec::new();
        if self.at_punct("(") {
            self.advance();
            columns.push(self.expect_name_token("a column name")?.value);
            while self.eat_punct(",") {
                columns.push(self.expect_name_token("a column name")?.value);
            }
            self.expect_punct(")")?;
        }
        self.expect_word("AS")?;
        let materialized = if self.eat_word("MATERIALIZED") {
            Some(Materialized::Materialized)
        } else if self.at_word("NOT") && self.peek_nth(1).is_word("MATERIALIZED") {
            self.advance();
            self.advance();
            Some(Materialized::NotMaterialized)
        } else {
            None
        };
        self.expect_punct("(")?;
        let body = self.parse_query()?;
        self.expect_punct(")")?;
        let search = if self.at_word("SEARCH") {
            self.capture_search_clause()
        } else {
            None
        };
        let cycle = if self.at_word("CYCLE") {
            self.capture_cycle_clause()
        } else {
            None
        };
        let trailing_comment = self.trailing_line_comment();
        Ok(CteDef {
            name: name.value,
            columns,
            materialized,
            body,
            search,
            cycle,
            leading_comments,
            trailing_comment,
        })
    }

    /// `SEARCH DEPTH|BREADTH FIRST BY cols SET col`, captured verbatim.
    fn capture_search_clause(&mut self) -> Option<String> {
        let start = self.peek().offset;
        let mut end = self.advance().end_offset(); // SEARCH
        while !self.peek().is_eof() && !self.at_word("SET") {
            end = self.advance().end_offset();
        }
        if self.at_word("SET") {
            self.advance();
            end = self.advance().end_offset(); // the target column
        }
        Some(self.src[start..end].to_string())
    }

    /// `CYCLE cols SET col [TO v DEFAULT v] [USING col]`, captured verbatim.
    fn capture_cycle_clause(&mut self) -> Option<String> {
        let start = self.peek().offset;
        let mut end = self.advance().end_offset(); // CYCLE
        while !self.peek().is_eof() && !self.at_word("SET") {
            end = self.advance().end_offset();
        }
        if self.at_word("SET") {
            self.advance();
            end = self.advance().end_offset();
        }
        if self.at_word("TO") {
            self.advance();
            end = self.advance().end_offset();
            if self.at_word("DEFAULT") {
                self.advance();
                end = self.advance().end_offset();
            }
        }
        if self.at_word("USING") {
            self.advance();
            end = self.advance().end_offset();
        }
        Some(self.src[start..end].to_string())
    }

    // endregion

    // region: aliases

    /// Implicit/explicit alias scanning. A bare identifier is an alias
    /// unless it is a clause keyword, a join starter, or in `stop`.
    pub(crate) fn parse_alias(
        &mut self,
        allow_columns: bool,
        stop: &[&str],
    ) -> PResult<Option<Alias>> {
        let explicit = self.eat_word("AS");
        let token = self.peek().clone();
        let acceptable = if explicit {
            matches!(token.kind, TokenKind::Keyword | TokenKind::Identifier)
        } else {
            matches!(token.kind, TokenKind::Keyword | TokenKind::Identifier)
                && !self.profile.is_clause_keyword(&token.upper)
                && !self.profile.is_statement_starter(&token.upper)
                && !stop.contains(&token.upper.as_str())
        };
        if !acceptable {
            if explicit {
                return Err(self.expected("an alias name"));
            }
            return Ok(None);
        }
        let name = self.advance().value;
        let mut columns = Vec::new();
        if allow_columns && self.at_punct("(") {
            self.advance();
            columns.push(self.expect_name_token("a column name")?.value);
            while self.eat_punct(",") {
                columns.push(self.expect_name_token("a column name")?.value);
            }
            self.expect_punct(")")?;
        }
        Ok(Some(Alias {
            explicit,
            name,
            columns,
        }))
    }

    // endregion
}
