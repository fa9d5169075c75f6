//! INSERT / UPDATE / DELETE / MERGE, with the dialect extensions the wild
//! uses: ON CONFLICT, ON DUPLICATE KEY UPDATE, RETURNING, OUTPUT.

use crate::ast::*;

use super::{PResult, Parser};

impl Parser<'_> {
    pub(crate) fn parse_insert(&mut self) -> PResult<Insert> {
        self.expect_word("INSERT")?;
        let mut modifiers = Vec::new();
        while self.at_any_word(&["IGNORE", "LOW_PRIORITY", "HIGH_PRIORITY", "DELAYED"]) {
            modifiers.push(self.advance().upper);
        }
        self.eat_word("INTO");
        let table = self.parse_object_name()?;
        // The paren list after the alias is the column list, never alias
        // columns.
        let table_alias = self.parse_alias(false, &["DEFAULT", "OUTPUT"])?;

        let mut columns = Vec::new();
        if self.at_punct("(") && !self.paren_starts_query() {
            self.advance();
            columns.push(self.expect_name_token("a column name")?.value);
            while self.eat_punct(",") {
                columns.push(self.expect_name_token("a column name")?.value);
            }
            self.expect_punct(")")?;
        }

        let overriding = if self.at_word("OVERRIDING") {
            self.verbatim_until(&["(", ";"], &["VALUES", "SELECT", "WITH"])
        } else {
            None
        };
        let output = if self.at_word("OUTPUT") {
            self.verbatim_until(&[";"], &["VALUES", "SELECT", "WITH", "DEFAULT"])
        } else {
            None
        };

        let source = if self.at_word("DEFAULT") {
            self.advance();
            self.expect_word("VALUES")?;
            InsertSource::DefaultValues
        } else if self.at_word("VALUES") {
            InsertSource::Values(self.parse_values_core()?)
        } else if self.eat_word("SET") {
            InsertSource::Set(self.parse_assignments()?)
        } else if self.at_punct("(") || self.at_any_word(&["SELECT", "WITH"]) {
            InsertSource::Query(self.parse_query()?)
        } else {
            return Err(self.expected("VALUES, SELECT or DEFAULT VALUES"));
        };

        let mut insert = Insert {
            modifiers,
            table,
            table_alias,
            columns,
            overriding,
            source,
            on_conflict: None,
            on_duplicate: Vec::new(),
            returning: Vec::new(),
            output,
        };

        if self.at_word("ON") {
            let next = self.peek_nth(1).clone();
            if next.is_word("CONFLICT") {
                self.advance();
                self.advance();
                insert.on_conflict = Some(self.parse_on_conflict()?);
            } else if next.is_word("DUPLICATE") {
                self.advance();
                self.advance();
                self.expect_word("KEY")?;
                self.expect_word("UPDATE")?;
                insert.on_duplicate = self.parse_assignments()?;
            }
        }
        if self.eat_word("RETURNING") {
            insert.returning = self.parse_returning_items()?;
        }
        Ok(insert)
    }

    fn parse_on_conflict(&mut self) -> PResult<OnConflict> {
        let target = if self.at_punct("(") {
            // Conflict targets may carry opclasses and WHERE fragments;
            // keep them verbatim.
            let start = self.peek().offset;
            let mut depth = 0_usize;
            let mut end = start;
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
            Some(self.src[start..end].to_string())
        } else if self.at_word("ON") {
            // ON CONSTRAINT name
            let start = self.peek().offset;
            self.advance();
            let mut end = self.expect_word("CONSTRAINT")?.end_offset();
            end = self.expect_name_token("a constraint name")?.end_offset().max(end);
            Some(self.src[start..end].to_string())
        } else {
            None
        };
        self.expect_word("DO")?;
        let action = if self.eat_word("NOTHING") {
            OnConflictAction::DoNothing
        } else {
            self.expect_word("UPDATE")?;
            self.expect_word("SET")?;
            let set = self.parse_assignments()?;
            let where_clause = if self.eat_word("WHERE") {
                Some(self.parse_condition()?)
            } else {
                None
            };
            OnConflictAction::DoUpdate { set, where_clause }
        };
        Ok(OnConflict { target, action })
    }

    pub(crate) fn parse_assignments(&mut self) -> PResult<Vec<Assignment>> {
        let mut assignments = vec![self.parse_assignment()?];
        while self.eat_punct(",") {
            if let Some(prev) = assignments.last_mut() {
                if prev.trailing_comment.is_none() {
                    prev.trailing_comment = self.trailing_line_comment();
                }
            }
            assignments.push(self.parse_assignment()?);
        }
        Ok(assignments)
    }

    fn parse_assignment(&mut self) -> PResult<Assignment> {
        let target = if self.at_punct("(") {
            self.advance();
            let mut names = vec![self.parse_object_name()?];
            while self.eat_punct(",") {
                names.push(self.parse_object_name()?);
            }
            self.expect_punct(")")?;
            AssignTarget::Columns(names)
        } else {
            AssignTarget::Column(self.parse_object_name()?)
        };
        if !self.eat_operator("=") {
            return Err(self.expected("`=`"));
        }
        let value = self.parse_expr()?;
        let trailing_comment = self.trailing_line_comment();
        Ok(Assignment {
            target,
            value,
            trailing_comment,
        })
    }

    pub(crate) fn parse_returning_items(&mut self) -> PResult<Vec<SelectColumn>> {
        let mut items = Vec::new();
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
                items.push(column);
                continue;
            }
            items.push(column);
            break;
        }
        Ok(items)
    }

    pub(crate) fn parse_update(&mut self) -> PResult<Update> {
        self.expect_word("UPDATE")?;
        self.eat_word("ONLY");
        let table = self.parse_from_item()?;
        let joins = self.parse_joins()?;
        self.expect_word("SET")?;
        let set = self.parse_assignments()?;
        let output = if self.at_word("OUTPUT") {
            self.verbatim_until(&[";"], &["FROM", "WHERE"])
        } else {
            None
        };
        let (mut from, mut from_joins) = (Vec::new(), Vec::new());
        if self.eat_word("FROM") {
            from = self.parse_from_items()?;
            from_joins = self.parse_joins()?;
        }
        let where_clause = if self.eat_word("WHERE") {
            Some(self.parse_condition()?)
        } else {
            None
        };
        let mut update = Update {
            table,
            joins,
            set,
            from,
            from_joins,
            where_clause,
            order_by: Vec::new(),
            limit: None,
            returning: Vec::new(),
            output,
        };
        if self.at_word("ORDER") {
            self.advance();
            self.expect_word("BY")?;
            update.order_by = self.parse_order_items()?;
        }
        if self.at_word("LIMIT") {
            self.advance();
            update.limit = Some(Limit {
                values: vec![self.parse_expr()?],
            });
        }
        if self.eat_word("RETURNING") {
            update.returning = self.parse_returning_items()?;
        }
        Ok(update)
    }

    pub(crate) fn parse_delete(&mut self) -> PResult<Delete> {
        self.expect_word("DELETE")?;
        let mut delete = Delete {
            targets: Vec::new(),
            from: Vec::new(),
            joins: Vec::new(),
            using: Vec::new(),
            where_clause: None,
            order_by: Vec::new(),
            limit: None,
            returning: Vec::new(),
            output: None,
        };
        // MySQL multi-table form: `DELETE t1, t2 FROM ...`; T-SQL allows
        // `DELETE t WHERE ...` with no FROM at all.
        if !self.at_word("FROM")
            && !self.at_word("USING")
            && !self.at_word("WHERE")
            && !self.at_word("OUTPUT")
            && !self.peek().is_punct(";")
            && !self.peek().is_eof()
        {
            delete.targets.push(self.parse_object_name()?);
            while self.eat_punct(",") {
                delete.targets.push(self.parse_object_name()?);
            }
        }
        if self.eat_word("FROM") {
            delete.from = self.parse_from_items()?;
            delete.joins = self.parse_joins()?;
        }
        if self.eat_word("USING") {
            delete.using = self.parse_from_items()?;
        }
        if self.at_word("OUTPUT") {
            delete.output = self.verbatim_until(&[";"], &["WHERE"]);
        }
        if self.eat_word("WHERE") {
            delete.where_clause = Some(self.parse_condition()?);
        }
        if self.at_word("ORDER") {
            self.advance();
            self.expect_word("BY")?;
            delete.order_by = self.parse_order_items()?;
        }
        if self.at_word("LIMIT") {
            self.advance();
            delete.limit = Some(Limit {
                values: vec![self.parse_expr()?],
            });
        }
        if self.eat_word("RETURNING") {
            delete.returning = self.parse_returning_items()?;
        }
        Ok(delete)
    }

    pub(crate) fn parse_merge(&mut self) -> PResult<Merge> {
        self.expect_word("MERGE")?;
        self.eat_word("INTO");
        let target = self.parse_from_item()?;
        self.expect_word("USING")?;
        let source = self.parse_from_item()?;
        self.expect_word("ON")?;
        let on = self.parse_condition()?;
        let mut clauses = Vec::new();
        while self.at_word("WHEN") {
            clauses.push(self.parse_merge_clause()?);
        }
        if clauses.is_empty() {
            return Err(self.expected("`WHEN`"));
        }
        let output = if self.at_word("OUTPUT") {
            self.verbatim_until(&[";"], &[])
        } else {
            None
        };
        Ok(Merge {
            target,
            source,
            on,
            clauses,
            output,
        })
    }

    fn parse_merge_clause(&mut self) -> PResult<MergeClause> {
        self.expect_word("WHEN")?;
        let mut when = String::from("WHEN");
        if self.eat_word("NOT") {
            when.push_str(" NOT");
        }
        self.expect_word("MATCHED")?;
        when.push_str(" MATCHED");
        if self.eat_word("BY") {
            when.push_str(" BY");
            if self.eat_word("SOURCE") {
                when.push_str(" SOURCE");
            } else {
                self.expect_word("TARGET")?;
                when.push_str(" TARGET");
            }
        }
        let condition = if self.eat_word("AND") {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect_word("THEN")?;
        let action = if self.eat_word("UPDATE") {
            self.expect_word("SET")?;
            MergeAction::Update {
                set: self.parse_assignments()?,
            }
        } else if self.eat_word("INSERT") {
            let mut columns = Vec::new();
            if self.at_punct("(") {
                self.advance();
                columns.push(self.expect_name_token("a column name")?.value);
                while self.eat_punct(",") {
                    columns.push(self.expect_name_token("a column name")?.value);
                }
                self.expect_punct(")")?;
            }
            if self.at_word("DEFAULT") {
                self.advance();
                self.expect_word("VALUES")?;
                MergeAction::InsertDefaultValues
            } else {
                self.expect_word("VALUES")?;
                self.expect_punct("(")?;
                let mut values = Vec::new();
                if !self.at_punct(")") {
                    values.push(self.parse_expr()?);
                    while self.eat_punct(",") {
                        values.push(self.parse_expr()?);
                    }
                }
                self.expect_punct(")")?;
                MergeAction::Insert { columns, values }
            }
        } else if self.eat_word("DELETE") {
            MergeAction::Delete
        } else if self.eat_word("DO") {
            self.expect_word("NOTHING")?;
            MergeAction::DoNothing
        } else {
            match self.verbatim_until(&[";"], &["WHEN", "OUTPUT"]) {
                Some(text) => MergeAction::Raw(text),
                None => return Err(self.expected("a merge action")),
            }
        };
        Ok(MergeClause {
            when,
            condition,
            action,
        })
    }
}
