//! DDL statements. Structured where the shape is stable across dialects,
//! verbatim for the open-ended tails (engine options, storage clauses).

use crate::ast::*;

use super::{PResult, Parser};

/// Keywords that open an unnamed table-level constraint.
const CONSTRAINT_STARTERS: &[&str] = &[
    "PRIMARY", "FOREIGN", "UNIQUE", "CHECK", "EXCLUDE", "KEY", "INDEX", "FULLTEXT", "SPATIAL",
];

const DROPPABLE_OBJECTS: &[&str] = &["TABLE", "VIEW", "INDEX", "SEQUENCE", "SCHEMA"];

impl Parser<'_> {
    pub(crate) fn parse_create(&mut self) -> PResult<StatementKind> {
        let start = self.peek().offset;
        self.expect_word("CREATE")?;
        let or_replace = if self.at_word("OR") {
            self.advance();
            self.expect_word("REPLACE")?;
            true
        } else {
            false
        };
        let mut modifiers = Vec::new();
        while self.at_any_word(&["TEMP", "TEMPORARY", "GLOBAL", "LOCAL", "UNLOGGED"]) {
            modifiers.push(self.advance().upper);
        }
        if self.at_word("UNIQUE") {
            self.advance();
            self.expect_word("INDEX")?;
            return Ok(StatementKind::CreateIndex(Box::new(
                self.parse_create_index(true)?,
            )));
        }
        if self.at_word("INDEX") {
            self.advance();
            return Ok(StatementKind::CreateIndex(Box::new(
                self.parse_create_index(false)?,
            )));
        }
        if self.at_word("MATERIALIZED") {
            self.advance();
            self.expect_word("VIEW")?;
            return Ok(StatementKind::CreateView(Box::new(self.parse_create_view(
                or_replace,
                true,
                !modifiers.is_empty(),
            )?)));
        }
        if self.at_word("VIEW") {
            self.advance();
            return Ok(StatementKind::CreateView(Box::new(self.parse_create_view(
                or_replace,
                false,
                !modifiers.is_empty(),
            )?)));
        }
        if self.at_word("TABLE") {
            self.advance();
            return Ok(StatementKind::CreateTable(Box::new(
                self.parse_create_table(or_replace, modifiers)?,
            )));
        }
        if self.at_word("POLICY") {
            self.advance();
            return Ok(StatementKind::CreatePolicy(Box::new(
                self.parse_create_policy()?,
            )));
        }
        if self.at_any_word(&["PROCEDURE", "FUNCTION", "TRIGGER", "EVENT"]) {
            return Ok(self.consume_raw_routine(start));
        }
        // CREATE SCHEMA / SEQUENCE / TYPE / EXTENSION / ... pass through.
        let raw = self
            .consume_raw_statement(start, RawReason::Unsupported)
            .ok_or_else(|| self.expected("a CREATE statement"))?;
        self.set_statement_closed();
        Ok(StatementKind::Raw(Box::new(raw)))
    }

    fn parse_if_not_exists(&mut self) -> PResult<bool> {
        if self.at_word("IF") {
            self.advance();
            self.expect_word("NOT")?;
            self.expect_word("EXISTS")?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn parse_if_exists(&mut self) -> PResult<bool> {
        if self.at_word("IF") && self.peek_nth(1).is_word("EXISTS") {
            self.advance();
            self.advance();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    // region: CREATE TABLE

    fn parse_create_table(
        &mut self,
        or_replace: bool,
        modifiers: Vec<String>,
    ) -> PResult<CreateTable> {
        let if_not_exists = self.parse_if_not_exists()?;
        let name = self.parse_object_name()?;
        let body = if self.at_punct("(") {
            if self.paren_starts_query() {
                self.advance();
                let query = self.parse_query()?;
                self.expect_punct(")")?;
                CreateTableBody::ParenQuery(query)
            } else {
                self.parse_table_elements()?
            }
        } else if self.eat_word("AS") {
            CreateTableBody::AsQuery(self.parse_query()?)
        } else if self.eat_word("LIKE") {
            CreateTableBody::Like(self.parse_object_name()?)
        } else {
            CreateTableBody::None
        };
        let options = self.verbatim_until(&[";"], &["GO"]);
        Ok(CreateTable {
            or_replace,
            modifiers,
            if_not_exists,
            name,
            body,
            options,
        })
    }

    fn parse_table_elements(&mut self) -> PResult<CreateTableBody> {
        self.expect_punct("(")?;
        let mut elements = Vec::new();
        let mut trailing_comma = false;
        loop {
            // Checked before draining comments so that comments sitting in
            // front of the closing paren stay in the stream.
            if self.at_punct(")") {
                self.advance();
                trailing_comma = !elements.is_empty();
                break;
            }
            let leading_comments = self.take_pending_comments();
            let mut element = self.parse_table_element(leading_comments)?;
            let trailing = self.trailing_line_comment();
            set_element_trailing(&mut element, trailing);
            elements.push(element);
            if self.eat_punct(",") {
                if let Some(last) = elements.last_mut() {
                    if element_trailing_is_none(last) {
                        let comment = self.trailing_line_comment();
                        set_element_trailing(last, comment);
                    }
                }
                continue;
            }
            self.expect_punct(")")?;
            break;
        }
        Ok(CreateTableBody::Elements {
            elements,
            trailing_comma,
        })
    }

    fn parse_table_element(&mut self, leading_comments: Vec<Comment>) -> PResult<TableElement> {
        if self.at_word("CONSTRAINT") {
            self.advance();
            let name = self.expect_name_token("a constraint name")?;
            let body = self
                .verbatim_until(&[",", ")"], &[])
                .ok_or_else(|| self.expected("a constraint body"))?;
            return Ok(TableElement::Constraint(TableConstraint {
                name: Some(name.value),
                body,
                leading_comments,
                trailing_comment: None,
            }));
        }
        if self.at_any_word(CONSTRAINT_STARTERS) {
            let body = self
                .verbatim_until(&[",", ")"], &[])
                .ok_or_else(|| self.expected("a constraint body"))?;
            return Ok(TableElement::Constraint(TableConstraint {
                name: None,
                body,
                leading_comments,
                trailing_comment: None,
            }));
        }
        if self.at_word("LIKE") {
            let text = self
                .verbatim_until(&[",", ")"], &[])
                .ok_or_else(|| self.expected("a table element"))?;
            return Ok(TableElement::Raw(RawElement {
                text,
                leading_comments,
                trailing_comment: None,
            }));
        }
        let name = self.expect_name_token("a column name")?;
        let ty = if self.at_punct(",") || self.at_punct(")") {
            None
        } else {
            Some(self.parse_type_name()?)
        };
        let constraints = self.verbatim_until(&[",", ")"], &[]);
        Ok(TableElement::Column(ColumnDef {
            name: name.value,
            ty,
            constraints,
            leading_comments,
            trailing_comment: None,
        }))
    }

    // endregion

    // region: CREATE INDEX / VIEW / POLICY

    fn parse_create_index(&mut self, unique: bool) -> PResult<CreateIndex> {
        let concurrently = self.eat_word("CONCURRENTLY");
        let if_not_exists = self.parse_if_not_exists()?;
        let name = if self.at_word("ON") {
            None
        } else {
            Some(self.parse_object_name()?)
        };
        self.expect_word("ON")?;
        let table = self.parse_object_name()?;
        let using = if self.eat_word("USING") {
            Some(self.expect_name_token("an access method")?.value)
        } else {
            None
        };
        self.expect_punct("(")?;
        let columns = self.parse_order_items()?;
        self.expect_punct(")")?;
        let mut include = Vec::new();
        if self.eat_word("INCLUDE") {
            self.expect_punct("(")?;
            include.push(self.expect_name_token("a column name")?.value);
            while self.eat_punct(",") {
                include.push(self.expect_name_token("a column name")?.value);
            }
            self.expect_punct(")")?;
        }
        let options = if self.at_word("WITH") || self.at_word("TABLESPACE") {
            self.verbatim_until(&[";"], &["WHERE"])
        } else {
            None
        };
        let where_clause = if self.eat_word("WHERE") {
            Some(self.parse_condition()?)
        } else {
            None
        };
        Ok(CreateIndex {
            unique,
            concurrently,
            if_not_exists,
            name,
            table,
            using,
            columns,
            include,
            where_clause,
            options,
        })
    }

    fn parse_create_view(
        &mut self,
        or_replace: bool,
        materialized: bool,
        temporary: bool,
    ) -> PResult<CreateView> {
        let name = self.parse_object_name()?;
        let mut columns = Vec::new();
        if self.at_punct("(") {
            self.advance();
            columns.push(self.expect_name_token("a column name")?.value);
            while self.eat_punct(",") {
                columns.push(self.expect_name_token("a column name")?.value);
            }
            self.expect_punct(")")?;
        }
        let options = if self.at_word("WITH") && self.peek_nth(1).is_punct("(") {
            let start = self.peek().offset;
            self.advance();
            let mut end = start;
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
            Some(self.src[start..end].to_string())
        } else {
            None
        };
        self.expect_word("AS")?;
        let query = self.parse_query()?;
        let check_option = if self.at_word("WITH") {
            self.verbatim_until(&[";"], &[])
        } else {
            None
        };
        Ok(CreateView {
            or_replace,
            materialized,
            temporary,
            name,
            columns,
            options,
            query,
            check_option,
        })
    }

    fn parse_create_policy(&mut self) -> PResult<CreatePolicy> {
        let name = self.expect_name_token("a policy name")?;
        self.expect_word("ON")?;
        let table = self.parse_object_name()?;
        let mut policy = CreatePolicy {
            name: name.value,
            table,
            as_: None,
            for_: None,
            to: Vec::new(),
            using: None,
            with_check: None,
        };
        loop {
            if self.at_word("AS") {
                self.advance();
                policy.as_ = Some(self.expect_name_token("a policy mode")?.upper);
                continue;
            }
            if self.at_word("FOR") {
                self.advance();
                policy.for_ = Some(self.expect_name_token("a command")?.upper);
                continue;
            }
            if self.at_word("TO") {
                self.advance();
                policy.to.push(self.expect_name_token("a role")?.value);
                while self.eat_punct(",") {
                    policy.to.push(self.expect_name_token("a role")?.value);
                }
                continue;
            }
            if self.at_word("USING") {
                self.advance();
                self.expect_punct("(")?;
                policy.using = Some(self.parse_expr()?);
                self.expect_punct(")")?;
                continue;
            }
            if self.at_word("WITH") {
                self.advance();
                self.expect_word("CHECK")?;
                self.expect_punct("(")?;
                policy.with_check = Some(self.parse_expr()?);
                self.expect_punct(")")?;
                continue;
            }
            break;
        }
        Ok(policy)
    }

    // endregion

    // region: ALTER / DROP

    pub(crate) fn parse_alter(&mut self) -> PResult<StatementKind> {
        let start = self.peek().offset;
        self.expect_word("ALTER")?;
        if !self.at_word("TABLE") {
            let raw = self
                .consume_raw_statement(start, RawReason::Unsupported)
                .ok_or_else(|| self.expected("an ALTER statement"))?;
            self.set_statement_closed();
            return Ok(StatementKind::Raw(Box::new(raw)));
        }
        self.advance();
        let if_exists = self.parse_if_exists()?;
        let only = self.eat_word("ONLY");
        let name = self.parse_object_name()?;
        let mut actions = vec![self.parse_alter_action()?];
        while self.eat_punct(",") {
            actions.push(self.parse_alter_action()?);
        }
        Ok(StatementKind::AlterTable(Box::new(AlterTable {
            if_exists,
            only,
            name,
            actions,
        })))
    }

    fn parse_alter_action(&mut self) -> PResult<AlterAction> {
        if self.at_word("ADD") {
            self.advance();
            if self.at_word("CONSTRAINT") {
                self.advance();
                let name = self.expect_name_token("a constraint name")?;
                let body = self
                    .verbatim_until(&[",", ";"], &[])
                    .ok_or_else(|| self.expected("a constraint body"))?;
                return Ok(AlterAction::AddConstraint(TableConstraint {
                    name: Some(name.value),
                    body,
                    leading_comments: Vec::new(),
                    trailing_comment: None,
                }));
            }
            if self.at_any_word(CONSTRAINT_STARTERS) {
                let body = self
                    .verbatim_until(&[",", ";"], &[])
                    .ok_or_else(|| self.expected("a constraint body"))?;
                return Ok(AlterAction::AddConstraint(TableConstraint {
                    name: None,
                    body,
                    leading_comments: Vec::new(),
                    trailing_comment: None,
                }));
            }
            self.eat_word("COLUMN");
            let if_not_exists = self.parse_if_not_exists()?;
            let name = self.expect_name_token("a column name")?;
            let ty = if self.at_punct(",") || self.at_punct(";") || self.peek().is_eof() {
                None
            } else {
                Some(self.parse_type_name()?)
            };
            let constraints = self.verbatim_until(&[",", ";"], &[]);
            return Ok(AlterAction::AddColumn {
                if_not_exists,
                def: ColumnDef {
                    name: name.value,
                    ty,
                    constraints,
                    leading_comments: Vec::new(),
                    trailing_comment: None,
                },
            });
        }
        if self.at_word("DROP") {
            self.advance();
            if self.at_word("CONSTRAINT") {
                self.advance();
                let if_exists = self.parse_if_exists()?;
                let name = self.expect_name_token("a constraint name")?;
                let behavior = if self.at_word("CASCADE") || self.at_word("RESTRICT") {
                    Some(self.advance().upper)
                } else {
                    None
                };
                return Ok(AlterAction::DropConstraint {
                    if_exists,
                    name: name.value,
                    behavior,
                });
            }
            self.eat_word("COLUMN");
            let if_exists = self.parse_if_exists()?;
            let name = self.expect_name_token("a column name")?;
            let behavior = if self.at_word("CASCADE") || self.at_word("RESTRICT") {
                Some(self.advance().upper)
            } else {
                None
            };
            return Ok(AlterAction::DropColumn {
                if_exists,
                name: name.value,
                behavior,
            });
        }
        if self.at_word("ALTER") {
            self.advance();
            self.eat_word("COLUMN");
            let name = self.expect_name_token("a column name")?;
            let action = self
                .verbatim_until(&[",", ";"], &[])
                .ok_or_else(|| self.expected("a column action"))?;
            return Ok(AlterAction::AlterColumn {
                name: name.value,
                action,
            });
        }
        if self.at_word("RENAME") {
            self.advance();
            if self.eat_word("TO") {
                let to = self.expect_name_token("a table name")?;
                return Ok(AlterAction::RenameTo { to: to.value });
            }
            self.eat_word("COLUMN");
            let from = self.expect_name_token("a column name")?;
            self.expect_word("TO")?;
            let to = self.expect_name_token("a column name")?;
            return Ok(AlterAction::RenameColumn {
                from: from.value,
                to: to.value,
            });
        }
        if self.at_word("OWNER") {
            self.advance();
            self.expect_word("TO")?;
            let owner = self.expect_name_token("an owner")?;
            return Ok(AlterAction::OwnerTo(owner.value));
        }
        if self.at_word("SET") {
            if self.peek_nth(1).is_word("SCHEMA") {
                self.advance();
                self.advance();
                let schema = self.expect_name_token("a schema name")?;
                return Ok(AlterAction::SetSchema(schema.value));
            }
            if self.peek_nth(1).is_word("TABLESPACE") {
                self.advance();
                self.advance();
                let tablespace = self.expect_name_token("a tablespace name")?;
                return Ok(AlterAction::SetTablespace(tablespace.value));
            }
        }
        let raw = self
            .verbatim_until(&[",", ";"], &[])
            .ok_or_else(|| self.expected("an ALTER TABLE action"))?;
        Ok(AlterAction::Raw(raw))
    }

    pub(crate) fn parse_drop(&mut self) -> PResult<StatementKind> {
        let start = self.peek().offset;
        self.expect_word("DROP")?;
        let object = if self.at_word("MATERIALIZED") && self.peek_nth(1).is_word("VIEW") {
            self.advance();
            self.advance();
            "MATERIALIZED VIEW".to_string()
        } else if self.at_any_word(DROPPABLE_OBJECTS) {
            self.advance().upper
        } else {
            let raw = self
                .consume_raw_statement(start, RawReason::Unsupported)
                .ok_or_else(|| self.expected("a DROP statement"))?;
            self.set_statement_closed();
            return Ok(StatementKind::Raw(Box::new(raw)));
        };
        let concurrently = self.eat_word("CONCURRENTLY");
        let if_exists = self.parse_if_exists()?;
        let mut names = vec![self.parse_object_name()?];
        while self.eat_punct(",") {
            names.push(self.parse_object_name()?);
        }
        let behavior = if self.at_word("CASCADE") || self.at_word("RESTRICT") {
            Some(self.advance().upper)
        } else {
            None
        };
        Ok(StatementKind::DropTable(Box::new(DropTable {
            object,
            concurrently,
            if_exists,
            names,
            behavior,
        })))
    }

    // endregion

    // region: EXPLAIN / GRANT / TRUNCATE

    pub(crate) fn parse_explain(&mut self) -> PResult<StatementKind> {
        self.expect_word("EXPLAIN")?;
        let start = self.peek().offset;
        let mut end = start;
        loop {
            let token = self.peek();
            if token.is_eof() || token.is_punct(";") {
                break;
            }
            if token.is_punct("(") {
                if self.paren_starts_query() {
                    break;
                }
                // `(FORMAT JSON, ANALYZE)` option list.
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
                continue;
            }
            // Option words like ANALYZE and VERBOSE share spellings with
            // verbatim statement starters; only a structured starter ends
            // the option region.
            if matches!(
                self.profile.handler(&token.upper),
                Some(crate::dialect::StatementHandler::Structured)
            ) {
                break;
            }
            end = self.advance().end_offset();
        }
        let options = (end > start).then(|| self.src[start..end].trim().to_string());
        let stmt_start = self.peek().offset;
        let target = self.with_depth(|p| p.parse_statement(stmt_start))?;
        Ok(StatementKind::Explain(Box::new(Explain {
            options,
            target: Box::new(target),
        })))
    }

    pub(crate) fn parse_grant(&mut self) -> PResult<Grant> {
        let revoke = self.at_word("REVOKE");
        self.advance();
        let privileges = self
            .verbatim_until(&[";"], &["ON", "TO", "FROM"])
            .ok_or_else(|| self.expected("a privilege list"))?;
        let object = if self.eat_word("ON") {
            self.verbatim_until(&[";"], &["TO", "FROM"])
        } else {
            None
        };
        let grantees_kw = if self.eat_word("FROM") {
            "FROM".to_string()
        } else {
            self.expect_word("TO")?;
            "TO".to_string()
        };
        let grantees = self.verbatim_until(&[";"], &["WITH", "GRANTED", "CASCADE", "RESTRICT"]);
        let tail = self.verbatim_until(&[";"], &[]);
        Ok(Grant {
            revoke,
            privileges,
            object,
            grantees_kw,
            grantees,
            tail,
        })
    }

    pub(crate) fn parse_truncate(&mut self) -> PResult<Truncate> {
        self.expect_word("TRUNCATE")?;
        let table_kw = self.eat_word("TABLE");
        let only = self.eat_word("ONLY");
        let mut tables = vec![self.parse_object_name()?];
        while self.eat_punct(",") {
            tables.push(self.parse_object_name()?);
        }
        let tail = self.verbatim_until(&[";"], &[]);
        Ok(Truncate {
            table_kw,
            only,
            tables,
            tail,
        })
    }

    // endregion
}

fn set_element_trailing(element: &mut TableElement, comment: Option<Comment>) {
    if comment.is_none() {
        return;
    }
    match element {
        TableElement::Column(c) => c.trailing_comment = comment,
        TableElement::Constraint(c) => c.trailing_comment = comment,
        TableElement::Raw(r) => r.trailing_comment = comment,
    }
}

fn element_trailing_is_none(element: &TableElement) -> bool {
    match element {
        TableElement::Column(c) => c.trailing_comment.is_none(),
        TableElement::Constraint(c) => c.trailing_comment.is_none(),
        TableElement::Raw(r) => r.trailing_comment.is_none(),
    }
}
