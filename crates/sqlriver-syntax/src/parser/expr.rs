//! Expression parsing: precedence climbing with explicit layers, plus the
//! special primary forms (CASE, CAST, EXTRACT, ...).

use crate::ast::*;
use crate::tokens::TokenKind;

use super::{PResult, Parser};

/// Keywords that stand alone as literals in expression position.
const LITERAL_KEYWORDS: &[&str] = &[
    "NULL",
    "TRUE",
    "FALSE",
    "DEFAULT",
    "CURRENT_DATE",
    "CURRENT_TIME",
    "CURRENT_TIMESTAMP",
    "CURRENT_USER",
    "SESSION_USER",
    "LOCALTIME",
    "LOCALTIMESTAMP",
];

/// Identifier-shaped words that introduce a typed literal when followed by
/// a string (`DATE '2024-01-01'`, `INTERVAL '1 day'`).
const TYPED_LITERAL_WORDS: &[&str] = &["DATE", "TIME", "TIMESTAMP", "INTERVAL"];

const JSON_BITWISE_OPS: &[&str] = &[
    "->", "->>", "#>", "#>>", "@>", "<@", "&&", "?", "?|", "?&", "@?", "^", "&", "|", "#", "<<",
    ">>",
];

impl Parser<'_> {
    pub(crate) fn parse_expr(&mut self) -> PResult<Expr> {
        self.with_depth(Self::parse_or)
    }

    fn parse_or(&mut self) -> PResult<Expr> {
        let mut left = self.parse_and()?;
        loop {
            let op = if self.eat_word("OR") {
                "OR"
            } else if self.eat_word("XOR") {
                "XOR"
            } else {
                break;
            };
            let right = self.parse_and()?;
            left = Expr::binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> PResult<Expr> {
        let mut left = self.parse_not()?;
        while self.eat_word("AND") {
            let right = self.parse_not()?;
            left = Expr::binary(left, "AND", right);
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> PResult<Expr> {
        // `NOT IN` / `NOT LIKE` belong to the comparison layer; only a
        // plain prefix NOT is consumed here.
        if self.at_word("NOT") && !self.peek_nth(1).is_eof() {
            self.advance();
            let expr = self.with_depth(Self::parse_not)?;
            return Ok(Expr::Unary {
                op: "NOT".to_string(),
                expr: Box::new(expr),
                postfix: false,
            });
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> PResult<Expr> {
        let mut left = self.parse_additive()?;
        loop {
            let token = self.peek().clone();
            if token.kind == TokenKind::Operator {
                match token.value.as_str() {
                    "=" | "<>" | "<" | ">" | "<=" | ">=" | "!=" | "~" | "~*" | "!~" | "!~*"
                    | "@@" => {
                        self.advance();
                        let right = self.parse_additive()?;
                        left = Expr::binary(left, token.value, right);
                        continue;
                    }
                    _ => break,
                }
            }
            if token.is_word("IS") {
                self.advance();
                left = self.parse_is_tail(left)?;
                continue;
            }
            if token.is_word("ISNULL") || token.is_word("NOTNULL") {
                self.advance();
                left = Expr::Unary {
                    op: token.upper,
                    expr: Box::new(left),
                    postfix: true,
                };
                continue;
            }
            if token.is_word("NOT") {
                // Only when a comparison word follows; a bare NOT here
                // belongs to the caller.
                let next = self.peek_nth(1).clone();
                if next.is_word("IN")
                    || next.is_word("LIKE")
                    || next.is_word("ILIKE")
                    || next.is_word("SIMILAR")
                    || next.is_word("BETWEEN")
                    || next.is_word("REGEXP")
                    || next.is_word("RLIKE")
                {
                    self.advance();
                    left = self.parse_comparison_word(left, &next.upper, true)?;
                    continue;
                }
                break;
            }
            if token.is_word("IN")
                || token.is_word("LIKE")
                || token.is_word("ILIKE")
                || token.is_word("SIMILAR")
                || token.is_word("BETWEEN")
                || token.is_word("REGEXP")
                || token.is_word("RLIKE")
            {
                let upper = token.upper.clone();
                left = self.parse_comparison_word(left, &upper, false)?;
                continue;
            }
            break;
        }
        Ok(left)
    }

    fn parse_is_tail(&mut self, left: Expr) -> PResult<Expr> {
        let negated = self.eat_word("NOT");
        if self.eat_word("NULL") {
            let op = if negated { "IS NOT NULL" } else { "IS NULL" };
            return Ok(Expr::Unary {
                op: op.to_string(),
                expr: Box::new(left),
                postfix: true,
            });
        }
        if self.eat_word("DISTINCT") {
            self.expect_word("FROM")?;
            let right = self.parse_additive()?;
            let op = if negated {
                "IS NOT DISTINCT FROM"
            } else {
                "IS DISTINCT FROM"
            };
            return Ok(Expr::binary(left, op, right));
        }
        let right = self.parse_additive()?;
        let op = if negated { "IS NOT" } else { "IS" };
        Ok(Expr::binary(left, op, right))
    }

    fn parse_comparison_word(&mut self, left: Expr, word: &str, negated: bool) -> PResult<Expr> {
        match word {
            "IN" => {
                self.expect_word("IN")?;
                let right = self.parse_in_operand()?;
                let op = if negated { "NOT IN" } else { "IN" };
                Ok(Expr::binary(left, op, right))
            }
            "BETWEEN" => {
                self.expect_word("BETWEEN")?;
                let low = self.parse_additive()?;
                self.expect_word("AND")?;
                let high = self.parse_additive()?;
                let op = if negated { "NOT BETWEEN" } else { "BETWEEN" };
                Ok(Expr::binary(left, op, Expr::binary(low, "AND", high)))
            }
            "SIMILAR" => {
                self.expect_word("SIMILAR")?;
                self.expect_word("TO")?;
                let right = self.parse_additive()?;
                let right = self.parse_escape_tail(right)?;
                let op = if negated { "NOT SIMILAR TO" } else { "SIMILAR TO" };
                Ok(Expr::binary(left, op, right))
            }
            like => {
                self.expect_word(like)?;
                let right = self.parse_additive()?;
                let right = self.parse_escape_tail(right)?;
                let op = if negated {
                    format!("NOT {like}")
                } else {
                    like.to_string()
                };
                Ok(Expr::binary(left, op, right))
            }
        }
    }

    fn parse_escape_tail(&mut self, pattern: Expr) -> PResult<Expr> {
        if self.eat_word("ESCAPE") {
            let escape = self.parse_additive()?;
            Ok(Expr::binary(pattern, "ESCAPE", escape))
        } else {
            Ok(pattern)
        }
    }

    fn parse_in_operand(&mut self) -> PResult<Expr> {
        self.expect_punct("(")?;
        if self.at_any_word(&["SELECT", "WITH", "VALUES"]) {
            let query = self.parse_query()?;
            self.expect_punct(")")?;
            return Ok(Expr::Subquery(Box::new(query)));
        }
        let mut items = vec![self.parse_expr()?];
        while self.eat_punct(",") {
            items.push(self.parse_expr()?);
        }
        self.expect_punct(")")?;
        Ok(Expr::Row(items))
    }

    fn parse_additive(&mut self) -> PResult<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let token = self.peek();
            if token.is_operator("+") || token.is_operator("-") {
                let op = self.advance().value;
                let right = self.parse_multiplicative()?;
                left = Expr::binary(left, op, right);
            } else {
                break;
            }
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> PResult<Expr> {
        let mut left = self.parse_json_bitwise()?;
        loop {
            let token = self.peek();
            if token.is_operator("*")
                || token.is_operator("/")
                || token.is_operator("%")
                || token.is_operator("||")
            {
                let op = self.advance().value;
                let right = self.parse_json_bitwise()?;
                left = Expr::binary(left, op, right);
            } else if token.is_word("DIV") {
                self.advance();
                let right = self.parse_json_bitwise()?;
                left = Expr::binary(left, "DIV", right);
            } else {
                break;
            }
        }
        Ok(left)
    }

    fn parse_json_bitwise(&mut self) -> PResult<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let token = self.peek();
            if token.kind == TokenKind::Operator
                && JSON_BITWISE_OPS.contains(&token.value.as_str())
            {
                let op = self.advance().value;
                let right = self.parse_unary()?;
                left = Expr::binary(left, op, right);
            } else {
                break;
            }
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> PResult<Expr> {
        let token = self.peek();
        if token.is_operator("-") || token.is_operator("+") || token.is_operator("~") {
            let op = self.advance().value;
            let expr = self.with_depth(Self::parse_unary)?;
            return Ok(Expr::Unary {
                op,
                expr: Box::new(expr),
                postfix: false,
            });
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> PResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.eat_operator("::") {
                let ty = self.parse_type_name()?;
                expr = Expr::PgCast {
                    expr: Box::new(expr),
                    ty,
                };
                continue;
            }
            if self.at_punct("[") {
                self.advance();
                expr = Expr::ArraySubscript {
                    expr: Box::new(expr),
                    index: Box::new(self.parse_subscript()?),
                };
                continue;
            }
            if self.at_word("COLLATE") {
                self.advance();
                let collation = self.parse_object_name()?;
                expr = Expr::Collate {
                    expr: Box::new(expr),
                    collation,
                };
                continue;
            }
            break;
        }
        Ok(expr)
    }

    fn parse_subscript(&mut self) -> PResult<Subscript> {
        let mut sub = Subscript {
            lower: None,
            upper: None,
            slice: false,
        };
        if !self.at_punct(":") && !self.at_punct("]") {
            sub.lower = Some(self.parse_expr()?);
        }
        if self.eat_punct(":") {
            sub.slice = true;
            if !self.at_punct("]") {
                sub.upper = Some(self.parse_expr()?);
            }
        }
        self.expect_punct("]")?;
        Ok(sub)
    }

    fn parse_primary(&mut self) -> PResult<Expr> {
        self.with_depth(Self::parse_primary_inner)
    }

    fn parse_primary_inner(&mut self) -> PResult<Expr> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Number | TokenKind::String => {
                self.advance();
                Ok(Expr::Literal(token.value))
            }
            TokenKind::Operator if token.value == "?" => {
                self.advance();
                Ok(Expr::Literal("?".to_string()))
            }
            TokenKind::Operator if token.value == "*" => {
                self.advance();
                Ok(Expr::Star { qualifier: None })
            }
            TokenKind::Punctuation if token.value == "(" => self.parse_paren_or_subquery(),
            TokenKind::Keyword | TokenKind::Identifier => self.parse_word_primary(&token.upper),
            _ => Err(self.expected("an expression")),
        }
    }

    fn parse_paren_or_subquery(&mut self) -> PResult<Expr> {
        self.expect_punct("(")?;
        if self.at_any_word(&["SELECT", "WITH", "VALUES"]) {
            let query = self.parse_query()?;
            self.expect_punct(")")?;
            return Ok(Expr::Subquery(Box::new(query)));
        }
        let first = self.parse_expr()?;
        if self.at_punct(",") {
            let mut items = vec![first];
            while self.eat_punct(",") {
                items.push(self.parse_expr()?);
            }
            self.expect_punct(")")?;
            return Ok(Expr::Row(items));
        }
        self.expect_punct(")")?;
        Ok(Expr::Paren(Box::new(first)))
    }

    fn parse_word_primary(&mut self, upper: &str) -> PResult<Expr> {
        match upper {
            "CASE" => self.parse_case(),
            "CAST" if self.peek_nth(1).is_punct("(") => self.parse_cast(),
            "EXTRACT" if self.peek_nth(1).is_punct("(") => self.parse_extract(),
            "POSITION" if self.peek_nth(1).is_punct("(") => self.parse_position(),
            "SUBSTRING" if self.peek_nth(1).is_punct("(") => self.parse_substring(),
            "OVERLAY" if self.peek_nth(1).is_punct("(") => self.parse_overlay(),
            "TRIM" if self.peek_nth(1).is_punct("(") => self.parse_trim(),
            "EXISTS" | "ANY" | "ALL" | "SOME" if self.peek_nth(1).is_punct("(") => {
                let name = self.advance();
                let call = self.parse_function_call(Name::single(name.value))?;
                Ok(Expr::FunctionCall(Box::new(call)))
            }
            "ARRAY" if self.peek_nth(1).is_punct("[") || self.peek_nth(1).is_punct("(") => {
                self.parse_array_constructor()
            }
            _ if LITERAL_KEYWORDS.contains(&upper) => {
                let token = self.advance();
                Ok(Expr::Literal(token.value))
            }
            _ => {
                let token = self.peek();
                if token.kind == TokenKind::Keyword
                    && !(self.profile.is_function_keyword(upper)
                        && self.peek_nth(1).is_punct("("))
                {
                    return Err(self.expected("an expression"));
                }
                self.parse_name_or_function()
            }
        }
    }

    fn parse_name_or_function(&mut self) -> PResult<Expr> {
        let first = self.advance();
        let mut parts = vec![first.value.clone()];
        while self.at_punct(".") {
            let next = self.peek_nth(1).clone();
            if next.is_operator("*") {
                self.advance();
                self.advance();
                return Ok(Expr::Star {
                    qualifier: Some(Name { parts }),
                });
            }
            if matches!(next.kind, TokenKind::Keyword | TokenKind::Identifier) {
                self.advance();
                let part = self.advance();
                parts.push(part.value);
            } else {
                break;
            }
        }
        if self.at_punct("(") {
            let call = self.parse_function_call(Name { parts })?;
            return Ok(Expr::FunctionCall(Box::new(call)));
        }
        // Typed literals: `DATE '2024-01-01'`, `INTERVAL '1 day'`.
        if parts.len() == 1
            && TYPED_LITERAL_WORDS.contains(&first.upper.as_str())
            && self.peek().kind == TokenKind::String
        {
            let literal = self.advance();
            return Ok(Expr::Literal(format!("{} {}", parts[0], literal.value)));
        }
        Ok(Expr::Identifier(Name { parts }))
    }

    pub(crate) fn parse_object_name(&mut self) -> PResult<Name> {
        let first = self.expect_name_token("a name")?;
        let mut parts = vec![first.value];
        while self.at_punct(".") {
            let next = self.peek_nth(1).clone();
            if matches!(next.kind, TokenKind::Keyword | TokenKind::Identifier) {
                self.advance();
                let part = self.advance();
                parts.push(part.value);
            } else {
                break;
            }
        }
        Ok(Name { parts })
    }

    pub(crate) fn parse_function_call(&mut self, name: Name) -> PResult<FunctionCall> {
        let mut call = FunctionCall::new(name);
        self.expect_punct("(")?;
        self.with_depth(|p| {
            if p.eat_word("DISTINCT") {
                call.distinct = true;
            }
            if !p.at_punct(")") {
                call.args.push(p.parse_expr()?);
                while p.eat_punct(",") {
                    call.args.push(p.parse_expr()?);
                }
            }
            if p.eat_word("ORDER") {
                p.expect_word("BY")?;
                call.order_by = p.parse_order_items()?;
            }
            if p.eat_word("SEPARATOR") {
                let sep = p.advance();
                call.separator = Some(sep.value);
            }
            Ok(())
        })?;
        self.expect_punct(")")?;
        if self.at_word("WITHIN") {
            self.advance();
            self.expect_word("GROUP")?;
            self.expect_punct("(")?;
            self.expect_word("ORDER")?;
            self.expect_word("BY")?;
            call.within_group = self.parse_order_items()?;
            self.expect_punct(")")?;
        }
        if self.at_word("FILTER") {
            self.advance();
            self.expect_punct("(")?;
            self.expect_word("WHERE")?;
            call.filter = Some(Box::new(self.parse_expr()?));
            self.expect_punct(")")?;
        }
        if self.at_word("OVER") {
            self.advance();
            if self.at_punct("(") {
                call.over = Some(Over::Spec(self.parse_window_spec()?));
            } else {
                let name = self.expect_name_token("a window name")?;
                call.over = Some(Over::Name(name.value));
            }
        }
        Ok(call)
    }

    pub(crate) fn parse_window_spec(&mut self) -> PResult<WindowSpec> {
        let mut spec = WindowSpec::default();
        self.expect_punct("(")?;
        {
            let token = self.peek();
            if matches!(token.kind, TokenKind::Identifier)
                && !token.is_word("PARTITION")
                && !token.is_word("ORDER")
                && !token.is_word("ROWS")
                && !token.is_word("RANGE")
                && !token.is_word("GROUPS")
            {
                spec.base = Some(self.advance().value);
            }
        }
        if self.eat_word("PARTITION") {
            self.expect_word("BY")?;
            spec.partition_by.push(self.parse_expr()?);
            while self.eat_punct(",") {
                spec.partition_by.push(self.parse_expr()?);
            }
        }
        if self.eat_word("ORDER") {
            self.expect_word("BY")?;
            spec.order_by = self.parse_order_items()?;
        }
        if self.at_any_word(&["ROWS", "RANGE", "GROUPS"]) {
            let units = self.advance().upper;
            let (start, end) = if self.eat_word("BETWEEN") {
                let start = self.parse_frame_bound()?;
                self.expect_word("AND")?;
                (start, Some(self.parse_frame_bound()?))
            } else {
                (self.parse_frame_bound()?, None)
            };
            let exclude = if self.at_word("EXCLUDE") {
                self.verbatim_until(&[")"], &[])
            } else {
                None
            };
            spec.frame = Some(WindowFrame {
                units,
                start,
                end,
                exclude,
            });
        }
        self.expect_punct(")")?;
        Ok(spec)
    }

    fn parse_frame_bound(&mut self) -> PResult<FrameBound> {
        if self.eat_word("UNBOUNDED") {
            if self.eat_word("PRECEDING") {
                return Ok(FrameBound::UnboundedPreceding);
            }
            self.expect_word("FOLLOWING")?;
            return Ok(FrameBound::UnboundedFollowing);
        }
        if self.eat_word("CURRENT") {
            self.expect_word("ROW")?;
            return Ok(FrameBound::CurrentRow);
        }
        let offset = self.parse_expr()?;
        if self.eat_word("PRECEDING") {
            Ok(FrameBound::Preceding(offset))
        } else {
            self.expect_word("FOLLOWING")?;
            Ok(FrameBound::Following(offset))
        }
    }

    pub(crate) fn parse_order_items(&mut self) -> PResult<Vec<OrderItem>> {
        let mut items = vec![self.parse_order_item()?];
        while self.eat_punct(",") {
            if let Some(item) = items.last_mut() {
                if item.trailing_comment.is_none() {
                    item.trailing_comment = self.trailing_line_comment();
                }
            }
            items.push(self.parse_order_item()?);
        }
        Ok(items)
    }

    pub(crate) fn parse_order_item(&mut self) -> PResult<OrderItem> {
        let expr = self.parse_expr()?;
        let direction = if self.eat_word("ASC") {
            Some(OrderDirection::Asc)
        } else if self.eat_word("DESC") {
            Some(OrderDirection::Desc)
        } else if self.at_word("USING") {
            self.advance();
            let op = self.advance();
            Some(OrderDirection::Using(op.value))
        } else {
            None
        };
        let nulls = if self.eat_word("NULLS") {
            if self.eat_word("FIRST") {
                Some(NullsOrder::First)
            } else {
                self.expect_word("LAST")?;
                Some(NullsOrder::Last)
            }
        } else {
            None
        };
        let trailing_comment = self.trailing_line_comment();
        Ok(OrderItem {
            expr,
            direction,
            nulls,
            trailing_comment,
        })
    }

    fn parse_case(&mut self) -> PResult<Expr> {
        self.expect_word("CASE")?;
        self.with_depth(|p| {
            let operand = if p.at_word("WHEN") {
                None
            } else {
                Some(p.parse_expr()?)
            };
            let mut branches = Vec::new();
            while p.eat_word("WHEN") {
                let condition = p.parse_expr()?;
                p.expect_word("THEN")?;
                let result = p.parse_expr()?;
                branches.push(CaseWhen { condition, result });
            }
            if branches.is_empty() {
                return Err(p.expected("`WHEN`"));
            }
            let else_ = if p.eat_word("ELSE") {
                Some(p.parse_expr()?)
            } else {
                None
            };
            p.expect_word("END")?;
            Ok(Expr::Case(Box::new(CaseExpr {
                operand,
                branches,
                else_,
            })))
        })
    }

    fn parse_cast(&mut self) -> PResult<Expr> {
        self.expect_word("CAST")?;
        self.expect_punct("(")?;
        let expr = self.parse_expr()?;
        self.expect_word("AS")?;
        let ty = self.parse_type_name()?;
        self.expect_punct(")")?;
        Ok(Expr::Cast {
            expr: Box::new(expr),
            ty,
        })
    }

    fn parse_extract(&mut self) -> PResult<Expr> {
        self.expect_word("EXTRACT")?;
        self.expect_punct("(")?;
        let token = self.peek().clone();
        let is_field = matches!(token.kind, TokenKind::Keyword | TokenKind::Identifier)
            && self.peek_nth(1).is_word("FROM");
        if is_field {
            let field = self.advance().value;
            self.expect_word("FROM")?;
            let expr = self.parse_expr()?;
            self.expect_punct(")")?;
            return Ok(Expr::Extract {
                field,
                expr: Box::new(expr),
            });
        }
        self.parse_special_fallback("EXTRACT")
    }

    fn parse_position(&mut self) -> PResult<Expr> {
        self.expect_word("POSITION")?;
        self.expect_punct("(")?;
        let needle = self.parse_additive()?;
        if self.eat_word("IN") {
            let haystack = self.parse_expr()?;
            self.expect_punct(")")?;
            return Ok(Expr::Position {
                needle: Box::new(needle),
                haystack: Box::new(haystack),
            });
        }
        self.parse_special_args_fallback("POSITION", needle)
    }

    fn parse_substring(&mut self) -> PResult<Expr> {
        self.expect_word("SUBSTRING")?;
        self.expect_punct("(")?;
        let expr = self.parse_expr()?;
        if self.at_word("FROM") || self.at_word("FOR") {
            let from = if self.eat_word("FROM") {
                Some(Box::new(self.parse_expr()?))
            } else {
                None
            };
            let for_ = if self.eat_word("FOR") {
                Some(Box::new(self.parse_expr()?))
            } else {
                None
            };
            self.expect_punct(")")?;
            return Ok(Expr::Substring {
                expr: Box::new(expr),
                from,
                for_,
            });
        }
        if self.at_punct(",") {
            return self.parse_special_args_fallback("SUBSTRING", expr);
        }
        self.expect_punct(")")?;
        Ok(Expr::Substring {
            expr: Box::new(expr),
            from: None,
            for_: None,
        })
    }

    fn parse_overlay(&mut self) -> PResult<Expr> {
        self.expect_word("OVERLAY")?;
        self.expect_punct("(")?;
        let expr = self.parse_expr()?;
        if self.eat_word("PLACING") {
            let placing = self.parse_expr()?;
            self.expect_word("FROM")?;
            let from = self.parse_expr()?;
            let for_ = if self.eat_word("FOR") {
                Some(Box::new(self.parse_expr()?))
            } else {
                None
            };
            self.expect_punct(")")?;
            return Ok(Expr::Overlay {
                expr: Box::new(expr),
                placing: Box::new(placing),
                from: Box::new(from),
                for_,
            });
        }
        self.parse_special_args_fallback("OVERLAY", expr)
    }

    fn parse_trim(&mut self) -> PResult<Expr> {
        self.expect_word("TRIM")?;
        self.expect_punct("(")?;
        let spec = if self.at_any_word(&["LEADING", "TRAILING", "BOTH"]) {
            Some(self.advance().upper)
        } else {
            None
        };
        if self.eat_word("FROM") {
            // TRIM(LEADING FROM x)
            let expr = self.parse_expr()?;
            self.expect_punct(")")?;
            return Ok(Expr::Trim {
                spec,
                pattern: None,
                expr: Box::new(expr),
            });
        }
        let first = self.parse_expr()?;
        if self.eat_word("FROM") {
            let expr = self.parse_expr()?;
            self.expect_punct(")")?;
            return Ok(Expr::Trim {
                spec,
                pattern: Some(Box::new(first)),
                expr: Box::new(expr),
            });
        }
        if spec.is_none() && self.at_punct(",") {
            return self.parse_special_args_fallback("TRIM", first);
        }
        self.expect_punct(")")?;
        Ok(Expr::Trim {
            spec,
            pattern: None,
            expr: Box::new(first),
        })
    }

    /// `ARRAY[...]` and `ARRAY(...)` constructors, kept verbatim: the
    /// bracket body may nest arbitrary expressions and subqueries.
    fn parse_array_constructor(&mut self) -> PResult<Expr> {
        let start = self.peek().offset;
        let mut end = self.advance().end_offset(); // ARRAY
        let open = self.advance(); // [ or (
        let close = if open.is_punct("[") { "]" } else { ")" };
        let mut depth = 1_usize;
        loop {
            let token = self.peek();
            if token.is_eof() {
                return Err(self.expected(close));
            }
            if token.is_punct("[") || token.is_punct("(") {
                depth += 1;
            } else if token.is_punct("]") || token.is_punct(")") {
                depth -= 1;
            }
            end = self.advance().end_offset();
            if depth == 0 {
                break;
            }
        }
        Ok(Expr::Raw(self.src[start..end].to_string()))
    }

    /// Plain-function fallback for a special form whose argument list did
    /// not match the keyword syntax; the `(` has already been consumed.
    fn parse_special_fallback(&mut self, name: &str) -> PResult<Expr> {
        let mut call = FunctionCall::new(Name::single(name));
        if !self.at_punct(")") {
            call.args.push(self.parse_expr()?);
            while self.eat_punct(",") {
                call.args.push(self.parse_expr()?);
            }
        }
        self.expect_punct(")")?;
        Ok(Expr::FunctionCall(Box::new(call)))
    }

    fn parse_special_args_fallback(&mut self, name: &str, first: Expr) -> PResult<Expr> {
        let mut call = FunctionCall::new(Name::single(name));
        call.args.push(first);
        while self.eat_punct(",") {
            call.args.push(self.parse_expr()?);
        }
        self.expect_punct(")")?;
        Ok(Expr::FunctionCall(Box::new(call)))
    }

    // region: type names

    pub(crate) fn parse_type_name(&mut self) -> PResult<TypeName> {
        let first = self.expect_name_token("a type name")?;
        let mut name = first.value.clone();
        match first.upper.as_str() {
            "DOUBLE" => {
                if self.at_word("PRECISION") {
                    name.push(' ');
                    name.push_str(&self.advance().value);
                }
            }
            "CHARACTER" | "CHAR" | "NCHAR" | "BIT" => {
                if self.at_word("VARYING") {
                    name.push(' ');
                    name.push_str(&self.advance().value);
                } else if self.at_word("LARGE") {
                    name.push(' ');
                    name.push_str(&self.advance().value);
                    let object = self.expect_word("OBJECT")?;
                    name.push(' ');
                    name.push_str(&object.value);
                }
            }
            "NATIONAL" => {
                if self.at_word("CHARACTER") || self.at_word("CHAR") {
                    name.push(' ');
                    name.push_str(&self.advance().value);
                    if self.at_word("VARYING") {
                        name.push(' ');
                        name.push_str(&self.advance().value);
                    }
                }
            }
            _ => {}
        }
        let params = if self.at_punct("(") {
            Some(self.capture_paren_params()?)
        } else {
            None
        };
        let mut suffix: Option<String> = None;
        if matches!(first.upper.as_str(), "TIME" | "TIMESTAMP")
            && (self.at_word("WITH") || self.at_word("WITHOUT"))
        {
            let mut words = vec![self.advance().value];
            words.push(self.expect_word("TIME")?.value);
            words.push(self.expect_word("ZONE")?.value);
            suffix = Some(words.join(" "));
        }
        while self.at_any_word(&["UNSIGNED", "SIGNED", "ZEROFILL"]) {
            let word = self.advance().value;
            match suffix.as_mut() {
                Some(s) => {
                    s.push(' ');
                    s.push_str(&word);
                }
                None => suffix = Some(word),
            }
        }
        let mut array_dims = 0_u8;
        while self.at_punct("[") && self.peek_nth(1).is_punct("]") {
            self.advance();
            self.advance();
            array_dims = array_dims.saturating_add(1);
        }
        Ok(TypeName {
            name,
            params,
            suffix,
            array_dims,
        })
    }

    /// Capture `( ... )` contents verbatim, preserving interior spacing.
    fn capture_paren_params(&mut self) -> PResult<String> {
        self.expect_punct("(")?;
        let start = self.peek().offset;
        let mut end = start;
        let mut depth = 0_usize;
        loop {
            let token = self.peek();
            if token.is_eof() {
                return Err(self.expected("`)`"));
            }
            if token.is_punct(")") {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            } else if token.is_punct("(") {
                depth += 1;
            }
            let token = self.advance();
            end = token.end_offset();
        }
        self.expect_punct(")")?;
        Ok(self.src[start..end].trim().to_string())
    }

    // endregion
}
