//! Expression parsing: precedence climbing for binary/logical operators,
//! speculative arrow-parameter parsing, member/call chains, literals.

use super::{ParseError, Parser};
use crate::node::{AssignOp, BinaryOp, LogicalOp, NodeData, NodeId, UnaryOp, UpdateOp};
use remod_common::Span;
use remod_scanner::{TokenKind, parse_number, unescape_string, unescape_text};

/// Either side of the binary/logical split, with precedence.
#[derive(Copy, Clone)]
enum InfixOp {
    Binary(BinaryOp),
    Logical(LogicalOp),
}

fn infix_op(kind: TokenKind, allow_in: bool) -> Option<(u8, InfixOp)> {
    use TokenKind::*;
    let entry = match kind {
        QuestionQuestion => (4, InfixOp::Logical(LogicalOp::Nullish)),
        BarBar => (5, InfixOp::Logical(LogicalOp::Or)),
        AmpAmp => (6, InfixOp::Logical(LogicalOp::And)),
        Bar => (7, InfixOp::Binary(BinaryOp::BitOr)),
        Caret => (8, InfixOp::Binary(BinaryOp::BitXor)),
        Amp => (9, InfixOp::Binary(BinaryOp::BitAnd)),
        EqEq => (10, InfixOp::Binary(BinaryOp::EqEq)),
        NotEq => (10, InfixOp::Binary(BinaryOp::NotEq)),
        EqEqEq => (10, InfixOp::Binary(BinaryOp::StrictEq)),
        NotEqEq => (10, InfixOp::Binary(BinaryOp::StrictNotEq)),
        Lt => (11, InfixOp::Binary(BinaryOp::Lt)),
        LtEq => (11, InfixOp::Binary(BinaryOp::LtEq)),
        Gt => (11, InfixOp::Binary(BinaryOp::Gt)),
        GtEq => (11, InfixOp::Binary(BinaryOp::GtEq)),
        Instanceof => (11, InfixOp::Binary(BinaryOp::Instanceof)),
        In if allow_in => (11, InfixOp::Binary(BinaryOp::In)),
        LtLt => (12, InfixOp::Binary(BinaryOp::LeftShift)),
        GtGt => (12, InfixOp::Binary(BinaryOp::RightShift)),
        GtGtGt => (12, InfixOp::Binary(BinaryOp::UnsignedRightShift)),
        Plus => (13, InfixOp::Binary(BinaryOp::Add)),
        Minus => (13, InfixOp::Binary(BinaryOp::Sub)),
        Star => (14, InfixOp::Binary(BinaryOp::Mul)),
        Slash => (14, InfixOp::Binary(BinaryOp::Div)),
        Percent => (14, InfixOp::Binary(BinaryOp::Mod)),
        StarStar => (15, InfixOp::Binary(BinaryOp::Exp)),
        _ => return None,
    };
    Some(entry)
}

fn assign_op(kind: TokenKind) -> Option<AssignOp> {
    use TokenKind::*;
    let op = match kind {
        Eq => AssignOp::Assign,
        PlusEq => AssignOp::AddAssign,
        MinusEq => AssignOp::SubAssign,
        StarEq => AssignOp::MulAssign,
        SlashEq => AssignOp::DivAssign,
        PercentEq => AssignOp::ModAssign,
        StarStarEq => AssignOp::ExpAssign,
        LtLtEq => AssignOp::LeftShiftAssign,
        GtGtEq => AssignOp::RightShiftAssign,
        GtGtGtEq => AssignOp::UnsignedRightShiftAssign,
        BarEq => AssignOp::BitOrAssign,
        CaretEq => AssignOp::BitXorAssign,
        AmpEq => AssignOp::BitAndAssign,
        AmpAmpEq => AssignOp::AndAssign,
        BarBarEq => AssignOp::OrAssign,
        QuestionQuestionEq => AssignOp::NullishAssign,
        _ => return None,
    };
    Some(op)
}

impl<'a> Parser<'a> {
    /// Full expression including the comma operator.
    pub(crate) fn parse_expression(&mut self) -> Result<NodeId, ParseError> {
        let start = self.token.span.start;
        let first = self.parse_assignment_expression()?;
        if !self.at(TokenKind::Comma) {
            return Ok(first);
        }
        let mut expressions = vec![first];
        while self.eat(TokenKind::Comma)? {
            expressions.push(self.parse_assignment_expression()?);
        }
        Ok(self.arena.alloc_spanned(
            NodeData::SequenceExpression { expressions },
            self.finish(start),
        ))
    }

    pub(crate) fn parse_assignment_expression(&mut self) -> Result<NodeId, ParseError> {
        let start = self.token.span.start;

        if self.at(TokenKind::Yield) {
            return self.parse_yield();
        }

        // Arrow functions need speculation: `(a, b) => ...` only reveals
        // itself at the arrow.
        if self.at(TokenKind::LParen) {
            if let Some(arrow) = self.try_parse_paren_arrow(start, false)? {
                return Ok(arrow);
            }
        }
        if self.at_contextual("async") {
            let cp = self.checkpoint();
            self.bump()?;
            if !self.has_newline_before() {
                if self.at(TokenKind::Function) {
                    return self.parse_function_expression(start, true);
                }
                if self.at(TokenKind::LParen) {
                    if let Some(arrow) = self.try_parse_paren_arrow(start, true)? {
                        return Ok(arrow);
                    }
                    self.rewind(cp);
                } else if self.at(TokenKind::Identifier) {
                    if let Some(arrow) = self.try_parse_ident_arrow(start, true)? {
                        return Ok(arrow);
                    }
                    self.rewind(cp);
                } else {
                    self.rewind(cp);
                }
            } else {
                self.rewind(cp);
            }
        }
        if self.at(TokenKind::Identifier) {
            if let Some(arrow) = self.try_parse_ident_arrow(start, false)? {
                return Ok(arrow);
            }
        }

        let expr = self.parse_conditional_expression()?;
        if let Some(op) = assign_op(self.token.kind) {
            self.bump()?;
            let right = self.parse_assignment_expression()?;
            return Ok(self.arena.alloc_spanned(
                NodeData::AssignmentExpression {
                    op,
                    left: expr,
                    right,
                },
                self.finish(start),
            ));
        }
        Ok(expr)
    }

    fn parse_yield(&mut self) -> Result<NodeId, ParseError> {
        let start = self.token.span.start;
        self.bump()?;
        let delegate = self.eat(TokenKind::Star)?;
        let argument = if !self.has_newline_before() && self.token.kind.starts_expression() {
            Some(self.parse_assignment_expression()?)
        } else {
            None
        };
        Ok(self.arena.alloc_spanned(
            NodeData::YieldExpression { argument, delegate },
            self.finish(start),
        ))
    }

    /// `(params) => body`, or `None` with the parser rewound.
    fn try_parse_paren_arrow(
        &mut self,
        start: u32,
        is_async: bool,
    ) -> Result<Option<NodeId>, ParseError> {
        let cp = self.checkpoint();
        let params = match self.parse_params() {
            Ok(params) => params,
            Err(_) => {
                self.rewind(cp);
                return Ok(None);
            }
        };
        if !self.at(TokenKind::Arrow) || self.has_newline_before() {
            self.rewind(cp);
            return Ok(None);
        }
        self.bump()?;
        let body = self.parse_arrow_body()?;
        Ok(Some(self.arena.alloc_spanned(
            NodeData::ArrowFunctionExpression {
                params,
                body,
                is_async,
            },
            self.finish(start),
        )))
    }

    /// `x => body`, or `None` with the parser rewound.
    fn try_parse_ident_arrow(
        &mut self,
        start: u32,
        is_async: bool,
    ) -> Result<Option<NodeId>, ParseError> {
        let cp = self.checkpoint();
        let param = self.parse_identifier()?;
        if !self.at(TokenKind::Arrow) || self.has_newline_before() {
            self.rewind(cp);
            return Ok(None);
        }
        self.bump()?;
        let body = self.parse_arrow_body()?;
        Ok(Some(self.arena.alloc_spanned(
            NodeData::ArrowFunctionExpression {
                params: vec![param],
                body,
                is_async,
            },
            self.finish(start),
        )))
    }

    fn parse_arrow_body(&mut self) -> Result<NodeId, ParseError> {
        if self.at(TokenKind::LBrace) {
            self.parse_block()
        } else {
            self.parse_assignment_expression()
        }
    }

    fn parse_conditional_expression(&mut self) -> Result<NodeId, ParseError> {
        let start = self.token.span.start;
        let test = self.parse_binary_expression(0)?;
        if !self.eat(TokenKind::Question)? {
            return Ok(test);
        }
        let consequent = self.parse_assignment_expression()?;
        self.expect(TokenKind::Colon)?;
        let alternate = self.parse_assignment_expression()?;
        Ok(self.arena.alloc_spanned(
            NodeData::ConditionalExpression {
                test,
                consequent,
                alternate,
            },
            self.finish(start),
        ))
    }

    fn parse_binary_expression(&mut self, min_prec: u8) -> Result<NodeId, ParseError> {
        let start = self.token.span.start;
        let mut left = self.parse_unary_expression()?;
        while let Some((prec, op)) = infix_op(self.token.kind, self.allow_in) {
            if prec < min_prec {
                break;
            }
            self.bump()?;
            // `**` is right-associative; everything else associates left.
            let next_min = if matches!(op, InfixOp::Binary(BinaryOp::Exp)) {
                prec
            } else {
                prec + 1
            };
            let right = self.parse_binary_expression(next_min)?;
            let data = match op {
                InfixOp::Binary(op) => NodeData::BinaryExpression { op, left, right },
                InfixOp::Logical(op) => NodeData::LogicalExpression { op, left, right },
            };
            left = self.arena.alloc_spanned(data, self.finish(start));
        }
        Ok(left)
    }

    fn parse_unary_expression(&mut self) -> Result<NodeId, ParseError> {
        let start = self.token.span.start;
        let unary = match self.token.kind {
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Minus => Some(UnaryOp::Minus),
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Tilde => Some(UnaryOp::BitNot),
            TokenKind::Typeof => Some(UnaryOp::Typeof),
            TokenKind::Void => Some(UnaryOp::Void),
            TokenKind::Delete => Some(UnaryOp::Delete),
            _ => None,
        };
        if let Some(op) = unary {
            self.bump()?;
            let argument = self.parse_unary_expression()?;
            return Ok(self.arena.alloc_spanned(
                NodeData::UnaryExpression { op, argument },
                self.finish(start),
            ));
        }
        if self.at(TokenKind::PlusPlus) || self.at(TokenKind::MinusMinus) {
            let op = if self.at(TokenKind::PlusPlus) {
                UpdateOp::Increment
            } else {
                UpdateOp::Decrement
            };
            self.bump()?;
            let argument = self.parse_unary_expression()?;
            return Ok(self.arena.alloc_spanned(
                NodeData::UpdateExpression {
                    op,
                    prefix: true,
                    argument,
                },
                self.finish(start),
            ));
        }
        if self.at(TokenKind::Await) {
            self.bump()?;
            let argument = self.parse_unary_expression()?;
            return Ok(self.arena.alloc_spanned(
                NodeData::AwaitExpression { argument },
                self.finish(start),
            ));
        }

        let expr = self.parse_member_or_call(true)?;
        if (self.at(TokenKind::PlusPlus) || self.at(TokenKind::MinusMinus))
            && !self.has_newline_before()
        {
            let op = if self.at(TokenKind::PlusPlus) {
                UpdateOp::Increment
            } else {
                UpdateOp::Decrement
            };
            self.bump()?;
            return Ok(self.arena.alloc_spanned(
                NodeData::UpdateExpression {
                    op,
                    prefix: false,
                    argument: expr,
                },
                self.finish(start),
            ));
        }
        Ok(expr)
    }

    pub(crate) fn parse_member_or_call(&mut self, allow_call: bool) -> Result<NodeId, ParseError> {
        let start = self.token.span.start;
        let mut expr = if self.at(TokenKind::New) {
            self.parse_new()?
        } else {
            self.parse_primary_expression()?
        };
        loop {
            match self.token.kind {
                TokenKind::Dot => {
                    self.bump()?;
                    let property = self.parse_property_name()?;
                    expr = self.arena.alloc_spanned(
                        NodeData::MemberExpression {
                            object: expr,
                            property,
                            computed: false,
                        },
                        self.finish(start),
                    );
                }
                TokenKind::LBracket => {
                    self.bump()?;
                    let property = self.parse_expression()?;
                    self.expect(TokenKind::RBracket)?;
                    expr = self.arena.alloc_spanned(
                        NodeData::MemberExpression {
                            object: expr,
                            property,
                            computed: true,
                        },
                        self.finish(start),
                    );
                }
                TokenKind::LParen if allow_call => {
                    let arguments = self.parse_arguments()?;
                    expr = self.arena.alloc_spanned(
                        NodeData::CallExpression {
                            callee: expr,
                            arguments,
                        },
                        self.finish(start),
                    );
                }
                TokenKind::TemplateHead | TokenKind::NoSubstitutionTemplate => {
                    let quasi = self.parse_template_literal()?;
                    expr = self.arena.alloc_spanned(
                        NodeData::TaggedTemplateExpression { tag: expr, quasi },
                        self.finish(start),
                    );
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    /// After a `.`: an identifier, or a keyword used as a property name.
    fn parse_property_name(&mut self) -> Result<NodeId, ParseError> {
        let span = self.token.span;
        let text = self.token_text();
        if self.at(TokenKind::Identifier) || text.chars().all(|c| c.is_ascii_alphabetic()) {
            let name = text.to_string();
            self.bump()?;
            return Ok(self.arena.alloc_spanned(NodeData::Identifier { name }, span));
        }
        Err(self.error("expected a property name after `.`"))
    }

    fn parse_new(&mut self) -> Result<NodeId, ParseError> {
        let start = self.token.span.start;
        self.bump()?;
        let callee = self.parse_member_or_call(false)?;
        let arguments = if self.at(TokenKind::LParen) {
            self.parse_arguments()?
        } else {
            Vec::new()
        };
        Ok(self.arena.alloc_spanned(
            NodeData::NewExpression { callee, arguments },
            self.finish(start),
        ))
    }

    fn parse_arguments(&mut self) -> Result<Vec<NodeId>, ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut arguments = Vec::new();
        while !self.at(TokenKind::RParen) {
            if self.at(TokenKind::DotDotDot) {
                let start = self.token.span.start;
                self.bump()?;
                let argument = self.parse_assignment_expression()?;
                arguments.push(
                    self.arena
                        .alloc_spanned(NodeData::SpreadElement { argument }, self.finish(start)),
                );
            } else {
                arguments.push(self.parse_assignment_expression()?);
            }
            if !self.at(TokenKind::RParen) {
                self.expect(TokenKind::Comma)?;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(arguments)
    }

    fn parse_primary_expression(&mut self) -> Result<NodeId, ParseError> {
        match self.token.kind {
            TokenKind::Identifier => self.parse_identifier(),
            TokenKind::NumericLiteral => self.parse_numeric_literal(),
            TokenKind::StringLiteral => self.parse_string_literal(),
            TokenKind::True | TokenKind::False => {
                let span = self.token.span;
                let value = self.at(TokenKind::True);
                self.bump()?;
                Ok(self
                    .arena
                    .alloc_spanned(NodeData::BooleanLiteral { value }, span))
            }
            TokenKind::Null => {
                let span = self.token.span;
                self.bump()?;
                Ok(self.arena.alloc_spanned(NodeData::NullLiteral, span))
            }
            TokenKind::This => {
                let span = self.token.span;
                self.bump()?;
                Ok(self.arena.alloc_spanned(NodeData::ThisExpression, span))
            }
            TokenKind::Function => {
                let start = self.token.span.start;
                self.parse_function_expression(start, false)
            }
            TokenKind::LParen => {
                self.bump()?;
                let saved = self.allow_in;
                self.allow_in = true;
                let expr = self.parse_expression();
                self.allow_in = saved;
                let expr = expr?;
                self.expect(TokenKind::RParen)?;
                // No parenthesized-expression node; the parens live in
                // the surrounding verbatim text or are re-derived from
                // precedence when synthesizing.
                Ok(expr)
            }
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::LBrace => {
                let start = self.token.span.start;
                self.bump()?;
                let properties = self.parse_object_properties()?;
                Ok(self
                    .arena
                    .alloc_spanned(NodeData::ObjectExpression { properties }, self.finish(start)))
            }
            TokenKind::HashLBrace => {
                let start = self.token.span.start;
                self.bump()?;
                let properties = self.parse_object_properties()?;
                Ok(self
                    .arena
                    .alloc_spanned(NodeData::RecordExpression { properties }, self.finish(start)))
            }
            TokenKind::HashLBracket => {
                let start = self.token.span.start;
                self.bump()?;
                let mut elements = Vec::new();
                while !self.at(TokenKind::RBracket) {
                    elements.push(self.parse_assignment_expression()?);
                    if !self.at(TokenKind::RBracket) {
                        self.expect(TokenKind::Comma)?;
                    }
                }
                self.expect(TokenKind::RBracket)?;
                Ok(self
                    .arena
                    .alloc_spanned(NodeData::TupleExpression { elements }, self.finish(start)))
            }
            TokenKind::TemplateHead | TokenKind::NoSubstitutionTemplate => {
                self.parse_template_literal()
            }
            TokenKind::Class => Err(self.error("class expressions are not supported")),
            _ => Err(self.error(format!(
                "expected an expression, found {:?}",
                self.token.kind
            ))),
        }
    }

    pub(crate) fn parse_string_literal(&mut self) -> Result<NodeId, ParseError> {
        if !self.at(TokenKind::StringLiteral) {
            return Err(self.error(format!(
                "expected a string literal, found {:?}",
                self.token.kind
            )));
        }
        let span = self.token.span;
        let value = unescape_string(self.token_text());
        self.bump()?;
        Ok(self
            .arena
            .alloc_spanned(NodeData::StringLiteral { value }, span))
    }

    pub(crate) fn parse_numeric_literal(&mut self) -> Result<NodeId, ParseError> {
        if !self.at(TokenKind::NumericLiteral) {
            return Err(self.error(format!(
                "expected a numeric literal, found {:?}",
                self.token.kind
            )));
        }
        let span = self.token.span;
        let value = parse_number(self.token_text());
        self.bump()?;
        Ok(self
            .arena
            .alloc_spanned(NodeData::NumericLiteral { value }, span))
    }

    fn parse_function_expression(
        &mut self,
        start: u32,
        is_async: bool,
    ) -> Result<NodeId, ParseError> {
        self.expect(TokenKind::Function)?;
        let is_generator = self.eat(TokenKind::Star)?;
        let id = if self.at(TokenKind::Identifier) {
            Some(self.parse_identifier()?)
        } else {
            None
        };
        let params = self.parse_params()?;
        let body = self.parse_block()?;
        Ok(self.arena.alloc_spanned(
            NodeData::FunctionExpression {
                id,
                params,
                body,
                is_async,
                is_generator,
            },
            self.finish(start),
        ))
    }

    fn parse_array_literal(&mut self) -> Result<NodeId, ParseError> {
        let start = self.token.span.start;
        self.expect(TokenKind::LBracket)?;
        let mut elements = Vec::new();
        loop {
            if self.at(TokenKind::RBracket) {
                break;
            }
            if self.at(TokenKind::Comma) {
                elements.push(None);
                self.bump()?;
                continue;
            }
            if self.at(TokenKind::DotDotDot) {
                let spread_start = self.token.span.start;
                self.bump()?;
                let argument = self.parse_assignment_expression()?;
                elements.push(Some(self.arena.alloc_spanned(
                    NodeData::SpreadElement { argument },
                    self.finish(spread_start),
                )));
            } else {
                elements.push(Some(self.parse_assignment_expression()?));
            }
            if !self.at(TokenKind::RBracket) {
                self.expect(TokenKind::Comma)?;
            }
        }
        self.expect(TokenKind::RBracket)?;
        Ok(self
            .arena
            .alloc_spanned(NodeData::ArrayExpression { elements }, self.finish(start)))
    }

    /// Properties of an object or record literal, after the opening
    /// brace; consumes the closing `}`.
    fn parse_object_properties(&mut self) -> Result<Vec<NodeId>, ParseError> {
        let mut properties = Vec::new();
        while !self.at(TokenKind::RBrace) {
            if self.at(TokenKind::DotDotDot) {
                let start = self.token.span.start;
                self.bump()?;
                let argument = self.parse_assignment_expression()?;
                properties.push(
                    self.arena
                        .alloc_spanned(NodeData::SpreadElement { argument }, self.finish(start)),
                );
            } else {
                properties.push(self.parse_object_literal_property()?);
            }
            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        self.expect(TokenKind::RBrace)?;
        Ok(properties)
    }

    fn parse_object_literal_property(&mut self) -> Result<NodeId, ParseError> {
        let start = self.token.span.start;
        if self.at(TokenKind::LBracket) {
            self.bump()?;
            let key = self.parse_assignment_expression()?;
            self.expect(TokenKind::RBracket)?;
            self.expect(TokenKind::Colon)?;
            let value = self.parse_assignment_expression()?;
            return Ok(self.arena.alloc_spanned(
                NodeData::ObjectProperty {
                    key,
                    value,
                    computed: true,
                    shorthand: false,
                },
                self.finish(start),
            ));
        }
        let key = match self.token.kind {
            TokenKind::Identifier => self.parse_identifier()?,
            TokenKind::StringLiteral => self.parse_string_literal()?,
            TokenKind::NumericLiteral => self.parse_numeric_literal()?,
            _ => return Err(self.error("expected a property name")),
        };
        if self.eat(TokenKind::Colon)? {
            let value = self.parse_assignment_expression()?;
            return Ok(self.arena.alloc_spanned(
                NodeData::ObjectProperty {
                    key,
                    value,
                    computed: false,
                    shorthand: false,
                },
                self.finish(start),
            ));
        }
        if self.at(TokenKind::LParen) {
            return Err(self.error("object methods are not supported"));
        }
        Ok(self.arena.alloc_spanned(
            NodeData::ObjectProperty {
                key,
                value: key,
                computed: false,
                shorthand: true,
            },
            self.finish(start),
        ))
    }

    pub(crate) fn parse_template_literal(&mut self) -> Result<NodeId, ParseError> {
        let start = self.token.span.start;
        let mut quasis = Vec::new();
        let mut expressions = Vec::new();

        if self.at(TokenKind::NoSubstitutionTemplate) {
            let span = self.token.span;
            quasis.push(self.template_element(span, 1, 1, true));
            self.bump()?;
            return Ok(self.arena.alloc_spanned(
                NodeData::TemplateLiteral {
                    quasis,
                    expressions,
                },
                self.finish(start),
            ));
        }

        let head_span = self.token.span;
        quasis.push(self.template_element(head_span, 1, 2, false));
        self.bump()?;
        loop {
            expressions.push(self.parse_expression()?);
            if !self.at(TokenKind::RBrace) {
                return Err(self.error("expected `}` to close template substitution"));
            }
            let continuation = self
                .scanner
                .rescan_template_continuation(self.token.span.start)?;
            self.token = continuation;
            let tail = continuation.kind == TokenKind::TemplateTail;
            let trailing = if tail { 1 } else { 2 };
            quasis.push(self.template_element(continuation.span, 1, trailing, tail));
            self.bump()?;
            if tail {
                break;
            }
        }
        Ok(self.arena.alloc_spanned(
            NodeData::TemplateLiteral {
                quasis,
                expressions,
            },
            self.finish(start),
        ))
    }

    /// Build a template element from a template token, trimming the
    /// delimiters (`` ` ``/`}` before, `` ` ``/`${` after) off its span.
    fn template_element(&mut self, token_span: Span, leading: u32, trailing: u32, tail: bool) -> NodeId {
        let span = Span::new(token_span.start + leading, token_span.end - trailing);
        let raw = span.slice(self.source).to_string();
        let cooked = unescape_text(&raw);
        self.arena
            .alloc_spanned(NodeData::TemplateElement { raw, cooked, tail }, span)
    }
}
