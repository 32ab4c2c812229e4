//! Recursive-descent parser.
//!
//! Produces arena-allocated nodes with token-tight spans. Statement
//! parsing lives here; expression parsing in [`expressions`]. Automatic
//! semicolon insertion is handled the pragmatic way: a statement may end
//! at `;`, `}`, end of input, or a line break before the next token.

mod expressions;

use crate::arena::NodeArena;
use crate::node::{MethodKind, NodeData, NodeId, VarKind};
use remod_common::{LineMap, Span};
use remod_scanner::{Checkpoint, ScanError, Scanner, Token, TokenKind};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    /// Human-facing rendering with 1-based line and column.
    pub fn render(&self, source: &str) -> String {
        let position = LineMap::new(source).position(self.span.start);
        format!("{}:{}: {}", position.line, position.column, self.message)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error: {} at {}", self.message, self.span)
    }
}

impl std::error::Error for ParseError {}

impl From<ScanError> for ParseError {
    fn from(err: ScanError) -> ParseError {
        ParseError {
            span: Span::new(err.pos, err.pos),
            message: err.message,
        }
    }
}

pub struct ParseResult {
    pub arena: NodeArena,
    pub root: NodeId,
    pub comments: Vec<remod_common::Comment>,
}

/// Parse a whole program.
pub fn parse(source: &str) -> Result<ParseResult, ParseError> {
    let mut parser = Parser::new(source)?;
    let root = parser.parse_program()?;
    debug!(nodes = parser.arena.len(), "parsed program");
    Ok(ParseResult {
        arena: parser.arena,
        root,
        comments: parser.scanner.into_comments(),
    })
}

pub(crate) struct Parser<'a> {
    pub(crate) source: &'a str,
    pub(crate) scanner: Scanner<'a>,
    pub(crate) token: Token,
    /// End offset of the most recently consumed token.
    pub(crate) prev_end: u32,
    /// `in` is not a binary operator while parsing a `for (...)` head.
    pub(crate) allow_in: bool,
    pub(crate) arena: NodeArena,
}

/// Parser state restored by [`Parser::rewind`] after a failed
/// speculative parse. Nodes allocated during the attempt are discarded.
pub(crate) struct ParserCheckpoint {
    scanner: Checkpoint,
    token: Token,
    prev_end: u32,
    arena_len: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Result<Parser<'a>, ParseError> {
        let mut scanner = Scanner::new(source);
        let token = scanner.scan()?;
        Ok(Parser {
            source,
            scanner,
            token,
            prev_end: 0,
            allow_in: true,
            arena: NodeArena::new(),
        })
    }

    // ======================================================================
    // Token plumbing
    // ======================================================================

    pub(crate) fn bump(&mut self) -> Result<(), ParseError> {
        self.prev_end = self.token.span.end;
        self.token = self.scanner.scan()?;
        Ok(())
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.token.kind == kind
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> Result<bool, ParseError> {
        if self.at(kind) {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        if self.at(kind) {
            self.bump()
        } else {
            Err(self.error(format!(
                "expected {:?}, found {:?}",
                kind, self.token.kind
            )))
        }
    }

    pub(crate) fn token_text(&self) -> &'a str {
        self.token.text(self.source)
    }

    pub(crate) fn at_contextual(&self, text: &str) -> bool {
        self.at(TokenKind::Identifier) && self.token_text() == text
    }

    pub(crate) fn has_newline_before(&self) -> bool {
        self.source[self.prev_end as usize..self.token.span.start as usize].contains('\n')
    }

    pub(crate) fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            message: message.into(),
            span: self.token.span,
        }
    }

    pub(crate) fn checkpoint(&self) -> ParserCheckpoint {
        ParserCheckpoint {
            scanner: self.scanner.checkpoint(),
            token: self.token,
            prev_end: self.prev_end,
            arena_len: self.arena.len(),
        }
    }

    pub(crate) fn rewind(&mut self, checkpoint: ParserCheckpoint) {
        self.scanner.rewind(checkpoint.scanner);
        self.token = checkpoint.token;
        self.prev_end = checkpoint.prev_end;
        self.arena.truncate(checkpoint.arena_len);
    }

    pub(crate) fn finish(&self, start: u32) -> Span {
        Span::new(start, self.prev_end)
    }

    /// Statement terminator: an explicit `;`, or one the language
    /// inserts before `}`, end of input, or a line break.
    pub(crate) fn expect_semicolon(&mut self) -> Result<(), ParseError> {
        if self.at(TokenKind::Semicolon) {
            return self.bump();
        }
        if self.at(TokenKind::RBrace) || self.at(TokenKind::Eof) || self.has_newline_before() {
            return Ok(());
        }
        Err(self.error(format!("expected `;`, found {:?}", self.token.kind)))
    }

    // ======================================================================
    // Program and statements
    // ======================================================================

    pub(crate) fn parse_program(&mut self) -> Result<NodeId, ParseError> {
        let mut body = Vec::new();
        while !self.at(TokenKind::Eof) {
            body.push(self.parse_statement()?);
        }
        // The root spans the whole input so leading and trailing trivia
        // survive a verbatim round-trip.
        let span = Span::new(0, self.source.len() as u32);
        Ok(self.arena.alloc_spanned(NodeData::Program { body }, span))
    }

    pub(crate) fn parse_statement(&mut self) -> Result<NodeId, ParseError> {
        match self.token.kind {
            TokenKind::LBrace => self.parse_block(),
            TokenKind::Var | TokenKind::Let | TokenKind::Const => {
                self.parse_variable_statement()
            }
            TokenKind::Function => self.parse_function_declaration(self.token.span.start, false),
            TokenKind::Class => self.parse_class_declaration(Vec::new(), self.token.span.start),
            TokenKind::At => self.parse_decorated_class(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Do => self.parse_do_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Switch => self.parse_switch(),
            TokenKind::Try => self.parse_try(),
            TokenKind::Throw => self.parse_throw(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Break | TokenKind::Continue => self.parse_jump(),
            TokenKind::Debugger => {
                let start = self.token.span.start;
                self.bump()?;
                self.expect_semicolon()?;
                Ok(self
                    .arena
                    .alloc_spanned(NodeData::DebuggerStatement, self.finish(start)))
            }
            TokenKind::Semicolon => {
                let start = self.token.span.start;
                self.bump()?;
                Ok(self
                    .arena
                    .alloc_spanned(NodeData::EmptyStatement, self.finish(start)))
            }
            TokenKind::Import => self.parse_import(),
            TokenKind::Export => self.parse_export(),
            TokenKind::Identifier => {
                if self.at_contextual("async") {
                    let cp = self.checkpoint();
                    let start = self.token.span.start;
                    self.bump()?;
                    if self.at(TokenKind::Function) && !self.has_newline_before() {
                        return self.parse_function_declaration(start, true);
                    }
                    self.rewind(cp);
                }
                // Labeled statement or expression statement.
                let cp = self.checkpoint();
                let label_span = self.token.span;
                let name = self.token_text().to_string();
                self.bump()?;
                if self.at(TokenKind::Colon) {
                    let label = self
                        .arena
                        .alloc_spanned(NodeData::Identifier { name }, label_span);
                    self.bump()?;
                    let body = self.parse_statement()?;
                    let span = Span::new(label_span.start, self.prev_end);
                    return Ok(self
                        .arena
                        .alloc_spanned(NodeData::LabeledStatement { label, body }, span));
                }
                self.rewind(cp);
                self.parse_expression_statement()
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_expression_statement(&mut self) -> Result<NodeId, ParseError> {
        let start = self.token.span.start;
        let expression = self.parse_expression()?;
        self.expect_semicolon()?;
        Ok(self.arena.alloc_spanned(
            NodeData::ExpressionStatement { expression },
            self.finish(start),
        ))
    }

    pub(crate) fn parse_block(&mut self) -> Result<NodeId, ParseError> {
        let start = self.token.span.start;
        self.expect(TokenKind::LBrace)?;
        let mut body = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            body.push(self.parse_statement()?);
        }
        self.expect(TokenKind::RBrace)?;
        Ok(self
            .arena
            .alloc_spanned(NodeData::BlockStatement { body }, self.finish(start)))
    }

    fn parse_variable_statement(&mut self) -> Result<NodeId, ParseError> {
        let decl = self.parse_variable_declaration()?;
        let start = self.arena.span(decl).map(|s| s.start).unwrap_or(0);
        self.expect_semicolon()?;
        // Re-span to cover a consumed semicolon, matching the usual
        // statement ranges.
        let span = Span::new(start, self.prev_end);
        self.arena.set_span(decl, span);
        Ok(decl)
    }

    /// `var`/`let`/`const` declarator list without the terminator.
    pub(crate) fn parse_variable_declaration(&mut self) -> Result<NodeId, ParseError> {
        let start = self.token.span.start;
        let kind = match self.token.kind {
            TokenKind::Var => VarKind::Var,
            TokenKind::Let => VarKind::Let,
            TokenKind::Const => VarKind::Const,
            _ => return Err(self.error("expected a variable declaration")),
        };
        self.bump()?;
        let mut declarations = Vec::new();
        loop {
            let id = self.parse_binding_pattern()?;
            let decl_start = self.arena.span(id).map(|s| s.start).unwrap_or(start);
            let init = if self.eat(TokenKind::Eq)? {
                Some(self.parse_assignment_expression()?)
            } else {
                None
            };
            declarations.push(self.arena.alloc_spanned(
                NodeData::VariableDeclarator { id, init },
                self.finish(decl_start),
            ));
            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        Ok(self.arena.alloc_spanned(
            NodeData::VariableDeclaration { kind, declarations },
            self.finish(start),
        ))
    }

    // ======================================================================
    // Binding patterns
    // ======================================================================

    pub(crate) fn parse_identifier(&mut self) -> Result<NodeId, ParseError> {
        if !self.at(TokenKind::Identifier) {
            return Err(self.error(format!(
                "expected an identifier, found {:?}",
                self.token.kind
            )));
        }
        let span = self.token.span;
        let name = self.token_text().to_string();
        self.bump()?;
        Ok(self.arena.alloc_spanned(NodeData::Identifier { name }, span))
    }

    pub(crate) fn parse_binding_pattern(&mut self) -> Result<NodeId, ParseError> {
        match self.token.kind {
            TokenKind::Identifier => self.parse_identifier(),
            TokenKind::LBrace => self.parse_object_pattern(),
            TokenKind::LBracket => self.parse_array_pattern(),
            _ => Err(self.error(format!(
                "expected a binding pattern, found {:?}",
                self.token.kind
            ))),
        }
    }

    /// A binding pattern with an optional default value.
    pub(crate) fn parse_binding_element(&mut self) -> Result<NodeId, ParseError> {
        let left = self.parse_binding_pattern()?;
        if self.eat(TokenKind::Eq)? {
            let right = self.parse_assignment_expression()?;
            let start = self.arena.span(left).map(|s| s.start).unwrap_or(0);
            return Ok(self.arena.alloc_spanned(
                NodeData::AssignmentPattern { left, right },
                self.finish(start),
            ));
        }
        Ok(left)
    }

    fn parse_rest_element(&mut self) -> Result<NodeId, ParseError> {
        let start = self.token.span.start;
        self.expect(TokenKind::DotDotDot)?;
        let argument = self.parse_binding_pattern()?;
        Ok(self
            .arena
            .alloc_spanned(NodeData::RestElement { argument }, self.finish(start)))
    }

    fn parse_object_pattern(&mut self) -> Result<NodeId, ParseError> {
        let start = self.token.span.start;
        self.expect(TokenKind::LBrace)?;
        let mut properties = Vec::new();
        while !self.at(TokenKind::RBrace) {
            if self.at(TokenKind::DotDotDot) {
                properties.push(self.parse_rest_element()?);
            } else {
                properties.push(self.parse_object_pattern_property()?);
            }
            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        self.expect(TokenKind::RBrace)?;
        Ok(self
            .arena
            .alloc_spanned(NodeData::ObjectPattern { properties }, self.finish(start)))
    }

    fn parse_object_pattern_property(&mut self) -> Result<NodeId, ParseError> {
        let start = self.token.span.start;
        if self.at(TokenKind::LBracket) {
            self.bump()?;
            let key = self.parse_assignment_expression()?;
            self.expect(TokenKind::RBracket)?;
            self.expect(TokenKind::Colon)?;
            let value = self.parse_binding_element()?;
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
            let value = self.parse_binding_element()?;
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
        // Shorthand, optionally with a default.
        let value = if self.eat(TokenKind::Eq)? {
            let right = self.parse_assignment_expression()?;
            self.arena.alloc_spanned(
                NodeData::AssignmentPattern { left: key, right },
                self.finish(start),
            )
        } else {
            key
        };
        Ok(self.arena.alloc_spanned(
            NodeData::ObjectProperty {
                key,
                value,
                computed: false,
                shorthand: true,
            },
            self.finish(start),
        ))
    }

    fn parse_array_pattern(&mut self) -> Result<NodeId, ParseError> {
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
                elements.push(Some(self.parse_rest_element()?));
            } else {
                elements.push(Some(self.parse_binding_element()?));
            }
            if !self.at(TokenKind::RBracket) {
                self.expect(TokenKind::Comma)?;
            }
        }
        self.expect(TokenKind::RBracket)?;
        Ok(self
            .arena
            .alloc_spanned(NodeData::ArrayPattern { elements }, self.finish(start)))
    }

    // ======================================================================
    // Functions and classes
    // ======================================================================

    pub(crate) fn parse_params(&mut self) -> Result<Vec<NodeId>, ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.at(TokenKind::RParen) {
            if self.at(TokenKind::DotDotDot) {
                params.push(self.parse_rest_element()?);
            } else {
                params.push(self.parse_binding_element()?);
            }
            if !self.at(TokenKind::RParen) {
                self.expect(TokenKind::Comma)?;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(params)
    }

    fn parse_function_declaration(
        &mut self,
        start: u32,
        is_async: bool,
    ) -> Result<NodeId, ParseError> {
        self.expect(TokenKind::Function)?;
        let is_generator = self.eat(TokenKind::Star)?;
        let id = self.parse_identifier()?;
        let params = self.parse_params()?;
        let body = self.parse_block()?;
        Ok(self.arena.alloc_spanned(
            NodeData::FunctionDeclaration {
                id,
                params,
                body,
                is_async,
                is_generator,
            },
            self.finish(start),
        ))
    }

    fn parse_decorated_class(&mut self) -> Result<NodeId, ParseError> {
        let start = self.token.span.start;
        let mut decorators = Vec::new();
        while self.at(TokenKind::At) {
            let deco_start = self.token.span.start;
            self.bump()?;
            let expression = self.parse_member_or_call(true)?;
            decorators.push(self.arena.alloc_spanned(
                NodeData::Decorator { expression },
                self.finish(deco_start),
            ));
        }
        if !self.at(TokenKind::Class) {
            return Err(self.error("decorators must be followed by a class declaration"));
        }
        self.parse_class_declaration(decorators, start)
    }

    fn parse_class_declaration(
        &mut self,
        decorators: Vec<NodeId>,
        start: u32,
    ) -> Result<NodeId, ParseError> {
        self.expect(TokenKind::Class)?;
        let id = self.parse_identifier()?;
        let super_class = if self.eat(TokenKind::Extends)? {
            Some(self.parse_member_or_call(true)?)
        } else {
            None
        };
        self.expect(TokenKind::LBrace)?;
        let mut body = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            if self.eat(TokenKind::Semicolon)? {
                continue;
            }
            body.push(self.parse_class_method()?);
        }
        self.expect(TokenKind::RBrace)?;
        Ok(self.arena.alloc_spanned(
            NodeData::ClassDeclaration {
                decorators,
                id,
                super_class,
                body,
            },
            self.finish(start),
        ))
    }

    fn parse_class_method(&mut self) -> Result<NodeId, ParseError> {
        let start = self.token.span.start;
        let mut is_static = false;
        if self.at_contextual("static") {
            let cp = self.checkpoint();
            self.bump()?;
            if self.at(TokenKind::LParen) {
                // A method actually named `static`.
                self.rewind(cp);
            } else {
                is_static = true;
            }
        }
        let (key, computed) = if self.at(TokenKind::LBracket) {
            self.bump()?;
            let key = self.parse_assignment_expression()?;
            self.expect(TokenKind::RBracket)?;
            (key, true)
        } else {
            let key = match self.token.kind {
                TokenKind::Identifier => self.parse_identifier()?,
                TokenKind::StringLiteral => self.parse_string_literal()?,
                TokenKind::NumericLiteral => self.parse_numeric_literal()?,
                _ => return Err(self.error("expected a method name")),
            };
            (key, false)
        };
        let params = self.parse_params()?;
        let body = self.parse_block()?;
        let kind = if !computed && self.arena.identifier_name(key) == Some("constructor") {
            MethodKind::Constructor
        } else {
            MethodKind::Method
        };
        Ok(self.arena.alloc_spanned(
            NodeData::ClassMethod {
                kind,
                key,
                params,
                body,
                is_static,
                computed,
            },
            self.finish(start),
        ))
    }

    // ======================================================================
    // Control flow statements
    // ======================================================================

    fn parse_if(&mut self) -> Result<NodeId, ParseError> {
        let start = self.token.span.start;
        self.bump()?;
        self.expect(TokenKind::LParen)?;
        let test = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        let consequent = self.parse_statement()?;
        let alternate = if self.eat(TokenKind::Else)? {
            Some(self.parse_statement()?)
        } else {
            None
        };
        Ok(self.arena.alloc_spanned(
            NodeData::IfStatement {
                test,
                consequent,
                alternate,
            },
            self.finish(start),
        ))
    }

    fn parse_while(&mut self) -> Result<NodeId, ParseError> {
        let start = self.token.span.start;
        self.bump()?;
        self.expect(TokenKind::LParen)?;
        let test = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        let body = self.parse_statement()?;
        Ok(self
            .arena
            .alloc_spanned(NodeData::WhileStatement { test, body }, self.finish(start)))
    }

    fn parse_do_while(&mut self) -> Result<NodeId, ParseError> {
        let start = self.token.span.start;
        self.bump()?;
        let body = self.parse_statement()?;
        self.expect(TokenKind::While)?;
        self.expect(TokenKind::LParen)?;
        let test = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        self.expect_semicolon()?;
        Ok(self.arena.alloc_spanned(
            NodeData::DoWhileStatement { body, test },
            self.finish(start),
        ))
    }

    fn parse_for(&mut self) -> Result<NodeId, ParseError> {
        let start = self.token.span.start;
        self.bump()?;
        self.expect(TokenKind::LParen)?;

        if self.eat(TokenKind::Semicolon)? {
            return self.parse_for_classic(start, None);
        }

        let is_decl = matches!(
            self.token.kind,
            TokenKind::Var | TokenKind::Let | TokenKind::Const
        );
        let saved = self.allow_in;
        self.allow_in = false;
        let left = if is_decl {
            self.parse_variable_declaration()
        } else {
            self.parse_expression()
        };
        self.allow_in = saved;
        let left = left?;

        if self.at(TokenKind::In) {
            self.bump()?;
            let right = self.parse_expression()?;
            self.expect(TokenKind::RParen)?;
            let body = self.parse_statement()?;
            return Ok(self.arena.alloc_spanned(
                NodeData::ForInStatement { left, right, body },
                self.finish(start),
            ));
        }
        if self.at_contextual("of") {
            self.bump()?;
            let right = self.parse_assignment_expression()?;
            self.expect(TokenKind::RParen)?;
            let body = self.parse_statement()?;
            return Ok(self.arena.alloc_spanned(
                NodeData::ForOfStatement { left, right, body },
                self.finish(start),
            ));
        }
        self.expect(TokenKind::Semicolon)?;
        self.parse_for_classic(start, Some(left))
    }

    fn parse_for_classic(&mut self, start: u32, init: Option<NodeId>) -> Result<NodeId, ParseError> {
        let test = if self.at(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(TokenKind::Semicolon)?;
        let update = if self.at(TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(TokenKind::RParen)?;
        let body = self.parse_statement()?;
        Ok(self.arena.alloc_spanned(
            NodeData::ForStatement {
                init,
                test,
                update,
                body,
            },
            self.finish(start),
        ))
    }

    fn parse_switch(&mut self) -> Result<NodeId, ParseError> {
        let start = self.token.span.start;
        self.bump()?;
        self.expect(TokenKind::LParen)?;
        let discriminant = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::LBrace)?;
        let mut cases = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            let case_start = self.token.span.start;
            let test = if self.eat(TokenKind::Case)? {
                Some(self.parse_expression()?)
            } else {
                self.expect(TokenKind::Default)?;
                None
            };
            self.expect(TokenKind::Colon)?;
            let mut consequent = Vec::new();
            while !matches!(
                self.token.kind,
                TokenKind::Case | TokenKind::Default | TokenKind::RBrace | TokenKind::Eof
            ) {
                consequent.push(self.parse_statement()?);
            }
            cases.push(self.arena.alloc_spanned(
                NodeData::SwitchCase { test, consequent },
                self.finish(case_start),
            ));
        }
        self.expect(TokenKind::RBrace)?;
        Ok(self.arena.alloc_spanned(
            NodeData::SwitchStatement {
                discriminant,
                cases,
            },
            self.finish(start),
        ))
    }

    fn parse_try(&mut self) -> Result<NodeId, ParseError> {
        let start = self.token.span.start;
        self.bump()?;
        let block = self.parse_block()?;
        let handler = if self.at(TokenKind::Catch) {
            let catch_start = self.token.span.start;
            self.bump()?;
            let param = if self.eat(TokenKind::LParen)? {
                let param = self.parse_binding_pattern()?;
                self.expect(TokenKind::RParen)?;
                Some(param)
            } else {
                None
            };
            let body = self.parse_block()?;
            Some(self.arena.alloc_spanned(
                NodeData::CatchClause { param, body },
                self.finish(catch_start),
            ))
        } else {
            None
        };
        let finalizer = if self.eat(TokenKind::Finally)? {
            Some(self.parse_block()?)
        } else {
            None
        };
        if handler.is_none() && finalizer.is_none() {
            return Err(self.error("`try` requires a `catch` or `finally` clause"));
        }
        Ok(self.arena.alloc_spanned(
            NodeData::TryStatement {
                block,
                handler,
                finalizer,
            },
            self.finish(start),
        ))
    }

    fn parse_throw(&mut self) -> Result<NodeId, ParseError> {
        let start = self.token.span.start;
        self.bump()?;
        if self.has_newline_before() {
            return Err(self.error("newline is not allowed after `throw`"));
        }
        let argument = self.parse_expression()?;
        self.expect_semicolon()?;
        Ok(self
            .arena
            .alloc_spanned(NodeData::ThrowStatement { argument }, self.finish(start)))
    }

    fn parse_return(&mut self) -> Result<NodeId, ParseError> {
        let start = self.token.span.start;
        self.bump()?;
        let argument = if self.at(TokenKind::Semicolon)
            || self.at(TokenKind::RBrace)
            || self.at(TokenKind::Eof)
            || self.has_newline_before()
        {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_semicolon()?;
        Ok(self
            .arena
            .alloc_spanned(NodeData::ReturnStatement { argument }, self.finish(start)))
    }

    fn parse_jump(&mut self) -> Result<NodeId, ParseError> {
        let start = self.token.span.start;
        let is_break = self.at(TokenKind::Break);
        self.bump()?;
        let label = if self.at(TokenKind::Identifier) && !self.has_newline_before() {
            Some(self.parse_identifier()?)
        } else {
            None
        };
        self.expect_semicolon()?;
        let data = if is_break {
            NodeData::BreakStatement { label }
        } else {
            NodeData::ContinueStatement { label }
        };
        Ok(self.arena.alloc_spanned(data, self.finish(start)))
    }

    // ======================================================================
    // Modules
    // ======================================================================

    fn parse_import(&mut self) -> Result<NodeId, ParseError> {
        let start = self.token.span.start;
        self.bump()?;
        if self.at(TokenKind::StringLiteral) {
            let source = self.parse_string_literal()?;
            self.expect_semicolon()?;
            return Ok(self.arena.alloc_spanned(
                NodeData::ImportDeclaration {
                    specifiers: Vec::new(),
                    source,
                },
                self.finish(start),
            ));
        }
        let mut specifiers = Vec::new();
        if self.at(TokenKind::Identifier) && !self.at_contextual("from") {
            let spec_start = self.token.span.start;
            let local = self.parse_identifier()?;
            specifiers.push(self.arena.alloc_spanned(
                NodeData::ImportDefaultSpecifier { local },
                self.finish(spec_start),
            ));
            if self.at(TokenKind::Comma) {
                self.bump()?;
            }
        }
        if self.at(TokenKind::Star) {
            let spec_start = self.token.span.start;
            self.bump()?;
            if !self.at_contextual("as") {
                return Err(self.error("expected `as` after `*` in import"));
            }
            self.bump()?;
            let local = self.parse_identifier()?;
            specifiers.push(self.arena.alloc_spanned(
                NodeData::ImportNamespaceSpecifier { local },
                self.finish(spec_start),
            ));
        } else if self.at(TokenKind::LBrace) {
            self.bump()?;
            while !self.at(TokenKind::RBrace) {
                let spec_start = self.token.span.start;
                let imported = self.parse_identifier()?;
                let local = if self.at_contextual("as") {
                    self.bump()?;
                    self.parse_identifier()?
                } else {
                    imported
                };
                specifiers.push(self.arena.alloc_spanned(
                    NodeData::ImportSpecifier { imported, local },
                    self.finish(spec_start),
                ));
                if !self.eat(TokenKind::Comma)? {
                    break;
                }
            }
            self.expect(TokenKind::RBrace)?;
        }
        if !self.at_contextual("from") {
            return Err(self.error("expected `from` in import declaration"));
        }
        self.bump()?;
        let source = self.parse_string_literal()?;
        self.expect_semicolon()?;
        Ok(self.arena.alloc_spanned(
            NodeData::ImportDeclaration { specifiers, source },
            self.finish(start),
        ))
    }

    fn parse_export(&mut self) -> Result<NodeId, ParseError> {
        let start = self.token.span.start;
        self.bump()?;
        if self.eat(TokenKind::Default)? {
            let declaration = match self.token.kind {
                TokenKind::Function => {
                    self.parse_function_declaration(self.token.span.start, false)?
                }
                TokenKind::Class => {
                    self.parse_class_declaration(Vec::new(), self.token.span.start)?
                }
                _ => {
                    let expr = self.parse_assignment_expression()?;
                    self.expect_semicolon()?;
                    expr
                }
            };
            return Ok(self.arena.alloc_spanned(
                NodeData::ExportDefaultDeclaration { declaration },
                self.finish(start),
            ));
        }
        let declaration = match self.token.kind {
            TokenKind::Var | TokenKind::Let | TokenKind::Const => self.parse_variable_statement()?,
            TokenKind::Function => self.parse_function_declaration(self.token.span.start, false)?,
            TokenKind::Class => self.parse_class_declaration(Vec::new(), self.token.span.start)?,
            TokenKind::At => self.parse_decorated_class()?,
            _ => return Err(self.error("expected a declaration after `export`")),
        };
        Ok(self.arena.alloc_spanned(
            NodeData::ExportNamedDeclaration { declaration },
            self.finish(start),
        ))
    }
}
