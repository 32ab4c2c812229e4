//! Per-kind structural emission.
//!
//! These rules produce text for synthesized nodes and for removal
//! parents, where verbatim copying is unavailable. Conventions are
//! deterministic: `", "` between list items, one statement per line at
//! the current indent, precedence-based parenthesization. Children are
//! always printed through [`Printer::print_node`], so a ranged child
//! inside a synthesized parent still round-trips verbatim and nested
//! edits still apply.
//!
//! Sequence joins under a removal parent prefer the original
//! inter-sibling bytes between two surviving ranged siblings; a removal
//! between survivors falls back to the synthesized separator, and no
//! separator follows the final survivor.

use crate::error::PrintError;
use crate::generate::Printer;
use crate::options::{NumberEncoding, QuoteStyle, RecordTupleSyntax};
use remod_common::safe_slice;
use remod_parser::{BinaryOp, LogicalOp, NodeData, NodeId, NodeKind};

impl<'a> Printer<'a> {
    pub(crate) fn emit_node(&mut self, id: NodeId) -> Result<(), PrintError> {
        let arena = self.arena;
        match arena.data(id) {
            NodeData::Program { body } => self.emit_statements(id, "body", body, false),

            NodeData::Identifier { name } => {
                self.writer.write(name);
                Ok(())
            }
            NodeData::StringLiteral { value } => {
                self.write_string_literal(value);
                Ok(())
            }
            NodeData::NumericLiteral { value } => {
                self.write_number(*value);
                Ok(())
            }
            NodeData::BooleanLiteral { value } => {
                self.writer.write(if *value { "true" } else { "false" });
                Ok(())
            }
            NodeData::NullLiteral => {
                self.writer.write("null");
                Ok(())
            }
            NodeData::ThisExpression => {
                self.writer.write("this");
                Ok(())
            }

            NodeData::ArrayExpression { elements } | NodeData::ArrayPattern { elements } => {
                self.writer.write("[");
                self.emit_holey(id, "elements", elements)?;
                self.writer.write("]");
                Ok(())
            }
            NodeData::ObjectExpression { properties } | NodeData::ObjectPattern { properties } => {
                self.emit_braced_list(id, "properties", properties, "{", "}")
            }
            NodeData::RecordExpression { properties } => {
                let (open, close) = match self.options.record_tuple {
                    RecordTupleSyntax::Hash => ("#{", "}"),
                    RecordTupleSyntax::Bar => ("{|", "|}"),
                };
                self.emit_braced_list(id, "properties", properties, open, close)
            }
            NodeData::TupleExpression { elements } => {
                let (open, close) = match self.options.record_tuple {
                    RecordTupleSyntax::Hash => ("#[", "]"),
                    RecordTupleSyntax::Bar => ("[|", "|]"),
                };
                self.writer.write(open);
                self.emit_separated(id, "elements", elements, ", ")?;
                self.writer.write(close);
                Ok(())
            }
            NodeData::ObjectProperty {
                key,
                value,
                computed,
                shorthand,
            } => {
                if *shorthand {
                    return self.print_node(*value);
                }
                if *computed {
                    self.writer.write("[");
                    self.print_node(*key)?;
                    self.writer.write("]");
                } else {
                    self.print_node(*key)?;
                }
                self.writer.write(": ");
                self.print_node(*value)
            }

            NodeData::FunctionExpression {
                id: name,
                params,
                body,
                is_async,
                is_generator,
            } => self.emit_function(id, *name, params, *body, *is_async, *is_generator),
            NodeData::FunctionDeclaration {
                id: name,
                params,
                body,
                is_async,
                is_generator,
            } => self.emit_function(id, Some(*name), params, *body, *is_async, *is_generator),
            NodeData::ArrowFunctionExpression {
                params,
                body,
                is_async,
            } => {
                if *is_async {
                    self.writer.write("async ");
                }
                self.writer.write("(");
                self.emit_separated(id, "params", params, ", ")?;
                self.writer.write(") => ");
                let body = *body;
                let wrap = matches!(arena.data(body), NodeData::ObjectExpression { .. })
                    || precedence(arena.data(body)) < 2;
                self.emit_wrapped(body, wrap)
            }

            NodeData::UnaryExpression { op, argument } => {
                let argument = *argument;
                self.writer.write(op.as_str());
                if op.is_keyword() {
                    self.writer.write(" ");
                }
                let wrap = precedence(arena.data(argument)) < 16
                    || sign_clashes(op.as_str(), arena.data(argument));
                self.emit_wrapped(argument, wrap)
            }
            NodeData::UpdateExpression {
                op,
                prefix,
                argument,
            } => {
                if *prefix {
                    self.writer.write(op.as_str());
                    self.print_node(*argument)
                } else {
                    self.print_node(*argument)?;
                    self.writer.write(op.as_str());
                    Ok(())
                }
            }
            NodeData::BinaryExpression { op, left, right } => {
                let my = binary_precedence(*op);
                let right_assoc = matches!(op, BinaryOp::Exp);
                let op_text = op.as_str();
                let (left, right) = (*left, *right);
                let lp = precedence(arena.data(left));
                let rp = precedence(arena.data(right));
                let wrap_left = if right_assoc { lp <= my } else { lp < my };
                let wrap_right = if right_assoc { rp < my } else { rp <= my };
                self.emit_wrapped(left, wrap_left)?;
                self.writer.write(" ");
                self.writer.write(op_text);
                self.writer.write(" ");
                self.emit_wrapped(right, wrap_right)
            }
            NodeData::LogicalExpression { op, left, right } => {
                let my = match op {
                    LogicalOp::Nullish => 4,
                    LogicalOp::Or => 5,
                    LogicalOp::And => 6,
                };
                let op = *op;
                let (left, right) = (*left, *right);
                let wrap_left =
                    precedence(arena.data(left)) < my || mixes_nullish(op, arena.data(left));
                let wrap_right =
                    precedence(arena.data(right)) <= my || mixes_nullish(op, arena.data(right));
                self.emit_wrapped(left, wrap_left)?;
                self.writer.write(" ");
                self.writer.write(op.as_str());
                self.writer.write(" ");
                self.emit_wrapped(right, wrap_right)
            }
            NodeData::AssignmentExpression { op, left, right } => {
                let op_text = op.as_str();
                let (left, right) = (*left, *right);
                self.print_node(left)?;
                self.writer.write(" ");
                self.writer.write(op_text);
                self.writer.write(" ");
                let wrap = precedence(arena.data(right)) < 2;
                self.emit_wrapped(right, wrap)
            }
            NodeData::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => {
                let (test, consequent, alternate) = (*test, *consequent, *alternate);
                let wrap_test = precedence(arena.data(test)) <= 3;
                self.emit_wrapped(test, wrap_test)?;
                self.writer.write(" ? ");
                let wrap = precedence(arena.data(consequent)) < 2;
                self.emit_wrapped(consequent, wrap)?;
                self.writer.write(" : ");
                let wrap = precedence(arena.data(alternate)) < 2;
                self.emit_wrapped(alternate, wrap)
            }
            NodeData::CallExpression { callee, arguments } => {
                let callee = *callee;
                let wrap = precedence(arena.data(callee)) < 18
                    || matches!(arena.data(callee), NodeData::FunctionExpression { .. });
                self.emit_wrapped(callee, wrap)?;
                self.writer.write("(");
                self.emit_separated(id, "arguments", arguments, ", ")?;
                self.writer.write(")");
                Ok(())
            }
            NodeData::NewExpression { callee, arguments } => {
                let callee = *callee;
                self.writer.write("new ");
                let wrap = precedence(arena.data(callee)) < 18
                    || matches!(arena.data(callee), NodeData::CallExpression { .. });
                self.emit_wrapped(callee, wrap)?;
                self.writer.write("(");
                self.emit_separated(id, "arguments", arguments, ", ")?;
                self.writer.write(")");
                Ok(())
            }
            NodeData::MemberExpression {
                object,
                property,
                computed,
            } => {
                let object = *object;
                let wrap = precedence(arena.data(object)) < 18
                    || (!*computed && matches!(arena.data(object), NodeData::NumericLiteral { .. }));
                self.emit_wrapped(object, wrap)?;
                if *computed {
                    self.writer.write("[");
                    self.print_node(*property)?;
                    self.writer.write("]");
                    Ok(())
                } else {
                    self.writer.write(".");
                    self.print_node(*property)
                }
            }
            NodeData::SequenceExpression { expressions } => {
                self.emit_separated(id, "expressions", expressions, ", ")
            }
            NodeData::SpreadElement { argument } | NodeData::RestElement { argument } => {
                self.writer.write("...");
                self.print_node(*argument)
            }
            NodeData::AwaitExpression { argument } => {
                let argument = *argument;
                self.writer.write("await ");
                let wrap = precedence(arena.data(argument)) < 16;
                self.emit_wrapped(argument, wrap)
            }
            NodeData::YieldExpression { argument, delegate } => {
                self.writer.write("yield");
                if *delegate {
                    self.writer.write("*");
                }
                if let Some(argument) = argument {
                    self.writer.write(" ");
                    self.print_node(*argument)?;
                }
                Ok(())
            }
            NodeData::TemplateLiteral {
                quasis,
                expressions,
            } => {
                self.writer.write("`");
                for (i, quasi) in quasis.iter().enumerate() {
                    self.print_node(*quasi)?;
                    if let Some(expr) = expressions.get(i) {
                        self.writer.write("${");
                        self.print_node(*expr)?;
                        self.writer.write("}");
                    }
                }
                self.writer.write("`");
                Ok(())
            }
            NodeData::TemplateElement { raw, .. } => {
                self.writer.write_raw(raw);
                Ok(())
            }
            NodeData::TaggedTemplateExpression { tag, quasi } => {
                let tag = *tag;
                let wrap = precedence(arena.data(tag)) < 18;
                self.emit_wrapped(tag, wrap)?;
                self.print_node(*quasi)
            }
            NodeData::AssignmentPattern { left, right } => {
                self.print_node(*left)?;
                self.writer.write(" = ");
                self.print_node(*right)
            }

            NodeData::ExpressionStatement { expression } => {
                let expression = *expression;
                let wrap = self.statement_needs_parens(expression);
                self.emit_wrapped(expression, wrap)?;
                self.writer.write(";");
                Ok(())
            }
            NodeData::BlockStatement { body } => self.emit_block(id, body),
            NodeData::EmptyStatement => {
                self.writer.write(";");
                Ok(())
            }
            NodeData::DebuggerStatement => {
                self.writer.write("debugger;");
                Ok(())
            }
            NodeData::ReturnStatement { argument } => {
                self.writer.write("return");
                if let Some(argument) = argument {
                    self.writer.write(" ");
                    self.print_node(*argument)?;
                }
                self.writer.write(";");
                Ok(())
            }
            NodeData::IfStatement {
                test,
                consequent,
                alternate,
            } => {
                self.writer.write("if (");
                self.print_node(*test)?;
                self.writer.write(") ");
                self.print_node(*consequent)?;
                if let Some(alternate) = alternate {
                    self.writer.write(" else ");
                    self.print_node(*alternate)?;
                }
                Ok(())
            }
            NodeData::ForStatement {
                init,
                test,
                update,
                body,
            } => {
                self.writer.write("for (");
                if let Some(init) = init {
                    self.in_for_head = true;
                    let result = self.print_node(*init);
                    self.in_for_head = false;
                    result?;
                }
                self.writer.write(";");
                if let Some(test) = test {
                    self.writer.write(" ");
                    self.print_node(*test)?;
                }
                self.writer.write(";");
                if let Some(update) = update {
                    self.writer.write(" ");
                    self.print_node(*update)?;
                }
                self.writer.write(") ");
                self.print_node(*body)
            }
            NodeData::ForInStatement { left, right, body } => {
                self.emit_for_each(*left, " in ", *right, *body)
            }
            NodeData::ForOfStatement { left, right, body } => {
                self.emit_for_each(*left, " of ", *right, *body)
            }
            NodeData::WhileStatement { test, body } => {
                self.writer.write("while (");
                self.print_node(*test)?;
                self.writer.write(") ");
                self.print_node(*body)
            }
            NodeData::DoWhileStatement { body, test } => {
                self.writer.write("do ");
                self.print_node(*body)?;
                self.writer.write(" while (");
                self.print_node(*test)?;
                self.writer.write(");");
                Ok(())
            }
            NodeData::BreakStatement { label } => self.emit_jump("break", *label),
            NodeData::ContinueStatement { label } => self.emit_jump("continue", *label),
            NodeData::LabeledStatement { label, body } => {
                self.print_node(*label)?;
                self.writer.write(": ");
                self.print_node(*body)
            }
            NodeData::SwitchStatement {
                discriminant,
                cases,
            } => {
                self.writer.write("switch (");
                self.print_node(*discriminant)?;
                self.writer.write(") {");
                self.writer.increase_indent();
                self.emit_statements(id, "cases", cases, true)?;
                self.writer.decrease_indent();
                self.writer.write_line();
                self.writer.write("}");
                Ok(())
            }
            NodeData::SwitchCase { test, consequent } => {
                match test {
                    Some(test) => {
                        self.writer.write("case ");
                        self.print_node(*test)?;
                        self.writer.write(":");
                    }
                    None => self.writer.write("default:"),
                }
                self.writer.increase_indent();
                let result = self.emit_statements(id, "consequent", consequent, true);
                self.writer.decrease_indent();
                result
            }
            NodeData::ThrowStatement { argument } => {
                self.writer.write("throw ");
                self.print_node(*argument)?;
                self.writer.write(";");
                Ok(())
            }
            NodeData::TryStatement {
                block,
                handler,
                finalizer,
            } => {
                self.writer.write("try ");
                self.print_node(*block)?;
                if let Some(handler) = handler {
                    self.writer.write(" ");
                    self.print_node(*handler)?;
                }
                if let Some(finalizer) = finalizer {
                    self.writer.write(" finally ");
                    self.print_node(*finalizer)?;
                }
                Ok(())
            }
            NodeData::CatchClause { param, body } => {
                self.writer.write("catch ");
                if let Some(param) = param {
                    self.writer.write("(");
                    self.print_node(*param)?;
                    self.writer.write(") ");
                }
                self.print_node(*body)
            }
            NodeData::VariableDeclaration { kind, declarations } => {
                // A declaration in a `for (...)` head has no terminator
                // of its own.
                let terminate = !std::mem::take(&mut self.in_for_head);
                self.writer.write(kind.as_str());
                self.writer.write(" ");
                self.emit_separated(id, "declarations", declarations, ", ")?;
                if terminate {
                    self.writer.write(";");
                }
                Ok(())
            }
            NodeData::VariableDeclarator { id: pattern, init } => {
                self.print_node(*pattern)?;
                if let Some(init) = init {
                    self.writer.write(" = ");
                    self.print_node(*init)?;
                }
                Ok(())
            }
            NodeData::ClassDeclaration { .. } => self.emit_class(id, true),
            NodeData::ClassMethod {
                key,
                params,
                body,
                is_static,
                computed,
                ..
            } => {
                if *is_static {
                    self.writer.write("static ");
                }
                if *computed {
                    self.writer.write("[");
                    self.print_node(*key)?;
                    self.writer.write("]");
                } else {
                    self.print_node(*key)?;
                }
                self.writer.write("(");
                self.emit_separated(id, "params", params, ", ")?;
                self.writer.write(") ");
                self.print_node(*body)
            }
            NodeData::Decorator { expression } => {
                self.writer.write("@");
                self.print_node(*expression)
            }

            NodeData::ImportDeclaration { specifiers, source } => {
                self.emit_import(id, specifiers, *source)
            }
            NodeData::ImportSpecifier { imported, local } => {
                self.print_node(*imported)?;
                if imported != local {
                    self.writer.write(" as ");
                    self.print_node(*local)?;
                }
                Ok(())
            }
            NodeData::ImportDefaultSpecifier { local } => self.print_node(*local),
            NodeData::ImportNamespaceSpecifier { local } => {
                self.writer.write("* as ");
                self.print_node(*local)
            }
            NodeData::ExportNamedDeclaration { declaration } => {
                let declaration = *declaration;
                if self.options.decorators_before_export
                    && arena.span(declaration).is_none()
                    && let NodeData::ClassDeclaration { decorators, .. } = arena.data(declaration)
                    && !decorators.is_empty()
                {
                    for &decorator in decorators {
                        self.print_node(decorator)?;
                        self.writer.write_line();
                    }
                    self.writer.write("export ");
                    return self.emit_class(declaration, false);
                }
                self.writer.write("export ");
                self.print_node(declaration)
            }
            NodeData::ExportDefaultDeclaration { declaration } => {
                let declaration = *declaration;
                self.writer.write("export default ");
                self.print_node(declaration)?;
                if !matches!(
                    arena.kind(declaration),
                    NodeKind::FunctionDeclaration | NodeKind::ClassDeclaration
                ) {
                    self.writer.write(";");
                }
                Ok(())
            }
        }
    }

    // ========================================================================
    // Composite emitters
    // ========================================================================

    fn emit_function(
        &mut self,
        func: NodeId,
        name: Option<NodeId>,
        params: &[NodeId],
        body: NodeId,
        is_async: bool,
        is_generator: bool,
    ) -> Result<(), PrintError> {
        if is_async {
            self.writer.write("async ");
        }
        self.writer.write("function");
        if is_generator {
            self.writer.write("*");
        }
        self.writer.write(" ");
        if let Some(name) = name {
            self.print_node(name)?;
        }
        self.writer.write("(");
        self.emit_separated(func, "params", params, ", ")?;
        self.writer.write(") ");
        self.print_node(body)
    }

    fn emit_class(&mut self, class: NodeId, with_decorators: bool) -> Result<(), PrintError> {
        let arena = self.arena;
        let NodeData::ClassDeclaration {
            decorators,
            id: name,
            super_class,
            body,
        } = arena.data(class)
        else {
            unreachable!("emit_class on a non-class node");
        };
        if with_decorators {
            for &decorator in decorators {
                if self.edits.is_removed(class, "decorators", decorator) {
                    continue;
                }
                self.print_node(decorator)?;
                self.writer.write_line();
            }
        }
        self.writer.write("class ");
        self.print_node(*name)?;
        if let Some(super_class) = super_class {
            self.writer.write(" extends ");
            self.print_node(*super_class)?;
        }
        self.writer.write(" ");
        if self.surviving_count(class, "body", body) == 0 {
            self.writer.write("{}");
            return Ok(());
        }
        self.writer.write("{");
        self.writer.increase_indent();
        let result = self.emit_statements(class, "body", body, true);
        self.writer.decrease_indent();
        result?;
        self.writer.write_line();
        self.writer.write("}");
        Ok(())
    }

    fn emit_block(&mut self, block: NodeId, body: &[NodeId]) -> Result<(), PrintError> {
        if self.surviving_count(block, "body", body) == 0 {
            self.writer.write("{}");
            return Ok(());
        }
        self.writer.write("{");
        self.writer.increase_indent();
        let result = self.emit_statements(block, "body", body, true);
        self.writer.decrease_indent();
        result?;
        self.writer.write_line();
        self.writer.write("}");
        Ok(())
    }

    fn emit_for_each(
        &mut self,
        left: NodeId,
        keyword: &str,
        right: NodeId,
        body: NodeId,
    ) -> Result<(), PrintError> {
        self.writer.write("for (");
        self.in_for_head = true;
        let result = self.print_node(left);
        self.in_for_head = false;
        result?;
        self.writer.write(keyword);
        self.print_node(right)?;
        self.writer.write(") ");
        self.print_node(body)
    }

    fn emit_jump(&mut self, keyword: &str, label: Option<NodeId>) -> Result<(), PrintError> {
        self.writer.write(keyword);
        if let Some(label) = label {
            self.writer.write(" ");
            self.print_node(label)?;
        }
        self.writer.write(";");
        Ok(())
    }

    fn emit_import(
        &mut self,
        import: NodeId,
        specifiers: &[NodeId],
        source: NodeId,
    ) -> Result<(), PrintError> {
        let arena = self.arena;
        let removal = self.edits.is_removal_parent(import);
        let survivors: Vec<NodeId> = specifiers
            .iter()
            .copied()
            .filter(|&s| !(removal && self.edits.is_removed(import, "specifiers", s)))
            .collect();
        self.writer.write("import ");
        if survivors.is_empty() {
            self.print_node(source)?;
            self.writer.write(";");
            return Ok(());
        }
        let mut written = false;
        let mut named: Vec<NodeId> = Vec::new();
        for specifier in survivors {
            match arena.data(specifier) {
                NodeData::ImportSpecifier { .. } => named.push(specifier),
                _ => {
                    if written {
                        self.writer.write(", ");
                    }
                    self.print_node(specifier)?;
                    written = true;
                }
            }
        }
        if !named.is_empty() {
            if written {
                self.writer.write(", ");
            }
            self.writer.write("{");
            for (i, specifier) in named.iter().enumerate() {
                if i > 0 {
                    self.writer.write(", ");
                }
                self.print_node(*specifier)?;
            }
            self.writer.write("}");
        }
        self.writer.write(" from ");
        self.print_node(source)?;
        self.writer.write(";");
        Ok(())
    }

    fn emit_braced_list(
        &mut self,
        parent: NodeId,
        field: &'static str,
        items: &[NodeId],
        open: &str,
        close: &str,
    ) -> Result<(), PrintError> {
        if self.surviving_count(parent, field, items) == 0 {
            self.writer.write(open);
            self.writer.write(close);
            return Ok(());
        }
        self.writer.write(open);
        self.writer.write(" ");
        self.emit_separated(parent, field, items, ", ")?;
        self.writer.write(" ");
        self.writer.write(close);
        Ok(())
    }

    // ========================================================================
    // Sequence joins
    // ========================================================================

    /// Separator-joined sequence with removal-aware gap reuse.
    pub(crate) fn emit_separated(
        &mut self,
        parent: NodeId,
        field: &'static str,
        items: &[NodeId],
        separator: &str,
    ) -> Result<(), PrintError> {
        let removal = self.edits.is_removal_parent(parent);
        let mut previous: Option<NodeId> = None;
        let mut emitted = false;
        for &item in items {
            if removal && self.edits.is_removed(parent, field, item) {
                // The gap across a removed sibling would resurrect its
                // text; fall back to the synthesized separator.
                previous = None;
                continue;
            }
            if emitted {
                let gap = if removal {
                    previous.and_then(|p| self.reusable_gap(p, item))
                } else {
                    None
                };
                match gap {
                    Some(text) => self.writer.write_raw(text),
                    None => self.writer.write(separator),
                }
            }
            self.print_node(item)?;
            emitted = true;
            previous = Some(item);
        }
        Ok(())
    }

    /// Line-per-item sequence (program bodies, blocks, class bodies,
    /// switch cases) with removal-aware gap reuse.
    pub(crate) fn emit_statements(
        &mut self,
        parent: NodeId,
        field: &'static str,
        items: &[NodeId],
        leading_break: bool,
    ) -> Result<(), PrintError> {
        let removal = self.edits.is_removal_parent(parent);
        let mut previous: Option<NodeId> = None;
        let mut emitted = false;
        for &item in items {
            if removal && self.edits.is_removed(parent, field, item) {
                previous = None;
                continue;
            }
            let gap = if removal && emitted {
                previous.and_then(|p| self.reusable_gap(p, item))
            } else {
                None
            };
            match gap {
                Some(text) => self.writer.write_raw(text),
                None => {
                    if emitted || leading_break {
                        self.writer.write_line();
                    }
                    self.writer.flush_indent();
                }
            }
            self.print_node(item)?;
            emitted = true;
            previous = Some(item);
        }
        Ok(())
    }

    /// Holey sequence (array expressions and patterns); elisions keep
    /// their separators.
    fn emit_holey(
        &mut self,
        parent: NodeId,
        field: &'static str,
        items: &[Option<NodeId>],
    ) -> Result<(), PrintError> {
        let removal = self.edits.is_removal_parent(parent);
        let mut previous: Option<NodeId> = None;
        let mut emitted_slot = false;
        for entry in items {
            if let Some(item) = entry
                && removal
                && self.edits.is_removed(parent, field, *item)
            {
                previous = None;
                continue;
            }
            if emitted_slot {
                let gap = match (previous, entry) {
                    (Some(p), Some(n)) if removal => self.reusable_gap(p, *n),
                    _ => None,
                };
                match gap {
                    Some(text) => self.writer.write_raw(text),
                    None => self.writer.write(", "),
                }
            }
            match entry {
                Some(item) => {
                    self.print_node(*item)?;
                    previous = Some(*item);
                }
                None => previous = None,
            }
            emitted_slot = true;
        }
        // A trailing elision needs its comma to survive.
        if matches!(items.last(), Some(None)) {
            self.writer.write(",");
        }
        Ok(())
    }

    /// Original bytes between two surviving siblings, when both carry
    /// ranges. Disabled when comment emission is off and the gap holds
    /// a comment.
    fn reusable_gap(&self, previous: NodeId, next: NodeId) -> Option<&'a str> {
        let before = self.arena.span(previous)?;
        let after = self.arena.span(next)?;
        if after.start < before.end {
            return None;
        }
        let text = safe_slice::slice(self.source, before.end as usize, after.start as usize);
        if !self.options.comments && (text.contains("//") || text.contains("/*")) {
            return None;
        }
        Some(text)
    }

    fn surviving_count(&self, parent: NodeId, field: &'static str, items: &[NodeId]) -> usize {
        if !self.edits.is_removal_parent(parent) {
            return items.len();
        }
        items
            .iter()
            .filter(|&&item| !self.edits.is_removed(parent, field, item))
            .count()
    }

    // ========================================================================
    // Parenthesization
    // ========================================================================

    fn emit_wrapped(&mut self, id: NodeId, parens: bool) -> Result<(), PrintError> {
        if parens {
            self.writer.write("(");
            self.print_node(id)?;
            self.writer.write(")");
            Ok(())
        } else {
            self.print_node(id)
        }
    }

    /// Would this expression, laid out structurally, begin with
    /// `function` or `{` in statement position?
    fn statement_needs_parens(&self, start: NodeId) -> bool {
        let arena = self.arena;
        let mut id = start;
        loop {
            match arena.data(id) {
                NodeData::FunctionExpression { .. } | NodeData::ObjectExpression { .. } => {
                    return true;
                }
                NodeData::BinaryExpression { left, .. }
                | NodeData::LogicalExpression { left, .. }
                | NodeData::AssignmentExpression { left, .. } => id = *left,
                NodeData::ConditionalExpression { test, .. } => id = *test,
                NodeData::MemberExpression { object, .. } => id = *object,
                NodeData::TaggedTemplateExpression { tag, .. } => id = *tag,
                NodeData::CallExpression { callee, .. } => {
                    // An IIFE callee is parenthesized by the call
                    // emission itself.
                    if matches!(arena.data(*callee), NodeData::FunctionExpression { .. }) {
                        return false;
                    }
                    id = *callee;
                }
                NodeData::UpdateExpression {
                    prefix: false,
                    argument,
                    ..
                } => id = *argument,
                NodeData::SequenceExpression { expressions } => match expressions.first() {
                    Some(&first) => id = first,
                    None => return false,
                },
                _ => return false,
            }
        }
    }

    // ========================================================================
    // Literals
    // ========================================================================

    fn write_string_literal(&mut self, value: &str) {
        let text = match self.options.quotes {
            QuoteStyle::Single => quote(value, '\'', false),
            QuoteStyle::Double => quote(value, '"', false),
            QuoteStyle::JsonSafe => quote(value, '"', true),
            QuoteStyle::Backtick => quote_backtick(value),
        };
        self.writer.write(&text);
    }

    fn write_number(&mut self, value: f64) {
        let text = encode_number(value, self.options.numbers);
        self.writer.write(&text);
    }
}

fn precedence(data: &NodeData) -> u8 {
    use NodeData::*;
    match data {
        SequenceExpression { .. } => 1,
        AssignmentExpression { .. } | ArrowFunctionExpression { .. } | YieldExpression { .. } => 2,
        ConditionalExpression { .. } => 3,
        LogicalExpression { op, .. } => match op {
            LogicalOp::Nullish => 4,
            LogicalOp::Or => 5,
            LogicalOp::And => 6,
        },
        BinaryExpression { op, .. } => binary_precedence(*op),
        UnaryExpression { .. } | AwaitExpression { .. } => 16,
        UpdateExpression { .. } => 17,
        CallExpression { .. }
        | NewExpression { .. }
        | MemberExpression { .. }
        | TaggedTemplateExpression { .. } => 18,
        _ => 20,
    }
}

fn binary_precedence(op: BinaryOp) -> u8 {
    use BinaryOp::*;
    match op {
        BitOr => 7,
        BitXor => 8,
        BitAnd => 9,
        EqEq | NotEq | StrictEq | StrictNotEq => 10,
        Lt | LtEq | Gt | GtEq | In | Instanceof => 11,
        LeftShift | RightShift | UnsignedRightShift => 12,
        Add | Sub => 13,
        Mul | Div | Mod => 14,
        Exp => 15,
    }
}

/// `??` never mixes with `&&`/`||` without parentheses.
fn mixes_nullish(op: LogicalOp, child: &NodeData) -> bool {
    match child {
        NodeData::LogicalExpression { op: child_op, .. } => matches!(
            (op, child_op),
            (LogicalOp::Nullish, LogicalOp::And | LogicalOp::Or)
                | (LogicalOp::And | LogicalOp::Or, LogicalOp::Nullish)
        ),
        _ => false,
    }
}

/// `-(-x)` and `+(+x)` must not collapse into `--x`/`++x`.
fn sign_clashes(op_text: &str, argument: &NodeData) -> bool {
    let leading = match argument {
        NodeData::UnaryExpression { op, .. } => op.as_str(),
        NodeData::UpdateExpression { op, prefix: true, .. } => op.as_str(),
        _ => return false,
    };
    leading.starts_with(op_text) && matches!(op_text, "-" | "+")
}

fn quote(value: &str, quote: char, json_safe: bool) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' if json_safe => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if json_safe && (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

fn quote_backtick(value: &str) -> String {
    let mut out = String::from("`");
    let mut chars = value.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '`' => out.push_str("\\`"),
            '$' if chars.peek() == Some(&'{') => out.push_str("\\$"),
            c => out.push(c),
        }
    }
    out.push('`');
    out
}

fn encode_number(value: f64, encoding: NumberEncoding) -> String {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    let integral =
        value.is_finite() && value.fract() == 0.0 && value >= 0.0 && value <= MAX_SAFE_INTEGER;
    if !integral {
        return format!("{value}");
    }
    let n = value as u64;
    match encoding {
        NumberEncoding::Decimal => n.to_string(),
        NumberEncoding::Binary => format!("0b{n:b}"),
        NumberEncoding::Octal => format!("0o{n:o}"),
        NumberEncoding::Hexadecimal => format!("0x{n:x}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoting() {
        assert_eq!(quote("it's", '\'', false), r"'it\'s'");
        assert_eq!(quote("a\"b", '"', false), r#""a\"b""#);
        assert_eq!(quote("line\nbreak", '"', false), r#""line\nbreak""#);
        assert_eq!(quote("\u{1}", '"', true), "\"\\u0001\"");
        assert_eq!(quote_backtick("a`b ${c}"), r"`a\`b \${c}`");
    }

    #[test]
    fn number_encodings() {
        assert_eq!(encode_number(10.0, NumberEncoding::Decimal), "10");
        assert_eq!(encode_number(10.0, NumberEncoding::Binary), "0b1010");
        assert_eq!(encode_number(10.0, NumberEncoding::Octal), "0o12");
        assert_eq!(encode_number(255.0, NumberEncoding::Hexadecimal), "0xff");
        // Non-integral values fall back to decimal.
        assert_eq!(encode_number(3.25, NumberEncoding::Hexadecimal), "3.25");
    }
}
