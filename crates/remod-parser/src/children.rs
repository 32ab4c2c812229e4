//! Child traversal and sequence-field reflection.
//!
//! [`for_each_child`] yields a node's children in document order, which
//! the scope resolver's walks and the printer's verbatim descent both
//! rely on (sibling spans must come back monotonically increasing).
//!
//! The sequence-field functions give the edit store a by-name view of a
//! node's list-valued fields, for validating `remove_child` requests and
//! rebuilding a parent with removals filtered out.

use crate::node::{NodeData, NodeId, NodeKind};

/// Visit every child of `data` in document order.
pub fn for_each_child(data: &NodeData, mut f: impl FnMut(NodeId)) {
    for_each_child_impl(data, &mut f);
}

/// Children collected into a vector, in document order.
pub fn children(data: &NodeData) -> Vec<NodeId> {
    let mut out = Vec::new();
    for_each_child(data, |id| out.push(id));
    out
}

fn for_each_child_impl(data: &NodeData, f: &mut impl FnMut(NodeId)) {
    use NodeData::*;
    match data {
        Program { body } => visit_all(body, f),
        Identifier { .. }
        | StringLiteral { .. }
        | NumericLiteral { .. }
        | BooleanLiteral { .. }
        | NullLiteral
        | ThisExpression
        | TemplateElement { .. }
        | EmptyStatement
        | DebuggerStatement => {}
        ArrayExpression { elements } => visit_holey(elements, f),
        ObjectExpression { properties } | RecordExpression { properties } => {
            visit_all(properties, f)
        }
        TupleExpression { elements } => visit_all(elements, f),
        ObjectProperty {
            key,
            value,
            shorthand,
            ..
        } => {
            // A shorthand property's key is its value (or the value's
            // assignment-pattern left side); visiting both would walk
            // the same node twice.
            if *shorthand {
                f(*value);
            } else {
                f(*key);
                f(*value);
            }
        }
        FunctionExpression {
            id, params, body, ..
        } => {
            visit_opt(id, f);
            visit_all(params, f);
            f(*body);
        }
        ArrowFunctionExpression { params, body, .. } => {
            visit_all(params, f);
            f(*body);
        }
        UnaryExpression { argument, .. }
        | UpdateExpression { argument, .. }
        | SpreadElement { argument }
        | AwaitExpression { argument }
        | RestElement { argument }
        | ThrowStatement { argument } => f(*argument),
        YieldExpression { argument, .. } => visit_opt(argument, f),
        BinaryExpression { left, right, .. }
        | LogicalExpression { left, right, .. }
        | AssignmentExpression { left, right, .. }
        | AssignmentPattern { left, right } => {
            f(*left);
            f(*right);
        }
        ConditionalExpression {
            test,
            consequent,
            alternate,
        } => {
            f(*test);
            f(*consequent);
            f(*alternate);
        }
        CallExpression { callee, arguments } | NewExpression { callee, arguments } => {
            f(*callee);
            visit_all(arguments, f);
        }
        MemberExpression {
            object, property, ..
        } => {
            f(*object);
            f(*property);
        }
        SequenceExpression { expressions } => visit_all(expressions, f),
        TemplateLiteral {
            quasis,
            expressions,
        } => {
            // Interleaved: quasi, expression, quasi, ... quasi.
            for (i, quasi) in quasis.iter().enumerate() {
                f(*quasi);
                if let Some(expr) = expressions.get(i) {
                    f(*expr);
                }
            }
        }
        TaggedTemplateExpression { tag, quasi } => {
            f(*tag);
            f(*quasi);
        }
        ObjectPattern { properties } => visit_all(properties, f),
        ArrayPattern { elements } => visit_holey(elements, f),
        ExpressionStatement { expression } => f(*expression),
        BlockStatement { body } => visit_all(body, f),
        ReturnStatement { argument } => visit_opt(argument, f),
        IfStatement {
            test,
            consequent,
            alternate,
        } => {
            f(*test);
            f(*consequent);
            visit_opt(alternate, f);
        }
        ForStatement {
            init,
            test,
            update,
            body,
        } => {
            visit_opt(init, f);
            visit_opt(test, f);
            visit_opt(update, f);
            f(*body);
        }
        ForInStatement { left, right, body } | ForOfStatement { left, right, body } => {
            f(*left);
            f(*right);
            f(*body);
        }
        WhileStatement { test, body } => {
            f(*test);
            f(*body);
        }
        DoWhileStatement { body, test } => {
            f(*body);
            f(*test);
        }
        BreakStatement { label } | ContinueStatement { label } => visit_opt(label, f),
        LabeledStatement { label, body } => {
            f(*label);
            f(*body);
        }
        SwitchStatement {
            discriminant,
            cases,
        } => {
            f(*discriminant);
            visit_all(cases, f);
        }
        SwitchCase { test, consequent } => {
            visit_opt(test, f);
            visit_all(consequent, f);
        }
        TryStatement {
            block,
            handler,
            finalizer,
        } => {
            f(*block);
            visit_opt(handler, f);
            visit_opt(finalizer, f);
        }
        CatchClause { param, body } => {
            visit_opt(param, f);
            f(*body);
        }
        VariableDeclaration { declarations, .. } => visit_all(declarations, f),
        VariableDeclarator { id, init } => {
            f(*id);
            visit_opt(init, f);
        }
        FunctionDeclaration {
            id, params, body, ..
        } => {
            f(*id);
            visit_all(params, f);
            f(*body);
        }
        ClassDeclaration {
            decorators,
            id,
            super_class,
            body,
        } => {
            visit_all(decorators, f);
            f(*id);
            visit_opt(super_class, f);
            visit_all(body, f);
        }
        ClassMethod {
            key, params, body, ..
        } => {
            f(*key);
            visit_all(params, f);
            f(*body);
        }
        Decorator { expression } => f(*expression),
        ImportDeclaration { specifiers, source } => {
            visit_all(specifiers, f);
            f(*source);
        }
        ImportSpecifier { imported, local } => {
            f(*imported);
            if local != imported {
                f(*local);
            }
        }
        ImportDefaultSpecifier { local } | ImportNamespaceSpecifier { local } => f(*local),
        ExportNamedDeclaration { declaration } | ExportDefaultDeclaration { declaration } => {
            f(*declaration)
        }
    }
}

fn visit_all(ids: &[NodeId], f: &mut impl FnMut(NodeId)) {
    for &id in ids {
        f(id);
    }
}

fn visit_holey(ids: &[Option<NodeId>], f: &mut impl FnMut(NodeId)) {
    for id in ids.iter().flatten() {
        f(*id);
    }
}

fn visit_opt(id: &Option<NodeId>, f: &mut impl FnMut(NodeId)) {
    if let Some(id) = id {
        f(*id);
    }
}

/// Names of every field of a node kind, child-bearing and scalar alike,
/// in declaration order. Lets the edit store tell "no such field" apart
/// from "field exists but is not a sequence".
pub fn field_names(kind: NodeKind) -> &'static [&'static str] {
    use NodeKind::*;
    match kind {
        Program | BlockStatement => &["body"],
        Identifier => &["name"],
        StringLiteral | NumericLiteral | BooleanLiteral => &["value"],
        NullLiteral | ThisExpression | EmptyStatement | DebuggerStatement => &[],
        ArrayExpression | ArrayPattern => &["elements"],
        ObjectExpression | RecordExpression | ObjectPattern => &["properties"],
        TupleExpression => &["elements"],
        ObjectProperty => &["key", "value", "computed", "shorthand"],
        FunctionExpression => &["id", "params", "body", "is_async", "is_generator"],
        ArrowFunctionExpression => &["params", "body", "is_async"],
        UnaryExpression => &["op", "argument"],
        UpdateExpression => &["op", "prefix", "argument"],
        BinaryExpression | LogicalExpression | AssignmentExpression => &["op", "left", "right"],
        ConditionalExpression => &["test", "consequent", "alternate"],
        CallExpression | NewExpression => &["callee", "arguments"],
        MemberExpression => &["object", "property", "computed"],
        SequenceExpression => &["expressions"],
        SpreadElement | RestElement => &["argument"],
        AwaitExpression => &["argument"],
        YieldExpression => &["argument", "delegate"],
        TemplateLiteral => &["quasis", "expressions"],
        TemplateElement => &["raw", "cooked", "tail"],
        TaggedTemplateExpression => &["tag", "quasi"],
        AssignmentPattern => &["left", "right"],
        ExpressionStatement => &["expression"],
        ReturnStatement => &["argument"],
        IfStatement => &["test", "consequent", "alternate"],
        ForStatement => &["init", "test", "update", "body"],
        ForInStatement | ForOfStatement => &["left", "right", "body"],
        WhileStatement => &["test", "body"],
        DoWhileStatement => &["body", "test"],
        BreakStatement | ContinueStatement => &["label"],
        LabeledStatement => &["label", "body"],
        SwitchStatement => &["discriminant", "cases"],
        SwitchCase => &["test", "consequent"],
        ThrowStatement => &["argument"],
        TryStatement => &["block", "handler", "finalizer"],
        CatchClause => &["param", "body"],
        VariableDeclaration => &["kind", "declarations"],
        VariableDeclarator => &["id", "init"],
        FunctionDeclaration => &["id", "params", "body", "is_async", "is_generator"],
        ClassDeclaration => &["decorators", "id", "super_class", "body"],
        ClassMethod => &["kind", "key", "params", "body", "is_static", "computed"],
        Decorator => &["expression"],
        ImportDeclaration => &["specifiers", "source"],
        ImportSpecifier => &["imported", "local"],
        ImportDefaultSpecifier | ImportNamespaceSpecifier => &["local"],
        ExportNamedDeclaration | ExportDefaultDeclaration => &["declaration"],
    }
}

/// Names of the sequence-valued fields of a node kind, in document order.
pub fn sequence_field_names(kind: NodeKind) -> &'static [&'static str] {
    use NodeKind::*;
    match kind {
        Program | BlockStatement => &["body"],
        ArrayExpression | TupleExpression | ArrayPattern => &["elements"],
        ObjectExpression | RecordExpression | ObjectPattern => &["properties"],
        FunctionExpression | ArrowFunctionExpression | FunctionDeclaration | ClassMethod => {
            &["params"]
        }
        CallExpression | NewExpression => &["arguments"],
        SequenceExpression => &["expressions"],
        TemplateLiteral => &["quasis", "expressions"],
        SwitchStatement => &["cases"],
        SwitchCase => &["consequent"],
        VariableDeclaration => &["declarations"],
        ClassDeclaration => &["decorators", "body"],
        ImportDeclaration => &["specifiers"],
        _ => &[],
    }
}

/// Does the sequence field `field` on `data` currently contain `child`?
/// `None` when the kind has no such sequence field.
pub fn sequence_contains(data: &NodeData, field: &str, child: NodeId) -> Option<bool> {
    use NodeData::*;
    let plain: &Vec<NodeId> = match (data, field) {
        (Program { body }, "body") | (BlockStatement { body }, "body") => body,
        (ArrayExpression { elements }, "elements") | (ArrayPattern { elements }, "elements") => {
            return Some(elements.contains(&Some(child)));
        }
        (TupleExpression { elements }, "elements") => elements,
        (ObjectExpression { properties }, "properties")
        | (RecordExpression { properties }, "properties")
        | (ObjectPattern { properties }, "properties") => properties,
        (FunctionExpression { params, .. }, "params")
        | (ArrowFunctionExpression { params, .. }, "params")
        | (FunctionDeclaration { params, .. }, "params")
        | (ClassMethod { params, .. }, "params") => params,
        (CallExpression { arguments, .. }, "arguments")
        | (NewExpression { arguments, .. }, "arguments") => arguments,
        (SequenceExpression { expressions }, "expressions")
        | (TemplateLiteral { expressions, .. }, "expressions") => expressions,
        (TemplateLiteral { quasis, .. }, "quasis") => quasis,
        (SwitchStatement { cases, .. }, "cases") => cases,
        (SwitchCase { consequent, .. }, "consequent") => consequent,
        (VariableDeclaration { declarations, .. }, "declarations") => declarations,
        (ClassDeclaration { decorators, .. }, "decorators") => decorators,
        (ClassDeclaration { body, .. }, "body") => body,
        (ImportDeclaration { specifiers, .. }, "specifiers") => specifiers,
        _ => return None,
    };
    Some(plain.contains(&child))
}

/// Shallow copy of `data` with every sequence entry for which
/// `is_removed(field, child)` holds filtered out. Non-sequence fields
/// and surviving children keep their ids untouched.
pub fn filter_sequences(
    data: &NodeData,
    mut is_removed: impl FnMut(&'static str, NodeId) -> bool,
) -> NodeData {
    use NodeData::*;
    let mut copy = data.clone();
    match &mut copy {
        Program { body } | BlockStatement { body } => {
            body.retain(|&id| !is_removed("body", id));
        }
        ArrayExpression { elements } | ArrayPattern { elements } => {
            elements.retain(|entry| match entry {
                Some(id) => !is_removed("elements", *id),
                None => true,
            });
        }
        TupleExpression { elements } => {
            elements.retain(|&id| !is_removed("elements", id));
        }
        ObjectExpression { properties }
        | RecordExpression { properties }
        | ObjectPattern { properties } => {
            properties.retain(|&id| !is_removed("properties", id));
        }
        FunctionExpression { params, .. }
        | ArrowFunctionExpression { params, .. }
        | FunctionDeclaration { params, .. }
        | ClassMethod { params, .. } => {
            params.retain(|&id| !is_removed("params", id));
        }
        CallExpression { arguments, .. } | NewExpression { arguments, .. } => {
            arguments.retain(|&id| !is_removed("arguments", id));
        }
        SequenceExpression { expressions } => {
            expressions.retain(|&id| !is_removed("expressions", id));
        }
        TemplateLiteral {
            quasis,
            expressions,
        } => {
            quasis.retain(|&id| !is_removed("quasis", id));
            expressions.retain(|&id| !is_removed("expressions", id));
        }
        SwitchStatement { cases, .. } => {
            cases.retain(|&id| !is_removed("cases", id));
        }
        SwitchCase { consequent, .. } => {
            consequent.retain(|&id| !is_removed("consequent", id));
        }
        VariableDeclaration { declarations, .. } => {
            declarations.retain(|&id| !is_removed("declarations", id));
        }
        ClassDeclaration {
            decorators, body, ..
        } => {
            decorators.retain(|&id| !is_removed("decorators", id));
            body.retain(|&id| !is_removed("body", id));
        }
        ImportDeclaration { specifiers, .. } => {
            specifiers.retain(|&id| !is_removed("specifiers", id));
        }
        _ => {}
    }
    copy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeArena;
    use crate::node::VarKind;

    #[test]
    fn document_order_for_templates() {
        let mut arena = NodeArena::new();
        let q0 = arena.alloc(NodeData::TemplateElement {
            raw: "a ".into(),
            cooked: "a ".into(),
            tail: false,
        });
        let e0 = arena.identifier("x");
        let q1 = arena.alloc(NodeData::TemplateElement {
            raw: "".into(),
            cooked: "".into(),
            tail: true,
        });
        let template = NodeData::TemplateLiteral {
            quasis: vec![q0, q1],
            expressions: vec![e0],
        };
        assert_eq!(children(&template), vec![q0, e0, q1]);
    }

    #[test]
    fn shorthand_property_visits_value_once() {
        let mut arena = NodeArena::new();
        let a = arena.identifier("a");
        let prop = NodeData::ObjectProperty {
            key: a,
            value: a,
            computed: false,
            shorthand: true,
        };
        assert_eq!(children(&prop), vec![a]);
    }

    #[test]
    fn sequence_reflection() {
        let mut arena = NodeArena::new();
        let id = arena.identifier("a");
        let decl = arena.variable_declarator(id, None);
        let data = NodeData::VariableDeclaration {
            kind: VarKind::Const,
            declarations: vec![decl],
        };
        assert_eq!(sequence_field_names(data.kind()), &["declarations"]);
        assert_eq!(sequence_contains(&data, "declarations", decl), Some(true));
        assert_eq!(sequence_contains(&data, "declarations", id), Some(false));
        assert_eq!(sequence_contains(&data, "nope", decl), None);

        let filtered = filter_sequences(&data, |_, child| child == decl);
        match filtered {
            NodeData::VariableDeclaration { declarations, .. } => assert!(declarations.is_empty()),
            _ => panic!("kind changed"),
        }
    }
}
