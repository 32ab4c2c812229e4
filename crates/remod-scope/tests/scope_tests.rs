//! Scope resolution over parsed sources.

use remod_parser::children::for_each_child;
use remod_parser::{NodeArena, NodeData, NodeId, NodeKind, VarKind, parse};
use remod_scope::{ScopeError, ScopeInfo, analyze};

fn analyzed(source: &str) -> (remod_parser::ParseResult, ScopeInfo) {
    let result = parse(source).expect("parse");
    let info = analyze(&result.arena, result.root).expect("analyze");
    (result, info)
}

fn idents(arena: &NodeArena, root: NodeId, name: &str) -> Vec<NodeId> {
    fn walk(arena: &NodeArena, id: NodeId, name: &str, out: &mut Vec<NodeId>) {
        if arena.identifier_name(id) == Some(name) {
            out.push(id);
        }
        for_each_child(arena.data(id), |child| walk(arena, child, name, out));
    }
    let mut out = Vec::new();
    walk(arena, root, name, &mut out);
    out
}

fn find_kind(arena: &NodeArena, root: NodeId, kind: NodeKind) -> Vec<NodeId> {
    fn walk(arena: &NodeArena, id: NodeId, kind: NodeKind, out: &mut Vec<NodeId>) {
        if arena.kind(id) == kind {
            out.push(id);
        }
        for_each_child(arena.data(id), |child| walk(arena, child, kind, out));
    }
    let mut out = Vec::new();
    walk(arena, root, kind, &mut out);
    out
}

#[test]
fn var_hoists_through_blocks_to_the_function() {
    let (result, info) = analyzed("function f() { { var x = 1; } return x; }");
    let xs = idents(&result.arena, result.root, "x");
    let function = find_kind(&result.arena, result.root, NodeKind::FunctionDeclaration)[0];
    assert_eq!(info.declaration_scope.get(&xs[0]), Some(&function));
    assert_eq!(info.declarations.get(&xs[1]), Some(&xs[0]));
}

#[test]
fn let_binds_at_the_nearest_block() {
    let (result, info) = analyzed("{ let y = 1; use(y); } y;");
    let ys = idents(&result.arena, result.root, "y");
    let block = find_kind(&result.arena, result.root, NodeKind::BlockStatement)[0];
    assert_eq!(info.declaration_scope.get(&ys[0]), Some(&block));
    assert_eq!(info.declarations.get(&ys[1]), Some(&ys[0]));
    // The trailing `y` is outside the block and resolves to nothing.
    assert_eq!(info.globals.get("y"), Some(&vec![ys[2]]));
}

#[test]
fn innermost_binding_shadows_outer_ones() {
    let (result, info) = analyzed("let x = 1;\nfunction inner() { let x = 2; use(x); }\nlog(x);");
    let xs = idents(&result.arena, result.root, "x");
    assert_eq!(xs.len(), 4);
    assert_eq!(info.declarations.get(&xs[2]), Some(&xs[1]));
    assert_eq!(info.declarations.get(&xs[3]), Some(&xs[0]));
    assert_eq!(info.references.get(&xs[0]), Some(&vec![xs[3]]));
    assert_eq!(info.references.get(&xs[1]), Some(&vec![xs[2]]));
}

#[test]
fn catch_parameter_binds_to_its_clause() {
    let (result, info) = analyzed("try { risky(); } catch (err) { log(err); } err;");
    let errs = idents(&result.arena, result.root, "err");
    let clause = find_kind(&result.arena, result.root, NodeKind::CatchClause)[0];
    assert_eq!(info.declaration_scope.get(&errs[0]), Some(&clause));
    assert_eq!(info.declarations.get(&errs[1]), Some(&errs[0]));
    assert_eq!(info.globals.get("err"), Some(&vec![errs[2]]));
}

#[test]
fn arguments_and_this_resolve_through_arrows() {
    let (result, info) =
        analyzed("function f() { return () => [this, arguments]; }\nconst top = this;");
    let function = find_kind(&result.arena, result.root, NodeKind::FunctionDeclaration)[0];
    let this_nodes = find_kind(&result.arena, result.root, NodeKind::ThisExpression);
    let argument_reads = idents(&result.arena, result.root, "arguments");

    assert_eq!(info.this_bindings.get(&this_nodes[0]), Some(&function));
    assert_eq!(info.this_references.get(&function), Some(&vec![this_nodes[0]]));
    assert_eq!(info.global_this, vec![this_nodes[1]]);

    assert_eq!(info.arguments_bindings.get(&argument_reads[0]), Some(&function));
    assert_eq!(
        info.arguments_references.get(&function),
        Some(&vec![argument_reads[0]])
    );
    assert!(info.globals.get("arguments").is_none());
}

#[test]
fn import_specifiers_bind_at_the_module_root() {
    let (result, info) = analyzed("import { helper as run } from 'mod';\nrun();");
    let runs = idents(&result.arena, result.root, "run");
    assert_eq!(info.declaration_scope.get(&runs[0]), Some(&result.root));
    assert_eq!(info.declarations.get(&runs[1]), Some(&runs[0]));
    // The imported name itself is not a binding for `helper`.
    assert!(info.globals.get("helper").is_none());
}

#[test]
fn redeclaration_in_one_scope_keeps_the_last_entry() {
    let (result, info) = analyzed("var x = 1; var x = 2; use(x);");
    let xs = idents(&result.arena, result.root, "x");
    assert_eq!(info.declarations.get(&xs[2]), Some(&xs[1]));
    assert!(info.references.get(&xs[0]).is_none());
}

#[test]
fn function_declaration_names_bind_in_the_enclosing_scope() {
    let (result, info) = analyzed("function outer() { function helper() {} helper(); } outer();");
    let functions = find_kind(&result.arena, result.root, NodeKind::FunctionDeclaration);
    let helpers = idents(&result.arena, result.root, "helper");
    let outers = idents(&result.arena, result.root, "outer");
    assert_eq!(info.declaration_scope.get(&helpers[0]), Some(&functions[0]));
    assert_eq!(info.declaration_scope.get(&outers[0]), Some(&result.root));
    assert_eq!(info.declarations.get(&helpers[1]), Some(&helpers[0]));
    assert_eq!(info.declarations.get(&outers[1]), Some(&outers[0]));
}

#[test]
fn named_function_expression_sees_its_own_name() {
    let (result, info) = analyzed("const f = function fact(n) { return fact(n - 1); };");
    let facts = idents(&result.arena, result.root, "fact");
    assert_eq!(info.declarations.get(&facts[1]), Some(&facts[0]));
    let function = find_kind(&result.arena, result.root, NodeKind::FunctionExpression)[0];
    assert_eq!(info.declaration_scope.get(&facts[0]), Some(&function));
}

#[test]
fn destructured_parameters_declare_all_their_names() {
    let (result, info) = analyzed(
        "function g({ a = fallback, ...rest }, [head, , tail]) { return [a, rest, head, tail]; }",
    );
    let function = find_kind(&result.arena, result.root, NodeKind::FunctionDeclaration)[0];
    for name in ["a", "rest", "head", "tail"] {
        let nodes = idents(&result.arena, result.root, name);
        assert_eq!(
            info.declaration_scope.get(&nodes[0]),
            Some(&function),
            "{name} should be a parameter binding"
        );
        assert_eq!(info.declarations.get(&nodes[1]), Some(&nodes[0]));
    }
    let fallback = idents(&result.arena, result.root, "fallback");
    assert_eq!(info.globals.get("fallback"), Some(&fallback));
}

#[test]
fn undefined_is_never_a_reference() {
    let (_result, info) = analyzed("let u = undefined; undefined;");
    assert!(info.globals.get("undefined").is_none());
}

#[test]
fn globals_keep_first_occurrence_order() {
    let (_result, info) = analyzed("zebra(); alpha(); zebra();");
    let names: Vec<&String> = info.globals.keys().collect();
    assert_eq!(names, vec!["zebra", "alpha"]);
    assert_eq!(info.globals.get("zebra").map(Vec::len), Some(2));
}

#[test]
fn declaration_reference_symmetry_holds() {
    let source = "\
import { start } from 'lib';
let counter = 0;
function tick(step = 1) {
  counter += step;
  return counter;
}
start(tick, counter);
";
    let (_result, info) = analyzed(source);
    for (reference, declaration) in &info.declarations {
        let list = info
            .references
            .get(declaration)
            .expect("every resolved declaration has a reference list");
        assert!(list.contains(reference));
    }
    for (declaration, references) in &info.references {
        for reference in references {
            assert_eq!(info.declarations.get(reference), Some(declaration));
        }
    }
}

#[test]
fn unhandled_pattern_kind_is_a_defect() {
    let mut arena = NodeArena::new();
    let bad = arena.numeric_literal(1.0);
    let declarator = arena.variable_declarator(bad, None);
    let declaration = arena.variable_declaration(VarKind::Let, vec![declarator]);
    let root = arena.alloc(NodeData::Program {
        body: vec![declaration],
    });
    assert!(matches!(
        analyze(&arena, root),
        Err(ScopeError::UnsupportedPattern {
            kind: NodeKind::NumericLiteral,
            ..
        })
    ));
}
