//! Whole-engine scenarios through the session facade.

use remod_core::{NodeData, NodeKind, PrintOptions, RemoveError, VarKind, parse};

fn init_logs() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn function_declaration_becomes_variable_declaration() {
    init_logs();
    let source = "function add(a, b) { return a + b; }";
    let mut session = parse(source).unwrap();
    let fun = session.find(|data| data.kind() == NodeKind::FunctionDeclaration)[0];
    let (name, params, body) = match session.arena().data(fun) {
        NodeData::FunctionDeclaration {
            id, params, body, ..
        } => (*id, params.clone(), *body),
        _ => unreachable!(),
    };

    let func = session
        .arena_mut()
        .function_expression(None, vec![params[1], params[0]], body);
    let declarator = session.arena_mut().variable_declarator(name, Some(func));
    let declaration = session
        .arena_mut()
        .variable_declaration(VarKind::Var, vec![declarator]);
    session.replace(fun, [declaration]);

    assert_eq!(
        session.print(PrintOptions::default()).unwrap(),
        "var add = function (b, a) { return a + b; };"
    );
}

#[test]
fn removing_declarators_cascades_through_the_statement() {
    init_logs();
    let source = "const a =   10, b =   20, c =   30;\nconst answer = 42;\n";
    let mut session = parse(source).unwrap();
    let declarators = session.find(|data| data.kind() == NodeKind::VariableDeclarator);
    assert_eq!(declarators.len(), 4);

    // Removing one of several declarators keeps the statement; the
    // original spacing around the survivors is retained.
    session.remove(declarators[0]).unwrap();
    // Removing the only declarator removes the whole statement.
    session.remove(declarators[3]).unwrap();

    assert_eq!(
        session.print(PrintOptions::default()).unwrap(),
        "const b =   20, c =   30;\n"
    );
}

#[test]
fn rename_follows_references_but_not_shadowing_scopes() {
    let source = "var x = 1;\nfunction inner() { let x = 2; use(x); }\nlog(x);\n";
    let mut session = parse(source).unwrap();
    let xs = session.find(|data| matches!(data, NodeData::Identifier { name } if name == "x"));
    assert_eq!(xs.len(), 4);

    // xs[0] is the outer declaration; its only reference is `log(x)`.
    let references = session.references_of(xs[0]).unwrap();
    assert_eq!(references, vec![xs[3]]);

    session.rename(xs[0], "renamed").unwrap();
    assert_eq!(
        session.print(PrintOptions::default()).unwrap(),
        "var renamed = 1;\nfunction inner() { let x = 2; use(x); }\nlog(renamed);\n"
    );
}

#[test]
fn rename_through_a_reference_reaches_the_declaration() {
    let source = "let total = 0;\ntotal += 1;\nreport(total);\n";
    let mut session = parse(source).unwrap();
    let totals =
        session.find(|data| matches!(data, NodeData::Identifier { name } if name == "total"));
    session.rename(totals[2], "sum").unwrap();
    assert_eq!(
        session.print(PrintOptions::default()).unwrap(),
        "let sum = 0;\nsum += 1;\nreport(sum);\n"
    );
}

#[test]
fn declaration_lookup_resolves_both_directions() {
    let source = "const value = 1;\nuse(value);\n";
    let session = parse(source).unwrap();
    let values =
        session.find(|data| matches!(data, NodeData::Identifier { name } if name == "value"));
    assert_eq!(session.declaration_of(values[1]).unwrap(), Some(values[0]));
    assert_eq!(session.declaration_of(values[0]).unwrap(), Some(values[0]));
    assert_eq!(session.references_of(values[1]).unwrap(), vec![values[1]]);

    let uses = session.find(|data| matches!(data, NodeData::Identifier { name } if name == "use"));
    assert_eq!(session.declaration_of(uses[0]).unwrap(), None);
    let scope = session.scope().unwrap();
    assert_eq!(scope.globals.get("use").unwrap(), &vec![uses[0]]);
}

#[test]
fn replace_string_keeps_the_original_quoting() {
    let source = "const a = 'one'; const b = \"two\";";
    let mut session = parse(source).unwrap();
    let strings = session.find(|data| data.kind() == NodeKind::StringLiteral);
    session.replace_string(strings[0], "ONE");
    session.replace_string(strings[1], "TWO");
    assert_eq!(
        session.print(PrintOptions::default()).unwrap(),
        "const a = 'ONE'; const b = \"TWO\";"
    );
}

#[test]
fn logical_expression_collapses_to_the_surviving_operand() {
    let source = "keep(ready && steady);";
    let mut session = parse(source).unwrap();
    let identifiers =
        session.find(|data| matches!(data, NodeData::Identifier { name } if name == "steady"));
    session.remove(identifiers[0]).unwrap();
    assert_eq!(
        session.print(PrintOptions::default()).unwrap(),
        "keep(ready);"
    );
}

#[test]
fn two_element_sequence_collapses_to_the_other_expression() {
    let source = "f((first, second));";
    let mut session = parse(source).unwrap();
    let identifiers =
        session.find(|data| matches!(data, NodeData::Identifier { name } if name == "first"));
    session.remove(identifiers[0]).unwrap();
    assert_eq!(session.print(PrintOptions::default()).unwrap(), "f((second));");
}

#[test]
fn longer_sequence_just_drops_the_expression() {
    let source = "f((first, second, third));";
    let mut session = parse(source).unwrap();
    let identifiers =
        session.find(|data| matches!(data, NodeData::Identifier { name } if name == "second"));
    session.remove(identifiers[0]).unwrap();
    assert_eq!(
        session.print(PrintOptions::default()).unwrap(),
        "f((first, third));"
    );
}

#[test]
fn removing_a_call_removes_its_expression_statement() {
    let source = "setup();\nteardown();\n";
    let mut session = parse(source).unwrap();
    let calls = session.find(|data| data.kind() == NodeKind::CallExpression);
    session.remove(calls[1]).unwrap();
    assert_eq!(session.print(PrintOptions::default()).unwrap(), "setup();\n");
}

#[test]
fn import_removal_collapses_single_specifier_declarations() {
    let source = "import def from 'mod';\nimport { a, b } from 'other';\nuse(def, a, b);\n";
    let mut session = parse(source).unwrap();
    let default_specifier =
        session.find(|data| data.kind() == NodeKind::ImportDefaultSpecifier)[0];
    let named = session.find(|data| data.kind() == NodeKind::ImportSpecifier);
    session.remove(default_specifier).unwrap();
    session.remove(named[0]).unwrap();
    assert_eq!(
        session.print(PrintOptions::default()).unwrap(),
        "import {b} from 'other';\nuse(def, a, b);\n"
    );
}

#[test]
fn unsupported_parent_is_reported() {
    let source = "if (ready) {}";
    let mut session = parse(source).unwrap();
    let test = session.find(|data| matches!(data, NodeData::Identifier { name } if name == "ready"))
        [0];
    assert!(matches!(
        session.remove(test),
        Err(RemoveError::Unsupported {
            parent: NodeKind::IfStatement
        })
    ));
    let root = session.root();
    assert!(matches!(
        session.remove(root),
        Err(RemoveError::NoParent { .. })
    ));
}

#[test]
fn ancestors_are_reported_innermost_first() {
    let source = "function outer() { return inner(); }";
    let session = parse(source).unwrap();
    let inner =
        session.find(|data| matches!(data, NodeData::Identifier { name } if name == "inner"))[0];
    let ancestors = session.ancestors_of(inner);
    let kinds: Vec<NodeKind> = ancestors
        .iter()
        .map(|&id| session.arena().kind(id))
        .collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::CallExpression,
            NodeKind::ReturnStatement,
            NodeKind::BlockStatement,
            NodeKind::FunctionDeclaration,
            NodeKind::Program,
        ]
    );
    assert_eq!(session.parent_of(session.root()), None);
}

#[test]
fn source_of_returns_the_exact_original_slice() {
    let source = "let spaced =   1  +   2;";
    let session = parse(source).unwrap();
    let sum = session.find(|data| data.kind() == NodeKind::BinaryExpression)[0];
    assert_eq!(session.source_of(sum), Some("1  +   2"));
}
