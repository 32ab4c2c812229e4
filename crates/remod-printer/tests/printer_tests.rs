//! End-to-end printer behavior over parsed sources.

use remod_common::Span;
use remod_parser::children::for_each_child;
use remod_parser::{NodeArena, NodeData, NodeId, NodeKind, VarKind, parse};
use remod_printer::{
    EditError, EditStore, NumberEncoding, OverrideTable, PrintError, PrintOptions, QuoteStyle,
    generate,
};

fn find_nodes(arena: &NodeArena, root: NodeId, pred: &dyn Fn(&NodeData) -> bool) -> Vec<NodeId> {
    fn walk(
        arena: &NodeArena,
        id: NodeId,
        pred: &dyn Fn(&NodeData) -> bool,
        out: &mut Vec<NodeId>,
    ) {
        if pred(arena.data(id)) {
            out.push(id);
        }
        for_each_child(arena.data(id), |child| walk(arena, child, pred, out));
    }
    let mut out = Vec::new();
    walk(arena, root, pred, &mut out);
    out
}

fn roundtrip(source: &str) {
    let result = parse(source).expect("parse");
    let output = generate(
        &result.arena,
        result.root,
        source,
        &EditStore::new(),
        &OverrideTable::new(),
        PrintOptions::default(),
    )
    .expect("generate");
    assert_eq!(output, source);
}

#[test]
fn roundtrip_preserves_every_byte() {
    roundtrip("const a = 10,   b = 20;\n");
    roundtrip("// leading comment\nlet x = 1; /* inline */ let y = 2;\n");
    roundtrip("function weird(a, b) {\n  return a   +\n    // huh?\n    b;\n}\n");
    roundtrip("const s = 'single' + \"double\" + `tpl ${ 1 * 3 } end`;\n");
    roundtrip("let { x, y: z = 4, ...rest } = obj;\n");
    roundtrip("for (const [i, j] of pairs) { console.log(i, j); }\n");
    roundtrip(
        "class Foo extends Bar {\n  constructor(a) { this.a = a; }\n  static m([p], { q }) { return p + q; }\n}\n",
    );
    roundtrip("import def, { named as alias } from \"mod\";\nexport const out = def(alias);\n");
    roundtrip("label: for (;;) { break label; }\n");
    roundtrip("try {\n  risky();\n} catch ({ message }) {\n  report(message);\n} finally {}\n");
}

#[test]
fn roundtrip_tracks_trailing_newline_presence() {
    roundtrip("let a = 1;");
    roundtrip("let a = 1;\n");
    roundtrip("let a = 1;\n\n");
}

#[test]
fn wraps_function_declaration_as_variable_with_reversed_params() {
    let source = "function add(a, b) { return a + b; }";
    let mut result = parse(source).expect("parse");
    let fun = find_nodes(&result.arena, result.root, &|data| {
        data.kind() == NodeKind::FunctionDeclaration
    })[0];
    let (name, params, body) = match result.arena.data(fun) {
        NodeData::FunctionDeclaration {
            id, params, body, ..
        } => (*id, params.clone(), *body),
        _ => unreachable!(),
    };

    let func = result
        .arena
        .function_expression(None, vec![params[1], params[0]], body);
    let declarator = result.arena.variable_declarator(name, Some(func));
    let replacement = result
        .arena
        .variable_declaration(VarKind::Var, vec![declarator]);
    let mut edits = EditStore::new();
    edits.replace(fun, [replacement]);

    let output = generate(
        &result.arena,
        result.root,
        source,
        &edits,
        &OverrideTable::new(),
        PrintOptions::default(),
    )
    .unwrap();
    assert_eq!(output, "var add = function (b, a) { return a + b; };");
}

#[test]
fn replaced_function_keeps_body_formatting_verbatim() {
    let source = "function add(a, b) {\n  return a   +\n    // odd\n    b;\n}";
    let mut result = parse(source).expect("parse");
    let fun = find_nodes(&result.arena, result.root, &|data| {
        data.kind() == NodeKind::FunctionDeclaration
    })[0];
    let (name, params, body) = match result.arena.data(fun) {
        NodeData::FunctionDeclaration {
            id, params, body, ..
        } => (*id, params.clone(), *body),
        _ => unreachable!(),
    };
    let func = result
        .arena
        .function_expression(None, vec![params[1], params[0]], body);
    let declarator = result.arena.variable_declarator(name, Some(func));
    let replacement = result
        .arena
        .variable_declaration(VarKind::Var, vec![declarator]);
    let mut edits = EditStore::new();
    edits.replace(fun, [replacement]);

    let output = generate(
        &result.arena,
        result.root,
        source,
        &edits,
        &OverrideTable::new(),
        PrintOptions::default(),
    )
    .unwrap();
    assert_eq!(
        output,
        "var add = function (b, a) {\n  return a   +\n    // odd\n    b;\n};"
    );
}

#[test]
fn removing_first_declarator_leaves_no_orphaned_comma() {
    let source = "const a =   10, b =   20, c =   30;\nconst answer = 42;\n";
    let result = parse(source).expect("parse");
    let declarations = find_nodes(&result.arena, result.root, &|data| {
        data.kind() == NodeKind::VariableDeclaration
    });
    let first = declarations[0];
    let target = match result.arena.data(first) {
        NodeData::VariableDeclaration { declarations, .. } => declarations[0],
        _ => unreachable!(),
    };
    let mut edits = EditStore::new();
    edits
        .remove_child(&result.arena, first, "declarations", target)
        .unwrap();

    let output = generate(
        &result.arena,
        result.root,
        source,
        &edits,
        &OverrideTable::new(),
        PrintOptions::default(),
    )
    .unwrap();
    assert_eq!(output, "const b =   20, c =   30;\nconst answer = 42;\n");
}

#[test]
fn removing_middle_declarator_falls_back_to_synthesized_separator() {
    let source = "let a = 1, b = 2, c = 3;";
    let result = parse(source).expect("parse");
    let declaration = find_nodes(&result.arena, result.root, &|data| {
        data.kind() == NodeKind::VariableDeclaration
    })[0];
    let middle = match result.arena.data(declaration) {
        NodeData::VariableDeclaration { declarations, .. } => declarations[1],
        _ => unreachable!(),
    };
    let mut edits = EditStore::new();
    edits
        .remove_child(&result.arena, declaration, "declarations", middle)
        .unwrap();

    let output = generate(
        &result.arena,
        result.root,
        source,
        &edits,
        &OverrideTable::new(),
        PrintOptions::default(),
    )
    .unwrap();
    assert_eq!(output, "let a = 1, c = 3;");
}

#[test]
fn statement_removal_joins_and_gap_reuse() {
    let source = "first();\n\nsecond();\n\nthird();\n";
    let result = parse(source).expect("parse");
    let statements = find_nodes(&result.arena, result.root, &|data| {
        data.kind() == NodeKind::ExpressionStatement
    });

    // A removal between two survivors falls back to a single newline.
    let mut edits = EditStore::new();
    edits
        .remove_child(&result.arena, result.root, "body", statements[1])
        .unwrap();
    let output = generate(
        &result.arena,
        result.root,
        source,
        &edits,
        &OverrideTable::new(),
        PrintOptions::default(),
    )
    .unwrap();
    assert_eq!(output, "first();\nthird();\n");

    // Survivors with no removal between them keep the original gap,
    // blank line included.
    let mut edits = EditStore::new();
    edits
        .remove_child(&result.arena, result.root, "body", statements[2])
        .unwrap();
    let output = generate(
        &result.arena,
        result.root,
        source,
        &edits,
        &OverrideTable::new(),
        PrintOptions::default(),
    )
    .unwrap();
    assert_eq!(output, "first();\n\nsecond();\n");
}

#[test]
fn edit_locality_keeps_bytes_outside_the_subtree() {
    let source = "before( 1 );\nlet target = old   +  1;\nafter( 2 );\n";
    let mut result = parse(source).expect("parse");
    let old = find_nodes(&result.arena, result.root, &|data| {
        matches!(data, NodeData::Identifier { name } if name == "old")
    })[0];
    let replacement = result.arena.identifier("fresh");
    let mut edits = EditStore::new();
    edits.replace(old, [replacement]);

    let output = generate(
        &result.arena,
        result.root,
        source,
        &edits,
        &OverrideTable::new(),
        PrintOptions::default(),
    )
    .unwrap();
    assert_eq!(output, "before( 1 );\nlet target = fresh   +  1;\nafter( 2 );\n");
}

#[test]
fn last_replace_wins_end_to_end() {
    let source = "value;";
    let mut result = parse(source).expect("parse");
    let target = find_nodes(&result.arena, result.root, &|data| {
        matches!(data, NodeData::Identifier { name } if name == "value")
    })[0];
    let first = result.arena.identifier("first");
    let second = result.arena.identifier("second");
    let mut edits = EditStore::new();
    edits.replace(target, [first]);
    edits.replace(target, [second]);

    let output = generate(
        &result.arena,
        result.root,
        source,
        &edits,
        &OverrideTable::new(),
        PrintOptions::default(),
    )
    .unwrap();
    assert_eq!(output, "second;");
}

#[test]
fn insertions_compose_around_the_original_statement() {
    let source = "middle();";
    let mut result = parse(source).expect("parse");
    let statement = find_nodes(&result.arena, result.root, &|data| {
        data.kind() == NodeKind::ExpressionStatement
    })[0];

    let mut edits = EditStore::new();
    for name in ["inner_before", "outer_before"] {
        let callee = result.arena.identifier(name);
        let call = result.arena.call_expression(callee, Vec::new());
        let stmt = result.arena.expression_statement(call);
        edits.insert_before(statement, [stmt]);
    }
    for name in ["inner_after", "outer_after"] {
        let callee = result.arena.identifier(name);
        let call = result.arena.call_expression(callee, Vec::new());
        let stmt = result.arena.expression_statement(call);
        edits.insert_after(statement, [stmt]);
    }

    let output = generate(
        &result.arena,
        result.root,
        source,
        &edits,
        &OverrideTable::new(),
        PrintOptions::default(),
    )
    .unwrap();
    assert_eq!(
        output,
        "outer_before();\ninner_before();\nmiddle();\ninner_after();\nouter_after();"
    );
}

#[test]
fn empty_replacement_deletes_the_node() {
    let source = "a;\nb;\nc;";
    let result = parse(source).expect("parse");
    let statements = find_nodes(&result.arena, result.root, &|data| {
        data.kind() == NodeKind::ExpressionStatement
    });
    let mut edits = EditStore::new();
    edits.replace(statements[1], []);

    let output = generate(
        &result.arena,
        result.root,
        source,
        &edits,
        &OverrideTable::new(),
        PrintOptions::default(),
    )
    .unwrap();
    assert_eq!(output, "a;\n\nc;");
}

#[test]
fn quote_style_override_applies_to_one_literal_only() {
    let source = "const a = 'one'; const b = 'two';";
    let mut result = parse(source).expect("parse");
    let strings = find_nodes(&result.arena, result.root, &|data| {
        data.kind() == NodeKind::StringLiteral
    });
    let replacement_one = result.arena.string_literal("ONE");
    let replacement_two = result.arena.string_literal("TWO");
    let mut edits = EditStore::new();
    edits.replace(strings[0], [replacement_one]);
    edits.replace(strings[1], [replacement_two]);
    let mut overrides = OverrideTable::new();
    overrides.set_override(
        replacement_one,
        PrintOptions {
            quotes: QuoteStyle::Single,
            ..PrintOptions::default()
        },
    );

    let output = generate(
        &result.arena,
        result.root,
        source,
        &edits,
        &overrides,
        PrintOptions::default(),
    )
    .unwrap();
    assert_eq!(output, "const a = 'ONE'; const b = \"TWO\";");
}

#[test]
fn numeric_encoding_applies_to_synthesized_literals() {
    let source = "use(10);";
    let mut result = parse(source).expect("parse");
    let number = find_nodes(&result.arena, result.root, &|data| {
        data.kind() == NodeKind::NumericLiteral
    })[0];
    let replacement = result.arena.numeric_literal(255.0);
    let mut edits = EditStore::new();
    edits.replace(number, [replacement]);

    let output = generate(
        &result.arena,
        result.root,
        source,
        &edits,
        &OverrideTable::new(),
        PrintOptions {
            numbers: NumberEncoding::Hexadecimal,
            ..PrintOptions::default()
        },
    )
    .unwrap();
    assert_eq!(output, "use(0xff);");
}

#[test]
fn remove_child_validation_fails_at_the_call_site() {
    let source = "let a = 1, b = 2;";
    let result = parse(source).expect("parse");
    let declaration = find_nodes(&result.arena, result.root, &|data| {
        data.kind() == NodeKind::VariableDeclaration
    })[0];
    let declarator = match result.arena.data(declaration) {
        NodeData::VariableDeclaration { declarations, .. } => declarations[0],
        _ => unreachable!(),
    };
    let mut edits = EditStore::new();
    assert!(matches!(
        edits.remove_child(&result.arena, declaration, "declarators", declarator),
        Err(EditError::NoSuchField { .. })
    ));
    assert!(matches!(
        edits.remove_child(&result.arena, declaration, "kind", declarator),
        Err(EditError::NotASequence { .. })
    ));
    assert!(matches!(
        edits.remove_child(&result.arena, declarator, "declarations", declaration),
        Err(EditError::NoSuchField { .. })
    ));
    // Nothing was recorded by the failed calls.
    assert!(!edits.is_removal_parent(declaration));
}

#[test]
fn rangeless_node_inside_a_verbatim_region_is_a_defect() {
    // A hand-built tree where a ranged statement holds a synthesized
    // child: the printer cannot resume copying past a node with no
    // range, and must abort rather than guess.
    let source = "ghost;";
    let mut arena = NodeArena::new();
    let ghost = arena.identifier("ghost");
    let stmt = arena.alloc_spanned(
        NodeData::ExpressionStatement { expression: ghost },
        Span::new(0, 6),
    );
    let root = arena.alloc_spanned(NodeData::Program { body: vec![stmt] }, Span::new(0, 6));
    let err = generate(
        &arena,
        root,
        source,
        &EditStore::new(),
        &OverrideTable::new(),
        PrintOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, PrintError::MissingRange { .. }));
}

#[test]
fn nested_edits_inside_untouched_subtrees_still_apply() {
    let source = "outer(function () {\n  inner( target );\n});";
    let mut result = parse(source).expect("parse");
    let target = find_nodes(&result.arena, result.root, &|data| {
        matches!(data, NodeData::Identifier { name } if name == "target")
    })[0];
    let replacement = result.arena.identifier("patched");
    let mut edits = EditStore::new();
    edits.replace(target, [replacement]);

    let output = generate(
        &result.arena,
        result.root,
        source,
        &edits,
        &OverrideTable::new(),
        PrintOptions::default(),
    )
    .unwrap();
    assert_eq!(output, "outer(function () {\n  inner( patched );\n});");
}
