// Trees built by hand, the way an embedder with its own parser feeds the
// lowering core. Covers shapes the reference grammar cannot produce.
use aisc_core::ast::{AssignOperator, AstNode, AstNodeKind};
use aisc_core::lower::{LowerError, LowerErrorKind};
use aisc_core::{AiscErrorExt, Location, compile, create_global_scope};

fn node(kind: AstNodeKind) -> AstNode {
    AstNode::bare(kind)
}

fn ident(name: &str) -> AstNode {
    node(AstNodeKind::Identifier { name: name.to_string() })
}

fn num(value: f64) -> AstNode {
    node(AstNodeKind::Number { value })
}

fn define(dest: AstNode, expr: AstNode, mutable: bool) -> AstNode {
    node(AstNodeKind::Definition { dest: Box::new(dest), expr: Some(Box::new(expr)), mutable })
}

fn lower(nodes: &[AstNode]) -> String {
    compile(nodes, &create_global_scope(&["print"])).expect("tree should lower").to_source()
}

fn lower_error(nodes: &[AstNode]) -> LowerError {
    compile(nodes, &create_global_scope(&["print"])).expect_err("tree should not lower")
}

#[test]
fn nodes_without_location_use_origin_positions() {
    let call = node(AstNodeKind::Call { callee: Box::new(ident("print")), args: vec![num(1.0)] });
    assert_eq!(lower(&[call]), "const __ref__ = 1;\nawait call(print, [__ref__], [0, 0]);\n");
}

#[test]
fn nested_namespaces_are_hoisted_with_full_prefix() {
    let inner = node(AstNodeKind::Namespace { name: "B".to_string(), members: vec![define(ident("x"), num(1.0), true)] });
    let outer = node(AstNodeKind::Namespace { name: "A".to_string(), members: vec![inner] });
    let read = define(ident("y"), ident("A:B:x"), false);
    assert_eq!(lower(&[read, outer]), "const A_B_x = 1;\nconst y = A_B_x;\n");
}

#[test]
fn namespace_inside_a_block_is_misplaced() {
    let block = node(AstNodeKind::Block {
        statements: vec![node(AstNodeKind::Namespace { name: "N".to_string(), members: Vec::new() })],
    });
    let err = lower_error(&[define(ident("x"), block, false)]);
    assert_eq!(err.kind, LowerErrorKind::Misplaced);
}

#[test]
fn statement_in_expression_position_is_misplaced() {
    let err = lower_error(&[define(ident("x"), node(AstNodeKind::Break), false)]);
    assert_eq!(err.kind, LowerErrorKind::Misplaced);
    assert_eq!(err.issuer(), "aisc.lower.expr.lower_expression");
}

#[test]
fn literal_pattern_is_an_invalid_destination() {
    let pattern = num(1.0).with_location(Location::new("hand.is".to_string(), 3, 5));
    let err = lower_error(&[define(pattern, num(2.0), false)]);
    assert_eq!(err.kind, LowerErrorKind::InvalidDestination);
    let location = err.location().expect("the pattern location is kept");
    assert_eq!((location.line, location.column), (3, 5));
}

#[test]
fn nested_invalid_pattern_is_found_after_the_temporary() {
    let pattern = node(AstNodeKind::Array { elements: vec![ident("a"), node(AstNodeKind::Null)] });
    let err = lower_error(&[define(pattern, ident("print"), false)]);
    assert_eq!(err.kind, LowerErrorKind::InvalidDestination);
}

#[test]
fn compound_assignment_to_a_call_is_rejected() {
    let call = node(AstNodeKind::Call { callee: Box::new(ident("print")), args: Vec::new() });
    let assign = node(AstNodeKind::Assignment {
        op: AssignOperator::AddAssign,
        dest: Box::new(call),
        expr: Box::new(num(1.0)),
    });
    let err = lower_error(&[assign]);
    assert_eq!(err.kind, LowerErrorKind::InvalidDestination);
    assert_eq!(err.issuer(), "aisc.lower.stmt.lower_compound");
}

#[test]
fn compound_assignment_to_a_pattern_fails_its_number_check() {
    let assign = node(AstNodeKind::Assignment {
        op: AssignOperator::SubAssign,
        dest: Box::new(node(AstNodeKind::Array { elements: vec![ident("a")] })),
        expr: Box::new(num(1.0)),
    });
    let js = lower(&[assign]);
    assert_eq!(js, "const __ref__ = 1;\nconst __ref__1 = [];\nassert_number(__ref__1, [0, 0]);\n");
}

#[test]
fn empty_program_lowers_to_nothing() {
    assert_eq!(lower(&[]), "");
}
