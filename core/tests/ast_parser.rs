use std::path::PathBuf;
use aisc_core::ast::{AssignOperator, AstNode, AstNodeKind, BinaryOperator, UnaryOperator};
use aisc_core::{AiscErrorExt, Script, ast};

fn parse_body(src: &str) -> Vec<AstNode> {
    let script = Script { name: "p.is".to_string(), path: PathBuf::from("p.is"), content: src.to_string() };
    let ast = ast::generate_ast_from_source(&script).expect("failed to parse sample");
    match ast.get_kind() {
        AstNodeKind::Script { body } => body.clone(),
        other => panic!("Unexpected AST root kind: {:?}", other),
    }
}

fn single(src: &str) -> AstNode {
    let mut body = parse_body(src);
    assert_eq!(body.len(), 1, "expected one top-level item in {:?}", src);
    body.remove(0)
}

/// The initializer of a `let` definition.
fn init_of(src: &str) -> AstNode {
    match single(src).get_kind() {
        AstNodeKind::Definition { expr: Some(expr), .. } => (**expr).clone(),
        other => panic!("expected a definition, got {:?}", other),
    }
}

#[test]
fn parse_simple_script_returns_ast() {
    let src = r#"
:: Ns {
    let x = 1
}
let a = Ns:x
<: a
"#;
    let body = parse_body(src);
    assert_eq!(body.len(), 3);
    assert!(matches!(body[0].get_kind(), AstNodeKind::Namespace { name, members } if name == "Ns" && members.len() == 1));
    assert!(matches!(body[1].get_kind(), AstNodeKind::Definition { mutable: false, .. }));
}

#[test]
fn let_and_var_set_mutability() {
    assert!(matches!(single("let a = 1").get_kind(), AstNodeKind::Definition { mutable: false, .. }));
    assert!(matches!(single("var a = 1").get_kind(), AstNodeKind::Definition { mutable: true, .. }));
    assert!(matches!(single("var a").get_kind(), AstNodeKind::Definition { expr: None, .. }));
}

#[test]
fn fn_def_desugars_to_immutable_function_definition() {
    match single("@f(x, y = 2) { x }").get_kind() {
        AstNodeKind::Definition { dest, expr: Some(expr), mutable: false } => {
            assert!(matches!(dest.get_kind(), AstNodeKind::Identifier { name } if name == "f"));
            match expr.get_kind() {
                AstNodeKind::Function { params, body } => {
                    assert_eq!(params.len(), 2);
                    assert!(params[0].default.is_none());
                    assert!(params[1].default.is_some());
                    assert_eq!(body.len(), 1);
                }
                other => panic!("expected a function, got {:?}", other),
            }
        }
        other => panic!("expected a definition, got {:?}", other),
    }
}

#[test]
fn out_statement_calls_print() {
    match single("<: 1").get_kind() {
        AstNodeKind::Call { callee, args } => {
            assert!(matches!(callee.get_kind(), AstNodeKind::Identifier { name } if name == "print"));
            assert_eq!(args.len(), 1);
        }
        other => panic!("expected a call, got {:?}", other),
    }
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    match init_of("let v = 1 + 2 * 3").get_kind() {
        AstNodeKind::BinaryOp { op: BinaryOperator::Add, right, .. } => {
            assert!(matches!(right.get_kind(), AstNodeKind::BinaryOp { op: BinaryOperator::Mul, .. }));
        }
        other => panic!("unexpected tree {:?}", other),
    }
}

#[test]
fn power_is_right_associative() {
    match init_of("let v = 2 ^ 3 ^ 2").get_kind() {
        AstNodeKind::BinaryOp { op: BinaryOperator::Pow, left, right } => {
            assert!(matches!(left.get_kind(), AstNodeKind::Number { value } if *value == 2.0));
            assert!(matches!(right.get_kind(), AstNodeKind::BinaryOp { op: BinaryOperator::Pow, .. }));
        }
        other => panic!("unexpected tree {:?}", other),
    }
}

#[test]
fn logical_operators_have_lowest_precedence() {
    match init_of("let v = a == 1 || b && c").get_kind() {
        AstNodeKind::BinaryOp { op: BinaryOperator::Or, left, right } => {
            assert!(matches!(left.get_kind(), AstNodeKind::BinaryOp { op: BinaryOperator::Eq, .. }));
            assert!(matches!(right.get_kind(), AstNodeKind::BinaryOp { op: BinaryOperator::And, .. }));
        }
        other => panic!("unexpected tree {:?}", other),
    }
}

#[test]
fn negative_literals_are_folded() {
    assert!(matches!(init_of("let v = -1").get_kind(), AstNodeKind::Number { value } if *value == -1.0));
    assert!(matches!(
        init_of("let v = -x").get_kind(),
        AstNodeKind::UnaryOp { op: UnaryOperator::Minus, .. }
    ));
    assert!(matches!(init_of("let v = !x").get_kind(), AstNodeKind::UnaryOp { op: UnaryOperator::Not, .. }));
}

#[test]
fn postfix_chains_nest_left_to_right() {
    match init_of("let v = o.items[0](1)").get_kind() {
        AstNodeKind::Call { callee, args } => {
            assert_eq!(args.len(), 1);
            match callee.get_kind() {
                AstNodeKind::Index { object, .. } => {
                    assert!(matches!(object.get_kind(), AstNodeKind::Member { property, .. } if property == "items"));
                }
                other => panic!("expected an index, got {:?}", other),
            }
        }
        other => panic!("expected a call, got {:?}", other),
    }
}

#[test]
fn compound_assignment_is_a_statement() {
    match single("x += 2").get_kind() {
        AstNodeKind::Assignment { op, dest, .. } => {
            assert_eq!(*op, AssignOperator::AddAssign);
            assert!(matches!(dest.get_kind(), AstNodeKind::Identifier { name } if name == "x"));
        }
        other => panic!("expected an assignment, got {:?}", other),
    }
    assert!(matches!(single("x == 2").get_kind(), AstNodeKind::BinaryOp { op: BinaryOperator::Eq, .. }));
}

#[test]
fn range_loop_defaults_its_start_to_zero() {
    match single("for let i, 5 { }").get_kind() {
        AstNodeKind::ForRange { var, from, .. } => {
            assert_eq!(var, "i");
            assert!(matches!(from.get_kind(), AstNodeKind::Number { value } if *value == 0.0));
        }
        other => panic!("expected a range loop, got {:?}", other),
    }
    assert!(matches!(single("for (let i = 1, 5) { }").get_kind(), AstNodeKind::ForRange { .. }));
    assert!(matches!(single("for 5 { }").get_kind(), AstNodeKind::ForTimes { .. }));
}

#[test]
fn each_accepts_a_pattern() {
    match single("each let [k, v], pairs { }").get_kind() {
        AstNodeKind::Each { var, .. } => {
            assert!(matches!(var.get_kind(), AstNodeKind::Array { elements } if elements.len() == 2));
        }
        other => panic!("expected an each loop, got {:?}", other),
    }
}

#[test]
fn if_collects_elif_arms() {
    match init_of("let v = if a { 1 } elif b { 2 } elif c { 3 } else { 4 }").get_kind() {
        AstNodeKind::If { elifs, else_, .. } => {
            assert_eq!(elifs.len(), 2);
            assert!(else_.is_some());
        }
        other => panic!("expected an if, got {:?}", other),
    }
}

#[test]
fn strings_and_templates_unescape() {
    assert!(matches!(init_of(r#"let s = "a\"b""#).get_kind(), AstNodeKind::String { value } if value == "a\"b"));
    assert!(matches!(init_of("let s = 'it\\'s'").get_kind(), AstNodeKind::String { value } if value == "it's"));
    match init_of("let s = `n={n}!`").get_kind() {
        AstNodeKind::Template { parts } => {
            assert_eq!(parts.len(), 3);
            assert!(matches!(parts[1].get_kind(), AstNodeKind::Identifier { name } if name == "n"));
        }
        other => panic!("expected a template, got {:?}", other),
    }
}

#[test]
fn keywords_only_match_whole_words() {
    assert!(matches!(
        single("let iffy = 1").get_kind(),
        AstNodeKind::Definition { dest, .. } if matches!(dest.get_kind(), AstNodeKind::Identifier { name } if name == "iffy")
    ));
}

#[test]
fn comments_are_ignored() {
    let body = parse_body("// leading\nlet a = 1 /* inline */\n// trailing");
    assert_eq!(body.len(), 1);
}

#[test]
fn meta_keeps_its_optional_name() {
    assert!(matches!(single("### info { a: 1 }").get_kind(), AstNodeKind::Meta { name: Some(n), .. } if n == "info"));
    assert!(matches!(single("### [1, 2]").get_kind(), AstNodeKind::Meta { name: None, .. }));
}

#[test]
fn locations_are_one_based() {
    let node = single("\n  let a = 1");
    let location = node.get_location().expect("definitions carry a location");
    assert_eq!(location.line, 2);
    assert_eq!(location.column, 3);
}

#[test]
fn syntax_errors_and_empty_scripts_are_reported() {
    let bad = Script::from_source("bad.is", "let = 1");
    let err = ast::generate_ast_from_source(&bad).expect_err("missing name must not parse");
    let location = err.location().expect("syntax errors carry a location");
    assert_eq!(location.line, 1);

    let empty = Script::from_source("empty.is", "  \n ");
    let err = ast::generate_ast_from_source(&empty).expect_err("empty script");
    assert_eq!(err.issuer(), "aisc.ast.generate_ast_from_source");
}
