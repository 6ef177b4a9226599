use aisc_core::ast::AstNodeKind;
use aisc_core::lower::{LowerError, LowerErrorKind};
use aisc_core::{Script, compile, create_global_scope, generate_ast_from_source, transform};

fn lower(src: &str) -> String {
    let script = Script::from_source("test.is", src);
    let scope = create_global_scope(&["print", "Core:type"]);
    transform(&script, &scope).expect("script should lower")
}

fn lower_error(src: &str) -> LowerError {
    let script = Script::from_source("test.is", src);
    let ast = generate_ast_from_source(&script).expect("script should parse");
    let AstNodeKind::Script { body } = &ast.kind else {
        panic!("expected a script node, got {}", ast.kind);
    };
    compile(body, &create_global_scope(&["print"])).expect_err("lowering should fail")
}

#[test]
fn definitions_pick_const_or_let() {
    assert_eq!(lower("let a = 1"), "const a = 1;\n");
    assert_eq!(lower("var a = 1\na = 2"), "let a = 1;\na = 2;\n");
    assert_eq!(lower("var a"), "let a = null;\n");
}

#[test]
fn call_arguments_are_bound_before_the_call() {
    let js = lower("let a = 1\n<: a + 1");
    assert_eq!(
        js,
        "const a = 1;\n\
         const __ref__ = 1;\n\
         assert_number(a, [2, 3]);\n\
         assert_number(__ref__, [2, 7]);\n\
         const __ref__1 = a + __ref__;\n\
         await call(print, [__ref__1], [2, 0]);\n"
    );
}

#[test]
fn undefined_read_becomes_internal_error() {
    assert_eq!(
        lower("<: x"),
        "const __ref__ = internal_error(\"not_defined\", \"x\", [1, 3]);\n\
         await call(print, [__ref__], [1, 0]);\n"
    );
}

#[test]
fn assignment_to_immutable_evaluates_value_then_fails() {
    assert_eq!(
        lower("let a = 1\na = 2"),
        "const a = 1;\n2;\ninternal_error(\"immutable_variable\", \"a\", [2, 0]);\n"
    );
    let js = lower("b = eval { 3 }");
    assert!(js.contains("internal_error(\"not_defined\", \"b\", [1, 0]);"), "{}", js);
}

#[test]
fn reserved_and_primitive_names_are_renamed() {
    assert_eq!(lower("let call = 1"), "const call1 = 1;\n");
    assert_eq!(lower("let Map = 1"), "const Map1 = 1;\n");
    let js = lower("let __ref__ = 1\n<: __ref__");
    assert_eq!(js, "const __ref__ = 1;\nawait call(print, [__ref__], [2, 0]);\n");
}

#[test]
fn qualified_globals_use_sanitized_target_names() {
    let js = lower("<: Core:type(1)");
    assert!(js.contains("await call(Core_type, [__ref__], [1, 3])"), "{}", js);
}

#[test]
fn function_literal_defers_its_body() {
    assert_eq!(
        lower("let f = @(a, b = 2) { a }"),
        "const __ref__ = 2;\n\
         const f = async (arg_0, arg_1 = __ref__) => {\n    \
         const a = arg_0;\n    \
         const b = arg_1;\n    \
         const __run_result__ = a;\n    \
         return __run_result__;\n\
         };\n"
    );
}

#[test]
fn function_body_sees_later_top_level_definitions() {
    let js = lower("@f() { g() }\n@g() { 1 }");
    assert!(js.contains("await call(g, [], "), "{}", js);
    assert!(!js.contains("not_defined"), "{}", js);
}

#[test]
fn empty_function_returns_null() {
    let js = lower("@f() { }");
    assert!(js.contains("return null;"), "{}", js);
}

#[test]
fn or_only_evaluates_right_side_when_needed() {
    let js = lower("let a = true\nlet r = a || false");
    assert!(js.contains("let __or_result__ = a;\nassert_boolean(__or_result__, [2, 8]);\n"), "{}", js);
    assert!(
        js.contains(
            "if (!__or_result__) {\n    __or_result__ = false;\n    assert_boolean(__or_result__, [2, 13]);\n}"
        ),
        "{}",
        js
    );
    assert!(js.ends_with("const r = __or_result__;\n"), "{}", js);
}

#[test]
fn and_tests_the_left_result_directly() {
    let js = lower("let r = true && false");
    assert!(js.contains("let __and_result__ = true;"), "{}", js);
    assert!(js.contains("if (__and_result__) {"), "{}", js);
}

#[test]
fn if_expression_threads_its_value_through_a_result_variable() {
    let js = lower("let v = if true { 1 } else { 2 }");
    assert!(js.contains("assert_boolean(true, [1, 11]);"), "{}", js);
    assert!(js.contains("let __if_result__ = null;"), "{}", js);
    assert!(js.contains("__if_result__ = __run_result__;"), "{}", js);
    assert!(js.contains("} else {"), "{}", js);
    assert!(js.ends_with("const v = __if_result__;\n"), "{}", js);
}

#[test]
fn elif_nests_into_the_else_branch() {
    let js = lower("let v = if false { 1 } elif true { 2 }");
    assert!(js.contains("let __if_result__1 = null;"), "{}", js);
    assert!(js.contains("__if_result__ = __if_result__1;"), "{}", js);
}

#[test]
fn template_appends_each_part_through_repr() {
    assert_eq!(
        lower("let s = `a{1}b`"),
        "let __tmpl__ = \"\";\n\
         __tmpl__ += repr(\"a\");\n\
         __tmpl__ += repr(1);\n\
         __tmpl__ += repr(\"b\");\n\
         const s = __tmpl__;\n"
    );
}

#[test]
fn objects_lower_to_maps() {
    let js = lower("let o = { k: 1, \"two words\": null }");
    assert!(js.contains("const o = new Map([[\"k\", __ref__], [\"two words\", null]]);"), "{}", js);
}

#[test]
fn member_and_index_reads_go_through_accessors() {
    let js = lower("let o = { k: [1] }\nlet v = o.k[0]");
    assert!(js.contains("get_prop(o, \"k\", [2, 8])"), "{}", js);
    assert!(js.contains("get_index(__ref__"), "{}", js);
}

#[test]
fn exists_is_answered_at_compile_time() {
    let js = lower("let a = 1\n<: exists a\n<: exists b");
    assert!(js.contains("await call(print, [true], [2, 0]);"), "{}", js);
    assert!(js.contains("await call(print, [false], [3, 0]);"), "{}", js);
}

#[test]
fn eval_block_gets_its_own_scope() {
    let js = lower("let a = 1\nlet b = eval { let a = 2; a }\n<: a");
    assert!(js.contains("const a1 = 2;"), "{}", js);
    assert!(js.contains("const __run_result__ = a1;"), "{}", js);
    assert!(js.contains("const b = __run_result__;"), "{}", js);
    assert!(js.ends_with("await call(print, [a], [3, 0]);\n"), "{}", js);
}

#[test]
fn namespace_members_are_hoisted_and_qualified() {
    let js = lower(":: Ns {\n    let x = 1\n    @get() { x }\n}\n<: Ns:x\n<: x");
    let first = js.lines().next().unwrap_or_default();
    assert_eq!(first, "const Ns_x = 1;");
    assert!(js.contains("const Ns_get = async () => {"), "{}", js);
    assert!(js.contains("const __run_result__ = Ns_x;"), "{}", js);
    assert!(js.contains("await call(print, [Ns_x], [5, 0]);"), "{}", js);
    assert!(js.contains("internal_error(\"not_defined\", \"x\", [6, 3])"), "{}", js);
}

#[test]
fn namespace_var_is_still_const() {
    let js = lower(":: Ns { var x = 1 }");
    assert_eq!(js, "const Ns_x = 1;\n");
}

#[test]
fn meta_blocks_produce_no_code() {
    assert_eq!(lower("### { name: \"demo\" }\nlet a = 1"), "const a = 1;\n");
}

#[test]
fn match_is_rejected() {
    let err = lower_error("let v = match 1 { 1 => 2 }");
    assert_eq!(err.kind, LowerErrorKind::UnsupportedConstruct);
}
