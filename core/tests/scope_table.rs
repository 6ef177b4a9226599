use aisc_core::create_global_scope;
use aisc_core::lower::Scope;

#[test]
fn new_id_tries_bare_name_then_numbered_suffixes() {
    let root = Scope::root([]);
    assert_eq!(root.new_id("x"), "x");
    assert_eq!(root.new_id("x"), "x1");
    assert_eq!(root.new_id("x"), "x2");
    assert_eq!(root.new_id("y"), "y");
}

#[test]
fn new_id_replaces_non_alphanumeric_characters() {
    let root = Scope::root([]);
    assert_eq!(root.new_id("Core:type"), "Core_type");
    assert_eq!(root.new_id("a-b c"), "a_b_c");
    assert_eq!(root.new_id("Core_type"), "Core_type1");
}

#[test]
fn reserved_names_are_never_handed_out() {
    let root = Scope::root(["call", "Map"]);
    assert_eq!(root.new_id("call"), "call1");
    assert_eq!(root.define("Map", false), "Map1");
}

#[test]
fn registry_is_shared_across_sibling_and_child_scopes() {
    let root = Scope::root([]);
    let left = root.child();
    let right = root.child();
    assert_eq!(left.new_id("__ref__"), "__ref__");
    assert_eq!(right.new_id("__ref__"), "__ref__1");
    assert_eq!(left.child().new_id("__ref__"), "__ref__2");
    // Names stay reserved after the allocating scope is gone.
    drop(left);
    assert_eq!(root.new_id("__ref__"), "__ref__3");
}

#[test]
fn inner_definition_shadows_outer_one() {
    let root = Scope::root([]);
    assert_eq!(root.define("a", false), "a");
    let inner = root.child();
    assert_eq!(inner.define("a", true), "a1");

    let seen_inside = inner.lookup("a").expect("a is visible inside");
    assert_eq!(seen_inside.target_name, "a1");
    assert!(seen_inside.mutable);

    let seen_outside = root.lookup("a").expect("a is visible outside");
    assert_eq!(seen_outside.target_name, "a");
    assert!(!seen_outside.mutable);
}

#[test]
fn lookup_walks_outward_and_reports_missing_names() {
    let root = Scope::root([]);
    root.define("outer", true);
    let inner = root.child().child();
    assert_eq!(inner.lookup("outer").map(|e| e.target_name), Some("outer".to_string()));
    assert!(inner.lookup("missing").is_none());
    assert!(inner.exists("outer"));
    assert!(!inner.exists("missing"));
}

#[test]
fn namespace_members_are_published_under_qualified_names() {
    let root = Scope::root([]);
    let ns = root.namespace("Ns");
    assert_eq!(ns.define("x", true), "Ns_x");

    let local = ns.lookup("x").expect("alias inside the namespace");
    assert_eq!(local.target_name, "Ns_x");
    assert!(!local.mutable, "namespace members are immutable");

    let qualified = root.lookup("Ns:x").expect("qualified name outside");
    assert_eq!(qualified.target_name, "Ns_x");
    assert!(root.lookup("x").is_none());
}

#[test]
fn nested_namespaces_compose_their_prefixes() {
    let root = Scope::root([]);
    let outer = root.namespace("A");
    let inner = outer.namespace("B");
    assert_eq!(inner.define("x", false), "A_B_x");
    assert_eq!(inner.namespace_name(), Some("B"));
    assert!(inner.lookup("x").is_some());
    assert!(outer.lookup("B:x").is_some());
    assert!(root.lookup("A:B:x").is_some());
}

#[test]
fn global_scope_reserves_runtime_primitives_and_defines_host_globals() {
    let scope = create_global_scope(&["print", "Core:type"]);
    let used = scope.used_names();
    for name in ["repr", "call", "get_prop", "set_index", "internal_error", "assert_function"] {
        assert!(used.iter().any(|u| u == name), "{} should be reserved", name);
    }

    let print = scope.lookup("print").expect("print is a global");
    assert_eq!(print.target_name, "print");
    assert!(!print.mutable);
    assert_eq!(scope.lookup("Core:type").map(|e| e.target_name), Some("Core_type".to_string()));

    let entries = scope.local_entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].source_name, "Core:type");
}
