use std::fs;

use aisc_core::{AiscErrorExt, Level, Options, Script, compile_source, generate_error_report};

#[test]
fn read_script_from_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("hello.is");
    fs::write(&path, "let greeting = \"hi\"\n<: greeting\n").expect("write script");

    let script = Script::new(path.clone()).expect("script should load");
    assert_eq!(script.name, "hello.is");
    assert_eq!(script.path, path);
    assert!(!script.is_empty());

    let program = compile_source(&script, &Options::with_globals(["print"])).expect("script should compile");
    let js = program.to_source();
    assert!(js.starts_with("const greeting = \"hi\";\n"), "{}", js);
}

#[test]
fn missing_script_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = Script::new(dir.path().join("nope.is")).expect_err("file does not exist");
    assert_eq!(err.level(), Level::Error);
    assert_eq!(err.issuer(), "aisc.script");
    assert!(err.message().contains("nope.is"));
}

#[test]
fn compile_errors_carry_their_location() {
    let script = Script::from_source("m.is", "let a = 1\nlet b = match a { 1 => 2 }");
    let err = compile_source(&script, &Options::default()).expect_err("match is not lowered");
    let location = err.location().expect("lowering errors point at the construct");
    assert_eq!(location.file, "m.is");
    assert_eq!(location.line, 2);
    assert_eq!(err.level(), Level::Error);
}

#[test]
fn error_report_names_level_location_and_message() {
    let script = Script::from_source("m.is", "let a = 1\nlet b = match a { 1 => 2 }");
    let err = compile_source(&script, &Options::default()).expect_err("match is not lowered");
    let report = generate_error_report(err.as_ref());
    assert!(report.starts_with("AISC | ERROR | m.is:2:"), "{}", report);
    assert!(report.ends_with(&err.message()));
}
