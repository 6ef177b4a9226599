use aisc_core::js::primitives::{RESERVED_WORDS, RUNTIME_PRIMITIVES};
use aisc_core::lower::Scope;
use aisc_core::vm::host;
use aisc_core::{AiscErrorExt, Options, Script, VM};
use clap::{Arg, ArgAction, ArgMatches, Command};
use comfy_table::Table;
use log::{LevelFilter, debug, warn};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

mod report;

use report::{Report, Stage};

fn main() -> ExitCode {
    let cli = Command::new("aisc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compiles scripts to ECMAScript and runs them on the reference VM");

    let matches = setup_cli(cli).get_matches();
    let trace = matches.subcommand_matches("run").is_some_and(|sub_m| sub_m.get_flag("trace"));
    init_logging(matches.get_flag("verbose"), trace);

    match dispatch_commands(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            if matches.get_flag("json") {
                match failure.report.to_json() {
                    Ok(json) => eprintln!("{}", json),
                    Err(_) => eprintln!("{}", failure.report),
                }
            } else {
                failure.report.pretty_with_source(&failure.source);
            }
            ExitCode::from(failure.report.exit_code() as u8)
        }
    }
}

/// `RUST_LOG` still wins over both flags.
fn init_logging(verbose: bool, trace: bool) {
    let default = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    let mut builder = env_logger::Builder::new();
    builder.filter_level(default);
    if trace {
        builder.filter_module("aisc_core::vm", LevelFilter::Trace);
    }
    builder.parse_default_env().init();
}

/// Sets up the CLI with subcommands and arguments.
fn setup_cli(cli: Command) -> Command {
    cli.arg(
        Arg::new("verbose")
            .help("Log compiler phases")
            .short('v')
            .long("verbose")
            .action(ArgAction::SetTrue)
            .global(true),
    )
    .arg(
        Arg::new("json")
            .help("Print diagnostics as JSON")
            .long("json")
            .action(ArgAction::SetTrue)
            .global(true),
    )
    .subcommand(
        Command::new("build")
            .about("Compile the specified script file to ECMAScript")
            .arg(
                Arg::new("file")
                    .help("The script file to build")
                    .required(true)
                    .index(1),
            )
            .arg(
                Arg::new("dump")
                    .help("Print an intermediate stage instead of the output")
                    .short('d')
                    .long("dump")
                    .value_parser(["ast", "js", "names"])
                    .value_name("STAGE"),
            )
            .arg(
                Arg::new("output")
                    .help("Specify the output file")
                    .short('o')
                    .long("output")
                    .value_parser(clap::value_parser!(String))
                    .value_name("FILE"),
            ),
    )
    .subcommand(
        Command::new("run")
            .about("Compile and run a script file")
            .arg(
                Arg::new("file")
                    .help("The script file to run")
                    .required(true)
                    .index(1),
            )
            .arg(
                Arg::new("trace")
                    .help("Log every executed statement")
                    .long("trace")
                    .action(ArgAction::SetTrue),
            ),
    )
    .subcommand_required(true)
}

/// A failed command: the report to print and the source it refers to.
struct Failure {
    report: Report,
    source: String,
}

impl Failure {
    fn new(error: &dyn AiscErrorExt, stage: Stage, source: &str) -> Self {
        Failure { report: Report::from_error(error, stage), source: source.to_string() }
    }
}

fn load(sub_m: &ArgMatches) -> Result<Script, Failure> {
    let file = sub_m.get_one::<String>("file").cloned().unwrap_or_default();
    Script::new(PathBuf::from(file)).map_err(|e| Failure::new(e.as_ref(), Stage::Compile, ""))
}

fn host_scope() -> Rc<Scope> {
    Options::with_globals(host::PRESET_NAMES.iter().copied()).global_scope()
}

/// Dispatches the command based on the parsed arguments.
fn dispatch_commands(matches: &ArgMatches) -> Result<(), Failure> {
    match matches.subcommand() {
        Some(("build", sub_m)) => {
            let script = load(sub_m)?;
            let source = script.content.clone();

            if sub_m.get_one::<String>("dump").map(String::as_str) == Some("ast") {
                let ast = aisc_core::generate_ast_from_source(&script)
                    .map_err(|e| Failure::new(e.as_ref(), Stage::Compile, &source))?;
                let json = serde_json::to_string_pretty(&ast).unwrap_or_default();
                return emit(sub_m, &json);
            }

            let scope = host_scope();
            let program = aisc_core::compile_with_scope(&script, &scope)
                .map_err(|e| Failure::new(e.as_ref(), Stage::Compile, &source))?;

            match sub_m.get_one::<String>("dump").map(String::as_str) {
                Some("names") => emit(sub_m, &names_table(&scope).to_string()),
                Some("js") => emit(sub_m, &format!("{:#?}", program)),
                _ => emit(sub_m, &program.to_source()),
            }
        }
        Some(("run", sub_m)) => {
            let script = load(sub_m)?;
            let source = script.content.clone();
            let scope = host_scope();
            let program = aisc_core::compile_with_scope(&script, &scope)
                .map_err(|e| Failure::new(e.as_ref(), Stage::Compile, &source))?;

            let mut vm = VM::new(program).with_host(&scope, host::preset());
            if sub_m.get_flag("trace") {
                vm = vm.with_tracing(true);
            }
            let value = vm.run().map_err(|e| Failure::new(&e, Stage::Runtime, &source))?;
            debug!("script returned {}", value);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Writes `text` to `-o FILE` when given, stdout otherwise.
fn emit(sub_m: &ArgMatches, text: &str) -> Result<(), Failure> {
    match sub_m.get_one::<String>("output") {
        Some(path) => {
            if let Err(e) = fs::write(path, text) {
                warn!("could not write {}: {}", path, e);
                let report = Report::tooling(format!("Could not write {}: {}", path, e));
                return Err(Failure { report, source: String::new() });
            }
            Ok(())
        }
        None => {
            println!("{}", text);
            Ok(())
        }
    }
}

/// Every target name reserved in the global scope and what reserved it.
fn names_table(scope: &Scope) -> Table {
    let globals = scope.local_entries();
    let mut table = Table::new();
    table.set_header(vec!["target name", "kind", "source name"]);
    for name in scope.used_names() {
        let (kind, source) = if RUNTIME_PRIMITIVES.contains(&name.as_str()) {
            ("primitive", String::new())
        } else if RESERVED_WORDS.contains(&name.as_str()) {
            ("reserved", String::new())
        } else if let Some(entry) = globals.iter().find(|e| e.target_name == name) {
            ("global", entry.source_name.clone())
        } else {
            ("local", String::new())
        };
        table.add_row(vec![name.clone(), kind.to_string(), source]);
    }
    table
}
