// Diagnostics for the command line.
// Turns the library's `AiscErrorExt` errors into reports that can be printed
// with a source snippet or serialised as JSON.

use aisc_core::{AiscErrorExt, Level};
use console::Style;
use serde::Serialize;
use std::fmt;

/// Severity levels for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Fatal,
    Error,
    Warning,
    Info,
}

impl From<Level> for Severity {
    fn from(level: Level) -> Self {
        match level {
            Level::Critical => Severity::Fatal,
            Level::Error => Severity::Error,
            Level::Warning => Severity::Warning,
            Level::Info => Severity::Info,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Fatal => "FATAL",
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
        };
        write!(f, "{}", s)
    }
}

/// Which phase produced the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Compile,
    Runtime,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportLocation {
    pub file: String,
    /// 1-based
    pub line: usize,
    /// 1-based
    pub column: usize,
}

/// A single diagnostic.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub message: String,
    pub severity: Severity,
    pub stage: Stage,
    pub issuer: String,
    pub location: Option<ReportLocation>,
}

impl Report {
    pub fn from_error(error: &dyn AiscErrorExt, stage: Stage) -> Self {
        Report {
            message: error.message(),
            severity: error.level().into(),
            stage,
            issuer: error.issuer(),
            location: error.location().map(|loc| ReportLocation {
                file: loc.file,
                line: loc.line,
                column: loc.column,
            }),
        }
    }

    /// A failure of the command line tool itself, e.g. an unwritable output file.
    pub fn tooling(message: String) -> Self {
        Report {
            message,
            severity: Severity::Error,
            stage: Stage::Compile,
            issuer: "aisc.cli".to_string(),
            location: None,
        }
    }

    /// Exit code of the process that stops on this report.
    pub fn exit_code(&self) -> i32 {
        match self.stage {
            Stage::Compile => 1,
            Stage::Runtime => 2,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Pretty-print to stderr with the offending source line and a caret
    /// under the column, when the location points into `source`.
    pub fn pretty_with_source(&self, source: &str) {
        let header = Style::new().bold().red();
        let sev = match self.severity {
            Severity::Fatal => Style::new().on_red().white().bold(),
            Severity::Error => Style::new().red().bold(),
            Severity::Warning => Style::new().yellow().bold(),
            Severity::Info => Style::new().blue().bold(),
        };

        eprintln!("{} {}", sev.apply_to(format!("[{}]", self.severity)), header.apply_to(&self.message));

        if let Some(loc) = &self.location {
            eprintln!(" --> {}:{}:{}", loc.file, loc.line, loc.column);

            if let Some(line_str) = source.lines().nth(loc.line.saturating_sub(1)) {
                eprintln!(" {:4} | {}", loc.line, line_str);
                let caret = format!("     | {}^", " ".repeat(loc.column.saturating_sub(1)));
                eprintln!("{}", Style::new().green().apply_to(caret));
            }
        }
        eprintln!("{}", Style::new().dim().apply_to(format!("     = issued by {}", self.issuer)));
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let loc = match &self.location {
            Some(l) => format!(" at {}:{}:{}", l.file, l.line, l.column),
            None => String::new(),
        };
        write!(f, "[{}]{}: {}", self.severity, loc, self.message)
    }
}
