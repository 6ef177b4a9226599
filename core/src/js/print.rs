//! file: core/src/js/print.rs
//! description: renders the target AST as ECMAScript source text.
use std::fmt;

use super::ast::{DeclKind, Expr, Function, Program, Stmt};

impl Program {
    /// Render the program to source text, one top-level statement per line.
    pub fn to_source(&self) -> String {
        let mut out = String::new();
        for stmt in &self.body {
            write_stmt(stmt, 0, &mut out);
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_source())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        write_expr(self, 0, &mut out);
        f.write_str(&out)
    }
}

/// Number formatting that matches `Number.prototype.toString` for the
/// values the language produces.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}

fn indent(level: usize, out: &mut String) {
    for _ in 0..level {
        out.push_str("    ");
    }
}

fn write_block(stmts: &[Stmt], indent_level: usize, out: &mut String) {
    out.push_str("{\n");
    for s in stmts {
        write_stmt(s, indent_level + 1, out);
        out.push('\n');
    }
    indent(indent_level, out);
    out.push('}');
}

fn write_stmt(stmt: &Stmt, indent_level: usize, out: &mut String) {
    indent(indent_level, out);
    match stmt {
        Stmt::Decl { kind, name, init } => {
            out.push_str(match kind {
                DeclKind::Const => "const ",
                DeclKind::Let => "let ",
            });
            out.push_str(name);
            out.push_str(" = ");
            write_expr(init, indent_level, out);
            out.push(';');
        }
        Stmt::Expr(expr) => {
            write_expr(expr, indent_level, out);
            out.push(';');
        }
        Stmt::Assign { name, op, value } => {
            out.push_str(name);
            out.push(' ');
            out.push_str(op.as_str());
            out.push(' ');
            write_expr(value, indent_level, out);
            out.push(';');
        }
        Stmt::If { test, consequent, alternate } => {
            out.push_str("if (");
            write_expr(test, indent_level, out);
            out.push_str(") ");
            write_block(consequent, indent_level, out);
            if let Some(alternate) = alternate {
                out.push_str(" else ");
                write_block(alternate, indent_level, out);
            }
        }
        Stmt::While { test, body } => {
            out.push_str("while (");
            write_expr(test, indent_level, out);
            out.push_str(") ");
            write_block(body, indent_level, out);
        }
        Stmt::For { counter, init, test, body } => {
            out.push_str("for (let ");
            out.push_str(counter);
            out.push_str(" = ");
            write_expr(init, indent_level, out);
            out.push_str("; ");
            write_expr(test, indent_level, out);
            out.push_str("; ");
            out.push_str(counter);
            out.push_str("++) ");
            write_block(body, indent_level, out);
        }
        Stmt::ForOf { binding, iterable, body } => {
            out.push_str("for (const ");
            out.push_str(binding);
            out.push_str(" of ");
            write_expr(iterable, indent_level, out);
            out.push_str(") ");
            write_block(body, indent_level, out);
        }
        Stmt::Return(expr) => {
            out.push_str("return ");
            write_expr(expr, indent_level, out);
            out.push(';');
        }
        Stmt::Break => out.push_str("break;"),
        Stmt::Continue => out.push_str("continue;"),
    }
}

fn write_string(s: &str, out: &mut String) {
    // JSON string literals are valid ECMAScript string literals.
    match serde_json::to_string(s) {
        Ok(quoted) => out.push_str(&quoted),
        Err(_) => {
            out.push('"');
            out.push_str(&s.replace('\\', "\\\\").replace('"', "\\\""));
            out.push('"');
        }
    }
}

fn write_operand(expr: &Expr, indent_level: usize, out: &mut String) {
    if matches!(expr, Expr::Binary { .. } | Expr::Function(_)) {
        out.push('(');
        write_expr(expr, indent_level, out);
        out.push(')');
    } else {
        write_expr(expr, indent_level, out);
    }
}

fn write_list(items: &[Expr], indent_level: usize, out: &mut String) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_expr(item, indent_level, out);
    }
}

fn write_function(function: &Function, indent_level: usize, out: &mut String) {
    if function.is_async {
        out.push_str("async ");
    }
    out.push('(');
    for (i, param) in function.params.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(param);
        if let Some(Some(default)) = function.defaults.get(i) {
            out.push_str(" = ");
            write_expr(&Expr::from(default.clone()), indent_level, out);
        }
    }
    out.push_str(") => ");
    write_block(&function.body.statements(), indent_level, out);
}

fn write_expr(expr: &Expr, indent_level: usize, out: &mut String) {
    match expr {
        Expr::Null => out.push_str("null"),
        Expr::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Expr::Num(n) => {
            if *n < 0.0 {
                out.push('(');
                out.push_str(&format_number(*n));
                out.push(')');
            } else {
                out.push_str(&format_number(*n));
            }
        }
        Expr::Str(s) => write_string(s, out),
        Expr::Ident(name) => out.push_str(name),
        Expr::Array(items) => {
            out.push('[');
            write_list(items, indent_level, out);
            out.push(']');
        }
        Expr::Map(entries) => {
            out.push_str("new Map([");
            for (i, (key, value)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push('[');
                write_string(key, out);
                out.push_str(", ");
                write_expr(value, indent_level, out);
                out.push(']');
            }
            out.push_str("])");
        }
        Expr::Unary { op, arg } => {
            out.push_str(op.as_str());
            write_operand(arg, indent_level, out);
        }
        Expr::Binary { op, left, right } => {
            write_operand(left, indent_level, out);
            out.push(' ');
            out.push_str(op.as_str());
            out.push(' ');
            write_operand(right, indent_level, out);
        }
        Expr::Call { callee, args } => {
            write_operand(callee, indent_level, out);
            out.push('(');
            write_list(args, indent_level, out);
            out.push(')');
        }
        Expr::Await(arg) => {
            out.push_str("await ");
            write_operand(arg, indent_level, out);
        }
        Expr::Function(function) => write_function(function, indent_level, out),
    }
}
