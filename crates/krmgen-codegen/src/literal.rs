//! Rust expression building blocks shared by both encoders

use std::collections::BTreeSet;
use std::fmt::Write as _;

use crate::error::EncodeWarning;

/// Marker placed next to values that could not be reproduced exactly
pub const PRECISION_MARKER: &str = "/* krmgen: precision degraded */";

const INDENT: &str = "    ";

/// Magnitude from which floats are written with an exponent
const EXPONENT_FORM_FROM: f64 = 1e16;

/// Layout tree of an emitted expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Text placed as is
    Atom(String),
    /// `open`, one item per line followed by a comma, optional `rest`, `close`
    Block {
        open: String,
        items: Vec<Expr>,
        rest: Option<String>,
        close: String,
    },
    /// An expression with text glued on either side
    Wrap {
        before: String,
        inner: Box<Expr>,
        after: String,
    },
}

impl Expr {
    pub fn atom(text: impl Into<String>) -> Self {
        Expr::Atom(text.into())
    }

    pub fn block(open: impl Into<String>, items: Vec<Expr>, close: impl Into<String>) -> Self {
        Expr::Block {
            open: open.into(),
            items,
            rest: None,
            close: close.into(),
        }
    }

    pub fn wrap(before: impl Into<String>, inner: Expr, after: impl Into<String>) -> Self {
        Expr::Wrap {
            before: before.into(),
            inner: Box::new(inner),
            after: after.into(),
        }
    }

    /// Render with nested blocks indented by four spaces per level
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write(&mut out, 0);
        out
    }

    fn write(&self, out: &mut String, depth: usize) {
        match self {
            Expr::Atom(text) => out.push_str(text),
            Expr::Wrap {
                before,
                inner,
                after,
            } => {
                out.push_str(before);
                inner.write(out, depth);
                out.push_str(after);
            }
            Expr::Block {
                open,
                items,
                rest,
                close,
            } => {
                out.push_str(open);
                if items.is_empty() && rest.is_none() {
                    out.push_str(close);
                    return;
                }
                out.push('\n');
                for item in items {
                    push_indent(out, depth + 1);
                    item.write(out, depth + 1);
                    out.push_str(",\n");
                }
                if let Some(rest) = rest {
                    push_indent(out, depth + 1);
                    out.push_str(rest);
                    out.push('\n');
                }
                push_indent(out, depth);
                out.push_str(close);
            }
        }
    }
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

/// Indent every line after the first, for splicing a rendered expression
/// into surrounding code
pub fn indent_continuation(text: &str, depth: usize) -> String {
    let pad = INDENT.repeat(depth);
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
            if !line.is_empty() {
                out.push_str(&pad);
            }
        }
        out.push_str(line);
    }
    out
}

/// Emitted expression with the imports it relies on
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub expression: String,
    /// Fully qualified paths for `use` lines
    pub imports: BTreeSet<String>,
    pub warnings: Vec<EncodeWarning>,
}

/// Mutable state threaded through one encoding
#[derive(Debug, Default)]
pub struct EmitState {
    pub imports: BTreeSet<String>,
    pub warnings: Vec<EncodeWarning>,
    path: Vec<String>,
}

impl EmitState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn import(&mut self, module: &str, name: &str) {
        self.imports.insert(format!("{module}::{name}"));
    }

    pub fn push(&mut self, segment: impl Into<String>) {
        self.path.push(segment.into());
    }

    pub fn pop(&mut self) {
        self.path.pop();
    }

    /// Dotted location of the value being emitted
    pub fn path(&self) -> String {
        if self.path.is_empty() {
            "<root>".to_string()
        } else {
            self.path.join(".")
        }
    }

    pub fn warn(&mut self, warning: EncodeWarning) {
        tracing::warn!(%warning, "Degraded emission");
        self.warnings.push(warning);
    }

    pub fn finish(self, expr: &Expr) -> Literal {
        Literal {
            expression: expr.render(),
            imports: self.imports,
            warnings: self.warnings,
        }
    }
}

/// Quoted Rust string literal
pub fn quote_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{{{:x}}}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Owned `String` expression
pub fn owned_str(s: &str) -> String {
    format!("{}.to_owned()", quote_str(s))
}

/// Quoted Rust byte string literal
pub fn quote_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() + 3);
    out.push_str("b\"");
    for &b in bytes {
        out.extend(std::ascii::escape_default(b).map(char::from));
    }
    out.push('"');
    out
}

/// `f64` literal, or `None` when the value needs the degraded marker
///
/// Integral values get an explicit suffix so they stay floats. Every finite
/// value is written in a form that parses back to the same `f64`.
pub fn float_literal(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    if value.abs() >= EXPONENT_FORM_FROM {
        return Some(format!("{value:e}_f64"));
    }
    if value.fract() == 0.0 {
        // -0.0 keeps its sign through the Debug form
        if value == 0.0 && value.is_sign_negative() {
            return Some("-0_f64".to_string());
        }
        return Some(format!("{value}_f64"));
    }
    Some(format!("{value:?}_f64"))
}

/// Literal for a non-finite float, carrying the degraded marker
pub fn degraded_float(value: f64) -> String {
    let text = if value.is_nan() {
        "f64::NAN"
    } else if value.is_sign_negative() {
        "f64::NEG_INFINITY"
    } else {
        "f64::INFINITY"
    };
    format!("{text} {PRECISION_MARKER}")
}
