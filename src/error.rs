//! Diagnostic taxonomy and the reporting context that collects them.
//!
//! Every failure that can be detected before or during evaluation is one of the small set of
//! error kinds below. Each kind implements [`Diagnostic`], which renders it to the exact
//! `[line: L] KIND: MESSAGE` wire format. Diagnostics are collected by a [`Diagnostics`] value
//! that the driver threads through the scanner, parser, resolver, and interpreter explicitly,
//! rather than through process-global flags, so that more than one interpreter can run in the
//! same process (for example, one per test).

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use crate::object::Object;
use crate::token::{Token, Type};

/// A cheaply cloneable [`Write`] handle onto a shared sink, so the same buffer can back both
/// the interpreter's `print` output and the diagnostics stream, and a test can hold its own
/// handle to read back what was written after the driver is done with it.
#[derive(Clone)]
pub struct Sink(pub Rc<RefCell<dyn Write>>);

impl Sink {
    pub fn new(inner: Rc<RefCell<dyn Write>>) -> Self {
        Sink(inner)
    }

    pub fn stdio(inner: impl Write + 'static) -> Self {
        Sink(Rc::new(RefCell::new(inner)))
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.borrow_mut().flush()
    }
}

/// The `KIND` component of a rendered diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Error,
    SyntaxError,
    FileError,
    RuntimeError,
}

impl Kind {
    fn label(self) -> &'static str {
        match self {
            Kind::Error => "Error",
            Kind::SyntaxError => "Syntax Error",
            Kind::FileError => "File Error",
            Kind::RuntimeError => "Runtime Error",
        }
    }
}

/// Anything that can be rendered as a `[line: L] KIND: MESSAGE` diagnostic.
pub trait Diagnostic {
    fn line(&self) -> usize;
    fn kind(&self) -> Kind;
    fn text(&self) -> String;
}

/// An error detected while scanning source text into tokens.
#[derive(Debug)]
pub struct ScanError {
    pub line: usize,
    pub message: String,
}

impl Diagnostic for ScanError {
    fn line(&self) -> usize { self.line }
    fn kind(&self) -> Kind { Kind::SyntaxError }
    fn text(&self) -> String { self.message.clone() }
}

/// An error detected while building the AST from a token stream.
#[derive(Debug)]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

impl Diagnostic for ParseError {
    fn line(&self) -> usize { self.token.line }
    fn kind(&self) -> Kind { Kind::SyntaxError }

    fn text(&self) -> String {
        if self.token.r#type == Type::EOF {
            format!("Error at end: {}", self.message)
        } else {
            format!("Error at '{}': {}", self.token.lexeme, self.message)
        }
    }
}

/// An error detected during the static resolution pass: syntactically valid, semantically not.
#[derive(Debug)]
pub struct ResolveError {
    pub token: Token,
    pub message: String,
}

impl Diagnostic for ResolveError {
    fn line(&self) -> usize { self.token.line }
    fn kind(&self) -> Kind { Kind::SyntaxError }

    fn text(&self) -> String {
        format!("Error at '{}': {}", self.token.lexeme, self.message)
    }
}

/// An error raised while evaluating the resolved AST.
#[derive(Debug, Clone)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl Diagnostic for RuntimeError {
    fn line(&self) -> usize { self.token.line }
    fn kind(&self) -> Kind { Kind::RuntimeError }
    fn text(&self) -> String { self.message.clone() }
}

/// An error locating or reading the script given on the command line.
#[derive(Debug)]
pub struct FileError {
    pub path: String,
    pub message: String,
}

impl Diagnostic for FileError {
    fn line(&self) -> usize { 0 }
    fn kind(&self) -> Kind { Kind::FileError }
    fn text(&self) -> String { format!("{}: {}", self.path, self.message) }
}

/// Non-local control transfer for `return`/`break`, modeled as runtime errors in transit.
///
/// Both are only ever caught at their syntactic boundary (a function call for `Return`, a
/// `while` loop for `Break`); one that escapes is reclassified into a [`RuntimeError`] by the
/// evaluator, matching the resolver's static enforcement of the same rule.
#[derive(Debug, Clone)]
pub enum Signal {
    Return(Object),
    Break,
    Error(RuntimeError),
}

impl From<RuntimeError> for Signal {
    fn from(value: RuntimeError) -> Self {
        Signal::Error(value)
    }
}

/// Collects diagnostics emitted while running one chunk of source through the pipeline.
///
/// Owned by the driver (`Lox`/REPL) rather than stored in a process-global, so that resetting
/// between REPL submissions or running more than one interpreter never crosses wires.
pub struct Diagnostics<W: Write> {
    out: W,
    had_error: bool,
    had_runtime_error: bool,
    /// Cumulative line offset applied to REPL submissions so diagnostics read as if the whole
    /// session were one growing file.
    pub line_increment: usize,
}

impl<W: Write> Diagnostics<W> {
    pub fn new(out: W) -> Self {
        Diagnostics { out, had_error: false, had_runtime_error: false, line_increment: 0 }
    }

    /// Resets the per-run error flags. Called between REPL submissions; `line_increment`
    /// persists across calls so line numbers stay cumulative.
    pub fn reset(&mut self) {
        self.had_error = false;
        self.had_runtime_error = false;
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    /// Records and writes a diagnostic whose line is a literal source line.
    pub fn report(&mut self, diagnostic: &dyn Diagnostic) {
        match diagnostic.kind() {
            Kind::RuntimeError => self.had_runtime_error = true,
            _ => self.had_error = true,
        }

        let line = diagnostic.line() + self.line_increment;
        let _ = writeln!(self.out, "[line: {line}] {}: {}", diagnostic.kind().label(), diagnostic.text());
    }

    /// Records a `File Error`, which has no meaningful source line.
    pub fn report_file_error(&mut self, error: &FileError) {
        self.had_error = true;
        let _ = writeln!(self.out, "[line: 0] {}: {}", error.kind().label(), error.text());
    }

    /// Records a keyboard interrupt at an estimated or unknown REPL location. Per the `(after
    /// line N)` suffix rule, this is only ever used for non-literal locations.
    pub fn report_keyboard_interrupt(&mut self, estimate: Option<usize>) {
        self.had_runtime_error = true;
        match estimate {
            Some(line) => {
                let _ = writeln!(
                    self.out,
                    "[line: estimate {line} (after line {})] {}: Keyboard Interrupt",
                    self.line_increment,
                    Kind::RuntimeError.label(),
                );
            }
            None => {
                let _ = writeln!(
                    self.out,
                    "[line: unknown (after line {})] {}: Keyboard Interrupt",
                    self.line_increment,
                    Kind::RuntimeError.label(),
                );
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_error_at_identifier() {
        let err = ParseError {
            token: Token::new(Type::Identifier, "foo".to_string(), None, 3),
            message: "Expect ';' after value".to_string(),
        };
        assert_eq!(err.text(), "Error at 'foo': Expect ';' after value");
        assert_eq!(err.kind(), Kind::SyntaxError);
    }

    #[test]
    fn parse_error_at_eof() {
        let err = ParseError {
            token: Token::new(Type::EOF, String::new(), None, 5),
            message: "Expect expression".to_string(),
        };
        assert_eq!(err.text(), "Error at end: Expect expression");
    }

    #[test]
    fn diagnostic_format() {
        let mut out = Vec::new();
        let mut diagnostics = Diagnostics::new(&mut out);
        diagnostics.report(&RuntimeError {
            token: Token::new(Type::Plus, "+".to_string(), None, 7),
            message: "Operands must be numbers".to_string(),
        });
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[line: 7] Runtime Error: Operands must be numbers\n"
        );
        assert!(diagnostics.had_runtime_error());
    }
}
