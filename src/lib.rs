#![allow(clippy::needless_return)]

//! Rocks is a programming language written in Rust. It is a dynamically typed language with
//! lexical scoping and first-class functions. Rocks is a tree-walk interpreter with a hand-written
//! recursive descent parser. Rocks is a hobby project and is not intended for production use.
//!
//! Rocks is a dynamically typed language. This means that the type of a variable is determined at
//! runtime. This is in contrast to statically typed languages, where the type of a variable is
//! determined at compile time. Dynamically typed languages are often easier to use, but are
//! generally slower than statically typed languages.
//!
//! Rocks is a tree-walk interpreter. This means that the interpreter walks the abstract syntax tree
//! (AST) and evaluates each node. This is in contrast to a compiler, which would convert the AST
//! into bytecode or machine code. Tree-walk interpreters are generally easier to implement than
//! compilers, but are generally slower than compilers.
//!
//! Rocks is a hobby project and is not intended for production use. The goal of this project is to
//! learn more about programming languages and interpreters. This project is inspired by the
//! [Crafting Interpreters](https://craftinginterpreters.com/) book by Bob Nystrom.
//!
//! ## Scanning
//! The first step in the interpreter is scanning. Scanning is the process of converting a string of
//! characters into a list of tokens. A token is a single unit of a programming language. For
//! example, the string `1 + 2` would be converted into the following tokens:
//! ```text
//! [Number(1), Plus, Number(2)]
//! ```
//! The scanner is implemented in the [`scanner`](scanner) module as an iterator over the characters
//! in the source code. It is a simple state machine that returns the next token in the source code
//! when called.
//!
//! The scanner reports syntax errors in the source code as a [`ScanError`](error::ScanError).
//! These errors are trivial problems like an unterminated string literal or an unexpected character.
//! Scan errors are reported as soon as they are encountered. This means that the scanner will
//! continue scanning the source code even if it has already encountered a syntax error. This is
//! useful because it allows the user to fix multiple syntax errors at once.
//!
//! ## Parsing
//! The second step in the interpreter is parsing. Parsing is the process of converting a list of
//! tokens into an abstract syntax tree (AST). The parser is implemented in the [`parser`](parser)
//! module as a recursive descent parser. The parser transforms the list of tokens into expressions
//! and statements. [`Expressions`](expr::Expr) are pieces of code that produce a value, specifically an
//! [`Object`](object::Object). Objects are an umbrella term for all types of values in Rocks
//! including literals, functions, classes and instances. [`Statements`](stmt::Stmt) are pieces of code
//! that do not produce a value but instead perform some action. These actions modify the state of the
//! program and thus, are called side-effects. For example, a variable decleration or an if clause
//! would be classified as statements.
//!
//! The parser reports syntax errors in the source code as a [`ParseError`](error::ParseError).
//! Unlike the scanner, the parser catches errors that span multiple tokens. However, much like the
//! scanner, the parser will continue parsing the source code even if it has already encountered a
//! syntax error using a technique called synchronization. This is useful because it allows the user
//! to fix multiple syntax errors at once.
//!
//! ## Resolving
//! The third step in the interpreter is resolving. Resolving is the process of statically analyzing
//! the AST to determine the scope of each variable. While this requires a pre-pass of the AST, it
//! is necessary to construct robust lexical scoping. The resolver is implemented in the
//! [`resolver`](resolver) module as a tree-walk visitor over the AST that never evaluates anything.
//! The resolver is run after the parser because it requires the AST to be fully constructed. The
//! resolver reports errors as a [`ResolveError`](error::ResolveError). These errors are syntactically
//! valid but semantically invalid, and therefore, cannot be caught by the scanner or the parser. For
//! example, the following is valid Rocks syntax but is semantically invalid because the variable `a`
//! is defined twice in the same scope:
//! ```text
//! {
//!    var a = 1;
//!    var a = 2;
//! }
//! ```
//!
//! ## Interpreting
//! The final step in the interpreter is _interpreting_. Interpreting is the process of evaluating the
//! AST. The interpreter is implemented in the [`interpreter`](interpreter) module as a tree-walk
//! interpreter. Thanks to all the previous steps, the interpreter is able to evaluate the AST and produce
//! a result. The interpreter reports errors as a [`RuntimeError`](error::RuntimeError). While the
//! scanner, the parser and the resolver try to catch as many errors as possible before running the
//! code, most errors can only be caught at runtime. For example, the following expression is valid
//! Rocks syntax but it is semantically invalid because it tries to add a string and a number:
//! ```text
//! var a = "123";
//! var b = a + 123;
//! ```
//! The interpreter is also responsible for managing the environment. The environment is a mapping of
//! variable names to their values. The environment is implemented in the [`environment`](environment)
//! module as a stack of hash maps. Each hash map represents a scope in the program.
//!
//! ## Driving the pipeline
//! All four stages are wired together by [`Lox`], which owns one [`Interpreter`](interpreter::Interpreter)
//! and one [`Diagnostics`](error::Diagnostics) collector for the lifetime of a script run or a REPL
//! session, and fails a run fast at the first stage that reports an error.

use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::rc::Rc;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

pub mod ast;
pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod literal;
pub mod object;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;

use error::{Diagnostics, FileError, Sink};
use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;

const PROMPT: &str = "$>> ";
const HISTORY_FILE: &str = ".rocks_history";

/// The driver that owns a single interpreter and diagnostics stream across a run.
///
/// `diagnostics` is reset between REPL submissions but never between statements in a single
/// script, so `run_file` sees the combined errors of one whole file.
pub struct Lox {
    interpreter: Interpreter,
    diagnostics: Diagnostics<Sink>,
}

impl Lox {
    /// Builds a driver whose `print` output and diagnostics are written to the given sinks.
    /// Passing the same sink for both interleaves program output and diagnostics in the order
    /// they occur, matching how a real terminal session reads.
    pub fn new(out: Rc<RefCell<dyn Write>>, err: Rc<RefCell<dyn Write>>) -> Self {
        Lox {
            interpreter: Interpreter::new(Sink::new(out)),
            diagnostics: Diagnostics::new(Sink::new(err)),
        }
    }

    /// Builds a driver wired to the process's real stdout and stderr.
    pub fn new_stdio() -> Self {
        Lox::new(Rc::new(RefCell::new(io::stdout())), Rc::new(RefCell::new(io::stderr())))
    }

    /// Runs a script file to completion and returns the process exit code: 0 on success, 66 if
    /// the file cannot be read, 65 on a scan/parse/resolve error, 70 on a runtime error.
    pub fn run_file(&mut self, path: &str) -> i32 {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                self.diagnostics.report_file_error(&FileError {
                    path: path.to_string(),
                    message: e.to_string(),
                });
                return 66;
            }
        };

        self.run_source(&contents);

        if self.diagnostics.had_runtime_error() {
            70
        } else if self.diagnostics.had_error() {
            65
        } else {
            0
        }
    }

    /// Runs an interactive read-eval-print loop with line editing and a persistent history file.
    /// Ctrl-C reports a keyboard interrupt and reprompts; Ctrl-D ends the session. Returns 0
    /// unless the session ends with an outstanding runtime error.
    pub fn run_prompt(&mut self) -> i32 {
        let mut editor = DefaultEditor::new().expect("line editor to initialize");
        let history_path = Self::history_path();
        if let Some(path) = &history_path {
            let _ = editor.load_history(path);
        }

        loop {
            match editor.readline(PROMPT) {
                Ok(line) => {
                    let _ = editor.add_history_entry(line.as_str());
                    self.diagnostics.reset();
                    self.run_source(&line);
                    self.diagnostics.line_increment += 1;
                }
                Err(ReadlineError::Interrupted) => {
                    self.diagnostics.report_keyboard_interrupt(None);
                    continue;
                }
                Err(ReadlineError::Eof) => break,
                Err(_) => break,
            }
        }

        if let Some(path) = &history_path {
            let _ = editor.save_history(path);
        }

        if self.diagnostics.had_runtime_error() { 70 } else { 0 }
    }

    fn history_path() -> Option<PathBuf> {
        home::home_dir().map(|mut path| {
            path.push(HISTORY_FILE);
            path
        })
    }

    /// Runs the four-stage pipeline over one chunk of source, stopping at the first stage that
    /// reports an error. Each stage's errors are reported before the early return so the user
    /// always sees every error from that stage, not just the first one.
    ///
    /// Public so tests can drive the interpreter with an embedded source string and a capturable
    /// sink instead of a script file on disk.
    pub fn run_source(&mut self, source: &str) {
        let (tokens, scan_errors) = Scanner::new(source).scan_tokens();
        for error in &scan_errors {
            self.diagnostics.report(error);
        }
        if self.diagnostics.had_error() {
            return;
        }

        let (statements, parse_errors) = Parser::new(tokens).parse();
        for error in &parse_errors {
            self.diagnostics.report(error);
        }
        if self.diagnostics.had_error() {
            return;
        }

        let resolve_errors = Resolver::new(&mut self.interpreter).resolve(&statements);
        for error in &resolve_errors {
            self.diagnostics.report(error);
        }
        if self.diagnostics.had_error() {
            return;
        }

        if let Err(error) = self.interpreter.interpret(&statements) {
            self.diagnostics.report(&error);
        }
    }
}
