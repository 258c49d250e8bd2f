use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use rocks_lang::Lox;

/// Runs one embedded Lox program through the full driver and returns its captured stdout and
/// stderr as strings.
pub fn run(source: &str) -> (String, String) {
    let out = Rc::new(RefCell::new(Vec::new()));
    let err = Rc::new(RefCell::new(Vec::new()));

    let mut lox = Lox::new(
        Rc::clone(&out) as Rc<RefCell<dyn Write>>,
        Rc::clone(&err) as Rc<RefCell<dyn Write>>,
    );
    lox.run_source(source);

    let stdout = String::from_utf8(out.borrow().clone()).expect("stdout to be utf8");
    let stderr = String::from_utf8(err.borrow().clone()).expect("stderr to be utf8");
    (stdout, stderr)
}

/// Joins expected output lines the way the driver terminates every printed or reported line:
/// one trailing newline per line, none at all if there are no lines.
pub fn join_lines(lines: &[&str]) -> String {
    if lines.is_empty() {
        return String::new();
    }
    let mut joined = lines.join("\n");
    joined.push('\n');
    joined
}

/// Asserts a program's captured stdout equals the given lines exactly.
#[macro_export]
macro_rules! assert_stdout {
    ($source:expr, [$($line:expr),* $(,)?]) => {{
        let (stdout, stderr) = common::run($source);
        let expected = common::join_lines(&[$($line),*]);
        assert_eq!(stdout, expected, "unexpected stderr: {stderr}");
    }};
}

/// Asserts a program's captured stderr (its reported diagnostics) equals the given lines
/// exactly.
#[macro_export]
macro_rules! assert_stderr {
    ($source:expr, [$($line:expr),* $(,)?]) => {{
        let (_stdout, stderr) = common::run($source);
        let expected = common::join_lines(&[$($line),*]);
        assert_eq!(stderr, expected);
    }};
}

/// Asserts both stdout and stderr at once, for programs that print before failing.
#[macro_export]
macro_rules! assert_output {
    ($source:expr, stdout: [$($out:expr),* $(,)?], stderr: [$($err:expr),* $(,)?]) => {{
        let (stdout, stderr) = common::run($source);
        assert_eq!(stdout, common::join_lines(&[$($out),*]));
        assert_eq!(stderr, common::join_lines(&[$($err),*]));
    }};
}
