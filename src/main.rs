use std::{env, process};

use rocks_lang::Lox;

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut lox = Lox::new_stdio();

    let exit_code = match args.len() {
        1 => lox.run_prompt(),
        2 => lox.run_file(&args[1]),
        _ => {
            eprintln!("[line: 0] Error: Usage: rocks [script]");
            64
        }
    };

    process::exit(exit_code);
}
