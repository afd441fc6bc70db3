//! Run an operation on a lambda calculus term and print the result to standard
//! output.
//!
//! Example usage:
//!
//!     cargo run -- --term '((\x.(\y.x)) y)' --steps 10
//!     cargo run -- --src-filepath term.lc --operation normalize --verbose

use std::process::ExitCode;

use clap::Parser;
use rust_lambda_reducer::end_to_end::{run_interpreter, InterpreterConfig};
use tracing::Level;

fn main() -> ExitCode {
    let interpreter_config = InterpreterConfig::parse();

    let max_level = if interpreter_config.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_writer(std::io::stderr)
        .init();

    let interpreter_result = run_interpreter(&interpreter_config);

    match interpreter_result {
        Ok(execution_result) => {
            println!("{}", execution_result);
            ExitCode::SUCCESS
        }

        Err(run_error) => {
            eprintln!("{}", run_error);
            ExitCode::FAILURE
        }
    }
}
