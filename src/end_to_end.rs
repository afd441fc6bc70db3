//! Code to configure and run the interpreter on a single term, given on the
//! command line or in a source file.

use std::collections::HashSet;
use std::fs;

use clap::{Parser, ValueEnum};
use thiserror::Error;
use tracing::{info, warn};

use crate::box_tree_impl::box_tree_ast::{CapacityError, FreshNamePolicy};
use crate::box_tree_impl::box_tree_execution::{
    alpha_conversion_with_policy, normalize, AlphaConversionError, BetaReducer,
};
use crate::box_tree_impl::box_tree_recursive_descent_parsing::{self, ParseError};
use crate::lexical_analysis::run_lexical_analysis;

/// What to do with the parsed term.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Print the canonical form of the term.
    Print,
    /// Print the free variables of the term.
    FreeVariables,
    /// Print every variable of the term, bound or free.
    Variables,
    /// Rename the bound variable of an abstraction.
    Alpha,
    /// Beta-reduce once with the step budget.
    Reduce,
    /// Beta-reduce round after round until the term stops changing.
    Normalize,
}

/// Config for the interpreter. Instantiate via `InterpreterConfig::parse()`.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct InterpreterConfig {
    /// The term to run on, e.g. `((\x.x) y)`.
    #[arg(
        short,
        long,
        required_unless_present = "src_filepath",
        conflicts_with = "src_filepath"
    )]
    pub term: Option<String>,

    /// A file holding the term to run on.
    #[arg(short, long)]
    pub src_filepath: Option<String>,

    #[arg(short, long, value_enum, default_value_t = Operation::Reduce)]
    pub operation: Operation,

    /// New bound name for `alpha`. A fresh one is picked when omitted.
    #[arg(short, long)]
    pub new_name: Option<String>,

    /// Fuel for one beta-reduction call. Every visited subterm costs one unit.
    #[arg(long, default_value_t = 100)]
    pub steps: usize,

    /// Maximum number of reduction rounds for `normalize`.
    #[arg(long, default_value_t = 16)]
    pub rounds: usize,

    /// Where fresh names come from when a binder must be renamed.
    #[arg(long, value_enum, default_value_t = FreshNamePolicy::VariablePool)]
    pub fresh_names: FreshNamePolicy,

    /// Log every beta-step and renaming to standard error.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Errors that may be thrown when running the interpreter.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Interpreter configuration error: {0}")]
    ConfigError(String),

    #[error("Input file error: {0}")]
    InputFileError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    #[error("Alpha-conversion error: {0}")]
    AlphaConversionError(#[from] AlphaConversionError),

    #[error("Reduction error: {0}")]
    ReductionError(#[from] CapacityError),
}

// Reads the term text from the command line or from the source file.
fn read_term_string(config: &InterpreterConfig) -> Result<String, RunError> {
    match (&config.term, &config.src_filepath) {
        (Some(term_string), None) => {
            return Ok(term_string.clone());
        }
        (None, Some(src_filepath)) => {
            return Ok(fs::read_to_string(src_filepath)?);
        }
        _ => {
            return Err(RunError::ConfigError(String::from(
                "exactly one of --term and --src-filepath must be given",
            )));
        }
    }
}

// Renders a set of variables as `{x, y}`, sorted.
fn variable_set_to_string(vars: HashSet<&str>) -> String {
    let mut vars: Vec<&str> = vars.into_iter().collect();
    vars.sort();

    return format!("{{{}}}", vars.join(", "));
}

/// Run the interpreter (i.e. the lexer, parser, and the requested operation)
/// given an interpreter config. Returns the text to print.
pub fn run_interpreter(config: &InterpreterConfig) -> Result<String, RunError> {
    if config.new_name.is_some() && config.operation != Operation::Alpha {
        return Err(RunError::ConfigError(String::from(
            "--new-name only applies to the alpha operation",
        )));
    }

    // Read the input into a string.
    let term_string = read_term_string(config)?;

    // Run lexer.
    let tokens = run_lexical_analysis(term_string.as_str(), true);

    // Run parser.
    let mut term = box_tree_recursive_descent_parsing::parse_recursive_descent(&tokens)?;
    info!("Parsed {} ({} nodes)", term, term.size());

    // Run the requested operation.
    match config.operation {
        Operation::Print => {
            return Ok(term.to_string());
        }

        Operation::FreeVariables => {
            return Ok(variable_set_to_string(term.free_variables()));
        }

        Operation::Variables => {
            return Ok(variable_set_to_string(term.all_variables()));
        }

        Operation::Alpha => {
            alpha_conversion_with_policy(
                &mut term,
                config.new_name.as_deref(),
                config.fresh_names,
            )?;
            return Ok(term.to_string());
        }

        Operation::Reduce => {
            let mut reducer = BetaReducer::new(config.steps, config.fresh_names);
            let reduced = reducer.reduce(term)?;

            info!(
                "{} beta-steps, {} fuel left",
                reducer.beta_steps(),
                reducer.remaining_fuel()
            );
            if reducer.budget_exhausted() {
                warn!(
                    "Step budget of {} exhausted, the result may not be fully reduced",
                    config.steps
                );
            }

            return Ok(reduced.to_string());
        }

        Operation::Normalize => {
            let result = normalize(term, config.steps, config.rounds, config.fresh_names)?;

            if !result.normal_form {
                warn!(
                    "No normal form reached after {} rounds of {} steps",
                    result.rounds, config.steps
                );
            }

            return Ok(result.term.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Builds a config the way main does, from command line arguments.
    fn config_from_args(args: &[&str]) -> InterpreterConfig {
        let argv = std::iter::once("rust-lambda-reducer").chain(args.iter().copied());
        return InterpreterConfig::try_parse_from(argv).expect("arguments should be accepted");
    }

    // Test the default operation, beta-reduction.
    #[test]
    fn test_reduce_from_command_line() {
        let config = config_from_args(&["--term", r"((\x.x) y)"]);

        assert_eq!(config.operation, Operation::Reduce);
        assert_eq!(config.steps, 100);
        assert_eq!(config.fresh_names, FreshNamePolicy::VariablePool);
        assert_eq!(run_interpreter(&config).expect("run should succeed"), "(y)");
    }

    // Test the print, free-variables and variables operations.
    #[test]
    fn test_print_and_variable_sets() {
        let config = config_from_args(&["-t", r"((z)(\x.(x y)))", "-o", "print"]);
        assert_eq!(
            run_interpreter(&config).expect("run should succeed"),
            r"((z)(\x.((x)(y))))"
        );

        let config = config_from_args(&["-t", r"((z)(\x.(x y)))", "-o", "free-variables"]);
        assert_eq!(run_interpreter(&config).expect("run should succeed"), "{y, z}");

        let config = config_from_args(&["-t", r"((z)(\x.(x y)))", "-o", "variables"]);
        assert_eq!(
            run_interpreter(&config).expect("run should succeed"),
            "{x, y, z}"
        );
    }

    // Test alpha-conversion with and without a new name.
    #[test]
    fn test_alpha_from_command_line() {
        let config = config_from_args(&["-t", r"(\x.(x y))", "-o", "alpha", "-n", "w"]);
        assert_eq!(
            run_interpreter(&config).expect("run should succeed"),
            r"(\w.((w)(y)))"
        );

        let config = config_from_args(&["-t", r"(\x.(x y))", "-o", "alpha"]);
        assert_eq!(
            run_interpreter(&config).expect("run should succeed"),
            r"(\z.((z)(y)))"
        );

        let config = config_from_args(&["-t", r"(\x.(x y))", "-o", "alpha", "-n", "y"]);
        assert!(matches!(
            run_interpreter(&config),
            Err(RunError::AlphaConversionError(AlphaConversionError::Capture { .. }))
        ));
    }

    // Test the step budget and the normalize operation.
    #[test]
    fn test_steps_and_normalize() {
        let term = r"(y ((\x.x) z))";

        let config = config_from_args(&["-t", term, "--steps", "2"]);
        assert_eq!(
            run_interpreter(&config).expect("run should succeed"),
            r"((y)((\x.(x))(z)))"
        );

        let config = config_from_args(&["-t", term, "--steps", "3", "-o", "normalize"]);
        assert_eq!(run_interpreter(&config).expect("run should succeed"), "((y)(z))");
    }

    // Test the unbounded fresh name policy when the pool runs out.
    #[test]
    fn test_fresh_name_policies() {
        let term = r"((\y.(\x.(y ((z r) ((s t) (u (v w))))))) x)";

        let config = config_from_args(&["-t", term]);
        assert!(matches!(
            run_interpreter(&config),
            Err(RunError::ReductionError(_))
        ));

        let config = config_from_args(&["-t", term, "--fresh-names", "unbounded"]);
        assert_eq!(
            run_interpreter(&config).expect("run should succeed"),
            r"(\x'.((x)(((z)(r))(((s)(t))((u)((v)(w)))))))"
        );
    }

    // Test reading the term from a source file.
    #[test]
    fn test_src_filepath() {
        let src_filepath = std::env::temp_dir().join("rust_lambda_reducer_src_filepath_test.lc");
        fs::write(&src_filepath, "(\n  (\\x.x)\n  y\n)\n").expect("temp file should be writable");
        let src_filepath = src_filepath.to_string_lossy().into_owned();

        let config = config_from_args(&["-s", src_filepath.as_str()]);
        assert_eq!(run_interpreter(&config).expect("run should succeed"), "(y)");

        let missing = config_from_args(&["-s", "/nonexistent/term.lc"]);
        assert!(matches!(
            run_interpreter(&missing),
            Err(RunError::InputFileError(_))
        ));
    }

    // Test configuration errors.
    #[test]
    fn test_config_errors() {
        let argv = ["rust-lambda-reducer"];
        assert!(InterpreterConfig::try_parse_from(argv).is_err());

        let argv = ["rust-lambda-reducer", "-t", "x", "-s", "term.lc"];
        assert!(InterpreterConfig::try_parse_from(argv).is_err());

        let config = config_from_args(&["-t", "x", "-n", "y"]);
        assert!(matches!(
            run_interpreter(&config),
            Err(RunError::ConfigError(_))
        ));

        let config = config_from_args(&["-t", "(x"]);
        assert!(matches!(
            run_interpreter(&config),
            Err(RunError::ParseError(ParseError::UnclosedParen { line_num: 1 }))
        ));
    }
}
