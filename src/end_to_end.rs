//! Code to configure and run the analyzer on an input expression.

use std::fs;

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::box_tree_impl::box_tree_analysis::RenameError;
use crate::box_tree_impl::box_tree_recursive_descent_parsing::{
    is_valid_expression, parse_recursive_descent, ParseError,
};
use crate::lexical_analysis::{run_lexical_analysis, LexError};

/// Config for the analyzer. Instantiate via `AnalyzerConfig::parse()`.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct AnalyzerConfig {
    /// The expression to analyse, e.g. 'λx.λy.x'.
    #[arg(short, long, conflicts_with = "src_filepath", required_unless_present = "src_filepath")]
    pub expr: Option<String>,

    /// A file holding the expression to analyse.
    #[arg(short, long)]
    pub src_filepath: Option<String>,

    /// Log parsing and analysis steps to standard error.
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// What to do with the input expression.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the expression with minimal parentheses.
    Print,
    /// List the tokens of the input.
    Tokens,
    /// Print the kind of the outermost node.
    Kind,
    /// List the free variables, sorted by name.
    Free,
    /// Check whether the expression has no free variables.
    Closed,
    /// Check whether some abstraction in the expression binds NAME.
    Binds { name: String },
    /// Check whether OLD_NAME can be renamed to NEW_NAME without capture.
    CanRename { old_name: String, new_name: String },
    /// Alpha-convert OLD_NAME to NEW_NAME.
    Rename { old_name: String, new_name: String },
    /// Print the alpha-normal form.
    Normalize,
    /// Check whether OTHER is alpha-equivalent to the expression.
    Equiv { other: String },
    /// Check whether the input is a valid expression.
    Valid,
}

/// Errors that may be thrown when running the analyzer.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Analyzer configuration error: {0}")]
    ConfigError(String),

    #[error("Input file error: {0}")]
    InputFileError(#[from] std::io::Error),

    #[error("Lex error: {0}")]
    LexError(#[from] LexError),

    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    #[error("Rename error: {0}")]
    RenameError(#[from] RenameError),
}

/// Reads the input expression from wherever the config points.
fn read_source(config: &AnalyzerConfig) -> Result<String, RunError> {
    match (&config.expr, &config.src_filepath) {
        (Some(expr), None) => Ok(expr.clone()),
        (None, Some(src_filepath)) => Ok(fs::read_to_string(src_filepath)?),
        (Some(_), Some(_)) => Err(RunError::ConfigError(String::from(
            "Only one of --expr and --src-filepath may be given",
        ))),
        (None, None) => Err(RunError::ConfigError(String::from(
            "One of --expr and --src-filepath is required",
        ))),
    }
}

// Lists one token per line as `<position> <class> <text>`.
fn format_tokens(source: &str) -> Result<String, RunError> {
    let lines: Vec<String> = run_lexical_analysis(source)?
        .iter()
        .map(|token| {
            format!(
                "{} {} {:?}",
                token.position, token.token_class, token.token_text
            )
        })
        .collect();

    Ok(lines.join("\n"))
}

/// Run the analyzer (i.e. the lexer, parser, and requested analysis) given an
/// analyzer config. Returns the text to print.
pub fn run_analyzer(config: &AnalyzerConfig) -> Result<String, RunError> {
    let source = read_source(config)?;
    let parse = || parse_recursive_descent(&source);

    tracing::debug!(command = ?config.command, "running analyzer");

    let output = match &config.command {
        Command::Print => parse()?.stringify(),
        Command::Tokens => format_tokens(&source)?,
        Command::Kind => String::from(parse()?.kind_name()),
        Command::Free => {
            let expr_node = parse()?;
            let mut free_vars: Vec<&str> = expr_node.free_variables().into_iter().collect();
            free_vars.sort_unstable();
            free_vars.join(" ")
        }
        Command::Closed => parse()?.is_closed().to_string(),
        Command::Binds { name } => parse()?.binds(name).to_string(),
        Command::CanRename { old_name, new_name } => {
            parse()?.can_rename(old_name, new_name).to_string()
        }
        Command::Rename { old_name, new_name } => {
            parse()?.rename(old_name, new_name)?.stringify()
        }
        Command::Normalize => parse()?.normalize().stringify(),
        Command::Equiv { other } => {
            let other_node = parse_recursive_descent(other)?;
            parse()?.is_equivalent_to(&other_node).to_string()
        }
        Command::Valid => is_valid_expression(&source).to_string(),
    };

    Ok(output)
}
