use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;
use thiserror::Error;

/// Custom error types for the grammar solver
#[derive(Error, Debug)]
pub enum GrammarError {
    /// A precondition on the caller's input was violated
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl GrammarError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        GrammarError::InvalidArgument(message.into())
    }

    /// Whether this error is a rejected argument rather than an I/O failure
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, GrammarError::InvalidArgument(_))
    }
}

/// Result type for grammar operations
pub type Result<T> = std::result::Result<T, GrammarError>;

/// Reject empty symbols before they reach the symbol table
pub(crate) fn require_symbol(symbol: &str) -> Result<()> {
    if symbol.is_empty() {
        return Err(GrammarError::invalid("symbol must not be empty"));
    }
    Ok(())
}

/// Collect rule declarations from text, one per line.
///
/// Blank lines and lines starting with `#` are skipped.
pub fn parse_rules(source: &str) -> Vec<String> {
    source
        .lines()
        .filter(|line| is_declaration(line))
        .map(str::to_string)
        .collect()
}

/// Read rule declarations from a grammar file, one per line.
///
/// Uses the same line filtering as [`parse_rules`].
pub fn read_rules<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let file = File::open(path)?;
    let reader = io::BufReader::new(file);

    let mut rules = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if is_declaration(&line) {
            rules.push(line);
        }
    }
    Ok(rules)
}

fn is_declaration(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && !trimmed.starts_with('#')
}
