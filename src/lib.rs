//! Grammar-Solver derives random sentences from context-free grammars.
//!
//! A grammar is built from rule declarations in BNF notation, one
//! non-terminal per declaration with its alternatives separated by `|`.
//! Deriving a symbol picks one of its alternatives at random and derives each
//! of the alternative's tokens in turn; tokens that are not declared as
//! non-terminals are terminals and appear verbatim in the result.
//!
//! # Example
//!
//! ```rust
//! use grammar_solver::Grammar;
//!
//! let grammar = Grammar::new([
//!     "<s> ::= <greeting> <subject>",
//!     "<greeting> ::= Hello | Hi",
//!     "<subject> ::= world",
//! ])?;
//!
//! assert_eq!(grammar.symbols(), vec!["<greeting>", "<s>", "<subject>"]);
//!
//! let text = grammar.generate("<s>")?;
//! assert!(text == "Hello world" || text == "Hi world");
//! # Ok::<(), grammar_solver::GrammarError>(())
//! ```

pub mod grammar;
pub mod utils;

pub use grammar::{Grammar, GrammarConfig, Production};
pub use utils::{GrammarError, Result};
