use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::{LazyLock, Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::utils::{self, GrammarError, Result};

/// Separates a non-terminal from its alternatives
pub const RULE_SEPARATOR: &str = "::=";

/// Separates the alternatives of one non-terminal
pub const ALTERNATIVE_SEPARATOR: char = '|';

static TOKEN_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());

/// One alternative expansion of a non-terminal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Production {
    /// Tokens in derivation order; each is a non-terminal or a terminal
    tokens: Vec<String>,
}

impl Production {
    /// Split the text of one alternative into its tokens.
    ///
    /// The text is trimmed and then split on runs of spaces and tabs. A blank
    /// alternative produces no tokens.
    pub fn parse(alternative: &str) -> Self {
        let trimmed = alternative.trim();
        let tokens = if trimmed.is_empty() {
            Vec::new()
        } else {
            TOKEN_SEPARATOR.split(trimmed).map(str::to_string).collect()
        };
        Production { tokens }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens.join(" "))
    }
}

/// Configuration options for grammar construction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarConfig {
    /// Seed for the grammar's random source; `None` seeds from OS entropy
    pub seed: Option<u64>,
}

impl GrammarConfig {
    /// Configuration producing reproducible derivations
    pub fn seeded(seed: u64) -> Self {
        GrammarConfig { seed: Some(seed) }
    }
}

/// A grammar in BNF notation that derives random sentences.
///
/// The symbol table is fixed once the grammar is built. The random source is
/// owned by the grammar and guarded by a mutex, so a single `Grammar` can be
/// shared between threads; concurrent [`Grammar::generate`] calls take turns on
/// the lock. Use [`Grammar::generate_with`] to derive with a caller-owned
/// random source instead.
#[derive(Debug, Serialize)]
pub struct Grammar {
    /// Non-terminals mapped to their alternatives, sorted by name
    rules: BTreeMap<String, Vec<Production>>,
    #[serde(skip)]
    rng: Mutex<StdRng>,
}

impl Grammar {
    /// Build a grammar from rule declarations of the form
    /// `<name> ::= <alt1> | <alt2> | ...`, seeding its random source from OS
    /// entropy.
    ///
    /// Fails with [`GrammarError::InvalidArgument`] if `rules` is empty, if a
    /// declaration is malformed, or if a non-terminal is declared twice.
    pub fn new<I, S>(rules: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_rng(rules, StdRng::from_entropy())
    }

    /// Build a grammar with custom configuration
    pub fn with_config<I, S>(rules: I, config: GrammarConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(rules, rng)
    }

    /// Build a grammar that draws its choices from `rng`
    pub fn with_rng<I, S>(rules: I, rng: StdRng) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = BTreeMap::new();

        for declaration in rules {
            let (symbol, productions) = Self::parse_declaration(declaration.as_ref())?;
            match table.entry(symbol) {
                Entry::Occupied(entry) => {
                    return Err(GrammarError::invalid(format!(
                        "duplicate non-terminal: {}",
                        entry.key()
                    )));
                }
                Entry::Vacant(entry) => {
                    entry.insert(productions);
                }
            }
        }

        if table.is_empty() {
            return Err(GrammarError::invalid("rule list must not be empty"));
        }

        tracing::debug!(symbols = table.len(), "grammar built");

        Ok(Grammar {
            rules: table,
            rng: Mutex::new(rng),
        })
    }

    /// Parse a grammar file, one declaration per line
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("loading grammar from {}", path.display());
        Self::new(utils::read_rules(path)?)
    }

    /// Split one declaration into its non-terminal and alternatives.
    ///
    /// The name is trimmed; everything after the first `::=` is split on `|`,
    /// which always yields at least one alternative.
    pub fn parse_declaration(declaration: &str) -> Result<(String, Vec<Production>)> {
        let (name, alternatives) = declaration.split_once(RULE_SEPARATOR).ok_or_else(|| {
            GrammarError::invalid(format!(
                "declaration has no `{}`: {:?}",
                RULE_SEPARATOR, declaration
            ))
        })?;

        let name = name.trim();
        if name.is_empty() {
            return Err(GrammarError::invalid(format!(
                "declaration has no non-terminal: {:?}",
                declaration
            )));
        }

        let productions = alternatives
            .split(ALTERNATIVE_SEPARATOR)
            .map(Production::parse)
            .collect();

        Ok((name.to_string(), productions))
    }

    /// Check if `symbol` is one of the grammar's non-terminals.
    ///
    /// Matching is exact and case-sensitive.
    pub fn contains(&self, symbol: &str) -> Result<bool> {
        utils::require_symbol(symbol)?;
        Ok(self.rules.contains_key(symbol))
    }

    /// All non-terminals in lexicographic order
    pub fn symbols(&self) -> Vec<&str> {
        self.rules.keys().map(String::as_str).collect()
    }

    /// The alternatives of a non-terminal, or `None` for a terminal
    pub fn productions(&self, symbol: &str) -> Option<&[Production]> {
        self.rules.get(symbol).map(Vec::as_slice)
    }

    /// Get a reference to the grammar's rules
    pub fn rules(&self) -> &BTreeMap<String, Vec<Production>> {
        &self.rules
    }

    /// Derive a random sentence from `symbol` using the grammar's own random
    /// source.
    ///
    /// A symbol that is not a non-terminal is a terminal and comes back
    /// unchanged. Otherwise one alternative is chosen uniformly, each of its
    /// tokens is derived in turn and the results are joined by single spaces.
    ///
    /// Cycles are not detected: a non-terminal whose every alternative leads
    /// back to itself recurses until the stack is exhausted.
    pub fn generate(&self, symbol: &str) -> Result<String> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        self.generate_with(symbol, &mut *rng)
    }

    /// Same as [`Grammar::generate`], drawing choices from `rng`
    pub fn generate_with<R: Rng + ?Sized>(&self, symbol: &str, rng: &mut R) -> Result<String> {
        utils::require_symbol(symbol)?;
        Ok(self.expand(symbol, rng))
    }

    /// Recursively expand a symbol
    fn expand<R: Rng + ?Sized>(&self, symbol: &str, rng: &mut R) -> String {
        let Some(productions) = self.rules.get(symbol) else {
            return symbol.to_string();
        };

        let Some(production) = productions.choose(rng) else {
            return String::new();
        };
        tracing::trace!(symbol, %production, "expanding");

        let mut sentence = String::new();
        for token in &production.tokens {
            let derived = self.expand(token, rng);
            // blank alternatives derive to nothing and take no separator
            if derived.is_empty() {
                continue;
            }
            if !sentence.is_empty() {
                sentence.push(' ');
            }
            sentence.push_str(&derived);
        }
        sentence
    }
}

impl FromStr for Grammar {
    type Err = GrammarError;

    /// Parse a grammar from text with one declaration per line
    fn from_str(source: &str) -> Result<Self> {
        Self::new(utils::parse_rules(source))
    }
}
