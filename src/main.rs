use clap::Parser;
use grammar_solver::{Grammar, GrammarConfig, utils};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Random sentence generator for BNF grammars
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the grammar file, one declaration per line
    grammar_file: PathBuf,

    /// Symbol to generate; prompts interactively when omitted
    symbol: Option<String>,

    /// Number of sentences to generate
    #[arg(short = 'n', long, default_value_t = 1)]
    count: usize,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Print the grammar's non-terminals and exit
    #[arg(long)]
    list: bool,

    /// Print the grammar's symbol table as JSON and exit
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let rules = utils::read_rules(&cli.grammar_file)?;
    let config = GrammarConfig { seed: cli.seed };
    let grammar = Grammar::with_config(rules, config)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&grammar)?);
        return Ok(());
    }

    if cli.list {
        for symbol in grammar.symbols() {
            println!("{}", symbol);
        }
        return Ok(());
    }

    match cli.symbol {
        Some(symbol) => print_sentences(&grammar, &symbol, cli.count)?,
        None => interactive(&grammar)?,
    }

    Ok(())
}

fn print_sentences(grammar: &Grammar, symbol: &str, count: usize) -> grammar_solver::Result<()> {
    for i in 0..count {
        let generated = grammar.generate(symbol)?;
        println!("{}. {}", i + 1, generated);
    }
    Ok(())
}

/// Prompt for symbols until an empty line or end of input
fn interactive(grammar: &Grammar) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    println!("Available symbols to generate are:");
    println!("[{}]", grammar.symbols().join(", "));

    loop {
        let Some(symbol) = prompt(&mut input, "What do you want to generate (Enter to quit)? ")?
        else {
            break;
        };
        if symbol.is_empty() {
            break;
        }

        let Some(answer) = prompt(&mut input, "How many do you want me to generate? ")? else {
            break;
        };
        let count = match answer.parse::<usize>() {
            Ok(count) => count,
            Err(_) => {
                println!("Not a number: {}", answer);
                continue;
            }
        };

        print_sentences(grammar, &symbol, count)?;
        println!();
    }

    Ok(())
}

fn prompt(input: &mut impl BufRead, message: &str) -> io::Result<Option<String>> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
