use grammar_solver::{Grammar, GrammarConfig};
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::io::Write;
use std::thread;
use tempfile::NamedTempFile;

const SENTENCE_GRAMMAR: [&str; 9] = [
    "<s>::=<np> <vp>",
    "<np>::=<dp> <adjp> <n>|<pn>",
    "<dp>::=the|a",
    "<adjp>::=<adj>|<adj> <adjp>",
    "<adj>::=big|fat|green|wonderful|faulty|subliminal|pretentious",
    "<n>::=dog|cat|man|university|father|mother|child|television",
    "<pn>::=John|Jane|Sally|Spot|Fred|Elmo",
    "<vp>::=<tv> <np>|<iv>",
    "<tv>::=hit|honored|kissed|helped",
];

#[test]
fn test_empty_rules_rejected() {
    let rules: Vec<&str> = Vec::new();
    let err = Grammar::new(rules).unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn test_duplicate_symbol_rejected() {
    let err = Grammar::new(["<s> ::= a", "<t> ::= b", "<s> ::= c"]).unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn test_membership() {
    let grammar = Grammar::new(SENTENCE_GRAMMAR).unwrap();

    for symbol in ["<s>", "<np>", "<dp>", "<adjp>", "<adj>", "<n>", "<pn>", "<vp>", "<tv>"] {
        assert!(grammar.contains(symbol).unwrap(), "missing {}", symbol);
    }
    // referenced but never declared
    assert!(!grammar.contains("<iv>").unwrap());
    assert!(!grammar.contains("<S>").unwrap());
    assert!(!grammar.contains("dog").unwrap());
}

#[test]
fn test_symbols_match_declarations() {
    let grammar = Grammar::new(SENTENCE_GRAMMAR).unwrap();
    assert_eq!(
        grammar.symbols(),
        vec!["<adj>", "<adjp>", "<dp>", "<n>", "<np>", "<pn>", "<s>", "<tv>", "<vp>"]
    );
}

#[test]
fn test_terminal_passthrough() {
    let grammar = Grammar::new(SENTENCE_GRAMMAR).unwrap();
    for _ in 0..10 {
        assert_eq!(grammar.generate("<iv>").unwrap(), "<iv>");
        assert_eq!(grammar.generate("dog!").unwrap(), "dog!");
    }
}

#[test]
fn test_alternative_coverage() {
    let grammar = Grammar::new(["<x> ::= a | b"]).unwrap();

    let seen: HashSet<String> = (0..200)
        .map(|_| grammar.generate("<x>").unwrap())
        .collect();

    assert_eq!(seen, HashSet::from(["a".to_string(), "b".to_string()]));
}

#[test]
fn test_recursive_composition() {
    let grammar = Grammar::new(["S ::= A B", "A ::= x", "B ::= y"]).unwrap();
    for _ in 0..10 {
        assert_eq!(grammar.generate("S").unwrap(), "x y");
    }
}

#[test]
fn test_whitespace_normalization() {
    let grammar = Grammar::new(["<s> ::=   <a> \t\t <b>   one\t two  ", "<a> ::= x", "<b> ::=\ty  "])
        .unwrap();
    assert_eq!(grammar.generate("<s>").unwrap(), "x y one two");
}

#[test]
fn test_hello_world() {
    let grammar = Grammar::new(["<start> ::= <a> <b>", "<a> ::= hello", "<b> ::= world"]).unwrap();
    for _ in 0..10 {
        assert_eq!(grammar.generate("<start>").unwrap(), "hello world");
    }
}

#[test]
fn test_sentence_shape() {
    let grammar = Grammar::new(SENTENCE_GRAMMAR).unwrap();
    let nouns = ["dog", "cat", "man", "university", "father", "mother", "child", "television"];
    let names = ["John", "Jane", "Sally", "Spot", "Fred", "Elmo"];

    for _ in 0..50 {
        let np = grammar.generate("<np>").unwrap();
        assert!(!np.starts_with(' ') && !np.ends_with(' '));
        assert!(!np.contains("  "), "double space in {:?}", np);

        let words: Vec<&str> = np.split(' ').collect();
        if words.len() == 1 {
            assert!(names.contains(&words[0]), "unexpected proper noun {:?}", np);
        } else {
            assert!(words[0] == "the" || words[0] == "a");
            assert!(nouns.contains(words.last().unwrap()), "unexpected noun {:?}", np);
        }
    }
}

#[test]
fn test_seeded_grammars_agree() {
    let first = Grammar::with_config(SENTENCE_GRAMMAR, GrammarConfig::seeded(2024)).unwrap();
    let second = Grammar::with_config(SENTENCE_GRAMMAR, GrammarConfig::seeded(2024)).unwrap();

    for _ in 0..20 {
        assert_eq!(first.generate("<s>").unwrap(), second.generate("<s>").unwrap());
    }
}

#[test]
fn test_concurrent_generate() {
    let grammar = Grammar::new(SENTENCE_GRAMMAR).unwrap();

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..25 {
                    let sentence = grammar.generate("<s>").unwrap();
                    assert!(!sentence.is_empty());
                }
            });
        }
    });
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "# greeting grammar").unwrap();
    writeln!(file, "<start> ::= Hello <subject>").unwrap();
    writeln!(file).unwrap();
    writeln!(file, "<subject> ::= world | Rust").unwrap();
    file.flush().unwrap();

    let grammar = Grammar::from_file(file.path()).unwrap();
    assert_eq!(grammar.symbols(), vec!["<start>", "<subject>"]);

    let result = grammar.generate("<start>").unwrap();
    assert!(result == "Hello world" || result == "Hello Rust");
}

#[test]
fn test_from_str() {
    let grammar: Grammar = "<a> ::= 1 | 2\n\n<b> ::= <a> <a>\n".parse().unwrap();
    assert_eq!(grammar.productions("<a>").unwrap().len(), 2);
    assert!(grammar.productions("1").is_none());

    let derived = grammar.generate("<b>").unwrap();
    assert!(["1 1", "1 2", "2 1", "2 2"].contains(&derived.as_str()));
}

#[test]
fn test_json_dump() {
    let grammar = Grammar::new(["<s> ::= <a> b | c", "<a> ::= x"]).unwrap();
    let value = serde_json::to_value(&grammar).unwrap();

    assert_eq!(
        value,
        serde_json::json!({
            "rules": {
                "<a>": [["x"]],
                "<s>": [["<a>", "b"], ["c"]],
            }
        })
    );
}
