use std::sync::Arc;

use re_stream::{Automaton, Error, Matcher, Nfa};


/// Feed `input` to a fresh automaton for `pattern` and collect every match.
fn matches(pattern: &str, input: &str) -> anyhow::Result<Vec<String>> {
    let _ = env_logger::try_init();
    let mut found = vec![];
    let mut auto = Automaton::new(pattern, |m: &str| found.push(m.to_string()))?;
    auto.push_str(input);
    drop(auto);
    Ok(found)
}

fn none() -> Vec<String> {
    vec![]
}

#[test]
fn literal_concatenation() -> anyhow::Result<()> {
    assert_eq!(matches("abc", "abc")?, vec!["abc"]);
    assert_eq!(matches("abc", "ab")?, none());
    assert_eq!(matches("abc", "abd")?, none());
    assert_eq!(matches("abc", "acb")?, none());
    assert_eq!(matches("abc", "xyz")?, none());
    Ok(())
}

#[test]
fn alternation() -> anyhow::Result<()> {
    assert_eq!(matches("a|b", "a")?, vec!["a"]);
    assert_eq!(matches("a|b", "b")?, vec!["b"]);
    assert_eq!(matches("a|b", "c")?, none());
    // A failed character leaves the automaton ready for a fresh attempt.
    assert_eq!(matches("a|b", "cb")?, vec!["b"]);
    assert_eq!(matches("cat|dog", "hotdog")?, vec!["dog"]);
    Ok(())
}

#[test]
fn star() -> anyhow::Result<()> {
    assert_eq!(matches("ab*c", "ac")?, vec!["ac"]);
    assert_eq!(matches("ab*c", "abc")?, vec!["abc"]);
    assert_eq!(matches("ab*c", "abbbc")?, vec!["abbbc"]);
    Ok(())
}

#[test]
fn star_waits_for_more_input() -> anyhow::Result<()> {
    let mut found = 0;
    let mut auto = Automaton::new("ab*c", |_: &str| found += 1)?;
    auto.push_str("abb");
    assert!(auto.is_started());
    assert_eq!(auto.matched(), "abb");
    auto.push('x');
    assert!(!auto.is_started());
    assert_eq!(auto.matched(), "");
    drop(auto);
    assert_eq!(found, 0);
    Ok(())
}

#[test]
fn optional() -> anyhow::Result<()> {
    assert_eq!(matches("colou?r", "color")?, vec!["color"]);
    assert_eq!(matches("colou?r", "colour")?, vec!["colour"]);
    assert_eq!(matches("colou?r", "colouur")?, none());
    Ok(())
}

#[test]
fn optional_breaks_on_second_u() -> anyhow::Result<()> {
    let mut found = 0;
    let mut auto = Automaton::new("colou?r", |_: &str| found += 1)?;
    auto.push_str("colou");
    assert!(auto.is_started());
    auto.push('u');
    assert!(!auto.is_started());
    auto.push('r');
    drop(auto);
    assert_eq!(found, 0);
    Ok(())
}

#[test]
fn reset_after_failure_starts_fresh() -> anyhow::Result<()> {
    assert_eq!(matches("a", "xa")?, vec!["a"]);
    assert_eq!(matches("ab", "xab")?, vec!["ab"]);
    Ok(())
}

#[test]
fn simultaneous_completions() -> anyhow::Result<()> {
    assert_eq!(matches("a|a", "a")?, vec!["a", "a"]);
    assert_eq!(matches("ab|ab|ab", "ab")?, vec!["ab", "ab", "ab"]);
    Ok(())
}

#[test]
fn matches_across_chunks() -> anyhow::Result<()> {
    let mut found = vec![];
    let mut auto =
        Automaton::new("GET|POST", |m: &str| found.push(m.to_string()))?;
    for chunk in ["xxPO", "", "S", "T yyG", "ET"] {
        auto.push_str(chunk);
    }
    drop(auto);
    assert_eq!(found, vec!["POST", "GET"]);
    Ok(())
}

#[test]
fn non_ascii_characters() -> anyhow::Result<()> {
    assert_eq!(matches("δ+ε", "αδδεω")?, vec!["δδε"]);
    assert_eq!(matches("(☃|❄)*!", "☃❄☃!")?, vec!["☃❄☃!"]);
    Ok(())
}

#[test]
fn one_nfa_many_streams() -> anyhow::Result<()> {
    let nfa = Arc::new(Nfa::new("(ab)+")?);
    let mut streams: Vec<Matcher> =
        (0..3).map(|_| Matcher::new(nfa.clone())).collect();
    let inputs = ["ab", "abab", "ba"];
    let mut found = vec![vec![]; 3];

    // Interleave the streams character by character.
    for i in 0..4 {
        for (n, stream) in streams.iter_mut().enumerate() {
            if let Some(c) = inputs[n].chars().nth(i) {
                stream.push(c, &mut |m: &str| found[n].push(m.to_string()));
            }
        }
    }
    assert_eq!(found[0], vec!["ab"]);
    assert_eq!(found[1], vec!["ab", "abab"]);
    assert!(found[2].is_empty());
    Ok(())
}

#[test]
fn malformed_patterns_never_build() {
    let cases = [
        ("(ab", Error::UnbalancedParen { offset: 0 }),
        ("ab)", Error::UnbalancedParen { offset: 2 }),
        ("a()", Error::UnbalancedParen { offset: 2 }),
        ("|a", Error::DanglingAlternation { offset: 0 }),
        ("a|", Error::DanglingAlternation { offset: 1 }),
        ("+a", Error::DanglingQuantifier { quantifier: '+', offset: 0 }),
        ("a(*)", Error::DanglingQuantifier { quantifier: '*', offset: 2 }),
        ("", Error::EmptyPattern),
    ];
    for (pattern, expected) in cases {
        let result = Automaton::new(pattern, |_: &str| {});
        assert_eq!(result.err(), Some(expected), "pattern {:?}", pattern);
    }
}

#[test]
fn error_messages() {
    assert_eq!(
        Error::UnbalancedParen { offset: 3 }.to_string(),
        "unbalanced parenthesis at offset 3"
    );
    assert_eq!(
        Error::MalformedAutomaton { fragments: 2 }.to_string(),
        "stack error: 2 fragment(s) left after construction"
    );
}
