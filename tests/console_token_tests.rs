//! Token and command line buffer tests

mod common;

use common::line_of;
use embedded_cli::console::{CommandId, CommandLine, Token};
use embedded_cli::MAX_TOKEN_LEN;

#[test]
fn test_token_capacity() {
    let mut token = Token::new();
    let lost = token.append(&[b'x'; 40]);

    assert_eq!(Token::CAPACITY, MAX_TOKEN_LEN - 1);
    assert_eq!(token.len(), 31);
    assert_eq!(lost, 9);
    assert!(token.is_full());
    assert!(!token.insert(0, b'y'));
}

#[test]
fn test_token_edit_sequence() {
    let mut token = Token::new();
    token.set("sow");
    assert!(token.insert(1, b'h'));
    assert_eq!(token, "show");

    token.remove(0);
    assert_eq!(token, "how");

    let right = token.split_off(1);
    assert_eq!(token, "h");
    assert_eq!(right, "ow");
}

#[test]
fn test_token_insert_past_end_rejected() {
    let mut token = Token::new();
    token.set("ab");

    assert!(!token.insert(3, b'c'));
    assert_eq!(token, "ab");
}

#[test]
fn test_prefix_and_exact_match() {
    let mut token = Token::new();
    token.set("sh");

    assert!(token.prefix_match("show"));
    assert!(!token.prefix_match("set"));
    assert!(!token.exact_match("show"));
    assert!(Token::new().exact_match(""));
    assert!(!Token::new().prefix_match("show"));
}

#[test]
fn test_token_debug() {
    let mut token = Token::new();
    token.set("show");
    token.set_id(CommandId(6));

    assert_eq!(format!("{:?}", token), "Token(\"show\", 0x0006)");
}

#[test]
fn test_line_starts_blank() {
    let line = CommandLine::new();

    assert!(line.is_blank());
    assert_eq!(line.highest_non_empty(), None);
    assert_eq!(line.tokens().len(), CommandLine::SLOTS);
    assert_eq!(line.id(0), CommandId::INVALID);
    assert_eq!(line.id(99), CommandId::INVALID);
}

#[test]
fn test_insert_slot_shifts_right() {
    let mut line = line_of(&["a", "b", "c"]);
    line.insert_slot(1);

    assert_eq!(line[0], "a");
    assert!(line[1].is_empty());
    assert_eq!(line[2], "b");
    assert_eq!(line[3], "c");
}

#[test]
fn test_remove_slot_shifts_left() {
    let mut line = line_of(&["a", "b", "c"]);
    line.remove_slot(0);

    assert_eq!(line[0], "b");
    assert_eq!(line[1], "c");
    assert!(line[2].is_empty());
    assert_eq!(line.highest_non_empty(), Some(1));
}

#[test]
fn test_compact_squeezes_gaps() {
    let mut line = line_of(&["", "show", "", "", "version"]);
    let words = line.compact();

    assert_eq!(words, 2);
    assert_eq!(line[0], "show");
    assert_eq!(line[1], "version");
    assert_eq!(line.highest_non_empty(), Some(1));
}

#[test]
fn test_words_skip_empty_slots() {
    let line = line_of(&["a", "", "b"]);
    let words: Vec<&str> = line.words().map(Token::as_str).collect();

    assert_eq!(words, ["a", "b"]);
}

#[test]
fn test_clear_ids() {
    let mut line = line_of(&["a"]);
    line[0].set_id(CommandId(4));
    line.clear_ids();

    assert_eq!(line.id(0), CommandId::INVALID);
    assert_eq!(line[0], "a");
}
