//! Command resolver
//!
//! Walks the grammar tree word by word, assigning ids in place.
//!
//! A word matches a keyword it abbreviates. Sibling lists are sorted, so a
//! word is ambiguous exactly when it also abbreviates the *next* sibling.
//! An exact match always wins over that check.

use super::command_line::CommandLine;
use super::error::ConsoleError;
use super::grammar::{Grammar, Keyword};
use super::token::{CommandId, Token};

/// Outcome of matching one word against one sibling list
#[derive(Debug, Clone, Copy)]
pub enum Match<'g> {
    /// Unique match
    Found(&'g Keyword<'g>),
    /// Word abbreviates both keywords
    Ambiguous(&'g str, &'g str),
    /// No sibling accepts the word
    None,
}

/// Match `token` against one sibling list
pub fn match_token<'g>(token: &Token, siblings: &'g [Keyword<'g>]) -> Match<'g> {
    for (i, node) in siblings.iter().enumerate() {
        if node.id == CommandId::OPTIONAL {
            continue;
        }
        if node.is_wildcard() {
            return Match::Found(node);
        }
        if !token.prefix_match(node.keyword) {
            continue;
        }
        if token.exact_match(node.keyword) {
            return Match::Found(node);
        }
        if let Some(next) = siblings.get(i + 1) {
            if !next.is_wildcard() && token.prefix_match(next.keyword) {
                return Match::Ambiguous(node.keyword, next.keyword);
            }
        }
        return Match::Found(node);
    }
    Match::None
}

/// Decide whether the line may end with `node` still pending
fn end_of_line<'g>(node: Option<&'g [Keyword<'g>]>, index: usize) -> Result<(), ConsoleError<'g>> {
    match node {
        None => Ok(()),
        Some(siblings) if siblings.is_empty() => Ok(()),
        Some(siblings) if siblings.iter().any(|k| k.id == CommandId::OPTIONAL) => Ok(()),
        Some(_) => Err(ConsoleError::Incomplete { index }),
    }
}

/// Resolve a compacted line against `grammar`.
///
/// Stops at the first empty slot or the last slot. On success every word
/// carries its id; `TEXT` claims the matching word and all words after it.
/// Without a grammar, resolution fails closed.
pub fn resolve<'g>(line: &mut CommandLine, grammar: Option<&Grammar<'g>>) -> Result<(), ConsoleError<'g>> {
    let grammar = grammar.ok_or(ConsoleError::NoGrammar)?;
    line.clear_ids();

    let mut node: Option<&'g [Keyword<'g>]> = Some(grammar.root());

    for index in 0..CommandLine::SLOTS {
        if line[index].is_empty() {
            return end_of_line(node, index);
        }

        // A leaf takes no more words
        let Some(siblings) = node.filter(|s| !s.is_empty()) else {
            return Err(ConsoleError::Unrecognized { index });
        };

        match match_token(&line[index], siblings) {
            Match::Found(kw) if kw.id == CommandId::TEXT => {
                for i in index..CommandLine::SLOTS {
                    if !line[i].is_empty() {
                        line[i].set_id(CommandId::TEXT);
                    }
                }
                return Ok(());
            }
            Match::Found(kw) => {
                line[index].set_id(kw.id);
                node = kw.children;
            }
            Match::Ambiguous(first, second) => {
                return Err(ConsoleError::Ambiguous { index, first, second });
            }
            Match::None => return Err(ConsoleError::Unrecognized { index }),
        }
    }

    end_of_line(node, CommandLine::SLOTS)
}

/// Find the sibling list that applies at word `upto`.
///
/// Walks words `0..upto` with the resolver's matching rules, skipping empty
/// slots, without touching ids. `Ok(None)` means the command is complete
/// before `upto`.
pub fn walk<'g>(
    line: &CommandLine,
    root: &'g [Keyword<'g>],
    upto: usize,
) -> Result<Option<&'g [Keyword<'g>]>, ConsoleError<'g>> {
    let mut node: Option<&'g [Keyword<'g>]> = Some(root);

    for (index, token) in line.tokens().iter().enumerate().take(upto) {
        if token.is_empty() {
            continue;
        }
        let Some(siblings) = node.filter(|s| !s.is_empty()) else {
            return Err(ConsoleError::Unrecognized { index });
        };
        match match_token(token, siblings) {
            Match::Found(kw) if kw.id == CommandId::TEXT => {
                return Ok(Some(core::slice::from_ref(kw)));
            }
            Match::Found(kw) => node = kw.children,
            Match::Ambiguous(first, second) => {
                return Err(ConsoleError::Ambiguous { index, first, second });
            }
            Match::None => return Err(ConsoleError::Unrecognized { index }),
        }
    }

    Ok(node)
}
