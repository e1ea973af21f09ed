//! Command line buffer
//!
//! A fixed row of token slots. Pure value data: the editor owns the cursor,
//! the resolver writes ids in place, the session reads the result.

use core::ops::{Index, IndexMut};

use super::token::{CommandId, Token};
use crate::config::MAX_TOKENS_PER_COMMAND;

/// The line currently being edited, split into tokens
#[derive(Clone, Copy, Debug)]
pub struct CommandLine {
    tokens: [Token; MAX_TOKENS_PER_COMMAND],
}

impl CommandLine {
    /// Number of token slots
    pub const SLOTS: usize = MAX_TOKENS_PER_COMMAND;

    /// Create empty line
    pub const fn new() -> Self {
        Self {
            tokens: [Token::new(); MAX_TOKENS_PER_COMMAND],
        }
    }

    /// Clear every slot
    pub fn clear(&mut self) {
        for t in self.tokens.iter_mut() {
            t.clear();
        }
    }

    /// All slots, including empty ones
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Slot at `idx`, if in range
    pub fn get(&self, idx: usize) -> Option<&Token> {
        self.tokens.get(idx)
    }

    /// Non-empty tokens in order
    pub fn words(&self) -> impl Iterator<Item = &Token> + '_ {
        self.tokens.iter().filter(|t| !t.is_empty())
    }

    /// Resolved id of the token at `idx`
    pub fn id(&self, idx: usize) -> CommandId {
        self.tokens.get(idx).map_or(CommandId::INVALID, Token::id)
    }

    /// Highest slot holding text
    pub fn highest_non_empty(&self) -> Option<usize> {
        self.tokens.iter().rposition(|t| !t.is_empty())
    }

    /// True if no slot holds text
    pub fn is_blank(&self) -> bool {
        self.tokens.iter().all(Token::is_empty)
    }

    /// Open an empty slot at `idx`, moving it and later slots one right.
    ///
    /// The last slot falls off; callers guarantee it is empty.
    pub fn insert_slot(&mut self, idx: usize) {
        if idx >= Self::SLOTS {
            return;
        }
        self.tokens.copy_within(idx..Self::SLOTS - 1, idx + 1);
        self.tokens[idx].clear();
    }

    /// Drop the slot at `idx`, moving later slots one left and clearing the last
    pub fn remove_slot(&mut self, idx: usize) {
        if idx >= Self::SLOTS {
            return;
        }
        self.tokens.copy_within(idx + 1..Self::SLOTS, idx);
        self.tokens[Self::SLOTS - 1].clear();
    }

    /// Squeeze out empty slots between words.
    ///
    /// Returns the number of words.
    pub fn compact(&mut self) -> usize {
        let mut write = 0;
        for read in 0..Self::SLOTS {
            if self.tokens[read].is_empty() {
                continue;
            }
            if read != write {
                self.tokens[write] = self.tokens[read];
                self.tokens[read].clear();
            }
            write += 1;
        }
        write
    }

    /// Reset every resolved id to `INVALID`
    pub fn clear_ids(&mut self) {
        for t in self.tokens.iter_mut() {
            t.set_id(CommandId::INVALID);
        }
    }
}

impl Default for CommandLine {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<usize> for CommandLine {
    type Output = Token;

    fn index(&self, idx: usize) -> &Token {
        &self.tokens[idx]
    }
}

impl IndexMut<usize> for CommandLine {
    fn index_mut(&mut self, idx: usize) -> &mut Token {
        &mut self.tokens[idx]
    }
}
