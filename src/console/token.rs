//! Fixed-capacity token cell
//!
//! One whitespace-delimited word plus the grammar id it resolved to.
//! NUL-padded: every byte past the text is zero, and the last byte
//! always is, so a token holds at most `MAX_TOKEN_LEN - 1` characters.

use crate::config::MAX_TOKEN_LEN;

/// Identifier carried by grammar keywords and assigned to resolved tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(pub u16);

impl CommandId {
    /// No match yet, or not matched
    pub const INVALID: Self = Self(0xffff);
    /// Wildcard: any single token matches
    pub const FREEFORM: Self = Self(0xfffe);
    /// Early end of command permitted at this level
    pub const OPTIONAL: Self = Self(0xfffd);
    /// Consumes the rest of the line
    pub const TEXT: Self = Self(0xfffc);

    /// True for the four reserved values
    pub const fn is_sentinel(self) -> bool {
        self.0 >= Self::TEXT.0
    }

    /// True for nodes that match without comparing keyword text
    pub const fn is_wildcard(self) -> bool {
        self.0 == Self::FREEFORM.0 || self.0 == Self::OPTIONAL.0 || self.0 == Self::TEXT.0
    }
}

/// A single token of the command line
#[derive(Clone, Copy)]
pub struct Token {
    text: [u8; MAX_TOKEN_LEN],
    id: CommandId,
}

impl Token {
    /// Maximum number of characters a token holds
    pub const CAPACITY: usize = MAX_TOKEN_LEN - 1;

    /// Create empty token
    pub const fn new() -> Self {
        Self {
            text: [0u8; MAX_TOKEN_LEN],
            id: CommandId::INVALID,
        }
    }

    /// Reset text and id
    pub fn clear(&mut self) {
        self.text = [0u8; MAX_TOKEN_LEN];
        self.id = CommandId::INVALID;
    }

    /// Number of characters
    pub fn len(&self) -> usize {
        self.text.iter().position(|&b| b == 0).unwrap_or(Self::CAPACITY)
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.text[0] == 0
    }

    /// Check if no more characters fit
    pub fn is_full(&self) -> bool {
        self.len() >= Self::CAPACITY
    }

    /// Get raw bytes (without padding)
    pub fn as_bytes(&self) -> &[u8] {
        &self.text[..self.len()]
    }

    /// Get token as string slice
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(self.as_bytes()).unwrap_or("")
    }

    /// Resolved grammar id
    pub fn id(&self) -> CommandId {
        self.id
    }

    /// Assign the resolved grammar id
    pub fn set_id(&mut self, id: CommandId) {
        self.id = id;
    }

    /// Replace contents, truncating to capacity
    pub fn set(&mut self, s: &str) {
        self.clear();
        self.append(s.as_bytes());
    }

    /// Insert a byte at `offset`, shifting the tail right.
    ///
    /// Returns false (and changes nothing) if the token is full,
    /// `offset` is past the end, or `c` is NUL.
    pub fn insert(&mut self, offset: usize, c: u8) -> bool {
        let len = self.len();
        if c == 0 || len >= Self::CAPACITY || offset > len {
            return false;
        }
        self.text.copy_within(offset..len, offset + 1);
        self.text[offset] = c;
        true
    }

    /// Remove the byte at `offset`, shifting the tail left
    pub fn remove(&mut self, offset: usize) {
        let len = self.len();
        if offset < len {
            self.text.copy_within(offset + 1..len, offset);
            self.text[len - 1] = 0;
        }
    }

    /// Cut the text at `offset`
    pub fn truncate(&mut self, offset: usize) {
        if offset < MAX_TOKEN_LEN {
            self.text[offset..].fill(0);
        }
    }

    /// Append bytes up to the first NUL, returning how many were not kept
    pub fn append(&mut self, bytes: &[u8]) -> usize {
        let len = self.len();
        let src = &bytes[..bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len())];
        let take = src.len().min(Self::CAPACITY - len);
        self.text[len..len + take].copy_from_slice(&src[..take]);
        bytes.len() - take
    }

    /// Move the text from `offset` onward into a new token
    pub fn split_off(&mut self, offset: usize) -> Token {
        let mut right = Token::new();
        right.append(self.tail(offset));
        self.truncate(offset);
        right
    }

    /// Text from `offset` onward
    pub fn tail(&self, offset: usize) -> &[u8] {
        let bytes = self.as_bytes();
        &bytes[offset.min(bytes.len())..]
    }

    /// True if this non-empty token is a leading substring of `keyword`
    pub fn prefix_match(&self, keyword: &str) -> bool {
        !self.is_empty() && keyword.as_bytes().starts_with(self.as_bytes())
    }

    /// True if this token equals `keyword`
    pub fn exact_match(&self, keyword: &str) -> bool {
        self.as_bytes() == keyword.as_bytes()
    }
}

impl Default for Token {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq<str> for Token {
    fn eq(&self, other: &str) -> bool {
        self.exact_match(other)
    }
}

impl PartialEq<&str> for Token {
    fn eq(&self, other: &&str) -> bool {
        self.exact_match(other)
    }
}

impl core::fmt::Debug for Token {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Token({:?}, {:#06x})", self.as_str(), self.id.0)
    }
}
