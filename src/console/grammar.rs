//! Command grammar tree
//!
//! Static, application-owned tree of abbreviable keywords. The console only
//! reads it.
//!
//! Sibling lists must be sorted: the ambiguity check compares a token only
//! against the next sibling. `Grammar::new` enforces that at construction.
//!
//! ```ignore
//! static SHOW: &[Keyword] = &[
//!     Keyword::leaf("interfaces", CMD_INTERFACES, "Interface status"),
//!     Keyword::leaf("version", CMD_VERSION, "Firmware version"),
//! ];
//! static ROOT: &[Keyword] = &[
//!     Keyword::node("show", CMD_SHOW, SHOW, "Show state"),
//! ];
//! let grammar = Grammar::new(ROOT)?;
//! ```

use super::token::CommandId;

/// A single keyword in the grammar tree
#[derive(Debug, Clone, Copy)]
pub struct Keyword<'a> {
    /// Unabbreviated keyword (display text for wildcard nodes)
    pub keyword: &'a str,
    /// Id assigned to tokens that resolve to this keyword
    pub id: CommandId,
    /// Keywords legal after this one; `None` ends the command
    pub children: Option<&'a [Keyword<'a>]>,
    /// One-line help text
    pub help: &'a str,
}

impl<'a> Keyword<'a> {
    /// Keyword that ends the command
    pub const fn leaf(keyword: &'a str, id: CommandId, help: &'a str) -> Self {
        Self { keyword, id, children: None, help }
    }

    /// Keyword that expects further words
    pub const fn node(keyword: &'a str, id: CommandId, children: &'a [Keyword<'a>], help: &'a str) -> Self {
        Self { keyword, id, children: Some(children), help }
    }

    /// Wildcard accepting any single word
    pub const fn freeform(display: &'a str, children: Option<&'a [Keyword<'a>]>, help: &'a str) -> Self {
        Self { keyword: display, id: CommandId::FREEFORM, children, help }
    }

    /// Marks that the command may end at this level
    pub const fn optional(help: &'a str) -> Self {
        Self { keyword: "<cr>", id: CommandId::OPTIONAL, children: None, help }
    }

    /// Wildcard consuming the rest of the line
    pub const fn text(display: &'a str, help: &'a str) -> Self {
        Self { keyword: display, id: CommandId::TEXT, children: None, help }
    }

    /// True for nodes matched by position rather than by text
    pub const fn is_wildcard(&self) -> bool {
        self.id.is_wildcard()
    }
}

/// Grammar construction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrammarError<'a> {
    /// A textual keyword is the empty string
    EmptyKeyword,
    /// `second` follows `first` but does not sort after it
    Unsorted { first: &'a str, second: &'a str },
    /// The same keyword appears twice in one sibling list
    Duplicate(&'a str),
    /// A textual keyword follows a wildcard in the same sibling list
    WildcardNotLast { wildcard: &'a str, keyword: &'a str },
}

impl core::fmt::Display for GrammarError<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::EmptyKeyword => write!(f, "empty keyword"),
            Self::Unsorted { first, second } => {
                write!(f, "\"{}\" must sort after \"{}\"", second, first)
            }
            Self::Duplicate(k) => write!(f, "duplicate keyword \"{}\"", k),
            Self::WildcardNotLast { wildcard, keyword } => {
                write!(f, "keyword \"{}\" follows wildcard \"{}\"", keyword, wildcard)
            }
        }
    }
}

/// Validated grammar root
#[derive(Debug, Clone, Copy)]
pub struct Grammar<'a> {
    root: &'a [Keyword<'a>],
}

impl<'a> Grammar<'a> {
    /// Validate every sibling list and wrap the root
    pub fn new(root: &'a [Keyword<'a>]) -> Result<Self, GrammarError<'a>> {
        validate(root)?;
        Ok(Self { root })
    }

    /// Wrap a root without validation (for `static` grammars checked in tests)
    pub const fn new_unchecked(root: &'a [Keyword<'a>]) -> Self {
        Self { root }
    }

    /// Top-level keywords
    pub fn root(&self) -> &'a [Keyword<'a>] {
        self.root
    }
}

/// Check one sibling list and, recursively, its children
pub fn validate<'a>(siblings: &'a [Keyword<'a>]) -> Result<(), GrammarError<'a>> {
    let mut prev_text: Option<&'a str> = None;
    let mut wildcard: Option<&'a str> = None;

    for node in siblings {
        if node.is_wildcard() {
            wildcard = Some(node.keyword);
        } else {
            if node.keyword.is_empty() {
                return Err(GrammarError::EmptyKeyword);
            }
            if let Some(w) = wildcard {
                return Err(GrammarError::WildcardNotLast { wildcard: w, keyword: node.keyword });
            }
            if let Some(prev) = prev_text {
                match prev.cmp(node.keyword) {
                    core::cmp::Ordering::Less => {}
                    core::cmp::Ordering::Equal => return Err(GrammarError::Duplicate(node.keyword)),
                    core::cmp::Ordering::Greater => {
                        return Err(GrammarError::Unsorted { first: prev, second: node.keyword })
                    }
                }
            }
            prev_text = Some(node.keyword);
        }

        if let Some(children) = node.children {
            validate(children)?;
        }
    }

    Ok(())
}
