//! Serial console line editor and command dispatcher
//!
//! One `Editor` per session, fed one byte at a time by the transport loop.
//! Zero heap allocation - all fixed buffers.

pub mod command_line;
pub mod editor;
pub mod error;
pub mod format;
pub mod grammar;
pub mod help;
pub mod output;
pub mod resolver;
pub mod session;
pub mod token;

pub use command_line::CommandLine;
pub use editor::{Editor, EscapeState};
pub use error::ConsoleError;
pub use format::{printf, Arg};
pub use grammar::{Grammar, GrammarError, Keyword};
pub use output::OutputStream;
pub use resolver::{resolve, walk, Match};
pub use session::Session;
pub use token::{CommandId, Token};
