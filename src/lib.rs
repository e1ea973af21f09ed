//! # embedded-cli
//!
//! Interactive line editor and command-tree dispatcher for character consoles
//! (UART, SSH channel, socket) on small devices.
//!
//! ## Architecture
//!
//! Keystrokes flow through one [`Editor`] per session:
//! - The editor keeps a fixed [`CommandLine`] of tokens in step with the screen
//! - A finished line is resolved against a static [`Grammar`] of abbreviable keywords
//! - Success hands the resolved line to the [`Session`]; failure is reported and the line reset
//! - No heap, no locks, no blocking; capacity overflow is absorbed silently
//!
//! Diagnostics never reach the terminal: they go to [`CLI_LOG_STREAM`].

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod console;
pub mod log_globals;
pub mod logging;
pub mod uart_logger;

pub use config::{MAX_TOKENS_PER_COMMAND, MAX_TOKEN_LEN, VERSION};
pub use console::{
    CommandId, CommandLine, ConsoleError, Editor, Grammar, GrammarError, Keyword, OutputStream, Session, Token,
};
pub use log_globals::CLI_LOG_STREAM;
pub use logging::{LogLevel, LogStream};
