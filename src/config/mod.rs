//! Module: config
//!
//! Purpose: Compile-time capacities for the console engine.
//!
//! Architecture:
//! - Every buffer in the crate is a fixed array sized from these constants
//! - Nothing grows at runtime; overflow is absorbed where it happens
//! - `VERSION` is injected by build.rs (package version + git hash)

/// Maximum bytes in a single token, including the terminating NUL slot.
///
/// A token therefore holds at most `MAX_TOKEN_LEN - 1` characters.
pub const MAX_TOKEN_LEN: usize = 32;

/// Number of token slots in one command line.
pub const MAX_TOKENS_PER_COMMAND: usize = 8;

/// Maximum bytes kept for the session username, including the NUL slot.
pub const MAX_USERNAME_LEN: usize = 32;

/// Log ring size (number of entries). Must be a power of 2.
pub const LOG_BUFFER_SIZE: usize = 64;

/// Maximum log message length.
pub const MAX_MSG_LEN: usize = 120;

/// Version string (set by build.rs, includes git hash)
pub const VERSION: &str = env!("VERSION_STRING");

const _: () = assert!(LOG_BUFFER_SIZE.is_power_of_two(), "LOG_BUFFER_SIZE must be power of 2");
const _: () = assert!(MAX_TOKEN_LEN >= 2, "a token must hold at least one character");
const _: () = assert!(MAX_TOKENS_PER_COMMAND >= 1);
