//! Global log stream instance.
//!
//! Every `Editor` logs here unless constructed with its own stream.
//! Drained by the transport loop (UART on ESP-IDF, stderr on hosts).

use crate::logging::LogStream;

/// Shared diagnostic stream for all console sessions.
///
/// Multiple producers (one per session), single consumer (the drain loop).
pub static CLI_LOG_STREAM: LogStream = LogStream::new();
