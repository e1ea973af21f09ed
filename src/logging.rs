//! Non-blocking diagnostic logging for the console engine.
//!
//! # Architecture
//!
//! ```text
//! Editor                 LogStream            Drain (UART / stderr)
//! ──────                 ─────────            ─────────────────────
//!
//! cli_warn!() ─────────▶ [L0][L1][L2] ──────▶ format_log_entry()
//! never blocks           lock-free            at leisure
//!                        ring buffer
//! ```
//!
//! # Rules
//!
//! - The keystroke path never blocks on logging and never allocates
//! - Diagnostics go to the log, never to the session's terminal
//! - Log messages may be dropped if the ring is full (counted in `dropped()`)

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

pub use crate::config::{LOG_BUFFER_SIZE, MAX_MSG_LEN};

/// Log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl LogLevel {
    /// Convert from raw u8 value (out of range saturates to `Trace`).
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Error,
            1 => LogLevel::Warn,
            2 => LogLevel::Info,
            3 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }

    /// Convert to string for output.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }
}

/// A single log entry.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct LogEntry {
    /// Timestamp in microseconds (event sequence number on hosts without a timer).
    pub timestamp_us: i64,
    /// Log level.
    pub level: LogLevel,
    /// Message length.
    pub len: u8,
    /// Message bytes (not null-terminated).
    pub msg: [u8; MAX_MSG_LEN],
}

impl LogEntry {
    /// Message text, or a marker if a truncation split a UTF-8 sequence.
    pub fn message(&self) -> &str {
        core::str::from_utf8(&self.msg[..self.len as usize]).unwrap_or("<invalid utf8>")
    }
}

impl Default for LogEntry {
    fn default() -> Self {
        Self {
            timestamp_us: 0,
            level: LogLevel::Info,
            len: 0,
            msg: [0; MAX_MSG_LEN],
        }
    }
}

#[allow(clippy::declare_interior_mutable_const)]
const SLOT_EMPTY: AtomicBool = AtomicBool::new(false);

/// Lock-free log stream (multiple producers, single consumer).
///
/// - Sessions on different transports can share one stream
/// - Push never blocks (drops message if full)
/// - Drain runs wherever the transport allows blocking
/// - Entries above `max_level` are discarded (not counted as dropped)
pub struct LogStream<const N: usize = LOG_BUFFER_SIZE> {
    entries: UnsafeCell<[LogEntry; N]>,
    /// Slot `i` holds a complete entry (set by its producer, cleared by the consumer)
    ready: [AtomicBool; N],
    max_level: AtomicU8,
    write_idx: AtomicU32,
    read_idx: AtomicU32,
    dropped: AtomicU32,
}

// SAFETY: Producers claim unique slots via compare_exchange and publish them
// through `ready`; the single consumer only reads published slots and frees
// them before advancing `read_idx`.
unsafe impl<const N: usize> Sync for LogStream<N> {}
unsafe impl<const N: usize> Send for LogStream<N> {}

impl<const N: usize> LogStream<N> {
    const MASK: usize = N - 1;

    /// Create a new empty log stream.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "Log buffer size must be power of 2");

        Self {
            entries: UnsafeCell::new([LogEntry {
                timestamp_us: 0,
                level: LogLevel::Info,
                len: 0,
                msg: [0; MAX_MSG_LEN],
            }; N]),
            ready: [SLOT_EMPTY; N],
            max_level: AtomicU8::new(LogLevel::Info as u8),
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Most verbose level accepted (default `Info`).
    #[inline]
    pub fn max_level(&self) -> LogLevel {
        LogLevel::from_u8(self.max_level.load(Ordering::Relaxed))
    }

    /// Change the most verbose level accepted.
    #[inline]
    pub fn set_max_level(&self, level: LogLevel) {
        self.max_level.store(level as u8, Ordering::Relaxed);
    }

    /// True if an entry at `level` would be kept.
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level <= self.max_level()
    }

    /// Push a log entry (never blocks).
    ///
    /// Returns `true` if message was queued, `false` if filtered by level or
    /// dropped (ring full).
    #[inline]
    pub fn push(&self, timestamp_us: i64, level: LogLevel, msg: &[u8]) -> bool {
        if !self.enabled(level) {
            return false;
        }

        let write = self.write_idx.load(Ordering::Acquire);
        let read = self.read_idx.load(Ordering::Acquire);

        if write.wrapping_sub(read) >= N as u32 {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        // Claim the slot; a racing producer that lost the claim counts as a drop
        if self
            .write_idx
            .compare_exchange(write, write.wrapping_add(1), Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        let idx = (write as usize) & Self::MASK;

        // SAFETY: The successful compare_exchange gives this producer a unique index.
        unsafe {
            let entry = &mut (*self.entries.get())[idx];
            entry.timestamp_us = timestamp_us;
            entry.level = level;
            entry.len = msg.len().min(MAX_MSG_LEN) as u8;
            entry.msg[..entry.len as usize].copy_from_slice(&msg[..entry.len as usize]);
        }
        self.ready[idx].store(true, Ordering::Release);

        true
    }

    /// Drain next log entry.
    ///
    /// Returns `None` if no entries are available or the oldest claimed
    /// slot is still being written.
    #[inline]
    pub fn drain(&self) -> Option<LogEntry> {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);

        if read == write {
            return None;
        }

        let idx = (read as usize) & Self::MASK;
        if !self.ready[idx].load(Ordering::Acquire) {
            return None;
        }

        // SAFETY: Single consumer; the producer finished this slot before setting `ready`
        let entry = unsafe { (*self.entries.get())[idx] };

        self.ready[idx].store(false, Ordering::Relaxed);
        self.read_idx.store(read.wrapping_add(1), Ordering::Release);
        Some(entry)
    }

    /// Get count of dropped messages.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Reset dropped counter (e.g., after reporting).
    #[inline]
    pub fn reset_dropped(&self) {
        self.dropped.store(0, Ordering::Relaxed);
    }

    /// Check if there are entries to drain.
    #[inline]
    pub fn has_entries(&self) -> bool {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);
        read != write
    }

    /// Get number of entries waiting to be drained (including ones still being written).
    #[inline]
    pub fn pending(&self) -> u32 {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }
}

impl<const N: usize> Default for LogStream<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a message into a buffer.
///
/// Returns the number of bytes written.
#[inline]
pub fn format_to_buffer(buf: &mut [u8], args: core::fmt::Arguments<'_>) -> usize {
    use core::fmt::Write;

    struct BufWriter<'a> {
        buf: &'a mut [u8],
        pos: usize,
    }

    impl Write for BufWriter<'_> {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            let bytes = s.as_bytes();
            let remaining = self.buf.len() - self.pos;
            let to_write = bytes.len().min(remaining);
            self.buf[self.pos..self.pos + to_write].copy_from_slice(&bytes[..to_write]);
            self.pos += to_write;
            Ok(())
        }
    }

    let mut writer = BufWriter { buf, pos: 0 };
    let _ = core::fmt::write(&mut writer, args);
    writer.pos
}

/// Current timestamp for log entries.
///
/// Microseconds since boot on ESP-IDF.
#[cfg(target_os = "espidf")]
#[inline]
pub fn timestamp_us() -> i64 {
    // SAFETY: esp_timer_get_time is always safe to call after boot
    unsafe { esp_idf_svc::sys::esp_timer_get_time() }
}

/// Current timestamp for log entries.
///
/// No portable timer in `core`: a monotonic event counter keeps entries ordered.
#[cfg(not(target_os = "espidf"))]
#[inline]
pub fn timestamp_us() -> i64 {
    static EVENTS: AtomicU32 = AtomicU32::new(0);
    i64::from(EVENTS.fetch_add(1, Ordering::Relaxed))
}

/// Log macro.
///
/// Use this on the keystroke path instead of writing to the session.
///
/// # Example
///
/// ```ignore
/// cli_log!(LogLevel::Info, CLI_LOG_STREAM, "token {} full", idx);
/// ```
#[macro_export]
macro_rules! cli_log {
    ($level:expr, $stream:expr, $($arg:tt)*) => {{
        let level = $level;
        if $stream.enabled(level) {
            let mut buf = [0u8; $crate::logging::MAX_MSG_LEN];
            let len = $crate::logging::format_to_buffer(&mut buf, format_args!($($arg)*));
            $stream.push($crate::logging::timestamp_us(), level, &buf[..len]);
        }
    }};
}

/// Info log.
#[macro_export]
macro_rules! cli_info {
    ($stream:expr, $($arg:tt)*) => {
        $crate::cli_log!($crate::logging::LogLevel::Info, $stream, $($arg)*)
    };
}

/// Warning log.
#[macro_export]
macro_rules! cli_warn {
    ($stream:expr, $($arg:tt)*) => {
        $crate::cli_log!($crate::logging::LogLevel::Warn, $stream, $($arg)*)
    };
}

/// Error log.
#[macro_export]
macro_rules! cli_error {
    ($stream:expr, $($arg:tt)*) => {
        $crate::cli_log!($crate::logging::LogLevel::Error, $stream, $($arg)*)
    };
}

/// Debug log.
#[macro_export]
macro_rules! cli_debug {
    ($stream:expr, $($arg:tt)*) => {
        $crate::cli_log!($crate::logging::LogLevel::Debug, $stream, $($arg)*)
    };
}

/// Trace log (maximum verbosity).
#[macro_export]
macro_rules! cli_trace {
    ($stream:expr, $($arg:tt)*) => {
        $crate::cli_log!($crate::logging::LogLevel::Trace, $stream, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_stream_basic() {
        let stream = LogStream::<16>::new();

        assert!(stream.push(1000, LogLevel::Info, b"test message"));
        assert!(stream.has_entries());
        assert_eq!(stream.pending(), 1);

        let entry = stream.drain().unwrap();
        assert_eq!(entry.timestamp_us, 1000);
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.message(), "test message");

        assert!(!stream.has_entries());
    }

    #[test]
    fn test_log_stream_full() {
        let stream = LogStream::<4>::new();

        assert!(stream.push(1, LogLevel::Info, b"1"));
        assert!(stream.push(2, LogLevel::Info, b"2"));
        assert!(stream.push(3, LogLevel::Info, b"3"));
        assert!(stream.push(4, LogLevel::Info, b"4"));

        // Should drop
        assert!(!stream.push(5, LogLevel::Info, b"5"));
        assert_eq!(stream.dropped(), 1);

        // Drain one, should be able to push again
        stream.drain();
        assert!(stream.push(6, LogLevel::Info, b"6"));

        stream.reset_dropped();
        assert_eq!(stream.dropped(), 0);
    }

    #[test]
    fn test_long_message_truncated() {
        let stream = LogStream::<4>::new();
        let long = [b'x'; MAX_MSG_LEN + 10];

        assert!(stream.push(0, LogLevel::Warn, &long));
        let entry = stream.drain().unwrap();
        assert_eq!(entry.len as usize, MAX_MSG_LEN);
    }

    #[test]
    fn test_format_to_buffer() {
        let mut buf = [0u8; 32];
        let len = format_to_buffer(&mut buf, format_args!("Hello {}", 42));
        assert_eq!(&buf[..len], b"Hello 42");
    }

    #[test]
    fn test_format_to_buffer_truncates() {
        let mut buf = [0u8; 4];
        let len = format_to_buffer(&mut buf, format_args!("{}", "truncated"));
        assert_eq!(&buf[..len], b"trun");
    }

    #[test]
    fn test_macro_pushes_formatted_entry() {
        let stream = LogStream::<8>::new();
        crate::cli_warn!(stream, "merge truncated {} bytes", 3);

        let entry = stream.drain().unwrap();
        assert_eq!(entry.level, LogLevel::Warn);
        assert_eq!(entry.message(), "merge truncated 3 bytes");
    }

    #[test]
    fn test_timestamps_monotonic() {
        let a = timestamp_us();
        let b = timestamp_us();
        assert!(b > a);
    }

    #[test]
    fn test_level_filter() {
        let stream = LogStream::<4>::new();
        assert_eq!(stream.max_level(), LogLevel::Info);

        assert!(!stream.push(0, LogLevel::Debug, b"hidden"));
        assert_eq!(stream.dropped(), 0);
        assert!(!stream.has_entries());

        stream.set_max_level(LogLevel::Trace);
        crate::cli_trace!(stream, "cursor {}", 1);
        assert_eq!(stream.drain().unwrap().message(), "cursor 1");
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Error < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Trace);
    }

    #[test]
    fn test_drain_waits_for_unpublished_slot() {
        let stream = LogStream::<4>::new();

        // A producer that claimed slot 0 but has not finished writing it
        stream.write_idx.store(1, Ordering::Release);
        assert_eq!(stream.pending(), 1);
        assert!(stream.drain().is_none());

        stream.ready[0].store(true, Ordering::Release);
        assert!(stream.drain().is_some());
        assert!(!stream.ready[0].load(Ordering::Acquire));
        assert_eq!(stream.pending(), 0);
    }

    #[test]
    fn test_multiple_producers() {
        use std::sync::Arc;
        use std::thread;

        let stream = Arc::new(LogStream::<64>::new());
        let mut handles = vec![];

        for i in 0..4 {
            let stream = Arc::clone(&stream);
            handles.push(thread::spawn(move || {
                for j in 0..10 {
                    let msg = format!("Session {} msg {}", i, j);
                    stream.push(j as i64, LogLevel::Info, msg.as_bytes());
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        let mut count = 0;
        while stream.drain().is_some() {
            count += 1;
        }
        assert_eq!(count + stream.dropped() as usize, 40);
        assert!(count > 0);
    }
}
