//! Log drain: formats `LogStream` entries for a byte sink.
//!
//! On ESP-IDF the sink is a UART TX driver; hosts pass any closure
//! (the demo binary writes to stderr).
//!
//! ```text
//! CLI_LOG_STREAM ──▶ drain_log() ──▶ "[timestamp] LEVEL: message\n" ──▶ sink
//! ```

use crate::logging::{LogEntry, LogStream};

#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::gpio;
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::peripheral::Peripheral;
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::uart::{self, UartTxDriver};

/// UART configuration for logging.
///
/// The TX pin is passed to `init_uart_logger` as a peripheral.
pub struct UartLoggerConfig {
    pub baud_rate: u32,
}

impl Default for UartLoggerConfig {
    fn default() -> Self {
        Self { baud_rate: 115200 }
    }
}

/// Bounded `core::fmt::Write` target over a byte slice.
struct BufWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl core::fmt::Write for BufWriter<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let bytes = s.as_bytes();
        let remaining = self.buf.len() - self.pos;
        let to_write = bytes.len().min(remaining);
        self.buf[self.pos..self.pos + to_write].copy_from_slice(&bytes[..to_write]);
        self.pos += to_write;
        Ok(())
    }
}

/// Format log entry to string.
///
/// Format: `[timestamp_us] LEVEL: message\n`
pub fn format_log_entry(entry: &LogEntry, buf: &mut [u8]) -> usize {
    use core::fmt::Write;

    let mut writer = BufWriter { buf, pos: 0 };
    let _ = writeln!(
        writer,
        "[{:10}] {}: {}",
        entry.timestamp_us,
        entry.level.as_str(),
        entry.message()
    );
    writer.pos
}

/// Format the dropped-entries report.
pub fn format_dropped_report(dropped: u32, buf: &mut [u8]) -> usize {
    use core::fmt::Write;

    let mut writer = BufWriter { buf, pos: 0 };
    let _ = writeln!(writer, "[WARN] Dropped: {}", dropped);
    writer.pos
}

/// Drain every pending entry of `stream` into `sink`.
///
/// A non-zero drop counter is reported once and reset.
/// Returns the number of entries written.
pub fn drain_log<const N: usize>(stream: &LogStream<N>, mut sink: impl FnMut(&[u8])) -> usize {
    let mut format_buf = [0u8; 256];
    let mut count = 0;

    while let Some(entry) = stream.drain() {
        let len = format_log_entry(&entry, &mut format_buf);
        sink(&format_buf[..len]);
        count += 1;
    }

    let dropped = stream.dropped();
    if dropped > 0 {
        let len = format_dropped_report(dropped, &mut format_buf);
        sink(&format_buf[..len]);
        stream.reset_dropped();
    }

    count
}

/// Initialize UART1 TX-only for logging output.
///
/// Returns a UartTxDriver configured for TX-only operation.
#[cfg(target_os = "espidf")]
pub fn init_uart_logger<'d>(
    uart: impl Peripheral<P = esp_idf_svc::hal::uart::UART1> + 'd,
    tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
    config: &UartLoggerConfig,
) -> Result<UartTxDriver<'d>, esp_idf_svc::sys::EspError> {
    let uart_config = uart::config::Config::default().baudrate(esp_idf_svc::hal::units::Hertz(config.baud_rate));

    UartTxDriver::new(
        uart,
        tx_pin,
        Option::<gpio::AnyIOPin>::None, // CTS
        Option::<gpio::AnyIOPin>::None, // RTS
        &uart_config,
    )
}

/// Drain the global console log to UART.
#[cfg(target_os = "espidf")]
pub fn drain_to_uart(uart: &mut UartTxDriver<'_>) -> usize {
    drain_log(&crate::CLI_LOG_STREAM, |bytes| {
        let _ = uart.write(bytes);
    })
}
