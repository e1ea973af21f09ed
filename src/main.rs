//! embedded-cli demo console
//!
//! One session over stdin/stdout on hosts, over UART0 on ESP-IDF.
//! On a host terminal run with `stty raw -echo` so keystrokes arrive
//! unbuffered and are echoed only by the editor.

use embedded_cli::console::{CommandId, CommandLine, Keyword, OutputStream, Session, Token};
use embedded_cli::{LogLevel, CLI_LOG_STREAM, VERSION};

// --- Grammar ---

const CMD_ECHO: CommandId = CommandId(1);
const CMD_EXIT: CommandId = CommandId(2);
const CMD_SET: CommandId = CommandId(3);
const CMD_SHOW: CommandId = CommandId(4);
const CMD_SHUTDOWN: CommandId = CommandId(5);
const CMD_HOSTNAME: CommandId = CommandId(10);
const CMD_LOGLEVEL: CommandId = CommandId(11);
const CMD_VERSION: CommandId = CommandId(12);
const CMD_LOG: CommandId = CommandId(13);
const CMD_USER: CommandId = CommandId(14);
const LVL_DEBUG: CommandId = CommandId(20);
const LVL_ERROR: CommandId = CommandId(21);
const LVL_INFO: CommandId = CommandId(22);
const LVL_TRACE: CommandId = CommandId(23);
const LVL_WARN: CommandId = CommandId(24);

const ECHO_ARGS: &[Keyword<'static>] = &[Keyword::text("<text>", "Text to print")];

const HOSTNAME_ARGS: &[Keyword<'static>] = &[Keyword::freeform("<name>", None, "New hostname")];

const LEVELS: &[Keyword<'static>] = &[
    Keyword::leaf("debug", LVL_DEBUG, "Debug and above"),
    Keyword::leaf("error", LVL_ERROR, "Errors only"),
    Keyword::leaf("info", LVL_INFO, "Info and above (default)"),
    Keyword::leaf("trace", LVL_TRACE, "Everything, including cursor dumps"),
    Keyword::leaf("warn", LVL_WARN, "Warnings and errors"),
];

const SET_ARGS: &[Keyword<'static>] = &[
    Keyword::node("hostname", CMD_HOSTNAME, HOSTNAME_ARGS, "Set the prompt hostname"),
    Keyword::node("loglevel", CMD_LOGLEVEL, LEVELS, "Set diagnostic log verbosity"),
];

const SHOW_ARGS: &[Keyword<'static>] = &[
    Keyword::leaf("log", CMD_LOG, "Diagnostic log status"),
    Keyword::leaf("user", CMD_USER, "Logged in user"),
    Keyword::leaf("version", CMD_VERSION, "Firmware version"),
];

static ROOT: &[Keyword<'static>] = &[
    Keyword::node("echo", CMD_ECHO, ECHO_ARGS, "Print text"),
    Keyword::leaf("exit", CMD_EXIT, "End the session"),
    Keyword::node("set", CMD_SET, SET_ARGS, "Change settings"),
    Keyword::node("show", CMD_SHOW, SHOW_ARGS, "Show state"),
    Keyword::leaf("shutdown", CMD_SHUTDOWN, "End the session"),
];

// --- Session ---

struct DemoSession {
    hostname: Token,
    user: Token,
    exit_requested: bool,
}

impl DemoSession {
    fn new() -> Self {
        let mut hostname = Token::new();
        hostname.set("cli");
        Self { hostname, user: Token::new(), exit_requested: false }
    }

    fn show(&mut self, line: &CommandLine, out: &mut dyn OutputStream) {
        match line.id(1) {
            CMD_VERSION => {
                let _ = writeln!(out, "{}", VERSION);
            }
            CMD_USER => {
                let _ = writeln!(out, "user: {}", if self.user.is_empty() { "(none)" } else { self.user.as_str() });
            }
            CMD_LOG => {
                let _ = writeln!(
                    out,
                    "level {}, {} pending, {} dropped",
                    CLI_LOG_STREAM.max_level().as_str(),
                    CLI_LOG_STREAM.pending(),
                    CLI_LOG_STREAM.dropped()
                );
            }
            _ => {}
        }
    }

    fn set(&mut self, line: &CommandLine, out: &mut dyn OutputStream) {
        match line.id(1) {
            CMD_HOSTNAME => {
                self.hostname.set(line[2].as_str());
                let _ = writeln!(out, "hostname={}", self.hostname.as_str());
            }
            CMD_LOGLEVEL => {
                let level = match line.id(2) {
                    LVL_DEBUG => LogLevel::Debug,
                    LVL_ERROR => LogLevel::Error,
                    LVL_TRACE => LogLevel::Trace,
                    LVL_WARN => LogLevel::Warn,
                    _ => LogLevel::Info,
                };
                CLI_LOG_STREAM.set_max_level(level);
                let _ = writeln!(out, "loglevel={}", level.as_str());
            }
            _ => {}
        }
    }
}

impl Session for DemoSession {
    fn print_prompt(&mut self, username: &str, out: &mut dyn OutputStream) {
        self.user.set(username);
        if username.is_empty() {
            let _ = write!(out, "{}> ", self.hostname.as_str());
        } else {
            let _ = write!(out, "{}@{}> ", username, self.hostname.as_str());
        }
    }

    fn on_execute(&mut self, line: &CommandLine, out: &mut dyn OutputStream) {
        match line.id(0) {
            CMD_ECHO => {
                for (i, word) in line.words().skip(1).enumerate() {
                    if i > 0 {
                        out.put_char(b' ');
                    }
                    out.put_str(word.as_str());
                }
                out.put_char(b'\n');
            }
            CMD_SHOW => self.show(line, out),
            CMD_SET => self.set(line, out),
            CMD_EXIT | CMD_SHUTDOWN => {
                out.put_str("bye\n");
                self.exit_requested = true;
            }
            _ => {}
        }
    }
}

fn print_banner(out: &mut dyn OutputStream) {
    let _ = writeln!(out, "\n{}", VERSION);
    out.put_str("Type '?' for commands.\n");
}

// --- Host transport ---

#[cfg(not(target_os = "espidf"))]
mod host {
    use std::io::{Read, Write};

    use embedded_cli::console::{Editor, Grammar, OutputStream};
    use embedded_cli::uart_logger::drain_log;
    use embedded_cli::CLI_LOG_STREAM;

    use super::{print_banner, DemoSession, ROOT};

    /// Buffered stdout with `\n` -> `\r\n` translation (raw terminals need it)
    struct StdoutStream {
        buf: [u8; 512],
        len: usize,
    }

    impl StdoutStream {
        fn new() -> Self {
            Self { buf: [0u8; 512], len: 0 }
        }
    }

    impl OutputStream for StdoutStream {
        fn put_char(&mut self, ch: u8) {
            if self.len + 2 > self.buf.len() {
                self.flush();
            }
            if ch == b'\n' {
                self.buf[self.len] = b'\r';
                self.len += 1;
            }
            self.buf[self.len] = ch;
            self.len += 1;
        }

        fn flush(&mut self) {
            let mut stdout = std::io::stdout().lock();
            let _ = stdout.write_all(&self.buf[..self.len]);
            let _ = stdout.flush();
            self.len = 0;
        }
    }

    pub fn run() -> std::io::Result<()> {
        let grammar = Grammar::new(ROOT).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, format!("invalid grammar: {}", e))
        })?;

        let mut editor = Editor::new(Some(grammar), StdoutStream::new(), DemoSession::new());
        editor.initialize(&std::env::var("USER").unwrap_or_default());
        print_banner(editor.output_mut());
        editor.start();

        let mut input = std::io::stdin().lock();
        let mut byte = [0u8; 1];

        while !editor.session().exit_requested {
            if input.read(&mut byte)? == 0 {
                break;
            }
            editor.process_byte(byte[0]);

            drain_log(&CLI_LOG_STREAM, |bytes| {
                let _ = std::io::stderr().write_all(bytes);
            });
        }

        Ok(())
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() -> std::io::Result<()> {
    host::run()
}

// --- ESP-IDF transport ---

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_svc::hal::gpio;
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::hal::uart::{self, UartDriver};
    use esp_idf_svc::hal::units::Hertz;
    use esp_idf_svc::sys::EspError;

    use embedded_cli::console::{Editor, Grammar, OutputStream};
    use embedded_cli::uart_logger::{drain_to_uart, init_uart_logger, UartLoggerConfig};
    use embedded_cli::{cli_error, CLI_LOG_STREAM};

    use super::{print_banner, DemoSession, ROOT};

    /// Console UART output, buffered until the editor flushes
    struct UartStream<'a, 'd> {
        uart: &'a UartDriver<'d>,
        buf: [u8; 256],
        len: usize,
    }

    impl OutputStream for UartStream<'_, '_> {
        fn put_char(&mut self, ch: u8) {
            if self.len + 2 > self.buf.len() {
                self.flush();
            }
            if ch == b'\n' {
                self.buf[self.len] = b'\r';
                self.len += 1;
            }
            self.buf[self.len] = ch;
            self.len += 1;
        }

        fn flush(&mut self) {
            let mut sent = 0;
            while sent < self.len {
                match self.uart.write(&self.buf[sent..self.len]) {
                    Ok(n) => sent += n,
                    Err(_) => break,
                }
            }
            self.len = 0;
        }
    }

    pub fn run() -> Result<(), EspError> {
        let peripherals = Peripherals::take()?;

        let console_config = uart::config::Config::default().baudrate(Hertz(115_200));
        let console = UartDriver::new(
            peripherals.uart0,
            peripherals.pins.gpio43,
            peripherals.pins.gpio44,
            Option::<gpio::AnyIOPin>::None, // CTS
            Option::<gpio::AnyIOPin>::None, // RTS
            &console_config,
        )?;
        let mut log_uart = init_uart_logger(peripherals.uart1, peripherals.pins.gpio6, &UartLoggerConfig::default())?;

        let grammar = match Grammar::new(ROOT) {
            Ok(g) => Some(g),
            Err(e) => {
                cli_error!(CLI_LOG_STREAM, "invalid grammar: {}", e);
                None
            }
        };

        let output = UartStream { uart: &console, buf: [0u8; 256], len: 0 };
        let mut editor = Editor::new(grammar, output, DemoSession::new());
        editor.initialize("");
        print_banner(editor.output_mut());
        editor.start();

        let mut byte = [0u8; 1];
        loop {
            // 10 tick timeout keeps the log drained while idle
            if console.read(&mut byte, 10)? == 1 {
                editor.process_byte(byte[0]);
            }
            drain_to_uart(&mut log_uart);

            if editor.session().exit_requested {
                // A serial console has no hangup: start a fresh session
                editor.session_mut().exit_requested = false;
                editor.initialize("");
                editor.start();
            }
        }
    }
}

#[cfg(target_os = "espidf")]
fn main() -> Result<(), esp_idf_svc::sys::EspError> {
    esp_idf_svc::sys::link_patches();
    esp::run()
}
