//! Shared test fixtures: recording output, a one-screen terminal model,
//! a recording session and a small grammar.

#![allow(dead_code)]

use embedded_cli::console::{CommandId, CommandLine, Editor, Grammar, Keyword, OutputStream, Session};

// --- Grammar ---

pub const CMD_ECHO: CommandId = CommandId(1);
pub const CMD_RELOAD: CommandId = CommandId(2);
pub const CMD_IN: CommandId = CommandId(3);
pub const CMD_SET: CommandId = CommandId(4);
pub const CMD_HOSTNAME: CommandId = CommandId(5);
pub const CMD_SHOW: CommandId = CommandId(6);
pub const CMD_INTERFACES: CommandId = CommandId(7);
pub const CMD_VERSION: CommandId = CommandId(8);
pub const CMD_SHUTDOWN: CommandId = CommandId(9);

const ECHO_ARGS: &[Keyword<'static>] = &[Keyword::text("<text>", "Text to print")];

const IN_ARGS: &[Keyword<'static>] = &[Keyword::freeform("<minutes>", None, "Delay in minutes")];

const RELOAD_ARGS: &[Keyword<'static>] = &[
    Keyword::node("in", CMD_IN, IN_ARGS, "Reload after a delay"),
    Keyword::optional("Reload now"),
];

const HOSTNAME_ARGS: &[Keyword<'static>] = &[Keyword::freeform("<name>", None, "New hostname")];

const SET_ARGS: &[Keyword<'static>] = &[Keyword::node("hostname", CMD_HOSTNAME, HOSTNAME_ARGS, "Host name")];

const SHOW_ARGS: &[Keyword<'static>] = &[
    Keyword::leaf("interfaces", CMD_INTERFACES, "Interface status"),
    Keyword::leaf("version", CMD_VERSION, "Firmware version"),
];

pub static ROOT: &[Keyword<'static>] = &[
    Keyword::node("echo", CMD_ECHO, ECHO_ARGS, "Print text"),
    Keyword::node("reload", CMD_RELOAD, RELOAD_ARGS, "Restart the device"),
    Keyword::node("set", CMD_SET, SET_ARGS, "Change settings"),
    Keyword::node("show", CMD_SHOW, SHOW_ARGS, "Show state"),
    Keyword::leaf("shutdown", CMD_SHUTDOWN, "Power off"),
];

pub fn grammar() -> Grammar<'static> {
    Grammar::new(ROOT).expect("test grammar is valid")
}

/// Build a line from words, one per slot
pub fn line_of(words: &[&str]) -> CommandLine {
    let mut line = CommandLine::new();
    for (i, w) in words.iter().enumerate() {
        line[i].set(w);
    }
    line
}

// --- Output ---

/// Records every byte and counts flushes
#[derive(Default)]
pub struct Recorder {
    pub bytes: Vec<u8>,
    pub flushes: usize,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    /// Return and forget everything recorded so far
    pub fn take(&mut self) -> String {
        let text = self.text();
        self.bytes.clear();
        text
    }

    pub fn contains(&self, s: &str) -> bool {
        self.text().contains(s)
    }
}

impl OutputStream for Recorder {
    fn put_char(&mut self, ch: u8) {
        self.bytes.push(ch);
    }

    fn flush(&mut self) {
        self.flushes += 1;
    }
}

// --- Terminal model ---

/// Minimal VT100 model: printable bytes, BS, CR, LF, ESC[C and ESC[D
pub struct Screen {
    rows: Vec<Vec<u8>>,
    col: usize,
}

impl Screen {
    pub fn render(bytes: &[u8]) -> Self {
        let mut screen = Self { rows: vec![Vec::new()], col: 0 };
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                0x1b if bytes.get(i + 1) == Some(&b'[') => {
                    match bytes.get(i + 2) {
                        Some(b'C') => screen.col += 1,
                        Some(b'D') => screen.col = screen.col.saturating_sub(1),
                        other => panic!("unexpected CSI final byte {:?}", other),
                    }
                    i += 2;
                }
                b'\n' => {
                    screen.rows.push(Vec::new());
                    screen.col = 0;
                }
                b'\r' => screen.col = 0,
                0x08 => screen.col = screen.col.saturating_sub(1),
                b @ 0x20..=0x7e => screen.put(b),
                other => panic!("unexpected byte {:#04x} on screen", other),
            }
            i += 1;
        }
        screen
    }

    fn put(&mut self, b: u8) {
        let col = self.col;
        let Some(row) = self.rows.last_mut() else {
            return;
        };
        if row.len() <= col {
            row.resize(col + 1, b' ');
        }
        row[col] = b;
        self.col += 1;
    }

    /// Row holding the cursor, trailing blanks removed
    pub fn line(&self) -> String {
        let row = self.rows.last().map(Vec::as_slice).unwrap_or(&[]);
        String::from_utf8_lossy(row).trim_end().to_string()
    }

    /// Every row, trailing blanks removed
    pub fn rows(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|r| String::from_utf8_lossy(r).trim_end().to_string())
            .collect()
    }

    pub fn cursor(&self) -> usize {
        self.col
    }
}

// --- Session ---

/// Records executed lines as (word, id) pairs
#[derive(Default)]
pub struct TestSession {
    pub executed: Vec<Vec<(String, CommandId)>>,
    pub prompts: usize,
}

impl Session for TestSession {
    fn print_prompt(&mut self, username: &str, out: &mut dyn OutputStream) {
        self.prompts += 1;
        out.put_str(username);
        out.put_str("> ");
    }

    fn on_execute(&mut self, line: &CommandLine, out: &mut dyn OutputStream) {
        self.executed
            .push(line.words().map(|t| (t.as_str().to_string(), t.id())).collect());
        out.put_str("ok\n");
    }
}

pub type TestEditor = Editor<'static, Recorder, TestSession>;

/// Editor over the test grammar with its first prompt already printed
pub fn editor() -> TestEditor {
    let mut editor = Editor::new(Some(grammar()), Recorder::new(), TestSession::default());
    editor.initialize("");
    editor.start();
    editor
}

pub fn screen(editor: &TestEditor) -> Screen {
    Screen::render(&editor.output().bytes)
}

pub const LEFT: &[u8] = b"\x1b[D";
pub const RIGHT: &[u8] = b"\x1b[C";
