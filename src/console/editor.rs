//! Line editor state machine
//!
//! Consumes raw keystrokes one at a time, keeps the token buffer and the
//! terminal in step, and hands finished lines to the resolver.
//!
//! Cursor model: `current_token` is the slot being edited and
//! `token_offset` the byte offset inside it (`0..=len`). On screen the
//! line is every slot up to the last one, joined by single spaces, so the
//! cursor column is `sum(len + 1)` over earlier slots plus `token_offset`.
//!
//! Capacity overflow never surfaces to the user: a full token drops the
//! character, a full line drops the space, a merge past capacity truncates.

use super::command_line::CommandLine;
use super::error::ConsoleError;
use super::grammar::Grammar;
use super::help;
use super::output::OutputStream;
use super::resolver::{resolve, walk};
use super::session::Session;
use super::token::Token;
use crate::config::MAX_USERNAME_LEN;
use crate::logging::LogStream;
use crate::{cli_debug, cli_info, cli_trace, cli_warn};

/// Escape sequence decoder state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeState {
    /// Plain input
    Normal,
    /// Got ESC
    ExpectBracket,
    /// Got ESC [ (stays here through CSI parameter bytes)
    ExpectPayload,
}

/// Console session editor
pub struct Editor<'g, O, S> {
    output: O,
    session: S,
    grammar: Option<Grammar<'g>>,
    line: CommandLine,
    username: [u8; MAX_USERNAME_LEN],
    escape_state: EscapeState,
    /// Highest slot with text, never below `current_token`
    last_token: usize,
    current_token: usize,
    token_offset: usize,
    /// Previous byte was CR (swallow the LF of a CRLF pair)
    after_cr: bool,
    log: &'static LogStream,
}

/// Text of a NUL-padded buffer
fn nul_str(buf: &[u8]) -> &str {
    let len = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    core::str::from_utf8(&buf[..len]).unwrap_or("")
}

impl<'g, O: OutputStream, S: Session> Editor<'g, O, S> {
    /// Create an editor with an empty line.
    ///
    /// With `grammar` set to `None` every command fails with
    /// "No commands configured".
    pub fn new(grammar: Option<Grammar<'g>>, output: O, session: S) -> Self {
        Self {
            output,
            session,
            grammar,
            line: CommandLine::new(),
            username: [0u8; MAX_USERNAME_LEN],
            escape_state: EscapeState::Normal,
            last_token: 0,
            current_token: 0,
            token_offset: 0,
            after_cr: false,
            log: &crate::CLI_LOG_STREAM,
        }
    }

    /// Log to `log` instead of the global stream
    pub fn with_log_stream(mut self, log: &'static LogStream) -> Self {
        self.log = log;
        self
    }

    /// Reset all editing state and set the session user.
    ///
    /// The username may be empty (e.g. UART without login); it is truncated
    /// to `MAX_USERNAME_LEN - 1` bytes.
    pub fn initialize(&mut self, username: &str) {
        let bytes = username.as_bytes();
        let mut take = bytes.len().min(MAX_USERNAME_LEN - 1);
        while !username.is_char_boundary(take) {
            take -= 1;
        }
        self.username = [0u8; MAX_USERNAME_LEN];
        self.username[..take].copy_from_slice(&bytes[..take]);

        self.line.clear();
        self.escape_state = EscapeState::Normal;
        self.last_token = 0;
        self.current_token = 0;
        self.token_offset = 0;
        self.after_cr = false;
    }

    /// Print the first prompt
    pub fn start(&mut self) {
        self.print_prompt();
        self.output.flush();
    }

    /// Replace the grammar
    pub fn set_grammar(&mut self, grammar: Option<Grammar<'g>>) {
        self.grammar = grammar;
    }

    /// Process a single keystroke.
    ///
    /// The only input entry point. Output is flushed once per keystroke.
    pub fn process_byte(&mut self, byte: u8) {
        let was_normal = self.escape_state == EscapeState::Normal;

        match self.escape_state {
            EscapeState::Normal => self.process_normal(byte),
            EscapeState::ExpectBracket => {
                // Anything but '[' is a malformed sequence: drop it
                self.escape_state = if byte == b'[' {
                    EscapeState::ExpectPayload
                } else {
                    EscapeState::Normal
                };
            }
            EscapeState::ExpectPayload => match byte {
                b'C' => {
                    self.escape_state = EscapeState::Normal;
                    self.on_arrow_right();
                }
                b'D' => {
                    self.escape_state = EscapeState::Normal;
                    self.on_arrow_left();
                }
                // Parameter and intermediate bytes: sequence not over yet
                0x20..=0x3F => {}
                _ => self.escape_state = EscapeState::Normal,
            },
        }

        self.after_cr = was_normal && byte == b'\r';
        self.update_last_token();
        self.output.flush();

        cli_trace!(
            self.log,
            "cursor: char {} of token {}/{}",
            self.token_offset,
            self.current_token,
            self.last_token
        );
    }

    /// Feed a run of keystrokes
    pub fn process_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.process_byte(b);
        }
    }

    fn process_normal(&mut self, byte: u8) {
        match byte {
            b'\n' if self.after_cr => {}
            b'\r' | b'\n' => self.on_enter(),
            0x08 | 0x7F => self.on_backspace(),
            b'\t' => self.on_tab(),
            b'?' => self.on_help(),
            b' ' => self.on_space(),
            0x1B => self.escape_state = EscapeState::ExpectBracket,
            // Ctrl+C
            0x03 => self.on_cancel(),
            0x21..=0x7E => self.on_char(byte),
            _ => {}
        }
    }

    /// Recompute the highest slot in use
    fn update_last_token(&mut self) {
        self.last_token = self
            .line
            .highest_non_empty()
            .unwrap_or(0)
            .max(self.current_token);
    }

    fn print_prompt(&mut self) {
        let username = nul_str(&self.username);
        self.session.print_prompt(username, &mut self.output);
    }

    fn on_char(&mut self, c: u8) {
        let token = &mut self.line[self.current_token];
        let len = token.len();
        if len >= Token::CAPACITY {
            cli_debug!(self.log, "token {} full, dropped {:#04x}", self.current_token, c);
            return;
        }

        // Appending to the very end of the line needs no redraw
        let at_tail = self.token_offset == len && self.current_token == self.last_token;

        token.insert(self.token_offset, c);
        self.token_offset += 1;
        self.output.put_char(c);

        if !at_tail {
            self.redraw_right_of_cursor();
        }
    }

    fn on_tab(&mut self) {
        cli_debug!(self.log, "tab completion not implemented");
    }

    fn on_backspace(&mut self) {
        if self.token_offset > 0 {
            // Mid/end of a token: delete the character left of the cursor
            self.output.backspace();
            self.token_offset -= 1;
            self.line[self.current_token].remove(self.token_offset);
        } else if self.current_token > 0 {
            // Start of a token: step over the separator (already blank on
            // screen) and merge this token into the previous one
            self.output.cursor_left();
            self.current_token -= 1;
            self.token_offset = self.line[self.current_token].len();

            let merged = self.line[self.current_token + 1];
            let lost = self.line[self.current_token].append(merged.as_bytes());
            if lost > 0 {
                cli_warn!(
                    self.log,
                    "merge into token {} truncated {} chars",
                    self.current_token,
                    lost
                );
            }
            self.line.remove_slot(self.current_token + 1);
        }

        self.redraw_right_of_cursor();
    }

    fn on_space(&mut self) {
        if self.last_token >= CommandLine::SLOTS - 1 {
            cli_debug!(self.log, "token slots exhausted, space dropped");
            return;
        }

        // Runs of spaces never create more than one empty slot
        if self.line[self.current_token].is_empty() {
            return;
        }

        self.output.put_char(b' ');

        if self.token_offset == self.line[self.current_token].len() {
            // End of token: move to a fresh slot, opening one if words follow
            self.current_token += 1;
            if self.current_token <= self.last_token {
                self.line.insert_slot(self.current_token);
            }
        } else {
            // Mid-token: the right half becomes a new word
            let right = self.line[self.current_token].split_off(self.token_offset);
            self.line.insert_slot(self.current_token + 1);
            self.line[self.current_token + 1] = right;
            self.current_token += 1;
        }
        self.token_offset = 0;

        self.redraw_right_of_cursor();
    }

    fn on_arrow_left(&mut self) {
        if self.token_offset > 0 {
            self.token_offset -= 1;
            self.output.cursor_left();
        } else if self.current_token > 0 {
            self.output.cursor_left();
            self.current_token -= 1;
            self.token_offset = self.line[self.current_token].len();
        }
    }

    fn on_arrow_right(&mut self) {
        if self.token_offset < self.line[self.current_token].len() {
            self.token_offset += 1;
            self.output.cursor_right();
        } else if self.current_token < self.last_token {
            self.current_token += 1;
            self.token_offset = 0;
            self.output.cursor_right();
        }
    }

    fn on_enter(&mut self) {
        self.output.put_char(b'\n');
        self.on_line_ready();

        if !self.line.is_blank() {
            match resolve(&mut self.line, self.grammar.as_ref()) {
                Ok(()) => self.session.on_execute(&self.line, &mut self.output),
                Err(e) => {
                    cli_info!(self.log, "rejected: {}", e);
                    e.report(&self.line, &mut self.output);
                }
            }
        }

        self.on_execute_complete();
    }

    fn on_cancel(&mut self) {
        self.output.put_str("^C\n");
        self.on_execute_complete();
    }

    /// Squeeze empty slots out of the line before resolution
    fn on_line_ready(&mut self) {
        let words = self.line.compact();
        self.last_token = words.saturating_sub(1);
        self.current_token = self.current_token.min(self.last_token);
        self.token_offset = self.token_offset.min(self.line[self.current_token].len());
    }

    /// Reset for the next line and prompt for it
    fn on_execute_complete(&mut self) {
        self.line.clear();
        self.last_token = 0;
        self.current_token = 0;
        self.token_offset = 0;
        self.escape_state = EscapeState::Normal;
        self.print_prompt();
    }

    /// List what may be typed at the cursor, then restore the line
    fn on_help(&mut self) {
        self.output.put_char(b'\n');

        match self.grammar {
            None => ConsoleError::NoGrammar.report(&self.line, &mut self.output),
            Some(grammar) => {
                let current = &self.line[self.current_token];
                let prefix = if current.is_empty() { None } else { Some(current.as_str()) };

                match walk(&self.line, grammar.root(), self.current_token) {
                    Ok(Some(node)) => {
                        if help::print_help(node, prefix, &mut self.output) == 0 {
                            cli_debug!(self.log, "help: nothing matches at token {}", self.current_token);
                        }
                    }
                    // Words after a complete command never match
                    Ok(None) if prefix.is_some() => {
                        ConsoleError::Unrecognized { index: self.current_token }.report(&self.line, &mut self.output)
                    }
                    Ok(None) => help::print_end_of_command(&mut self.output),
                    Err(e) => e.report(&self.line, &mut self.output),
                }
            }
        }

        self.print_prompt();
        self.reprint_line();
    }

    /// Print the whole line after a fresh prompt and park the cursor
    fn reprint_line(&mut self) {
        let end = self.last_token.max(self.current_token);
        let mut printed = 0;
        let mut cursor_col = 0;

        for i in 0..=end {
            if i > 0 {
                self.output.put_char(b' ');
                printed += 1;
            }
            if i == self.current_token {
                cursor_col = printed + self.token_offset;
            }
            let token = &self.line[i];
            self.output.put_str(token.as_str());
            printed += token.len();
        }

        for _ in cursor_col..printed {
            self.output.cursor_left();
        }
    }

    /// Repaint everything right of the cursor and move the cursor back
    fn redraw_right_of_cursor(&mut self) {
        let end = self
            .line
            .highest_non_empty()
            .unwrap_or(0)
            .max(self.current_token);

        // Remainder of this token
        let rest = self.line[self.current_token].tail(self.token_offset);
        let mut drawn = rest.len();
        for &b in rest {
            self.output.put_char(b);
        }

        // Every later token
        for i in self.current_token + 1..=end {
            let token = &self.line[i];
            self.output.put_char(b' ');
            self.output.put_str(token.as_str());
            drawn += token.len() + 1;
        }

        // Blank out whatever a shorter line left behind
        self.output.put_char(b' ');
        drawn += 1;

        for _ in 0..drawn {
            self.output.cursor_left();
        }
    }

    /// The line being edited
    pub fn line(&self) -> &CommandLine {
        &self.line
    }

    /// Cursor as (token index, offset within token)
    pub fn cursor(&self) -> (usize, usize) {
        (self.current_token, self.token_offset)
    }

    /// Highest slot in use
    pub fn last_token(&self) -> usize {
        self.last_token
    }

    /// Escape decoder state
    pub fn escape_state(&self) -> EscapeState {
        self.escape_state
    }

    /// Session user
    pub fn username(&self) -> &str {
        nul_str(&self.username)
    }

    /// Output collaborator
    pub fn output(&self) -> &O {
        &self.output
    }

    /// Output collaborator (mutable, e.g. to drain a test recorder)
    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Session hooks
    pub fn session(&self) -> &S {
        &self.session
    }

    /// Session hooks (mutable)
    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }
}
