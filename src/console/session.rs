//! Per-transport session behavior
//!
//! The editor is generic over a `Session`; a UART console and an SSH channel
//! differ only in how they prompt and what they run.

use super::command_line::CommandLine;
use super::output::OutputStream;

/// Application hooks injected into the editor
pub trait Session {
    /// Print the command prompt
    fn print_prompt(&mut self, username: &str, out: &mut dyn OutputStream);

    /// Run a fully resolved line.
    ///
    /// Every word of `line` carries its resolved id; output goes to `out`.
    fn on_execute(&mut self, line: &CommandLine, out: &mut dyn OutputStream);
}

impl<S: Session + ?Sized> Session for &mut S {
    fn print_prompt(&mut self, username: &str, out: &mut dyn OutputStream) {
        (**self).print_prompt(username, out);
    }

    fn on_execute(&mut self, line: &CommandLine, out: &mut dyn OutputStream) {
        (**self).on_execute(line, out);
    }
}
