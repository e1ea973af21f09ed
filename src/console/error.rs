//! Console error types

use super::command_line::CommandLine;
use super::output::OutputStream;
use super::format::Arg;

/// Resolution failure with code and message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleError<'g> {
    /// E01: Word matched no keyword at its level
    Unrecognized { index: usize },
    /// E02: Word abbreviates two adjacent keywords
    Ambiguous { index: usize, first: &'g str, second: &'g str },
    /// E03: Line ended where more words are required
    Incomplete { index: usize },
    /// E04: No grammar configured
    NoGrammar,
}

impl ConsoleError<'_> {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unrecognized { .. } => "E01",
            Self::Ambiguous { .. } => "E02",
            Self::Incomplete { .. } => "E03",
            Self::NoGrammar => "E04",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::Unrecognized { .. } => "unrecognized command",
            Self::Ambiguous { .. } => "ambiguous command",
            Self::Incomplete { .. } => "incomplete command",
            Self::NoGrammar => "no commands configured",
        }
    }

    /// Word index the failure refers to, if any
    pub fn index(&self) -> Option<usize> {
        match *self {
            Self::Unrecognized { index } | Self::Ambiguous { index, .. } | Self::Incomplete { index } => {
                Some(index)
            }
            Self::NoGrammar => None,
        }
    }

    /// Print the user-facing report for this failure.
    ///
    /// Names the offending word from `line` and, for ambiguity, both candidates.
    pub fn report(&self, line: &CommandLine, out: &mut dyn OutputStream) {
        let typed = self
            .index()
            .and_then(|i| line.get(i))
            .map_or("", |t| t.as_str());

        match *self {
            Self::Unrecognized { index } => out.printf(
                "Unrecognized command (at word %d): you typed \"%s\", but this did not match any known commands\n",
                &[Arg::Uint(index as u32), Arg::Str(typed)],
            ),
            Self::Ambiguous { index, first, second } => out.printf(
                "Ambiguous command (at word %d): you typed \"%s\", but this could be short for \"%s\" or \"%s\"\n",
                &[Arg::Uint(index as u32), Arg::Str(typed), Arg::Str(first), Arg::Str(second)],
            ),
            Self::Incomplete { index } => {
                out.printf("Incomplete command (at word %d)\n", &[Arg::Uint(index as u32)])
            }
            Self::NoGrammar => out.put_str("No commands configured\n"),
        }
    }
}

impl core::fmt::Display for ConsoleError<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())?;
        match self {
            Self::Ambiguous { index, first, second } => {
                write!(f, " at word {} (\"{}\" or \"{}\")", index, first, second)
            }
            Self::Unrecognized { index } | Self::Incomplete { index } => write!(f, " at word {}", index),
            Self::NoGrammar => Ok(()),
        }
    }
}
