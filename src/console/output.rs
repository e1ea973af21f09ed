//! Output collaborator contract
//!
//! Backed by a UART, socket, SSH channel, or a test recorder. Implementations
//! translate `\n` to `\r\n` if the device needs it and own all framing and
//! backpressure. Nothing here allocates.

use super::format::{self, Arg};

/// Character sink for one console session
pub trait OutputStream {
    /// Print a single byte
    fn put_char(&mut self, ch: u8);

    /// Make pending output visible to the user
    fn flush(&mut self);

    /// Print a string with no formatting
    fn put_str(&mut self, s: &str) {
        for b in s.bytes() {
            self.put_char(b);
        }
    }

    /// Erase the character left of the cursor
    fn backspace(&mut self) {
        self.put_str("\x08 \x08");
    }

    /// Move the cursor one column left
    fn cursor_left(&mut self) {
        self.put_str("\x1b[D");
    }

    /// Move the cursor one column right
    fn cursor_right(&mut self) {
        self.put_str("\x1b[C");
    }

    /// Print `s` padded with `padding` to at least `min_len` bytes
    fn write_padded(&mut self, s: &str, min_len: usize, padding: u8, prepad: bool) {
        format::write_padded(self, s.as_bytes(), min_len, padding, prepad);
    }

    /// Minimal printf (`%d %c %s %x %X %%`, width, `0`, `-`).
    ///
    /// Does not flush.
    fn printf(&mut self, fmt: &str, args: &[Arg<'_>]) {
        format::printf(self, fmt, args);
    }

    /// Lets `write!` target an output stream without `alloc`
    fn write_fmt(&mut self, args: core::fmt::Arguments<'_>) -> core::fmt::Result {
        struct Adapter<'a, T: ?Sized>(&'a mut T);

        impl<T: OutputStream + ?Sized> core::fmt::Write for Adapter<'_, T> {
            fn write_str(&mut self, s: &str) -> core::fmt::Result {
                self.0.put_str(s);
                Ok(())
            }
        }

        core::fmt::write(&mut Adapter(self), args)
    }
}

impl<T: OutputStream + ?Sized> OutputStream for &mut T {
    fn put_char(&mut self, ch: u8) {
        (**self).put_char(ch);
    }

    fn flush(&mut self) {
        (**self).flush();
    }

    fn put_str(&mut self, s: &str) {
        (**self).put_str(s);
    }
}
