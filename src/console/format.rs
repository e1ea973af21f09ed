//! Allocation-free printf subset
//!
//! `%d %c %s %x %X %%` with optional `-` (left-justify), `0` (zero-pad) and a
//! decimal field width. Unknown conversions and missing or mismatched
//! arguments print `*`. Lighter than `core::fmt` and never allocates,
//! unlike most embedded libc printf implementations.

use super::output::OutputStream;

/// One printf argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg<'a> {
    Int(i32),
    Uint(u32),
    Char(u8),
    Str(&'a str),
}

/// Print `s` with `padding` before (prepad) or after it up to `min_len` bytes
pub fn write_padded<O: OutputStream + ?Sized>(out: &mut O, s: &[u8], min_len: usize, padding: u8, prepad: bool) {
    let npads = min_len.saturating_sub(s.len());

    if prepad {
        for _ in 0..npads {
            out.put_char(padding);
        }
    }
    for &b in s {
        out.put_char(b);
    }
    if !prepad {
        for _ in 0..npads {
            out.put_char(padding);
        }
    }
}

/// Decimal digits of `n` (with sign) into the tail of `buf`
fn format_decimal(n: i64, buf: &mut [u8; 24]) -> &[u8] {
    let negative = n < 0;
    let mut v = n.unsigned_abs();
    let mut pos = buf.len();

    loop {
        pos -= 1;
        buf[pos] = b'0' + (v % 10) as u8;
        v /= 10;
        if v == 0 {
            break;
        }
    }
    if negative {
        pos -= 1;
        buf[pos] = b'-';
    }
    &buf[pos..]
}

/// Hex digits of `v`, no leading zeros, into the tail of `buf`
fn format_hex(mut v: u32, upper: bool, buf: &mut [u8; 24]) -> &[u8] {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";
    let digits = if upper { HEX_UPPER } else { HEX };
    let mut pos = buf.len();

    loop {
        pos -= 1;
        buf[pos] = digits[(v & 0xf) as usize];
        v >>= 4;
        if v == 0 {
            break;
        }
    }
    &buf[pos..]
}

/// Format `fmt` with `args` into `out`
pub fn printf<O: OutputStream + ?Sized>(out: &mut O, fmt: &str, args: &[Arg<'_>]) {
    let bytes = fmt.as_bytes();
    let mut args = args.iter();
    let mut buf = [0u8; 24];
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        i += 1;
        if c != b'%' {
            out.put_char(c);
            continue;
        }

        // Specifier: [-][0][width]type
        let mut prepad = true;
        let mut padchar = b' ';
        let mut width = 0usize;

        if bytes.get(i) == Some(&b'-') {
            prepad = false;
            i += 1;
        }
        if bytes.get(i) == Some(&b'0') {
            padchar = b'0';
            i += 1;
        }
        while let Some(d) = bytes.get(i).filter(|b| b.is_ascii_digit()) {
            width = width.saturating_mul(10).saturating_add((d - b'0') as usize);
            i += 1;
        }
        if !prepad {
            padchar = b' ';
        }

        let Some(&kind) = bytes.get(i) else {
            out.put_char(b'*');
            break;
        };
        i += 1;

        match kind {
            b'%' => out.put_char(b'%'),
            b'd' => match args.next() {
                Some(Arg::Int(n)) => write_padded(out, format_decimal(i64::from(*n), &mut buf), width, padchar, prepad),
                Some(Arg::Uint(n)) => write_padded(out, format_decimal(i64::from(*n), &mut buf), width, padchar, prepad),
                _ => out.put_char(b'*'),
            },
            b'c' => match args.next() {
                Some(Arg::Char(ch)) => write_padded(out, &[*ch], width, padchar, prepad),
                _ => out.put_char(b'*'),
            },
            b's' => match args.next() {
                Some(Arg::Str(s)) => write_padded(out, s.as_bytes(), width, padchar, prepad),
                _ => out.put_char(b'*'),
            },
            b'x' | b'X' => {
                let v = match args.next() {
                    Some(Arg::Uint(n)) => Some(*n),
                    Some(Arg::Int(n)) => Some(*n as u32),
                    _ => None,
                };
                match v {
                    Some(v) => write_padded(out, format_hex(v, kind == b'X', &mut buf), width, padchar, prepad),
                    None => out.put_char(b'*'),
                }
            }
            _ => out.put_char(b'*'),
        }
    }
}
