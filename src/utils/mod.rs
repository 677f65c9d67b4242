pub mod styles;

pub use styles::*;

use crate::repl::HexdumpLabels;
use std::error::Error;
use std::io::Write;

pub fn require(predicate: bool, err: &str) -> Result<(), Box<dyn Error>> {
    if predicate { Ok(()) } else { Err(err.into()) }
}

pub fn warn(mesg: &str) {
    eprintln!("{}", mesg.warn());
}

/// writeln that ignores errors: there's not much to be done if the terminal goes away.
macro_rules! uwriteln {
    ($out:expr) => {{
        let _ = writeln!($out);
    }};
    ($out:expr, $($arg:tt)*) => {{
        let _ = writeln!($out, $($arg)*);
    }};
}
pub(crate) use uwriteln;

/// Like uwriteln but applies one of the Styling methods to the text.
macro_rules! write_styled {
    ($out:expr, $style:ident, $($arg:tt)*) => {{
        let s = format!($($arg)*).$style();
        let _ = write!($out, "{s}");
    }};
}

/// Dumps bytes as rows of 16 hex bytes followed by their ASCII. start is what
/// HexdumpLabels::Offset reports for the first byte.
pub fn hex_dump(out: &mut impl Write, start: u64, bytes: &[u8], labels: HexdumpLabels) {
    for (row, chunk) in bytes.chunks(16).enumerate() {
        let delta = (row * 16) as u64;
        match labels {
            HexdumpLabels::None => (),
            HexdumpLabels::Offset => {
                write_styled!(out, hex_offset, "{:08x}: ", start + delta);
            }
            HexdumpLabels::Zero => {
                write_styled!(out, hex_offset, "{:04x}: ", delta);
            }
        }

        for (i, byte) in chunk.iter().enumerate() {
            if i == 8 {
                let _ = write!(out, " ");
            }
            write_styled!(out, hex_hex, "{byte:02x} ");
        }

        // line up the ASCII column on short rows
        let missing = 16 - chunk.len();
        let pad = missing * 3 + if chunk.len() <= 8 { 1 } else { 0 };
        let _ = write!(out, "{}  ", " ".repeat(pad));

        for byte in chunk.iter() {
            let ch = *byte as char;
            if ch.is_ascii_graphic() {
                write_styled!(out, hex_ascii, "{ch}");
            } else {
                write_styled!(out, hex_ascii, ".");
            }
        }
        uwriteln!(out);
    }
}

/// Remove escape sequences from the string (e.g. for colors).
#[cfg(test)]
pub fn strip_escapes(s: &str) -> String {
    // Even with no styling the tabled crate will add escape sequences to the end of
    // lines to reset all modes.
    let mut result = String::with_capacity(s.len());
    let mut escaping = false;

    // Note that escape sequences can be fairly gnarly, e.g. for RGB colors.
    // See https://gist.github.com/fnky/458719343aabd01cfb17a3a4f7296797
    for c in s.chars() {
        if c == '\x1b' {
            escaping = true;
        } else if escaping {
            if c == 'm' {
                escaping = false;
            }
        } else {
            result.push(c);
        }
    }
    result
}
