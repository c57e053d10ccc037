//! JSON string escaping.
//!
//! Produces the same output a full JSON encoder would for string content,
//! without going through one. Safe spans are written in bulk: the scanner
//! remembers where the current run began and only touches the writer when it
//! meets a byte that needs rewriting.

use std::io::{self, Write};

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Printable ASCII other than `"` and `\`.
#[inline]
fn is_safe(b: u8) -> bool {
    (0x20..0x80).contains(&b) && b != b'"' && b != b'\\'
}

/// Width of the UTF-8 sequence starting at `bytes[0]`, if it is valid.
fn utf8_width(bytes: &[u8]) -> Option<usize> {
    let width = match bytes[0] {
        0xc2..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf4 => 4,
        _ => return None,
    };
    let seq = bytes.get(..width)?;
    std::str::from_utf8(seq).ok().map(|_| width)
}

/// Write `bytes` as a quoted JSON string.
///
/// Every byte that does not start a valid UTF-8 sequence is replaced with
/// `�`, so the output is valid JSON for any input.
pub fn write_json_str<W: Write + ?Sized>(w: &mut W, bytes: &[u8]) -> io::Result<()> {
    w.write_all(b"\"")?;

    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];

        if b < 0x80 {
            if is_safe(b) {
                i += 1;
                continue;
            }
            w.write_all(&bytes[start..i])?;
            match b {
                b'"' | b'\\' => w.write_all(&[b'\\', b])?,
                b'\n' => w.write_all(b"\\n")?,
                b'\r' => w.write_all(b"\\r")?,
                b'\t' => w.write_all(b"\\t")?,
                _ => w.write_all(&[
                    b'\\',
                    b'u',
                    b'0',
                    b'0',
                    HEX[(b >> 4) as usize],
                    HEX[(b & 0x0f) as usize],
                ])?,
            }
            i += 1;
            start = i;
            continue;
        }

        match utf8_width(&bytes[i..]) {
            Some(width) => i += width,
            None => {
                w.write_all(&bytes[start..i])?;
                w.write_all(b"\\ufffd")?;
                i += 1;
                start = i;
            }
        }
    }

    w.write_all(&bytes[start..])?;
    w.write_all(b"\"")
}
