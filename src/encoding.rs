//! Percent encoding and decoding of URI components using UTF-8.
//!
//! ```
//! use oxuri::{decode, quote, CharClass};
//!
//! assert_eq!(quote("a b/ü", CharClass::PATH), "a%20b/ü");
//! assert_eq!(decode("a%20b/%C3%BC"), "a b/ü");
//! ```

use crate::chars::CharClass;
use std::borrow::Cow;
use std::cmp::Ordering;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Escapes the characters of `input` that are not allowed by `class`.
///
/// US-ASCII characters outside of `class` are written as `%XX` (upper case hex digits).
/// If `class` allows escapes, non-ASCII spaces and controls are written as their escaped UTF-8
/// bytes and the other non-ASCII characters are kept as is.
/// Otherwise all non-ASCII characters are kept.
///
/// `%` is escaped by every class except [`CharClass::SERVER_PERCENT`].
///
/// ```
/// use oxuri::{quote, CharClass};
///
/// assert_eq!(quote("50%", CharClass::URIC), "50%25");
/// assert_eq!(quote("a\u{3000}b", CharClass::URIC), "a%E3%80%80b");
/// ```
pub fn quote(input: &str, class: CharClass) -> Cow<'_, str> {
    let allows_non_ascii = class.allows_escapes();
    let mut output: Option<String> = None;
    for (i, c) in input.char_indices() {
        let escape = if c.is_ascii() {
            !class.contains(c)
        } else {
            allows_non_ascii && (c.is_whitespace() || c.is_control())
        };
        if escape {
            let output = output.get_or_insert_with(|| {
                let mut output = String::with_capacity(input.len() + 8);
                output.push_str(&input[..i]);
                output
            });
            push_encoded(output, c);
        } else if let Some(output) = &mut output {
            output.push(c);
        }
    }
    output.map_or(Cow::Borrowed(input), Cow::Owned)
}

/// Escapes all non-ASCII characters of `input` as UTF-8 `%XX` triplets.
///
/// ```
/// use oxuri::encode_non_ascii;
///
/// assert_eq!(encode_non_ascii("/ü?a"), "/%C3%BC?a");
/// ```
pub fn encode_non_ascii(input: &str) -> Cow<'_, str> {
    if input.is_ascii() {
        return Cow::Borrowed(input);
    }
    let mut output = String::with_capacity(input.len() * 3);
    for c in input.chars() {
        if c.is_ascii() {
            output.push(c);
        } else {
            push_encoded(&mut output, c);
        }
    }
    Cow::Owned(output)
}

/// Decodes the `%XX` escapes of `input`.
///
/// Each run of consecutive escapes is decoded as UTF-8,
/// malformed sequences being replaced by U+FFFD.
/// A `%` between `[` and `]` (an IPv6 zone identifier) is not an escape.
/// A `%` not followed by two hexadecimal digits is kept as is.
///
/// ```
/// use oxuri::decode;
///
/// assert_eq!(decode("%E6%97%A5%E6%9C%AC"), "日本");
/// assert_eq!(decode("%C3x"), "\u{FFFD}x");
/// assert_eq!(decode("[fe80::1%25eth0]"), "[fe80::1%25eth0]");
/// ```
pub fn decode(input: &str) -> Cow<'_, str> {
    if !input.contains('%') {
        return Cow::Borrowed(input);
    }
    let bytes = input.as_bytes();
    let mut output = String::with_capacity(input.len());
    let mut run = Vec::new();
    let mut between_brackets = false;
    let mut literal_start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'[' => between_brackets = true,
            b']' if between_brackets => between_brackets = false,
            b'%' if !between_brackets => {
                if let Some(end) = escape_run(bytes, i, &mut run) {
                    output.push_str(&input[literal_start..i]);
                    output.push_str(&String::from_utf8_lossy(&run));
                    run.clear();
                    literal_start = end;
                    i = end;
                    continue;
                }
            }
            _ => (),
        }
        i += 1;
    }
    output.push_str(&input[literal_start..]);
    Cow::Owned(output)
}

/// Reads the consecutive well-formed escapes starting at `start` into `run`.
///
/// Returns the position after the last escape, if there is at least one.
fn escape_run(bytes: &[u8], start: usize, run: &mut Vec<u8>) -> Option<usize> {
    let mut i = start;
    while bytes.get(i) == Some(&b'%') {
        let Some(byte) = hex_pair(bytes.get(i + 1).copied(), bytes.get(i + 2).copied()) else {
            break;
        };
        run.push(byte);
        i += 3;
    }
    (i > start).then_some(i)
}

fn hex_pair(high: Option<u8>, low: Option<u8>) -> Option<u8> {
    Some(hex_value(high?)? << 4 | hex_value(low?)?)
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

fn push_escape(output: &mut String, b: u8) {
    output.push('%');
    output.push(char::from(HEX_DIGITS[usize::from(b >> 4)]));
    output.push(char::from(HEX_DIGITS[usize::from(b & 0x0F)]));
}

fn push_encoded(output: &mut String, c: char) {
    let mut buffer = [0; 4];
    for b in c.encode_utf8(&mut buffer).bytes() {
        push_escape(output, b);
    }
}

/// Compares two raw components, the hex digits of `%XX` escapes being case insensitive.
pub(crate) fn cmp_escaped(a: &str, b: &str) -> Ordering {
    let mut a = a.chars();
    let mut b = b.chars();
    let mut escape_digits = 0;
    loop {
        let (x, y) = match (a.next(), b.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => (x, y),
        };
        let (x, y) = if escape_digits > 0 {
            escape_digits -= 1;
            (x.to_ascii_lowercase(), y.to_ascii_lowercase())
        } else {
            if x == '%' && y == '%' {
                escape_digits = 2;
            }
            (x, y)
        };
        match x.cmp(&y) {
            Ordering::Equal => (),
            ordering => return ordering,
        }
    }
}

#[inline]
pub(crate) fn eq_escaped(a: &str, b: &str) -> bool {
    a.len() == b.len() && (a == b || cmp_escaped(a, b) == Ordering::Equal)
}

pub(crate) fn cmp_ignoring_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .map(|c| c.to_ascii_lowercase())
        .cmp(b.chars().map(|c| c.to_ascii_lowercase()))
}

/// Folds `s` into `hash`, upper casing the hex digits of escapes.
pub(crate) fn hash_escaped(hash: i32, s: &str) -> i32 {
    let mut h: i32 = 0;
    let mut escape_digits = 0;
    for c in s.chars() {
        let c = if escape_digits > 0 {
            escape_digits -= 1;
            c.to_ascii_uppercase()
        } else {
            if c == '%' {
                escape_digits = 2;
            }
            c
        };
        h = h.wrapping_mul(31).wrapping_add(c as i32);
    }
    hash.wrapping_mul(127).wrapping_add(h)
}

pub(crate) fn hash_ignoring_case(hash: i32, s: &str) -> i32 {
    s.chars().fold(hash, |h, c| {
        h.wrapping_mul(31)
            .wrapping_add(c.to_ascii_lowercase() as i32)
    })
}
