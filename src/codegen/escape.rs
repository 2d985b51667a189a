// Character escaping for generated code
//
//  Copyright (C) 2024 The PEGC Contributors.
//
//  This file is part of PEGC.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Escaping of characters for string and bracket-expression contexts.
//!
//! Escaping never fails:
//!   every code point has a representation,
//!     either as itself or as a hexadecimal escape.
//!
//!   - Printable characters in Basic Latin,
//!       Latin-1 Supplement,
//!       and Latin Extended-A/B are output as themselves,
//!         as is the space;
//!   - Common control characters use their short escapes
//!       (`\n`, `\t`, and so on);
//!   - Other code points below U+0100 are output as `\xHH`;
//!   - Other code points in the Basic Multilingual Plane are output as
//!       `\uHHHH`; and
//!   - Astral code points are output as a UTF-16 surrogate pair
//!       `\uHHHH\uHHHH`.
//!
//! Hexadecimal digits are always uppercase.

use arrayvec::ArrayString;

/// Longest possible escape sequence
///   (a surrogate pair).
const ESCAPE_MAX_LEN: usize = 12;

/// An escaped character.
pub type Escaped = ArrayString<ESCAPE_MAX_LEN>;

const HEX: &[u8; 16] = b"0123456789ABCDEF";

/// Push `prefix` followed by `digits` uppercase hexadecimal digits of
///   `value`.
fn push_hex(out: &mut Escaped, prefix: &str, value: u32, digits: u32) {
    out.push_str(prefix);

    for i in (0..digits).rev() {
        let nibble = (value >> (i * 4)) & 0xF;
        out.push(HEX[nibble as usize] as char);
    }
}

/// Escape `c` for any context.
///
/// This escapes only the backslash and characters that are not printable.
pub fn escape_char(c: char) -> Escaped {
    let mut out = Escaped::new();

    match c {
        '\\' => out.push_str("\\\\"),
        '\0' => out.push_str("\\0"),
        '\u{08}' => out.push_str("\\b"),
        '\t' => out.push_str("\\t"),
        '\u{0C}' => out.push_str("\\f"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\u{0B}' => out.push_str("\\x0B"),

        ' ' | '!'..='~' | '\u{A1}'..='\u{AC}' | '\u{AE}'..='\u{24F}' => {
            out.push(c)
        }

        _ if (c as u32) < 0x100 => push_hex(&mut out, "\\x", c as u32, 2),

        _ => {
            let mut units = [0u16; 2];

            for unit in c.encode_utf16(&mut units) {
                push_hex(&mut out, "\\u", *unit as u32, 4);
            }
        }
    }

    out
}

/// Escape `c` for use within a quoted string.
pub fn escape_literal_char(c: char) -> Escaped {
    let mut out = Escaped::new();

    match c {
        '\'' | '"' => {
            out.push('\\');
            out.push(c);
            out
        }
        _ => escape_char(c),
    }
}

/// Escape `c` for use within a bracket expression (`[...]`).
pub fn escape_class_char(c: char) -> Escaped {
    let mut out = Escaped::new();

    match c {
        '/' | ']' | '^' | '-' => {
            out.push('\\');
            out.push(c);
            out
        }
        _ => escape_char(c),
    }
}

/// Escape each character of `s` for use within a quoted string,
///   without the quotes.
pub fn escape_literal(s: &str) -> String {
    s.chars().map(escape_literal_char).fold(
        String::with_capacity(s.len()),
        |mut acc, esc| {
            acc.push_str(&esc);
            acc
        },
    )
}

/// Render `s` as a double-quoted string literal.
pub fn stringify(s: &str) -> String {
    format!("\"{}\"", escape_literal(s))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn printable_characters_pass_through() {
        for c in ['a', 'Z', '0', '~', '!', ' ', 'é', 'ÿ', 'ſ', 'ɏ'] {
            assert_eq!(c.to_string(), escape_char(c).as_str(), "{c:?}");
        }
    }

    #[test]
    fn short_escapes() {
        assert_eq!("\\\\", escape_char('\\').as_str());
        assert_eq!("\\0", escape_char('\0').as_str());
        assert_eq!("\\b", escape_char('\u{08}').as_str());
        assert_eq!("\\t", escape_char('\t').as_str());
        assert_eq!("\\f", escape_char('\u{0C}').as_str());
        assert_eq!("\\n", escape_char('\n').as_str());
        assert_eq!("\\r", escape_char('\r').as_str());
        assert_eq!("\\x0B", escape_char('\u{0B}').as_str());
    }

    #[test]
    fn hex_escapes() {
        assert_eq!("\\x01", escape_char('\u{01}').as_str());
        assert_eq!("\\x1F", escape_char('\u{1F}').as_str());
        assert_eq!("\\x7F", escape_char('\u{7F}').as_str());
        assert_eq!("\\xA0", escape_char('\u{A0}').as_str());
        // Soft hyphen is invisible.
        assert_eq!("\\xAD", escape_char('\u{AD}').as_str());
        assert_eq!("\\u0250", escape_char('\u{250}').as_str());
        assert_eq!("\\u65E5", escape_char('日').as_str());
        assert_eq!("\\uFFFF", escape_char('\u{FFFF}').as_str());
    }

    #[test]
    fn astral_escapes_as_surrogate_pair() {
        assert_eq!("\\uD83D\\uDE00", escape_char('😀').as_str());
    }

    #[test]
    fn literal_context_escapes_quotes() {
        assert_eq!("\\'", escape_literal_char('\'').as_str());
        assert_eq!("\\\"", escape_literal_char('"').as_str());
        assert_eq!("-", escape_literal_char('-').as_str());
    }

    #[test]
    fn class_context_escapes_bracket_syntax() {
        assert_eq!("\\/", escape_class_char('/').as_str());
        assert_eq!("\\]", escape_class_char(']').as_str());
        assert_eq!("\\^", escape_class_char('^').as_str());
        assert_eq!("\\-", escape_class_char('-').as_str());
        assert_eq!("\\\\", escape_class_char('\\').as_str());
        assert_eq!("\"", escape_class_char('"').as_str());
    }

    #[test]
    fn stringify_quotes_and_escapes() {
        assert_eq!("\"a\\\"b\\n\"", stringify("a\"b\n"));
        assert_eq!("\"\"", stringify(""));
    }
}
