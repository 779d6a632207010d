//! Quoted string literals.
//!
//! A literal is the quote character, a run of fragments, and the quote again.
//! Each fragment is one of, in this order:
//!
//! 1. a numeric escape enabled in [`StringFormat`]
//! 2. a single-character escape `\c`, translated by the escape function
//! 3. a run of characters other than the quote, backslash and (unless
//!    [`StringFormat::include_newline`] is set) newline
//!
//! The skip parser runs before the opening quote only; everything up to the
//! closing quote is taken verbatim.

use serde::{Deserialize, Serialize};

use crate::core::{Env, Parser, Reply};
use crate::primitives::{regex, string};

const MESSAGE: &str = "Does not match a string literal";

/// Escape sequences a string literal accepts besides `\c` escapes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StringFormat {
    /// Allow raw newlines inside the literal.
    pub include_newline: bool,
    /// `\NNN`, three octal digits with the first in `0-3`.
    pub octal: bool,
    /// `\xNN`, exactly two hex digits.
    pub hex2: bool,
    /// `\uNNNN`, exactly four hex digits.
    pub unicode4: bool,
    /// `\x` followed by one to four hex digits.
    pub hex_var: bool,
    /// `\u{N...}`, any number of hex digits.
    pub js_code_point: bool,
    /// `\UNNNNNNNN`, exactly eight hex digits.
    pub csharp_code_point: bool,
}

impl StringFormat {
    pub const C: StringFormat = StringFormat {
        include_newline: false,
        octal: true,
        hex2: true,
        unicode4: false,
        hex_var: false,
        js_code_point: false,
        csharp_code_point: false,
    };

    pub const CSHARP: StringFormat = StringFormat {
        include_newline: false,
        octal: false,
        hex2: false,
        unicode4: true,
        hex_var: true,
        js_code_point: false,
        csharp_code_point: true,
    };

    pub const JAVA: StringFormat = StringFormat {
        include_newline: false,
        octal: true,
        hex2: false,
        unicode4: true,
        hex_var: false,
        js_code_point: false,
        csharp_code_point: false,
    };

    pub const JS: StringFormat = StringFormat {
        include_newline: false,
        octal: true,
        hex2: true,
        unicode4: true,
        hex_var: false,
        js_code_point: true,
        csharp_code_point: false,
    };
}

pub fn c_escape(c: char) -> Option<String> {
    match c {
        '?' => Some("?".to_string()),
        'a' => Some("\u{7}".to_string()),
        _ => common_escape(c),
    }
}

pub fn csharp_escape(c: char) -> Option<String> {
    match c {
        'a' => Some("\u{7}".to_string()),
        _ => common_escape(c),
    }
}

pub fn java_escape(c: char) -> Option<String> {
    match c {
        '0' | 'v' => None,
        _ => common_escape(c),
    }
}

pub fn js_escape(c: char) -> Option<String> {
    common_escape(c)
}

fn common_escape(c: char) -> Option<String> {
    let translated = match c {
        '0' => '\0',
        'b' => '\u{8}',
        'f' => '\u{c}',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'v' => '\u{b}',
        '\'' | '"' | '\\' => c,
        _ => return None,
    };
    Some(translated.to_string())
}

/// A string literal delimited by `quote`.
///
/// `escape` translates the character after a backslash; returning `None`
/// rejects that escape.
pub fn string_literal(
    quote: char,
    escape: impl Fn(char) -> Option<String> + 'static,
    format: StringFormat,
) -> Parser<String> {
    string_literal_with(quote, escape, format, MESSAGE)
}

pub fn string_literal_with(
    quote: char,
    escape: impl Fn(char) -> Option<String> + 'static,
    format: StringFormat,
    message: impl Into<String>,
) -> Parser<String> {
    let quote = quote.to_string();

    let mut fragments = Vec::new();
    if format.octal {
        fragments.push(code(r"\\[0-3][0-7]{2}", 1, 0, 8));
    }
    if format.hex2 {
        fragments.push(code(r"\\x[0-9A-Fa-f]{2}", 2, 0, 16));
    }
    if format.unicode4 {
        fragments.push(code(r"\\u[0-9A-Fa-f]{4}", 2, 0, 16));
    }
    if format.hex_var {
        fragments.push(code(r"\\x[0-9A-Fa-f]{1,4}", 2, 0, 16));
    }
    if format.js_code_point {
        fragments.push(code(r"\\u\{[0-9A-Fa-f]+\}", 3, 1, 16));
    }
    if format.csharp_code_point {
        fragments.push(code(r"\\U[0-9A-Fa-f]{8}", 2, 0, 16));
    }
    fragments.push(translate(regex(r"\\."), move |text| {
        text.chars().nth(1).and_then(&escape)
    }));
    fragments.push(regex(&format!(
        r"[^\\{}{}]+",
        regex::escape(&quote),
        if format.include_newline { "" } else { r"\n" }
    )));

    let fragment = fragments
        .into_iter()
        .reduce(|acc, next| acc.or(&next))
        .unwrap_or_else(|| string(""));
    let body = fragment
        .zero_or_more(|acc, next| acc + &next, String::new())
        .concat_left(&string(quote.as_str()))
        .local(Env::without_skip);

    string(quote).concat(&body).change_error(message)
}

/// An escape whose digits sit between `prefix` and `suffix` bytes of the match.
fn code(pattern: &str, prefix: usize, suffix: usize, radix: u32) -> Parser<String> {
    translate(regex(pattern), move |text| {
        let digits = text.get(prefix..text.len().saturating_sub(suffix))?;
        let value = u32::from_str_radix(digits, radix).ok()?;
        char::from_u32(value).map(String::from)
    })
}

/// Replaces the matched text with `f(text)`, failing in place when it yields `None`.
fn translate(
    parser: Parser<String>,
    f: impl Fn(&str) -> Option<String> + 'static,
) -> Parser<String> {
    Parser::new(move |env: &Env, pos: usize| match parser.parse(env, pos) {
        Reply::Ok {
            env,
            position,
            value,
        } => match f(&value) {
            Some(text) => Reply::ok(env, position, text),
            None => Reply::fail_at(format!("Invalid escape sequence {}", value), pos),
        },
        Reply::Err { message, position } => Reply::Err { message, position },
    })
}

/// A double-quoted C string literal.
pub fn c_string_literal() -> Parser<String> {
    c_string_literal_with(MESSAGE)
}

pub fn c_string_literal_with(message: impl Into<String>) -> Parser<String> {
    string_literal_with('"', c_escape, StringFormat::C, message)
}

/// A double-quoted C# string literal.
pub fn csharp_string_literal() -> Parser<String> {
    csharp_string_literal_with(MESSAGE)
}

pub fn csharp_string_literal_with(message: impl Into<String>) -> Parser<String> {
    string_literal_with('"', csharp_escape, StringFormat::CSHARP, message)
}

/// A double-quoted Java string literal.
pub fn java_string_literal() -> Parser<String> {
    java_string_literal_with(MESSAGE)
}

pub fn java_string_literal_with(message: impl Into<String>) -> Parser<String> {
    string_literal_with('"', java_escape, StringFormat::JAVA, message)
}

/// A double-quoted JavaScript string literal.
pub fn js_string_literal() -> Parser<String> {
    js_string_literal_with(MESSAGE)
}

pub fn js_string_literal_with(message: impl Into<String>) -> Parser<String> {
    string_literal_with('"', js_escape, StringFormat::JS, message)
}
