use lazy_static::lazy_static;
use regex::Regex;

use crate::core::Parser;
use crate::primitives::compiled;

const MESSAGE: &str = "Does not match identifier";

lazy_static! {
    /// Start: letters, letter numbers, currency symbols, connector punctuation.
    /// Part: additionally digits, combining marks, format characters and the
    /// ignorable control ranges.
    static ref JAVA_IDENTIFIER: Regex = Regex::new(
        r"\A(?:[\p{L}\p{Nl}\p{Sc}\p{Pc}][\p{L}\p{Nl}\p{Sc}\p{Pc}\p{Nd}\p{Mn}\p{Mc}\p{Cf}\x{0}-\x{8}\x{E}-\x{1B}\x{7F}-\x{9F}]*)"
    )
    .expect("identifier pattern is valid");
}

/// A Java-style identifier such as `_tmp`, `$1` or `日本語`.
pub fn java_identifier() -> Parser<String> {
    java_identifier_with(MESSAGE)
}

pub fn java_identifier_with(message: impl Into<String>) -> Parser<String> {
    compiled(JAVA_IDENTIFIER.clone(), message.into())
}
