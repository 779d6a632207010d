//! # Primitive Matchers
//!
//! Leaf parsers that match text directly. Every primitive first runs the
//! environment's skip parser at the current position and matches after whatever
//! it consumed. Failures are reported at the position the primitive was called
//! with, so a failed match never commits the skipped text.
//!
//! * [`string`] / [`ignore_case`]: literal text
//! * [`regex`]: a pattern anchored at the current position
//! * [`end`]: end of input
//! * [`real`]: floating point literals
//! * [`key`] / [`key_ignore_case`]: literals that must end on a word boundary

use lazy_static::lazy_static;
use regex::Regex;

use crate::core::{Env, Parser, Reply};

lazy_static! {
    static ref REAL: Regex =
        anchored(r"[\+\-]?(?:[0-9]+(?:\.[0-9]+)?|\.[0-9]+)(?:[eE][\+\-]?[0-9]+)?")
            .expect("real number pattern is valid");
}

fn anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"\A(?:{})", pattern))
}

/// Matches `expected` exactly.
pub fn string(expected: impl Into<String>) -> Parser<String> {
    let expected = expected.into();
    let message = format!("Does not match {}", expected);
    string_with(expected, message)
}

pub fn string_with(expected: impl Into<String>, message: impl Into<String>) -> Parser<String> {
    let expected = expected.into();
    let message = message.into();
    Parser::new(move |env: &Env, pos: usize| {
        let start = env.skip_from(pos);
        match env.rest(start) {
            Some(rest) if rest.starts_with(expected.as_str()) => {
                Reply::ok(env.clone(), start + expected.len(), expected.clone())
            }
            _ => Reply::fail_at(message.clone(), pos),
        }
    })
}

/// Matches `expected` ignoring case, yielding the text as it appears in the subject.
pub fn ignore_case(expected: impl Into<String>) -> Parser<String> {
    let expected = expected.into();
    let message = format!("Does not match {}", expected);
    ignore_case_with(expected, message)
}

pub fn ignore_case_with(expected: impl Into<String>, message: impl Into<String>) -> Parser<String> {
    let expected = expected.into();
    let width = expected.chars().count();
    let expected = expected.to_lowercase();
    let message = message.into();
    Parser::new(move |env: &Env, pos: usize| {
        let start = env.skip_from(pos);
        let candidate = env.rest(start).and_then(|rest| {
            let end = rest
                .char_indices()
                .nth(width)
                .map_or(rest.len(), |(index, _)| index);
            let candidate = &rest[..end];
            (candidate.chars().count() == width).then_some(candidate)
        });
        match candidate {
            Some(candidate) if candidate.to_lowercase() == expected => {
                Reply::ok(env.clone(), start + candidate.len(), candidate.to_string())
            }
            _ => Reply::fail_at(message.clone(), pos),
        }
    })
}

/// Matches `pattern` starting exactly at the current position.
///
/// # Panics
///
/// Panics if `pattern` is not a valid regular expression. Use [`try_regex`] for
/// patterns that are not known to be valid.
pub fn regex(pattern: &str) -> Parser<String> {
    try_regex(pattern).unwrap_or_else(|e| panic!("invalid pattern {pattern:?}: {e}"))
}

/// # Panics
///
/// Panics if `pattern` is not a valid regular expression.
pub fn regex_with(pattern: &str, message: impl Into<String>) -> Parser<String> {
    try_regex_with(pattern, message).unwrap_or_else(|e| panic!("invalid pattern {pattern:?}: {e}"))
}

pub fn try_regex(pattern: &str) -> Result<Parser<String>, regex::Error> {
    try_regex_with(pattern, format!("Does not match pattern {}", pattern))
}

pub fn try_regex_with(
    pattern: &str,
    message: impl Into<String>,
) -> Result<Parser<String>, regex::Error> {
    Ok(compiled(anchored(pattern)?, message.into()))
}

/// Builds a matcher from an already anchored regular expression.
pub(crate) fn compiled(regex: Regex, message: String) -> Parser<String> {
    Parser::new(move |env: &Env, pos: usize| {
        let start = env.skip_from(pos);
        match env.rest(start).and_then(|rest| regex.find(rest)) {
            Some(found) => Reply::ok(env.clone(), start + found.end(), found.as_str().to_string()),
            None => Reply::fail_at(message.clone(), pos),
        }
    })
}

/// Succeeds only when nothing but skippable text remains.
pub fn end() -> Parser<()> {
    end_with("Not reached to end of parsing")
}

pub fn end_with(message: impl Into<String>) -> Parser<()> {
    let message = message.into();
    Parser::new(move |env: &Env, pos: usize| {
        let start = env.skip_from(pos);
        if start >= env.len() {
            Reply::ok(env.clone(), start, ())
        } else {
            Reply::fail_at(message.clone(), pos)
        }
    })
}

/// Matches a floating point literal such as `-1.5e3` or `.25`.
pub fn real() -> Parser<f64> {
    real_with("Does not match the real number")
}

pub fn real_with(message: impl Into<String>) -> Parser<f64> {
    let message = message.into();
    let invalid = message.clone();
    compiled(REAL.clone(), message).bind(move |text| match text.parse::<f64>() {
        Ok(value) => crate::combinators::succeed(value),
        Err(_) => crate::combinators::fail(invalid.clone()),
    })
}

/// Matches `keyword` and requires it to end on a boundary.
///
/// After the literal the keyword is accepted at the end of input, when the skip
/// parser consumes at least one character, or when the environment's follow
/// parser matches. Without a follow parser no boundary check is made.
pub fn key(keyword: impl Into<String>) -> Parser<String> {
    let keyword = keyword.into();
    let message = format!("Does not match keyword {}", keyword);
    key_with(keyword, message)
}

pub fn key_with(keyword: impl Into<String>, message: impl Into<String>) -> Parser<String> {
    bounded(string(keyword), message.into())
}

pub fn key_ignore_case(keyword: impl Into<String>) -> Parser<String> {
    let keyword = keyword.into();
    let message = format!("Does not match keyword {}", keyword);
    key_ignore_case_with(keyword, message)
}

pub fn key_ignore_case_with(
    keyword: impl Into<String>,
    message: impl Into<String>,
) -> Parser<String> {
    bounded(ignore_case(keyword), message.into())
}

fn bounded(matcher: Parser<String>, message: String) -> Parser<String> {
    Parser::new(move |env: &Env, pos: usize| match matcher.parse(env, pos) {
        Reply::Ok {
            env: next,
            position,
            value,
        } => {
            if at_boundary(&next, position) {
                Reply::ok(next, position, value)
            } else {
                tracing::trace!(
                    target: "parsimony::key",
                    position,
                    keyword = %value,
                    "keyword is a prefix of a longer word"
                );
                Reply::fail_at(message.clone(), position)
            }
        }
        Reply::Err { .. } => Reply::fail_at(message.clone(), pos),
    })
}

fn at_boundary(env: &Env, pos: usize) -> bool {
    let Some(follow) = env.follow() else {
        return true;
    };
    pos >= env.len() || env.skip_from(pos) > pos || follow.parse(&env.bare(), pos).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;
    use pretty_assertions::assert_eq;

    fn env(subject: &str, skip: Option<&str>, follow: Option<&str>) -> Env {
        Env::with_patterns(subject, skip, follow).expect("valid patterns")
    }

    fn err<T>(message: &str, position: usize) -> Result<(usize, T), ParseError> {
        Err(ParseError::new(message, Some(position)))
    }

    #[test]
    fn test_string() {
        let parser = string("765");

        assert_eq!(
            parser.parse(&env("000765", None, None), 3).into_result(),
            Ok((6, "765".to_string()))
        );
        assert_eq!(
            parser.parse(&env("000961", None, None), 3).into_result(),
            err("Does not match 765", 3)
        );
        assert_eq!(
            parser.parse(&env("000   765", Some(" +"), None), 3).into_result(),
            Ok((9, "765".to_string()))
        );
        // 入力が途中で終わる場合
        assert_eq!(
            parser.parse(&env("00076", None, None), 3).into_result(),
            err("Does not match 765", 3)
        );
    }

    #[test]
    fn test_ignore_case() {
        let parser = ignore_case("Abc");

        assert_eq!(
            parser.parse(&env("000Abc", None, None), 3).into_result(),
            Ok((6, "Abc".to_string()))
        );
        assert_eq!(
            parser.parse(&env("000ABC", None, None), 3).into_result(),
            Ok((6, "ABC".to_string()))
        );
        assert_eq!(
            parser.parse(&env("000abc", None, None), 3).into_result(),
            Ok((6, "abc".to_string()))
        );
        assert_eq!(
            parser.parse(&env("000961", None, None), 3).into_result(),
            err("Does not match Abc", 3)
        );
        assert_eq!(
            parser.parse(&env("000   aBC", Some(" +"), None), 3).into_result(),
            Ok((9, "aBC".to_string()))
        );
    }

    #[test]
    fn test_ignore_case_multibyte() {
        let parser = ignore_case("Früh");
        assert_eq!(
            parser.parse(&env("FRÜH!", None, None), 0).into_result(),
            Ok((5, "FRÜH".to_string()))
        );
    }

    #[test]
    fn test_ignore_case_lowercase_changes_length() {
        // "İ" は小文字にすると 2 文字になる
        let parser = ignore_case("İ");
        assert_eq!(
            parser.parse(&env("İx", None, None), 0).into_result(),
            Ok((2, "İ".to_string()))
        );
        assert_eq!(
            parser.parse(&env("ix", None, None), 0).into_result(),
            err("Does not match İ", 0)
        );
    }

    #[test]
    fn test_regex_is_anchored() {
        let parser = regex("8?765");

        assert_eq!(
            parser.parse(&env("000765", None, None), 3).into_result(),
            Ok((6, "765".to_string()))
        );
        assert_eq!(
            parser.parse(&env("0008765", None, None), 3).into_result(),
            Ok((7, "8765".to_string()))
        );
        assert_eq!(
            parser.parse(&env("000961", None, None), 3).into_result(),
            err("Does not match pattern 8?765", 3)
        );
        assert_eq!(
            parser.parse(&env("000   765", Some(" +"), None), 3).into_result(),
            Ok((9, "765".to_string()))
        );
        // 後方にあるだけではマッチしない
        assert_eq!(
            parser.parse(&env("000x765", None, None), 3).into_result(),
            err("Does not match pattern 8?765", 3)
        );
    }

    #[test]
    fn test_regex_alternation_stays_anchored() {
        let parser = regex("a|b");
        assert_eq!(
            parser.parse(&env("xb", None, None), 0).into_result(),
            err("Does not match pattern a|b", 0)
        );
    }

    #[test]
    fn test_try_regex_reports_invalid_pattern() {
        assert!(try_regex("[0-9").is_err());
    }

    #[test]
    #[should_panic(expected = "invalid pattern")]
    fn test_regex_panics_on_invalid_pattern() {
        let _ = regex("(");
    }

    #[test]
    fn test_end() {
        let parser = end();

        assert_eq!(parser.parse(&env("000", None, None), 3).into_result(), Ok((3, ())));
        assert_eq!(
            parser.parse(&env("000961", None, None), 3).into_result(),
            err("Not reached to end of parsing", 3)
        );
        assert_eq!(
            parser.parse(&env("000   ", Some(" +"), None), 3).into_result(),
            Ok((6, ()))
        );
    }

    #[test]
    fn test_real() {
        let parser = real();

        assert_eq!(parser.run("765").into_result(), Ok((3, 765.0)));
        assert_eq!(parser.run("-1.5e3x").into_result(), Ok((6, -1500.0)));
        assert_eq!(parser.run(".25").into_result(), Ok((3, 0.25)));
        assert_eq!(parser.run("+2").into_result(), Ok((2, 2.0)));
        assert_eq!(
            parser.run("e5").into_result(),
            err("Does not match the real number", 0)
        );
    }

    #[test]
    fn test_key() {
        let parser = key("765");
        let at = |subject: &str| env(subject, Some(" +"), Some(r"[\);]"));

        assert_eq!(
            parser.parse(&at("000765"), 3).into_result(),
            Ok((6, "765".to_string()))
        );
        assert_eq!(
            parser.parse(&at("000961"), 3).into_result(),
            err("Does not match keyword 765", 3)
        );
        assert_eq!(
            parser.parse(&at("000   765  346"), 3).into_result(),
            Ok((9, "765".to_string()))
        );
        assert_eq!(
            parser.parse(&at("000   765pro"), 3).into_result(),
            err("Does not match keyword 765", 9)
        );
        assert_eq!(
            parser.parse(&at("000   765; 346"), 3).into_result(),
            Ok((9, "765".to_string()))
        );
        assert_eq!(
            parser.parse(&at("000   765) 346"), 3).into_result(),
            Ok((9, "765".to_string()))
        );
    }

    #[test]
    fn test_key_without_follow_skips_boundary_check() {
        let parser = key("if");
        assert_eq!(
            parser.parse(&env("ifx", None, None), 0).into_result(),
            Ok((2, "if".to_string()))
        );
    }

    #[test]
    fn test_key_ignore_case() {
        let parser = key_ignore_case("Abc");
        let at = |subject: &str| env(subject, Some(" +"), Some(r"[\);]"));

        assert_eq!(
            parser.parse(&at("000Abc"), 3).into_result(),
            Ok((6, "Abc".to_string()))
        );
        assert_eq!(
            parser.parse(&at("000ABC"), 3).into_result(),
            Ok((6, "ABC".to_string()))
        );
        assert_eq!(
            parser.parse(&at("000961"), 3).into_result(),
            err("Does not match keyword Abc", 3)
        );
        assert_eq!(
            parser.parse(&at("000   ABC  346"), 3).into_result(),
            Ok((9, "ABC".to_string()))
        );
        assert_eq!(
            parser.parse(&at("000   ABCpro"), 3).into_result(),
            err("Does not match keyword Abc", 9)
        );
        assert_eq!(
            parser.parse(&at("000   ABC; 346"), 3).into_result(),
            Ok((9, "ABC".to_string()))
        );
    }
}
