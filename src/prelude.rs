//! Everything needed to write a grammar, plus free-function forms of the
//! combinators for grammars that read better prefix-style.

use std::rc::Rc;

pub use crate::combinators::{choice, fail, get_position, put_position, succeed};
pub use crate::config::ParseOptions;
pub use crate::core::{Env, Parse, Parser, Reply};
pub use crate::error::{Error, ParseError, ParseResult, RunResult};
pub use crate::letrec::{letrec1, letrec2, letrec3, letrec_many, Rule};
pub use crate::literal::{
    c_escape, c_string_literal, c_string_literal_with, csharp_escape, csharp_string_literal,
    csharp_string_literal_with, java_escape, java_identifier, java_identifier_with,
    java_string_literal, java_string_literal_with, js_escape, js_string_literal,
    js_string_literal_with, number_literal, number_literal_with, string_literal,
    string_literal_with, NumberFormat, StringFormat,
};
pub use crate::primitives::{
    end, end_with, ignore_case, ignore_case_with, key, key_ignore_case, key_ignore_case_with,
    key_with, real, real_with, regex, regex_with, string, string_with, try_regex, try_regex_with,
};

pub fn or<T: 'static>(first: &Parser<T>, second: &Parser<T>) -> Parser<T> {
    first.or(second)
}

pub fn option<T: Clone + 'static>(parser: &Parser<T>, default: T) -> Parser<T> {
    parser.option(default)
}

pub fn concat<T: 'static, U: 'static>(first: &Parser<T>, second: &Parser<U>) -> Parser<U> {
    first.concat(second)
}

pub fn concat_left<T: 'static, U: 'static>(first: &Parser<T>, second: &Parser<U>) -> Parser<T> {
    first.concat_left(second)
}

pub fn delimit<T: 'static, D: 'static>(
    parser: &Parser<T>,
    delimiter: &Parser<D>,
    aggregator: impl Fn(T, D, T) -> T + 'static,
) -> Parser<T> {
    parser.delimit(delimiter, aggregator)
}

pub fn delimit_right<T: 'static, D: 'static>(
    parser: &Parser<T>,
    delimiter: &Parser<D>,
    aggregator: impl Fn(T, D, T) -> T + 'static,
) -> Parser<T> {
    parser.delimit_right(delimiter, aggregator)
}

pub fn one_or_more<T: 'static>(
    parser: &Parser<T>,
    aggregator: impl Fn(T, T) -> T + 'static,
) -> Parser<T> {
    parser.one_or_more(aggregator)
}

pub fn zero_or_more<T: Clone + 'static>(
    parser: &Parser<T>,
    aggregator: impl Fn(T, T) -> T + 'static,
    default: T,
) -> Parser<T> {
    parser.zero_or_more(aggregator, default)
}

pub fn lookahead<T: 'static>(parser: &Parser<T>) -> Parser<T> {
    parser.lookahead()
}

pub fn not<T: 'static>(parser: &Parser<T>) -> Parser<()> {
    parser.not()
}

pub fn local<T: 'static>(parser: &Parser<T>, f: impl Fn(&Env) -> Env + 'static) -> Parser<T> {
    parser.local(f)
}

pub fn change_input<T: 'static>(parser: &Parser<T>, subject: impl Into<Rc<str>>) -> Parser<T> {
    parser.change_input(subject)
}
