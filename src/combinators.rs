//! # Parser Combinators
//!
//! Combinators build larger parsers out of smaller ones. They are exposed as
//! methods on [`Parser`] so grammars read left to right, plus a handful of free
//! functions for parsers that have no receiver.
//!
//! ## Combinator Types
//!
//! * **Monadic**: [`Parser::map`], [`Parser::bind`], [`Parser::bind_map`], [`succeed`], [`fail`]
//! * **Sequential**: [`Parser::concat`], [`Parser::concat_left`]
//! * **Alternative**: [`Parser::or`], [`choice`], [`Parser::option`], [`Parser::optional`]
//! * **Repetition**: [`Parser::delimit`], [`Parser::delimit_right`], [`Parser::one_or_more`], [`Parser::zero_or_more`]
//! * **Lookahead**: [`Parser::lookahead`], [`Parser::not`], [`Parser::match_if`]
//! * **Error Handling**: [`Parser::select_error`], [`Parser::select_error_at`], [`Parser::change_error`]
//! * **Environment**: [`Parser::local`], [`Parser::change_input`], [`get_position`], [`put_position`]
//!
//! Every combinator clones the parsers it is given; the originals stay usable.

use std::rc::Rc;

use crate::core::{Env, Parser, Reply};
use crate::primitives::string;

/// A parser that consumes nothing and yields `value`.
pub fn succeed<T: Clone + 'static>(value: T) -> Parser<T> {
    Parser::new(move |env: &Env, pos: usize| Reply::ok(env.clone(), pos, value.clone()))
}

/// A parser that always fails with `message` and no position.
pub fn fail<T: 'static>(message: impl Into<String>) -> Parser<T> {
    let message = message.into();
    Parser::new(move |_: &Env, _: usize| Reply::fail(message.clone()))
}

/// Yields the current position without consuming anything.
pub fn get_position() -> Parser<usize> {
    Parser::new(|env: &Env, pos: usize| Reply::ok(env.clone(), pos, pos))
}

/// Moves the cursor to `position`.
///
/// Fails at the current position when `position` lies beyond the subject or
/// inside a multi-byte character.
pub fn put_position(position: usize) -> Parser<()> {
    Parser::new(move |env: &Env, pos: usize| {
        if position <= env.len() && env.subject().is_char_boundary(position) {
            Reply::ok(env.clone(), position, ())
        } else {
            Reply::fail_at(format!("Position {} is out of range", position), pos)
        }
    })
}

/// Tries each parser in order from the same position.
///
/// The first success wins. When every alternative fails the error of the last
/// one is reported; an empty list fails with `"No alternative"`.
pub fn choice<T: 'static>(parsers: Vec<Parser<T>>) -> Parser<T> {
    Parser::new(move |env: &Env, pos: usize| {
        let mut last = Reply::fail_at("No alternative", pos);
        for (index, parser) in parsers.iter().enumerate() {
            match parser.parse(env, pos) {
                reply @ Reply::Ok { .. } => return reply,
                Reply::Err { message, position } => {
                    tracing::trace!(
                        target: "parsimony::choice",
                        alternative = index,
                        position = pos,
                        error = %message,
                        "alternative failed, backtracking"
                    );
                    last = Reply::Err { message, position };
                }
            }
        }
        last
    })
}

impl<T: 'static> Parser<T> {
    /// Transforms the value of a successful parse.
    pub fn map<U: 'static>(&self, f: impl Fn(T) -> U + 'static) -> Parser<U> {
        let this = self.clone();
        Parser::new(move |env: &Env, pos: usize| this.parse(env, pos).map(&f))
    }

    /// Runs the parser returned by `f` after this one, in the environment and at
    /// the position this one finished with.
    pub fn bind<U: 'static>(&self, f: impl Fn(T) -> Parser<U> + 'static) -> Parser<U> {
        let this = self.clone();
        Parser::new(move |env: &Env, pos: usize| match this.parse(env, pos) {
            Reply::Ok {
                env,
                position,
                value,
            } => f(value).parse(&env, position),
            Reply::Err { message, position } => Reply::Err { message, position },
        })
    }

    /// Like [`bind`](Parser::bind), then combines both values with `f`.
    pub fn bind_map<U: 'static, V: 'static>(
        &self,
        k: impl Fn(T) -> Parser<U> + 'static,
        f: impl Fn(T, U) -> V + 'static,
    ) -> Parser<V>
    where
        T: Clone,
    {
        let this = self.clone();
        Parser::new(move |env: &Env, pos: usize| match this.parse(env, pos) {
            Reply::Ok {
                env,
                position,
                value,
            } => k(value.clone())
                .parse(&env, position)
                .map(|second| f(value, second)),
            Reply::Err { message, position } => Reply::Err { message, position },
        })
    }

    /// Rewrites the message of a failure.
    ///
    /// # Panics
    ///
    /// The parser panics when it fails and `f` returns an empty message.
    pub fn select_error(&self, f: impl Fn(&str) -> String + 'static) -> Parser<T> {
        self.remap_error(move |message, position| (f(message), position))
    }

    /// Rewrites both the message and the reported position of a failure.
    ///
    /// # Panics
    ///
    /// The parser panics when it fails and `f` returns an empty message.
    pub fn select_error_at(
        &self,
        f: impl Fn(&str) -> String + 'static,
        g: impl Fn(Option<usize>) -> usize + 'static,
    ) -> Parser<T> {
        self.remap_error(move |message, position| (f(message), Some(g(position))))
    }

    /// Replaces the message of a failure with `message`.
    pub fn change_error(&self, message: impl Into<String>) -> Parser<T> {
        let message = message.into();
        self.select_error(move |_| message.clone())
    }

    fn remap_error(
        &self,
        f: impl Fn(&str, Option<usize>) -> (String, Option<usize>) + 'static,
    ) -> Parser<T> {
        let this = self.clone();
        Parser::new(move |env: &Env, pos: usize| match this.parse(env, pos) {
            Reply::Err { message, position } => {
                let (message, position) = f(&message, position);
                assert!(
                    !message.is_empty(),
                    "error remapping produced an empty message"
                );
                Reply::Err { message, position }
            }
            ok => ok,
        })
    }

    /// Ordered choice: on failure, runs `other` from the original position.
    pub fn or(&self, other: &Parser<T>) -> Parser<T> {
        let this = self.clone();
        let other = other.clone();
        Parser::new(move |env: &Env, pos: usize| match this.parse(env, pos) {
            Reply::Err { message, .. } => {
                tracing::trace!(
                    target: "parsimony::choice",
                    position = pos,
                    error = %message,
                    "left alternative failed, backtracking"
                );
                other.parse(env, pos)
            }
            ok => ok,
        })
    }

    /// Yields `default` without consuming anything when this parser fails.
    pub fn option(&self, default: T) -> Parser<T>
    where
        T: Clone,
    {
        let this = self.clone();
        Parser::new(move |env: &Env, pos: usize| match this.parse(env, pos) {
            Reply::Err { .. } => Reply::ok(env.clone(), pos, default.clone()),
            ok => ok,
        })
    }

    /// Like [`option`](Parser::option) with `T::default()`.
    pub fn option_default(&self) -> Parser<T>
    where
        T: Default,
    {
        let this = self.clone();
        Parser::new(move |env: &Env, pos: usize| match this.parse(env, pos) {
            Reply::Err { .. } => Reply::ok(env.clone(), pos, T::default()),
            ok => ok,
        })
    }

    /// Yields `None` without consuming anything when this parser fails.
    pub fn optional(&self) -> Parser<Option<T>> {
        let this = self.clone();
        Parser::new(move |env: &Env, pos: usize| match this.parse(env, pos) {
            Reply::Err { .. } => Reply::ok(env.clone(), pos, None),
            ok => ok.map(Some),
        })
    }

    /// Parses `item (delimiter item)*`, folding from the left.
    ///
    /// Repetition stops at the last complete item: a delimiter that is not
    /// followed by an item is left unconsumed. A round that consumes nothing
    /// also ends the repetition.
    pub fn delimit<D: 'static>(
        &self,
        delimiter: &Parser<D>,
        aggregator: impl Fn(T, D, T) -> T + 'static,
    ) -> Parser<T> {
        let this = self.clone();
        let delimiter = delimiter.clone();
        Parser::new(move |env: &Env, pos: usize| {
            let (mut env, mut position, mut acc) = match this.parse(env, pos) {
                Reply::Ok {
                    env,
                    position,
                    value,
                } => (env, position, value),
                Reply::Err { message, position } => return Reply::Err { message, position },
            };
            while let Some((next_env, next_position, delim, item)) =
                repeat_round(&this, &delimiter, &env, position)
            {
                acc = aggregator(acc, delim, item);
                env = next_env;
                position = next_position;
            }
            Reply::ok(env, position, acc)
        })
    }

    /// Parses `item (delimiter item)*`, folding from the right.
    pub fn delimit_right<D: 'static>(
        &self,
        delimiter: &Parser<D>,
        aggregator: impl Fn(T, D, T) -> T + 'static,
    ) -> Parser<T> {
        let this = self.clone();
        let delimiter = delimiter.clone();
        Parser::new(move |env: &Env, pos: usize| {
            let (mut env, mut position, mut last) = match this.parse(env, pos) {
                Reply::Ok {
                    env,
                    position,
                    value,
                } => (env, position, value),
                Reply::Err { message, position } => return Reply::Err { message, position },
            };
            let mut pending = Vec::new();
            while let Some((next_env, next_position, delim, item)) =
                repeat_round(&this, &delimiter, &env, position)
            {
                pending.push((std::mem::replace(&mut last, item), delim));
                env = next_env;
                position = next_position;
            }
            let value = pending
                .into_iter()
                .rev()
                .fold(last, |acc, (left, delim)| aggregator(left, delim, acc));
            Reply::ok(env, position, value)
        })
    }

    /// One or more adjacent items folded from the left.
    pub fn one_or_more(&self, aggregator: impl Fn(T, T) -> T + 'static) -> Parser<T> {
        self.delimit(&string(""), move |acc, _, item| aggregator(acc, item))
    }

    /// Zero or more adjacent items folded from the left; `default` when none match.
    pub fn zero_or_more(&self, aggregator: impl Fn(T, T) -> T + 'static, default: T) -> Parser<T>
    where
        T: Clone,
    {
        self.one_or_more(aggregator).option(default)
    }

    pub fn zero_or_more_default(&self, aggregator: impl Fn(T, T) -> T + 'static) -> Parser<T>
    where
        T: Default,
    {
        self.one_or_more(aggregator).option_default()
    }

    /// Matches without advancing: on success the position is reset to where the
    /// parser started.
    pub fn lookahead(&self) -> Parser<T> {
        let this = self.clone();
        Parser::new(move |env: &Env, pos: usize| match this.parse(env, pos) {
            Reply::Ok { env, value, .. } => Reply::ok(env, pos, value),
            err => err,
        })
    }

    /// Negative lookahead: succeeds without consuming when this parser fails,
    /// and fails with `"Unexpected match"` when it succeeds.
    pub fn not(&self) -> Parser<()> {
        let this = self.clone();
        Parser::new(move |env: &Env, pos: usize| match this.parse(env, pos) {
            Reply::Ok { .. } => Reply::fail_at("Unexpected match", pos),
            Reply::Err { .. } => Reply::ok(env.clone(), pos, ()),
        })
    }

    /// Runs `next` after this parser and keeps only its value.
    pub fn concat<U: 'static>(&self, next: &Parser<U>) -> Parser<U> {
        let next = next.clone();
        self.bind(move |_| next.clone())
    }

    /// Runs `next` after this parser and keeps only this parser's value.
    pub fn concat_left<U: 'static>(&self, next: &Parser<U>) -> Parser<T> {
        let this = self.clone();
        let next = next.clone();
        Parser::new(move |env: &Env, pos: usize| match this.parse(env, pos) {
            Reply::Ok {
                env,
                position,
                value,
            } => match next.parse(&env, position) {
                Reply::Ok { env, position, .. } => Reply::ok(env, position, value),
                Reply::Err { message, position } => Reply::Err { message, position },
            },
            err => err,
        })
    }

    /// Fails with `"Value is not matched"` at the starting position when the
    /// parsed value does not satisfy `predicate`.
    pub fn match_if(&self, predicate: impl Fn(&T) -> bool + 'static) -> Parser<T> {
        let this = self.clone();
        Parser::new(move |env: &Env, pos: usize| match this.parse(env, pos) {
            Reply::Ok { ref value, .. } if !predicate(value) => {
                Reply::fail_at("Value is not matched", pos)
            }
            reply => reply,
        })
    }

    /// Runs this parser in the environment produced by `f`.
    ///
    /// Parsers that follow continue in the original environment.
    pub fn local(&self, f: impl Fn(&Env) -> Env + 'static) -> Parser<T> {
        let this = self.clone();
        Parser::new(move |env: &Env, pos: usize| {
            this.parse(&f(env), pos).rebase(env.clone())
        })
    }

    /// Runs this parser from the start of `subject` instead of the current input.
    ///
    /// On success the value is returned without consuming anything from the
    /// current input. A failure keeps its message and is reported at the
    /// current position.
    pub fn change_input(&self, subject: impl Into<Rc<str>>) -> Parser<T> {
        let this = self.clone();
        let subject: Rc<str> = subject.into();
        Parser::new(move |env: &Env, pos: usize| {
            match this.parse(&env.with_subject(Rc::clone(&subject)), 0) {
                Reply::Ok { value, .. } => Reply::ok(env.clone(), pos, value),
                Reply::Err { message, .. } => Reply::fail_at(message, pos),
            }
        })
    }
}

impl<T> Reply<T> {
    /// Replaces the environment of a successful reply.
    fn rebase(self, env: Env) -> Reply<T> {
        match self {
            Reply::Ok {
                position, value, ..
            } => Reply::ok(env, position, value),
            err => err,
        }
    }
}

/// One `delimiter item` round of a repetition starting at `pos`.
///
/// Returns `None` when either part fails or the round does not advance.
fn repeat_round<T: 'static, D: 'static>(
    item: &Parser<T>,
    delimiter: &Parser<D>,
    env: &Env,
    pos: usize,
) -> Option<(Env, usize, D, T)> {
    let (env, position, delim) = match delimiter.parse(env, pos) {
        Reply::Ok {
            env,
            position,
            value,
        } => (env, position, value),
        Reply::Err { .. } => {
            tracing::trace!(target: "parsimony::delimit", position = pos, "no delimiter, repetition ends");
            return None;
        }
    };
    match item.parse(&env, position) {
        Reply::Ok {
            env,
            position: next,
            value,
        } if next > pos => Some((env, next, delim, value)),
        Reply::Ok { .. } => {
            tracing::trace!(target: "parsimony::delimit", position = pos, "round consumed nothing, repetition ends");
            None
        }
        Reply::Err { message, .. } => {
            tracing::trace!(
                target: "parsimony::delimit",
                position = pos,
                error = %message,
                "no item after delimiter, repetition ends"
            );
            None
        }
    }
}
