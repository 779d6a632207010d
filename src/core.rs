//! # Core Parser Definitions
//!
//! This module defines the parse environment, the reply type every parser
//! returns, and the type-erased [`Parser`] handle that all combinators build on.
//!
//! ## Positions
//!
//! Positions are UTF-8 byte offsets into the subject string, the same indexing
//! `str` slicing uses. A multi-byte character therefore advances the position by
//! its encoded length, not by one.

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use crate::error::{Error, ParseError, ParseResult, RunResult};

/// Parse defines the core parsing interface.
///
/// Anything that can be invoked against an environment and a position can act as
/// a parser. Closures of the right shape implement it automatically, and
/// [`Parser::from_parse`] erases any implementation into a shareable handle.
pub trait Parse<T> {
    /// Attempts to parse the environment's subject starting at `pos`.
    fn parse(&self, env: &Env, pos: usize) -> Reply<T>;
}

impl<T, F> Parse<T> for F
where
    F: Fn(&Env, usize) -> Reply<T>,
{
    fn parse(&self, env: &Env, pos: usize) -> Reply<T> {
        self(env, pos)
    }
}

type ParserFn<T> = Rc<dyn Fn(&Env, usize) -> Reply<T>>;

/// A cheaply clonable, immutable parser producing values of type `T`.
pub struct Parser<T> {
    f: ParserFn<T>,
}

impl<T> Clone for Parser<T> {
    fn clone(&self) -> Self {
        Parser {
            f: Rc::clone(&self.f),
        }
    }
}

impl<T> fmt::Debug for Parser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parser<{}>", std::any::type_name::<T>())
    }
}

impl<T> Parse<T> for Parser<T> {
    fn parse(&self, env: &Env, pos: usize) -> Reply<T> {
        (self.f)(env, pos)
    }
}

impl<T: 'static> Parser<T> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Env, usize) -> Reply<T> + 'static,
    {
        Parser { f: Rc::new(f) }
    }

    pub fn from_parse<P: Parse<T> + 'static>(parser: P) -> Self {
        Parser::new(move |env: &Env, pos: usize| parser.parse(env, pos))
    }

    pub fn parse(&self, env: &Env, pos: usize) -> Reply<T> {
        (self.f)(env, pos)
    }

    /// Runs the parser over `subject` from position 0 with no skip pattern.
    pub fn run(&self, subject: &str) -> Reply<T> {
        self.parse(&Env::new(subject), 0)
    }

    /// Runs the parser over `subject` starting at `start`.
    pub fn run_from(&self, subject: &str, start: usize) -> RunResult<Reply<T>> {
        self.run_in(Env::new(subject), start)
    }

    /// Runs the parser over `subject` from position 0, skipping text matched by `skip`
    /// before every primitive match.
    ///
    /// `skip` may be a ready-made parser or a regular-expression pattern.
    pub fn run_skipping(&self, subject: &str, skip: impl IntoPattern) -> RunResult<Reply<T>> {
        self.run_from_skipping(subject, 0, skip)
    }

    pub fn run_from_skipping(
        &self,
        subject: &str,
        start: usize,
        skip: impl IntoPattern,
    ) -> RunResult<Reply<T>> {
        let env = Env::new(subject).with_skip(Some(skip.into_pattern()?));
        self.run_in(env, start)
    }

    /// Runs the parser in a fully configured environment.
    ///
    /// # Errors
    ///
    /// Fails before any parsing when `start` lies beyond the subject or inside a
    /// multi-byte character.
    #[tracing::instrument(level = "debug", skip(self, env), fields(length = env.len()))]
    pub fn run_in(&self, env: Env, start: usize) -> RunResult<Reply<T>> {
        let subject = env.subject();
        if start > subject.len() {
            return Err(Error::PositionOutOfRange {
                position: start,
                length: subject.len(),
            });
        }
        if !subject.is_char_boundary(start) {
            return Err(Error::NotCharBoundary(start));
        }
        let reply = self.parse(&env, start);
        tracing::debug!(ok = reply.is_ok(), "run finished");
        Ok(reply)
    }
}

/// Conversion into a skip or follow parser.
pub trait IntoPattern {
    fn into_pattern(self) -> RunResult<Parser<String>>;
}

impl IntoPattern for Parser<String> {
    fn into_pattern(self) -> RunResult<Parser<String>> {
        Ok(self)
    }
}

impl IntoPattern for &Parser<String> {
    fn into_pattern(self) -> RunResult<Parser<String>> {
        Ok(self.clone())
    }
}

impl IntoPattern for &str {
    fn into_pattern(self) -> RunResult<Parser<String>> {
        Ok(crate::primitives::try_regex(self)?)
    }
}

impl IntoPattern for String {
    fn into_pattern(self) -> RunResult<Parser<String>> {
        self.as_str().into_pattern()
    }
}

/// The immutable environment a parser runs in.
///
/// Bundles the subject string with an optional skip parser (run before every
/// primitive match) and an optional follow parser (consulted by keyword matchers).
/// Cloning is cheap; the `with_*` methods return modified copies.
#[derive(Clone)]
pub struct Env {
    inner: Rc<EnvInner>,
}

struct EnvInner {
    subject: Rc<str>,
    skip: Option<Parser<String>>,
    follow: Option<Parser<String>>,
    bare: OnceCell<Env>,
}

impl Env {
    pub fn new(subject: impl Into<Rc<str>>) -> Self {
        Self::from_parts(subject.into(), None, None)
    }

    fn from_parts(
        subject: Rc<str>,
        skip: Option<Parser<String>>,
        follow: Option<Parser<String>>,
    ) -> Self {
        Env {
            inner: Rc::new(EnvInner {
                subject,
                skip,
                follow,
                bare: OnceCell::new(),
            }),
        }
    }

    /// Builds an environment from textual skip and follow patterns.
    pub fn with_patterns(
        subject: impl Into<Rc<str>>,
        skip: Option<&str>,
        follow: Option<&str>,
    ) -> RunResult<Self> {
        let skip = skip.map(IntoPattern::into_pattern).transpose()?;
        let follow = follow.map(IntoPattern::into_pattern).transpose()?;
        Ok(Self::from_parts(subject.into(), skip, follow))
    }

    pub fn subject(&self) -> &str {
        &self.inner.subject
    }

    pub fn len(&self) -> usize {
        self.inner.subject.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.subject.is_empty()
    }

    pub fn skip(&self) -> Option<&Parser<String>> {
        self.inner.skip.as_ref()
    }

    pub fn follow(&self) -> Option<&Parser<String>> {
        self.inner.follow.as_ref()
    }

    pub fn with_skip(&self, skip: Option<Parser<String>>) -> Self {
        Self::from_parts(
            Rc::clone(&self.inner.subject),
            skip,
            self.inner.follow.clone(),
        )
    }

    pub fn with_follow(&self, follow: Option<Parser<String>>) -> Self {
        Self::from_parts(
            Rc::clone(&self.inner.subject),
            self.inner.skip.clone(),
            follow,
        )
    }

    pub fn with_subject(&self, subject: impl Into<Rc<str>>) -> Self {
        Self::from_parts(
            subject.into(),
            self.inner.skip.clone(),
            self.inner.follow.clone(),
        )
    }

    pub fn without_skip(&self) -> Self {
        self.with_skip(None)
    }

    /// The same subject with neither skip nor follow configured.
    ///
    /// Skip and follow parsers themselves run in this environment.
    pub fn bare(&self) -> Env {
        if self.inner.skip.is_none() && self.inner.follow.is_none() {
            return self.clone();
        }
        self.inner
            .bare
            .get_or_init(|| Env::new(Rc::clone(&self.inner.subject)))
            .clone()
    }

    /// Returns the position after any skippable text at `pos`.
    ///
    /// A failing skip parser is not an error; the position is simply unchanged.
    pub fn skip_from(&self, pos: usize) -> usize {
        match &self.inner.skip {
            Some(skip) => match skip.parse(&self.bare(), pos) {
                Reply::Ok { position, .. } if position >= pos => position,
                _ => pos,
            },
            None => pos,
        }
    }

    pub(crate) fn rest(&self, pos: usize) -> Option<&str> {
        self.inner.subject.get(pos..)
    }
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Env")
            .field("subject", &self.inner.subject)
            .field("skip", &self.inner.skip.is_some())
            .field("follow", &self.inner.follow.is_some())
            .finish()
    }
}

/// The outcome of invoking a parser.
///
/// Exactly one variant is populated. Reading the value of a failure, or the
/// message of a success, is a programming error and panics.
pub enum Reply<T> {
    Ok {
        env: Env,
        position: usize,
        value: T,
    },
    Err {
        message: String,
        position: Option<usize>,
    },
}

impl<T> Reply<T> {
    pub fn ok(env: Env, position: usize, value: T) -> Self {
        Reply::Ok {
            env,
            position,
            value,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Reply::Err {
            message: message.into(),
            position: None,
        }
    }

    pub fn fail_at(message: impl Into<String>, position: usize) -> Self {
        Reply::Err {
            message: message.into(),
            position: Some(position),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Reply::Ok { .. })
    }

    pub fn is_err(&self) -> bool {
        !self.is_ok()
    }

    /// # Panics
    ///
    /// Panics if the reply is a failure.
    pub fn value(&self) -> &T {
        match self {
            Reply::Ok { value, .. } => value,
            Reply::Err { message, .. } => panic!("value of a failed reply: {message}"),
        }
    }

    /// # Panics
    ///
    /// Panics if the reply is a failure.
    pub fn into_value(self) -> T {
        match self {
            Reply::Ok { value, .. } => value,
            Reply::Err { message, .. } => panic!("value of a failed reply: {message}"),
        }
    }

    /// Position after a successful match.
    ///
    /// # Panics
    ///
    /// Panics if the reply is a failure.
    pub fn position(&self) -> usize {
        match self {
            Reply::Ok { position, .. } => *position,
            Reply::Err { message, .. } => panic!("position of a failed reply: {message}"),
        }
    }

    /// # Panics
    ///
    /// Panics if the reply is a failure.
    pub fn env(&self) -> &Env {
        match self {
            Reply::Ok { env, .. } => env,
            Reply::Err { message, .. } => panic!("environment of a failed reply: {message}"),
        }
    }

    /// # Panics
    ///
    /// Panics if the reply is a success.
    pub fn message(&self) -> &str {
        match self {
            Reply::Err { message, .. } => message,
            Reply::Ok { position, .. } => {
                panic!("error message of a successful reply at position {position}")
            }
        }
    }

    /// # Panics
    ///
    /// Panics if the reply is a success.
    pub fn error_position(&self) -> Option<usize> {
        match self {
            Reply::Err { position, .. } => *position,
            Reply::Ok { position, .. } => {
                panic!("error position of a successful reply at position {position}")
            }
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reply<U> {
        match self {
            Reply::Ok {
                env,
                position,
                value,
            } => Reply::Ok {
                env,
                position,
                value: f(value),
            },
            Reply::Err { message, position } => Reply::Err { message, position },
        }
    }

    pub fn into_result(self) -> ParseResult<T> {
        match self {
            Reply::Ok {
                position, value, ..
            } => Ok((position, value)),
            Reply::Err { message, position } => Err(ParseError { message, position }),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Reply<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Ok {
                position, value, ..
            } => f
                .debug_struct("Ok")
                .field("position", position)
                .field("value", value)
                .finish(),
            Reply::Err { message, position } => f
                .debug_struct("Err")
                .field("message", message)
                .field("position", position)
                .finish(),
        }
    }
}
