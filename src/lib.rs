//! # Parsimony: Monadic Parser Combinators
//!
//! Parsimony builds parsers for text out of small, composable pieces. A grammar
//! is ordinary Rust code: primitives match literal text or patterns, and
//! combinators sequence, choose between and repeat them.
//!
//! ## Core Components
//!
//! * **Environment and Replies** ([`core`]): the input being parsed, the optional
//!   skip and follow parsers, and the success-or-failure value every parser returns
//! * **Primitives** ([`primitives`]): literals, case-insensitive literals, regular
//!   expressions, keywords, real numbers and end of input
//! * **Combinators** ([`combinators`]): bind and map, ordered choice with
//!   backtracking, optional and repeated matches, lookahead and negation,
//!   error remapping, and local changes to the environment
//! * **Recursive Grammars** ([`letrec`]): self-referential and mutually
//!   recursive rules
//! * **Lexical Conventions** ([`literal`]): number literals, string literals with
//!   escape dialects, and identifiers
//! * **Run Options** ([`config`]): start position and skip/follow patterns as data
//!
//! ## Skip and Follow
//!
//! A skip parser (typically whitespace or comments) runs before every primitive
//! match, so grammars do not have to mention insignificant text. A follow parser
//! decides where a keyword may end, so `key("if")` does not match the start of
//! `iffy`.
//!
//! ## Usage Example
//!
//! ```
//! use parsimony::prelude::*;
//!
//! let number = real();
//! let sum = number.delimit(&string("+"), |a, _, b| a + b);
//!
//! let reply = sum.concat_left(&end()).run_skipping("1 + 2 + 3.5", " +").unwrap();
//! assert_eq!(reply.into_result(), Ok((11, 6.5)));
//! ```
//!
//! ## Positions
//!
//! Positions are byte offsets into the subject. Parsers hold their state in
//! `Rc`s and are not `Send`; build one grammar per thread.

pub mod combinators;
pub mod config;
pub mod core;
pub mod error;
pub mod letrec;
pub mod literal;
pub mod prelude;
pub mod primitives;

// Re-exports
pub use crate::core::{Env, Parse, Parser, Reply};
pub use config::ParseOptions;
pub use error::*;
