//! # Lexical Conventions
//!
//! Ready-made parsers for tokens most programming languages share: integer
//! literals in several radixes, quoted string literals with configurable escape
//! dialects, and identifiers.
//!
//! ## Components
//!
//! * **Number Literals**: [`number_literal`] with [`NumberFormat`] radix flags
//! * **String Literals**: [`string_literal`] with [`StringFormat`] escape flags and
//!   C, C#, Java and JavaScript presets
//! * **Identifiers**: [`java_identifier`]
//!
//! All of them are built from the public combinators, so they honour the
//! environment's skip parser before the token starts.

pub mod identifier;
pub mod number;
pub mod string;

pub use identifier::{java_identifier, java_identifier_with};
pub use number::{number_literal, number_literal_with, NumberFormat};
pub use string::{
    c_escape, c_string_literal, c_string_literal_with, csharp_escape, csharp_string_literal,
    csharp_string_literal_with, java_escape, java_string_literal, java_string_literal_with,
    js_escape, js_string_literal, js_string_literal_with, string_literal, string_literal_with,
    StringFormat,
};
