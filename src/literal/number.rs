use serde::{Deserialize, Serialize};

use crate::combinators::{fail, get_position, succeed};
use crate::core::Parser;
use crate::primitives::{regex, string};

const MESSAGE: &str = "Does not match number literal";

/// Which radix prefixes a number literal may use besides decimal and `0x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberFormat {
    /// `0b1010`
    pub binary: bool,
    /// `0755`; when disabled a leading zero is just a decimal digit.
    pub octal: bool,
}

impl NumberFormat {
    /// Decimal and hexadecimal only.
    pub const DECIMAL: NumberFormat = NumberFormat {
        binary: false,
        octal: false,
    };
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            binary: true,
            octal: true,
        }
    }
}

/// An optionally negated integer literal with every radix enabled.
pub fn number_literal() -> Parser<i64> {
    number_literal_with(NumberFormat::default())
}

/// An optionally negated integer literal.
///
/// Prefixes are tried in the order octal (`0` followed by octal digits),
/// binary (`0b`), hexadecimal (`0x`), then plain decimal digits. A value that
/// does not fit in an `i64` fails. Failures are reported at the position of the
/// sign, or of the first digit when there is none.
pub fn number_literal_with(format: NumberFormat) -> Parser<i64> {
    let mut literal = radix("0x", "[0-9a-fA-F]+", 16).or(&radix("", "[0-9]+", 10));
    if format.binary {
        literal = radix("0b", "[01]+", 2).or(&literal);
    }
    if format.octal {
        literal = radix("0", "[0-7]+", 8).or(&literal);
    }

    get_position().bind(move |start| {
        let literal = literal.clone();
        string("-").option(String::new()).bind(move |sign| {
            literal
                .select_error_at(|_| MESSAGE.to_string(), move |_| start)
                .map(move |value| if sign == "-" { -value } else { value })
        })
    })
}

fn radix(prefix: &str, digits: &str, radix: u32) -> Parser<i64> {
    let digits = regex(digits).bind(move |text| match i64::from_str_radix(&text, radix) {
        Ok(value) => succeed(value),
        Err(_) => fail(MESSAGE),
    });
    if prefix.is_empty() {
        digits
    } else {
        string(prefix).concat(&digits)
    }
}
