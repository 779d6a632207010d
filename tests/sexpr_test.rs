mod common;

use std::fmt;
use std::rc::Rc;

use parsimony::prelude::*;
use pretty_assertions::assert_eq;

#[derive(Debug, Clone, PartialEq)]
enum Datum {
    Cons(Rc<Datum>, Rc<Datum>),
    Nil,
    Bool(bool),
    Symbol(String),
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Cons(car, cdr) => {
                write!(f, "({}", car)?;
                let mut rest = cdr.as_ref();
                while let Datum::Cons(car, cdr) = rest {
                    write!(f, " {}", car)?;
                    rest = cdr.as_ref();
                }
                if *rest != Datum::Nil {
                    write!(f, " . {}", rest)?;
                }
                write!(f, ")")
            }
            Datum::Nil => write!(f, "()"),
            Datum::Bool(true) => write!(f, "#t"),
            Datum::Bool(false) => write!(f, "#f"),
            Datum::Symbol(name) => write!(f, "{}", name),
        }
    }
}

fn datum() -> Parser<Datum> {
    let atom = string("#t")
        .map(|_| Datum::Bool(true))
        .or(&string("#f").map(|_| Datum::Bool(false)))
        .or(&regex(r"[^\s\(\)#\.]+").map(Datum::Symbol));

    letrec2(
        move |_, list: &Parser<Datum>| {
            string("(")
                .concat(list)
                .concat_left(&string(")"))
                .or(&atom)
        },
        |datum: &Parser<Datum>, list: &Parser<Datum>| {
            let list = list.clone();
            datum
                .bind_map(move |_| list.clone(), |car, cdr| {
                    Datum::Cons(Rc::new(car), Rc::new(cdr))
                })
                .or(&string(".").concat(datum))
                .or(&string("").map(|_| Datum::Nil))
        },
    )
}

/// Blanks and nestable `#| ... |#` comments.
fn skip() -> Parser<String> {
    let comment = letrec2(
        |_, body: &Parser<String>| string("#|").concat(body).concat_left(&string("|#")),
        |comment: &Parser<String>, body: &Parser<String>| {
            string("|#")
                .lookahead()
                .map(|_| String::new())
                .or(&comment.or(&regex(r"[\s\S]")).concat(body))
        },
    );
    regex("[ \t\n]").or(&comment).one_or_more(|a, b| a + &b)
}

fn parse(input: &str) -> Result<Datum, ParseError> {
    datum()
        .concat_left(&end())
        .run_skipping(input, skip())
        .expect("skip parser is ready-made")
        .into_result()
        .map(|(_, datum)| datum)
}

fn render(input: &str) -> String {
    parse(input).map(|d| d.to_string()).unwrap_or_else(|e| e.to_string())
}

#[test]
fn test_nested_lists() {
    let datum = parse("(+ 1 (* 2 3))").unwrap();
    let Datum::Cons(car, cdr) = &datum else {
        panic!("expected a list, got {datum}");
    };
    assert_eq!(**car, Datum::Symbol("+".to_string()));
    assert_eq!(datum.to_string(), "(+ 1 (* 2 3))");
    assert!(matches!(cdr.as_ref(), Datum::Cons(..)));
}

#[test]
fn test_atoms_and_pairs() {
    assert_eq!(render("#t"), "#t");
    assert_eq!(render("(#f a)"), "(#f a)");
    assert_eq!(render("(a . b)"), "(a . b)");
    assert_eq!(render("()"), "()");
}

#[test]
fn test_comments_are_skipped() {
    assert_eq!(render("(a #| one #| two |# |# b)"), "(a b)");
    assert_eq!(render("  #|x|#\n(a\tb)  "), "(a b)");
}

#[test]
fn test_unbalanced() {
    assert!(parse("(a b").is_err());
    assert!(parse("a)").is_err());
}
