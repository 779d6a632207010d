//! # Recursive Grammars
//!
//! A combinator graph cannot refer to itself while it is being built. The
//! `letrec` family breaks the cycle: each builder receives forward handles for
//! every nonterminal of the grammar, and the real graph is built from them the
//! first time any of the returned parsers runs. After that every call goes
//! straight to the cached graph.
//!
//! ```
//! use parsimony::prelude::*;
//!
//! // balanced parentheses
//! let parens = letrec1(|parens: &Parser<String>| {
//!     string("(")
//!         .concat(&parens.option_default())
//!         .concat(&string(")"))
//! });
//! assert!(parens.run("(())").is_ok());
//! ```
//!
//! The returned parsers own the grammar; the forward handles inside it only hold
//! weak references, so dropping the returned parsers frees the whole graph.

use std::cell::OnceCell;
use std::rc::{Rc, Weak};

use crate::core::{Env, Parser};

type Build<G> = Box<dyn Fn(&Weak<Knot<G>>) -> G>;

/// The shared slot a recursive grammar is materialized into.
struct Knot<G> {
    grammar: OnceCell<G>,
    build: Build<G>,
    this: Weak<Knot<G>>,
}

impl<G: 'static> Knot<G> {
    fn new(build: impl Fn(&Weak<Knot<G>>) -> G + 'static) -> Rc<Self> {
        Rc::new_cyclic(|this| Knot {
            grammar: OnceCell::new(),
            build: Box::new(build),
            this: this.clone(),
        })
    }

    fn grammar(&self) -> &G {
        self.grammar.get_or_init(|| {
            tracing::debug!(
                target: "parsimony::letrec",
                grammar = std::any::type_name::<G>(),
                "materializing recursive grammar"
            );
            (self.build)(&self.this)
        })
    }
}

/// A handle used inside the grammar; refers back to the knot weakly.
fn forward<G: 'static, T: 'static>(
    knot: &Weak<Knot<G>>,
    select: impl Fn(&G) -> &Parser<T> + 'static,
) -> Parser<T> {
    let knot = knot.clone();
    Parser::new(move |env: &Env, pos: usize| {
        let Some(knot) = knot.upgrade() else {
            panic!("recursive parser invoked after its grammar was dropped");
        };
        select(knot.grammar()).parse(env, pos)
    })
}

/// A handle returned to the caller; keeps the knot alive.
fn entry<G: 'static, T: 'static>(
    knot: Rc<Knot<G>>,
    select: impl Fn(&G) -> &Parser<T> + 'static,
) -> Parser<T> {
    Parser::new(move |env: &Env, pos: usize| select(knot.grammar()).parse(env, pos))
}

/// Defines a parser that refers to itself.
pub fn letrec1<A: 'static>(f: impl Fn(&Parser<A>) -> Parser<A> + 'static) -> Parser<A> {
    let knot = Knot::new(move |knot| f(&forward(knot, |g: &Parser<A>| g)));
    entry(knot, |g: &Parser<A>| g)
}

/// Defines two mutually recursive parsers and returns the first.
pub fn letrec2<A: 'static, B: 'static>(
    f1: impl Fn(&Parser<A>, &Parser<B>) -> Parser<A> + 'static,
    f2: impl Fn(&Parser<A>, &Parser<B>) -> Parser<B> + 'static,
) -> Parser<A> {
    type Grammar<A, B> = (Parser<A>, Parser<B>);

    let knot = Knot::new(move |knot| {
        let a = forward(knot, |g: &Grammar<A, B>| &g.0);
        let b = forward(knot, |g: &Grammar<A, B>| &g.1);
        (f1(&a, &b), f2(&a, &b))
    });
    entry(knot, |g: &Grammar<A, B>| &g.0)
}

/// Defines three mutually recursive parsers and returns the first.
///
/// The usual shape is an expression grammar: expression, term and factor,
/// where a factor may be a parenthesized expression.
pub fn letrec3<A: 'static, B: 'static, C: 'static>(
    f1: impl Fn(&Parser<A>, &Parser<B>, &Parser<C>) -> Parser<A> + 'static,
    f2: impl Fn(&Parser<A>, &Parser<B>, &Parser<C>) -> Parser<B> + 'static,
    f3: impl Fn(&Parser<A>, &Parser<B>, &Parser<C>) -> Parser<C> + 'static,
) -> Parser<A> {
    type Grammar<A, B, C> = (Parser<A>, Parser<B>, Parser<C>);

    let knot = Knot::new(move |knot| {
        let a = forward(knot, |g: &Grammar<A, B, C>| &g.0);
        let b = forward(knot, |g: &Grammar<A, B, C>| &g.1);
        let c = forward(knot, |g: &Grammar<A, B, C>| &g.2);
        (f1(&a, &b, &c), f2(&a, &b, &c), f3(&a, &b, &c))
    });
    entry(knot, |g: &Grammar<A, B, C>| &g.0)
}

/// A builder for one nonterminal of [`letrec_many`].
pub type Rule<A> = Box<dyn Fn(&[Parser<A>]) -> Parser<A>>;

/// Defines any number of mutually recursive parsers of the same type.
///
/// Every rule receives the forward handles of all rules, in order. All of the
/// resulting parsers are returned, in the same order.
pub fn letrec_many<A: 'static>(rules: Vec<Rule<A>>) -> Vec<Parser<A>> {
    let count = rules.len();
    let knot = Knot::new(move |knot| {
        let handles: Vec<Parser<A>> = (0..count)
            .map(|index| forward(knot, move |g: &Vec<Parser<A>>| &g[index]))
            .collect();
        rules.iter().map(|rule| rule(handles.as_slice())).collect()
    });
    (0..count)
        .map(|index| entry(Rc::clone(&knot), move |g: &Vec<Parser<A>>| &g[index]))
        .collect()
}
