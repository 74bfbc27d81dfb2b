//! Productions: named grammar nonterminals.
//!
//! A production is a type-level tag associated with a rule:
//!
//! ```
//! use parseworks::prelude::*;
//!
//! struct Group;
//!
//! impl Production for Group {
//!     const NAME: &'static str = "group";
//!     fn rule() -> Rule {
//!         lit("x") | (lit("(") >> (recurse::<Group>() + lit(")")))
//!     }
//! }
//! ```
//!
//! Parsing a production enters a child scope in the context (one stack frame,
//! popped regardless of outcome), evaluates the production's rule, folds the
//! values it produced through the handler, and appends the resulting value to
//! the caller's arguments.
//!
//! [p] inherits branch capability from the production's rule, so a production
//! whose rule can decline can be used as a choice alternative. Inheriting
//! requires materializing the rule when `p` is called, which recurses forever
//! on a cyclic grammar; [recurse] defers materialization to parse time and is
//! therefore the form to use for references to productions that are not
//! defined yet, at the cost of never being a branch.

use crate::rule::{Expr, Rule};

/// A named nonterminal: a tag type associated with a rule.
pub trait Production: 'static {
    /// The production's name, used in error provenance and handler
    /// callbacks.
    const NAME: &'static str;

    /// The production's rule.
    fn rule() -> Rule;
}

/// Parses the production `P`.
pub fn p<P: Production>() -> Rule {
    let branch = P::rule().is_branch();
    Rule::new(Expr::Production {
        name: P::NAME,
        rule: P::rule,
        branch,
    })
}

/// Parses the production `P`, recursively.
///
/// Unlike [p], the production's rule is not consulted until parse time, so
/// forward and mutually recursive references work; in exchange the result
/// never has branch semantics.
pub fn recurse<P: Production>() -> Rule {
    Rule::new(Expr::Production {
        name: P::NAME,
        rule: P::rule,
        branch: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::lit;
    use crate::rule::value;

    struct Branchy;

    impl Production for Branchy {
        const NAME: &'static str = "branchy";
        fn rule() -> Rule {
            lit("a") >> value('a')
        }
    }

    #[test]
    fn p_inherits_branch_capability() {
        assert!(p::<Branchy>().is_branch());
        assert!(!recurse::<Branchy>().is_branch());
    }
}
