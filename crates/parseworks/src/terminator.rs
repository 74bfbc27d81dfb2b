//! Terminator sugar.
//!
//! A terminator wraps rules that must end with a fixed token, so the token
//! does not have to be repeated after every inner rule:
//!
//! ```
//! use parseworks::prelude::*;
//!
//! let semicolon = term(lit(";"));
//! let statement = semicolon.while_(lit("abc"));
//! # let _ = statement;
//! ```

use crate::repeat;
use crate::rule::Rule;

/// Builder wrapping rules with a terminating token. Created by [term].
#[derive(Debug, Clone)]
pub struct Terminator {
    terminator: Rule,
}

/// Builds a terminator from the token or branch that ends each rule.
pub fn term(terminator: Rule) -> Terminator {
    if !terminator.is_branch() {
        panic!["a terminator must be a branch"];
    }
    Terminator { terminator }
}

impl Terminator {
    /// `inner` followed by the terminator.
    pub fn of(&self, inner: Rule) -> Rule {
        inner + self.terminator.clone()
    }

    /// Zero or more `inner`, then the terminator.
    pub fn while_(&self, inner: Rule) -> Rule {
        repeat::while_(inner) + self.terminator.clone()
    }

    /// One or more `inner`, then the terminator.
    pub fn while_one(&self, inner: Rule) -> Rule {
        repeat::while_one(inner) + self.terminator.clone()
    }

    /// The terminator alone, or `inner` followed by the terminator.
    pub fn opt(&self, inner: Rule) -> Rule {
        self.terminator.clone() | (inner + self.terminator.clone())
    }
}
