//! The rule tree and its composition algebra.
//!
//! Rules are classified by three capability predicates:
//!
//! - *token*: a terminal backed by an engine ([Rule::is_token]);
//! - *branch*: can be asked to try parsing, committing or backtracking
//!   ([Rule::is_branch]);
//! - *pattern*: matches without producing values and its failure is
//!   recoverable ([Rule::is_pattern]), which makes it usable as a branch
//!   condition and inside `while_`.
//!
//! Every token is both a branch and a pattern. The predicates are checked
//! when rules are composed; composing rules that lack a required capability
//! panics, so invalid grammars fail at construction time rather than during
//! a parse.
//!
//! Composition is written with operators: `a + b` for sequence, `a | b` for
//! choice, `condition >> then` for a branch, and `token - exception` for a
//! minus token.

use crate::token::{self, TokenRule};
use crate::value::Value;
use std::ops;
use std::rc;

/// A grammar fragment with a parse contract.
///
/// Rules are cheap to clone: the tree is reference counted and shared.
#[derive(Debug, Clone)]
pub struct Rule {
    pub(crate) expr: rc::Rc<Expr>,
}

/// The rule kinds. Evaluation has a single dispatch point over this type, in
/// [`crate::parser`].
#[derive(Debug)]
pub(crate) enum Expr {
    Token(TokenRule),
    /// Matches a token and delivers its lexeme as an argument.
    Capture(TokenRule),
    /// Delivers a constant argument without consuming input.
    Value(Value),
    Seq(Vec<Rule>),
    Choice(Vec<Rule>),
    Branch {
        condition: Rule,
        then: Option<Rule>,
    },
    While {
        condition: Rule,
        then: Option<Rule>,
    },
    Delimited(DelimitedRule),
    Production {
        name: &'static str,
        rule: fn() -> Rule,
        branch: bool,
    },
    Whitespaced {
        rule: Rule,
        ws: Rule,
    },
    NoWhitespace(Rule),
    /// Reports an error unconditionally. The final alternative of an escape
    /// choice.
    Raise(RaiseKind),
}

#[derive(Debug)]
pub(crate) struct DelimitedRule {
    pub open: Rule,
    pub close: Rule,
    pub content: TokenRule,
    pub escape: Option<Rule>,
    pub ws: Option<Rule>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RaiseKind {
    InvalidEscape,
}

impl Rule {
    pub(crate) fn new(expr: Expr) -> Rule {
        Rule {
            expr: rc::Rc::new(expr),
        }
    }

    /// True if this rule is a terminal backed by an engine.
    pub fn is_token(&self) -> bool {
        matches!(&*self.expr, Expr::Token(_))
    }

    /// True if this rule can be tried: asked to parse speculatively,
    /// committing or backtracking.
    pub fn is_branch(&self) -> bool {
        match &*self.expr {
            Expr::Token(_) | Expr::Capture(_) => true,
            // Value and raise rules are unconditional branches: they always
            // commit without consuming input.
            Expr::Value(_) | Expr::Raise(_) => true,
            Expr::Branch { .. } | Expr::Delimited(_) => true,
            Expr::Choice(_) => true,
            Expr::Production { branch, .. } => *branch,
            Expr::Whitespaced { rule, .. } | Expr::NoWhitespace(rule) => rule.is_branch(),
            Expr::Seq(_) | Expr::While { .. } => false,
        }
    }

    /// True if this rule matches without producing values and its failure is
    /// recoverable.
    pub fn is_pattern(&self) -> bool {
        match &*self.expr {
            Expr::Token(_) => true,
            Expr::Seq(elements) | Expr::Choice(elements) => {
                elements.iter().all(Rule::is_pattern)
            }
            Expr::Branch { condition, then } => {
                condition.is_pattern() && then.as_ref().map_or(true, Rule::is_pattern)
            }
            Expr::While { condition, then } => {
                condition.is_pattern() && then.as_ref().map_or(true, Rule::is_pattern)
            }
            Expr::Whitespaced { rule, .. } | Expr::NoWhitespace(rule) => rule.is_pattern(),
            Expr::Capture(_)
            | Expr::Value(_)
            | Expr::Delimited(_)
            | Expr::Production { .. }
            | Expr::Raise(_) => false,
        }
    }

    /// Attaches a whitespace skipper that runs before every token within this
    /// rule.
    ///
    /// Panics if `ws` is not a pattern.
    pub fn whitespaced(self, ws: Rule) -> Rule {
        if !ws.is_pattern() {
            panic!["a whitespace rule must be a pattern"];
        }
        Rule::new(Expr::Whitespaced { rule: self, ws })
    }

    /// The matcher form: matches this rule against the reader without a
    /// context, producing no values, observations or errors. On failure the
    /// reader is restored.
    ///
    /// Panics if this rule is not a pattern.
    pub fn matches(&self, reader: &mut crate::reader::Reader) -> bool {
        crate::parser::match_expr(reader, self, None)
    }

    pub(crate) fn choice(alternatives: Vec<Rule>) -> Rule {
        let mut checked = Vec::with_capacity(alternatives.len());
        for alternative in alternatives {
            checked.push(into_branch(alternative));
        }
        Rule::new(Expr::Choice(checked))
    }
}

/// Disables any outer whitespace skipper for `rule`.
pub fn no_whitespace(rule: Rule) -> Rule {
    Rule::new(Expr::NoWhitespace(rule))
}

/// Matches `token` and delivers the matched lexeme as an argument.
///
/// Panics if `token` is not a token.
pub fn capture(token: Rule) -> Rule {
    Rule::new(Expr::Capture(token::expect_token(&token, "capture")))
}

/// Delivers `v` as an argument without consuming input.
pub fn value(v: impl Into<Value>) -> Rule {
    Rule::new(Expr::Value(v.into()))
}

fn into_branch(rule: Rule) -> Rule {
    if rule.is_branch() {
        rule
    } else if rule.is_pattern() {
        // A pattern becomes a branch whose condition is the whole pattern.
        Rule::new(Expr::Branch {
            condition: rule,
            then: None,
        })
    } else {
        panic!["every alternative of a choice must be a branch or a pattern"];
    }
}

/// Sequence: parse the left rule, then the right rule.
impl ops::Add for Rule {
    type Output = Rule;

    fn add(self, rhs: Rule) -> Rule {
        let mut elements: Vec<Rule> = match &*self.expr {
            Expr::Seq(elements) => elements.clone(),
            _ => vec![self.clone()],
        };
        match &*rhs.expr {
            Expr::Seq(rhs_elements) => elements.extend(rhs_elements.iter().cloned()),
            _ => elements.push(rhs.clone()),
        }
        Rule::new(Expr::Seq(elements))
    }
}

/// Choice: try each alternative in order.
impl ops::BitOr for Rule {
    type Output = Rule;

    fn bitor(self, rhs: Rule) -> Rule {
        let mut alternatives: Vec<Rule> = match &*self.expr {
            Expr::Choice(alternatives) => alternatives.clone(),
            _ => vec![self.clone()],
        };
        alternatives.push(rhs);
        Rule::choice(alternatives)
    }
}

/// Branch: if the condition matches, the branch commits and the right rule
/// must succeed.
impl ops::Shr for Rule {
    type Output = Rule;

    fn shr(self, rhs: Rule) -> Rule {
        if !self.is_token() && !self.is_pattern() {
            panic!["the condition of a branch must be a token or a pattern"];
        }
        Rule::new(Expr::Branch {
            condition: self,
            then: Some(rhs),
        })
    }
}

/// Minus: match the left token, then fail if the right token matches the
/// whole of the left token's lexeme.
impl ops::Sub for Rule {
    type Output = Rule;

    fn sub(self, rhs: Rule) -> Rule {
        token::minus(&self, &rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{any_char, lit};

    #[test]
    fn capabilities() {
        assert!(lit("a").is_token());
        assert!(lit("a").is_branch());
        assert!(lit("a").is_pattern());

        let seq = lit("a") + lit("b");
        assert!(!seq.is_token());
        assert!(!seq.is_branch());
        assert!(seq.is_pattern());

        let branch = lit("a") >> value('x');
        assert!(branch.is_branch());
        assert!(!branch.is_pattern());

        let choice = lit("a") | lit("b");
        assert!(choice.is_branch());
        assert!(choice.is_pattern());

        assert!(!value('x').is_pattern());
        assert!(value('x').is_branch());
        assert!(!capture(any_char()).is_pattern());
    }

    #[test]
    fn sequences_flatten() {
        let rule = lit("a") + lit("b") + lit("c");
        match &*rule.expr {
            Expr::Seq(elements) => assert_eq!(elements.len(), 3),
            _ => panic!["expected a sequence"],
        }
    }

    #[test]
    fn choices_flatten() {
        let rule = lit("a") | lit("b") | lit("c");
        match &*rule.expr {
            Expr::Choice(alternatives) => assert_eq!(alternatives.len(), 3),
            _ => panic!["expected a choice"],
        }
    }

    #[test]
    fn pattern_alternatives_become_branches() {
        let rule = (lit("a") + lit("b")) | lit("c");
        match &*rule.expr {
            Expr::Choice(alternatives) => assert!(alternatives[0].is_branch()),
            _ => panic!["expected a choice"],
        }
    }

    #[test]
    #[should_panic]
    fn value_cannot_be_a_condition() {
        let _ = value('x') >> lit("a");
    }

    #[test]
    #[should_panic]
    fn minus_requires_tokens() {
        let _ = (lit("a") + lit("b")) - lit("c");
    }
}
