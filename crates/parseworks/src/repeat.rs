//! Iteration combinators.

use crate::rule::{Expr, Rule};

/// Matches `pattern` as often as possible, including not at all.
///
/// The argument is usually a pattern; a `condition >> then` branch is also
/// accepted, in which case each successful condition triggers a parse of the
/// body and a body failure is fatal (the condition has already committed).
/// The rule itself never fails.
///
/// Panics if the argument is neither a pattern nor a branch built with `>>`.
pub fn while_(pattern: Rule) -> Rule {
    let (condition, then) = match &*pattern.expr {
        Expr::Branch { condition, then } => (condition.clone(), then.clone()),
        _ if pattern.is_pattern() => (pattern, None),
        _ => panic!["while_ requires a pattern or a branch"],
    };
    Rule::new(Expr::While { condition, then })
}

/// Matches `pattern` at least once, then as often as possible.
pub fn while_one(pattern: Rule) -> Rule {
    pattern.clone() + while_(pattern)
}

/// Matches `then` once, then `while_(condition >> then)`.
pub fn do_while(then: Rule, condition: Rule) -> Rule {
    then.clone() + while_(condition >> then)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::Reader;
    use crate::token::lit;

    #[test]
    fn while_matcher_always_succeeds() {
        let rule = while_(lit("ab"));
        let mut reader = Reader::new("ababx");
        assert!(rule.matches(&mut reader));
        assert_eq!(reader.position().to_usize(), 4);

        let mut reader = Reader::new("x");
        assert!(rule.matches(&mut reader));
        assert_eq!(reader.position().to_usize(), 0);
    }

    #[test]
    fn while_matcher_restores_failed_iteration() {
        // Condition `a` commits each iteration; the body `b` fails on the
        // trailing `ac`, and the matcher restores to the start of that
        // iteration.
        let rule = while_(lit("a") >> lit("b"));
        let mut reader = Reader::new("ababac");
        assert!(rule.matches(&mut reader));
        assert_eq!(reader.position().to_usize(), 4);
    }

    #[test]
    #[should_panic]
    fn while_requires_a_pattern() {
        while_(crate::rule::value('x'));
    }
}
