//! Text rewriting that runs before tokenizing.
//!
//! Display glyphs become ASCII operators, constants become literals, literal
//! `a^b` and `a%` are folded, and implicit multiplication is made explicit.
//! Named functions are left alone; the tokenizer turns them into tokens.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::f64::consts::{E, PI};
use tracing::trace;

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"[A-Za-z]+").unwrap();

    /// `a^b` on plain literals. The base may not continue a number or an
    /// earlier power, so chains fold left to right.
    static ref POWER_OF_LITERALS: Regex =
        Regex::new(r"(^|[^\d.^])(\d+(?:\.\d*)?)\^(\d+(?:\.\d*)?)").unwrap();

    static ref PERCENT_OF_LITERAL: Regex = Regex::new(r"(^|[^\d.])(\d+(?:\.\d*)?)%").unwrap();

    static ref DIGIT_BEFORE_PAREN: Regex = Regex::new(r"(\d)\(").unwrap();
    static ref PAREN_BEFORE_DIGIT: Regex = Regex::new(r"\)(\d)").unwrap();
    static ref PAREN_BEFORE_PAREN: Regex = Regex::new(r"\)\(").unwrap();
    static ref VALUE_BEFORE_NAME: Regex = Regex::new(r"([\d)])([a-z])").unwrap();
}

/// Rewrites user input into the plain operator/number text the tokenizer reads.
///
/// Never fails; anything it does not recognise is passed through for the
/// tokenizer to reject.
pub fn preprocess(expr: &str) -> String {
    let normalized: String = expr
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '×' => '*',
            '÷' => '/',
            '−' => '-',
            other => other,
        })
        .collect();

    let with_constants = substitute_constants(&normalized);
    let folded = fold_percent(&fold_power(&with_constants));
    let explicit = insert_implicit_multiplication(&folded);
    let prepared = explicit.replace("()", "(0)");

    trace!(input = expr, output = %prepared, "preprocessed expression");
    prepared
}

/// Folded values are parenthesised so they never fuse with a neighbouring digit.
fn literal(value: f64) -> String {
    format!("({})", value)
}

fn substitute_constants(expr: &str) -> String {
    let expr = expr.replace('π', &literal(PI));

    IDENTIFIER
        .replace_all(&expr, |caps: &Captures| {
            let name = caps[0].to_lowercase();
            match name.as_str() {
                "pi" => literal(PI),
                "e" => literal(E),
                _ => name,
            }
        })
        .into_owned()
}

fn fold_power(expr: &str) -> String {
    POWER_OF_LITERALS
        .replace_all(expr, |caps: &Captures| {
            let value = match (caps[2].parse::<f64>(), caps[3].parse::<f64>()) {
                (Ok(base), Ok(exponent)) => Some(base.powf(exponent)),
                _ => None,
            };

            match value.filter(|v| v.is_finite()) {
                Some(v) => format!("{}{}", &caps[1], literal(v)),
                // Overflow is the evaluator's business.
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn fold_percent(expr: &str) -> String {
    PERCENT_OF_LITERAL
        .replace_all(expr, |caps: &Captures| match caps[2].parse::<f64>() {
            Ok(n) => format!("{}{}", &caps[1], literal(n / 100.0)),
            Err(_) => caps[0].to_string(),
        })
        .into_owned()
}

fn insert_implicit_multiplication(expr: &str) -> String {
    let expr = DIGIT_BEFORE_PAREN.replace_all(expr, "${1}*(");
    let expr = PAREN_BEFORE_DIGIT.replace_all(&expr, ")*${1}");
    let expr = PAREN_BEFORE_PAREN.replace_all(&expr, ")*(");
    VALUE_BEFORE_NAME.replace_all(&expr, "${1}*${2}").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_glyphs_and_whitespace() {
        assert_eq!(preprocess("3 × 4 ÷ 2"), "3*4/2");
        assert_eq!(preprocess(" 7 − 2 "), "7-2");
    }

    #[test]
    fn test_constants_are_parenthesised() {
        assert_eq!(preprocess("π"), "(3.141592653589793)");
        assert_eq!(preprocess("e"), "(2.718281828459045)");
        assert_eq!(preprocess("2π"), "2*(3.141592653589793)");
        assert_eq!(preprocess("PI"), "(3.141592653589793)");
    }

    #[test]
    fn test_function_names_survive() {
        assert_eq!(preprocess("sqrt(16)"), "sqrt(16)");
        assert_eq!(preprocess("SIN(30)"), "sin(30)");
        assert_eq!(preprocess("2sin(30)"), "2*sin(30)");
        assert_eq!(preprocess("(1)cos(0)"), "(1)*cos(0)");
    }

    #[test]
    fn test_power_fold() {
        assert_eq!(preprocess("2^3"), "(8)");
        assert_eq!(preprocess("2 ^ 3"), "(8)");
        assert_eq!(preprocess("1+3^2"), "1+(9)");
        assert_eq!(preprocess("4^0.5"), "(2)");
        assert_eq!(preprocess("2^3."), "(8)");
        assert_eq!(preprocess("3.^2"), "(9)");
    }

    #[test]
    fn test_power_chain_folds_only_the_leftmost_pair() {
        // The rest is left-associative in the evaluator: (2^3)^2.
        assert_eq!(preprocess("2^3^2"), "(8)^2");
    }

    #[test]
    fn test_power_fold_skips_non_literals() {
        assert_eq!(preprocess("(2)^3"), "(2)^3");
        assert_eq!(preprocess("2^-1"), "2^-1");
        assert_eq!(preprocess(".3^2"), ".3^2");
        assert_eq!(preprocess("10^400"), "10^400");
    }

    #[test]
    fn test_percent_fold() {
        assert_eq!(preprocess("50%"), "(0.5)");
        assert_eq!(preprocess("200+10%"), "200+(0.1)");
        assert_eq!(preprocess("(50)%"), "(50)%");
        assert_eq!(preprocess("50.%"), "(0.5)");
    }

    #[test]
    fn test_folded_value_does_not_fuse_with_next_digit() {
        assert_eq!(preprocess("50%2"), "(0.5)*2");
    }

    #[test]
    fn test_implicit_multiplication() {
        assert_eq!(preprocess("2(3+4)"), "2*(3+4)");
        assert_eq!(preprocess("(3+4)2"), "(3+4)*2");
        assert_eq!(preprocess("(1)(2)"), "(1)*(2)");
    }

    #[test]
    fn test_empty_parens_become_zero() {
        assert_eq!(preprocess("()"), "(0)");
        assert_eq!(preprocess("1+()"), "1+(0)");
    }

    #[test]
    fn test_unknown_names_pass_through() {
        assert_eq!(preprocess("foo(1)"), "foo(1)");
        assert_eq!(preprocess("2x"), "2*x");
    }
}
