//! Arithmetic expression engine.
//!
//! `evaluate` runs the whole pipeline: balance check, preprocessing,
//! tokenizing, shunting-yard to RPN, RPN execution, and rounding to eight
//! decimal places. Every call owns all of its state, so the engine can be
//! called from any number of threads at once.

mod balance;
mod error;
mod preprocess;
mod rpn;
mod shunting_yard;
mod tokenizer;

pub use balance::is_balanced;
pub use error::EvalError;
pub use preprocess::preprocess;
pub use rpn::eval_rpn;
pub use shunting_yard::to_rpn;
pub use tokenizer::{tokenize, Function, Operator, Token};

pub(crate) use rpn::apply_function;

use serde::Deserialize;
use std::fmt;
use tracing::{debug, warn};

const ROUNDING_SCALE: f64 = 1e8;

/// How trigonometric inputs and outputs are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleMode {
    #[default]
    Degrees,
    Radians,
}

impl AngleMode {
    pub fn from_degrees_flag(is_degrees: bool) -> Self {
        if is_degrees {
            AngleMode::Degrees
        } else {
            AngleMode::Radians
        }
    }

    pub fn to_radians(self, angle: f64) -> f64 {
        match self {
            AngleMode::Degrees => angle.to_radians(),
            AngleMode::Radians => angle,
        }
    }

    pub fn from_radians(self, angle: f64) -> f64 {
        match self {
            AngleMode::Degrees => angle.to_degrees(),
            AngleMode::Radians => angle,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            AngleMode::Degrees => AngleMode::Radians,
            AngleMode::Radians => AngleMode::Degrees,
        }
    }
}

impl fmt::Display for AngleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AngleMode::Degrees => write!(f, "DEG"),
            AngleMode::Radians => write!(f, "RAD"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub operation: String,
    pub result: f64,
}

/// Step-by-step record of an evaluation; only filled when `detailed_mode` is on.
#[derive(Debug, Clone, Default)]
pub struct EvaluationTrace {
    pub steps: Vec<Step>,
    pub detailed_mode: bool,
}

impl EvaluationTrace {
    pub fn new(detailed_mode: bool) -> Self {
        EvaluationTrace {
            steps: Vec::new(),
            detailed_mode,
        }
    }

    pub fn add_step(&mut self, operation: String, result: f64) {
        if self.detailed_mode {
            self.steps.push(Step { operation, result });
        }
    }
}

/// Rounds to eight decimals to hide binary representation noise
/// (`0.1 + 0.2` comes back as `0.3`). Values too large to scale are
/// already far coarser than 1e-8 and are returned as they are.
///
/// Ties go toward positive infinity: `-0.5e-8` becomes `0`, not `-1e-8`.
pub fn round_result(value: f64) -> f64 {
    let scaled = value * ROUNDING_SCALE;
    if !scaled.is_finite() {
        return value;
    }
    (scaled + 0.5).floor() / ROUNDING_SCALE
}

/// Evaluates `expression` and returns the rounded result.
pub fn evaluate(expression: &str, angle_mode: AngleMode) -> Result<f64, EvalError> {
    evaluate_traced(expression, angle_mode, &mut EvaluationTrace::new(false))
}

/// Same as [`evaluate`], recording each executed step into `trace`.
pub fn evaluate_traced(
    expression: &str,
    angle_mode: AngleMode,
    trace: &mut EvaluationTrace,
) -> Result<f64, EvalError> {
    let expression = if expression.trim().is_empty() {
        "0"
    } else {
        expression
    };

    if !is_balanced(expression) {
        warn!(expression, "rejected unbalanced expression");
        return Err(EvalError::MalformedExpression);
    }

    let prepared = preprocess(expression);
    let tokens = tokenize(&prepared)?;
    let program = to_rpn(&tokens)?;
    debug!(%prepared, ?program, "compiled expression");

    let value = eval_rpn(&program, angle_mode, trace)?;
    Ok(round_result(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_result() {
        assert_eq!(round_result(0.1 + 0.2), 0.3);
        assert_eq!(round_result(1.0 / 3.0), 0.33333333);
        assert_eq!(round_result(-2.0), -2.0);
        assert_eq!(round_result(-0.5e-8), 0.0);
        assert_eq!(round_result(0.5e-8), 1e-8);
        assert_eq!(round_result(-1.5), -1.5);
        assert_eq!(round_result(1e305), 1e305);
        assert!(round_result(f64::NAN).is_nan());
        assert_eq!(round_result(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn test_empty_expression_is_zero() {
        assert_eq!(evaluate("", AngleMode::Degrees), Ok(0.0));
        assert_eq!(evaluate("   ", AngleMode::Degrees), Ok(0.0));
    }

    #[test]
    fn test_angle_mode_helpers() {
        assert_eq!(AngleMode::from_degrees_flag(true), AngleMode::Degrees);
        assert_eq!(AngleMode::from_degrees_flag(false), AngleMode::Radians);
        assert_eq!(AngleMode::Degrees.toggled(), AngleMode::Radians);
        assert_eq!(AngleMode::Radians.to_radians(1.5), 1.5);
        assert_eq!(AngleMode::Degrees.from_radians(std::f64::consts::PI), 180.0);
        assert_eq!(AngleMode::Degrees.to_string(), "DEG");
    }

    #[test]
    fn test_traced_evaluation_keeps_steps() {
        let mut trace = EvaluationTrace::new(true);
        let result = evaluate_traced("(2+3)*4", AngleMode::Degrees, &mut trace);
        assert_eq!(result, Ok(20.0));
        let operations: Vec<&str> = trace.steps.iter().map(|s| s.operation.as_str()).collect();
        assert_eq!(operations, vec!["2 + 3", "5 * 4"]);
    }
}
