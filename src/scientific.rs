//! Quick and scientific functions applied to an already evaluated value.
//!
//! These guard their domains up front and report `DomainError` instead of
//! letting NaN through. Results are not rounded.

use crate::calc_engine::{apply_function, AngleMode, EvalError, Function};

const FACTORIAL_LIMIT: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScientificFn {
    Sqrt,
    Square,
    Cube,
    Inverse,
    Exp,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Log,
    Ln,
    Factorial,
    Abs,
    Floor,
    Hyp,
}

impl ScientificFn {
    pub const ALL: [ScientificFn; 17] = [
        ScientificFn::Sqrt,
        ScientificFn::Square,
        ScientificFn::Cube,
        ScientificFn::Inverse,
        ScientificFn::Exp,
        ScientificFn::Sin,
        ScientificFn::Cos,
        ScientificFn::Tan,
        ScientificFn::Asin,
        ScientificFn::Acos,
        ScientificFn::Atan,
        ScientificFn::Log,
        ScientificFn::Ln,
        ScientificFn::Factorial,
        ScientificFn::Abs,
        ScientificFn::Floor,
        ScientificFn::Hyp,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ScientificFn::Sqrt => "sqrt",
            ScientificFn::Square => "square",
            ScientificFn::Cube => "cube",
            ScientificFn::Inverse => "inverse",
            ScientificFn::Exp => "exp",
            ScientificFn::Sin => "sin",
            ScientificFn::Cos => "cos",
            ScientificFn::Tan => "tan",
            ScientificFn::Asin => "asin",
            ScientificFn::Acos => "acos",
            ScientificFn::Atan => "atan",
            ScientificFn::Log => "log",
            ScientificFn::Ln => "ln",
            ScientificFn::Factorial => "fact",
            ScientificFn::Abs => "abs",
            ScientificFn::Floor => "floor",
            ScientificFn::Hyp => "hyp",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

fn check_unit_interval(name: &str, value: f64) -> Result<(), EvalError> {
    if !(-1.0..=1.0).contains(&value) {
        return Err(EvalError::DomainError(format!(
            "{} input must be between -1 and 1",
            name
        )));
    }
    Ok(())
}

fn factorial(value: f64) -> Result<f64, EvalError> {
    let n = value.trunc();
    if n.is_nan() || !(0.0..=FACTORIAL_LIMIT).contains(&n) {
        return Err(EvalError::DomainError(
            "factorial is defined for 0 to 100 only".to_string(),
        ));
    }

    let mut result = 1.0;
    let mut i = 2.0;
    while i <= n {
        result *= i;
        i += 1.0;
    }
    Ok(result)
}

/// Applies `function` to `value`. Inverse trig results come back in the
/// unit selected by `angle_mode`.
pub fn apply(function: ScientificFn, value: f64, angle_mode: AngleMode) -> Result<f64, EvalError> {
    match function {
        ScientificFn::Sqrt => apply_function(Function::Sqrt, value, angle_mode),
        ScientificFn::Sin => apply_function(Function::Sin, value, angle_mode),
        ScientificFn::Cos => apply_function(Function::Cos, value, angle_mode),
        ScientificFn::Tan => apply_function(Function::Tan, value, angle_mode),
        ScientificFn::Log => apply_function(Function::Log, value, angle_mode),
        ScientificFn::Ln => apply_function(Function::Ln, value, angle_mode),
        ScientificFn::Square => Ok(value * value),
        ScientificFn::Cube => Ok(value * value * value),
        ScientificFn::Inverse => {
            if value == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            Ok(1.0 / value)
        }
        ScientificFn::Exp => Ok(value.exp()),
        ScientificFn::Asin => {
            check_unit_interval("asin", value)?;
            Ok(angle_mode.from_radians(value.asin()))
        }
        ScientificFn::Acos => {
            check_unit_interval("acos", value)?;
            Ok(angle_mode.from_radians(value.acos()))
        }
        ScientificFn::Atan => Ok(angle_mode.from_radians(value.atan())),
        ScientificFn::Factorial => factorial(value),
        ScientificFn::Abs => Ok(value.abs()),
        ScientificFn::Floor => Ok(value.floor()),
        ScientificFn::Hyp => {
            if value <= 0.0 {
                return Err(EvalError::DomainError(
                    "hyp requires a positive number".to_string(),
                ));
            }
            Ok((value * value + 1.0).sqrt())
        }
    }
}
