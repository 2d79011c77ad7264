//! BODMAS arithmetic expression evaluator.
//!
//! ```
//! use bodmas::{evaluate, AngleMode};
//!
//! assert_eq!(evaluate("2(3+4)", AngleMode::Degrees), Ok(14.0));
//! assert_eq!(evaluate("sin(30)", AngleMode::Degrees), Ok(0.5));
//! ```

pub mod calc_engine;
pub mod config;
pub mod scientific;

pub use calc_engine::{evaluate, evaluate_traced, AngleMode, EvalError, EvaluationTrace, Step};
pub use config::Config;
pub use scientific::ScientificFn;
