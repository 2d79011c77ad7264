use super::error::EvalError;
use super::tokenizer::{Function, Operator, Token};
use super::{AngleMode, EvaluationTrace};

fn apply_operator(op: Operator, a: f64, b: f64) -> Result<f64, EvalError> {
    match op {
        Operator::Add => Ok(a + b),
        Operator::Sub => Ok(a - b),
        Operator::Mul => Ok(a * b),
        Operator::Div => {
            if b == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            Ok(a / b)
        }
        Operator::Pow => Ok(a.powf(b)),
    }
}

pub(crate) fn apply_function(
    function: Function,
    x: f64,
    angle_mode: AngleMode,
) -> Result<f64, EvalError> {
    match function {
        Function::Sin => Ok(angle_mode.to_radians(x).sin()),
        Function::Cos => Ok(angle_mode.to_radians(x).cos()),
        Function::Tan => Ok(angle_mode.to_radians(x).tan()),
        Function::Sqrt => {
            if x < 0.0 {
                return Err(EvalError::domain("sqrt of a negative number"));
            }
            Ok(x.sqrt())
        }
        Function::Log => {
            if x <= 0.0 {
                return Err(EvalError::domain("log requires a positive number"));
            }
            Ok(x.log10())
        }
        Function::Ln => {
            if x <= 0.0 {
                return Err(EvalError::domain("ln requires a positive number"));
            }
            Ok(x.ln())
        }
    }
}

fn pop(stack: &mut Vec<f64>) -> Result<f64, EvalError> {
    stack.pop().ok_or(EvalError::InvalidExpression)
}

/// Runs a reverse-polish program on a fresh value stack.
///
/// Binary operators pop the right operand first, so `a b -` is `a - b`.
/// The result is returned unrounded.
pub fn eval_rpn(
    program: &[Token],
    angle_mode: AngleMode,
    trace: &mut EvaluationTrace,
) -> Result<f64, EvalError> {
    let mut stack: Vec<f64> = Vec::new();

    for &token in program {
        match token {
            Token::Number(n) => stack.push(n),
            Token::Op(op) => {
                let b = pop(&mut stack)?;
                let a = pop(&mut stack)?;
                let result = apply_operator(op, a, b)?;
                trace.add_step(format!("{} {} {}", a, op.symbol(), b), result);
                stack.push(result);
            }
            Token::Negate => {
                let x = pop(&mut stack)?;
                trace.add_step(format!("-({})", x), -x);
                stack.push(-x);
            }
            Token::Percent => {
                let x = pop(&mut stack)?;
                let result = x / 100.0;
                trace.add_step(format!("{}%", x), result);
                stack.push(result);
            }
            Token::Function(function) => {
                let x = pop(&mut stack)?;
                let result = apply_function(function, x, angle_mode)?;
                trace.add_step(format!("{}({})", function.name(), x), result);
                stack.push(result);
            }
            // The shunting-yard pass never emits parentheses.
            Token::LParen | Token::RParen => return Err(EvalError::InvalidExpression),
        }
    }

    match stack.as_slice() {
        [value] => Ok(*value),
        _ => Err(EvalError::InvalidExpression),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> Token {
        Token::Number(n)
    }

    fn op(c: char) -> Token {
        Token::Op(Operator::from_char(c).unwrap())
    }

    fn run(program: &[Token]) -> Result<f64, EvalError> {
        eval_rpn(program, AngleMode::Radians, &mut EvaluationTrace::new(false))
    }

    #[test]
    fn test_operand_order() {
        assert_eq!(run(&[num(10.0), num(4.0), op('-')]), Ok(6.0));
        assert_eq!(run(&[num(8.0), num(2.0), op('/')]), Ok(4.0));
        assert_eq!(run(&[num(2.0), num(10.0), op('^')]), Ok(1024.0));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(run(&[num(5.0), num(0.0), op('/')]), Err(EvalError::DivisionByZero));
        assert_eq!(run(&[num(5.0), num(-0.0), op('/')]), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_power_follows_ieee() {
        assert_eq!(run(&[num(0.0), num(-1.0), op('^')]), Ok(f64::INFINITY));
        assert!(run(&[num(-8.0), num(0.5), op('^')]).unwrap().is_nan());
    }

    #[test]
    fn test_unary_tokens() {
        assert_eq!(run(&[num(3.0), Token::Negate]), Ok(-3.0));
        assert_eq!(run(&[num(50.0), Token::Percent]), Ok(0.5));
        assert_eq!(run(&[num(16.0), Token::Function(Function::Sqrt)]), Ok(4.0));
    }

    #[test]
    fn test_operand_underflow() {
        assert_eq!(run(&[op('+')]), Err(EvalError::InvalidExpression));
        assert_eq!(run(&[num(1.0), op('*')]), Err(EvalError::InvalidExpression));
        assert_eq!(run(&[Token::Negate]), Err(EvalError::InvalidExpression));
    }

    #[test]
    fn test_leftover_values() {
        assert_eq!(run(&[num(1.0), num(2.0)]), Err(EvalError::InvalidExpression));
        assert_eq!(run(&[]), Err(EvalError::InvalidExpression));
    }

    #[test]
    fn test_domain_errors() {
        assert!(matches!(
            run(&[num(-1.0), Token::Function(Function::Sqrt)]),
            Err(EvalError::DomainError(_))
        ));
        assert!(matches!(
            run(&[num(0.0), Token::Function(Function::Log)]),
            Err(EvalError::DomainError(_))
        ));
        assert!(matches!(
            run(&[num(-2.0), Token::Function(Function::Ln)]),
            Err(EvalError::DomainError(_))
        ));
    }

    #[test]
    fn test_trig_respects_angle_mode() {
        let mut trace = EvaluationTrace::new(false);
        let degrees = eval_rpn(
            &[num(90.0), Token::Function(Function::Sin)],
            AngleMode::Degrees,
            &mut trace,
        )
        .unwrap();
        assert!((degrees - 1.0).abs() < 1e-12);

        let radians = run(&[num(0.0), Token::Function(Function::Cos)]).unwrap();
        assert_eq!(radians, 1.0);
    }

    #[test]
    fn test_trace_records_each_step() {
        let mut trace = EvaluationTrace::new(true);
        let result = eval_rpn(
            &[num(2.0), num(3.0), num(4.0), op('*'), op('+')],
            AngleMode::Radians,
            &mut trace,
        );
        assert_eq!(result, Ok(14.0));
        assert_eq!(trace.steps.len(), 2);
        assert_eq!(trace.steps[0].operation, "3 * 4");
        assert_eq!(trace.steps[0].result, 12.0);
        assert_eq!(trace.steps[1].operation, "2 + 12");
    }

    #[test]
    fn test_trace_disabled_records_nothing() {
        let mut trace = EvaluationTrace::new(false);
        run(&[num(1.0), num(1.0), op('+')]).unwrap();
        let _ = eval_rpn(&[num(1.0), num(1.0), op('+')], AngleMode::Radians, &mut trace);
        assert!(trace.steps.is_empty());
    }
}
