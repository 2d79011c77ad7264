use thiserror::Error;

/// Everything that can go wrong while turning an expression into a number.
///
/// The variants are stable: hosts match on them to pick a message, so new
/// failure modes get a new variant instead of reusing an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// Parentheses do not balance; detected before tokenizing.
    #[error("Unbalanced parentheses")]
    MalformedExpression,
    /// The shunting-yard pass found a `)` without `(` or a leftover `(`.
    #[error("Mismatched parentheses")]
    MismatchedParentheses,
    /// Operand underflow, or the program did not reduce to exactly one value.
    #[error("Invalid expression")]
    InvalidExpression,
    #[error("Division by zero")]
    DivisionByZero,
    /// A function was applied outside its domain.
    #[error("Domain error: {0}")]
    DomainError(String),
    #[error("Invalid number: '{0}'")]
    InvalidNumber(String),
    #[error("Unknown function: '{0}'")]
    UnknownFunction(String),
    #[error("Unknown character: '{0}'")]
    UnexpectedCharacter(char),
}

impl EvalError {
    pub(crate) fn domain(message: impl Into<String>) -> Self {
        EvalError::DomainError(message.into())
    }
}
