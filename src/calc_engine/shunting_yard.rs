use super::error::EvalError;
use super::tokenizer::Token;

/// Should `top` leave the operator stack before a binary operator of
/// `incoming` precedence is pushed? Equal precedence pops, so every binary
/// operator, `^` included, associates to the left.
fn pops_before(top: Token, incoming: u8) -> bool {
    match top {
        Token::Op(op) => op.precedence() >= incoming,
        // Prefix minus binds tighter than any binary operator.
        Token::Negate => true,
        _ => false,
    }
}

/// Reorders infix tokens into a reverse-polish program.
pub fn to_rpn(tokens: &[Token]) -> Result<Vec<Token>, EvalError> {
    let mut output: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut operators: Vec<Token> = Vec::new();

    for &token in tokens {
        match token {
            Token::Number(_) | Token::Percent => output.push(token),
            Token::Function(_) | Token::Negate | Token::LParen => operators.push(token),
            Token::Op(op) => {
                while let Some(&top) = operators.last() {
                    if !pops_before(top, op.precedence()) {
                        break;
                    }
                    output.push(top);
                    operators.pop();
                }
                operators.push(token);
            }
            Token::RParen => {
                loop {
                    match operators.pop() {
                        Some(Token::LParen) => break,
                        Some(top) => output.push(top),
                        None => return Err(EvalError::MismatchedParentheses),
                    }
                }
                if matches!(operators.last(), Some(Token::Function(_))) {
                    output.extend(operators.pop());
                }
            }
        }
    }

    while let Some(top) = operators.pop() {
        if top == Token::LParen {
            return Err(EvalError::MismatchedParentheses);
        }
        output.push(top);
    }

    Ok(output)
}
