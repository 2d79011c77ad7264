use super::error::EvalError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl Operator {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '*' => Some(Operator::Mul),
            '/' => Some(Operator::Div),
            '^' => Some(Operator::Pow),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
            Operator::Pow => '^',
        }
    }

    /// `+ -` = 1, `* /` = 2, `^` = 3.
    pub fn precedence(self) -> u8 {
        match self {
            Operator::Add | Operator::Sub => 1,
            Operator::Mul | Operator::Div => 2,
            Operator::Pow => 3,
        }
    }
}

/// Named one-argument functions understood by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Sqrt,
    Log,
    Ln,
}

impl Function {
    pub const ALL: [Function; 6] = [
        Function::Sin,
        Function::Cos,
        Function::Tan,
        Function::Sqrt,
        Function::Log,
        Function::Ln,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Sqrt => "sqrt",
            Function::Log => "log",
            Function::Ln => "ln",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Number(f64),
    Op(Operator),
    Function(Function),
    /// Prefix minus that could not be folded into a literal, e.g. `-(2+3)`.
    Negate,
    /// Postfix `%` the preprocessor could not fold, e.g. `(50)%`.
    Percent,
    LParen,
    RParen,
}

/// A `-` is unary at the very start or right after an operator or `(`.
/// Only the previous character is consulted.
fn is_unary_minus(chars: &[char], i: usize) -> bool {
    i == 0 || matches!(chars[i - 1], '+' | '-' | '*' | '/' | '^' | '(')
}

fn flush_number(number: &mut String, tokens: &mut Vec<Token>) -> Result<(), EvalError> {
    if number.is_empty() {
        return Ok(());
    }

    let value = number
        .parse::<f64>()
        .map_err(|_| EvalError::InvalidNumber(number.clone()))?;
    tokens.push(Token::Number(value));
    number.clear();
    Ok(())
}

/// Splits a preprocessed, balanced expression into tokens.
pub fn tokenize(input: &str) -> Result<Vec<Token>, EvalError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut number = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_ascii_digit() || c == '.' {
            number.push(c);
            i += 1;
            continue;
        }

        flush_number(&mut number, &mut tokens)?;

        match c {
            '-' if is_unary_minus(&chars, i) => {
                let starts_literal = chars
                    .get(i + 1)
                    .is_some_and(|next| next.is_ascii_digit() || *next == '.');
                if starts_literal {
                    number.push('-');
                } else {
                    tokens.push(Token::Negate);
                }
            }
            '+' | '-' | '*' | '/' | '^' => {
                if let Some(op) = Operator::from_char(c) {
                    tokens.push(Token::Op(op));
                }
            }
            '%' => tokens.push(Token::Percent),
            '(' => tokens.push(Token::LParen),
            ')' => tokens.push(Token::RParen),
            'a'..='z' | 'A'..='Z' => {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_alphabetic() {
                    i += 1;
                }
                let name: String = chars[start..i].iter().collect::<String>().to_lowercase();
                let function =
                    Function::from_name(&name).ok_or_else(|| EvalError::UnknownFunction(name))?;

                // A function must be called: `sin5` is not an argument list.
                if chars.get(i) != Some(&'(') {
                    return Err(EvalError::InvalidExpression);
                }
                tokens.push(Token::Function(function));
                continue;
            }
            _ => return Err(EvalError::UnexpectedCharacter(c)),
        }

        i += 1;
    }

    flush_number(&mut number, &mut tokens)?;
    Ok(tokens)
}
