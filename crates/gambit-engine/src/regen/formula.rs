//! Sandboxed arithmetic formula evaluator for regen rules.
//!
//! Configured formulas are evaluated against named substitutions over a
//! fixed grammar: numbers, identifiers, `+ - * /`, unary minus,
//! comparisons, ternary `?:`, and the functions `min`, `max`, `ceil`,
//! `floor`, `abs`. Nothing else parses; configuration can never execute
//! code.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum FormulaError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("unknown identifier: {0}")]
    UnknownIdentifier(String),

    #[error("unknown function: {0}")]
    UnknownFunction(String),

    #[error("wrong number of arguments to {0}")]
    BadArity(String),

    #[error("division by zero")]
    DivisionByZero,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Comma,
    Question,
    Colon,
    Lt,
    Gt,
    Le,
    Ge,
    EqEq,
    Ne,
}

fn tokenize(input: &str) -> Result<Vec<Token>, FormulaError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut num = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        num.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value: f64 = num
                    .parse()
                    .map_err(|_| FormulaError::Parse(format!("bad number '{num}'")))?;
                tokens.push(Token::Num(value));
            }
            'a'..='z' | 'A'..='Z' | '_' => {
                let mut ident = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_alphanumeric() || d == '_' {
                        ident.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident));
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            '?' => {
                chars.next();
                tokens.push(Token::Question);
            }
            ':' => {
                chars.next();
                tokens.push(Token::Colon);
            }
            '<' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::Le);
                } else {
                    tokens.push(Token::Lt);
                }
            }
            '>' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::Ge);
                } else {
                    tokens.push(Token::Gt);
                }
            }
            '=' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::EqEq);
                } else {
                    return Err(FormulaError::Parse("single '=' is not an operator".into()));
                }
            }
            '!' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::Ne);
                } else {
                    return Err(FormulaError::Parse("unexpected '!'".into()));
                }
            }
            other => {
                return Err(FormulaError::Parse(format!("unexpected character '{other}'")));
            }
        }
    }
    Ok(tokens)
}

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    vars: &'a [(String, f64)],
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, token: Token) -> Result<(), FormulaError> {
        match self.next() {
            Some(t) if t == token => Ok(()),
            other => Err(FormulaError::Parse(format!(
                "expected {token:?}, found {other:?}"
            ))),
        }
    }

    // expr := comparison ('?' expr ':' expr)?
    fn expr(&mut self) -> Result<f64, FormulaError> {
        let cond = self.comparison()?;
        if self.peek() == Some(&Token::Question) {
            self.next();
            let if_true = self.expr()?;
            self.expect(Token::Colon)?;
            let if_false = self.expr()?;
            // Both branches are evaluated; the grammar has no side effects
            return Ok(if cond != 0.0 { if_true } else { if_false });
        }
        Ok(cond)
    }

    fn comparison(&mut self) -> Result<f64, FormulaError> {
        let left = self.additive()?;
        let op = match self.peek() {
            Some(Token::Lt) => Token::Lt,
            Some(Token::Gt) => Token::Gt,
            Some(Token::Le) => Token::Le,
            Some(Token::Ge) => Token::Ge,
            Some(Token::EqEq) => Token::EqEq,
            Some(Token::Ne) => Token::Ne,
            _ => return Ok(left),
        };
        self.next();
        let right = self.additive()?;
        let result = match op {
            Token::Lt => left < right,
            Token::Gt => left > right,
            Token::Le => left <= right,
            Token::Ge => left >= right,
            Token::EqEq => left == right,
            Token::Ne => left != right,
            _ => unreachable!(),
        };
        Ok(if result { 1.0 } else { 0.0 })
    }

    fn additive(&mut self) -> Result<f64, FormulaError> {
        let mut value = self.multiplicative()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.next();
                    value += self.multiplicative()?;
                }
                Some(Token::Minus) => {
                    self.next();
                    value -= self.multiplicative()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn multiplicative(&mut self) -> Result<f64, FormulaError> {
        let mut value = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.next();
                    value *= self.unary()?;
                }
                Some(Token::Slash) => {
                    self.next();
                    let divisor = self.unary()?;
                    if divisor == 0.0 {
                        return Err(FormulaError::DivisionByZero);
                    }
                    value /= divisor;
                }
                _ => return Ok(value),
            }
        }
    }

    fn unary(&mut self) -> Result<f64, FormulaError> {
        if self.peek() == Some(&Token::Minus) {
            self.next();
            return Ok(-self.unary()?);
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<f64, FormulaError> {
        match self.next() {
            Some(Token::Num(value)) => Ok(value),
            Some(Token::LParen) => {
                let value = self.expr()?;
                self.expect(Token::RParen)?;
                Ok(value)
            }
            Some(Token::Ident(name)) => {
                if self.peek() == Some(&Token::LParen) {
                    self.next();
                    let mut args = vec![self.expr()?];
                    while self.peek() == Some(&Token::Comma) {
                        self.next();
                        args.push(self.expr()?);
                    }
                    self.expect(Token::RParen)?;
                    return self.call(&name, &args);
                }
                self.vars
                    .iter()
                    .find(|(var, _)| *var == name)
                    .map(|(_, value)| *value)
                    .ok_or(FormulaError::UnknownIdentifier(name))
            }
            other => Err(FormulaError::Parse(format!("unexpected token {other:?}"))),
        }
    }

    fn call(&self, name: &str, args: &[f64]) -> Result<f64, FormulaError> {
        match name {
            "min" | "max" => {
                if args.len() < 2 {
                    return Err(FormulaError::BadArity(name.to_string()));
                }
                let fold: fn(f64, f64) -> f64 = if name == "min" { f64::min } else { f64::max };
                Ok(args.iter().copied().reduce(fold).unwrap_or(0.0))
            }
            "ceil" | "floor" | "abs" => {
                let [value] = args else {
                    return Err(FormulaError::BadArity(name.to_string()));
                };
                Ok(match name {
                    "ceil" => value.ceil(),
                    "floor" => value.floor(),
                    _ => value.abs(),
                })
            }
            _ => Err(FormulaError::UnknownFunction(name.to_string())),
        }
    }
}

/// Evaluate a formula against named substitutions.
pub fn evaluate(formula: &str, vars: &[(String, f64)]) -> Result<f64, FormulaError> {
    let tokens = tokenize(formula)?;
    if tokens.is_empty() {
        return Err(FormulaError::Parse("empty formula".into()));
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        vars,
    };
    let value = parser.expr()?;
    if parser.pos != parser.tokens.len() {
        return Err(FormulaError::Parse("trailing input".into()));
    }
    Ok(value)
}
