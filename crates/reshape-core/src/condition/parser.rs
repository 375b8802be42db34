//! Condition expression parser
//!
//! A tokenizer followed by a recursive descent parser. Precedence, lowest to
//! highest: `||`, `&&`, equality, relational and `=~`, unary, primary.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use super::ast::*;
use super::error::ConditionError;

/// Maximum nesting of parentheses and unary operators
const MAX_NESTING: usize = 64;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    String(String),
    Identifier(String),
    Binary(BinaryOperator),
    Not,
    Minus,
    LeftParen,
    RightParen,
}

#[derive(Debug, Clone)]
struct Spanned {
    token: Token,
    position: usize,
}

/// Parse a condition expression into an AST
pub fn parse(input: &str) -> Result<Expr, ConditionError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ConditionError::parse("Empty condition", 0, input));
    }
    let mut parser = Parser {
        input,
        tokens,
        index: 0,
        depth: 0,
    };
    let expr = parser.parse_or()?;
    if let Some(extra) = parser.peek() {
        return Err(ConditionError::parse(
            format!("Unexpected token {:?}", extra.token),
            extra.position,
            input,
        ));
    }
    Ok(expr)
}

fn tokenize(input: &str) -> Result<Vec<Spanned>, ConditionError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(position, ch)) = chars.peek() {
        let token = match ch {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '(' => {
                chars.next();
                Token::LeftParen
            }
            ')' => {
                chars.next();
                Token::RightParen
            }
            '\'' | '"' => {
                chars.next();
                let mut literal = String::new();
                let mut closed = false;
                while let Some((_, c)) = chars.next() {
                    match c {
                        '\\' => match chars.next() {
                            Some((_, escaped)) if escaped == ch || escaped == '\\' => {
                                literal.push(escaped)
                            }
                            Some((_, 'n')) => literal.push('\n'),
                            Some((_, 't')) => literal.push('\t'),
                            Some((_, other)) => {
                                literal.push('\\');
                                literal.push(other);
                            }
                            None => break,
                        },
                        c if c == ch => {
                            closed = true;
                            break;
                        }
                        c => literal.push(c),
                    }
                }
                if !closed {
                    return Err(ConditionError::parse("Unterminated string literal", position, input));
                }
                Token::String(literal)
            }
            c if c.is_ascii_digit() || (c == '.' && next_is_digit(input, position + 1)) => {
                let mut end = position;
                let mut previous = '\0';
                while let Some(&(i, c)) = chars.peek() {
                    let exponent_sign = matches!(c, '+' | '-') && matches!(previous, 'e' | 'E');
                    if c.is_ascii_alphanumeric() || c == '.' || exponent_sign {
                        end = i + c.len_utf8();
                        previous = c;
                        chars.next();
                    } else {
                        break;
                    }
                }
                let text = &input[position..end];
                let number = text.parse::<f64>().map_err(|_| {
                    ConditionError::parse(format!("Invalid number '{}'", text), position, input)
                })?;
                Token::Number(number)
            }
            c if c.is_alphabetic() || c == '_' || c == '$' => {
                let mut end = position;
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_alphanumeric() || matches!(c, '_' | '$' | '.') {
                        end = i + c.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                Token::Identifier(input[position..end].to_string())
            }
            _ => {
                chars.next();
                let next = chars.peek().map(|&(_, c)| c);
                let third = input.get(position + 2..).and_then(|rest| rest.chars().next());
                match (ch, next) {
                    ('|', Some('|')) => {
                        chars.next();
                        Token::Binary(BinaryOperator::Or)
                    }
                    ('&', Some('&')) => {
                        chars.next();
                        Token::Binary(BinaryOperator::And)
                    }
                    ('=', Some('=')) => {
                        chars.next();
                        if third == Some('=') {
                            chars.next();
                            Token::Binary(BinaryOperator::StrictEqual)
                        } else {
                            Token::Binary(BinaryOperator::Equal)
                        }
                    }
                    ('=', Some('~')) => {
                        chars.next();
                        Token::Binary(BinaryOperator::RegexMatch)
                    }
                    ('!', Some('=')) => {
                        chars.next();
                        if third == Some('=') {
                            chars.next();
                            Token::Binary(BinaryOperator::StrictNotEqual)
                        } else {
                            Token::Binary(BinaryOperator::NotEqual)
                        }
                    }
                    ('<', Some('=')) => {
                        chars.next();
                        Token::Binary(BinaryOperator::LessThanOrEqual)
                    }
                    ('>', Some('=')) => {
                        chars.next();
                        Token::Binary(BinaryOperator::GreaterThanOrEqual)
                    }
                    ('<', _) => Token::Binary(BinaryOperator::LessThan),
                    ('>', _) => Token::Binary(BinaryOperator::GreaterThan),
                    ('!', _) => Token::Not,
                    ('-', _) => Token::Minus,
                    ('=', _) => {
                        return Err(ConditionError::parse(
                            "Assignment is not allowed, use '==' or '==='",
                            position,
                            input,
                        ))
                    }
                    (other, _) => {
                        return Err(ConditionError::parse(
                            format!("Unexpected character '{}'", other),
                            position,
                            input,
                        ))
                    }
                }
            }
        };
        tokens.push(Spanned { token, position });
    }

    Ok(tokens)
}

fn next_is_digit(input: &str, offset: usize) -> bool {
    input
        .get(offset..)
        .and_then(|rest| rest.chars().next())
        .map(|c| c.is_ascii_digit())
        .unwrap_or(false)
}

struct Parser<'a> {
    input: &'a str,
    tokens: Vec<Spanned>,
    index: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.index)
    }

    fn advance(&mut self) -> Option<Spanned> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn end_position(&self) -> usize {
        self.input.len()
    }

    fn peek_binary(&self, accepted: &[BinaryOperator]) -> Option<BinaryOperator> {
        match self.peek().map(|spanned| &spanned.token) {
            Some(Token::Binary(op)) if accepted.contains(op) => Some(*op),
            _ => None,
        }
    }

    fn enter(&mut self, position: usize) -> Result<(), ConditionError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(ConditionError::parse(
                format!("Expression nested deeper than {} levels", MAX_NESTING),
                position,
                self.input,
            ));
        }
        Ok(())
    }

    fn binary_level(
        &mut self,
        operators: &[BinaryOperator],
        next: fn(&mut Self) -> Result<Expr, ConditionError>,
    ) -> Result<Expr, ConditionError> {
        let mut left = next(self)?;
        while let Some(operator) = self.peek_binary(operators) {
            self.advance();
            let right = next(self)?;
            left = Expr::Binary {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_or(&mut self) -> Result<Expr, ConditionError> {
        self.binary_level(&[BinaryOperator::Or], Self::parse_and)
    }

    fn parse_and(&mut self) -> Result<Expr, ConditionError> {
        self.binary_level(&[BinaryOperator::And], Self::parse_equality)
    }

    fn parse_equality(&mut self) -> Result<Expr, ConditionError> {
        self.binary_level(
            &[
                BinaryOperator::Equal,
                BinaryOperator::NotEqual,
                BinaryOperator::StrictEqual,
                BinaryOperator::StrictNotEqual,
            ],
            Self::parse_relational,
        )
    }

    fn parse_relational(&mut self) -> Result<Expr, ConditionError> {
        self.binary_level(
            &[
                BinaryOperator::LessThan,
                BinaryOperator::LessThanOrEqual,
                BinaryOperator::GreaterThan,
                BinaryOperator::GreaterThanOrEqual,
                BinaryOperator::RegexMatch,
            ],
            Self::parse_unary,
        )
    }

    fn parse_unary(&mut self) -> Result<Expr, ConditionError> {
        let operator = match self.peek().map(|spanned| (&spanned.token, spanned.position)) {
            Some((Token::Not, position)) => Some((UnaryOperator::Not, position)),
            Some((Token::Minus, position)) => Some((UnaryOperator::Negate, position)),
            _ => None,
        };

        match operator {
            Some((operator, position)) => {
                self.advance();
                self.enter(position)?;
                let operand = self.parse_unary()?;
                self.depth -= 1;
                Ok(Expr::Unary {
                    operator,
                    operand: Box::new(operand),
                })
            }
            None => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ConditionError> {
        let Some(Spanned { token, position }) = self.advance() else {
            return Err(ConditionError::parse(
                "Unexpected end of condition",
                self.end_position(),
                self.input,
            ));
        };

        match token {
            Token::Number(n) => Ok(Expr::Literal(Literal::Number(n))),
            Token::String(s) => Ok(Expr::Literal(Literal::String(s))),
            Token::Identifier(name) => Ok(match name.as_str() {
                "true" => Expr::Literal(Literal::Boolean(true)),
                "false" => Expr::Literal(Literal::Boolean(false)),
                "null" => Expr::Literal(Literal::Null),
                "undefined" => Expr::Literal(Literal::Undefined),
                _ => {
                    if name.starts_with('.') || name.ends_with('.') || name.contains("..") {
                        return Err(ConditionError::parse(
                            format!("Invalid field reference '{}'", name),
                            position,
                            self.input,
                        ));
                    }
                    Expr::Field(name)
                }
            }),
            Token::LeftParen => {
                self.enter(position)?;
                let inner = self.parse_or()?;
                self.depth -= 1;
                match self.advance() {
                    Some(Spanned {
                        token: Token::RightParen,
                        ..
                    }) => Ok(inner),
                    Some(other) => Err(ConditionError::parse(
                        "Expected ')'",
                        other.position,
                        self.input,
                    )),
                    None => Err(ConditionError::parse(
                        "Expected ')' before end of condition",
                        self.end_position(),
                        self.input,
                    )),
                }
            }
            other => Err(ConditionError::parse(
                format!("Unexpected token {:?}", other),
                position,
                self.input,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str) -> Box<Expr> {
        Box::new(Expr::Field(name.to_string()))
    }

    fn number(n: f64) -> Box<Expr> {
        Box::new(Expr::Literal(Literal::Number(n)))
    }

    #[test]
    fn test_parse_comparison() {
        let expr = parse("age > 18").unwrap();
        assert_eq!(
            expr,
            Expr::Binary {
                left: field("age"),
                operator: BinaryOperator::GreaterThan,
                right: number(18.0),
            }
        );
    }

    #[test]
    fn test_precedence() {
        let expr = parse("a || b && c").unwrap();
        assert_eq!(expr.to_string(), "(a || (b && c))");

        let expr = parse("(a || b) && !c").unwrap();
        assert_eq!(expr.to_string(), "((a || b) && !c)");

        let expr = parse("x + 1").unwrap_err();
        assert!(matches!(expr, ConditionError::Parse { position: 2, .. }));
    }

    #[test]
    fn test_strict_operators() {
        assert_eq!(parse("a === 'x'").unwrap().to_string(), "(a === 'x')");
        assert_eq!(parse("a !== null").unwrap().to_string(), "(a !== null)");
        assert_eq!(parse("a != 1").unwrap().to_string(), "(a != 1)");
    }

    #[test]
    fn test_literals_and_paths() {
        let expr = parse("user.address.city == \"Lisbon\"").unwrap();
        assert_eq!(expr.fields(), vec!["user.address.city"]);

        let expr = parse("flag == true && other != undefined").unwrap();
        assert_eq!(expr.fields(), vec!["flag", "other"]);

        assert_eq!(parse("-1.5e2 < x").unwrap().to_string(), "(-150 < x)");
        assert_eq!(parse("x >= .5").unwrap().to_string(), "(x >= 0.5)");
    }

    #[test]
    fn test_regex_operator() {
        let expr = parse("email =~ '^[a-z]+@'").unwrap();
        assert_eq!(expr.to_string(), "(email =~ '^[a-z]+@')");
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse("").is_err());
        assert!(parse("   ").is_err());
        assert!(parse("a = 1").is_err());
        assert!(parse("(a > 1").is_err());
        assert!(parse("a >").is_err());
        assert!(parse("'open").is_err());
        assert!(parse("a.").is_err());
        assert!(parse("a b").is_err());
        assert!(parse("12abc > 1").is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}a{}", "(".repeat(100), ")".repeat(100));
        assert!(parse(&deep).is_err());

        let shallow = format!("{}a{}", "(".repeat(10), ")".repeat(10));
        assert!(parse(&shallow).is_ok());
    }
}
