//! Recursive descent parser for `$filter` expressions.
//!
//! ```text
//! expr         := orExpr
//! orExpr       := andExpr ( "or" andExpr )*
//! andExpr      := term ( "and" term )*
//! term         := "(" orExpr ")" | comparison | functionCall
//! comparison   := field operator literal
//! functionCall := ("startswith" | "endswith" | "contains") "(" field "," literal ")"
//! literal      := quotedString | number | "true" | "false"
//! ```

use super::ast::{ComparisonOperator, FilterNode, Literal, LogicalOperator, StringFunction};
use super::lexer::{tokenize, Token, TokenKind};
use super::SyntaxError;

/// Parentheses nested deeper than this are rejected.
const MAX_DEPTH: usize = 32;

/// Parse a `$filter` expression.
pub fn parse(input: &str) -> Result<FilterNode, SyntaxError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(SyntaxError::new(0, "empty filter expression"));
    }

    let mut parser = Parser {
        tokens,
        index: 0,
        end: input.len(),
        depth: 0,
    };
    let expression = parser.or_expression()?;

    match parser.peek() {
        None => Ok(expression),
        Some(token) if token.kind == TokenKind::RightParen => {
            Err(SyntaxError::new(token.position, "unmatched ')'"))
        }
        Some(token) => Err(SyntaxError::new(
            token.position,
            format!("unexpected {}, expected 'and' or 'or'", token.describe()),
        )),
    }
}

struct Parser {
    tokens: Vec<Token>,
    index: usize,
    /// Length of the input, reported when it ends too early.
    end: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned();
        self.index += 1;
        token
    }

    fn next_or_end(&mut self, expected: &str) -> Result<Token, SyntaxError> {
        self.next().ok_or_else(|| {
            SyntaxError::new(self.end, format!("unexpected end of input, expected {expected}"))
        })
    }

    /// The logical operator at the current position, if any.
    fn peek_logical(&self) -> Option<LogicalOperator> {
        match self.peek() {
            Some(Token {
                kind: TokenKind::Word(word),
                ..
            }) => LogicalOperator::from_keyword(word),
            _ => None,
        }
    }

    fn or_expression(&mut self) -> Result<FilterNode, SyntaxError> {
        let mut left = self.and_expression()?;
        while self.peek_logical() == Some(LogicalOperator::Or) {
            self.next();
            let right = self.and_expression()?;
            left = FilterNode::Logical {
                operator: LogicalOperator::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn and_expression(&mut self) -> Result<FilterNode, SyntaxError> {
        let mut left = self.term()?;
        while self.peek_logical() == Some(LogicalOperator::And) {
            self.next();
            let right = self.term()?;
            left = FilterNode::and(left, right);
        }
        Ok(left)
    }

    fn term(&mut self) -> Result<FilterNode, SyntaxError> {
        let token = self.next_or_end("a field, a function call or '('")?;
        match token.kind {
            TokenKind::LeftParen => self.group(token.position),
            TokenKind::Word(word) => match StringFunction::from_name(&word) {
                Some(function)
                    if matches!(self.peek(), Some(t) if t.kind == TokenKind::LeftParen) =>
                {
                    self.function_call(function)
                }
                _ => self.comparison(word),
            },
            TokenKind::RightParen => Err(SyntaxError::new(token.position, "unmatched ')'")),
            _ => Err(SyntaxError::new(
                token.position,
                format!(
                    "unexpected {}, expected a field, a function call or '('",
                    token.describe()
                ),
            )),
        }
    }

    /// The rest of a parenthesized group, after its '(' at `open`.
    fn group(&mut self, open: usize) -> Result<FilterNode, SyntaxError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(SyntaxError::new(open, "expression is nested too deeply"));
        }
        let expression = self.or_expression()?;
        self.depth -= 1;

        match self.next() {
            Some(Token {
                kind: TokenKind::RightParen,
                ..
            }) => Ok(expression),
            Some(token) => Err(SyntaxError::new(
                token.position,
                format!("unexpected {}, expected ')'", token.describe()),
            )),
            None => Err(SyntaxError::new(open, "unmatched '('")),
        }
    }

    fn comparison(&mut self, field: String) -> Result<FilterNode, SyntaxError> {
        let token = self.next_or_end("a comparison operator")?;
        let operator = match &token.kind {
            TokenKind::Word(word) => ComparisonOperator::from_keyword(word).ok_or_else(|| {
                SyntaxError::new(token.position, format!("unknown operator '{word}'"))
            })?,
            _ => {
                return Err(SyntaxError::new(
                    token.position,
                    format!(
                        "unexpected {}, expected a comparison operator",
                        token.describe()
                    ),
                ))
            }
        };
        let literal = self.literal()?;
        Ok(FilterNode::Comparison {
            field,
            operator,
            literal,
        })
    }

    fn function_call(&mut self, function: StringFunction) -> Result<FilterNode, SyntaxError> {
        // the '(' was checked by the caller
        self.next();
        let field = match self.next_or_end("a field")? {
            Token {
                kind: TokenKind::Word(field),
                ..
            } => field,
            token => {
                return Err(SyntaxError::new(
                    token.position,
                    format!("unexpected {}, expected a field", token.describe()),
                ))
            }
        };
        self.expect(&TokenKind::Comma, "','")?;
        let literal = self.literal()?;
        self.expect(&TokenKind::RightParen, "')'")?;
        Ok(FilterNode::FunctionCall {
            function,
            field,
            literal,
        })
    }

    fn literal(&mut self) -> Result<Literal, SyntaxError> {
        let token = self.next_or_end("a literal")?;
        match token.kind {
            TokenKind::String(s) => Ok(Literal::String(s)),
            TokenKind::Number(n) => Ok(Literal::Number(n)),
            TokenKind::Word(word) if word.eq_ignore_ascii_case("true") => {
                Ok(Literal::Boolean(true))
            }
            TokenKind::Word(word) if word.eq_ignore_ascii_case("false") => {
                Ok(Literal::Boolean(false))
            }
            TokenKind::Word(word) => Err(SyntaxError::new(
                token.position,
                format!("malformed literal '{word}', strings must be single quoted"),
            )),
            _ => Err(SyntaxError::new(
                token.position,
                format!("unexpected {}, expected a literal", token.describe()),
            )),
        }
    }

    fn expect(&mut self, kind: &TokenKind, expected: &str) -> Result<(), SyntaxError> {
        let token = self.next_or_end(expected)?;
        if token.kind == *kind {
            Ok(())
        } else {
            Err(SyntaxError::new(
                token.position,
                format!("unexpected {}, expected {expected}", token.describe()),
            ))
        }
    }
}
