use crate::ast::{Expression, Value};
use crate::session::Session;
use crate::token::{Token, TokenType};

#[derive(Debug)]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

/// Parses one expression out of the token sequence. A parse failure is
/// reported to the session and yields no tree.
pub fn parse(tokens: &[Token], session: &mut Session) -> Option<Expression> {
    let mut parser = Parser::new(tokens);
    match parser.expression() {
        Ok(expression) => Some(expression),
        Err(error) => {
            session.parse_error(&error.token, &error.message);
            None
        }
    }
}

pub struct Parser<'a> {
    tokens: &'a [Token],
    current: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Parser<'a> {
        Parser { tokens, current: 0 }
    }
    fn expression(&mut self) -> Result<Expression, ParseError> {
        self.equality()
    }
    fn equality(&mut self) -> Result<Expression, ParseError> {
        let mut expression = self.comparison()?;
        loop {
            match self.peek().tokentype {
                TokenType::Enak | TokenType::NiEnak => {
                    self.advance();
                    let operator = self.previous().clone();
                    let right = self.comparison()?;
                    expression = Expression::Binary {
                        left: Box::new(expression),
                        operator,
                        right: Box::new(right),
                    };
                }
                _ => break,
            }
        }
        Ok(expression)
    }
    fn comparison(&mut self) -> Result<Expression, ParseError> {
        let mut expression = self.term()?;
        loop {
            match self.peek().tokentype {
                TokenType::Vecji
                | TokenType::VecjiAliEnak
                | TokenType::Manjsi
                | TokenType::ManjsiAliEnak => {
                    self.advance();
                    let operator = self.previous().clone();
                    let right = self.term()?;
                    expression = Expression::Binary {
                        left: Box::new(expression),
                        operator,
                        right: Box::new(right),
                    };
                }
                _ => break,
            }
        }
        Ok(expression)
    }
    fn term(&mut self) -> Result<Expression, ParseError> {
        let mut expression = self.factor()?;
        loop {
            match self.peek().tokentype {
                TokenType::Minus | TokenType::Plus => {
                    self.advance();
                    let operator = self.previous().clone();
                    let right = self.factor()?;
                    expression = Expression::Binary {
                        left: Box::new(expression),
                        operator,
                        right: Box::new(right),
                    };
                }
                _ => break,
            }
        }
        Ok(expression)
    }
    fn factor(&mut self) -> Result<Expression, ParseError> {
        let mut expression = self.unary()?;
        loop {
            match self.peek().tokentype {
                TokenType::Slash | TokenType::Star => {
                    self.advance();
                    let operator = self.previous().clone();
                    let right = self.unary()?;
                    expression = Expression::Binary {
                        left: Box::new(expression),
                        operator,
                        right: Box::new(right),
                    };
                }
                _ => break,
            }
        }
        Ok(expression)
    }
    fn unary(&mut self) -> Result<Expression, ParseError> {
        match self.peek().tokentype {
            TokenType::Ni | TokenType::Minus => {
                self.advance();
                let operator = self.previous().clone();
                let right = self.unary()?;
                Ok(Expression::Unary {
                    operator,
                    right: Box::new(right),
                })
            }
            _ => self.primary(),
        }
    }
    fn primary(&mut self) -> Result<Expression, ParseError> {
        match &self.peek().tokentype {
            TokenType::Neresnicno => {
                self.advance();
                Ok(Expression::Literal(Value::Boolean(false)))
            }
            TokenType::Resnicno => {
                self.advance();
                Ok(Expression::Literal(Value::Boolean(true)))
            }
            TokenType::Prazno => {
                self.advance();
                Ok(Expression::Literal(Value::Nil))
            }
            TokenType::Number(x) => {
                let value = *x;
                self.advance();
                Ok(Expression::Literal(Value::Number(value)))
            }
            TokenType::Str(s) => {
                let value = s.clone();
                self.advance();
                Ok(Expression::Literal(Value::String(value)))
            }
            TokenType::LeftParen => {
                self.advance();
                let expression = self.expression()?;
                match self.peek().tokentype {
                    TokenType::RightParen => {
                        self.advance();
                        Ok(Expression::Grouping(Box::new(expression)))
                    }
                    _ => Err(self.error("Po izrazu pričakujem ')'.")),
                }
            }
            _ => Err(self.error("Pričakovan izraz.")),
        }
    }
    // Statement-boundary recovery. The expression-only grammar never gets
    // here, but grammar growth past expressions will.
    #[allow(dead_code)]
    fn synchronize(&mut self) {
        self.advance();
        while !self.is_at_end() {
            if let TokenType::Semicolon = self.previous().tokentype {
                return;
            }
            match self.peek().tokentype {
                TokenType::Razred
                | TokenType::Preslikava
                | TokenType::NajIma
                | TokenType::ZaVsak
                | TokenType::Ce
                | TokenType::Dokler
                | TokenType::Izpisi
                | TokenType::Vrni => return,
                _ => (),
            }
            self.advance();
        }
    }
    fn advance(&mut self) -> &'a Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }
    fn is_at_end(&self) -> bool {
        match self.peek().tokentype {
            TokenType::Eof => true,
            _ => false,
        }
    }
    fn peek(&self) -> &'a Token {
        self.tokens.get(self.current).unwrap()
    }
    fn previous(&self) -> &'a Token {
        self.tokens
            .get(if self.current > 0 {
                self.current - 1
            } else {
                0
            })
            .expect("Failed to get previous")
    }
    fn error(&self, message: &str) -> ParseError {
        ParseError {
            token: self.peek().clone(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod parser_tests {
    use crate::ast::{Expression, Value};
    use crate::parser;
    use crate::scanner;
    use crate::session::Session;
    use crate::token::TokenType;

    fn parse_source(source: &str) -> (Option<Expression>, bool) {
        let mut session = Session::new();
        let tokens = scanner::scan_tokens(source, &mut session);
        let expression = parser::parse(&tokens, &mut session);
        (expression, session.had_error)
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let (expression, had_error) = parse_source("1 + 2 * 3");
        assert!(!had_error);
        match expression.unwrap() {
            Expression::Binary {
                operator, right, ..
            } => {
                assert!(matches!(operator.tokentype, TokenType::Plus));
                match *right {
                    Expression::Binary { operator, .. } => {
                        assert!(matches!(operator.tokentype, TokenType::Star))
                    }
                    _ => panic!("right child should be the multiplication"),
                }
            }
            _ => panic!("root should be the addition"),
        }
    }

    #[test]
    fn subtraction_chains_to_the_left() {
        let (expression, _) = parse_source("1 - 2 - 3");
        match expression.unwrap() {
            Expression::Binary { left, operator, .. } => {
                assert!(matches!(operator.tokentype, TokenType::Minus));
                assert!(matches!(
                    *left,
                    Expression::Binary {
                        operator: ref inner,
                        ..
                    } if matches!(inner.tokentype, TokenType::Minus)
                ));
            }
            _ => panic!("root should be the second subtraction"),
        }
    }

    #[test]
    fn grouping_overrides_precedence() {
        let (expression, _) = parse_source("(1 + 2) * 3");
        match expression.unwrap() {
            Expression::Binary { left, operator, .. } => {
                assert!(matches!(operator.tokentype, TokenType::Star));
                assert!(matches!(*left, Expression::Grouping(_)));
            }
            _ => panic!("root should be the multiplication"),
        }
    }

    #[test]
    fn negation_nests_to_the_right() {
        let (expression, _) = parse_source("ni ni resnicno");
        match expression.unwrap() {
            Expression::Unary { operator, right } => {
                assert!(matches!(operator.tokentype, TokenType::Ni));
                assert!(matches!(*right, Expression::Unary { .. }));
            }
            _ => panic!("root should be the outer negation"),
        }
    }

    #[test]
    fn slovene_comparison_operators_parse() {
        let (expression, had_error) = parse_source("2 vecji od 1");
        assert!(!had_error);
        match expression.unwrap() {
            Expression::Binary { operator, .. } => {
                assert!(matches!(operator.tokentype, TokenType::Vecji));
                assert_eq!(operator.lexeme, "vecji od");
            }
            _ => panic!("root should be the comparison"),
        }
    }

    #[test]
    fn nil_literal() {
        let (expression, _) = parse_source("prazno");
        assert!(matches!(
            expression.unwrap(),
            Expression::Literal(Value::Nil)
        ));
    }

    #[test]
    fn missing_close_paren_is_a_parse_error() {
        let (expression, had_error) = parse_source("(1 + 2");
        assert!(had_error);
        assert!(expression.is_none());
    }

    #[test]
    fn lone_operator_is_a_parse_error() {
        let (expression, had_error) = parse_source("+");
        assert!(had_error);
        assert!(expression.is_none());
    }
}
