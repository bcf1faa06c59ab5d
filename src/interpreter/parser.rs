use std::rc::Rc;

use crate::ast::{BinaryOp, Expr, ExprKind, Stmt};
use crate::diagnostic::{Diagnostic, Label, Span};
use crate::lexer::Token;

#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
    pub expected: Vec<String>,
    pub found: Option<String>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            expected: Vec::new(),
            found: None,
        }
    }

    pub fn with_expected(mut self, expected: Vec<String>) -> Self {
        self.expected = expected;
        self
    }

    pub fn with_found(mut self, found: impl Into<String>) -> Self {
        self.found = Some(found.into());
        self
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let label_message = match &self.found {
            Some(found) => format!("found {}", found),
            None => String::new(),
        };

        let mut diag = Diagnostic::error(self.message.clone())
            .with_code("E0101")
            .with_label(Label::primary(self.span, label_message));

        if !self.expected.is_empty() {
            diag = diag.with_help(format!("expected {}", self.expected.join(" or ")));
        }

        diag
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// The six-plus-alias statement templates, in dispatch priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Template {
    FunctionDef,
    Conditional,
    Loop,
    Arithmetic,
    Alias,
    Assignment,
    Output,
    Call,
}

pub struct TokenParser {
    tokens: Vec<SpannedToken>,
    current: usize,
    source_len: usize,
}

impl TokenParser {
    pub fn new(tokens: Vec<SpannedToken>, source_len: usize) -> Self {
        Self {
            tokens,
            current: 0,
            source_len,
        }
    }

    pub fn from_lexer_output(
        tokens: Vec<(Token, chumsky::span::SimpleSpan)>,
        source_len: usize,
    ) -> Self {
        let spanned_tokens: Vec<SpannedToken> = tokens
            .into_iter()
            .map(|(token, span)| SpannedToken {
                token,
                span: Span::new(span.start, span.end),
            })
            .collect();
        Self::new(spanned_tokens, source_len)
    }

    fn current_token(&self) -> Option<&Token> {
        self.tokens.get(self.current).map(|st| &st.token)
    }

    fn current_span(&self) -> Span {
        self.tokens
            .get(self.current)
            .map(|st| st.span)
            .unwrap_or_else(|| Span::new(self.source_len, self.source_len))
    }

    fn advance(&mut self) -> Option<SpannedToken> {
        if self.current < self.tokens.len() {
            let st = self.tokens[self.current].clone();
            self.current += 1;
            Some(st)
        } else {
            None
        }
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.current_token() == Some(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: Token) -> Result<Span, ParseError> {
        match self.current_token() {
            Some(token) if std::mem::discriminant(token) == std::mem::discriminant(&expected) => {
                let span = self.current_span();
                self.advance();
                Ok(span)
            }
            Some(token) => {
                let err = ParseError::new("unexpected token", self.current_span())
                    .with_expected(vec![format!("{:?}", expected)])
                    .with_found(format!("{:?}", token));
                Err(err)
            }
            None => {
                let err = ParseError::new("unexpected end of input", self.current_span())
                    .with_expected(vec![format!("{:?}", expected)]);
                Err(err)
            }
        }
    }

    fn expect_ident(&mut self) -> Result<(Rc<str>, Span), ParseError> {
        match self.advance() {
            Some(SpannedToken {
                token: Token::Ident(name),
                span,
            }) => Ok((Rc::from(name.as_str()), span)),
            Some(SpannedToken { token, span }) => {
                Err(ParseError::new("expected identifier", span)
                    .with_expected(vec!["identifier".to_string()])
                    .with_found(format!("{:?}", token)))
            }
            None => Err(ParseError::new("unexpected end of input", self.current_span())
                .with_expected(vec!["identifier".to_string()])),
        }
    }

    /// The conditional comparison is fixed to the literal zero.
    fn expect_zero(&mut self) -> Result<(), ParseError> {
        match self.current_token() {
            Some(Token::Number(0)) => {
                self.advance();
                Ok(())
            }
            Some(token) => Err(ParseError::new(
                "the conditional comparison must be against the literal 0",
                self.current_span(),
            )
            .with_expected(vec!["0".to_string()])
            .with_found(format!("{:?}", token))),
            None => Err(ParseError::new("unexpected end of input", self.current_span())
                .with_expected(vec!["0".to_string()])),
        }
    }

    pub fn parse(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut statements = Vec::new();
        while self.current_token().is_some() {
            statements.push(self.parse_statement()?);
        }
        Ok(statements)
    }

    /// Look ahead to the next sentence terminator and pick the first
    /// template whose required keywords are all present. Each template
    /// needs a distinct keyword combination, so ties cannot occur.
    fn classify(&self) -> Template {
        let mut saw_define = false;
        let mut saw_times = false;
        let mut saw_block_begin = false;
        let mut saw_arith = false;
        let mut saw_following = false;
        let mut saw_called = false;
        let mut saw_assign = false;
        let mut saw_print = false;

        for st in &self.tokens[self.current..] {
            match st.token {
                Token::End => break,
                Token::Define => saw_define = true,
                Token::Times => saw_times = true,
                Token::BlockBegin => saw_block_begin = true,
                Token::Added | Token::Subtracted | Token::Product | Token::Quotient => {
                    saw_arith = true
                }
                Token::Following => saw_following = true,
                Token::Called => saw_called = true,
                Token::Assign => saw_assign = true,
                Token::Print => saw_print = true,
                _ => {}
            }
        }

        if saw_define {
            Template::FunctionDef
        } else if matches!(self.current_token(), Some(Token::If)) {
            Template::Conditional
        } else if saw_times && saw_block_begin {
            Template::Loop
        } else if saw_arith {
            Template::Arithmetic
        } else if saw_following && saw_called {
            Template::Alias
        } else if saw_assign {
            Template::Assignment
        } else if saw_print {
            Template::Output
        } else {
            Template::Call
        }
    }

    fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        match self.classify() {
            Template::FunctionDef => self.parse_function_def(),
            Template::Conditional => self.parse_conditional(),
            Template::Loop => self.parse_loop(),
            Template::Arithmetic => self.parse_arithmetic(),
            Template::Alias => self.parse_alias(),
            Template::Assignment => self.parse_assignment(),
            Template::Output => self.parse_output(),
            Template::Call => self.parse_call_statement(),
        }
    }

    /// Parse statements until the 以上。 closing this block. Nested blocks
    /// consume their own closers through recursion, which is what keeps
    /// the depth-balanced (not kind-specific) markers matched correctly.
    fn parse_block_body(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut body = Vec::new();
        loop {
            match self.current_token() {
                None => {
                    return Err(ParseError::new(
                        "unterminated block: missing 以上。 before end of input",
                        Span::new(self.source_len, self.source_len),
                    )
                    .with_expected(vec![format!("{:?}", Token::BlockEnd)]));
                }
                Some(Token::BlockEnd) => {
                    self.advance();
                    self.expect(Token::End)?;
                    return Ok(body);
                }
                _ => body.push(self.parse_statement()?),
            }
        }
    }

    fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        match self.current_token().cloned() {
            Some(Token::Number(n)) => {
                let span = self.current_span();
                self.advance();
                Ok(Expr {
                    kind: ExprKind::Number(n),
                    span,
                })
            }
            Some(Token::Ident(name)) => {
                let span = self.current_span();
                self.advance();
                if matches!(self.current_token(), Some(Token::LParen)) {
                    self.advance();
                    let mut args = Vec::new();
                    if !matches!(self.current_token(), Some(Token::RParen)) {
                        loop {
                            args.push(self.parse_expression()?);
                            if !self.eat(&Token::Comma) {
                                break;
                            }
                        }
                    }
                    let close = self.expect(Token::RParen)?;
                    Ok(Expr {
                        kind: ExprKind::Call {
                            name: Rc::from(name.as_str()),
                            args,
                        },
                        span: span.merge(close),
                    })
                } else {
                    Ok(Expr {
                        kind: ExprKind::Ident(Rc::from(name.as_str())),
                        span,
                    })
                }
            }
            Some(token) => Err(ParseError::new("expected expression", self.current_span())
                .with_expected(vec![
                    "number".to_string(),
                    "identifier".to_string(),
                    "function call".to_string(),
                ])
                .with_found(format!("{:?}", token))),
            None => Err(ParseError::new("unexpected end of input", self.current_span())
                .with_expected(vec!["expression".to_string()])),
        }
    }

    fn parse_assignment(&mut self) -> Result<Stmt, ParseError> {
        let (name, _) = self.expect_ident()?;
        self.expect(Token::Topic)?;
        let value = self.parse_expression()?;
        self.expect(Token::Assign)?;
        self.expect(Token::End)?;
        Ok(Stmt::Assign { name, value })
    }

    fn parse_output(&mut self) -> Result<Stmt, ParseError> {
        let value = self.parse_expression()?;
        self.expect(Token::Object)?;
        self.expect(Token::Print)?;
        self.expect(Token::End)?;
        Ok(Stmt::Output { value })
    }

    /// Which arithmetic template the pending sentence uses, if any.
    fn pending_operator(&self) -> Option<BinaryOp> {
        for st in &self.tokens[self.current..] {
            match st.token {
                Token::End => break,
                Token::Added => return Some(BinaryOp::Add),
                Token::Subtracted => return Some(BinaryOp::Sub),
                Token::Product => return Some(BinaryOp::Mul),
                Token::Quotient => return Some(BinaryOp::Div),
                _ => {}
            }
        }
        None
    }

    fn parse_arithmetic(&mut self) -> Result<Stmt, ParseError> {
        let op = self.pending_operator().ok_or_else(|| {
            ParseError::new("expected an arithmetic sentence", self.current_span())
        })?;

        // Each operation has its own particle skeleton:
        //   add: x に y を加えた数を z とする。
        //   sub: x から y を減じた数を z とする。
        //   mul: x と y の積を z とする。
        //   div: x を y で除した数を z とする。
        let (lead, mid, word) = match op {
            BinaryOp::Add => (Token::Dative, Token::Object, Token::Added),
            BinaryOp::Sub => (Token::Ablative, Token::Object, Token::Subtracted),
            BinaryOp::Mul => (Token::Comitative, Token::Genitive, Token::Product),
            BinaryOp::Div => (Token::Object, Token::Instrumental, Token::Quotient),
        };

        let left = self.parse_expression()?;
        self.expect(lead)?;
        let right = self.parse_expression()?;
        self.expect(mid)?;
        self.expect(word)?;
        self.expect(Token::Object)?;
        let (target, _) = self.expect_ident()?;
        self.expect(Token::Assign)?;
        self.expect(Token::End)?;

        Ok(Stmt::Arith {
            left,
            right,
            op,
            target,
        })
    }

    fn parse_loop(&mut self) -> Result<Stmt, ParseError> {
        let count = self.parse_expression()?;
        self.expect(Token::Times)?;
        self.eat(&Token::Comma);
        self.expect(Token::BlockBegin)?;
        self.expect(Token::End)?;
        let body = self.parse_block_body()?;
        Ok(Stmt::Loop { count, body })
    }

    fn parse_function_def(&mut self) -> Result<Stmt, ParseError> {
        self.eat(&Token::Function);
        let (name, _) = self.expect_ident()?;
        self.expect(Token::LParen)?;
        let mut params = Vec::new();
        if !matches!(self.current_token(), Some(Token::RParen)) {
            loop {
                let (param, _) = self.expect_ident()?;
                params.push(param);
                if !self.eat(&Token::Comma) {
                    break;
                }
            }
        }
        self.expect(Token::RParen)?;
        self.expect(Token::Object)?;
        self.eat(&Token::AsFunction);
        self.expect(Token::Define)?;
        self.expect(Token::End)?;
        let body = self.parse_block_body()?;
        Ok(Stmt::FunctionDef { name, params, body })
    }

    fn parse_conditional(&mut self) -> Result<Stmt, ParseError> {
        self.expect(Token::If)?;
        let condition = self.parse_expression()?;
        self.expect(Token::Subject)?;
        self.expect_zero()?;

        let negated = match self.current_token() {
            Some(Token::Then) => {
                self.advance();
                false
            }
            Some(Token::Unless) => {
                self.advance();
                true
            }
            Some(token) => {
                return Err(ParseError::new(
                    "expected なら or でなければ after the comparison",
                    self.current_span(),
                )
                .with_expected(vec![
                    format!("{:?}", Token::Then),
                    format!("{:?}", Token::Unless),
                ])
                .with_found(format!("{:?}", token)));
            }
            None => {
                return Err(ParseError::new(
                    "unexpected end of input",
                    self.current_span(),
                )
                .with_expected(vec![
                    format!("{:?}", Token::Then),
                    format!("{:?}", Token::Unless),
                ]));
            }
        };

        self.eat(&Token::Comma);
        self.expect(Token::BlockBegin)?;
        self.expect(Token::End)?;
        let then_body = self.parse_block_body()?;

        let else_body = if self.eat(&Token::Else) {
            // そうでなければ may stand bare or carry its own 、以下を行う。
            if self.eat(&Token::Comma) {
                self.expect(Token::BlockBegin)?;
            }
            self.eat(&Token::End);
            Some(self.parse_block_body()?)
        } else {
            None
        };

        Ok(Stmt::Conditional {
            condition,
            compares_to_zero: true,
            negated,
            then_body,
            else_body,
        })
    }

    fn parse_alias(&mut self) -> Result<Stmt, ParseError> {
        let value = self.parse_expression()?;
        self.expect(Token::LParen)?;
        self.expect(Token::Following)?;
        self.expect(Token::LQuote)?;
        let (name, _) = self.expect_ident()?;
        self.expect(Token::RQuote)?;
        self.expect(Token::Called)?;
        self.eat(&Token::End);
        self.expect(Token::RParen)?;
        self.eat(&Token::End);
        Ok(Stmt::Alias { value, name })
    }

    fn parse_call_statement(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current_span();
        let expr = self.parse_expression()?;
        if !matches!(expr.kind, ExprKind::Call { .. }) {
            return Err(ParseError::new(
                "sentence does not match any statement template",
                start.merge(expr.span),
            )
            .with_found(format!("{:?}", expr.kind)));
        }
        self.expect(Token::End)?;
        Ok(Stmt::Call(expr))
    }
}
