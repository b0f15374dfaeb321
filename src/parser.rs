/*!
Pratt parser for Monkey
=======================

Turns the scanner's token stream into a [`Program`].  The parser never
aborts: every structural problem becomes one [`ParseError`], the statement
being built is dropped, and parsing resumes at the next statement boundary.

Grammar (EBNF — condensed)
--------------------------

```text
program        → statement* EOF ;
statement      → letStmt | returnStmt | exprStmt ;
letStmt        → "let" IDENT "=" expression ";"? ;
returnStmt     → "return" expression? ";"? ;
exprStmt       → expression ";"? ;
block          → "{" statement* ( "}" | EOF ) ;
expression     → prefix ( infix )* ;                 (precedence climbing)
prefix         → IDENT | INT | STRING | "true" | "false"
               | ( "!" | "-" ) expression
               | "(" expression ")"
               | "if" "(" expression ")" block ( "else" block )?
               | "fn" "(" params? ")" block
               | "[" list? "]"
               | "{" ( pair ( "," pair )* )? "}" ;
infix          → binop expression | "(" list? ")" | "[" expression "]" ;
pair           → expression ":" expression ;
```

Binding strength, lowest to highest:

| Level         | Tokens        |
|---------------|---------------|
| `Equals`      | `==` `!=`     |
| `LessGreater` | `<` `>`       |
| `Sum`         | `+` `-`       |
| `Product`     | `*` `/`       |
| `Prefix`      | `-x` `!x`     |
| `Call`        | `f(x)` `a[i]` |

### Logging Policy

| Location                    | Level   | Purpose                                 |
|-----------------------------|---------|-----------------------------------------|
| `Parser::new`, `parse_program` | `info` | Lifecycle milestones.                |
| statement / expression rules | `debug`| High‑level descent into grammar rules.  |
| token movement              | `trace` | Per‑token noise, off unless asked for.  |
*/

use std::rc::Rc;

use crate::error::ParseError;
use crate::expr::{Expr, FunctionLiteral, Identifier, InfixOperator, PrefixOperator};
use crate::stmt::{BlockStatement, Program, Stmt};
use crate::token::{Token, TokenType};

use log::{debug, info, trace};

/// Operator binding strength.  Derived ordering follows declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
}

impl Precedence {
    /// Infix precedence of `token_type`; `Lowest` for tokens that cannot
    /// continue an expression.
    pub fn of(token_type: TokenType) -> Self {
        match token_type {
            TokenType::EQUAL_EQUAL | TokenType::BANG_EQUAL => Precedence::Equals,
            TokenType::LESS | TokenType::GREATER => Precedence::LessGreater,
            TokenType::PLUS | TokenType::MINUS => Precedence::Sum,
            TokenType::STAR | TokenType::SLASH => Precedence::Product,
            TokenType::LEFT_PAREN | TokenType::LEFT_BRACKET => Precedence::Call,
            _ => Precedence::Lowest,
        }
    }
}

/// A failed rule has already pushed its diagnostic; `None` only says "abort
/// this statement".
type Parsed<T> = Option<T>;

/// Top‑level parser over an owned token buffer.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    errors: Vec<ParseError>,
}

impl Parser {
    /// Construct a new parser.  A trailing `EOF` is appended when the stream
    /// does not already end with one.
    pub fn new<I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = Token>,
    {
        let mut tokens: Vec<Token> = tokens.into_iter().collect();

        if !tokens.last().is_some_and(|t| t.is(TokenType::EOF)) {
            let line = tokens.last().map_or(1, |t| t.line);
            tokens.push(Token::new(TokenType::EOF, "", line));
        }

        info!("Parser created with {} tokens", tokens.len());

        Self {
            tokens,
            current: 0,
            errors: Vec::new(),
        }
    }

    // ───────────────────────── public API ─────────────────────────

    /// Diagnostics collected so far.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }

    /// Parse an entire program.  Statements that failed are left out; check
    /// [`Parser::errors`] before trusting the result.
    pub fn parse_program(&mut self) -> Program {
        info!("Beginning parse phase");

        let mut program = Program::default();

        while !self.cur_is(TokenType::EOF) {
            match self.parse_statement() {
                Some(stmt) => {
                    program.statements.push(stmt);
                    self.next_token();
                }
                None => self.synchronize(),
            }
        }

        info!(
            "Parsed {} statement(s) with {} error(s)",
            program.statements.len(),
            self.errors.len()
        );

        program
    }

    // ───────────────────────── statement rules ────────────────────

    /// On success the current token is the last token of the statement.
    fn parse_statement(&mut self) -> Parsed<Stmt> {
        match self.cur().token_type {
            TokenType::LET => self.parse_let_statement(),
            TokenType::RETURN => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Parsed<Stmt> {
        debug!("Entering let statement");

        let token = self.cur().clone();

        self.expect_peek(TokenType::IDENTIFIER)?;
        let name = Identifier::new(self.cur().clone());

        self.expect_peek(TokenType::EQUAL)?;
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;

        if self.peek_is(TokenType::SEMICOLON) {
            self.next_token();
        }

        Some(Stmt::Let { token, name, value })
    }

    fn parse_return_statement(&mut self) -> Parsed<Stmt> {
        debug!("Entering return statement");

        let token = self.cur().clone();

        let ends_here = matches!(
            self.peek().token_type,
            TokenType::SEMICOLON | TokenType::RIGHT_BRACE | TokenType::EOF
        );

        let value = if ends_here {
            None
        } else {
            self.next_token();
            Some(self.parse_expression(Precedence::Lowest)?)
        };

        if self.peek_is(TokenType::SEMICOLON) {
            self.next_token();
        }

        Some(Stmt::Return { token, value })
    }

    fn parse_expression_statement(&mut self) -> Parsed<Stmt> {
        let token = self.cur().clone();
        let expression = self.parse_expression(Precedence::Lowest)?;

        if self.peek_is(TokenType::SEMICOLON) {
            self.next_token();
        }

        Some(Stmt::Expression { token, expression })
    }

    /// Current token is `{`.  Ends on the matching `}` or at end‑of‑input.
    fn parse_block_statement(&mut self) -> Parsed<BlockStatement> {
        let token = self.cur().clone();
        let mut statements = Vec::new();

        self.next_token();

        while !self.cur_is(TokenType::RIGHT_BRACE) && !self.cur_is(TokenType::EOF) {
            statements.push(self.parse_statement()?);
            self.next_token();
        }

        debug!("Parsed block with {} statement(s)", statements.len());

        Some(BlockStatement { token, statements })
    }

    // ─────────────────────── expression rules (Pratt) ─────────────

    fn parse_expression(&mut self, precedence: Precedence) -> Parsed<Expr> {
        trace!(
            "parse_expression at {} with threshold {:?}",
            self.cur(),
            precedence
        );

        let mut left = self.parse_prefix()?;

        while !self.peek_is(TokenType::SEMICOLON) && precedence < self.peek_precedence() {
            self.next_token();
            left = self.parse_infix(left)?;
        }

        Some(left)
    }

    fn parse_prefix(&mut self) -> Parsed<Expr> {
        let token = self.cur().clone();

        match token.token_type {
            TokenType::IDENTIFIER => Some(Expr::Identifier(Identifier::new(token))),
            TokenType::INTEGER => self.parse_integer_literal(token),
            TokenType::STRING => {
                let value = token.literal.clone();
                Some(Expr::Str { token, value })
            }
            TokenType::TRUE | TokenType::FALSE => {
                let value = token.is(TokenType::TRUE);
                Some(Expr::Boolean { token, value })
            }
            TokenType::BANG => self.parse_prefix_expression(token, PrefixOperator::Bang),
            TokenType::MINUS => self.parse_prefix_expression(token, PrefixOperator::Minus),
            TokenType::LEFT_PAREN => self.parse_grouped_expression(),
            TokenType::IF => self.parse_if_expression(token),
            TokenType::FUNCTION => self.parse_function_literal(token),
            TokenType::LEFT_BRACKET => {
                let elements = self.parse_expression_list(TokenType::RIGHT_BRACKET)?;
                Some(Expr::Array { token, elements })
            }
            TokenType::LEFT_BRACE => self.parse_hash_literal(token),
            other => {
                self.error(
                    token.line,
                    format!("no prefix parse function for {} found", other),
                );
                None
            }
        }
    }

    /// Current token is the operator, `(` or `[` that follows `left`.
    fn parse_infix(&mut self, left: Expr) -> Parsed<Expr> {
        let token = self.cur().clone();

        let operator = match token.token_type {
            TokenType::LEFT_PAREN => {
                let arguments = self.parse_expression_list(TokenType::RIGHT_PAREN)?;
                return Some(Expr::Call {
                    token,
                    function: Box::new(left),
                    arguments,
                });
            }
            TokenType::LEFT_BRACKET => return self.parse_index_expression(token, left),
            TokenType::PLUS => InfixOperator::Plus,
            TokenType::MINUS => InfixOperator::Minus,
            TokenType::STAR => InfixOperator::Star,
            TokenType::SLASH => InfixOperator::Slash,
            TokenType::LESS => InfixOperator::Less,
            TokenType::GREATER => InfixOperator::Greater,
            TokenType::EQUAL_EQUAL => InfixOperator::Equal,
            TokenType::BANG_EQUAL => InfixOperator::NotEqual,
            other => {
                // Precedence::of keeps this unreachable for well‑formed tables.
                self.error(
                    token.line,
                    format!("no infix parse function for {} found", other),
                );
                return None;
            }
        };

        let precedence = self.cur_precedence();
        self.next_token();
        let right = self.parse_expression(precedence)?;

        Some(Expr::Infix {
            token,
            left: Box::new(left),
            operator,
            right: Box::new(right),
        })
    }

    fn parse_integer_literal(&mut self, token: Token) -> Parsed<Expr> {
        match token.literal.parse::<i64>() {
            Ok(value) => Some(Expr::Integer { token, value }),
            Err(_) => {
                self.error(
                    token.line,
                    format!("could not parse \"{}\" as integer", token.literal),
                );
                None
            }
        }
    }

    fn parse_prefix_expression(&mut self, token: Token, operator: PrefixOperator) -> Parsed<Expr> {
        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;

        Some(Expr::Prefix {
            token,
            operator,
            right: Box::new(right),
        })
    }

    fn parse_grouped_expression(&mut self) -> Parsed<Expr> {
        self.next_token();
        let expr = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenType::RIGHT_PAREN)?;

        Some(expr)
    }

    fn parse_if_expression(&mut self, token: Token) -> Parsed<Expr> {
        debug!("Entering if expression");

        self.expect_peek(TokenType::LEFT_PAREN)?;
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenType::RIGHT_PAREN)?;

        self.expect_peek(TokenType::LEFT_BRACE)?;
        let consequence = self.parse_block_statement()?;

        let alternative = if self.peek_is(TokenType::ELSE) {
            self.next_token();
            self.expect_peek(TokenType::LEFT_BRACE)?;
            Some(self.parse_block_statement()?)
        } else {
            None
        };

        Some(Expr::If {
            token,
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    fn parse_function_literal(&mut self, token: Token) -> Parsed<Expr> {
        debug!("Entering function literal");

        self.expect_peek(TokenType::LEFT_PAREN)?;
        let parameters = self.parse_function_parameters()?;

        self.expect_peek(TokenType::LEFT_BRACE)?;
        let body = self.parse_block_statement()?;

        Some(Expr::Function(Rc::new(FunctionLiteral {
            token,
            parameters,
            body,
        })))
    }

    /// Current token is `(`; finishes on `)`.
    fn parse_function_parameters(&mut self) -> Parsed<Vec<Identifier>> {
        let mut parameters = Vec::new();

        if self.peek_is(TokenType::RIGHT_PAREN) {
            self.next_token();
            return Some(parameters);
        }

        self.expect_peek(TokenType::IDENTIFIER)?;
        parameters.push(Identifier::new(self.cur().clone()));

        while self.peek_is(TokenType::COMMA) {
            self.next_token();
            self.expect_peek(TokenType::IDENTIFIER)?;
            parameters.push(Identifier::new(self.cur().clone()));
        }

        self.expect_peek(TokenType::RIGHT_PAREN)?;

        Some(parameters)
    }

    /// Comma separated expressions; the current token is the opener and the
    /// list finishes on `end`.
    fn parse_expression_list(&mut self, end: TokenType) -> Parsed<Vec<Expr>> {
        let mut list = Vec::new();

        if self.peek_is(end) {
            self.next_token();
            return Some(list);
        }

        self.next_token();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_is(TokenType::COMMA) {
            self.next_token();
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        self.expect_peek(end)?;

        Some(list)
    }

    fn parse_index_expression(&mut self, token: Token, left: Expr) -> Parsed<Expr> {
        self.next_token();
        let index = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenType::RIGHT_BRACKET)?;

        Some(Expr::Index {
            token,
            left: Box::new(left),
            index: Box::new(index),
        })
    }

    fn parse_hash_literal(&mut self, token: Token) -> Parsed<Expr> {
        let mut pairs = Vec::new();

        while !self.peek_is(TokenType::RIGHT_BRACE) {
            self.next_token();
            let key = self.parse_expression(Precedence::Lowest)?;

            self.expect_peek(TokenType::COLON)?;

            self.next_token();
            let value = self.parse_expression(Precedence::Lowest)?;

            pairs.push((key, value));

            if !self.peek_is(TokenType::RIGHT_BRACE) {
                self.expect_peek(TokenType::COMMA)?;
            }
        }

        self.expect_peek(TokenType::RIGHT_BRACE)?;

        Some(Expr::Hash { token, pairs })
    }

    // ────────────────────── utility helpers ───────────────────────

    #[inline(always)]
    fn cur(&self) -> &Token {
        &self.tokens[self.current]
    }

    /// The token after the current one; the final `EOF` repeats forever.
    #[inline(always)]
    fn peek(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.current + 1).min(last)]
    }

    #[inline(always)]
    fn cur_is(&self, token_type: TokenType) -> bool {
        self.cur().is(token_type)
    }

    #[inline(always)]
    fn peek_is(&self, token_type: TokenType) -> bool {
        self.peek().is(token_type)
    }

    fn cur_precedence(&self) -> Precedence {
        Precedence::of(self.cur().token_type)
    }

    fn peek_precedence(&self) -> Precedence {
        Precedence::of(self.peek().token_type)
    }

    fn next_token(&mut self) {
        if self.current + 1 < self.tokens.len() {
            self.current += 1;
        }

        trace!("Advanced to {}", self.cur());
    }

    /// Advance iff the next token has kind `expected`, otherwise record the
    /// mismatch and abort the current statement.
    fn expect_peek(&mut self, expected: TokenType) -> Parsed<()> {
        if self.peek_is(expected) {
            self.next_token();
            return Some(());
        }

        let peek = self.peek();
        let (line, found) = (peek.line, peek.token_type);

        self.error(
            line,
            format!(
                "expected next token to be {}, got {} instead",
                expected, found
            ),
        );

        None
    }

    fn error(&mut self, line: usize, message: String) {
        self.errors.push(ParseError::new(line, message));
    }

    /// Discards tokens until it thinks it is at a statement boundary: just
    /// past a `;`, or on a `let` / `return` keyword.
    fn synchronize(&mut self) {
        self.next_token(); // skip the token that caused the error

        while !self.cur_is(TokenType::EOF) {
            if self.tokens[self.current - 1].is(TokenType::SEMICOLON) {
                return;
            }

            if matches!(self.cur().token_type, TokenType::LET | TokenType::RETURN) {
                return;
            }

            self.next_token();
        }
    }
}

/// Parse a token stream into a program plus every diagnostic found.
pub fn parse<I>(tokens: I) -> (Program, Vec<ParseError>)
where
    I: IntoIterator<Item = Token>,
{
    let mut parser = Parser::new(tokens);
    let program = parser.parse_program();

    (program, parser.into_errors())
}
