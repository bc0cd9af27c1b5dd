//! Recursive descent parser for filter expressions.

use tracing::debug;

use super::ast::{BoolOperator, Expression};
use super::dates::DateResolver;
use super::error::{FilterError, FilterResult};
use super::lexer::{FilterToken, Lexer, PositionedToken};
use crate::clock::{Clock, SystemClock};

/// Parser for to-do filter expressions.
///
/// # Grammar
///
/// ```text
/// expr  ::= term (("&" | "|") term)*
/// term  ::= "!" term | "(" expr ")" | atom
/// atom  ::= priority | "@" name | "#" name | date
/// ```
///
/// `&` and `|` share one precedence level and associate left to right;
/// use parentheses to group. `p1 | p2 & p3` is `(p1 | p2) & p3`.
///
/// A bare word shaped like `p<digits>` is kept as a raw literal and checked
/// against `p1`..`p4` only during evaluation. Every other bare phrase goes
/// through the [`DateResolver`].
///
/// # Example
///
/// ```
/// use todo_filter::filter::{Expression, FilterParser};
///
/// let expr = FilterParser::parse("p1 & @home").unwrap();
/// assert!(matches!(expr, Expression::BoolInfix { .. }));
///
/// // An empty filter matches everything.
/// assert_eq!(FilterParser::parse("").unwrap(), Expression::MatchAll);
/// ```
pub struct FilterParser {
    tokens: Vec<PositionedToken>,
    position: usize,
    resolver: DateResolver,
}

impl FilterParser {
    /// Parses a filter expression, resolving dates against the wall clock.
    ///
    /// # Errors
    ///
    /// See [`FilterParser::parse_with_clock`].
    pub fn parse(input: &str) -> FilterResult<Expression> {
        Self::parse_with_clock(input, &SystemClock)
    }

    /// Parses a filter expression, resolving dates against `clock`.
    ///
    /// The clock is read once, so every date in the expression shares the
    /// same "now".
    ///
    /// # Errors
    ///
    /// Returns `FilterError::UnexpectedEndOfInput` for a dangling operator,
    /// `FilterError::UnclosedParenthesis` for a missing `)`,
    /// `FilterError::UnexpectedToken` for misplaced operators or adjacent
    /// operands, and the lexer/date resolver errors for malformed operands.
    pub fn parse_with_clock<C>(input: &str, clock: &C) -> FilterResult<Expression>
    where
        C: Clock + ?Sized,
    {
        if input.trim().is_empty() {
            return Ok(Expression::MatchAll);
        }

        let tokens = Lexer::new(input).tokenize()?;
        let mut parser = Self {
            tokens,
            position: 0,
            resolver: DateResolver::new(clock.now()),
        };
        let expr = parser.parse_expression()?;

        // Check that we consumed all tokens
        if let Some(remaining) = parser.tokens.get(parser.position) {
            return Err(FilterError::unexpected_token(
                remaining.token.to_string(),
                remaining.position,
            ));
        }

        debug!(input, %expr, "parsed filter expression");
        Ok(expr)
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> Option<&FilterToken> {
        self.tokens.get(self.position).map(|pt| &pt.token)
    }

    /// Consumes and returns the current token.
    fn advance(&mut self) -> Option<PositionedToken> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    /// Parses `term (("&" | "|") term)*`.
    fn parse_expression(&mut self) -> FilterResult<Expression> {
        let mut left = self.parse_term()?;

        loop {
            let operator = match self.peek() {
                Some(FilterToken::And) => BoolOperator::And,
                Some(FilterToken::Or) => BoolOperator::Or,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            left = Expression::infix(left, operator, right);
        }

        Ok(left)
    }

    /// Parses `"!" term | "(" expr ")" | atom`.
    fn parse_term(&mut self) -> FilterResult<Expression> {
        let PositionedToken { token, position } =
            self.advance().ok_or(FilterError::UnexpectedEndOfInput)?;

        match token {
            FilterToken::Not => Ok(Expression::negate(self.parse_term()?)),

            FilterToken::OpenParen => {
                let inner = self.parse_expression()?;
                match self.advance() {
                    Some(PositionedToken {
                        token: FilterToken::CloseParen,
                        ..
                    }) => Ok(inner),
                    Some(other) => Err(FilterError::unexpected_token(
                        other.token.to_string(),
                        other.position,
                    )),
                    None => Err(FilterError::UnclosedParenthesis),
                }
            }

            FilterToken::Label(name) => Ok(Expression::Label(name)),
            FilterToken::Project(name) => Ok(Expression::Project(name)),

            FilterToken::Phrase(text) if is_priority_like(&text) => Ok(Expression::String(text)),
            FilterToken::Phrase(text) => Ok(Expression::DueDate(self.resolver.resolve(&text)?)),

            FilterToken::And | FilterToken::Or | FilterToken::CloseParen => {
                Err(FilterError::unexpected_token(token.to_string(), position))
            }
        }
    }
}

/// Returns true for a single word of the form `p<digits>` (either case).
fn is_priority_like(text: &str) -> bool {
    text.strip_prefix(|c: char| c == 'p' || c == 'P')
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
}
