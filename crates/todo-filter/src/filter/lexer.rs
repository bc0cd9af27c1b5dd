//! Lexer (tokenizer) for filter expressions.

use std::fmt;

use super::error::{FilterError, FilterResult};

/// A token with its position in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedToken {
    /// The token.
    pub token: FilterToken,
    /// The byte position where the token starts (0-indexed).
    pub position: usize,
}

/// A token in a filter expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterToken {
    // ==================== Operands ====================
    /// A label reference (prefixed with @).
    Label(String),

    /// A project reference (prefixed with #).
    Project(String),

    /// A run of bare words, e.g. `p1`, `today`, `due before 10 Feb 2020 3pm`.
    /// Words are joined by a single space; case is preserved.
    Phrase(String),

    // ==================== Operators ====================
    /// The AND operator (`&`).
    And,

    /// The OR operator (`|`).
    Or,

    /// The NOT operator (`!`).
    Not,

    /// Opening parenthesis `(`.
    OpenParen,

    /// Closing parenthesis `)`.
    CloseParen,
}

impl fmt::Display for FilterToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterToken::Label(name) => write!(f, "@{name}"),
            FilterToken::Project(name) => write!(f, "#{name}"),
            FilterToken::Phrase(text) => write!(f, "{text}"),
            FilterToken::And => write!(f, "&"),
            FilterToken::Or => write!(f, "|"),
            FilterToken::Not => write!(f, "!"),
            FilterToken::OpenParen => write!(f, "("),
            FilterToken::CloseParen => write!(f, ")"),
        }
    }
}

/// Characters that always end a name or word.
fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '&' | '|' | '(' | ')')
}

/// Lexer for tokenizing filter expressions.
pub struct Lexer<'a> {
    input: &'a str,
    /// Current byte position in the input string.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input string.
    pub fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    fn rest(&self) -> &'a str {
        self.input.get(self.position..).unwrap_or_default()
    }

    /// Peeks at the next character without consuming it.
    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consumes and returns the next character, updating position.
    fn next_char(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += c.len_utf8();
        Some(c)
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.next_char();
        }
    }

    /// Reads characters up to the next delimiter.
    fn read_word(&mut self) -> &'a str {
        let start = self.position;
        while self.peek().is_some_and(|c| !is_delimiter(c)) {
            self.next_char();
        }
        self.input.get(start..self.position).unwrap_or_default()
    }

    /// Reads a quoted string (single or double quotes).
    fn read_quoted_string(&mut self, quote_char: char) -> FilterResult<String> {
        let quote_position = self.position;
        // Consume the opening quote
        self.next_char();

        let mut result = String::new();
        loop {
            match self.next_char() {
                None => {
                    return Err(FilterError::UnterminatedQuote {
                        position: quote_position,
                    })
                }
                Some(c) if c == quote_char => return Ok(result),
                Some('\\') => match self.next_char() {
                    Some(escaped) => result.push(escaped),
                    None => {
                        return Err(FilterError::UnterminatedQuote {
                            position: quote_position,
                        })
                    }
                },
                Some(c) => result.push(c),
            }
        }
    }

    /// Reads a project/label name (after the prefix).
    fn read_name(&mut self, prefix: char) -> FilterResult<String> {
        let name = match self.peek() {
            Some(c @ ('"' | '\'')) => self.read_quoted_string(c)?,
            _ => self.read_word().to_string(),
        };
        if name.is_empty() {
            return Err(FilterError::EmptyName { prefix });
        }
        Ok(name)
    }

    /// Reads consecutive bare words into one phrase.
    ///
    /// The phrase stops before an operator, a parenthesis, or a word that
    /// starts with `!`, `@` or `#`.
    fn read_phrase(&mut self) -> String {
        let mut words = vec![self.read_word()];
        loop {
            let checkpoint = self.position;
            self.skip_whitespace();
            match self.peek() {
                Some(c) if !is_delimiter(c) && !matches!(c, '!' | '@' | '#') => {
                    words.push(self.read_word());
                }
                _ => {
                    self.position = checkpoint;
                    break;
                }
            }
        }
        words.join(" ")
    }

    /// Returns the next token with its position, or None if at end of input.
    pub fn next_token(&mut self) -> FilterResult<Option<PositionedToken>> {
        self.skip_whitespace();

        let Some(c) = self.peek() else {
            return Ok(None);
        };
        let position = self.position;

        let token = match c {
            '&' | '|' | '!' | '(' | ')' => {
                self.next_char();
                match c {
                    '&' => FilterToken::And,
                    '|' => FilterToken::Or,
                    '!' => FilterToken::Not,
                    '(' => FilterToken::OpenParen,
                    _ => FilterToken::CloseParen,
                }
            }
            '@' => {
                self.next_char();
                FilterToken::Label(self.read_name('@')?)
            }
            '#' => {
                self.next_char();
                FilterToken::Project(self.read_name('#')?)
            }
            _ => FilterToken::Phrase(self.read_phrase()),
        };

        Ok(Some(PositionedToken { token, position }))
    }

    /// Collects all tokens, stopping at the first error.
    pub fn tokenize(mut self) -> FilterResult<Vec<PositionedToken>> {
        let mut tokens = Vec::new();
        while let Some(positioned_token) = self.next_token()? {
            tokens.push(positioned_token);
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<FilterToken> {
        Lexer::new(input)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|pt| pt.token)
            .collect()
    }

    fn phrase(text: &str) -> FilterToken {
        FilterToken::Phrase(text.to_string())
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokens("").is_empty());
        assert!(tokens("  \t ").is_empty());
    }

    #[test]
    fn test_tokenize_priority_word() {
        assert_eq!(tokens("p1"), vec![phrase("p1")]);
    }

    #[test]
    fn test_tokenize_label() {
        assert_eq!(tokens("@urgent"), vec![FilterToken::Label("urgent".into())]);
    }

    #[test]
    fn test_tokenize_project() {
        assert_eq!(tokens("#Work"), vec![FilterToken::Project("Work".into())]);
    }

    #[test]
    fn test_tokenize_quoted_project() {
        assert_eq!(
            tokens("#\"My Project\""),
            vec![FilterToken::Project("My Project".into())]
        );
        assert_eq!(
            tokens("@'it\\'s'"),
            vec![FilterToken::Label("it's".into())]
        );
    }

    #[test]
    fn test_tokenize_operators() {
        assert_eq!(
            tokens("p1 & p2 | !p3"),
            vec![
                phrase("p1"),
                FilterToken::And,
                phrase("p2"),
                FilterToken::Or,
                FilterToken::Not,
                phrase("p3"),
            ]
        );
    }

    #[test]
    fn test_tokenize_multi_word_phrase() {
        assert_eq!(
            tokens("due  before\t10 Feb 2020 3pm & @x"),
            vec![
                phrase("due before 10 Feb 2020 3pm"),
                FilterToken::And,
                FilterToken::Label("x".into()),
            ]
        );
    }

    #[test]
    fn test_tokenize_phrase_stops_at_prefix() {
        assert_eq!(
            tokens("p1 @home"),
            vec![phrase("p1"), FilterToken::Label("home".into())]
        );
    }

    #[test]
    fn test_tokenize_parentheses() {
        assert_eq!(
            tokens("(today | tomorrow) & p1"),
            vec![
                FilterToken::OpenParen,
                phrase("today"),
                FilterToken::Or,
                phrase("tomorrow"),
                FilterToken::CloseParen,
                FilterToken::And,
                phrase("p1"),
            ]
        );
    }

    #[test]
    fn test_tokenize_positions() {
        let result = Lexer::new("p1 & @a").tokenize().unwrap();
        let positions: Vec<usize> = result.iter().map(|pt| pt.position).collect();
        assert_eq!(positions, vec![0, 3, 5]);
    }

    #[test]
    fn test_tokenize_empty_name() {
        assert_eq!(
            Lexer::new("@ & p1").tokenize(),
            Err(FilterError::EmptyName { prefix: '@' })
        );
        assert_eq!(
            Lexer::new("#").tokenize(),
            Err(FilterError::EmptyName { prefix: '#' })
        );
    }

    #[test]
    fn test_tokenize_unterminated_quote() {
        assert_eq!(
            Lexer::new("p1 & #\"Work").tokenize(),
            Err(FilterError::UnterminatedQuote { position: 6 })
        );
    }
}
