//! Hand-written lexer/scanner for pseudoc
//!
//! Converts pseudocode source into a stream of tokens, one at a time.

use super::token::{Keyword, Token, TokenKind};
use crate::errors::{CompileError, CompileResult, SourceSpan};

/// The lexer/scanner for pseudocode source
pub struct Lexer<'src> {
    /// The source code being lexed
    source: &'src str,
    /// Current byte position in the source
    pos: usize,
    /// Start position of the current token
    start: usize,
    /// Whether the implicit trailing line break has been produced
    terminated: bool,
    /// Set once the iterator has yielded EOF or an error
    exhausted: bool,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            start: 0,
            terminated: false,
            exhausted: false,
        }
    }

    /// Peek at the current character without consuming it
    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    /// Peek at the next character (one ahead of current)
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.source[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advance to the next character and return it
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn current_span(&self) -> SourceSpan {
        SourceSpan::new(self.start, self.pos)
    }

    fn current_lexeme(&self) -> &'src str {
        &self.source[self.start..self.pos]
    }

    fn make_token(&self, kind: TokenKind) -> Token<'src> {
        Token::new(kind, self.current_lexeme(), self.current_span())
    }

    /// Consume the character if it matches the expected one
    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Skip blanks and `//` comments; line breaks are tokens
    fn skip_whitespace(&mut self) {
        loop {
            match self.peek() {
                Some(' ' | '\t' | '\r') => {
                    self.advance();
                }
                Some('/') if self.peek_next() == Some('/') => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    /// Scan a number literal: digits, optionally `.` and more digits
    fn scan_number(&mut self) -> CompileResult<Token<'src>> {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        if self.match_char('.') {
            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                return Err(CompileError::lexer(
                    format!(
                        "Illegal character in number '{}': expected a digit after '.'",
                        self.current_lexeme()
                    ),
                    self.current_span(),
                ));
            }
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        Ok(self.make_token(TokenKind::Number))
    }

    /// Scan a string literal; no escape processing is done
    fn scan_string(&mut self) -> CompileResult<Token<'src>> {
        let content_start = self.pos;

        while let Some(c) = self.peek() {
            match c {
                '"' => {
                    let text = &self.source[content_start..self.pos];
                    self.advance();
                    return Ok(Token::new(TokenKind::String, text, self.current_span()));
                }
                '\n' => break,
                _ => {
                    self.advance();
                }
            }
        }

        Err(CompileError::lexer(
            "unterminated string literal",
            self.current_span(),
        ))
    }

    /// Scan an identifier or keyword
    fn scan_identifier(&mut self) -> Token<'src> {
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.advance();
        }

        match Keyword::parse(self.current_lexeme()) {
            Some(kw) => self.make_token(TokenKind::Keyword(kw)),
            None => self.make_token(TokenKind::Ident),
        }
    }

    /// Scan the next token
    ///
    /// Once the source is exhausted a single line break is produced (the
    /// source is treated as newline-terminated), then EOF on every call.
    pub fn next_token(&mut self) -> CompileResult<Token<'src>> {
        self.skip_whitespace();
        self.start = self.pos;

        let Some(c) = self.advance() else {
            let span = SourceSpan::point(self.source.len());
            if !self.terminated {
                self.terminated = true;
                return Ok(Token::new(TokenKind::Newline, "\n", span));
            }
            return Ok(Token::new(TokenKind::Eof, "", span));
        };

        if c.is_ascii_alphabetic() || c == '_' {
            return Ok(self.scan_identifier());
        }

        if c.is_ascii_digit() {
            return self.scan_number();
        }

        if c == '"' {
            return self.scan_string();
        }

        let kind = match c {
            '\n' => TokenKind::Newline,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            ':' => TokenKind::Colon,
            '=' => {
                if self.match_char('=') {
                    TokenKind::EqEq
                } else {
                    TokenKind::Eq
                }
            }
            '<' => {
                if self.match_char('=') {
                    TokenKind::LtEq
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.match_char('=') {
                    TokenKind::GtEq
                } else {
                    TokenKind::Gt
                }
            }
            '!' => {
                if self.match_char('=') {
                    TokenKind::BangEq
                } else {
                    let found = match self.peek() {
                        Some(next) if next != '\n' => format!("'!{}'", next),
                        _ => "'!'".to_string(),
                    };
                    return Err(CompileError::lexer(
                        format!("Expected '!=', got {}", found),
                        self.current_span(),
                    ));
                }
            }
            _ => {
                return Err(CompileError::lexer(
                    format!("Unknown token: '{}'", c),
                    self.current_span(),
                ));
            }
        };

        Ok(self.make_token(kind))
    }

    /// Collect all tokens, including the final EOF, into a vector
    pub fn tokenize(mut self) -> CompileResult<Vec<Token<'src>>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.kind.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = CompileResult<Token<'src>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        match self.next_token() {
            Ok(token) if token.kind.is_eof() => {
                self.exhausted = true;
                None
            }
            Ok(token) => Some(Ok(token)),
            Err(e) => {
                self.exhausted = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn texts(source: &str) -> Vec<&str> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.text)
            .collect()
    }

    fn lex_err(source: &str) -> String {
        match Lexer::new(source).tokenize() {
            Err(CompileError::Lexer { message, .. }) => message,
            other => panic!("expected lexer error, got {:?}", other),
        }
    }

    #[test]
    fn test_operators() {
        let tokens = lex("= + - * / == != < <= > >= :");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Eq,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::EqEq,
                TokenKind::BangEq,
                TokenKind::Lt,
                TokenKind::LtEq,
                TokenKind::Gt,
                TokenKind::GtEq,
                TokenKind::Colon,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_are_whole_words() {
        let tokens = lex("IF IFFY ENDIF endif NEXT");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Keyword(Keyword::If),
                TokenKind::Ident,
                TokenKind::Keyword(Keyword::Endif),
                TokenKind::Ident,
                TokenKind::Keyword(Keyword::Next),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(texts("42 3.14 007"), vec!["42", "3.14", "007", "\n", ""]);
        assert_eq!(lex("3.14")[0], TokenKind::Number);
    }

    #[test]
    fn test_trailing_dot_is_error() {
        assert!(lex_err("x = 1.").contains("Illegal character in number"));
        assert!(lex_err("x = 1.a").contains("'1.'"));
    }

    #[test]
    fn test_strings_have_no_escapes() {
        let tokens = Lexer::new(r#"OUTPUT "a\nb""#).tokenize().unwrap();
        assert_eq!(tokens[1].kind, TokenKind::String);
        assert_eq!(tokens[1].text, r"a\nb");
        assert_eq!(tokens[1].span, SourceSpan::new(7, 13));
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(lex_err("OUTPUT \"abc"), "unterminated string literal");
        assert_eq!(lex_err("OUTPUT \"abc\nOUTPUT 1"), "unterminated string literal");
    }

    #[test]
    fn test_lone_bang_is_error() {
        assert_eq!(lex_err("IF a ! b"), "Expected '!=', got '! '");
        assert_eq!(lex_err("!"), "Expected '!=', got '!'");
    }

    #[test]
    fn test_unknown_character() {
        assert_eq!(lex_err("x = (1)"), "Unknown token: '('");
    }

    #[test]
    fn test_comments_and_blanks() {
        let tokens = lex("x // comment = 5\r\n\t y");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Ident,
                TokenKind::Newline,
                TokenKind::Ident,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comment_at_end_without_newline() {
        let tokens = lex("OUTPUT 1 // done");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Keyword(Keyword::Output),
                TokenKind::Number,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_eof_is_idempotent() {
        let mut lexer = Lexer::new("x");
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Ident);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Newline);
        for _ in 0..3 {
            assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
        }
    }

    #[test]
    fn test_iterator_stops_after_error() {
        let items: Vec<_> = Lexer::new("a ? b").collect();
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert!(items[1].is_err());
    }

    #[test]
    fn test_sample_program() {
        let source = "DECLARE x: INTEGER\nFOR i = 1 TO 10 STEP 2\n  x = x + i\nNEXT i\n";
        let tokens = lex(source);
        assert_eq!(tokens.iter().filter(|k| **k == TokenKind::Newline).count(), 5);
        assert!(matches!(tokens.last(), Some(TokenKind::Eof)));
    }
}
