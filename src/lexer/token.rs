//! Token definitions for pseudoc
//!
//! Defines all token types produced by the lexer.

use crate::errors::SourceSpan;
use std::fmt;

/// A token produced by the lexer
///
/// `text` borrows from the source. For string literals it is the text
/// between the quotes; the span still covers the quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    /// The kind of token
    pub kind: TokenKind,
    /// Source text of this token
    pub text: &'src str,
    /// Source location of this token
    pub span: SourceSpan,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, text: &'src str, span: SourceSpan) -> Self {
        Self { kind, text, span }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Newline => write!(f, "line break"),
            TokenKind::Eof => write!(f, "end of file"),
            TokenKind::String => write!(f, "\"{}\" ({})", self.text, self.kind),
            _ => write!(f, "'{}' ({})", self.text, self.kind),
        }
    }
}

/// Reserved words of the pseudocode dialect (case-sensitive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    // I/O
    Output,
    Input,

    // Conditionals
    If,
    Then,
    Else,
    Endif,

    // Loops
    While,
    Endwhile,
    For,
    To,
    Step,
    Next,
    Repeat,
    Until,

    // Declarations
    Declare,
    Constant,
}

impl Keyword {
    /// Classify a whole identifier-shaped word as a keyword
    pub fn parse(s: &str) -> Option<Keyword> {
        match s {
            "OUTPUT" => Some(Keyword::Output),
            "INPUT" => Some(Keyword::Input),
            "IF" => Some(Keyword::If),
            "THEN" => Some(Keyword::Then),
            "ELSE" => Some(Keyword::Else),
            "ENDIF" => Some(Keyword::Endif),
            "WHILE" => Some(Keyword::While),
            "ENDWHILE" => Some(Keyword::Endwhile),
            "FOR" => Some(Keyword::For),
            "TO" => Some(Keyword::To),
            "STEP" => Some(Keyword::Step),
            "NEXT" => Some(Keyword::Next),
            "REPEAT" => Some(Keyword::Repeat),
            "UNTIL" => Some(Keyword::Until),
            "DECLARE" => Some(Keyword::Declare),
            "CONSTANT" => Some(Keyword::Constant),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Output => "OUTPUT",
            Keyword::Input => "INPUT",
            Keyword::If => "IF",
            Keyword::Then => "THEN",
            Keyword::Else => "ELSE",
            Keyword::Endif => "ENDIF",
            Keyword::While => "WHILE",
            Keyword::Endwhile => "ENDWHILE",
            Keyword::For => "FOR",
            Keyword::To => "TO",
            Keyword::Step => "STEP",
            Keyword::Next => "NEXT",
            Keyword::Repeat => "REPEAT",
            Keyword::Until => "UNTIL",
            Keyword::Declare => "DECLARE",
            Keyword::Constant => "CONSTANT",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Special
    /// End of input; repeated forever once reached
    Eof,
    /// Line terminator
    Newline,

    // Literals
    /// Integer or real literal, disambiguated by context
    Number,
    /// String literal
    String,
    /// Identifier
    Ident,
    /// Keyword
    Keyword(Keyword),

    // Operators
    /// `=`
    Eq,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `==`
    EqEq,
    /// `!=`
    BangEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `:`
    Colon,
}

impl TokenKind {
    pub fn is_eof(&self) -> bool {
        matches!(self, TokenKind::Eof)
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            TokenKind::EqEq
                | TokenKind::BangEq
                | TokenKind::Lt
                | TokenKind::LtEq
                | TokenKind::Gt
                | TokenKind::GtEq
        )
    }

    /// Get a human-readable description of this token kind
    pub fn description(&self) -> &'static str {
        match self {
            TokenKind::Eof => "end of file",
            TokenKind::Newline => "line break",
            TokenKind::Number => "number",
            TokenKind::String => "string literal",
            TokenKind::Ident => "identifier",
            TokenKind::Keyword(_) => "keyword",
            TokenKind::Eq => "'='",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::EqEq => "'=='",
            TokenKind::BangEq => "'!='",
            TokenKind::Lt => "'<'",
            TokenKind::LtEq => "'<='",
            TokenKind::Gt => "'>'",
            TokenKind::GtEq => "'>='",
            TokenKind::Colon => "':'",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Keyword(kw) => write!(f, "keyword {}", kw),
            _ => f.write_str(self.description()),
        }
    }
}
