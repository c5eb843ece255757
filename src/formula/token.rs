//! Token types for the formula lexer.

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub col: usize,
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Number(f64),
    Ident(String),

    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret, // ^ or **

    // Comparison and logic
    EqEq,   // == or ===
    BangEq, // != or !==
    Lt,
    LtEq,
    Gt,
    GtEq,
    AndAnd,
    OrOr,
    Bang,

    // Delimiters
    LParen,
    RParen,
    Comma,
    Question,
    Colon,

    // Special
    Eof,
}
