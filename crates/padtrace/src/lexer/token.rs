//! Token definitions for the trace format

use crate::common::Span;
use logos::Logos;

/// Token with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

fn parse_hex(lex: &mut logos::Lexer<'_, TokenKind>) -> Option<u32> {
    u32::from_str_radix(&lex.slice()[2..], 16).ok()
}

fn parse_dec(lex: &mut logos::Lexer<'_, TokenKind>) -> Option<u32> {
    lex.slice().parse().ok()
}

/// All token kinds of a trace
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]  // Skip whitespace
#[logos(skip r"//[^\n]*")]      // Skip line comments
pub enum TokenKind {
    // === Keywords ===
    #[token("frame")]
    Frame,
    #[token("port")]
    Port,
    #[token("hub")]
    Hub,
    #[token("device")]
    Device,
    #[token("empty")]
    Empty,
    #[token("unplugged")]
    Unplugged,
    #[token("buttons")]
    Buttons,
    #[token("axes")]
    Axes,
    #[token("data")]
    Data,

    // === Literals ===
    #[regex(r"0[xX][0-9a-fA-F]+", parse_hex)]
    #[regex(r"[0-9]+", parse_dec)]
    Integer(u32),

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_-]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // === Punctuation ===
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(":")]
    Colon,
    #[token("+")]
    Plus,
    #[token("*")]
    Star,

    // End of input
    Eof,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Frame => write!(f, "'frame'"),
            TokenKind::Port => write!(f, "'port'"),
            TokenKind::Hub => write!(f, "'hub'"),
            TokenKind::Device => write!(f, "'device'"),
            TokenKind::Empty => write!(f, "'empty'"),
            TokenKind::Unplugged => write!(f, "'unplugged'"),
            TokenKind::Buttons => write!(f, "'buttons'"),
            TokenKind::Axes => write!(f, "'axes'"),
            TokenKind::Data => write!(f, "'data'"),
            TokenKind::Integer(n) => write!(f, "integer '{}'", n),
            TokenKind::Identifier(s) => write!(f, "identifier '{}'", s),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::Colon => write!(f, "':'"),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Eof => write!(f, "end of file"),
        }
    }
}
