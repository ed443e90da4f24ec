//! Token stream with one token of lookahead

use super::token::{Token, TokenKind};
use crate::common::{Span, TraceError, TraceResult};
use logos::Logos;
use std::mem::discriminant;

/// Pull-based lexer over a trace source
///
/// Once the source is exhausted every further read yields an
/// [`TokenKind::Eof`] token positioned at the end of the input.
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
    lookahead: Option<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            lookahead: None,
        }
    }

    fn end_of_input(&self) -> Token {
        let end = self.inner.source().len();
        Token::new(TokenKind::Eof, Span::new(end, end))
    }

    fn scan(&mut self) -> TraceResult<Token> {
        match self.inner.next() {
            None => Ok(self.end_of_input()),
            Some(Ok(kind)) => Ok(Token::new(kind, self.inner.span().into())),
            Some(Err(())) => Err(TraceError::lexer(
                format!("'{}' is not part of the trace syntax", self.inner.slice()),
                self.inner.span().into(),
            )),
        }
    }

    /// Consume and return the next token
    pub fn next_token(&mut self) -> TraceResult<Token> {
        match self.lookahead.take() {
            Some(token) => Ok(token),
            None => self.scan(),
        }
    }

    pub fn peek(&mut self) -> TraceResult<&Token> {
        let token = match self.lookahead.take() {
            Some(token) => token,
            None => self.scan()?,
        };
        Ok(self.lookahead.insert(token))
    }

    /// Whether the next token has the same kind as `kind` (payloads ignored)
    pub fn check(&mut self, kind: &TokenKind) -> TraceResult<bool> {
        let next = self.peek()?;
        Ok(discriminant(&next.kind) == discriminant(kind))
    }

    /// Consume the next token when it is a `kind`
    pub fn next_if(&mut self, kind: &TokenKind) -> TraceResult<Option<Token>> {
        if self.check(kind)? {
            self.next_token().map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn match_token(&mut self, kind: &TokenKind) -> TraceResult<bool> {
        Ok(self.next_if(kind)?.is_some())
    }

    /// Consume a `kind` token or fail with a syntax error at the token found
    pub fn expect(&mut self, kind: TokenKind) -> TraceResult<Token> {
        let token = self.next_token()?;
        if discriminant(&token.kind) != discriminant(&kind) {
            return Err(TraceError::parser(
                format!("expected {}, found {}", kind, token.kind),
                token.span,
            ));
        }
        Ok(token)
    }

    /// Drain the source, the trailing [`TokenKind::Eof`] included
    pub fn into_tokens(mut self) -> TraceResult<Vec<Token>> {
        let mut tokens = Vec::new();
        while tokens.last().is_none_or(|token: &Token| token.kind != TokenKind::Eof) {
            tokens.push(self.next_token()?);
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .into_tokens()
            .unwrap()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn test_keywords_and_punctuation() {
        assert_eq!(
            kinds("frame * 2 { port 1 : hub { empty } }"),
            vec![
                TokenKind::Frame,
                TokenKind::Star,
                TokenKind::Integer(2),
                TokenKind::LBrace,
                TokenKind::Port,
                TokenKind::Integer(1),
                TokenKind::Colon,
                TokenKind::Hub,
                TokenKind::LBrace,
                TokenKind::Empty,
                TokenKind::RBrace,
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_integers() {
        assert_eq!(
            kinds("0x16 0XFF 255 0"),
            vec![
                TokenKind::Integer(0x16),
                TokenKind::Integer(0xFF),
                TokenKind::Integer(255),
                TokenKind::Integer(0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(
            kinds("analog-3d-pad right+a frames"),
            vec![
                TokenKind::Identifier("analog-3d-pad".to_string()),
                TokenKind::Identifier("right".to_string()),
                TokenKind::Plus,
                TokenKind::Identifier("a".to_string()),
                TokenKind::Identifier("frames".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments_skipped() {
        assert_eq!(
            kinds("// leading\nframe { } // trailing"),
            vec![TokenKind::Frame, TokenKind::LBrace, TokenKind::RBrace, TokenKind::Eof]
        );
    }

    #[test]
    fn test_spans() {
        let tokens = Lexer::new("port 12").into_tokens().unwrap();
        assert_eq!(tokens[0].span, Span::new(0, 4));
        assert_eq!(tokens[1].span, Span::new(5, 7));
        assert_eq!(tokens[2].span, Span::new(7, 7));
    }

    #[test]
    fn test_unexpected_character() {
        let err = Lexer::new("frame { ? }").into_tokens().unwrap_err();
        assert!(matches!(err, TraceError::Lexer { span, .. } if span == Span::new(8, 9)));
    }

    #[test]
    fn test_peek_and_expect() {
        let mut lexer = Lexer::new("port 2");
        assert!(lexer.check(&TokenKind::Port).unwrap());
        assert!(lexer.match_token(&TokenKind::Port).unwrap());
        assert!(!lexer.match_token(&TokenKind::Colon).unwrap());
        assert_eq!(
            lexer.next_if(&TokenKind::Integer(0)).unwrap().map(|t| t.kind),
            Some(TokenKind::Integer(2))
        );
        assert!(lexer.expect(TokenKind::Colon).is_err());
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    }
}
