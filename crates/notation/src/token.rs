use std::fmt;
use std::ops::Range;

use strum_macros::IntoStaticStr;

/// Category of a lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
pub enum TokenKind {
    /// A digit run, optionally with one inner decimal point, e.g. `9.03`.
    Number,
    /// A maximal run of letters, e.g. `xy`.
    Identifier,
    /// One of `+ - * = /`.
    Operator,
    /// An upright operator name, e.g. `\sin`.
    MathOperator,
    /// An opening delimiter, e.g. `(` or `\langle`.
    Open,
    /// A closing delimiter, e.g. `)` or `\rangle`.
    Close,
    /// The character `{`.
    GroupOpen,
    /// The character `}`.
    GroupClose,
    /// The character `^`.
    Up,
    /// The character `_`.
    Down,
    /// A glyph from the general symbol table, e.g. `\alpha` or `,`.
    Symbol,
    /// A spacing command, e.g. `\quad` or `~`.
    Space,
    /// A two-argument macro, e.g. `\frac`.
    Binary,
    /// An accent placed above its operand, e.g. `\hat`.
    Over,
    /// An accent placed below its operand, e.g. `\underline`.
    Under,
    /// A delimiter size command, e.g. `\big`.
    Scaled,
    Whitespace,
    /// A character the lexer does not recognise.
    Bad,
    /// End of input.
    Eof,
}

impl TokenKind {
    /// Tokens the parser never sees.
    #[inline]
    pub fn is_ignored(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Bad | TokenKind::Eof)
    }
}

/// Byte range of a token or node within the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    #[inline]
    pub const fn zero_width(at: usize) -> Self {
        Span { start: at, end: at }
    }

    #[inline]
    pub const fn start(&self) -> usize {
        self.start
    }

    #[inline]
    pub const fn end(&self) -> usize {
        self.end
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The smallest span covering both `self` and `other`.
    #[inline]
    pub fn join(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl From<Span> for Range<usize> {
    #[inline]
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

/// A classified slice of the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'source> {
    pub kind: TokenKind,
    pub text: &'source str,
    pub span: Span,
}

impl<'source> Token<'source> {
    #[inline]
    pub const fn new(kind: TokenKind, text: &'source str, span: Span) -> Self {
        Token { kind, text, span }
    }

    /// Byte offset of the first character.
    #[inline]
    pub const fn position(&self) -> usize {
        self.span.start
    }
}
