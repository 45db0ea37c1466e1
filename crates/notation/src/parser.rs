use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ast::{Expr, Node};
use crate::error::ParseError;
use crate::symbols::{DIACRITICALS, ENCLOSURES, Placement, SCALERS, SYMBOLS, Symbol, SymbolEntry};
use crate::token::{Span, Token, TokenKind};

/// Parser settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct ParseConfig {
    /// Report unterminated groups and stray `}` as errors.
    ///
    /// When `false`, both silently end parsing of the enclosing sequence.
    pub strict_groups: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        ParseConfig {
            strict_groups: true,
        }
    }
}

/// Recursive-descent parser producing the list of root expressions.
pub struct Parser<'source, 'tokens> {
    tokens: &'tokens [Token<'source>],
    pos: usize,
    config: ParseConfig,
}

impl<'source, 'tokens> Parser<'source, 'tokens> {
    pub fn new(tokens: &'tokens [Token<'source>], config: ParseConfig) -> Self {
        Parser {
            tokens,
            pos: 0,
            config,
        }
    }

    /// The current token. Whitespace is skipped and `Eof` counts as the end.
    fn peek(&mut self) -> Option<Token<'source>> {
        while let Some(tok) = self.tokens.get(self.pos) {
            match tok.kind {
                TokenKind::Whitespace => self.pos += 1,
                TokenKind::Eof => return None,
                _ => return Some(*tok),
            }
        }
        None
    }

    fn next(&mut self) -> Option<Token<'source>> {
        let tok = self.peek()?;
        self.pos += 1;
        Some(tok)
    }

    /// Position just past the last token, used for errors at the end of input.
    fn end_span(&self) -> Span {
        self.tokens
            .last()
            .map_or(Span::default(), |tok| Span::zero_width(tok.span.end()))
    }

    /// Parse the whole token stream.
    pub fn parse(mut self) -> Result<Vec<Expr>, ParseError> {
        let mut hlist = Vec::new();
        while let Some(expr) = self.parse_expr()? {
            hlist.push(expr);
        }
        if let Some(tok) = self.peek() {
            // `parse_expr` only stops early at a `}`.
            if self.config.strict_groups {
                return Err(ParseError::UnmatchedGroupClose { span: tok.span });
            }
            debug!("unmatched '}}' at {}, ignoring the rest", tok.span.start());
        }
        debug!("parsed {} root expressions", hlist.len());
        Ok(hlist)
    }

    /// Parse one expression.
    ///
    /// Returns `None` without consuming anything at a `}` or at the end of input.
    fn parse_expr(&mut self) -> Result<Option<Expr>, ParseError> {
        let Some(tok) = self.peek() else {
            return Ok(None);
        };
        if tok.kind == TokenKind::GroupClose {
            return Ok(None);
        }
        self.pos += 1;
        let span = tok.span;

        let expr = match tok.kind {
            TokenKind::Number => Expr::new(Node::Number(tok.text.into()), span),
            TokenKind::Identifier => Expr::new(Node::Identifier(tok.text.into()), span),
            TokenKind::Operator
            | TokenKind::Symbol
            | TokenKind::Space
            | TokenKind::MathOperator => {
                let Some(entry) = SYMBOLS.get(tok.text) else {
                    return Err(unexpected(&tok));
                };
                Expr::new(entry_node(*entry), span)
            }
            TokenKind::Open | TokenKind::Close => {
                let Some(symbol) = ENCLOSURES.get(tok.text) else {
                    return Err(unexpected(&tok));
                };
                Expr::new(symbol_node(symbol), span)
            }
            TokenKind::GroupOpen => self.parse_group(span)?,
            TokenKind::Over | TokenKind::Under => {
                let Some(diacritical) = DIACRITICALS.get(tok.text) else {
                    return Err(unexpected(&tok));
                };
                let accent = Box::new(Expr::new(symbol_node(&diacritical.accent), span));
                let operand = Box::new(self.operand(&tok)?);
                let span = span.join(operand.span);
                let node = match diacritical.placement {
                    Placement::Over => Node::Over { accent, operand },
                    Placement::Under => Node::Under { accent, operand },
                };
                Expr::new(node, span)
            }
            TokenKind::Scaled => {
                let Some(factor) = SCALERS.get(tok.text) else {
                    return Err(unexpected(&tok));
                };
                let operand = Box::new(self.operand(&tok)?);
                let span = span.join(operand.span);
                Expr::new(
                    Node::Scaled {
                        factor: *factor,
                        operand,
                    },
                    span,
                )
            }
            TokenKind::Binary => {
                let lhs = Box::new(self.operand(&tok)?);
                let rhs = Box::new(self.operand(&tok)?);
                let span = span.join(rhs.span);
                Expr::new(
                    Node::Binary {
                        name: tok.text.into(),
                        lhs,
                        rhs,
                    },
                    span,
                )
            }
            TokenKind::Up | TokenKind::Down => {
                let operand = Box::new(self.operand(&tok)?);
                let span = span.join(operand.span);
                let node = if tok.kind == TokenKind::Up {
                    Node::Up(operand)
                } else {
                    Node::Down(operand)
                };
                Expr::new(node, span)
            }
            TokenKind::GroupClose | TokenKind::Whitespace | TokenKind::Bad | TokenKind::Eof => {
                return Err(unexpected(&tok));
            }
        };
        Ok(Some(expr))
    }

    /// The single expression a construct such as `^` or `\hat` applies to.
    fn operand(&mut self, construct: &Token<'source>) -> Result<Expr, ParseError> {
        self.parse_expr()?
            .ok_or_else(|| ParseError::MissingOperand {
                construct: construct.text.into(),
                span: construct.span,
            })
    }

    /// Parse the contents of a group. The `{` has been consumed.
    fn parse_group(&mut self, open: Span) -> Result<Expr, ParseError> {
        let mut children = Vec::new();
        while let Some(expr) = self.parse_expr()? {
            children.push(expr);
        }
        let span = match self.next() {
            Some(close) => open.join(close.span),
            None if self.config.strict_groups => {
                return Err(ParseError::UnterminatedGroup { span: open });
            }
            None => {
                debug!("group opened at {} is never closed", open.start());
                open.join(self.end_span())
            }
        };
        Ok(Expr::new(Node::Grouped(children), span))
    }
}

fn unexpected(tok: &Token<'_>) -> ParseError {
    ParseError::UnexpectedToken {
        kind: tok.kind,
        text: tok.text.into(),
        span: tok.span,
    }
}

fn symbol_node(symbol: &Symbol) -> Node {
    Node::Symbol {
        text: symbol.glyph.into(),
        class: symbol.class,
    }
}

fn entry_node(entry: SymbolEntry) -> Node {
    match entry {
        SymbolEntry::Symbol(symbol) => symbol_node(&symbol),
        SymbolEntry::Space(value) => Node::Space(value.into()),
        SymbolEntry::MathOperator(name) => Node::MathOperator(name.into()),
    }
}

/// Parse a token stream into its root expressions.
///
/// Superscripts and subscripts do not attach to the expression before them; they become
/// independent roots.
pub fn parse(tokens: &[Token<'_>], config: ParseConfig) -> Result<Vec<Expr>, ParseError> {
    Parser::new(tokens, config).parse()
}
