use std::iter::FusedIterator;
use std::mem;
use std::str::CharIndices;

use log::debug;
use memchr::{memchr, memchr3};

use crate::error::LexError;
use crate::symbols::{Command, Placement, SymbolEntry, lookup_command, longest_literal};
use crate::token::{Span, Token, TokenKind};

/// Splits a formula into classified tokens, one per call to [`Lexer::next_token`].
///
/// The lexer is also an iterator. It yields the final [`TokenKind::Eof`] token and then stops.
/// After the first error it stops as well.
pub struct Lexer<'source> {
    input: CharIndices<'source>,
    peek: (usize, Option<char>),
    source: &'source str,
    finished: bool,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str) -> Self {
        let mut lexer = Lexer {
            input: source.char_indices(),
            peek: (0, None),
            source,
            finished: false,
        };
        lexer.read_char(); // Initialize `peek`.
        lexer
    }

    /// One character progresses.
    fn read_char(&mut self) -> (usize, Option<char>) {
        mem::replace(
            &mut self.peek,
            self.input
                .next()
                .map(|(idx, ch)| (idx, Some(ch)))
                .unwrap_or((self.source.len(), None)),
        )
    }

    /// The character after `peek`.
    fn lookahead(&self) -> Option<char> {
        self.input.clone().next().map(|(_, ch)| ch)
    }

    fn skip_to(&mut self, end: usize) {
        while self.peek.1.is_some() && self.peek.0 < end {
            self.read_char();
        }
    }

    /// The token from `start` up to the current position.
    fn token(&self, kind: TokenKind, start: usize) -> Token<'source> {
        let end = self.peek.0;
        Token::new(kind, &self.source[start..end], Span::new(start, end))
    }

    pub fn next_token(&mut self) -> Result<Token<'source>, LexError> {
        let (start, Some(ch)) = self.peek else {
            return Ok(Token::new(TokenKind::Eof, "", Span::zero_width(self.peek.0)));
        };
        let kind = match ch {
            ch if ch.is_whitespace() => {
                while self.peek.1.is_some_and(char::is_whitespace) {
                    self.read_char();
                }
                TokenKind::Whitespace
            }
            ch if ch.is_ascii_digit() => {
                self.read_char();
                loop {
                    match self.peek.1 {
                        Some(d) if d.is_ascii_digit() => {}
                        Some('.') if self.lookahead().is_some_and(|d| d.is_ascii_digit()) => {}
                        _ => break,
                    }
                    self.read_char();
                }
                TokenKind::Number
            }
            ch if ch.is_alphabetic() => {
                while self.peek.1.is_some_and(char::is_alphabetic) {
                    self.read_char();
                }
                TokenKind::Identifier
            }
            '\\' => return self.read_command(start),
            _ => {
                let kind = match ch {
                    '+' | '-' | '*' | '=' | '/' => TokenKind::Operator,
                    '{' => TokenKind::GroupOpen,
                    '}' => TokenKind::GroupClose,
                    '^' => TokenKind::Up,
                    '_' => TokenKind::Down,
                    '|' | '(' | '[' => TokenKind::Open,
                    ')' | ']' => TokenKind::Close,
                    _ => return Ok(self.read_literal(start)),
                };
                self.read_char();
                kind
            }
        };
        Ok(self.token(kind, start))
    }

    /// Read a `\`-command. `peek` is on the backslash.
    fn read_command(&mut self, start: usize) -> Result<Token<'source>, LexError> {
        self.read_char(); // Discard the backslash.
        let escaped = match self.peek.1 {
            Some('|' | '{') => Some(TokenKind::Open),
            Some('}') => Some(TokenKind::Close),
            _ => None,
        };
        if let Some(kind) = escaped {
            self.read_char();
            return Ok(self.token(kind, start));
        }

        let rest = &self.source[start..];
        let word = &rest[..command_word_len(rest)];
        let (len, command) = match lookup_command(word) {
            Some(command) => (word.len(), command),
            None => {
                let Some((len, command)) = longest_command_prefix(word) else {
                    return Err(LexError::UnknownCommand {
                        word: word.into(),
                        span: Span::new(start, start + word.len()),
                    });
                };
                debug!(
                    "command word {word:?} at {start} resolved as {:?}",
                    &word[..len]
                );
                (len, command)
            }
        };
        self.skip_to(start + len);
        Ok(self.token(command_kind(command), start))
    }

    /// Literal punctuation from the general symbol table, or a single bad character.
    fn read_literal(&mut self, start: usize) -> Token<'source> {
        match longest_literal(&self.source[start..]) {
            Some((key, entry)) => {
                self.skip_to(start + key.len());
                let kind = match entry {
                    SymbolEntry::Space(_) => TokenKind::Space,
                    SymbolEntry::MathOperator(_) => TokenKind::MathOperator,
                    SymbolEntry::Symbol(_) => TokenKind::Symbol,
                };
                self.token(kind, start)
            }
            None => {
                self.read_char();
                let token = self.token(TokenKind::Bad, start);
                debug!("unrecognised character {:?} at {start}", token.text);
                token
            }
        }
    }
}

impl<'source> Iterator for Lexer<'source> {
    type Item = Result<Token<'source>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.next_token();
        self.finished = match &result {
            Ok(token) => token.kind == TokenKind::Eof,
            Err(_) => true,
        };
        Some(result)
    }
}

impl FusedIterator for Lexer<'_> {}

/// Length of the command word at the start of `rest`.
///
/// The word runs from the backslash up to the next space, `_`, `^` or `{`. It is not bounded by
/// letters, so `\alpha\beta` is a single word here.
fn command_word_len(rest: &str) -> usize {
    let bytes = rest.as_bytes();
    match (memchr3(b'_', b'^', b'{', bytes), memchr(b' ', bytes)) {
        (Some(a), Some(b)) => a.min(b),
        (a, b) => a.or(b).unwrap_or(bytes.len()),
    }
}

/// The longest proper prefix of `word` that is a known command.
///
/// A prefix may not end between two letters, so `\sinx` does not resolve to `\sin`.
fn longest_command_prefix(word: &str) -> Option<(usize, Command)> {
    word.char_indices()
        .rev()
        .filter(|&(idx, _)| idx >= 2)
        .filter(|&(idx, next)| {
            let prev = word[..idx].chars().next_back();
            !(next.is_alphabetic() && prev.is_some_and(char::is_alphabetic))
        })
        .find_map(|(idx, _)| lookup_command(&word[..idx]).map(|command| (idx, command)))
}

fn command_kind(command: Command) -> TokenKind {
    match command {
        Command::Diacritical(d) => match d.placement {
            Placement::Over => TokenKind::Over,
            Placement::Under => TokenKind::Under,
        },
        Command::Scaler(_) => TokenKind::Scaled,
        Command::Enclosure(symbol) => match symbol.class {
            crate::symbols::AtomClass::Close => TokenKind::Close,
            _ => TokenKind::Open,
        },
        Command::BinaryMacro => TokenKind::Binary,
        Command::Entry(SymbolEntry::Symbol(_)) => TokenKind::Symbol,
        Command::Entry(SymbolEntry::Space(_)) => TokenKind::Space,
        Command::Entry(SymbolEntry::MathOperator(_)) => TokenKind::MathOperator,
    }
}

/// Lex `source` and drop whitespace, bad characters and the final end-of-input token.
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, LexError> {
    let mut tokens = Vec::new();
    for token in Lexer::new(source) {
        let token = token?;
        if !token.kind.is_ignored() {
            tokens.push(token);
        }
    }
    debug!("lexed {} tokens from {} bytes", tokens.len(), source.len());
    Ok(tokens)
}
