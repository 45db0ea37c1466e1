use std::fmt;
#[cfg(feature = "ariadne")]
use std::ops::Range;

use crate::token::{Span, TokenKind};

/// An error raised while splitting the source into tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum LexError {
    /// A `\`-command that none of the symbol tables knows.
    UnknownCommand { word: Box<str>, span: Span },
}

/// An error raised while building the expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A token that cannot start an expression.
    UnexpectedToken {
        kind: TokenKind,
        text: Box<str>,
        span: Span,
    },
    /// The input ended inside a `{...}` group. The span points at the `{`.
    UnterminatedGroup { span: Span },
    /// A `}` without a matching `{`.
    UnmatchedGroupClose { span: Span },
    /// A construct such as `^` or `\frac` that needs an operand met `}` or the end of input.
    MissingOperand { construct: Box<str>, span: Span },
}

/// An error raised while assigning geometry to the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// A fraction-like operand that is not a `{...}` group.
    OperandNotGrouped { span: Span },
    /// A node kind with no layout rule.
    UnsupportedConstruct { construct: &'static str, span: Span },
}

/// Any failure of the lex, parse, layout pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum NotationError {
    Lex(LexError),
    Parse(ParseError),
    Layout(LayoutError),
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnknownCommand { span, .. } => *span,
        }
    }

    pub fn message(&self) -> String {
        match self {
            LexError::UnknownCommand { word, .. } => {
                "Unknown command \"".to_string() + word + "\"."
            }
        }
    }

    #[cfg(feature = "ariadne")]
    fn label(&self) -> String {
        match self {
            LexError::UnknownCommand { .. } => "unknown command".into(),
        }
    }
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedToken { span, .. }
            | ParseError::UnterminatedGroup { span }
            | ParseError::UnmatchedGroupClose { span }
            | ParseError::MissingOperand { span, .. } => *span,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ParseError::UnexpectedToken { kind, text, .. } => {
                "Unexpected ".to_string() + <&str>::from(*kind) + " token \"" + text + "\"."
            }
            ParseError::UnterminatedGroup { .. } => {
                "Expected token \"}\", but reached end of input.".to_string()
            }
            ParseError::UnmatchedGroupClose { .. } => {
                "Unmatched closing token: \"}\".".to_string()
            }
            ParseError::MissingOperand { construct, .. } => {
                "Expected an operand after \"".to_string() + construct + "\", but found none."
            }
        }
    }

    #[cfg(feature = "ariadne")]
    fn label(&self) -> String {
        match self {
            ParseError::UnexpectedToken { .. } => "cannot start an expression".into(),
            ParseError::UnterminatedGroup { .. } => "this group is never closed".into(),
            ParseError::UnmatchedGroupClose { .. } => "unmatched \"}\"".into(),
            ParseError::MissingOperand { .. } => "expected an operand after this".into(),
        }
    }
}

impl LayoutError {
    pub fn span(&self) -> Span {
        match self {
            LayoutError::OperandNotGrouped { span }
            | LayoutError::UnsupportedConstruct { span, .. } => *span,
        }
    }

    pub fn message(&self) -> String {
        match self {
            LayoutError::OperandNotGrouped { .. } => {
                "Fraction operands must be enclosed in braces.".to_string()
            }
            LayoutError::UnsupportedConstruct { construct, .. } => {
                "Cannot lay out ".to_string() + construct + " nodes."
            }
        }
    }

    #[cfg(feature = "ariadne")]
    fn label(&self) -> String {
        match self {
            LayoutError::OperandNotGrouped { .. } => "wrap this operand in {...}".into(),
            LayoutError::UnsupportedConstruct { construct, .. } => {
                format!("{construct} is not supported here")
            }
        }
    }
}

impl NotationError {
    pub fn span(&self) -> Span {
        match self {
            NotationError::Lex(e) => e.span(),
            NotationError::Parse(e) => e.span(),
            NotationError::Layout(e) => e.span(),
        }
    }

    pub fn message(&self) -> String {
        match self {
            NotationError::Lex(e) => e.message(),
            NotationError::Parse(e) => e.message(),
            NotationError::Layout(e) => e.message(),
        }
    }
}

#[cfg(feature = "ariadne")]
impl NotationError {
    /// Convert this error into an [`ariadne::Report`] for pretty-printing.
    pub fn to_report<'name>(
        &self,
        source_name: &'name str,
        with_color: bool,
    ) -> ariadne::Report<'static, (&'name str, Range<usize>)> {
        use ariadne::{Label, Report, ReportKind};

        let label_msg = match self {
            NotationError::Lex(e) => e.label(),
            NotationError::Parse(e) => e.label(),
            NotationError::Layout(e) => e.label(),
        };
        let span = self.span();

        let mut config = ariadne::Config::default().with_index_type(ariadne::IndexType::Byte);
        if !with_color {
            config = config.with_color(false);
        }
        Report::build(ReportKind::Error, (source_name, span.start()..span.start()))
            .with_config(config)
            .with_message(self.message())
            .with_label(Label::new((source_name, Range::from(span))).with_message(label_msg))
            .finish()
    }
}

impl From<LexError> for NotationError {
    fn from(e: LexError) -> Self {
        NotationError::Lex(e)
    }
}

impl From<ParseError> for NotationError {
    fn from(e: ParseError) -> Self {
        NotationError::Parse(e)
    }
}

impl From<LayoutError> for NotationError {
    fn from(e: LayoutError) -> Self {
        NotationError::Layout(e)
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.span().start(), self.message())
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.span().start(), self.message())
    }
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.span().start(), self.message())
    }
}

impl fmt::Display for NotationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.span().start(), self.message())
    }
}

impl std::error::Error for LexError {}
impl std::error::Error for ParseError {}
impl std::error::Error for LayoutError {}

impl std::error::Error for NotationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NotationError::Lex(e) => Some(e),
            NotationError::Parse(e) => Some(e),
            NotationError::Layout(e) => Some(e),
        }
    }
}
