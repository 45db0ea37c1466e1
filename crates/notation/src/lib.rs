//! Lay out LaTeX-like math notation as positioned boxes.
//!
//! The pipeline has three stages. The [lexer](Lexer) splits a formula into classified tokens,
//! the [parser](parse) builds a tree of [`Expr`] nodes and the [`Typesetter`] assigns every node a
//! position, size and scale following a TeX-style box model. Drawing is left to the caller:
//! [`Notation::display_list`] flattens a laid-out tree into glyphs and fraction rules in surface
//! coordinates.
//!
//! # Usage
//!
//! ```rust
//! use notation::{Config, FixedAdvance, Notation};
//!
//! let notation = Notation::new(Config::default(), FixedAdvance::default());
//! let hlist = notation.layout(r"\frac{a+1}{b} = x_2").unwrap();
//! for item in notation.display_list(&hlist) {
//!     println!("{item}");
//! }
//! ```
//!
//! # Features
//!
//! - `serde`: [`Config`] and its parts implement serde's `Serialize` and `Deserialize`.
//! - `ariadne`: [`NotationError::to_report`] builds a pretty-printable report.
//!
mod ast;
mod error;
mod layout;
mod lexer;
mod metrics;
mod parser;
mod render;
pub mod symbols;
mod token;

use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use self::ast::{Expr, Geometry, Node, dump_tree};
pub use self::error::{LayoutError, LexError, NotationError, ParseError};
pub use self::layout::{BBox, LayoutConfig, Point, Typesetter, bounds};
pub use self::lexer::{Lexer, tokenize};
pub use self::metrics::{CachedMetrics, FixedAdvance, TextMetrics};
pub use self::parser::{ParseConfig, Parser, parse};
pub use self::render::{DisplayItem, DrawingSink, SurfaceTransform, display_list, draw};
pub use self::token::{Span, Token, TokenKind};

/// Settings for the whole pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct Config {
    pub parse: ParseConfig,
    pub layout: LayoutConfig,
}

/// Runs formulas through the lex, parse and layout stages with a fixed configuration.
#[derive(Debug, Clone)]
pub struct Notation<M> {
    config: Config,
    typesetter: Typesetter<M>,
}

impl<M: TextMetrics> Notation<M> {
    pub fn new(config: Config, metrics: M) -> Self {
        Notation {
            config,
            typesetter: Typesetter::new(metrics, config.layout),
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn typesetter(&self) -> &Typesetter<M> {
        &self.typesetter
    }

    /// The tokens the parser would see.
    pub fn tokenize<'source>(
        &self,
        source: &'source str,
    ) -> Result<Vec<Token<'source>>, NotationError> {
        Ok(tokenize(source)?)
    }

    /// Parse `source` without laying it out.
    pub fn parse(&self, source: &str) -> Result<Vec<Expr>, NotationError> {
        let tokens = tokenize(source)?;
        Ok(parse(&tokens, self.config.parse)?)
    }

    /// Parse and lay out `source` with the pen starting one font size in from the origin.
    pub fn layout(&self, source: &str) -> Result<Vec<Expr>, NotationError> {
        let size = self.config.layout.font_size;
        self.layout_at(source, Point::new(size, size), 1.0)
    }

    /// Parse and lay out `source` with the pen starting at `origin`.
    pub fn layout_at(
        &self,
        source: &str,
        origin: Point,
        scale: f32,
    ) -> Result<Vec<Expr>, NotationError> {
        let mut hlist = self.parse(source)?;
        self.typesetter.typeset(&mut hlist, origin, scale)?;
        debug!("laid out {} roots, bounds {:?}", hlist.len(), bounds(&hlist));
        Ok(hlist)
    }

    /// Drawing instructions for a laid-out tree, placed so that the figure starts at `(0, 0)`.
    pub fn display_list(&self, hlist: &[Expr]) -> Vec<DisplayItem> {
        match bounds(hlist) {
            Some(bbox) => {
                display_list(hlist, self.typesetter.metrics(), &SurfaceTransform::new(bbox))
            }
            None => Vec::new(),
        }
    }
}
