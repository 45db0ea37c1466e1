//! Hand-off to a drawing backend.
//!
//! Layout coordinates are baseline-relative with y growing upwards. Drawing surfaces put the
//! origin at the top left with y growing downwards. [`SurfaceTransform`] maps one to the other
//! and [`display_list`] flattens a typeset tree into positioned glyphs and fraction rules.

use std::fmt;

use crate::ast::{Expr, Node};
use crate::layout::{BBox, Point};
use crate::metrics::TextMetrics;

/// Maps layout coordinates onto a surface so that the whole figure has non-negative coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceTransform {
    min_x: f32,
    max_y: f32,
    width: f32,
    height: f32,
}

impl SurfaceTransform {
    /// A transform for a figure with absolute bounds `bbox`.
    pub fn new(bbox: BBox) -> Self {
        SurfaceTransform {
            min_x: bbox.min_x,
            max_y: bbox.max_y,
            width: bbox.width(),
            height: bbox.height(),
        }
    }

    #[inline]
    pub fn apply(&self, p: Point) -> Point {
        Point::new(p.x - self.min_x, self.max_y - p.y)
    }

    /// Surface size needed to hold the figure.
    #[inline]
    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}

/// One drawing instruction in surface coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayItem {
    /// Text whose baseline starts at `(x, y)`.
    Glyph {
        text: Box<str>,
        x: f32,
        y: f32,
        size: f32,
        /// The metrics provider cannot draw this text; a fallback font is needed.
        missing: bool,
    },
    /// A horizontal fraction rule.
    Rule { x0: f32, x1: f32, y: f32 },
}

impl fmt::Display for DisplayItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayItem::Glyph {
                text,
                x,
                y,
                size,
                missing,
            } => {
                write!(f, "glyph {text:?} at ({x:.1}, {y:.1}) size {size:.1}")?;
                if *missing {
                    f.write_str(" (missing)")?;
                }
                Ok(())
            }
            DisplayItem::Rule { x0, x1, y } => {
                write!(f, "rule from {x0:.1} to {x1:.1} at {y:.1}")
            }
        }
    }
}

/// Flatten a typeset tree into drawing instructions.
pub fn display_list<M: TextMetrics>(
    hlist: &[Expr],
    metrics: &M,
    transform: &SurfaceTransform,
) -> Vec<DisplayItem> {
    let mut items = Vec::new();
    for expr in hlist {
        collect_items(expr, metrics, transform, &mut items);
    }
    items
}

fn collect_items<M: TextMetrics>(
    expr: &Expr,
    metrics: &M,
    transform: &SurfaceTransform,
    items: &mut Vec<DisplayItem>,
) {
    let recurse = |e: &Expr, items: &mut Vec<DisplayItem>| {
        collect_items(e, metrics, transform, items);
    };
    match &expr.node {
        Node::Number(text)
        | Node::Identifier(text)
        | Node::MathOperator(text)
        | Node::Symbol { text, .. } => {
            let at = transform.apply(Point::new(expr.geom.x, expr.geom.y));
            items.push(DisplayItem::Glyph {
                text: text.clone(),
                x: at.x,
                y: at.y,
                size: expr.geom.h,
                missing: !metrics.has_glyph(text),
            });
        }
        Node::Space(_) => {}
        Node::Grouped(children) => {
            for child in children {
                recurse(child, items);
            }
        }
        Node::Binary { lhs, rhs, .. } => {
            recurse(lhs, items);
            recurse(rhs, items);
            let g = &expr.geom;
            let from = transform.apply(Point::new(g.x, g.y));
            items.push(DisplayItem::Rule {
                x0: from.x,
                x1: from.x + g.w,
                y: from.y,
            });
        }
        Node::Up(operand) | Node::Down(operand) => recurse(operand, items),
        Node::Over { accent, operand } | Node::Under { accent, operand } => {
            recurse(operand, items);
            recurse(accent, items);
        }
        Node::Scaled { .. }
        | Node::Text { .. }
        | Node::Array(_)
        | Node::Unary { .. }
        | Node::Stretchy(_)
        | Node::Sub { .. }
        | Node::Super { .. }
        | Node::Subsup { .. }
        | Node::Underover { .. }
        | Node::DownUp { .. } => {}
    }
}

/// A drawing backend.
pub trait DrawingSink {
    fn draw_glyph(&mut self, text: &str, at: Point, size: f32, missing: bool);
    fn draw_rule(&mut self, from: Point, to: Point);
}

/// Replay `items` onto `sink`.
pub fn draw<S: DrawingSink + ?Sized>(items: &[DisplayItem], sink: &mut S) {
    for item in items {
        match item {
            DisplayItem::Glyph {
                text,
                x,
                y,
                size,
                missing,
            } => sink.draw_glyph(text, Point::new(*x, *y), *size, *missing),
            DisplayItem::Rule { x0, x1, y } => {
                sink.draw_rule(Point::new(*x0, *y), Point::new(*x1, *y));
            }
        }
    }
}

impl DrawingSink for Vec<DisplayItem> {
    fn draw_glyph(&mut self, text: &str, at: Point, size: f32, missing: bool) {
        self.push(DisplayItem::Glyph {
            text: text.into(),
            x: at.x,
            y: at.y,
            size,
            missing,
        });
    }

    fn draw_rule(&mut self, from: Point, to: Point) {
        self.push(DisplayItem::Rule {
            x0: from.x,
            x1: to.x,
            y: from.y,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::fmt::Write;

    use insta::assert_snapshot;

    use super::*;
    use crate::layout::{LayoutConfig, Typesetter, bounds};
    use crate::lexer::tokenize;
    use crate::metrics::FixedAdvance;
    use crate::parser::{ParseConfig, parse};

    struct NoGreek;

    impl TextMetrics for NoGreek {
        fn measure_width(&self, text: &str, scale: f32) -> f32 {
            FixedAdvance::default().measure_width(text, scale)
        }

        fn has_glyph(&self, text: &str) -> bool {
            !text.chars().any(|c| ('\u{0370}'..='\u{03FF}').contains(&c))
        }
    }

    fn render<M: TextMetrics>(source: &str, metrics: M) -> String {
        let mut hlist = parse(&tokenize(source).unwrap(), ParseConfig::default()).unwrap();
        let typesetter = Typesetter::new(metrics, LayoutConfig::default());
        typesetter
            .typeset(&mut hlist, Point::new(20.0, 20.0), 1.0)
            .unwrap();
        let transform = SurfaceTransform::new(bounds(&hlist).unwrap());
        let mut out = String::new();
        for item in display_list(&hlist, typesetter.metrics(), &transform) {
            writeln!(out, "{item}").unwrap();
        }
        out
    }

    #[test]
    fn transform_flips_and_offsets() {
        let t = SurfaceTransform::new(BBox::new(20.0, -4.0, 40.0, 44.0));
        assert_eq!(t.apply(Point::new(20.0, 44.0)), Point::new(0.0, 0.0));
        assert_eq!(t.apply(Point::new(40.0, -4.0)), Point::new(20.0, 48.0));
        assert_eq!(t.size(), (20.0, 48.0));
    }

    #[test]
    fn fraction() {
        assert_snapshot!(render(r"\frac{a}{bb}", FixedAdvance::default()), @r#"
        glyph "a" at (5.0, 20.0) size 20.0
        glyph "bb" at (0.0, 48.0) size 20.0
        rule from 0.0 to 20.0 at 24.0
        "#);
    }

    #[test]
    fn spaces_draw_nothing() {
        assert_snapshot!(render(r"a\,b", FixedAdvance::default()), @r#"
        glyph "a" at (0.0, 20.0) size 20.0
        glyph "b" at (100.0, 20.0) size 20.0
        "#);
    }

    #[test]
    fn accent_after_operand() {
        assert_snapshot!(render(r"\hat x", FixedAdvance::default()), @r#"
        glyph "x" at (0.0, 42.0) size 20.0
        glyph "^" at (0.0, 20.0) size 20.0
        "#);
    }

    #[test]
    fn missing_glyphs_are_flagged() {
        assert_snapshot!(render(r"x=\alpha", NoGreek), @r#"
        glyph "x" at (0.0, 20.0) size 20.0
        glyph "=" at (10.0, 20.0) size 20.0
        glyph "α" at (20.0, 20.0) size 20.0 (missing)
        "#);
    }

    #[test]
    fn vec_sink_round_trips_items() {
        let items = vec![
            DisplayItem::Glyph {
                text: "x".into(),
                x: 1.0,
                y: 2.0,
                size: 20.0,
                missing: false,
            },
            DisplayItem::Rule {
                x0: 0.0,
                x1: 5.0,
                y: 3.0,
            },
        ];
        let mut sink: Vec<DisplayItem> = Vec::new();
        draw(&items, &mut sink);
        assert_eq!(sink, items);
    }
}
