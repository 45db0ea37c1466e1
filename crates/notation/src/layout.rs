//! Box layout.
//!
//! [`Typesetter::typeset`] walks a list of root expressions with a pen `(x, y, scale)` and
//! writes a [`Geometry`] into every node it places. Coordinates are baseline-relative with y
//! growing upwards; a node's box spans `x..x + w` horizontally and `y..y + h` vertically.
//!
//! Fractions are laid out in two passes: both operands are typeset provisionally to learn
//! their true extents, then typeset again at their final, aligned positions.

use log::trace;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ast::{Expr, Geometry, Node};
use crate::error::LayoutError;
use crate::metrics::TextMetrics;

/// Layout parameters. Lengths are in pixels unless noted otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct LayoutConfig {
    /// Base font size. One scaled unit is `font_size * scale`.
    pub font_size: f32,
    /// Scale factor applied to superscripts and subscripts.
    pub script_scale: f32,
    /// Vertical script offset, in scaled units.
    pub script_shift: f32,
    /// Extra advance after a single-leaf script.
    pub script_padding: f32,
    /// Distance between the fraction rule and each operand.
    pub fraction_gap: f32,
    /// Added to the combined operand heights of a fraction.
    pub fraction_margin: f32,
    /// Fraction operands narrower than this share of the fraction width are centered.
    pub center_threshold: f32,
    /// Distance between an accent and its operand, in scaled units.
    pub accent_gap: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            font_size: 20.0,
            script_scale: 0.8,
            script_shift: 0.5,
            script_padding: 3.0,
            fraction_gap: 4.0,
            fraction_margin: 8.0,
            center_threshold: 0.9,
            accent_gap: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }
}

/// An axis-aligned bounding box in layout coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BBox {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl BBox {
    #[inline]
    pub const fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        BBox {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    fn of(geom: &Geometry) -> Self {
        BBox::new(geom.x, geom.y, geom.x + geom.w, geom.y + geom.h)
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    pub fn union(self, other: BBox) -> BBox {
        BBox {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// The same size moved to the origin.
    pub fn normalized(self) -> BBox {
        BBox::new(0.0, 0.0, self.width(), self.height())
    }
}

fn include(bbox: &mut Option<BBox>, other: BBox) {
    *bbox = Some(match *bbox {
        Some(b) => b.union(other),
        None => other,
    });
}

/// Absolute bounds of all placed leaves in `hlist`, or `None` if there are none.
pub fn bounds(hlist: &[Expr]) -> Option<BBox> {
    let mut bbox = None;
    for expr in hlist {
        collect_bounds(expr, &mut bbox);
    }
    bbox
}

/// Absolute bounds of one expression.
pub fn expr_bounds(expr: &Expr) -> Option<BBox> {
    let mut bbox = None;
    collect_bounds(expr, &mut bbox);
    bbox
}

fn collect_bounds(expr: &Expr, bbox: &mut Option<BBox>) {
    match &expr.node {
        Node::Number(_)
        | Node::Identifier(_)
        | Node::MathOperator(_)
        | Node::Symbol { .. }
        | Node::Space(_) => include(bbox, BBox::of(&expr.geom)),
        Node::Grouped(children) => {
            for child in children {
                collect_bounds(child, bbox);
            }
        }
        Node::Binary { lhs, rhs, .. } => {
            collect_bounds(lhs, bbox);
            collect_bounds(rhs, bbox);
        }
        Node::Up(operand) | Node::Down(operand) => collect_bounds(operand, bbox),
        Node::Over { accent, operand } | Node::Under { accent, operand } => {
            collect_bounds(accent, bbox);
            collect_bounds(operand, bbox);
        }
        // The operand of a scaler is never placed.
        Node::Scaled { .. } => {}
        Node::Text { .. }
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

/// Lays out expression trees using a metrics provider.
#[derive(Debug, Clone)]
pub struct Typesetter<M> {
    metrics: M,
    config: LayoutConfig,
}

impl<M: TextMetrics> Typesetter<M> {
    pub fn new(metrics: M, config: LayoutConfig) -> Self {
        Typesetter { metrics, config }
    }

    #[inline]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    #[inline]
    pub fn metrics(&self) -> &M {
        &self.metrics
    }

    /// Assign geometry to every node of `hlist`, starting with the pen at `origin`.
    ///
    /// Geometry from a previous run is overwritten.
    pub fn typeset(
        &self,
        hlist: &mut [Expr],
        origin: Point,
        scale: f32,
    ) -> Result<(), LayoutError> {
        self.layout_list(hlist, origin.x, origin.y, scale)?;
        Ok(())
    }

    /// Size of the laid-out `hlist`, reported at the origin.
    pub fn measure(&self, hlist: &[Expr]) -> BBox {
        bounds(hlist).map(BBox::normalized).unwrap_or_default()
    }

    /// [`typeset`](Self::typeset) followed by [`measure`](Self::measure).
    pub fn measure_at(
        &self,
        hlist: &mut [Expr],
        origin: Point,
        scale: f32,
    ) -> Result<BBox, LayoutError> {
        self.typeset(hlist, origin, scale)?;
        Ok(self.measure(hlist))
    }

    #[inline]
    fn unit(&self, scale: f32) -> f32 {
        self.config.font_size * scale
    }

    /// Lay out siblings from left to right and return the final pen x.
    fn layout_list(
        &self,
        hlist: &mut [Expr],
        mut x: f32,
        y: f32,
        scale: f32,
    ) -> Result<f32, LayoutError> {
        // A scaler multiplies the scale of the sibling after it.
        let mut pending = 1.0;
        for expr in hlist.iter_mut() {
            let factor = match expr.node {
                Node::Scaled { factor, .. } => Some(factor),
                _ => None,
            };
            x = self.layout_node(expr, x, y, scale * pending)?;
            pending = factor.map_or(1.0, |factor| pending * factor);
        }
        Ok(x)
    }

    /// Lay out one node at the pen and return the pen x after it.
    fn layout_node(&self, expr: &mut Expr, x: f32, y: f32, scale: f32) -> Result<f32, LayoutError> {
        trace!("{} at ({x:.2}, {y:.2}) scale {scale:.3}", expr.kind_name());
        let unit = self.unit(scale);
        let span = expr.span;
        let kind = expr.kind_name();
        let raised = matches!(expr.node, Node::Up(_) | Node::Over { .. });
        match &mut expr.node {
            Node::Number(text) | Node::Identifier(text) | Node::Symbol { text, .. } => {
                let w = self.metrics.measure_width(text, scale);
                expr.geom = Geometry {
                    x,
                    y,
                    w,
                    h: unit,
                    scale,
                };
                Ok(x + w)
            }
            Node::MathOperator(text) => {
                let w = self.metrics.measure_width(text, scale);
                let start = x + w / 2.0;
                expr.geom = Geometry {
                    x: start,
                    y,
                    w,
                    h: unit,
                    scale,
                };
                Ok(start + w + w / 2.0)
            }
            Node::Space(value) => {
                let w = self.metrics.measure_width(value, scale);
                expr.geom = Geometry {
                    x,
                    y,
                    w,
                    h: unit,
                    scale,
                };
                Ok(x + w + unit)
            }
            Node::Grouped(children) => {
                let end = self.layout_list(children, x, y, scale)?;
                let h = bounds(children).map_or(0.0, |b| b.height());
                expr.geom = Geometry {
                    x,
                    y,
                    w: end - x,
                    h,
                    scale,
                };
                Ok(end)
            }
            Node::Binary { lhs, rhs, .. } => {
                for operand in [&**lhs, &**rhs] {
                    if !operand.is_grouped() {
                        return Err(LayoutError::OperandNotGrouped { span: operand.span });
                    }
                }
                let width = self.layout_fraction(lhs, rhs, x, y, scale)?;
                let upper_h = expr_bounds(lhs).map_or(0.0, |b| b.height());
                let lower_h = expr_bounds(rhs).map_or(0.0, |b| b.height());
                expr.geom = Geometry {
                    x,
                    y,
                    w: width,
                    h: upper_h + lower_h + self.config.fraction_margin,
                    scale,
                };
                Ok(x + width)
            }
            Node::Up(operand) | Node::Down(operand) => {
                let script_scale = scale * self.config.script_scale;
                let shift = self.config.script_shift * unit;
                let script_y = if raised { y + shift } else { y - shift };
                let mut end = self.layout_node(operand, x, script_y, script_scale)?;
                if operand.is_leaf() {
                    end += self.config.script_padding;
                    expr.geom = operand.geom;
                } else {
                    expr.geom = Geometry {
                        x,
                        y: script_y,
                        w: end - x,
                        h: expr_bounds(operand).map_or(0.0, |b| b.height()),
                        scale: script_scale,
                    };
                }
                Ok(end)
            }
            Node::Over { accent, operand } | Node::Under { accent, operand } => {
                let accent_w = accent
                    .leaf_text()
                    .map_or(0.0, |text| self.metrics.measure_width(text, scale));
                let mut end = self.layout_node(operand, x, y, scale)?;
                let mut body = expr_bounds(operand).unwrap_or(BBox::new(x, y, x, y));
                // The accent must not start left of the pen.
                let overhang = x - (body.min_x + (body.width() - accent_w) / 2.0);
                if overhang > 0.0 {
                    end = self.layout_node(operand, x + overhang, y, scale)?;
                    body = expr_bounds(operand)
                        .unwrap_or(BBox::new(x + overhang, y, x + overhang, y));
                }
                let gap = self.config.accent_gap * unit;
                let accent_y = if raised {
                    body.max_y + gap
                } else {
                    body.min_y - gap - unit
                };
                accent.geom = Geometry {
                    x: body.min_x + (body.width() - accent_w) / 2.0,
                    y: accent_y,
                    w: accent_w,
                    h: unit,
                    scale,
                };
                let w = (end - x).max(accent_w);
                let h = body.union(BBox::of(&accent.geom)).height();
                expr.geom = Geometry { x, y, w, h, scale };
                Ok(x + w)
            }
            Node::Scaled { .. } => {
                expr.geom = Geometry {
                    x,
                    y,
                    w: 0.0,
                    h: 0.0,
                    scale,
                };
                Ok(x)
            }
            Node::Text { .. }
            | Node::Array(_)
            | Node::Unary { .. }
            | Node::Stretchy(_)
            | Node::Sub { .. }
            | Node::Super { .. }
            | Node::Subsup { .. }
            | Node::Underover { .. }
            | Node::DownUp { .. } => Err(LayoutError::UnsupportedConstruct {
                construct: kind,
                span,
            }),
        }
    }

    /// Stack `upper` over `lower` around the pen and return the fraction width.
    fn layout_fraction(
        &self,
        upper: &mut Expr,
        lower: &mut Expr,
        x: f32,
        y: f32,
        scale: f32,
    ) -> Result<f32, LayoutError> {
        // First pass: learn the true extents of both operands. An operand may start to the
        // right of the pen, so its extent is measured from `x`.
        let upper_box = self.provisional_bounds(upper, x, y, scale)?;
        let lower_box = self.provisional_bounds(lower, x, y, scale)?;
        let extent = |b: &BBox| b.max_x - x;
        let width = extent(&upper_box).max(extent(&lower_box));

        let align = |b: &BBox| {
            if extent(b) < self.config.center_threshold * width {
                x + (width - b.width()) / 2.0 - (b.min_x - x)
            } else {
                x
            }
        };
        let gap = self.config.fraction_gap;
        let upper_y = y + (y - upper_box.min_y) + gap;
        let lower_y = y - (lower_box.max_y - y) - gap;

        // Second pass: final placement.
        self.layout_node(upper, align(&upper_box), upper_y, scale)?;
        self.layout_node(lower, align(&lower_box), lower_y, scale)?;
        Ok(width)
    }

    fn provisional_bounds(
        &self,
        expr: &mut Expr,
        x: f32,
        y: f32,
        scale: f32,
    ) -> Result<BBox, LayoutError> {
        self.layout_node(expr, x, y, scale)?;
        Ok(expr_bounds(expr).unwrap_or(BBox::new(x, y, x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::metrics::FixedAdvance;
    use crate::parser::{ParseConfig, parse};
    use crate::symbols::AtomClass;
    use crate::token::Span;

    /// 10px per character at scale 1.
    fn typesetter() -> Typesetter<FixedAdvance> {
        Typesetter::new(FixedAdvance::default(), LayoutConfig::default())
    }

    fn laid_out(source: &str) -> Vec<Expr> {
        let mut hlist = parse(&tokenize(source).unwrap(), ParseConfig::default()).unwrap();
        typesetter()
            .typeset(&mut hlist, Point::new(20.0, 20.0), 1.0)
            .unwrap();
        hlist
    }

    fn geom(x: f32, y: f32, w: f32, h: f32, scale: f32) -> Geometry {
        Geometry { x, y, w, h, scale }
    }

    fn assert_close(actual: Geometry, expected: Geometry) {
        let pairs = [
            (actual.x, expected.x),
            (actual.y, expected.y),
            (actual.w, expected.w),
            (actual.h, expected.h),
            (actual.scale, expected.scale),
        ];
        for (a, e) in pairs {
            assert!((a - e).abs() < 1e-3, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn leaves_advance_the_pen() {
        let hlist = laid_out("ab+1");
        assert_close(hlist[0].geom, geom(20.0, 20.0, 20.0, 20.0, 1.0));
        assert_close(hlist[1].geom, geom(40.0, 20.0, 10.0, 20.0, 1.0));
        assert_close(hlist[2].geom, geom(50.0, 20.0, 10.0, 20.0, 1.0));
    }

    #[test]
    fn math_operator_gets_half_width_padding() {
        let hlist = laid_out(r"\sin x");
        assert_close(hlist[0].geom, geom(35.0, 20.0, 30.0, 20.0, 1.0));
        assert_close(hlist[1].geom, geom(80.0, 20.0, 10.0, 20.0, 1.0));
    }

    #[test]
    fn space_reserves_an_extra_unit() {
        // `\quad` measures its literal value "1em", three characters.
        let hlist = laid_out(r"a\quad b");
        assert_close(hlist[1].geom, geom(30.0, 20.0, 30.0, 20.0, 1.0));
        assert_close(hlist[2].geom, geom(80.0, 20.0, 10.0, 20.0, 1.0));
    }

    #[test]
    fn subscript_leaf() {
        let hlist = laid_out("x_2");
        assert_close(hlist[0].geom, geom(20.0, 20.0, 10.0, 20.0, 1.0));
        let Node::Down(operand) = &hlist[1].node else {
            panic!("expected a subscript");
        };
        assert_close(operand.geom, geom(30.0, 10.0, 8.0, 16.0, 0.8));
        assert_eq!(hlist[1].geom, operand.geom);
    }

    #[test]
    fn script_padding_applies_to_leaves_only() {
        let hlist = laid_out("x^2y");
        // 30 + 8 + 3
        assert_close(hlist[2].geom, geom(41.0, 20.0, 10.0, 20.0, 1.0));

        let hlist = laid_out("x^{2}y");
        assert_close(hlist[1].geom, geom(30.0, 30.0, 8.0, 16.0, 0.8));
        assert_close(hlist[2].geom, geom(38.0, 20.0, 10.0, 20.0, 1.0));
    }

    #[test]
    fn nested_scripts_compound_the_scale() {
        let hlist = laid_out("x^{a^b}");
        let Node::Up(group) = &hlist[1].node else {
            panic!("expected a superscript");
        };
        let Node::Grouped(children) = &group.node else {
            panic!("expected a group");
        };
        assert_close(children[0].geom, geom(30.0, 30.0, 8.0, 16.0, 0.8));
        // Shift is half of the 16px scaled unit.
        assert_close(children[1].geom, geom(38.0, 38.0, 6.4, 12.8, 0.64));
    }

    #[test]
    fn group_advances_the_pen() {
        let hlist = laid_out("{ab}c");
        assert_close(hlist[0].geom, geom(20.0, 20.0, 20.0, 20.0, 1.0));
        assert_close(hlist[1].geom, geom(40.0, 20.0, 10.0, 20.0, 1.0));
    }

    #[test]
    fn fraction_centers_the_narrow_operand() {
        let hlist = laid_out(r"\frac{a}{bb}c");
        let Node::Binary { lhs, rhs, .. } = &hlist[0].node else {
            panic!("expected a fraction");
        };
        let Node::Grouped(upper) = &lhs.node else {
            panic!()
        };
        let Node::Grouped(lower) = &rhs.node else {
            panic!()
        };
        assert_close(upper[0].geom, geom(25.0, 24.0, 10.0, 20.0, 1.0));
        assert_close(lower[0].geom, geom(20.0, -4.0, 20.0, 20.0, 1.0));
        assert_close(hlist[0].geom, geom(20.0, 20.0, 20.0, 48.0, 1.0));
        assert_close(hlist[1].geom, geom(40.0, 20.0, 10.0, 20.0, 1.0));
    }

    #[test]
    fn fraction_width_includes_operator_padding() {
        // `\sin` starts half its width right of the pen and ends at 65.
        let hlist = laid_out(r"\frac{\sin}{x}y");
        let Node::Binary { lhs, rhs, .. } = &hlist[0].node else {
            panic!("expected a fraction");
        };
        let Node::Grouped(upper) = &lhs.node else {
            panic!()
        };
        let Node::Grouped(lower) = &rhs.node else {
            panic!()
        };
        assert_close(upper[0].geom, geom(35.0, 24.0, 30.0, 20.0, 1.0));
        assert_close(lower[0].geom, geom(37.5, -4.0, 10.0, 20.0, 1.0));
        assert_close(hlist[0].geom, geom(20.0, 20.0, 45.0, 48.0, 1.0));
        assert_close(hlist[1].geom, geom(65.0, 20.0, 10.0, 20.0, 1.0));
        let content = bounds(&hlist[..1]).unwrap();
        assert!(content.max_x <= hlist[1].geom.x);
    }

    #[test]
    fn centered_operator_is_centered_by_its_ink() {
        let hlist = laid_out(r"\frac{abcdefgh}{\sin}");
        let Node::Binary { rhs, .. } = &hlist[0].node else {
            panic!("expected a fraction");
        };
        let Node::Grouped(lower) = &rhs.node else {
            panic!()
        };
        // Ink spans 45..75, centered under 20..100.
        assert_close(lower[0].geom, geom(45.0, -4.0, 30.0, 20.0, 1.0));
    }

    #[test]
    fn fraction_with_equal_operands_is_flush() {
        let hlist = laid_out(r"\frac{ab}{cd}");
        let Node::Binary { lhs, rhs, .. } = &hlist[0].node else {
            panic!("expected a fraction");
        };
        assert_eq!(lhs.geom.x, 20.0);
        assert_eq!(rhs.geom.x, 20.0);
    }

    #[test]
    fn fraction_near_equal_operands_are_flush() {
        // 19 of 20 characters is above the centering threshold.
        let hlist = laid_out(r"\frac{abcdefghijklmnopqrs}{abcdefghijklmnopqrst}");
        let Node::Binary { lhs, .. } = &hlist[0].node else {
            panic!("expected a fraction");
        };
        assert_eq!(lhs.geom.x, 20.0);
    }

    #[test]
    fn fraction_operands_must_be_grouped() {
        let mut hlist = parse(&tokenize(r"\frac a{b}").unwrap(), ParseConfig::default()).unwrap();
        let err = typesetter()
            .typeset(&mut hlist, Point::default(), 1.0)
            .unwrap_err();
        assert_eq!(err, LayoutError::OperandNotGrouped { span: Span::new(6, 7) });
    }

    #[test]
    fn over_accent_is_centered_above() {
        let hlist = laid_out(r"\hat{ab}c");
        let Node::Over { accent, operand } = &hlist[0].node else {
            panic!("expected an accent");
        };
        assert_close(operand.geom, geom(20.0, 20.0, 20.0, 20.0, 1.0));
        assert_close(accent.geom, geom(25.0, 42.0, 10.0, 20.0, 1.0));
        assert_close(hlist[0].geom, geom(20.0, 20.0, 20.0, 42.0, 1.0));
        assert_close(hlist[1].geom, geom(40.0, 20.0, 10.0, 20.0, 1.0));
    }

    #[test]
    fn under_accent_sits_below() {
        let hlist = laid_out(r"\underline{ab}");
        let Node::Under { accent, .. } = &hlist[0].node else {
            panic!("expected an accent");
        };
        assert_close(accent.geom, geom(25.0, -2.0, 10.0, 20.0, 1.0));
    }

    #[test]
    fn wide_accent_starts_at_the_pen() {
        // `\ddot` draws "..", twice as wide as `i`.
        let hlist = laid_out(r"a\ddot{i}b");
        let Node::Over { accent, operand } = &hlist[1].node else {
            panic!("expected an accent");
        };
        assert_close(accent.geom, geom(30.0, 42.0, 20.0, 20.0, 1.0));
        let Node::Grouped(body) = &operand.node else {
            panic!("expected a group");
        };
        assert_close(body[0].geom, geom(35.0, 20.0, 10.0, 20.0, 1.0));
        assert_close(hlist[1].geom, geom(30.0, 20.0, 20.0, 42.0, 1.0));
        assert_close(hlist[2].geom, geom(50.0, 20.0, 10.0, 20.0, 1.0));
    }

    #[test]
    fn accent_over_empty_group() {
        let hlist = laid_out(r"a\hat{}b");
        let Node::Over { accent, .. } = &hlist[1].node else {
            panic!("expected an accent");
        };
        assert_eq!(accent.geom.x, 30.0);
        assert_close(hlist[2].geom, geom(40.0, 20.0, 10.0, 20.0, 1.0));
    }

    #[test]
    fn scaler_scales_the_next_sibling() {
        let hlist = laid_out(r"\Big( x y");
        assert_close(hlist[0].geom, geom(20.0, 20.0, 0.0, 0.0, 1.0));
        assert_close(hlist[1].geom, geom(20.0, 20.0, 16.0, 32.0, 1.6));
        assert_close(hlist[2].geom, geom(36.0, 20.0, 10.0, 20.0, 1.0));
        let Node::Scaled { operand, .. } = &hlist[0].node else {
            panic!("expected a scaler");
        };
        assert_eq!(operand.geom, Geometry::default());
    }

    #[test]
    fn trailing_scaler_is_harmless() {
        let mut hlist = vec![Expr::new(
            Node::Scaled {
                factor: 2.0,
                operand: Box::new(Expr::new(Node::Identifier("x".into()), Span::default())),
            },
            Span::default(),
        )];
        let size = typesetter()
            .measure_at(&mut hlist, Point::default(), 1.0)
            .unwrap();
        assert_eq!(size, BBox::default());
    }

    #[test]
    fn placeholders_are_rejected() {
        let mut hlist = vec![Expr::new(Node::Array(Vec::new()), Span::new(0, 3))];
        let err = typesetter()
            .typeset(&mut hlist, Point::default(), 1.0)
            .unwrap_err();
        assert_eq!(
            err,
            LayoutError::UnsupportedConstruct {
                construct: "Array",
                span: Span::new(0, 3),
            }
        );
    }

    #[test]
    fn measure_is_normalized() {
        let t = typesetter();
        let mut hlist = laid_out("x_2");
        let size = t.measure(&hlist);
        assert_eq!(size, BBox::new(0.0, 0.0, 18.0, 30.0));
        // The same size at any origin.
        let moved = t
            .measure_at(&mut hlist, Point::new(-100.0, 7.0), 1.0)
            .unwrap();
        assert_eq!(moved, size);
        let absolute = bounds(&hlist).unwrap();
        assert_eq!(absolute.min_x, -100.0);
    }

    #[test]
    fn relayout_overwrites_geometry() {
        let t = typesetter();
        let mut first = laid_out(r"\frac{a}{b}+x^2");
        let mut second = first.clone();
        t.typeset(&mut first, Point::new(20.0, 20.0), 1.0).unwrap();
        t.typeset(&mut second, Point::new(20.0, 20.0), 1.0).unwrap();
        assert_eq!(first, second);

        t.typeset(&mut second, Point::new(30.0, 20.0), 1.0).unwrap();
        let a = bounds(&first).unwrap();
        let b = bounds(&second).unwrap();
        assert!((b.min_x - a.min_x - 10.0).abs() < 1e-4);
        assert_eq!(a.width(), b.width());
    }

    #[test]
    fn empty_list_measures_zero() {
        let t = typesetter();
        assert_eq!(t.measure(&[]), BBox::default());
        assert_eq!(bounds(&[]), None);
    }

    #[test]
    fn symbol_class_does_not_change_width() {
        let mut hlist = vec![Expr::new(
            Node::Symbol {
                text: "\u{2211}".into(),
                class: AtomClass::Op,
            },
            Span::default(),
        )];
        let size = typesetter()
            .measure_at(&mut hlist, Point::default(), 2.0)
            .unwrap();
        assert_eq!(size, BBox::new(0.0, 0.0, 20.0, 40.0));
    }
}
