use std::fmt::Write;

use strum_macros::IntoStaticStr;

use crate::symbols::AtomClass;
use crate::token::Span;

/// Position and size assigned by the layout pass.
///
/// Coordinates are baseline-relative with y growing upwards. Before layout runs, all fields
/// except `scale` are zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub scale: f32,
}

impl Default for Geometry {
    fn default() -> Self {
        Geometry {
            x: 0.0,
            y: 0.0,
            w: 0.0,
            h: 0.0,
            scale: 1.0,
        }
    }
}

/// A node of the expression tree together with its source span and layout geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub node: Node,
    pub span: Span,
    pub geom: Geometry,
}

#[derive(Debug, Clone, PartialEq, IntoStaticStr)]
pub enum Node {
    Number(Box<str>),
    Identifier(Box<str>),
    /// An upright operator name such as `sin`.
    MathOperator(Box<str>),
    Symbol {
        text: Box<str>,
        class: AtomClass,
    },
    /// Horizontal space. The payload is the nominal value, e.g. `0.167em`.
    Space(Box<str>),
    /// A `{...}` group.
    Grouped(Vec<Expr>),
    /// A fraction-like macro such as `\frac` or `\binom`.
    ///
    /// After layout, the node's `y` is the baseline height of the divider and `x`/`w` span it.
    Binary {
        name: Box<str>,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Superscript.
    Up(Box<Expr>),
    /// Subscript.
    Down(Box<Expr>),
    /// An accent drawn above the operand. `accent` is always a [`Node::Symbol`].
    Over {
        accent: Box<Expr>,
        operand: Box<Expr>,
    },
    /// An accent drawn below the operand.
    Under {
        accent: Box<Expr>,
        operand: Box<Expr>,
    },
    /// A size command. It scales the sibling that follows it, not `operand`.
    Scaled {
        factor: f32,
        operand: Box<Expr>,
    },
    // The variants below can be represented but have no layout rule.
    Text {
        lhs: Box<str>,
        rhs: Box<str>,
    },
    Array(Vec<Vec<Expr>>),
    Unary {
        name: Box<str>,
        operand: Box<Expr>,
    },
    Stretchy(Box<Expr>),
    Sub {
        base: Box<Expr>,
        sub: Box<Expr>,
    },
    Super {
        base: Box<Expr>,
        sup: Box<Expr>,
    },
    Subsup {
        base: Box<Expr>,
        sub: Box<Expr>,
        sup: Box<Expr>,
    },
    Underover {
        base: Box<Expr>,
        under: Box<Expr>,
        over: Box<Expr>,
    },
    DownUp {
        down: Box<Expr>,
        up: Box<Expr>,
    },
}

impl Expr {
    #[inline]
    pub fn new(node: Node, span: Span) -> Self {
        Expr {
            node,
            span,
            geom: Geometry::default(),
        }
    }

    /// The variant name, e.g. `"Binary"`.
    #[inline]
    pub fn kind_name(&self) -> &'static str {
        <&'static str>::from(&self.node)
    }

    /// The literal text of a leaf node, used for metrics lookups and drawing.
    pub fn leaf_text(&self) -> Option<&str> {
        match &self.node {
            Node::Number(text)
            | Node::Identifier(text)
            | Node::MathOperator(text)
            | Node::Space(text)
            | Node::Symbol { text, .. } => Some(text),
            _ => None,
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.leaf_text().is_some()
    }

    #[inline]
    pub fn is_grouped(&self) -> bool {
        matches!(self.node, Node::Grouped(_))
    }
}

/// Indented textual dump of a tree: one node per line with its text and geometry.
pub fn dump_tree(hlist: &[Expr]) -> String {
    let mut out = String::new();
    for expr in hlist {
        dump_expr(&mut out, expr, 0);
    }
    out
}

fn dump_expr(out: &mut String, expr: &Expr, depth: usize) {
    let g = &expr.geom;
    let _ = write!(out, "{:indent$}{}", "", expr.kind_name(), indent = depth * 2);
    match &expr.node {
        Node::Symbol { text, class } => {
            let _ = write!(out, " {text:?} {}", <&str>::from(*class));
        }
        Node::Binary { name, .. } => {
            let _ = write!(out, " {name:?}");
        }
        Node::Scaled { factor, .. } => {
            let _ = write!(out, " x{factor}");
        }
        Node::Text { lhs, rhs } => {
            let _ = write!(out, " {lhs:?} {rhs:?}");
        }
        Node::Unary { name, .. } => {
            let _ = write!(out, " {name:?}");
        }
        _ => {
            if let Some(text) = expr.leaf_text() {
                let _ = write!(out, " {text:?}");
            }
        }
    }
    let _ = writeln!(
        out,
        " [x={:.1} y={:.1} w={:.1} h={:.1} s={:.2}]",
        g.x, g.y, g.w, g.h, g.scale
    );

    let child = |out: &mut String, e: &Expr| dump_expr(out, e, depth + 1);
    match &expr.node {
        Node::Number(_)
        | Node::Identifier(_)
        | Node::MathOperator(_)
        | Node::Symbol { .. }
        | Node::Space(_)
        | Node::Text { .. } => {}
        Node::Grouped(children) => children.iter().for_each(|e| child(out, e)),
        Node::Array(rows) => rows.iter().flatten().for_each(|e| child(out, e)),
        Node::Binary { lhs, rhs, .. } => {
            child(out, lhs);
            child(out, rhs);
        }
        Node::Up(operand)
        | Node::Down(operand)
        | Node::Stretchy(operand)
        | Node::Scaled { operand, .. }
        | Node::Unary { operand, .. } => child(out, operand),
        Node::Over { accent, operand } | Node::Under { accent, operand } => {
            child(out, accent);
            child(out, operand);
        }
        Node::Sub { base, sub: other } | Node::Super { base, sup: other } => {
            child(out, base);
            child(out, other);
        }
        Node::Subsup { base, sub, sup } => {
            child(out, base);
            child(out, sub);
            child(out, sup);
        }
        Node::Underover { base, under, over } => {
            child(out, base);
            child(out, under);
            child(out, over);
        }
        Node::DownUp { down, up } => {
            child(out, down);
            child(out, up);
        }
    }
}
