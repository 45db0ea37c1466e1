use std::fmt::Write;

use insta::assert_snapshot;
use notation::{
    CachedMetrics, Config, DisplayItem, Expr, FixedAdvance, Lexer, Node, Notation, Point,
    TokenKind, bounds, dump_tree,
};

const SAMPLE: &str = "f(x) = G_z + K_a^b + (B_3 - 9.03)";

fn notation() -> Notation<FixedAdvance> {
    Notation::new(Config::default(), FixedAdvance::default())
}

fn collect_leaves(expr: &Expr, out: &mut Vec<Expr>) {
    match &expr.node {
        Node::Grouped(children) => {
            for child in children {
                collect_leaves(child, out);
            }
        }
        Node::Up(operand) | Node::Down(operand) => collect_leaves(operand, out),
        Node::Binary { lhs, rhs, .. } => {
            collect_leaves(lhs, out);
            collect_leaves(rhs, out);
        }
        Node::Over { accent, operand } | Node::Under { accent, operand } => {
            collect_leaves(accent, out);
            collect_leaves(operand, out);
        }
        _ if expr.is_leaf() => out.push(expr.clone()),
        _ => {}
    }
}

fn leaves(hlist: &[Expr]) -> Vec<Expr> {
    let mut out = Vec::new();
    for expr in hlist {
        collect_leaves(expr, &mut out);
    }
    out
}

#[test]
fn sample_has_no_bad_tokens() {
    let tokens: Vec<_> = Lexer::new(SAMPLE).map(Result::unwrap).collect();
    assert!(tokens.iter().all(|t| t.kind != TokenKind::Bad));
    let filtered = notation().tokenize(SAMPLE).unwrap();
    assert!(!filtered.is_empty());
    assert!(filtered.iter().all(|t| !t.kind.is_ignored()));
}

#[test]
fn sample_lays_out() {
    let n = notation();
    let hlist = n.layout(SAMPLE).unwrap();
    assert!(!hlist.is_empty());
    let placed = leaves(&hlist);
    assert!(!placed.is_empty());
    for leaf in &placed {
        assert!(leaf.geom.w.is_finite() && leaf.geom.w >= 0.0, "{leaf:?}");
        assert!(leaf.geom.x.is_finite() && leaf.geom.y.is_finite());
    }
}

#[test]
fn sample_tree() {
    let hlist = notation().layout(SAMPLE).unwrap();
    assert_snapshot!(dump_tree(&hlist), @r#"
    Identifier "f" [x=20.0 y=20.0 w=10.0 h=20.0 s=1.00]
    Symbol "(" Open [x=30.0 y=20.0 w=10.0 h=20.0 s=1.00]
    Identifier "x" [x=40.0 y=20.0 w=10.0 h=20.0 s=1.00]
    Symbol ")" Close [x=50.0 y=20.0 w=10.0 h=20.0 s=1.00]
    Symbol "=" Rel [x=60.0 y=20.0 w=10.0 h=20.0 s=1.00]
    Identifier "G" [x=70.0 y=20.0 w=10.0 h=20.0 s=1.00]
    Down [x=80.0 y=10.0 w=8.0 h=16.0 s=0.80]
      Identifier "z" [x=80.0 y=10.0 w=8.0 h=16.0 s=0.80]
    Symbol "+" Bin [x=91.0 y=20.0 w=10.0 h=20.0 s=1.00]
    Identifier "K" [x=101.0 y=20.0 w=10.0 h=20.0 s=1.00]
    Down [x=111.0 y=10.0 w=8.0 h=16.0 s=0.80]
      Identifier "a" [x=111.0 y=10.0 w=8.0 h=16.0 s=0.80]
    Up [x=122.0 y=30.0 w=8.0 h=16.0 s=0.80]
      Identifier "b" [x=122.0 y=30.0 w=8.0 h=16.0 s=0.80]
    Symbol "+" Bin [x=133.0 y=20.0 w=10.0 h=20.0 s=1.00]
    Symbol "(" Open [x=143.0 y=20.0 w=10.0 h=20.0 s=1.00]
    Identifier "B" [x=153.0 y=20.0 w=10.0 h=20.0 s=1.00]
    Down [x=163.0 y=10.0 w=8.0 h=16.0 s=0.80]
      Number "3" [x=163.0 y=10.0 w=8.0 h=16.0 s=0.80]
    Symbol "-" Bin [x=174.0 y=20.0 w=10.0 h=20.0 s=1.00]
    Number "9.03" [x=184.0 y=20.0 w=40.0 h=20.0 s=1.00]
    Symbol ")" Close [x=224.0 y=20.0 w=10.0 h=20.0 s=1.00]
    "#);
}

#[test]
fn fraction_display_list() {
    let n = notation();
    let hlist = n.layout(r"\frac{1}{x+y}").unwrap();
    let mut out = String::new();
    for item in n.display_list(&hlist) {
        writeln!(out, "{item}").unwrap();
    }
    assert_snapshot!(out, @r#"
    glyph "1" at (10.0, 20.0) size 20.0
    glyph "x" at (0.0, 48.0) size 20.0
    glyph "+" at (10.0, 48.0) size 20.0
    glyph "y" at (20.0, 48.0) size 20.0
    rule from 0.0 to 30.0 at 24.0
    "#);
}

#[test]
fn display_list_is_non_negative() {
    let n = notation();
    let hlist = n
        .layout(r"\sum_{i} \hat{x}_i^2 \underline{y} + \frac{\alpha}{\beta^2}")
        .unwrap();
    let items = n.display_list(&hlist);
    assert!(!items.is_empty());
    for item in &items {
        match item {
            DisplayItem::Glyph { x, y, .. } => assert!(*x >= 0.0 && *y >= 0.0, "{item}"),
            DisplayItem::Rule { x0, x1, y } => assert!(*x0 >= 0.0 && x1 > x0 && *y >= 0.0),
        }
    }
}

#[test]
fn layout_is_repeatable() {
    let n = notation();
    let source = r"\frac{a}{bc} + \Big( x_1";
    let mut first = n.layout(source).unwrap();
    let second = n.layout(source).unwrap();
    assert_eq!(first, second);

    n.typesetter()
        .typeset(&mut first, Point::new(0.0, 0.0), 1.0)
        .unwrap();
    let a = bounds(&first).unwrap();
    let b = bounds(&second).unwrap();
    assert!((b.min_x - a.min_x - 20.0).abs() < 1e-4);
    assert!((b.min_y - a.min_y - 20.0).abs() < 1e-4);
}

#[test]
fn measure_matches_leaf_extents() {
    let n = notation();
    let hlist = n.layout(r"x^{2} + \frac{a}{b} - y_k").unwrap();
    let size = n.typesetter().measure(&hlist);
    let placed = leaves(&hlist);
    let max_x = placed.iter().map(|e| e.geom.x + e.geom.w).fold(f32::MIN, f32::max);
    let min_x = placed.iter().map(|e| e.geom.x).fold(f32::MAX, f32::min);
    let max_y = placed.iter().map(|e| e.geom.y + e.geom.h).fold(f32::MIN, f32::max);
    let min_y = placed.iter().map(|e| e.geom.y).fold(f32::MAX, f32::min);
    assert_eq!(size.min_x, 0.0);
    assert_eq!(size.min_y, 0.0);
    assert!((size.width() - (max_x - min_x)).abs() < 1e-4);
    assert!((size.height() - (max_y - min_y)).abs() < 1e-4);
}

#[test]
fn cached_metrics_give_identical_layout() {
    let plain = notation();
    let cached = Notation::new(Config::default(), CachedMetrics::new(FixedAdvance::default()));
    let source = r"x_1 + x_2 + x_3 = \sqrt";
    // `\sqrt` is not a known command.
    assert!(cached.layout(source).is_err());

    let source = r"x_1 + x_2 + x_3 = \frac{x}{2}";
    assert_eq!(plain.layout(source).unwrap(), cached.layout(source).unwrap());
    assert!(cached.typesetter().metrics().cached_entries() < 10);
}
