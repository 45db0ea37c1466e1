//! Static command tables.
//!
//! Five compile-time maps drive both the lexer (which token category a command word becomes)
//! and the parser (which node a token turns into). They are built by `phf` at compile time,
//! so there is no initialisation step and no way to mutate them at runtime.

use static_assertions::assert_impl_all;
use strum_macros::{EnumIter, IntoStaticStr};

/// TeX's atom classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AtomClass {
    /// `mathord`
    Ord,
    /// `mathop`
    Op,
    /// `mathbin`
    Bin,
    /// `mathrel`
    Rel,
    /// `mathopen`
    Open,
    /// `mathclose`
    Close,
    /// `mathpunct`
    Punct,
    /// Accent marks placed over or under a nucleus.
    Accent,
}

/// A glyph together with its atom class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    pub class: AtomClass,
    pub glyph: &'static str,
}

const fn sym(class: AtomClass, glyph: &'static str) -> Symbol {
    Symbol { class, glyph }
}

/// Whether an accent is drawn above or below its operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Over,
    Under,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diacritical {
    pub placement: Placement,
    pub accent: Symbol,
}

const fn over(glyph: &'static str) -> Diacritical {
    Diacritical {
        placement: Placement::Over,
        accent: sym(AtomClass::Accent, glyph),
    }
}

const fn under(glyph: &'static str) -> Diacritical {
    Diacritical {
        placement: Placement::Under,
        accent: sym(AtomClass::Accent, glyph),
    }
}

/// An entry of the general symbol table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolEntry {
    /// A glyph with an atom class, e.g. `\alpha` or `\le`.
    Symbol(Symbol),
    /// Horizontal space; the payload is the nominal spacing value, e.g. `0.167em`.
    Space(&'static str),
    /// An upright operator name, e.g. `\sin`.
    MathOperator(&'static str),
}

/// The result of resolving a command word against the tables, in table precedence order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Diacritical(Diacritical),
    Scaler(f32),
    Enclosure(Symbol),
    BinaryMacro,
    Entry(SymbolEntry),
}

assert_impl_all!(Command: Send, Sync);
assert_impl_all!(phf::Map<&'static str, SymbolEntry>: Send, Sync);

/// Resolve a command word (including its leading backslash) against all five tables.
///
/// The tables are consulted in a fixed order: diacriticals, scalers, enclosures,
/// binary macros and finally the general symbol table.
pub fn lookup_command(word: &str) -> Option<Command> {
    if let Some(d) = DIACRITICALS.get(word) {
        return Some(Command::Diacritical(*d));
    }
    if let Some(factor) = SCALERS.get(word) {
        return Some(Command::Scaler(*factor));
    }
    if let Some(s) = ENCLOSURES.get(word) {
        return Some(Command::Enclosure(*s));
    }
    if BINARY_MACROS.contains(word) {
        return Some(Command::BinaryMacro);
    }
    SYMBOLS.get(word).map(|entry| Command::Entry(*entry))
}

/// Longest non-command key of the general symbol table that `rest` starts with.
///
/// This covers literal punctuation such as `,`, `''` or `:=`.
pub fn longest_literal(rest: &str) -> Option<(&'static str, SymbolEntry)> {
    LITERAL_KEYS
        .iter()
        .filter(|key| rest.starts_with(**key))
        .max_by_key(|key| key.len())
        .and_then(|key| SYMBOLS.get_entry(*key))
        .map(|(key, entry)| (*key, *entry))
}

/// Keys of [`SYMBOLS`] that do not start with a backslash.
static LITERAL_KEYS: [&str; 20] = [
    "+", "-", "*", ",", ".", ";", ":", "?", ">", "<", "!", "'", "''", "'''", "''''", "=", ":=",
    "/", "~", "|",
];

use AtomClass::*;

pub static DIACRITICALS: phf::Map<&'static str, Diacritical> = phf::phf_map! {
    r"\acute" => over("\u{00B4}"),
    r"\grave" => over("\u{0060}"),
    r"\breve" => over("\u{02D8}"),
    r"\check" => over("\u{02C7}"),
    r"\dot" => over("."),
    r"\ddot" => over(".."),
    r"\mathring" => over("\u{00B0}"),
    r"\vec" => over("\u{20D7}"),
    r"\overrightarrow" => over("\u{20D7}"),
    r"\overleftarrow" => over("\u{20D6}"),
    r"\hat" => over("\u{005E}"),
    r"\widehat" => over("\u{0302}"),
    r"\tilde" => over("~"),
    r"\widetilde" => over("\u{02DC}"),
    r"\bar" => over("\u{203E}"),
    r"\overbrace" => over("\u{FE37}"),
    r"\overbracket" => over("\u{23B4}"),
    r"\overline" => over("\u{00AF}"),
    r"\underbrace" => under("\u{FE38}"),
    r"\underbracket" => under("\u{23B5}"),
    r"\underline" => under("\u{00AF}"),
};

pub static SCALERS: phf::Map<&'static str, f32> = phf::phf_map! {
    r"\big" => 1.2,
    r"\Big" => 1.6,
    r"\bigg" => 2.2,
    r"\Bigg" => 2.9,
    r"\bigl" => 1.2,
    r"\Bigl" => 1.6,
    r"\biggl" => 2.2,
    r"\Biggl" => 2.9,
    r"\bigr" => 1.2,
    r"\Bigr" => 1.6,
    r"\biggr" => 2.2,
    r"\Biggr" => 2.9,
};

// `|`, `\|`, `\vert` and `\Vert` only exist as opening delimiters.
pub static ENCLOSURES: phf::Map<&'static str, Symbol> = phf::phf_map! {
    "(" => sym(Open, "("),
    ")" => sym(Close, ")"),
    "[" => sym(Open, "["),
    "]" => sym(Close, "]"),
    r"\{" => sym(Open, "{"),
    r"\}" => sym(Close, "}"),
    r"\lbrack" => sym(Open, "["),
    r"\lbrace" => sym(Open, "{"),
    r"\rbrack" => sym(Close, "]"),
    r"\rbrace" => sym(Close, "}"),
    r"\llbracket" => sym(Open, "\u{27E6}"),
    r"\rrbracket" => sym(Close, "\u{27E7}"),
    r"\langle" => sym(Open, "\u{27E8}"),
    r"\rangle" => sym(Close, "\u{27E9}"),
    r"\lfloor" => sym(Open, "\u{230A}"),
    r"\rfloor" => sym(Close, "\u{230B}"),
    r"\lceil" => sym(Open, "\u{2308}"),
    r"\rceil" => sym(Close, "\u{2309}"),
    "|" => sym(Open, "\u{2223}"),
    r"\|" => sym(Open, "\u{2225}"),
    r"\vert" => sym(Open, "\u{2223}"),
    r"\Vert" => sym(Open, "\u{2225}"),
};

pub static BINARY_MACROS: phf::Set<&'static str> = phf::phf_set! {
    r"\frac",
    r"\tfrac",
    r"\dfrac",
    r"\stackrel",
    r"\overset",
    r"\underset",
    r"\binom",
};

const fn s(class: AtomClass, glyph: &'static str) -> SymbolEntry {
    SymbolEntry::Symbol(sym(class, glyph))
}

const fn space(value: &'static str) -> SymbolEntry {
    SymbolEntry::Space(value)
}

const fn op(name: &'static str) -> SymbolEntry {
    SymbolEntry::MathOperator(name)
}

pub static SYMBOLS: phf::Map<&'static str, SymbolEntry> = phf::phf_map! {
    // ASCII
    "+" => s(Bin, "+"),
    "-" => s(Bin, "-"),
    "*" => s(Bin, "*"),
    "," => s(Punct, ","),
    "." => s(Punct, "."),
    ";" => s(Punct, ";"),
    ":" => s(Punct, ":"),
    "?" => s(Punct, "?"),
    ">" => s(Rel, ">"),
    "<" => s(Rel, "<"),
    "!" => s(Ord, "!"),
    "'" => s(Ord, "\u{02B9}"),
    "''" => s(Ord, "\u{02BA}"),
    "'''" => s(Ord, "\u{2034}"),
    "''''" => s(Ord, "\u{2057}"),
    "=" => s(Rel, "="),
    ":=" => s(Rel, ":="),
    "/" => s(Bin, "/"),
    "|" => s(Ord, "\u{2223}"),
    r"\mid" => s(Bin, "\u{2223}"),
    r"\parallel" => s(Rel, "\u{2225}"),
    r"\backslash" => s(Bin, "\u{2216}"),
    r"\setminus" => s(Bin, "\u{2216}"),
    // Greek
    r"\alpha" => s(Ord, "\u{03B1}"),
    r"\beta" => s(Ord, "\u{03B2}"),
    r"\chi" => s(Ord, "\u{03C7}"),
    r"\delta" => s(Ord, "\u{03B4}"),
    r"\Delta" => s(Op, "\u{0394}"),
    r"\epsilon" => s(Ord, "\u{03B5}"),
    r"\varepsilon" => s(Ord, "\u{025B}"),
    r"\eta" => s(Ord, "\u{03B7}"),
    r"\gamma" => s(Ord, "\u{03B3}"),
    r"\Gamma" => s(Op, "\u{0393}"),
    r"\iota" => s(Ord, "\u{03B9}"),
    r"\kappa" => s(Ord, "\u{03BA}"),
    r"\lambda" => s(Ord, "\u{03BB}"),
    r"\Lambda" => s(Op, "\u{039B}"),
    r"\mu" => s(Ord, "\u{03BC}"),
    r"\nu" => s(Ord, "\u{03BD}"),
    r"\omega" => s(Ord, "\u{03C9}"),
    r"\Omega" => s(Op, "\u{03A9}"),
    r"\phi" => s(Ord, "\u{03C6}"),
    r"\varphi" => s(Ord, "\u{03D5}"),
    r"\Phi" => s(Op, "\u{03A6}"),
    r"\pi" => s(Ord, "\u{03C0}"),
    r"\Pi" => s(Op, "\u{03A0}"),
    r"\psi" => s(Ord, "\u{03C8}"),
    r"\Psi" => s(Ord, "\u{03A8}"),
    r"\rho" => s(Ord, "\u{03C1}"),
    r"\sigma" => s(Ord, "\u{03C3}"),
    r"\Sigma" => s(Op, "\u{03A3}"),
    r"\tau" => s(Ord, "\u{03C4}"),
    r"\theta" => s(Ord, "\u{03B8}"),
    r"\vartheta" => s(Ord, "\u{03D1}"),
    r"\Theta" => s(Op, "\u{0398}"),
    r"\upsilon" => s(Ord, "\u{03C5}"),
    r"\xi" => s(Ord, "\u{03BE}"),
    r"\Xi" => s(Op, "\u{039E}"),
    r"\zeta" => s(Ord, "\u{03B6}"),
    // Vulgar fractions
    r"\frac12" => s(Ord, "\u{00BD}"),
    r"\frac14" => s(Ord, "\u{00BC}"),
    r"\frac34" => s(Ord, "\u{00BE}"),
    r"\frac13" => s(Ord, "\u{2153}"),
    r"\frac23" => s(Ord, "\u{2154}"),
    r"\frac15" => s(Ord, "\u{2155}"),
    r"\frac25" => s(Ord, "\u{2156}"),
    r"\frac35" => s(Ord, "\u{2157}"),
    r"\frac45" => s(Ord, "\u{2158}"),
    r"\frac16" => s(Ord, "\u{2159}"),
    r"\frac56" => s(Ord, "\u{215A}"),
    r"\frac18" => s(Ord, "\u{215B}"),
    r"\frac38" => s(Ord, "\u{215C}"),
    r"\frac58" => s(Ord, "\u{215D}"),
    r"\frac78" => s(Ord, "\u{215E}"),
    // Binary operators
    r"\pm" => s(Bin, "\u{00B1}"),
    r"\mp" => s(Bin, "\u{2213}"),
    r"\triangleleft" => s(Bin, "\u{22B2}"),
    r"\triangleright" => s(Bin, "\u{22B3}"),
    r"\cdot" => s(Bin, "\u{22C5}"),
    r"\star" => s(Bin, "\u{22C6}"),
    r"\ast" => s(Bin, "\u{002A}"),
    r"\times" => s(Bin, "\u{00D7}"),
    r"\div" => s(Bin, "\u{00F7}"),
    r"\circ" => s(Bin, "\u{2218}"),
    r"\bullet" => s(Bin, "\u{2022}"),
    r"\oplus" => s(Bin, "\u{2295}"),
    r"\ominus" => s(Bin, "\u{2296}"),
    r"\otimes" => s(Bin, "\u{2297}"),
    r"\bigcirc" => s(Bin, "\u{25CB}"),
    r"\oslash" => s(Bin, "\u{2298}"),
    r"\odot" => s(Bin, "\u{2299}"),
    r"\land" => s(Bin, "\u{2227}"),
    r"\wedge" => s(Bin, "\u{2227}"),
    r"\lor" => s(Bin, "\u{2228}"),
    r"\vee" => s(Bin, "\u{2228}"),
    r"\cap" => s(Bin, "\u{2229}"),
    r"\cup" => s(Bin, "\u{222A}"),
    r"\sqcap" => s(Bin, "\u{2293}"),
    r"\sqcup" => s(Bin, "\u{2294}"),
    r"\uplus" => s(Bin, "\u{228E}"),
    r"\amalg" => s(Bin, "\u{2210}"),
    r"\bigtriangleup" => s(Bin, "\u{25B3}"),
    r"\bigtriangledown" => s(Bin, "\u{25BD}"),
    r"\dag" => s(Bin, "\u{2020}"),
    r"\dagger" => s(Bin, "\u{2020}"),
    r"\ddag" => s(Bin, "\u{2021}"),
    r"\ddagger" => s(Bin, "\u{2021}"),
    r"\lhd" => s(Bin, "\u{22B2}"),
    r"\rhd" => s(Bin, "\u{22B3}"),
    r"\unlhd" => s(Bin, "\u{22B4}"),
    r"\unrhd" => s(Bin, "\u{22B5}"),
    // Relations
    r"\lt" => s(Rel, "<"),
    r"\gt" => s(Rel, ">"),
    r"\ne" => s(Rel, "\u{2260}"),
    r"\neq" => s(Rel, "\u{2260}"),
    r"\le" => s(Rel, "\u{2264}"),
    r"\leq" => s(Rel, "\u{2264}"),
    r"\leqslant" => s(Rel, "\u{2264}"),
    r"\ge" => s(Rel, "\u{2265}"),
    r"\geq" => s(Rel, "\u{2265}"),
    r"\geqslant" => s(Rel, "\u{2265}"),
    r"\equiv" => s(Rel, "\u{2261}"),
    r"\ll" => s(Rel, "\u{226A}"),
    r"\gg" => s(Rel, "\u{226B}"),
    r"\doteq" => s(Rel, "\u{2250}"),
    r"\prec" => s(Rel, "\u{227A}"),
    r"\succ" => s(Rel, "\u{227B}"),
    r"\preceq" => s(Rel, "\u{227C}"),
    r"\succeq" => s(Rel, "\u{227D}"),
    r"\subset" => s(Rel, "\u{2282}"),
    r"\supset" => s(Rel, "\u{2283}"),
    r"\subseteq" => s(Rel, "\u{2286}"),
    r"\supseteq" => s(Rel, "\u{2287}"),
    r"\sqsubset" => s(Rel, "\u{228F}"),
    r"\sqsupset" => s(Rel, "\u{2290}"),
    r"\sqsubseteq" => s(Rel, "\u{2291}"),
    r"\sqsupseteq" => s(Rel, "\u{2292}"),
    r"\sim" => s(Rel, "\u{223C}"),
    r"\simeq" => s(Rel, "\u{2243}"),
    r"\approx" => s(Rel, "\u{2248}"),
    r"\cong" => s(Rel, "\u{2245}"),
    r"\Join" => s(Rel, "\u{22C8}"),
    r"\bowtie" => s(Rel, "\u{22C8}"),
    r"\in" => s(Rel, "\u{2208}"),
    r"\ni" => s(Rel, "\u{220B}"),
    r"\owns" => s(Rel, "\u{220B}"),
    r"\propto" => s(Rel, "\u{221D}"),
    r"\vdash" => s(Rel, "\u{22A2}"),
    r"\dashv" => s(Rel, "\u{22A3}"),
    r"\models" => s(Rel, "\u{22A8}"),
    r"\perp" => s(Rel, "\u{22A5}"),
    r"\smile" => s(Rel, "\u{2323}"),
    r"\frown" => s(Rel, "\u{2322}"),
    r"\asymp" => s(Rel, "\u{224D}"),
    r"\notin" => s(Rel, "\u{2209}"),
    // Arrows
    r"\gets" => s(Rel, "\u{2190}"),
    r"\leftarrow" => s(Rel, "\u{2190}"),
    r"\to" => s(Rel, "\u{2192}"),
    r"\rightarrow" => s(Rel, "\u{2192}"),
    r"\leftrightarrow" => s(Rel, "\u{2194}"),
    r"\uparrow" => s(Rel, "\u{2191}"),
    r"\downarrow" => s(Rel, "\u{2193}"),
    r"\updownarrow" => s(Rel, "\u{2195}"),
    r"\Leftarrow" => s(Rel, "\u{21D0}"),
    r"\Rightarrow" => s(Rel, "\u{21D2}"),
    r"\Leftrightarrow" => s(Rel, "\u{21D4}"),
    r"\iff" => s(Rel, "\u{21D4}"),
    r"\Uparrow" => s(Rel, "\u{21D1}"),
    r"\Downarrow" => s(Rel, "\u{21D3}"),
    r"\Updownarrow" => s(Rel, "\u{21D5}"),
    r"\mapsto" => s(Rel, "\u{21A6}"),
    r"\longleftarrow" => s(Rel, "\u{2190}"),
    r"\longrightarrow" => s(Rel, "\u{2192}"),
    r"\longleftrightarrow" => s(Rel, "\u{2194}"),
    r"\Longleftarrow" => s(Rel, "\u{21D0}"),
    r"\Longrightarrow" => s(Rel, "\u{21D2}"),
    r"\Longleftrightarrow" => s(Rel, "\u{21D4}"),
    r"\longmapsto" => s(Rel, "\u{21A6}"),
    // Big operators
    r"\sum" => s(Op, "\u{2211}"),
    r"\prod" => s(Op, "\u{220F}"),
    r"\bigcap" => s(Op, "\u{22C2}"),
    r"\bigcup" => s(Op, "\u{22C3}"),
    r"\bigwedge" => s(Op, "\u{22C0}"),
    r"\bigvee" => s(Op, "\u{22C1}"),
    r"\bigsqcap" => s(Op, "\u{2A05}"),
    r"\bigsqcup" => s(Op, "\u{2A06}"),
    r"\coprod" => s(Op, "\u{2210}"),
    r"\bigoplus" => s(Op, "\u{2A01}"),
    r"\bigotimes" => s(Op, "\u{2A02}"),
    r"\bigodot" => s(Op, "\u{2A00}"),
    r"\biguplus" => s(Op, "\u{2A04}"),
    r"\int" => s(Op, "\u{222B}"),
    r"\iint" => s(Op, "\u{222C}"),
    r"\iiint" => s(Op, "\u{222D}"),
    r"\oint" => s(Op, "\u{222E}"),
    // Miscellaneous
    r"\prime" => s(Ord, "\u{2032}"),
    r"\dots" => s(Ord, "\u{2026}"),
    r"\ldots" => s(Ord, "\u{2026}"),
    r"\cdots" => s(Ord, "\u{22EF}"),
    r"\vdots" => s(Ord, "\u{22EE}"),
    r"\ddots" => s(Ord, "\u{22F1}"),
    r"\forall" => s(Op, "\u{2200}"),
    r"\exists" => s(Op, "\u{2203}"),
    r"\Re" => s(Ord, "\u{211C}"),
    r"\Im" => s(Ord, "\u{2111}"),
    r"\aleph" => s(Ord, "\u{2135}"),
    r"\hbar" => s(Ord, "\u{210F}"),
    r"\ell" => s(Ord, "\u{2113}"),
    r"\wp" => s(Ord, "\u{2118}"),
    r"\emptyset" => s(Ord, "\u{2205}"),
    r"\infty" => s(Ord, "\u{221E}"),
    r"\partial" => s(Ord, "\u{2202}"),
    r"\nabla" => s(Ord, "\u{2207}"),
    r"\triangle" => s(Ord, "\u{25B3}"),
    r"\therefore" => s(Punct, "\u{2234}"),
    r"\angle" => s(Ord, "\u{2220}"),
    r"\diamond" => s(Op, "\u{22C4}"),
    r"\Diamond" => s(Op, "\u{25C7}"),
    r"\neg" => s(Op, "\u{00AC}"),
    r"\lnot" => s(Ord, "\u{00AC}"),
    r"\bot" => s(Ord, "\u{22A5}"),
    r"\top" => s(Ord, "\u{22A4}"),
    r"\square" => s(Ord, "\u{25AB}"),
    r"\Box" => s(Op, "\u{25A1}"),
    r"\wr" => s(Ord, "\u{2240}"),
    // Spacing
    r"\!" => space("-0.167em"),
    r"\," => space("0.167em"),
    r"\>" => space("0.222em"),
    r"\:" => space("0.222em"),
    r"\;" => space("0.278em"),
    "~" => space("0.333em"),
    r"\quad" => space("1em"),
    r"\qquad" => space("2em"),
    // Operator names
    r"\arccos" => op("arccos"),
    r"\arcsin" => op("arcsin"),
    r"\arctan" => op("arctan"),
    r"\arg" => op("arg"),
    r"\cos" => op("cos"),
    r"\cosh" => op("cosh"),
    r"\cot" => op("cot"),
    r"\coth" => op("coth"),
    r"\csc" => op("csc"),
    r"\deg" => op("deg"),
    r"\det" => op("det"),
    r"\dim" => op("dim"),
    r"\exp" => op("exp"),
    r"\gcd" => op("gcd"),
    r"\hom" => op("hom"),
    r"\inf" => op("inf"),
    r"\ker" => op("ker"),
    r"\lg" => op("lg"),
    r"\lim" => op("lim"),
    r"\liminf" => op("liminf"),
    r"\limsup" => op("limsup"),
    r"\ln" => op("ln"),
    r"\log" => op("log"),
    r"\max" => op("max"),
    r"\min" => op("min"),
    r"\Pr" => op("Pr"),
    r"\sec" => op("sec"),
    r"\sin" => op("sin"),
    r"\sinh" => op("sinh"),
    r"\sup" => op("sup"),
    r"\tan" => op("tan"),
    r"\tanh" => op("tanh"),
};
