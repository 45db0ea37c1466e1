use std::{
    fmt::Write,
    io::{IsTerminal, Read},
    path::{Path, PathBuf},
};

use clap::Parser;
use log::debug;

use notation::{FixedAdvance, Notation, NotationError, TextMetrics, dump_tree};

mod config_file;

use config_file::{Config, ConfigError, load_config_file};

/// Lays out LaTeX-like math notation and prints the result
#[derive(Parser, Debug)]
#[command(version, about = "Lays out LaTeX-like math notation", long_about = None)]
struct Args {
    /// The formula to lay out; read from stdin when omitted
    #[arg(value_name = "FORMULA")]
    formula: Option<String>,

    /// Reads pipeline settings from a TOML file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Prints the token stream instead of the display list
    #[arg(long, group = "output")]
    tokens: bool,

    /// Prints the laid-out expression tree instead of the display list
    #[arg(long, group = "output")]
    tree: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    Tokens,
    Tree,
    DisplayList,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let config = match args.config {
        Some(ref path) => load_config_file(path).unwrap_or_else(|e| exit_config_error(e, path)),
        None => Config::default(),
    };
    let output = if args.tokens {
        Output::Tokens
    } else if args.tree {
        Output::Tree
    } else {
        Output::DisplayList
    };
    let source = match args.formula {
        Some(formula) => formula,
        None => read_stdin(),
    };
    let source = source.trim_end_matches(['\n', '\r']);

    let metrics = FixedAdvance {
        font_size: config.notation.layout.font_size,
        advance: config.glyph_advance,
    };
    let notation = Notation::new(config.notation, metrics);
    match run(&notation, source, output) {
        Ok(text) => print!("{text}"),
        Err(e) => exit_notation_error(&e, source),
    }
}

fn run<M: TextMetrics>(
    notation: &Notation<M>,
    source: &str,
    output: Output,
) -> Result<String, NotationError> {
    debug!("running {output:?} on {} bytes", source.len());
    let mut out = String::new();
    match output {
        Output::Tokens => {
            for token in notation.tokenize(source)? {
                let kind = <&str>::from(token.kind);
                let _ = writeln!(out, "{}: {kind} {:?}", token.span, token.text);
            }
        }
        Output::Tree => {
            out = dump_tree(&notation.layout(source)?);
        }
        Output::DisplayList => {
            let hlist = notation.layout(source)?;
            for item in notation.display_list(&hlist) {
                let _ = writeln!(out, "{item}");
            }
        }
    }
    Ok(out)
}

fn read_stdin() -> String {
    let mut buffer = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut buffer) {
        exit_io_error(e);
    }
    buffer
}

fn exit_notation_error(e: &NotationError, source: &str) -> ! {
    let with_color = std::io::stderr().is_terminal();
    let report = e.to_report("<input>", with_color);
    if report
        .eprint(("<input>", ariadne::Source::from(source)))
        .is_err()
    {
        eprintln!("Layout error: {e}");
    }
    std::process::exit(2);
}

fn exit_config_error(e: ConfigError, path: &Path) -> ! {
    match e {
        ConfigError::Io(e) => exit_io_error(e),
        ConfigError::Parse(e) => {
            eprintln!("Invalid configuration in '{}': {e}", path.display());
            std::process::exit(2);
        }
    }
}

fn exit_io_error(e: std::io::Error) -> ! {
    eprintln!("IO Error: {e}");
    std::process::exit(1);
}
