use clap::{Parser, Subcommand};
use std::path::Path;
use std::sync::Once;
use tdop_lexer::{RawToken, Scanner};
use tdop_parser::ParseError;
use tracing::debug;

#[derive(Parser)]
#[command(name = "tdop")]
#[command(about = "tdop: top-down operator precedence parser")]
#[command(version)]
struct Cli {
    /// Log parser internals (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the raw token stream of a file
    Tokens {
        /// Input source file
        path: String,
    },

    /// Parse a file and print one S-expression per statement
    Parse {
        /// Input source file
        path: String,
    },

    /// Check a file for parse errors without printing the tree
    Check {
        /// Input source file
        path: String,
    },
}

static TRACING_INIT: Once = Once::new();

/// Install the log subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let default = if verbose { "debug" } else { "warn" };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter)
            .init();
    });
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Tokens { path } => cmd_tokens(&path),
        Command::Parse { path } => cmd_parse(&path),
        Command::Check { path } => cmd_check(&path),
    }
}

fn read_source(path: &str) -> String {
    let p = Path::new(path);
    if !p.exists() {
        eprintln!("Error: file not found: {path}");
        std::process::exit(1);
    }
    match std::fs::read_to_string(p) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading {path}: {e}");
            std::process::exit(1);
        }
    }
}

fn format_token(token: &RawToken) -> String {
    format!(
        "{}:{}\t{}\t{:?}",
        token.line, token.char_pos, token.kind, token.value
    )
}

/// One-line diagnostic for a failed parse. Lexer and configuration errors
/// already name their category.
fn format_error(path: &str, err: &ParseError) -> String {
    match err {
        ParseError::Lexer(_) | ParseError::Configuration(_) => format!("{path}: {err}"),
        _ => format!("{path}: Parse error: {err}"),
    }
}

fn cmd_tokens(path: &str) {
    let source = read_source(path);

    let tokens = match Scanner::tokenize(&source) {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    for token in &tokens {
        println!("{}", format_token(token));
    }
}

fn cmd_parse(path: &str) {
    let source = read_source(path);

    let program = match tdop_script::parse(&source) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("{}", format_error(path, &e));
            std::process::exit(1);
        }
    };

    debug!(statements = program.len(), "parsed {path}");
    for statement in &program {
        println!("{statement}");
    }
}

fn cmd_check(path: &str) {
    let source = read_source(path);

    if let Err(e) = tdop_script::parse(&source) {
        eprintln!("{}", format_error(path, &e));
        std::process::exit(1);
    }

    eprintln!("OK: {path}");
}
