use std::fs::{self, File};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use lox_interpreter as lox;

use lox::ast_printer::AstPrinter;
use lox::diagnostic::Diagnostics;
use lox::lox::Lox;
use lox::parser::Parser;
use lox::scanner::Scanner;

/// Exit status for a lex or parse error.
const EXIT_STATIC_ERROR: i32 = 65;

/// Exit status for an uncaught runtime error.
const EXIT_RUNTIME_ERROR: i32 = 70;

#[derive(ClapParser, Debug)]
#[command(name = "lox", version, about = "Lox language interpreter", long_about = None)]
pub struct Cli {
    /// Defaults to the interactive prompt
    #[command(subcommand)]
    commands: Option<Commands>,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Print the tokens as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Parses input from a file and prints each statement's syntax tree
    Parse {
        filename: PathBuf,

        /// Print the statements as JSON
        #[arg(long)]
        json: bool,
    },

    /// Evaluates input from a file as a single expression and prints the result
    Evaluate { filename: PathBuf },

    /// Runs input from a file as a Lox program
    Run { filename: PathBuf },

    /// Starts an interactive prompt, one line at a time
    Repl,
}

/// Reads the contents of a file as UTF‑8 text
fn read_file(filename: &Path) -> Result<String> {
    info!("Reading file: {:?}", filename);

    let buf: Vec<u8> = fs::read(filename).context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", buf.len(), filename);

    String::from_utf8(buf).context(format!("File {:?} is not valid UTF-8", filename))
}

fn init_logger() -> Result<()> {
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    Builder::new()
        .format(|buf, record| {
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("lox_interpreter::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "{} [{}:{}] - {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

/// Writes every diagnostic to stderr.
fn report(diagnostics: &Diagnostics) {
    for error in diagnostics.errors() {
        eprintln!("{}", error);
    }
}

/// Maps a run's diagnostics to the process exit status.
fn exit_on_error(diagnostics: &Diagnostics) {
    if diagnostics.had_error() {
        debug!("Static errors, exiting with code {}", EXIT_STATIC_ERROR);
        std::process::exit(EXIT_STATIC_ERROR);
    }

    if diagnostics.had_runtime_error() {
        debug!("Runtime error, exiting with code {}", EXIT_RUNTIME_ERROR);
        std::process::exit(EXIT_RUNTIME_ERROR);
    }
}

fn tokenize(filename: &Path, json: bool) -> Result<()> {
    let source = read_file(filename)?;
    let mut diagnostics = Diagnostics::new();
    let mut tokens = Vec::new();

    for result in Scanner::new(&source) {
        match result {
            Ok(token) if json => tokens.push(token),
            Ok(token) => println!("{}", token),
            Err(e) => {
                eprintln!("{}", e);
                diagnostics.report(e);
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
    }

    exit_on_error(&diagnostics);
    info!("Tokenization completed successfully");
    Ok(())
}

fn parse(filename: &Path, json: bool) -> Result<()> {
    let source = read_file(filename)?;
    let mut diagnostics = Diagnostics::new();

    let tokens = Scanner::new(&source).scan_tokens(&mut diagnostics);
    let statements = Parser::new(&tokens, &mut diagnostics).parse();

    report(&diagnostics);
    exit_on_error(&diagnostics);

    if json {
        println!("{}", serde_json::to_string_pretty(&statements)?);
    } else {
        for stmt in &statements {
            println!("{}", AstPrinter::print_stmt(stmt));
        }
    }

    info!("Parse subcommand completed");
    Ok(())
}

fn evaluate(filename: &Path) -> Result<()> {
    let source = read_file(filename)?;
    let mut session = Lox::new();

    let (value, diagnostics) = session.evaluate(&source);

    report(&diagnostics);
    exit_on_error(&diagnostics);

    if let Some(value) = value {
        println!("{}", value);
    }

    Ok(())
}

fn run_file(filename: &Path) -> Result<()> {
    let source = read_file(filename)?;
    info!("Provided input:\n {}", source);

    let mut session = Lox::new();
    let diagnostics = session.run(&source);

    report(&diagnostics);
    exit_on_error(&diagnostics);

    info!("Program executed successfully");
    Ok(())
}

/// Each line is its own run against a shared root scope.  Errors are shown
/// and the prompt continues.
fn run_prompt() -> Result<()> {
    info!("Starting interactive prompt");

    let mut session = Lox::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush().context("Failed to flush prompt")?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read from stdin")?;

        let diagnostics = session.run(&line);
        report(&diagnostics);
    }

    println!();
    info!("Interactive prompt closed");
    Ok(())
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    if args.log {
        init_logger()?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match args.commands.unwrap_or(Commands::Repl) {
        Commands::Tokenize { filename, json } => tokenize(&filename, json),
        Commands::Parse { filename, json } => parse(&filename, json),
        Commands::Evaluate { filename } => evaluate(&filename),
        Commands::Run { filename } => run_file(&filename),
        Commands::Repl => run_prompt(),
    }
}
