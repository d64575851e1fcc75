use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use rox::ast_printer::AstPrinter;
use rox::error::{Diagnostics, LoxError};
use rox::parser::Parser;
use rox::scanner::{self, Scanner};
use rox::Lox;

#[derive(ClapParser, Debug)]
#[command(version, about = "Lox language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: Option<PathBuf>,

        /// Print one JSON object per token instead of the plain format
        #[arg(long)]
        json: bool,
    },

    /// Parses a Lox program and prints its syntax tree
    Parse { filename: Option<PathBuf> },

    /// Runs input from a file as a Lox program
    Run { filename: Option<PathBuf> },

    /// Starts an interactive prompt
    Repl,
}

/// Reads the contents of a file into a String
fn read_file(filename: PathBuf) -> Result<String> {
    info!("Reading file: {:?}", filename);
    let file = File::open(&filename).context(format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();

    let bytes = reader
        .read_to_end(&mut buf)
        .context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    String::from_utf8(buf)
        .map_err(LoxError::from)
        .context(format!("File {:?} is not valid UTF-8", filename))
}

fn init_logger() -> Result<()> {
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    // `[module:line] - message`, Debug by default, RUST_LOG overrides
    Builder::new()
        .format(|buf, record| {
            let module = record.module_path().unwrap_or("<unnamed>");
            let module = module.strip_prefix("rox::").unwrap_or(module);
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug)
        .parse_default_env()
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

/// Print `error` and terminate with its exit code.
fn fail(error: &LoxError) -> ! {
    debug!("Exiting after error: {:?}", error);
    eprintln!("{}", error);
    std::process::exit(error.exit_code());
}

fn missing_input() -> ! {
    info!("No filepath provided");
    println!("No input filepath was provided. Exiting...");
    std::process::exit(0);
}

fn tokenize(source: &str, json: bool) -> Result<()> {
    let mut tokenized = true;

    for result in Scanner::new(source.as_bytes()) {
        match result {
            Ok(token) if json => println!("{}", serde_json::to_string(&token)?),
            Ok(token) => println!("{}", token),
            Err(e) => {
                tokenized = false;
                eprintln!("{}", e);
            }
        }
    }

    if !tokenized {
        debug!("Tokenization failed, exiting with code 65");
        std::process::exit(65);
    }

    Ok(())
}

fn parse(source: &str) {
    let mut diagnostics = Diagnostics::new();
    let tokens = scanner::scan_all(source.as_bytes(), &mut diagnostics);

    match Parser::new(&tokens).parse() {
        Ok(statements) if diagnostics.is_empty() => {
            let printer = AstPrinter;
            for stmt in &statements {
                println!("{}", printer.print_stmt(stmt));
            }
        }
        Ok(_) => fail(&LoxError::Static(diagnostics)),
        Err(errors) => {
            diagnostics.extend(errors);
            fail(&LoxError::Static(diagnostics));
        }
    }
}

fn repl() -> Result<()> {
    let mut lox = Lox::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            return Ok(());
        }

        // Errors are reported and the session carries on.
        if let Err(e) = lox.run(&line) {
            eprintln!("{}", e);
        }
    }
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

    match args.commands {
        Commands::Tokenize { filename, json } => {
            let filename = filename.unwrap_or_else(|| missing_input());
            tokenize(&read_file(filename)?, json)?;
        }

        Commands::Parse { filename } => {
            let filename = filename.unwrap_or_else(|| missing_input());
            parse(&read_file(filename)?);
        }

        Commands::Run { filename } => {
            let filename = filename.unwrap_or_else(|| missing_input());
            let source = read_file(filename)?;

            let mut lox = Lox::new();
            if let Err(e) = lox.run(&source) {
                fail(&e);
            }
            info!("Program executed successfully");
        }

        Commands::Repl => repl()?,
    }

    Ok(())
}
