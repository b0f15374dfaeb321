use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use monkey_interpreter as monkey;

use monkey::error::MonkeyError;
use monkey::interpreter::Interpreter;
use monkey::parser::Parser;
use monkey::scanner::Scanner;
use monkey::token::Token;
use monkey::value::Value;

#[derive(ClapParser, Debug)]
#[command(version, about = "Monkey language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file (or stdin), printing each token
    Tokenize {
        filename: Option<PathBuf>,

        /// Print the tokens as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Parses input from a file (or stdin) and prints its canonical form
    Parse {
        filename: Option<PathBuf>,

        /// Print the syntax tree as JSON
        #[arg(long)]
        json: bool,
    },

    /// Runs input from a file (or stdin) as a Monkey program
    Run { filename: Option<PathBuf> },

    /// Starts an interactive session
    Repl,
}

/// Reads a program from `filename`, or from stdin when none is given.
fn read_source(filename: Option<PathBuf>) -> Result<String> {
    let mut buf = Vec::new();

    match filename {
        Some(filename) => {
            info!("Reading file: {:?}", filename);
            let file =
                File::open(&filename).context(format!("Failed to open file {:?}", filename))?;
            BufReader::new(file)
                .read_to_end(&mut buf)
                .context(format!("Failed to read file {:?}", filename))?;
        }
        None => {
            info!("Reading program from stdin");
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read stdin")?;
        }
    }

    info!("Read {} bytes", buf.len());

    let source = String::from_utf8(buf).map_err(MonkeyError::from)?;

    Ok(source)
}

fn init_logger() -> Result<()> {
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    Builder::new()
        .format(|buf, record| {
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("monkey_interpreter::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{} {}:{}] - {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

/// Parse `source`, turning any syntax error into a [`MonkeyError::Parse`].
fn parse_program(source: &str) -> std::result::Result<monkey::stmt::Program, MonkeyError> {
    let mut parser = Parser::new(Scanner::new(source.as_bytes()));
    let program = parser.parse_program();

    if parser.errors().is_empty() {
        Ok(program)
    } else {
        Err(parser.into_errors().into())
    }
}

fn tokenize(filename: Option<PathBuf>, json: bool) -> Result<()> {
    info!("Running Tokenize subcommand");

    let source = read_source(filename)?;
    let tokens: Vec<Token> = Scanner::new(source.as_bytes()).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
    } else {
        for token in &tokens {
            println!("{}", token);
        }
    }

    Ok(())
}

fn parse(filename: Option<PathBuf>, json: bool) -> Result<()> {
    info!("Running Parse subcommand");

    let source = read_source(filename)?;

    match parse_program(&source) {
        Ok(program) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&program)?);
            } else {
                println!("{}", program);
            }
        }
        Err(e) => {
            debug!("Parse debug: {}", e);
            eprintln!("{}", e);
            std::process::exit(65);
        }
    }

    Ok(())
}

fn run(filename: Option<PathBuf>) -> Result<()> {
    info!("Running Run subcommand");

    let source = read_source(filename)?;

    let program = match parse_program(&source) {
        Ok(program) => program,
        Err(e) => {
            debug!("Parse debug: {}", e);
            eprintln!("{}", e);
            std::process::exit(65);
        }
    };

    info!("Parsed {} statements", program.statements.len());

    let mut interpreter = Interpreter::new();

    match interpreter.interpret(&program) {
        Value::Error(message) => {
            let e = MonkeyError::Runtime(message);
            debug!("Runtime debug: {}", e);
            eprintln!("{}", e);
            std::process::exit(70);
        }
        Value::Null => {}
        value => println!("{}", value),
    }

    Ok(())
}

fn repl() -> Result<()> {
    info!("Running Repl subcommand");

    let mut editor =
        DefaultEditor::new().map_err(|e| anyhow!("Failed to start line editor: {}", e))?;
    let mut interpreter = Interpreter::new();

    loop {
        match editor.readline(">> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }

                if let Err(e) = editor.add_history_entry(line.as_str()) {
                    debug!("Failed to record history entry: {}", e);
                }

                match parse_program(&line) {
                    Ok(program) => println!("{}", interpreter.interpret(&program)),
                    Err(e) => eprintln!("{}", e),
                }
            }

            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                info!("Leaving repl");
                break;
            }

            Err(e) => return Err(anyhow!("Failed to read line: {}", e)),
        }
    }

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

    match args.commands {
        Commands::Tokenize { filename, json } => tokenize(filename, json),
        Commands::Parse { filename, json } => parse(filename, json),
        Commands::Run { filename } => run(filename),
        Commands::Repl => repl(),
    }
}
