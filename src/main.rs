// minic: run mini C programs, dump their tokens/AST/symbols, or step through them

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, Level};

use minic::analysis;
use minic::interpreter::engine::Interpreter;
use minic::output::WriterSink;
use minic::parser::lexer::Lexer;
use minic::parser::parse_source;
use minic::ui::App;
use minic::{Config, Error};

#[derive(Parser, Debug)]
#[command(
    name = "minic",
    version,
    about = "Interpreter for a mini C language with int/float arithmetic, block scoping and a step-through viewer"
)]
struct Cli {
    /// Source file to run
    file: PathBuf,

    /// Print the token stream before running
    #[arg(long)]
    tokens: bool,

    /// Print the syntax tree before running
    #[arg(long)]
    ast: bool,

    /// Print the symbol table before running
    #[arg(long)]
    symbols: bool,

    /// Check declarations statically; a failing program prints nothing
    #[arg(long)]
    check: bool,

    /// Open the step-through viewer instead of printing output
    #[arg(long)]
    tui: bool,

    /// Snapshot history budget for the viewer, in MiB
    #[arg(long, value_name = "MIB", default_value_t = 256)]
    snapshot_limit: usize,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> Level {
        if self.quiet {
            return Level::ERROR;
        }
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    fn config(&self) -> Config {
        Config::default()
            .with_history(self.tui)
            .with_snapshot_limit(self.snapshot_limit.saturating_mul(1024 * 1024))
            .with_check(self.check)
    }
}

/// Print a diagnostic for `err` and return the failure exit code
fn report(err: &Error) -> ExitCode {
    eprintln!("{}: {}", err.category(), err);
    ExitCode::FAILURE
}

fn print_tokens(source: &str) -> Result<(), Error> {
    println!("{:>4}:{:<4} {:<12} LEXEME", "LINE", "COL", "KIND");
    for token in Lexer::new(source) {
        let token = token.map_err(|e| Error::Parse(e.into()))?;
        let loc = token.location();
        println!("{:>4}:{:<4} {:<12} {}", loc.line, loc.column, token.kind(), token.lexeme());
    }
    Ok(())
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let source = fs::read_to_string(&cli.file)
        .with_context(|| format!("failed to read '{}'", cli.file.display()))?;
    info!(file = %cli.file.display(), bytes = source.len(), "loaded source");

    if cli.tokens {
        if let Err(e) = print_tokens(&source) {
            return Ok(report(&e));
        }
    }

    let program = match parse_source(&source) {
        Ok(program) => program,
        Err(e) => return Ok(report(&e.into())),
    };
    info!(statements = program.statements.len(), "parsed program");

    if cli.ast {
        println!("{:#?}", program);
    }

    let config = cli.config();

    if cli.symbols || config.check {
        match analysis::analyze(&program) {
            Ok(table) if cli.symbols => print!("{}", table),
            Ok(_) => {}
            Err(e) if config.check => return Ok(report(&e.into())),
            // Without --check the run below reports the same problem at runtime
            Err(e) => eprintln!("symbol table incomplete: {}", e),
        }
    }

    let mut interpreter = Interpreter::with_config(program, &config);

    if !cli.tui {
        interpreter.set_output(Box::new(WriterSink::new(io::stdout())));
        return Ok(match interpreter.run() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => report(&e.into()),
        });
    }

    let run_result = interpreter.run();
    if let Err(e) = &run_result {
        info!(error = %e, "entering viewer with partial history");
    }
    if let Err(e) = interpreter.rewind_to_start() {
        eprintln!("warning: failed to rewind to start: {}", e);
    }

    let mut app = App::new(interpreter, source);
    if let Err(e) = &run_result {
        app = app.with_error(format!("{}: {}", e.category(), e));
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let res = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    res?;

    Ok(match run_result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e.into()),
    })
}
