// twig: parse a program and browse its syntax tree

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser as ClapParser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{info, LevelFilter};
use ratatui::{backend::CrosstermBackend, Terminal};

use twig::dump::{render_dot, render_text};
use twig::logger;
use twig::parser::{self, lexer};
use twig::ui::App;

/// Parse a program and inspect its syntax tree
#[derive(ClapParser, Debug)]
#[command(name = "twig", version, about)]
struct Cli {
    /// Source file to parse
    #[arg(value_name = "FILE", required_unless_present = "source")]
    file: Option<PathBuf>,

    /// Parse TEXT instead of reading a file
    #[arg(short = 'e', long = "source", value_name = "TEXT", conflicts_with = "file")]
    source: Option<String>,

    /// Print the token stream and exit
    #[arg(long)]
    tokens: bool,

    /// Print the indented syntax tree and exit
    #[arg(long)]
    dump: bool,

    /// Write the syntax tree as Graphviz DOT to PATH ("-" for stdout)
    #[arg(long, value_name = "PATH")]
    dot: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = logger::level_for_verbosity(cli.verbose);
    logger::init(level)?;

    let source = match (&cli.source, &cli.file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => match fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                eprintln!("Error: cannot read '{}': {}", path.display(), e);
                process::exit(1);
            }
        },
        (None, None) => {
            eprintln!("Error: no input, pass FILE or --source");
            process::exit(1);
        }
    };

    if cli.tokens {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for token in lexer::tokenize(&source) {
            writeln!(out, "{:>4}  {}", token.line, token)?;
        }
        return Ok(());
    }

    let ast = match parser::parse(&source) {
        Ok(ast) => ast,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    info!("syntax tree has {} nodes", ast.len());

    if cli.dump || cli.dot.is_some() {
        if cli.dump {
            print!("{}", render_text(&ast));
        }
        if let Some(path) = &cli.dot {
            let dot = render_dot(&ast);
            if path.as_os_str() == "-" {
                print!("{}", dot);
            } else {
                fs::write(path, dot)?;
                info!("wrote {}", path.display());
            }
        }
        return Ok(());
    }

    // Log lines would draw over the alternate screen
    log::set_max_level(level.min(LevelFilter::Warn));

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(ast, source);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
