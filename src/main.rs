use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser as CliParser, Subcommand};
use letlang::{Parser, interpret, tokenise};
use tracing_subscriber::EnvFilter;

/// Run LetLang programs.
#[derive(CliParser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// How deeply expressions may nest before parsing is refused.
    #[arg(long, global = true, default_value_t = letlang::parser::DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the tokens of a program, one per line.
    Tokenise { filename: PathBuf },
    /// Print the syntax tree of a program.
    Parse { filename: PathBuf },
    /// Print the syntax tree of a program and the value it evaluates to.
    Run { filename: PathBuf },
}

fn read_program(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read program at {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match &args.command {
        Command::Tokenise { filename } => {
            let program_string = read_program(filename)?;
            let tokens = tokenise(&program_string)
                .with_context(|| format!("Failed to tokenise {}", filename.display()))?;

            for (idx, token) in tokens.iter().enumerate() {
                println!("{idx}.\t{token}");
            }
        }
        Command::Parse { filename } | Command::Run { filename } => {
            let program_string = read_program(filename)?;
            let tokens = tokenise(&program_string)
                .with_context(|| format!("Failed to tokenise {}", filename.display()))?;

            let expression = Parser::new(&tokens)
                .with_max_depth(args.max_depth)
                .parse_program()
                .with_context(|| format!("Failed to parse {}", filename.display()))?;

            println!("{}", expression.tree());

            if let Command::Run { .. } = args.command {
                let result = interpret(&expression)
                    .with_context(|| format!("Failed to evaluate {}", filename.display()))?;

                println!("RESULT: {result}");
            }
        }
    }

    Ok(())
}
