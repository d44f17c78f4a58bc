mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{grid, init, normalize, validate, GridArgs, InitArgs, NormalizeArgs, ValidateArgs};
use config::Config;
use tracing_subscriber::EnvFilter;

/// Story map tooling: validate, lay out and tidy story map files
#[derive(Parser, Debug)]
#[command(name = "storymap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default storymap.config.json and an example map
    Init(InitArgs),

    /// Check story map files for structural problems
    Validate(ValidateArgs),

    /// Print the composed grid of a story map
    Grid(GridArgs),

    /// Rewrite backbone_x_version_sort from story_mapping
    Normalize(NormalizeArgs),
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?.display().to_string();
    let config = Config::load(&cwd)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Validate(args) => validate(args, &cwd, &config),
        Command::Grid(args) => grid(args, &cwd, &config),
        Command::Normalize(args) => normalize(args, &cwd, &config),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
