//! ML CLI - Lesson content tools.
//!
//! Provides commands for:
//! - `courses`: List the course catalogue
//! - `lessons`: List lessons, optionally of one course
//! - `show`: Resolve a lesson for a locale and print its node tree
//! - `check`: Parse a markup file and report the first error

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, CoursesArgs, LessonsArgs, ShowArgs};
use output::Output;

/// ML - Lesson content tools.
#[derive(Parser)]
#[command(name = "ml", version, about)]
struct Cli {
    /// Enable verbose output (index and cache logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List courses.
    Courses(CoursesArgs),
    /// List lessons.
    Lessons(LessonsArgs),
    /// Print the node tree of a lesson.
    Show(ShowArgs),
    /// Parse a lesson markup file.
    Check(CheckArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Courses(args) => args.execute(),
        Commands::Lessons(args) => args.execute(),
        Commands::Show(args) => args.execute(),
        Commands::Check(args) => args.execute(),
    };

    if let Err(err) = result {
        output.fatal(&err);
        std::process::exit(1);
    }
}
