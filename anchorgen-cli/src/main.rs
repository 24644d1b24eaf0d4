//! # anchorgen
//!
//! Command-line tool for generating typed Go clients from on-chain program
//! IDLs.
//!
//! ## Usage
//!
//! ```bash
//! anchorgen generate --src idl.json --dst generated --tests
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::process;

mod commands;

#[derive(Parser)]
#[command(name = "anchorgen")]
#[command(about = "Generate a typed Go client from an on-chain program IDL", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a Go client package from an IDL file
    Generate {
        /// Path to the IDL JSON file
        #[arg(long)]
        src: String,

        /// Destination folder; output lands in <dst>/<program_name>/
        #[arg(long, default_value = "generated")]
        dst: String,

        /// Emit a _test.go fuzz round-trip file per instruction
        #[arg(long)]
        tests: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate { src, dst, tests } => commands::generate::run(&src, &dst, tests),
    }
}
