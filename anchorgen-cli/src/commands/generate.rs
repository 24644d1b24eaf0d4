use anchorgen_codegen::{naming, sink, GenerateOptions};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

/// Parses the IDL at `src`, runs the generator, and writes the output to
/// `<dst>/<snake_case_program_name>/` — only once every file has been
/// produced without error (§5/§6 "no partial output is committed").
pub fn run(src: &str, dst: &str, emit_tests: bool) -> Result<()> {
    println!("{} Reading IDL from {}...", "→".blue().bold(), src);
    let idl = anchorgen_idl::parse::parse_idl_file(src)
        .with_context(|| format!("failed to load IDL from {src}"))?;

    println!(
        "{} Generating Go client for {}...",
        "→".blue().bold(),
        idl.program_name().bold()
    );
    let options = GenerateOptions { emit_tests };
    let files = anchorgen_codegen::generate(&idl, &options)
        .with_context(|| format!("failed to generate client for {}", idl.program_name()))?;

    let program_dir = naming::to_snake_case(&idl.program_name());
    let dst_path = Path::new(dst);
    sink::write_files(dst_path, &program_dir, &files)
        .with_context(|| format!("failed to write output to {}", dst_path.display()))?;

    println!(
        "{} Generated {} file(s) in {}",
        "✓".green().bold(),
        files.len(),
        dst_path.join(&program_dir).display().to_string().bold()
    );

    Ok(())
}
