//! CLI tool for extracting plain text from DOCX files.

use anyhow::{Context, Result};
use clap::Parser;
use doctext_core::PlainTextFormatter;
use doctext_docx::DocxParser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Print the paragraph text of a Word document, one paragraph per line.
#[derive(Parser, Debug)]
#[command(name = "doctext")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input Word document (.docx)
    input: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let formatter = PlainTextFormatter::new();

    // Errors go to stdout, same channel as the text
    match process_file(&args.input, &formatter) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("{}", error_line(&e));
            ExitCode::FAILURE
        }
    }
}

/// Extract a single document and format it for output.
fn process_file(input_path: &Path, formatter: &PlainTextFormatter) -> Result<String> {
    log::debug!("Processing: {}", input_path.display());

    let parser = DocxParser::new();
    let document = parser
        .open(input_path)
        .with_context(|| format!("Failed to extract {}", input_path.display()))?;

    if document.is_empty() {
        log::warn!("No paragraphs found in {}", input_path.display());
    } else {
        log::debug!("Extracted {} paragraphs", document.len());
    }

    Ok(formatter.format_with_newline(&document.paragraphs))
}

/// Render an error with its full cause chain.
fn error_line(err: &anyhow::Error) -> String {
    format!("Error: {:#}", err)
}
