//! Convert a DOCX document into a PPTX deck, one slide per section.

use anyhow::{Context, Result};
use clap::Parser;
use doc2deck_cli::{convert_document, init_logging, log_outline};
use std::path::PathBuf;

/// Convert a Word document into a PowerPoint presentation.
#[derive(Parser, Debug)]
#[command(name = "docx2pptx")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input Word document (.docx)
    input: PathBuf,

    /// Output presentation (default: <input>_presentation.pptx)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// PPTX template whose layouts are used (default: blank presentation)
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let output = convert_document(&args.input, args.output.as_deref(), args.template.as_deref())
        .with_context(|| format!("Failed to convert {}", args.input.display()))?;

    log_outline(&output);
    println!("Presentation saved as: {}", output.display());
    Ok(())
}
