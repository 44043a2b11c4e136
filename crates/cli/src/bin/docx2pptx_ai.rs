//! AI-assisted DOCX to PPTX conversion using a slide template.

use anyhow::{Context, Result};
use clap::Parser;
use doc2deck_ai::{AiSlideGenerator, AzureChatClient, AzureOpenAiConfig, PromptTemplate};
use doc2deck_cli::{init_logging, log_outline, resolve_template};
use doc2deck_core::{extract_sections, BasicSlideGenerator};
use doc2deck_docx::DocxReader;
use doc2deck_pptx::build_presentation;
use log::{debug, info};
use std::path::{Path, PathBuf};

const DEFAULT_TEMPLATE: &str = "speaker-template.pptx";

/// AI-driven Word to PowerPoint conversion using a template.
#[derive(Parser, Debug)]
#[command(name = "docx2pptx-ai")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Word file to convert
    #[arg(short, long, default_value = "develop-ai-agent-with-semantic-kernel.docx")]
    docx: PathBuf,

    /// PPTX template to use (default: speaker-template.pptx if present)
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Output PPTX file
    #[arg(short, long, default_value = "output_presentation.pptx")]
    output: PathBuf,

    /// Prompt file for slide generation
    #[arg(long, default_value = "slide_generator.prompty")]
    prompty: PathBuf,

    /// Skip the AI call and generate slides deterministically
    #[arg(long)]
    offline: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => return Err(e).context("Failed to load .env file"),
    }

    // Credentials are checked before any document work.
    let config = if args.offline {
        None
    } else {
        Some(AzureOpenAiConfig::from_env().context("Azure OpenAI is not configured (use --offline to skip the AI step)")?)
    };

    let paragraphs = DocxReader::new()
        .open(&args.docx)
        .with_context(|| format!("Failed to read {}", args.docx.display()))?;
    let sections = extract_sections(&paragraphs);

    let specs = match config {
        Some(config) => {
            let prompt = PromptTemplate::load(&args.prompty)
                .with_context(|| format!("Failed to read prompt file {}", args.prompty.display()))?;
            AiSlideGenerator::new(AzureChatClient::new(config)?)
                .with_prompt(prompt)
                .generate(&sections)
        }
        None => {
            info!("Offline mode, generating slides deterministically");
            BasicSlideGenerator::new().generate(&sections)
        }
    };

    let template = resolve_template(args.template, Path::new(DEFAULT_TEMPLATE));
    build_presentation(template.as_deref(), &specs, &args.output)
        .with_context(|| format!("Failed to build {}", args.output.display()))?;

    log_outline(&args.output);
    println!("Saved AI-enhanced presentation: {}", args.output.display());
    Ok(())
}
