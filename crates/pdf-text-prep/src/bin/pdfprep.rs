use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pdf_text_prep::{
    AnalyzeOptions, AnalyzedDocument, DEFAULT_BOILERPLATE_PERCENT, DEFAULT_MIN_TEXT_CHARS,
    DocumentAnalyzer, RawDocument,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "pdfprep",
    version,
    about = "Extract PDF text and strip repeated headers and footers"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract cleaned text and metadata from a PDF.
    Analyze(AnalyzeArgs),
    /// Print the content-sniffed MIME type of a file.
    Detect(DetectArgs),
}

#[derive(Debug, Args)]
struct AnalyzeArgs {
    /// Input PDF path.
    #[arg(short, long)]
    input: PathBuf,

    /// Minimum characters of text before a PDF is treated as a scan.
    #[arg(long, default_value_t = DEFAULT_MIN_TEXT_CHARS)]
    min_chars: usize,

    /// Percent of pages a line must appear on to be stripped.
    #[arg(long, default_value_t = DEFAULT_BOILERPLATE_PERCENT)]
    boilerplate_percent: u8,

    /// Print `{ metadata, text }` as JSON instead of plain text.
    #[arg(long)]
    json: bool,

    /// Print metadata to stderr before the text.
    #[arg(long, conflicts_with = "json")]
    show_metadata: bool,
}

#[derive(Debug, Args)]
struct DetectArgs {
    /// File to inspect.
    #[arg(short, long)]
    input: PathBuf,
}

fn read_input(path: &Path) -> Result<RawDocument> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    let mut document = RawDocument::new(bytes);
    if let Some(name) = path.file_name() {
        document = document.with_file_name(name.to_string_lossy());
    }
    Ok(document)
}

fn print_document(document: &AnalyzedDocument, args: &AnalyzeArgs) -> Result<()> {
    if args.json {
        let json = serde_json::to_string_pretty(document).context("failed to encode result")?;
        println!("{json}");
        return Ok(());
    }

    if args.show_metadata {
        let json = serde_json::to_string_pretty(&document.metadata)
            .context("failed to encode metadata")?;
        eprintln!("{json}");
    }
    println!("{}", document.text);
    Ok(())
}

fn run_analyze(args: &AnalyzeArgs) -> Result<AnalyzedDocument> {
    let input = read_input(&args.input)?;
    let analyzer = DocumentAnalyzer::new(AnalyzeOptions {
        min_text_chars: args.min_chars,
        boilerplate_percent: args.boilerplate_percent,
    });

    let (document, removed) = analyzer
        .analyze_with_removed(input.bytes())
        .with_context(|| format!("failed to analyze '{}'", args.input.display()))?;

    tracing::info!(
        pages = document.metadata.page_count,
        removed = removed.len(),
        "analysis completed"
    );
    for line in &removed {
        tracing::debug!(line = %line, "stripped boilerplate line");
    }
    if document.is_blank() {
        tracing::warn!("no text left after boilerplate removal");
    }

    print_document(&document, args)?;
    Ok(document)
}

fn run_detect(args: &DetectArgs) -> Result<()> {
    let input = read_input(&args.input)?;
    println!("{}", input.detected_type().label());
    Ok(())
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pdf_text_prep=warn,pdfprep=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze(args) => match run_analyze(&args) {
            Ok(document) if document.is_blank() => ExitCode::from(2),
            Ok(_) => ExitCode::SUCCESS,
            Err(error) => {
                eprintln!("error: {error:#}");
                ExitCode::from(1)
            }
        },
        Commands::Detect(args) => match run_detect(&args) {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => {
                eprintln!("error: {error:#}");
                ExitCode::from(1)
            }
        },
    }
}
