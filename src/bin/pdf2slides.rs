//! CLI binary for pdf2slides.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ExtractionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use pdf2slides::{extract, extract_to_file, inspect, profile, ExtractionConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "pdf2slides",
    version,
    about = "Extract per-slide (title, body) records from a PDF slide deck",
    long_about = "Inspects the document's signals (metadata, page geometry, image density),\n\
                  picks an extraction strategy, and falls back to font-geometry splitting\n\
                  when structured markdown output is too sparse or poorly shaped.\n\n\
                  Writes the records as flat markdown: '# title', body, '---' per slide."
)]
struct Cli {
    /// Path to the input PDF.
    input: PathBuf,

    /// Write slides.md to this path instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit the records as JSON on stdout instead of markdown.
    #[arg(long, conflicts_with = "output")]
    json: bool,

    /// Password for encrypted PDFs.
    #[arg(long, env = "PDF2SLIDES_PASSWORD")]
    password: Option<String>,

    /// Print document metadata and the strategy decision, then exit.
    #[arg(long)]
    inspect: bool,

    /// Quality-score floor for accepting structured markdown (0–1).
    #[arg(long)]
    min_quality_score: Option<f32>,

    /// Verbose logging (-v: info, -vv: debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut builder = ExtractionConfig::builder();
    if let Some(pwd) = &cli.password {
        builder = builder.password(pwd);
    }
    if let Some(score) = cli.min_quality_score {
        builder = builder.min_quality_score(score);
    }
    let config = builder.build().context("invalid configuration")?;

    if cli.inspect {
        return run_inspect(&cli.input, &config).await;
    }

    if let Some(output_path) = &cli.output {
        let stats = extract_to_file(&cli.input, output_path, &config)
            .await
            .with_context(|| format!("extraction failed for {}", cli.input.display()))?;
        eprintln!(
            "✔ {} pages → {} ({} strategy attempt{}, {}ms)",
            stats.page_count,
            output_path.display(),
            stats.strategy_attempts,
            if stats.strategy_attempts == 1 { "" } else { "s" },
            stats.total_duration_ms,
        );
        return Ok(());
    }

    let output = extract(&cli.input, &config)
        .await
        .with_context(|| format!("extraction failed for {}", cli.input.display()))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&output.slides)?);
    } else {
        print!("{}", output.to_slides_markdown());
    }

    eprintln!(
        "✔ {} pages via {} ({:?}{})",
        output.stats.page_count,
        output.decision.strategy,
        output.decision.reason,
        output
            .quality_score
            .map(|s| format!(", score {s:.2}"))
            .unwrap_or_default(),
    );

    Ok(())
}

async fn run_inspect(input: &PathBuf, config: &ExtractionConfig) -> Result<()> {
    let metadata = inspect(input).await?;
    let (doc_profile, decision) = profile(input, config).await?;

    println!("pages:     {}", metadata.page_count);
    println!("version:   {}", metadata.pdf_version);
    println!("title:     {}", metadata.title.as_deref().unwrap_or("—"));
    println!("creator:   {}", metadata.creator.as_deref().unwrap_or("—"));
    println!("producer:  {}", metadata.producer.as_deref().unwrap_or("—"));
    if let Some((w, h)) = doc_profile.page_sizes.first() {
        println!(
            "geometry:  {w}x{h} pt, uniform: {}, landscape: {}",
            doc_profile.uniform_page_size(),
            doc_profile.first_page_landscape,
        );
    }
    println!(
        "images:    {}/{} sampled blocks ({:.0}%)",
        doc_profile.sampled_image_blocks,
        doc_profile.sampled_total_blocks,
        doc_profile.image_block_ratio() * 100.0,
    );
    println!("strategy:  {} ({:?})", decision.strategy, decision.reason);
    Ok(())
}

fn init_logging(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "pdf2slides=info",
        _ => "pdf2slides=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
