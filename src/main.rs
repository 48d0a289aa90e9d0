use anyhow::Result;
use clap::Parser;
use drama_quotes::discovery::DiscoveryConfig;
use drama_quotes::reader::ReaderConfig;
use drama_quotes::{run_batch, BatchConfig, DialogueMode, QuoteWriter};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "drama-quotes")]
#[command(about = "Extracts character dialogue from plain-text drama editions")]
#[command(version)]
struct Args {
    /// Directory holding the drama editions
    #[arg(default_value = "dramas")]
    source_dir: PathBuf,

    /// Quote report file (truncated at start)
    #[arg(long, default_value = "drama_quotes.txt")]
    output: PathBuf,

    /// Prefix quotes with the speaker's identifier or leave them bare
    #[arg(long, value_enum, default_value_t = DialogueMode::Identified)]
    mode: DialogueMode,

    /// File name pattern of documents inside the source directory
    #[arg(long, default_value = "*.txt")]
    pattern: String,

    /// Abort on the first unreadable document
    #[arg(long)]
    fail_fast: bool,

    /// Suppress console progress bar
    #[arg(long)]
    no_progress: bool,

    /// Write run statistics as JSON to this path
    #[arg(long)]
    stats_out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .json()
        .init();

    let args = Args::parse();

    info!("Starting drama-quotes");
    info!(?args, "Parsed CLI arguments");

    if !args.source_dir.exists() {
        anyhow::bail!("Source directory does not exist: {}", args.source_dir.display());
    }

    if !args.source_dir.is_dir() {
        anyhow::bail!("Source path is not a directory: {}", args.source_dir.display());
    }

    let config = BatchConfig {
        mode: args.mode,
        discovery: DiscoveryConfig {
            pattern: args.pattern.clone(),
            fail_fast: args.fail_fast,
        },
        reader: ReaderConfig::default(),
        fail_fast: args.fail_fast,
    };

    let progress = if args.no_progress {
        None
    } else {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} documents ({elapsed})")?
        );
        Some(bar)
    };

    let mut writer = QuoteWriter::create(&args.output).await?;
    let summary = run_batch(&args.source_dir, &config, &mut writer, progress.as_ref()).await?;
    writer.finish().await?;

    if let Some(bar) = &progress {
        bar.finish_and_clear();
    }

    println!("drama-quotes v{} - extraction complete", env!("CARGO_PKG_VERSION"));
    println!("Documents processed: {}", summary.documents_processed);
    if summary.documents_malformed > 0 {
        println!("  Ended in an unexpected state: {}", summary.documents_malformed);
    }
    if summary.documents_failed > 0 {
        println!("  Failed to read: {}", summary.documents_failed);
    }
    println!(
        "Found {} dialogues ({} quotes), written to {}",
        summary.total_dialogues,
        summary.total_quotes,
        args.output.display()
    );

    if let Some(ref stats_path) = args.stats_out {
        summary.write_json(stats_path).await?;
        info!("Run statistics written to {}", stats_path.display());
    }

    Ok(())
}
