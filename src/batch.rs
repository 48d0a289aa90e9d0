// WHY: Batch orchestration across a directory of drama editions
// Documents are processed one after another and each is persisted before the next starts

use anyhow::Result;
use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWrite;
use tracing::{info, warn};

use crate::context::{process_document, DocumentReport, DocumentStatus};
use crate::discovery::{collect_documents, DiscoveryConfig};
use crate::drama_states::DialogueMode;
use crate::output::QuoteWriter;
use crate::reader::{AsyncFileReader, ReaderConfig};

/// Configuration for one extraction run
#[derive(Debug, Clone, Default)]
pub struct BatchConfig {
    /// Plain or speaker-identified quotes
    pub mode: DialogueMode,
    pub discovery: DiscoveryConfig,
    pub reader: ReaderConfig,
    /// Abort on the first unreadable document instead of skipping it
    pub fail_fast: bool,
}

/// Totals of one extraction run plus its per-document reports
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct BatchSummary {
    /// Unix timestamp (seconds) when the run started
    pub run_start: u64,
    /// Total wall time in milliseconds
    pub total_processing_time_ms: u64,
    pub mode: DialogueMode,
    pub documents_processed: usize,
    pub documents_malformed: usize,
    pub documents_failed: usize,
    pub total_dialogues: usize,
    pub total_quotes: usize,
    pub document_stats: Vec<DocumentReport>,
}

impl BatchSummary {
    fn record(&mut self, report: DocumentReport) {
        self.documents_processed += 1;
        match report.status {
            DocumentStatus::Complete => {}
            DocumentStatus::Malformed => self.documents_malformed += 1,
            DocumentStatus::Failed => self.documents_failed += 1,
        }
        self.total_dialogues += report.dialogues;
        self.total_quotes += report.quotes;
        self.document_stats.push(report);
    }

    /// Write the summary as pretty JSON
    pub async fn write_json(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}

/// Extract quotes from every document in `source_dir`
///
/// Unreadable documents are reported and skipped unless `fail_fast` is set.
/// Output errors abort the run.
pub async fn run_batch<W: AsyncWrite + Unpin>(
    source_dir: &Path,
    config: &BatchConfig,
    writer: &mut QuoteWriter<W>,
    progress: Option<&ProgressBar>,
) -> Result<BatchSummary> {
    let discovered = collect_documents(source_dir, config.discovery.clone()).await?;
    let documents: Vec<PathBuf> = discovered
        .into_iter()
        .filter_map(|validation| match validation.error {
            None => Some(validation.path),
            Some(error) => {
                warn!("Skipping {}: {}", validation.path.display(), error);
                None
            }
        })
        .collect();

    info!("Processing {} documents from {}", documents.len(), source_dir.display());
    run_documents(&documents, config, writer, progress).await
}

/// Extract quotes from an explicit list of documents, in order
pub async fn run_documents<W: AsyncWrite + Unpin>(
    documents: &[PathBuf],
    config: &BatchConfig,
    writer: &mut QuoteWriter<W>,
    progress: Option<&ProgressBar>,
) -> Result<BatchSummary> {
    let start_time = std::time::Instant::now();
    if let Some(progress) = progress {
        progress.set_length(documents.len() as u64);
    }

    let reader = AsyncFileReader::new(config.reader.clone());
    let mut summary = BatchSummary {
        run_start: std::time::SystemTime::now()
            .duration_since(std::time::SystemTime::UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default(),
        mode: config.mode,
        ..Default::default()
    };

    for path in documents {
        let (report, dialogues) = process_document(path, config.mode, &reader).await;

        if report.status == DocumentStatus::Failed && config.fail_fast {
            anyhow::bail!(
                "Failed to process {}: {}",
                path.display(),
                report.error.as_deref().unwrap_or("unknown error")
            );
        }

        writer.write_document(&report.title, &dialogues).await?;
        summary.record(report);

        if let Some(progress) = progress {
            progress.inc(1);
        }
    }

    summary.total_processing_time_ms = start_time.elapsed().as_millis() as u64;
    info!(
        "Found {} dialogues ({} quotes) in {} documents",
        summary.total_dialogues, summary.total_quotes, summary.documents_processed
    );
    Ok(summary)
}
