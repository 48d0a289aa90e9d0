// WHY: Persisted quote report, one block per document
// Each block is flushed once written so finished documents survive a crash mid-batch

use anyhow::{Context, Result};
use std::path::Path;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tracing::debug;

use crate::drama_states::Dialogue;

/// Format one document's block: title line, quotes one per line, blank line after each dialogue
///
/// Returns an empty string for a document without dialogues.
pub fn format_document_block(title: &str, dialogues: &[Dialogue]) -> String {
    if dialogues.is_empty() {
        return String::new();
    }

    let mut block = String::new();
    block.push_str(title);
    block.push('\n');
    for dialogue in dialogues {
        block.push_str(&dialogue.join("\n"));
        block.push_str("\n\n");
    }
    block
}

/// Appends document blocks to a report destination
pub struct QuoteWriter<W: AsyncWrite + Unpin> {
    writer: BufWriter<W>,
    documents_written: usize,
}

impl QuoteWriter<tokio::fs::File> {
    /// Create (or truncate) the report file
    pub async fn create(path: &Path) -> Result<Self> {
        let file = tokio::fs::File::create(path)
            .await
            .with_context(|| format!("Failed to create output file {}", path.display()))?;
        Ok(Self::new(file))
    }
}

impl<W: AsyncWrite + Unpin> QuoteWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: BufWriter::new(inner),
            documents_written: 0,
        }
    }

    /// Number of non-empty document blocks written so far
    pub fn documents_written(&self) -> usize {
        self.documents_written
    }

    /// Write one document's dialogues; documents with none write nothing
    pub async fn write_document(&mut self, title: &str, dialogues: &[Dialogue]) -> Result<()> {
        if dialogues.is_empty() {
            debug!("No dialogues to write for {}", title);
            return Ok(());
        }

        let block = format_document_block(title, dialogues);
        self.writer.write_all(block.as_bytes()).await?;
        self.writer.flush().await?;
        self.documents_written += 1;
        Ok(())
    }

    /// Flush and hand back the underlying destination
    pub async fn finish(mut self) -> Result<W> {
        self.writer.flush().await?;
        Ok(self.writer.into_inner())
    }
}
