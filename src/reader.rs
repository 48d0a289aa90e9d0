use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

/// Configuration for document reading behavior
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Buffer size for async reading (default: 8KB)
    pub buffer_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            buffer_size: 8192, // WHY: 8KB covers a typical drama edition in a few reads
        }
    }
}

/// Statistics for one document read pass
#[derive(Debug, Clone)]
pub struct ReadStats {
    pub file_path: String,
    pub lines_read: u64,
    pub bytes_read: u64,
    pub duration_ms: u64,
}

/// Async document reader that streams UTF-8 lines to a consumer
pub struct AsyncFileReader {
    config: ReaderConfig,
}

impl AsyncFileReader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Hand every line of the document to `on_line`, in order
    ///
    /// Line endings are stripped; blank lines are delivered like any other.
    /// The file handle is closed before this returns, on success and on error.
    pub async fn for_each_line<P, F>(&self, file_path: P, mut on_line: F) -> Result<ReadStats>
    where
        P: AsRef<Path>,
        F: FnMut(&str),
    {
        let path = file_path.as_ref();
        let start_time = std::time::Instant::now();

        debug!("Starting async read of document: {}", path.display());

        let file = File::open(path)
            .await
            .with_context(|| format!("Failed to open document {}", path.display()))?;

        let reader = BufReader::with_capacity(self.config.buffer_size, file);
        let mut lines = reader.lines();
        let mut line_count = 0u64;
        let mut byte_count = 0u64;

        while let Some(line) = lines.next_line().await.with_context(|| {
            format!(
                "UTF-8 decoding error in {} at line {}",
                path.display(),
                line_count + 1
            )
        })? {
            byte_count += line.len() as u64 + 1; // +1 for newline
            line_count += 1;
            on_line(&line);
        }

        let stats = ReadStats {
            file_path: path.display().to_string(),
            lines_read: line_count,
            bytes_read: byte_count,
            duration_ms: start_time.elapsed().as_millis() as u64,
        };

        info!(
            "Read {}: {} lines, {} bytes in {}ms",
            path.display(),
            line_count,
            byte_count,
            stats.duration_ms
        );

        Ok(stats)
    }

    /// Read the whole document into memory as lines
    pub async fn read_file_lines<P: AsRef<Path>>(&self, file_path: P) -> Result<(Vec<String>, ReadStats)> {
        let mut result_lines = Vec::new();
        let stats = self
            .for_each_line(file_path, |line| result_lines.push(line.to_string()))
            .await?;
        Ok((result_lines, stats))
    }
}
