use anyhow::Result;
use futures::stream::{Stream, StreamExt};
use glob::glob;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Configuration for document discovery behavior
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// File name pattern matched inside the source directory
    pub pattern: String,
    /// Whether to fail fast on first error or continue processing
    pub fail_fast: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            pattern: "*.txt".to_string(),
            fail_fast: false,
        }
    }
}

/// Result of document discovery validation
#[derive(Debug, Clone)]
pub struct FileValidation {
    pub path: PathBuf,
    pub error: Option<String>,
}

/// Display title of a document: its file name without the final extension
pub fn document_title(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Discovers the documents matching `config.pattern` directly inside `source_dir`.
/// Returns an async stream of validated paths in sorted order.
///
/// # Arguments
/// * `source_dir` - Directory holding the drama editions (not searched recursively)
/// * `config` - Discovery configuration (pattern, fail_fast behavior)
pub fn discover_documents(
    source_dir: impl AsRef<Path>,
    config: DiscoveryConfig,
) -> impl Stream<Item = Result<FileValidation>> {
    let source_path = source_dir.as_ref().to_path_buf();

    futures::stream::unfold(
        DiscoveryState::new(source_path, config),
        |mut state| async move {
            state.next_file().await.map(|result| (result, state))
        }
    )
}

/// Internal state for document discovery iteration
struct DiscoveryState {
    source_dir: PathBuf,
    config: DiscoveryConfig,
    glob_iter: Option<glob::Paths>,
}

impl DiscoveryState {
    fn new(source_dir: PathBuf, config: DiscoveryConfig) -> Self {
        Self {
            source_dir,
            config,
            glob_iter: None,
        }
    }

    async fn next_file(&mut self) -> Option<Result<FileValidation>> {
        // Initialize glob iterator on first call
        if self.glob_iter.is_none() {
            let escaped_dir = glob::Pattern::escape(&self.source_dir.display().to_string());
            let pattern = format!("{}/{}", escaped_dir, self.config.pattern);
            debug!("Starting document discovery with pattern: {}", pattern);

            match glob(&pattern) {
                Ok(paths) => {
                    self.glob_iter = Some(paths);
                    info!("Document discovery initialized for: {}", self.source_dir.display());
                }
                Err(e) => {
                    return Some(Err(anyhow::anyhow!("Failed to create glob pattern: {}", e)));
                }
            }
        }

        let glob_iter = self.glob_iter.as_mut()?;
        loop {
            match glob_iter.next()? {
                Ok(path) => {
                    debug!("Found document: {}", path.display());
                    return Some(validate_file(path, &self.config).await);
                }
                Err(e) => {
                    let error_msg = format!("Glob iteration error: {e}");
                    warn!("{}", error_msg);

                    if self.config.fail_fast {
                        return Some(Err(anyhow::anyhow!(error_msg)));
                    }
                    // Continue to next path on non-fatal glob errors
                }
            }
        }
    }
}

async fn validate_file(path: PathBuf, config: &DiscoveryConfig) -> Result<FileValidation> {
    match fs::metadata(&path).await {
        Ok(metadata) => {
            if !metadata.is_file() {
                let error = format!("Path is not a file: {}", path.display());
                warn!("{}", error);
                return Ok(FileValidation {
                    path,
                    error: Some(error),
                });
            }
        }
        Err(e) => {
            let error = format!("Cannot access file {}: {}", path.display(), e);
            warn!("{}", error);

            if config.fail_fast {
                return Err(anyhow::anyhow!(error));
            }
            return Ok(FileValidation {
                path,
                error: Some(error),
            });
        }
    }

    // UTF-8 validation happens while the document is read
    Ok(FileValidation { path, error: None })
}

/// Collect all discovered documents into a Vec for easier processing
pub async fn collect_documents(
    source_dir: impl AsRef<Path>,
    config: DiscoveryConfig,
) -> Result<Vec<FileValidation>> {
    let mut files = Vec::new();
    let mut stream = Box::pin(discover_documents(source_dir, config));

    while let Some(result) = stream.next().await {
        files.push(result?);
    }

    let valid_count = files.iter().filter(|f| f.error.is_none()).count();
    let invalid_count = files.len() - valid_count;

    if invalid_count > 0 {
        warn!("Found {} paths with validation issues", invalid_count);
    }

    info!("Document discovery summary: {} valid, {} invalid", valid_count, invalid_count);

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_file(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
        let file_path = dir.join(name);
        if let Some(parent) = file_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&file_path, content).await?;
        Ok(file_path)
    }

    #[tokio::test]
    async fn test_discover_empty_directory() {
        let temp_dir = TempDir::new().unwrap();

        let files = collect_documents(temp_dir.path(), DiscoveryConfig::default()).await.unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn test_discover_matching_documents_sorted() {
        let temp_dir = TempDir::new().unwrap();

        create_test_file(temp_dir.path(), "wesele.txt", "AKT I").await.unwrap();
        create_test_file(temp_dir.path(), "balladyna.txt", "AKT I").await.unwrap();
        create_test_file(temp_dir.path(), "okladka.jpg", "").await.unwrap();
        create_test_file(temp_dir.path(), "nested/dziady.txt", "AKT I").await.unwrap();

        let files = collect_documents(temp_dir.path(), DiscoveryConfig::default()).await.unwrap();

        let names: Vec<String> = files.iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["balladyna.txt", "wesele.txt"]);
        assert!(files.iter().all(|f| f.error.is_none()));
    }

    #[tokio::test]
    async fn test_directory_matching_pattern_is_flagged() {
        let temp_dir = TempDir::new().unwrap();
        tokio::fs::create_dir_all(temp_dir.path().join("archiwum.txt")).await.unwrap();

        let files = collect_documents(temp_dir.path(), DiscoveryConfig::default()).await.unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].error.as_deref().unwrap().contains("not a file"));
    }

    #[tokio::test]
    async fn test_custom_pattern() {
        let temp_dir = TempDir::new().unwrap();
        create_test_file(temp_dir.path(), "zemsta.txt", "").await.unwrap();
        create_test_file(temp_dir.path(), "zemsta.md", "").await.unwrap();

        let config = DiscoveryConfig { pattern: "*".to_string(), fail_fast: false };
        let files = collect_documents(temp_dir.path(), config).await.unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_document_title() {
        assert_eq!(document_title(Path::new("dramas/wesele.txt")), "wesele");
        assert_eq!(document_title(Path::new("dramas/pan-tadeusz.v2.txt")), "pan-tadeusz.v2");
        assert_eq!(document_title(Path::new("zemsta")), "zemsta");
    }
}
