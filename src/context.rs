// WHY: Document driver owning the per-document state machine
// Feeds lines in order, detects abnormal termination and reports per-document statistics

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::discovery::document_title;
use crate::drama_states::{Dialogue, DialogueMode, DramaState};
use crate::reader::AsyncFileReader;

/// How processing of a document ended
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Reached the end-of-edition sentence
    Complete,
    /// Input ran out in a non-terminal state; results are best-effort
    Malformed,
    /// Document could not be read; nothing extracted
    Failed,
}

/// Per-document processing statistics
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DocumentReport {
    /// Source document path
    pub path: String,
    /// Display title used in the quote report
    pub title: String,
    /// Number of lines fed to the state machine
    pub lines_read: u64,
    /// Number of dialogue segments extracted
    pub dialogues: usize,
    /// Number of quotes across all dialogue segments
    pub quotes: usize,
    /// Number of dramatis personae entries seen
    pub characters: usize,
    /// State the document ended in
    pub final_state: String,
    pub status: DocumentStatus,
    /// Error message if the document could not be read
    pub error: Option<String>,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

/// Outcome of running one document through the state machine
#[derive(Debug, Clone)]
pub struct DocumentOutcome {
    pub dialogues: Vec<Dialogue>,
    pub characters: Vec<String>,
    pub final_state: &'static str,
    pub lines_processed: u64,
    complete: bool,
}

impl DocumentOutcome {
    /// Input ended in the terminal state
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn quote_count(&self) -> usize {
        self.dialogues.iter().map(Vec::len).sum()
    }
}

/// Per-document processing state
pub struct DramaContext {
    drama_path: PathBuf,
    mode: DialogueMode,
    current_state: DramaState,
    dialogues: Vec<Dialogue>,
    characters: Vec<String>,
    lines_processed: u64,
}

impl DramaContext {
    pub fn new(drama_path: impl Into<PathBuf>, mode: DialogueMode) -> Self {
        Self {
            drama_path: drama_path.into(),
            mode,
            current_state: DramaState::DramaBeginning,
            dialogues: Vec::new(),
            characters: Vec::new(),
            lines_processed: 0,
        }
    }

    pub fn drama_path(&self) -> &Path {
        &self.drama_path
    }

    pub fn current_state(&self) -> &DramaState {
        &self.current_state
    }

    /// Dialogue segments closed so far
    pub fn dialogues(&self) -> &[Dialogue] {
        &self.dialogues
    }

    /// Transition on `line`, then let the new state handle it
    ///
    /// The line closing a multi-line stage direction is part of the direction
    /// and is not handed to the restored state.
    pub fn process_line(&mut self, line: &str) {
        self.lines_processed += 1;

        let in_stage_directions = matches!(self.current_state, DramaState::StageDirections { .. });
        let state = std::mem::replace(&mut self.current_state, DramaState::DramaEnded);
        self.current_state = state.transition(line, self.mode, &mut self.dialogues);

        if in_stage_directions && !matches!(self.current_state, DramaState::StageDirections { .. }) {
            return;
        }

        if let Some(character) = self.current_state.handle(line) {
            self.characters.push(character.to_string());
        }
    }

    pub fn process_lines<I, S>(mut self, lines: I) -> DocumentOutcome
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.process_line(line.as_ref());
        }
        self.finish()
    }

    /// End of input: report a non-terminal final state and keep best-effort results
    pub fn finish(mut self) -> DocumentOutcome {
        let final_state = self.current_state.name();
        let complete = self.current_state.is_terminal();

        if complete {
            info!(
                "Processing {} finished, found {} dialogues ({} quotes)",
                self.drama_path.display(),
                self.dialogues.len(),
                self.dialogues.iter().map(Vec::len).sum::<usize>()
            );
        } else {
            warn!(
                path = %self.drama_path.display(),
                state = final_state,
                "Malformed document: ended in state {}",
                final_state
            );
            self.current_state.close_open_dialogue(&mut self.dialogues);
        }

        DocumentOutcome {
            dialogues: self.dialogues,
            characters: self.characters,
            final_state,
            lines_processed: self.lines_processed,
            complete,
        }
    }
}

/// Read and classify one document
///
/// Read failures are folded into a `Failed` report; partial lines of an
/// unreadable document are discarded.
pub async fn process_document(
    path: &Path,
    mode: DialogueMode,
    reader: &AsyncFileReader,
) -> (DocumentReport, Vec<Dialogue>) {
    let start_time = std::time::Instant::now();
    info!("Processing {}", path.display());

    let mut context = DramaContext::new(path, mode);
    let read_result = reader.for_each_line(path, |line| context.process_line(line)).await;

    let mut report = DocumentReport {
        path: path.display().to_string(),
        title: document_title(path),
        lines_read: 0,
        dialogues: 0,
        quotes: 0,
        characters: 0,
        final_state: context.current_state().name().to_string(),
        status: DocumentStatus::Failed,
        error: None,
        processing_time_ms: 0,
    };

    let dialogues = match read_result {
        Ok(_stats) => {
            let outcome = context.finish();
            report.lines_read = outcome.lines_processed;
            report.dialogues = outcome.dialogues.len();
            report.quotes = outcome.quote_count();
            report.characters = outcome.characters.len();
            report.final_state = outcome.final_state.to_string();
            report.status = if outcome.is_complete() {
                DocumentStatus::Complete
            } else {
                DocumentStatus::Malformed
            };
            outcome.dialogues
        }
        Err(e) => {
            warn!("Skipping {}: {:#}", path.display(), e);
            report.error = Some(format!("{e:#}"));
            Vec::new()
        }
    };

    report.processing_time_ms = start_time.elapsed().as_millis() as u64;
    (report, dialogues)
}
