pub mod batch;
pub mod context;
pub mod discovery;
pub mod drama_states;
pub mod output;
pub mod reader;

// Re-export main types for convenient access
pub use drama_states::{Dialogue, DialogueMode, DramaState, QuoteAccumulator};

pub use context::{process_document, DocumentOutcome, DocumentReport, DocumentStatus, DramaContext};

pub use batch::{run_batch, run_documents, BatchConfig, BatchSummary};
pub use output::QuoteWriter;
