// WHY: Quote accumulation inside the Dialogue state
// Buffers one speaker's lines, joins them into a quote and collects the scene's quotes

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::debug;

use super::predicates::{is_single_line_stage_direction, is_speaker_line, STAGE_DIRECTION_DELIMITER};

/// A quote with this many content lines is a long monologue
pub const LONG_MONOLOGUE_LINES: usize = 4;

/// A quote with this many words is a long monologue
pub const LONG_MONOLOGUE_WORDS: usize = 21;

/// Whether extracted quotes carry the speaker's identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DialogueMode {
    /// Bare quote text
    Plain,
    /// Quote prefixed with `Speaker_name:`
    #[default]
    Identified,
}

impl DialogueMode {
    /// Buffer contents when a new speaker line is seen
    pub fn initial_quote(self, speaker_line: &str) -> Vec<String> {
        match self {
            DialogueMode::Plain => Vec::new(),
            DialogueMode::Identified => vec![speaker_identifier(speaker_line)],
        }
    }

    /// Index of the first spoken line in a quote buffer
    pub fn content_offset(self) -> usize {
        match self {
            DialogueMode::Plain => 0,
            DialogueMode::Identified => 1,
        }
    }

    /// Index of the first line joined to its predecessor with a space
    pub fn join_offset(self) -> usize {
        match self {
            DialogueMode::Plain => 1,
            DialogueMode::Identified => 2,
        }
    }
}

impl std::fmt::Display for DialogueMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DialogueMode::Plain => write!(f, "plain"),
            DialogueMode::Identified => write!(f, "identified"),
        }
    }
}

/// Turn a speaker line into an identifier token: `PAN MŁODY` becomes `Pan_młody:`
pub fn speaker_identifier(speaker_line: &str) -> String {
    let name = speaker_line.trim();
    let mut identifier = String::with_capacity(name.len() + 1);
    for (idx, c) in name.chars().enumerate() {
        if c.is_whitespace() {
            identifier.push('_');
        } else if idx == 0 {
            identifier.extend(c.to_uppercase());
        } else {
            identifier.extend(c.to_lowercase());
        }
    }
    identifier.push(':');
    identifier
}

/// Excise a short inline direction (`Idę /wstaje/ już.`) from a line
///
/// Only lines with exactly two delimiters are touched. The span between them
/// is removed together with every whitespace character of the remainder.
pub fn remove_inline_stage_directions(line: &str) -> Cow<'_, str> {
    if line.matches(STAGE_DIRECTION_DELIMITER).count() != 2 {
        return Cow::Borrowed(line);
    }
    let (Some(start), Some(end)) = (
        line.find(STAGE_DIRECTION_DELIMITER),
        line.rfind(STAGE_DIRECTION_DELIMITER),
    ) else {
        return Cow::Borrowed(line);
    };

    let remainder = line[..start]
        .chars()
        .chain(line[end + STAGE_DIRECTION_DELIMITER.len_utf8()..].chars())
        .filter(|c| !c.is_whitespace())
        .collect();
    Cow::Owned(remainder)
}

/// Join buffered lines into one utterance
///
/// From `join_offset` on, each line is separated by a space and starts
/// lowercase unless the previous line ended a sentence.
fn join_quote(lines: &[String], join_offset: usize) -> String {
    let mut joined = String::new();
    let mut previous: Option<&str> = None;

    for (idx, line) in lines.iter().enumerate() {
        if idx >= join_offset {
            joined.push(' ');
            let continues_sentence = previous.is_some_and(|prev| !prev.ends_with('.'));
            let mut chars = line.chars();
            match chars.next() {
                Some(first) if continues_sentence => {
                    joined.extend(first.to_lowercase());
                    joined.push_str(chars.as_str());
                }
                _ => joined.push_str(line),
            }
        } else {
            joined.push_str(line);
        }
        previous = Some(line.as_str());
    }

    joined
}

/// In-progress quote and the finalized quotes of the current scene segment
#[derive(Debug, Clone)]
pub struct QuoteAccumulator {
    mode: DialogueMode,
    long_monologue: bool,
    current_quote: Vec<String>,
    current_dialogue: Vec<String>,
}

impl QuoteAccumulator {
    pub fn new(mode: DialogueMode) -> Self {
        Self {
            mode,
            long_monologue: false,
            current_quote: Vec::new(),
            current_dialogue: Vec::new(),
        }
    }

    pub fn mode(&self) -> DialogueMode {
        self.mode
    }

    /// Sticky flag: once set the segment ends on the next line
    pub fn long_monologue(&self) -> bool {
        self.long_monologue
    }

    pub fn current_quote(&self) -> &[String] {
        &self.current_quote
    }

    pub fn current_dialogue(&self) -> &[String] {
        &self.current_dialogue
    }

    /// Feed one line of the dialogue-bearing state
    pub fn handle_line(&mut self, line: &str) {
        if is_speaker_line(line) {
            if self.has_content() {
                self.finalize_quote();
            }
            self.current_quote = self.mode.initial_quote(line);
            return;
        }

        if is_single_line_stage_direction(line) {
            return;
        }

        let cleared = remove_inline_stage_directions(line.trim());
        if cleared.chars().any(char::is_alphabetic) {
            self.current_quote.push(cleared.into_owned());
        }
        if self.is_long_monologue() {
            debug!(lines = self.content().len(), "Long monologue detected");
            self.long_monologue = true;
        }
    }

    /// Spoken lines of the current quote, without the identifier token
    fn content(&self) -> &[String] {
        let offset = self.mode.content_offset().min(self.current_quote.len());
        &self.current_quote[offset..]
    }

    fn has_content(&self) -> bool {
        self.content().iter().any(|line| !line.trim().is_empty())
    }

    /// Current quote is too long to be a useful extract
    pub fn is_long_monologue(&self) -> bool {
        let content = self.content();
        let words: usize = content.iter().map(|line| line.split_whitespace().count()).sum();
        content.len() >= LONG_MONOLOGUE_LINES || words >= LONG_MONOLOGUE_WORDS
    }

    /// Close the current quote, keeping it when short and non-blank
    ///
    /// Returns whether the quote was added to the segment.
    pub fn finalize_quote(&mut self) -> bool {
        let keep = self.has_content() && !self.is_long_monologue();
        let quote = std::mem::take(&mut self.current_quote);
        if keep {
            self.current_dialogue.push(join_quote(&quote, self.mode.join_offset()));
        }
        keep
    }

    /// Close the segment: finalize the pending quote and hand over all quotes
    pub fn take_dialogue(&mut self) -> Vec<String> {
        self.finalize_quote();
        std::mem::take(&mut self.current_dialogue)
    }
}
