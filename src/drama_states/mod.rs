// WHY: Line-oriented state machine classifying drama lines into front matter,
// scene headers, stage directions and spoken dialogue

use tracing::{info, trace};

pub mod predicates;
pub mod quote;

pub use predicates::{
    closes_stage_directions, enters_dramatis_personae, enters_stage_directions,
    enters_waiting_for_dialogue, is_drama_end, is_single_line_stage_direction, is_speaker_line,
    DRAMA_END_SENTENCE,
};
pub use quote::{remove_inline_stage_directions, speaker_identifier, DialogueMode, QuoteAccumulator};

/// Finalized quotes of one uninterrupted scene segment
pub type Dialogue = Vec<String>;

/// Entry of a dramatis personae section, as emitted to the diagnostic stream
pub fn dramatis_personae_entry(line: &str) -> &str {
    line.trim_matches(|c: char| matches!(c, ' ' | '*' | '\r' | '\n'))
}

#[derive(Debug, Clone)]
pub enum DramaState {
    /// Initial state: front matter before the first recognised section
    DramaBeginning,
    /// Character list; the header line itself is not an entry
    DramatisPersonae { first_line: bool },
    /// After an act or scene header, before the first speaker
    WaitingForDialogue,
    /// Spoken lines are being collected
    Dialogue(QuoteAccumulator),
    /// Multi-line stage direction; resumes `previous` when closed
    StageDirections { previous: Box<DramaState> },
    /// End-of-edition boilerplate seen; terminal
    DramaEnded,
}

impl DramaState {
    pub fn dramatis_personae() -> Self {
        DramaState::DramatisPersonae { first_line: true }
    }

    pub fn dialogue(mode: DialogueMode) -> Self {
        DramaState::Dialogue(QuoteAccumulator::new(mode))
    }

    pub fn stage_directions(previous: DramaState) -> Self {
        DramaState::StageDirections {
            previous: Box::new(previous),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DramaState::DramaBeginning => "DramaBeginning",
            DramaState::DramatisPersonae { .. } => "DramatisPersonae",
            DramaState::WaitingForDialogue => "WaitingForDialogue",
            DramaState::Dialogue(_) => "Dialogue",
            DramaState::StageDirections { .. } => "StageDirections",
            DramaState::DramaEnded => "DramaEnded",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DramaState::DramaEnded)
    }

    /// Decide the state for `line`
    ///
    /// Leaving a dialogue segment for a scene header, the end sentence or a
    /// character list pushes its non-empty quotes onto `dialogues`.
    pub fn transition(self, line: &str, mode: DialogueMode, dialogues: &mut Vec<Dialogue>) -> DramaState {
        let next = match self {
            DramaState::DramaBeginning => {
                if enters_stage_directions(line) {
                    DramaState::stage_directions(DramaState::DramaBeginning)
                } else if enters_dramatis_personae(line) {
                    DramaState::dramatis_personae()
                } else if enters_waiting_for_dialogue(line) {
                    DramaState::WaitingForDialogue
                } else if is_speaker_line(line) {
                    DramaState::dialogue(mode)
                } else {
                    DramaState::DramaBeginning
                }
            }
            DramaState::DramatisPersonae { first_line } => {
                let trimmed = line.trim();
                if !trimmed.is_empty() && !trimmed.starts_with('*') {
                    DramaState::DramaBeginning
                } else {
                    DramaState::DramatisPersonae { first_line }
                }
            }
            DramaState::WaitingForDialogue => {
                if is_drama_end(line) {
                    DramaState::DramaEnded
                } else if enters_stage_directions(line) {
                    DramaState::stage_directions(DramaState::WaitingForDialogue)
                } else if enters_dramatis_personae(line) {
                    DramaState::dramatis_personae()
                } else if is_speaker_line(line) {
                    DramaState::dialogue(mode)
                } else {
                    DramaState::WaitingForDialogue
                }
            }
            DramaState::Dialogue(mut accumulator) => {
                if is_drama_end(line) {
                    save_dialogue(&mut accumulator, dialogues);
                    DramaState::DramaEnded
                } else if enters_stage_directions(line) {
                    DramaState::stage_directions(DramaState::Dialogue(accumulator))
                } else if enters_dramatis_personae(line) {
                    save_dialogue(&mut accumulator, dialogues);
                    DramaState::dramatis_personae()
                } else if enters_waiting_for_dialogue(line) || accumulator.long_monologue() {
                    save_dialogue(&mut accumulator, dialogues);
                    DramaState::WaitingForDialogue
                } else {
                    DramaState::Dialogue(accumulator)
                }
            }
            DramaState::StageDirections { previous } => {
                if closes_stage_directions(line) {
                    *previous
                } else {
                    DramaState::StageDirections { previous }
                }
            }
            DramaState::DramaEnded => DramaState::DramaEnded,
        };
        trace!(state = next.name(), "Transition");
        next
    }

    /// Side effects of being in this state for `line`
    ///
    /// Returns the dramatis personae entry emitted for this line, if any.
    pub fn handle<'a>(&mut self, line: &'a str) -> Option<&'a str> {
        match self {
            DramaState::DramatisPersonae { first_line } => {
                let entry = if !*first_line && !line.trim().is_empty() {
                    let entry = dramatis_personae_entry(line);
                    info!(character = entry, "Dramatis personae entry");
                    Some(entry)
                } else {
                    None
                };
                *first_line = false;
                entry
            }
            DramaState::Dialogue(accumulator) => {
                accumulator.handle_line(line);
                None
            }
            DramaState::DramaBeginning
            | DramaState::WaitingForDialogue
            | DramaState::StageDirections { .. }
            | DramaState::DramaEnded => None,
        }
    }

    /// Close the dialogue segment left open at end of input
    ///
    /// A segment suspended by an unterminated stage direction is closed too.
    pub fn close_open_dialogue(&mut self, dialogues: &mut Vec<Dialogue>) {
        match self {
            DramaState::Dialogue(accumulator) => save_dialogue(accumulator, dialogues),
            DramaState::StageDirections { previous } => previous.close_open_dialogue(dialogues),
            _ => {}
        }
    }
}

impl std::fmt::Display for DramaState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn save_dialogue(accumulator: &mut QuoteAccumulator, dialogues: &mut Vec<Dialogue>) {
    let dialogue = accumulator.take_dialogue();
    if !dialogue.is_empty() {
        dialogues.push(dialogue);
    }
}
