// WHY: Line classifiers shared by every state's transition rule
// Each predicate inspects one untouched input line and nothing else

/// Section headers opening a character list, matched case-insensitively
pub const DRAMATIS_PERSONAE_HEADERS: &[&str] = &["osoby", "statyści", "chóry"];

/// Act, scene and prologue markers, matched case-sensitively at line start
pub const SCENE_HEADERS: &[&str] = &["AKT", "SCENA", "PROLOG"];

/// Publisher metadata lines are all caps but never a speaker
pub const ISBN_PREFIX: &str = "ISBN";

/// Boilerplate sentence closing every wolnelektury.pl edition
pub const DRAMA_END_SENTENCE: &str =
    "Ta lektura, podobnie jak tysiące innych, dostępna jest na stronie wolnelektury.pl.";

/// Stage direction delimiter
pub const STAGE_DIRECTION_DELIMITER: char = '/';

/// Line opens a dramatis personae section ("Osoby", "STATYŚCI:", ...)
pub fn enters_dramatis_personae(line: &str) -> bool {
    let lowered = line.to_lowercase();
    DRAMATIS_PERSONAE_HEADERS
        .iter()
        .any(|header| lowered.starts_with(header))
}

/// Line opens an act, scene or prologue
pub fn enters_waiting_for_dialogue(line: &str) -> bool {
    SCENE_HEADERS.iter().any(|header| line.starts_with(header))
}

/// Line opens a stage direction that continues on following lines
pub fn enters_stage_directions(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with(STAGE_DIRECTION_DELIMITER) && !trimmed.ends_with(STAGE_DIRECTION_DELIMITER)
}

/// Line is a complete stage direction on its own (`/wchodzi z lewej/`)
pub fn is_single_line_stage_direction(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with(STAGE_DIRECTION_DELIMITER) && trimmed.ends_with(STAGE_DIRECTION_DELIMITER)
}

/// Line closes a multi-line stage direction
pub fn closes_stage_directions(line: &str) -> bool {
    line.trim().ends_with(STAGE_DIRECTION_DELIMITER)
}

/// Line names the next speaker: an all-caps line that is not a section header
pub fn is_speaker_line(line: &str) -> bool {
    is_uppercase(line.trim())
        && !enters_waiting_for_dialogue(line)
        && !enters_dramatis_personae(line)
        && !line.starts_with(ISBN_PREFIX)
}

/// Line is the end-of-edition boilerplate
pub fn is_drama_end(line: &str) -> bool {
    line.trim() == DRAMA_END_SENTENCE
}

/// At least one uppercase letter and no lowercase ones; digits and punctuation are neutral
fn is_uppercase(text: &str) -> bool {
    let mut has_upper = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_upper = true;
        }
    }
    has_upper
}
