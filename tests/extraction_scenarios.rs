// End-to-end classification scenarios on in-memory documents
// WHY: Each scenario pins one interaction of the state machine and quote accumulator

use drama_quotes::drama_states::{remove_inline_stage_directions, speaker_identifier, DRAMA_END_SENTENCE};
use drama_quotes::{DialogueMode, DocumentOutcome, DramaContext};

fn extract(lines: &[&str], mode: DialogueMode) -> DocumentOutcome {
    DramaContext::new("scenario.txt", mode).process_lines(lines.iter().copied())
}

fn all_quotes(outcome: &DocumentOutcome) -> Vec<String> {
    outcome.dialogues.iter().flatten().cloned().collect()
}

#[test]
fn test_identified_greeting_exchange() {
    let outcome = extract(&["JAN", "Dzień dobry.", "MARIA", "Dzień dobry również."], DialogueMode::Identified);

    assert_eq!(all_quotes(&outcome), vec!["Jan:Dzień dobry.", "Maria:Dzień dobry również."]);
}

#[test]
fn test_single_line_stage_direction_is_not_a_transition() {
    let mut context = DramaContext::new("scenario.txt", DialogueMode::Identified);
    for line in ["AKT I", "JAN", "Chodź tu."] {
        context.process_line(line);
    }
    context.process_line("/wchodzi z lewej/");
    assert_eq!(context.current_state().name(), "Dialogue");

    for line in ["Szybko.", DRAMA_END_SENTENCE] {
        context.process_line(line);
    }
    let outcome = context.finish();
    assert_eq!(all_quotes(&outcome), vec!["Jan:Chodź tu. Szybko."]);
}

#[test]
fn test_end_sentence_closes_segment_and_freezes_state() {
    let mut context = DramaContext::new("scenario.txt", DialogueMode::Identified);
    for line in ["AKT I", "JAN", "Żegnajcie.", DRAMA_END_SENTENCE] {
        context.process_line(line);
    }
    assert_eq!(context.current_state().name(), "DramaEnded");
    assert_eq!(context.dialogues().len(), 1);

    for line in ["OSOBY", "/opis", "AKT II", "MARIA", "Jeszcze?"] {
        context.process_line(line);
        assert_eq!(context.current_state().name(), "DramaEnded");
    }

    let outcome = context.finish();
    assert!(outcome.is_complete());
    assert_eq!(all_quotes(&outcome), vec!["Jan:Żegnajcie."]);
}

#[test]
fn test_five_line_monologue_is_dropped_and_forces_exit() {
    let mut context = DramaContext::new("scenario.txt", DialogueMode::Plain);
    for line in ["AKT I", "JAN", "Krótko.", "MARIA", "Jeden", "Dwa", "Trzy", "Cztery"] {
        context.process_line(line);
    }
    assert_eq!(context.current_state().name(), "Dialogue");

    // The fifth line would be ordinary speech, yet the segment ends here
    context.process_line("Pięć");
    assert_eq!(context.current_state().name(), "WaitingForDialogue");

    let outcome = context.finish();
    assert_eq!(outcome.dialogues, vec![vec!["Krótko.".to_string()]]);
}

#[test]
fn test_missing_end_sentence_keeps_finished_dialogues() {
    let outcome = extract(
        &["AKT I", "JAN", "Pierwsza scena.", "SCENA II", "MARIA", "Nie skończę"],
        DialogueMode::Identified,
    );

    assert!(!outcome.is_complete());
    assert_eq!(outcome.final_state, "Dialogue");
    assert_eq!(all_quotes(&outcome), vec!["Jan:Pierwsza scena.", "Maria:Nie skończę"]);
}

#[test]
fn test_missing_end_sentence_after_scene_header() {
    let outcome = extract(&["AKT I", "JAN", "Tak.", "SCENA II"], DialogueMode::Identified);

    assert_eq!(outcome.final_state, "WaitingForDialogue");
    assert_eq!(all_quotes(&outcome), vec!["Jan:Tak."]);
}

#[test]
fn test_act_header_is_not_a_speaker() {
    let outcome = extract(&["JAN", "Tak.", "AKT DRUGI", "MARIA", "Nie.", DRAMA_END_SENTENCE], DialogueMode::Identified);

    assert_eq!(outcome.dialogues.len(), 2);
    assert_eq!(all_quotes(&outcome), vec!["Jan:Tak.", "Maria:Nie."]);
}

#[test]
fn test_isbn_line_is_not_a_speaker() {
    let outcome = extract(&["ISBN 978-83-288-2495-7", "Wstęp."], DialogueMode::Identified);

    assert_eq!(outcome.final_state, "DramaBeginning");
    assert!(outcome.dialogues.is_empty());
}

#[test]
fn test_well_formed_document_is_complete() {
    let outcome = extract(
        &["OSOBY:", "* JAN", "", "Wieś.", "AKT I", "JAN", "Dobrze.", DRAMA_END_SENTENCE],
        DialogueMode::Identified,
    );

    assert!(outcome.is_complete());
    assert_eq!(outcome.characters, vec!["JAN"]);
}

#[test]
fn test_character_list_inside_dialogue_keeps_quotes() {
    let outcome = extract(
        &["AKT I", "JAN", "Przed listą.", "Osoby nowe:", "* PIOTR", "Dalej.", "SCENA 2", "PIOTR", "Po liście.", DRAMA_END_SENTENCE],
        DialogueMode::Identified,
    );

    assert_eq!(outcome.dialogues, vec![
        vec!["Jan:Przed listą.".to_string()],
        vec!["Piotr:Po liście.".to_string()],
    ]);
}

#[test]
fn test_speaker_identifiers_have_no_whitespace() {
    for name in ["PAN MŁODY", "PIERWSZA  DRUŻKA", "STARY\tRYBAK", " ŻYD "] {
        let identifier = speaker_identifier(name);
        assert!(!identifier.contains(char::is_whitespace), "{identifier:?} contains whitespace");
        assert!(identifier.ends_with(':'));
    }
}

#[test]
fn test_inline_strip_is_idempotent() {
    let lines = ["Niech się dzieje /cicho/ wola nieba.", "/a/", "Bez kresek", "jedna / kreska", "/a/ b /c/"];
    for line in lines {
        let once = remove_inline_stage_directions(line).into_owned();
        assert_eq!(remove_inline_stage_directions(&once), once.as_str());
    }
}

#[test]
fn test_finalized_quotes_always_contain_letters() {
    let outcome = extract(
        &["AKT I", "JAN", "...", "MARIA", "- - -", "/tupie/", "PIOTR", "7 8 9", "ANNA", "Ha.", DRAMA_END_SENTENCE],
        DialogueMode::Plain,
    );

    let quotes = all_quotes(&outcome);
    assert_eq!(quotes, vec!["Ha."]);
    assert!(quotes.iter().all(|q| q.chars().any(char::is_alphabetic)));
}
