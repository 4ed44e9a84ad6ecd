// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Integration tests for the fretboard engine
//!
//! These tests drive the public API the way the command line does: build a
//! board, click a cell, retune, and run the trainer.

use std::time::{Duration, Instant};

use fretboard::config::FretboardFile;
use fretboard::fretboard::{Fretboard, Tuning, TuningError, TuningPreset};
use fretboard::music::pitch::{frequency, sanitize_input, NoteWarning};
use fretboard::music::{progressions_for, Mode, Note, PitchClass, ScaleSpan};
use fretboard::trainer::{Trainer, TrainerEvent, TrainerSession, TrainerSettings};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 0.01
}

/// Retuning string 6 to D2 changes every fret on that string
#[test]
fn test_retune_then_read_fret() {
    let mut board = Fretboard::default();
    assert_eq!(board.cell(6, 0).unwrap().note, Note::new(PitchClass::E, 2));

    let warning = board.tuning_mut().retune(6, "D2").unwrap();
    assert!(warning.is_none());

    assert_eq!(board.cell(6, 0).unwrap().note, Note::new(PitchClass::D, 2));
    assert_eq!(board.cell(6, 2).unwrap().note, Note::new(PitchClass::E, 2));
    assert_eq!(board.cell(6, 12).unwrap().note, Note::new(PitchClass::D, 3));
}

/// Invalid input is rejected and the previous tuning retained
#[test]
fn test_invalid_retune_keeps_tuning() {
    let mut board = Fretboard::default();
    let before = board.tuning().clone();

    assert_eq!(
        board.tuning_mut().retune(6, "H5"),
        Err(TuningError::InvalidNote("H5".to_string()))
    );
    assert!(matches!(
        board.tuning_mut().retune(6, "D"),
        Err(TuningError::InvalidOctave(_))
    ));
    assert_eq!(board.tuning_mut().retune(9, "D2"), Err(TuningError::UnknownString(9)));

    assert_eq!(board.tuning(), &before);
}

/// Theoretical spellings convert with a warning; junk falls back to C
#[test]
fn test_sanitize_user_notes() {
    let e_sharp = sanitize_input("E#");
    assert_eq!(e_sharp.pitch_class, PitchClass::F);
    assert!(matches!(
        e_sharp.warning,
        Some(NoteWarning::Theoretical { resolved: PitchClass::F, .. })
    ));

    let junk = sanitize_input("Z");
    assert_eq!(junk.pitch_class, PitchClass::C);
    assert!(junk.warning.as_ref().is_some_and(NoteWarning::is_fallback));

    let flat = sanitize_input("Bb");
    assert_eq!(flat.pitch_class, PitchClass::As);
    assert!(flat.warning.is_none());

    let mut tuning = Tuning::default();
    let warning = tuning.retune(1, "Fb4").unwrap();
    assert!(warning.is_some());
    assert_eq!(tuning.open_note(1), Some(Note::new(PitchClass::E, 4)));
}

/// Frequencies follow equal temperament around A4 = 440 Hz
#[test]
fn test_frequency_formula() {
    assert!(approx(frequency(PitchClass::A, 4), 440.0));
    assert!(approx(frequency(PitchClass::A, 2), 110.0));
    assert!(approx(frequency(PitchClass::E, 4), 329.63));
    assert!(approx(frequency(PitchClass::C, 4), 261.63));

    let board = Fretboard::default();
    assert!(approx(board.cell(6, 5).unwrap().note.frequency(), 110.0));

    // Twelve frets up doubles the frequency
    for string in 1..=6u8 {
        let open = board.cell(string, 0).unwrap().note.frequency();
        let octave = board.cell(string, 12).unwrap().note.frequency();
        assert!(approx(octave, open * 2.0));
    }
}

/// Clicking a cell walks the scale, labels degrees and highlights string 1
#[test]
fn test_click_flow() {
    let board = Fretboard::default();
    let result = board
        .click(1, 5, Mode::Minor, ScaleSpan::SingleOctave, &[], false)
        .unwrap();

    assert_eq!(result.note, Note::new(PitchClass::A, 4));
    assert!(approx(result.frequency, 440.0));

    let view = result.scale.unwrap();
    assert_eq!(view.scale.notes().len(), 8);
    assert_eq!(view.degrees.len(), 7);
    assert_eq!(view.degrees[0].note_text(), "A");
    assert_eq!(view.degrees[0].chord_text(), "Amin");
    assert_eq!(view.degrees[1].chord_text(), "Bdim");
    assert_eq!(view.degrees[2].chord_text(), "Cmaj");

    let first = &view.progressions[0];
    assert_eq!(first.row(), vec!["Amin", "Dmin", "Emin", "Amin"]);

    // A4 minor, single octave, on string 1 (E4 open) within 15 frets
    let frets: Vec<u32> = view.highlights.iter().map(|h| h.cell.fret).collect();
    assert_eq!(frets, vec![5, 7, 8, 10, 12, 13, 15]);
    assert!(view.highlights.iter().all(|h| h.cell.string == 1));

    let tonics: Vec<u32> = view
        .highlights
        .iter()
        .filter(|h| h.tonic)
        .map(|h| h.cell.fret)
        .collect();
    assert_eq!(tonics, vec![5]);
}

/// All-octaves walks highlight every matching pitch on the selected strings
#[test]
fn test_click_all_octaves() {
    let board = Fretboard::default();
    let result = board
        .click(6, 0, Mode::Major, ScaleSpan::AllOctaves, &[1, 6], false)
        .unwrap();
    let view = result.scale.unwrap();

    let on_string = |s: u8| -> Vec<u32> {
        view.highlights
            .iter()
            .filter(|h| h.cell.string == s)
            .map(|h| h.cell.fret)
            .collect()
    };
    let e_major = vec![0, 2, 4, 5, 7, 9, 11, 12, 14];
    assert_eq!(on_string(1), e_major);
    assert_eq!(on_string(6), e_major);
    assert!(on_string(3).is_empty());

    let tonic_count = view.highlights.iter().filter(|h| h.tonic).count();
    assert_eq!(tonic_count, 4);
}

/// A locked scale still sounds the note but keeps the current scale
#[test]
fn test_locked_click() {
    let board = Fretboard::default();
    let result = board
        .click(2, 1, Mode::Major, ScaleSpan::SingleOctave, &[], true)
        .unwrap();
    assert_eq!(result.note, Note::new(PitchClass::C, 4));
    assert!(result.scale.is_none());
}

/// Progressions resolve against the walked scale; unknown steps render '?'
#[test]
fn test_progression_resolution() {
    let board = Fretboard::default();
    let c3 = board.cell(5, 3).unwrap().note;
    assert_eq!(c3, Note::new(PitchClass::C, 3));

    let notes = fretboard::music::single_octave_scale(c3, Mode::Major);
    let rows = progressions_for(&notes, Mode::Major);
    assert_eq!(rows[0].row(), vec!["Cmaj", "Gmaj", "Amin", "Fmaj"]);
    assert_eq!(rows[1].row(), vec!["Dmin", "Gmaj", "Cmaj", ""]);

    let notes = fretboard::music::single_octave_scale(c3, Mode::Blues);
    let rows = progressions_for(&notes, Mode::Blues);
    assert!(!rows.is_empty());
    assert!(rows[0].row().iter().all(|c| c == "?"));
}

/// A settings file builds the board it describes
#[test]
fn test_config_to_board() {
    let yaml = r#"
fret_count: 40
tuning:
  preset: drop d
  strings:
    "1": D4
scale:
  mode: dorian
  full: true
  strings: [1, 2]
"#;
    let config = FretboardFile::from_yaml(yaml).unwrap();
    let (board, warnings) = config.build_fretboard().unwrap();

    assert!(warnings.is_empty());
    assert_eq!(board.frets(), 24);
    assert_eq!(board.cell(6, 0).unwrap().note, Note::new(PitchClass::D, 2));
    assert_eq!(board.cell(1, 0).unwrap().note, Note::new(PitchClass::D, 4));
    assert!(board.cell(1, 25).is_none());
    assert_eq!(config.scale.mode(), Mode::Dorian);
    assert_eq!(config.scale.span(), ScaleSpan::AllOctaves);
}

/// Every preset yields a six-string board
#[test]
fn test_presets_build_boards() {
    for preset in TuningPreset::ALL {
        let board = Fretboard::new(Tuning::from_preset(preset), 12);
        assert_eq!(board.tuning().len(), 6);
        assert_eq!(board.cells().len(), 6 * 13);
    }
}

/// The trainer announces, reveals, then clears before the next pick
#[test]
fn test_trainer_cycle() {
    let board = Fretboard::default();
    let settings = TrainerSettings::new(
        Duration::from_millis(1000),
        Some(Duration::from_millis(400)),
    );
    let mut session = TrainerSession::new(Trainer::with_seed(7), settings);
    let t0 = Instant::now();
    session.start(t0);

    let events = session.tick(t0, &board, &[2, 3]);
    let first = match events.as_slice() {
        [TrainerEvent::Announce(p)] => *p,
        other => panic!("expected announce, got {:?}", other),
    };
    assert!(first.string == 2 || first.string == 3);
    assert!(first.fret <= board.frets());

    let events = session.tick(t0 + Duration::from_millis(400), &board, &[2, 3]);
    assert_eq!(events, vec![TrainerEvent::Reveal(first)]);

    let events = session.tick(t0 + Duration::from_millis(1000), &board, &[2, 3]);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0], TrainerEvent::Clear);
    assert!(matches!(events[1], TrainerEvent::Announce(_)));
}
