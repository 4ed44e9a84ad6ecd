// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Fretboard mapping, tuning and the per-cell view model.
//!
//! [`note_at_fret`] is the only place a (string, fret) position is turned
//! into a note. Rendering, playback, scale matching and the trainer all go
//! through it.

pub mod preset;

pub use preset::TuningPreset;

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{info, warn};

use crate::music::harmony::{degree_labels, progressions_for, DegreeLabel, ResolvedProgression};
use crate::music::pitch::{sanitize_input, Note, NoteWarning, MAX_OCTAVE, MIN_OCTAVE};
use crate::music::scale::{Mode, Scale, ScaleSpan};

/// Lowest configurable fret count
pub const MIN_FRETS: u32 = 1;

/// Highest configurable fret count
pub const MAX_FRETS: u32 = 24;

/// Fret count used when nothing is configured
pub const DEFAULT_FRETS: u32 = 15;

/// Clamp a requested fret count to the supported range
pub fn clamp_fret_count(frets: u32) -> u32 {
    frets.clamp(MIN_FRETS, MAX_FRETS)
}

/// Note sounding at `fret` on a string whose open note is `open`
pub fn note_at_fret(open: Note, fret: u32) -> Note {
    let offset = u64::from(open.pitch_class.index()) + u64::from(fret);
    Note::new(
        open.pitch_class.transpose(fret),
        open.octave.saturating_add((offset / 12) as i32),
    )
}

/// Tuning error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TuningError {
    /// Input is not a note name
    #[error("'{0}' is not a valid note name")]
    InvalidNote(String),
    /// Note name without an octave number in range
    #[error("'{0}' needs an octave from {min} to {max}, e.g. E2", min = MIN_OCTAVE, max = MAX_OCTAVE)]
    InvalidOctave(String),
    /// No string with this identifier
    #[error("string {0} does not exist")]
    UnknownString(u8),
    /// Preset name not in the catalog
    #[error("unknown tuning preset '{0}'")]
    UnknownPreset(String),
}

/// Parse a user-entered note such as "D2" or "E#3".
///
/// Theoretical spellings are accepted with a warning; anything that is not
/// a note name is rejected.
pub fn parse_note_input(raw: &str) -> Result<(Note, Option<NoteWarning>), TuningError> {
    let (name, octave) = Note::split_name(raw);
    let sanitized = sanitize_input(name);
    if let Some(warning) = &sanitized.warning {
        if warning.is_fallback() {
            return Err(TuningError::InvalidNote(raw.trim().to_string()));
        }
    }
    let octave = octave
        .filter(|o| (MIN_OCTAVE..=MAX_OCTAVE).contains(o))
        .ok_or_else(|| TuningError::InvalidOctave(raw.trim().to_string()))?;
    Ok((Note::new(sanitized.pitch_class, octave), sanitized.warning))
}

/// Open note of every string, keyed by string identifier (1 = highest)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tuning {
    strings: BTreeMap<u8, Note>,
}

impl Tuning {
    /// Tuning from a preset
    pub fn from_preset(preset: TuningPreset) -> Self {
        Self {
            strings: preset.strings().collect(),
        }
    }

    /// Tuning from explicit (string, open note) pairs
    pub fn from_strings(strings: impl IntoIterator<Item = (u8, Note)>) -> Self {
        Self {
            strings: strings.into_iter().collect(),
        }
    }

    /// Open note of a string
    pub fn open_note(&self, string: u8) -> Option<Note> {
        self.strings.get(&string).copied()
    }

    /// Note at a fret of a string
    pub fn note_at(&self, string: u8, fret: u32) -> Option<Note> {
        self.open_note(string).map(|open| note_at_fret(open, fret))
    }

    /// String identifiers, ascending
    pub fn string_ids(&self) -> impl Iterator<Item = u8> + '_ {
        self.strings.keys().copied()
    }

    /// (string, open note) pairs, ascending by string
    pub fn strings(&self) -> impl Iterator<Item = (u8, Note)> + '_ {
        self.strings.iter().map(|(&s, &n)| (s, n))
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Replace a string's open note
    pub fn set_string(&mut self, string: u8, note: Note) -> Result<(), TuningError> {
        let slot = self
            .strings
            .get_mut(&string)
            .ok_or(TuningError::UnknownString(string))?;
        info!(string, from = %slot, to = %note, "retuned string");
        *slot = note;
        Ok(())
    }

    /// Retune a string from user input such as "D2".
    ///
    /// On error the tuning is left unchanged.
    pub fn retune(&mut self, string: u8, raw: &str) -> Result<Option<NoteWarning>, TuningError> {
        if !self.strings.contains_key(&string) {
            return Err(TuningError::UnknownString(string));
        }
        let (note, warning) = parse_note_input(raw).map_err(|e| {
            warn!(string, input = raw, "rejected tuning input: {}", e);
            e
        })?;
        if let Some(w) = &warning {
            warn!(string, "{}", w);
        }
        self.set_string(string, note)?;
        Ok(warning)
    }

    /// Replace every string with a preset's open notes
    pub fn apply_preset(&mut self, preset: TuningPreset) {
        info!(preset = %preset, "applied tuning preset");
        self.strings = preset.strings().collect();
    }

    /// Replace every string with a named preset's open notes
    pub fn apply_preset_name(&mut self, name: &str) -> Result<TuningPreset, TuningError> {
        let preset =
            TuningPreset::from_name(name).ok_or_else(|| TuningError::UnknownPreset(name.to_string()))?;
        self.apply_preset(preset);
        Ok(preset)
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self::from_preset(TuningPreset::Standard)
    }
}

/// One (string, fret) position with its note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FretCell {
    pub string: u8,
    pub fret: u32,
    pub note: Note,
}

impl FretCell {
    /// Open string or octave marker (fret 0, 12, 24)
    pub fn is_marker(&self) -> bool {
        self.fret % 12 == 0
    }
}

/// A highlighted cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    pub cell: FretCell,
    /// Same pitch class as the scale root
    pub tonic: bool,
}

/// Everything the display needs after a cell is activated
#[derive(Debug, Clone, PartialEq)]
pub struct ClickResult {
    pub note: Note,
    pub frequency: f64,
    /// `None` when the scale is locked
    pub scale: Option<ScaleView>,
}

/// Scale, readouts and highlights derived from a clicked note
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleView {
    pub scale: Scale,
    pub degrees: Vec<DegreeLabel>,
    pub progressions: Vec<ResolvedProgression>,
    pub highlights: Vec<Highlight>,
}

/// Strings to highlight; an empty selection means string 1
pub fn effective_strings(selected: &[u8]) -> Vec<u8> {
    if selected.is_empty() {
        vec![1]
    } else {
        selected.to_vec()
    }
}

/// A tuned fretboard with a visible fret range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fretboard {
    tuning: Tuning,
    frets: u32,
}

impl Fretboard {
    /// Create a fretboard; the fret count is clamped
    pub fn new(tuning: Tuning, frets: u32) -> Self {
        Self {
            tuning,
            frets: clamp_fret_count(frets),
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn tuning_mut(&mut self) -> &mut Tuning {
        &mut self.tuning
    }

    /// Highest visible fret
    pub fn frets(&self) -> u32 {
        self.frets
    }

    pub fn set_frets(&mut self, frets: u32) {
        self.frets = clamp_fret_count(frets);
    }

    /// Cell at a position, if the string exists and the fret is visible
    pub fn cell(&self, string: u8, fret: u32) -> Option<FretCell> {
        if fret > self.frets {
            return None;
        }
        let note = self.tuning.note_at(string, fret)?;
        Some(FretCell { string, fret, note })
    }

    /// Every visible cell of one string, fret 0 first
    pub fn row(&self, string: u8) -> Vec<FretCell> {
        (0..=self.frets)
            .filter_map(|fret| self.cell(string, fret))
            .collect()
    }

    /// Every visible cell, string 1 first
    pub fn cells(&self) -> Vec<FretCell> {
        self.tuning
            .string_ids()
            .flat_map(|string| self.row(string))
            .collect()
    }

    /// Cells on the selected strings whose note belongs to the scale
    pub fn highlights(&self, scale: &Scale, selected: &[u8]) -> Vec<Highlight> {
        let strings = effective_strings(selected);
        self.cells()
            .into_iter()
            .filter(|cell| strings.contains(&cell.string) && scale.contains(cell.note))
            .map(|cell| Highlight {
                cell,
                tonic: scale.is_tonic(cell.note),
            })
            .collect()
    }

    /// Activate a cell: the clicked note becomes the scale root.
    ///
    /// Returns `None` when the position is not on the board.
    pub fn click(
        &self,
        string: u8,
        fret: u32,
        mode: Mode,
        span: ScaleSpan,
        selected: &[u8],
        locked: bool,
    ) -> Option<ClickResult> {
        let cell = self.cell(string, fret)?;
        let note = cell.note;
        let frequency = note.frequency();

        if locked {
            return Some(ClickResult {
                note,
                frequency,
                scale: None,
            });
        }

        let scale = Scale::new(note, mode, span);
        let degrees = degree_labels(scale.notes(), mode);
        let progressions = progressions_for(scale.notes(), mode);
        let highlights = self.highlights(&scale, selected);

        Some(ClickResult {
            note,
            frequency,
            scale: Some(ScaleView {
                scale,
                degrees,
                progressions,
                highlights,
            }),
        })
    }
}

impl Default for Fretboard {
    fn default() -> Self {
        Self::new(Tuning::default(), DEFAULT_FRETS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::pitch::PitchClass;
    use PitchClass::*;

    #[test]
    fn test_note_at_fret_open() {
        let open = Note::new(E, 2);
        assert_eq!(note_at_fret(open, 0), open);
        assert_eq!(note_at_fret(open, 1), Note::new(F, 2));
        assert_eq!(note_at_fret(open, 8), Note::new(C, 3));
    }

    #[test]
    fn test_note_at_fret_display_form() {
        let note = note_at_fret(Note::new(A, 2), 1);
        assert_eq!(note.pitch_class.display_name(), "A#/Bb");
        assert_eq!(note.octave, 2);
    }

    #[test]
    fn test_note_at_fret_periodic() {
        for open in TuningPreset::HalfStepDown.open_notes() {
            for fret in 0..=24 {
                let low = note_at_fret(open, fret);
                let high = note_at_fret(open, fret + 12);
                assert_eq!(low.pitch_class, high.pitch_class);
                assert_eq!(high.octave, low.octave + 1);
            }
        }
    }

    #[test]
    fn test_note_at_fret_unbounded() {
        assert_eq!(note_at_fret(Note::new(E, 4), 36), Note::new(E, 7));
    }

    #[test]
    fn test_note_at_fret_huge_fret() {
        let note = note_at_fret(Note::new(E, 2), u32::MAX);
        assert_eq!(note.pitch_class, G);
        assert_eq!(note.octave, 2 + ((4 + u64::from(u32::MAX)) / 12) as i32);

        let top = note_at_fret(Note::new(B, i32::MAX), 1);
        assert_eq!(top, Note::new(C, i32::MAX));
    }

    #[test]
    fn test_retune_rejects_out_of_range_octave() {
        let mut board = Fretboard::default();
        let before = board.tuning().clone();
        for raw in ["E200000000", "E10", "E-1", "E99999999999"] {
            assert_eq!(
                board.tuning_mut().retune(6, raw),
                Err(TuningError::InvalidOctave(raw.to_string()))
            );
        }
        assert_eq!(board.tuning(), &before);
        assert_eq!(board.tuning_mut().retune(6, "E0"), Ok(None));
        assert_eq!(board.tuning_mut().retune(1, "E9"), Ok(None));

        let result = board
            .click(1, 15, Mode::Major, ScaleSpan::SingleOctave, &[1], false)
            .unwrap();
        assert!(result.frequency.is_finite());
    }

    #[test]
    fn test_clamp_fret_count() {
        assert_eq!(clamp_fret_count(0), 1);
        assert_eq!(clamp_fret_count(15), 15);
        assert_eq!(clamp_fret_count(99), 24);
    }

    #[test]
    fn test_retune_valid() {
        let mut tuning = Tuning::default();
        assert_eq!(tuning.retune(6, "D2"), Ok(None));
        assert_eq!(tuning.note_at(6, 0), Some(Note::new(D, 2)));
    }

    #[test]
    fn test_retune_flat_is_silent() {
        let mut tuning = Tuning::default();
        assert_eq!(tuning.retune(1, "Eb4"), Ok(None));
        assert_eq!(tuning.open_note(1), Some(Note::new(Ds, 4)));
    }

    #[test]
    fn test_retune_theoretical_warns() {
        let mut tuning = Tuning::default();
        let warning = tuning.retune(5, "B#2").unwrap();
        assert!(matches!(warning, Some(NoteWarning::Theoretical { .. })));
        assert_eq!(tuning.open_note(5), Some(Note::new(C, 2)));
    }

    #[test]
    fn test_retune_invalid_keeps_previous() {
        let mut tuning = Tuning::default();
        let before = tuning.clone();
        assert_eq!(
            tuning.retune(6, "H5"),
            Err(TuningError::InvalidNote("H5".to_string()))
        );
        assert_eq!(tuning, before);

        assert_eq!(
            tuning.retune(6, "D"),
            Err(TuningError::InvalidOctave("D".to_string()))
        );
        assert_eq!(tuning.retune(9, "D2"), Err(TuningError::UnknownString(9)));
        assert_eq!(tuning, before);
    }

    #[test]
    fn test_apply_preset_name() {
        let mut tuning = Tuning::default();
        assert_eq!(tuning.apply_preset_name("open g"), Ok(TuningPreset::OpenG));
        assert_eq!(tuning.open_note(5), Some(Note::new(G, 2)));
        assert!(tuning.apply_preset_name("nope").is_err());
        assert_eq!(tuning.open_note(5), Some(Note::new(G, 2)));
    }

    #[test]
    fn test_cells_cover_board() {
        let board = Fretboard::new(Tuning::default(), 12);
        assert_eq!(board.cells().len(), 6 * 13);
        assert!(board.cell(1, 13).is_none());
        assert!(board.cell(7, 0).is_none());
        assert!(board.cell(1, 12).unwrap().is_marker());
        assert!(!board.cell(1, 5).unwrap().is_marker());
    }

    #[test]
    fn test_cells_match_mapper() {
        let board = Fretboard::default();
        for cell in board.cells() {
            let open = board.tuning().open_note(cell.string).unwrap();
            assert_eq!(cell.note, note_at_fret(open, cell.fret));
        }
    }

    #[test]
    fn test_highlights_respect_selection() {
        let board = Fretboard::default();
        let scale = Scale::new(Note::new(A, 2), Mode::PentatonicMinor, ScaleSpan::AllOctaves);

        let only_six = board.highlights(&scale, &[6]);
        assert!(!only_six.is_empty());
        assert!(only_six.iter().all(|h| h.cell.string == 6));

        let fallback = board.highlights(&scale, &[]);
        assert!(fallback.iter().all(|h| h.cell.string == 1));
    }

    #[test]
    fn test_highlights_tonic() {
        let board = Fretboard::default();
        let scale = Scale::new(Note::new(A, 2), Mode::Minor, ScaleSpan::SingleOctave);
        let highlights = board.highlights(&scale, &[6, 5]);

        // A2 on string 6 fret 5 and string 5 fret 0
        let tonics: Vec<(u8, u32)> = highlights
            .iter()
            .filter(|h| h.tonic)
            .map(|h| (h.cell.string, h.cell.fret))
            .collect();
        assert!(tonics.contains(&(6, 5)));
        assert!(tonics.contains(&(5, 0)));
        assert!(tonics.contains(&(5, 12)));
        assert!(highlights.iter().all(|h| scale.contains(h.cell.note)));
    }

    #[test]
    fn test_click_builds_scale_view() {
        let board = Fretboard::default();
        let result = board
            .click(5, 3, Mode::Major, ScaleSpan::SingleOctave, &[1, 2, 3, 4, 5, 6], false)
            .unwrap();
        assert_eq!(result.note, Note::new(C, 3));
        assert!((result.frequency - 130.8128).abs() < 1e-3);

        let view = result.scale.unwrap();
        assert_eq!(view.degrees[0].chord_text(), "Cmaj");
        assert_eq!(view.progressions[0].labels(), vec!["Cmaj", "Gmaj", "Amin", "Fmaj"]);
        assert!(!view.highlights.is_empty());
    }

    #[test]
    fn test_click_locked() {
        let board = Fretboard::default();
        let result = board
            .click(1, 5, Mode::Major, ScaleSpan::SingleOctave, &[], true)
            .unwrap();
        assert_eq!(result.note, Note::new(A, 4));
        assert_eq!(result.frequency, 440.0);
        assert!(result.scale.is_none());
    }

    #[test]
    fn test_click_off_board() {
        let board = Fretboard::new(Tuning::default(), 5);
        assert!(board
            .click(1, 6, Mode::Major, ScaleSpan::SingleOctave, &[], false)
            .is_none());
    }
}
