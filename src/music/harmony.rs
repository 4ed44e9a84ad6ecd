// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Diatonic chords, degree readouts and chord progressions.
//!
//! Chord labels are derived from the first seven notes of a walked scale
//! and the mode's chord-quality table. Modes without harmonic data
//! (pentatonics, blues) produce blank labels.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::pitch::{Note, PitchClass};
use super::scale::Mode;

/// Number of degree slots in the readout
pub const DEGREE_SLOTS: usize = 7;

/// Maximum chords shown per progression row
pub const MAX_CHORDS_PER_ROW: usize = 4;

/// Placeholder shown for a progression step that cannot be resolved
pub const UNRESOLVED: &str = "?";

/// Triad qualities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChordQuality {
    Maj,
    Min,
    Dim,
    Aug,
}

impl ChordQuality {
    /// Label suffix ("maj", "min", ...)
    pub fn suffix(self) -> &'static str {
        match self {
            ChordQuality::Maj => "maj",
            ChordQuality::Min => "min",
            ChordQuality::Dim => "dim",
            ChordQuality::Aug => "aug",
        }
    }
}

impl fmt::Display for ChordQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

use ChordQuality::{Aug, Dim, Maj, Min};

/// A named sequence of roman-numeral degree references
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progression {
    pub name: &'static str,
    pub steps: &'static [&'static str],
}

const fn progression(name: &'static str, steps: &'static [&'static str]) -> Progression {
    Progression { name, steps }
}

const MAJOR_PROGRESSIONS: &[Progression] = &[
    progression("I–V–vi–IV", &["I", "V", "vi", "IV"]),
    progression("ii–V–I", &["ii", "V", "I"]),
    progression("I–vi–IV–V", &["I", "vi", "IV", "V"]),
    progression("I–IV–V", &["I", "IV", "V"]),
];

const MINOR_PROGRESSIONS: &[Progression] = &[
    progression("i–iv–v–i", &["i", "iv", "v", "i"]),
    progression("i–VI–III–VII", &["i", "VI", "III", "VII"]),
    progression("ii°–V–i", &["ii°", "V", "i"]),
];

const HARMONIC_MINOR_PROGRESSIONS: &[Progression] = &[
    progression("i–iv–V", &["i", "iv", "V"]),
    progression("i–VI–III–VII", &["i", "VI", "III", "VII"]),
];

const MELODIC_MINOR_PROGRESSIONS: &[Progression] = &[progression("i–II–V", &["i", "II", "V"])];

const DORIAN_PROGRESSIONS: &[Progression] = &[
    progression("i–IV–v", &["i", "IV", "v"]),
    progression("i–VII–IV", &["i", "VII", "IV"]),
];

const PHRYGIAN_PROGRESSIONS: &[Progression] = &[progression("i–II–v", &["i", "II", "v"])];

const LYDIAN_PROGRESSIONS: &[Progression] = &[progression("I–II–V", &["I", "II", "V"])];

const MIXOLYDIAN_PROGRESSIONS: &[Progression] = &[progression("I–VII–IV", &["I", "VII", "IV"])];

const LOCRIAN_PROGRESSIONS: &[Progression] = &[progression("i°–VII–v", &["i°", "VII", "v"])];

impl Mode {
    /// Triad quality on each of the seven degrees; empty for modes without
    /// harmonic data
    pub fn chord_qualities(self) -> &'static [ChordQuality] {
        match self {
            Mode::Major => &[Maj, Min, Min, Maj, Maj, Min, Dim],
            Mode::Minor => &[Min, Dim, Maj, Min, Min, Maj, Maj],
            Mode::HarmonicMinor => &[Min, Dim, Aug, Min, Maj, Maj, Dim],
            Mode::MelodicMinor => &[Min, Min, Aug, Maj, Maj, Dim, Dim],
            Mode::PentatonicMajor | Mode::PentatonicMinor | Mode::Blues => &[],
            Mode::Dorian => &[Min, Min, Maj, Maj, Min, Dim, Maj],
            Mode::Phrygian => &[Min, Maj, Maj, Min, Dim, Maj, Min],
            Mode::Lydian => &[Maj, Maj, Min, Dim, Maj, Min, Min],
            Mode::Mixolydian => &[Maj, Min, Dim, Maj, Min, Min, Maj],
            Mode::Locrian => &[Dim, Maj, Min, Min, Maj, Maj, Min],
        }
    }

    /// Whether the mode carries chord data
    pub fn has_harmony(self) -> bool {
        !self.chord_qualities().is_empty()
    }

    /// Named progressions for this mode, falling back to the major catalog
    pub fn progressions(self) -> &'static [Progression] {
        match self {
            Mode::Major => MAJOR_PROGRESSIONS,
            Mode::Minor => MINOR_PROGRESSIONS,
            Mode::HarmonicMinor => HARMONIC_MINOR_PROGRESSIONS,
            Mode::MelodicMinor => MELODIC_MINOR_PROGRESSIONS,
            Mode::Dorian => DORIAN_PROGRESSIONS,
            Mode::Phrygian => PHRYGIAN_PROGRESSIONS,
            Mode::Lydian => LYDIAN_PROGRESSIONS,
            Mode::Mixolydian => MIXOLYDIAN_PROGRESSIONS,
            Mode::Locrian => LOCRIAN_PROGRESSIONS,
            Mode::PentatonicMajor | Mode::PentatonicMinor | Mode::Blues => MAJOR_PROGRESSIONS,
        }
    }
}

/// A triad on a root pitch class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chord {
    pub root: PitchClass,
    pub quality: ChordQuality,
}

impl Chord {
    pub fn new(root: PitchClass, quality: ChordQuality) -> Self {
        Self { root, quality }
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root, self.quality)
    }
}

/// Resolve a roman numeral ("IV", "vi", "ii°") to a 0-based degree index.
///
/// Case and a trailing diminished mark are ignored.
pub fn roman_to_degree(numeral: &str) -> Option<usize> {
    let letters = numeral.trim().trim_end_matches('°').to_lowercase();
    match letters.as_str() {
        "i" => Some(0),
        "ii" => Some(1),
        "iii" => Some(2),
        "iv" => Some(3),
        "v" => Some(4),
        "vi" => Some(5),
        "vii" => Some(6),
        _ => None,
    }
}

/// Chord built on a 0-based degree of a walked scale
fn chord_at(notes: &[Note], qualities: &[ChordQuality], index: usize) -> Option<Chord> {
    let note = notes.get(index)?;
    let quality = qualities.get(index)?;
    Some(Chord::new(note.pitch_class, *quality))
}

/// One slot of the degree readout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DegreeLabel {
    /// 1-based degree
    pub degree: usize,
    pub note: Option<Note>,
    pub chord: Option<Chord>,
}

impl DegreeLabel {
    /// Note text, blank when the degree is missing
    pub fn note_text(&self) -> String {
        self.note
            .map(|n| n.pitch_class.to_string())
            .unwrap_or_default()
    }

    /// Chord text, blank when the degree or its quality is missing
    pub fn chord_text(&self) -> String {
        self.chord.map(|c| c.to_string()).unwrap_or_default()
    }
}

/// Pair each of the seven degree slots with its note and chord label
pub fn degree_labels(notes: &[Note], mode: Mode) -> Vec<DegreeLabel> {
    let qualities = mode.chord_qualities();
    (0..DEGREE_SLOTS)
        .map(|i| {
            let note = notes.get(i).copied();
            let chord = note.and_then(|_| chord_at(notes, qualities, i));
            DegreeLabel {
                degree: i + 1,
                note,
                chord,
            }
        })
        .collect()
}

/// One step of a resolved progression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressionStep {
    Chord(Chord),
    Unresolved,
}

impl fmt::Display for ProgressionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressionStep::Chord(chord) => write!(f, "{}", chord),
            ProgressionStep::Unresolved => f.write_str(UNRESOLVED),
        }
    }
}

/// A progression with its steps resolved against a scale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProgression {
    pub name: &'static str,
    pub steps: Vec<ProgressionStep>,
}

impl ResolvedProgression {
    /// Row of exactly [`MAX_CHORDS_PER_ROW`] cells, blank-padded
    pub fn row(&self) -> Vec<String> {
        let mut cells: Vec<String> = self.steps.iter().map(|s| s.to_string()).collect();
        cells.resize(MAX_CHORDS_PER_ROW, String::new());
        cells
    }

    /// Chord labels only
    pub fn labels(&self) -> Vec<String> {
        self.steps.iter().map(|s| s.to_string()).collect()
    }
}

/// Resolve one progression against a walked scale.
///
/// Unknown numerals, missing degrees and missing qualities become
/// [`ProgressionStep::Unresolved`].
pub fn resolve_progression(
    progression: &Progression,
    notes: &[Note],
    mode: Mode,
) -> ResolvedProgression {
    let qualities = mode.chord_qualities();
    let steps = progression
        .steps
        .iter()
        .take(MAX_CHORDS_PER_ROW)
        .map(|numeral| {
            roman_to_degree(numeral)
                .and_then(|index| chord_at(notes, qualities, index))
                .map(ProgressionStep::Chord)
                .unwrap_or_else(|| {
                    debug!(numeral, mode = mode.key(), "unresolved progression step");
                    ProgressionStep::Unresolved
                })
        })
        .collect();

    ResolvedProgression {
        name: progression.name,
        steps,
    }
}

/// Resolve the mode's whole progression catalog against a walked scale
pub fn progressions_for(notes: &[Note], mode: Mode) -> Vec<ResolvedProgression> {
    mode.progressions()
        .iter()
        .map(|p| resolve_progression(p, notes, mode))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::scale::single_octave_scale;

    fn c_major() -> Vec<Note> {
        single_octave_scale(Note::new(PitchClass::C, 3), Mode::Major)
    }

    #[test]
    fn test_major_qualities() {
        assert_eq!(
            Mode::Major.chord_qualities(),
            &[Maj, Min, Min, Maj, Maj, Min, Dim]
        );
    }

    #[test]
    fn test_seven_qualities_or_none() {
        for mode in Mode::ALL {
            let len = mode.chord_qualities().len();
            assert!(len == 7 || len == 0, "{}", mode);
            assert_eq!(mode.has_harmony(), mode.degree_count() == 7, "{}", mode);
        }
    }

    #[test]
    fn test_degree_labels_c_major() {
        let labels = degree_labels(&c_major(), Mode::Major);
        assert_eq!(labels.len(), 7);
        assert_eq!(labels[0].note_text(), "C");
        assert_eq!(labels[0].chord_text(), "Cmaj");
        assert_eq!(labels[5].chord_text(), "Amin");
        assert_eq!(labels[6].chord_text(), "Bdim");
    }

    #[test]
    fn test_degree_labels_pentatonic_blank() {
        let notes = single_octave_scale(Note::new(PitchClass::A, 2), Mode::PentatonicMinor);
        let labels = degree_labels(&notes, Mode::PentatonicMinor);
        assert_eq!(labels.len(), 7);
        assert_eq!(labels[0].note_text(), "A");
        assert!(labels.iter().all(|l| l.chord_text().is_empty()));
        // six walked notes: degree 7 has no note
        assert_eq!(labels[5].note_text(), "A");
        assert_eq!(labels[6].note_text(), "");
    }

    #[test]
    fn test_roman_to_degree() {
        assert_eq!(roman_to_degree("I"), Some(0));
        assert_eq!(roman_to_degree("i"), Some(0));
        assert_eq!(roman_to_degree("i°"), Some(0));
        assert_eq!(roman_to_degree("ii°"), Some(1));
        assert_eq!(roman_to_degree("III"), Some(2));
        assert_eq!(roman_to_degree("iv"), Some(3));
        assert_eq!(roman_to_degree("VI"), Some(5));
        assert_eq!(roman_to_degree("VII"), Some(6));
        assert_eq!(roman_to_degree("VIII"), None);
        assert_eq!(roman_to_degree("X"), None);
    }

    #[test]
    fn test_resolve_pop_progression() {
        let resolved = resolve_progression(&MAJOR_PROGRESSIONS[0], &c_major(), Mode::Major);
        assert_eq!(resolved.name, "I–V–vi–IV");
        assert_eq!(resolved.labels(), vec!["Cmaj", "Gmaj", "Amin", "Fmaj"]);
    }

    #[test]
    fn test_resolve_row_padding() {
        let resolved = resolve_progression(&MAJOR_PROGRESSIONS[1], &c_major(), Mode::Major);
        assert_eq!(resolved.row(), vec!["Dmin", "Gmaj", "Cmaj", ""]);
    }

    #[test]
    fn test_unresolvable_numeral() {
        let bogus = Progression {
            name: "I–X",
            steps: &["I", "X"],
        };
        let resolved = resolve_progression(&bogus, &c_major(), Mode::Major);
        assert_eq!(resolved.labels(), vec!["Cmaj", "?"]);
    }

    #[test]
    fn test_missing_degree_is_placeholder() {
        let notes = vec![Note::new(PitchClass::C, 3)];
        let resolved = resolve_progression(&MAJOR_PROGRESSIONS[0], &notes, Mode::Major);
        assert_eq!(resolved.labels(), vec!["Cmaj", "?", "?", "?"]);
    }

    #[test]
    fn test_progression_cap() {
        let long = Progression {
            name: "long",
            steps: &["I", "ii", "iii", "IV", "V"],
        };
        let resolved = resolve_progression(&long, &c_major(), Mode::Major);
        assert_eq!(resolved.steps.len(), MAX_CHORDS_PER_ROW);
    }

    #[test]
    fn test_progression_fallback_to_major() {
        assert_eq!(Mode::Blues.progressions(), MAJOR_PROGRESSIONS);
        assert_eq!(Mode::Minor.progressions().len(), 3);

        let notes = single_octave_scale(Note::new(PitchClass::A, 2), Mode::Blues);
        let rows = progressions_for(&notes, Mode::Blues);
        assert_eq!(rows.len(), MAJOR_PROGRESSIONS.len());
        assert!(rows[0].steps.iter().all(|s| *s == ProgressionStep::Unresolved));
    }

    #[test]
    fn test_minor_progression() {
        let notes = single_octave_scale(Note::new(PitchClass::A, 2), Mode::Minor);
        let rows = progressions_for(&notes, Mode::Minor);
        assert_eq!(rows[1].labels(), vec!["Amin", "Fmaj", "Cmaj", "Gmaj"]);
        assert_eq!(rows[2].labels(), vec!["Bdim", "Emin", "Amin"]);
    }
}
