// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scale modes and scale walks.
//!
//! A scale is produced by walking a mode's semitone steps from a root note.
//! The single-octave walk is used for degree and chord readouts; the
//! all-octaves walk is used to decide which fretboard positions belong to
//! the scale.

use std::collections::HashSet;
use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::pitch::{Note, PitchClass};

/// Octaves scanned by the all-octaves walk
pub const SCAN_OCTAVES: RangeInclusive<i32> = 1..=7;

/// Scale modes supported by the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    #[default]
    Major, // Ionian
    Minor, // Aeolian
    HarmonicMinor,
    MelodicMinor, // Ascending form
    PentatonicMajor,
    PentatonicMinor,
    Blues,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Locrian,
}

impl Mode {
    /// All modes in menu order
    pub const ALL: [Mode; 12] = [
        Mode::Major,
        Mode::Minor,
        Mode::HarmonicMinor,
        Mode::MelodicMinor,
        Mode::PentatonicMajor,
        Mode::PentatonicMinor,
        Mode::Blues,
        Mode::Dorian,
        Mode::Phrygian,
        Mode::Lydian,
        Mode::Mixolydian,
        Mode::Locrian,
    ];

    /// Semitone steps between consecutive degrees, summing to 12
    pub fn steps(self) -> &'static [u8] {
        match self {
            Mode::Major => &[2, 2, 1, 2, 2, 2, 1],
            Mode::Minor => &[2, 1, 2, 2, 1, 2, 2],
            Mode::HarmonicMinor => &[2, 1, 2, 2, 1, 3, 1],
            Mode::MelodicMinor => &[2, 1, 2, 2, 2, 2, 1],
            Mode::PentatonicMajor => &[2, 2, 3, 2, 3],
            Mode::PentatonicMinor => &[3, 2, 2, 3, 2],
            Mode::Blues => &[3, 2, 1, 1, 3, 2],
            Mode::Dorian => &[2, 1, 2, 2, 2, 1, 2],
            Mode::Phrygian => &[1, 2, 2, 2, 1, 2, 2],
            Mode::Lydian => &[2, 2, 2, 1, 2, 2, 1],
            Mode::Mixolydian => &[2, 2, 1, 2, 2, 1, 2],
            Mode::Locrian => &[1, 2, 2, 1, 2, 2, 2],
        }
    }

    /// Number of distinct degrees in the mode
    pub fn degree_count(self) -> usize {
        self.steps().len()
    }

    /// Parse a mode name ("harmonicMinor", "harmonic minor", "aeolian", ...)
    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase().replace([' ', '-', '_'], "");
        match s.as_str() {
            "major" | "ionian" => Some(Mode::Major),
            "minor" | "naturalminor" | "aeolian" => Some(Mode::Minor),
            "harmonicminor" => Some(Mode::HarmonicMinor),
            "melodicminor" => Some(Mode::MelodicMinor),
            "pentatonicmajor" | "majorpentatonic" => Some(Mode::PentatonicMajor),
            "pentatonicminor" | "minorpentatonic" => Some(Mode::PentatonicMinor),
            "blues" => Some(Mode::Blues),
            "dorian" => Some(Mode::Dorian),
            "phrygian" => Some(Mode::Phrygian),
            "lydian" => Some(Mode::Lydian),
            "mixolydian" => Some(Mode::Mixolydian),
            "locrian" => Some(Mode::Locrian),
            _ => None,
        }
    }

    /// Parse a mode name, falling back to major
    pub fn resolve(s: &str) -> Self {
        Mode::from_name(s).unwrap_or_else(|| {
            debug!(mode = s, "unrecognized mode, using major");
            Mode::Major
        })
    }

    /// Identifier used in settings files
    pub fn key(self) -> &'static str {
        match self {
            Mode::Major => "major",
            Mode::Minor => "minor",
            Mode::HarmonicMinor => "harmonicMinor",
            Mode::MelodicMinor => "melodicMinor",
            Mode::PentatonicMajor => "pentatonicMajor",
            Mode::PentatonicMinor => "pentatonicMinor",
            Mode::Blues => "blues",
            Mode::Dorian => "dorian",
            Mode::Phrygian => "phrygian",
            Mode::Lydian => "lydian",
            Mode::Mixolydian => "mixolydian",
            Mode::Locrian => "locrian",
        }
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            Mode::Major => "Major",
            Mode::Minor => "Natural Minor",
            Mode::HarmonicMinor => "Harmonic Minor",
            Mode::MelodicMinor => "Melodic Minor",
            Mode::PentatonicMajor => "Major Pentatonic",
            Mode::PentatonicMinor => "Minor Pentatonic",
            Mode::Blues => "Blues",
            Mode::Dorian => "Dorian",
            Mode::Phrygian => "Phrygian",
            Mode::Lydian => "Lydian",
            Mode::Mixolydian => "Mixolydian",
            Mode::Locrian => "Locrian",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Walk the mode's steps once from `start`, pushing every note onto `out`
fn walk(start: Note, mode: Mode, out: &mut Vec<Note>) {
    let mut index = start.pitch_class.index() as u32;
    let mut octave = start.octave;
    out.push(start);

    for &step in mode.steps() {
        index += step as u32;
        if index >= 12 {
            index -= 12;
            octave = octave.saturating_add(1);
        }
        out.push(Note::new(PitchClass::from_index(index), octave));
    }
}

/// One ascending pass from the root: `steps + 1` notes ending on the octave
pub fn single_octave_scale(root: Note, mode: Mode) -> Vec<Note> {
    let mut notes = Vec::with_capacity(mode.degree_count() + 1);
    walk(root, mode, &mut notes);
    notes
}

/// One pass from every occurrence of `root` in octaves 1 through 7.
///
/// Runs are concatenated in scan order and are not deduplicated.
pub fn all_octaves_scale(root: PitchClass, mode: Mode) -> Vec<Note> {
    let mut notes = Vec::with_capacity(SCAN_OCTAVES.count() * (mode.degree_count() + 1));
    for octave in SCAN_OCTAVES {
        for pitch_class in PitchClass::ALL {
            if pitch_class == root {
                walk(Note::new(pitch_class, octave), mode, &mut notes);
            }
        }
    }
    notes
}

/// How far a scale is walked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleSpan {
    /// A single pass from the clicked octave
    #[default]
    SingleOctave,
    /// Every occurrence of the root in the scanned octaves
    AllOctaves,
}

/// A walked scale with a membership index
#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    root: Note,
    mode: Mode,
    span: ScaleSpan,
    notes: Vec<Note>,
    members: HashSet<Note>,
}

impl Scale {
    /// Walk a scale from root and mode
    pub fn new(root: Note, mode: Mode, span: ScaleSpan) -> Self {
        let notes = match span {
            ScaleSpan::SingleOctave => single_octave_scale(root, mode),
            ScaleSpan::AllOctaves => all_octaves_scale(root.pitch_class, mode),
        };
        let members = notes.iter().copied().collect();

        Self {
            root,
            mode,
            span,
            notes,
            members,
        }
    }

    /// Parse a scale from a note name and a mode name (e.g., "Db", 3, "dorian")
    pub fn parse(root_name: &str, octave: i32, mode_name: &str, span: ScaleSpan) -> Self {
        let root = Note::new(super::pitch::normalize(root_name), octave);
        Scale::new(root, Mode::resolve(mode_name), span)
    }

    /// Get the root note
    pub fn root(&self) -> Note {
        self.root
    }

    /// Get the mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Get the span
    pub fn span(&self) -> ScaleSpan {
        self.span
    }

    /// Notes in walk order, duplicates included
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Get the number of walked notes
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Whether a (pitch class, octave) pair belongs to the scale
    pub fn contains(&self, note: Note) -> bool {
        self.members.contains(&note)
    }

    /// Whether a note has the root's pitch class
    pub fn is_tonic(&self, note: Note) -> bool {
        note.pitch_class == self.root.pitch_class
    }

    /// Get the scale degree (1-based) of a pitch class, if it's in the scale
    pub fn degree_of(&self, pitch_class: PitchClass) -> Option<usize> {
        self.notes
            .iter()
            .take(self.mode.degree_count())
            .position(|n| n.pitch_class == pitch_class)
            .map(|i| i + 1)
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.root.pitch_class, self.mode)
    }
}
