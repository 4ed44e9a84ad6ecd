// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pitch classes, notes and equal-tempered frequencies.
//!
//! Every note name that enters the engine goes through [`normalize`] (for
//! programmatic input) or [`sanitize_input`] (for names typed by a person).
//! Both collapse dual display names such as `"A#/Bb"` and enharmonic
//! spellings onto the sharp-based canonical pitch class.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Reference pitch for A4 in Hz
pub const A4_FREQUENCY: f64 = 440.0;

/// Lowest octave accepted from user input
pub const MIN_OCTAVE: i32 = 0;

/// Highest octave accepted from user input
pub const MAX_OCTAVE: i32 = 9;

/// Absolute chromatic index of A4 (`9 + 12 * 4`)
pub const A4_INDEX: i32 = 57;

/// One of the twelve semitone classes, sharp-named
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PitchClass {
    C,
    Cs, // C# / Db
    D,
    Ds, // D# / Eb
    E,
    F,
    Fs, // F# / Gb
    G,
    Gs, // G# / Ab
    A,
    As, // A# / Bb
    B,
}

impl PitchClass {
    /// All pitch classes in chromatic order
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::Cs,
        PitchClass::D,
        PitchClass::Ds,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Fs,
        PitchClass::G,
        PitchClass::Gs,
        PitchClass::A,
        PitchClass::As,
        PitchClass::B,
    ];

    /// Chromatic index (0-11)
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Pitch class for a chromatic index, wrapping modulo 12
    pub fn from_index(index: u32) -> Self {
        PitchClass::ALL[(index % 12) as usize]
    }

    /// Canonical single name, sharps preferred ("C#")
    pub fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::Cs => "C#",
            PitchClass::D => "D",
            PitchClass::Ds => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Fs => "F#",
            PitchClass::G => "G",
            PitchClass::Gs => "G#",
            PitchClass::A => "A",
            PitchClass::As => "A#",
            PitchClass::B => "B",
        }
    }

    /// Display name, listing both spellings for black keys ("C#/Db")
    pub fn display_name(self) -> &'static str {
        match self {
            PitchClass::Cs => "C#/Db",
            PitchClass::Ds => "D#/Eb",
            PitchClass::Fs => "F#/Gb",
            PitchClass::Gs => "G#/Ab",
            PitchClass::As => "A#/Bb",
            natural => natural.name(),
        }
    }

    /// Transpose upward by semitones
    pub fn transpose(self, semitones: u32) -> Self {
        PitchClass::from_index(self.index() as u32 + semitones % 12)
    }

    /// Classify a spelling without falling back
    pub fn lookup(name: &str) -> Option<(Self, Spelling)> {
        let first = name.split('/').next().unwrap_or_default().trim();
        let upper = first.to_uppercase();
        let found = match upper.as_str() {
            "C" => (PitchClass::C, Spelling::Canonical),
            "C#" => (PitchClass::Cs, Spelling::Canonical),
            "D" => (PitchClass::D, Spelling::Canonical),
            "D#" => (PitchClass::Ds, Spelling::Canonical),
            "E" => (PitchClass::E, Spelling::Canonical),
            "F" => (PitchClass::F, Spelling::Canonical),
            "F#" => (PitchClass::Fs, Spelling::Canonical),
            "G" => (PitchClass::G, Spelling::Canonical),
            "G#" => (PitchClass::Gs, Spelling::Canonical),
            "A" => (PitchClass::A, Spelling::Canonical),
            "A#" => (PitchClass::As, Spelling::Canonical),
            "B" => (PitchClass::B, Spelling::Canonical),

            "DB" => (PitchClass::Cs, Spelling::Flat),
            "EB" => (PitchClass::Ds, Spelling::Flat),
            "GB" => (PitchClass::Fs, Spelling::Flat),
            "AB" => (PitchClass::Gs, Spelling::Flat),
            "BB" => (PitchClass::As, Spelling::Flat),

            "CB" => (PitchClass::B, Spelling::Theoretical),
            "FB" => (PitchClass::E, Spelling::Theoretical),
            "E#" => (PitchClass::F, Spelling::Theoretical),
            "B#" => (PitchClass::C, Spelling::Theoretical),

            _ => return None,
        };
        Some(found)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a recognized note name was spelled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spelling {
    /// Natural or sharp name, already canonical
    Canonical,
    /// Common flat spelling (Db, Eb, Gb, Ab, Bb)
    Flat,
    /// Theoretical spelling landing on a white key (E#, B#, Cb, Fb)
    Theoretical,
}

/// Collapse any note name to its canonical pitch class.
///
/// Unrecognized names fall back to C.
pub fn normalize(name: &str) -> PitchClass {
    match PitchClass::lookup(name) {
        Some((pitch_class, _)) => pitch_class,
        None => {
            debug!(name, "unrecognized note name, falling back to C");
            PitchClass::C
        }
    }
}

/// Advisory produced while sanitizing a user-entered note name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteWarning {
    /// Theoretical spelling accepted after conversion
    Theoretical { input: String, resolved: PitchClass },
    /// Not a note name; replaced by C
    Unrecognized { input: String },
}

impl NoteWarning {
    /// Whether the input was rejected and replaced by the fallback
    pub fn is_fallback(&self) -> bool {
        matches!(self, NoteWarning::Unrecognized { .. })
    }
}

impl fmt::Display for NoteWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteWarning::Theoretical { input, resolved } => {
                write!(f, "'{}' is a theoretical spelling, using {}", input, resolved)
            }
            NoteWarning::Unrecognized { input } => {
                write!(f, "'{}' is not a note name, using C", input)
            }
        }
    }
}

/// Result of [`sanitize_input`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitized {
    pub pitch_class: PitchClass,
    pub warning: Option<NoteWarning>,
}

/// Sanitize a note name supplied by a person.
///
/// Flats convert silently, theoretical spellings convert with a warning, and
/// anything else becomes C with a fallback warning.
pub fn sanitize_input(raw: &str) -> Sanitized {
    let input = raw.trim();
    match PitchClass::lookup(input) {
        Some((pitch_class, Spelling::Theoretical)) => Sanitized {
            pitch_class,
            warning: Some(NoteWarning::Theoretical {
                input: input.to_string(),
                resolved: pitch_class,
            }),
        },
        Some((pitch_class, _)) => Sanitized {
            pitch_class,
            warning: None,
        },
        None => Sanitized {
            pitch_class: PitchClass::C,
            warning: Some(NoteWarning::Unrecognized {
                input: input.to_string(),
            }),
        },
    }
}

/// Equal-tempered frequency with A4 = 440 Hz
pub fn frequency(pitch_class: PitchClass, octave: i32) -> f64 {
    let index = Note::new(pitch_class, octave).absolute_index();
    A4_FREQUENCY * 2f64.powf((index - i64::from(A4_INDEX)) as f64 / 12.0)
}

/// A pitch class at a specific octave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Note {
    pub pitch_class: PitchClass,
    pub octave: i32,
}

impl Note {
    /// Create a new note
    pub fn new(pitch_class: PitchClass, octave: i32) -> Self {
        Self {
            pitch_class,
            octave,
        }
    }

    /// Absolute chromatic index (`pitch class + 12 * octave`)
    pub fn absolute_index(self) -> i64 {
        i64::from(self.pitch_class.index()) + 12 * i64::from(self.octave)
    }

    /// Frequency of this note in Hz
    pub fn frequency(self) -> f64 {
        frequency(self.pitch_class, self.octave)
    }

    /// Display form, e.g. "C#/Db3"
    pub fn display_name(self) -> String {
        format!("{}{}", self.pitch_class.display_name(), self.octave)
    }

    /// Split "E#3" into ("E#", Some(3)). Returns `None` for the octave when
    /// the trailing part is missing or not a number.
    pub fn split_name(text: &str) -> (&str, Option<i32>) {
        let text = text.trim();
        let split_at = text
            .char_indices()
            .find(|&(i, c)| c.is_ascii_digit() || (c == '-' && i > 0))
            .map(|(i, _)| i)
            .unwrap_or(text.len());
        let (name, octave) = text.split_at(split_at);
        (name, octave.parse().ok())
    }
}

impl Ord for Note {
    fn cmp(&self, other: &Self) -> Ordering {
        self.octave
            .cmp(&other.octave)
            .then(self.pitch_class.cmp(&other.pitch_class))
    }
}

impl PartialOrd for Note {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch_class, self.octave)
    }
}
