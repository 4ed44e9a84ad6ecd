// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Named six-string tuning presets.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::music::pitch::{Note, PitchClass};

use PitchClass::*;

/// Built-in tunings, listed low string (6) to high string (1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TuningPreset {
    #[default]
    Standard,
    DropD,
    OpenG,
    OpenD,
    Dadgad,
    HalfStepDown,
}

impl TuningPreset {
    pub const ALL: [TuningPreset; 6] = [
        TuningPreset::Standard,
        TuningPreset::DropD,
        TuningPreset::OpenG,
        TuningPreset::OpenD,
        TuningPreset::Dadgad,
        TuningPreset::HalfStepDown,
    ];

    /// Open notes from string 6 down to string 1
    pub fn open_notes(self) -> [Note; 6] {
        let table: [(PitchClass, i32); 6] = match self {
            TuningPreset::Standard => [(E, 2), (A, 2), (D, 3), (G, 3), (B, 3), (E, 4)],
            TuningPreset::DropD => [(D, 2), (A, 2), (D, 3), (G, 3), (B, 3), (E, 4)],
            TuningPreset::OpenG => [(D, 2), (G, 2), (D, 3), (G, 3), (B, 3), (D, 4)],
            TuningPreset::OpenD => [(D, 2), (A, 2), (D, 3), (Fs, 3), (A, 3), (D, 4)],
            TuningPreset::Dadgad => [(D, 2), (A, 2), (D, 3), (G, 3), (A, 3), (D, 4)],
            TuningPreset::HalfStepDown => [(Ds, 2), (Gs, 2), (Cs, 3), (Fs, 3), (As, 3), (Ds, 4)],
        };
        table.map(|(pitch_class, octave)| Note::new(pitch_class, octave))
    }

    /// (string id, open note) pairs, string 6 first
    pub fn strings(self) -> impl Iterator<Item = (u8, Note)> {
        self.open_notes()
            .into_iter()
            .enumerate()
            .map(|(i, note)| (6 - i as u8, note))
    }

    /// Parse a preset name ("drop d", "DADGAD", "half_step_down", ...)
    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase().replace([' ', '-', '_'], "");
        match s.as_str() {
            "standard" | "eadgbe" => Some(TuningPreset::Standard),
            "dropd" => Some(TuningPreset::DropD),
            "openg" => Some(TuningPreset::OpenG),
            "opend" => Some(TuningPreset::OpenD),
            "dadgad" => Some(TuningPreset::Dadgad),
            "halfstepdown" | "ebstandard" => Some(TuningPreset::HalfStepDown),
            _ => None,
        }
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            TuningPreset::Standard => "Standard",
            TuningPreset::DropD => "Drop D",
            TuningPreset::OpenG => "Open G",
            TuningPreset::OpenD => "Open D",
            TuningPreset::Dadgad => "DADGAD",
            TuningPreset::HalfStepDown => "Half Step Down",
        }
    }
}

impl fmt::Display for TuningPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
