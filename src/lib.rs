// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Interactive fretboard engine.
//!
//! Maps tuned strings and frets to notes and frequencies, walks scales from
//! a clicked note, derives degree and chord-progression readouts, and runs a
//! random-note trainer.

pub mod config;
pub mod fretboard;
pub mod music;
pub mod trainer;

pub use fretboard::{note_at_fret, Fretboard, Tuning, TuningError, TuningPreset};
pub use music::{Mode, Note, PitchClass, Scale, ScaleSpan};
