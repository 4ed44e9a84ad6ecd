// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Music theory engine.
//!
//! Pitch classes and frequencies, scale walks, and the chord readouts
//! derived from them. Everything here is a pure function of its inputs.

pub mod harmony;
pub mod pitch;
pub mod scale;

pub use harmony::{
    degree_labels, progressions_for, resolve_progression, roman_to_degree, Chord, ChordQuality,
    DegreeLabel, Progression, ProgressionStep, ResolvedProgression,
};
pub use pitch::{frequency, normalize, sanitize_input, Note, NoteWarning, PitchClass, Sanitized};
pub use scale::{all_octaves_scale, single_octave_scale, Mode, Scale, ScaleSpan};
