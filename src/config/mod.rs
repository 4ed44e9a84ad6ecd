// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration system for the fretboard.
//!
//! This module provides the settings file: tuning (preset plus per-string
//! overrides), visible fret count, scale display options and trainer
//! timing. Files are YAML unless the extension is `.toml`.

pub mod watcher;

pub use watcher::{validate_config, SettingsEvent, SettingsWatcher};

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::fretboard::{clamp_fret_count, Fretboard, Tuning, TuningPreset, DEFAULT_FRETS};
use crate::music::pitch::NoteWarning;
use crate::music::scale::{Mode, ScaleSpan};
use crate::trainer::TrainerSettings;

/// Root of a settings file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FretboardFile {
    /// Highest visible fret (clamped to 1-24)
    #[serde(default = "default_fret_count")]
    pub fret_count: u32,
    /// Tuning of the strings
    #[serde(default)]
    pub tuning: TuningConfig,
    /// Scale highlight options
    #[serde(default)]
    pub scale: ScaleConfig,
    /// Note trainer options
    #[serde(default)]
    pub trainer: TrainerConfig,
}

fn default_fret_count() -> u32 {
    DEFAULT_FRETS
}

fn all_strings() -> Vec<u8> {
    vec![1, 2, 3, 4, 5, 6]
}

impl Default for FretboardFile {
    fn default() -> Self {
        Self {
            fret_count: default_fret_count(),
            tuning: TuningConfig::default(),
            scale: ScaleConfig::default(),
            trainer: TrainerConfig::default(),
        }
    }
}

impl FretboardFile {
    /// Load settings from a YAML or TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        if is_toml(path) {
            Self::from_toml(&contents)
        } else {
            Self::from_yaml(&contents)
        }
    }

    /// Parse settings from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")
    }

    /// Parse settings from a TOML string
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse TOML configuration")
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).context("Failed to serialize configuration to TOML")
    }

    /// Save settings, format chosen by extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let text = if is_toml(path) {
            self.to_toml()?
        } else {
            self.to_yaml()?
        };
        fs::write(path, text).with_context(|| format!("Failed to write config file: {:?}", path))
    }

    /// Build the tuning: preset first, then per-string overrides.
    ///
    /// Returns advisory warnings for theoretical spellings.
    pub fn build_tuning(&self) -> Result<(Tuning, Vec<NoteWarning>)> {
        let preset = match &self.tuning.preset {
            Some(name) => TuningPreset::from_name(name)
                .ok_or_else(|| anyhow!("Unknown tuning preset: {}", name))?,
            None => TuningPreset::Standard,
        };

        let mut tuning = Tuning::from_preset(preset);
        let mut warnings = Vec::new();
        for (key, raw) in &self.tuning.strings {
            let string: u8 = key
                .trim()
                .parse()
                .with_context(|| format!("Invalid string number: {}", key))?;
            let warning = tuning
                .retune(string, raw)
                .with_context(|| format!("Invalid tuning for string {}", string))?;
            warnings.extend(warning);
        }
        Ok((tuning, warnings))
    }

    /// Build the fretboard with the configured tuning and fret count
    pub fn build_fretboard(&self) -> Result<(Fretboard, Vec<NoteWarning>)> {
        let (tuning, warnings) = self.build_tuning()?;
        Ok((Fretboard::new(tuning, self.fret_count), warnings))
    }

    /// Fret count after clamping
    pub fn frets(&self) -> u32 {
        clamp_fret_count(self.fret_count)
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"))
}

/// Tuning section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TuningConfig {
    /// Preset name (e.g., "standard", "drop d")
    #[serde(default)]
    pub preset: Option<String>,
    /// Per-string overrides, string id to note (e.g., 6: "D2")
    #[serde(default)]
    pub strings: BTreeMap<String, String>,
}

/// Scale section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScaleConfig {
    /// Mode name (unrecognized names mean major)
    #[serde(default = "default_mode")]
    pub mode: String,
    /// Highlight the scale across all octaves
    #[serde(default)]
    pub full: bool,
    /// Keep the current highlight when a cell is clicked
    #[serde(default)]
    pub lock: bool,
    /// Strings to highlight
    #[serde(default = "all_strings")]
    pub strings: Vec<u8>,
}

fn default_mode() -> String {
    "major".to_string()
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            full: false,
            lock: false,
            strings: all_strings(),
        }
    }
}

impl ScaleConfig {
    /// Resolved mode
    pub fn mode(&self) -> Mode {
        Mode::resolve(&self.mode)
    }

    /// Walk span
    pub fn span(&self) -> ScaleSpan {
        if self.full {
            ScaleSpan::AllOctaves
        } else {
            ScaleSpan::SingleOctave
        }
    }
}

/// Trainer section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainerConfig {
    /// Milliseconds between picks
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Milliseconds before the location is revealed (absent = never)
    #[serde(default)]
    pub reveal_ms: Option<u64>,
    /// Strings to pick from
    #[serde(default = "all_strings")]
    pub strings: Vec<u8>,
}

fn default_interval_ms() -> u64 {
    3000
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            reveal_ms: None,
            strings: all_strings(),
        }
    }
}

impl TrainerConfig {
    /// Session timing
    pub fn settings(&self) -> TrainerSettings {
        TrainerSettings::new(
            Duration::from_millis(self.interval_ms),
            self.reveal_ms.map(Duration::from_millis),
        )
    }
}
