// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Note trainer.
//!
//! Picks random fretboard positions and drives the announce / reveal /
//! clear cycle. The session is tick-driven: the caller passes the current
//! time and receives the events that became due.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::fretboard::{effective_strings, Fretboard};
use crate::music::pitch::Note;

/// Random draws before falling back to the most different position
pub const MAX_PICK_ATTEMPTS: usize = 64;

/// Shortest allowed cycle
pub const MIN_INTERVAL: Duration = Duration::from_millis(100);

/// A picked fretboard position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub string: u8,
    pub fret: u32,
    pub note: Note,
}

impl Position {
    /// String, fret, pitch class and octave all differ
    pub fn differs_entirely(&self, other: &Position) -> bool {
        self.difference(other) == 4
    }

    /// How many of string, fret, pitch class and octave differ (0-4)
    pub fn difference(&self, other: &Position) -> usize {
        [
            self.string != other.string,
            self.fret != other.fret,
            self.note.pitch_class != other.note.pitch_class,
            self.note.octave != other.note.octave,
        ]
        .iter()
        .filter(|&&d| d)
        .count()
    }

    pub fn frequency(&self) -> f64 {
        self.note.frequency()
    }
}

/// Random position picker that avoids repeating the previous pick
#[derive(Debug)]
pub struct Trainer {
    rng: StdRng,
    previous: Option<Position>,
}

impl Trainer {
    /// Create a new trainer
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            previous: None,
        }
    }

    /// Create a trainer with a fixed seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            previous: None,
        }
    }

    /// Last accepted pick
    pub fn previous(&self) -> Option<Position> {
        self.previous
    }

    /// Forget the last pick
    pub fn forget(&mut self) {
        self.previous = None;
    }

    fn candidate(&mut self, board: &Fretboard, strings: &[u8]) -> Option<Position> {
        let string = strings[self.rng.gen_range(0..strings.len())];
        let fret = self.rng.gen_range(0..=board.frets());
        let cell = board.cell(string, fret)?;
        Some(Position {
            string,
            fret,
            note: cell.note,
        })
    }

    /// Pick a position on the selected strings.
    ///
    /// Returns `None` when none of the selected strings exist on the board.
    pub fn pick(&mut self, board: &Fretboard, selected: &[u8]) -> Option<Position> {
        let strings: Vec<u8> = effective_strings(selected)
            .into_iter()
            .filter(|s| board.tuning().open_note(*s).is_some())
            .collect();
        if strings.is_empty() {
            return None;
        }

        let Some(prev) = self.previous else {
            let first = self.candidate(board, &strings)?;
            self.previous = Some(first);
            return Some(first);
        };

        for _ in 0..MAX_PICK_ATTEMPTS {
            let candidate = self.candidate(board, &strings)?;
            if candidate.differs_entirely(&prev) {
                self.previous = Some(candidate);
                return Some(candidate);
            }
        }

        // Every position, keeping the ones that differ most from the last pick
        let mut best: Vec<Position> = Vec::new();
        let mut best_score = 0;
        for &string in &strings {
            for cell in board.row(string) {
                let position = Position {
                    string,
                    fret: cell.fret,
                    note: cell.note,
                };
                let score = position.difference(&prev);
                if score > best_score {
                    best_score = score;
                    best.clear();
                }
                if score == best_score && score > 0 {
                    best.push(position);
                }
            }
        }

        debug!(
            attempts = MAX_PICK_ATTEMPTS,
            best_score, "no fully distinct position drawn, using most different one"
        );
        let choice = if best.is_empty() {
            prev
        } else {
            best[self.rng.gen_range(0..best.len())]
        };
        self.previous = Some(choice);
        Some(choice)
    }
}

impl Default for Trainer {
    fn default() -> Self {
        Self::new()
    }
}

/// Trainer session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Stopped,
    Running,
    Paused,
}

/// Timing of the trainer cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainerSettings {
    /// Time between picks
    pub interval: Duration,
    /// Delay before the picked position is revealed; `None` never reveals
    pub reveal_after: Option<Duration>,
}

impl TrainerSettings {
    pub fn new(interval: Duration, reveal_after: Option<Duration>) -> Self {
        Self {
            interval: interval.max(MIN_INTERVAL),
            reveal_after,
        }
    }
}

impl Default for TrainerSettings {
    fn default() -> Self {
        Self::new(Duration::from_millis(3000), Some(Duration::from_millis(1500)))
    }
}

/// Something the display should do now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainerEvent {
    /// Show and play a new position (location hidden)
    Announce(Position),
    /// Highlight the position's location
    Reveal(Position),
    /// Remove the previous position's highlight
    Clear,
}

#[derive(Debug, Clone, Copy)]
struct PendingReveal {
    due: Instant,
    position: Position,
}

/// Tick-driven announce / reveal / clear cycle
#[derive(Debug)]
pub struct TrainerSession {
    trainer: Trainer,
    settings: TrainerSettings,
    state: SessionState,
    next_cycle: Option<Instant>,
    pending: Option<PendingReveal>,
    current: Option<Position>,
}

impl TrainerSession {
    /// Create a stopped session
    pub fn new(trainer: Trainer, settings: TrainerSettings) -> Self {
        Self {
            trainer,
            settings,
            state: SessionState::Stopped,
            next_cycle: None,
            pending: None,
            current: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn settings(&self) -> TrainerSettings {
        self.settings
    }

    /// Position currently announced
    pub fn current(&self) -> Option<Position> {
        self.current
    }

    /// Whether a reveal is scheduled
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Start; the first pick happens on the next tick
    pub fn start(&mut self, now: Instant) {
        self.state = SessionState::Running;
        self.pending = None;
        self.next_cycle = Some(now);
    }

    /// Pause, cancelling everything scheduled
    pub fn pause(&mut self) {
        if self.state == SessionState::Running {
            self.state = SessionState::Paused;
            self.pending = None;
            self.next_cycle = None;
        }
    }

    /// Continue from paused state with a fresh cycle
    pub fn resume(&mut self, now: Instant) {
        if self.state == SessionState::Paused {
            self.start(now);
        }
    }

    /// Stop and forget the last pick
    pub fn stop(&mut self) {
        self.state = SessionState::Stopped;
        self.pending = None;
        self.next_cycle = None;
        self.current = None;
        self.trainer.forget();
    }

    /// Cancel scheduled work and restart the cycle, e.g. after re-tuning
    pub fn reset(&mut self, now: Instant) {
        self.pending = None;
        if self.state == SessionState::Running {
            self.next_cycle = Some(now);
        }
    }

    /// Advance to `now`, returning the events that became due
    pub fn tick(&mut self, now: Instant, board: &Fretboard, selected: &[u8]) -> Vec<TrainerEvent> {
        let mut events = Vec::new();
        if self.state != SessionState::Running {
            return events;
        }

        let cycle_due = self.next_cycle.filter(|&next| next <= now);

        if let Some(reveal) = self.pending.take() {
            let superseded = cycle_due.is_some_and(|next| next <= reveal.due);
            if superseded {
                debug!("dropping reveal superseded by a new cycle");
            } else if reveal.due <= now {
                events.push(TrainerEvent::Reveal(reveal.position));
            } else {
                self.pending = Some(reveal);
            }
        }

        if cycle_due.is_some() {
            if self.current.take().is_some() {
                events.push(TrainerEvent::Clear);
            }
            if let Some(position) = self.trainer.pick(board, selected) {
                events.push(TrainerEvent::Announce(position));
                self.current = Some(position);
                self.pending = self.settings.reveal_after.map(|delay| PendingReveal {
                    due: now + delay,
                    position,
                });
            }
            self.next_cycle = Some(now + self.settings.interval);
        }

        events
    }

    /// Time until the next scheduled event
    pub fn time_until_next_event(&self, now: Instant) -> Duration {
        if self.state != SessionState::Running {
            return Duration::from_secs(0);
        }
        [self.next_cycle, self.pending.map(|p| p.due)]
            .into_iter()
            .flatten()
            .min()
            .map(|due| due.saturating_duration_since(now))
            .unwrap_or_default()
    }
}
