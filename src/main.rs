// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use anyhow::{anyhow, Context, Result};
use fretboard::config::{FretboardFile, SettingsEvent, SettingsWatcher};
use fretboard::fretboard::{Fretboard, ScaleView, TuningPreset};
use fretboard::music::{degree_labels, progressions_for, Mode, Note, Scale, ScaleSpan};
use fretboard::music::pitch::NoteWarning;
use fretboard::trainer::{Trainer, TrainerEvent, TrainerSession};
use std::env;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tracing::Level;

fn print_usage() {
    println!("FRETBOARD - Fretboard note and scale explorer");
    println!();
    println!("Usage: fretboard [--config <FILE>] [--verbose] <COMMAND>");
    println!();
    println!("Commands:");
    println!("  --board                      Print the fretboard");
    println!("  --note <STRING> <FRET>       Show the note and frequency at a position");
    println!("  --click <STRING> <FRET> [MODE]");
    println!("                               Use a position as scale root and highlight the scale");
    println!("  --scale <NOTE> [MODE]        Show scale degrees and progressions, e.g. A2 minor");
    println!("  --tune <STRING> <NOTE>       Retune a string (e.g. 6 D2) and print the board");
    println!("  --presets                    List tuning presets");
    println!("  --trainer [CYCLES]           Run the note trainer (default 5 cycles)");
    println!("  --watch                      Reprint the board when the config file changes");
    println!("  --help                       Show this help message");
    println!();
    println!("Modes: {}", Mode::ALL.map(|m| m.key()).join(", "));
}

fn print_warnings<'a>(warnings: impl IntoIterator<Item = &'a NoteWarning>) {
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }
}

fn parse_arg<T: std::str::FromStr>(args: &[String], index: usize, what: &str) -> Result<T> {
    let raw = args
        .get(index)
        .ok_or_else(|| anyhow!("Missing {}", what))?;
    raw.parse()
        .map_err(|_| anyhow!("Invalid {}: {}", what, raw))
}

/// Print the board; with a scale view, only highlighted cells show, as
/// note and degree, and the tonic is starred
fn print_board(board: &Fretboard, view: Option<&ScaleView>) {
    const WIDTH: usize = 7;

    print!("{:>4} ", "");
    for fret in 0..=board.frets() {
        let label = if fret == 0 { String::new() } else { fret.to_string() };
        print!("{:^WIDTH$}", label);
    }
    println!();

    for string in board.tuning().string_ids() {
        print!("{:>4} ", string);
        for cell in board.row(string) {
            let text = match view {
                None => cell.note.pitch_class.display_name().to_string(),
                Some(view) => match view.highlights.iter().find(|h| h.cell == cell) {
                    Some(h) => {
                        let pc = cell.note.pitch_class;
                        let star = if h.tonic { "*" } else { "" };
                        match view.scale.degree_of(pc) {
                            Some(degree) => format!("{}{}:{}", star, pc, degree),
                            None => format!("{}{}", star, pc),
                        }
                    }
                    None => "·".to_string(),
                },
            };
            let text = if cell.is_marker() && view.is_none() {
                format!("|{}|", text)
            } else {
                text
            };
            print!("{:^WIDTH$}", text);
        }
        println!();
    }
}

fn print_scale(scale: &Scale) {
    let mode = scale.mode();
    println!("{} ({} walk)", scale, match scale.span() {
        ScaleSpan::SingleOctave => "single octave",
        ScaleSpan::AllOctaves => "all octaves",
    });

    let preview: Vec<String> = scale
        .notes()
        .iter()
        .take(mode.degree_count() + 1)
        .map(|n| n.to_string())
        .collect();
    println!("Notes: {}", preview.join(" "));

    println!();
    println!("Degrees:");
    for label in degree_labels(scale.notes(), mode) {
        println!("  {}  {:<3} {}", label.degree, label.note_text(), label.chord_text());
    }

    println!();
    println!("Progressions:");
    for row in progressions_for(scale.notes(), mode) {
        let cells: Vec<String> = row.row().iter().map(|c| format!("{:<7}", c)).collect();
        println!("  {:<14} {}", row.name, cells.join(""));
    }
}

fn show_note(board: &Fretboard, string: u8, fret: u32) -> Result<()> {
    let cell = board
        .cell(string, fret)
        .ok_or_else(|| anyhow!("No position at string {}, fret {}", string, fret))?;
    println!(
        "String {}, fret {}: {} (octave {}) {:.2} Hz",
        string,
        fret,
        cell.note.pitch_class.display_name(),
        cell.note.octave,
        cell.note.frequency()
    );
    Ok(())
}

fn click(config: &FretboardFile, board: &Fretboard, string: u8, fret: u32, mode: Mode) -> Result<()> {
    let result = board
        .click(
            string,
            fret,
            mode,
            config.scale.span(),
            &config.scale.strings,
            config.scale.lock,
        )
        .ok_or_else(|| anyhow!("No position at string {}, fret {}", string, fret))?;

    println!("Playing {} at {:.2} Hz", result.note, result.frequency);
    match result.scale {
        Some(view) => {
            println!();
            print_scale(&view.scale);
            println!();
            print_board(board, Some(&view));
        }
        None => println!("Scale is locked"),
    }
    Ok(())
}

fn show_scale(note_text: &str, mode: Mode, span: ScaleSpan) -> Result<()> {
    let (root, warning) = fretboard::fretboard::parse_note_input(note_text)
        .with_context(|| format!("Invalid root note: {}", note_text))?;
    print_warnings(warning.iter());
    print_scale(&Scale::new(root, mode, span));
    Ok(())
}

fn list_presets() {
    for preset in TuningPreset::ALL {
        let notes: Vec<String> = preset.open_notes().iter().map(Note::to_string).collect();
        println!("  {:<16} {}", preset.name(), notes.join(" "));
    }
}

fn run_trainer(config: &FretboardFile, board: &Fretboard, cycles: usize) {
    let settings = config.trainer.settings();
    let strings = &config.trainer.strings;
    let mut session = TrainerSession::new(Trainer::new(), settings);

    println!(
        "Trainer: {} cycles, {} ms apart (press Ctrl+C to stop)",
        cycles,
        settings.interval.as_millis()
    );

    let mut announced = 0;
    session.start(Instant::now());
    'outer: loop {
        for event in session.tick(Instant::now(), board, strings) {
            match event {
                TrainerEvent::Announce(position) => {
                    if announced == cycles {
                        break 'outer;
                    }
                    announced += 1;
                    println!(
                        "#{} Find {} ({:.2} Hz)",
                        announced,
                        position.note.pitch_class.display_name(),
                        position.frequency()
                    );
                }
                TrainerEvent::Reveal(position) => {
                    println!(
                        "   string {}, fret {} ({})",
                        position.string, position.fret, position.note
                    );
                }
                TrainerEvent::Clear => {}
            }
        }

        if session.current().is_none() && announced == 0 {
            eprintln!("Error: none of the trainer strings exist on this fretboard");
            return;
        }

        let wait = session.time_until_next_event(Instant::now());
        thread::sleep(wait.max(Duration::from_millis(1)));
    }

    println!("Trainer complete!");
}

fn watch(path: &Path) -> Result<()> {
    let watcher = SettingsWatcher::new(path, None)?;
    println!("Watching {:?} (press Ctrl+C to stop)...", watcher.path());

    loop {
        match watcher.wait(Duration::from_secs(1)) {
            Some(SettingsEvent::Reloaded(config)) => match config.build_fretboard() {
                Ok((board, warnings)) => {
                    print_warnings(&warnings);
                    println!();
                    print_board(&board, None);
                }
                Err(e) => eprintln!("Error: {:#}", e),
            },
            Some(SettingsEvent::Invalid { path, reason }) => {
                eprintln!("Error: {:?}: {}", path, reason)
            }
            Some(SettingsEvent::Created(_)) | Some(SettingsEvent::Removed(_)) | None => {}
        }
    }
}

fn main() -> Result<()> {
    let mut args: Vec<String> = env::args().collect();

    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    args.retain(|a| a != "--verbose" && a != "-v");

    let config_path = match args.iter().position(|a| a == "--config") {
        Some(i) => {
            let path = args
                .get(i + 1)
                .map(PathBuf::from)
                .ok_or_else(|| anyhow!("--config requires a file path"))?;
            args.drain(i..=i + 1);
            Some(path)
        }
        None => None,
    };

    tracing_subscriber::fmt()
        .with_max_level(if verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    if args.len() < 2 {
        println!("FRETBOARD - Fretboard note and scale explorer");
        println!("Run with --help for usage information");
        return Ok(());
    }

    let config = match &config_path {
        Some(path) => FretboardFile::load(path)?,
        None => FretboardFile::default(),
    };
    let (mut board, warnings) = config.build_fretboard()?;
    print_warnings(&warnings);

    match args[1].as_str() {
        "--board" => {
            print_board(&board, None);
        }
        "--note" => {
            let string: u8 = parse_arg(&args, 2, "string number")?;
            let fret: u32 = parse_arg(&args, 3, "fret number")?;
            show_note(&board, string, fret)?;
        }
        "--click" => {
            let string: u8 = parse_arg(&args, 2, "string number")?;
            let fret: u32 = parse_arg(&args, 3, "fret number")?;
            let mode = args
                .get(4)
                .map(|m| Mode::resolve(m))
                .unwrap_or_else(|| config.scale.mode());
            click(&config, &board, string, fret, mode)?;
        }
        "--scale" => {
            let note = args
                .get(2)
                .ok_or_else(|| anyhow!("--scale requires a root note, e.g. A2"))?;
            let mode = args
                .get(3)
                .map(|m| Mode::resolve(m))
                .unwrap_or_else(|| config.scale.mode());
            show_scale(note, mode, config.scale.span())?;
        }
        "--tune" => {
            let string: u8 = parse_arg(&args, 2, "string number")?;
            let note = args
                .get(3)
                .ok_or_else(|| anyhow!("--tune requires a note, e.g. D2"))?;
            match board.tuning_mut().retune(string, note) {
                Ok(warning) => print_warnings(warning.iter()),
                Err(e) => {
                    eprintln!("Error: {} (tuning unchanged)", e);
                    std::process::exit(1);
                }
            }
            print_board(&board, None);
        }
        "--presets" => {
            list_presets();
        }
        "--trainer" => {
            let cycles: usize = if args.len() >= 3 {
                parse_arg(&args, 2, "cycle count")?
            } else {
                5
            };
            run_trainer(&config, &board, cycles);
        }
        "--watch" => {
            let path = config_path.ok_or_else(|| anyhow!("--watch requires --config <FILE>"))?;
            watch(&path)?;
        }
        "--help" | "-h" => {
            print_usage();
        }
        _ => {
            eprintln!("Unknown option: {}", args[1]);
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}
