mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{info, warn};
use rand::thread_rng;

use tile_runner::compute::{confirm, init_state, tick};
use tile_runner::config::{builtin_levels, load_pack, ContactRule, Physics, Rules};
use tile_runner::entities::{GameState, GameStatus, Input};
use tile_runner::level::compile_levels;
use tile_runner::scenery::{scatter_clouds, Cloud};

const FRAME: Duration = Duration::from_micros(16_667); // ≈60 FPS

/// Tile rows at the top of a level where clouds may drift.
const SKY_ROWS: u32 = 4;

/// A movement key is considered "held" if its last press/repeat event arrived
/// within this many frames.  Covers terminals that don't emit key-release
/// events: once auto-repeat runs (≥ 15 Hz) a window of 8 frames (≈133 ms) is
/// always refreshed before expiry.  A dropout during the initial repeat delay
/// only costs a few frames of running.
const HOLD_WINDOW: u64 = 8;

/// Jump keys stay held across the OS initial repeat delay (250–600 ms), about
/// 40 frames.  Jumping fires on the rising edge, so a dropout there would read
/// as a second press and spend the double jump.
const JUMP_HOLD_WINDOW: u64 = 40;

const LEFT_KEYS: [KeyCode; 3] = [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const RIGHT_KEYS: [KeyCode; 3] = [KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const JUMP_KEYS: [KeyCode; 4] = [
    KeyCode::Char(' '),
    KeyCode::Char('z'),
    KeyCode::Char('Z'),
    KeyCode::Up,
];

#[derive(Parser, Debug)]
#[command(name = "tile_runner", about = "A side-scrolling tile platformer for the terminal")]
struct Cli {
    /// Level index to start from (0-based).
    #[arg(long, default_value_t = 0)]
    level: usize,

    /// RON file with a list of levels to play instead of the built-in worlds.
    #[arg(long, value_name = "FILE")]
    levels: Option<PathBuf>,

    /// Disable the mid-air second jump.
    #[arg(long)]
    no_double_jump: bool,

    /// Touching an enemy without stomping it ends the run.
    #[arg(long)]
    hardcore: bool,

    /// Lives at the start of a run.
    #[arg(long, default_value_t = 3)]
    lives: u32,

    /// Where to write the log (the terminal is busy drawing the game).
    #[arg(long, value_name = "FILE", default_value = "tile_runner.log")]
    log_file: PathBuf,
}

impl Cli {
    fn rules(&self) -> Rules {
        Rules {
            double_jump: !self.no_double_jump,
            contact: if self.hardcore {
                ContactRule::GameOver
            } else {
                ContactRule::LoseLife
            },
            start_lives: self.lives.max(1),
            ..Rules::default()
        }
    }
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init();
    Ok(())
}

/// Returns true if `key` was seen within the last `window` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64, window: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= window)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64, window: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame, window))
}

/// Press and repeat refresh a key; release forgets it at once.
fn track_key(key_frame: &mut HashMap<KeyCode, u64>, code: KeyCode, kind: KeyEventKind, frame: u64) {
    match kind {
        KeyEventKind::Press | KeyEventKind::Repeat => {
            key_frame.insert(code, frame);
        }
        KeyEventKind::Release => {
            key_frame.remove(&code);
        }
    }
}

fn read_input(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> Input {
    Input {
        left: any_held(key_frame, &LEFT_KEYS, frame, HOLD_WINDOW),
        right: any_held(key_frame, &RIGHT_KEYS, frame, HOLD_WINDOW),
        jump: any_held(key_frame, &JUMP_KEYS, frame, JUMP_HOLD_WINDOW),
    }
}

// ── High-score persistence ────────────────────────────────────────────────────

fn high_score_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".tile_runner_score")
}

fn load_high_score() -> u32 {
    std::fs::read_to_string(high_score_path())
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

fn save_high_score(score: u32) {
    let path = high_score_path();
    match std::fs::write(&path, score.to_string()) {
        Ok(()) => info!("new best score {score} saved to {}", path.display()),
        Err(e) => warn!("could not save best score to {}: {e}", path.display()),
    }
}

/// Raises `best` to `score` if it beats it; returns true when it did.
fn record_best(score: u32, best: &mut u32) -> bool {
    if score > *best {
        *best = score;
        true
    } else {
        false
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.  A new best score is saved when a run ends
/// and again on quit, so abandoning a good run mid-level keeps it.
///
/// Input model: instead of acting on each key event individually, we maintain
/// a `key_frame` map that records the frame number of the last press/repeat
/// event for every key.  Each frame we check which keys are still "fresh"
/// (within `HOLD_WINDOW` frames, `JUMP_HOLD_WINDOW` for jump) and build one
/// `Input` from them, so running
/// and jumping can be held at the same time.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (Ghostty, kitty, etc.): proper
///   `Press` / `Repeat` / `Release` events → keys are removed on release.
/// * **Classic terminals**: only `Press` events (OS key-repeat shows as
///   repeated `Press`).  Keys expire naturally after their window of
///   silence.
fn game_loop<W: Write>(
    out: &mut W,
    mut state: GameState,
    rx: &mpsc::Receiver<Event>,
) -> Result<()> {
    let mut rng = thread_rng();
    let mut best_score = load_high_score();
    let mut clouds: Vec<Cloud> = scatter_clouds(state.level.width, SKY_ROWS, &mut rng);
    let mut shown_level = state.level_index;

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    'frames: loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = ev
            else {
                continue;
            };
            track_key(&mut key_frame, code, kind, frame);
            if kind != KeyEventKind::Press {
                continue;
            }
            match code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => break 'frames,
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => break 'frames,
                KeyCode::Enter => state = confirm(&state),
                _ => {}
            }
        }

        let input = read_input(&key_frame, frame);

        let was = state.status;
        state = tick(&state, &input);

        if state.level_index != shown_level {
            clouds = scatter_clouds(state.level.width, SKY_ROWS, &mut rng);
            shown_level = state.level_index;
        }

        let run_over = matches!(state.status, GameStatus::GameOver | GameStatus::Victory);
        if run_over && was != state.status && record_best(state.player.score, &mut best_score) {
            save_high_score(best_score);
        }

        let size = terminal::size()?;
        display::render(out, &state, &clouds, best_score, size)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }

    if record_best(state.player.score, &mut best_score) {
        save_high_score(best_score);
    }
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let defs = match &cli.levels {
        Some(path) => load_pack(path)?,
        None => builtin_levels(),
    };
    let levels = compile_levels(&defs).context("level pack rejected")?;
    let state = init_state(Arc::from(levels), cli.level, Physics::default(), cli.rules())?;
    info!("starting at {} with {:?}", state.level.name, state.rules);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = game_loop(&mut out, state, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        log::error!("game loop failed: {e:#}");
    }
    result
}
