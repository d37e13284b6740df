//! Tunable constants, rule knobs and level packs.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PackError;

/// Per-frame movement constants, in world pixels at 60 frames per second.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Physics {
    pub gravity: f32,
    pub run_accel: f32,
    pub max_run_speed: f32,
    pub jump_speed: f32,
    pub max_fall_speed: f32,
    /// Multiplier applied to `dx` each frame with no direction held.
    pub friction: f32,
    /// `|dx|` below this snaps to zero while coasting.
    pub stop_epsilon: f32,
    pub enemy_speed: f32,
}

impl Default for Physics {
    fn default() -> Self {
        Physics {
            gravity: 0.105,
            run_accel: 0.09,
            max_run_speed: 0.6,
            jump_speed: 2.25,
            max_fall_speed: 2.7,
            friction: 0.8,
            stop_epsilon: 0.05,
            enemy_speed: 0.3,
        }
    }
}

impl Physics {
    /// Upward speed given to the player after a stomp.
    pub fn stomp_bounce(&self) -> f32 {
        self.jump_speed / 1.5
    }
}

/// What touching an enemy without stomping it does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactRule {
    /// Lose one life and respawn.
    LoseLife,
    /// End the run outright.
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rules {
    pub double_jump: bool,
    pub contact: ContactRule,
    pub start_lives: u32,
    pub invincibility_frames: u32,
    /// Frames the "course clear" screen stays up before the next level.
    pub clear_delay_frames: u32,
    /// Frames per level-clock second.
    pub frames_per_second: u64,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            double_jump: true,
            contact: ContactRule::LoseLife,
            start_lives: 3,
            invincibility_frames: 120,
            clear_delay_frames: 180,
            frames_per_second: 60,
        }
    }
}

// ── Level packs ───────────────────────────────────────────────────────────────

/// One level as written in a pack: a name, a time budget and a character map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelDef {
    pub name: String,
    pub time: u32,
    pub map: Vec<String>,
}

/// Parse a RON list of levels.  Maps are checked later by
/// [`compile_levels`](crate::level::compile_levels).
pub fn parse_pack(source: &str) -> Result<Vec<LevelDef>, PackError> {
    let defs: Vec<LevelDef> = ron::from_str(source)?;
    if defs.is_empty() {
        return Err(PackError::NoLevels);
    }
    Ok(defs)
}

pub fn load_pack(path: &Path) -> Result<Vec<LevelDef>, PackError> {
    let source = std::fs::read_to_string(path).map_err(|source| PackError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let defs = parse_pack(&source)?;
    log::info!("loaded {} levels from {}", defs.len(), path.display());
    Ok(defs)
}

fn level(name: &str, time: u32, map: &[&str]) -> LevelDef {
    LevelDef {
        name: name.to_string(),
        time,
        map: map.iter().map(|row| row.to_string()).collect(),
    }
}

/// The three worlds that ship with the game.
pub fn builtin_levels() -> Vec<LevelDef> {
    vec![
        level(
            "World 1-1",
            300,
            &[
                "......................................................................................",
                "......................................................................................",
                "......................................................................................",
                "..............o..............................................o......................F.",
                ".................Q.....................B...........................................##|",
                "....................................................o................................#|",
                "...............................B.....................................................#|",
                "....o............G.................#####.............G.................................#|",
                ".....................#####..............................................o.............#|",
                "......................................................####............................#|",
                ".............P....................................................#####...............#|",
                ".............P.................................................................B......#|",
                "###############################....#############################....####################",
                "@##############################....############################....#####################",
            ],
        ),
        level(
            "World 1-2",
            280,
            &[
                "......................................................................................",
                "......................................................................................",
                "......................................................................................",
                "..................................o..................................................F.",
                ".................BBB........................Q..............B.......................##|",
                "...........................................................B.........................#|",
                "......o....................................................B.........................#|",
                "...................G.........................#####...............................o....#|",
                "...............#####..............................................#####...............#|",
                ".............................................P........................................#|",
                ".............................................P..........................G.............#|",
                "....o..................................................o..............................#|",
                "###############################....#############################....####################",
                "@##############################....############################....#####################",
            ],
        ),
        level(
            "World 1-3",
            260,
            &[
                "......................................................................................",
                "......................................................................................",
                "...........................................o..........................................",
                ".........................#####......................................................F.",
                "..............o.................................................................B..##|",
                "...................................G..............#####............................##|",
                "...............#####.........................o.....................................##|",
                "...............................B...................................................##|",
                "..............................................................#####.................##|",
                "...........o.........................#####...........................................#|",
                "....................#####..................................................o.........#|",
                "..............G......................................................G...............#|",
                "###############################....#############################....####################",
                "@##############################....############################....#####################",
            ],
        ),
    ]
}
