//! All game entity types — pure data, no game rules.

use std::sync::Arc;

use crate::config::{Physics, Rules};
use crate::level::{Layout, Level, TILE};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Title,
    Playing,
    LevelComplete,
    GameOver,
    Victory,
}

/// Horizontal heading of a walking enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Heading {
    Left,
    Right,
}

impl Heading {
    pub fn flipped(self) -> Heading {
        match self {
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
        }
    }

    pub fn sign(self) -> f32 {
        match self {
            Heading::Left => -1.0,
            Heading::Right => 1.0,
        }
    }
}

/// Held-key snapshot for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Input {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in world pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

/// Position, size and velocity shared by everything that moves.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub dx: f32,
    pub dy: f32,
    pub on_ground: bool,
    pub alive: bool,
}

impl Body {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Body {
            x,
            y,
            w,
            h,
            dx: 0.0,
            dy: 0.0,
            on_ground: false,
            alive: true,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            w: self.w,
            h: self.h,
        }
    }
}

// ── Player & enemy ────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub body: Body,
    pub spawn_x: f32,
    pub spawn_y: f32,
    pub score: u32,
    pub coins: u32,
    pub lives: u32,
    /// Frames of damage immunity left; counts down once per playing frame.
    pub invincible_timer: u32,
    /// Set by a grounded jump, consumed by the mid-air jump.
    pub can_double_jump: bool,
}

impl Player {
    pub const WIDTH: f32 = TILE;
    pub const HEIGHT: f32 = TILE * 1.5;

    pub fn new(spawn_x: f32, spawn_y: f32, lives: u32) -> Self {
        Player {
            body: Body::new(spawn_x, spawn_y, Self::WIDTH, Self::HEIGHT),
            spawn_x,
            spawn_y,
            score: 0,
            coins: 0,
            lives,
            invincible_timer: 0,
            can_double_jump: false,
        }
    }

    /// Put the player back on the spawn point with zero velocity.
    pub fn reset_to_spawn(&mut self) {
        self.body.x = self.spawn_x;
        self.body.y = self.spawn_y;
        self.body.dx = 0.0;
        self.body.dy = 0.0;
        self.body.on_ground = false;
        self.can_double_jump = false;
    }
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub body: Body,
    pub heading: Heading,
    pub speed: f32,
}

impl Enemy {
    pub const SIZE: f32 = TILE;

    pub fn new(x: f32, y: f32, speed: f32) -> Self {
        let mut body = Body::new(x, y, Self::SIZE, Self::SIZE);
        body.dx = -speed;
        Enemy {
            body,
            heading: Heading::Left,
            speed,
        }
    }
}

// ── Collectibles & goal ───────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Coin {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub collected: bool,
    /// Frames left on the pick-up animation.
    pub collect_timer: u32,
}

impl Coin {
    pub const SIZE: f32 = TILE / 2.0;
    pub const COLLECT_FRAMES: u32 = 30;

    pub fn new(x: f32, y: f32) -> Self {
        Coin {
            x,
            y,
            w: Self::SIZE,
            h: Self::SIZE,
            collected: false,
            collect_timer: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            w: self.w,
            h: self.h,
        }
    }

    /// Still drawn: either uncollected or mid pick-up animation.
    pub fn is_visible(&self) -> bool {
        !self.collected || self.collect_timer > 0
    }
}

/// Goal pole.  `y` is the ground line the pole stands on.
#[derive(Clone, Debug, PartialEq)]
pub struct Flag {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Flag {
    pub const WIDTH: f32 = TILE / 2.0;
    pub const HEIGHT: f32 = TILE * 6.0;

    pub fn new(x: f32, base_y: f32) -> Self {
        Flag {
            x,
            y: base_y,
            w: Self::WIDTH,
            h: Self::HEIGHT,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y - self.h,
            w: self.w,
            h: self.h,
        }
    }
}

/// HUD values handed to the renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hud {
    pub score: u32,
    pub coins: u32,
    pub lives: u32,
    pub time_left: u32,
    pub world: String,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub status: GameStatus,
    /// Every level of the run, in play order, as parsed at start-up.
    pub levels: Arc<[Layout]>,
    pub level_index: usize,
    pub level: Level,
    pub player: Player,
    /// Dead enemies stay in the list with `body.alive == false`.
    pub enemies: Vec<Enemy>,
    /// Collected coins stay in the list with `collected == true`.
    pub coins: Vec<Coin>,
    pub flag: Option<Flag>,
    /// Countdown before LevelComplete advances to the next level.
    pub state_timer: u32,
    /// Playing frames since the level (or life) started.
    pub frame_counter: u64,
    /// Seconds left on the level clock.
    pub time_left: u32,
    /// Jump key state from the previous playing frame.
    pub prev_jump: bool,
    pub physics: Physics,
    pub rules: Rules,
}

impl GameState {
    pub fn hud(&self) -> Hud {
        Hud {
            score: self.player.score,
            coins: self.player.coins,
            lives: self.player.lives,
            time_left: self.time_left,
            world: self.level.name.clone(),
        }
    }

    /// Left edge of a `view_width`-pixel window centred on the player,
    /// clamped to the level.
    pub fn camera_x(&self, view_width: f32) -> f32 {
        let max = (self.level.width - view_width).max(0.0);
        (self.player.body.x - view_width / 2.0).clamp(0.0, max)
    }

    pub fn next_level_name(&self) -> Option<&str> {
        self.levels
            .get(self.level_index + 1)
            .map(|layout| layout.level.name.as_str())
    }
}
