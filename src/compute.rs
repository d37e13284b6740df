//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `GameState` and returns a brand-new `GameState`.  Internally the copy is
//! updated in place by small helpers that each own one concern.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::config::{ContactRule, Physics, Rules};
use crate::entities::{Coin, Enemy, GameState, GameStatus, Input, Player};
use crate::error::PackError;
use crate::level::{Layout, Tile, TilePos, TILE};
use crate::physics::{self, Step};

// ── Scoring table ─────────────────────────────────────────────────────────────

const COIN_SCORE: u32 = 100;
const STOMP_SCORE: u32 = 100;
const BUMP_SCORE: u32 = 200;
/// Points per second left on the clock when the flag is reached.
const TIME_BONUS: u32 = 5;

/// How far below the level floor the player may fall before losing a life.
const FALL_MARGIN: f32 = TILE * 4.0;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the title-screen state for a run over `levels`, beginning at
/// `start_level` (clamped to the last level).
pub fn init_state(
    levels: Arc<[Layout]>,
    start_level: usize,
    physics: Physics,
    rules: Rules,
) -> Result<GameState, PackError> {
    let last = levels.len().checked_sub(1).ok_or(PackError::NoLevels)?;
    if start_level > last {
        warn!("start level {start_level} out of range, using {last}");
    }
    let level_index = start_level.min(last);
    let layout = levels[level_index].clone();
    let player = Player::new(layout.level.spawn_x, layout.level.spawn_y, rules.start_lives);

    let mut state = GameState {
        status: GameStatus::Title,
        levels,
        level_index,
        time_left: layout.level.time,
        level: layout.level,
        player,
        enemies: Vec::new(),
        coins: Vec::new(),
        flag: None,
        state_timer: 0,
        frame_counter: 0,
        prev_jump: false,
        physics,
        rules,
    };
    load_level(&mut state, level_index);
    Ok(state)
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// Apply the confirm key (Enter).
pub fn confirm(state: &GameState) -> GameState {
    let mut next = state.clone();
    match next.status {
        GameStatus::Title => start_game(&mut next),
        GameStatus::LevelComplete => advance_level(&mut next),
        GameStatus::GameOver => reset_game(&mut next),
        GameStatus::Victory => {
            reset_run(&mut next);
            set_status(&mut next, GameStatus::Title);
        }
        GameStatus::Playing => {}
    }
    next
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by one frame with the given held keys.
pub fn tick(state: &GameState, input: &Input) -> GameState {
    let mut next = state.clone();
    match next.status {
        GameStatus::Title | GameStatus::GameOver | GameStatus::Victory => {}
        GameStatus::LevelComplete => {
            next.state_timer = next.state_timer.saturating_sub(1);
            if next.state_timer == 0 {
                advance_level(&mut next);
            }
        }
        GameStatus::Playing => step_playing(&mut next, input),
    }
    next
}

fn step_playing(s: &mut GameState, input: &Input) {
    s.frame_counter += 1;

    update_timer(s);
    if s.status == GameStatus::Playing {
        update_player(s, input);
    }
    if s.status == GameStatus::Playing {
        update_enemies(s);
    }
    if s.status == GameStatus::Playing {
        update_coins(s);
        update_flag(s);
    }

    s.prev_jump = input.jump;
}

// ── Level lifecycle ──────────────────────────────────────────────────────────

fn set_status(s: &mut GameState, status: GameStatus) {
    if s.status != status {
        info!("{:?} -> {:?} ({})", s.status, status, s.level.name);
        s.status = status;
    }
}

/// Replace grid and entities with a fresh copy of level `index` and put the
/// player on its spawn point.  Score, coins and lives carry over.
fn load_level(s: &mut GameState, index: usize) {
    let layout = s.levels[index].clone();
    let speed = s.physics.enemy_speed;

    s.level_index = index;
    s.enemies = layout
        .enemy_spawns
        .iter()
        .map(|&(x, y)| Enemy::new(x, y, speed))
        .collect();
    s.coins = layout.coin_spawns.iter().map(|&(x, y)| Coin::new(x, y)).collect();
    s.flag = layout.flag;
    s.player.spawn_x = layout.level.spawn_x;
    s.player.spawn_y = layout.level.spawn_y;
    s.player.reset_to_spawn();
    s.time_left = layout.level.time;
    s.frame_counter = 0;
    s.state_timer = 0;
    s.level = layout.level;
    debug!(
        "loaded {} ({} enemies, {} coins)",
        s.level.name,
        s.enemies.len(),
        s.coins.len()
    );
}

fn start_game(s: &mut GameState) {
    load_level(s, s.level_index);
    set_status(s, GameStatus::Playing);
}

/// Back to the first level with a brand-new player,
/// with the status left to the caller.
fn reset_run(s: &mut GameState) {
    let first = &s.levels[0].level;
    s.player = Player::new(first.spawn_x, first.spawn_y, s.rules.start_lives);
    load_level(s, 0);
}

fn reset_game(s: &mut GameState) {
    reset_run(s);
    set_status(s, GameStatus::Playing);
}

fn advance_level(s: &mut GameState) {
    let next = s.level_index + 1;
    if next >= s.levels.len() {
        set_status(s, GameStatus::Victory);
        return;
    }
    load_level(s, next);
    set_status(s, GameStatus::Playing);
}

fn complete_level(s: &mut GameState) {
    s.player.score += s.time_left * TIME_BONUS;
    s.state_timer = s.rules.clear_delay_frames;
    s.frame_counter = 0;
    set_status(s, GameStatus::LevelComplete);
}

// ── Damage ───────────────────────────────────────────────────────────────────

/// Take one hit.  Ignored while invincible; otherwise costs a life and
/// respawns the player, or ends the game on the last life.
fn lose_life(s: &mut GameState) {
    if s.player.invincible_timer > 0 {
        return;
    }
    s.player.lives = s.player.lives.saturating_sub(1);
    s.player.invincible_timer = s.rules.invincibility_frames;
    debug!("life lost, {} left", s.player.lives);

    if s.player.lives == 0 {
        set_status(s, GameStatus::GameOver);
    } else {
        s.player.reset_to_spawn();
        s.time_left = s.level.time;
        s.frame_counter = 0;
    }
}

fn enemy_contact(s: &mut GameState) {
    match s.rules.contact {
        ContactRule::LoseLife => lose_life(s),
        ContactRule::GameOver => {
            if s.player.invincible_timer == 0 {
                s.player.lives = 0;
                set_status(s, GameStatus::GameOver);
            }
        }
    }
}

// ── Per-frame updates ────────────────────────────────────────────────────────

fn update_timer(s: &mut GameState) {
    let fps = s.rules.frames_per_second.max(1);
    if s.frame_counter > 0 && s.frame_counter % fps == 0 && s.time_left > 0 {
        s.time_left -= 1;
        if s.time_left == 0 {
            debug!("time up");
            lose_life(s);
        }
    }
}

fn update_player(s: &mut GameState, input: &Input) {
    let phys = s.physics;
    let p = &mut s.player;

    p.invincible_timer = p.invincible_timer.saturating_sub(1);

    if input.left {
        p.body.dx = (p.body.dx - phys.run_accel).max(-phys.max_run_speed);
    } else if input.right {
        p.body.dx = (p.body.dx + phys.run_accel).min(phys.max_run_speed);
    } else {
        p.body.dx *= phys.friction;
        if p.body.dx.abs() < phys.stop_epsilon {
            p.body.dx = 0.0;
        }
    }

    let jump_pressed = input.jump && !s.prev_jump;
    if jump_pressed && p.body.on_ground {
        p.body.dy = -phys.jump_speed;
        p.body.on_ground = false;
        p.can_double_jump = s.rules.double_jump;
    } else if jump_pressed && p.can_double_jump {
        p.body.dy = -phys.jump_speed;
        p.can_double_jump = false;
    }
    if p.body.on_ground {
        p.can_double_jump = false;
    }

    physics::apply_gravity(&mut p.body, &phys);
    let Step { head_bump, .. } = physics::step(&s.level.grid, &mut p.body);

    if let Some(pos) = head_bump {
        bump_tile(s, pos);
    }

    if s.player.body.bottom() > s.level.height + FALL_MARGIN {
        debug!("fell out of {}", s.level.name);
        lose_life(s);
    }
}

/// A head hit on a question block turns it into a used block and pays out a
/// coin.  Any other tile is left alone, so a second bump does nothing.
fn bump_tile(s: &mut GameState, pos: TilePos) {
    if s.level.grid.get(pos.col as i64, pos.row as i64) != Some(Tile::Question) {
        return;
    }
    s.level.grid.set(pos, Tile::Used);

    let mut coin = Coin::new(
        pos.col as f32 * TILE + TILE / 4.0,
        pos.row as f32 * TILE - TILE,
    );
    coin.collected = true;
    coin.collect_timer = Coin::COLLECT_FRAMES;
    s.coins.push(coin);

    s.player.score += BUMP_SCORE;
    s.player.coins += 1;
    debug!("bumped block at {},{}", pos.col, pos.row);
}

fn update_enemies(s: &mut GameState) {
    let phys = s.physics;
    for i in 0..s.enemies.len() {
        let enemy = &mut s.enemies[i];
        if !enemy.body.alive {
            continue;
        }

        physics::apply_gravity(&mut enemy.body, &phys);
        enemy.body.dx = enemy.heading.sign() * enemy.speed;
        let step = physics::step(&s.level.grid, &mut enemy.body);
        if step.hit_wall {
            enemy.heading = enemy.heading.flipped();
        }
        if enemy.body.on_ground && physics::ledge_ahead(&s.level.grid, &enemy.body, enemy.heading) {
            enemy.heading = enemy.heading.flipped();
        }
        enemy.body.dx = enemy.heading.sign() * enemy.speed;

        if !s.player.body.rect().overlaps(&enemy.body.rect()) {
            continue;
        }
        let player = &mut s.player;
        let stomped = player.body.dy > 0.0
            && player.body.bottom() - enemy.body.top() < enemy.body.h / 2.0;
        if stomped {
            enemy.body.alive = false;
            player.body.dy = -phys.stomp_bounce();
            player.score += STOMP_SCORE;
        } else if player.invincible_timer == 0 {
            enemy_contact(s);
            if s.status != GameStatus::Playing {
                return;
            }
        }
    }
}

fn update_coins(s: &mut GameState) {
    let player = &mut s.player;
    let player_rect = player.body.rect();
    for coin in &mut s.coins {
        if !coin.collected && player_rect.overlaps(&coin.rect()) {
            coin.collected = true;
            coin.collect_timer = Coin::COLLECT_FRAMES;
            player.score += COIN_SCORE;
            player.coins += 1;
        }
        coin.collect_timer = coin.collect_timer.saturating_sub(1);
    }
}

fn update_flag(s: &mut GameState) {
    let reached = s
        .flag
        .as_ref()
        .map_or(false, |flag| s.player.body.rect().overlaps(&flag.rect()));
    if reached {
        complete_level(s);
    }
}
