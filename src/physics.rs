//! Axis-separated AABB collision against the tile grid.
//!
//! A body moves along X and is pushed out of any solid tile it now overlaps,
//! then moves along Y and is pushed out again.  Running X first keeps bodies
//! from tunnelling into corners; the cost is a small snag on inside corners.

use crate::config::Physics;
use crate::entities::{Body, Heading};
use crate::level::{TileGrid, TilePos, TILE};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Outcome of resolving one axis.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Collision {
    /// At least one solid tile overlapped the body.
    pub blocked: bool,
    /// Tile the body's head was pushed out of while moving up.
    pub head_bump: Option<TilePos>,
}

/// Outcome of a full X-then-Y step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Step {
    pub hit_wall: bool,
    pub head_bump: Option<TilePos>,
}

/// Inclusive tile index range covered by `[lo, hi)`.  Any overlap counts,
/// however small; an edge that only touches a tile does not.
fn tile_span(lo: f32, hi: f32) -> (i64, i64) {
    ((lo / TILE).floor() as i64, (hi / TILE).ceil() as i64 - 1)
}

/// Push `body` out of every solid tile it overlaps, along `axis` only.
///
/// The velocity component on that axis is zeroed on contact.  Landing on a
/// tile sets `on_ground`.
pub fn resolve(grid: &TileGrid, body: &mut Body, axis: Axis) -> Collision {
    let (min_col, max_col) = tile_span(body.left(), body.right());
    let (min_row, max_row) = tile_span(body.top(), body.bottom());
    let mut collision = Collision::default();

    for row in min_row..=max_row {
        for col in min_col..=max_col {
            let Some(tile) = grid.get(col, row) else {
                continue;
            };
            if !tile.is_solid() {
                continue;
            }
            collision.blocked = true;

            let tile_left = col as f32 * TILE;
            let tile_top = row as f32 * TILE;
            match axis {
                Axis::Horizontal => {
                    if body.dx > 0.0 {
                        body.x = tile_left - body.w;
                    } else if body.dx < 0.0 {
                        body.x = tile_left + TILE;
                    }
                    body.dx = 0.0;
                }
                Axis::Vertical => {
                    if body.dy > 0.0 {
                        body.y = tile_top - body.h;
                        body.dy = 0.0;
                        body.on_ground = true;
                    } else if body.dy < 0.0 {
                        body.y = tile_top + TILE;
                        body.dy = 0.0;
                        collision.head_bump = Some(TilePos {
                            col: col as usize,
                            row: row as usize,
                        });
                    }
                }
            }
        }
    }

    collision
}

pub fn apply_gravity(body: &mut Body, physics: &Physics) {
    body.dy = (body.dy + physics.gravity).min(physics.max_fall_speed);
}

/// Move by the current velocity, resolving X before Y.
pub fn step(grid: &TileGrid, body: &mut Body) -> Step {
    body.x += body.dx;
    let horizontal = resolve(grid, body, Axis::Horizontal);

    body.on_ground = false;
    body.y += body.dy;
    let vertical = resolve(grid, body, Axis::Vertical);

    Step {
        hit_wall: horizontal.blocked,
        head_bump: vertical.head_bump,
    }
}

/// True when the cell just past the body's leading edge, one pixel below
/// its feet, has no solid tile to stand on.
pub fn ledge_ahead(grid: &TileGrid, body: &Body, heading: Heading) -> bool {
    let probe_x = match heading {
        Heading::Right => body.right() + 1.0,
        Heading::Left => body.left() - 1.0,
    };
    !grid.is_solid_at(probe_x, body.bottom() + 1.0)
}
