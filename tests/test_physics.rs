use tile_runner::config::{LevelDef, Physics};
use tile_runner::entities::{Body, Heading};
use tile_runner::level::{parse_level, TileGrid, TilePos};
use tile_runner::physics::*;

fn grid(map: &[&str]) -> TileGrid {
    let def = LevelDef {
        name: "Physics".to_string(),
        time: 100,
        map: map.iter().map(|row| row.to_string()).collect(),
    };
    parse_level(&def).unwrap().level.grid
}

/// Floor at y=48, a single block at column 3 (x 48..64, y 32..48).
const ROOM: &[&str] = &[
    "........",
    "........",
    "...#....",
    "########",
];

// ── resolve — vertical ───────────────────────────────────────────────────────

#[test]
fn falling_body_lands_on_tile_top() {
    let g = grid(ROOM);
    let mut body = Body::new(0.0, 34.0, 16.0, 16.0);
    body.dy = 2.0;
    let hit = resolve(&g, &mut body, Axis::Vertical);
    assert!(hit.blocked);
    assert_eq!(body.bottom(), 48.0);
    assert_eq!(body.dy, 0.0);
    assert!(body.on_ground);
    assert_eq!(hit.head_bump, None);
}

#[test]
fn sub_pixel_overlap_still_lands() {
    let g = grid(ROOM);
    let mut body = Body::new(0.0, 32.1, 16.0, 16.0);
    body.dy = 0.105;
    resolve(&g, &mut body, Axis::Vertical);
    assert_eq!(body.y, 32.0);
    assert!(body.on_ground);
}

#[test]
fn touching_edge_is_not_a_collision() {
    let g = grid(ROOM);
    let mut body = Body::new(0.0, 32.0, 16.0, 16.0);
    body.dy = 0.5;
    let hit = resolve(&g, &mut body, Axis::Vertical);
    assert!(!hit.blocked);
    assert_eq!(body.dy, 0.5);
    assert!(!body.on_ground);
}

#[test]
fn rising_body_reports_head_bump() {
    let g = grid(&["...Q....", "........", "########"]);
    let mut body = Body::new(48.0, 14.0, 16.0, 16.0);
    body.dy = -1.0;
    let hit = resolve(&g, &mut body, Axis::Vertical);
    assert_eq!(body.top(), 16.0);
    assert_eq!(body.dy, 0.0);
    assert!(!body.on_ground);
    assert_eq!(hit.head_bump, Some(TilePos { col: 3, row: 0 }));
}

// ── resolve — horizontal ─────────────────────────────────────────────────────

#[test]
fn moving_right_stops_at_tile_left_edge() {
    let g = grid(ROOM);
    let mut body = Body::new(34.0, 32.0, 16.0, 16.0);
    body.dx = 1.0;
    let hit = resolve(&g, &mut body, Axis::Horizontal);
    assert!(hit.blocked);
    assert_eq!(body.right(), 48.0);
    assert_eq!(body.dx, 0.0);
}

#[test]
fn moving_left_stops_at_tile_right_edge() {
    let g = grid(ROOM);
    let mut body = Body::new(62.0, 32.0, 16.0, 16.0);
    body.dx = -1.0;
    let hit = resolve(&g, &mut body, Axis::Horizontal);
    assert!(hit.blocked);
    assert_eq!(body.left(), 64.0);
    assert_eq!(body.dx, 0.0);
}

#[test]
fn off_grid_cells_are_ignored() {
    let g = grid(ROOM);
    let mut body = Body::new(-40.0, -40.0, 16.0, 16.0);
    body.dx = -2.0;
    body.dy = -2.0;
    assert!(!resolve(&g, &mut body, Axis::Horizontal).blocked);
    assert!(!resolve(&g, &mut body, Axis::Vertical).blocked);
    assert_eq!(body.x, -40.0);
    assert_eq!(body.dy, -2.0);
}

// ── step ─────────────────────────────────────────────────────────────────────

#[test]
fn step_resolves_x_before_y() {
    // Moving down-right into the block's top-left corner: X is resolved at
    // the old height (clear of the block), then Y lands on it.
    let g = grid(ROOM);
    let mut body = Body::new(40.0, 16.0, 16.0, 16.0);
    body.dx = 1.0;
    body.dy = 2.0;
    let s = step(&g, &mut body);
    assert!(!s.hit_wall);
    assert_eq!(body.x, 41.0);
    assert_eq!(body.bottom(), 32.0);
    assert!(body.on_ground);
}

#[test]
fn step_clears_on_ground_when_walking_off() {
    let g = grid(&["........", "##......"]);
    let mut body = Body::new(40.0, 0.0, 16.0, 16.0);
    body.on_ground = true;
    step(&g, &mut body);
    assert!(!body.on_ground);
}

#[test]
fn step_reports_wall() {
    let g = grid(ROOM);
    let mut body = Body::new(31.5, 32.0, 16.0, 16.0);
    body.dx = 0.6;
    let s = step(&g, &mut body);
    assert!(s.hit_wall);
    assert_eq!(body.right(), 48.0);
}

// ── gravity & ledges ─────────────────────────────────────────────────────────

#[test]
fn gravity_accumulates_and_caps() {
    let physics = Physics::default();
    let mut body = Body::new(0.0, 0.0, 16.0, 16.0);
    apply_gravity(&mut body, &physics);
    assert_eq!(body.dy, physics.gravity);
    for _ in 0..100 {
        apply_gravity(&mut body, &physics);
    }
    assert_eq!(body.dy, physics.max_fall_speed);
}

#[test]
fn resting_body_gravity_then_resolve() {
    let physics = Physics::default();
    let g = grid(ROOM);
    let mut body = Body::new(0.0, 32.0, 16.0, 16.0);
    apply_gravity(&mut body, &physics);
    assert_eq!(body.dy, physics.gravity);
    step(&g, &mut body);
    assert_eq!(body.dy, 0.0);
    assert_eq!(body.y, 32.0);
    assert!(body.on_ground);
}

#[test]
fn ledge_detection_probes_leading_side() {
    let g = grid(&["........", "##......"]);
    let body = Body::new(16.0, 0.0, 16.0, 16.0);
    assert!(ledge_ahead(&g, &body, Heading::Right));
    assert!(!ledge_ahead(&g, &body, Heading::Left));
}

#[test]
fn ledge_at_map_edge_counts_as_unsupported() {
    let g = grid(&["..", "##"]);
    let body = Body::new(0.0, 0.0, 16.0, 16.0);
    assert!(ledge_ahead(&g, &body, Heading::Left));
}
