use std::sync::Arc;

use tile_runner::compute::init_state;
use tile_runner::config::{builtin_levels, Physics, Rules};
use tile_runner::entities::*;
use tile_runner::level::compile_levels;

#[test]
fn entity_clone_and_eq() {
    assert_eq!(GameStatus::Playing, GameStatus::Playing);
    assert_ne!(GameStatus::Playing, GameStatus::GameOver);
    assert_eq!(Heading::Left.flipped(), Heading::Right);
    assert_eq!(Heading::Right.flipped().flipped(), Heading::Right);
    assert_eq!(Heading::Left.sign(), -1.0);
}

#[test]
fn rect_overlap_excludes_touching_edges() {
    let a = Rect { x: 0.0, y: 0.0, w: 16.0, h: 16.0 };
    let touching = Rect { x: 16.0, y: 0.0, w: 16.0, h: 16.0 };
    let inside = Rect { x: 15.0, y: 15.0, w: 4.0, h: 4.0 };
    assert!(!a.overlaps(&touching));
    assert!(a.overlaps(&inside));
    assert!(inside.overlaps(&a));
}

#[test]
fn body_edges() {
    let b = Body::new(10.0, 20.0, 16.0, 24.0);
    assert_eq!((b.left(), b.right(), b.top(), b.bottom()), (10.0, 26.0, 20.0, 44.0));
    assert!(b.alive);
    assert!(!b.on_ground);
}

#[test]
fn player_reset_to_spawn_zeroes_motion() {
    let mut p = Player::new(8.0, 40.0, 3);
    assert_eq!((p.body.w, p.body.h), (16.0, 24.0));
    p.body.x = 300.0;
    p.body.dx = 0.6;
    p.body.dy = -2.0;
    p.body.on_ground = true;
    p.can_double_jump = true;
    p.score = 900;

    p.reset_to_spawn();
    assert_eq!((p.body.x, p.body.y), (8.0, 40.0));
    assert_eq!((p.body.dx, p.body.dy), (0.0, 0.0));
    assert!(!p.body.on_ground);
    assert!(!p.can_double_jump);
    assert_eq!(p.score, 900);
}

#[test]
fn enemy_starts_walking_left() {
    let e = Enemy::new(0.0, 0.0, 0.3);
    assert_eq!(e.heading, Heading::Left);
    assert_eq!(e.body.dx, -0.3);
}

#[test]
fn flag_rect_rises_from_base() {
    let f = Flag::new(52.0, 32.0);
    let r = f.rect();
    assert_eq!((r.x, r.y, r.w, r.h), (52.0, -64.0, 8.0, 96.0));
}

#[test]
fn coin_visibility_follows_animation() {
    let mut c = Coin::new(0.0, 0.0);
    assert!(c.is_visible());
    c.collected = true;
    c.collect_timer = 3;
    assert!(c.is_visible());
    c.collect_timer = 0;
    assert!(!c.is_visible());
}

fn world() -> GameState {
    let layouts = compile_levels(&builtin_levels()).unwrap();
    init_state(Arc::from(layouts), 0, Physics::default(), Rules::default()).unwrap()
}

#[test]
fn hud_reports_player_and_clock() {
    let mut s = world();
    s.player.score = 1200;
    s.player.coins = 4;
    let hud = s.hud();
    assert_eq!(
        hud,
        Hud {
            score: 1200,
            coins: 4,
            lives: 3,
            time_left: 300,
            world: "World 1-1".to_string(),
        }
    );
}

#[test]
fn camera_clamps_to_level() {
    let mut s = world();
    s.player.body.x = 8.0;
    assert_eq!(s.camera_x(320.0), 0.0);

    s.player.body.x = 500.0;
    assert_eq!(s.camera_x(320.0), 340.0);

    s.player.body.x = s.level.width;
    assert_eq!(s.camera_x(320.0), s.level.width - 320.0);

    // A view wider than the level never scrolls.
    assert_eq!(s.camera_x(s.level.width * 2.0), 0.0);
}

#[test]
fn game_state_clone_is_independent() {
    let original = world();
    let mut cloned = original.clone();
    cloned.player.body.x = 99.0;
    cloned.player.score = 999;
    cloned.enemies.clear();

    assert_eq!(original.player.score, 0);
    assert_ne!(original.player.body.x, 99.0);
    assert!(!original.enemies.is_empty());
    assert_eq!(original.next_level_name(), Some("World 1-2"));
}
