use std::io::Write;

use tile_runner::config::*;
use tile_runner::error::PackError;

#[test]
fn default_physics_matches_tuning() {
    let p = Physics::default();
    assert_eq!(p.gravity, 0.105);
    assert_eq!(p.jump_speed, 2.25);
    assert_eq!(p.max_fall_speed, 2.7);
    assert_eq!(p.stomp_bounce(), 1.5);
}

#[test]
fn default_rules() {
    let r = Rules::default();
    assert!(r.double_jump);
    assert_eq!(r.contact, ContactRule::LoseLife);
    assert_eq!(r.start_lives, 3);
    assert_eq!(r.invincibility_frames, 120);
    assert_eq!(r.clear_delay_frames, 180);
}

#[test]
fn builtin_levels_are_named_in_order() {
    let names: Vec<String> = builtin_levels().into_iter().map(|d| d.name).collect();
    assert_eq!(names, ["World 1-1", "World 1-2", "World 1-3"]);
}

const PACK: &str = r#"[
    (
        name: "Tiny",
        time: 50,
        map: [
            "....F.",
            "@#####",
        ],
    ),
]"#;

#[test]
fn parse_pack_reads_ron() {
    let defs = parse_pack(PACK).unwrap();
    assert_eq!(defs.len(), 1);
    assert_eq!(defs[0].name, "Tiny");
    assert_eq!(defs[0].time, 50);
    assert_eq!(defs[0].map[1], "@#####");
}

#[test]
fn parse_pack_rejects_bad_syntax() {
    let err = parse_pack("[ (name: \"x\", time: ) ]").unwrap_err();
    assert!(matches!(err, PackError::Syntax(_)));
}

#[test]
fn parse_pack_rejects_empty_list() {
    assert!(matches!(parse_pack("[]"), Err(PackError::NoLevels)));
}

#[test]
fn load_pack_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(PACK.as_bytes()).unwrap();
    let defs = load_pack(file.path()).unwrap();
    assert_eq!(defs[0].name, "Tiny");
}

#[test]
fn load_pack_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.ron");
    match load_pack(&path) {
        Err(PackError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected io error, got {other:?}"),
    }
}
