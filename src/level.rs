//! Level grids: tile definitions, map parsing and tile lookups.

use crate::config::LevelDef;
use crate::entities::Flag;
use crate::error::{LevelError, PackError};

/// Edge length of one tile in world pixels.
pub const TILE: f32 = 16.0;

/// Spawn used when a map has no `@` marker.
const DEFAULT_SPAWN: (f32, f32) = (TILE * 2.0, TILE * 8.0);

/// Enemies are placed slightly above their marker and drop onto the floor.
const ENEMY_DROP: f32 = 4.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Ground,
    Brick,
    Stone,
    Pipe,
    /// Solid block that pays out a coin when hit from below.
    Question,
    /// A question block that has already been bumped.
    Used,
}

impl Tile {
    pub fn from_glyph(glyph: char) -> Option<Tile> {
        match glyph {
            '.' => Some(Tile::Empty),
            '#' => Some(Tile::Ground),
            'B' => Some(Tile::Brick),
            'S' => Some(Tile::Stone),
            'P' => Some(Tile::Pipe),
            'Q' => Some(Tile::Question),
            'U' => Some(Tile::Used),
            _ => None,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Tile::Empty => '.',
            Tile::Ground => '#',
            Tile::Brick => 'B',
            Tile::Stone => 'S',
            Tile::Pipe => 'P',
            Tile::Question => 'Q',
            Tile::Used => 'U',
        }
    }

    pub fn is_solid(self) -> bool {
        !matches!(self, Tile::Empty)
    }

    pub fn is_bump(self) -> bool {
        matches!(self, Tile::Question)
    }
}

/// Tile coordinates (column, row).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TilePos {
    pub col: usize,
    pub row: usize,
}

/// Rectangular grid of tiles, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct TileGrid {
    cols: usize,
    rows: usize,
    tiles: Vec<Tile>,
}

impl TileGrid {
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Tile at signed tile coordinates; `None` outside the grid.
    pub fn get(&self, col: i64, row: i64) -> Option<Tile> {
        if col < 0 || row < 0 || col as usize >= self.cols || row as usize >= self.rows {
            return None;
        }
        Some(self.tiles[row as usize * self.cols + col as usize])
    }

    pub fn set(&mut self, pos: TilePos, tile: Tile) {
        if pos.col < self.cols && pos.row < self.rows {
            self.tiles[pos.row * self.cols + pos.col] = tile;
        }
    }

    /// Tile under the world-space point, or `None` when off the map.
    pub fn tile_at(&self, x: f32, y: f32) -> Option<Tile> {
        self.get((x / TILE).floor() as i64, (y / TILE).floor() as i64)
    }

    pub fn is_solid_at(&self, x: f32, y: f32) -> bool {
        self.tile_at(x, y).map_or(false, Tile::is_solid)
    }

    pub fn row(&self, row: usize) -> &[Tile] {
        &self.tiles[row * self.cols..(row + 1) * self.cols]
    }
}

/// Static part of a loaded level.
#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    pub name: String,
    pub grid: TileGrid,
    /// Size in world pixels.
    pub width: f32,
    pub height: f32,
    pub spawn_x: f32,
    pub spawn_y: f32,
    /// Time budget in seconds.
    pub time: u32,
}

/// A parsed level plus the entity spawn points pulled out of its map.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    pub level: Level,
    pub enemy_spawns: Vec<(f32, f32)>,
    pub coin_spawns: Vec<(f32, f32)>,
    pub flag: Option<Flag>,
}

/// Parse a level definition.  Marker glyphs (`G`, `o`, `F`, `|`, `@`) are
/// replaced by plain tiles and reported as spawn points.
pub fn parse_level(def: &LevelDef) -> Result<Layout, LevelError> {
    let rows: Vec<Vec<char>> = def.map.iter().map(|r| r.chars().collect()).collect();
    // Short rows are padded with empty tiles up to the widest row.
    let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    if cols == 0 {
        return Err(LevelError::Empty);
    }

    let mut tiles = Vec::with_capacity(cols * rows.len());
    let mut enemy_spawns = Vec::new();
    let mut coin_spawns = Vec::new();
    let mut flag_marker = None;
    let mut spawn = DEFAULT_SPAWN;

    for (ry, row) in rows.iter().enumerate() {
        for (cx, &glyph) in row.iter().enumerate() {
            let world_x = cx as f32 * TILE;
            let world_y = ry as f32 * TILE;
            let tile = match glyph {
                'G' => {
                    enemy_spawns.push((world_x, world_y - TILE - ENEMY_DROP));
                    Tile::Empty
                }
                'o' => {
                    coin_spawns.push((world_x + TILE / 4.0, world_y - TILE));
                    Tile::Empty
                }
                'F' => {
                    flag_marker = Some((cx, ry));
                    Tile::Empty
                }
                '|' => Tile::Empty,
                '@' => {
                    spawn = (world_x + TILE / 2.0, world_y - TILE * 1.5);
                    Tile::Ground
                }
                other => Tile::from_glyph(other).ok_or(LevelError::UnknownGlyph {
                    glyph: other,
                    col: cx,
                    row: ry,
                })?,
            };
            tiles.push(tile);
        }
        tiles.extend(std::iter::repeat(Tile::Empty).take(cols - row.len()));
    }

    let grid = TileGrid {
        cols,
        rows: rows.len(),
        tiles,
    };

    // The pole stands on the first solid tile at or below its marker.
    let flag = flag_marker.map(|(cx, ry)| {
        let base_row = (ry..grid.rows)
            .find(|&gy| grid.row(gy)[cx].is_solid())
            .unwrap_or(ry);
        Flag::new(cx as f32 * TILE + TILE / 4.0, base_row as f32 * TILE)
    });

    let level = Level {
        name: def.name.clone(),
        width: cols as f32 * TILE,
        height: grid.rows as f32 * TILE,
        grid,
        spawn_x: spawn.0,
        spawn_y: spawn.1,
        time: def.time,
    };

    Ok(Layout {
        level,
        enemy_spawns,
        coin_spawns,
        flag,
    })
}

/// Parse every level of a pack up front so a bad map is reported before the
/// game starts.
pub fn compile_levels(defs: &[LevelDef]) -> Result<Vec<Layout>, PackError> {
    if defs.is_empty() {
        return Err(PackError::NoLevels);
    }
    defs.iter()
        .enumerate()
        .map(|(index, def)| {
            parse_level(def).map_err(|source| PackError::Level {
                index,
                name: def.name.clone(),
                source,
            })
        })
        .collect()
}
