//! Decorative background layout.  Purely cosmetic; never touches gameplay.

use rand::Rng;

use crate::level::TILE;

/// One cloud, in world pixels.  `span` is its width in tiles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cloud {
    pub x: f32,
    pub y: f32,
    pub span: u8,
}

/// Average horizontal gap between clouds.
const CLOUD_SPACING: f32 = TILE * 12.0;

/// Scatter clouds across a level `width` pixels wide, keeping them in the
/// top `sky_rows` tile rows.  All randomness comes through `rng` so callers
/// control determinism.
pub fn scatter_clouds(width: f32, sky_rows: u32, rng: &mut impl Rng) -> Vec<Cloud> {
    let rows = sky_rows.max(1);
    let mut clouds = Vec::new();
    let mut x = rng.gen_range(0.0..CLOUD_SPACING);
    while x < width {
        clouds.push(Cloud {
            x,
            y: rng.gen_range(0..rows) as f32 * TILE,
            span: rng.gen_range(2..=4),
        });
        x += rng.gen_range(CLOUD_SPACING * 0.5..CLOUD_SPACING * 1.5);
    }
    clouds
}
