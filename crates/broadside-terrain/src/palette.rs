//! Terrain color palettes.

use rand::Rng;

/// Base rock colors: brown, dim gray, dark olive green, dark slate gray.
pub const MOUNTAIN_COLORS: [u32; 4] = [0x8b4513, 0x696969, 0x556b2f, 0x2f4f4f];

/// Snow cap colors, white to light gray.
pub const SNOW_COLORS: [u32; 4] = [0xffffff, 0xf0f0f0, 0xe8e8e8, 0xf5f5f5];

pub fn pick<R: Rng + ?Sized>(rng: &mut R, palette: &[u32; 4]) -> u32 {
    palette[rng.gen_range(0..palette.len())]
}

/// Scale every channel of `color` by a random factor in `[1 - variation, 1 + variation)`.
pub fn adjust_color<R: Rng + ?Sized>(rng: &mut R, color: u32, variation: f64) -> u32 {
    let factor = 1.0 - variation + rng.gen::<f64>() * variation * 2.0;
    let channel = |shift: u32| -> u32 {
        let value = ((color >> shift) & 0xff) as f64;
        ((value * factor).floor().clamp(0.0, 255.0) as u32) << shift
    };
    channel(16) | channel(8) | channel(0)
}
