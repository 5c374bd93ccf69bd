//! Ground and wall tiles.
//!
//! Each pattern fills the whole frame with a ground layer, then scatters
//! detail from the decorative noise source. Water and lava waves are
//! deterministic sine curves so animated tiles line up frame to frame.

use std::f32::consts::PI;

use crate::color::{darken, lighten, mix};
use crate::error::GenerationError;
use crate::features::WallType;
use crate::noise::DecorativeNoise;
use crate::pose::Pose;
use crate::primitives::outline_rect;
use crate::resolver::{DrawSpec, TilePattern, Variant};
use crate::surface::{Layer, Paint, Surface};

use super::{mismatch, PatternFn, RigDrawer};

#[derive(Debug, Clone, Copy, Default)]
pub struct TileDrawer;

impl TileDrawer {
    /// Helper for a pattern; `None` for names no helper draws.
    pub fn helper(pattern: &TilePattern) -> Option<PatternFn> {
        let helper: PatternFn = match pattern {
            TilePattern::Grass => grass,
            TilePattern::Dirt => dirt,
            TilePattern::Sand => sand,
            TilePattern::Water => water,
            TilePattern::Lava => lava,
            TilePattern::Stone => stone,
            TilePattern::Wood => wood_floor,
            TilePattern::Wall(WallType::Brick) => brick_wall,
            TilePattern::Wall(WallType::Stone) => stone_wall,
            TilePattern::Wall(WallType::Wood) => wood_wall,
            TilePattern::Wall(WallType::Dungeon) => dungeon_wall,
            TilePattern::Unknown(_) => return None,
        };
        Some(helper)
    }
}

impl RigDrawer for TileDrawer {
    fn draw(
        &self,
        surface: &mut dyn Surface,
        spec: &DrawSpec,
        _pose: &Pose,
        noise: &mut DecorativeNoise,
    ) -> Result<(), GenerationError> {
        let pattern = match &spec.variant {
            Variant::Tile(pattern) => pattern,
            _ => return Err(mismatch("tile", spec)),
        };
        let helper = Self::helper(pattern).ok_or_else(|| GenerationError::UnknownPattern {
            family: "tile",
            name: spec.variant.name(),
        })?;
        helper(surface, spec, noise)
    }
}

fn size(spec: &DrawSpec) -> (f32, f32) {
    (spec.width as f32, spec.height as f32)
}

fn ground(surface: &mut dyn Surface, spec: &DrawSpec) {
    let (w, h) = size(spec);
    surface.set_layer(Layer::Ground);
    surface.fill_rect(0.0, 0.0, w, h, Paint::solid(spec.base_color));
}

fn grass(surface: &mut dyn Surface, spec: &DrawSpec, noise: &mut DecorativeNoise) -> Result<(), GenerationError> {
    let (w, h) = size(spec);
    ground(surface, spec);
    surface.set_layer(Layer::Pattern);
    let blades = (w * h / 40.0) as u32;
    for _ in 0..blades {
        let (x, y) = noise.point(w, h);
        let tall = noise.range(2.0, 4.0);
        let lean = noise.range(-1.0, 1.0);
        let color = if noise.chance(0.5) { lighten(spec.base_color, 20.0) } else { darken(spec.base_color, 18.0) };
        surface.draw_line((x, y), (x + lean, y - tall), 1.0, Paint::solid(color));
    }
    surface.set_layer(Layer::Detail);
    if noise.chance(0.4) {
        let (x, y) = noise.point(w, h);
        let petal = if noise.chance(0.5) { 0xFFF176 } else { 0xF8F8F8 };
        surface.fill_ellipse(x, y, 1.0, 1.0, Paint::solid(petal));
    }
    Ok(())
}

fn dirt(surface: &mut dyn Surface, spec: &DrawSpec, noise: &mut DecorativeNoise) -> Result<(), GenerationError> {
    let (w, h) = size(spec);
    ground(surface, spec);
    surface.set_layer(Layer::Pattern);
    for _ in 0..(w * h / 64.0) as u32 {
        let (x, y) = noise.point(w, h);
        let r = noise.range(0.6, 1.6);
        let color = if noise.chance(0.6) { darken(spec.base_color, 25.0) } else { lighten(spec.base_color, 15.0) };
        surface.fill_ellipse(x, y, r, r * 0.8, Paint::solid(color));
    }
    Ok(())
}

fn sand(surface: &mut dyn Surface, spec: &DrawSpec, noise: &mut DecorativeNoise) -> Result<(), GenerationError> {
    let (w, h) = size(spec);
    ground(surface, spec);
    surface.set_layer(Layer::Pattern);
    let ripple = Paint::with_alpha(darken(spec.base_color, 12.0), 0.6);
    let mut y = h * 0.2;
    while y < h {
        surface.draw_line((0.0, y), (w, y + noise.range(-1.0, 1.0)), 1.0, ripple);
        y += h * 0.3;
    }
    surface.set_layer(Layer::Detail);
    for _ in 0..(w * h / 48.0) as u32 {
        let (x, y) = noise.point(w, h);
        surface.fill_rect(x, y, 1.0, 1.0, Paint::solid(lighten(spec.base_color, 18.0)));
    }
    Ok(())
}

/// Horizontal sine bands, phase-shifted by the frame index.
fn waves(surface: &mut dyn Surface, spec: &DrawSpec, color: u32, bands: u32, amplitude: f32) {
    let (w, h) = size(spec);
    let phase = spec.frame_index as f32 * PI / 2.0;
    let steps = (w / 2.0).max(2.0) as u32;
    for band in 0..bands {
        let base_y = h * (band as f32 + 0.5) / bands as f32;
        let mut prev = (0.0, base_y + amplitude * phase.sin());
        for i in 1..=steps {
            let x = w * i as f32 / steps as f32;
            let y = base_y + amplitude * (x / w * 2.0 * PI + phase + band as f32).sin();
            surface.draw_line(prev, (x, y), 1.0, Paint::with_alpha(color, 0.7));
            prev = (x, y);
        }
    }
}

fn water(surface: &mut dyn Surface, spec: &DrawSpec, _noise: &mut DecorativeNoise) -> Result<(), GenerationError> {
    ground(surface, spec);
    surface.set_layer(Layer::Pattern);
    waves(surface, spec, lighten(spec.base_color, 35.0), 4, spec.height as f32 * 0.04);
    Ok(())
}

fn lava(surface: &mut dyn Surface, spec: &DrawSpec, _noise: &mut DecorativeNoise) -> Result<(), GenerationError> {
    let (w, h) = size(spec);
    ground(surface, spec);
    surface.set_layer(Layer::Pattern);
    waves(surface, spec, darken(spec.base_color, 45.0), 3, h * 0.06);
    surface.set_layer(Layer::Detail);
    let phase = spec.frame_index as f32 * PI / 2.0;
    for i in 0..3 {
        let t = i as f32 / 3.0;
        let x = w * (0.2 + 0.3 * i as f32);
        let y = h * (0.3 + 0.4 * (t * 5.0 + phase).sin().abs());
        surface.fill_ellipse(x, y, w * 0.06, h * 0.05, Paint::solid(mix(spec.base_color, 0xFFD700, 0.6)));
    }
    Ok(())
}

fn cracks(surface: &mut dyn Surface, spec: &DrawSpec, noise: &mut DecorativeNoise, count: u32) {
    let (w, h) = size(spec);
    let paint = Paint::with_alpha(darken(spec.base_color, 40.0), 0.8);
    for _ in 0..count {
        let mut at = noise.point(w, h);
        for _ in 0..3 {
            let next = (at.0 + noise.range(-3.0, 3.0), at.1 + noise.range(-3.0, 3.0));
            surface.draw_line(at, next, 1.0, paint);
            at = next;
        }
    }
}

fn stone(surface: &mut dyn Surface, spec: &DrawSpec, noise: &mut DecorativeNoise) -> Result<(), GenerationError> {
    let (w, h) = size(spec);
    ground(surface, spec);
    surface.set_layer(Layer::Pattern);
    let seam = Paint::solid(darken(spec.base_color, 25.0));
    let (cw, ch) = (w / 2.0, h / 2.0);
    for row in 0..2 {
        for col in 0..2 {
            outline_rect(surface, col as f32 * cw, row as f32 * ch, cw, ch, 1.0, seam);
        }
    }
    surface.set_layer(Layer::Detail);
    cracks(surface, spec, noise, 2);
    Ok(())
}

fn wood_floor(surface: &mut dyn Surface, spec: &DrawSpec, noise: &mut DecorativeNoise) -> Result<(), GenerationError> {
    let (w, h) = size(spec);
    ground(surface, spec);
    surface.set_layer(Layer::Pattern);
    let plank = h / 4.0;
    let seam = Paint::solid(darken(spec.base_color, 35.0));
    let grain = Paint::with_alpha(darken(spec.base_color, 15.0), 0.7);
    for i in 0..4 {
        let y = i as f32 * plank;
        surface.fill_rect(0.0, y + plank - 1.0, w, 1.0, seam);
        let split = noise.range(w * 0.3, w * 0.7);
        surface.fill_rect(split, y, 1.0, plank, seam);
        surface.draw_line((2.0, y + plank * 0.5), (w - 2.0, y + plank * 0.5 + noise.range(-1.0, 1.0)), 1.0, grain);
    }
    Ok(())
}

/// Offset courses of blocks separated by mortar.
fn courses(surface: &mut dyn Surface, spec: &DrawSpec, rows: u32, cols: u32, mortar: u32) {
    let (w, h) = size(spec);
    let bh = h / rows as f32;
    let bw = w / cols as f32;
    let paint = Paint::solid(mortar);
    for row in 0..rows {
        let y = row as f32 * bh;
        surface.fill_rect(0.0, y + bh - 1.0, w, 1.0, paint);
        let offset = if row % 2 == 0 { 0.0 } else { bw / 2.0 };
        let mut x = offset;
        while x < w {
            surface.fill_rect(x, y, 1.0, bh, paint);
            x += bw;
        }
    }
}

fn brick_wall(surface: &mut dyn Surface, spec: &DrawSpec, noise: &mut DecorativeNoise) -> Result<(), GenerationError> {
    let (w, h) = size(spec);
    ground(surface, spec);
    surface.set_layer(Layer::Pattern);
    courses(surface, spec, 4, 2, 0xC8C0B0);
    surface.set_layer(Layer::Detail);
    for _ in 0..3 {
        let (x, y) = noise.point(w, h);
        surface.fill_rect(x, y, 2.0, 1.0, Paint::solid(darken(spec.base_color, 20.0)));
    }
    Ok(())
}

fn stone_wall(surface: &mut dyn Surface, spec: &DrawSpec, noise: &mut DecorativeNoise) -> Result<(), GenerationError> {
    ground(surface, spec);
    surface.set_layer(Layer::Pattern);
    courses(surface, spec, 3, 2, darken(spec.base_color, 35.0));
    surface.set_layer(Layer::Detail);
    cracks(surface, spec, noise, 2);
    Ok(())
}

fn wood_wall(surface: &mut dyn Surface, spec: &DrawSpec, _noise: &mut DecorativeNoise) -> Result<(), GenerationError> {
    let (w, h) = size(spec);
    ground(surface, spec);
    surface.set_layer(Layer::Pattern);
    let planks = 4;
    let pw = w / planks as f32;
    let seam = Paint::solid(darken(spec.base_color, 35.0));
    for i in 1..planks {
        surface.fill_rect(i as f32 * pw, 0.0, 1.0, h, seam);
    }
    surface.set_layer(Layer::Detail);
    // Nail heads top and bottom of each plank
    let nail = Paint::solid(0x6E6E6E);
    for i in 0..planks {
        let x = i as f32 * pw + pw / 2.0;
        surface.fill_ellipse(x, h * 0.12, 1.0, 1.0, nail);
        surface.fill_ellipse(x, h * 0.88, 1.0, 1.0, nail);
    }
    Ok(())
}

fn dungeon_wall(surface: &mut dyn Surface, spec: &DrawSpec, noise: &mut DecorativeNoise) -> Result<(), GenerationError> {
    let (w, h) = size(spec);
    ground(surface, spec);
    surface.set_layer(Layer::Pattern);
    courses(surface, spec, 2, 2, darken(spec.base_color, 40.0));
    surface.set_layer(Layer::Detail);
    let rivet = Paint::solid(lighten(spec.base_color, 30.0));
    for (x, y) in [(0.15, 0.2), (0.85, 0.2), (0.15, 0.7), (0.85, 0.7)] {
        surface.fill_ellipse(w * x, h * y, 1.2, 1.2, rivet);
    }
    let moss = Paint::with_alpha(0x4F7942, 0.8);
    for _ in 0..noise.index(5) + 2 {
        let x = noise.range(0.0, w);
        let y = h - noise.range(0.0, h * 0.25);
        surface.fill_ellipse(x, y, noise.range(1.0, 2.5), 1.2, moss);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::synthesize_frame;
    use crate::rigs::test_support::{record, spec};
    use crate::surface::{PixelSurface, RecordingSurface};

    #[test]
    fn test_every_pattern_fills_the_frame() {
        for raw in [
            "tile_grass",
            "tile_dirt",
            "tile_sand",
            "tile_water",
            "tile_lava",
            "tile_stone",
            "tile_wood",
            "tile_wall_brick",
            "tile_wall_stone",
            "tile_wall_wood",
            "tile_wall_dungeon",
        ] {
            let spec = spec(raw);
            let mut surface = PixelSurface::new(spec.width, spec.height);
            let pose = synthesize_frame(&spec, 0);
            TileDrawer.draw(&mut surface, &spec, &pose, &mut DecorativeNoise::seeded(3)).unwrap();
            assert!(surface.image().pixels().all(|p| p[3] == 255), "{}", raw);
        }
    }

    #[test]
    fn test_unknown_pattern_fails() {
        let spec = spec("tile_moonrock");
        let pose = synthesize_frame(&spec, 0);
        let mut surface = RecordingSurface::new(32, 32);
        let err = TileDrawer
            .draw(&mut surface, &spec, &pose, &mut DecorativeNoise::seeded(1))
            .unwrap_err();
        assert_eq!(err, GenerationError::UnknownPattern { family: "tile", name: "moonrock".to_string() });
    }

    #[test]
    fn test_seeded_noise_is_reproducible() {
        let spec = spec("tile_grass");
        let pose = synthesize_frame(&spec, 0);
        let render = |seed| {
            let mut surface = PixelSurface::new(32, 32);
            TileDrawer.draw(&mut surface, &spec, &pose, &mut DecorativeNoise::seeded(seed)).unwrap();
            surface.into_image()
        };
        assert_eq!(render(9), render(9));
        assert_ne!(render(9), render(10));
    }

    #[test]
    fn test_water_waves_move_with_frame() {
        let a = record(&TileDrawer, &spec("tile_water_f0"));
        let b = record(&TileDrawer, &spec("tile_water_f1"));
        assert_ne!(a.calls(), b.calls());
    }

    #[test]
    fn test_wall_layers() {
        let surface = record(&TileDrawer, &spec("tile_wall_dungeon"));
        assert_eq!(surface.layer_order(), vec![Layer::Ground, Layer::Pattern, Layer::Detail]);
    }
}
