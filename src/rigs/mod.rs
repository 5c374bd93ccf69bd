//! Archetype rig drawers.
//!
//! One [`RigDrawer`] per [`Archetype`], held in a [`DrawerTable`] the engine
//! builds at construction. Drawers are pure compositions of surface calls:
//! given a spec, a pose and a noise source they emit layers in a fixed,
//! direction-dependent order and never touch engine state.
//!
//! # Drawers
//!
//! - [`HumanoidDrawer`]: players, NPCs, skeletons, knights...
//! - [`GhostDrawer`]: floating silhouettes with a wavy hem
//! - [`SlimeDrawer`]: squashy domes
//! - [`MonsterDrawer`]: beast, arachnid and winged body plans
//! - [`TileDrawer`]: ground and wall patterns
//! - [`ItemDrawer`]: pickup icons
//! - [`UiDrawer`]: panels, buttons, bars, slots, cursors
//! - [`GenericDrawer`]: framed box for keys nothing else understands

pub mod generic;
pub mod ghost;
pub mod humanoid;
pub mod item;
pub mod monster;
pub mod slime;
pub mod tile;
pub mod ui;

pub use generic::GenericDrawer;
pub use ghost::GhostDrawer;
pub use humanoid::HumanoidDrawer;
pub use item::ItemDrawer;
pub use monster::MonsterDrawer;
pub use slime::SlimeDrawer;
pub use tile::TileDrawer;
pub use ui::UiDrawer;

use std::collections::HashMap;
use std::fmt;

use crate::color::mix;
use crate::error::GenerationError;
use crate::noise::DecorativeNoise;
use crate::pose::Pose;
use crate::resolver::{Archetype, DrawSpec, MAX_FRAME_SIZE, MAX_TEXTURE_SIZE};
use crate::surface::{Layer, Paint, Surface};

/// Draws one frame of one archetype.
pub trait RigDrawer {
    /// Draw `spec` in `pose` onto the surface's current viewport.
    ///
    /// Must not fail for a structurally valid spec; optional details that
    /// cannot be drawn are skipped.
    fn draw(
        &self,
        surface: &mut dyn Surface,
        spec: &DrawSpec,
        pose: &Pose,
        noise: &mut DecorativeNoise,
    ) -> Result<(), GenerationError>;
}

impl<F> RigDrawer for F
where
    F: Fn(&mut dyn Surface, &DrawSpec, &Pose, &mut DecorativeNoise) -> Result<(), GenerationError>,
{
    fn draw(
        &self,
        surface: &mut dyn Surface,
        spec: &DrawSpec,
        pose: &Pose,
        noise: &mut DecorativeNoise,
    ) -> Result<(), GenerationError> {
        self(surface, spec, pose, noise)
    }
}

/// Canonical signature of the per-pattern helpers used by the tile, item
/// and UI drawers.
pub type PatternFn =
    fn(&mut dyn Surface, &DrawSpec, &mut DecorativeNoise) -> Result<(), GenerationError>;

/// Archetype → drawer capability table.
pub struct DrawerTable {
    drawers: HashMap<Archetype, Box<dyn RigDrawer>>,
}

impl DrawerTable {
    /// Table with no drawers at all.
    pub fn empty() -> Self {
        Self { drawers: HashMap::new() }
    }

    /// Table with the built-in drawer for every archetype.
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        table.register(Archetype::Humanoid, Box::new(HumanoidDrawer));
        table.register(Archetype::Ghost, Box::new(GhostDrawer));
        table.register(Archetype::Slime, Box::new(SlimeDrawer));
        table.register(Archetype::Monster, Box::new(MonsterDrawer));
        table.register(Archetype::Tile, Box::new(TileDrawer));
        table.register(Archetype::Item, Box::new(ItemDrawer));
        table.register(Archetype::Ui, Box::new(UiDrawer));
        table.register(Archetype::Generic, Box::new(GenericDrawer));
        table
    }

    /// Install a drawer, returning the one it replaces.
    pub fn register(
        &mut self,
        archetype: Archetype,
        drawer: Box<dyn RigDrawer>,
    ) -> Option<Box<dyn RigDrawer>> {
        self.drawers.insert(archetype, drawer)
    }

    pub fn contains(&self, archetype: Archetype) -> bool {
        self.drawers.contains_key(&archetype)
    }

    pub fn get(&self, archetype: Archetype) -> Result<&dyn RigDrawer, GenerationError> {
        self.drawers
            .get(&archetype)
            .map(|d| d.as_ref())
            .ok_or_else(|| GenerationError::MissingDrawer(archetype.to_string()))
    }

    /// Validate geometry, then dispatch to the archetype's drawer.
    pub fn draw(
        &self,
        surface: &mut dyn Surface,
        spec: &DrawSpec,
        pose: &Pose,
        noise: &mut DecorativeNoise,
    ) -> Result<(), GenerationError> {
        check_geometry(spec, pose)?;
        self.get(spec.archetype)?.draw(surface, spec, pose, noise)
    }
}

impl Default for DrawerTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for DrawerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut archetypes: Vec<&Archetype> = self.drawers.keys().collect();
        archetypes.sort();
        f.debug_struct("DrawerTable").field("archetypes", &archetypes).finish()
    }
}

/// Texture size for `spec`, rejecting frames and strips outside the
/// drawable range.
pub fn check_layout(spec: &DrawSpec) -> Result<(u32, u32), GenerationError> {
    let invalid = |reason: String| GenerationError::InvalidGeometry { key: spec.key.to_string(), reason };
    if spec.width == 0 || spec.height == 0 || spec.width > MAX_FRAME_SIZE || spec.height > MAX_FRAME_SIZE {
        return Err(invalid(format!("frame size {}x{}", spec.width, spec.height)));
    }
    match spec.texture_size() {
        Some((width, height)) if width <= MAX_TEXTURE_SIZE => Ok((width, height)),
        _ => Err(invalid(format!(
            "{} frames of width {} exceed {} pixels",
            spec.frame_count(),
            spec.width,
            MAX_TEXTURE_SIZE
        ))),
    }
}

/// Reject specs no drawer can lay out.
pub fn check_geometry(spec: &DrawSpec, pose: &Pose) -> Result<(), GenerationError> {
    let invalid = |reason: String| GenerationError::InvalidGeometry { key: spec.key.to_string(), reason };
    check_layout(spec)?;
    if !pose.is_finite() {
        return Err(invalid(format!("non-finite pose on frame {}", pose.frame)));
    }
    if pose.squash <= 0.0 || pose.stretch <= 0.0 {
        return Err(invalid(format!("non-positive scale {}x{}", pose.squash, pose.stretch)));
    }
    Ok(())
}

/// Size envelope of one frame with the pose's offset, lean and scale applied.
///
/// Points are addressed as `(fx, fy)`: `fx` is a fraction of the width from
/// the centre line, `fy` a fraction of the height above the ground line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub w: f32,
    pub h: f32,
    pub cx: f32,
    pub ground: f32,
    pub squash: f32,
    pub stretch: f32,
    pub lean: f32,
}

impl Envelope {
    pub fn new(spec: &DrawSpec, pose: &Pose) -> Self {
        let w = spec.width as f32;
        let h = spec.height as f32;
        Self {
            w,
            h,
            cx: w / 2.0 + pose.body_offset.0 * w,
            ground: h * 0.94 + pose.body_offset.1 * h,
            squash: pose.squash,
            stretch: pose.stretch,
            lean: pose.lean,
        }
    }

    /// Surface position of an envelope point. Higher points lean further.
    pub fn at(&self, fx: f32, fy: f32) -> (f32, f32) {
        (
            self.cx + fx * self.w * self.squash + self.lean * fy * 0.25 * self.w,
            self.ground - fy * self.h * self.stretch,
        )
    }

    pub fn x(&self, fx: f32, fy: f32) -> f32 {
        self.at(fx, fy).0
    }

    pub fn y(&self, fy: f32) -> f32 {
        self.ground - fy * self.h * self.stretch
    }

    /// Horizontal length in pixels.
    pub fn sx(&self, fx: f32) -> f32 {
        fx * self.w * self.squash
    }

    /// Vertical length in pixels.
    pub fn sy(&self, fy: f32) -> f32 {
        fy * self.h * self.stretch
    }

    /// Length in pixels that ignores squash and stretch (line widths, radii).
    pub fn unit(&self, f: f32) -> f32 {
        f * self.w.min(self.h)
    }
}

/// Paint for a body part: hit flash whitens, pose alpha fades.
pub fn body_paint(color: u32, pose: &Pose) -> Paint {
    let color = if pose.flash > 0.0 { mix(color, 0xFFFFFF, pose.flash * 0.7) } else { color };
    Paint::with_alpha(color, pose.alpha)
}

/// Blob shadow on the ground line.
pub fn ground_shadow(surface: &mut dyn Surface, env: &Envelope, half_width: f32, pose: &Pose) {
    let (x, y) = (env.cx, env.ground);
    surface.set_layer(Layer::Shadow);
    surface.fill_ellipse(x, y, env.w * half_width, env.h * 0.04, Paint::with_alpha(0x000000, 0.25 * pose.alpha));
}

/// Pose particles (souls, spell sparks) in the effect layer.
pub fn draw_particles(surface: &mut dyn Surface, env: &Envelope, pose: &Pose, color: u32) {
    if pose.particles.is_empty() {
        return;
    }
    surface.set_layer(Layer::Effect);
    for particle in &pose.particles {
        let r = env.unit(particle.radius).max(0.5);
        surface.fill_ellipse(particle.x * env.w, particle.y * env.h, r, r, Paint::with_alpha(color, particle.alpha));
    }
}

/// Spell glow around a point, sized by the pose's glow radius.
pub fn draw_glow(surface: &mut dyn Surface, env: &Envelope, at: (f32, f32), pose: &Pose, color: u32) {
    if pose.glow <= 0.0 {
        return;
    }
    surface.set_layer(Layer::Effect);
    let r = pose.glow * env.w;
    surface.fill_ellipse(at.0, at.1, r, r, Paint::with_alpha(color, 0.3));
    surface.fill_ellipse(at.0, at.1, r * 0.5, r * 0.5, Paint::with_alpha(color, 0.5));
}

/// Variant mismatch for a drawer that expected `expected`.
pub fn mismatch(expected: &'static str, spec: &DrawSpec) -> GenerationError {
    GenerationError::VariantMismatch { expected, found: spec.variant.name() }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::features::FeatureOverrides;
    use crate::noise::DecorativeNoise;
    use crate::pose::synthesize_frame;
    use crate::resolver::{DrawSpec, Resolver};
    use crate::surface::RecordingSurface;

    use super::RigDrawer;

    pub fn spec(raw: &str) -> DrawSpec {
        Resolver::default().resolve_str(raw, None, &FeatureOverrides::default())
    }

    pub fn spec_with(raw: &str, overrides: FeatureOverrides) -> DrawSpec {
        Resolver::default().resolve_str(raw, None, &overrides)
    }

    /// Draw the spec's frame onto a recording surface.
    pub fn record(drawer: &dyn RigDrawer, spec: &DrawSpec) -> RecordingSurface {
        let mut surface = RecordingSurface::new(spec.width, spec.height);
        let pose = synthesize_frame(spec, spec.frame_index);
        let mut noise = DecorativeNoise::seeded(7);
        drawer.draw(&mut surface, spec, &pose, &mut noise).unwrap();
        surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::synthesize_frame;
    use crate::surface::RecordingSurface;
    use test_support::spec;

    #[test]
    fn test_builtin_table_covers_every_archetype() {
        let table = DrawerTable::builtin();
        for archetype in Archetype::ALL {
            assert!(table.contains(archetype), "{}", archetype);
        }
    }

    #[test]
    fn test_missing_drawer() {
        let table = DrawerTable::empty();
        let spec = spec("enemy_ghost");
        let pose = synthesize_frame(&spec, 0);
        let mut surface = RecordingSurface::new(32, 32);
        let err = table
            .draw(&mut surface, &spec, &pose, &mut DecorativeNoise::seeded(1))
            .unwrap_err();
        assert_eq!(err, GenerationError::MissingDrawer("ghost".to_string()));
    }

    #[test]
    fn test_closures_are_drawers() {
        let mut table = DrawerTable::empty();
        table.register(
            Archetype::Slime,
            Box::new(|_: &mut dyn Surface, _: &DrawSpec, _: &Pose, _: &mut DecorativeNoise| {
                Err(GenerationError::Drawer("boom".to_string()))
            }),
        );
        let spec = spec("enemy_slime");
        let pose = synthesize_frame(&spec, 0);
        let mut surface = RecordingSurface::new(32, 32);
        let result = table.draw(&mut surface, &spec, &pose, &mut DecorativeNoise::seeded(1));
        assert_eq!(result, Err(GenerationError::Drawer("boom".to_string())));
    }

    #[test]
    fn test_zero_size_is_invalid_geometry() {
        let mut spec = spec("tile_grass");
        spec.width = 0;
        let pose = synthesize_frame(&spec, 0);
        assert!(matches!(
            check_geometry(&spec, &pose),
            Err(GenerationError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn test_oversized_frames_are_invalid_geometry() {
        let mut tall = spec("tile_grass");
        tall.height = MAX_FRAME_SIZE + 1;
        assert!(matches!(check_layout(&tall), Err(GenerationError::InvalidGeometry { .. })));

        // five death frames at the frame cap overrun the strip cap
        let mut strip = spec("enemy_skeleton_death_down_sheet");
        strip.width = MAX_FRAME_SIZE;
        assert!(check_layout(&strip).is_err());
        strip.width = MAX_TEXTURE_SIZE / 5;
        assert_eq!(check_layout(&strip), Ok((MAX_TEXTURE_SIZE / 5 * 5, 32)));
    }

    #[test]
    fn test_non_finite_pose_is_invalid_geometry() {
        let spec = spec("player_hero");
        let mut pose = synthesize_frame(&spec, 0);
        pose.lean = f32::NAN;
        assert!(check_geometry(&spec, &pose).is_err());
    }

    #[test]
    fn test_envelope_ground_and_lean() {
        let spec = spec("player_hero");
        let mut pose = synthesize_frame(&spec, 0);
        pose.lean = 0.0;
        pose.body_offset = (0.0, 0.0);
        pose.stretch = 1.0;
        pose.squash = 1.0;
        let env = Envelope::new(&spec, &pose);
        assert_eq!(env.at(0.0, 0.0), (16.0, 32.0 * 0.94));
        pose.lean = 0.4;
        let leaning = Envelope::new(&spec, &pose);
        assert!(leaning.x(0.0, 1.0) > leaning.x(0.0, 0.0));
    }

    #[test]
    fn test_body_paint_flash_and_fade() {
        let spec = spec("player_hero");
        let mut pose = synthesize_frame(&spec, 0);
        pose.flash = 1.0;
        pose.alpha = 0.5;
        let paint = body_paint(0x000000, &pose);
        assert_eq!(paint.alpha, 0.5);
        assert!(paint.color > 0x808080);
    }
}
