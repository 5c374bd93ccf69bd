//! Placeholder for keys no archetype claims: a framed box with a cross.

use crate::color::{darken, lighten};
use crate::error::GenerationError;
use crate::noise::DecorativeNoise;
use crate::pose::Pose;
use crate::primitives::outline_rect;
use crate::resolver::{DrawSpec, Variant};
use crate::surface::{Layer, Paint, Surface};

use super::{mismatch, RigDrawer};

#[derive(Debug, Clone, Copy, Default)]
pub struct GenericDrawer;

impl RigDrawer for GenericDrawer {
    fn draw(
        &self,
        surface: &mut dyn Surface,
        spec: &DrawSpec,
        pose: &Pose,
        _noise: &mut DecorativeNoise,
    ) -> Result<(), GenerationError> {
        if spec.variant != Variant::Generic {
            return Err(mismatch("generic", spec));
        }
        let (w, h) = (spec.width as f32, spec.height as f32);
        let border = (w.min(h) / 16.0).max(1.0);

        surface.set_layer(Layer::Fill);
        surface.fill_rect(0.0, 0.0, w, h, Paint::with_alpha(lighten(spec.base_color, 40.0), 0.6 * pose.alpha));
        surface.set_layer(Layer::Frame);
        outline_rect(surface, 0.0, 0.0, w, h, border, Paint::solid(spec.base_color));
        surface.set_layer(Layer::Detail);
        let cross = Paint::solid(darken(spec.base_color, 20.0));
        surface.draw_line((0.0, 0.0), (w, h), border, cross);
        surface.draw_line((w, 0.0), (0.0, h), border, cross);
        Ok(())
    }
}
