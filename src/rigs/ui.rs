//! UI chrome: panels, buttons, bars, slots and cursors.

use crate::color::{darken, lighten};
use crate::error::GenerationError;
use crate::noise::DecorativeNoise;
use crate::pose::Pose;
use crate::primitives::{outline_rect, rounded_rect};
use crate::resolver::{DrawSpec, UiElement, Variant};
use crate::surface::{Layer, Paint, Surface};

use super::{mismatch, PatternFn, RigDrawer};

const BORDER: u32 = 0xD8D8E0;

#[derive(Debug, Clone, Copy, Default)]
pub struct UiDrawer;

impl UiDrawer {
    pub fn helper(element: &UiElement) -> Option<PatternFn> {
        let helper: PatternFn = match element {
            UiElement::Panel => panel,
            UiElement::Button => button,
            UiElement::Bar => bar,
            UiElement::Slot => slot,
            UiElement::Cursor => cursor,
            UiElement::Unknown(_) => return None,
        };
        Some(helper)
    }
}

impl RigDrawer for UiDrawer {
    fn draw(
        &self,
        surface: &mut dyn Surface,
        spec: &DrawSpec,
        _pose: &Pose,
        noise: &mut DecorativeNoise,
    ) -> Result<(), GenerationError> {
        let element = match &spec.variant {
            Variant::Ui(element) => element,
            _ => return Err(mismatch("ui", spec)),
        };
        let helper = Self::helper(element).ok_or_else(|| GenerationError::UnknownPattern {
            family: "ui",
            name: spec.variant.name(),
        })?;
        helper(surface, spec, noise)
    }
}

fn size(spec: &DrawSpec) -> (f32, f32) {
    (spec.width as f32, spec.height as f32)
}

fn panel(surface: &mut dyn Surface, spec: &DrawSpec, _noise: &mut DecorativeNoise) -> Result<(), GenerationError> {
    let (w, h) = size(spec);
    surface.set_layer(Layer::Fill);
    rounded_rect(surface, 0.0, 0.0, w, h, 3.0, Paint::with_alpha(spec.base_color, 0.92));
    surface.set_layer(Layer::Frame);
    outline_rect(surface, 1.0, 1.0, w - 2.0, h - 2.0, 1.0, Paint::solid(BORDER));
    surface.set_layer(Layer::Detail);
    surface.fill_rect(3.0, 3.0, w - 6.0, 1.0, Paint::with_alpha(lighten(spec.base_color, 30.0), 0.8));
    Ok(())
}

fn button(surface: &mut dyn Surface, spec: &DrawSpec, _noise: &mut DecorativeNoise) -> Result<(), GenerationError> {
    let (w, h) = size(spec);
    let pressed = spec.features.pressed;
    let face = if pressed { darken(spec.base_color, 15.0) } else { spec.base_color };
    let drop = if pressed { 1.0 } else { 0.0 };

    surface.set_layer(Layer::Shadow);
    if !pressed {
        rounded_rect(surface, 0.0, 2.0, w, h - 2.0, 2.0, Paint::solid(darken(spec.base_color, 45.0)));
    }
    surface.set_layer(Layer::Fill);
    rounded_rect(surface, 0.0, drop, w, h - 2.0, 2.0, Paint::solid(face));
    surface.set_layer(Layer::Detail);
    let highlight = if pressed { darken(face, 20.0) } else { lighten(face, 30.0) };
    surface.fill_rect(2.0, drop + 1.0, w - 4.0, 1.0, Paint::solid(highlight));
    surface.set_layer(Layer::Frame);
    outline_rect(surface, 0.0, drop, w, h - 2.0, 1.0, Paint::solid(darken(spec.base_color, 50.0)));
    Ok(())
}

fn bar(surface: &mut dyn Surface, spec: &DrawSpec, _noise: &mut DecorativeNoise) -> Result<(), GenerationError> {
    let (w, h) = size(spec);
    surface.set_layer(Layer::Frame);
    surface.fill_rect(0.0, 0.0, w, h, Paint::solid(0x202028));
    outline_rect(surface, 0.0, 0.0, w, h, 1.0, Paint::solid(BORDER));
    let ratio = spec.features.fill_ratio.clamp(0.0, 1.0);
    let inner = w - 4.0;
    if ratio > 0.0 {
        surface.set_layer(Layer::Fill);
        surface.fill_rect(2.0, 2.0, inner * ratio, h - 4.0, Paint::solid(spec.base_color));
        surface.fill_rect(2.0, 2.0, inner * ratio, ((h - 4.0) / 3.0).max(1.0), Paint::solid(lighten(spec.base_color, 30.0)));
    }
    Ok(())
}

fn slot(surface: &mut dyn Surface, spec: &DrawSpec, _noise: &mut DecorativeNoise) -> Result<(), GenerationError> {
    let (w, h) = size(spec);
    surface.set_layer(Layer::Fill);
    surface.fill_rect(0.0, 0.0, w, h, Paint::solid(spec.base_color));
    surface.set_layer(Layer::Frame);
    // Inset bevel: dark top-left, light bottom-right
    let dark = Paint::solid(darken(spec.base_color, 45.0));
    let light = Paint::solid(lighten(spec.base_color, 25.0));
    surface.fill_rect(0.0, 0.0, w, 1.0, dark);
    surface.fill_rect(0.0, 0.0, 1.0, h, dark);
    surface.fill_rect(0.0, h - 1.0, w, 1.0, light);
    surface.fill_rect(w - 1.0, 0.0, 1.0, h, light);
    Ok(())
}

fn cursor(surface: &mut dyn Surface, spec: &DrawSpec, _noise: &mut DecorativeNoise) -> Result<(), GenerationError> {
    let (w, h) = size(spec);
    let arrow = [
        (0.0, 0.0),
        (0.0, h * 0.85),
        (w * 0.25, h * 0.65),
        (w * 0.45, h),
        (w * 0.6, h * 0.92),
        (w * 0.42, h * 0.58),
        (w * 0.7, h * 0.58),
    ];
    surface.set_layer(Layer::Frame);
    surface.fill_polygon(&arrow, Paint::solid(0x000000));
    surface.set_layer(Layer::Fill);
    let inner: Vec<(f32, f32)> = arrow.iter().map(|(x, y)| (x * 0.8 + 1.5, y * 0.8 + 2.0)).collect();
    surface.fill_polygon(&inner, Paint::solid(spec.base_color));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureOverrides;
    use crate::rigs::test_support::{record, spec, spec_with};
    use crate::surface::DrawOp;

    fn fill_width(ratio: f32) -> Option<f32> {
        let overrides = FeatureOverrides { fill_ratio: Some(ratio), ..Default::default() };
        let surface = record(&UiDrawer, &spec_with("ui_bar", overrides));
        surface.calls().iter().find(|c| c.layer == Layer::Fill).map(|c| match c.op {
            DrawOp::Rect { w, .. } => w,
            _ => 0.0,
        })
    }

    #[test]
    fn test_bar_fill_follows_ratio() {
        assert_eq!(fill_width(1.0), Some(60.0));
        assert_eq!(fill_width(0.5), Some(30.0));
        assert_eq!(fill_width(0.0), None);
    }

    #[test]
    fn test_pressed_button_drops_shadow() {
        let up = record(&UiDrawer, &spec("ui_button"));
        let overrides = FeatureOverrides { pressed: Some(true), ..Default::default() };
        let down = record(&UiDrawer, &spec_with("ui_button", overrides));
        assert!(up.has_layer(Layer::Shadow));
        assert!(!down.has_layer(Layer::Shadow));
    }

    #[test]
    fn test_every_element_draws() {
        for raw in ["ui_panel", "ui_button", "ui_bar", "ui_slot", "ui_cursor"] {
            let surface = record(&UiDrawer, &spec(raw));
            assert!(surface.has_layer(Layer::Frame), "{}", raw);
        }
    }

    #[test]
    fn test_unknown_element_fails() {
        let spec = spec("ui_minimap");
        let pose = crate::pose::synthesize_frame(&spec, 0);
        let mut surface = crate::surface::RecordingSurface::new(8, 8);
        let err = UiDrawer
            .draw(&mut surface, &spec, &pose, &mut DecorativeNoise::seeded(1))
            .unwrap_err();
        assert!(matches!(err, GenerationError::UnknownPattern { family: "ui", .. }));
    }
}
