//! Pickup and inventory icons.

use crate::color::{darken, lighten};
use crate::error::GenerationError;
use crate::noise::DecorativeNoise;
use crate::pose::Pose;
use crate::primitives::{circle, outline_rect, rounded_rect, star};
use crate::resolver::{DrawSpec, ItemKind, Variant};
use crate::surface::{Layer, Paint, Surface};

use super::{mismatch, PatternFn, RigDrawer};

#[derive(Debug, Clone, Copy, Default)]
pub struct ItemDrawer;

impl ItemDrawer {
    pub fn helper(kind: &ItemKind) -> Option<PatternFn> {
        let helper: PatternFn = match kind {
            ItemKind::Chest => chest,
            ItemKind::Potion => potion,
            ItemKind::Coin => coin,
            ItemKind::Key => key,
            ItemKind::Sword => sword,
            ItemKind::Shield => shield,
            ItemKind::Scroll => scroll,
            ItemKind::Gem => gem,
            ItemKind::Unknown(_) => return None,
        };
        Some(helper)
    }
}

impl RigDrawer for ItemDrawer {
    fn draw(
        &self,
        surface: &mut dyn Surface,
        spec: &DrawSpec,
        _pose: &Pose,
        noise: &mut DecorativeNoise,
    ) -> Result<(), GenerationError> {
        let kind = match &spec.variant {
            Variant::Item(kind) => kind,
            _ => return Err(mismatch("item", spec)),
        };
        let helper = Self::helper(kind).ok_or_else(|| GenerationError::UnknownPattern {
            family: "item",
            name: spec.variant.name(),
        })?;
        helper(surface, spec, noise)
    }
}

/// Icon box inset from the frame edge.
fn icon_box(spec: &DrawSpec) -> (f32, f32, f32, f32) {
    let (w, h) = (spec.width as f32, spec.height as f32);
    let pad = w.min(h) * 0.12;
    (pad, pad, w - 2.0 * pad, h - 2.0 * pad)
}

fn chest(surface: &mut dyn Surface, spec: &DrawSpec, _noise: &mut DecorativeNoise) -> Result<(), GenerationError> {
    let (x, y, w, h) = icon_box(spec);
    let wood = spec.base_color;
    let band = Paint::solid(0xB8860B);
    surface.set_layer(Layer::Body);
    rounded_rect(surface, x, y + h * 0.1, w, h * 0.35, w * 0.12, Paint::solid(lighten(wood, 10.0)));
    surface.fill_rect(x, y + h * 0.4, w, h * 0.55, Paint::solid(wood));
    surface.set_layer(Layer::Detail);
    surface.fill_rect(x, y + h * 0.4, w, h * 0.06, Paint::solid(darken(wood, 35.0)));
    surface.fill_rect(x + w * 0.12, y + h * 0.1, w * 0.1, h * 0.85, band);
    surface.fill_rect(x + w * 0.78, y + h * 0.1, w * 0.1, h * 0.85, band);
    surface.fill_rect(x + w * 0.42, y + h * 0.36, w * 0.16, h * 0.2, Paint::solid(0xFFD700));
    surface.set_layer(Layer::Frame);
    outline_rect(surface, x, y + h * 0.1, w, h * 0.85, 1.0, Paint::solid(darken(wood, 50.0)));
    Ok(())
}

fn potion(surface: &mut dyn Surface, spec: &DrawSpec, _noise: &mut DecorativeNoise) -> Result<(), GenerationError> {
    let (x, y, w, h) = icon_box(spec);
    let cx = x + w / 2.0;
    let glass = Paint::with_alpha(0xDDEEFF, 0.6);
    surface.set_layer(Layer::Body);
    surface.fill_ellipse(cx, y + h * 0.66, w * 0.38, h * 0.32, glass);
    surface.fill_rect(cx - w * 0.12, y + h * 0.12, w * 0.24, h * 0.3, glass);
    surface.set_layer(Layer::Fill);
    surface.fill_ellipse(cx, y + h * 0.7, w * 0.32, h * 0.26, Paint::solid(spec.base_color));
    surface.set_layer(Layer::Detail);
    surface.fill_rect(cx - w * 0.14, y, w * 0.28, h * 0.14, Paint::solid(0x8B5A2B));
    surface.fill_ellipse(cx - w * 0.14, y + h * 0.6, w * 0.06, h * 0.08, Paint::with_alpha(0xFFFFFF, 0.8));
    Ok(())
}

fn coin(surface: &mut dyn Surface, spec: &DrawSpec, _noise: &mut DecorativeNoise) -> Result<(), GenerationError> {
    let (x, y, w, h) = icon_box(spec);
    let (cx, cy, r) = (x + w / 2.0, y + h / 2.0, w.min(h) / 2.0);
    surface.set_layer(Layer::Body);
    circle(surface, cx, cy, r, Paint::solid(darken(spec.base_color, 20.0)));
    circle(surface, cx, cy, r * 0.8, Paint::solid(spec.base_color));
    surface.set_layer(Layer::Detail);
    surface.fill_rect(cx - r * 0.1, cy - r * 0.45, r * 0.2, r * 0.9, Paint::solid(darken(spec.base_color, 30.0)));
    let glint = star(cx - r * 0.45, cy - r * 0.45, r * 0.3, r * 0.1, 4);
    surface.fill_polygon(&glint, Paint::solid(0xFFFFFF));
    Ok(())
}

fn key(surface: &mut dyn Surface, spec: &DrawSpec, _noise: &mut DecorativeNoise) -> Result<(), GenerationError> {
    let (x, y, w, h) = icon_box(spec);
    let metal = Paint::solid(spec.base_color);
    let r = w.min(h) * 0.2;
    let (rx, ry) = (x + r * 1.1, y + h / 2.0);
    surface.set_layer(Layer::Body);
    circle(surface, rx, ry, r, metal);
    surface.fill_rect(rx, ry - h * 0.06, w - r * 1.1, h * 0.12, metal);
    surface.fill_rect(x + w * 0.75, ry, w * 0.08, h * 0.2, metal);
    surface.fill_rect(x + w * 0.9, ry, w * 0.08, h * 0.14, metal);
    surface.set_layer(Layer::Detail);
    circle(surface, rx, ry, r * 0.45, Paint::solid(darken(spec.base_color, 40.0)));
    Ok(())
}

fn sword(surface: &mut dyn Surface, spec: &DrawSpec, _noise: &mut DecorativeNoise) -> Result<(), GenerationError> {
    let (x, y, w, h) = icon_box(spec);
    let blade = [(x + w, y), (x + w, y + h * 0.14), (x + w * 0.35, y + h * 0.72), (x + w * 0.28, y + h * 0.65)];
    surface.set_layer(Layer::Body);
    surface.fill_polygon(&blade, Paint::solid(spec.base_color));
    surface.set_layer(Layer::Detail);
    surface.draw_line((x + w * 0.15, y + h * 0.55), (x + w * 0.45, y + h * 0.85), w.min(h) * 0.1, Paint::solid(0xB8860B));
    surface.draw_line((x, y + h), (x + w * 0.3, y + h * 0.7), w.min(h) * 0.1, Paint::solid(0x8B5A2B));
    Ok(())
}

fn shield(surface: &mut dyn Surface, spec: &DrawSpec, _noise: &mut DecorativeNoise) -> Result<(), GenerationError> {
    let (x, y, w, h) = icon_box(spec);
    let outline = [(x, y), (x + w, y), (x + w, y + h * 0.55), (x + w / 2.0, y + h), (x, y + h * 0.55)];
    let inner: Vec<(f32, f32)> = outline
        .iter()
        .map(|(px, py)| (x + w / 2.0 + (px - x - w / 2.0) * 0.78, y + h / 2.0 + (py - y - h / 2.0) * 0.78))
        .collect();
    surface.set_layer(Layer::Frame);
    surface.fill_polygon(&outline, Paint::solid(0xB0B7C0));
    surface.set_layer(Layer::Body);
    surface.fill_polygon(&inner, Paint::solid(spec.base_color));
    surface.set_layer(Layer::Detail);
    circle(surface, x + w / 2.0, y + h * 0.42, w.min(h) * 0.1, Paint::solid(0xFFD700));
    Ok(())
}

fn scroll(surface: &mut dyn Surface, spec: &DrawSpec, _noise: &mut DecorativeNoise) -> Result<(), GenerationError> {
    let (x, y, w, h) = icon_box(spec);
    let paper = Paint::solid(spec.base_color);
    let roll = Paint::solid(darken(spec.base_color, 25.0));
    surface.set_layer(Layer::Body);
    surface.fill_rect(x + w * 0.1, y + h * 0.15, w * 0.8, h * 0.7, paper);
    surface.fill_ellipse(x + w * 0.1, y + h / 2.0, w * 0.1, h * 0.4, roll);
    surface.fill_ellipse(x + w * 0.9, y + h / 2.0, w * 0.1, h * 0.4, roll);
    surface.set_layer(Layer::Detail);
    let ink = Paint::with_alpha(0x333333, 0.8);
    for i in 0..3 {
        let ly = y + h * (0.35 + 0.15 * i as f32);
        surface.draw_line((x + w * 0.28, ly), (x + w * 0.72, ly), 1.0, ink);
    }
    Ok(())
}

fn gem(surface: &mut dyn Surface, spec: &DrawSpec, _noise: &mut DecorativeNoise) -> Result<(), GenerationError> {
    let (x, y, w, h) = icon_box(spec);
    let cx = x + w / 2.0;
    let crown = [(x + w * 0.2, y + h * 0.15), (x + w * 0.8, y + h * 0.15), (x + w, y + h * 0.4), (x, y + h * 0.4)];
    let pavilion = [(x, y + h * 0.4), (x + w, y + h * 0.4), (cx, y + h)];
    surface.set_layer(Layer::Body);
    surface.fill_polygon(&crown, Paint::solid(lighten(spec.base_color, 25.0)));
    surface.fill_polygon(&pavilion, Paint::solid(spec.base_color));
    surface.set_layer(Layer::Detail);
    surface.draw_line((cx, y + h * 0.4), (cx, y + h), 1.0, Paint::solid(darken(spec.base_color, 30.0)));
    let glint = star(x + w * 0.35, y + h * 0.27, w * 0.12, w * 0.04, 4);
    surface.fill_polygon(&glint, Paint::solid(0xFFFFFF));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::synthesize_frame;
    use crate::rigs::test_support::{record, spec};
    use crate::surface::{PixelSurface, RecordingSurface};

    #[test]
    fn test_every_item_draws_something() {
        for raw in [
            "item_chest",
            "item_potion",
            "item_coin",
            "item_key",
            "item_sword",
            "item_shield",
            "item_scroll",
            "item_gem",
        ] {
            let spec = spec(raw);
            let mut surface = PixelSurface::new(spec.width, spec.height);
            let pose = synthesize_frame(&spec, 0);
            ItemDrawer.draw(&mut surface, &spec, &pose, &mut DecorativeNoise::seeded(1)).unwrap();
            assert!(surface.image().pixels().any(|p| p[3] > 0), "{}", raw);
            assert_eq!(surface.image().get_pixel(0, 0)[3], 0, "{} touches the corner", raw);
        }
    }

    #[test]
    fn test_unknown_item_fails() {
        let spec = spec("item_banana");
        let pose = synthesize_frame(&spec, 0);
        let mut surface = RecordingSurface::new(24, 24);
        let err = ItemDrawer
            .draw(&mut surface, &spec, &pose, &mut DecorativeNoise::seeded(1))
            .unwrap_err();
        assert!(matches!(err, GenerationError::UnknownPattern { family: "item", .. }));
    }

    #[test]
    fn test_potion_liquid_uses_base_color() {
        let surface = record(&ItemDrawer, &spec("item_potion"));
        let liquid = surface.calls().iter().find(|c| c.layer == Layer::Fill).unwrap();
        assert_eq!(liquid.paint.color, 0xDC143C);
    }
}
