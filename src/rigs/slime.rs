//! Slime rig: a squashy dome.
//!
//! Variants: metal (grey, specular streaks, opaque), elemental (glowing core
//! with drifting motes), king (larger, crowned).

use crate::color::{darken, lighten};
use crate::error::GenerationError;
use crate::key::Direction;
use crate::noise::DecorativeNoise;
use crate::pose::Pose;
use crate::primitives::{circle, eyes};
use crate::resolver::{DrawSpec, SlimeVariant, Variant};
use crate::surface::{Layer, Paint, Surface};

use super::{body_paint, draw_glow, draw_particles, ground_shadow, mismatch, Envelope, RigDrawer};

const GOLD: u32 = 0xFFD700;

#[derive(Debug, Clone, Copy, Default)]
pub struct SlimeDrawer;

impl RigDrawer for SlimeDrawer {
    fn draw(
        &self,
        surface: &mut dyn Surface,
        spec: &DrawSpec,
        pose: &Pose,
        noise: &mut DecorativeNoise,
    ) -> Result<(), GenerationError> {
        let variant = match spec.variant {
            Variant::Slime(v) => v,
            _ => return Err(mismatch("slime", spec)),
        };
        let env = Envelope::new(spec, pose);
        let scale = if variant == SlimeVariant::King { 1.25 } else { 1.0 };
        let alpha = if variant == SlimeVariant::Metal { 1.0 } else { 0.88 };
        let paint = |color: u32| {
            let p = body_paint(color, pose);
            Paint::with_alpha(p.color, p.alpha * alpha)
        };

        let rx = env.sx(0.36 * scale);
        let ry = env.sy(0.3 * scale);
        let cx = env.cx;
        let cy = env.ground - ry;

        ground_shadow(surface, &env, 0.34 * scale, pose);

        // Dome plus a flat base
        surface.set_layer(Layer::Body);
        surface.fill_ellipse(cx, cy, rx, ry, paint(spec.base_color));
        surface.fill_rect(cx - rx, cy, rx * 2.0, ry * 0.98, paint(spec.base_color));
        surface.fill_rect(cx - rx * 0.9, env.ground - env.unit(0.03), rx * 1.8, env.unit(0.03), paint(darken(spec.base_color, 25.0)));

        surface.set_layer(Layer::Detail);
        match variant {
            SlimeVariant::Metal => {
                let streak = Paint::with_alpha(0xFFFFFF, 0.8 * pose.alpha);
                surface.draw_line((cx - rx * 0.6, cy - ry * 0.2), (cx - rx * 0.2, cy - ry * 0.7), env.unit(0.04), streak);
                surface.draw_line((cx - rx * 0.3, cy + ry * 0.1), (cx + rx * 0.05, cy - ry * 0.35), env.unit(0.025), streak);
            }
            _ => {
                surface.fill_ellipse(cx - rx * 0.45, cy - ry * 0.45, rx * 0.2, ry * 0.15, paint(lighten(spec.base_color, 50.0)));
            }
        }

        if variant == SlimeVariant::Elemental {
            surface.set_layer(Layer::Effect);
            let glow = spec.features.glow;
            surface.fill_ellipse(cx, cy + ry * 0.2, rx * 0.4, ry * 0.4, Paint::with_alpha(glow, 0.6 * pose.alpha));
            surface.fill_ellipse(cx, cy + ry * 0.2, rx * 0.2, ry * 0.2, Paint::with_alpha(lighten(glow, 40.0), 0.9 * pose.alpha));
            for _ in 0..3 {
                let x = cx + noise.range(-rx, rx);
                let y = cy - ry - noise.range(0.0, env.h * 0.15);
                circle(surface, x, y, env.unit(0.025), Paint::with_alpha(glow, 0.7 * pose.alpha));
            }
        }

        if spec.direction != Direction::Up {
            surface.set_layer(Layer::Face);
            let eye_y = cy - ry * 0.05;
            let eye_x = cx + if spec.direction.is_side() { spec.direction.facing() * rx * 0.35 } else { 0.0 };
            eyes(surface, (eye_x, eye_y), rx * 0.3, env.unit(0.045) * scale, spec.direction, Paint::with_alpha(spec.features.eye_color, pose.alpha));
        }

        if variant == SlimeVariant::King {
            surface.set_layer(Layer::Headgear);
            let base_y = cy - ry * 0.85;
            let half = rx * 0.45;
            let tall = env.h * 0.12;
            let crown = [
                (cx - half, base_y),
                (cx - half, base_y - tall),
                (cx - half * 0.5, base_y - tall * 0.55),
                (cx, base_y - tall * 1.1),
                (cx + half * 0.5, base_y - tall * 0.55),
                (cx + half, base_y - tall),
                (cx + half, base_y),
            ];
            surface.fill_polygon(&crown, body_paint(GOLD, pose));
            circle(surface, cx, base_y - tall * 0.3, env.unit(0.025), body_paint(0xDC143C, pose));
        }

        draw_glow(surface, &env, (cx, cy - ry), pose, spec.features.glow);
        draw_particles(surface, &env, pose, lighten(spec.base_color, 40.0));
        Ok(())
    }
}
