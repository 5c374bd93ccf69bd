//! Ghost rig.
//!
//! Every variant shares one silhouette (dome head, body, scalloped hem that
//! waves with the frame). Variants change alpha, colour and scale and add
//! extras: wisp halo and sparks, phantom cloak and arms, shadow red eyes.

use std::f32::consts::FRAC_PI_2;

use crate::color::{darken, lighten};
use crate::error::GenerationError;
use crate::key::Direction;
use crate::noise::DecorativeNoise;
use crate::pose::Pose;
use crate::primitives::{circle, eyes, limb, star};
use crate::resolver::{DrawSpec, GhostVariant, Variant};
use crate::surface::{Layer, Paint, Surface};

use super::{body_paint, draw_glow, draw_particles, mismatch, Envelope, RigDrawer};

const SCALLOPS: usize = 4;

#[derive(Debug, Clone, Copy, Default)]
pub struct GhostDrawer;

/// Per-variant overrides of the shared silhouette.
struct Look {
    alpha: f32,
    scale: f32,
    eye_color: u32,
}

impl Look {
    fn of(variant: GhostVariant, spec: &DrawSpec) -> Self {
        let eye = spec.features.eye_color;
        match variant {
            GhostVariant::Normal => Look { alpha: 0.85, scale: 1.0, eye_color: eye },
            GhostVariant::Wisp => Look { alpha: 0.6, scale: 0.7, eye_color: eye },
            GhostVariant::Phantom => Look { alpha: 0.75, scale: 1.1, eye_color: eye },
            GhostVariant::Shadow => Look { alpha: 0.9, scale: 1.0, eye_color: 0xFF2020 },
        }
    }
}

impl RigDrawer for GhostDrawer {
    fn draw(
        &self,
        surface: &mut dyn Surface,
        spec: &DrawSpec,
        pose: &Pose,
        noise: &mut DecorativeNoise,
    ) -> Result<(), GenerationError> {
        let variant = match spec.variant {
            Variant::Ghost(v) => v,
            _ => return Err(mismatch("ghost", spec)),
        };
        let look = Look::of(variant, spec);
        let env = Envelope::new(spec, pose);
        // Ghosts hover: the whole figure floats a bobbing distance above the ground line
        let hover = 0.08 + 0.03 * (pose.frame as f32 * FRAC_PI_2).sin();
        let paint = |color: u32, alpha: f32| {
            let base = body_paint(color, pose);
            Paint::with_alpha(base.color, base.alpha * alpha * look.alpha)
        };

        surface.set_layer(Layer::Shadow);
        surface.fill_ellipse(env.cx, env.ground, env.w * 0.16 * look.scale, env.h * 0.03, Paint::with_alpha(0x000000, 0.15 * pose.alpha));

        if variant == GhostVariant::Wisp {
            surface.set_layer(Layer::Back);
            let (hx, hy) = env.at(0.0, hover + 0.55 * look.scale);
            let r = env.unit(0.3);
            surface.fill_ellipse(hx, hy, r, r, paint(spec.features.glow, 0.35));
        }

        if variant == GhostVariant::Phantom {
            surface.set_layer(Layer::Back);
            let cloak = darken(spec.base_color, 35.0);
            let mut points = vec![env.at(-0.2 * look.scale, hover + 0.75), env.at(0.2 * look.scale, hover + 0.75)];
            // Tattered lower edge
            for i in 0..=6 {
                let t = i as f32 / 6.0;
                let fx = (0.32 - 0.64 * t) * look.scale;
                let ragged = if i % 2 == 0 { 0.0 } else { 0.07 + 0.03 * noise.unit() };
                points.push(env.at(fx, hover + ragged));
            }
            surface.fill_polygon(&points, paint(cloak, 1.0));
        }

        // Shared silhouette
        surface.set_layer(Layer::Body);
        let body = paint(spec.base_color, 1.0);
        let half = 0.26 * look.scale;
        let top = hover + 0.85 * look.scale;
        let hem = hover + 0.12;
        let (hx, hy) = env.at(0.0, top - half * env.w / env.h);
        surface.fill_ellipse(hx, hy, env.sx(half), env.sx(half), body);
        let wave = pose.frame as f32 * FRAC_PI_2;
        let mut outline = vec![env.at(-half, top - half * env.w / env.h), env.at(half, top - half * env.w / env.h)];
        for i in 0..=SCALLOPS * 2 {
            let t = i as f32 / (SCALLOPS * 2) as f32;
            let fx = half - 2.0 * half * t;
            let dip = if i % 2 == 0 { 0.0 } else { 0.06 };
            let sway = 0.02 * (wave + t * 6.0).sin();
            outline.push(env.at(fx, hem - dip + sway));
        }
        surface.fill_polygon(&outline, body);

        surface.set_layer(Layer::Detail);
        let sheen = paint(lighten(spec.base_color, 35.0), 0.5);
        surface.fill_ellipse(hx - env.sx(half) * 0.35, hy - env.sx(half) * 0.35, env.sx(half) * 0.25, env.sx(half) * 0.18, sheen);

        if variant == GhostVariant::Phantom {
            surface.set_layer(Layer::Arms);
            let length = env.h * 0.22;
            let thickness = env.unit(0.06);
            let arm_paint = paint(darken(spec.base_color, 10.0), 0.9);
            let sides: &[f32] = if spec.direction.is_side() { &[1.0] } else { &[-1.0, 1.0] };
            for &s in sides {
                let side = if spec.direction.is_side() { spec.direction.facing() } else { s };
                let shoulder = env.at(s * half * 0.9, hover + 0.5);
                let angle = 1.2 + if s < 0.0 { pose.left_arm } else { pose.right_arm };
                limb(surface, shoulder, angle, length, thickness, side, arm_paint);
            }
        }

        if spec.direction != Direction::Up {
            surface.set_layer(Layer::Face);
            let r = env.sx(half);
            let eye_paint = Paint::with_alpha(look.eye_color, pose.alpha);
            eyes(surface, (hx, hy + r * 0.1), r * 0.38, r * 0.18, spec.direction, eye_paint);
            if variant != GhostVariant::Shadow {
                let mouth_x = hx + if spec.direction.is_side() { spec.direction.facing() * r * 0.45 } else { 0.0 };
                surface.fill_ellipse(mouth_x, hy + r * 0.55, r * 0.14, r * 0.2, eye_paint);
            }
        }

        if variant == GhostVariant::Wisp {
            surface.set_layer(Layer::Effect);
            for _ in 0..4 {
                let (x, y) = noise.point(env.w, env.h * 0.8);
                let spark = star(x, y, env.unit(0.05), env.unit(0.02), 4);
                surface.fill_polygon(&spark, Paint::with_alpha(spec.features.glow, 0.7 * pose.alpha));
            }
        }

        draw_glow(surface, &env, (hx, hy), pose, spec.features.glow);
        draw_particles(surface, &env, pose, lighten(spec.base_color, 40.0));
        if pose.flash > 0.0 {
            surface.set_layer(Layer::Effect);
            circle(surface, hx, hy, env.sx(half) * 1.1, Paint::with_alpha(0xFFFFFF, 0.3 * pose.flash));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rigs::test_support::{record, spec};
    use crate::surface::DrawOp;

    #[test]
    fn test_up_suppresses_face() {
        let surface = record(&GhostDrawer, &spec("enemy_ghost_idle_up"));
        assert!(!surface.has_layer(Layer::Face));
        assert!(surface.has_layer(Layer::Body));

        let front = record(&GhostDrawer, &spec("enemy_ghost_idle_down"));
        assert!(front.has_layer(Layer::Face));
    }

    #[test]
    fn test_variants_share_the_silhouette() {
        for raw in ["enemy_ghost", "enemy_wisp", "enemy_wraith", "enemy_shade"] {
            let surface = record(&GhostDrawer, &spec(raw));
            assert_eq!(surface.count(Layer::Body), 2, "{}", raw);
        }
    }

    #[test]
    fn test_wisp_is_fainter_than_normal() {
        let alpha_of = |raw: &str| {
            let surface = record(&GhostDrawer, &spec(raw));
            let call = surface.calls().iter().find(|c| c.layer == Layer::Body).cloned().unwrap();
            call.paint.alpha
        };
        assert!(alpha_of("enemy_ghost_wisp") < alpha_of("enemy_ghost"));
    }

    #[test]
    fn test_phantom_has_cloak_and_arms() {
        let surface = record(&GhostDrawer, &spec("enemy_phantom"));
        assert!(surface.has_layer(Layer::Back));
        assert!(surface.has_layer(Layer::Arms));
        let normal = record(&GhostDrawer, &spec("enemy_ghost"));
        assert!(!normal.has_layer(Layer::Arms));
    }

    #[test]
    fn test_shadow_has_red_eyes() {
        let surface = record(&GhostDrawer, &spec("enemy_ghost_shadow"));
        let eye = surface.calls().iter().find(|c| c.layer == Layer::Face).cloned().unwrap();
        assert_eq!(eye.paint.color, 0xFF2020);
        assert!(matches!(eye.op, DrawOp::Ellipse { .. }));
    }

    #[test]
    fn test_hem_waves_between_frames() {
        let hem = |frame: u32| {
            let surface = record(&GhostDrawer, &spec(&format!("enemy_ghost_idle_down_f{}", frame)));
            surface.calls().iter().filter(|c| c.layer == Layer::Body).nth(1).cloned().unwrap().op
        };
        assert_ne!(hem(0), hem(1));
    }
}
