//! Monster rig with three body plans: beast, arachnid and winged.

use std::f32::consts::{FRAC_PI_2, PI};

use crate::color::{darken, lighten};
use crate::error::GenerationError;
use crate::key::Direction;
use crate::noise::DecorativeNoise;
use crate::pose::Pose;
use crate::primitives::{circle, eyes, limb, limb_end};
use crate::resolver::{BodyPlan, DrawSpec, Variant};
use crate::surface::{Layer, Paint, Surface};

use super::{body_paint, draw_particles, ground_shadow, mismatch, Envelope, RigDrawer};

#[derive(Debug, Clone, Copy, Default)]
pub struct MonsterDrawer;

impl RigDrawer for MonsterDrawer {
    fn draw(
        &self,
        surface: &mut dyn Surface,
        spec: &DrawSpec,
        pose: &Pose,
        _noise: &mut DecorativeNoise,
    ) -> Result<(), GenerationError> {
        let plan = match spec.variant {
            Variant::Monster(plan) => plan,
            _ => return Err(mismatch("monster", spec)),
        };
        let env = Envelope::new(spec, pose);
        match plan {
            BodyPlan::Beast => draw_beast(surface, spec, pose, &env),
            BodyPlan::Arachnid => draw_arachnid(surface, spec, pose, &env),
            BodyPlan::Winged => draw_winged(surface, spec, pose, &env),
        }
        draw_particles(surface, &env, pose, lighten(spec.base_color, 40.0));
        Ok(())
    }
}

fn monster_eyes(surface: &mut dyn Surface, spec: &DrawSpec, pose: &Pose, head: (f32, f32), r: f32) {
    if spec.direction == Direction::Up {
        return;
    }
    surface.set_layer(Layer::Face);
    eyes(surface, head, r * 0.4, r * 0.18, spec.direction, Paint::with_alpha(spec.features.eye_color, pose.alpha));
}

/// Quadruped: profile with four legs and a tail, or a front/back view.
fn draw_beast(surface: &mut dyn Surface, spec: &DrawSpec, pose: &Pose, env: &Envelope) {
    let body = body_paint(spec.base_color, pose);
    let dark = body_paint(darken(spec.base_color, 25.0), pose);
    let leg_len = env.h * 0.22 * pose.stretch;
    let leg_w = env.unit(0.07);

    ground_shadow(surface, env, 0.3, pose);

    if spec.direction.is_side() {
        let facing = spec.direction.facing();
        surface.set_layer(Layer::Legs);
        let strides = [pose.left_leg, pose.right_leg, pose.right_leg, pose.left_leg];
        for (i, fx) in [-0.22, -0.12, 0.12, 0.22].iter().enumerate() {
            // Back pair darker so the near legs read in front
            let paint = if i % 2 == 0 { dark } else { body };
            limb(surface, env.at(fx * facing, 0.24), strides[i], leg_len, leg_w, facing, paint);
        }

        surface.set_layer(Layer::Back);
        let rump = env.at(-0.28 * facing, 0.36);
        let tail_tip = limb_end(rump, 2.3 + 0.2 * (pose.frame as f32 * FRAC_PI_2).sin(), env.h * 0.18, -facing);
        surface.draw_line(rump, tail_tip, env.unit(0.05), dark);

        surface.set_layer(Layer::Body);
        let (bx, by) = env.at(0.0, 0.36);
        surface.fill_ellipse(bx, by, env.sx(0.3), env.sy(0.13), body);

        surface.set_layer(Layer::Head);
        let head = env.at(0.3 * facing, 0.5);
        let r = env.unit(0.12);
        circle(surface, head.0, head.1, r, body);
        let snout = (head.0 + facing * r * 0.9, head.1 + r * 0.3);
        surface.fill_ellipse(snout.0, snout.1, r * 0.55, r * 0.4, dark);
        let ear = [(head.0 - facing * r * 0.2, head.1 - r * 0.6), (head.0 - facing * r * 0.6, head.1 - r * 1.4), (head.0 - facing * r * 0.8, head.1 - r * 0.3)];
        surface.fill_polygon(&ear, dark);

        monster_eyes(surface, spec, pose, (head.0 + facing * r * 0.1, head.1 - r * 0.1), r);
        return;
    }

    surface.set_layer(Layer::Legs);
    for (fx, angle, side) in [(-0.14, pose.left_leg, -1.0), (0.14, pose.right_leg, 1.0)] {
        limb(surface, env.at(fx, 0.24), angle * 0.3, leg_len, leg_w, side, body);
    }

    surface.set_layer(Layer::Body);
    let (bx, by) = env.at(0.0, 0.38);
    surface.fill_ellipse(bx, by, env.sx(0.22), env.sy(0.17), body);

    surface.set_layer(Layer::Head);
    let head = env.at(0.0, 0.58);
    let r = env.unit(0.14);
    for s in [-1.0, 1.0] {
        let ear = [(head.0 + s * r * 0.4, head.1 - r * 0.7), (head.0 + s * r * 0.9, head.1 - r * 1.5), (head.0 + s * r * 1.0, head.1 - r * 0.3)];
        surface.fill_polygon(&ear, dark);
    }
    circle(surface, head.0, head.1, r, body);
    if spec.direction == Direction::Down {
        surface.fill_ellipse(head.0, head.1 + r * 0.5, r * 0.45, r * 0.3, dark);
    }
    monster_eyes(surface, spec, pose, (head.0, head.1 - r * 0.1), r);
}

/// Body plus eight jointed legs, four per side.
fn draw_arachnid(surface: &mut dyn Surface, spec: &DrawSpec, pose: &Pose, env: &Envelope) {
    let body = body_paint(spec.base_color, pose);
    let leg = body_paint(darken(spec.base_color, 15.0), pose);
    let upper = env.h * 0.16 * pose.stretch;
    let lower = env.h * 0.18 * pose.stretch;
    let leg_w = env.unit(0.04);
    let facing = spec.direction.facing();

    ground_shadow(surface, env, 0.32, pose);

    let (bx, by) = env.at(0.0, 0.3);
    surface.set_layer(Layer::Legs);
    for s in [-1.0f32, 1.0] {
        for i in 0..4 {
            let phase = i as f32 * FRAC_PI_2 + if s < 0.0 { 0.0 } else { PI };
            let step = 0.25 * (pose.frame as f32 * FRAC_PI_2 + phase).sin() * (pose.left_leg.abs() + 0.2);
            let spread = 0.9 + i as f32 * 0.35;
            let hip = (bx + s * env.sx(0.05), by - env.sy(0.02) + i as f32 * env.unit(0.025));
            let knee = limb(surface, hip, spread + step, upper, leg_w, s, leg);
            limb(surface, knee, 0.35 + step * 0.5, lower, leg_w, s, leg);
        }
    }

    surface.set_layer(Layer::Body);
    let abdomen_x = bx - facing * env.sx(0.12);
    surface.fill_ellipse(abdomen_x, by - env.sy(0.04), env.sx(0.2), env.sy(0.15), body);
    let head = (bx + facing * env.sx(0.14), by);
    let r = env.unit(0.1);
    circle(surface, head.0, head.1, r, body);

    surface.set_layer(Layer::Detail);
    surface.fill_ellipse(abdomen_x, by - env.sy(0.06), env.sx(0.07), env.sy(0.05), body_paint(lighten(spec.base_color, 30.0), pose));

    if spec.direction != Direction::Up {
        // A cluster of small eyes
        surface.set_layer(Layer::Face);
        let eye = Paint::with_alpha(spec.features.eye_color, pose.alpha);
        let ex = head.0 + facing * r * 0.3;
        for (dx, dy) in [(-0.35, -0.2), (0.35, -0.2), (-0.15, 0.1), (0.15, 0.1)] {
            circle(surface, ex + dx * r, head.1 + dy * r, r * 0.14, eye);
        }
    }
}

/// Round body with flapping wings.
fn draw_winged(surface: &mut dyn Surface, spec: &DrawSpec, pose: &Pose, env: &Envelope) {
    let body = body_paint(spec.base_color, pose);
    let membrane = body_paint(darken(spec.base_color, 20.0), pose);
    let flap = (pose.frame as f32 * FRAC_PI_2).sin();
    let hover = 0.2 + 0.04 * flap;

    surface.set_layer(Layer::Shadow);
    surface.fill_ellipse(env.cx, env.ground, env.w * 0.15, env.h * 0.03, Paint::with_alpha(0x000000, 0.2 * pose.alpha));

    let (bx, by) = env.at(0.0, hover + 0.3);
    let span = env.sx(0.42);
    let tip_y = by - env.sy(0.2) * flap;

    surface.set_layer(Layer::Back);
    let sides: &[f32] = if spec.direction.is_side() { &[-1.0] } else { &[-1.0, 1.0] };
    for &s in sides {
        let s = if spec.direction.is_side() { -spec.direction.facing() } else { s };
        let wing = [
            (bx, by - env.sy(0.04)),
            (bx + s * span, tip_y - env.sy(0.1)),
            (bx + s * span * 0.8, tip_y + env.sy(0.06)),
            (bx + s * span * 0.45, by + env.sy(0.02)),
            (bx + s * span * 0.2, by + env.sy(0.06)),
        ];
        surface.fill_polygon(&wing, membrane);
    }

    surface.set_layer(Layer::Body);
    surface.fill_ellipse(bx, by, env.sx(0.13), env.sy(0.14), body);

    surface.set_layer(Layer::Head);
    let r = env.unit(0.09);
    let head = (bx + spec.direction.facing() * r * 0.6, by - env.sy(0.14));
    circle(surface, head.0, head.1, r, body);
    for s in [-1.0, 1.0] {
        let ear = [(head.0 + s * r * 0.3, head.1 - r * 0.6), (head.0 + s * r * 0.8, head.1 - r * 1.5), (head.0 + s * r, head.1 - r * 0.2)];
        surface.fill_polygon(&ear, body);
    }
    monster_eyes(surface, spec, pose, head, r);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rigs::test_support::{record, spec};

    #[test]
    fn test_up_suppresses_eyes() {
        for raw in ["enemy_wolf_idle_up", "enemy_spider_idle_up", "enemy_bat_idle_up"] {
            assert!(!record(&MonsterDrawer, &spec(raw)).has_layer(Layer::Face), "{}", raw);
        }
        for raw in ["enemy_wolf_idle_left", "enemy_spider_idle_down", "enemy_bat_idle_right"] {
            assert!(record(&MonsterDrawer, &spec(raw)).has_layer(Layer::Face), "{}", raw);
        }
    }

    #[test]
    fn test_arachnid_has_eight_jointed_legs() {
        let surface = record(&MonsterDrawer, &spec("enemy_spider"));
        // Two segments per leg, each a line plus a joint cap
        assert_eq!(surface.count(Layer::Legs), 8 * 2 * 2);
    }

    #[test]
    fn test_beast_profile_has_four_legs() {
        let surface = record(&MonsterDrawer, &spec("enemy_wolf_walk_right"));
        assert_eq!(surface.count(Layer::Legs), 4 * 2);
        assert!(surface.has_layer(Layer::Back));
    }

    #[test]
    fn test_winged_flaps() {
        let wing = |frame: u32| {
            let surface = record(&MonsterDrawer, &spec(&format!("enemy_bat_idle_down_f{}", frame)));
            surface.calls().iter().find(|c| c.layer == Layer::Back).cloned().unwrap().op
        };
        assert_ne!(wing(0), wing(1));
    }
}
