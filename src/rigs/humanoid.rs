//! Humanoid rig: players, NPCs, skeletons, knights and the like.
//!
//! Layer order per direction:
//!
//! | direction | order |
//! |-----------|-------|
//! | down | shadow, cape, legs, body, armor, arms, head, face, hair, headgear, held |
//! | up | shadow, legs, body, armor, arms, head, hair, headgear, cape |
//! | left/right | shadow, cape, legs, body, armor, near arm, head, face, hair, headgear, held |
//!
//! Variants only override layers: armored adds plates, robed swaps the legs
//! for a robe, hooded swaps hair and headgear for a hood and shades the face.

use std::f32::consts::PI;

use crate::color::{darken, lighten, mix};
use crate::error::GenerationError;
use crate::features::{HairStyle, WeaponKind};
use crate::key::Direction;
use crate::noise::DecorativeNoise;
use crate::pose::Pose;
use crate::primitives::{circle, eyes, limb, limb_end};
use crate::resolver::{DrawSpec, HumanoidVariant, Variant};
use crate::surface::{Layer, Paint, Surface};

use super::{body_paint, draw_glow, draw_particles, ground_shadow, mismatch, Envelope, RigDrawer};

const HIP_Y: f32 = 0.34;
const SHOULDER_Y: f32 = 0.60;
const HEAD_Y: f32 = 0.78;
const HEAD_R: f32 = 0.15;
const LEG_LEN: f32 = 0.30;
const ARM_LEN: f32 = 0.25;

const METAL: u32 = 0xB0B7C0;
const CAPE: u32 = 0x8B1A1A;
const WOOD: u32 = 0x8B5A2B;
const STEEL: u32 = 0xD0D0D8;

#[derive(Debug, Clone, Copy, Default)]
pub struct HumanoidDrawer;

impl RigDrawer for HumanoidDrawer {
    fn draw(
        &self,
        surface: &mut dyn Surface,
        spec: &DrawSpec,
        pose: &Pose,
        _noise: &mut DecorativeNoise,
    ) -> Result<(), GenerationError> {
        let variant = match spec.variant {
            Variant::Humanoid(v) => v,
            _ => return Err(mismatch("humanoid", spec)),
        };
        let rig = Rig::new(spec, pose, variant);

        ground_shadow(surface, &rig.env, 0.2, pose);
        match spec.direction {
            Direction::Down => {
                rig.cape(surface);
                rig.legs(surface);
                rig.torso(surface);
                rig.armor(surface);
                let hands = rig.arms(surface);
                rig.head(surface);
                rig.face(surface);
                rig.hair(surface);
                rig.headgear(surface);
                rig.held(surface, hands);
            }
            Direction::Up => {
                rig.legs(surface);
                rig.torso(surface);
                rig.armor(surface);
                rig.arms(surface);
                rig.head(surface);
                rig.hair(surface);
                rig.headgear(surface);
                rig.cape(surface);
            }
            Direction::Left | Direction::Right => {
                rig.cape(surface);
                rig.legs(surface);
                rig.torso(surface);
                rig.armor(surface);
                let hands = rig.arms(surface);
                rig.head(surface);
                rig.face(surface);
                rig.hair(surface);
                rig.headgear(surface);
                rig.held(surface, hands);
            }
        }
        draw_particles(surface, &rig.env, pose, 0xE0F0FF);
        Ok(())
    }
}

/// Hand positions after the arms are drawn; the far hand is absent in profile.
#[derive(Debug, Clone, Copy)]
struct Hands {
    weapon: (f32, f32),
    off: Option<(f32, f32)>,
}

struct Rig<'a> {
    spec: &'a DrawSpec,
    pose: &'a Pose,
    variant: HumanoidVariant,
    env: Envelope,
    direction: Direction,
    /// Horizontal sign for profile geometry; 1 for front and back views
    side: f32,
}

impl<'a> Rig<'a> {
    fn new(spec: &'a DrawSpec, pose: &'a Pose, variant: HumanoidVariant) -> Self {
        let side = if spec.direction.is_side() { spec.direction.facing() } else { 1.0 };
        Self { spec, pose, variant, env: Envelope::new(spec, pose), direction: spec.direction, side }
    }

    fn paint(&self, color: u32) -> Paint {
        body_paint(color, self.pose)
    }

    fn skin(&self) -> u32 {
        lighten(self.spec.base_color, 12.0)
    }

    fn torso_half(&self) -> f32 {
        if self.direction.is_side() {
            0.11
        } else {
            0.16
        }
    }

    fn head_center(&self) -> (f32, f32) {
        self.env.at(0.0, HEAD_Y)
    }

    fn head_radius(&self) -> f32 {
        self.env.unit(HEAD_R)
    }

    fn cape(&self, surface: &mut dyn Surface) {
        if !self.spec.features.has_cape {
            return;
        }
        surface.set_layer(Layer::Back);
        let half = self.torso_half();
        let sway = 0.04 * (self.pose.left_leg - self.pose.right_leg);
        let points = if self.direction.is_side() {
            let back = -self.side;
            vec![
                self.env.at(0.0, SHOULDER_Y),
                self.env.at(back * 0.06, SHOULDER_Y),
                self.env.at(back * (0.2 + sway.abs()), 0.08),
                self.env.at(back * 0.02, 0.08),
            ]
        } else {
            vec![
                self.env.at(-half, SHOULDER_Y),
                self.env.at(half, SHOULDER_Y),
                self.env.at(half + 0.06 + sway, 0.06),
                self.env.at(-half - 0.06 + sway, 0.06),
            ]
        };
        surface.fill_polygon(&points, self.paint(CAPE));
    }

    fn legs(&self, surface: &mut dyn Surface) {
        surface.set_layer(Layer::Legs);
        if self.variant == HumanoidVariant::Robed {
            self.robe(surface);
            return;
        }
        let color = darken(self.spec.base_color, 35.0);
        let length = self.env.h * LEG_LEN * self.pose.stretch;
        let thickness = self.env.unit(0.1);
        if self.direction.is_side() {
            let hip = self.env.at(0.0, HIP_Y);
            // Far leg first, a shade darker
            limb(surface, hip, self.pose.right_leg, length, thickness, self.side, self.paint(darken(color, 20.0)));
            limb(surface, hip, self.pose.left_leg, length, thickness, self.side, self.paint(color));
        } else {
            for (fx, angle, side) in [(-0.08, self.pose.left_leg, -1.0), (0.08, self.pose.right_leg, 1.0)] {
                // Front and back views only hint at the stride
                limb(surface, self.env.at(fx, HIP_Y), angle * 0.3, length, thickness, side, self.paint(color));
            }
        }
    }

    fn robe(&self, surface: &mut dyn Surface) {
        let sway = 0.05 * (self.pose.left_leg - self.pose.right_leg);
        let flare = if self.direction.is_side() { 0.15 } else { 0.22 };
        let points = [
            self.env.at(-self.torso_half(), HIP_Y + 0.06),
            self.env.at(self.torso_half(), HIP_Y + 0.06),
            self.env.at(flare + sway, 0.0),
            self.env.at(-flare + sway, 0.0),
        ];
        surface.fill_polygon(&points, self.paint(darken(self.spec.base_color, 10.0)));
    }

    fn torso(&self, surface: &mut dyn Surface) {
        surface.set_layer(Layer::Body);
        let half = self.torso_half();
        let points = [
            self.env.at(-half, SHOULDER_Y + 0.02),
            self.env.at(half, SHOULDER_Y + 0.02),
            self.env.at(half, HIP_Y),
            self.env.at(-half, HIP_Y),
        ];
        surface.fill_polygon(&points, self.paint(self.spec.base_color));
    }

    fn armor(&self, surface: &mut dyn Surface) {
        if self.variant != HumanoidVariant::Armored {
            return;
        }
        surface.set_layer(Layer::Armor);
        let half = self.torso_half() * 0.8;
        let plate = mix(METAL, self.spec.base_color, 0.25);
        let points = [
            self.env.at(-half, SHOULDER_Y),
            self.env.at(half, SHOULDER_Y),
            self.env.at(half * 0.7, HIP_Y + 0.04),
            self.env.at(-half * 0.7, HIP_Y + 0.04),
        ];
        surface.fill_polygon(&points, self.paint(plate));
        let r = self.env.unit(0.07);
        let pauldrons: &[f32] = if self.direction.is_side() { &[0.0] } else { &[-1.0, 1.0] };
        for s in pauldrons {
            let (x, y) = self.env.at(s * (self.torso_half() + 0.01), SHOULDER_Y);
            circle(surface, x, y, r, self.paint(lighten(plate, 15.0)));
        }
        // Belt
        let (x0, y0) = self.env.at(-self.torso_half(), HIP_Y + 0.04);
        surface.fill_rect(x0, y0, self.env.sx(self.torso_half() * 2.0), self.env.unit(0.04), self.paint(darken(plate, 40.0)));
    }

    fn arms(&self, surface: &mut dyn Surface) -> Hands {
        surface.set_layer(Layer::Arms);
        let color = self.spec.base_color;
        let length = self.env.h * ARM_LEN * self.pose.stretch;
        let thickness = self.env.unit(0.08);
        let sleeve = self.paint(darken(color, 8.0));

        if self.direction.is_side() {
            // Only the near arm is visible in profile
            let shoulder = self.env.at(0.0, SHOULDER_Y - 0.02);
            let hand = limb(surface, shoulder, self.pose.right_arm, length, thickness, self.side, sleeve);
            return Hands { weapon: hand, off: None };
        }

        let half = self.torso_half() + 0.03;
        let left = limb(surface, self.env.at(-half, SHOULDER_Y - 0.02), self.pose.left_arm, length, thickness, -1.0, sleeve);
        let right = limb(surface, self.env.at(half, SHOULDER_Y - 0.02), self.pose.right_arm, length, thickness, 1.0, sleeve);
        Hands { weapon: right, off: Some(left) }
    }

    fn head(&self, surface: &mut dyn Surface) {
        surface.set_layer(Layer::Head);
        let (hx, hy) = self.head_center();
        let r = self.head_radius();
        surface.fill_ellipse(hx, hy, r, r * 1.05, self.paint(self.skin()));
    }

    fn face(&self, surface: &mut dyn Surface) {
        if self.direction == Direction::Up {
            return;
        }
        surface.set_layer(Layer::Face);
        let (hx, hy) = self.head_center();
        let r = self.head_radius();
        let features = &self.spec.features;

        if self.variant == HumanoidVariant::Hooded {
            // Shadowed face with glowing eyes
            let shade_x = hx + if self.direction.is_side() { self.side * r * 0.3 } else { 0.0 };
            surface.fill_ellipse(shade_x, hy + r * 0.1, r * 0.7, r * 0.6, self.paint(0x111111));
            eyes(surface, (hx, hy + r * 0.1), r * 0.35, r * 0.14, self.direction, self.paint(features.glow));
            return;
        }

        eyes(surface, (hx, hy + r * 0.15), r * 0.4, r * 0.15, self.direction, self.paint(features.eye_color));
        let mouth = self.paint(darken(self.skin(), 40.0));
        match self.direction {
            Direction::Down => surface.fill_rect(hx - r * 0.3, hy + r * 0.55, r * 0.6, r * 0.12, mouth),
            _ => surface.fill_rect(hx + self.side * r * 0.45, hy + r * 0.55, r * 0.35, r * 0.12, mouth),
        }
    }

    fn hair(&self, surface: &mut dyn Surface) {
        let style = self.spec.features.hair_style;
        if self.variant == HumanoidVariant::Hooded || style == HairStyle::Bald {
            return;
        }
        surface.set_layer(Layer::Hair);
        let (hx, hy) = self.head_center();
        let r = self.head_radius();
        let paint = self.paint(self.spec.features.hair_color);
        // In profile the hair mass sits toward the back of the head
        let back = if self.direction.is_side() { -self.side * r * 0.2 } else { 0.0 };

        if self.direction == Direction::Up {
            surface.fill_ellipse(hx, hy - r * 0.05, r * 1.02, r, paint);
        } else {
            surface.fill_ellipse(hx + back, hy - r * 0.5, r, r * 0.6, paint);
        }

        match style {
            HairStyle::Short | HairStyle::Bald => {}
            HairStyle::Long => {
                let drop = r * 1.4;
                if self.direction.is_side() {
                    surface.fill_rect(hx - self.side * r - r * 0.2, hy - r * 0.3, r * 0.55, drop, paint);
                } else {
                    surface.fill_rect(hx - r * 1.05, hy - r * 0.3, r * 0.4, drop, paint);
                    surface.fill_rect(hx + r * 0.65, hy - r * 0.3, r * 0.4, drop, paint);
                    if self.direction == Direction::Up {
                        surface.fill_rect(hx - r, hy, r * 2.0, drop * 0.8, paint);
                    }
                }
            }
            HairStyle::Spiky => {
                let spikes = 4;
                let mut points = vec![(hx - r, hy - r * 0.3)];
                for i in 0..spikes {
                    let t = (i as f32 + 0.5) / spikes as f32;
                    points.push((hx - r + 2.0 * r * t + back, hy - r * 1.6));
                    points.push((hx - r + 2.0 * r * (i as f32 + 1.0) / spikes as f32, hy - r * 0.8));
                }
                points.push((hx + r, hy - r * 0.3));
                surface.fill_polygon(&points, paint);
            }
        }
    }

    fn headgear(&self, surface: &mut dyn Surface) {
        let (hx, hy) = self.head_center();
        let r = self.head_radius();

        if self.variant == HumanoidVariant::Hooded {
            surface.set_layer(Layer::Headgear);
            let hood = self.paint(darken(self.spec.base_color, 25.0));
            if self.direction == Direction::Up {
                surface.fill_ellipse(hx, hy, r * 1.25, r * 1.3, hood);
                return;
            }
            surface.fill_ellipse(hx, hy - r * 0.65, r * 1.25, r * 0.7, hood);
            if self.direction.is_side() {
                surface.fill_rect(hx - self.side * r * 1.25 - r * 0.1, hy - r * 0.6, r * 0.9, r * 1.6, hood);
            } else {
                surface.fill_rect(hx - r * 1.25, hy - r * 0.6, r * 0.45, r * 1.6, hood);
                surface.fill_rect(hx + r * 0.8, hy - r * 0.6, r * 0.45, r * 1.6, hood);
            }
            return;
        }

        if !self.spec.features.has_helmet {
            return;
        }
        surface.set_layer(Layer::Headgear);
        let metal = self.paint(METAL);
        surface.fill_ellipse(hx, hy - r * 0.45, r * 1.12, r * 0.7, metal);
        surface.fill_rect(hx - r * 1.15, hy - r * 0.15, r * 2.3, r * 0.2, self.paint(darken(METAL, 20.0)));
        match self.direction {
            Direction::Down => {
                surface.fill_rect(hx - r * 0.1, hy - r * 0.15, r * 0.2, r * 0.75, metal);
            }
            Direction::Left | Direction::Right => {
                surface.fill_rect(hx + self.side * r * 0.6, hy - r * 0.15, r * 0.5, r * 0.5, metal);
            }
            Direction::Up => {
                surface.fill_rect(hx - r * 1.1, hy - r * 0.15, r * 2.2, r * 0.6, metal);
            }
        }
    }

    fn held(&self, surface: &mut dyn Surface, hands: Hands) {
        let features = &self.spec.features;
        if !features.has_weapon && !features.has_shield && self.pose.glow <= 0.0 {
            return;
        }
        surface.set_layer(Layer::Held);

        if features.has_shield {
            let at = match (self.direction, hands.off) {
                (Direction::Down, Some(off)) => off,
                _ => self.env.at(self.side * 0.2, 0.45),
            };
            surface.fill_ellipse(at.0, at.1, self.env.w * 0.1, self.env.h * 0.13, self.paint(0x4682B4));
            circle(surface, at.0, at.1, self.env.unit(0.035), self.paint(METAL));
        }

        if features.has_weapon {
            let arm = if self.pose.weapon_swing != 0.0 { self.pose.weapon_swing } else { self.pose.right_arm };
            self.weapon(surface, &features.weapon_type, hands.weapon, arm + 0.75 * PI);
        }

        draw_glow(surface, &self.env, hands.weapon, self.pose, features.glow);
    }

    fn weapon(&self, surface: &mut dyn Surface, kind: &WeaponKind, hand: (f32, f32), angle: f32) {
        let env = &self.env;
        let reach = |len: f32| limb_end(hand, angle, env.h * len, self.side);
        let grip = limb_end(hand, angle + PI, env.h * 0.05, self.side);

        match kind {
            WeaponKind::Sword | WeaponKind::Dagger => {
                let len = if *kind == WeaponKind::Sword { 0.32 } else { 0.15 };
                let tip = reach(len);
                surface.draw_line(hand, tip, env.unit(0.05), self.paint(STEEL));
                let guard_a = limb_end(hand, angle + PI / 2.0, env.h * 0.05, self.side);
                let guard_b = limb_end(hand, angle - PI / 2.0, env.h * 0.05, self.side);
                surface.draw_line(guard_a, guard_b, env.unit(0.03), self.paint(0xB8860B));
                surface.draw_line(hand, grip, env.unit(0.04), self.paint(WOOD));
            }
            WeaponKind::Staff => {
                let tip = reach(0.42);
                let butt = limb_end(hand, angle + PI, env.h * 0.2, self.side);
                surface.draw_line(butt, tip, env.unit(0.045), self.paint(WOOD));
                circle(surface, tip.0, tip.1, env.unit(0.06), self.paint(0x7FDBFF));
            }
            WeaponKind::Axe => {
                let head = reach(0.28);
                surface.draw_line(grip, head, env.unit(0.045), self.paint(WOOD));
                let a = limb_end(head, angle + PI / 2.0, env.h * 0.1, self.side);
                let b = limb_end(head, angle - PI / 2.0, env.h * 0.02, self.side);
                let c = limb_end(a, angle + PI, env.h * 0.1, self.side);
                surface.fill_polygon(&[head, a, c, b], self.paint(STEEL));
            }
            WeaponKind::Bow => {
                let top = limb_end(hand, angle, env.h * 0.2, self.side);
                let bottom = limb_end(hand, angle + PI, env.h * 0.2, self.side);
                let bulge = limb_end(hand, angle - PI / 2.0, env.h * 0.07, self.side);
                surface.draw_line(top, bulge, env.unit(0.04), self.paint(WOOD));
                surface.draw_line(bulge, bottom, env.unit(0.04), self.paint(WOOD));
                surface.draw_line(top, bottom, 1.0, self.paint(0xEEEEEE));
            }
            WeaponKind::Other(name) => {
                log::debug!("no silhouette for weapon '{}' on '{}', skipping", name, self.spec.key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureOverrides;
    use crate::rigs::test_support::{record, spec, spec_with};

    #[test]
    fn test_down_layer_order() {
        let overrides = FeatureOverrides {
            has_cape: Some(true),
            has_helmet: Some(true),
            weapon_type: Some(WeaponKind::Sword),
            ..Default::default()
        };
        let surface = record(&HumanoidDrawer, &spec_with("npc_knight", overrides));
        assert_eq!(
            surface.layer_order(),
            vec![
                Layer::Shadow,
                Layer::Back,
                Layer::Legs,
                Layer::Body,
                Layer::Armor,
                Layer::Arms,
                Layer::Head,
                Layer::Face,
                Layer::Hair,
                Layer::Headgear,
                Layer::Held,
            ]
        );
    }

    #[test]
    fn test_up_has_no_face_or_held_item() {
        let overrides = FeatureOverrides { has_cape: Some(true), ..Default::default() };
        let surface = record(&HumanoidDrawer, &spec_with("enemy_skeleton_walk_up", overrides));
        assert!(!surface.has_layer(Layer::Face));
        assert!(!surface.has_layer(Layer::Held));
        assert_eq!(surface.layer_order().last(), Some(&Layer::Back));
    }

    #[test]
    fn test_side_view_draws_one_arm() {
        let front = record(&HumanoidDrawer, &spec("npc_villager_idle_down"));
        let side = record(&HumanoidDrawer, &spec("npc_villager_idle_left"));
        assert!(side.count(Layer::Arms) < front.count(Layer::Arms));
        assert!(side.has_layer(Layer::Face));
    }

    #[test]
    fn test_robed_replaces_legs_with_one_shape() {
        let surface = record(&HumanoidDrawer, &spec("npc_mage"));
        assert_eq!(surface.count(Layer::Legs), 1);
        let normal = record(&HumanoidDrawer, &spec("npc_villager"));
        assert!(normal.count(Layer::Legs) > 1);
    }

    #[test]
    fn test_hooded_has_no_hair() {
        let surface = record(&HumanoidDrawer, &spec("enemy_bandit"));
        assert!(!surface.has_layer(Layer::Hair));
        assert!(surface.has_layer(Layer::Headgear));
        assert!(surface.has_layer(Layer::Face));
    }

    #[test]
    fn test_bald_skeleton_has_no_hair() {
        let surface = record(&HumanoidDrawer, &spec("enemy_skeleton"));
        assert!(!surface.has_layer(Layer::Hair));
        assert!(surface.has_layer(Layer::Held));
    }

    #[test]
    fn test_unknown_weapon_is_skipped() {
        let overrides = FeatureOverrides {
            weapon_type: Some(WeaponKind::Other("trident".to_string())),
            ..Default::default()
        };
        let surface = record(&HumanoidDrawer, &spec_with("player_hero", overrides));
        assert!(surface.has_layer(Layer::Head));
        assert!(!surface.has_layer(Layer::Held));
    }

    #[test]
    fn test_every_direction_and_action_draws() {
        for direction in Direction::ALL {
            for action in crate::key::Action::ALL {
                let raw = format!("enemy_boss_{}_{}", action, direction);
                let surface = record(&HumanoidDrawer, &spec(&raw));
                assert!(surface.has_layer(Layer::Body), "{}", raw);
            }
        }
    }

    #[test]
    fn test_death_emits_soul_particles() {
        let surface = record(&HumanoidDrawer, &spec("enemy_zombie_death_down_f4"));
        assert!(surface.count(Layer::Effect) >= 4);
    }

    #[test]
    fn test_wrong_variant_is_rejected() {
        let spec = spec("enemy_ghost");
        let pose = crate::pose::synthesize_frame(&spec, 0);
        let mut surface = crate::surface::RecordingSurface::new(32, 32);
        let err = HumanoidDrawer
            .draw(&mut surface, &spec, &pose, &mut DecorativeNoise::seeded(1))
            .unwrap_err();
        assert!(matches!(err, GenerationError::VariantMismatch { expected: "humanoid", .. }));
    }
}
