//! Pose synthesis for animation frames.
//!
//! A [`Pose`] is a handful of offsets, angles and scale factors derived from
//! the action and frame index with closed-form trigonometric curves. Drawers
//! read a pose; the synthesizer itself never draws.
//!
//! Units: offsets and particle positions are fractions of the frame size,
//! angles are radians with 0 hanging straight down and positive values
//! swinging toward the facing direction.

use std::f32::consts::{FRAC_PI_2, PI};

use serde::Serialize;

use crate::key::Action;
use crate::resolver::DrawSpec;

/// A decorative particle (soul wisps, spell sparks).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub alpha: f32,
}

/// Per-frame transform values driving one drawn frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pose {
    pub action: Action,
    pub frame: u32,
    pub frame_count: u32,
    /// 0.0 on the first frame, exactly 1.0 on the last
    pub progress: f32,
    pub body_offset: (f32, f32),
    pub lean: f32,
    pub left_arm: f32,
    pub right_arm: f32,
    pub left_leg: f32,
    pub right_leg: f32,
    /// Horizontal scale
    pub squash: f32,
    /// Vertical scale
    pub stretch: f32,
    pub alpha: f32,
    /// White hit-flash strength, 0..=1
    pub flash: f32,
    pub weapon_swing: f32,
    /// Spell glow radius as a fraction of the frame width
    pub glow: f32,
    pub particles: Vec<Particle>,
}

impl Pose {
    /// Standing still, fully opaque.
    pub fn neutral(action: Action, frame: u32, frame_count: u32) -> Self {
        Self {
            action,
            frame,
            frame_count,
            progress: progress_of(frame, frame_count),
            body_offset: (0.0, 0.0),
            lean: 0.0,
            left_arm: 0.0,
            right_arm: 0.0,
            left_leg: 0.0,
            right_leg: 0.0,
            squash: 1.0,
            stretch: 1.0,
            alpha: 1.0,
            flash: 0.0,
            weapon_swing: 0.0,
            glow: 0.0,
            particles: Vec::new(),
        }
    }

    /// Whether every value is a finite number.
    pub fn is_finite(&self) -> bool {
        let scalars = [
            self.progress,
            self.body_offset.0,
            self.body_offset.1,
            self.lean,
            self.left_arm,
            self.right_arm,
            self.left_leg,
            self.right_leg,
            self.squash,
            self.stretch,
            self.alpha,
            self.flash,
            self.weapon_swing,
            self.glow,
        ];
        scalars.iter().all(|v| v.is_finite())
            && self
                .particles
                .iter()
                .all(|p| p.x.is_finite() && p.y.is_finite() && p.radius.is_finite())
    }
}

/// Map a frame index onto the action's frame range.
///
/// Looping actions wrap; one-shot actions hold their last frame.
pub fn normalize_frame(action: Action, frame_index: u32) -> u32 {
    let count = action.frame_count();
    if action.loops() {
        frame_index % count
    } else {
        frame_index.min(count - 1)
    }
}

/// `frame / (count - 1)`, so the final frame lands on exactly 1.0.
fn progress_of(frame: u32, frame_count: u32) -> f32 {
    if frame_count <= 1 {
        return 1.0;
    }
    frame.min(frame_count - 1) as f32 / (frame_count - 1) as f32
}

/// Pose for one frame of the drawn action.
pub fn synthesize_frame(spec: &DrawSpec, frame_index: u32) -> Pose {
    let action = spec.action;
    let count = action.frame_count();
    let frame = normalize_frame(action, frame_index);
    let facing = spec.direction.facing();

    let mut pose = Pose::neutral(action, frame, count);
    let phase = frame as f32 * FRAC_PI_2;
    let p = pose.progress;

    match action {
        Action::Idle => {
            let breath = phase.sin();
            pose.body_offset.1 = 0.015 * breath;
            pose.left_arm = 0.05 * breath;
            pose.right_arm = 0.05 * breath;
            pose.stretch = 1.0 + 0.04 * breath;
            pose.squash = 1.0 - 0.04 * breath;
        }
        Action::Walk => {
            let stride = phase.sin();
            pose.left_leg = 0.5 * stride;
            pose.right_leg = -0.5 * stride;
            pose.left_arm = -0.4 * stride;
            pose.right_arm = 0.4 * stride;
            pose.body_offset.1 = -0.03 * stride.abs();
            pose.lean = 0.05 * facing;
            pose.stretch = 1.0 + 0.08 * stride.abs();
            pose.squash = 1.0 - 0.06 * stride.abs();
        }
        Action::Attack => {
            let swing = -1.6 + 2.6 * (p * FRAC_PI_2).sin();
            let lunge = (p * PI).sin();
            pose.right_arm = swing;
            pose.weapon_swing = swing;
            pose.left_arm = -0.3 * p;
            pose.lean = 0.15 * lunge;
            pose.body_offset.0 = 0.05 * lunge * facing;
            pose.left_leg = 0.2 * lunge;
            pose.right_leg = -0.2 * lunge;
            pose.squash = 1.0 + 0.1 * lunge;
            pose.stretch = 1.0 - 0.1 * lunge;
        }
        Action::Hurt => {
            let recoil = (p * FRAC_PI_2).cos();
            pose.flash = recoil;
            pose.body_offset.0 = -0.08 * recoil * facing;
            pose.body_offset.1 = -0.02 * recoil;
            pose.lean = -0.25 * recoil;
            pose.left_arm = 0.6 * recoil;
            pose.right_arm = 0.6 * recoil;
            pose.squash = 1.0 - 0.08 * recoil;
            pose.stretch = 1.0 + 0.08 * recoil;
        }
        Action::Death => {
            pose.stretch = 1.0 - 0.75 * p;
            pose.squash = 1.0 + 0.3 * p;
            pose.alpha = 1.0 - 0.5 * p;
            pose.lean = 0.6 * p * if facing == 0.0 { 1.0 } else { facing };
            pose.left_arm = 0.8 * p;
            pose.right_arm = 0.8 * p;
            pose.left_leg = 0.3 * p;
            pose.right_leg = -0.3 * p;
            pose.particles = soul_particles(frame, p);
        }
        Action::Cast => {
            let pulse = phase.sin();
            pose.left_arm = 2.6 + 0.2 * pulse;
            pose.right_arm = 2.6 - 0.2 * pulse;
            pose.body_offset.1 = -0.02 - 0.02 * pulse;
            pose.glow = 0.25 + 0.1 * pulse;
            pose.particles = spell_sparks(frame);
        }
    }

    log::trace!(
        "pose {} f{}/{}: progress={:.3} arms=({:.2},{:.2}) legs=({:.2},{:.2}) scale=({:.2},{:.2})",
        action,
        frame,
        count,
        pose.progress,
        pose.left_arm,
        pose.right_arm,
        pose.left_leg,
        pose.right_leg,
        pose.squash,
        pose.stretch
    );
    pose
}

/// One pose per frame, `frame_count` of them.
///
/// With the action's own frame count this is exactly one animation cycle.
pub fn synthesize_sheet(spec: &DrawSpec, frame_count: u32) -> Vec<Pose> {
    (0..frame_count).map(|frame| synthesize_frame(spec, frame)).collect()
}

/// Souls leave the body one per frame and drift upward as the collapse completes.
fn soul_particles(frame: u32, progress: f32) -> Vec<Particle> {
    (0..frame)
        .map(|i| {
            let i = i as f32;
            Particle {
                x: 0.5 + 0.12 * (i * 1.7 + progress * PI).sin(),
                y: 0.6 - 0.5 * progress - 0.08 * i,
                radius: 0.04 + 0.01 * i,
                alpha: ((1.0 - 0.6 * progress) * (1.0 - 0.15 * i)).max(0.1),
            }
        })
        .collect()
}

/// Three sparks orbiting above the raised hands.
fn spell_sparks(frame: u32) -> Vec<Particle> {
    (0..3)
        .map(|i| {
            let angle = frame as f32 * FRAC_PI_2 + i as f32 * (2.0 * PI / 3.0);
            Particle {
                x: 0.5 + 0.3 * angle.cos(),
                y: 0.2 + 0.1 * angle.sin(),
                radius: 0.03,
                alpha: 0.8,
            }
        })
        .collect()
}
