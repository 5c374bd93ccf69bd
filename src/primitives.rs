//! Composite drawing primitives shared by the rig drawers.
//!
//! Everything here is built from the four [`Surface`] calls, so it works the
//! same on pixel and recording surfaces.

use crate::key::Direction;
use crate::surface::{Paint, Surface};

pub fn circle(surface: &mut dyn Surface, cx: f32, cy: f32, r: f32, paint: Paint) {
    surface.fill_ellipse(cx, cy, r, r, paint);
}

/// Rectangle with rounded corners of radius `r` (clamped to half the short side).
pub fn rounded_rect(surface: &mut dyn Surface, x: f32, y: f32, w: f32, h: f32, r: f32, paint: Paint) {
    let r = r.min(w / 2.0).min(h / 2.0).max(0.0);
    if r < 0.5 {
        surface.fill_rect(x, y, w, h, paint);
        return;
    }
    surface.fill_rect(x + r, y, w - 2.0 * r, h, paint);
    surface.fill_rect(x, y + r, r, h - 2.0 * r, paint);
    surface.fill_rect(x + w - r, y + r, r, h - 2.0 * r, paint);
    for (cx, cy) in [(x + r, y + r), (x + w - r, y + r), (x + r, y + h - r), (x + w - r, y + h - r)] {
        surface.fill_ellipse(cx, cy, r, r, paint);
    }
}

/// Hollow rectangle; the border grows inward.
pub fn outline_rect(
    surface: &mut dyn Surface,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    thickness: f32,
    paint: Paint,
) {
    let t = thickness.min(w / 2.0).min(h / 2.0);
    surface.fill_rect(x, y, w, t, paint);
    surface.fill_rect(x, y + h - t, w, t, paint);
    surface.fill_rect(x, y + t, t, h - 2.0 * t, paint);
    surface.fill_rect(x + w - t, y + t, t, h - 2.0 * t, paint);
}

/// End point of a limb hanging from `joint` at `angle`.
///
/// `side` mirrors the swing: +1 swings toward +x, -1 toward -x.
pub fn limb_end(joint: (f32, f32), angle: f32, length: f32, side: f32) -> (f32, f32) {
    (joint.0 + angle.sin() * length * side, joint.1 + angle.cos() * length)
}

/// Draw a limb as a thick segment with a rounded tip; returns the tip position.
pub fn limb(
    surface: &mut dyn Surface,
    joint: (f32, f32),
    angle: f32,
    length: f32,
    thickness: f32,
    side: f32,
    paint: Paint,
) -> (f32, f32) {
    let end = limb_end(joint, angle, length, side);
    surface.draw_line(joint, end, thickness, paint);
    circle(surface, end.0, end.1, thickness / 2.0, paint);
    end
}

/// Regular star polygon, used for sparks and gem glints.
pub fn star(cx: f32, cy: f32, outer: f32, inner: f32, points: u32) -> Vec<(f32, f32)> {
    let n = points.max(2) * 2;
    (0..n)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let a = i as f32 * std::f32::consts::PI / points.max(2) as f32 - std::f32::consts::FRAC_PI_2;
            (cx + a.cos() * r, cy + a.sin() * r)
        })
        .collect()
}

/// Eyes for a head centred at `(cx, cy)`: a pair facing front, one eye in
/// profile, nothing from behind.
pub fn eyes(
    surface: &mut dyn Surface,
    (cx, cy): (f32, f32),
    spacing: f32,
    radius: f32,
    direction: Direction,
    paint: Paint,
) {
    match direction {
        Direction::Up => {}
        Direction::Down => {
            circle(surface, cx - spacing, cy, radius, paint);
            circle(surface, cx + spacing, cy, radius, paint);
        }
        Direction::Left | Direction::Right => {
            circle(surface, cx + spacing * direction.facing(), cy, radius, paint);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawOp, PixelSurface, RecordingSurface};

    #[test]
    fn test_limb_end_hangs_down_at_zero() {
        let end = limb_end((10.0, 10.0), 0.0, 5.0, 1.0);
        assert!((end.0 - 10.0).abs() < 1e-6);
        assert!((end.1 - 15.0).abs() < 1e-6);
    }

    #[test]
    fn test_limb_end_mirrors_with_side() {
        let right = limb_end((0.0, 0.0), 0.5, 4.0, 1.0);
        let left = limb_end((0.0, 0.0), 0.5, 4.0, -1.0);
        assert!(right.0 > 0.0);
        assert!((left.0 + right.0).abs() < 1e-6);
        assert_eq!(left.1, right.1);
    }

    #[test]
    fn test_rounded_rect_keeps_corners_clear() {
        let mut surface = PixelSurface::new(10, 10);
        rounded_rect(&mut surface, 0.0, 0.0, 10.0, 10.0, 4.0, Paint::solid(0xFFFFFF));
        let img = surface.image();
        assert_eq!(img.get_pixel(0, 0)[3], 0);
        assert_eq!(img.get_pixel(5, 5)[3], 255);
        assert_eq!(img.get_pixel(5, 0)[3], 255);
    }

    #[test]
    fn test_outline_rect_is_hollow() {
        let mut surface = PixelSurface::new(8, 8);
        outline_rect(&mut surface, 0.0, 0.0, 8.0, 8.0, 1.0, Paint::solid(0xFFFFFF));
        let img = surface.image();
        assert_eq!(img.get_pixel(0, 4)[3], 255);
        assert_eq!(img.get_pixel(7, 7)[3], 255);
        assert_eq!(img.get_pixel(4, 4)[3], 0);
    }

    #[test]
    fn test_star_point_count() {
        assert_eq!(star(0.0, 0.0, 4.0, 2.0, 5).len(), 10);
    }

    #[test]
    fn test_eyes_per_direction() {
        let count = |direction| {
            let mut surface = RecordingSurface::new(16, 16);
            eyes(&mut surface, (8.0, 8.0), 3.0, 1.0, direction, Paint::solid(0));
            surface.calls().len()
        };
        assert_eq!(count(Direction::Down), 2);
        assert_eq!(count(Direction::Left), 1);
        assert_eq!(count(Direction::Up), 0);
    }

    #[test]
    fn test_profile_eye_sits_toward_facing() {
        let mut surface = RecordingSurface::new(16, 16);
        eyes(&mut surface, (8.0, 8.0), 3.0, 1.0, Direction::Left, Paint::solid(0));
        match &surface.calls()[0].op {
            DrawOp::Ellipse { cx, .. } => assert!(*cx < 8.0),
            other => panic!("unexpected op {:?}", other),
        }
    }
}
