//! Drawing surfaces the rig drawers paint onto.
//!
//! A [`Surface`] is the drawing half of the Canvas/Texture Host: it accepts
//! rectangles, ellipses, polygons and lines in the current [`Layer`] and
//! [`Viewport`]. [`PixelSurface`] rasterizes into an RGBA buffer,
//! [`RecordingSurface`] keeps the calls so z-order and occlusion can be
//! inspected without looking at pixels.

use image::{Rgba, RgbaImage};
use serde::Serialize;

use crate::color::to_rgba;
use crate::shapes::{
    rasterize_ellipse, rasterize_line, rasterize_polygon, rasterize_rect, segment_quad, Span,
};

/// Colour plus opacity for one draw call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Paint {
    pub color: u32,
    pub alpha: f32,
}

impl Paint {
    pub fn solid(color: u32) -> Self {
        Self { color, alpha: 1.0 }
    }

    pub fn with_alpha(color: u32, alpha: f32) -> Self {
        Self { color, alpha: alpha.clamp(0.0, 1.0) }
    }
}

/// Semantic tag attached to every draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Shadow,
    Back,
    Legs,
    Body,
    Armor,
    Arms,
    Head,
    Face,
    Hair,
    Headgear,
    Held,
    Effect,
    Ground,
    Pattern,
    Detail,
    Frame,
    Fill,
    Emergency,
}

/// Origin offset plus clip rectangle, in surface pixels.
///
/// Shapes are drawn relative to `(x, y)` and never touch pixels outside the
/// `w`x`h` window. Sprite sheets draw each frame through its own viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Viewport {
    pub fn full(width: u32, height: u32) -> Self {
        Self { x: 0, y: 0, w: width, h: height }
    }
}

/// The drawing primitives the engine needs from a host canvas.
pub trait Surface {
    /// Full surface size in pixels.
    fn size(&self) -> (u32, u32);

    /// Select the layer subsequent calls belong to.
    fn set_layer(&mut self, layer: Layer);

    /// Restrict drawing to a window of the surface and move the origin there.
    fn set_viewport(&mut self, viewport: Viewport);

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: Paint);

    fn fill_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, paint: Paint);

    fn fill_polygon(&mut self, points: &[(f32, f32)], paint: Paint);

    /// Line of the given width; widths of one pixel or less are hairlines.
    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, paint: Paint);
}

/// Surface backed by an RGBA pixel buffer.
#[derive(Debug, Clone)]
pub struct PixelSurface {
    image: RgbaImage,
    viewport: Viewport,
}

impl PixelSurface {
    /// Transparent surface of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { image: RgbaImage::new(width, height), viewport: Viewport::full(width, height) }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    fn blend_spans(&mut self, spans: &[Span], paint: Paint) {
        if paint.alpha <= 0.0 {
            return;
        }
        let src = to_rgba(paint.color, paint.alpha);
        let (width, height) = self.image.dimensions();
        let vp = self.viewport;
        let clip_x0 = vp.x.max(0);
        let clip_y0 = vp.y.max(0);
        let clip_x1 = (vp.x + vp.w as i32).min(width as i32) - 1;
        let clip_y1 = (vp.y + vp.h as i32).min(height as i32) - 1;

        for span in spans {
            let y = span.y + vp.y;
            if y < clip_y0 || y > clip_y1 {
                continue;
            }
            let x0 = (span.x0 + vp.x).max(clip_x0);
            let x1 = (span.x1 + vp.x).min(clip_x1);
            for x in x0..=x1 {
                let dst = self.image.get_pixel_mut(x as u32, y as u32);
                *dst = blend(*dst, src);
            }
        }
    }
}

/// Source-over alpha compositing of straight (non-premultiplied) RGBA.
fn blend(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0;
    if sa >= 1.0 {
        return src;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let channel = |i: usize| {
        let c = (src[i] as f32 * sa + dst[i] as f32 * da * (1.0 - sa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    Rgba([channel(0), channel(1), channel(2), (out_a * 255.0).round() as u8])
}

impl Surface for PixelSurface {
    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn set_layer(&mut self, _layer: Layer) {}

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: Paint) {
        let spans = rasterize_rect(x, y, w, h);
        self.blend_spans(&spans, paint);
    }

    fn fill_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, paint: Paint) {
        let spans = rasterize_ellipse(cx, cy, rx, ry);
        self.blend_spans(&spans, paint);
    }

    fn fill_polygon(&mut self, points: &[(f32, f32)], paint: Paint) {
        let spans = rasterize_polygon(points);
        self.blend_spans(&spans, paint);
    }

    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, paint: Paint) {
        let spans = match segment_quad(from, to, width) {
            Some(quad) if width > 1.0 => rasterize_polygon(&quad),
            _ => rasterize_line(
                (from.0.floor() as i32, from.1.floor() as i32),
                (to.0.floor() as i32, to.1.floor() as i32),
            ),
        };
        self.blend_spans(&spans, paint);
    }
}

/// Geometry of one recorded call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum DrawOp {
    Rect { x: f32, y: f32, w: f32, h: f32 },
    Ellipse { cx: f32, cy: f32, rx: f32, ry: f32 },
    Polygon { points: Vec<(f32, f32)> },
    Line { from: (f32, f32), to: (f32, f32), width: f32 },
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawCall {
    pub layer: Layer,
    pub viewport: Viewport,
    pub op: DrawOp,
    pub paint: Paint,
}

/// Surface that records calls instead of rasterizing them.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    layer: Layer,
    viewport: Viewport,
    calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            layer: Layer::Body,
            viewport: Viewport::full(width, height),
            calls: Vec::new(),
        }
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Layers in the order they were first drawn.
    pub fn layer_order(&self) -> Vec<Layer> {
        let mut order: Vec<Layer> = Vec::new();
        for call in &self.calls {
            if !order.contains(&call.layer) {
                order.push(call.layer);
            }
        }
        order
    }

    /// Whether any call was issued in `layer`.
    pub fn has_layer(&self, layer: Layer) -> bool {
        self.calls.iter().any(|c| c.layer == layer)
    }

    /// Number of calls issued in `layer`.
    pub fn count(&self, layer: Layer) -> usize {
        self.calls.iter().filter(|c| c.layer == layer).count()
    }

    fn push(&mut self, op: DrawOp, paint: Paint) {
        self.calls.push(DrawCall { layer: self.layer, viewport: self.viewport, op, paint });
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_layer(&mut self, layer: Layer) {
        self.layer = layer;
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: Paint) {
        self.push(DrawOp::Rect { x, y, w, h }, paint);
    }

    fn fill_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, paint: Paint) {
        self.push(DrawOp::Ellipse { cx, cy, rx, ry }, paint);
    }

    fn fill_polygon(&mut self, points: &[(f32, f32)], paint: Paint) {
        self.push(DrawOp::Polygon { points: points.to_vec() }, paint);
    }

    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, paint: Paint) {
        self.push(DrawOp::Line { from, to, width }, paint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_surface_starts_transparent() {
        let surface = PixelSurface::new(4, 4);
        assert!(surface.image().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_fill_rect_opaque() {
        let mut surface = PixelSurface::new(4, 4);
        surface.fill_rect(1.0, 1.0, 2.0, 2.0, Paint::solid(0xFF0000));
        assert_eq!(*surface.image().get_pixel(1, 1), Rgba([255, 0, 0, 255]));
        assert_eq!(*surface.image().get_pixel(0, 0), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_shapes_are_clipped_to_surface() {
        let mut surface = PixelSurface::new(4, 4);
        surface.fill_rect(-10.0, -10.0, 40.0, 40.0, Paint::solid(0x00FF00));
        surface.fill_ellipse(100.0, 100.0, 5.0, 5.0, Paint::solid(0x0000FF));
        assert!(surface.image().pixels().all(|p| *p == Rgba([0, 255, 0, 255])));
    }

    #[test]
    fn test_viewport_offsets_and_clips() {
        let mut surface = PixelSurface::new(8, 4);
        surface.set_viewport(Viewport { x: 4, y: 0, w: 4, h: 4 });
        surface.fill_rect(0.0, 0.0, 10.0, 10.0, Paint::solid(0xFFFFFF));
        assert_eq!(surface.image().get_pixel(3, 0)[3], 0);
        assert_eq!(surface.image().get_pixel(4, 0)[3], 255);
        assert_eq!(surface.image().get_pixel(7, 3)[3], 255);
    }

    #[test]
    fn test_alpha_blending_over_opaque() {
        let mut surface = PixelSurface::new(1, 1);
        surface.fill_rect(0.0, 0.0, 1.0, 1.0, Paint::solid(0x000000));
        surface.fill_rect(0.0, 0.0, 1.0, 1.0, Paint::with_alpha(0xFFFFFF, 0.5));
        let p = surface.image().get_pixel(0, 0);
        assert_eq!(p[3], 255);
        assert!(p[0] > 120 && p[0] < 135);
    }

    #[test]
    fn test_zero_alpha_is_noop() {
        let mut surface = PixelSurface::new(2, 2);
        surface.fill_rect(0.0, 0.0, 2.0, 2.0, Paint::with_alpha(0xFFFFFF, 0.0));
        assert!(surface.image().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_thick_line_covers_more_than_hairline() {
        let mut thin = PixelSurface::new(16, 16);
        let mut thick = PixelSurface::new(16, 16);
        thin.draw_line((2.0, 8.0), (14.0, 8.0), 1.0, Paint::solid(0xFFFFFF));
        thick.draw_line((2.0, 8.0), (14.0, 8.0), 4.0, Paint::solid(0xFFFFFF));
        let count = |s: &PixelSurface| s.image().pixels().filter(|p| p[3] > 0).count();
        assert!(count(&thick) > count(&thin));
    }

    #[test]
    fn test_recording_surface_tracks_layers() {
        let mut surface = RecordingSurface::new(8, 8);
        surface.set_layer(Layer::Body);
        surface.fill_rect(0.0, 0.0, 1.0, 1.0, Paint::solid(0));
        surface.set_layer(Layer::Face);
        surface.fill_ellipse(1.0, 1.0, 1.0, 1.0, Paint::solid(0));
        surface.set_layer(Layer::Body);
        surface.fill_rect(0.0, 0.0, 1.0, 1.0, Paint::solid(0));

        assert_eq!(surface.layer_order(), vec![Layer::Body, Layer::Face]);
        assert_eq!(surface.count(Layer::Body), 2);
        assert!(surface.has_layer(Layer::Face));
        assert!(!surface.has_layer(Layer::Hair));
    }
}
