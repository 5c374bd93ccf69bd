//! Shape rasterization into horizontal pixel spans.
//!
//! Every routine samples pixel centres `(x + 0.5, y + 0.5)` against the
//! continuous shape, so shapes with fractional coordinates (limb ends moved by
//! a pose, squashed ellipses) still rasterize without gaps or double rows.
//! Results are inclusive spans `x0..=x1` on row `y`.

/// One horizontal run of covered pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub y: i32,
    pub x0: i32,
    pub x1: i32,
}

impl Span {
    /// Number of pixels covered by the span.
    pub fn len(&self) -> usize {
        (self.x1 - self.x0 + 1).max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.x1 < self.x0
    }
}

/// Total number of pixels covered by a set of spans.
pub fn coverage(spans: &[Span]) -> usize {
    spans.iter().map(Span::len).sum()
}

/// Rasterize a filled axis-aligned rectangle.
///
/// # Examples
///
/// ```
/// use mockart::shapes::{coverage, rasterize_rect};
///
/// let spans = rasterize_rect(0.0, 0.0, 3.0, 2.0);
/// assert_eq!(spans.len(), 2);
/// assert_eq!(coverage(&spans), 6);
/// ```
pub fn rasterize_rect(x: f32, y: f32, w: f32, h: f32) -> Vec<Span> {
    if !(w > 0.0 && h > 0.0) {
        return Vec::new();
    }

    let x0 = (x - 0.5).ceil() as i32;
    let x1 = (x + w - 0.5).ceil() as i32 - 1;
    let y0 = (y - 0.5).ceil() as i32;
    let y1 = (y + h - 0.5).ceil() as i32 - 1;
    if x1 < x0 {
        return Vec::new();
    }

    (y0..=y1).map(|y| Span { y, x0, x1 }).collect()
}

/// Rasterize a filled ellipse centred at `(cx, cy)` with radii `(rx, ry)`.
///
/// # Examples
///
/// ```
/// use mockart::shapes::rasterize_ellipse;
///
/// let spans = rasterize_ellipse(5.0, 5.0, 3.0, 2.0);
/// assert!(spans.iter().any(|s| s.y == 5 && s.x0 <= 5 && s.x1 >= 5));
/// ```
pub fn rasterize_ellipse(cx: f32, cy: f32, rx: f32, ry: f32) -> Vec<Span> {
    let mut spans = Vec::new();
    if !(rx > 0.0 && ry > 0.0) {
        return spans;
    }

    let top = (cy - ry).floor() as i32;
    let bottom = (cy + ry).ceil() as i32;
    for y in top..=bottom {
        let dy = (y as f32 + 0.5 - cy) / ry;
        if dy.abs() > 1.0 {
            continue;
        }
        let half = rx * (1.0 - dy * dy).sqrt();
        let x0 = (cx - half - 0.5).ceil() as i32;
        let x1 = (cx + half - 0.5).floor() as i32;
        if x1 >= x0 {
            spans.push(Span { y, x0, x1 });
        }
    }

    spans
}

/// Rasterize a filled polygon with the even-odd rule.
///
/// Fewer than three vertices produce nothing.
///
/// # Examples
///
/// ```
/// use mockart::shapes::{coverage, rasterize_polygon};
///
/// let square = [(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)];
/// assert_eq!(coverage(&rasterize_polygon(&square)), 16);
/// ```
pub fn rasterize_polygon(vertices: &[(f32, f32)]) -> Vec<Span> {
    let mut spans = Vec::new();
    if vertices.len() < 3 {
        return spans;
    }

    let min_y = vertices.iter().map(|v| v.1).fold(f32::INFINITY, f32::min);
    let max_y = vertices.iter().map(|v| v.1).fold(f32::NEG_INFINITY, f32::max);
    if !min_y.is_finite() || !max_y.is_finite() {
        return spans;
    }

    let mut crossings: Vec<f32> = Vec::new();
    for y in (min_y - 0.5).ceil() as i32..=(max_y - 0.5).floor() as i32 {
        let sample_y = y as f32 + 0.5;
        crossings.clear();

        for i in 0..vertices.len() {
            let (x1, y1) = vertices[i];
            let (x2, y2) = vertices[(i + 1) % vertices.len()];
            // Half-open test so a vertex shared by two edges is counted once
            if (y1 <= sample_y && y2 > sample_y) || (y2 <= sample_y && y1 > sample_y) {
                crossings.push(x1 + (sample_y - y1) * (x2 - x1) / (y2 - y1));
            }
        }

        crossings.sort_by(|a, b| a.total_cmp(b));
        for pair in crossings.chunks(2) {
            if let [left, right] = pair {
                let x0 = (left - 0.5).ceil() as i32;
                let x1 = (right - 0.5).ceil() as i32 - 1;
                if x1 >= x0 {
                    spans.push(Span { y, x0, x1 });
                }
            }
        }
    }

    spans
}

/// Rasterize a one pixel wide line using Bresenham's algorithm.
///
/// # Examples
///
/// ```
/// use mockart::shapes::{coverage, rasterize_line};
///
/// let spans = rasterize_line((0, 0), (3, 3));
/// assert_eq!(coverage(&spans), 4);
/// ```
pub fn rasterize_line(p0: (i32, i32), p1: (i32, i32)) -> Vec<Span> {
    let mut spans = Vec::new();

    let (mut x0, mut y0) = p0;
    let (x1, y1) = p1;

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        spans.push(Span { y: y0, x0, x1: x0 });

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }

    spans
}

/// Outline a thick segment as a quad, ready for [`rasterize_polygon`].
///
/// Returns `None` when the two endpoints coincide.
pub fn segment_quad(from: (f32, f32), to: (f32, f32), width: f32) -> Option<[(f32, f32); 4]> {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let len = (dx * dx + dy * dy).sqrt();
    if len < f32::EPSILON {
        return None;
    }
    let (nx, ny) = (-dy / len * width / 2.0, dx / len * width / 2.0);
    Some([
        (from.0 + nx, from.1 + ny),
        (to.0 + nx, to.1 + ny),
        (to.0 - nx, to.1 - ny),
        (from.0 - nx, from.1 - ny),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contains(spans: &[Span], x: i32, y: i32) -> bool {
        spans.iter().any(|s| s.y == y && s.x0 <= x && x <= s.x1)
    }

    #[test]
    fn test_rasterize_rect_integer_aligned() {
        let spans = rasterize_rect(0.0, 0.0, 3.0, 2.0);
        assert_eq!(coverage(&spans), 6);
        assert!(contains(&spans, 0, 0));
        assert!(contains(&spans, 2, 1));
        assert!(!contains(&spans, 3, 0));
    }

    #[test]
    fn test_rect_degenerate_sizes_draw_nothing() {
        assert!(rasterize_rect(0.0, 0.0, 0.0, 2.0).is_empty());
        assert!(rasterize_rect(0.0, 0.0, 2.0, 0.0).is_empty());
        assert!(rasterize_rect(0.0, 0.0, f32::NAN, 2.0).is_empty());
    }

    #[test]
    fn test_rect_spans_cross_origin() {
        let spans = rasterize_rect(-2.0, -2.0, 2.0, 2.0);
        assert_eq!(coverage(&spans), 4);
        assert!(contains(&spans, -2, -2));
        assert!(contains(&spans, -1, -1));
    }

    #[test]
    fn test_rasterize_ellipse_center_covered() {
        let spans = rasterize_ellipse(5.0, 5.0, 3.0, 3.0);
        assert!(contains(&spans, 5, 5));
        assert!(!contains(&spans, 9, 5));
    }

    #[test]
    fn test_rasterize_ellipse_is_symmetric() {
        let spans = rasterize_ellipse(8.0, 8.0, 4.0, 2.0);
        for s in &spans {
            assert_eq!(8 - s.x0, s.x1 + 1 - 8, "row {} not symmetric", s.y);
        }
    }

    #[test]
    fn test_ellipse_flat_radius_draws_nothing() {
        assert!(rasterize_ellipse(5.0, 5.0, 0.0, 3.0).is_empty());
        assert!(rasterize_ellipse(5.0, 5.0, 3.0, 0.0).is_empty());
    }

    #[test]
    fn test_polygon_square_coverage() {
        let square = [(0.0, 0.0), (3.0, 0.0), (3.0, 3.0), (0.0, 3.0)];
        let spans = rasterize_polygon(&square);
        assert_eq!(coverage(&spans), 9);
        assert!(contains(&spans, 0, 0));
        assert!(contains(&spans, 2, 2));
    }

    #[test]
    fn test_polygon_triangle_interior() {
        let triangle = [(0.0, 0.0), (8.0, 0.0), (4.0, 6.0)];
        let spans = rasterize_polygon(&triangle);
        assert!(contains(&spans, 4, 1));
        assert!(!contains(&spans, 0, 5));
    }

    #[test]
    fn test_polygon_needs_three_vertices() {
        assert!(rasterize_polygon(&[(0.0, 0.0), (1.0, 1.0)]).is_empty());
    }

    #[test]
    fn test_line_diagonal_spans() {
        let spans = rasterize_line((0, 0), (3, 3));
        assert_eq!(coverage(&spans), 4);
        assert!(contains(&spans, 0, 0));
        assert!(contains(&spans, 3, 3));
    }

    #[test]
    fn test_line_through_origin() {
        let spans = rasterize_line((-2, -2), (2, 2));
        assert!(contains(&spans, -2, -2));
        assert!(contains(&spans, 0, 0));
    }

    #[test]
    fn test_segment_quad_width() {
        let quad = segment_quad((0.0, 0.0), (10.0, 0.0), 4.0).unwrap();
        let spans = rasterize_polygon(&quad);
        assert!(contains(&spans, 5, 1));
        assert!(contains(&spans, 5, -2));
        assert!(!contains(&spans, 5, 2));
    }

    #[test]
    fn test_segment_quad_degenerate() {
        assert!(segment_quad((1.0, 1.0), (1.0, 1.0), 3.0).is_none());
    }
}
