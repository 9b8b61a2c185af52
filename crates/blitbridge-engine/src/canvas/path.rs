/// Open-path builder owned by each surface.
///
/// Points are integer surface coordinates. A path is a list of sub-paths;
/// `move_to` starts a new one and `close_path` marks the current one closed
/// and starts a fresh sub-path at its first point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    subpaths: Vec<SubPath>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct SubPath {
    points: Vec<(i32, i32)>,
    closed: bool,
}

impl Path {
    pub fn clear(&mut self) {
        self.subpaths.clear();
    }

    pub fn move_to(&mut self, x: i32, y: i32) {
        self.subpaths.push(SubPath {
            points: vec![(x, y)],
            closed: false,
        });
    }

    /// Adds a segment; with no current point this behaves like `move_to`.
    pub fn line_to(&mut self, x: i32, y: i32) {
        match self.subpaths.last_mut() {
            Some(sp) if !sp.closed => sp.points.push((x, y)),
            _ => self.move_to(x, y),
        }
    }

    pub fn close(&mut self) {
        let Some(sp) = self.subpaths.last_mut() else { return };
        if sp.closed {
            return;
        }
        sp.closed = true;
        let start = sp.points[0];
        self.subpaths.push(SubPath {
            points: vec![start],
            closed: false,
        });
    }

    /// Iterates every line segment in drawing order, including closing edges.
    pub fn segments(&self) -> impl Iterator<Item = ((i32, i32), (i32, i32))> + '_ {
        self.subpaths.iter().flat_map(|sp| {
            let open = sp.points.windows(2).map(|w| (w[0], w[1]));
            let closing = match (sp.closed, sp.points.first(), sp.points.last()) {
                (true, Some(&first), Some(&last)) if sp.points.len() > 1 => Some((last, first)),
                _ => None,
            };
            open.chain(closing)
        })
    }

    pub fn is_empty(&self) -> bool {
        self.segments().next().is_none()
    }
}

/// Clips the segment `a`-`b` to `[0, max_x] x [0, max_y]` (Liang-Barsky).
///
/// Returns the clipped endpoints rounded to pixels, or `None` when the segment
/// misses the box. An endpoint that is already inside comes back unchanged.
fn clip_segment(
    a: (i64, i64),
    b: (i64, i64),
    max_x: i64,
    max_y: i64,
) -> Option<((i64, i64), (i64, i64))> {
    let (x0, y0) = (a.0 as f64, a.1 as f64);
    let (dx, dy) = ((b.0 - a.0) as f64, (b.1 - a.1) as f64);
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);

    for (p, q) in [
        (-dx, x0),
        (dx, max_x as f64 - x0),
        (-dy, y0),
        (dy, max_y as f64 - y0),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    let at = |t: f64| {
        (
            ((x0 + t * dx).round() as i64).clamp(0, max_x),
            ((y0 + t * dy).round() as i64).clamp(0, max_y),
        )
    };
    let start = if t0 == 0.0 { a } else { at(t0) };
    let end = if t1 == 1.0 { b } else { at(t1) };
    Some((start, end))
}

/// Rasterizes a 1-pixel line from `a` to `b` (Bresenham) inside a
/// `width x height` surface, calling `plot` per pixel.
///
/// The segment is clipped first, so only on-surface pixels are visited no
/// matter how far away the endpoints are. The start point is skipped when
/// `include_start` is unset and it survived clipping, so connected segments do
/// not paint their shared vertex twice.
pub(crate) fn rasterize_line(
    a: (i32, i32),
    b: (i32, i32),
    include_start: bool,
    (width, height): (u32, u32),
    mut plot: impl FnMut(i64, i64),
) {
    if width == 0 || height == 0 {
        return;
    }
    let a = (a.0 as i64, a.1 as i64);
    let b = (b.0 as i64, b.1 as i64);
    let Some((start, end)) = clip_segment(a, b, width as i64 - 1, height as i64 - 1) else {
        return;
    };

    let (mut x, mut y) = start;
    let (x1, y1) = end;

    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let mut first = !include_start && start == a;

    loop {
        if !first {
            plot(x, y);
        }
        first = false;

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_in(a: (i32, i32), b: (i32, i32), bounds: (u32, u32)) -> Vec<(i64, i64)> {
        let mut out = Vec::new();
        rasterize_line(a, b, true, bounds, |x, y| out.push((x, y)));
        out
    }

    fn line(a: (i32, i32), b: (i32, i32)) -> Vec<(i64, i64)> {
        line_in(a, b, (64, 64))
    }

    // ── rasterize_line ────────────────────────────────────────────────────

    #[test]
    fn horizontal_line_covers_both_ends() {
        assert_eq!(line((0, 0), (3, 0)), vec![(0, 0), (1, 0), (2, 0), (3, 0)]);
    }

    #[test]
    fn reversed_vertical_line() {
        assert_eq!(line((1, 2), (1, 0)), vec![(1, 2), (1, 1), (1, 0)]);
    }

    #[test]
    fn diagonal_line() {
        assert_eq!(line((0, 0), (2, 2)), vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn single_point_line() {
        assert_eq!(line((5, 5), (5, 5)), vec![(5, 5)]);
    }

    #[test]
    fn start_can_be_skipped() {
        let mut out = Vec::new();
        rasterize_line((0, 0), (2, 0), false, (64, 64), |x, y| out.push((x, y)));
        assert_eq!(out, vec![(1, 0), (2, 0)]);
    }

    // ── clipping ──────────────────────────────────────────────────────────

    #[test]
    fn extreme_endpoints_are_clipped_to_surface() {
        let row: Vec<_> = (0..8).map(|x| (x, 0)).collect();
        assert_eq!(line_in((-2_000_000_000, 0), (2_000_000_000, 0), (8, 6)), row);
        assert_eq!(line_in((0, 0), (i32::MAX, 0), (8, 6)), row);
        assert_eq!(line_in((i32::MIN, 0), (i32::MAX, 0), (8, 6)), row);
    }

    #[test]
    fn long_diagonal_visits_only_visible_pixels() {
        let pts = line_in((i32::MIN, i32::MIN), (i32::MAX, i32::MAX), (8, 6));
        assert!(!pts.is_empty());
        assert!(pts.len() <= 8 + 6);
        assert!(pts.iter().all(|&(x, y)| (0..8).contains(&x) && (0..6).contains(&y)));
    }

    #[test]
    fn segment_missing_surface_plots_nothing() {
        assert!(line_in((-10, 3), (-1, 3), (8, 6)).is_empty());
        assert!(line_in((0, 100), (7, 100), (8, 6)).is_empty());
        assert!(line_in((0, 0), (3, 0), (0, 6)).is_empty());
    }

    #[test]
    fn clipped_start_is_plotted_even_when_skipping_starts() {
        let mut out = Vec::new();
        rasterize_line((-5, 1), (2, 1), false, (8, 6), |x, y| out.push((x, y)));
        assert_eq!(out, vec![(0, 1), (1, 1), (2, 1)]);
    }

    // ── Path ──────────────────────────────────────────────────────────────

    #[test]
    fn open_path_segments() {
        let mut p = Path::default();
        p.move_to(0, 0);
        p.line_to(4, 0);
        p.line_to(4, 4);
        let segs: Vec<_> = p.segments().collect();
        assert_eq!(segs, vec![((0, 0), (4, 0)), ((4, 0), (4, 4))]);
    }

    #[test]
    fn close_adds_edge_back_to_start() {
        let mut p = Path::default();
        p.move_to(0, 0);
        p.line_to(4, 0);
        p.line_to(4, 4);
        p.close();
        let segs: Vec<_> = p.segments().collect();
        assert_eq!(segs.last(), Some(&((4, 4), (0, 0))));
        assert_eq!(segs.len(), 3);
    }

    #[test]
    fn line_to_without_current_point_starts_subpath() {
        let mut p = Path::default();
        p.line_to(3, 3);
        assert!(p.is_empty());
        p.line_to(5, 3);
        assert_eq!(p.segments().collect::<Vec<_>>(), vec![((3, 3), (5, 3))]);
    }

    #[test]
    fn clear_drops_everything() {
        let mut p = Path::default();
        p.move_to(0, 0);
        p.line_to(1, 1);
        p.clear();
        assert!(p.is_empty());
    }
}
