//! On-screen placement of the primary surface.

/// Fixed logical resolution shared by host and module.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const DEFAULT: Resolution = Resolution::new(256, 192);

    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Requested magnification for the primary surface.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ScaleRequest {
    /// No explicit factor; presented at 1x.
    Auto,
    Factor(f64),
}

impl ScaleRequest {
    /// Maps a raw factor where `0` (or anything non-positive) means "auto".
    pub fn from_raw(factor: f64) -> Self {
        if factor > 0.0 && factor.is_finite() {
            ScaleRequest::Factor(factor)
        } else {
            ScaleRequest::Auto
        }
    }

    #[inline]
    pub fn factor(self) -> f64 {
        match self {
            ScaleRequest::Auto => 1.0,
            ScaleRequest::Factor(f) => f,
        }
    }
}

/// Result of applying a scale request against the current viewport.
///
/// Margins are the offsets of the scaled primary surface's top-left corner from
/// the viewport's top-left corner, in logical pixels. They are negative when
/// the scaled surface is larger than the viewport.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScreenLayout {
    pub scale: f64,
    pub margin_x: i32,
    pub margin_y: i32,
}

impl ScreenLayout {
    pub fn compute(request: ScaleRequest, viewport: (f64, f64), res: Resolution) -> Self {
        let scale = request.factor();
        let (vw, vh) = viewport;
        Self {
            scale,
            margin_x: ((vw - res.width as f64 * scale) / 2.0).floor() as i32,
            margin_y: ((vh - res.height as f64 * scale) / 2.0).floor() as i32,
        }
    }

    /// Destination rectangle of the primary surface, `(x, y, w, h)` in logical pixels.
    pub fn dest_rect(&self, res: Resolution) -> (f32, f32, f32, f32) {
        (
            self.margin_x as f32,
            self.margin_y as f32,
            (res.width as f64 * self.scale) as f32,
            (res.height as f64 * self.scale) as f32,
        )
    }
}

/// Largest scale factor that fits the viewport's smaller dimension, floored to
/// 0.1 and never below 0.1.
pub fn fit_scale_factor(viewport: (f64, f64), res: Resolution) -> f64 {
    let (w, h) = viewport;
    let ratio = if w > h {
        h / res.height.max(1) as f64
    } else {
        w / res.width.max(1) as f64
    };

    // Nudge before flooring so 2.3 computed as 2.2999999 still snaps to 2.3.
    let snapped = ((ratio * 10.0) + 1e-9).floor() / 10.0;
    if snapped.is_finite() { snapped.max(0.1) } else { 0.1 }
}

/// Next factor in the manual zoom cycle `0, 1, ..., 10, 0, ...`.
pub fn next_cycle_factor(current: f64) -> u32 {
    let whole = current.max(0.0).floor() as u32;
    (whole + 1) % 11
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── fit_scale_factor ──────────────────────────────────────────────────

    #[test]
    fn landscape_viewport_binds_on_height() {
        assert_eq!(fit_scale_factor((400.0, 300.0), Resolution::new(200, 150)), 2.0);
    }

    #[test]
    fn portrait_viewport_binds_on_width() {
        assert_eq!(fit_scale_factor((300.0, 900.0), Resolution::new(200, 150)), 1.5);
    }

    #[test]
    fn factor_is_floored_to_one_decimal() {
        // 1000 / 192 = 5.208...
        assert_eq!(fit_scale_factor((1600.0, 1000.0), Resolution::DEFAULT), 5.2);
    }

    #[test]
    fn exact_tenths_are_not_lost_to_rounding() {
        // 2.3 * 192 = 441.6
        assert_eq!(fit_scale_factor((1000.0, 441.6), Resolution::DEFAULT), 2.3);
    }

    #[test]
    fn tiny_viewport_clamps_to_minimum() {
        assert_eq!(fit_scale_factor((10.0, 5.0), Resolution::DEFAULT), 0.1);
        assert_eq!(fit_scale_factor((0.0, 0.0), Resolution::DEFAULT), 0.1);
    }

    // ── ScreenLayout ──────────────────────────────────────────────────────

    #[test]
    fn layout_centres_scaled_surface() {
        let l = ScreenLayout::compute(
            ScaleRequest::Factor(2.0),
            (600.0, 400.0),
            Resolution::new(200, 150),
        );
        assert_eq!(l.scale, 2.0);
        assert_eq!(l.margin_x, 100);
        assert_eq!(l.margin_y, 50);
    }

    #[test]
    fn auto_request_is_unit_scale() {
        let l = ScreenLayout::compute(ScaleRequest::Auto, (256.0, 192.0), Resolution::DEFAULT);
        assert_eq!(l.scale, 1.0);
        assert_eq!((l.margin_x, l.margin_y), (0, 0));
    }

    #[test]
    fn oversized_surface_has_negative_margins() {
        let l = ScreenLayout::compute(ScaleRequest::Factor(3.0), (500.0, 500.0), Resolution::new(200, 100));
        assert_eq!(l.margin_x, -50);
        assert_eq!(l.margin_y, 100);
    }

    #[test]
    fn odd_margin_is_floored() {
        let l = ScreenLayout::compute(ScaleRequest::Factor(1.0), (257.0, 192.0), Resolution::DEFAULT);
        assert_eq!(l.margin_x, 0);
    }

    #[test]
    fn zero_raw_factor_means_auto() {
        assert_eq!(ScaleRequest::from_raw(0.0), ScaleRequest::Auto);
        assert_eq!(ScaleRequest::from_raw(2.5), ScaleRequest::Factor(2.5));
    }

    // ── next_cycle_factor ─────────────────────────────────────────────────

    #[test]
    fn cycle_advances_from_floor() {
        assert_eq!(next_cycle_factor(2.7), 3);
        assert_eq!(next_cycle_factor(1.0), 2);
    }

    #[test]
    fn cycle_wraps_after_ten() {
        assert_eq!(next_cycle_factor(10.0), 0);
    }
}
