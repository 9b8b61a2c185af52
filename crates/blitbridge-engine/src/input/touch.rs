use std::collections::HashMap;

use super::key::KeyCode;

/// Tuning for touch gesture recognition.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GestureConfig {
    /// A second touch start strictly within this many milliseconds of the
    /// first is a double tap.
    pub tap_window_ms: f64,
    /// Displacement (logical pixels, per axis) a move must strictly exceed to
    /// count as a swipe.
    pub swipe_threshold: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            tap_window_ms: 250.0,
            swipe_threshold: 25.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum TapState {
    Idle,
    Armed { since_ms: f64 },
}

/// Tracks in-flight touch contacts and turns them into key codes.
///
/// Tap state is shared by all contacts. Time is supplied by the caller so the
/// recognizer stays deterministic.
#[derive(Debug, Clone)]
pub struct TouchTracker {
    config: GestureConfig,
    tap: TapState,
    contacts: HashMap<u64, (f64, f64)>,
}

impl TouchTracker {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            tap: TapState::Idle,
            contacts: HashMap::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> GestureConfig {
        self.config
    }

    /// Records a new contact. Returns [`KeyCode::Space`] on a double tap.
    pub fn start(&mut self, id: u64, x: f64, y: f64, now_ms: f64) -> Option<KeyCode> {
        self.contacts.insert(id, (x, y));

        match self.tap {
            TapState::Armed { since_ms } if now_ms - since_ms < self.config.tap_window_ms => {
                self.tap = TapState::Idle;
                Some(KeyCode::Space)
            }
            _ => {
                self.tap = TapState::Armed { since_ms: now_ms };
                None
            }
        }
    }

    /// Updates a contact's position and reports a swipe direction if the
    /// displacement since its last recorded position exceeds the threshold.
    pub fn moved(&mut self, id: u64, x: f64, y: f64) -> Option<KeyCode> {
        let Some(prev) = self.contacts.insert(id, (x, y)) else {
            log::debug!("touch move for untracked contact {id}; adopting");
            return None;
        };

        let m = self.config.swipe_threshold;
        let dx = x - prev.0;
        let dy = y - prev.1;

        if dx > m {
            Some(KeyCode::Right)
        } else if dy > m {
            Some(KeyCode::Down)
        } else if dx < -m {
            Some(KeyCode::Left)
        } else if dy < -m {
            Some(KeyCode::Up)
        } else {
            None
        }
    }

    /// Forgets a contact (end or cancel).
    pub fn end(&mut self, id: u64) {
        self.contacts.remove(&id);
    }

    pub fn contact(&self, id: u64) -> Option<(f64, f64)> {
        self.contacts.get(&id).copied()
    }

    #[inline]
    pub fn active_contacts(&self) -> usize {
        self.contacts.len()
    }
}

impl Default for TouchTracker {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── taps ──────────────────────────────────────────────────────────────

    #[test]
    fn double_tap_inside_window_is_space() {
        let mut t = TouchTracker::default();
        assert_eq!(t.start(1, 0.0, 0.0, 0.0), None);
        t.end(1);
        assert_eq!(t.start(2, 0.0, 0.0, 100.0), Some(KeyCode::Space));
    }

    #[test]
    fn taps_outside_window_are_single() {
        let mut t = TouchTracker::default();
        assert_eq!(t.start(1, 0.0, 0.0, 0.0), None);
        assert_eq!(t.start(2, 0.0, 0.0, 300.0), None);
    }

    #[test]
    fn window_boundary_is_exclusive() {
        let mut t = TouchTracker::default();
        t.start(1, 0.0, 0.0, 0.0);
        assert_eq!(t.start(2, 0.0, 0.0, 250.0), None);
    }

    #[test]
    fn expired_tap_rearms() {
        let mut t = TouchTracker::default();
        t.start(1, 0.0, 0.0, 0.0);
        t.start(1, 0.0, 0.0, 500.0);
        assert_eq!(t.start(1, 0.0, 0.0, 600.0), Some(KeyCode::Space));
    }

    #[test]
    fn triple_tap_yields_one_space() {
        let mut t = TouchTracker::default();
        let out: Vec<_> = [0.0, 50.0, 100.0]
            .into_iter()
            .filter_map(|ms| t.start(1, 0.0, 0.0, ms))
            .collect();
        assert_eq!(out, vec![KeyCode::Space]);
    }

    // ── swipes ────────────────────────────────────────────────────────────

    #[test]
    fn diagonal_swipe_prefers_right() {
        let mut t = TouchTracker::default();
        t.start(7, 100.0, 100.0, 0.0);
        assert_eq!(t.moved(7, 130.0, 130.0), Some(KeyCode::Right));
    }

    #[test]
    fn swipe_directions() {
        let cases = [
            ((0.0, 30.0), KeyCode::Down),
            ((-30.0, 0.0), KeyCode::Left),
            ((0.0, -30.0), KeyCode::Up),
            ((-30.0, 30.0), KeyCode::Down),
            ((-30.0, -30.0), KeyCode::Left),
        ];
        for ((dx, dy), expected) in cases {
            let mut t = TouchTracker::default();
            t.start(1, 100.0, 100.0, 0.0);
            assert_eq!(t.moved(1, 100.0 + dx, 100.0 + dy), Some(expected), "({dx}, {dy})");
        }
    }

    #[test]
    fn threshold_is_strict() {
        let mut t = TouchTracker::default();
        t.start(1, 0.0, 0.0, 0.0);
        assert_eq!(t.moved(1, 25.0, 0.0), None);
    }

    #[test]
    fn small_moves_still_update_position() {
        let mut t = TouchTracker::default();
        t.start(1, 0.0, 0.0, 0.0);
        assert_eq!(t.moved(1, 20.0, 0.0), None);
        assert_eq!(t.contact(1), Some((20.0, 0.0)));
        // 20 -> 40 is only 20 px since the last recorded position.
        assert_eq!(t.moved(1, 40.0, 0.0), None);
    }

    #[test]
    fn move_without_start_is_adopted() {
        let mut t = TouchTracker::default();
        assert_eq!(t.moved(3, 500.0, 500.0), None);
        assert_eq!(t.contact(3), Some((500.0, 500.0)));
        assert_eq!(t.moved(3, 540.0, 500.0), Some(KeyCode::Right));
    }

    #[test]
    fn end_forgets_contact() {
        let mut t = TouchTracker::default();
        t.start(1, 0.0, 0.0, 0.0);
        t.start(2, 0.0, 0.0, 1000.0);
        t.end(1);
        assert_eq!(t.active_contacts(), 1);
        assert_eq!(t.contact(1), None);
    }
}
