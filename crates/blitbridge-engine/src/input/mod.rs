//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Runtime code translates platform events into `InputEvent`s (see
//! `platform::winit`) and feeds them to an `InputMultiplexer`, which turns
//! keys and touch gestures into a single FIFO of `KeyCode`s.

mod key;
mod queue;
mod touch;

pub mod platform;

pub use key::{Key, KeyCode};
pub use queue::EventQueue;
pub use touch::{GestureConfig, TouchTracker};

/// Touch contact lifecycle phase.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TouchPhase {
    Started,
    Moved,
    Ended,
    Cancelled,
}

/// Platform-agnostic events emitted by the runtime.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InputEvent {
    /// Key press. Releases are not forwarded.
    KeyDown { key: Key, repeat: bool },

    /// Touch contact update, position in logical pixels.
    Touch {
        id: u64,
        phase: TouchPhase,
        x: f64,
        y: f64,
    },

    /// Viewport size changed, in logical pixels.
    Resized { width: f64, height: f64 },
}

/// Converts keyboard and touch input into discrete key codes.
#[derive(Debug, Clone, Default)]
pub struct InputMultiplexer {
    queue: EventQueue,
    touch: TouchTracker,
}

impl InputMultiplexer {
    pub fn new(gestures: GestureConfig) -> Self {
        Self {
            queue: EventQueue::default(),
            touch: TouchTracker::new(gestures),
        }
    }

    /// Applies one event. Returns `true` when the event was recognized, meaning
    /// the platform's default handling should be suppressed.
    ///
    /// `Resized` is not an input concern and always returns `false`.
    pub fn apply(&mut self, event: InputEvent, now_ms: f64) -> bool {
        match event {
            InputEvent::KeyDown { key, repeat } => self.on_key_down(key, repeat),
            InputEvent::Touch { id, phase, x, y } => {
                match phase {
                    TouchPhase::Started => self.on_touch_start(id, x, y, now_ms),
                    TouchPhase::Moved => self.on_touch_move(id, x, y),
                    TouchPhase::Ended | TouchPhase::Cancelled => self.on_touch_end(id),
                }
                true
            }
            InputEvent::Resized { .. } => false,
        }
    }

    /// Queues the code for `key` unless it is an auto-repeat.
    ///
    /// Returns whether the key is in the table, regardless of repeat.
    pub fn on_key_down(&mut self, key: Key, repeat: bool) -> bool {
        let Some(code) = KeyCode::for_key(key) else {
            return false;
        };
        if !repeat {
            self.queue.push(code);
        }
        true
    }

    pub fn on_touch_start(&mut self, id: u64, x: f64, y: f64, now_ms: f64) {
        if let Some(code) = self.touch.start(id, x, y, now_ms) {
            self.queue.push(code);
        }
    }

    pub fn on_touch_move(&mut self, id: u64, x: f64, y: f64) {
        if let Some(code) = self.touch.moved(id, x, y) {
            self.queue.push(code);
        }
    }

    pub fn on_touch_end(&mut self, id: u64) {
        self.touch.end(id);
    }

    /// Pops the oldest queued code, or [`KeyCode::Unknown`] if none.
    pub fn poll_next_key(&mut self) -> KeyCode {
        self.queue.poll()
    }

    #[inline]
    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    #[inline]
    pub fn touch(&self) -> &TouchTracker {
        &self.touch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(id: u64, phase: TouchPhase, x: f64, y: f64) -> InputEvent {
        InputEvent::Touch { id, phase, x, y }
    }

    // ── keyboard ──────────────────────────────────────────────────────────

    #[test]
    fn recognized_key_is_queued_and_handled() {
        let mut m = InputMultiplexer::default();
        assert!(m.on_key_down(Key::ArrowLeft, false));
        assert_eq!(m.poll_next_key(), KeyCode::Left);
        assert_eq!(m.poll_next_key(), KeyCode::Unknown);
    }

    #[test]
    fn repeat_is_handled_but_not_queued() {
        let mut m = InputMultiplexer::default();
        assert!(m.on_key_down(Key::Space, true));
        assert!(m.queue().is_empty());
    }

    #[test]
    fn unknown_key_is_ignored() {
        let mut m = InputMultiplexer::default();
        assert!(!m.on_key_down(Key::Unknown, false));
        assert!(m.queue().is_empty());
    }

    #[test]
    fn keys_and_gestures_share_one_fifo() {
        let mut m = InputMultiplexer::default();
        m.apply(InputEvent::KeyDown { key: Key::Enter, repeat: false }, 0.0);
        m.apply(touch(1, TouchPhase::Started, 0.0, 0.0), 0.0);
        m.apply(touch(1, TouchPhase::Moved, 0.0, -40.0), 10.0);
        m.apply(InputEvent::KeyDown { key: Key::Escape, repeat: false }, 20.0);

        let drained: Vec<_> = std::iter::from_fn(|| match m.poll_next_key() {
            KeyCode::Unknown => None,
            c => Some(c),
        })
        .collect();
        assert_eq!(drained, vec![KeyCode::Return, KeyCode::Up, KeyCode::Escape]);
    }

    // ── touch ─────────────────────────────────────────────────────────────

    #[test]
    fn double_tap_queues_exactly_one_space() {
        let mut m = InputMultiplexer::default();
        m.apply(touch(1, TouchPhase::Started, 5.0, 5.0), 0.0);
        m.apply(touch(1, TouchPhase::Ended, 5.0, 5.0), 50.0);
        m.apply(touch(2, TouchPhase::Started, 5.0, 5.0), 100.0);

        assert_eq!(m.queue().iter().collect::<Vec<_>>(), vec![KeyCode::Space]);
    }

    #[test]
    fn slow_taps_queue_nothing() {
        let mut m = InputMultiplexer::default();
        m.apply(touch(1, TouchPhase::Started, 5.0, 5.0), 0.0);
        m.apply(touch(2, TouchPhase::Started, 5.0, 5.0), 300.0);
        assert!(m.queue().is_empty());
    }

    #[test]
    fn swipe_queues_direction() {
        let mut m = InputMultiplexer::default();
        m.on_touch_start(4, 10.0, 10.0, 0.0);
        m.on_touch_move(4, 40.0, 40.0);
        assert_eq!(m.poll_next_key(), KeyCode::Right);
    }

    #[test]
    fn cancel_removes_contact_without_event() {
        let mut m = InputMultiplexer::default();
        assert!(m.apply(touch(9, TouchPhase::Started, 0.0, 0.0), 0.0));
        assert!(m.apply(touch(9, TouchPhase::Cancelled, 0.0, 0.0), 10.0));
        assert_eq!(m.touch().active_contacts(), 0);
        assert!(m.queue().is_empty());
    }

    #[test]
    fn resize_never_touches_queue() {
        let mut m = InputMultiplexer::default();
        assert!(!m.apply(InputEvent::Resized { width: 800.0, height: 600.0 }, 0.0));
        assert!(m.queue().is_empty());
    }
}
