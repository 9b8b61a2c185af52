use std::collections::VecDeque;

use super::key::KeyCode;

/// FIFO of discrete input codes, drained one per module step.
#[derive(Debug, Default, Clone)]
pub struct EventQueue {
    events: VecDeque<KeyCode>,
}

impl EventQueue {
    pub fn push(&mut self, code: KeyCode) {
        self.events.push_back(code);
    }

    /// Pops the oldest code, or [`KeyCode::Unknown`] when empty.
    pub fn poll(&mut self) -> KeyCode {
        self.events.pop_front().unwrap_or(KeyCode::Unknown)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.events.iter().copied()
    }
}
