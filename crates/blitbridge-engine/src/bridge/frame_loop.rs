use anyhow::{bail, Result};

use super::context::Bridge;

/// A loaded foreign module together with the bridge it draws through.
///
/// Implementations call into the module runtime; the module in turn calls
/// back into `bridge_mut()` through [`HostImports`](super::HostImports).
pub trait GuestModule {
    /// Runs the module's `init` export. `0` means success.
    fn init(&mut self, timestamp_ms: f64) -> Result<i32>;

    /// Runs one `update` step. Non-zero means the module is finished.
    fn update(&mut self, timestamp_ms: f64) -> Result<i32>;

    fn bridge(&self) -> &Bridge;
    fn bridge_mut(&mut self) -> &mut Bridge;
}

/// Whether the loop should keep stepping.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopState {
    Running,
    /// The module reported a non-zero status from `update`.
    Finished { code: i32 },
}

/// Pacing for [`FrameLoop::run_headless`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HeadlessConfig {
    /// Stop after this many steps even if the module keeps running.
    pub max_frames: Option<u64>,
    /// Timestamp increment between steps, in milliseconds.
    pub frame_ms: f64,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            max_frames: Some(600),
            frame_ms: 1000.0 / 60.0,
        }
    }
}

/// Drives a [`GuestModule`]: one `init`, then one `update` per frame until the
/// module reports it is finished.
///
/// The loop itself never waits. The caller supplies the pacing: the windowed
/// runtime steps once per redraw, `run_headless` steps back to back with
/// synthetic timestamps.
pub struct FrameLoop<M: GuestModule> {
    module: M,
    state: LoopState,
    frames: u64,
}

impl<M: GuestModule> FrameLoop<M> {
    /// Calls the module's `init`. A non-zero status is a bootstrap failure.
    pub fn start(mut module: M, timestamp_ms: f64) -> Result<Self> {
        let status = module.init(timestamp_ms)?;
        if status != 0 {
            bail!("module init returned {status}");
        }
        log::info!("module initialized");

        Ok(Self {
            module,
            state: LoopState::Running,
            frames: 0,
        })
    }

    /// Runs one `update`. Once finished, further calls do nothing.
    pub fn step(&mut self, timestamp_ms: f64) -> Result<LoopState> {
        if let LoopState::Finished { .. } = self.state {
            return Ok(self.state);
        }

        let status = self.module.update(timestamp_ms)?;
        self.frames += 1;

        if status != 0 {
            log::info!("module finished with status {status} after {} frames", self.frames);
            self.state = LoopState::Finished { code: status };
        }
        Ok(self.state)
    }

    /// Steps with fixed timestamps `0, frame_ms, 2 * frame_ms, ...` until the
    /// module finishes or `max_frames` steps have run.
    pub fn run_headless(&mut self, config: HeadlessConfig) -> Result<LoopState> {
        let mut n: u64 = 0;
        while self.state == LoopState::Running {
            if config.max_frames.is_some_and(|max| n >= max) {
                log::debug!("headless frame limit reached ({n})");
                break;
            }
            let ts = self.frames as f64 * config.frame_ms;
            self.step(ts)?;
            n += 1;
        }
        Ok(self.state)
    }

    #[inline]
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Number of completed `update` calls.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    #[inline]
    pub fn module(&self) -> &M {
        &self.module
    }

    #[inline]
    pub fn module_mut(&mut self) -> &mut M {
        &mut self.module
    }

    #[inline]
    pub fn bridge(&self) -> &Bridge {
        self.module.bridge()
    }

    #[inline]
    pub fn bridge_mut(&mut self) -> &mut Bridge {
        self.module.bridge_mut()
    }

    pub fn into_module(self) -> M {
        self.module
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::HostImports;
    use crate::canvas::{DeviceError, Rgba};
    use crate::input::{Key, KeyCode};

    /// Scripted module: fills the screen with the palette index it polls as a
    /// key (or 1 when no key), quits after `quit_after` frames, records timestamps.
    struct Scripted {
        bridge: Bridge,
        init_status: i32,
        quit_after: u64,
        seen: Vec<f64>,
        keys: Vec<i32>,
        fail_on: Option<u64>,
    }

    impl Scripted {
        fn new(quit_after: u64) -> Self {
            Self {
                bridge: Bridge::default(),
                init_status: 0,
                quit_after,
                seen: Vec::new(),
                keys: Vec::new(),
                fail_on: None,
            }
        }
    }

    impl GuestModule for Scripted {
        fn init(&mut self, _ts: f64) -> Result<i32> {
            Ok(self.init_status)
        }

        fn update(&mut self, ts: f64) -> Result<i32> {
            self.seen.push(ts);
            let frame = self.seen.len() as u64;

            if self.fail_on == Some(frame) {
                self.bridge.set_render_target(99)?;
            }

            let key = self.bridge.get_keydown();
            self.keys.push(key);
            self.bridge.set_fill_color(if key == 0 { 1 } else { 15 })?;
            self.bridge.fill_rect(0, 0, 0, 0);

            Ok(if frame >= self.quit_after { -1 } else { 0 })
        }

        fn bridge(&self) -> &Bridge {
            &self.bridge
        }

        fn bridge_mut(&mut self) -> &mut Bridge {
            &mut self.bridge
        }
    }

    // ── start ─────────────────────────────────────────────────────────────

    #[test]
    fn nonzero_init_is_a_bootstrap_failure() {
        let mut m = Scripted::new(1);
        m.init_status = 3;
        let err = FrameLoop::start(m, 0.0).err().unwrap();
        assert!(err.to_string().contains("3"));
    }

    // ── step ──────────────────────────────────────────────────────────────

    #[test]
    fn nonzero_update_finishes_loop() {
        let mut lp = FrameLoop::start(Scripted::new(2), 0.0).unwrap();
        assert_eq!(lp.step(16.0).unwrap(), LoopState::Running);
        assert_eq!(lp.step(32.0).unwrap(), LoopState::Finished { code: -1 });
        // Terminal: no further update calls.
        assert_eq!(lp.step(48.0).unwrap(), LoopState::Finished { code: -1 });
        assert_eq!(lp.module().seen, vec![16.0, 32.0]);
        assert_eq!(lp.frames(), 2);
    }

    #[test]
    fn one_key_is_polled_per_step_in_fifo_order() {
        let mut lp = FrameLoop::start(Scripted::new(10), 0.0).unwrap();
        lp.bridge_mut().input_mut().on_key_down(Key::ArrowDown, false);
        lp.bridge_mut().input_mut().on_key_down(Key::Escape, false);

        for ts in [0.0, 1.0, 2.0] {
            lp.step(ts).unwrap();
        }
        assert_eq!(
            lp.module().keys,
            vec![KeyCode::Down.wire(), KeyCode::Escape.wire(), 0]
        );
    }

    #[test]
    fn drawing_happens_during_the_step() {
        let mut lp = FrameLoop::start(Scripted::new(10), 0.0).unwrap();
        lp.bridge_mut().input_mut().on_key_down(Key::Space, false);
        lp.step(0.0).unwrap();

        let white = Rgba::new(255, 255, 255, 255);
        assert!(lp.bridge().device().primary().pixels().iter().all(|p| *p == white));
    }

    #[test]
    fn contract_violation_aborts_with_device_error() {
        let mut m = Scripted::new(10);
        m.fail_on = Some(2);
        let mut lp = FrameLoop::start(m, 0.0).unwrap();

        lp.step(0.0).unwrap();
        let err = lp.step(1.0).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DeviceError>(),
            Some(DeviceError::InvalidHandle { handle: 99, .. })
        ));
    }

    // ── run_headless ──────────────────────────────────────────────────────

    #[test]
    fn headless_uses_fixed_timestamps_until_finished() {
        let mut lp = FrameLoop::start(Scripted::new(3), 0.0).unwrap();
        let state = lp
            .run_headless(HeadlessConfig { max_frames: None, frame_ms: 10.0 })
            .unwrap();

        assert_eq!(state, LoopState::Finished { code: -1 });
        assert_eq!(lp.module().seen, vec![0.0, 10.0, 20.0]);
    }

    #[test]
    fn headless_respects_frame_limit() {
        let mut lp = FrameLoop::start(Scripted::new(1000), 0.0).unwrap();
        let state = lp
            .run_headless(HeadlessConfig { max_frames: Some(5), frame_ms: 16.0 })
            .unwrap();

        assert_eq!(state, LoopState::Running);
        assert_eq!(lp.frames(), 5);
    }
}
