/// What the runtime should do after a failed frame acquisition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; the next frame may succeed.
    Reconfigured,
    /// Transient; drop this frame.
    SkipFrame,
    /// Unrecoverable (out of memory); stop the loop.
    Fatal,
}

impl SurfaceErrorAction {
    #[inline]
    pub fn is_fatal(self) -> bool {
        self == SurfaceErrorAction::Fatal
    }
}
