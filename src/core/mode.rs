/// Which render path a frame takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPath {
    /// Device initialized - clear and present through the native device
    Native,
    /// Native requested but the device is not ready - draw nothing
    NativePending,
    /// Software wireframe drawing
    Fallback,
}

impl RenderPath {
    pub fn label(&self) -> &'static str {
        match self {
            RenderPath::Native => "native",
            RenderPath::NativePending => "native (initializing)",
            RenderPath::Fallback => "fallback",
        }
    }
}

/// Native request/readiness flags
///
/// Every derived value here is a pure function of the two flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeState {
    native_requested: bool,
    native_ready: bool,
}

impl ModeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_flags(native_requested: bool, native_ready: bool) -> Self {
        Self { native_requested, native_ready }
    }

    pub fn native_requested(&self) -> bool {
        self.native_requested
    }

    pub fn native_ready(&self) -> bool {
        self.native_ready
    }

    pub fn path(&self) -> RenderPath {
        match (self.native_requested, self.native_ready) {
            (true, true) => RenderPath::Native,
            (true, false) => RenderPath::NativePending,
            (false, _) => RenderPath::Fallback,
        }
    }

    pub fn status(&self) -> &'static str {
        match self.path() {
            RenderPath::Native => "native, animated/ready",
            RenderPath::NativePending => "native, initializing",
            RenderPath::Fallback => "fallback",
        }
    }

    /// Run one native enable attempt.
    ///
    /// The request flag is raised before `init` runs. On failure it is rolled
    /// back so the state never sticks in pending.
    pub fn try_enable<E>(&mut self, init: impl FnOnce() -> Result<(), E>) -> Result<(), E> {
        self.native_requested = true;
        match init() {
            Ok(()) => {
                self.native_ready = true;
                Ok(())
            }
            Err(e) => {
                self.native_requested = false;
                self.native_ready = false;
                Err(e)
            }
        }
    }

    /// Drop back to fallback, e.g. after the device was released
    pub fn reset(&mut self) {
        self.native_requested = false;
        self.native_ready = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_fallback() {
        let mode = ModeState::new();
        assert_eq!(mode.path(), RenderPath::Fallback);
        assert_eq!(mode.status(), "fallback");
    }

    #[test]
    fn status_covers_every_flag_combination() {
        assert_eq!(ModeState::from_flags(true, true).status(), "native, animated/ready");
        assert_eq!(ModeState::from_flags(true, false).status(), "native, initializing");
        assert_eq!(ModeState::from_flags(false, true).status(), "fallback");
        assert_eq!(ModeState::from_flags(false, false).status(), "fallback");
    }

    #[test]
    fn successful_enable_is_ready() {
        let mut mode = ModeState::new();
        let result: Result<(), ()> = mode.try_enable(|| Ok(()));
        assert!(result.is_ok());
        assert!(mode.native_requested() && mode.native_ready());
        assert_eq!(mode.path(), RenderPath::Native);
    }

    #[test]
    fn failed_enable_rolls_back() {
        let mut mode = ModeState::new();
        let result = mode.try_enable(|| Err("no device"));
        assert_eq!(result, Err("no device"));
        assert_eq!(mode, ModeState::new());
        assert_eq!(mode.status(), "fallback");
    }

    #[test]
    fn reset_returns_to_fallback() {
        let mut mode = ModeState::from_flags(true, true);
        mode.reset();
        assert_eq!(mode.path(), RenderPath::Fallback);
    }
}
