/// Function table a rendering backend fills in for the engine.
///
/// Plain function pointers, no state: a backend keeps whatever it needs in
/// its own module. `initialize` returns `false` when the backend cannot start.
#[derive(Debug, Clone, Copy)]
pub struct PlatformInterface {
    /// Bring the backend up
    pub initialize: fn() -> bool,
    /// Tear the backend down
    pub shutdown: fn(),
    /// Render one frame
    pub render: fn(),
}

impl PlatformInterface {
    /// Table whose entries succeed and do nothing (tools, tests, headless runs)
    pub fn headless() -> Self {
        fn initialize() -> bool {
            true
        }
        fn noop() {}

        Self {
            initialize,
            shutdown: noop,
            render: noop,
        }
    }
}

impl Default for PlatformInterface {
    fn default() -> Self {
        Self::headless()
    }
}
