/// Potato Engine - global lifecycle and logging entry points
///
/// Holds the engine state in a process-wide singleton: whether the game
/// content is loaded, the platform function table, the registered scripts and
/// the frame counter. Also owns the global logger used by the engine_* macros.

use std::sync::{Mutex, MutexGuard, OnceLock, RwLock};
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::{Duration, SystemTime};
use crate::error::{Error, Result};
use crate::graphics::PlatformInterface;
use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger};
use crate::utils::vector::GrowableArray;

// ===== CONFIGURATION =====

/// Engine loop configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Delta time handed to every script on each update
    pub timestep: f32,
    /// Sleep at the end of each update; `None` runs frames back to back
    pub frame_throttle: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timestep: 10.0,
            frame_throttle: Some(Duration::from_millis(10)),
        }
    }
}

/// Game logic updated once per engine frame
pub trait Script: Send {
    /// Advance the script by `dt`
    fn update(&mut self, dt: f32);
}

// ===== INTERNAL STATE =====

/// Global engine state storage
static ENGINE_STATE: OnceLock<Mutex<EngineState>> = OnceLock::new();

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Minimum severity forwarded to the logger
static LOG_LEVEL: AtomicU8 = AtomicU8::new(LogSeverity::Trace as u8);

struct EngineState {
    initialized: bool,
    config: EngineConfig,
    platform: PlatformInterface,
    scripts: GrowableArray<Box<dyn Script>>,
    frame_count: u64,
}

impl EngineState {
    fn new() -> Self {
        Self {
            initialized: false,
            config: EngineConfig::default(),
            platform: PlatformInterface::headless(),
            scripts: GrowableArray::new(),
            frame_count: 0,
        }
    }
}

/// Scripts taken out of the state for one frame
///
/// Dropping it puts them back ahead of any script registered during the
/// frame, including when a script panics. If the engine was shut down in
/// the meantime the scripts are dropped instead.
struct FrameScripts(GrowableArray<Box<dyn Script>>);

impl Drop for FrameScripts {
    fn drop(&mut self) {
        let mut scripts = self.0.take();
        if let Ok(mut state) = Engine::state() {
            if state.initialized {
                scripts.extend(state.scripts.take());
                state.scripts.move_from(&mut scripts);
            }
        }
        // Leftovers drop after the lock is released.
    }
}

// ===== PUBLIC API =====

/// Engine lifecycle manager
///
/// # Example
///
/// ```no_run
/// use potato_engine::potato::Engine;
///
/// Engine::initialize()?;
/// for _ in 0..3 {
///     Engine::update()?;
/// }
/// Engine::shutdown();
/// # Ok::<(), potato_engine::potato::Error>(())
/// ```
pub struct Engine;

impl Engine {
    /// Log an error before returning it
    fn log_and_return_error(error: Error) -> Error {
        crate::engine_error!("potato::Engine", "{}", error);
        error
    }

    fn state() -> Result<MutexGuard<'static, EngineState>> {
        ENGINE_STATE
            .get_or_init(|| Mutex::new(EngineState::new()))
            .lock()
            .map_err(|_| Self::log_and_return_error(
                Error::InitializationFailed("Engine state lock poisoned".to_string())
            ))
    }

    fn not_initialized() -> Error {
        Self::log_and_return_error(
            Error::InitializationFailed("Engine not initialized. Call Engine::initialize() first.".to_string())
        )
    }

    // ===== LIFECYCLE =====

    /// Initialize the engine with the default configuration
    ///
    /// See [`initialize_with`](Self::initialize_with).
    pub fn initialize() -> Result<()> {
        Self::initialize_with(EngineConfig::default())
    }

    /// Initialize the engine: load the game content and start the platform layer
    ///
    /// Idempotent: calling it on a running engine succeeds and keeps the
    /// configuration it was started with.
    ///
    /// # Errors
    ///
    /// Returns `Error::InitializationFailed` if the platform's `initialize`
    /// entry reports failure. The engine stays uninitialized in that case.
    pub fn initialize_with(config: EngineConfig) -> Result<()> {
        let platform = {
            let mut state = Self::state()?;
            if state.initialized {
                crate::engine_debug!("potato::Engine", "Engine already initialized");
                return Ok(());
            }
            state.config = config;
            state.platform
        };

        if !(platform.initialize)() {
            return Err(Self::log_and_return_error(
                Error::InitializationFailed("Platform layer failed to initialize".to_string())
            ));
        }

        let mut state = Self::state()?;
        state.initialized = true;
        state.frame_count = 0;
        crate::engine_info!("potato::Engine", "Engine initialized, game content loaded ({} scripts)",
            state.scripts.len());
        Ok(())
    }

    /// Run one frame: update every script, then render
    ///
    /// Scripts run without the engine lock held, so they may call back into
    /// `Engine` (for example to register more scripts, which start next frame).
    ///
    /// # Errors
    ///
    /// Returns an error if the engine is not initialized.
    pub fn update() -> Result<()> {
        let (mut frame, config, platform) = {
            let mut state = Self::state()?;
            if !state.initialized {
                return Err(Self::not_initialized());
            }
            (FrameScripts(state.scripts.take()), state.config, state.platform)
        };

        for script in frame.0.iter_mut() {
            script.update(config.timestep);
        }
        (platform.render)();

        if let Some(throttle) = config.frame_throttle {
            std::thread::sleep(throttle);
        }

        drop(frame);

        let mut state = Self::state()?;
        if !state.initialized {
            // Shut down from inside a script: the frame's scripts are discarded.
            return Ok(());
        }
        state.frame_count += 1;
        crate::engine_trace!("potato::Engine", "Frame {} done", state.frame_count);
        Ok(())
    }

    /// Unload the game content, stop the platform layer and drop all scripts
    ///
    /// Safe to call on an engine that was never initialized. The platform
    /// table stays registered for the next `initialize()`.
    pub fn shutdown() {
        let (was_initialized, platform, scripts) = match Self::state() {
            Ok(mut state) => {
                let was_initialized = state.initialized;
                state.initialized = false;
                state.frame_count = 0;
                (was_initialized, state.platform, state.scripts.take())
            }
            Err(_) => return,
        };

        drop(scripts);

        if was_initialized {
            (platform.shutdown)();
            crate::engine_info!("potato::Engine", "Engine shut down, game content unloaded");
        }
    }

    /// Whether `initialize()` has succeeded and `shutdown()` not yet been called
    pub fn is_initialized() -> bool {
        Self::state().map(|state| state.initialized).unwrap_or(false)
    }

    /// Number of completed `update()` calls since initialization
    pub fn frame_count() -> u64 {
        Self::state().map(|state| state.frame_count).unwrap_or(0)
    }

    /// Configuration the engine is running with (or will start with)
    pub fn config() -> Result<EngineConfig> {
        Ok(Self::state()?.config)
    }

    // ===== PLATFORM AND SCRIPTS =====

    /// Register the platform function table
    ///
    /// # Errors
    ///
    /// Returns an error if the engine is running; shut it down first.
    pub fn set_platform(platform: PlatformInterface) -> Result<()> {
        let mut state = Self::state()?;
        if state.initialized {
            return Err(Self::log_and_return_error(
                Error::InitializationFailed("Cannot replace the platform while the engine is running. Call Engine::shutdown() first.".to_string())
            ));
        }
        state.platform = platform;
        Ok(())
    }

    /// Add a script, updated every frame in registration order
    pub fn register_script(script: Box<dyn Script>) -> Result<()> {
        let mut state = Self::state()?;
        state.scripts.push(script);
        crate::engine_debug!("potato::Engine", "Script registered ({} total)", state.scripts.len());
        Ok(())
    }

    /// Number of registered scripts
    pub fn script_count() -> usize {
        Self::state().map(|state| state.scripts.len()).unwrap_or(0)
    }

    // ===== LOGGING API =====

    /// Replace the logger (file logger, editor console, test capture...)
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(logger);
        }
    }

    /// Reset logger to default (DefaultLogger)
    pub fn reset_logger() {
        Self::set_logger(DefaultLogger);
    }

    /// Drop log messages below `severity`
    pub fn set_log_level(severity: LogSeverity) {
        LOG_LEVEL.store(severity as u8, Ordering::Relaxed);
    }

    /// Current minimum severity
    pub fn log_level() -> LogSeverity {
        match LOG_LEVEL.load(Ordering::Relaxed) {
            0 => LogSeverity::Trace,
            1 => LogSeverity::Debug,
            2 => LogSeverity::Info,
            3 => LogSeverity::Warn,
            _ => LogSeverity::Error,
        }
    }

    /// Internal logging method (for simple logs without file:line)
    ///
    /// Used by macros like engine_info!, engine_warn!, etc.
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        Self::dispatch(severity, source, message, None, None);
    }

    /// Internal logging method with file:line information (for ERROR logs)
    ///
    /// Used by the engine_error! macro.
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        Self::dispatch(severity, source, message, Some(file), Some(line));
    }

    fn dispatch(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: Option<&'static str>,
        line: Option<u32>,
    ) {
        if severity < Self::log_level() {
            return;
        }
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(lock) = logger_lock.read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file,
                line,
            });
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
