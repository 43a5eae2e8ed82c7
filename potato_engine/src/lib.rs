/*!
# Potato Engine

Core crate of the Potato game engine.

Early-stage engine skeleton: lifecycle hooks driven by the editor, the
content-import data model for meshes and scenes, and a small utility layer
whose centerpiece is [`GrowableArray`](potato::utl::GrowableArray), the
engine's own growable contiguous container.

## Architecture

- **Engine**: global lifecycle (`initialize` / `update` / `shutdown`), scripts and logging
- **graphics**: the `PlatformInterface` function table a rendering backend provides
- **content**: mesh / LOD group / scene aggregates filled by the content tools
- **utl**: `GrowableArray` with a compile-time removal policy, and math helpers
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod content;
pub mod graphics;
pub mod utils;

// Main potato namespace module
pub mod potato {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton
    pub use crate::engine::{Engine, EngineConfig, Script};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Utility sub-module
    pub mod utl {
        pub use crate::utils::vector::{GrowableArray, IntoIter, DestructPolicy, Destruct, NoDestruct};
        pub use crate::utils::math::clamp;
    }

    // Graphics sub-module
    pub mod graphics {
        pub use crate::graphics::*;
    }

    // Content sub-module
    pub mod content {
        pub use crate::content::*;
    }
}

// Re-export math library at crate root
pub use glam;
