/*!
# Relay 3D Engine

Render-command pipeline of the Relay3D engine.

Application code records draws and resource operations through the
[`Renderer`](relay3d::Renderer) façade without touching a graphics API.
Recorded work is collected in double-buffered frames and handed to a
[`RenderContext`](relay3d::render::RenderContext) backend, either inline or on
a dedicated render thread, so recording of frame N+1 overlaps execution of
frame N.

## Architecture

- **Renderer**: handle generators, frame lifecycle, render-thread handoff
- **RenderCommand**: closed set of resource commands, dispatched exhaustively
- **RenderItem / ComputeItem / RenderPass / Frame**: recorded frame data
- **RenderContext**: contract implemented by graphics backends
- **VertexCache**: static and per-frame transient geometry arenas
*/

// Internal modules
mod error;
pub mod log;
pub mod renderer;
pub mod utils;
pub mod vertex_cache;

// Main relay3d namespace module
pub mod relay3d {
    // Error types
    pub use crate::error::{Error, Relay3dError, Relay3dResult, Result};

    // Renderer façade
    pub use crate::renderer::{Renderer, RendererConfig, RendererStats};

    // Logging sub-module (types and logger installation, NOT macros)
    pub mod log {
        pub use crate::log::{reset_logger, set_logger, DefaultLogger, LogEntry, LogSeverity, Logger};
    }

    // Render sub-module with all rendering types
    pub mod render {
        pub use crate::renderer::*;
    }

    // Vertex cache sub-module
    pub mod vertex_cache {
        pub use crate::vertex_cache::*;
    }
}

// Re-export math library at crate root
pub use glam;
