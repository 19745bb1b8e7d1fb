/// Configuration structures for the renderer and the vertex cache

use winit::dpi::PhysicalSize;

/// Window creation parameters passed to `RenderContext::create_window`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowDesc {
    /// Window title
    pub title: String,
    /// Client area size in physical pixels
    pub size: PhysicalSize<u32>,
    /// Synchronize presentation with the display refresh
    pub vsync: bool,
}

impl Default for WindowDesc {
    fn default() -> Self {
        Self {
            title: "Relay3D Application".to_string(),
            size: PhysicalSize::new(1280, 720),
            vsync: true,
        }
    }
}

/// Renderer configuration
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Execute frames on a dedicated render thread
    pub use_thread: bool,
    /// Window created by the backend at startup
    pub window: WindowDesc,
    /// Application name
    pub app_name: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            use_thread: true,
            window: WindowDesc::default(),
            app_name: "Relay3D Application".to_string(),
        }
    }
}

/// Capacities of the vertex cache arenas, in bytes
///
/// Transient capacities apply to each of the two double-buffered sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexCacheConfig {
    pub static_vertex_bytes: u32,
    pub static_index_bytes: u32,
    pub transient_vertex_bytes: u32,
    pub transient_index_bytes: u32,
}

impl Default for VertexCacheConfig {
    fn default() -> Self {
        Self {
            static_vertex_bytes: 31 * 1024 * 1024,
            static_index_bytes: 31 * 1024 * 1024,
            transient_vertex_bytes: 4 * 1024 * 1024,
            transient_index_bytes: 4 * 1024 * 1024,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
