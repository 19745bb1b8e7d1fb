/// RenderContext - contract of a graphics backend
///
/// Implementations own the graphics API objects behind every handle.
/// Unknown or already-deleted handles are silently ignored by the backend.

use winit::dpi::PhysicalSize;

use crate::error::Result;
use crate::renderer::{Frame, RenderCommand, WindowDesc};

/// Surface properties reported by a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextCapabilities {
    pub window_size: PhysicalSize<u32>,
    pub color_bits: u8,
    pub depth_bits: u8,
    pub stencil_bits: u8,
}

impl Default for ContextCapabilities {
    fn default() -> Self {
        Self {
            window_size: PhysicalSize::new(0, 0),
            color_bits: 32,
            depth_bits: 24,
            stencil_bits: 8,
        }
    }
}

/// Graphics backend driven by the `Renderer`
///
/// Moved onto the render thread in threaded mode, hence `Send`.
pub trait RenderContext: Send {
    /// Create the window and its graphics context
    fn create_window(&mut self, desc: &WindowDesc) -> Result<()>;

    fn destroy_window(&mut self) -> Result<()>;

    /// Bind the graphics context to the calling thread
    fn start_rendering(&mut self) -> Result<()>;

    /// Unbind the graphics context from the calling thread
    fn stop_rendering(&mut self) -> Result<()>;

    /// Execute resource commands in order
    fn process_command_list(&mut self, commands: &[RenderCommand]) -> Result<()>;

    /// Execute every pass of `frame` and present if `frame.swap_buffers` is set
    ///
    /// Within each pass, compute items run before render items.
    fn frame(&mut self, frame: &Frame) -> Result<()>;

    fn capabilities(&self) -> ContextCapabilities;
}
