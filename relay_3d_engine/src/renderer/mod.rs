/// Renderer module - command pipeline, frame model and backend contract

// Module declarations
pub mod config;
pub mod frame;
pub mod render_command;
pub mod render_context;
pub mod render_item;
pub mod render_pass;
pub mod render_state;
pub mod render_thread;
pub mod renderer;
pub mod resource_desc;
pub mod vertex_layout;

#[cfg(test)]
pub mod mock_render_context;

// Re-export everything from renderer.rs
pub use renderer::*;

// Re-export from other modules
pub use config::*;
pub use frame::*;
pub use render_command::*;
pub use render_context::*;
pub use render_item::*;
pub use render_pass::*;
pub use render_state::*;
pub use render_thread::{render_frame, FrameReport, RENDER_THREAD_NAME};
pub use resource_desc::*;
pub use vertex_layout::*;

// Handles and payloads appear in every command and item
pub use crate::utils::{
    ConstantBufferHandle, ConstantBufferKind, FenceHandle, FenceKind, FramebufferHandle,
    FramebufferKind, Handle, HandleGenerator, HandleKind, IndexBufferHandle, IndexBufferKind,
    Memory, ProgramHandle, ProgramKind, ShaderHandle, ShaderKind, TextureHandle, TextureKind,
    VertexBufferHandle, VertexBufferKind,
};
