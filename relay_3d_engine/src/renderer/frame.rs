/// Frame - one submitted unit of rendering work
///
/// Exactly two frames exist per `Renderer`. One is filled by the application
/// while the other is executed by the backend; their roles swap every tick.

use crate::renderer::{
    ComputeItem, ConstantBufferHandle, FenceHandle, FramebufferHandle, IndexBufferHandle,
    ProgramHandle, RenderCommand, RenderItem, RenderPass, ShaderHandle, TextureHandle,
    VertexBufferHandle,
};

/// Lifecycle of a frame slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FrameState {
    /// The application is recording items and commands
    #[default]
    Filling,
    /// Handed over for execution
    Submitted,
    /// The backend is walking it
    Executing,
    /// Executed and cleared, waiting to be filled again
    Retired,
}

/// Handle returned to its generator once the frame that deletes it has executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PendingRelease {
    VertexBuffer(VertexBufferHandle),
    IndexBuffer(IndexBufferHandle),
    ConstantBuffer(ConstantBufferHandle),
    Shader(ShaderHandle),
    Program(ProgramHandle),
    Texture(TextureHandle),
    Framebuffer(FramebufferHandle),
    Fence(FenceHandle),
}

impl PendingRelease {
    pub fn is_valid(self) -> bool {
        match self {
            PendingRelease::VertexBuffer(h) => h.is_valid(),
            PendingRelease::IndexBuffer(h) => h.is_valid(),
            PendingRelease::ConstantBuffer(h) => h.is_valid(),
            PendingRelease::Shader(h) => h.is_valid(),
            PendingRelease::Program(h) => h.is_valid(),
            PendingRelease::Texture(h) => h.is_valid(),
            PendingRelease::Framebuffer(h) => h.is_valid(),
            PendingRelease::Fence(h) => h.is_valid(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Frame {
    /// Passes in execution order, grown on demand by `render_pass`
    pub render_passes: Vec<RenderPass>,
    /// Draw being built by the `set_*` calls
    pub active_item: RenderItem,
    /// Dispatch being built by the compute `set_*` calls
    pub active_compute: ComputeItem,
    /// Executed before any pass
    pub commands_pre: Vec<RenderCommand>,
    /// Executed after every pass
    pub commands_post: Vec<RenderCommand>,
    /// Handles deleted by `commands_post`, released when this frame retires
    pub pending_releases: Vec<PendingRelease>,
    pub state: FrameState,
    /// Tick this frame was recorded in
    pub frame_number: u64,
    /// Present the backbuffer after execution
    pub swap_buffers: bool,
}

impl Frame {
    pub fn new() -> Self {
        Self {
            swap_buffers: true,
            ..Default::default()
        }
    }

    /// Pass `index`, creating every pass up to it if needed
    pub fn render_pass(&mut self, index: usize) -> &mut RenderPass {
        if index >= self.render_passes.len() {
            self.render_passes.resize_with(index + 1, RenderPass::default);
        }
        &mut self.render_passes[index]
    }

    /// Clear passes, active items and command lists for reuse
    ///
    /// Pending releases are kept: they are drained by the owner of the
    /// handle generators.
    pub fn reset(&mut self) {
        for pass in &mut self.render_passes {
            pass.clear();
        }
        self.active_item = RenderItem::default();
        self.active_compute = ComputeItem::default();
        self.commands_pre.clear();
        self.commands_post.clear();
    }

    pub fn draw_count(&self) -> usize {
        self.render_passes.iter().map(|p| p.render_items.len()).sum()
    }

    pub fn dispatch_count(&self) -> usize {
        self.render_passes.iter().map(|p| p.compute_items.len()).sum()
    }

    pub fn command_count(&self) -> usize {
        self.commands_pre.len() + self.commands_post.len()
    }

    /// Nothing recorded: no items and no commands
    pub fn is_empty(&self) -> bool {
        self.command_count() == 0 && self.render_passes.iter().all(RenderPass::is_empty)
    }
}

#[cfg(test)]
#[path = "frame_tests.rs"]
mod tests;
