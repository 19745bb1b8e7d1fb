/// RenderPass - draw and compute items sharing one target and clear configuration

use bitflags::bitflags;

use crate::renderer::{
    ComputeItem, ConstantBufferHandle, FramebufferHandle, Rect2D, RenderItem,
    MAX_CONSTANT_BUFFERS,
};

bitflags! {
    /// Attachments cleared at the start of a pass
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ClearFlags: u8 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
        const STENCIL = 1 << 2;
        const ALL = Self::COLOR.bits() | Self::DEPTH.bits() | Self::STENCIL.bits();
    }
}

/// Clear configuration of a pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearConfig {
    pub flags: ClearFlags,
    /// RGBA clear color
    pub color: [f32; 4],
    pub depth: f32,
    pub stencil: u8,
}

impl Default for ClearConfig {
    /// Nothing is cleared; values are the usual black / far plane / zero
    fn default() -> Self {
        Self {
            flags: ClearFlags::empty(),
            color: [0.0, 0.0, 0.0, 1.0],
            depth: 1.0,
            stencil: 0,
        }
    }
}

impl ClearConfig {
    /// Clear every attachment with the given color
    pub fn all(color: [f32; 4]) -> Self {
        Self {
            flags: ClearFlags::ALL,
            color,
            ..Default::default()
        }
    }
}

/// Ordered draw and compute items of one pass
///
/// Compute items of a pass execute before its render items.
#[derive(Debug, Clone)]
pub struct RenderPass {
    /// Target framebuffer, invalid for the default backbuffer
    pub framebuffer: FramebufferHandle,
    pub clear: ClearConfig,
    /// `None` covers the whole target
    pub viewport: Option<Rect2D>,
    /// Constant buffers bound for every item of the pass
    pub constant_buffers: [ConstantBufferHandle; MAX_CONSTANT_BUFFERS],
    pub render_items: Vec<RenderItem>,
    pub compute_items: Vec<ComputeItem>,
}

impl Default for RenderPass {
    fn default() -> Self {
        Self {
            framebuffer: FramebufferHandle::INVALID,
            clear: ClearConfig::default(),
            viewport: None,
            constant_buffers: [ConstantBufferHandle::INVALID; MAX_CONSTANT_BUFFERS],
            render_items: Vec::new(),
            compute_items: Vec::new(),
        }
    }
}

impl RenderPass {
    /// Reset to the default configuration, keeping item storage allocated
    pub fn clear(&mut self) {
        self.framebuffer = FramebufferHandle::INVALID;
        self.clear = ClearConfig::default();
        self.viewport = None;
        self.constant_buffers = [ConstantBufferHandle::INVALID; MAX_CONSTANT_BUFFERS];
        self.render_items.clear();
        self.compute_items.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.render_items.is_empty() && self.compute_items.is_empty()
    }

    pub fn targets_backbuffer(&self) -> bool {
        !self.framebuffer.is_valid()
    }
}
