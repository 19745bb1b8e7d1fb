/// Per-draw and per-dispatch state snapshots
///
/// A `RenderItem` is built by the `Renderer::set_*` calls, stamped and moved
/// into a pass by `submit()`, then replaced by a fresh default. Items are
/// never shared between two submissions.

use bitflags::bitflags;
use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};
use rustc_hash::FxHashMap;

use crate::renderer::{
    ConstantBufferHandle, FenceHandle, ImageAccess, IndexBufferHandle, IndexType,
    PrimitiveType, ProgramHandle, Rect2D, RenderState, TextureHandle, VertexBufferHandle,
    VertexLayout,
};

/// Vertex buffer slots per draw
pub const MAX_VERTEX_BUFFERS: usize = 8;
/// Texture units per draw or dispatch
pub const MAX_TEXTURE_SLOTS: usize = 16;
/// Constant buffer slots per draw and per pass
pub const MAX_CONSTANT_BUFFERS: usize = 8;
/// Image load/store units per dispatch
pub const MAX_IMAGE_SLOTS: usize = 8;

// ===== UNIFORM VALUES =====

/// Value of a named program variable
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    UInt(u32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat3(Mat3),
    Mat4(Mat4),
}

macro_rules! uniform_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for UniformValue {
                fn from(value: $ty) -> Self {
                    UniformValue::$variant(value)
                }
            }
        )*
    };
}

uniform_from! {
    f32 => Float,
    i32 => Int,
    u32 => UInt,
    Vec2 => Vec2,
    Vec3 => Vec3,
    Vec4 => Vec4,
    Mat3 => Mat3,
    Mat4 => Mat4,
}

/// Named program variables set on an item
pub type UniformMap = FxHashMap<String, UniformValue>;

// ===== RENDER ITEM =====

/// Full state of one draw call
#[derive(Debug, Clone)]
pub struct RenderItem {
    pub vertex_buffers: [VertexBufferHandle; MAX_VERTEX_BUFFERS],
    /// Byte offset into each bound vertex buffer
    pub vertex_buffer_offsets: [u32; MAX_VERTEX_BUFFERS],
    pub textures: [TextureHandle; MAX_TEXTURE_SLOTS],
    pub constant_buffers: [ConstantBufferHandle; MAX_CONSTANT_BUFFERS],

    /// Invalid for non-indexed draws
    pub index_buffer: IndexBufferHandle,
    pub index_type: IndexType,
    /// First index, in elements
    pub index_offset: u32,
    pub index_count: u32,

    pub vertex_count: u32,
    /// First vertex, in elements
    pub vertex_offset: u32,
    pub instance_count: u32,

    pub primitive: PrimitiveType,
    pub program: ProgramHandle,
    pub vertex_layout: VertexLayout,
    pub uniforms: UniformMap,
    /// `None` disables the scissor test
    pub scissor: Option<Rect2D>,
    pub state: RenderState,
}

impl Default for RenderItem {
    fn default() -> Self {
        Self {
            vertex_buffers: [VertexBufferHandle::INVALID; MAX_VERTEX_BUFFERS],
            vertex_buffer_offsets: [0; MAX_VERTEX_BUFFERS],
            textures: [TextureHandle::INVALID; MAX_TEXTURE_SLOTS],
            constant_buffers: [ConstantBufferHandle::INVALID; MAX_CONSTANT_BUFFERS],
            index_buffer: IndexBufferHandle::INVALID,
            index_type: IndexType::default(),
            index_offset: 0,
            index_count: 0,
            vertex_count: 0,
            vertex_offset: 0,
            instance_count: 1,
            primitive: PrimitiveType::default(),
            program: ProgramHandle::INVALID,
            vertex_layout: VertexLayout::default(),
            uniforms: UniformMap::default(),
            scissor: None,
            state: RenderState::default(),
        }
    }
}

impl RenderItem {
    pub fn is_indexed(&self) -> bool {
        self.index_buffer.is_valid()
    }

    /// Number of elements the backend will draw
    pub fn element_count(&self) -> u32 {
        if self.is_indexed() {
            self.index_count
        } else {
            self.vertex_count
        }
    }
}

// ===== COMPUTE ITEM =====

bitflags! {
    /// Memory barriers issued after a dispatch
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MemoryBarrier: u32 {
        const VERTEX_ATTRIB = 1 << 0;
        const INDEX = 1 << 1;
        const CONSTANT_BUFFER = 1 << 2;
        const TEXTURE_FETCH = 1 << 3;
        const IMAGE_ACCESS = 1 << 4;
        const FRAMEBUFFER = 1 << 5;
        const STORAGE_BUFFER = 1 << 6;
        const ALL = 0x7F;
    }
}

/// Texture bound as a load/store image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageBinding {
    pub texture: TextureHandle,
    pub access: ImageAccess,
    pub mip_level: u32,
}

impl Default for ImageBinding {
    fn default() -> Self {
        Self {
            texture: TextureHandle::INVALID,
            access: ImageAccess::default(),
            mip_level: 0,
        }
    }
}

/// Full state of one compute dispatch
#[derive(Debug, Clone)]
pub struct ComputeItem {
    /// Work group counts (x, y, z)
    pub groups: [u32; 3],
    pub program: ProgramHandle,
    pub images: [ImageBinding; MAX_IMAGE_SLOTS],
    pub textures: [TextureHandle; MAX_TEXTURE_SLOTS],
    pub uniforms: UniformMap,
    /// Fence the dispatch waits on before starting
    pub wait_fence: Option<FenceHandle>,
    /// Fence signaled once the dispatch completes
    pub signal_fence: Option<FenceHandle>,
    pub barrier: MemoryBarrier,
}

impl Default for ComputeItem {
    fn default() -> Self {
        Self {
            groups: [1, 1, 1],
            program: ProgramHandle::INVALID,
            images: [ImageBinding::default(); MAX_IMAGE_SLOTS],
            textures: [TextureHandle::INVALID; MAX_TEXTURE_SLOTS],
            uniforms: UniformMap::default(),
            wait_fence: None,
            signal_fence: None,
            barrier: MemoryBarrier::empty(),
        }
    }
}

#[cfg(test)]
#[path = "render_item_tests.rs"]
mod tests;
