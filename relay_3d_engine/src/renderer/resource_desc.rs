/// Resource descriptors consumed by the `Renderer::create_*` calls

use crate::renderer::TextureHandle;
use crate::utils::Memory;

// ===== BUFFERS =====

/// Expected update frequency of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BufferUsage {
    /// Written once, drawn many times
    #[default]
    Static,
    /// Rewritten occasionally (cache arenas, per-frame constants)
    Dynamic,
    /// Rewritten every frame
    Stream,
}

/// Descriptor for creating a vertex, index or constant buffer
#[derive(Debug, Clone)]
pub struct BufferDesc {
    /// Size in bytes
    pub size: u32,
    /// Optional initial contents (`data.len() <= size`)
    pub data: Option<Memory>,
    /// Buffer usage
    pub usage: BufferUsage,
}

impl BufferDesc {
    /// Buffer sized and initialized from `data`
    pub fn with_data(data: Memory, usage: BufferUsage) -> Self {
        Self {
            size: data.len() as u32,
            data: Some(data),
            usage,
        }
    }

    /// Uninitialized buffer of `size` bytes
    pub fn empty(size: u32, usage: BufferUsage) -> Self {
        Self {
            size,
            data: None,
            usage,
        }
    }
}

// ===== SHADERS =====

/// Shader stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex shader
    Vertex,
    /// Fragment/Pixel shader
    Fragment,
    /// Geometry shader
    Geometry,
    /// Compute shader
    Compute,
}

/// Descriptor for creating a shader
///
/// The source is opaque to this layer and handed to the backend as-is.
#[derive(Debug, Clone)]
pub struct ShaderDesc {
    /// Shader stage
    pub stage: ShaderStage,
    /// Source text
    pub source: String,
    /// Debug name reported by the backend on compile errors
    pub name: String,
}

// ===== TEXTURES =====

/// Texture pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    R8_UNORM,
    R8G8_UNORM,
    R8G8B8_UNORM,
    R8G8B8A8_UNORM,
    R8G8B8A8_SRGB,
    R16_SFLOAT,
    R16G16B16A16_SFLOAT,
    R32_SFLOAT,
    R32G32B32A32_SFLOAT,
    D24_UNORM_S8_UINT,
    D32_SFLOAT,
}

impl TextureFormat {
    /// Size in bytes of one texel
    pub fn bytes_per_pixel(&self) -> u32 {
        match self {
            TextureFormat::R8_UNORM => 1,
            TextureFormat::R8G8_UNORM => 2,
            TextureFormat::R8G8B8_UNORM => 3,
            TextureFormat::R8G8B8A8_UNORM | TextureFormat::R8G8B8A8_SRGB => 4,
            TextureFormat::R16_SFLOAT => 2,
            TextureFormat::R16G16B16A16_SFLOAT => 8,
            TextureFormat::R32_SFLOAT => 4,
            TextureFormat::R32G32B32A32_SFLOAT => 16,
            TextureFormat::D24_UNORM_S8_UINT | TextureFormat::D32_SFLOAT => 4,
        }
    }

    pub fn is_depth(&self) -> bool {
        matches!(self, TextureFormat::D24_UNORM_S8_UINT | TextureFormat::D32_SFLOAT)
    }
}

/// Texture filtering mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureFilter {
    Nearest,
    #[default]
    Linear,
}

/// Texture addressing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureWrap {
    #[default]
    Repeat,
    MirroredRepeat,
    ClampToEdge,
}

/// Sampling parameters baked into a texture at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SamplerDesc {
    pub min_filter: TextureFilter,
    pub mag_filter: TextureFilter,
    pub wrap_u: TextureWrap,
    pub wrap_v: TextureWrap,
    /// Generate a full mip chain after upload
    pub mipmaps: bool,
}

/// Descriptor for creating a 2D texture
#[derive(Debug, Clone)]
pub struct TextureDesc {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel format
    pub format: TextureFormat,
    /// Optional initial pixels (tightly packed rows)
    pub data: Option<Memory>,
    pub sampler: SamplerDesc,
}

/// Number of faces a cube map must provide
pub const CUBE_FACE_COUNT: usize = 6;

/// Descriptor for creating a cube map
///
/// Faces are ordered +X, -X, +Y, -Y, +Z, -Z.
#[derive(Debug, Clone)]
pub struct CubeMapDesc {
    /// Edge length of each square face in pixels
    pub size: u32,
    /// Pixel format
    pub format: TextureFormat,
    /// Pixels of each face
    pub faces: Vec<Memory>,
    pub sampler: SamplerDesc,
}

/// Image load/store access for compute bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageAccess {
    #[default]
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

// ===== FRAMEBUFFERS =====

/// Descriptor for creating a framebuffer
///
/// All attachments must be existing textures of identical size.
#[derive(Debug, Clone, Default)]
pub struct FramebufferDesc {
    /// Color attachments in draw-buffer order
    pub color_attachments: Vec<TextureHandle>,
    /// Optional depth/stencil attachment
    pub depth_attachment: Option<TextureHandle>,
}

impl FramebufferDesc {
    /// All attachments, colors first
    pub fn attachments(&self) -> impl Iterator<Item = TextureHandle> + '_ {
        self.color_attachments
            .iter()
            .copied()
            .chain(self.depth_attachment)
    }
}
