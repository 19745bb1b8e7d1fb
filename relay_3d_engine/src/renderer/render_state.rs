//! Fixed-function state packed into one 64-bit mask per draw.
//!
//! Layout of `RenderState`:
//!
//! | bits  | meaning                           |
//! |-------|-----------------------------------|
//! | 0-3   | color write R, G, B, A            |
//! | 4     | depth write                       |
//! | 5     | wireframe                         |
//! | 8-11  | depth compare op (0 = disabled)   |
//! | 12-13 | cull mode                         |
//! | 14    | front face clockwise              |
//! | 16    | blend enable                      |
//! | 20-23 | blend source factor               |
//! | 24-27 | blend destination factor          |
//! | 28-30 | blend op                          |
//! | 32-39 | stencil reference                 |
//! | 40-43 | stencil compare op (0 = disabled) |

use bitflags::bitflags;

// ===== STATE ENUMS =====

/// Comparison operator for depth and stencil tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Never = 1,
    Less,
    Equal,
    LessOrEqual,
    Greater,
    NotEqual,
    GreaterOrEqual,
    Always,
}

impl CompareOp {
    fn from_bits(bits: u64) -> Option<Self> {
        Some(match bits {
            1 => CompareOp::Never,
            2 => CompareOp::Less,
            3 => CompareOp::Equal,
            4 => CompareOp::LessOrEqual,
            5 => CompareOp::Greater,
            6 => CompareOp::NotEqual,
            7 => CompareOp::GreaterOrEqual,
            8 => CompareOp::Always,
            _ => return None,
        })
    }
}

/// Face culling mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CullMode {
    /// No culling
    None = 0,
    /// Cull front faces
    Front,
    /// Cull back faces
    Back,
}

/// Blend factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    Zero = 0,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
    ConstantColor,
    OneMinusConstantColor,
    SrcAlphaSaturate,
}

impl BlendFactor {
    const ALL: [BlendFactor; 13] = [
        BlendFactor::Zero,
        BlendFactor::One,
        BlendFactor::SrcColor,
        BlendFactor::OneMinusSrcColor,
        BlendFactor::DstColor,
        BlendFactor::OneMinusDstColor,
        BlendFactor::SrcAlpha,
        BlendFactor::OneMinusSrcAlpha,
        BlendFactor::DstAlpha,
        BlendFactor::OneMinusDstAlpha,
        BlendFactor::ConstantColor,
        BlendFactor::OneMinusConstantColor,
        BlendFactor::SrcAlphaSaturate,
    ];
}

/// Blend operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendOp {
    /// result = src * srcFactor + dst * dstFactor
    Add = 0,
    /// result = src * srcFactor - dst * dstFactor
    Subtract,
    /// result = dst * dstFactor - src * srcFactor
    ReverseSubtract,
    /// result = min(src, dst)
    Min,
    /// result = max(src, dst)
    Max,
}

impl BlendOp {
    const ALL: [BlendOp; 5] = [
        BlendOp::Add,
        BlendOp::Subtract,
        BlendOp::ReverseSubtract,
        BlendOp::Min,
        BlendOp::Max,
    ];
}

// ===== RENDER STATE =====

bitflags! {
    /// 64-bit render state mask
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RenderState: u64 {
        const WRITE_R = 1 << 0;
        const WRITE_G = 1 << 1;
        const WRITE_B = 1 << 2;
        const WRITE_A = 1 << 3;
        const WRITE_Z = 1 << 4;
        const WIREFRAME = 1 << 5;
        const FRONT_CW = 1 << 14;
        const BLEND = 1 << 16;

        const WRITE_RGB = Self::WRITE_R.bits() | Self::WRITE_G.bits() | Self::WRITE_B.bits();

        // Multi-bit fields, accessed through the helpers below
        const DEPTH_TEST_MASK = 0xF << 8;
        const CULL_MASK = 0x3 << 12;
        const BLEND_SRC_MASK = 0xF << 20;
        const BLEND_DST_MASK = 0xF << 24;
        const BLEND_OP_MASK = 0x7 << 28;
        const STENCIL_REF_MASK = 0xFF << 32;
        const STENCIL_TEST_MASK = 0xF << 40;
    }
}

const DEPTH_TEST_SHIFT: u32 = 8;
const CULL_SHIFT: u32 = 12;
const BLEND_SRC_SHIFT: u32 = 20;
const BLEND_DST_SHIFT: u32 = 24;
const BLEND_OP_SHIFT: u32 = 28;
const STENCIL_REF_SHIFT: u32 = 32;
const STENCIL_TEST_SHIFT: u32 = 40;

impl RenderState {
    fn with_field(self, mask: RenderState, shift: u32, value: u64) -> Self {
        let cleared = self.bits() & !mask.bits();
        Self::from_bits_retain(cleared | ((value << shift) & mask.bits()))
    }

    fn field(self, mask: RenderState, shift: u32) -> u64 {
        (self.bits() & mask.bits()) >> shift
    }

    /// Enable depth testing with `op`
    pub fn with_depth_test(self, op: CompareOp) -> Self {
        self.with_field(Self::DEPTH_TEST_MASK, DEPTH_TEST_SHIFT, op as u64)
    }

    /// Disable depth testing
    pub fn without_depth_test(self) -> Self {
        self.with_field(Self::DEPTH_TEST_MASK, DEPTH_TEST_SHIFT, 0)
    }

    pub fn depth_test(self) -> Option<CompareOp> {
        CompareOp::from_bits(self.field(Self::DEPTH_TEST_MASK, DEPTH_TEST_SHIFT))
    }

    pub fn with_cull(self, mode: CullMode) -> Self {
        self.with_field(Self::CULL_MASK, CULL_SHIFT, mode as u64)
    }

    pub fn cull(self) -> CullMode {
        match self.field(Self::CULL_MASK, CULL_SHIFT) {
            1 => CullMode::Front,
            2 => CullMode::Back,
            _ => CullMode::None,
        }
    }

    /// Enable blending with the given equation
    pub fn with_blend(self, src: BlendFactor, dst: BlendFactor, op: BlendOp) -> Self {
        (self | Self::BLEND)
            .with_field(Self::BLEND_SRC_MASK, BLEND_SRC_SHIFT, src as u64)
            .with_field(Self::BLEND_DST_MASK, BLEND_DST_SHIFT, dst as u64)
            .with_field(Self::BLEND_OP_MASK, BLEND_OP_SHIFT, op as u64)
    }

    /// Standard premultiplied-free alpha blending
    pub fn with_alpha_blend(self) -> Self {
        self.with_blend(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha, BlendOp::Add)
    }

    /// Blend equation, `None` when blending is off
    pub fn blend(self) -> Option<(BlendFactor, BlendFactor, BlendOp)> {
        if !self.contains(Self::BLEND) {
            return None;
        }
        let src = self.field(Self::BLEND_SRC_MASK, BLEND_SRC_SHIFT) as usize;
        let dst = self.field(Self::BLEND_DST_MASK, BLEND_DST_SHIFT) as usize;
        let op = self.field(Self::BLEND_OP_MASK, BLEND_OP_SHIFT) as usize;
        Some((
            *BlendFactor::ALL.get(src)?,
            *BlendFactor::ALL.get(dst)?,
            *BlendOp::ALL.get(op)?,
        ))
    }

    /// Enable stencil testing against `reference`
    pub fn with_stencil_test(self, op: CompareOp, reference: u8) -> Self {
        self.with_field(Self::STENCIL_TEST_MASK, STENCIL_TEST_SHIFT, op as u64)
            .with_field(Self::STENCIL_REF_MASK, STENCIL_REF_SHIFT, reference as u64)
    }

    pub fn stencil_test(self) -> Option<(CompareOp, u8)> {
        let op = CompareOp::from_bits(self.field(Self::STENCIL_TEST_MASK, STENCIL_TEST_SHIFT))?;
        Some((op, self.field(Self::STENCIL_REF_MASK, STENCIL_REF_SHIFT) as u8))
    }
}

impl Default for RenderState {
    /// Opaque geometry: full color and depth writes, depth `Less`, back-face culling
    fn default() -> Self {
        (Self::WRITE_RGB | Self::WRITE_A | Self::WRITE_Z)
            .with_depth_test(CompareOp::Less)
            .with_cull(CullMode::Back)
    }
}

// ===== SCISSOR / VIEWPORT RECT =====

/// 2D rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect2D {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect2D {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }
}

#[cfg(test)]
#[path = "render_state_tests.rs"]
mod tests;
