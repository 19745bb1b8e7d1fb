/// Vertex input description: attribute formats, bindings, index and primitive types

// ===== ATTRIBUTE FORMAT =====

/// Data format of one vertex attribute
///
/// Defines the data type and component count of an attribute as the
/// vertex fetch stage reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum AttributeFormat {
    // Float formats
    R32_SFLOAT,
    R32G32_SFLOAT,
    R32G32B32_SFLOAT,
    R32G32B32A32_SFLOAT,

    // Integer formats
    R32_SINT,
    R32_UINT,
    R16G16_SINT,
    R16G16B16A16_SINT,

    // Normalized byte formats (colors, packed normals)
    R8G8B8A8_UNORM,
    R8G8B8A8_SNORM,
}

impl AttributeFormat {
    /// Returns size in bytes for this format
    pub fn size_bytes(&self) -> u32 {
        match self {
            AttributeFormat::R32_SFLOAT | AttributeFormat::R32_SINT | AttributeFormat::R32_UINT => 4,
            AttributeFormat::R32G32_SFLOAT => 8,
            AttributeFormat::R32G32B32_SFLOAT => 12,
            AttributeFormat::R32G32B32A32_SFLOAT => 16,
            AttributeFormat::R16G16_SINT => 4,
            AttributeFormat::R16G16B16A16_SINT => 8,
            AttributeFormat::R8G8B8A8_UNORM | AttributeFormat::R8G8B8A8_SNORM => 4,
        }
    }

    /// Number of components
    pub fn components(&self) -> u32 {
        match self {
            AttributeFormat::R32_SFLOAT | AttributeFormat::R32_SINT | AttributeFormat::R32_UINT => 1,
            AttributeFormat::R32G32_SFLOAT | AttributeFormat::R16G16_SINT => 2,
            AttributeFormat::R32G32B32_SFLOAT => 3,
            AttributeFormat::R32G32B32A32_SFLOAT
            | AttributeFormat::R16G16B16A16_SINT
            | AttributeFormat::R8G8B8A8_UNORM
            | AttributeFormat::R8G8B8A8_SNORM => 4,
        }
    }
}

/// Vertex input rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexInputRate {
    /// Data is per-vertex
    Vertex,
    /// Data is per-instance
    Instance,
}

/// Vertex attribute description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    /// Attribute location in shader
    pub location: u32,
    /// Vertex buffer slot the attribute reads from
    pub binding: u32,
    /// Format of the attribute (data type and component count)
    pub format: AttributeFormat,
    /// Offset in bytes from the start of the vertex
    pub offset: u32,
}

/// Vertex buffer slot description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexBinding {
    /// Vertex buffer slot
    pub binding: u32,
    /// Stride in bytes between consecutive elements
    pub stride: u32,
    /// Input rate (per-vertex or per-instance)
    pub input_rate: VertexInputRate,
}

/// Vertex input layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct VertexLayout {
    /// Vertex bindings
    pub bindings: Vec<VertexBinding>,
    /// Vertex attributes
    pub attributes: Vec<VertexAttribute>,
}

impl VertexLayout {
    /// Start an empty layout
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a per-vertex binding
    pub fn binding(mut self, binding: u32, stride: u32) -> Self {
        self.bindings.push(VertexBinding {
            binding,
            stride,
            input_rate: VertexInputRate::Vertex,
        });
        self
    }

    /// Add a per-instance binding
    pub fn instance_binding(mut self, binding: u32, stride: u32) -> Self {
        self.bindings.push(VertexBinding {
            binding,
            stride,
            input_rate: VertexInputRate::Instance,
        });
        self
    }

    /// Add an attribute
    pub fn attribute(mut self, location: u32, binding: u32, format: AttributeFormat, offset: u32) -> Self {
        self.attributes.push(VertexAttribute {
            location,
            binding,
            format,
            offset,
        });
        self
    }

    /// Stride declared for `binding`, if any
    pub fn stride(&self, binding: u32) -> Option<u32> {
        self.bindings
            .iter()
            .find(|b| b.binding == binding)
            .map(|b| b.stride)
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

// ===== INDEX / PRIMITIVE TYPES =====

/// Index buffer element type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexType {
    /// 16-bit indices (max 65535 vertices)
    #[default]
    U16,
    /// 32-bit indices
    U32,
}

impl IndexType {
    /// Size in bytes of one index element
    pub fn size_bytes(&self) -> u32 {
        match self {
            IndexType::U16 => 2,
            IndexType::U32 => 4,
        }
    }
}

/// Primitive topology of a draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveType {
    Point,
    Line,
    LineStrip,
    #[default]
    Triangle,
    TriangleStrip,
    TriangleFan,
}
