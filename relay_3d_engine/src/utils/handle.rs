//! Strongly-typed resource handles and their generator.
//!
//! Every GPU resource (buffer, texture, program, framebuffer, fence) is
//! referred to by a small integer scoped to its kind. The kind is a
//! zero-sized marker type, so a texture handle never type-checks where a
//! vertex buffer handle is expected.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use rustc_hash::FxHashSet;

use crate::engine_warn;

// ===== HANDLE KIND =====

/// Marker trait implemented by every resource kind
pub trait HandleKind: 'static {
    /// Human-readable kind name used in logs and Debug output
    const NAME: &'static str;
}

macro_rules! handle_kinds {
    ($($(#[$meta:meta])* $kind:ident => $alias:ident, $name:literal;)*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            pub enum $kind {}

            impl HandleKind for $kind {
                const NAME: &'static str = $name;
            }

            pub type $alias = Handle<$kind>;
        )*
    };
}

handle_kinds! {
    /// Vertex buffer kind
    VertexBufferKind => VertexBufferHandle, "VertexBuffer";
    /// Index buffer kind
    IndexBufferKind => IndexBufferHandle, "IndexBuffer";
    /// Constant (uniform) buffer kind
    ConstantBufferKind => ConstantBufferHandle, "ConstantBuffer";
    /// Shader stage kind
    ShaderKind => ShaderHandle, "Shader";
    /// Linked program kind
    ProgramKind => ProgramHandle, "Program";
    /// Texture kind (2D and cube maps)
    TextureKind => TextureHandle, "Texture";
    /// Framebuffer kind
    FramebufferKind => FramebufferHandle, "Framebuffer";
    /// GPU fence kind
    FenceKind => FenceHandle, "Fence";
}

// ===== HANDLE =====

/// Opaque identifier for a resource of kind `K`
///
/// Carries no payload. Equality and hashing use the raw integer only.
pub struct Handle<K> {
    raw: u32,
    _kind: PhantomData<fn() -> K>,
}

impl<K> Handle<K> {
    /// The invalid sentinel for this kind
    pub const INVALID: Self = Self::from_raw(u32::MAX);

    pub const fn from_raw(raw: u32) -> Self {
        Self {
            raw,
            _kind: PhantomData,
        }
    }

    pub const fn raw(self) -> u32 {
        self.raw
    }

    pub const fn is_valid(self) -> bool {
        self.raw != u32::MAX
    }
}

impl<K> Clone for Handle<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for Handle<K> {}

impl<K> PartialEq for Handle<K> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<K> Eq for Handle<K> {}

impl<K> Hash for Handle<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<K> Default for Handle<K> {
    fn default() -> Self {
        Self::INVALID
    }
}

impl<K: HandleKind> fmt::Debug for Handle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}({})", K::NAME, self.raw)
        } else {
            write!(f, "{}(invalid)", K::NAME)
        }
    }
}

// ===== HANDLE GENERATOR =====

/// Issues and recycles handles of one kind.
///
/// Released values go to a LIFO free-list and are handed out again before
/// any fresh integer. Releasing a handle that is not live (never issued, or
/// already released) is ignored with a warning, so a value is never queued
/// twice on the free-list.
///
/// # Example
///
/// ```ignore
/// let mut gen = HandleGenerator::<TextureKind>::new();
/// let a = gen.next();  // 0
/// let b = gen.next();  // 1
/// gen.release(a);      // 0 is now available
/// let c = gen.next();  // 0 (recycled)
/// ```
pub struct HandleGenerator<K> {
    free_list: Vec<u32>,
    free_set: FxHashSet<u32>,
    next_id: u32,
    len: u32,
    _kind: PhantomData<fn() -> K>,
}

impl<K: HandleKind> HandleGenerator<K> {
    /// Create a new empty generator
    pub fn new() -> Self {
        Self {
            free_list: Vec::new(),
            free_set: FxHashSet::default(),
            next_id: 0,
            len: 0,
            _kind: PhantomData,
        }
    }

    /// Issue an unused handle
    ///
    /// Returns `Handle::INVALID` once the integer space is exhausted.
    pub fn next(&mut self) -> Handle<K> {
        if let Some(id) = self.free_list.pop() {
            self.free_set.remove(&id);
            self.len += 1;
            return Handle::from_raw(id);
        }
        if self.next_id == u32::MAX {
            return Handle::INVALID;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.len += 1;
        Handle::from_raw(id)
    }

    /// Whether `handle` is currently issued and not yet released
    pub fn is_live(&self, handle: Handle<K>) -> bool {
        handle.is_valid() && handle.raw < self.next_id && !self.free_set.contains(&handle.raw)
    }

    /// Return a handle to the free-list
    ///
    /// Releasing the invalid handle is a silent no-op. Releasing any other
    /// handle that is not live logs a warning and changes nothing. Returns
    /// whether the handle was recycled.
    pub fn release(&mut self, handle: Handle<K>) -> bool {
        if !handle.is_valid() {
            return false;
        }
        if !self.is_live(handle) {
            engine_warn!("relay3d::HandleGenerator", "Ignoring release of {:?}: not a live handle", handle);
            return false;
        }
        self.len -= 1;
        self.free_set.insert(handle.raw);
        self.free_list.push(handle.raw);
        true
    }

    /// Highest raw value ever issued + 1
    pub fn high_water_mark(&self) -> u32 {
        self.next_id
    }

    /// Number of live handles
    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Leave only `remaining` fresh integers before exhaustion
    #[cfg(test)]
    pub(crate) fn leave_remaining(&mut self, remaining: u32) {
        self.next_id = self.next_id.max(u32::MAX - remaining);
    }
}

impl<K: HandleKind> Default for HandleGenerator<K> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "handle_tests.rs"]
mod tests;
