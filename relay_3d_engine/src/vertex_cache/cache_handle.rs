//! Reference to a range of the vertex cache.
//!
//! The range is packed into 64 bits:
//!
//! | bits  | field                                   |
//! |-------|-----------------------------------------|
//! | 0     | static flag                             |
//! | 1-24  | size in bytes (unrounded)               |
//! | 25-50 | byte offset into the set's buffer       |
//!
//! Transient handles also carry the full cache frame number they were
//! allocated in, so a handle kept across any number of frames never decodes
//! again once its set has been recycled.
//!
//! The packed value 0 is never produced by a successful allocation: static
//! handles have bit 0 set and transient handles have a non-zero size.

use std::fmt;

const STATIC_BIT: u64 = 1;
const SIZE_SHIFT: u32 = 1;
const SIZE_BITS: u32 = 24;
const OFFSET_SHIFT: u32 = SIZE_SHIFT + SIZE_BITS;
const OFFSET_BITS: u32 = 26;

/// Largest size one allocation can record
pub const MAX_ALLOCATION_BYTES: u32 = (1 << SIZE_BITS) - 1;
/// Largest buffer capacity the offset field can address
pub const MAX_SET_CAPACITY: u32 = 1 << OFFSET_BITS;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CacheHandle {
    packed: u64,
    /// Allocation frame, 0 for static handles
    frame: u64,
}

impl CacheHandle {
    /// Returned by failed allocations
    pub const INVALID: Self = Self { packed: 0, frame: 0 };

    pub(crate) fn new_static(offset: u32, size: u32) -> Self {
        Self {
            packed: STATIC_BIT | Self::pack(offset, size),
            frame: 0,
        }
    }

    pub(crate) fn new_transient(offset: u32, size: u32, frame: u64) -> Self {
        Self {
            packed: Self::pack(offset, size),
            frame,
        }
    }

    fn pack(offset: u32, size: u32) -> u64 {
        debug_assert!(size <= MAX_ALLOCATION_BYTES);
        debug_assert!(offset < MAX_SET_CAPACITY);
        ((size as u64) << SIZE_SHIFT) | ((offset as u64) << OFFSET_SHIFT)
    }

    /// Static flag, size and offset as one integer
    pub const fn packed(self) -> u64 {
        self.packed
    }

    pub const fn is_valid(self) -> bool {
        self.packed != 0
    }

    pub const fn is_static(self) -> bool {
        self.packed & STATIC_BIT != 0
    }

    /// Allocation size in bytes
    pub const fn size(self) -> u32 {
        ((self.packed >> SIZE_SHIFT) & ((1 << SIZE_BITS) - 1)) as u32
    }

    /// Byte offset into the owning buffer
    pub const fn offset(self) -> u32 {
        ((self.packed >> OFFSET_SHIFT) & ((1 << OFFSET_BITS) - 1)) as u32
    }

    /// Cache frame the transient allocation was made in
    pub const fn frame(self) -> u64 {
        self.frame
    }
}

impl fmt::Debug for CacheHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            write!(f, "CacheHandle(invalid)")
        } else if self.is_static() {
            write!(f, "CacheHandle(static, offset={}, size={})", self.offset(), self.size())
        } else {
            write!(
                f,
                "CacheHandle(frame={}, offset={}, size={})",
                self.frame,
                self.offset(),
                self.size()
            )
        }
    }
}
