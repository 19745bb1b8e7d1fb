/// Arena allocator streaming vertex and index data into a few long-lived GPU buffers
///
/// One static set lives for the whole cache lifetime. Two transient sets
/// alternate between the submit and render roles in lock-step with the
/// renderer's frames; `frame()` is the only operation that reclaims space.

use std::mem::size_of;
use std::sync::atomic::{AtomicU32, Ordering};

use bytemuck::Pod;

use crate::error::{Error, Result};
use crate::renderer::{BufferDesc, BufferUsage, IndexBufferHandle, Renderer, VertexBufferHandle, VertexCacheConfig};
use crate::utils::Memory;
use crate::vertex_cache::{CacheHandle, MAX_ALLOCATION_BYTES, MAX_SET_CAPACITY};
use crate::{engine_debug, engine_error, engine_warn};

const LOG_SOURCE: &str = "relay3d::VertexCache";

/// Allocation granularity in bytes
pub const CACHE_ALIGNMENT: u32 = 16;

/// Buffer range decoded from a `CacheHandle`, in elements of the requested type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSlice<H> {
    pub buffer: H,
    /// First element
    pub offset: u32,
    /// Number of elements
    pub count: u32,
}

/// Bytes used in each arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VertexCacheStats {
    pub static_vertex_bytes: u32,
    pub static_index_bytes: u32,
    /// Current submit set
    pub transient_vertex_bytes: u32,
    /// Current submit set
    pub transient_index_bytes: u32,
    pub frame: u64,
}

// ============================================================================
// Geometry set
// ============================================================================

struct GeometrySet {
    vertex_buffer: VertexBufferHandle,
    index_buffer: IndexBufferHandle,
    vertex_used: AtomicU32,
    index_used: AtomicU32,
    vertex_capacity: u32,
    index_capacity: u32,
}

impl GeometrySet {
    fn create(renderer: &mut Renderer, vertex_capacity: u32, index_capacity: u32) -> Result<Self> {
        let vertex_buffer = renderer.create_vertex_buffer(BufferDesc::empty(vertex_capacity, BufferUsage::Dynamic));
        let index_buffer = renderer.create_index_buffer(BufferDesc::empty(index_capacity, BufferUsage::Dynamic));
        if !vertex_buffer.is_valid() || !index_buffer.is_valid() {
            renderer.delete_vertex_buffer(vertex_buffer);
            renderer.delete_index_buffer(index_buffer);
            return Err(Error::InvalidResource("vertex cache buffers could not be created".to_string()));
        }
        Ok(Self {
            vertex_buffer,
            index_buffer,
            vertex_used: AtomicU32::new(0),
            index_used: AtomicU32::new(0),
            vertex_capacity,
            index_capacity,
        })
    }

    fn reset(&self) {
        self.vertex_used.store(0, Ordering::Release);
        self.index_used.store(0, Ordering::Release);
    }

    fn destroy(&self, renderer: &mut Renderer) {
        renderer.delete_vertex_buffer(self.vertex_buffer);
        renderer.delete_index_buffer(self.index_buffer);
    }
}

/// Reserve `size` bytes, returning the start offset
///
/// The capacity check and the cursor bump are one atomic step, so racing
/// producers can never push the cursor past `capacity`.
fn bump(cursor: &AtomicU32, capacity: u32, size: u32) -> Option<u32> {
    cursor
        .fetch_update(Ordering::AcqRel, Ordering::Acquire, |used| {
            used.checked_add(size).filter(|&end| end <= capacity)
        })
        .ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Vertex,
    Index,
}

impl Stream {
    fn name(self) -> &'static str {
        match self {
            Stream::Vertex => "vertex",
            Stream::Index => "index",
        }
    }
}

// ============================================================================
// Vertex cache
// ============================================================================

pub struct VertexCache {
    static_set: GeometrySet,
    transient: [GeometrySet; 2],
    frame: u64,
}

impl VertexCache {
    /// Create the six backing buffers through `renderer`
    ///
    /// Fails with `Error::InvalidResource` when a capacity is zero or larger
    /// than a `CacheHandle` can address.
    pub fn new(renderer: &mut Renderer, config: VertexCacheConfig) -> Result<Self> {
        let capacities = [
            ("static vertex", config.static_vertex_bytes),
            ("static index", config.static_index_bytes),
            ("transient vertex", config.transient_vertex_bytes),
            ("transient index", config.transient_index_bytes),
        ];
        for (name, bytes) in capacities {
            if bytes == 0 || bytes > MAX_SET_CAPACITY {
                engine_error!(
                    LOG_SOURCE,
                    "Invalid {} capacity {} (must be 1..={} bytes)",
                    name,
                    bytes,
                    MAX_SET_CAPACITY
                );
                return Err(Error::InvalidResource(format!("{} capacity {} out of range", name, bytes)));
            }
        }

        // A failed set deletes its own buffers; the sets built before it are deleted here
        let static_set = GeometrySet::create(renderer, config.static_vertex_bytes, config.static_index_bytes)?;
        let first = match GeometrySet::create(renderer, config.transient_vertex_bytes, config.transient_index_bytes) {
            Ok(set) => set,
            Err(e) => {
                engine_error!(LOG_SOURCE, "Vertex cache creation failed: {}", e);
                static_set.destroy(renderer);
                return Err(e);
            }
        };
        let second = match GeometrySet::create(renderer, config.transient_vertex_bytes, config.transient_index_bytes) {
            Ok(set) => set,
            Err(e) => {
                engine_error!(LOG_SOURCE, "Vertex cache creation failed: {}", e);
                static_set.destroy(renderer);
                first.destroy(renderer);
                return Err(e);
            }
        };

        engine_debug!(
            LOG_SOURCE,
            "Vertex cache created: static {}/{} bytes, transient 2x {}/{} bytes",
            config.static_vertex_bytes,
            config.static_index_bytes,
            config.transient_vertex_bytes,
            config.transient_index_bytes
        );

        Ok(Self {
            static_set,
            transient: [first, second],
            frame: 0,
        })
    }

    /// Delete the backing buffers
    pub fn destroy(self, renderer: &mut Renderer) {
        self.static_set.destroy(renderer);
        for set in &self.transient {
            set.destroy(renderer);
        }
    }

    // ===== ALLOCATION =====

    /// Copy `data` into the static vertex arena
    ///
    /// Returns `CacheHandle::INVALID` with a warning when the arena is full.
    pub fn alloc_static_vertex(&self, renderer: &mut Renderer, data: Memory) -> CacheHandle {
        self.alloc(renderer, true, Stream::Vertex, data)
    }

    pub fn alloc_static_index(&self, renderer: &mut Renderer, data: Memory) -> CacheHandle {
        self.alloc(renderer, true, Stream::Index, data)
    }

    /// Copy `data` into the transient vertex arena of the current frame
    pub fn alloc_vertex(&self, renderer: &mut Renderer, data: Memory) -> CacheHandle {
        self.alloc(renderer, false, Stream::Vertex, data)
    }

    pub fn alloc_index(&self, renderer: &mut Renderer, data: Memory) -> CacheHandle {
        self.alloc(renderer, false, Stream::Index, data)
    }

    pub fn alloc_static_vertex_slice<T: Pod>(&self, renderer: &mut Renderer, values: &[T]) -> CacheHandle {
        self.alloc_static_vertex(renderer, Memory::from_slice(values))
    }

    pub fn alloc_static_index_slice<T: Pod>(&self, renderer: &mut Renderer, values: &[T]) -> CacheHandle {
        self.alloc_static_index(renderer, Memory::from_slice(values))
    }

    pub fn alloc_vertex_slice<T: Pod>(&self, renderer: &mut Renderer, values: &[T]) -> CacheHandle {
        self.alloc_vertex(renderer, Memory::from_slice(values))
    }

    pub fn alloc_index_slice<T: Pod>(&self, renderer: &mut Renderer, values: &[T]) -> CacheHandle {
        self.alloc_index(renderer, Memory::from_slice(values))
    }

    fn alloc(&self, renderer: &mut Renderer, is_static: bool, stream: Stream, data: Memory) -> CacheHandle {
        let arena = if is_static { "static" } else { "transient" };
        let len = data.len();
        if len == 0 || len > MAX_ALLOCATION_BYTES as usize {
            engine_warn!(
                LOG_SOURCE,
                "Rejected {} {} allocation of {} bytes (limit {})",
                arena,
                stream.name(),
                len,
                MAX_ALLOCATION_BYTES
            );
            return CacheHandle::INVALID;
        }
        let size = len as u32;
        let rounded = size.next_multiple_of(CACHE_ALIGNMENT);

        let set = if is_static { &self.static_set } else { self.submit_set() };
        let (cursor, capacity) = match stream {
            Stream::Vertex => (&set.vertex_used, set.vertex_capacity),
            Stream::Index => (&set.index_used, set.index_capacity),
        };

        let Some(offset) = bump(cursor, capacity, rounded) else {
            engine_warn!(
                LOG_SOURCE,
                "{} {} cache exhausted: {} bytes requested, {} of {} used",
                arena,
                stream.name(),
                rounded,
                cursor.load(Ordering::Acquire),
                capacity
            );
            return CacheHandle::INVALID;
        };

        match stream {
            Stream::Vertex => renderer.update_vertex_buffer(set.vertex_buffer, offset, data),
            Stream::Index => renderer.update_index_buffer(set.index_buffer, offset, data),
        }

        if is_static {
            CacheHandle::new_static(offset, size)
        } else {
            CacheHandle::new_transient(offset, size, self.frame)
        }
    }

    // ===== FRAME =====

    /// Swap the transient sets and empty the new submit set
    ///
    /// Call once per `Renderer::frame()`. Transient handles stay readable
    /// for one more frame, then decode to `None`.
    pub fn frame(&mut self) {
        self.frame += 1;
        self.submit_set().reset();
    }

    /// Frames elapsed since creation
    pub fn frame_number(&self) -> u64 {
        self.frame
    }

    fn submit_set(&self) -> &GeometrySet {
        &self.transient[(self.frame & 1) as usize]
    }

    // ===== DECODING =====

    /// Decode `handle` into a vertex buffer range in units of `T`
    pub fn get_vertex_buffer<T>(&self, handle: CacheHandle) -> Option<CacheSlice<VertexBufferHandle>> {
        let set = self.resolve(handle)?;
        Some(slice_of::<T, _>(set.vertex_buffer, handle))
    }

    /// Decode `handle` into an index buffer range in units of `T`
    pub fn get_index_buffer<T>(&self, handle: CacheHandle) -> Option<CacheSlice<IndexBufferHandle>> {
        let set = self.resolve(handle)?;
        Some(slice_of::<T, _>(set.index_buffer, handle))
    }

    /// Whether `handle` still refers to live data
    pub fn is_live(&self, handle: CacheHandle) -> bool {
        self.resolve(handle).is_some()
    }

    fn resolve(&self, handle: CacheHandle) -> Option<&GeometrySet> {
        if !handle.is_valid() {
            return None;
        }
        if handle.is_static() {
            return Some(&self.static_set);
        }
        // Live only in the frame it was allocated in and the one after
        let allocated = handle.frame();
        if allocated != self.frame && allocated.checked_add(1) != Some(self.frame) {
            return None;
        }
        Some(&self.transient[(allocated & 1) as usize])
    }

    pub fn stats(&self) -> VertexCacheStats {
        let submit = self.submit_set();
        VertexCacheStats {
            static_vertex_bytes: self.static_set.vertex_used.load(Ordering::Acquire),
            static_index_bytes: self.static_set.index_used.load(Ordering::Acquire),
            transient_vertex_bytes: submit.vertex_used.load(Ordering::Acquire),
            transient_index_bytes: submit.index_used.load(Ordering::Acquire),
            frame: self.frame,
        }
    }
}

fn slice_of<T, H>(buffer: H, handle: CacheHandle) -> CacheSlice<H> {
    let element = size_of::<T>().max(1) as u32;
    CacheSlice {
        buffer,
        offset: handle.offset() / element,
        count: handle.size() / element,
    }
}

#[cfg(test)]
#[path = "vertex_cache_tests.rs"]
mod tests;
