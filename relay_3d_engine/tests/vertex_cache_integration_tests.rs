//! Integration tests for the VertexCache arenas
//!
//! Run with: cargo test --test vertex_cache_integration_tests


use relay_3d_engine::relay3d::render::{Memory, PrimitiveType, ProgramHandle, VertexCacheConfig};
use relay_3d_engine::relay3d::vertex_cache::{CacheHandle, VertexCache};
use stub_context::create_renderer;

fn config() -> VertexCacheConfig {
    VertexCacheConfig {
        static_vertex_bytes: 16384,
        static_index_bytes: 16384,
        transient_vertex_bytes: 4096,
        transient_index_bytes: 4096,
    }
}

#[test]
fn test_integration_static_exhaustion() {
    let (mut renderer, _record) = create_renderer(false);
    let cache = VertexCache::new(&mut renderer, config()).unwrap();

    let small = cache.alloc_static_vertex(&mut renderer, Memory::zeroed(1024));
    assert!(small.is_valid());

    // 1000 vertices of 32 bytes do not fit in 16384 bytes
    let vertices = vec![[0.0f32; 8]; 1000];
    let failed = cache.alloc_static_vertex_slice(&mut renderer, &vertices);
    assert_eq!(failed, CacheHandle::INVALID);
    assert_eq!(cache.stats().static_vertex_bytes, 1024);

    // Remaining space is still usable up to the exact capacity
    let rest = cache.alloc_static_vertex(&mut renderer, Memory::zeroed(16384 - 1024));
    assert!(rest.is_valid());
    assert_eq!(rest.offset(), 1024);
    assert!(!cache.alloc_static_vertex(&mut renderer, Memory::zeroed(1)).is_valid());
}

#[test]
fn test_integration_uploads_reach_backend() {
    let (mut renderer, record) = create_renderer(false);
    let cache = VertexCache::new(&mut renderer, config()).unwrap();

    let a = cache.alloc_static_vertex_slice(&mut renderer, &[1.0f32; 5]);
    let b = cache.alloc_vertex_slice(&mut renderer, &[2.0f32; 4]);
    renderer.frame().unwrap();

    let record = record.lock().unwrap();
    assert_eq!(record.vertex_buffers.len(), 3);
    assert_eq!(record.vertex_uploads, vec![(a.offset(), 20), (b.offset(), 16)]);
}

#[test]
fn test_integration_static_stable_transient_expires() {
    let (mut renderer, _record) = create_renderer(false);
    let mut cache = VertexCache::new(&mut renderer, config()).unwrap();

    let fixed = cache.alloc_static_index_slice(&mut renderer, &[0u16, 1, 2, 2, 3, 0]);
    let streamed = cache.alloc_index_slice(&mut renderer, &[0u16, 1, 2]);
    let fixed_before = cache.get_index_buffer::<u16>(fixed).unwrap();

    renderer.frame().unwrap();
    cache.frame();
    assert!(cache.get_index_buffer::<u16>(streamed).is_some());

    renderer.frame().unwrap();
    cache.frame();
    assert!(cache.get_index_buffer::<u16>(streamed).is_none());
    assert_eq!(cache.get_index_buffer::<u16>(fixed), Some(fixed_before));
    assert_eq!(fixed_before.count, 6);
}

#[test]
fn test_integration_cached_geometry_drawn() {
    let (mut renderer, record) = create_renderer(true);
    let mut cache = VertexCache::new(&mut renderer, config()).unwrap();

    for frame in 0..4u32 {
        let quad = [[frame as f32, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let handle = cache.alloc_vertex_slice(&mut renderer, &quad);
        let slice = cache.get_vertex_buffer::<[f32; 2]>(handle).unwrap();

        renderer.set_vertex_buffer(0, slice.buffer, 0);
        renderer.set_primitive_type(PrimitiveType::TriangleFan);
        renderer.submit_with_offsets(0, ProgramHandle::from_raw(0), slice.count, slice.offset, 0);
        renderer.frame().unwrap();
        cache.frame();
    }
    renderer.wait_for_frame_end().unwrap();

    let record = record.lock().unwrap();
    assert_eq!(record.frames.len(), 4);
    for frame in &record.frames {
        let item = &frame.render_passes[0].render_items[0];
        assert_eq!(item.vertex_count, 4);
        assert_eq!(item.vertex_offset, 0);
    }
    // Consecutive frames draw from different transient buffers
    let buffer = |i: usize| record.frames[i].render_passes[0].render_items[0].vertex_buffers[0];
    assert_ne!(buffer(0), buffer(1));
    assert_eq!(buffer(0), buffer(2));
}
