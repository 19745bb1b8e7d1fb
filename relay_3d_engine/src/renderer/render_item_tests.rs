use super::*;

#[test]
fn test_default_render_item_is_unbound() {
    let item = RenderItem::default();
    assert!(!item.program.is_valid());
    assert!(!item.index_buffer.is_valid());
    assert!(item.vertex_buffers.iter().all(|vb| !vb.is_valid()));
    assert!(item.textures.iter().all(|t| !t.is_valid()));
    assert!(item.constant_buffers.iter().all(|cb| !cb.is_valid()));
    assert_eq!(item.vertex_count, 0);
    assert_eq!(item.instance_count, 1);
    assert_eq!(item.primitive, PrimitiveType::Triangle);
    assert_eq!(item.scissor, None);
    assert_eq!(item.state, RenderState::default());
    assert!(item.uniforms.is_empty());
}

#[test]
fn test_element_count_follows_index_buffer() {
    let mut item = RenderItem {
        vertex_count: 12,
        index_count: 36,
        ..Default::default()
    };
    assert!(!item.is_indexed());
    assert_eq!(item.element_count(), 12);

    item.index_buffer = IndexBufferHandle::from_raw(0);
    assert!(item.is_indexed());
    assert_eq!(item.element_count(), 36);
}

#[test]
fn test_uniform_value_conversions() {
    assert_eq!(UniformValue::from(1.5f32), UniformValue::Float(1.5));
    assert_eq!(UniformValue::from(-3i32), UniformValue::Int(-3));
    assert_eq!(UniformValue::from(7u32), UniformValue::UInt(7));
    assert_eq!(UniformValue::from(Vec3::X), UniformValue::Vec3(Vec3::X));
    assert_eq!(UniformValue::from(Mat4::IDENTITY), UniformValue::Mat4(Mat4::IDENTITY));
}

#[test]
fn test_cloned_item_does_not_share_uniforms() {
    let mut item = RenderItem::default();
    item.uniforms.insert("u_time".to_string(), 1.0f32.into());

    let mut copy = item.clone();
    copy.uniforms.insert("u_time".to_string(), 2.0f32.into());

    assert_eq!(item.uniforms["u_time"], UniformValue::Float(1.0));
    assert_eq!(copy.uniforms["u_time"], UniformValue::Float(2.0));
}

#[test]
fn test_default_compute_item() {
    let item = ComputeItem::default();
    assert_eq!(item.groups, [1, 1, 1]);
    assert!(!item.program.is_valid());
    assert!(item.images.iter().all(|img| !img.texture.is_valid()));
    assert!(item.wait_fence.is_none());
    assert!(item.signal_fence.is_none());
    assert!(item.barrier.is_empty());
}

#[test]
fn test_memory_barrier_all_covers_every_flag() {
    let every = MemoryBarrier::VERTEX_ATTRIB
        | MemoryBarrier::INDEX
        | MemoryBarrier::CONSTANT_BUFFER
        | MemoryBarrier::TEXTURE_FETCH
        | MemoryBarrier::IMAGE_ACCESS
        | MemoryBarrier::FRAMEBUFFER
        | MemoryBarrier::STORAGE_BUFFER;
    assert_eq!(MemoryBarrier::ALL, every);
}
