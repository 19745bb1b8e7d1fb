use super::*;
use std::collections::HashSet;

// ============================================================================
// Handle tests
// ============================================================================

#[test]
fn test_default_handle_is_invalid() {
    let handle = TextureHandle::default();
    assert!(!handle.is_valid());
    assert_eq!(handle, TextureHandle::INVALID);
    assert_eq!(handle.raw(), u32::MAX);
}

#[test]
fn test_handle_equality_uses_raw_value() {
    assert_eq!(ProgramHandle::from_raw(3), ProgramHandle::from_raw(3));
    assert_ne!(ProgramHandle::from_raw(3), ProgramHandle::from_raw(4));

    let mut set = HashSet::new();
    set.insert(FenceHandle::from_raw(1));
    assert!(set.contains(&FenceHandle::from_raw(1)));
}

#[test]
fn test_handle_debug_names_kind() {
    assert_eq!(format!("{:?}", VertexBufferHandle::from_raw(5)), "VertexBuffer(5)");
    assert_eq!(format!("{:?}", FramebufferHandle::INVALID), "Framebuffer(invalid)");
}

// ============================================================================
// Generator allocation tests
// ============================================================================

#[test]
fn test_sequential_next() {
    let mut gen = HandleGenerator::<VertexBufferKind>::new();
    assert_eq!(gen.next().raw(), 0);
    assert_eq!(gen.next().raw(), 1);
    assert_eq!(gen.next().raw(), 2);
    assert_eq!(gen.len(), 3);
}

#[test]
fn test_new_is_empty() {
    let gen = HandleGenerator::<ShaderKind>::default();
    assert!(gen.is_empty());
    assert_eq!(gen.high_water_mark(), 0);
}

#[test]
fn test_release_and_recycle_lifo() {
    let mut gen = HandleGenerator::<TextureKind>::new();
    let a = gen.next(); // 0
    let _b = gen.next(); // 1
    let c = gen.next(); // 2
    gen.release(a);
    gen.release(c);

    // Last released = first reissued
    assert_eq!(gen.next().raw(), 2);
    assert_eq!(gen.next().raw(), 0);
    assert_eq!(gen.next().raw(), 3);
    assert_eq!(gen.high_water_mark(), 4);
}

#[test]
fn test_release_invalid_is_noop() {
    let mut gen = HandleGenerator::<FenceKind>::new();
    let _a = gen.next();
    gen.release(FenceHandle::INVALID);
    assert_eq!(gen.len(), 1);
    assert_eq!(gen.next().raw(), 1);
}

#[test]
fn test_live_handles_are_unique() {
    let mut gen = HandleGenerator::<ConstantBufferKind>::new();
    let mut live = HashSet::new();

    for _ in 0..64 {
        assert!(live.insert(gen.next()));
    }
    // Release every third handle
    let released: Vec<_> = live.iter().copied().filter(|h| h.raw() % 3 == 0).collect();
    for handle in &released {
        gen.release(*handle);
        live.remove(handle);
    }
    // A released value may come back, a live one never does
    for _ in 0..released.len() + 8 {
        let handle = gen.next();
        assert!(live.insert(handle), "duplicate live handle: {:?}", handle);
    }
    assert_eq!(gen.len() as usize, live.len());
}

#[test]
fn test_value_not_reissued_before_release() {
    let mut gen = HandleGenerator::<ProgramKind>::new();
    let first = gen.next();
    for _ in 0..16 {
        assert_ne!(gen.next(), first);
    }
    gen.release(first);
    assert_eq!(gen.next(), first);
}

// ============================================================================
// Double release tests
// ============================================================================

#[test]
fn test_double_release_is_ignored() {
    let mut gen = HandleGenerator::<VertexBufferKind>::new();
    let a = gen.next();
    let _b = gen.next();

    assert!(gen.release(a));
    assert!(!gen.release(a));
    assert_eq!(gen.len(), 1);

    // `a` comes back once, then fresh integers follow
    let c = gen.next();
    let d = gen.next();
    assert_eq!(c, a);
    assert_ne!(d, a);
    assert_eq!(d.raw(), 2);
    assert_eq!(gen.len(), 3);
}

#[test]
fn test_release_of_unissued_handle_is_ignored() {
    let mut gen = HandleGenerator::<IndexBufferKind>::new();
    let _a = gen.next();
    assert!(!gen.release(IndexBufferHandle::from_raw(7)));
    assert_eq!(gen.len(), 1);
    assert_eq!(gen.next().raw(), 1);
}

#[test]
fn test_is_live_tracks_release_and_reissue() {
    let mut gen = HandleGenerator::<TextureKind>::new();
    let a = gen.next();
    assert!(gen.is_live(a));
    assert!(!gen.is_live(TextureHandle::INVALID));
    assert!(!gen.is_live(TextureHandle::from_raw(1)));

    gen.release(a);
    assert!(!gen.is_live(a));
    let again = gen.next();
    assert_eq!(again, a);
    assert!(gen.is_live(again));
}
