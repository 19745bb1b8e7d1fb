/// Vertex cache - static and per-frame geometry arenas

pub mod cache_handle;
pub mod vertex_cache;

pub use cache_handle::*;
pub use vertex_cache::*;
