/// Utility module - leaf types shared by the renderer and the vertex cache

pub mod handle;
pub mod memory;

pub use handle::*;
pub use memory::*;
