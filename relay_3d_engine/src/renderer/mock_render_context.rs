/// Mock RenderContext for unit tests (no GPU required)
///
/// Records every call it receives into a shared log so tests can inspect
/// what the renderer handed to the backend, including from the render thread.

use std::sync::{Arc, Mutex};

use winit::dpi::PhysicalSize;

use crate::engine_bail;
use crate::error::Result;
use crate::renderer::{
    dispatch_all, BufferDesc, CommandHandler, ConstantBufferHandle, ContextCapabilities,
    CubeMapDesc, FenceHandle, Frame, FramebufferDesc, FramebufferHandle, IndexBufferHandle,
    ProgramHandle, Rect2D, RenderCommand, RenderContext, RenderPass, ShaderDesc, ShaderHandle,
    TextureDesc, TextureHandle, VertexBufferHandle, WindowDesc,
};
use crate::utils::Memory;

// ============================================================================
// Recorded data
// ============================================================================

/// Copy of a frame as the backend saw it
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub frame_number: u64,
    pub swap_buffers: bool,
    pub render_passes: Vec<RenderPass>,
    pub commands_pre: Vec<String>,
    pub commands_post: Vec<String>,
}

#[derive(Debug, Default)]
pub struct MockLog {
    /// Context calls and dispatched commands, in order
    pub calls: Vec<String>,
    /// Frames passed to `RenderContext::frame`
    pub frames: Vec<FrameSnapshot>,
    /// Payload sizes of `Update*Buffer` commands
    pub uploads: Vec<(String, u32, usize)>,
}

// ============================================================================
// Mock context
// ============================================================================

pub struct MockRenderContext {
    pub log: Arc<Mutex<MockLog>>,
    /// `frame()` fails for the frame with this number
    pub fail_on_frame: Option<u64>,
    /// Context call (as recorded in the log) that fails
    pub fail_call: Option<&'static str>,
    pub capabilities: ContextCapabilities,
}

impl MockRenderContext {
    pub fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(MockLog::default())),
            fail_on_frame: None,
            fail_call: None,
            capabilities: ContextCapabilities::default(),
        }
    }

    /// Mock whose `frame()` fails on `frame_number`
    pub fn failing_on(frame_number: u64) -> Self {
        Self {
            fail_on_frame: Some(frame_number),
            ..Self::new()
        }
    }

    /// Mock whose `call` (e.g. "stop_rendering") fails after being recorded
    pub fn failing_call(call: &'static str) -> Self {
        Self {
            fail_call: Some(call),
            ..Self::new()
        }
    }

    /// Shared log, readable after the context moved into the renderer
    pub fn log_handle(&self) -> Arc<Mutex<MockLog>> {
        Arc::clone(&self.log)
    }

    fn record(&mut self, call: String) -> Result<()> {
        let fails = self.fail_call == Some(call.as_str());
        self.log.lock().unwrap().calls.push(call);
        if fails {
            engine_bail!("relay3d::MockRenderContext", "Injected failure");
        }
        Ok(())
    }

    fn record_upload(&mut self, kind: &str, raw: u32, offset: u32, data: &Memory) -> Result<()> {
        self.log
            .lock()
            .unwrap()
            .uploads
            .push((format!("{}({})", kind, raw), offset, data.len()));
        self.record(format!("update_{}({}, offset={}, len={})", kind, raw, offset, data.len()))
    }
}

impl Default for MockRenderContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderContext for MockRenderContext {
    fn create_window(&mut self, desc: &WindowDesc) -> Result<()> {
        self.capabilities.window_size = desc.size;
        self.record(format!("create_window({})", desc.title))
    }

    fn destroy_window(&mut self) -> Result<()> {
        self.capabilities.window_size = PhysicalSize::new(0, 0);
        self.record("destroy_window".to_string())
    }

    fn start_rendering(&mut self) -> Result<()> {
        self.record("start_rendering".to_string())
    }

    fn stop_rendering(&mut self) -> Result<()> {
        self.record("stop_rendering".to_string())
    }

    fn process_command_list(&mut self, commands: &[RenderCommand]) -> Result<()> {
        dispatch_all(commands, self)
    }

    fn frame(&mut self, frame: &Frame) -> Result<()> {
        if self.fail_on_frame == Some(frame.frame_number) {
            engine_bail!("relay3d::MockRenderContext", "Injected failure on frame {}", frame.frame_number);
        }
        let snapshot = FrameSnapshot {
            frame_number: frame.frame_number,
            swap_buffers: frame.swap_buffers,
            render_passes: frame.render_passes.clone(),
            commands_pre: frame.commands_pre.iter().map(|c| c.name().to_string()).collect(),
            commands_post: frame.commands_post.iter().map(|c| c.name().to_string()).collect(),
        };
        let mut log = self.log.lock().unwrap();
        log.calls.push(format!("frame({})", frame.frame_number));
        log.frames.push(snapshot);
        Ok(())
    }

    fn capabilities(&self) -> ContextCapabilities {
        self.capabilities
    }
}

impl CommandHandler for MockRenderContext {
    fn create_vertex_buffer(&mut self, handle: VertexBufferHandle, desc: &BufferDesc) -> Result<()> {
        self.record(format!("create_vertex_buffer({}, size={})", handle.raw(), desc.size))
    }

    fn update_vertex_buffer(&mut self, handle: VertexBufferHandle, offset: u32, data: &Memory) -> Result<()> {
        self.record_upload("vertex_buffer", handle.raw(), offset, data)
    }

    fn delete_vertex_buffer(&mut self, handle: VertexBufferHandle) -> Result<()> {
        self.record(format!("delete_vertex_buffer({})", handle.raw()))
    }

    fn create_index_buffer(&mut self, handle: IndexBufferHandle, desc: &BufferDesc) -> Result<()> {
        self.record(format!("create_index_buffer({}, size={})", handle.raw(), desc.size))
    }

    fn update_index_buffer(&mut self, handle: IndexBufferHandle, offset: u32, data: &Memory) -> Result<()> {
        self.record_upload("index_buffer", handle.raw(), offset, data)
    }

    fn delete_index_buffer(&mut self, handle: IndexBufferHandle) -> Result<()> {
        self.record(format!("delete_index_buffer({})", handle.raw()))
    }

    fn create_constant_buffer(&mut self, handle: ConstantBufferHandle, desc: &BufferDesc) -> Result<()> {
        self.record(format!("create_constant_buffer({}, size={})", handle.raw(), desc.size))
    }

    fn update_constant_buffer(&mut self, handle: ConstantBufferHandle, offset: u32, data: &Memory) -> Result<()> {
        self.record_upload("constant_buffer", handle.raw(), offset, data)
    }

    fn delete_constant_buffer(&mut self, handle: ConstantBufferHandle) -> Result<()> {
        self.record(format!("delete_constant_buffer({})", handle.raw()))
    }

    fn create_shader(&mut self, handle: ShaderHandle, desc: &ShaderDesc) -> Result<()> {
        self.record(format!("create_shader({}, {})", handle.raw(), desc.name))
    }

    fn delete_shader(&mut self, handle: ShaderHandle) -> Result<()> {
        self.record(format!("delete_shader({})", handle.raw()))
    }

    fn create_program(&mut self, handle: ProgramHandle) -> Result<()> {
        self.record(format!("create_program({})", handle.raw()))
    }

    fn attach_shader(&mut self, program: ProgramHandle, shader: ShaderHandle) -> Result<()> {
        self.record(format!("attach_shader({}, {})", program.raw(), shader.raw()))
    }

    fn link_program(&mut self, handle: ProgramHandle) -> Result<()> {
        self.record(format!("link_program({})", handle.raw()))
    }

    fn delete_program(&mut self, handle: ProgramHandle) -> Result<()> {
        self.record(format!("delete_program({})", handle.raw()))
    }

    fn create_texture_2d(&mut self, handle: TextureHandle, desc: &TextureDesc) -> Result<()> {
        self.record(format!("create_texture_2d({}, {}x{})", handle.raw(), desc.width, desc.height))
    }

    fn update_texture_2d(&mut self, handle: TextureHandle, region: Rect2D, data: &Memory) -> Result<()> {
        self.record(format!(
            "update_texture_2d({}, {}x{}, len={})",
            handle.raw(),
            region.width,
            region.height,
            data.len()
        ))
    }

    fn create_texture_cube_map(&mut self, handle: TextureHandle, desc: &CubeMapDesc) -> Result<()> {
        self.record(format!("create_texture_cube_map({}, size={})", handle.raw(), desc.size))
    }

    fn delete_texture(&mut self, handle: TextureHandle) -> Result<()> {
        self.record(format!("delete_texture({})", handle.raw()))
    }

    fn create_framebuffer(&mut self, handle: FramebufferHandle, desc: &FramebufferDesc) -> Result<()> {
        self.record(format!(
            "create_framebuffer({}, attachments={})",
            handle.raw(),
            desc.attachments().count()
        ))
    }

    fn delete_framebuffer(&mut self, handle: FramebufferHandle) -> Result<()> {
        self.record(format!("delete_framebuffer({})", handle.raw()))
    }

    fn create_fence(&mut self, handle: FenceHandle) -> Result<()> {
        self.record(format!("create_fence({})", handle.raw()))
    }

    fn delete_fence(&mut self, handle: FenceHandle) -> Result<()> {
        self.record(format!("delete_fence({})", handle.raw()))
    }
}
