/// Renderer - the public façade over the command pipeline
///
/// Owns the handle generators and the submit `Frame`, translates high-level
/// calls into `RenderCommand`s and `RenderItem` fields, and drives the frame
/// handoff to the backend, inline or on a dedicated render thread.

use std::sync::{mpsc, Arc};
use std::thread::JoinHandle;

use rustc_hash::{FxHashMap, FxHashSet};
use winit::dpi::PhysicalSize;

use crate::error::{Error, Result};
use crate::renderer::render_thread::{render_frame, render_thread_main, FrameSync, RENDER_THREAD_NAME};
use crate::renderer::{
    BufferDesc, ClearConfig, ComputeItem, ConstantBufferHandle, ConstantBufferKind,
    ContextCapabilities, CubeMapDesc, FenceHandle, FenceKind, Frame, FrameReport, FrameState,
    FramebufferDesc, FramebufferHandle, FramebufferKind, ImageAccess, ImageBinding,
    IndexBufferHandle, IndexBufferKind, IndexType, MemoryBarrier, PendingRelease, PrimitiveType,
    ProgramHandle, ProgramKind, Rect2D, RenderCommand, RenderContext, RenderItem, RenderState,
    RendererConfig, ShaderDesc, ShaderHandle, ShaderKind, TextureDesc, TextureFormat,
    TextureHandle, TextureKind, UniformValue, VertexBufferHandle, VertexBufferKind, VertexLayout,
    CUBE_FACE_COUNT, MAX_CONSTANT_BUFFERS, MAX_IMAGE_SLOTS, MAX_TEXTURE_SLOTS,
    MAX_VERTEX_BUFFERS,
};
use crate::utils::{Handle, HandleGenerator, HandleKind, Memory};
use crate::{engine_debug, engine_err, engine_error, engine_info, engine_warn};

const LOG_SOURCE: &str = "relay3d::Renderer";

/// Renderer statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RendererStats {
    /// Frames fully executed by the backend
    pub frames_rendered: u64,
    /// Draw calls of the last executed frame
    pub draw_calls: usize,
    /// Compute dispatches of the last executed frame
    pub dispatches: usize,
    /// Resource commands of the last executed frame
    pub commands: usize,
}

impl RendererStats {
    fn from_report(frames_rendered: u64, report: &FrameReport) -> Self {
        Self {
            frames_rendered,
            draw_calls: report.draw_calls,
            dispatches: report.dispatches,
            commands: report.commands,
        }
    }
}

// ============================================================================
// Handle generators
// ============================================================================

#[derive(Default)]
struct HandleGenerators {
    vertex_buffers: HandleGenerator<VertexBufferKind>,
    index_buffers: HandleGenerator<IndexBufferKind>,
    constant_buffers: HandleGenerator<ConstantBufferKind>,
    shaders: HandleGenerator<ShaderKind>,
    programs: HandleGenerator<ProgramKind>,
    textures: HandleGenerator<TextureKind>,
    framebuffers: HandleGenerator<FramebufferKind>,
    fences: HandleGenerator<FenceKind>,
    /// Deletions recorded but not yet released, across in-flight frames
    scheduled: FxHashSet<PendingRelease>,
}

impl HandleGenerators {
    fn is_live(&self, pending: PendingRelease) -> bool {
        match pending {
            PendingRelease::VertexBuffer(h) => self.vertex_buffers.is_live(h),
            PendingRelease::IndexBuffer(h) => self.index_buffers.is_live(h),
            PendingRelease::ConstantBuffer(h) => self.constant_buffers.is_live(h),
            PendingRelease::Shader(h) => self.shaders.is_live(h),
            PendingRelease::Program(h) => self.programs.is_live(h),
            PendingRelease::Texture(h) => self.textures.is_live(h),
            PendingRelease::Framebuffer(h) => self.framebuffers.is_live(h),
            PendingRelease::Fence(h) => self.fences.is_live(h),
        }
    }

    /// Mark `pending` for release, once
    ///
    /// Returns false for a handle that is not live or already scheduled.
    fn schedule(&mut self, pending: PendingRelease) -> bool {
        if !self.is_live(pending) {
            engine_warn!(LOG_SOURCE, "Delete of {:?} ignored: not a live handle", pending);
            return false;
        }
        if !self.scheduled.insert(pending) {
            engine_warn!(LOG_SOURCE, "Delete of {:?} ignored: already scheduled", pending);
            return false;
        }
        true
    }

    fn release(&mut self, pending: PendingRelease) -> bool {
        self.scheduled.remove(&pending);
        match pending {
            PendingRelease::VertexBuffer(h) => self.vertex_buffers.release(h),
            PendingRelease::IndexBuffer(h) => self.index_buffers.release(h),
            PendingRelease::ConstantBuffer(h) => self.constant_buffers.release(h),
            PendingRelease::Shader(h) => self.shaders.release(h),
            PendingRelease::Program(h) => self.programs.release(h),
            PendingRelease::Texture(h) => self.textures.release(h),
            PendingRelease::Framebuffer(h) => self.framebuffers.release(h),
            PendingRelease::Fence(h) => self.fences.release(h),
        }
    }
}

// ============================================================================
// Frame executors
// ============================================================================

struct InlineExecutor {
    context: Box<dyn RenderContext>,
    failed: bool,
    frames_rendered: u64,
    last_report: FrameReport,
}

impl InlineExecutor {
    fn execute(&mut self, frame: &mut Frame) -> Result<()> {
        if self.failed {
            return Err(Error::RenderThreadTerminated);
        }
        match render_frame(self.context.as_mut(), frame) {
            Ok(report) => {
                self.frames_rendered += 1;
                self.last_report = report;
                Ok(())
            }
            Err(e) => {
                engine_error!(LOG_SOURCE, "Frame {} failed, rendering stopped: {}", frame.frame_number, e);
                self.failed = true;
                Err(e)
            }
        }
    }
}

struct ThreadedExecutor {
    sync: Arc<FrameSync>,
    /// Yields the context back, or `None` if it never reached the thread
    thread: Option<JoinHandle<Option<Box<dyn RenderContext>>>>,
}

impl ThreadedExecutor {
    /// Wait for the previous frame, then swap `frame` with the render slot
    ///
    /// On return `frame` holds the frame the render thread just retired.
    fn hand_off(&mut self, frame: &mut Frame) -> Result<()> {
        let mut state = self.sync.wait_for_frame_end()?;
        if state.should_terminate {
            return Err(Error::RenderThreadTerminated);
        }
        let Some(retired) = state.render_frame.as_mut() else {
            return Err(engine_err!(LOG_SOURCE, "Render slot empty after frame {}", frame.frame_number));
        };
        std::mem::swap(frame, retired);
        state.render_done = false;
        state.render_job_submitted = true;
        drop(state);
        self.sync.notify();
        Ok(())
    }
}

enum Executor {
    Inline(InlineExecutor),
    Threaded(ThreadedExecutor),
}

/// What the renderer remembers about a live texture
#[derive(Debug, Clone, Copy)]
struct TextureInfo {
    width: u32,
    height: u32,
    format: TextureFormat,
}

// ============================================================================
// Renderer
// ============================================================================

/// Render-command façade
///
/// # Example
///
/// ```ignore
/// let mut renderer = Renderer::new(Box::new(backend), RendererConfig::default())?;
///
/// let vb = renderer.create_vertex_buffer(BufferDesc::with_data(
///     Memory::from_slice(&vertices),
///     BufferUsage::Static,
/// ));
/// renderer.set_vertex_buffer(0, vb, 0);
/// renderer.set_primitive_type(PrimitiveType::Point);
/// renderer.submit(0, program, 256);
/// renderer.frame()?;
/// ```
pub struct Renderer {
    submit: Frame,
    executor: Executor,
    handles: HandleGenerators,
    /// Size and format of every live texture, for update and framebuffer validation
    textures: FxHashMap<TextureHandle, TextureInfo>,
    capabilities: ContextCapabilities,
    frame_number: u64,
}

impl Renderer {
    /// Create the window through `context` and start frame execution
    ///
    /// With `config.use_thread` the context moves to a dedicated render
    /// thread; otherwise frames execute inline in `frame()`.
    pub fn new(mut context: Box<dyn RenderContext>, config: RendererConfig) -> Result<Self> {
        if let Err(e) = context.create_window(&config.window) {
            engine_error!(LOG_SOURCE, "Failed to create window '{}': {}", config.window.title, e);
            return Err(Error::InitializationFailed(format!("window creation failed: {}", e)));
        }
        let capabilities = context.capabilities();

        // From here on every failure must destroy the window it created
        let executor = if config.use_thread {
            // The render thread binds the context itself
            if let Err(e) = context.stop_rendering() {
                destroy_window(context.as_mut());
                return Err(e);
            }
            let sync = Arc::new(FrameSync::new(Frame::new()));
            let thread_sync = Arc::clone(&sync);
            // The context is sent after a successful spawn, so a failed spawn still owns it
            let (sender, receiver) = mpsc::sync_channel::<Box<dyn RenderContext>>(1);
            let spawned = std::thread::Builder::new()
                .name(RENDER_THREAD_NAME.to_string())
                .spawn(move || {
                    let context = receiver.recv().ok()?;
                    Some(render_thread_main(context, thread_sync))
                });
            let thread = match spawned {
                Ok(thread) => thread,
                Err(e) => {
                    engine_error!(LOG_SOURCE, "Failed to spawn render thread: {}", e);
                    destroy_window(context.as_mut());
                    return Err(Error::InitializationFailed(format!("render thread spawn failed: {}", e)));
                }
            };
            if let Err(mpsc::SendError(mut context)) = sender.send(context) {
                engine_error!(LOG_SOURCE, "Render thread exited before receiving the context");
                destroy_window(context.as_mut());
                return Err(Error::InitializationFailed("render thread exited during startup".to_string()));
            }
            Executor::Threaded(ThreadedExecutor {
                sync,
                thread: Some(thread),
            })
        } else {
            if let Err(e) = context.start_rendering() {
                destroy_window(context.as_mut());
                return Err(e);
            }
            Executor::Inline(InlineExecutor {
                context,
                failed: false,
                frames_rendered: 0,
                last_report: FrameReport::default(),
            })
        };

        engine_info!(
            LOG_SOURCE,
            "Renderer for '{}' started ({}, {}x{})",
            config.app_name,
            if config.use_thread { "threaded" } else { "synchronous" },
            capabilities.window_size.width,
            capabilities.window_size.height
        );

        Ok(Self {
            submit: Frame::new(),
            executor,
            handles: HandleGenerators::default(),
            textures: FxHashMap::default(),
            capabilities,
            frame_number: 0,
        })
    }

    // ===== RESOURCE CREATION =====

    pub fn create_vertex_buffer(&mut self, desc: BufferDesc) -> VertexBufferHandle {
        if !check_buffer_desc("vertex", &desc) {
            return VertexBufferHandle::INVALID;
        }
        let handle = issue(&mut self.handles.vertex_buffers);
        if handle.is_valid() {
            self.submit.commands_pre.push(RenderCommand::CreateVertexBuffer { handle, desc });
        }
        handle
    }

    pub fn create_index_buffer(&mut self, desc: BufferDesc) -> IndexBufferHandle {
        if !check_buffer_desc("index", &desc) {
            return IndexBufferHandle::INVALID;
        }
        let handle = issue(&mut self.handles.index_buffers);
        if handle.is_valid() {
            self.submit.commands_pre.push(RenderCommand::CreateIndexBuffer { handle, desc });
        }
        handle
    }

    pub fn create_constant_buffer(&mut self, desc: BufferDesc) -> ConstantBufferHandle {
        if !check_buffer_desc("constant", &desc) {
            return ConstantBufferHandle::INVALID;
        }
        let handle = issue(&mut self.handles.constant_buffers);
        if handle.is_valid() {
            self.submit.commands_pre.push(RenderCommand::CreateConstantBuffer { handle, desc });
        }
        handle
    }

    /// Compile errors are reported by the backend through the log
    pub fn create_shader(&mut self, desc: ShaderDesc) -> ShaderHandle {
        let handle = issue(&mut self.handles.shaders);
        if handle.is_valid() {
            self.submit.commands_pre.push(RenderCommand::CreateShader { handle, desc });
        }
        handle
    }

    /// Create a program from `shaders` and link it
    ///
    /// Records `CreateProgram`, one `AttachShader` per valid shader, then
    /// `LinkProgram`.
    pub fn create_program(&mut self, shaders: &[ShaderHandle]) -> ProgramHandle {
        if !shaders.iter().any(|s| s.is_valid()) {
            engine_warn!(LOG_SOURCE, "Program requested without any valid shader");
            return ProgramHandle::INVALID;
        }
        let handle = issue(&mut self.handles.programs);
        if !handle.is_valid() {
            return handle;
        }
        let commands = &mut self.submit.commands_pre;
        commands.push(RenderCommand::CreateProgram { handle });
        for &shader in shaders.iter().filter(|s| s.is_valid()) {
            commands.push(RenderCommand::AttachShader {
                program: handle,
                shader,
            });
        }
        commands.push(RenderCommand::LinkProgram { handle });
        handle
    }

    pub fn create_texture_2d(&mut self, desc: TextureDesc) -> TextureHandle {
        if desc.width == 0 || desc.height == 0 {
            engine_warn!(LOG_SOURCE, "Texture size {}x{} is empty", desc.width, desc.height);
            return TextureHandle::INVALID;
        }
        if let Some(data) = &desc.data {
            let expected = texel_bytes(desc.width, desc.height, desc.format.bytes_per_pixel());
            if data.len() < expected {
                engine_warn!(
                    LOG_SOURCE,
                    "Texture data too small: {} bytes for {}x{} {:?} ({} expected)",
                    data.len(),
                    desc.width,
                    desc.height,
                    desc.format,
                    expected
                );
                return TextureHandle::INVALID;
            }
        }
        let handle = issue(&mut self.handles.textures);
        if handle.is_valid() {
            self.textures.insert(
                handle,
                TextureInfo {
                    width: desc.width,
                    height: desc.height,
                    format: desc.format,
                },
            );
            self.submit.commands_pre.push(RenderCommand::CreateTexture2D { handle, desc });
        }
        handle
    }

    /// Create a cube map from exactly six faces (+X, -X, +Y, -Y, +Z, -Z)
    pub fn create_texture_cube_map(&mut self, desc: CubeMapDesc) -> TextureHandle {
        if desc.faces.len() != CUBE_FACE_COUNT {
            engine_warn!(
                LOG_SOURCE,
                "Cube map needs {} faces, got {}",
                CUBE_FACE_COUNT,
                desc.faces.len()
            );
            return TextureHandle::INVALID;
        }
        let face_bytes = texel_bytes(desc.size, desc.size, desc.format.bytes_per_pixel());
        if desc.size == 0 || desc.faces.iter().any(|f| f.len() < face_bytes) {
            engine_warn!(
                LOG_SOURCE,
                "Cube map faces must hold {}x{} {:?} texels",
                desc.size,
                desc.size,
                desc.format
            );
            return TextureHandle::INVALID;
        }
        let handle = issue(&mut self.handles.textures);
        if handle.is_valid() {
            self.textures.insert(
                handle,
                TextureInfo {
                    width: desc.size,
                    height: desc.size,
                    format: desc.format,
                },
            );
            self.submit.commands_pre.push(RenderCommand::CreateTextureCubeMap { handle, desc });
        }
        handle
    }

    /// Create a framebuffer over existing textures of identical size
    pub fn create_framebuffer(&mut self, desc: FramebufferDesc) -> FramebufferHandle {
        let mut extent = None;
        for texture in desc.attachments() {
            let Some(info) = self.textures.get(&texture) else {
                engine_warn!(LOG_SOURCE, "Framebuffer attachment {:?} is not a live texture", texture);
                return FramebufferHandle::INVALID;
            };
            let size = (info.width, info.height);
            match extent {
                None => extent = Some(size),
                Some(first) if first != size => {
                    engine_warn!(
                        LOG_SOURCE,
                        "Framebuffer attachment sizes differ: {}x{} vs {}x{}",
                        first.0,
                        first.1,
                        size.0,
                        size.1
                    );
                    return FramebufferHandle::INVALID;
                }
                Some(_) => {}
            }
        }
        if extent.is_none() {
            engine_warn!(LOG_SOURCE, "Framebuffer requested without attachments");
            return FramebufferHandle::INVALID;
        }

        let handle = issue(&mut self.handles.framebuffers);
        if handle.is_valid() {
            self.submit.commands_pre.push(RenderCommand::CreateFramebuffer { handle, desc });
        }
        handle
    }

    pub fn create_fence(&mut self) -> FenceHandle {
        let handle = issue(&mut self.handles.fences);
        if handle.is_valid() {
            self.submit.commands_pre.push(RenderCommand::CreateFence { handle });
        }
        handle
    }

    // ===== RESOURCE UPDATES =====

    pub fn update_vertex_buffer(&mut self, handle: VertexBufferHandle, offset: u32, data: Memory) {
        if check_update(handle.is_valid(), "vertex buffer") {
            self.submit.commands_pre.push(RenderCommand::UpdateVertexBuffer { handle, offset, data });
        }
    }

    pub fn update_index_buffer(&mut self, handle: IndexBufferHandle, offset: u32, data: Memory) {
        if check_update(handle.is_valid(), "index buffer") {
            self.submit.commands_pre.push(RenderCommand::UpdateIndexBuffer { handle, offset, data });
        }
    }

    pub fn update_constant_buffer(&mut self, handle: ConstantBufferHandle, offset: u32, data: Memory) {
        if check_update(handle.is_valid(), "constant buffer") {
            self.submit.commands_pre.push(RenderCommand::UpdateConstantBuffer { handle, offset, data });
        }
    }

    /// Replace the texels of `region`
    ///
    /// Regions outside the texture, and data shorter than the region's
    /// texels in the texture's format, are rejected with a warning.
    pub fn update_texture_2d(&mut self, handle: TextureHandle, region: Rect2D, data: Memory) {
        let Some(&TextureInfo { width, height, format }) = self.textures.get(&handle) else {
            engine_warn!(LOG_SOURCE, "Update of unknown texture {:?} ignored", handle);
            return;
        };
        let fits = region.x >= 0
            && region.y >= 0
            && region.x as u64 + region.width as u64 <= width as u64
            && region.y as u64 + region.height as u64 <= height as u64;
        if !fits {
            engine_warn!(
                LOG_SOURCE,
                "Update region {:?} outside texture {:?} ({}x{})",
                region,
                handle,
                width,
                height
            );
            return;
        }
        let expected = texel_bytes(region.width, region.height, format.bytes_per_pixel());
        if data.len() < expected {
            engine_warn!(
                LOG_SOURCE,
                "Update data too small: {} bytes for region {:?} of {:?} ({} expected)",
                data.len(),
                region,
                format,
                expected
            );
            return;
        }
        self.submit.commands_pre.push(RenderCommand::UpdateTexture2D { handle, region, data });
    }

    // ===== RESOURCE DELETION =====
    //
    // Deletions run after the passes of the current frame. The handle goes
    // back to its generator once that frame has executed. Deleting the
    // invalid handle is a no-op; deleting a handle twice logs a warning and
    // records nothing.

    pub fn delete_vertex_buffer(&mut self, handle: VertexBufferHandle) {
        self.schedule_delete(PendingRelease::VertexBuffer(handle), RenderCommand::DeleteVertexBuffer { handle });
    }

    pub fn delete_index_buffer(&mut self, handle: IndexBufferHandle) {
        self.schedule_delete(PendingRelease::IndexBuffer(handle), RenderCommand::DeleteIndexBuffer { handle });
    }

    pub fn delete_constant_buffer(&mut self, handle: ConstantBufferHandle) {
        self.schedule_delete(PendingRelease::ConstantBuffer(handle), RenderCommand::DeleteConstantBuffer { handle });
    }

    pub fn delete_shader(&mut self, handle: ShaderHandle) {
        self.schedule_delete(PendingRelease::Shader(handle), RenderCommand::DeleteShader { handle });
    }

    pub fn delete_program(&mut self, handle: ProgramHandle) {
        self.schedule_delete(PendingRelease::Program(handle), RenderCommand::DeleteProgram { handle });
    }

    /// Delete a 2D texture or cube map
    pub fn delete_texture(&mut self, handle: TextureHandle) {
        if self.schedule_delete(PendingRelease::Texture(handle), RenderCommand::DeleteTexture { handle }) {
            self.textures.remove(&handle);
        }
    }

    pub fn delete_framebuffer(&mut self, handle: FramebufferHandle) {
        self.schedule_delete(PendingRelease::Framebuffer(handle), RenderCommand::DeleteFramebuffer { handle });
    }

    pub fn delete_fence(&mut self, handle: FenceHandle) {
        self.schedule_delete(PendingRelease::Fence(handle), RenderCommand::DeleteFence { handle });
    }

    fn schedule_delete(&mut self, pending: PendingRelease, command: RenderCommand) -> bool {
        if !pending.is_valid() || !self.handles.schedule(pending) {
            return false;
        }
        self.submit.commands_post.push(command);
        self.submit.pending_releases.push(pending);
        true
    }

    // ===== DRAW STATE =====

    /// Bind `handle` to vertex buffer `slot`, reading from byte `offset`
    pub fn set_vertex_buffer(&mut self, slot: usize, handle: VertexBufferHandle, offset: u32) {
        if slot_in_range("vertex buffer", slot, MAX_VERTEX_BUFFERS) {
            self.submit.active_item.vertex_buffers[slot] = handle;
            self.submit.active_item.vertex_buffer_offsets[slot] = offset;
        }
    }

    pub fn set_vertex_layout(&mut self, layout: VertexLayout) {
        self.submit.active_item.vertex_layout = layout;
    }

    /// Draw indexed with `count` indices of `index_type`
    pub fn set_index_buffer(&mut self, handle: IndexBufferHandle, index_type: IndexType, count: u32) {
        let item = &mut self.submit.active_item;
        item.index_buffer = handle;
        item.index_type = index_type;
        item.index_count = count;
    }

    pub fn set_texture(&mut self, slot: usize, handle: TextureHandle) {
        if slot_in_range("texture", slot, MAX_TEXTURE_SLOTS) {
            self.submit.active_item.textures[slot] = handle;
        }
    }

    pub fn set_constant_buffer(&mut self, slot: usize, handle: ConstantBufferHandle) {
        if slot_in_range("constant buffer", slot, MAX_CONSTANT_BUFFERS) {
            self.submit.active_item.constant_buffers[slot] = handle;
        }
    }

    /// Set a named program variable for the next draw
    pub fn set_program_var(&mut self, name: &str, value: impl Into<UniformValue>) {
        self.submit
            .active_item
            .uniforms
            .insert(name.to_string(), value.into());
    }

    pub fn set_scissor(&mut self, rect: Rect2D) {
        self.submit.active_item.scissor = Some(rect);
    }

    pub fn clear_scissor(&mut self) {
        self.submit.active_item.scissor = None;
    }

    pub fn set_render_state(&mut self, state: RenderState) {
        self.submit.active_item.state = state;
    }

    pub fn set_primitive_type(&mut self, primitive: PrimitiveType) {
        self.submit.active_item.primitive = primitive;
    }

    pub fn set_instance_count(&mut self, count: u32) {
        self.submit.active_item.instance_count = count;
    }

    // ===== COMPUTE STATE =====

    pub fn set_image(&mut self, slot: usize, texture: TextureHandle, access: ImageAccess, mip_level: u32) {
        if slot_in_range("image", slot, MAX_IMAGE_SLOTS) {
            self.submit.active_compute.images[slot] = ImageBinding {
                texture,
                access,
                mip_level,
            };
        }
    }

    pub fn set_compute_texture(&mut self, slot: usize, handle: TextureHandle) {
        if slot_in_range("texture", slot, MAX_TEXTURE_SLOTS) {
            self.submit.active_compute.textures[slot] = handle;
        }
    }

    pub fn set_compute_program_var(&mut self, name: &str, value: impl Into<UniformValue>) {
        self.submit
            .active_compute
            .uniforms
            .insert(name.to_string(), value.into());
    }

    /// Make the next dispatch wait on `fence`
    pub fn wait_fence(&mut self, fence: FenceHandle) {
        self.submit.active_compute.wait_fence = Some(fence);
    }

    /// Signal `fence` once the next dispatch completes
    pub fn signal_fence(&mut self, fence: FenceHandle) {
        self.submit.active_compute.signal_fence = Some(fence);
    }

    pub fn set_memory_barrier(&mut self, barrier: MemoryBarrier) {
        self.submit.active_compute.barrier = barrier;
    }

    // ===== PASS CONFIGURATION =====

    /// Render pass `pass` into `framebuffer` (invalid = backbuffer)
    pub fn set_render_pass_framebuffer(&mut self, pass: usize, framebuffer: FramebufferHandle) {
        self.submit.render_pass(pass).framebuffer = framebuffer;
    }

    pub fn set_render_pass_clear(&mut self, pass: usize, clear: ClearConfig) {
        self.submit.render_pass(pass).clear = clear;
    }

    pub fn set_render_pass_viewport(&mut self, pass: usize, viewport: Option<Rect2D>) {
        self.submit.render_pass(pass).viewport = viewport;
    }

    pub fn set_render_pass_constant_buffer(&mut self, pass: usize, slot: usize, handle: ConstantBufferHandle) {
        if slot_in_range("pass constant buffer", slot, MAX_CONSTANT_BUFFERS) {
            self.submit.render_pass(pass).constant_buffers[slot] = handle;
        }
    }

    // ===== SUBMISSION =====

    /// Queue the active draw into `pass`
    pub fn submit(&mut self, pass: usize, program: ProgramHandle, vertex_count: u32) {
        self.submit_with_offsets(pass, program, vertex_count, 0, 0);
    }

    /// Queue the active draw into `pass`, starting at the given vertex and index
    ///
    /// The active item is reset to its default afterwards.
    pub fn submit_with_offsets(
        &mut self,
        pass: usize,
        program: ProgramHandle,
        vertex_count: u32,
        vertex_offset: u32,
        index_offset: u32,
    ) {
        let mut item = std::mem::take(&mut self.submit.active_item);
        item.program = program;
        item.vertex_count = vertex_count;
        item.vertex_offset = vertex_offset;
        item.index_offset = index_offset;
        self.submit.render_pass(pass).render_items.push(item);
    }

    /// Queue the active dispatch into `pass`
    ///
    /// The active compute item is reset to its default afterwards.
    pub fn dispatch(&mut self, pass: usize, program: ProgramHandle, x: u32, y: u32, z: u32) {
        let mut item = std::mem::take(&mut self.submit.active_compute);
        item.program = program;
        item.groups = [x, y, z];
        self.submit.render_pass(pass).compute_items.push(item);
    }

    // ===== FRAME CONTROL =====

    /// End the frame and present it
    ///
    /// Synchronous mode executes the frame before returning. Threaded mode
    /// waits for the previous frame only, then hands this one to the render
    /// thread. Once rendering has failed every call returns
    /// `Error::RenderThreadTerminated`.
    pub fn frame(&mut self) -> Result<()> {
        self.end_frame(true)
    }

    /// End the frame without presenting
    pub fn frame_no_swap(&mut self) -> Result<()> {
        self.end_frame(false)
    }

    fn end_frame(&mut self, swap_buffers: bool) -> Result<()> {
        self.submit.swap_buffers = swap_buffers;
        self.submit.state = FrameState::Submitted;

        match &mut self.executor {
            Executor::Inline(inline) => inline.execute(&mut self.submit)?,
            Executor::Threaded(threaded) => threaded.hand_off(&mut self.submit)?,
        }

        // `submit` now holds a frame the backend has fully executed
        let mut releases = std::mem::take(&mut self.submit.pending_releases);
        if !releases.is_empty() {
            engine_debug!(LOG_SOURCE, "Releasing {} handles", releases.len());
        }
        for pending in releases.drain(..) {
            self.handles.release(pending);
        }
        self.submit.pending_releases = releases;

        self.frame_number += 1;
        self.submit.frame_number = self.frame_number;
        self.submit.swap_buffers = true;
        self.submit.state = FrameState::Filling;
        Ok(())
    }

    /// Block until the last handed-off frame has executed
    ///
    /// Returns immediately in synchronous mode.
    pub fn wait_for_frame_end(&self) -> Result<()> {
        let failed = match &self.executor {
            Executor::Inline(inline) => inline.failed,
            Executor::Threaded(threaded) => threaded.sync.wait_for_frame_end()?.failed,
        };
        if failed {
            Err(Error::RenderThreadTerminated)
        } else {
            Ok(())
        }
    }

    // ===== QUERIES =====

    pub fn stats(&self) -> RendererStats {
        match &self.executor {
            Executor::Inline(inline) => RendererStats::from_report(inline.frames_rendered, &inline.last_report),
            Executor::Threaded(threaded) => match threaded.sync.lock() {
                Ok(state) => RendererStats::from_report(state.frames_rendered, &state.last_report),
                Err(_) => RendererStats::default(),
            },
        }
    }

    /// Capabilities reported by the backend at startup
    pub fn capabilities(&self) -> ContextCapabilities {
        self.capabilities
    }

    pub fn window_size(&self) -> PhysicalSize<u32> {
        self.capabilities.window_size
    }

    pub fn is_threaded(&self) -> bool {
        matches!(self.executor, Executor::Threaded(_))
    }

    /// Number of the frame being recorded
    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    pub fn active_item(&self) -> &RenderItem {
        &self.submit.active_item
    }

    pub fn active_compute(&self) -> &ComputeItem {
        &self.submit.active_compute
    }

    /// Frame being recorded
    #[cfg(test)]
    pub(crate) fn limit_index_buffers(&mut self, remaining: u32) {
        self.handles.index_buffers.leave_remaining(remaining);
    }

    pub fn submit_frame(&self) -> &Frame {
        &self.submit
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        match &mut self.executor {
            Executor::Inline(inline) => {
                if let Err(e) = inline.context.stop_rendering() {
                    engine_error!(LOG_SOURCE, "Failed to release the graphics context: {}", e);
                }
                destroy_window(inline.context.as_mut());
            }
            Executor::Threaded(threaded) => {
                if let Err(e) = threaded.sync.wait_for_frame_end() {
                    engine_error!(LOG_SOURCE, "Shutdown without waiting for the last frame: {}", e);
                }
                threaded.sync.terminate();
                if let Some(thread) = threaded.thread.take() {
                    match thread.join() {
                        Ok(Some(mut context)) => {
                            if let Err(e) = context.start_rendering() {
                                engine_error!(LOG_SOURCE, "Failed to bind the graphics context: {}", e);
                            }
                            destroy_window(context.as_mut());
                        }
                        Ok(None) => engine_error!(LOG_SOURCE, "Render thread never received the context"),
                        Err(_) => engine_error!(LOG_SOURCE, "Render thread panicked"),
                    }
                }
            }
        }
        engine_debug!(LOG_SOURCE, "Renderer destroyed after {} frames", self.frame_number);
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn issue<K: HandleKind>(generator: &mut HandleGenerator<K>) -> Handle<K> {
    let handle = generator.next();
    if !handle.is_valid() {
        engine_warn!(LOG_SOURCE, "{} handle space exhausted", K::NAME);
    }
    handle
}

fn check_buffer_desc(kind: &str, desc: &BufferDesc) -> bool {
    if desc.size == 0 {
        engine_warn!(LOG_SOURCE, "Empty {} buffer requested", kind);
        return false;
    }
    if let Some(data) = &desc.data {
        if data.len() > desc.size as usize {
            engine_warn!(
                LOG_SOURCE,
                "{} buffer data ({} bytes) exceeds its size ({} bytes)",
                kind,
                data.len(),
                desc.size
            );
            return false;
        }
    }
    true
}

fn check_update(valid: bool, kind: &str) -> bool {
    if !valid {
        engine_warn!(LOG_SOURCE, "Update of invalid {} ignored", kind);
    }
    valid
}

fn slot_in_range(kind: &str, slot: usize, max: usize) -> bool {
    if slot < max {
        true
    } else {
        engine_warn!(LOG_SOURCE, "{} slot {} out of range (max {})", kind, slot, max - 1);
        false
    }
}

fn texel_bytes(width: u32, height: u32, bytes_per_pixel: u32) -> usize {
    width as usize * height as usize * bytes_per_pixel as usize
}

fn destroy_window(context: &mut dyn RenderContext) {
    if let Err(e) = context.destroy_window() {
        engine_error!(LOG_SOURCE, "Failed to destroy window: {}", e);
    }
}

#[cfg(test)]
#[path = "renderer_tests.rs"]
mod tests;
