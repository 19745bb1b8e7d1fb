//! Resource lifecycle commands exchanged between the recording thread and the backend.
//!
//! `RenderCommand` is a closed sum type. Backends consume it through
//! [`CommandHandler`], which has one required method per variant and no
//! default bodies: adding a variant without teaching every backend about it
//! is a compile error, never a silently dropped command.

use crate::error::Result;
use crate::renderer::{
    BufferDesc, ConstantBufferHandle, CubeMapDesc, FenceHandle, FramebufferDesc,
    FramebufferHandle, IndexBufferHandle, ProgramHandle, Rect2D, ShaderDesc, ShaderHandle,
    TextureDesc, TextureHandle, VertexBufferHandle,
};
use crate::utils::Memory;

/// One resource operation recorded into `Frame::commands_pre` or `Frame::commands_post`
#[derive(Debug, Clone)]
pub enum RenderCommand {
    CreateVertexBuffer { handle: VertexBufferHandle, desc: BufferDesc },
    UpdateVertexBuffer { handle: VertexBufferHandle, offset: u32, data: Memory },
    DeleteVertexBuffer { handle: VertexBufferHandle },

    CreateIndexBuffer { handle: IndexBufferHandle, desc: BufferDesc },
    UpdateIndexBuffer { handle: IndexBufferHandle, offset: u32, data: Memory },
    DeleteIndexBuffer { handle: IndexBufferHandle },

    CreateConstantBuffer { handle: ConstantBufferHandle, desc: BufferDesc },
    UpdateConstantBuffer { handle: ConstantBufferHandle, offset: u32, data: Memory },
    DeleteConstantBuffer { handle: ConstantBufferHandle },

    CreateShader { handle: ShaderHandle, desc: ShaderDesc },
    DeleteShader { handle: ShaderHandle },

    CreateProgram { handle: ProgramHandle },
    AttachShader { program: ProgramHandle, shader: ShaderHandle },
    LinkProgram { handle: ProgramHandle },
    DeleteProgram { handle: ProgramHandle },

    CreateTexture2D { handle: TextureHandle, desc: TextureDesc },
    UpdateTexture2D { handle: TextureHandle, region: Rect2D, data: Memory },
    CreateTextureCubeMap { handle: TextureHandle, desc: CubeMapDesc },
    DeleteTexture { handle: TextureHandle },

    CreateFramebuffer { handle: FramebufferHandle, desc: FramebufferDesc },
    DeleteFramebuffer { handle: FramebufferHandle },

    CreateFence { handle: FenceHandle },
    DeleteFence { handle: FenceHandle },
}

/// Backend-side consumer of `RenderCommand`s
///
/// Errors returned here abort the current command list; backends report
/// recoverable failures (compile errors, incomplete framebuffers) through
/// the log and return `Ok(())`.
pub trait CommandHandler {
    fn create_vertex_buffer(&mut self, handle: VertexBufferHandle, desc: &BufferDesc) -> Result<()>;
    fn update_vertex_buffer(&mut self, handle: VertexBufferHandle, offset: u32, data: &Memory) -> Result<()>;
    fn delete_vertex_buffer(&mut self, handle: VertexBufferHandle) -> Result<()>;

    fn create_index_buffer(&mut self, handle: IndexBufferHandle, desc: &BufferDesc) -> Result<()>;
    fn update_index_buffer(&mut self, handle: IndexBufferHandle, offset: u32, data: &Memory) -> Result<()>;
    fn delete_index_buffer(&mut self, handle: IndexBufferHandle) -> Result<()>;

    fn create_constant_buffer(&mut self, handle: ConstantBufferHandle, desc: &BufferDesc) -> Result<()>;
    fn update_constant_buffer(&mut self, handle: ConstantBufferHandle, offset: u32, data: &Memory) -> Result<()>;
    fn delete_constant_buffer(&mut self, handle: ConstantBufferHandle) -> Result<()>;

    fn create_shader(&mut self, handle: ShaderHandle, desc: &ShaderDesc) -> Result<()>;
    fn delete_shader(&mut self, handle: ShaderHandle) -> Result<()>;

    fn create_program(&mut self, handle: ProgramHandle) -> Result<()>;
    fn attach_shader(&mut self, program: ProgramHandle, shader: ShaderHandle) -> Result<()>;
    fn link_program(&mut self, handle: ProgramHandle) -> Result<()>;
    fn delete_program(&mut self, handle: ProgramHandle) -> Result<()>;

    fn create_texture_2d(&mut self, handle: TextureHandle, desc: &TextureDesc) -> Result<()>;
    fn update_texture_2d(&mut self, handle: TextureHandle, region: Rect2D, data: &Memory) -> Result<()>;
    fn create_texture_cube_map(&mut self, handle: TextureHandle, desc: &CubeMapDesc) -> Result<()>;
    fn delete_texture(&mut self, handle: TextureHandle) -> Result<()>;

    fn create_framebuffer(&mut self, handle: FramebufferHandle, desc: &FramebufferDesc) -> Result<()>;
    fn delete_framebuffer(&mut self, handle: FramebufferHandle) -> Result<()>;

    fn create_fence(&mut self, handle: FenceHandle) -> Result<()>;
    fn delete_fence(&mut self, handle: FenceHandle) -> Result<()>;
}

impl RenderCommand {
    /// Forward this command to the matching handler method
    pub fn dispatch<H: CommandHandler + ?Sized>(&self, handler: &mut H) -> Result<()> {
        match self {
            RenderCommand::CreateVertexBuffer { handle, desc } => handler.create_vertex_buffer(*handle, desc),
            RenderCommand::UpdateVertexBuffer { handle, offset, data } => handler.update_vertex_buffer(*handle, *offset, data),
            RenderCommand::DeleteVertexBuffer { handle } => handler.delete_vertex_buffer(*handle),

            RenderCommand::CreateIndexBuffer { handle, desc } => handler.create_index_buffer(*handle, desc),
            RenderCommand::UpdateIndexBuffer { handle, offset, data } => handler.update_index_buffer(*handle, *offset, data),
            RenderCommand::DeleteIndexBuffer { handle } => handler.delete_index_buffer(*handle),

            RenderCommand::CreateConstantBuffer { handle, desc } => handler.create_constant_buffer(*handle, desc),
            RenderCommand::UpdateConstantBuffer { handle, offset, data } => handler.update_constant_buffer(*handle, *offset, data),
            RenderCommand::DeleteConstantBuffer { handle } => handler.delete_constant_buffer(*handle),

            RenderCommand::CreateShader { handle, desc } => handler.create_shader(*handle, desc),
            RenderCommand::DeleteShader { handle } => handler.delete_shader(*handle),

            RenderCommand::CreateProgram { handle } => handler.create_program(*handle),
            RenderCommand::AttachShader { program, shader } => handler.attach_shader(*program, *shader),
            RenderCommand::LinkProgram { handle } => handler.link_program(*handle),
            RenderCommand::DeleteProgram { handle } => handler.delete_program(*handle),

            RenderCommand::CreateTexture2D { handle, desc } => handler.create_texture_2d(*handle, desc),
            RenderCommand::UpdateTexture2D { handle, region, data } => handler.update_texture_2d(*handle, *region, data),
            RenderCommand::CreateTextureCubeMap { handle, desc } => handler.create_texture_cube_map(*handle, desc),
            RenderCommand::DeleteTexture { handle } => handler.delete_texture(*handle),

            RenderCommand::CreateFramebuffer { handle, desc } => handler.create_framebuffer(*handle, desc),
            RenderCommand::DeleteFramebuffer { handle } => handler.delete_framebuffer(*handle),

            RenderCommand::CreateFence { handle } => handler.create_fence(*handle),
            RenderCommand::DeleteFence { handle } => handler.delete_fence(*handle),
        }
    }

    /// Variant name, for logs
    pub fn name(&self) -> &'static str {
        match self {
            RenderCommand::CreateVertexBuffer { .. } => "CreateVertexBuffer",
            RenderCommand::UpdateVertexBuffer { .. } => "UpdateVertexBuffer",
            RenderCommand::DeleteVertexBuffer { .. } => "DeleteVertexBuffer",
            RenderCommand::CreateIndexBuffer { .. } => "CreateIndexBuffer",
            RenderCommand::UpdateIndexBuffer { .. } => "UpdateIndexBuffer",
            RenderCommand::DeleteIndexBuffer { .. } => "DeleteIndexBuffer",
            RenderCommand::CreateConstantBuffer { .. } => "CreateConstantBuffer",
            RenderCommand::UpdateConstantBuffer { .. } => "UpdateConstantBuffer",
            RenderCommand::DeleteConstantBuffer { .. } => "DeleteConstantBuffer",
            RenderCommand::CreateShader { .. } => "CreateShader",
            RenderCommand::DeleteShader { .. } => "DeleteShader",
            RenderCommand::CreateProgram { .. } => "CreateProgram",
            RenderCommand::AttachShader { .. } => "AttachShader",
            RenderCommand::LinkProgram { .. } => "LinkProgram",
            RenderCommand::DeleteProgram { .. } => "DeleteProgram",
            RenderCommand::CreateTexture2D { .. } => "CreateTexture2D",
            RenderCommand::UpdateTexture2D { .. } => "UpdateTexture2D",
            RenderCommand::CreateTextureCubeMap { .. } => "CreateTextureCubeMap",
            RenderCommand::DeleteTexture { .. } => "DeleteTexture",
            RenderCommand::CreateFramebuffer { .. } => "CreateFramebuffer",
            RenderCommand::DeleteFramebuffer { .. } => "DeleteFramebuffer",
            RenderCommand::CreateFence { .. } => "CreateFence",
            RenderCommand::DeleteFence { .. } => "DeleteFence",
        }
    }

    /// Whether this command destroys a resource
    pub fn is_delete(&self) -> bool {
        matches!(
            self,
            RenderCommand::DeleteVertexBuffer { .. }
                | RenderCommand::DeleteIndexBuffer { .. }
                | RenderCommand::DeleteConstantBuffer { .. }
                | RenderCommand::DeleteShader { .. }
                | RenderCommand::DeleteProgram { .. }
                | RenderCommand::DeleteTexture { .. }
                | RenderCommand::DeleteFramebuffer { .. }
                | RenderCommand::DeleteFence { .. }
        )
    }
}

/// Dispatch a whole command list in order, stopping at the first error
pub fn dispatch_all<H: CommandHandler + ?Sized>(commands: &[RenderCommand], handler: &mut H) -> Result<()> {
    for command in commands {
        command.dispatch(handler)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "render_command_tests.rs"]
mod tests;
