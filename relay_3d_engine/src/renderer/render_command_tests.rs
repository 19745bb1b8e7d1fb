use super::*;
use crate::renderer::mock_render_context::MockRenderContext;
use crate::renderer::{BufferUsage, ShaderStage};

fn sample_commands() -> Vec<RenderCommand> {
    let vb = VertexBufferHandle::from_raw(0);
    let program = ProgramHandle::from_raw(1);
    let shader = ShaderHandle::from_raw(2);
    vec![
        RenderCommand::CreateVertexBuffer {
            handle: vb,
            desc: BufferDesc::empty(64, BufferUsage::Static),
        },
        RenderCommand::UpdateVertexBuffer {
            handle: vb,
            offset: 16,
            data: Memory::zeroed(32),
        },
        RenderCommand::CreateShader {
            handle: shader,
            desc: ShaderDesc {
                stage: ShaderStage::Vertex,
                source: "void main() {}".to_string(),
                name: "basic.vert".to_string(),
            },
        },
        RenderCommand::CreateProgram { handle: program },
        RenderCommand::AttachShader { program, shader },
        RenderCommand::LinkProgram { handle: program },
        RenderCommand::DeleteVertexBuffer { handle: vb },
    ]
}

#[test]
fn test_dispatch_all_preserves_order() {
    let mut context = MockRenderContext::new();
    let log = context.log_handle();

    dispatch_all(&sample_commands(), &mut context).unwrap();

    let calls = log.lock().unwrap().calls.clone();
    assert_eq!(
        calls,
        vec![
            "create_vertex_buffer(0, size=64)",
            "update_vertex_buffer(0, offset=16, len=32)",
            "create_shader(2, basic.vert)",
            "create_program(1)",
            "attach_shader(1, 2)",
            "link_program(1)",
            "delete_vertex_buffer(0)",
        ]
    );
}

#[test]
fn test_dispatch_single_command() {
    let mut context = MockRenderContext::new();
    let log = context.log_handle();

    let command = RenderCommand::UpdateTexture2D {
        handle: TextureHandle::from_raw(4),
        region: Rect2D::new(0, 0, 8, 4),
        data: Memory::zeroed(8 * 4 * 4),
    };
    command.dispatch(&mut context).unwrap();

    assert_eq!(log.lock().unwrap().calls, vec!["update_texture_2d(4, 8x4, len=128)"]);
}

#[test]
fn test_command_names() {
    let names: Vec<&str> = sample_commands().iter().map(RenderCommand::name).collect();
    assert_eq!(
        names,
        vec![
            "CreateVertexBuffer",
            "UpdateVertexBuffer",
            "CreateShader",
            "CreateProgram",
            "AttachShader",
            "LinkProgram",
            "DeleteVertexBuffer",
        ]
    );
}

#[test]
fn test_is_delete() {
    let commands = sample_commands();
    let deletes: Vec<bool> = commands.iter().map(RenderCommand::is_delete).collect();
    assert_eq!(deletes, vec![false, false, false, false, false, false, true]);

    assert!(RenderCommand::DeleteFence {
        handle: FenceHandle::from_raw(0)
    }
    .is_delete());
}

#[test]
fn test_cloned_command_shares_payload() {
    let data = Memory::new(&[1, 2, 3, 4]);
    let command = RenderCommand::UpdateIndexBuffer {
        handle: IndexBufferHandle::from_raw(0),
        offset: 0,
        data: data.clone(),
    };
    let copy = command.clone();

    match (&command, &copy) {
        (
            RenderCommand::UpdateIndexBuffer { data: a, .. },
            RenderCommand::UpdateIndexBuffer { data: b, .. },
        ) => assert!(a.ptr_eq(b) && a.ptr_eq(&data)),
        _ => panic!("clone changed the variant"),
    }
}
