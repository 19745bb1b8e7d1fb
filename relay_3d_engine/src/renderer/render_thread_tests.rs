use super::*;
use crate::renderer::mock_render_context::MockRenderContext;
use crate::renderer::{FenceHandle, RenderCommand, RenderItem};

fn recorded_frame(frame_number: u64) -> Frame {
    let mut frame = Frame::new();
    frame.frame_number = frame_number;
    frame.commands_pre.push(RenderCommand::CreateFence {
        handle: FenceHandle::from_raw(0),
    });
    frame.render_pass(0).render_items.push(RenderItem {
        vertex_count: 3,
        ..Default::default()
    });
    frame.commands_post.push(RenderCommand::DeleteFence {
        handle: FenceHandle::from_raw(0),
    });
    frame
}

#[test]
fn test_render_frame_order_and_report() {
    let mut context = MockRenderContext::new();
    let log = context.log_handle();
    let mut frame = recorded_frame(7);

    let report = render_frame(&mut context, &mut frame).unwrap();

    assert_eq!(
        report,
        FrameReport {
            frame_number: 7,
            draw_calls: 1,
            dispatches: 0,
            commands: 2,
        }
    );
    assert_eq!(
        log.lock().unwrap().calls,
        vec!["create_fence(0)", "frame(7)", "delete_fence(0)"]
    );
    assert_eq!(frame.state, FrameState::Retired);
    assert!(frame.is_empty());
}

#[test]
fn test_render_frame_failure_leaves_frame_intact() {
    let mut context = MockRenderContext::failing_on(3);
    let log = context.log_handle();
    let mut frame = recorded_frame(3);

    assert!(render_frame(&mut context, &mut frame).is_err());

    // Post commands never ran
    assert_eq!(log.lock().unwrap().calls, vec!["create_fence(0)"]);
    assert_eq!(frame.state, FrameState::Executing);
    assert_eq!(frame.draw_count(), 1);
}

#[test]
fn test_sync_starts_ready() {
    let sync = FrameSync::new(Frame::new());
    let state = sync.wait_for_frame_end().unwrap();
    assert!(state.render_done);
    assert!(!state.render_job_submitted);
    assert_eq!(state.render_frame.as_ref().map(|f| f.state), Some(FrameState::Retired));
}

#[test]
fn test_thread_executes_submitted_frame() {
    let context = MockRenderContext::new();
    let log = context.log_handle();
    let sync = Arc::new(FrameSync::new(Frame::new()));

    let thread_sync = Arc::clone(&sync);
    let handle = std::thread::spawn(move || render_thread_main(Box::new(context), thread_sync));

    {
        let mut state = sync.wait_for_frame_end().unwrap();
        state.render_frame = Some(recorded_frame(1));
        state.render_done = false;
        state.render_job_submitted = true;
    }
    sync.notify();

    {
        let state = sync.wait_for_frame_end().unwrap();
        assert!(state.render_done);
        assert!(!state.failed);
        assert_eq!(state.frames_rendered, 1);
        assert_eq!(state.last_report.draw_calls, 1);
    }

    sync.terminate();
    handle.join().unwrap();

    let calls = log.lock().unwrap().calls.clone();
    assert_eq!(
        calls,
        vec![
            "start_rendering",
            "create_fence(0)",
            "frame(1)",
            "delete_fence(0)",
            "stop_rendering",
        ]
    );
}

#[test]
fn test_thread_failure_wakes_waiters() {
    let context = MockRenderContext::failing_on(1);
    let sync = Arc::new(FrameSync::new(Frame::new()));

    let thread_sync = Arc::clone(&sync);
    let handle = std::thread::spawn(move || render_thread_main(Box::new(context), thread_sync));

    {
        let mut state = sync.wait_for_frame_end().unwrap();
        state.render_frame = Some(recorded_frame(1));
        state.render_done = false;
        state.render_job_submitted = true;
    }
    sync.notify();

    // Must return even though render_done is never set again
    {
        let state = sync.wait_for_frame_end().unwrap();
        assert!(!state.render_done);
        assert!(state.should_terminate);
        assert!(state.failed);
        assert!(state.render_frame.is_some());
    }

    handle.join().unwrap();
}
