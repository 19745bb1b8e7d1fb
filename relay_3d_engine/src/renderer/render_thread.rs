//! Frame execution and the handoff to the optional render thread.
//!
//! The application thread owns the submit `Frame`. The render slot inside
//! [`FrameSync`] holds the other one. In threaded mode the render thread
//! moves the frame out of the slot while executing it, so the two roles
//! never alias the same frame.
//!
//! Handoff protocol (all flags guarded by one mutex, one condition variable):
//!
//! ```text
//! app:    wait(render_done || should_terminate) -> swap -> submitted = true -> notify
//! render: wait(submitted || should_terminate) -> take -> execute -> put back
//!         -> render_done = true -> notify
//! ```
//!
//! A failed frame sets `should_terminate` and `failed`, so every waiter
//! wakes up and the next `Renderer::frame()` reports the failure.

use std::sync::{Arc, Condvar, Mutex, MutexGuard};

use crate::error::{Error, Result};
use crate::renderer::{Frame, FrameState, RenderContext};
use crate::{engine_debug, engine_error, engine_trace};

const LOG_SOURCE: &str = "relay3d::RenderThread";

/// Name given to the dedicated render thread
pub const RENDER_THREAD_NAME: &str = "relay3d-render";

/// Work executed for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    pub frame_number: u64,
    pub draw_calls: usize,
    pub dispatches: usize,
    pub commands: usize,
}

// ============================================================================
// Frame execution
// ============================================================================

/// Execute `frame` against `context` and clear it for reuse
///
/// Order: `commands_pre`, then every pass, then `commands_post`. The frame's
/// pending releases are left for the caller to hand back to the generators.
pub fn render_frame(context: &mut dyn RenderContext, frame: &mut Frame) -> Result<FrameReport> {
    frame.state = FrameState::Executing;
    let report = FrameReport {
        frame_number: frame.frame_number,
        draw_calls: frame.draw_count(),
        dispatches: frame.dispatch_count(),
        commands: frame.command_count(),
    };

    context.process_command_list(&frame.commands_pre)?;
    context.frame(frame)?;
    context.process_command_list(&frame.commands_post)?;

    frame.reset();
    frame.state = FrameState::Retired;

    engine_trace!(
        LOG_SOURCE,
        "Frame {} executed: {} draws, {} dispatches, {} commands",
        report.frame_number,
        report.draw_calls,
        report.dispatches,
        report.commands
    );
    Ok(report)
}

// ============================================================================
// Shared handoff state
// ============================================================================

pub(crate) struct SyncState {
    /// `None` only while the render thread is executing the frame
    pub render_frame: Option<Frame>,
    pub render_job_submitted: bool,
    pub render_done: bool,
    pub should_terminate: bool,
    /// Set when a frame failed, as opposed to a requested shutdown
    pub failed: bool,
    pub frames_rendered: u64,
    pub last_report: FrameReport,
}

pub(crate) struct FrameSync {
    state: Mutex<SyncState>,
    cond: Condvar,
}

impl FrameSync {
    /// Handoff state whose render slot holds an already retired frame
    pub fn new(mut spare: Frame) -> Self {
        spare.state = FrameState::Retired;
        Self {
            state: Mutex::new(SyncState {
                render_frame: Some(spare),
                render_job_submitted: false,
                render_done: true,
                should_terminate: false,
                failed: false,
                frames_rendered: 0,
                last_report: FrameReport::default(),
            }),
            cond: Condvar::new(),
        }
    }

    pub fn lock(&self) -> Result<MutexGuard<'_, SyncState>> {
        self.state
            .lock()
            .map_err(|_| Error::BackendError("frame sync lock poisoned".to_string()))
    }

    /// Block until the last submitted frame finished or rendering stopped
    pub fn wait_for_frame_end(&self) -> Result<MutexGuard<'_, SyncState>> {
        let guard = self.lock()?;
        self.cond
            .wait_while(guard, |s| !s.render_done && !s.should_terminate)
            .map_err(|_| Error::BackendError("frame sync lock poisoned".to_string()))
    }

    /// Block until a frame is submitted or termination is requested
    fn wait_for_job(&self) -> Result<MutexGuard<'_, SyncState>> {
        let guard = self.lock()?;
        self.cond
            .wait_while(guard, |s| !s.render_job_submitted && !s.should_terminate)
            .map_err(|_| Error::BackendError("frame sync lock poisoned".to_string()))
    }

    pub fn notify(&self) {
        self.cond.notify_all();
    }

    /// Ask the render thread to exit after its current frame
    pub fn terminate(&self) {
        if let Ok(mut state) = self.lock() {
            state.should_terminate = true;
        }
        self.notify();
    }
}

// ============================================================================
// Render thread
// ============================================================================

/// Wakes every waiter if the render thread unwinds
struct PanicGuard<'a>(&'a FrameSync);

impl Drop for PanicGuard<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            if let Ok(mut state) = self.0.state.lock() {
                state.failed = true;
                state.should_terminate = true;
            }
            self.0.notify();
        }
    }
}

/// Body of the render thread
///
/// Returns the context so the owner can destroy the window after joining.
pub(crate) fn render_thread_main(
    mut context: Box<dyn RenderContext>,
    sync: Arc<FrameSync>,
) -> Box<dyn RenderContext> {
    engine_debug!(LOG_SOURCE, "Render thread started");
    let _guard = PanicGuard(&sync);

    loop {
        let mut frame = {
            let mut state = match sync.wait_for_job() {
                Ok(state) => state,
                Err(e) => {
                    engine_error!(LOG_SOURCE, "Render thread stopping: {}", e);
                    break;
                }
            };
            if state.should_terminate {
                break;
            }
            state.render_job_submitted = false;
            match state.render_frame.take() {
                Some(frame) => frame,
                None => {
                    engine_error!(LOG_SOURCE, "Submitted job without a frame in the render slot");
                    state.failed = true;
                    state.should_terminate = true;
                    drop(state);
                    sync.notify();
                    break;
                }
            }
        };

        let result = context
            .start_rendering()
            .and_then(|_| render_frame(context.as_mut(), &mut frame));

        let Ok(mut state) = sync.lock() else {
            engine_error!(LOG_SOURCE, "Render thread stopping: frame sync lock poisoned");
            break;
        };
        let frame_number = frame.frame_number;
        state.render_frame = Some(frame);
        let failed = match result {
            Ok(report) => {
                state.last_report = report;
                state.frames_rendered += 1;
                state.render_done = true;
                false
            }
            Err(e) => {
                engine_error!(LOG_SOURCE, "Frame {} failed, rendering stopped: {}", frame_number, e);
                state.failed = true;
                state.should_terminate = true;
                true
            }
        };
        drop(state);
        sync.notify();

        if failed {
            break;
        }
    }

    if let Err(e) = context.stop_rendering() {
        engine_error!(LOG_SOURCE, "Failed to release the graphics context: {}", e);
    }
    engine_debug!(LOG_SOURCE, "Render thread exited");
    context
}

#[cfg(test)]
#[path = "render_thread_tests.rs"]
mod tests;
