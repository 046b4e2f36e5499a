use crate::error::FrameError;
use crate::host::FrameScheduler;
use serde::Serialize;

/// Render loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopState {
    /// Constructed, no frame requested yet.
    Idle,
    /// A frame request is pending with the scheduler.
    Scheduled,
    /// Inside a frame callback.
    Rendering,
    /// No frame pending and none will be requested.
    Stopped,
}

/// Timestamp handed to one frame callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    /// 1-based frame number.
    pub frame: u64,
    /// Scheduler timestamp in milliseconds.
    pub timestamp_ms: f64,
    /// Milliseconds since the previous frame, zero for the first one.
    pub delta_ms: f64,
}

impl FrameClock {
    pub fn seconds(&self) -> f32 {
        (self.timestamp_ms * 0.001) as f32
    }

    pub fn delta_seconds(&self) -> f32 {
        (self.delta_ms * 0.001) as f32
    }
}

/// Two-phase frame state machine re-armed by a [`FrameScheduler`].
///
/// [`begin`](Self::begin) enters a frame, [`finish`](Self::finish) leaves it
/// and requests exactly one next frame unless [`stop`](Self::stop) was called.
#[derive(Debug)]
pub struct FrameLoop {
    state: LoopState,
    frames: u64,
    stop_requested: bool,
    last_timestamp_ms: Option<f64>,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Idle,
            frames: 0,
            stop_requested: false,
            last_timestamp_ms: None,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Frame callbacks entered so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, LoopState::Scheduled | LoopState::Rendering)
    }

    /// Request the first frame. Returns false if the loop is already running.
    pub fn start(&mut self, scheduler: &mut impl FrameScheduler) -> bool {
        match self.state {
            LoopState::Idle | LoopState::Stopped => {
                self.stop_requested = false;
                scheduler.request_frame();
                self.state = LoopState::Scheduled;
                tracing::info!("render loop started");
                true
            }
            LoopState::Scheduled | LoopState::Rendering => {
                tracing::warn!(state = ?self.state, "render loop already running");
                false
            }
        }
    }

    /// Ask the loop not to request another frame. A frame already scheduled
    /// still runs once.
    pub fn stop(&mut self) {
        match self.state {
            LoopState::Idle => self.state = LoopState::Stopped,
            LoopState::Scheduled | LoopState::Rendering => self.stop_requested = true,
            LoopState::Stopped => {}
        }
    }

    /// Enter a frame. Only valid while a frame is scheduled.
    pub fn begin(&mut self, timestamp_ms: f64) -> Result<FrameClock, FrameError> {
        if self.state != LoopState::Scheduled {
            return Err(FrameError::NotScheduled { state: self.state });
        }

        let delta_ms = match self.last_timestamp_ms {
            Some(last) if timestamp_ms < last => {
                tracing::warn!(last, timestamp_ms, "frame timestamp went backwards");
                0.0
            }
            Some(last) => timestamp_ms - last,
            None => 0.0,
        };
        self.last_timestamp_ms = Some(match self.last_timestamp_ms {
            Some(last) => last.max(timestamp_ms),
            None => timestamp_ms,
        });
        self.frames += 1;
        self.state = LoopState::Rendering;

        Ok(FrameClock {
            frame: self.frames,
            timestamp_ms,
            delta_ms,
        })
    }

    /// Leave the current frame, re-arming the scheduler unless stopped.
    pub fn finish(&mut self, scheduler: &mut impl FrameScheduler) -> LoopState {
        if self.state != LoopState::Rendering {
            return self.state;
        }
        if self.stop_requested {
            self.stop_requested = false;
            self.state = LoopState::Stopped;
            tracing::info!(frames = self.frames, "render loop stopped");
        } else {
            scheduler.request_frame();
            self.state = LoopState::Scheduled;
        }
        self.state
    }

    /// Stop immediately from inside a frame, without requesting another.
    pub fn halt(&mut self) {
        self.stop_requested = false;
        self.state = LoopState::Stopped;
    }
}
