use gloo_render::request_animation_frame;
use web_sys::{Performance, Window};

use crate::overlay::animation::{FrameCallback, FrameScheduler, PendingFrame};

/// `requestAnimationFrame` driven frames, timed with `performance.now()`.
pub struct AnimationFrames {
    performance: Performance,
}

impl AnimationFrames {
    pub fn new(window: &Window) -> Result<Self, String> {
        let performance = window
            .performance()
            .ok_or_else(|| "performance is unavailable".to_string())?;
        Ok(Self { performance })
    }
}

impl FrameScheduler for AnimationFrames {
    fn now(&self) -> f64 {
        self.performance.now()
    }

    // Dropping the `AnimationFrame` handle calls `cancelAnimationFrame`.
    fn request_frame(&self, callback: FrameCallback) -> PendingFrame {
        PendingFrame::new(request_animation_frame(move |timestamp| callback(timestamp)))
    }
}
