//! Frame-sampled opacity transitions.
//!
//! A [`Tween`] is a pure description of one transition; it is sampled with
//! the timestamp handed to each animation frame. Scheduling those frames is
//! left to a [`FrameScheduler`], which is `requestAnimationFrame` in the
//! browser and a manual clock in tests.

use std::any::Any;

use super::controller::Opacity;

/// Callback invoked with the frame timestamp in milliseconds.
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// A requested frame that has not necessarily run yet.
///
/// Dropping it cancels the frame if it is still pending.
pub struct PendingFrame {
    _handle: Box<dyn Any>,
}

impl PendingFrame {
    pub fn new(handle: impl Any) -> Self {
        Self {
            _handle: Box::new(handle),
        }
    }
}

pub trait FrameScheduler {
    /// Current time on the same clock as frame timestamps.
    fn now(&self) -> f64;

    /// Run `callback` once, before the next repaint, unless the returned
    /// handle is dropped first.
    fn request_frame(&self, callback: FrameCallback) -> PendingFrame;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    from: Opacity,
    to: Opacity,
    started_at: f64,
    duration_ms: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame {
    pub opacity: Opacity,
    pub finished: bool,
}

impl Tween {
    pub fn new(from: Opacity, to: Opacity, started_at: f64, duration_ms: f64) -> Self {
        Self {
            from,
            to,
            started_at,
            duration_ms,
        }
    }

    pub fn target(&self) -> Opacity {
        self.to
    }

    fn progress(&self, now: f64) -> f64 {
        if self.duration_ms.is_nan() || self.duration_ms <= 0.0 {
            return 1.0;
        }
        // rAF timestamps may predate `started_at` by up to one frame
        ((now - self.started_at) / self.duration_ms).clamp(0.0, 1.0)
    }

    pub fn sample(&self, now: f64) -> Frame {
        let progress = self.progress(now);
        let eased = ease_in_out(progress);
        let from = f64::from(self.from.value());
        let to = f64::from(self.to.value());
        let opacity = Opacity::from_f64(from + (to - from) * eased);
        Frame {
            opacity,
            finished: progress >= 1.0,
        }
    }
}

pub fn ease_in_out(progress: f64) -> f64 {
    progress * (2.0 - progress)
}
