use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info, warn};

use super::animation::{FrameScheduler, PendingFrame, Tween};
use super::presets::{Preset, PresetError};
use crate::config::OverlayConfig;

/// Overlay opacity in percent, always within `0..=100`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Opacity(u8);

impl Opacity {
    pub const MIN: Opacity = Opacity(0);
    pub const MAX: Opacity = Opacity(100);

    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(0, 100) as u8)
    }

    /// Rounds to the nearest percent; NaN saturates to zero.
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            return Self::MIN;
        }
        Self(value.round().clamp(0.0, 100.0) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Value as written into the stylesheet variable, e.g. `"70%"`.
    pub fn css_value(self) -> String {
        format!("{}%", self.0)
    }
}

/// Where the current value is reflected for the page's stylesheets.
pub trait StyleSink {
    fn write(&self, opacity: Opacity);
}

pub type Listener = Rc<dyn Fn(Opacity)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

struct State {
    current: Opacity,
    sink: Box<dyn StyleSink>,
    listeners: Vec<(Subscription, Listener)>,
    next_subscription: u64,
    // bumped by every animate_to; stale frame loops stop themselves
    generation: u64,
    frame: Option<PendingFrame>,
}

/// Single owner of the hero overlay opacity.
///
/// Cloning yields another handle to the same state, so the controller can be
/// built once at start-up and handed to every consumer.
#[derive(Clone)]
pub struct OpacityController {
    state: Rc<RefCell<State>>,
    frames: Rc<dyn FrameScheduler>,
    default_duration_ms: f64,
}

impl OpacityController {
    pub fn new(
        config: &OverlayConfig,
        sink: impl StyleSink + 'static,
        frames: impl FrameScheduler + 'static,
    ) -> Self {
        Self {
            state: Rc::new(RefCell::new(State {
                current: Opacity::clamped(config.initial_opacity.into()),
                sink: Box::new(sink),
                listeners: Vec::new(),
                next_subscription: 0,
                generation: 0,
                frame: None,
            })),
            frames: Rc::new(frames),
            default_duration_ms: config.default_duration_ms,
        }
    }

    pub fn opacity(&self) -> Opacity {
        self.state.borrow().current
    }

    pub fn default_duration_ms(&self) -> f64 {
        self.default_duration_ms
    }

    /// Clamps `value` into range and applies it. Out-of-range input saturates.
    pub fn set_opacity(&self, value: i64) -> Opacity {
        let opacity = Opacity::clamped(value);
        self.set(opacity);
        opacity
    }

    pub fn set(&self, opacity: Opacity) {
        let listeners: Vec<Listener> = {
            let mut state = self.state.borrow_mut();
            state.current = opacity;
            state.sink.write(opacity);
            state.listeners.iter().map(|(_, l)| Rc::clone(l)).collect()
        };
        // State borrow is released so listeners may read the controller.
        for listener in listeners {
            listener(opacity);
        }
    }

    /// Eases from the current value to `target`, one step per frame.
    ///
    /// Starting an animation cancels the frame of any animation still
    /// running, so among `animate_to` calls the latest one wins. Direct
    /// [`set`](Self::set) calls do not stop a running animation and are
    /// overwritten by its next frame.
    pub fn animate_to(&self, target: Opacity, duration_ms: f64) {
        let (generation, superseded) = {
            let mut state = self.state.borrow_mut();
            state.generation += 1;
            (state.generation, state.frame.take())
        };
        drop(superseded);
        let tween = Tween::new(self.opacity(), target, self.frames.now(), duration_ms);
        debug!(
            "Animating overlay opacity {} -> {} over {}ms",
            self.opacity().value(),
            target.value(),
            duration_ms
        );
        self.schedule_frame(tween, generation);
    }

    fn is_current(&self, generation: u64) -> bool {
        self.state.borrow().generation == generation
    }

    fn schedule_frame(&self, tween: Tween, generation: u64) {
        let controller = self.clone();
        let pending = self.frames.request_frame(Box::new(move |now| {
            if !controller.is_current(generation) {
                debug!("Dropping superseded animation towards {}", tween.target().value());
                return;
            }
            let frame = tween.sample(now);
            controller.set(frame.opacity);
            // a listener may have started another animation during `set`
            if !frame.finished && controller.is_current(generation) {
                controller.schedule_frame(tween, generation);
            }
        }));
        let previous = self.state.borrow_mut().frame.replace(pending);
        drop(previous);
    }

    pub fn apply_preset(&self, name: &str, animate: bool) -> Result<Preset, PresetError> {
        let preset = name.parse::<Preset>().map_err(|e| {
            warn!("{}", e);
            e
        })?;
        info!("Applying overlay preset {}", preset);
        if animate {
            self.animate_to(preset.opacity(), self.default_duration_ms);
        } else {
            self.set(preset.opacity());
        }
        Ok(preset)
    }

    pub fn presets(&self) -> Vec<&'static str> {
        Preset::names()
    }

    pub fn subscribe(&self, listener: impl Fn(Opacity) + 'static) -> Subscription {
        let mut state = self.state.borrow_mut();
        let subscription = Subscription(state.next_subscription);
        state.next_subscription += 1;
        state.listeners.push((subscription, Rc::new(listener)));
        subscription
    }

    /// Returns false when the subscription was already removed.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut state = self.state.borrow_mut();
        let before = state.listeners.len();
        state.listeners.retain(|(id, _)| *id != subscription);
        state.listeners.len() != before
    }
}
