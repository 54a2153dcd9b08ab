//! Hero overlay wiring: the stylesheet variable, the `videoOpacityChanged`
//! window event and the globals other page scripts use.

use js_sys::Reflect;
use log::{debug, warn};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CustomEvent, CustomEventInit, Document, HtmlElement, Window};

use super::frames::AnimationFrames;
use super::js_error_text;
use crate::config::OverlayConfig;
use crate::overlay::controller::{Opacity, OpacityController, StyleSink, Subscription};

/// Writes the opacity into a custom property on `<html>`.
pub struct RootStyle {
    root: HtmlElement,
    variable: &'static str,
}

impl RootStyle {
    pub fn new(document: &Document, variable: &'static str) -> Result<Self, String> {
        let root = document
            .document_element()
            .ok_or_else(|| "document has no root element".to_string())?
            .dyn_into::<HtmlElement>()
            .map_err(|_| "document root is not HtmlElement".to_string())?;
        Ok(Self { root, variable })
    }
}

impl StyleSink for RootStyle {
    fn write(&self, opacity: Opacity) {
        if let Err(e) = self
            .root
            .style()
            .set_property(self.variable, &opacity.css_value())
        {
            warn!("Failed to set {}: {}", self.variable, js_error_text(&e));
        }
    }
}

#[derive(Serialize)]
struct OpacityDetail {
    opacity: u8,
}

/// Re-broadcasts every change as a `CustomEvent` on `window`.
pub fn broadcast_changes(
    controller: &OpacityController,
    window: &Window,
    event_name: &'static str,
) -> Subscription {
    let window = window.clone();
    controller.subscribe(move |opacity| {
        let init = CustomEventInit::new();
        match serde_wasm_bindgen::to_value(&OpacityDetail {
            opacity: opacity.value(),
        }) {
            Ok(detail) => init.set_detail(&detail),
            Err(e) => warn!("Failed to encode opacity event detail: {}", e),
        }
        match CustomEvent::new_with_event_init_dict(event_name, &init) {
            Ok(event) => {
                let _ = window.dispatch_event(&event);
            }
            Err(e) => warn!("Failed to create {}: {}", event_name, js_error_text(&e)),
        }
    })
}

/// Controller bound to this page's root style and window event.
pub fn build_controller(config: &OverlayConfig) -> Result<OpacityController, String> {
    let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;
    let document = window
        .document()
        .ok_or_else(|| "document is unavailable".to_string())?;

    let controller = OpacityController::new(
        config,
        RootStyle::new(&document, config.css_variable)?,
        AnimationFrames::new(&window)?,
    );
    broadcast_changes(&controller, &window, config.change_event);
    Ok(controller)
}

/// Page-script facing wrapper, published as `window.VideoTransparencyController`.
#[wasm_bindgen(js_name = VideoTransparencyController)]
pub struct OverlayHandle {
    controller: OpacityController,
}

#[wasm_bindgen(js_class = VideoTransparencyController)]
impl OverlayHandle {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<OverlayHandle, JsValue> {
        build_controller(&OverlayConfig::default())
            .map(OverlayHandle::wrap)
            .map_err(|e| JsValue::from_str(&e))
    }

    #[wasm_bindgen(js_name = setOpacity)]
    pub fn set_opacity(&self, value: f64) {
        self.controller.set(Opacity::from_f64(value));
    }

    #[wasm_bindgen(js_name = getOpacity)]
    pub fn get_opacity(&self) -> u8 {
        self.controller.opacity().value()
    }

    #[wasm_bindgen(js_name = animateToOpacity)]
    pub fn animate_to_opacity(&self, target: f64, duration: Option<f64>) {
        let duration = duration.unwrap_or_else(|| self.controller.default_duration_ms());
        self.controller.animate_to(Opacity::from_f64(target), duration);
    }

    /// Unknown names only log a warning.
    #[wasm_bindgen(js_name = applyPreset)]
    pub fn apply_preset(&self, name: &str, animate: Option<bool>) {
        let _ = self.controller.apply_preset(name, animate.unwrap_or(true));
    }

    #[wasm_bindgen(js_name = availablePresets)]
    pub fn available_presets(&self) -> js_sys::Array {
        self.controller
            .presets()
            .into_iter()
            .map(JsValue::from_str)
            .collect()
    }
}

impl OverlayHandle {
    pub fn wrap(controller: OpacityController) -> Self {
        Self { controller }
    }
}

/// Exposes `controller` and its class on `window` for console and page use.
pub fn publish(
    window: &Window,
    controller: &OpacityController,
    config: &OverlayConfig,
) -> Result<(), String> {
    let instance = JsValue::from(OverlayHandle::wrap(controller.clone()));
    let class = Reflect::get(&instance, &JsValue::from_str("constructor"))
        .map_err(|e| js_error_text(&e))?;

    Reflect::set(window, &JsValue::from_str(config.instance_global), &instance)
        .map_err(|e| js_error_text(&e))?;
    Reflect::set(window, &JsValue::from_str(config.class_global), &class)
        .map_err(|e| js_error_text(&e))?;
    debug!(
        "Published window.{} and window.{}",
        config.instance_global, config.class_global
    );
    Ok(())
}
