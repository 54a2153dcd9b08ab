//! Browser bindings. Only built for `wasm32`.

pub mod forms;
pub mod frames;
pub mod hero;
pub mod recaptcha;

use log::info;
use wasm_bindgen::{JsCast, JsValue};

use crate::config::{FormConfig, OverlayConfig};
use crate::overlay::controller::OpacityController;

pub(crate) fn js_error_text(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}

/// Wires the hero overlay and every contact form on the current page.
///
/// The returned controller is the one published on `window`.
pub fn start() -> Result<OpacityController, String> {
    let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;
    let document = window
        .document()
        .ok_or_else(|| "document is unavailable".to_string())?;

    let overlay = OverlayConfig::default();
    let controller = hero::build_controller(&overlay)?;
    hero::publish(&window, &controller, &overlay)?;

    let forms = forms::attach_all(&document, &FormConfig::default())?;
    info!(
        "Site scripts ready: overlay at {}%, {} contact form(s)",
        controller.opacity().value(),
        forms
    );
    Ok(controller)
}
