use js_sys::{Function, Promise, Reflect};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use super::js_error_text;
use crate::contact::errors::FormError;
use crate::contact::submit::Challenge;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = grecaptcha, js_name = ready, catch)]
    fn recaptcha_ready(callback: &Function) -> Result<(), JsValue>;

    #[wasm_bindgen(js_namespace = grecaptcha, js_name = execute, catch)]
    fn recaptcha_execute(site_key: &str, options: &JsValue) -> Result<Promise, JsValue>;
}

#[derive(Serialize)]
struct ExecuteOptions<'a> {
    action: &'a str,
}

/// Google reCAPTCHA v3, loaded by the page through its own script tag.
pub struct Recaptcha;

fn challenge_error(e: JsValue) -> FormError {
    FormError::Challenge(js_error_text(&e))
}

impl Challenge for Recaptcha {
    fn is_available(&self) -> bool {
        Reflect::get(&js_sys::global(), &JsValue::from_str("grecaptcha"))
            .map(|api| !api.is_undefined())
            .unwrap_or(false)
    }

    async fn token(&self, site_key: &str, action: &str) -> Result<String, FormError> {
        let ready = Promise::new(&mut |resolve, reject| {
            if let Err(e) = recaptcha_ready(&resolve) {
                let _ = reject.call1(&JsValue::NULL, &e);
            }
        });
        JsFuture::from(ready).await.map_err(challenge_error)?;

        let options = serde_wasm_bindgen::to_value(&ExecuteOptions { action })
            .map_err(|e| FormError::Challenge(e.to_string()))?;
        let pending = recaptcha_execute(site_key, &options).map_err(challenge_error)?;
        let token = JsFuture::from(pending).await.map_err(challenge_error)?;

        token
            .as_string()
            .ok_or_else(|| FormError::Challenge("reCAPTCHA returned no token".to_string()))
    }
}
