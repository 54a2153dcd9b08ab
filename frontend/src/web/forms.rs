use std::rc::Rc;

use gloo_net::http::Request;
use log::{debug, info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, FormData, HtmlFormElement};

use super::js_error_text;
use super::recaptcha::Recaptcha;
use crate::config::FormConfig;
use crate::contact::errors::FormError;
use crate::contact::submit::{
    self, show, FormPayload, FormView, HttpReply, Indicator, Transport, UiState,
};

pub struct FormDataPayload(pub(crate) FormData);

impl FormPayload for FormDataPayload {
    fn set_field(&mut self, name: &str, value: &str) {
        if let Err(e) = self.0.set_with_str(name, value) {
            warn!("Failed to set form field {}: {}", name, js_error_text(&e));
        }
    }
}

/// One `<form>` element and its indicator descendants.
pub struct DomForm {
    form: HtmlFormElement,
    config: FormConfig,
}

impl DomForm {
    pub fn new(form: HtmlFormElement, config: FormConfig) -> Self {
        Self { form, config }
    }

    fn indicator(&self, indicator: Indicator) -> Option<Element> {
        let selector = match indicator {
            Indicator::Loading => self.config.loading_selector,
            Indicator::Sent => self.config.sent_selector,
            Indicator::Error => self.config.error_selector,
        };
        let element = self.form.query_selector(selector).ok().flatten();
        if element.is_none() {
            debug!("Form has no {} element", selector);
        }
        element
    }
}

impl FormView for DomForm {
    type Payload = FormDataPayload;

    // Attribute, not the `action` property, which falls back to the page URL.
    fn action(&self) -> Option<String> {
        self.form.get_attribute("action")
    }

    fn site_key(&self) -> Option<String> {
        self.form.get_attribute(self.config.site_key_attribute)
    }

    fn payload(&self) -> Result<FormDataPayload, FormError> {
        FormData::new_with_form(&self.form)
            .map(FormDataPayload)
            .map_err(|e| FormError::Payload(js_error_text(&e)))
    }

    fn set_indicator(&self, indicator: Indicator, visible: bool) {
        if let Some(element) = self.indicator(indicator) {
            let classes = element.class_list();
            let _ = if visible {
                classes.add_1(self.config.visible_class)
            } else {
                classes.remove_1(self.config.visible_class)
            };
        }
    }

    fn set_error_text(&self, text: &str) {
        if let Some(element) = self.indicator(Indicator::Error) {
            element.set_text_content(Some(text));
        }
    }

    fn reset(&self) {
        self.form.reset();
    }
}

/// Multipart POST through `fetch`, flagged as a scripted request.
pub struct FetchTransport {
    header: (&'static str, &'static str),
}

impl FetchTransport {
    pub fn new(config: &FormConfig) -> Self {
        Self {
            header: config.scripted_header,
        }
    }
}

impl Transport for FetchTransport {
    type Payload = FormDataPayload;

    async fn post(&self, url: &str, payload: FormDataPayload) -> Result<HttpReply, FormError> {
        let (name, value) = self.header;
        let response = Request::post(url)
            .header(name, value)
            .body(payload.0)
            .send()
            .await
            .map_err(network_error)?;

        let mut reply = HttpReply {
            status: response.status(),
            status_text: response.status_text(),
            url: response.url(),
            body: String::new(),
        };
        if reply.is_success() {
            reply.body = response.text().await.map_err(network_error)?;
        }
        Ok(reply)
    }
}

// A rejected fetch carries a JS error; its message alone reads like the browser's.
fn network_error(error: gloo_net::Error) -> FormError {
    match error {
        gloo_net::Error::JsError(js) => FormError::Network(js.message),
        other => FormError::Network(other.to_string()),
    }
}

/// Intercepts submits on every form matching the configured selector.
pub fn attach_all(document: &Document, config: &FormConfig) -> Result<u32, String> {
    let forms = document
        .query_selector_all(config.form_selector)
        .map_err(|e| js_error_text(&e))?;

    let mut attached = 0;
    for index in 0..forms.length() {
        let Some(form) = forms
            .item(index)
            .and_then(|node| node.dyn_into::<HtmlFormElement>().ok())
        else {
            continue;
        };
        attach(form, config.clone())?;
        attached += 1;
    }
    info!("Contact handler attached to {} form(s)", attached);
    Ok(attached)
}

pub fn attach(form: HtmlFormElement, config: FormConfig) -> Result<(), String> {
    let view = Rc::new(DomForm::new(form.clone(), config.clone()));
    show(view.as_ref(), &UiState::Idle);
    let config = Rc::new(config);

    let on_submit = Closure::wrap(Box::new(move |event: Event| {
        event.prevent_default();
        let view = Rc::clone(&view);
        let config = Rc::clone(&config);
        spawn_local(async move {
            let transport = FetchTransport::new(&config);
            // outcome is already rendered on the form
            let _ = submit::submit(view.as_ref(), &transport, &Recaptcha, &config).await;
        });
    }) as Box<dyn FnMut(Event)>);

    form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())
        .map_err(|e| js_error_text(&e))?;
    // Handlers live as long as the page.
    on_submit.forget();
    Ok(())
}

#[cfg(test)]
mod tests {
    use js_sys::{Function, Reflect};
    use wasm_bindgen::JsValue;
    use wasm_bindgen_test::*;

    use super::*;
    use crate::web::test_support::{contact_form, has_class};

    wasm_bindgen_test_configure!(run_in_browser);

    /// Swaps `window.fetch` for `handler(request)` until dropped.
    struct StubbedFetch {
        original: JsValue,
    }

    impl StubbedFetch {
        fn install(handler: &str) -> Self {
            let window = web_sys::window().unwrap();
            let original = Reflect::get(&window, &JsValue::from_str("fetch")).unwrap();
            let stub = Function::new_with_args("request", handler);
            Reflect::set(&window, &JsValue::from_str("fetch"), &stub).unwrap();
            Self { original }
        }
    }

    impl Drop for StubbedFetch {
        fn drop(&mut self) {
            let window = web_sys::window().unwrap();
            let _ = Reflect::set(&window, &JsValue::from_str("fetch"), &self.original);
        }
    }

    fn window_value(path: &[&str]) -> JsValue {
        let window = JsValue::from(web_sys::window().unwrap());
        path.iter().fold(window, |value, key| {
            Reflect::get(&value, &JsValue::from_str(key)).unwrap()
        })
    }

    fn payload() -> FormDataPayload {
        DomForm::new(contact_form(r#"action="x""#), FormConfig::default())
            .payload()
            .unwrap()
    }

    const ANSWER: &str = r#"
        window.__contactRequest = {
            method: request.method,
            url: request.url,
            scripted: request.headers.get('X-Requested-With'),
        };
        const response = new Response(window.__contactBody, {
            status: window.__contactStatus,
            statusText: window.__contactStatusText,
        });
        Object.defineProperty(response, 'url', { value: request.url });
        window.__contactResponse = response;
        return Promise.resolve(response);
    "#;

    fn answer_with(status: u16, status_text: &str, body: &str) -> StubbedFetch {
        let window = web_sys::window().unwrap();
        let set = |key: &str, value: JsValue| {
            Reflect::set(&window, &JsValue::from_str(key), &value).unwrap();
        };
        set("__contactStatus", JsValue::from(status));
        set("__contactStatusText", JsValue::from_str(status_text));
        set("__contactBody", JsValue::from_str(body));
        StubbedFetch::install(ANSWER)
    }

    #[wasm_bindgen_test]
    fn reads_action_attribute_only() {
        let view = DomForm::new(contact_form(""), FormConfig::default());
        assert_eq!(view.action(), None);

        let view = DomForm::new(
            contact_form(r#"action="forms/contact.php" data-recaptcha-site-key="k1""#),
            FormConfig::default(),
        );
        assert_eq!(view.action().as_deref(), Some("forms/contact.php"));
        assert_eq!(view.site_key().as_deref(), Some("k1"));
    }

    #[wasm_bindgen_test]
    fn ui_states_toggle_visibility_class() {
        let form = contact_form(r#"action="forms/contact.php""#);
        let view = DomForm::new(form.clone(), FormConfig::default());

        show(&view, &UiState::Loading);
        assert!(has_class(&form, ".loading"));

        show(&view, &UiState::ErrorShown("<b>Invalid email</b>".to_string()));
        assert!(!has_class(&form, ".loading"));
        assert!(has_class(&form, ".error-message"));
        let error = form.query_selector(".error-message").unwrap().unwrap();
        // rendered as text, never parsed as markup
        assert_eq!(error.text_content().as_deref(), Some("<b>Invalid email</b>"));
        assert_eq!(error.child_element_count(), 0);

        show(&view, &UiState::Loading);
        assert!(!has_class(&form, ".error-message"));
    }

    #[wasm_bindgen_test]
    fn attaching_clears_stale_indicators() {
        let form = contact_form(r#"action="forms/contact.php""#);
        for selector in [".loading", ".sent-message", ".error-message"] {
            let element = form.query_selector(selector).unwrap().unwrap();
            element.class_list().add_1("d-block").unwrap();
        }

        attach(form.clone(), FormConfig::default()).unwrap();

        assert!(!has_class(&form, ".loading"));
        assert!(!has_class(&form, ".sent-message"));
        assert!(!has_class(&form, ".error-message"));
    }

    #[wasm_bindgen_test]
    fn token_field_lands_in_form_data() {
        let mut payload = payload();
        payload.set_field("recaptcha-response", "tok");
        assert_eq!(payload.0.get("recaptcha-response").as_string().as_deref(), Some("tok"));
        assert_eq!(payload.0.get("name").as_string().as_deref(), Some("Ada"));
    }

    #[wasm_bindgen_test]
    async fn missing_action_never_reaches_network() {
        let form = contact_form("");
        let view = DomForm::new(form.clone(), FormConfig::default());
        let transport = FetchTransport::new(&FormConfig::default());

        let result = submit::submit(&view, &transport, &Recaptcha, &FormConfig::default()).await;

        assert_eq!(result, Err(FormError::MissingAction));
        let error = form.query_selector(".error-message").unwrap().unwrap();
        assert_eq!(
            error.text_content().as_deref(),
            Some("The form action property is not set!")
        );
    }

    #[wasm_bindgen_test]
    async fn post_sends_scripted_header_and_reads_reply() {
        let _fetch = answer_with(200, "OK", "OK");
        let transport = FetchTransport::new(&FormConfig::default());

        let reply = transport.post("/forms/contact.php", payload()).await.unwrap();

        assert_eq!(reply.status, 200);
        assert_eq!(reply.status_text, "OK");
        assert!(reply.url.ends_with("/forms/contact.php"), "url was {}", reply.url);
        assert_eq!(reply.body, "OK");
        assert_eq!(
            window_value(&["__contactRequest", "method"]).as_string().as_deref(),
            Some("POST")
        );
        assert_eq!(
            window_value(&["__contactRequest", "scripted"]).as_string().as_deref(),
            Some("XMLHttpRequest")
        );
    }

    #[wasm_bindgen_test]
    async fn failed_status_leaves_body_unread() {
        let _fetch = answer_with(500, "Internal Server Error", r#"{"message":"stack trace"}"#);
        let transport = FetchTransport::new(&FormConfig::default());

        let reply = transport.post("/forms/contact.php", payload()).await.unwrap();

        assert_eq!(reply.status, 500);
        assert_eq!(reply.status_text, "Internal Server Error");
        assert_eq!(reply.body, "");
        assert_eq!(
            window_value(&["__contactResponse", "bodyUsed"]).as_bool(),
            Some(false)
        );
    }

    #[wasm_bindgen_test]
    async fn rejected_fetch_shows_browser_message() {
        let _fetch =
            StubbedFetch::install("return Promise.reject(new TypeError('Failed to fetch'));");
        let form = contact_form(r#"action="/forms/contact.php""#);
        let view = DomForm::new(form.clone(), FormConfig::default());
        let transport = FetchTransport::new(&FormConfig::default());

        let result = submit::submit(&view, &transport, &Recaptcha, &FormConfig::default()).await;

        assert_eq!(result, Err(FormError::Network("Failed to fetch".to_string())));
        let error = form.query_selector(".error-message").unwrap().unwrap();
        assert_eq!(error.text_content().as_deref(), Some("Failed to fetch"));
    }
}
