use log::Level;

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug // Verbose state transitions when running locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

/// Hero video overlay settings.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayConfig {
    /// CSS custom property written on `document.documentElement`.
    pub css_variable: &'static str,
    /// Window event re-broadcast on every change.
    pub change_event: &'static str,
    pub initial_opacity: u8,
    /// Default animation length in milliseconds.
    pub default_duration_ms: f64,
    /// Globals published for other page scripts.
    pub instance_global: &'static str,
    pub class_global: &'static str,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            css_variable: "--video-opacity",
            change_event: "videoOpacityChanged",
            initial_opacity: 70,
            default_duration_ms: 500.0,
            instance_global: "videoTransparency",
            class_global: "VideoTransparencyController",
        }
    }
}

/// Contact form conventions shared by every form on the site.
#[derive(Clone, Debug, PartialEq)]
pub struct FormConfig {
    pub form_selector: &'static str,
    pub loading_selector: &'static str,
    pub sent_selector: &'static str,
    pub error_selector: &'static str,
    /// Class that makes an indicator visible.
    pub visible_class: &'static str,
    pub site_key_attribute: &'static str,
    pub challenge_action: &'static str,
    pub token_field: &'static str,
    pub scripted_header: (&'static str, &'static str),
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            form_selector: ".php-email-form",
            loading_selector: ".loading",
            sent_selector: ".sent-message",
            error_selector: ".error-message",
            visible_class: "d-block",
            site_key_attribute: "data-recaptcha-site-key",
            challenge_action: "php_email_form_submit",
            token_field: "recaptcha-response",
            scripted_header: ("X-Requested-With", "XMLHttpRequest"),
        }
    }
}
