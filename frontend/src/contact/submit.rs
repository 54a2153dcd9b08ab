use log::{debug, info, warn};

use super::errors::FormError;
use super::response::{self, Verdict};
use crate::config::FormConfig;

/// Multipart body under construction; setting a name replaces earlier values.
pub trait FormPayload {
    fn set_field(&mut self, name: &str, value: &str);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Indicator {
    Loading,
    Sent,
    Error,
}

/// The part of one form the handler reads from and writes to.
pub trait FormView {
    type Payload: FormPayload;

    fn action(&self) -> Option<String>;
    fn site_key(&self) -> Option<String>;
    fn payload(&self) -> Result<Self::Payload, FormError>;
    fn set_indicator(&self, indicator: Indicator, visible: bool);
    fn set_error_text(&self, text: &str);
    fn reset(&self);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub status_text: String,
    pub url: String,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..400).contains(&self.status)
    }
}

#[allow(async_fn_in_trait)]
pub trait Transport {
    type Payload;

    async fn post(&self, url: &str, payload: Self::Payload) -> Result<HttpReply, FormError>;
}

/// Bot-mitigation service handing out one-time tokens.
#[allow(async_fn_in_trait)]
pub trait Challenge {
    fn is_available(&self) -> bool;
    async fn token(&self, site_key: &str, action: &str) -> Result<String, FormError>;
}

/// What the visitor sees on the form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiState {
    Idle,
    Loading,
    Sent,
    ErrorShown(String),
}

pub fn show<V: FormView>(view: &V, state: &UiState) {
    match state {
        UiState::Idle => {
            view.set_indicator(Indicator::Loading, false);
            view.set_indicator(Indicator::Sent, false);
            view.set_indicator(Indicator::Error, false);
        }
        UiState::Loading => {
            view.set_indicator(Indicator::Loading, true);
            view.set_indicator(Indicator::Error, false);
            view.set_indicator(Indicator::Sent, false);
        }
        UiState::Sent => {
            view.set_indicator(Indicator::Loading, false);
            view.set_indicator(Indicator::Sent, true);
            view.reset();
        }
        UiState::ErrorShown(message) => {
            view.set_indicator(Indicator::Loading, false);
            view.set_error_text(message);
            view.set_indicator(Indicator::Error, true);
        }
    }
}

/// Runs one intercepted submission through to its terminal UI state.
///
/// The returned result mirrors what was shown on the form.
pub async fn submit<V, T, C>(
    view: &V,
    transport: &T,
    challenge: &C,
    config: &FormConfig,
) -> Result<(), FormError>
where
    V: FormView,
    T: Transport<Payload = V::Payload>,
    C: Challenge,
{
    show(view, &UiState::Loading);

    let result = deliver(view, transport, challenge, config).await;
    match &result {
        Ok(()) => {
            info!("Form submission accepted");
            show(view, &UiState::Sent);
        }
        Err(e) => {
            warn!("Form submission failed: {}", e);
            show(view, &UiState::ErrorShown(e.user_message()));
        }
    }
    result
}

async fn deliver<V, T, C>(
    view: &V,
    transport: &T,
    challenge: &C,
    config: &FormConfig,
) -> Result<(), FormError>
where
    V: FormView,
    T: Transport<Payload = V::Payload>,
    C: Challenge,
{
    debug!("Submission intercepted");
    let action = view
        .action()
        .filter(|action| !action.is_empty())
        .ok_or(FormError::MissingAction)?;
    let mut payload = view.payload()?;

    if let Some(site_key) = view.site_key().filter(|key| !key.is_empty()) {
        debug!("Waiting for challenge token");
        if !challenge.is_available() {
            return Err(FormError::ChallengeUnavailable);
        }
        let token = challenge.token(&site_key, config.challenge_action).await?;
        payload.set_field(config.token_field, &token);
    }

    debug!("Posting submission to {}", action);
    let reply = transport.post(&action, payload).await?;
    if !reply.is_success() {
        return Err(FormError::Status {
            status: reply.status,
            status_text: reply.status_text,
            url: reply.url,
        });
    }

    match response::interpret(&reply.body) {
        Verdict::Accepted => Ok(()),
        Verdict::Rejected(message) => Err(FormError::Rejected { message, action }),
    }
}
