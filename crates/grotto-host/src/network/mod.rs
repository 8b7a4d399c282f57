//! Chat-completion client for the narrator.

use std::time::Duration;

use grotto_core::dialog::{
    ErrorClass, NarrationRequest, NarrativeService, ServiceError,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use ureq::Agent;

use crate::config::HostConfig;

const AUTHORIZATION: &str = "Authorization";
const BEARER: &str = "Bearer ";

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    frequency_penalty: f32,
}

impl<'a> ChatRequest<'a> {
    fn from_narration(request: &'a NarrationRequest) -> Self {
        Self {
            model: &request.sampling.model,
            messages: request
                .turns
                .iter()
                .map(|turn| WireMessage {
                    role: turn.role.wire_name(),
                    content: &turn.content,
                })
                .collect(),
            temperature: request.sampling.temperature,
            frequency_penalty: request.sampling.frequency_penalty,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Blocking client. Runs on the narrator worker thread.
pub struct ChatClient {
    agent: Agent,
    url: String,
    api_key: String,
}

impl ChatClient {
    pub fn new(config: &HostConfig) -> Self {
        Self::with_timeout(&config.api_url, &config.api_key, config.request_timeout)
    }

    pub fn with_timeout(url: &str, api_key: &str, timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            url: url.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

impl NarrativeService for ChatClient {
    fn narrate(&mut self, request: &NarrationRequest) -> Result<String, ServiceError> {
        let body = ChatRequest::from_narration(request);
        let mut authorization = String::from(BEARER);
        authorization.push_str(&self.api_key);

        info!("narrator: POST {} ({} messages)", self.url, body.messages.len());
        let response = self
            .agent
            .post(&self.url)
            .set(AUTHORIZATION, &authorization)
            .send_json(&body)
            .map_err(classify_ureq_error)?;

        let text = response
            .into_string()
            .map_err(|err| ServiceError::recoverable(format!("reading body: {err}")))?;
        debug!("narrator: {} byte reply", text.len());
        extract_content(&text)
    }
}

/// Pulls `choices[0].message.content` out of a response body.
fn extract_content(body: &str) -> Result<String, ServiceError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|err| ServiceError::fatal(format!("malformed response: {err}")))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or_else(|| ServiceError::fatal("response has no choices[0].message.content"))
}

/// Rate limiting, server faults, and request timeouts are worth retrying.
pub fn classify_status(code: u16) -> ErrorClass {
    match code {
        408 | 429 | 500..=599 => ErrorClass::Recoverable,
        _ => ErrorClass::Fatal,
    }
}

fn classify_ureq_error(err: ureq::Error) -> ServiceError {
    match err {
        ureq::Error::Status(code, response) => {
            let detail = response.into_string().unwrap_or_default();
            let reason = format!("HTTP {code}: {}", detail.trim());
            match classify_status(code) {
                ErrorClass::Recoverable => ServiceError::recoverable(reason),
                ErrorClass::Fatal => ServiceError::fatal(reason),
            }
        }
        ureq::Error::Transport(transport) => match transport.kind() {
            ureq::ErrorKind::InvalidUrl
            | ureq::ErrorKind::UnknownScheme
            | ureq::ErrorKind::InvalidProxyUrl
            | ureq::ErrorKind::InsecureRequestHttpsOnly => ServiceError::fatal(transport.to_string()),
            _ => ServiceError::recoverable(transport.to_string()),
        },
    }
}
