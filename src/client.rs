// src/client.rs
use crate::{
    api::{ChatRequest, ChatResponse, ConfigResponse},
    error::AIError,
    prompt,
    scenario::Scenario,
};
use strum_macros::Display;

/// What the client learned from `/api/config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum BackendStatus {
    #[strum(to_string = "live")]
    Live,
    // Reachable, but the proxy has no completion credential.
    #[strum(to_string = "demo")]
    Demo,
    #[strum(to_string = "unreachable")]
    Unreachable,
}

impl BackendStatus {
    pub fn is_live(self) -> bool {
        self == BackendStatus::Live
    }
}

/// Talks to the completion proxy on behalf of the terminal client.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    http: reqwest::Client,
    base_url: String,
}

impl ProxyClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn config(&self) -> Result<ConfigResponse, reqwest::Error> {
        self.http
            .get(self.endpoint("/api/config"))
            .send()
            .await?
            .error_for_status()?
            .json::<ConfigResponse>()
            .await
    }

    pub async fn probe(&self) -> BackendStatus {
        match self.config().await {
            Ok(config) if config.openai_configured => BackendStatus::Live,
            Ok(config) => {
                log::info!(
                    "Proxy at {} has no completion credential ({})",
                    self.base_url,
                    config.environment
                );
                BackendStatus::Demo
            }
            Err(e) => {
                log::warn!("Proxy at {} unreachable: {e}", self.base_url);
                BackendStatus::Unreachable
            }
        }
    }

    async fn post_chat(&self, request: &ChatRequest) -> Result<String, AIError> {
        let response = self
            .http
            .post(self.endpoint("/api/chat"))
            .json(request)
            .send()
            .await
            .map_err(|e| AIError::Backend(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(AIError::Status(status.as_u16()));
        }
        let body = response
            .json::<ChatResponse>()
            .await
            .map_err(|e| AIError::Backend(e.to_string()))?;
        Ok(body.response)
    }

    /// Never fails: transport or proxy errors turn into the static fallback reply.
    pub async fn ask(&self, question: &str, scenario: &Scenario, history: Vec<String>) -> String {
        let request = ChatRequest::new(question, scenario, history);
        match self.post_chat(&request).await {
            Ok(response) => response,
            Err(e) => {
                log::error!("Error getting AI response: {e:#}");
                prompt::fallback_reply(question).to_string()
            }
        }
    }
}
