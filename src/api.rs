// Wire bodies of the proxy endpoints.
use crate::scenario::Scenario;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub user_question: Option<String>,
    #[serde(default)]
    pub game: Option<Scenario>,
    #[serde(default)]
    pub chat_history: Vec<String>,
}

impl ChatRequest {
    pub fn new(question: &str, scenario: &Scenario, history: Vec<String>) -> Self {
        Self {
            user_question: Some(question.to_string()),
            game: Some(scenario.clone()),
            chat_history: history,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    pub openai_configured: bool,
    #[serde(rename = "baseURL")]
    pub base_url: String,
    pub environment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
