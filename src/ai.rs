use crate::error::AIError;
use crate::prompt;
use crate::scenario::Scenario;
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
};
use serde::{Deserialize, Serialize};
use std::future::Future;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_MAX_TOKENS: u32 = 150;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    System,
    User,
    Host,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatTurn>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Anything able to turn a role-tagged conversation into the host's next utterance.
pub trait CompletionBackend: Send + Sync {
    /// Resolves to the text of the first candidate, `None` when the answer carries no text.
    fn complete(
        &self,
        request: CompletionRequest,
    ) -> impl Future<Output = Result<Option<String>, AIError>> + Send;
}

#[derive(Debug, Clone)]
pub struct OpenAIBackend {
    client: Client<OpenAIConfig>,
}

impl OpenAIBackend {
    pub fn new(api_key: &str, base_url: &str) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);
        Self {
            client: Client::with_config(openai_config),
        }
    }

    fn to_openai_message(turn: &ChatTurn) -> Result<ChatCompletionRequestMessage, AIError> {
        let message = match turn.role {
            Role::System => ChatCompletionRequestSystemMessageArgs::default()
                .content(turn.content.as_str())
                .build()?
                .into(),
            Role::User => ChatCompletionRequestUserMessageArgs::default()
                .content(turn.content.as_str())
                .build()?
                .into(),
            Role::Host => ChatCompletionRequestAssistantMessageArgs::default()
                .content(turn.content.as_str())
                .build()?
                .into(),
        };
        Ok(message)
    }
}

impl CompletionBackend for OpenAIBackend {
    #[allow(deprecated)]
    async fn complete(&self, request: CompletionRequest) -> Result<Option<String>, AIError> {
        let messages = request
            .messages
            .iter()
            .map(Self::to_openai_message)
            .collect::<Result<Vec<_>, _>>()?;

        // `max_tokens` is what OpenAI-compatible third-party endpoints still understand.
        let openai_request = CreateChatCompletionRequestArgs::default()
            .model(request.model)
            .messages(messages)
            .max_tokens(request.max_tokens)
            .temperature(request.temperature)
            .build()?;

        let response = self.client.chat().create(openai_request).await?;
        Ok(response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelayOptions {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for RelayOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// System turn, then the prior transcript alternating user/host by position, then the question.
pub fn build_messages(system_prompt: String, prior: &[String], question: &str) -> Vec<ChatTurn> {
    let mut messages = Vec::with_capacity(prior.len() + 2);
    messages.push(ChatTurn::new(Role::System, system_prompt));
    messages.extend(prior.iter().enumerate().map(|(index, text)| {
        let role = if index % 2 == 0 { Role::User } else { Role::Host };
        ChatTurn::new(role, text.as_str())
    }));
    messages.push(ChatTurn::new(Role::User, question));
    messages
}

/// Asks the completion backend for the host's next line. Always answers something.
#[derive(Debug)]
pub struct ChatRelay<B> {
    backend: B,
    options: RelayOptions,
}

impl<B: CompletionBackend> ChatRelay<B> {
    pub fn new(backend: B, options: RelayOptions) -> Self {
        Self { backend, options }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn request_for(
        &self,
        question: &str,
        scenario: &Scenario,
        prior: &[String],
    ) -> CompletionRequest {
        CompletionRequest {
            model: self.options.model.clone(),
            messages: build_messages(prompt::system_prompt(scenario), prior, question),
            max_tokens: self.options.max_tokens,
            temperature: self.options.temperature,
        }
    }

    pub async fn ask(&self, question: &str, scenario: &Scenario, prior: &[String]) -> String {
        let request = self.request_for(question, scenario, prior);
        log::debug!(
            "Asking host about '{}' ({} prior turns)",
            scenario.title,
            prior.len()
        );
        match self.backend.complete(request).await {
            Ok(Some(text)) => text,
            Ok(None) => {
                log::warn!("Completion backend returned no text");
                prompt::NO_ANSWER.to_string()
            }
            Err(e) => {
                log::error!("OpenAI API Error: {e:#}");
                prompt::fallback_reply(question).to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_alternate_by_position() {
        let prior: Vec<String> = ["a", "b", "c", "d", "e"].map(String::from).to_vec();
        let messages = build_messages("sys".into(), &prior, "q");

        assert_eq!(messages.len(), prior.len() + 2);
        assert_eq!(messages[0], ChatTurn::new(Role::System, "sys"));
        for (index, turn) in messages[1..=prior.len()].iter().enumerate() {
            let expected = if index % 2 == 0 { Role::User } else { Role::Host };
            assert_eq!(turn.role, expected);
            assert_eq!(turn.content, prior[index]);
        }
        assert_eq!(messages.last(), Some(&ChatTurn::new(Role::User, "q")));
    }

    #[test]
    fn roles_ignore_content() {
        let prior: Vec<String> = vec!["是".into(), "是".into()];
        let messages = build_messages(String::new(), &prior, "是");
        let roles: Vec<Role> = messages.iter().map(|turn| turn.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Host, Role::User]);
    }
}
