// src/session.rs
use crate::{app_state::Page, message::Message, prompt, scenario::Scenario};

pub const DEFAULT_PASSWORD: &str = "turtle123";

/// Everything one player session knows: the login flag, the scenario being played
/// and the transcript. Lives in memory for the duration of the session only.
#[derive(Debug, Clone)]
pub struct Session {
    password: String,
    is_authenticated: bool,
    current_scenario: Option<Scenario>,
    transcript: Vec<Message>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_PASSWORD)
    }
}

impl Session {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            is_authenticated: false,
            current_scenario: None,
            transcript: Vec::new(),
        }
    }

    /// Plain equality against the configured secret. A failed attempt changes nothing.
    pub fn login(&mut self, password: &str) -> bool {
        let is_valid = password == self.password;
        if is_valid {
            self.is_authenticated = true;
        }
        is_valid
    }

    pub fn logout(&mut self) {
        self.is_authenticated = false;
        self.reset_scenario();
    }

    pub fn select_scenario(&mut self, scenario: Scenario) {
        self.transcript = vec![Message::host(prompt::welcome_message(&scenario))];
        self.current_scenario = Some(scenario);
    }

    pub fn append_message(&mut self, content: impl Into<String>, is_user: bool) -> &Message {
        self.transcript.push(Message::new(content, is_user));
        &self.transcript[self.transcript.len() - 1]
    }

    pub fn clear_transcript(&mut self) {
        self.transcript.clear();
    }

    pub fn reset_scenario(&mut self) {
        self.current_scenario = None;
        self.transcript.clear();
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    pub fn current_scenario(&self) -> Option<&Scenario> {
        self.current_scenario.as_ref()
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn page(&self) -> Page {
        Page::of(self)
    }

    // History sent along with a question: the transcript minus the leading welcome.
    // Call it before appending the new question.
    pub fn prior_transcript_texts(&self) -> Vec<String> {
        let skip = match self.transcript.first() {
            Some(first) if !first.is_user && first.content.starts_with(prompt::WELCOME_PREFIX) => 1,
            _ => 0,
        };
        self.transcript
            .iter()
            .skip(skip)
            .map(|message| message.content.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> Scenario {
        Scenario {
            id: "1".into(),
            title: "海龟汤".into(),
            description: "一个男人喝了一口汤".into(),
            answer: "真相".into(),
            key: "妻子".into(),
            hints: vec!["提示".into()],
        }
    }

    #[test]
    fn login_accepts_only_the_secret() {
        let mut session = Session::default();
        assert!(!session.login("turtle"));
        assert!(!session.is_authenticated());
        assert!(session.login("turtle123"));
        assert!(session.is_authenticated());
    }

    #[test]
    fn failed_login_keeps_existing_authentication() {
        let mut session = Session::new("secret");
        assert!(session.login("secret"));
        assert!(!session.login("wrong"));
        assert!(session.is_authenticated());
    }

    #[test]
    fn selecting_resets_transcript_to_welcome() {
        let mut session = Session::default();
        session.select_scenario(scenario());
        session.append_message("他是男人吗？", true);
        session.select_scenario(scenario());

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 1);
        assert!(!transcript[0].is_user);
        assert!(transcript[0].content.contains("海龟汤"));
        assert!(transcript[0].content.contains("一个男人喝了一口汤"));
    }

    #[test]
    fn append_is_strictly_append_only() {
        let mut session = Session::default();
        session.select_scenario(scenario());
        let before = session.transcript().to_vec();

        let appended = session.append_message("问题", true).clone();
        assert_eq!(session.transcript().len(), before.len() + 1);
        assert_eq!(&session.transcript()[..before.len()], before.as_slice());
        assert_eq!(session.transcript().last(), Some(&appended));

        session.append_message("是", false);
        let ids: Vec<_> = session.transcript().iter().map(|m| &m.id).collect();
        let mut unique = ids.clone();
        unique.dedup();
        assert_eq!(ids.len(), unique.len());
    }

    #[test]
    fn logout_clears_everything() {
        let mut session = Session::default();
        session.login("turtle123");
        session.select_scenario(scenario());
        session.logout();
        assert!(!session.is_authenticated());
        assert!(session.current_scenario().is_none());
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn prior_texts_skip_the_welcome() {
        let mut session = Session::default();
        session.select_scenario(scenario());
        session.append_message("q1", true);
        session.append_message("a1", false);
        assert_eq!(session.prior_transcript_texts(), vec!["q1", "a1"]);

        session.clear_transcript();
        assert!(session.prior_transcript_texts().is_empty());
    }
}
