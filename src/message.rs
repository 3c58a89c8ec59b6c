use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub content: String,
    pub is_user: bool,
    pub timestamp: DateTime<Local>,
}

impl Message {
    pub fn new(content: impl Into<String>, is_user: bool) -> Self {
        Message {
            // v7 ids are time-ordered, so two messages in the same millisecond still differ.
            id: Uuid::now_v7().to_string(),
            content: content.into(),
            is_user,
            timestamp: Local::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(content, true)
    }

    pub fn host(content: impl Into<String>) -> Self {
        Self::new(content, false)
    }

    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_keep_their_timestamp_through_json() {
        let message = Message::user("他是男人吗？");
        let json = serde_json::to_string(&message).unwrap();
        let restored: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, message);
        assert_eq!(restored.time_label(), message.time_label());
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(Message::host("是").id, Message::host("是").id);
    }
}
