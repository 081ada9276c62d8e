//! Detects messages addressed to the bot.

use crate::base::event::MessageEvent;

/// Matches messages that open with the bot's mention token, e.g. `<@U3M4U1QUD>`.
#[derive(Debug, Clone)]
pub struct MentionDetector {
    token: String,
}

impl MentionDetector {
    pub fn new(bot_id: &str) -> Self {
        Self { token: mention_token(bot_id) }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Strict prefix match; a mention anywhere else in the text does not count.
    pub fn is_addressed_to_bot(&self, event: &MessageEvent) -> bool {
        event.text.starts_with(&self.token)
    }
}

/// Slack's mention syntax for a user ID.
pub fn mention_token(user_id: &str) -> String {
    format!("<@{}>", user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(text: &str) -> MessageEvent {
        MessageEvent {
            text: text.to_string(),
            channel: "C1".to_string(),
        }
    }

    #[test]
    fn prefix_mention_is_addressed() {
        let detector = MentionDetector::new("B1");

        assert_eq!(detector.token(), "<@B1>");
        assert!(detector.is_addressed_to_bot(&event("<@B1> hello")));
        assert!(detector.is_addressed_to_bot(&event("<@B1>")));
    }

    #[test]
    fn other_mentions_are_not_addressed() {
        let detector = MentionDetector::new("B1");

        assert!(!detector.is_addressed_to_bot(&event("hi <@B1>")));
        assert!(!detector.is_addressed_to_bot(&event(" <@B1> hello")));
        assert!(!detector.is_addressed_to_bot(&event("<@B2> hello")));
        assert!(!detector.is_addressed_to_bot(&event("<@b1> hello")));
        assert!(!detector.is_addressed_to_bot(&event("")));
    }
}
