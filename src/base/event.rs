//! Realtime event records as they arrive from the chat platform.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A raw realtime event.
///
/// Only the fields the pipeline inspects are typed; everything else the
/// platform sends is kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Event type tags the bot knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Message sent by a user in a channel.
    Message,
    /// Issued after the bot connects.
    Hello,
    /// Pushed when a user has desktop notifications enabled.
    DesktopNotification,
    /// A user started typing in a channel.
    UserTyping,
    /// A user became active or went inactive.
    PresenceChange,
    /// Reconnection URL sent after connecting.
    ReconnectUrl,
}

impl EventKind {
    pub const ALL: [EventKind; 6] = [
        EventKind::Message,
        EventKind::Hello,
        EventKind::DesktopNotification,
        EventKind::UserTyping,
        EventKind::PresenceChange,
        EventKind::ReconnectUrl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Message => "message",
            EventKind::Hello => "hello",
            EventKind::DesktopNotification => "desktop_notification",
            EventKind::UserTyping => "user_typing",
            EventKind::PresenceChange => "presence_change",
            EventKind::ReconnectUrl => "reconnect_url",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a type tag is not in [`EventKind::ALL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEventKind(pub String);

impl fmt::Display for UnknownEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event type `{}`", self.0)
    }
}

impl std::error::Error for UnknownEventKind {}

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL.into_iter().find(|kind| kind.as_str() == s).ok_or_else(|| UnknownEventKind(s.to_string()))
    }
}

/// A well-formed user message: has both text and an originating channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEvent {
    pub text: String,
    pub channel: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_known_kind_parses_back() {
        for kind in EventKind::ALL {
            assert_eq!(kind.as_str().parse::<EventKind>(), Ok(kind));
        }
        assert_eq!("app_mention".parse::<EventKind>(), Err(UnknownEventKind("app_mention".into())));
    }

    #[test]
    fn raw_event_keeps_unknown_fields() {
        let event: RawEvent = serde_json::from_value(serde_json::json!({
            "type": "message",
            "text": "<@U3M4U1QUD> sup",
            "channel": "C1",
            "user": "U9",
            "ts": "1234567890.123456",
        }))
        .unwrap();

        assert_eq!(event.kind.as_deref(), Some("message"));
        assert_eq!(event.text.as_deref(), Some("<@U3M4U1QUD> sup"));
        assert_eq!(event.channel.as_deref(), Some("C1"));
        assert_eq!(event.extra.get("user"), Some(&Value::from("U9")));
    }

    #[test]
    fn raw_event_tolerates_missing_fields() {
        let event: RawEvent = serde_json::from_value(serde_json::json!({ "ts": "1" })).unwrap();

        assert!(event.kind.is_none());
        assert!(event.text.is_none());
        assert!(event.channel.is_none());
    }
}
