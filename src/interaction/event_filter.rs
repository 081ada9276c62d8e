//! Validation and classification of raw realtime events.

use tracing::{debug, warn};

use crate::base::event::{EventKind, MessageEvent, RawEvent};

/// What the filter decided about a single raw event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    /// A well-formed user message.
    Message(MessageEvent),
    /// No type tag, so the format is unknown.
    Untyped,
    /// Type tag outside the known set.
    Unknown(String),
    /// A known kind the bot does not act on.
    Ignored(EventKind),
    /// A `message` without text or channel.
    Malformed,
}

/// Decide what to do with one event.
pub fn classify(event: &RawEvent) -> Classified {
    let Some(tag) = event.kind.as_deref() else {
        return Classified::Untyped;
    };

    let kind = match tag.parse::<EventKind>() {
        Ok(kind) => kind,
        Err(_) => return Classified::Unknown(tag.to_string()),
    };

    if kind != EventKind::Message {
        return Classified::Ignored(kind);
    }

    match (&event.text, &event.channel) {
        (Some(text), Some(channel)) => Classified::Message(MessageEvent {
            text: text.clone(),
            channel: channel.clone(),
        }),
        _ => Classified::Malformed,
    }
}

/// Keep the well-formed user messages of a batch, in stream order.
pub fn filter_events(batch: &[RawEvent]) -> Vec<MessageEvent> {
    batch
        .iter()
        .filter_map(|event| match classify(event) {
            Classified::Message(message) => Some(message),
            Classified::Unknown(tag) => {
                warn!("Unknown event type {}: {:?}", tag, event);
                None
            }
            Classified::Ignored(kind) => {
                debug!("Ignoring {} event.", kind);
                None
            }
            Classified::Untyped | Classified::Malformed => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(text: &str, channel: &str) -> MessageEvent {
        MessageEvent {
            text: text.to_string(),
            channel: channel.to_string(),
        }
    }

    fn raw_message(text: &str, channel: &str) -> RawEvent {
        RawEvent {
            kind: Some(EventKind::Message.to_string()),
            text: Some(text.to_string()),
            channel: Some(channel.to_string()),
            ..Default::default()
        }
    }

    fn raw_kind(kind: &str) -> RawEvent {
        RawEvent {
            kind: Some(kind.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn empty_batch_yields_nothing() {
        assert!(filter_events(&[]).is_empty());
    }

    #[test]
    fn untyped_events_are_dropped_wherever_they_appear() {
        let untyped = RawEvent {
            text: Some("<@B1> hi".to_string()),
            channel: Some("C1".to_string()),
            ..Default::default()
        };

        assert_eq!(classify(&untyped), Classified::Untyped);

        let batches = [
            vec![untyped.clone(), raw_message("a", "C1")],
            vec![raw_message("a", "C1"), untyped.clone()],
            vec![untyped.clone(), untyped],
        ];

        let expected = [vec![message("a", "C1")], vec![message("a", "C1")], vec![]];

        for (batch, expected) in batches.iter().zip(expected) {
            assert_eq!(filter_events(batch), expected);
        }
    }

    #[test]
    fn known_non_message_kinds_are_ignored() {
        for kind in EventKind::ALL.into_iter().filter(|k| *k != EventKind::Message) {
            let mut event = raw_kind(kind.as_str());
            event.text = Some("text".to_string());
            event.channel = Some("C1".to_string());

            assert_eq!(classify(&event), Classified::Ignored(kind));
            assert!(filter_events(&[event]).is_empty());
        }
    }

    #[test]
    fn unknown_kinds_are_reported_and_dropped() {
        let event = raw_kind("app_mention");

        assert_eq!(classify(&event), Classified::Unknown("app_mention".to_string()));
        assert!(filter_events(&[event]).is_empty());
    }

    #[test]
    fn messages_need_text_and_channel() {
        let mut no_text = raw_message("x", "C1");
        no_text.text = None;
        let mut no_channel = raw_message("x", "C1");
        no_channel.channel = None;

        assert_eq!(classify(&no_text), Classified::Malformed);
        assert_eq!(classify(&no_channel), Classified::Malformed);
        assert!(filter_events(&[no_text, no_channel]).is_empty());
    }

    #[test]
    fn stream_order_is_preserved() {
        let batch = vec![
            raw_message("first", "C1"),
            raw_kind("hello"),
            raw_message("second", "C2"),
            raw_kind("something_new"),
            raw_message("third", "C1"),
        ];

        assert_eq!(filter_events(&batch), vec![message("first", "C1"), message("second", "C2"), message("third", "C1")]);
    }
}
