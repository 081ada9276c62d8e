//! Sends replies back to the originating channel.

use tracing::{error, instrument};

use crate::service::chat::ChatClient;

pub struct Responder {
    chat: ChatClient,
}

impl Responder {
    pub fn new(chat: ChatClient) -> Self {
        Self { chat }
    }

    /// Post `text` to `channel` as the bot. Failures are logged and not retried.
    #[instrument(skip(self))]
    pub async fn reply(&self, channel: &str, text: &str) {
        if let Err(err) = self.chat.post_message(channel, text).await {
            error!("Error while replying to {}: {}", channel, err);
        }
    }
}
