//! The polling loop that drives the pipeline.

use std::time::Duration;

use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, info, instrument, warn};

use crate::{
    base::event::RawEvent,
    interaction::{directory::Directory, event_filter::filter_events, mention::MentionDetector, responder::Responder, selector::{Selection, Selector}},
    service::chat::ChatClient,
};

/// Routes each pulled batch through filter, mention check, selector and responder.
///
/// Owns the directory cache and the random source; there is a single thread of
/// control, so neither needs locking.
pub struct Dispatcher<R = StdRng> {
    chat: ChatClient,
    mention: MentionDetector,
    selector: Selector,
    responder: Responder,
    directory: Directory,
    rng: R,
}

impl Dispatcher<StdRng> {
    pub fn new(chat: ChatClient, mention: MentionDetector, selector: Selector, directory: Directory) -> Self {
        Self::with_rng(chat, mention, selector, directory, StdRng::from_entropy())
    }
}

impl<R> Dispatcher<R>
where
    R: rand::Rng + Send,
{
    pub fn with_rng(chat: ChatClient, mention: MentionDetector, selector: Selector, directory: Directory, rng: R) -> Self {
        let responder = Responder::new(chat.clone());

        Self {
            chat,
            mention,
            selector,
            responder,
            directory,
            rng,
        }
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Handle one batch of raw events. Returns how many replies were sent.
    #[instrument(skip_all, fields(batch = batch.len()))]
    pub async fn handle_batch(&mut self, batch: &[RawEvent]) -> usize {
        let mut replies = 0;

        for message in filter_events(batch) {
            if !self.mention.is_addressed_to_bot(&message) {
                continue;
            }

            debug!("Addressed in {}: {}", message.channel, message.text);

            match self.selector.pick(&message.channel, &mut self.directory, &mut self.rng).await {
                Selection::Picked { name, .. } => {
                    self.responder.reply(&message.channel, &name).await;
                    replies += 1;
                }
                Selection::EmptyPool => {
                    warn!("No eligible members in {}; not responding.", message.channel);
                }
            }
        }

        replies
    }

    /// Pull, handle, sleep; forever.
    pub async fn run(&mut self, interval: Duration) {
        info!("Dispatch loop running; polling every {:?}.", interval);

        loop {
            let batch = self.chat.pull_events().await;

            if !batch.is_empty() {
                self.handle_batch(&batch).await;
            }

            tokio::time::sleep(interval).await;
        }
    }
}
