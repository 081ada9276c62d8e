//! Runtime services and shared state for the bot.

use tracing::{info, instrument};

use crate::{
    base::{
        config::Config,
        types::{Res, Void},
    },
    interaction::{directory::Directory, dispatch::Dispatcher, mention::MentionDetector, selector::Selector},
    service::chat::ChatClient,
};

/// Runtime service context.
///
/// This struct holds the chat client and configuration.
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The chat client instance.
    pub chat: ChatClient,
}

impl Runtime {
    /// Create a new runtime instance backed by Slack.
    #[instrument(skip_all)]
    pub fn new(config: Config) -> Res<Self> {
        let chat = ChatClient::slack(&config)?;

        Ok(Self { config, chat })
    }

    /// Seed the directory, work out the known bots, and connect.
    ///
    /// Any error here is fatal.
    #[instrument(skip_all)]
    pub async fn prepare(&self) -> Res<Dispatcher> {
        let mut directory = Directory::new(self.chat.clone());
        let mapping = directory.bulk_load().await;
        directory.seed(mapping);

        let mut known_bots = directory.ids_named(&self.config.all_known_bot_names());
        known_bots.insert(self.config.bot_id.clone());

        let mention = MentionDetector::new(&self.config.bot_id);
        let selector = Selector::new(self.chat.clone(), known_bots);

        info!("Excluding {} known bots from selection.", selector.known_bots().len());

        self.chat.connect().await?;

        Ok(Dispatcher::new(self.chat.clone(), mention, selector, directory))
    }

    /// Run the bot until Ctrl-C.
    pub async fn start(&self) -> Void {
        let mut dispatcher = self.prepare().await?;

        tokio::select! {
            _ = dispatcher.run(self.config.poll_interval()) => {}
            result = tokio::signal::ctrl_c() => {
                result?;
                info!("Shutting down ...");
            }
        }

        Ok(())
    }
}
