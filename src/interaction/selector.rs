//! Eeny, meeny, miny, moe: picks a random non-bot member of a channel.

use std::collections::HashSet;

use rand::{Rng, seq::SliceRandom};
use tracing::{info, instrument, warn};

use crate::{base::types::Lookup, interaction::{directory::Directory, mention::mention_token}, service::chat::ChatClient};

/// Result of one pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A member was chosen.
    Picked { id: String, name: String },
    /// Every member is a known bot, or the channel had no members.
    EmptyPool,
}

pub struct Selector {
    chat: ChatClient,
    known_bots: HashSet<String>,
}

impl Selector {
    pub fn new(chat: ChatClient, known_bots: HashSet<String>) -> Self {
        Self { chat, known_bots }
    }

    pub fn known_bots(&self) -> &HashSet<String> {
        &self.known_bots
    }

    /// Members of `channel` that are not known bots.
    ///
    /// A failed or empty membership lookup yields an empty pool.
    #[instrument(skip(self))]
    pub async fn eligible_members(&self, channel: &str) -> Vec<String> {
        let members = match self.chat.get_channel_members(channel).await {
            Lookup::Found(members) => members,
            Lookup::NotFound => {
                warn!("Channel {} not found.", channel);
                Vec::new()
            }
            Lookup::Failed(err) => {
                warn!("Failed to get members of {}: {}", channel, err);
                Vec::new()
            }
        };

        members.into_iter().filter(|id| !self.known_bots.contains(id)).collect()
    }

    /// Pick one eligible member of `channel` uniformly at random and resolve their name.
    ///
    /// When the directory has no name for the chosen member, the mention token is
    /// used instead so the reply is never blank.
    #[instrument(skip(self, directory, rng))]
    pub async fn pick<R>(&self, channel: &str, directory: &mut Directory, rng: &mut R) -> Selection
    where
        R: Rng + Send + ?Sized,
    {
        let eligible = self.eligible_members(channel).await;

        let Some(id) = eligible.choose(rng).cloned() else {
            return Selection::EmptyPool;
        };

        let mut name = directory.resolve(&id).await;
        if name.is_empty() {
            name = mention_token(&id);
        }

        info!("Picked {} ({}) out of {} members.", name, id, eligible.len());

        Selection::Picked { id, name }
    }
}
