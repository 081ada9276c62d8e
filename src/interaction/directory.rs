//! Process-lifetime cache of user display names.

use std::collections::{HashMap, HashSet};

use tracing::{info, instrument, warn};

use crate::{base::types::Lookup, service::chat::ChatClient};

/// Maps user IDs to display names.
///
/// Seeded once from the full user list, then filled in as unknown IDs are
/// resolved. Entries are never evicted or overwritten.
pub struct Directory {
    chat: ChatClient,
    names: HashMap<String, String>,
}

impl Directory {
    pub fn new(chat: ChatClient) -> Self {
        Self { chat, names: HashMap::new() }
    }

    /// Fetch every user in the workspace as an `id -> name` mapping.
    ///
    /// A failed call is logged and yields an empty mapping.
    #[instrument(skip_all)]
    pub async fn bulk_load(&self) -> HashMap<String, String> {
        match self.chat.list_all_users().await {
            Ok(users) => users.into_iter().map(|user| (user.id, user.name)).collect(),
            Err(err) => {
                warn!("Failed to list users: {}", err);
                HashMap::new()
            }
        }
    }

    /// Merge a mapping into the cache without touching existing entries.
    pub fn seed(&mut self, mapping: HashMap<String, String>) {
        for (id, name) in mapping {
            self.names.entry(id).or_insert(name);
        }

        info!("Directory holds {} users.", self.names.len());
    }

    /// Display name for `id`, looking it up on a miss.
    ///
    /// Returns an empty string when the user cannot be found; misses are not cached.
    #[instrument(skip(self))]
    pub async fn resolve(&mut self, id: &str) -> String {
        if let Some(name) = self.names.get(id) {
            return name.clone();
        }

        match self.chat.get_user(id).await {
            Lookup::Found(user) => {
                self.names.entry(id.to_string()).or_insert(user.name).clone()
            }
            Lookup::NotFound => {
                warn!("User {} not found.", id);
                String::new()
            }
            Lookup::Failed(err) => {
                warn!("Failed to look up user {}: {}", id, err);
                String::new()
            }
        }
    }

    /// IDs of every cached user whose name is in `names`.
    pub fn ids_named(&self, names: &[String]) -> HashSet<String> {
        self.names.iter().filter(|(_, name)| names.contains(name)).map(|(id, _)| id.clone()).collect()
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
