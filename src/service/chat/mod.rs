//! Chat service integration for the bot.
//!
//! This module provides functionality for interacting with chat platforms like Slack:
//! - Receiving realtime events
//! - Looking up users and channel membership
//! - Sending messages
//!
//! It defines the `GenericChatClient` trait that can be implemented for different
//! chat services, with a default implementation for Slack.

pub mod slack;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::{
    event::RawEvent,
    types::{DirectoryUser, Lookup, Res, Void},
};

// Traits.

/// Generic "chat" trait that clients must implement.
///
/// This trait bundles every platform collaborator the pipeline talks to:
/// the realtime transport, the user directory, channel membership, and
/// outbound messages.
#[async_trait]
pub trait GenericChatClient: Send + Sync + 'static {
    /// Open the realtime connection.
    ///
    /// An error here is fatal at startup; nothing is retried.
    async fn connect(&self) -> Void;

    /// Take every event received since the last pull.
    ///
    /// Never blocks waiting for new events; an empty batch is normal.
    async fn pull_events(&self) -> Vec<RawEvent>;

    /// List every user in the workspace.
    async fn list_all_users(&self) -> Res<Vec<DirectoryUser>>;

    /// Look up a single user by ID.
    async fn get_user(&self, user_id: &str) -> Lookup<DirectoryUser>;

    /// Get the IDs of every member of a channel.
    async fn get_channel_members(&self, channel_id: &str) -> Lookup<Vec<String>>;

    /// Post a message to a channel as the bot.
    async fn post_message(&self, channel_id: &str, text: &str) -> Void;
}

// Structs.

/// Chat client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<dyn GenericChatClient>,
}

impl Deref for ChatClient {
    type Target = dyn GenericChatClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ChatClient {
    pub fn new(inner: Arc<dyn GenericChatClient>) -> Self {
        Self { inner }
    }
}
