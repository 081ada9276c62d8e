//! Slack implementation of [`GenericChatClient`].
//!
//! Realtime events arrive over socket mode on background tasks and are buffered
//! in an unbounded channel until the dispatch loop pulls them. Every other call
//! goes through the Slack web API with the bot token.
//!
//! Subscribe the Slack app to `message.*` bot events only. Other event types,
//! `app_mention` included, reach the event filter as unknown kinds and are
//! logged and dropped.

use std::sync::Arc;

use async_trait::async_trait;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use slack_morphism::{errors::SlackClientError, prelude::*};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, instrument, warn};

use crate::base::{
    config::Config,
    event::RawEvent,
    types::{DirectoryUser, Lookup, Res, Void},
};

use super::{ChatClient, GenericChatClient};

// Type aliases.

type FullClient = slack_morphism::SlackClient<SlackClientHyperConnector<HttpsConnector<HttpConnector>>>;

/// Page size for paginated list calls.
const PAGE_LIMIT: u16 = 200;

// Extra methods on `ChatClient` applied by the slack implementation.

impl ChatClient {
    /// Creates a new Slack chat client.
    pub fn slack(config: &Config) -> Res<Self> {
        let client = SlackChatClient::new(config)?;
        Ok(Self::from(client))
    }
}

impl From<SlackChatClient> for ChatClient {
    fn from(client: SlackChatClient) -> Self {
        Self { inner: Arc::new(client) }
    }
}

// Structs.

/// User state for the slack socket client.
struct SlackUserState {
    events: mpsc::UnboundedSender<RawEvent>,
}

/// Slack client implementation.
pub struct SlackChatClient {
    app_token: SlackApiToken,
    bot_token: SlackApiToken,
    client: Arc<FullClient>,
    sender: mpsc::UnboundedSender<RawEvent>,
    receiver: Mutex<mpsc::UnboundedReceiver<RawEvent>>,
}

impl SlackChatClient {
    /// Create a new Slack chat client.
    #[instrument(name = "SlackChatClient::new", skip_all)]
    pub fn new(config: &Config) -> Res<Self> {
        // Initialize tokens.

        let app_token = SlackApiToken::new(SlackApiTokenValue(config.app_token.clone()));
        let bot_token = SlackApiToken::new(SlackApiTokenValue(config.bot_token.clone()));

        // Initialize the Slack client.

        let https_connector = HttpsConnector::<HttpConnector>::builder().with_native_roots()?.https_only().enable_all_versions().build();
        let connector = SlackClientHyperConnector::with_connector(https_connector);
        let client = Arc::new(slack_morphism::SlackClient::new(connector));

        let (sender, receiver) = mpsc::unbounded_channel();

        Ok(Self {
            app_token,
            bot_token,
            client,
            sender,
            receiver: Mutex::new(receiver),
        })
    }

    fn session(&self) -> SlackClientSession<'_, SlackClientHyperConnector<HttpsConnector<HttpConnector>>> {
        self.client.open_session(&self.bot_token)
    }
}

#[async_trait]
impl GenericChatClient for SlackChatClient {
    async fn connect(&self) -> Void {
        // Initialize the socket mode listener.

        let socket_mode_callbacks = SlackSocketModeListenerCallbacks::new().with_push_events(handle_push_event);

        // Initialize the socket mode listener environment.

        let listener_environment = Arc::new(
            SlackClientEventsListenerEnvironment::new(self.client.clone()).with_user_state(SlackUserState { events: self.sender.clone() }),
        );

        let socket_mode_listener = Arc::new(SlackClientSocketModeListener::new(
            &SlackClientSocketModeConfig::new(),
            listener_environment,
            socket_mode_callbacks,
        ));

        // Register the app token; this is where a bad token or network failure surfaces.
        socket_mode_listener.listen_for(&self.app_token).await?;

        // Keep the WS connections open until Ctrl-C.
        tokio::spawn(async move {
            socket_mode_listener.serve().await;
        });

        info!("Connected to Slack via socket mode.");

        Ok(())
    }

    async fn pull_events(&self) -> Vec<RawEvent> {
        let mut receiver = self.receiver.lock().await;
        let mut batch = Vec::new();

        while let Ok(event) = receiver.try_recv() {
            batch.push(event);
        }

        batch
    }

    #[instrument(skip(self))]
    async fn list_all_users(&self) -> Res<Vec<DirectoryUser>> {
        let session = self.session();
        let mut users = Vec::new();
        let mut cursor: Option<SlackCursorId> = None;

        loop {
            let mut request = SlackApiUsersListRequest::new().with_limit(PAGE_LIMIT);
            if let Some(c) = cursor.take() {
                request = request.with_cursor(c);
            }

            let response = session.users_list(&request).await.map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

            users.extend(response.members.into_iter().filter_map(|user| user.name.map(|name| DirectoryUser::new(user.id.0, name))));

            cursor = next_cursor(response.response_metadata);
            if cursor.is_none() {
                break;
            }
        }

        debug!("Listed {} users.", users.len());

        Ok(users)
    }

    #[instrument(skip(self))]
    async fn get_user(&self, user_id: &str) -> Lookup<DirectoryUser> {
        let request = SlackApiUsersInfoRequest::new(SlackUserId(user_id.to_string()));

        match self.session().users_info(&request).await {
            Ok(response) => match response.user.name {
                Some(name) => Lookup::Found(DirectoryUser::new(response.user.id.0, name)),
                None => Lookup::NotFound,
            },
            Err(e) => lookup_error(e, "user_not_found"),
        }
    }

    #[instrument(skip(self))]
    async fn get_channel_members(&self, channel_id: &str) -> Lookup<Vec<String>> {
        let session = self.session();
        let mut members = Vec::new();
        let mut cursor: Option<SlackCursorId> = None;

        loop {
            let mut request = SlackApiConversationsMembersRequest::new()
                .with_channel(SlackChannelId(channel_id.to_string()))
                .with_limit(PAGE_LIMIT);
            if let Some(c) = cursor.take() {
                request = request.with_cursor(c);
            }

            let response = match session.conversations_members(&request).await {
                Ok(response) => response,
                Err(e) => return lookup_error(e, "channel_not_found"),
            };

            members.extend(response.members.into_iter().map(|id| id.0));

            cursor = next_cursor(response.response_metadata);
            if cursor.is_none() {
                break;
            }
        }

        Lookup::Found(members)
    }

    #[instrument(skip(self))]
    async fn post_message(&self, channel_id: &str, text: &str) -> Void {
        let message = SlackMessageContent::new().with_text(text.to_string());

        let request = SlackApiChatPostMessageRequest::new(SlackChannelId(channel_id.to_string()), message)
            .with_as_user(true)
            .with_link_names(true);

        let _ = self.session().chat_post_message(&request).await.map_err(|e| anyhow::anyhow!("Failed to send message: {}", e))?;

        Ok(())
    }
}

// Helpers.

/// Slack signals the last page with a missing or empty cursor.
fn next_cursor(metadata: Option<SlackResponseMetadata>) -> Option<SlackCursorId> {
    metadata.and_then(|m| m.next_cursor).filter(|c| !c.0.is_empty())
}

/// Map a web API error to a lookup miss, keeping "does not exist" apart from real failures.
fn lookup_error<T>(error: SlackClientError, not_found_code: &str) -> Lookup<T> {
    match &error {
        SlackClientError::ApiError(ae) if ae.code == not_found_code => Lookup::NotFound,
        _ => Lookup::Failed(error.to_string()),
    }
}

// Socket mode listener callbacks for Slack.

/// Forwards push events into the buffer drained by [`GenericChatClient::pull_events`].
async fn handle_push_event(event_callback: SlackPushEventCallback, _client: Arc<SlackHyperClient>, states: SlackClientEventsUserState) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let states = states.read().await;
    let user_state = states.get_user_state::<SlackUserState>().ok_or(anyhow::anyhow!("Failed to get user state"))?;

    let value = serde_json::to_value(&event_callback.event)?;
    let event: RawEvent = serde_json::from_value(value)?;

    debug!("Buffered {:?} event.", event.kind);

    if user_state.events.send(event).is_err() {
        warn!("Event buffer is closed; dropping event.");
    }

    Ok(())
}
