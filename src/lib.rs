//! Library root for `emmm-bot`.
//!
//! Emmm-bot is a Slack bot that, when mentioned, picks a random member of the
//! channel (never a known bot) and announces their name. The pipeline is:
//! - pull a batch of realtime events,
//! - keep the well-formed user messages,
//! - keep the ones that open with the bot's mention,
//! - pick an eligible member and reply with their display name.
//!
//! The chat platform sits behind the `GenericChatClient` trait so the pipeline
//! can be driven by a mock in tests.

pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use rustls::crypto;
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the bot runtime:
/// - Initializes the crypto provider
/// - Creates the runtime context with the chat client
/// - Starts the main polling loop
pub async fn start(config: Config) -> Void {
    info!("Starting emmm-bot ...");

    // Start the crypto provider.
    let _ = crypto::ring::default_provider().install_default();

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config)?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
