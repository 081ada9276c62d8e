//! Event handling and user interactions for the bot.
//!
//! This module provides the message pipeline:
//! - Filtering raw realtime events down to user messages
//! - Detecting messages addressed to the bot
//! - Picking a random channel member and replying with their name
//! - Caching user display names

pub mod directory;
pub mod dispatch;
pub mod event_filter;
pub mod mention;
pub mod responder;
pub mod selector;
