//! Core components, types, and utilities for the bot.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - Realtime event records and their classification tags.
//! - Common types and result handling.

pub mod config;
pub mod event;
pub mod types;
