//! Interslavic tutor bot for Telegram.
//!
//! The `tutor` module holds the dialogue core; `config` and `telegram_log` are
//! the binary's ambient plumbing.

pub mod config;
pub mod telegram_log;
pub mod tutor;
