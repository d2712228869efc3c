//! # Hitboard Common Library
//!
//! Shared code for the hitboard crates:
//! - Error type (`Error`, `Result`)
//! - Bootstrap configuration loading (TOML + environment + defaults)
//! - Dashboard event types and the broadcast EventBus

pub mod config;
pub mod error;
pub mod events;

pub use error::{Error, Result};
