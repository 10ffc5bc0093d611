//! # Piggybank client
//!
//! Client for the shared piggy bank backend: two partners pair up, define
//! reward vouchers inside shared piggy banks and log the actions that earn
//! them.
//!
//! ## Architecture
//! - Network layer - JSON API client plus typed resource clients
//! - App layer - session, couple and piggy-bank stores publishing their
//!   state through `watch` channels
//! - Shell - a line-oriented front-end over the stores

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod money;
pub mod storage;
pub mod messages;
pub mod network;
pub mod app;
pub mod ui;
pub mod shell;

// Re-export commonly used types
pub use app::{CoupleStore, PiggyBankStore, Session, SessionState, SessionStore, Stores};
pub use config::Config;
pub use error::{ApiError, SessionError, StorageError};
pub use messages::{Binding, Notice, Notifier, Outcome};
pub use network::ApiClient;
pub use storage::{FileStore, MemoryStore, TokenStore};
