//! Network layer - the JSON API client and one resource client per
//! backend resource group.
//!
//! Resource clients are inherent methods on [`ApiClient`], split by file.

pub mod client;
pub mod auth;
pub mod couples;
pub mod piggybanks;
pub mod voucher_templates;
pub mod action_entries;
pub mod health;

pub use client::{create_client, ApiClient};
