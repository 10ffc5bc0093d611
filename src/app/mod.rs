//! App layer - the state stores screens read from and act through.
//!
//! Stores are plain objects handed to whoever needs them (no ambient
//! globals). Each one publishes its state through a `watch` channel and
//! serialises its own operations, so two quick taps run one after the
//! other instead of interleaving.

pub mod session;
pub mod couple;
pub mod piggybank;
pub mod health;
pub mod wiring;
mod token;

use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::messages::Notifier;
use crate::network::ApiClient;
use crate::storage::TokenStore;

pub use couple::{CoupleStore, CoupleView};
pub use health::{BackendStatus, HealthMonitor, HealthSnapshot};
pub use piggybank::{PiggyBankStore, PiggyBankView};
pub use session::{Session, SessionState, SessionStore};

pub(crate) const NOT_SIGNED_IN: &str = "Not signed in";

/// All stores of one running client, wired to a single session
pub struct Stores {
    pub session: Arc<SessionStore>,
    pub couple: Arc<CoupleStore>,
    pub piggy_banks: Arc<PiggyBankStore>,
}

impl Stores {
    pub fn new(client: ApiClient, storage: Arc<dyn TokenStore>, notifier: Notifier) -> Self {
        Stores {
            session: Arc::new(SessionStore::new(client.clone(), storage)),
            couple: Arc::new(CoupleStore::new(client.clone(), notifier.clone())),
            piggy_banks: Arc::new(PiggyBankStore::new(client, notifier)),
        }
    }

    /// Start token forwarding, then restore any persisted session
    pub async fn start(&self) -> JoinHandle<()> {
        let watcher = wiring::spawn_token_watch(
            self.session.subscribe(),
            self.couple.clone(),
            self.piggy_banks.clone(),
        );
        self.session.bootstrap().await;
        watcher
    }
}
