//! Forwards session token changes to the stores that depend on it

use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::app::couple::CoupleStore;
use crate::app::piggybank::PiggyBankStore;
use crate::app::session::SessionState;

/// Spawn the task that turns every distinct token published by the session
/// store (appeared, cleared or replaced) into a `token_changed` event on
/// both dependent stores. Ends when the session store is dropped.
pub fn spawn_token_watch(
    mut session_rx: watch::Receiver<SessionState>,
    couple: Arc<CoupleStore>,
    piggy_banks: Arc<PiggyBankStore>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut last: Option<String> = None;
        loop {
            let token = session_rx
                .borrow_and_update()
                .session
                .token()
                .map(str::to_owned);

            if token != last {
                tracing::info!(signed_in = token.is_some(), "Session token changed");
                last = token.clone();
                let for_piggy_banks = token.clone();
                tokio::join!(
                    couple.token_changed(token),
                    piggy_banks.token_changed(for_piggy_banks),
                );
            }

            if session_rx.changed().await.is_err() {
                break;
            }
        }
    })
}
