//! Pairing store - couple link plus pending incoming/outgoing requests.
//!
//! Bound to the session token through [`CoupleStore::token_changed`].
//! Operations never raise: failures become an error notice and an
//! [`Outcome::Failed`].

use tokio::sync::{watch, Mutex};

use crate::app::token::TokenSlot;
use crate::app::NOT_SIGNED_IN;
use crate::messages::{Binding, Notifier, Outcome};
use crate::models::{CoupleInfo, CoupleRequest, CoupleStatus};
use crate::network::ApiClient;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CoupleView {
    pub status: Binding<CoupleStatus>,
    /// An operation is in flight
    pub loading: bool,
}

impl CoupleView {
    pub fn couple(&self) -> Option<&CoupleInfo> {
        self.status.data().and_then(|s| s.couple.as_ref())
    }

    pub fn incoming(&self) -> &[CoupleRequest] {
        self.status.data().map(|s| s.incoming.as_slice()).unwrap_or(&[])
    }

    pub fn outgoing(&self) -> &[CoupleRequest] {
        self.status.data().map(|s| s.outgoing.as_slice()).unwrap_or(&[])
    }
}

pub struct CoupleStore {
    client: ApiClient,
    notifier: Notifier,
    token: TokenSlot,
    view: watch::Sender<CoupleView>,
    op_lock: Mutex<()>,
}

impl CoupleStore {
    pub fn new(client: ApiClient, notifier: Notifier) -> Self {
        let (view, _) = watch::channel(CoupleView::default());
        CoupleStore {
            client,
            notifier,
            token: TokenSlot::default(),
            view,
            op_lock: Mutex::new(()),
        }
    }

    pub fn snapshot(&self) -> CoupleView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CoupleView> {
        self.view.subscribe()
    }

    /// Session token appeared, disappeared or changed. The whole view is
    /// re-derived from scratch.
    pub async fn token_changed(&self, token: Option<String>) {
        if !self.token.replace(token.clone()) {
            return;
        }
        match token {
            None => {
                self.view.send_replace(CoupleView::default());
            }
            Some(_) => {
                self.view.send_replace(CoupleView {
                    status: Binding::Loading,
                    loading: false,
                });
                self.refresh().await;
            }
        }
    }

    pub async fn refresh(&self) -> Outcome<CoupleStatus> {
        let _op = self.op_lock.lock().await;
        self.set_loading(true);
        let outcome = self.load().await;
        self.set_loading(false);
        outcome
    }

    /// Invite a partner by email. The status is reloaded afterwards whether
    /// or not the invite went through.
    pub async fn send_invite(&self, email: &str) -> Outcome<CoupleRequest> {
        let _op = self.op_lock.lock().await;
        let Some(token) = self.token.get() else {
            return Outcome::Failed(NOT_SIGNED_IN.to_string());
        };

        self.set_loading(true);
        let result = self.client.request_couple(&token, email).await;
        match &result {
            Ok(_) => self.notifier.success("Invite sent"),
            Err(e) => self.notifier.error("Invite failed", e),
        }
        self.load().await;
        self.set_loading(false);
        result.into()
    }

    pub async fn accept_invite(&self, request_id: &str) -> Outcome<CoupleInfo> {
        let _op = self.op_lock.lock().await;
        let Some(token) = self.token.get() else {
            return Outcome::Failed(NOT_SIGNED_IN.to_string());
        };

        self.set_loading(true);
        let result = self.client.accept_couple(&token, request_id).await;
        match &result {
            Ok(couple) => {
                tracing::info!(couple_id = %couple.id, "Couple confirmed");
                self.notifier.success("Couple confirmed");
                self.load().await;
            }
            Err(e) => self.notifier.error("Accept failed", e),
        }
        self.set_loading(false);
        result.into()
    }

    /// Re-send the notification for an existing outgoing request. No new
    /// request is created.
    pub async fn resend_invite(&self, request_id: &str) -> Outcome<String> {
        let _op = self.op_lock.lock().await;
        let Some(token) = self.token.get() else {
            return Outcome::Failed(NOT_SIGNED_IN.to_string());
        };

        self.set_loading(true);
        let result = self.client.resend_couple(&token, request_id).await;
        match &result {
            Ok(_) => {
                self.notifier.success("Invite resent");
                self.load().await;
            }
            Err(e) => self.notifier.error("Resend failed", e),
        }
        self.set_loading(false);
        result.into()
    }

    /// Fetch `/couples/me` and publish it. Caller holds `op_lock`.
    async fn load(&self) -> Outcome<CoupleStatus> {
        let Some(token) = self.token.get() else {
            self.view.send_replace(CoupleView::default());
            return Outcome::Failed(NOT_SIGNED_IN.to_string());
        };

        let result = self.client.couple_status(&token).await;
        if !self.token.is_current(&token) {
            tracing::debug!("Dropping couple status fetched with a stale token");
            return result.into();
        }

        match result {
            Ok(status) => {
                self.view.send_modify(|v| v.status = Binding::Bound(status.clone()));
                Outcome::Ok(status)
            }
            Err(e) => {
                self.notifier.error("Couple status", &e);
                let reason = e.to_string();
                self.view.send_modify(|v| v.status = Binding::Failed(reason.clone()));
                Outcome::Failed(reason)
            }
        }
    }

    fn set_loading(&self, loading: bool) {
        self.view.send_if_modified(|v| {
            let changed = v.loading != loading;
            v.loading = loading;
            changed
        });
    }
}
