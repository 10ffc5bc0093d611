//! Piggy-bank store - the list of piggy banks plus on-demand access to
//! voucher templates, action entries and stats.
//!
//! Every successful mutation is followed by exactly one full list reload:
//! counts and totals come from the server and are never patched locally.
//! Reads return their data directly and leave the published list alone.

use tokio::sync::{watch, Mutex};

use crate::app::token::TokenSlot;
use crate::app::NOT_SIGNED_IN;
use crate::error::ApiError;
use crate::messages::{Binding, Notifier, Outcome};
use crate::models::{
    ActionEntry, ActionEntryGroup, CreateActionEntryRequest, CreatePiggyBankRequest,
    CreateVoucherTemplateRequest, PiggyBank, PiggyBankStats, VoucherTemplate,
};
use crate::network::ApiClient;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PiggyBankView {
    pub banks: Binding<Vec<PiggyBank>>,
    pub loading: bool,
}

impl PiggyBankView {
    pub fn piggy_banks(&self) -> &[PiggyBank] {
        self.banks.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn find(&self, id: &str) -> Option<&PiggyBank> {
        self.piggy_banks().iter().find(|b| b.id == id)
    }
}

pub struct PiggyBankStore {
    client: ApiClient,
    notifier: Notifier,
    token: TokenSlot,
    view: watch::Sender<PiggyBankView>,
    op_lock: Mutex<()>,
}

impl PiggyBankStore {
    pub fn new(client: ApiClient, notifier: Notifier) -> Self {
        let (view, _) = watch::channel(PiggyBankView::default());
        PiggyBankStore {
            client,
            notifier,
            token: TokenSlot::default(),
            view,
            op_lock: Mutex::new(()),
        }
    }

    pub fn snapshot(&self) -> PiggyBankView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PiggyBankView> {
        self.view.subscribe()
    }

    pub async fn token_changed(&self, token: Option<String>) {
        if !self.token.replace(token.clone()) {
            return;
        }
        match token {
            None => {
                self.view.send_replace(PiggyBankView::default());
            }
            Some(_) => {
                self.view.send_replace(PiggyBankView {
                    banks: Binding::Loading,
                    loading: false,
                });
                self.refresh().await;
            }
        }
    }

    pub async fn refresh(&self) -> Outcome<Vec<PiggyBank>> {
        let _op = self.op_lock.lock().await;
        self.set_loading(true);
        let outcome = self.load().await;
        self.set_loading(false);
        outcome
    }

    // ========================
    // Mutations
    // ========================

    pub async fn create_piggy_bank(&self, piggy_bank: &CreatePiggyBankRequest) -> Outcome<PiggyBank> {
        self.mutate("PiggyBank created", "Create failed", |client, token| async move {
            client.create_piggy_bank(&token, piggy_bank).await
        })
        .await
    }

    /// Soft-close; the piggy bank stays listed in its closed state
    pub async fn close_piggy_bank(&self, id: &str) -> Outcome<()> {
        self.mutate("PiggyBank closed", "Close failed", |client, token| async move {
            client.close_piggy_bank(&token, id).await
        })
        .await
    }

    pub async fn create_voucher_template(
        &self,
        voucher_template: &CreateVoucherTemplateRequest,
    ) -> Outcome<VoucherTemplate> {
        self.mutate("Voucher template created", "Create failed", |client, token| async move {
            client.create_voucher_template(&token, voucher_template).await
        })
        .await
    }

    pub async fn create_action_entry(&self, action_entry: &CreateActionEntryRequest) -> Outcome<ActionEntry> {
        self.mutate("Action recorded", "Record failed", |client, token| async move {
            client.create_action_entry(&token, action_entry).await
        })
        .await
    }

    /// Run one mutating call, notify, and reload the list on success
    async fn mutate<'a, T, F, Fut>(&'a self, success: &str, failure: &str, call: F) -> Outcome<T>
    where
        F: FnOnce(&'a ApiClient, String) -> Fut,
        Fut: std::future::Future<Output = Result<T, ApiError>> + 'a,
    {
        let _op = self.op_lock.lock().await;
        let Some(token) = self.token.get() else {
            return Outcome::Failed(NOT_SIGNED_IN.to_string());
        };

        self.set_loading(true);
        let outcome = match call(&self.client, token).await {
            Ok(value) => {
                self.notifier.success(success);
                self.load().await;
                Outcome::Ok(value)
            }
            Err(e) => {
                self.notifier.error(failure, &e);
                Outcome::Failed(e.to_string())
            }
        };
        self.set_loading(false);
        outcome
    }

    // ========================
    // Reads
    // ========================

    pub async fn piggy_bank(&self, id: &str) -> Outcome<PiggyBank> {
        let Some(token) = self.token.get() else {
            return Outcome::Failed(NOT_SIGNED_IN.to_string());
        };
        self.report("PiggyBank", self.client.piggy_bank(&token, id).await)
    }

    pub async fn voucher_templates(&self, piggy_bank_id: &str) -> Outcome<Vec<VoucherTemplate>> {
        let Some(token) = self.token.get() else {
            return Outcome::Failed(NOT_SIGNED_IN.to_string());
        };
        self.report(
            "Voucher Templates",
            self.client.voucher_templates(&token, piggy_bank_id).await,
        )
    }

    /// Entries grouped by voucher template, in server order
    pub async fn action_entries(&self, piggy_bank_id: &str) -> Outcome<Vec<ActionEntryGroup>> {
        let Some(token) = self.token.get() else {
            return Outcome::Failed(NOT_SIGNED_IN.to_string());
        };
        self.report(
            "Action Entries",
            self.client.action_entries(&token, piggy_bank_id).await,
        )
    }

    pub async fn stats(&self, piggy_bank_id: &str) -> Outcome<PiggyBankStats> {
        let Some(token) = self.token.get() else {
            return Outcome::Failed(NOT_SIGNED_IN.to_string());
        };
        self.report(
            "Stats",
            self.client.piggy_bank_stats(&token, piggy_bank_id).await,
        )
    }

    fn report<T>(&self, title: &str, result: Result<T, ApiError>) -> Outcome<T> {
        if let Err(e) = &result {
            self.notifier.error(title, e);
        }
        result.into()
    }

    /// Fetch the full list and publish it. Caller holds `op_lock`.
    async fn load(&self) -> Outcome<Vec<PiggyBank>> {
        let Some(token) = self.token.get() else {
            self.view.send_replace(PiggyBankView::default());
            return Outcome::Failed(NOT_SIGNED_IN.to_string());
        };

        let result = self.client.piggy_banks(&token).await;
        if !self.token.is_current(&token) {
            tracing::debug!("Dropping piggy bank list fetched with a stale token");
            return result.into();
        }

        match result {
            Ok(banks) => {
                tracing::debug!(count = banks.len(), "Piggy banks loaded");
                self.view.send_modify(|v| v.banks = Binding::Bound(banks.clone()));
                Outcome::Ok(banks)
            }
            Err(e) => {
                self.notifier.error("PiggyBanks", &e);
                let reason = e.to_string();
                // keep showing the last list we had
                self.view.send_modify(|v| {
                    if !v.banks.is_bound() {
                        v.banks = Binding::Failed(reason.clone());
                    }
                });
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
