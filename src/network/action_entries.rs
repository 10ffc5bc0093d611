//! Action entry and stats endpoints

use crate::error::ApiError;
use crate::models::{
    ActionEntry, ActionEntryGroup, CreateActionEntryRequest, HttpMethod, PiggyBankStats,
};
use crate::network::client::{ApiClient, NO_BODY};

impl ApiClient {
    pub async fn create_action_entry(
        &self,
        token: &str,
        action_entry: &CreateActionEntryRequest,
    ) -> Result<ActionEntry, ApiError> {
        self.fetch_required(HttpMethod::POST, "/action-entries", Some(token), Some(action_entry))
            .await
    }

    /// Entries grouped by voucher template, as computed by the server
    pub async fn action_entries(
        &self,
        token: &str,
        piggy_bank_id: &str,
    ) -> Result<Vec<ActionEntryGroup>, ApiError> {
        let path = format!("/piggybanks/{}/action-entries", piggy_bank_id);
        let groups: Option<Vec<ActionEntryGroup>> = self
            .fetch(HttpMethod::GET, &path, Some(token), NO_BODY)
            .await?;
        Ok(groups.unwrap_or_default())
    }

    pub async fn piggy_bank_stats(
        &self,
        token: &str,
        piggy_bank_id: &str,
    ) -> Result<PiggyBankStats, ApiError> {
        let path = format!("/piggybanks/{}/stats", piggy_bank_id);
        self.fetch_required(HttpMethod::GET, &path, Some(token), NO_BODY)
            .await
    }
}
