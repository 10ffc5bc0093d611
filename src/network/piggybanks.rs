//! `/piggybanks` endpoints

use crate::error::ApiError;
use crate::models::{CreatePiggyBankRequest, HttpMethod, PiggyBank};
use crate::network::client::{ApiClient, NO_BODY};

impl ApiClient {
    pub async fn piggy_banks(&self, token: &str) -> Result<Vec<PiggyBank>, ApiError> {
        let banks: Option<Vec<PiggyBank>> = self
            .fetch(HttpMethod::GET, "/piggybanks", Some(token), NO_BODY)
            .await?;
        Ok(banks.unwrap_or_default())
    }

    pub async fn create_piggy_bank(
        &self,
        token: &str,
        piggy_bank: &CreatePiggyBankRequest,
    ) -> Result<PiggyBank, ApiError> {
        self.fetch_required(HttpMethod::POST, "/piggybanks", Some(token), Some(piggy_bank))
            .await
    }

    pub async fn piggy_bank(&self, token: &str, id: &str) -> Result<PiggyBank, ApiError> {
        let path = format!("/piggybanks/{}", id);
        self.fetch_required(HttpMethod::GET, &path, Some(token), NO_BODY)
            .await
    }

    /// Moves the piggy bank into its closed state. Nothing is deleted.
    pub async fn close_piggy_bank(&self, token: &str, id: &str) -> Result<(), ApiError> {
        let path = format!("/piggybanks/{}/close", id);
        self.execute(HttpMethod::POST, &path, Some(token), NO_BODY).await
    }
}
