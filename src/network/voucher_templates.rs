//! Voucher template endpoints

use crate::error::ApiError;
use crate::models::{CreateVoucherTemplateRequest, HttpMethod, VoucherTemplate};
use crate::network::client::{ApiClient, NO_BODY};

impl ApiClient {
    pub async fn voucher_templates(
        &self,
        token: &str,
        piggy_bank_id: &str,
    ) -> Result<Vec<VoucherTemplate>, ApiError> {
        let path = format!("/piggybanks/{}/voucher-templates", piggy_bank_id);
        let templates: Option<Vec<VoucherTemplate>> = self
            .fetch(HttpMethod::GET, &path, Some(token), NO_BODY)
            .await?;
        Ok(templates.unwrap_or_default())
    }

    pub async fn create_voucher_template(
        &self,
        token: &str,
        voucher_template: &CreateVoucherTemplateRequest,
    ) -> Result<VoucherTemplate, ApiError> {
        self.fetch_required(
            HttpMethod::POST,
            "/voucher-templates",
            Some(token),
            Some(voucher_template),
        )
        .await
    }
}
