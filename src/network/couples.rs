//! `/couples/*` endpoints

use crate::error::ApiError;
use crate::models::{
    CoupleInfo, CoupleRequest, CoupleStatus, HttpMethod, MessageResponse, PartnerEmailPayload,
    RequestIdPayload,
};
use crate::network::client::{ApiClient, NO_BODY};

impl ApiClient {
    /// Couple link plus incoming and outgoing requests, in one call
    pub async fn couple_status(&self, token: &str) -> Result<CoupleStatus, ApiError> {
        self.fetch_required(HttpMethod::GET, "/couples/me", Some(token), NO_BODY)
            .await
    }

    pub async fn request_couple(
        &self,
        token: &str,
        partner_email: &str,
    ) -> Result<CoupleRequest, ApiError> {
        let payload = PartnerEmailPayload { partner_email };
        self.fetch_required(HttpMethod::POST, "/couples/request", Some(token), Some(&payload))
            .await
    }

    pub async fn accept_couple(&self, token: &str, request_id: &str) -> Result<CoupleInfo, ApiError> {
        let payload = RequestIdPayload { request_id };
        self.fetch_required(HttpMethod::POST, "/couples/accept", Some(token), Some(&payload))
            .await
    }

    /// Re-send the invitation mail for an existing outgoing request.
    /// Returns the server's confirmation message.
    pub async fn resend_couple(&self, token: &str, request_id: &str) -> Result<String, ApiError> {
        let payload = RequestIdPayload { request_id };
        let reply: Option<MessageResponse> = self
            .fetch(HttpMethod::POST, "/couples/resend", Some(token), Some(&payload))
            .await?;
        Ok(reply.unwrap_or_default().message)
    }
}
