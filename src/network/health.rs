use crate::models::{HealthResponse, HttpMethod};
use crate::network::client::{ApiClient, NO_BODY};

impl ApiClient {
    /// `true` when `/health` answers with status `"ok"`. Never fails.
    pub async fn health_check(&self) -> bool {
        match self
            .fetch_required::<HealthResponse, _>(HttpMethod::GET, "/health", None, NO_BODY)
            .await
        {
            Ok(resp) => resp.status == "ok",
            Err(e) => {
                tracing::warn!(error = %e, "Health check error");
                false
            }
        }
    }
}
