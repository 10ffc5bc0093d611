use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// HTTP methods the backend exposes
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    GET,
    POST,
}

impl HttpMethod {
    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
        }
    }
}

// ============================================================================
// Auth
// ============================================================================

/// A user profile as returned by `/auth/me` and embedded in couple payloads
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Clone, Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

// ============================================================================
// Couples
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoupleInfo {
    pub id: String,
    pub partner: User,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestDirection {
    Incoming,
    Outgoing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

/// A directional, not yet confirmed invitation to pair
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoupleRequest {
    pub id: String,
    pub direction: RequestDirection,
    pub status: RequestStatus,
    pub partner: User,
    pub created_at: DateTime<Utc>,
}

/// Everything `/couples/me` knows about the current user's pairing
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoupleStatus {
    #[serde(default)]
    pub couple: Option<CoupleInfo>,
    #[serde(default)]
    pub incoming: Vec<CoupleRequest>,
    #[serde(default)]
    pub outgoing: Vec<CoupleRequest>,
}

impl CoupleStatus {
    pub fn is_paired(&self) -> bool {
        self.couple.is_some()
    }

    /// Requests still awaiting an answer. Empty once a couple exists.
    pub fn pending(&self) -> impl Iterator<Item = &CoupleRequest> {
        let paired = self.is_paired();
        self.incoming
            .iter()
            .chain(self.outgoing.iter())
            .filter(move |r| !paired && r.status == RequestStatus::Pending)
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerEmailPayload<'a> {
    pub partner_email: &'a str,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestIdPayload<'a> {
    pub request_id: &'a str,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

// ============================================================================
// Piggy banks
// ============================================================================

/// A shared savings goal. The count and total fields are computed by the
/// server and never recalculated locally.
///
/// Only the list endpoint fills the aggregates. Single-bank and create
/// responses send zeros, so detail views read totals from `/stats`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PiggyBank {
    pub id: String,
    /// Nullable on the wire; set for every bank created through a couple
    #[serde(default)]
    pub couple_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_user_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub voucher_templates_count: i64,
    #[serde(default)]
    pub total_actions: i64,
    /// Minor currency units
    #[serde(default)]
    pub total_value: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePiggyBankRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

impl CreatePiggyBankRequest {
    /// Piggy bank starting at midnight UTC of `start`, with no end date
    pub fn new(title: impl Into<String>, start: NaiveDate) -> Self {
        CreatePiggyBankRequest {
            title: title.into(),
            description: None,
            start_date: midnight_utc(start),
            end_date: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn ending(mut self, end: NaiveDate) -> Self {
        self.end_date = Some(midnight_utc(end));
        self
    }
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::default()).and_utc()
}

// ============================================================================
// Voucher templates
// ============================================================================

/// A fixed-value reward definition inside a piggy bank
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoucherTemplate {
    pub id: String,
    pub piggy_bank_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub amount_cents: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVoucherTemplateRequest {
    pub piggy_bank_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub amount_cents: i64,
}

// ============================================================================
// Action entries
// ============================================================================

/// One occurrence of a rewarded action. Append-only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionEntry {
    pub id: String,
    pub voucher_template_id: String,
    pub giver_user_id: String,
    pub occurred_at: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActionEntryRequest {
    pub voucher_template_id: String,
    pub occurred_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Parent template as captured in an action-entry group
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSnapshot {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub amount_cents: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionEntrySummary {
    pub id: String,
    pub occurred_at: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Entries of one voucher template, grouped by the server
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionEntryGroup {
    pub voucher_template_id: String,
    pub voucher_template: TemplateSnapshot,
    #[serde(default)]
    pub entries: Vec<ActionEntrySummary>,
}

impl ActionEntryGroup {
    /// Display-only subtotal: template amount times number of entries
    pub fn subtotal_cents(&self) -> i64 {
        self.voucher_template
            .amount_cents
            .saturating_mul(self.entries.len() as i64)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PiggyBankStats {
    pub total_actions: i64,
    /// Minor currency units
    pub total_value: i64,
}

// ============================================================================
// Health
// ============================================================================

#[derive(Clone, Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}
