//! In-process fake of the piggy bank backend, served with axum on an
//! ephemeral port. Keeps everything in memory and counts hits per route.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use piggybank_client::models::{
    ActionEntry, ActionEntryGroup, ActionEntrySummary, CoupleInfo, CoupleRequest, CoupleStatus,
    PiggyBank, PiggyBankStats, RequestDirection, RequestStatus, TemplateSnapshot, User,
    VoucherTemplate,
};
use piggybank_client::ApiClient;

pub struct StoredUser {
    pub user: User,
    pub password: String,
}

pub struct StoredRequest {
    pub id: String,
    pub from: String,
    pub to: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub resent: u32,
}

pub struct StoredCouple {
    pub id: String,
    pub members: [String; 2],
    pub created_at: DateTime<Utc>,
}

pub struct StoredBank {
    pub id: String,
    pub couple_id: String,
    pub owner: String,
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct World {
    next_id: u64,
    pub users: Vec<StoredUser>,
    pub tokens: HashMap<String, String>,
    pub requests: Vec<StoredRequest>,
    pub couples: Vec<StoredCouple>,
    pub banks: Vec<StoredBank>,
    pub templates: Vec<VoucherTemplate>,
    pub entries: Vec<ActionEntry>,
    pub hits: HashMap<String, usize>,
    pub failing: HashSet<String>,
    pub content_types: Vec<Option<String>>,
}

type Shared = Arc<Mutex<World>>;

impl World {
    fn next(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}{}", prefix, self.next_id)
    }

    fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().map(|u| &u.user).find(|u| u.id == id)
    }

    fn couple_of(&self, user_id: &str) -> Option<&StoredCouple> {
        self.couples.iter().find(|c| c.members.iter().any(|m| m == user_id))
    }

    fn partner_in(&self, couple: &StoredCouple, user_id: &str) -> Option<User> {
        let other = couple.members.iter().find(|m| *m != user_id)?;
        self.user(other).cloned()
    }

    fn request_view(&self, req: &StoredRequest, viewer: &str) -> Option<CoupleRequest> {
        let (direction, partner_id) = if req.from == viewer {
            (RequestDirection::Outgoing, &req.to)
        } else {
            (RequestDirection::Incoming, &req.from)
        };
        Some(CoupleRequest {
            id: req.id.clone(),
            direction,
            status: req.status,
            partner: self.user(partner_id)?.clone(),
            created_at: req.created_at,
        })
    }

    fn bank_view(&self, bank: &StoredBank) -> PiggyBank {
        let templates: Vec<&VoucherTemplate> = self
            .templates
            .iter()
            .filter(|t| t.piggy_bank_id == bank.id)
            .collect();
        let mut total_actions = 0;
        let mut total_value = 0;
        for t in &templates {
            let n = self
                .entries
                .iter()
                .filter(|e| e.voucher_template_id == t.id)
                .count() as i64;
            total_actions += n;
            total_value += n * t.amount_cents;
        }
        PiggyBank {
            id: bank.id.clone(),
            couple_id: Some(bank.couple_id.clone()),
            owner_user_id: Some(bank.owner.clone()),
            title: bank.title.clone(),
            description: bank.description.clone(),
            start_date: bank.start_date,
            end_date: bank.end_date,
            created_at: bank.created_at,
            voucher_templates_count: templates.len() as i64,
            total_actions,
            total_value,
        }
    }

    /// Shape of the create and single-bank responses: aggregates are zero
    fn bank_detail(&self, bank: &StoredBank) -> PiggyBank {
        PiggyBank {
            voucher_templates_count: 0,
            total_actions: 0,
            total_value: 0,
            ..self.bank_view(bank)
        }
    }

    fn bank_for(&self, bank_id: &str, user_id: &str) -> Option<&StoredBank> {
        let couple = self.couple_of(user_id)?;
        self.banks
            .iter()
            .find(|b| b.id == bank_id && b.couple_id == couple.id)
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Count the hit, honour injected failures, and resolve the bearer token
fn enter<'a>(state: &'a Shared, route: &str, headers: &HeaderMap) -> Result<MutexGuard<'a, World>, Response> {
    let mut world = state
        .lock()
        .map_err(|_| error(StatusCode::INTERNAL_SERVER_ERROR, "poisoned"))?;
    *world.hits.entry(route.to_string()).or_default() += 1;
    world.content_types.push(
        headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
    );
    if world.failing.contains(route) {
        return Err(error(StatusCode::INTERNAL_SERVER_ERROR, "boom"));
    }
    Ok(world)
}

fn bearer(world: &World, headers: &HeaderMap) -> Result<String, Response> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .and_then(|t| world.tokens.get(t).cloned())
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "unauthenticated"))
}

// ============================================================================
// Handlers
// ============================================================================

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct RegisterBody {
    name: String,
    email: String,
    password: String,
}

async fn login(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<LoginBody>) -> Response {
    let mut world = match enter(&state, "POST /auth/login", &headers) {
        Ok(w) => w,
        Err(r) => return r,
    };
    let Some(user) = world
        .users
        .iter()
        .find(|u| u.user.email == body.email && u.password == body.password)
        .map(|u| u.user.clone())
    else {
        return error(StatusCode::UNAUTHORIZED, "invalid credentials");
    };
    let token = world.next("tok-");
    world.tokens.insert(token.clone(), user.id.clone());
    (StatusCode::OK, Json(json!({ "token": token, "user": user }))).into_response()
}

async fn register(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<RegisterBody>) -> Response {
    let mut world = match enter(&state, "POST /auth/register", &headers) {
        Ok(w) => w,
        Err(r) => return r,
    };
    if world.users.iter().any(|u| u.user.email == body.email) {
        return error(StatusCode::CONFLICT, "email already registered");
    }
    let user = User {
        id: world.next("u"),
        email: body.email,
        name: body.name,
    };
    world.users.push(StoredUser {
        user: user.clone(),
        password: body.password,
    });
    let token = world.next("tok-");
    world.tokens.insert(token.clone(), user.id.clone());
    (StatusCode::CREATED, Json(json!({ "token": token, "user": user }))).into_response()
}

async fn me(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let world = match enter(&state, "GET /auth/me", &headers) {
        Ok(w) => w,
        Err(r) => return r,
    };
    match bearer(&world, &headers) {
        Ok(uid) => Json(world.user(&uid).cloned()).into_response(),
        Err(r) => r,
    }
}

async fn couple_status(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let world = match enter(&state, "GET /couples/me", &headers) {
        Ok(w) => w,
        Err(r) => return r,
    };
    let uid = match bearer(&world, &headers) {
        Ok(uid) => uid,
        Err(r) => return r,
    };
    let couple = world.couple_of(&uid).and_then(|c| {
        Some(CoupleInfo {
            id: c.id.clone(),
            partner: world.partner_in(c, &uid)?,
            created_at: c.created_at,
        })
    });
    let pending = |r: &&StoredRequest| r.status == RequestStatus::Pending;
    let status = CoupleStatus {
        couple,
        incoming: world
            .requests
            .iter()
            .filter(|r| r.to == uid)
            .filter(pending)
            .filter_map(|r| world.request_view(r, &uid))
            .collect(),
        outgoing: world
            .requests
            .iter()
            .filter(|r| r.from == uid)
            .filter(pending)
            .filter_map(|r| world.request_view(r, &uid))
            .collect(),
    };
    Json(status).into_response()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartnerBody {
    partner_email: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequestIdBody {
    request_id: String,
}

async fn request_couple(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<PartnerBody>) -> Response {
    let mut world = match enter(&state, "POST /couples/request", &headers) {
        Ok(w) => w,
        Err(r) => return r,
    };
    let uid = match bearer(&world, &headers) {
        Ok(uid) => uid,
        Err(r) => return r,
    };
    let Some(target) = world
        .users
        .iter()
        .find(|u| u.user.email == body.partner_email)
        .map(|u| u.user.id.clone())
    else {
        return error(StatusCode::NOT_FOUND, "user not found");
    };
    if target == uid {
        return error(StatusCode::BAD_REQUEST, "cannot pair with yourself");
    }
    if world.couple_of(&uid).is_some() {
        return error(StatusCode::CONFLICT, "already in a couple");
    }
    let req = StoredRequest {
        id: world.next("req-"),
        from: uid.clone(),
        to: target,
        status: RequestStatus::Pending,
        created_at: Utc::now(),
        resent: 0,
    };
    let view = world.request_view(&req, &uid);
    world.requests.push(req);
    (StatusCode::CREATED, Json(view)).into_response()
}

async fn accept_couple(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<RequestIdBody>) -> Response {
    let mut world = match enter(&state, "POST /couples/accept", &headers) {
        Ok(w) => w,
        Err(r) => return r,
    };
    let uid = match bearer(&world, &headers) {
        Ok(uid) => uid,
        Err(r) => return r,
    };
    let Some(idx) = world
        .requests
        .iter()
        .position(|r| r.id == body.request_id && r.to == uid && r.status == RequestStatus::Pending)
    else {
        return error(StatusCode::NOT_FOUND, "request not found");
    };
    world.requests[idx].status = RequestStatus::Accepted;
    let from = world.requests[idx].from.clone();
    let couple = StoredCouple {
        id: world.next("c"),
        members: [from, uid.clone()],
        created_at: Utc::now(),
    };
    let info = CoupleInfo {
        id: couple.id.clone(),
        partner: world.partner_in(&couple, &uid).expect("requester exists"),
        created_at: couple.created_at,
    };
    world.couples.push(couple);
    Json(info).into_response()
}

async fn resend_couple(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<RequestIdBody>) -> Response {
    let mut world = match enter(&state, "POST /couples/resend", &headers) {
        Ok(w) => w,
        Err(r) => return r,
    };
    let uid = match bearer(&world, &headers) {
        Ok(uid) => uid,
        Err(r) => return r,
    };
    let Some(req) = world
        .requests
        .iter_mut()
        .find(|r| r.id == body.request_id && r.from == uid && r.status == RequestStatus::Pending)
    else {
        return error(StatusCode::NOT_FOUND, "request not found");
    };
    req.resent += 1;
    Json(json!({ "message": "invitation resent" })).into_response()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateBankBody {
    title: String,
    description: Option<String>,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
}

async fn list_banks(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let world = match enter(&state, "GET /piggybanks", &headers) {
        Ok(w) => w,
        Err(r) => return r,
    };
    let uid = match bearer(&world, &headers) {
        Ok(uid) => uid,
        Err(r) => return r,
    };
    let banks: Vec<PiggyBank> = match world.couple_of(&uid) {
        Some(c) => world
            .banks
            .iter()
            .filter(|b| b.couple_id == c.id)
            .map(|b| world.bank_view(b))
            .collect(),
        None => Vec::new(),
    };
    Json(banks).into_response()
}

async fn create_bank(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<CreateBankBody>) -> Response {
    let mut world = match enter(&state, "POST /piggybanks", &headers) {
        Ok(w) => w,
        Err(r) => return r,
    };
    let uid = match bearer(&world, &headers) {
        Ok(uid) => uid,
        Err(r) => return r,
    };
    let Some(couple_id) = world.couple_of(&uid).map(|c| c.id.clone()) else {
        return error(StatusCode::FORBIDDEN, "not authorized");
    };
    let bank = StoredBank {
        id: world.next("pb"),
        couple_id,
        owner: uid,
        title: body.title,
        description: body.description,
        start_date: body.start_date,
        end_date: body.end_date,
        created_at: Utc::now(),
    };
    let view = world.bank_detail(&bank);
    world.banks.push(bank);
    (StatusCode::CREATED, Json(view)).into_response()
}

async fn get_bank(State(state): State<Shared>, Path(id): Path<String>, headers: HeaderMap) -> Response {
    let world = match enter(&state, "GET /piggybanks/{id}", &headers) {
        Ok(w) => w,
        Err(r) => return r,
    };
    let uid = match bearer(&world, &headers) {
        Ok(uid) => uid,
        Err(r) => return r,
    };
    match world.bank_for(&id, &uid) {
        Some(b) => Json(world.bank_detail(b)).into_response(),
        None => error(StatusCode::NOT_FOUND, "piggybank not found"),
    }
}

async fn close_bank(State(state): State<Shared>, Path(id): Path<String>, headers: HeaderMap) -> Response {
    let mut world = match enter(&state, "POST /piggybanks/{id}/close", &headers) {
        Ok(w) => w,
        Err(r) => return r,
    };
    let uid = match bearer(&world, &headers) {
        Ok(uid) => uid,
        Err(r) => return r,
    };
    let Some(couple_id) = world.couple_of(&uid).map(|c| c.id.clone()) else {
        return error(StatusCode::FORBIDDEN, "not authorized");
    };
    match world
        .banks
        .iter_mut()
        .find(|b| b.id == id && b.couple_id == couple_id)
    {
        Some(bank) => {
            bank.end_date = Some(Utc::now());
            StatusCode::NO_CONTENT.into_response()
        }
        None => error(StatusCode::FORBIDDEN, "not authorized"),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTemplateBody {
    piggy_bank_id: String,
    title: String,
    description: Option<String>,
    amount_cents: i64,
}

async fn list_templates(State(state): State<Shared>, Path(id): Path<String>, headers: HeaderMap) -> Response {
    let world = match enter(&state, "GET /piggybanks/{id}/voucher-templates", &headers) {
        Ok(w) => w,
        Err(r) => return r,
    };
    let uid = match bearer(&world, &headers) {
        Ok(uid) => uid,
        Err(r) => return r,
    };
    if world.bank_for(&id, &uid).is_none() {
        return error(StatusCode::NOT_FOUND, "piggybank not found");
    }
    let templates: Vec<&VoucherTemplate> = world.templates.iter().filter(|t| t.piggy_bank_id == id).collect();
    Json(templates).into_response()
}

async fn create_template(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<CreateTemplateBody>,
) -> Response {
    let mut world = match enter(&state, "POST /voucher-templates", &headers) {
        Ok(w) => w,
        Err(r) => return r,
    };
    let uid = match bearer(&world, &headers) {
        Ok(uid) => uid,
        Err(r) => return r,
    };
    if world.bank_for(&body.piggy_bank_id, &uid).is_none() {
        return error(StatusCode::FORBIDDEN, "not authorized");
    }
    let template = VoucherTemplate {
        id: world.next("t"),
        piggy_bank_id: body.piggy_bank_id,
        title: body.title,
        description: body.description,
        amount_cents: body.amount_cents,
        created_at: Utc::now(),
    };
    world.templates.push(template.clone());
    (StatusCode::CREATED, Json(template)).into_response()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateEntryBody {
    voucher_template_id: String,
    occurred_at: DateTime<Utc>,
    notes: Option<String>,
}

async fn create_entry(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<CreateEntryBody>) -> Response {
    let mut world = match enter(&state, "POST /action-entries", &headers) {
        Ok(w) => w,
        Err(r) => return r,
    };
    let uid = match bearer(&world, &headers) {
        Ok(uid) => uid,
        Err(r) => return r,
    };
    let Some(bank_id) = world
        .templates
        .iter()
        .find(|t| t.id == body.voucher_template_id)
        .map(|t| t.piggy_bank_id.clone())
    else {
        return error(StatusCode::NOT_FOUND, "voucher template not found");
    };
    if world.bank_for(&bank_id, &uid).is_none() {
        return error(StatusCode::FORBIDDEN, "not authorized");
    }
    let entry = ActionEntry {
        id: world.next("a"),
        voucher_template_id: body.voucher_template_id,
        giver_user_id: uid,
        occurred_at: body.occurred_at,
        notes: body.notes,
        created_at: Utc::now(),
    };
    world.entries.push(entry.clone());
    (StatusCode::CREATED, Json(entry)).into_response()
}

async fn list_entries(State(state): State<Shared>, Path(id): Path<String>, headers: HeaderMap) -> Response {
    let world = match enter(&state, "GET /piggybanks/{id}/action-entries", &headers) {
        Ok(w) => w,
        Err(r) => return r,
    };
    let uid = match bearer(&world, &headers) {
        Ok(uid) => uid,
        Err(r) => return r,
    };
    if world.bank_for(&id, &uid).is_none() {
        return error(StatusCode::NOT_FOUND, "piggybank not found");
    }
    let groups: Vec<ActionEntryGroup> = world
        .templates
        .iter()
        .filter(|t| t.piggy_bank_id == id)
        .filter_map(|t| {
            let entries: Vec<ActionEntrySummary> = world
                .entries
                .iter()
                .filter(|e| e.voucher_template_id == t.id)
                .map(|e| ActionEntrySummary {
                    id: e.id.clone(),
                    occurred_at: e.occurred_at,
                    notes: e.notes.clone(),
                    created_at: e.created_at,
                })
                .collect();
            if entries.is_empty() {
                return None;
            }
            Some(ActionEntryGroup {
                voucher_template_id: t.id.clone(),
                voucher_template: TemplateSnapshot {
                    id: t.id.clone(),
                    title: t.title.clone(),
                    description: t.description.clone(),
                    amount_cents: t.amount_cents,
                },
                entries,
            })
        })
        .collect();
    Json(groups).into_response()
}

async fn stats(State(state): State<Shared>, Path(id): Path<String>, headers: HeaderMap) -> Response {
    let world = match enter(&state, "GET /piggybanks/{id}/stats", &headers) {
        Ok(w) => w,
        Err(r) => return r,
    };
    let uid = match bearer(&world, &headers) {
        Ok(uid) => uid,
        Err(r) => return r,
    };
    match world.bank_for(&id, &uid) {
        Some(b) => {
            let view = world.bank_view(b);
            Json(PiggyBankStats {
                total_actions: view.total_actions,
                total_value: view.total_value,
            })
            .into_response()
        }
        None => error(StatusCode::NOT_FOUND, "piggybank not found"),
    }
}

async fn health(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(r) = enter(&state, "GET /health", &headers) {
        return r;
    }
    Json(json!({ "status": "ok", "timestamp": Utc::now() })).into_response()
}

// ============================================================================
// Harness
// ============================================================================

pub struct FakeBackend {
    pub url: String,
    world: Shared,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let world: Shared = Arc::new(Mutex::new(World::default()));

        let app = Router::new()
            .route("/auth/login", post(login))
            .route("/auth/register", post(register))
            .route("/auth/me", get(me))
            .route("/couples/me", get(couple_status))
            .route("/couples/request", post(request_couple))
            .route("/couples/accept", post(accept_couple))
            .route("/couples/resend", post(resend_couple))
            .route("/piggybanks", get(list_banks).post(create_bank))
            .route("/piggybanks/{id}", get(get_bank))
            .route("/piggybanks/{id}/close", post(close_bank))
            .route("/piggybanks/{id}/voucher-templates", get(list_templates))
            .route("/piggybanks/{id}/action-entries", get(list_entries))
            .route("/piggybanks/{id}/stats", get(stats))
            .route("/voucher-templates", post(create_template))
            .route("/action-entries", post(create_entry))
            .route("/health", get(health))
            .with_state(world.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        FakeBackend {
            url: format!("http://{}", addr),
            world,
        }
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(self.url.clone())
    }

    pub fn world(&self) -> MutexGuard<'_, World> {
        self.world.lock().unwrap()
    }

    pub fn hits(&self, route: &str) -> usize {
        self.world().hits.get(route).copied().unwrap_or(0)
    }

    pub fn fail(&self, route: &str) {
        self.world().failing.insert(route.to_string());
    }

    pub fn heal(&self, route: &str) {
        self.world().failing.remove(route);
    }

    /// Create a user directly and hand back a valid token for them
    pub fn seed_user(&self, name: &str, email: &str, password: &str) -> (User, String) {
        let mut world = self.world();
        let user = User {
            id: world.next("u"),
            email: email.to_string(),
            name: name.to_string(),
        };
        world.users.push(StoredUser {
            user: user.clone(),
            password: password.to_string(),
        });
        let token = world.next("tok-");
        world.tokens.insert(token.clone(), user.id.clone());
        (user, token)
    }

    /// Two users already paired. Returns both tokens.
    pub fn seed_couple(&self) -> (String, String) {
        let (a, token_a) = self.seed_user("Anna", "anna@example.com", "pw-a");
        let (b, token_b) = self.seed_user("Biel", "biel@example.com", "pw-b");
        let mut world = self.world();
        let id = world.next("c");
        world.couples.push(StoredCouple {
            id,
            members: [a.id, b.id],
            created_at: Utc::now(),
        });
        (token_a, token_b)
    }

    pub fn revoke(&self, token: &str) {
        self.world().tokens.remove(token);
    }

    pub fn request_count(&self) -> usize {
        self.world().requests.len()
    }
}
