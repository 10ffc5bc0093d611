//! Line-oriented front-end. Maps each command onto one store operation and
//! renders the result; it holds no state of its own.

pub mod parse;

pub use parse::{parse_command, Command};

use chrono::Utc;

use crate::app::health::check_once;
use crate::app::Stores;
use crate::messages::Outcome;
use crate::models::{CreateActionEntryRequest, CreatePiggyBankRequest, CreateVoucherTemplateRequest};
use crate::network::ApiClient;
use crate::ui;

pub const HELP: &str = r#"
 SESSION
   login <email> <password>
   register <name> <email> <password>
   logout
   me                                     refresh and show your profile

 COUPLE
   couple                                 show couple status and requests
   invite <email>
   accept <request-id>
   resend <request-id>

 PIGGY BANKS
   banks                                  list (reloads from the server)
   bank <id>
   new-bank <title> <YYYY-MM-DD> [--end YYYY-MM-DD] [--desc TEXT]
   close <id>
   templates <bank-id>
   new-template <bank-id> <title> <amount> [--desc TEXT]
   record <template-id> [--at TIME] [--notes TEXT]
   history <bank-id>
   stats <bank-id>

 GENERAL
   health, help, quit
"#;

/// What the caller should do after a command
pub enum Step {
    Continue(String),
    Quit,
}

pub struct Shell<'a> {
    stores: &'a Stores,
    client: &'a ApiClient,
}

impl<'a> Shell<'a> {
    pub fn new(stores: &'a Stores, client: &'a ApiClient) -> Self {
        Shell { stores, client }
    }

    pub async fn execute(&self, command: Command) -> Step {
        let text = match command {
            Command::Quit => return Step::Quit,
            Command::Help => HELP.trim_matches('\n').to_string(),

            // Session: errors come back to us to display
            Command::Login { email, password } => {
                match self.stores.session.sign_in(&email, &password).await {
                    Ok(user) => format!("Welcome back, {}!", user.name),
                    Err(e) => format!("Login failed: {}", e),
                }
            }
            Command::Register { name, email, password } => {
                match self.stores.session.sign_up(&name, &email, &password).await {
                    Ok(user) => format!("Welcome, {}!", user.name),
                    Err(e) => format!("Registration failed: {}", e),
                }
            }
            Command::Logout => {
                self.stores.session.sign_out().await;
                ui::render_session(&self.stores.session.snapshot())
            }
            Command::Me => match self.stores.session.refresh_profile().await {
                Ok(()) => ui::render_session(&self.stores.session.snapshot()),
                Err(e) => format!("Profile refresh failed: {}", e),
            },

            // Pairing
            Command::Couple => {
                self.stores.couple.refresh().await;
                ui::render_couple(&self.stores.couple.snapshot())
            }
            Command::Invite { email } => {
                self.stores.couple.send_invite(&email).await;
                ui::render_couple(&self.stores.couple.snapshot())
            }
            Command::Accept { request_id } => {
                self.stores.couple.accept_invite(&request_id).await;
                ui::render_couple(&self.stores.couple.snapshot())
            }
            Command::Resend { request_id } => {
                match self.stores.couple.resend_invite(&request_id).await {
                    Outcome::Ok(message) if !message.is_empty() => message,
                    _ => ui::render_couple(&self.stores.couple.snapshot()),
                }
            }

            // Piggy banks
            Command::Banks => {
                self.stores.piggy_banks.refresh().await;
                ui::render_piggy_banks(&self.stores.piggy_banks.snapshot())
            }
            Command::Bank { id } => match self.stores.piggy_banks.piggy_bank(&id).await {
                Outcome::Ok(bank) => {
                    let stats = self.stores.piggy_banks.stats(&id).await.ok();
                    ui::render_piggy_bank(&bank, stats.as_ref())
                }
                Outcome::Failed(_) => "Piggy bank not available.".to_string(),
            },
            Command::NewBank { title, start, end, description } => {
                let mut req = CreatePiggyBankRequest::new(title, start);
                if let Some(end) = end {
                    req = req.ending(end);
                }
                if let Some(desc) = description {
                    req = req.with_description(desc);
                }
                self.stores.piggy_banks.create_piggy_bank(&req).await;
                ui::render_piggy_banks(&self.stores.piggy_banks.snapshot())
            }
            Command::Close { id } => {
                self.stores.piggy_banks.close_piggy_bank(&id).await;
                ui::render_piggy_banks(&self.stores.piggy_banks.snapshot())
            }
            Command::Templates { bank_id } => {
                let templates = self.stores.piggy_banks.voucher_templates(&bank_id).await;
                ui::render_templates(&templates.or_empty())
            }
            Command::NewTemplate { bank_id, title, amount_cents, description } => {
                let req = CreateVoucherTemplateRequest {
                    piggy_bank_id: bank_id.clone(),
                    title,
                    description,
                    amount_cents,
                };
                self.stores.piggy_banks.create_voucher_template(&req).await;
                let templates = self.stores.piggy_banks.voucher_templates(&bank_id).await;
                ui::render_templates(&templates.or_empty())
            }
            Command::Record { template_id, occurred_at, notes } => {
                let req = CreateActionEntryRequest {
                    voucher_template_id: template_id,
                    occurred_at: occurred_at.unwrap_or_else(Utc::now),
                    notes,
                };
                match self.stores.piggy_banks.create_action_entry(&req).await {
                    Outcome::Ok(entry) => format!("Recorded action {}", entry.id),
                    Outcome::Failed(_) => String::new(),
                }
            }
            Command::History { bank_id } => {
                let groups = self.stores.piggy_banks.action_entries(&bank_id).await;
                ui::render_history(&groups.or_empty())
            }
            Command::Stats { bank_id } => match self.stores.piggy_banks.stats(&bank_id).await {
                Outcome::Ok(stats) => ui::render_stats(&stats),
                Outcome::Failed(_) => "Stats not available.".to_string(),
            },

            Command::Health => ui::render_health(&check_once(self.client).await),
        };
        Step::Continue(text)
    }
}
