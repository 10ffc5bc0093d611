//! Plain-text rendering of store snapshots for the shell

use std::fmt::Write;

use crate::app::{CoupleView, HealthSnapshot, PiggyBankView, SessionState};
use crate::messages::{Binding, Notice, NoticeLevel};
use crate::models::{ActionEntryGroup, CoupleRequest, PiggyBank, PiggyBankStats, VoucherTemplate};
use crate::money::format_euros;

pub fn render_session(state: &SessionState) -> String {
    match state.session.user() {
        Some(user) => format!("Signed in as {} <{}>", user.name, user.email),
        None if state.initialized => "Signed out. Use 'login' or 'register'.".to_string(),
        None => "Starting...".to_string(),
    }
}

pub fn render_couple(view: &CoupleView) -> String {
    let mut out = String::new();
    match &view.status {
        Binding::Unbound => return "Sign in to see your couple.".to_string(),
        Binding::Loading => return "Loading couple status...".to_string(),
        Binding::Failed(reason) => {
            let _ = writeln!(out, "Couple status unavailable: {}", reason);
        }
        Binding::Bound(_) => {}
    }

    match view.couple() {
        Some(couple) => {
            let _ = writeln!(
                out,
                "Paired with {} <{}> since {}",
                couple.partner.name,
                couple.partner.email,
                couple.created_at.format("%Y-%m-%d")
            );
        }
        None => {
            let _ = writeln!(out, "Not paired yet.");
            render_requests(&mut out, "Incoming", view.incoming());
            render_requests(&mut out, "Outgoing", view.outgoing());
        }
    }
    out.trim_end().to_string()
}

fn render_requests(out: &mut String, label: &str, requests: &[CoupleRequest]) {
    if requests.is_empty() {
        let _ = writeln!(out, "{}: none", label);
        return;
    }
    let _ = writeln!(out, "{}:", label);
    for r in requests {
        let _ = writeln!(
            out,
            "  [{}] {} <{}> ({:?})",
            r.id, r.partner.name, r.partner.email, r.status
        );
    }
}

pub fn render_piggy_banks(view: &PiggyBankView) -> String {
    match &view.banks {
        Binding::Unbound => "Sign in to see your piggy banks.".to_string(),
        Binding::Loading => "Loading piggy banks...".to_string(),
        Binding::Failed(reason) => format!("Piggy banks unavailable: {}", reason),
        Binding::Bound(banks) if banks.is_empty() => {
            "No piggy banks yet. Create one with 'new-bank'.".to_string()
        }
        Binding::Bound(banks) => banks
            .iter()
            .map(render_piggy_bank_line)
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn render_piggy_bank_line(bank: &PiggyBank) -> String {
    format!(
        "[{}] {} - {} saved, {} actions, {} vouchers",
        bank.id,
        bank.title,
        format_euros(bank.total_value),
        bank.total_actions,
        bank.voucher_templates_count
    )
}

/// Detail view. Totals come from `/stats`; the single-bank response does
/// not carry them.
pub fn render_piggy_bank(bank: &PiggyBank, stats: Option<&PiggyBankStats>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} [{}]", bank.title, bank.id);
    if let Some(desc) = &bank.description {
        let _ = writeln!(out, "  {}", desc);
    }
    let period = match bank.end_date {
        Some(end) => format!("{} -> {}", bank.start_date.format("%Y-%m-%d"), end.format("%Y-%m-%d")),
        None => format!("from {}", bank.start_date.format("%Y-%m-%d")),
    };
    let _ = writeln!(out, "  {}", period);
    match stats {
        Some(stats) => {
            let _ = write!(
                out,
                "  {} saved across {} actions",
                format_euros(stats.total_value),
                stats.total_actions
            );
        }
        None => {
            let _ = write!(out, "  totals unavailable");
        }
    }
    out
}

pub fn render_templates(templates: &[VoucherTemplate]) -> String {
    if templates.is_empty() {
        return "No voucher templates yet.".to_string();
    }
    templates
        .iter()
        .map(|t| format!("[{}] {} - {}", t.id, t.title, format_euros(t.amount_cents)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Grouped history. Subtotals are computed here for display only.
pub fn render_history(groups: &[ActionEntryGroup]) -> String {
    if groups.is_empty() {
        return "No actions recorded yet.".to_string();
    }
    let mut out = String::new();
    for group in groups {
        let t = &group.voucher_template;
        let _ = writeln!(
            out,
            "{} - {} each, {} times = {}",
            t.title,
            format_euros(t.amount_cents),
            group.entries.len(),
            format_euros(group.subtotal_cents())
        );
        for entry in &group.entries {
            let notes = entry.notes.as_deref().unwrap_or("");
            let _ = writeln!(out, "  {} {}", entry.occurred_at.format("%Y-%m-%d %H:%M"), notes);
        }
    }
    out.trim_end().to_string()
}

pub fn render_stats(stats: &PiggyBankStats) -> String {
    format!(
        "{} actions, {} saved",
        stats.total_actions,
        format_euros(stats.total_value)
    )
}

pub fn render_health(snapshot: &HealthSnapshot) -> String {
    match snapshot.last_checked {
        Some(at) => format!("Backend {} (checked {})", snapshot.status.as_str(), at.format("%H:%M:%S")),
        None => format!("Backend {}", snapshot.status.as_str()),
    }
}

pub fn render_notice(notice: &Notice) -> String {
    let marker = match notice.level {
        NoticeLevel::Success => "[ok]",
        NoticeLevel::Error => "[!!]",
    };
    match &notice.detail {
        Some(detail) => format!("{} {}: {}", marker, notice.title, detail),
        None => format!("{} {}", marker, notice.title),
    }
}
