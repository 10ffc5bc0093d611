//! Shell command parsing - one input line into one [`Command`]

use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, NaiveDate, Utc};

use crate::money::parse_amount;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    // Session
    Login { email: String, password: String },
    Register { name: String, email: String, password: String },
    Logout,
    Me,

    // Pairing
    Couple,
    Invite { email: String },
    Accept { request_id: String },
    Resend { request_id: String },

    // Piggy banks
    Banks,
    Bank { id: String },
    NewBank {
        title: String,
        start: NaiveDate,
        end: Option<NaiveDate>,
        description: Option<String>,
    },
    Close { id: String },
    Templates { bank_id: String },
    NewTemplate {
        bank_id: String,
        title: String,
        amount_cents: i64,
        description: Option<String>,
    },
    Record {
        template_id: String,
        occurred_at: Option<DateTime<Utc>>,
        notes: Option<String>,
    },
    History { bank_id: String },
    Stats { bank_id: String },

    // General
    Health,
    Help,
    Quit,
}

/// Parse one line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let tokens = tokenize(line)?;
    let Some((name, rest)) = tokens.split_first() else {
        return Ok(None);
    };

    let (args, flags) = split_flags(rest)?;
    let arg = |i: usize, what: &str| -> Result<String> {
        args.get(i)
            .cloned()
            .ok_or_else(|| anyhow!("missing <{}> (try 'help')", what))
    };
    let flag = |key: &str| -> Option<String> {
        flags.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    };

    let command = match name.to_lowercase().as_str() {
        "login" => Command::Login {
            email: arg(0, "email")?,
            password: arg(1, "password")?,
        },
        "register" => Command::Register {
            name: arg(0, "name")?,
            email: arg(1, "email")?,
            password: arg(2, "password")?,
        },
        "logout" => Command::Logout,
        "me" => Command::Me,

        "couple" => Command::Couple,
        "invite" => Command::Invite {
            email: non_blank(arg(0, "email")?, "email")?,
        },
        "accept" => Command::Accept { request_id: arg(0, "request-id")? },
        "resend" => Command::Resend { request_id: arg(0, "request-id")? },

        "banks" => Command::Banks,
        "bank" => Command::Bank { id: arg(0, "id")? },
        "new-bank" => Command::NewBank {
            title: non_blank(arg(0, "title")?, "title")?,
            start: parse_date(&arg(1, "start")?)?,
            end: flag("end").map(|d| parse_date(&d)).transpose()?,
            description: flag("desc"),
        },
        "close" => Command::Close { id: arg(0, "id")? },
        "templates" => Command::Templates { bank_id: arg(0, "bank-id")? },
        "new-template" => Command::NewTemplate {
            bank_id: arg(0, "bank-id")?,
            title: non_blank(arg(1, "title")?, "title")?,
            amount_cents: positive_amount(&arg(2, "amount")?)?,
            description: flag("desc"),
        },
        "record" => Command::Record {
            template_id: arg(0, "template-id")?,
            occurred_at: flag("at").map(|t| parse_timestamp(&t)).transpose()?,
            notes: flag("notes"),
        },
        "history" => Command::History { bank_id: arg(0, "bank-id")? },
        "stats" => Command::Stats { bank_id: arg(0, "bank-id")? },

        "health" => Command::Health,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => bail!("unknown command '{}' (try 'help')", other),
    };

    Ok(Some(command))
}

/// Positional arguments and `--key value` pairs
fn split_flags(tokens: &[String]) -> Result<(Vec<String>, Vec<(String, String)>)> {
    let mut args = Vec::new();
    let mut flags = Vec::new();

    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if let Some(key) = token.strip_prefix("--") {
            let value = tokens
                .get(i + 1)
                .ok_or_else(|| anyhow!("flag --{} needs a value", key))?;
            flags.push((key.to_string(), value.clone()));
            i += 1;
        } else {
            args.push(token.clone());
        }
        i += 1;
    }

    Ok((args, flags))
}

/// Trimmed value; blank input is rejected
fn non_blank(value: String, what: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        bail!("<{}> must not be empty", what);
    }
    Ok(trimmed.to_string())
}

/// Voucher amounts are strictly positive minor units
fn positive_amount(s: &str) -> Result<i64> {
    let cents = parse_amount(s)?;
    if cents <= 0 {
        bail!("amount must be greater than zero, got '{}'", s.trim());
    }
    Ok(cents)
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| anyhow!("invalid date '{}', expected YYYY-MM-DD", s))
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Utc));
    }
    let date = parse_date(s).map_err(|_| anyhow!("invalid time '{}', expected RFC 3339 or YYYY-MM-DD", s))?;
    Ok(date.and_time(chrono::NaiveTime::default()).and_utc())
}

/// Split a line on whitespace, respecting quotes and backslash escapes
fn tokenize(input: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_single_quote = false;
    let mut in_double_quote = false;
    let mut escape_next = false;
    let mut quoted = false;

    for c in input.chars() {
        if escape_next {
            current.push(c);
            escape_next = false;
            continue;
        }

        match c {
            '\\' if !in_single_quote => {
                escape_next = true;
            }
            '\'' if !in_double_quote => {
                in_single_quote = !in_single_quote;
                quoted = true;
            }
            '"' if !in_single_quote => {
                in_double_quote = !in_double_quote;
                quoted = true;
            }
            ' ' | '\t' | '\n' | '\r' if !in_single_quote && !in_double_quote => {
                if !current.is_empty() || quoted {
                    tokens.push(std::mem::take(&mut current));
                    quoted = false;
                }
            }
            _ => {
                current.push(c);
            }
        }
    }

    if in_single_quote || in_double_quote {
        bail!("unterminated quote");
    }

    if !current.is_empty() || quoted {
        tokens.push(current);
    }

    Ok(tokens)
}
