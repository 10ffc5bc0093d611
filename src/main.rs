//! Piggybank - terminal client
//!
//! Reads one command per line and prints the result. Notices from the
//! stores and backend health changes are printed as they arrive.

use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use piggybank_client::app::{BackendStatus, HealthMonitor, Stores};
use piggybank_client::constants::{APP_NAME, APP_VERSION, HEALTH_POLL_INTERVAL, LOG_FILE_NAME};
use piggybank_client::shell::{parse_command, Shell, Step};
use piggybank_client::{ui, ApiClient, Config, FileStore, Notifier};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load();

    // Initialize logging to file, so it never interleaves with the shell
    std::fs::create_dir_all(&config.config_dir)?;
    let file_appender = tracing_appender::rolling::never(&config.config_dir, LOG_FILE_NAME);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    tracing::info!(api_url = %config.api_url, source = ?config.source, "Starting");

    let client = ApiClient::new(config.api_url.clone());
    let (notifier, mut notices) = Notifier::channel();
    let stores = Stores::new(client.clone(), Arc::new(FileStore::new()), notifier);

    let _watcher = stores.start().await;
    let health = HealthMonitor::spawn(client.clone(), HEALTH_POLL_INTERVAL);
    let mut health_rx = health.subscribe();

    println!("{} {} - {}", APP_NAME, APP_VERSION, config.api_url);
    println!("{}", ui::render_session(&stores.session.snapshot()));
    println!("Type 'help' for commands.");

    let shell = Shell::new(&stores, &client);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_status = BackendStatus::Unknown;

    prompt()?;
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line) {
                    Ok(Some(command)) => match shell.execute(command).await {
                        Step::Quit => break,
                        Step::Continue(text) => {
                            while let Ok(notice) = notices.try_recv() {
                                println!("{}", ui::render_notice(&notice));
                            }
                            if !text.is_empty() {
                                println!("{}", text);
                            }
                        }
                    },
                    Ok(None) => {}
                    Err(e) => println!("error: {}", e),
                }
                prompt()?;
            }
            Some(notice) = notices.recv() => {
                println!("\n{}", ui::render_notice(&notice));
                prompt()?;
            }
            Ok(()) = health_rx.changed() => {
                let snapshot = health_rx.borrow_and_update().clone();
                if snapshot.status != last_status && snapshot.status != BackendStatus::Unknown {
                    last_status = snapshot.status;
                    println!("\n{}", ui::render_health(&snapshot));
                    prompt()?;
                }
            }
        }
    }

    tracing::info!("Exiting");
    Ok(())
}

fn prompt() -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "> ")?;
    stdout.flush()
}
