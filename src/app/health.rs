//! Backend reachability monitor. Polls `/health` right away and then on a
//! fixed interval, publishing the latest result.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::network::ApiClient;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendStatus {
    #[default]
    Unknown,
    Online,
    Offline,
}

impl BackendStatus {
    pub fn as_str(&self) -> &str {
        match self {
            BackendStatus::Unknown => "unknown",
            BackendStatus::Online => "online",
            BackendStatus::Offline => "offline",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HealthSnapshot {
    pub status: BackendStatus,
    pub last_checked: Option<DateTime<Utc>>,
}

/// One probe
pub async fn check_once(client: &ApiClient) -> HealthSnapshot {
    let status = if client.health_check().await {
        BackendStatus::Online
    } else {
        BackendStatus::Offline
    };
    HealthSnapshot {
        status,
        last_checked: Some(Utc::now()),
    }
}

/// Polling task handle. Dropping it stops the polling.
pub struct HealthMonitor {
    rx: watch::Receiver<HealthSnapshot>,
    task: JoinHandle<()>,
}

impl HealthMonitor {
    pub fn spawn(client: ApiClient, interval: Duration) -> Self {
        let (tx, rx) = watch::channel(HealthSnapshot::default());
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let snapshot = check_once(&client).await;
                tracing::debug!(status = snapshot.status.as_str(), "Backend health checked");
                if tx.send(snapshot).is_err() {
                    break;
                }
            }
        });
        HealthMonitor { rx, task }
    }

    pub fn snapshot(&self) -> HealthSnapshot {
        self.rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<HealthSnapshot> {
        self.rx.clone()
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        self.task.abort();
    }
}
