//! Periodic reconciliation of every user with a cached token.
//!
//! Users are processed one after another. A failing pass is logged and
//! left alone: the next tick recomputes from current playlist contents.

use std::future::Future;

use tokio::time::{self, MissedTickBehavior};

use crate::{
    error::Result, info, reconcile::PassReport, spotify::SpotifyApi, state::AppState, success,
    warning,
};

/// Counts for one sweep over all users.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub users: usize,
    pub reconciled: usize,
    pub skipped: usize,
    pub failed: usize,
    pub promoted: usize,
}

pub struct Scheduler {
    state: AppState,
}

impl Scheduler {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Runs forever, one sweep per configured interval. The first sweep
    /// starts immediately.
    pub async fn run(self) {
        let period = self.state.config.sync_interval;
        let mut ticker = time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!("Scheduler started, syncing every {}s", period.as_secs());

        loop {
            ticker.tick().await;
            let summary = sync_all(&self.state).await;
            if summary.promoted > 0 || summary.failed > 0 {
                info!(
                    "Sync finished: {} users, {} reconciled, {} skipped, {} failed, {} tracks promoted",
                    summary.users,
                    summary.reconciled,
                    summary.skipped,
                    summary.failed,
                    summary.promoted
                );
            }
        }
    }
}

/// Reconciles every cached user once.
pub async fn sync_all(state: &AppState) -> SyncSummary {
    sync_all_with(state, move |user_id| async move { state.client_for(&user_id).await }).await
}

/// Same sweep, with the client for each user built by `connect`.
///
/// A failing user is counted and logged; the sweep carries on with the next.
pub async fn sync_all_with<F, Fut, A>(state: &AppState, connect: F) -> SyncSummary
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<A>>,
    A: SpotifyApi,
{
    let users = match state.tokens.users().await {
        Ok(users) => users,
        Err(e) => {
            warning!("Cannot list cached users: {}", e);
            return SyncSummary::default();
        }
    };

    let mut summary = SyncSummary {
        users: users.len(),
        ..SyncSummary::default()
    };

    for user_id in users {
        let outcome = match connect(user_id.clone()).await {
            Ok(client) => state.reconciler().reconcile(&client).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(report) => {
                summary.reconciled += 1;
                summary.promoted += report.total_promoted();
                log_report(&user_id, &report);
            }
            Err(e) if e.is_credential() => {
                summary.skipped += 1;
                info!("Skipping {}: {}", user_id, e);
            }
            Err(e) => {
                summary.failed += 1;
                warning!("Sync aborted for {}: {}", user_id, e);
            }
        }
    }

    summary
}

/// One pass for one user.
pub async fn sync_user(state: &AppState, user_id: &str) -> Result<PassReport> {
    let client = state.client_for(user_id).await?;
    state.reconciler().reconcile(&client).await
}

fn log_report(user_id: &str, report: &PassReport) {
    if report.snapshot == 0 {
        return;
    }

    for promotion in &report.promoted {
        info!(
            "{}: {} track(s) promoted to {}",
            user_id, promotion.tracks, promotion.playlist
        );
    }
    success!(
        "{}: {} track(s) reconciled, source playlist drained",
        user_id,
        report.removed
    );
}
