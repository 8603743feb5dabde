use crate::{
    cli::spinner,
    error,
    scheduler::{self, SyncSummary},
    state::AppState,
    success, warning,
};

/// One reconciliation pass right now, for a single user or for everyone.
pub async fn sync(state: AppState, user: Option<String>) {
    match user {
        Some(user_id) => sync_one(&state, &user_id).await,
        None => sync_everyone(&state).await,
    }
}

async fn sync_one(state: &AppState, user_id: &str) {
    let pb = spinner(format!("Reconciling {}...", user_id));
    let result = scheduler::sync_user(state, user_id).await;
    pb.finish_and_clear();

    match result {
        Ok(report) if report.snapshot == 0 => {
            success!("Nothing to do, the source playlist is empty.")
        }
        Ok(report) => {
            for promotion in &report.promoted {
                success!(
                    "{} track(s) promoted to {}",
                    promotion.tracks,
                    promotion.playlist
                );
            }
            success!("{} track(s) removed from the source playlist", report.removed);
        }
        Err(e) if e.is_credential() => {
            warning!("{} has to sign in again: {}", user_id, e)
        }
        Err(e) => error!("Sync failed for {}: {}", user_id, e),
    }
}

async fn sync_everyone(state: &AppState) {
    let pb = spinner("Reconciling all signed-in users...".to_string());
    let summary: SyncSummary = scheduler::sync_all(state).await;
    pb.finish_and_clear();

    if summary.users == 0 {
        warning!("No signed-in users yet. Start the server and sign in first.");
        return;
    }

    success!(
        "{} of {} users reconciled, {} track(s) promoted",
        summary.reconciled,
        summary.users,
        summary.promoted
    );
    if summary.skipped > 0 {
        warning!("{} user(s) skipped for missing or expired tokens", summary.skipped);
    }
    if summary.failed > 0 {
        warning!("{} user(s) failed, see the messages above", summary.failed);
    }
}
