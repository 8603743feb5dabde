use crate::{error, scheduler::Scheduler, server::start_api_server, state::AppState};

/// Runs the web front end and, unless disabled, the background scheduler in
/// the same process.
pub async fn serve(state: AppState, with_scheduler: bool) {
    if with_scheduler {
        let scheduler = Scheduler::new(state.clone());
        tokio::spawn(scheduler.run());
    }

    if let Err(e) = start_api_server(state).await {
        error!("Web server stopped: {}", e);
    }
}
