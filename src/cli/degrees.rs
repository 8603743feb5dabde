use tabled::Table;

use crate::{cli::spinner, error, state::AppState, types::DegreeTableRow, warning};

/// Shows the degree playlists of one user with their track counts.
pub async fn degrees(state: AppState, user_id: String) {
    let client = match state.client_for(&user_id).await {
        Ok(client) => client,
        Err(e) => error!("Cannot act for {}: {}", user_id, e),
    };

    let pb = spinner("Fetching playlists...".to_string());
    let overview = state.reconciler().degree_overview(&client).await;
    pb.finish_and_clear();

    let degrees = match overview {
        Ok(degrees) => degrees,
        Err(e) => error!("Failed to list degree playlists: {}", e),
    };

    if degrees.is_empty() {
        warning!("{} has no degree playlists yet.", user_id);
        return;
    }

    let rows: Vec<DegreeTableRow> = degrees
        .into_iter()
        .map(|d| DegreeTableRow {
            degree: d.degree,
            name: d.name,
            tracks: d
                .tracks
                .map(|t| t.to_string())
                .unwrap_or_else(|| "?".to_string()),
        })
        .collect();

    println!("{}", Table::new(rows));
}
