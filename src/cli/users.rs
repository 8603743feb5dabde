use chrono::{DateTime, Local};
use tabled::Table;

use crate::{error, state::AppState, types::UserTableRow, warning};

/// Lists every user with a cached token.
pub async fn users(state: AppState) {
    let users = match state.tokens.users().await {
        Ok(users) => users,
        Err(e) => error!("Cannot read token cache: {}", e),
    };

    if users.is_empty() {
        warning!("No signed-in users yet.");
        return;
    }

    let mut rows = Vec::with_capacity(users.len());
    for user in users {
        let expires = match state.tokens.get(&user).await {
            Ok(Some(token)) => DateTime::from_timestamp(token.expires_at() as i64, 0)
                .map(|at| {
                    at.with_timezone(&Local)
                        .format("%Y-%m-%d %H:%M:%S")
                        .to_string()
                })
                .unwrap_or_else(|| "-".to_string()),
            Ok(None) => "unreadable".to_string(),
            Err(e) => format!("error: {e}"),
        };
        rows.push(UserTableRow { user, expires });
    }

    println!("{}", Table::new(rows));
}
