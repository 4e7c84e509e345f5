use tokio::time;
use tracing::{debug, info};

use crate::{config::HostConfig, host::SessionTable};

/// Periodically drops sessions nobody has touched for a while. Runs forever.
pub async fn start_cleanup_task(table: SessionTable, config: HostConfig) {
    let mut interval = time::interval(config.cleanup_interval);

    info!(
        "Started game cleanup task: checking every {}s, inactive timeout: {}s",
        config.cleanup_interval.as_secs(),
        config.inactive_timeout.as_secs()
    );

    loop {
        interval.tick().await;
        cleanup_sessions(&table, config.inactive_timeout);
    }
}

/// Removes every idle session and returns how many went.
pub fn cleanup_sessions(table: &SessionTable, inactive_timeout: time::Duration) -> usize {
    let mut sessions_to_remove = Vec::new();

    for entry in table.sessions().iter() {
        // A locked session is in use right now.
        if let Ok(hosted) = entry.value().try_lock()
            && hosted.should_cleanup(inactive_timeout)
        {
            sessions_to_remove.push(entry.key().clone());
        }
    }

    let removed_count = sessions_to_remove.len();
    for id in sessions_to_remove {
        table.remove(&id);
        debug!("Cleaned up game: {}", id);
    }

    if removed_count > 0 {
        info!("Cleaned up {} inactive games", removed_count);
    }
    removed_count
}
