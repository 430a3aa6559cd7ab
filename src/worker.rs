use std::time::Duration;

use tokio::sync::watch;

use crate::state::SharedState;

const SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);
const LOGIN_WINDOW: Duration = Duration::from_secs(15 * 60);
pub const SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(12 * 60 * 60);

/// Periodically prune idle dashboard sessions and expired login-limiter
/// entries until shutdown is signaled.
pub async fn run_housekeeping(state: SharedState, mut shutdown: watch::Receiver<bool>) {
    tracing::debug!("Housekeeping started");

    loop {
        if *shutdown.borrow() {
            break;
        }

        tokio::select! {
            _ = tokio::time::sleep(SWEEP_INTERVAL) => {}
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
                continue;
            }
        }

        let before = state.sessions.len();
        state.sessions.cleanup(SESSION_IDLE_TIMEOUT);
        state.login_limiter.cleanup(LOGIN_WINDOW);

        let expired = before.saturating_sub(state.sessions.len());
        if expired > 0 {
            tracing::info!("Expired {expired} idle admin sessions");
        }
    }

    tracing::debug!("Housekeeping stopped");
}
