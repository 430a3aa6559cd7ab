use std::sync::Arc;

use crate::auth::Authenticator;
use crate::config::Config;
use crate::forms::FormsClient;
use crate::rate_limit::LoginRateLimiter;
use crate::store::StatusStore;
use crate::ui::SessionStore;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn StatusStore>,
    /// `None` when the site id or API token is missing.
    pub forms: Option<FormsClient>,
    pub authenticator: Arc<dyn Authenticator>,
    pub sessions: SessionStore,
    pub login_limiter: LoginRateLimiter,
}
