use std::net::IpAddr;

pub const DEFAULT_FORMS_API_BASE: &str = "https://api.netlify.com/api/v1";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    /// Postgres URL for the status store. Without it statuses live in memory.
    pub database_url: Option<String>,
    pub forms: FormsConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone)]
pub struct FormsConfig {
    pub api_base: String,
    pub site_id: Option<String>,
    pub api_token: Option<String>,
    pub form_name: String,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub mode: AuthMode,
    pub admin_key: Option<String>,
    pub identity_secret: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AuthMode {
    /// Static `x-admin-key` header compared against `FORMDESK_ADMIN_KEY`.
    SharedSecret,
    /// `Authorization: Bearer` token issued by the identity provider.
    Identity,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host: IpAddr = env_or("FORMDESK_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid FORMDESK_HOST: {e}"))?;

        let port: u16 = env_or("FORMDESK_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid FORMDESK_PORT: {e}"))?;

        let log_level = env_or("FORMDESK_LOG_LEVEL", "info");

        let mode = match env_or("FORMDESK_AUTH_MODE", "shared_secret").as_str() {
            "shared_secret" => AuthMode::SharedSecret,
            "identity" => AuthMode::Identity,
            other => return Err(format!("Invalid FORMDESK_AUTH_MODE: {other}")),
        };

        let forms = FormsConfig {
            api_base: env_or("FORMDESK_FORMS_API_BASE", DEFAULT_FORMS_API_BASE)
                .trim_end_matches('/')
                .to_string(),
            site_id: env_optional("FORMDESK_SITE_ID"),
            api_token: env_optional("FORMDESK_API_TOKEN"),
            form_name: env_or("FORMDESK_FORM_NAME", "contact"),
        };

        let auth = AuthConfig {
            mode,
            admin_key: env_optional("FORMDESK_ADMIN_KEY"),
            identity_secret: env_optional("FORMDESK_IDENTITY_SECRET"),
        };

        Ok(Config {
            host,
            port,
            log_level,
            database_url: env_optional("DATABASE_URL"),
            forms,
            auth,
        })
    }
}

fn env_optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    env_optional(key).unwrap_or_else(|| default.to_string())
}
