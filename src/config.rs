use std::net::IpAddr;

use ipnet::IpNet;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub auth_jwt_secret: String,
    /// Shared secret gating `/api/admin/promote`. `None` disables promotion.
    pub admin_setup_code: Option<String>,
    pub host: IpAddr,
    pub port: u16,
    pub base_url: String,
    pub max_body_size: usize,
    pub trusted_proxies: Vec<IpNet>,
    pub log_level: String,
    pub smtp: Option<SmtpConfig>,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let auth_jwt_secret = env_required("AUTH_JWT_SECRET")?;

        let admin_setup_code = std::env::var("ADMIN_SETUP_CODE")
            .ok()
            .filter(|code| !code.trim().is_empty());

        let host: IpAddr = env_or("FLEETDESK_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid FLEETDESK_HOST: {e}"))?;

        let port: u16 = env_or("FLEETDESK_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid FLEETDESK_PORT: {e}"))?;

        let base_url = env_or("FLEETDESK_BASE_URL", &format!("http://{host}:{port}"))
            .trim_end_matches('/')
            .to_string();

        let max_body_size: usize = env_or("FLEETDESK_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid FLEETDESK_MAX_BODY_SIZE: {e}"))?;

        let trusted_proxies: Vec<IpNet> = env_or("FLEETDESK_TRUSTED_PROXIES", "")
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                s.trim()
                    .parse()
                    .map_err(|e| format!("Invalid FLEETDESK_TRUSTED_PROXIES entry '{s}': {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let log_level = env_or("FLEETDESK_LOG_LEVEL", "info");

        let smtp = match (
            std::env::var("FLEETDESK_SMTP_HOST").ok(),
            std::env::var("FLEETDESK_SMTP_PORT").ok(),
            std::env::var("FLEETDESK_SMTP_USER").ok(),
            std::env::var("FLEETDESK_SMTP_PASS").ok(),
            std::env::var("FLEETDESK_SMTP_FROM").ok(),
        ) {
            (Some(host), Some(port), Some(user), Some(pass), Some(from)) => Some(SmtpConfig {
                host,
                port: port
                    .parse()
                    .map_err(|e| format!("Invalid FLEETDESK_SMTP_PORT: {e}"))?,
                user,
                pass,
                from,
            }),
            _ => None,
        };

        Ok(Config {
            database_url,
            auth_jwt_secret,
            admin_setup_code,
            host,
            port,
            base_url,
            max_body_size,
            trusted_proxies,
            log_level,
            smtp,
        })
    }

    pub fn invitation_url(&self, token: &str) -> String {
        format!("{}/invitation/{token}", self.base_url)
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
