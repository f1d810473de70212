use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub mail: MailConfig,
    pub oauth: OauthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
    /// Run against the in-memory store instead of Postgres. Development
    /// convenience; also what the integration tests run against.
    pub use_memory_store: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub session_secret: String,
    pub token_expiry_hours: u64,
    pub otp_expiry_minutes: i64,
    pub enable_cors: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Mail provider message endpoint. When unset, mail is logged instead.
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub from_address: String,
}

/// OAuth client credentials. The code exchange itself happens outside
/// this service; these are carried for the deployment that fronts it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OauthConfig {
    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
}

impl OauthConfig {
    pub fn is_configured(&self) -> bool {
        self.google_client_id.is_some() && self.google_client_secret.is_some()
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout =
                v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("STAYNEST_STORE") {
            self.database.use_memory_store = v.eq_ignore_ascii_case("memory");
        }

        // Security overrides
        if let Ok(v) = env::var("SESSION_SECRET") {
            self.security.session_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_TOKEN_EXPIRY_HOURS") {
            self.security.token_expiry_hours =
                v.parse().unwrap_or(self.security.token_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_OTP_EXPIRY_MINUTES") {
            self.security.otp_expiry_minutes =
                v.parse().unwrap_or(self.security.otp_expiry_minutes);
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }

        // Mail overrides
        if let Ok(v) = env::var("MAIL_API_URL") {
            self.mail.api_url = Some(v);
        }
        if let Ok(v) = env::var("MAIL_API_KEY") {
            self.mail.api_key = Some(v);
        }
        if let Ok(v) = env::var("MAIL_FROM_ADDRESS") {
            self.mail.from_address = v;
        }

        // OAuth overrides
        if let Ok(v) = env::var("GOOGLE_CLIENT_ID") {
            self.oauth.google_client_id = Some(v);
        }
        if let Ok(v) = env::var("GOOGLE_CLIENT_SECRET") {
            self.oauth.google_client_secret = Some(v);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
                use_memory_store: true,
            },
            security: SecurityConfig {
                session_secret: "development-secret-do-not-deploy".to_string(),
                token_expiry_hours: 24 * 7, // 1 week
                otp_expiry_minutes: 10,
                enable_cors: true,
            },
            mail: MailConfig {
                api_url: None,
                api_key: None,
                from_address: "Staynest <onboarding@staynest.dev>".to_string(),
            },
            oauth: OauthConfig {
                google_client_id: None,
                google_client_secret: None,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
                use_memory_store: false,
            },
            security: SecurityConfig {
                session_secret: String::new(),
                token_expiry_hours: 24,
                otp_expiry_minutes: 10,
                enable_cors: true,
            },
            mail: MailConfig {
                api_url: None,
                api_key: None,
                from_address: "Staynest <verify@staging.staynest.app>".to_string(),
            },
            oauth: OauthConfig {
                google_client_id: None,
                google_client_secret: None,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
                use_memory_store: false,
            },
            security: SecurityConfig {
                session_secret: String::new(),
                token_expiry_hours: 4,
                otp_expiry_minutes: 10,
                enable_cors: true,
            },
            mail: MailConfig {
                api_url: None,
                api_key: None,
                from_address: "Staynest <verify@staynest.app>".to_string(),
            },
            oauth: OauthConfig {
                google_client_id: None,
                google_client_secret: None,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_defaults_run_without_postgres() {
        let config = AppConfig::development();
        assert!(config.database.use_memory_store);
        assert!(!config.security.session_secret.is_empty());
        assert_eq!(config.security.otp_expiry_minutes, 10);
    }

    #[test]
    fn production_defaults_require_explicit_secret() {
        let config = AppConfig::production();
        assert!(!config.database.use_memory_store);
        assert!(config.security.session_secret.is_empty());
        assert_eq!(config.security.token_expiry_hours, 4);
    }
}
