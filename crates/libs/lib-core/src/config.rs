//! # Application Configuration
//!
//! Settings loaded from environment variables once at startup. The loaded
//! value is immutable and handed to every component at construction time;
//! there is no global settings singleton, so the only way to observe
//! configuration is through the instance built in the composition root.
//!
//! Missing required variables (the Azure OpenAI credential/endpoint pair and
//! the database connection string) fail startup with an error naming the
//! variable. Everything else has a default.

use crate::error::{AppError, Result};
use lib_utils::envs::{get_env, get_env_or, get_env_parse_or};

/// Service name reported by the liveness endpoints.
pub const APP_NAME: &str = "Email Reply Agent";

/// Service version reported by the liveness endpoints.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Immutable application settings, grouped by concern.
///
/// Constructed once via [`Settings::from_env`] and shared by reference for
/// the remainder of the process lifetime.
#[derive(Clone, Debug)]
pub struct Settings {
    pub app: AppSettings,
    pub azure_openai: AzureOpenAiSettings,
    pub gmail: GmailSettings,
    pub outlook: OutlookSettings,
    pub database: DatabaseSettings,
    pub scheduler: SchedulerSettings,
    pub azure: AzureResourceSettings,
    pub profile: OperatorProfile,
}

#[derive(Clone, Debug)]
pub struct AppSettings {
    /// Deployment environment, `development` or `production`.
    pub env: String,
    pub host: String,
    pub port: u16,
    pub secret_key: String,
}

impl AppSettings {
    pub fn is_development(&self) -> bool {
        self.env == "development"
    }

    pub fn is_production(&self) -> bool {
        self.env == "production"
    }
}

/// Azure OpenAI endpoint and credentials used by the draft generator.
///
/// Key and endpoint are required even though no code consumes them yet:
/// a deployment without them is misconfigured and should fail at startup,
/// not when the first draft is requested.
#[derive(Clone, Debug)]
pub struct AzureOpenAiSettings {
    pub api_key: String,
    pub endpoint: String,
    pub deployment_name: String,
    pub api_version: String,
}

#[derive(Clone, Debug)]
pub struct GmailSettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub token_file: String,
}

#[derive(Clone, Debug)]
pub struct OutlookSettings {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
    pub redirect_uri: String,
}

/// Database connection settings.
///
/// `url` is what the pool actually connects with. The component fields are
/// carried for deployment tooling that composes the URL externally.
#[derive(Clone, Debug)]
pub struct DatabaseSettings {
    pub url: String,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    pub root_password: String,
}

#[derive(Clone, Debug)]
pub struct SchedulerSettings {
    pub poll_interval_minutes: u64,
}

/// Azure resource identifiers for the hosting infrastructure.
#[derive(Clone, Debug)]
pub struct AzureResourceSettings {
    pub subscription_id: String,
    pub resource_group: String,
    pub location: String,
    pub acr_name: String,
    pub acr_login_server: String,
    pub container_app_name: String,
    pub key_vault_name: String,
}

/// Operator profile used to personalize generated replies.
#[derive(Clone, Debug)]
pub struct OperatorProfile {
    pub name: String,
    pub visa_status: String,
    pub skills: String,
    pub experience_years: u32,
    pub target_roles: String,
    pub linkedin: String,
    pub github: String,
}

impl Settings {
    /// Load all settings from environment variables.
    ///
    /// Reads the environment exactly once; no side effects beyond the read.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            app: AppSettings {
                env: get_env_or("APP_ENV", "development"),
                host: get_env_or("APP_HOST", "0.0.0.0"),
                port: get_env_parse_or("APP_PORT", 8000)?,
                secret_key: get_env_or("SECRET_KEY", "change-me-in-production"),
            },
            azure_openai: AzureOpenAiSettings {
                api_key: get_env("AZURE_OPENAI_API_KEY")?,
                endpoint: get_env("AZURE_OPENAI_ENDPOINT")?,
                deployment_name: get_env_or("AZURE_OPENAI_DEPLOYMENT_NAME", "gpt-4o-email-agent"),
                api_version: get_env_or("AZURE_OPENAI_API_VERSION", "2024-02-01"),
            },
            gmail: GmailSettings {
                client_id: get_env_or("GMAIL_CLIENT_ID", ""),
                client_secret: get_env_or("GMAIL_CLIENT_SECRET", ""),
                redirect_uri: get_env_or(
                    "GMAIL_REDIRECT_URI",
                    "http://localhost:8000/auth/gmail/callback",
                ),
                token_file: get_env_or("GMAIL_TOKEN_FILE", "./gmail_token.json"),
            },
            outlook: OutlookSettings {
                client_id: get_env_or("OUTLOOK_CLIENT_ID", ""),
                client_secret: get_env_or("OUTLOOK_CLIENT_SECRET", ""),
                tenant_id: get_env_or("OUTLOOK_TENANT_ID", "common"),
                redirect_uri: get_env_or(
                    "OUTLOOK_REDIRECT_URI",
                    "http://localhost:8000/auth/outlook/callback",
                ),
            },
            database: DatabaseSettings {
                url: get_env("DATABASE_URL")?,
                host: get_env_or("MYSQL_HOST", "db"),
                port: get_env_parse_or("MYSQL_PORT", 3306)?,
                database: get_env_or("MYSQL_DATABASE", "email_agent"),
                user: get_env_or("MYSQL_USER", "agent_user"),
                password: get_env_or("MYSQL_PASSWORD", ""),
                root_password: get_env_or("MYSQL_ROOT_PASSWORD", ""),
            },
            scheduler: SchedulerSettings {
                poll_interval_minutes: get_env_parse_or("POLL_INTERVAL_MINUTES", 3)?,
            },
            azure: AzureResourceSettings {
                subscription_id: get_env_or("AZURE_SUBSCRIPTION_ID", ""),
                resource_group: get_env_or("AZURE_RESOURCE_GROUP", "email-reply-agent-rg"),
                location: get_env_or("AZURE_LOCATION", "eastus"),
                acr_name: get_env_or("ACR_NAME", "emailagentacr"),
                acr_login_server: get_env_or("ACR_LOGIN_SERVER", "emailagentacr.azurecr.io"),
                container_app_name: get_env_or("AZURE_CONTAINER_APP_NAME", "email-reply-agent"),
                key_vault_name: get_env_or("AZURE_KEY_VAULT_NAME", "email-agent-kv"),
            },
            profile: OperatorProfile {
                name: get_env_or("YOUR_NAME", "Your Name"),
                visa_status: get_env_or("YOUR_VISA_STATUS", "OPT STEM"),
                skills: get_env_or("YOUR_SKILLS", "Machine Learning, Python"),
                experience_years: get_env_parse_or("YOUR_EXPERIENCE_YEARS", 2)?,
                target_roles: get_env_or("YOUR_TARGET_ROLES", "ML Engineer, AI Engineer"),
                linkedin: get_env_or("YOUR_LINKEDIN", ""),
                github: get_env_or("YOUR_GITHUB", ""),
            },
        })
    }

    /// Validate loaded values against basic operational rules.
    pub fn validate(&self) -> Result<()> {
        if self.app.port == 0 {
            return Err(AppError::Config("APP_PORT must be nonzero".to_string()));
        }

        if self.scheduler.poll_interval_minutes < 1 {
            return Err(AppError::Config(
                "POLL_INTERVAL_MINUTES must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
