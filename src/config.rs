// LapsSync - Configuration
//
// All settings come from the environment (optionally seeded from a `.env`
// file). The whole configuration is validated up front, before any network
// I/O, and then passed by reference to every collaborator.

use std::fmt;

use thiserror::Error;
use zeroize::Zeroizing;

pub const ENV_OP_CONNECT_HOST: &str = "OP_CONNECT_HOST";
pub const ENV_OP_CONNECT_TOKEN: &str = "OP_CONNECT_TOKEN";
pub const ENV_OP_VAULT_TITLE: &str = "OP_VAULT_TITLE";
pub const ENV_LAPS_USERNAME: &str = "LAPS_USERNAME";
pub const ENV_LDAP_URL: &str = "LDAP_URL";
pub const ENV_LDAP_AUTH_CN: &str = "LDAP_AUTH_CN";
pub const ENV_LDAP_AUTH_PW: &str = "LDAP_AUTH_PW";
pub const ENV_LDAP_SEARCH_BASEDN: &str = "LDAP_SEARCH_BASEDN";
pub const ENV_LDAP_SEARCH_FILTER: &str = "LDAP_SEARCH_FILTER";

/// Username written into newly created items when `LAPS_USERNAME` is unset.
pub const DEFAULT_LAPS_USERNAME: &str = "Administrator";

/// Every computer object that has a LAPS password.
pub const DEFAULT_SEARCH_FILTER: &str = "(&(objectCategory=computer)(ms-Mcs-AdmPwd=*))";

/// How many characters of the Connect token may appear in debug logs.
const TOKEN_LOG_PREFIX: usize = 8;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<String>),

    #[error("Failed to load .env file: {0}")]
    DotEnv(#[from] dotenvy::Error),
}

/// Settings for the 1Password Connect side.
pub struct VaultConfig {
    pub connect_host: String,
    pub connect_token: Zeroizing<String>,
    pub vault_title: String,
    /// Username stored in slot 0 of created items.
    pub default_username: String,
}

impl fmt::Debug for VaultConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultConfig")
            .field("connect_host", &self.connect_host)
            .field("connect_token", &"[REDACTED]")
            .field("vault_title", &self.vault_title)
            .field("default_username", &self.default_username)
            .finish()
    }
}

/// Settings for the LDAP side.
pub struct DirectoryConfig {
    pub url: String,
    pub bind_dn: String,
    pub bind_password: Zeroizing<String>,
    pub base_dn: String,
    pub filter: String,
}

impl fmt::Debug for DirectoryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryConfig")
            .field("url", &self.url)
            .field("bind_dn", &self.bind_dn)
            .field("bind_password", &"[REDACTED]")
            .field("base_dn", &self.base_dn)
            .field("filter", &self.filter)
            .finish()
    }
}

#[derive(Debug)]
pub struct Config {
    pub vault: VaultConfig,
    pub directory: DirectoryConfig,
}

impl Config {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
            Err(e) if e.not_found() => tracing::debug!("No .env file found"),
            Err(e) => return Err(e.into()),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Every missing or empty required variable is logged and reported
    /// together in a single `ConfigError::Missing`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut required = |key: &str| -> String {
            match lookup(key) {
                None => {
                    tracing::error!("{} not set", key);
                    missing.push(key.to_string());
                    String::new()
                }
                Some(value) if value.trim().is_empty() => {
                    tracing::error!("{} is empty", key);
                    missing.push(key.to_string());
                    String::new()
                }
                Some(value) => value,
            }
        };

        let connect_host = required(ENV_OP_CONNECT_HOST);
        let connect_token = Zeroizing::new(required(ENV_OP_CONNECT_TOKEN));
        let vault_title = required(ENV_OP_VAULT_TITLE);
        let url = required(ENV_LDAP_URL);
        let bind_dn = required(ENV_LDAP_AUTH_CN);
        let bind_password = Zeroizing::new(required(ENV_LDAP_AUTH_PW));
        let base_dn = required(ENV_LDAP_SEARCH_BASEDN);

        let optional = |key: &str, default: &str| -> String {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        let default_username = optional(ENV_LAPS_USERNAME, DEFAULT_LAPS_USERNAME);
        let filter = optional(ENV_LDAP_SEARCH_FILTER, DEFAULT_SEARCH_FILTER);

        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        tracing::debug!(host = %connect_host, "{} is set", ENV_OP_CONNECT_HOST);
        tracing::debug!(
            prefix = %token_prefix(&connect_token),
            "{} is set",
            ENV_OP_CONNECT_TOKEN
        );
        tracing::debug!(vault = %vault_title, "{} is set", ENV_OP_VAULT_TITLE);

        Ok(Self {
            vault: VaultConfig {
                connect_host,
                connect_token,
                vault_title,
                default_username,
            },
            directory: DirectoryConfig {
                url,
                bind_dn,
                bind_password,
                base_dn,
                filter,
            },
        })
    }
}

fn token_prefix(token: &str) -> String {
    let prefix: String = token.chars().take(TOKEN_LOG_PREFIX).collect();
    format!("{}...", prefix)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
