//! # Configuration
//!
//! Resolves the bot's configuration from the process environment once, at
//! startup. Components receive plain values from this snapshot and never read
//! the environment themselves.

use std::env;

use thiserror::Error;

/// Command prefix used when `PREFIX` is unset.
const DEFAULT_PREFIX: &str = "!";
/// Signed-token freshness window, in seconds, when `TOKEN_TTL_SECS` is unset.
const DEFAULT_TOKEN_TTL_SECS: i64 = 60;
/// Upper bound accepted for `TOKEN_TTL_SECS` (one day).
const MAX_TOKEN_TTL_SECS: i64 = 86_400;
/// Outbound webhook deadline, in seconds, when `WEBHOOK_TIMEOUT_SECS` is unset.
const DEFAULT_WEBHOOK_TIMEOUT_SECS: u64 = 30;

/// Errors raised while resolving the environment. All of them are fatal at
/// startup: the process must not come up half-configured.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is absent or empty.
    #[error("{0} must be set")]
    Missing(&'static str),

    /// A variable is present but unusable.
    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Immutable configuration snapshot.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Discord gateway credential. Opaque to everything but the client.
    pub discord_token: String,
    /// Command prefix, e.g. `!`.
    pub prefix: String,
    /// User identifiers permitted to invoke commands. Empty means open mode:
    /// every user is allowed.
    pub allowed_user_ids: Vec<String>,
    /// Shared secret for signing relay tokens.
    pub jwt_secret: String,
    /// Automation webhook URL commands are relayed to.
    pub webhook_url: String,
    /// Credential reserved for the assistant workflow; the relay itself never
    /// uses it.
    pub chatgpt_api_key: Option<String>,
    /// Signed-token freshness window in seconds.
    pub token_ttl_secs: i64,
    /// Outbound webhook deadline in seconds.
    pub webhook_timeout_secs: u64,
}

impl AppConfig {
    /// Load the snapshot from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let webhook_url = require("N8N_WEBHOOK")?;
        reqwest::Url::parse(&webhook_url).map_err(|e| ConfigError::Invalid {
            var: "N8N_WEBHOOK",
            reason: e.to_string(),
        })?;

        Ok(Self {
            discord_token: require("TOKEN")?,
            prefix: prefix_or_default(env::var("PREFIX").ok()),
            allowed_user_ids: env::var("ALLOWED_USER_IDS")
                .map(|raw| parse_id_list(&raw))
                .unwrap_or_default(),
            jwt_secret: require("JWT_SECRET")?,
            webhook_url,
            chatgpt_api_key: env::var("CHATGPT_API_KEY").ok().filter(|v| !v.is_empty()),
            token_ttl_secs: checked_ttl(parse_or_default(
                "TOKEN_TTL_SECS",
                DEFAULT_TOKEN_TTL_SECS,
            )?)?,
            webhook_timeout_secs: parse_or_default(
                "WEBHOOK_TIMEOUT_SECS",
                DEFAULT_WEBHOOK_TIMEOUT_SECS,
            )?,
        })
    }
}

fn require(var: &'static str) -> Result<String, ConfigError> {
    match env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(var)),
    }
}

/// Parse a comma-separated identifier list, ignoring blank entries so
/// `"1, 2,"` and `"1,2"` mean the same thing.
fn parse_id_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// An explicitly empty `PREFIX` means the same as an unset one. An empty
/// prefix would make every message parse as a command.
fn prefix_or_default(raw: Option<String>) -> String {
    raw.filter(|prefix| !prefix.is_empty()).unwrap_or_else(|| DEFAULT_PREFIX.to_string())
}

/// Reject freshness windows that would mint already-expired tokens or
/// overflow the signer's clock arithmetic.
fn checked_ttl(secs: i64) -> Result<i64, ConfigError> {
    if (1..=MAX_TOKEN_TTL_SECS).contains(&secs) {
        Ok(secs)
    } else {
        Err(ConfigError::Invalid {
            var: "TOKEN_TTL_SECS",
            reason: format!("must be between 1 and {MAX_TOKEN_TTL_SECS} seconds"),
        })
    }
}

fn parse_or_default<T>(var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_list_splits_on_commas() {
        assert_eq!(parse_id_list("42,7"), vec!["42", "7"]);
    }

    #[test]
    fn id_list_trims_whitespace_and_blanks() {
        assert_eq!(parse_id_list(" 42 , 7 ,"), vec!["42", "7"]);
        assert_eq!(parse_id_list(",,"), Vec::<String>::new());
    }

    #[test]
    fn id_list_of_empty_string_is_empty() {
        assert!(parse_id_list("").is_empty());
    }

    #[test]
    fn missing_error_names_the_variable() {
        assert_eq!(ConfigError::Missing("JWT_SECRET").to_string(), "JWT_SECRET must be set");
    }

    #[test]
    fn empty_prefix_falls_back_to_the_default() {
        assert_eq!(prefix_or_default(Some(String::new())), DEFAULT_PREFIX);
        assert_eq!(prefix_or_default(None), DEFAULT_PREFIX);
        assert_eq!(prefix_or_default(Some("/".to_string())), "/");
    }

    #[test]
    fn ttl_outside_the_accepted_range_is_invalid() {
        assert_eq!(checked_ttl(60).unwrap(), 60);
        assert_eq!(checked_ttl(MAX_TOKEN_TTL_SECS).unwrap(), MAX_TOKEN_TTL_SECS);
        assert!(matches!(
            checked_ttl(0),
            Err(ConfigError::Invalid { var: "TOKEN_TTL_SECS", .. })
        ));
        assert!(checked_ttl(-60).is_err());
        assert!(checked_ttl(i64::MAX).is_err());
    }
}
