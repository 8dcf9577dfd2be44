use std::collections::HashSet;
use std::env;
use std::fs;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Public webmail domains excluded outright. Matches the operator default
/// shipped with the service; override with `FREE_PROVIDERS_PATH`.
const DEFAULT_FREE_PROVIDERS: &[&str] = &[
    "gmail.com",
    "yahoo.com",
    "outlook.com",
    "hotmail.com",
    "live.com",
    "msn.com",
    "rediffmail.com",
    "protonmail.com",
    "yandex.com",
    "zoho.com",
    "mail.com",
    "aol.com",
];

const DEFAULT_DISPOSABLE_PROVIDERS: &[&str] = &[
    "tempmail.com",
    "10minutemail.com",
    "guerrillamail.com",
    "mailinator.com",
    "throwaway.email",
    "temp-mail.org",
];

/// Local-part tokens that indicate a function mailbox rather than a person.
/// Matched as substrings of the lowercased local part.
const DEFAULT_ROLE_TOKENS: &[&str] = &[
    "info", "admin", "support", "sales", "contact", "hello", "help", "team", "noreply", "no-reply",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read reference table {path}: {source}")]
    TableRead {
        path: String,
        source: std::io::Error,
    },
    #[error("malformed entry {entry:?} in reference table {path}")]
    MalformedEntry { path: String, entry: String },
    #[error("invalid value {value:?} for {var}")]
    InvalidEnv { var: String, value: String },
}

/// Static reference data the classifiers run against. Built once at startup
/// and injected into the pipeline, so deployments can swap the tables and
/// tests can override them without touching core logic.
#[derive(Debug, Clone)]
pub struct ReferenceTables {
    free_providers: HashSet<String>,
    disposable_providers: HashSet<String>,
    role_tokens: Vec<String>,
}

impl ReferenceTables {
    pub fn new(
        free_providers: impl IntoIterator<Item = String>,
        disposable_providers: impl IntoIterator<Item = String>,
        role_tokens: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            free_providers: free_providers.into_iter().map(|d| d.to_lowercase()).collect(),
            disposable_providers: disposable_providers
                .into_iter()
                .map(|d| d.to_lowercase())
                .collect(),
            role_tokens: role_tokens.into_iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    /// Built-in defaults, used when no table files are configured.
    pub fn builtin() -> Self {
        Self::new(
            DEFAULT_FREE_PROVIDERS.iter().map(|s| s.to_string()),
            DEFAULT_DISPOSABLE_PROVIDERS.iter().map(|s| s.to_string()),
            DEFAULT_ROLE_TOKENS.iter().map(|s| s.to_string()),
        )
    }

    /// Loads tables from the paths named by `FREE_PROVIDERS_PATH`,
    /// `DISPOSABLE_PROVIDERS_PATH` and `ROLE_TOKENS_PATH`, falling back to
    /// the builtin set for any path left unset. A malformed table is fatal
    /// here rather than a per-candidate surprise later.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::builtin();

        let free_providers = match env::var("FREE_PROVIDERS_PATH") {
            Ok(path) => load_table(&path)?.into_iter().collect(),
            Err(_) => defaults.free_providers,
        };
        let disposable_providers = match env::var("DISPOSABLE_PROVIDERS_PATH") {
            Ok(path) => load_table(&path)?.into_iter().collect(),
            Err(_) => defaults.disposable_providers,
        };
        let role_tokens = match env::var("ROLE_TOKENS_PATH") {
            Ok(path) => load_table(&path)?,
            Err(_) => defaults.role_tokens,
        };

        info!(
            free = free_providers.len(),
            disposable = disposable_providers.len(),
            role_tokens = role_tokens.len(),
            "loaded provider reference tables"
        );

        Ok(Self {
            free_providers,
            disposable_providers,
            role_tokens,
        })
    }

    pub fn is_free_domain(&self, domain: &str) -> bool {
        self.free_providers.contains(&domain.to_lowercase())
    }

    pub fn is_disposable_domain(&self, domain: &str) -> bool {
        self.disposable_providers.contains(&domain.to_lowercase())
    }

    /// Substring match, not token-boundary match: "info" flags
    /// "information123" as well.
    pub fn matches_role_token(&self, local_part: &str) -> bool {
        let local = local_part.to_lowercase();
        self.role_tokens.iter().any(|token| local.contains(token))
    }
}

/// One entry per line; blank lines and `#` comments are skipped. Entries
/// containing whitespace are rejected as malformed.
fn load_table(path: &str) -> Result<Vec<String>, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::TableRead {
        path: path.to_string(),
        source,
    })?;

    let mut entries = Vec::new();
    for line in contents.lines() {
        let entry = line.trim();
        if entry.is_empty() || entry.starts_with('#') {
            continue;
        }
        if entry.chars().any(char::is_whitespace) {
            return Err(ConfigError::MalformedEntry {
                path: path.to_string(),
                entry: entry.to_string(),
            });
        }
        entries.push(entry.to_lowercase());
    }
    Ok(entries)
}

/// Runtime settings for the HTTP server and the network-facing lookups.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub port: u16,
    pub dns_timeout: Duration,
    pub dns_attempts: usize,
    pub whois_timeout: Duration,
    pub batch_concurrency: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_env("PORT", 8080)?,
            dns_timeout: Duration::from_secs(parse_env("DNS_TIMEOUT_SECS", 2)?),
            dns_attempts: parse_env("DNS_ATTEMPTS", 2)?,
            whois_timeout: Duration::from_secs(parse_env("WHOIS_TIMEOUT_SECS", 5)?),
            batch_concurrency: parse_env("BATCH_CONCURRENCY", 8)?,
        })
    }
}

fn parse_env<T: std::str::FromStr>(var: &str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(value) => value.parse().map_err(|_| ConfigError::InvalidEnv {
            var: var.to_string(),
            value,
        }),
        Err(_) => Ok(default),
    }
}
