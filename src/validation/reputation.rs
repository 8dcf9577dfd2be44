use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, warn};
use utoipa::ToSchema;

/// Domain-age signals derived from registration records.
///
/// `is_new` and `is_established` are mutually exclusive; both false means
/// the age sits between the 90-day and 365-day breakpoints, or is unknown.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ReputationFindings {
    pub age_days: Option<i64>,
    pub is_new: bool,
    pub is_established: bool,
    pub risk_score: u8,
}

/// Converts a domain age into the reputation tier. The 90-day breakpoint
/// drives `is_new`, the 365-day breakpoint drives `is_established`, and
/// the risk tiers use their own 30/90/180 cutoffs.
pub fn classify_age(age_days: Option<i64>) -> ReputationFindings {
    match age_days {
        Some(age) => ReputationFindings {
            age_days: Some(age),
            is_new: age < 90,
            is_established: age > 365,
            risk_score: if age < 30 {
                50
            } else if age < 90 {
                30
            } else if age < 180 {
                10
            } else {
                0
            },
        },
        // Unknown age is expected, not exceptional: mid-tier risk.
        None => ReputationFindings {
            age_days: None,
            is_new: false,
            is_established: false,
            risk_score: 20,
        },
    }
}

/// Capability: find out how many days ago a domain was registered.
/// Failures of any kind collapse to `None`; the caller treats unknown age
/// as a degraded signal, never an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationLookup: Send + Sync {
    async fn lookup_age(&self, domain: &str) -> Option<i64>;
}

#[derive(Debug, Error)]
enum WhoisError {
    #[error("domain has no top-level label")]
    NoTld,
    #[error("whois query timed out")]
    Timeout,
    #[error("whois connection failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("no creation date in whois response")]
    NoCreationDate,
}

/// Registration lookup over plain WHOIS (TCP port 43), routed through the
/// per-TLD aliases under `whois-servers.net`.
pub struct WhoisClient {
    timeout: Duration,
}

impl WhoisClient {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    async fn query(&self, domain: &str) -> Result<i64, WhoisError> {
        let tld = domain.rsplit('.').next().filter(|s| !s.is_empty()).ok_or(WhoisError::NoTld)?;
        let server = format!("{}.whois-servers.net:43", tld);

        let response = tokio::time::timeout(self.timeout, async {
            let mut stream = TcpStream::connect(&server).await?;
            stream.write_all(domain.as_bytes()).await?;
            stream.write_all(b"\r\n").await?;

            let mut raw = Vec::new();
            stream.read_to_end(&mut raw).await?;
            Ok::<_, std::io::Error>(String::from_utf8_lossy(&raw).into_owned())
        })
        .await
        .map_err(|_| WhoisError::Timeout)??;

        let created = earliest_creation_date(&response).ok_or(WhoisError::NoCreationDate)?;
        Ok((Utc::now().naive_utc() - created).num_days())
    }
}

#[async_trait]
impl RegistrationLookup for WhoisClient {
    async fn lookup_age(&self, domain: &str) -> Option<i64> {
        match self.query(domain).await {
            Ok(age) => {
                debug!(domain, age_days = age, "whois age lookup");
                Some(age)
            }
            Err(e) => {
                // Unsupported TLDs, rate limits and parse failures all land
                // here; the pipeline degrades to unknown age.
                warn!(domain, error = %e, "whois age lookup degraded to unknown");
                None
            }
        }
    }
}

/// Labels registries use for the registration timestamp. Matched
/// case-insensitively at the start of each line.
const CREATION_LABELS: &[&str] = &[
    "creation date:",
    "created on:",
    "created:",
    "registered on:",
    "registered:",
    "registration time:",
];

/// Scans a WHOIS response for creation timestamps and returns the earliest
/// one. Registries that relay through multiple sources may report several;
/// the oldest is the true registration.
fn earliest_creation_date(response: &str) -> Option<NaiveDateTime> {
    response
        .lines()
        .filter_map(|line| {
            let trimmed = line.trim();
            CREATION_LABELS.iter().find_map(|label| {
                trimmed
                    .get(..label.len())
                    .filter(|prefix| prefix.eq_ignore_ascii_case(label))
                    .and_then(|_| parse_timestamp(trimmed[label.len()..].trim()))
            })
        })
        .min()
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    for format in ["%Y-%m-%d", "%d-%b-%Y", "%Y.%m.%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}
