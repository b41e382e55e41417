//! Shared scalar types and the agency enumeration.

use serde::{Deserialize, Serialize};

/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// The government services this platform integrates with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Irs,
    Ssa,
    Dmv,
    Usps,
}

impl Service {
    /// Lowercase identifier used in database `service` columns and env
    /// variable prefixes.
    pub fn as_str(self) -> &'static str {
        match self {
            Service::Irs => "irs",
            Service::Ssa => "ssa",
            Service::Dmv => "dmv",
            Service::Usps => "usps",
        }
    }

    /// Uppercase agency label used in error and log messages
    /// (e.g. "DMV API error: ...").
    pub fn label(self) -> &'static str {
        match self {
            Service::Irs => "IRS",
            Service::Ssa => "SSA",
            Service::Dmv => "DMV",
            Service::Usps => "USPS",
        }
    }
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
