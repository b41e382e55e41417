//! Agency API configuration, loaded from environment variables.

use std::collections::HashMap;
use std::time::Duration;

use crate::types::Service;

/// Deployment environment the agency endpoints run in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Sandbox,
    Production,
}

impl Environment {
    /// Parse from the `GOVSYNC_ENV` variable.
    ///
    /// Only the exact value `production` selects [`Environment::Production`];
    /// anything else (including an unset variable) is sandbox.
    pub fn from_env() -> Self {
        match std::env::var("GOVSYNC_ENV").as_deref() {
            Ok("production") => Environment::Production,
            _ => Environment::Sandbox,
        }
    }
}

/// Advisory rate limits published by each agency.
///
/// Enforced in-process as a per-minute token bucket by
/// [`crate::rate::RateLimiter`]; the daily budget is informational.
#[derive(Debug, Clone, Copy)]
pub struct RateLimit {
    pub requests_per_minute: u32,
    pub requests_per_day: u32,
}

/// Connection settings for one agency API (or one DMV state).
#[derive(Debug, Clone)]
pub struct AgencyConfig {
    /// Base URL of the agency API, without a trailing slash.
    pub base_url: String,
    /// Static API key (bearer auth for DMV/USPS).
    pub api_key: String,
    /// OAuth client credentials. Only IRS and SSA use these.
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub environment: Environment,
    pub rate_limit: RateLimit,
    /// Per-request deadline for remote calls.
    pub timeout: Duration,
}

/// Errors raised while loading agency configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is unset or empty.
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
}

fn require_var(name: &str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingVar(name.to_string())),
    }
}

impl AgencyConfig {
    /// Load the configuration for a federal agency from environment variables.
    ///
    /// | Env Var                   | Required | Notes                        |
    /// |---------------------------|----------|------------------------------|
    /// | `{SVC}_API_BASE_URL`      | yes      |                              |
    /// | `{SVC}_API_KEY`           | yes      |                              |
    /// | `{SVC}_CLIENT_ID`         | IRS/SSA  | OAuth client credentials     |
    /// | `{SVC}_CLIENT_SECRET`     | IRS/SSA  |                              |
    /// | `GOVSYNC_ENV`             | no       | `production` or sandbox      |
    ///
    /// Rate limits and timeouts use per-service defaults matching the
    /// agencies' published budgets: IRS 60/min 1000/day 30s, SSA 30/min
    /// 500/day 45s, DMV 20/min 200/day 20s, USPS 100/min 5000/day 15s.
    pub fn from_env(service: Service) -> Result<Self, ConfigError> {
        let prefix = service.as_str().to_uppercase();
        let base_url = require_var(&format!("{prefix}_API_BASE_URL"))?;
        let api_key = require_var(&format!("{prefix}_API_KEY"))?;

        let (client_id, client_secret) = match service {
            Service::Irs | Service::Ssa => (
                Some(require_var(&format!("{prefix}_CLIENT_ID"))?),
                Some(require_var(&format!("{prefix}_CLIENT_SECRET"))?),
            ),
            Service::Dmv | Service::Usps => (None, None),
        };

        Ok(Self {
            base_url,
            api_key,
            client_id,
            client_secret,
            environment: Environment::from_env(),
            rate_limit: default_rate_limit(service),
            timeout: default_timeout(service),
        })
    }
}

/// Default per-minute and per-day budgets for each service.
pub fn default_rate_limit(service: Service) -> RateLimit {
    match service {
        Service::Irs => RateLimit {
            requests_per_minute: 60,
            requests_per_day: 1000,
        },
        Service::Ssa => RateLimit {
            requests_per_minute: 30,
            requests_per_day: 500,
        },
        Service::Dmv => RateLimit {
            requests_per_minute: 20,
            requests_per_day: 200,
        },
        Service::Usps => RateLimit {
            requests_per_minute: 100,
            requests_per_day: 5000,
        },
    }
}

/// Default request deadline for each service.
pub fn default_timeout(service: Service) -> Duration {
    match service {
        Service::Irs => Duration::from_secs(30),
        Service::Ssa => Duration::from_secs(45),
        Service::Dmv => Duration::from_secs(20),
        Service::Usps => Duration::from_secs(15),
    }
}

/// Load per-state DMV configurations.
///
/// `DMV_STATES` is a comma-separated list of two-letter state codes
/// (e.g. `CA,NY,TX`); for each state the loader reads
/// `{STATE}_DMV_API_BASE_URL` and `{STATE}_DMV_API_KEY`. DMV is
/// state-administered, so each state gets its own endpoint and key.
pub fn dmv_state_configs_from_env() -> Result<HashMap<String, AgencyConfig>, ConfigError> {
    let states = std::env::var("DMV_STATES").unwrap_or_default();
    let mut configs = HashMap::new();

    for state in states.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let state = state.to_uppercase();
        let config = AgencyConfig {
            base_url: require_var(&format!("{state}_DMV_API_BASE_URL"))?,
            api_key: require_var(&format!("{state}_DMV_API_KEY"))?,
            client_id: None,
            client_secret: None,
            environment: Environment::from_env(),
            rate_limit: default_rate_limit(Service::Dmv),
            timeout: default_timeout(Service::Dmv),
        };
        configs.insert(state, config);
    }

    Ok(configs)
}
