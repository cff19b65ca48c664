//! Client configuration.
//!
//! A [`Config`] is an explicit value handed to the client at construction.
//! [`Config::from_env`] is a convenience for reading the conventional
//! `NETSUITE_*` variables; nothing in the crate consults the environment on
//! its own.

use std::path::PathBuf;

use crate::credentials::{Credentials, HashAlgorithm, PasswordCredentials, TokenCredentials};
use crate::error::{ConfigError, Error};
use crate::types::ServiceUrl;

/// Endpoint version used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "2019_1";

/// Host used when none is configured.
pub const DEFAULT_HOST: &str = "https://webservices.sandbox.netsuite.com";

/// Role internal id used for password logins when none is configured.
pub const DEFAULT_ROLE: &str = "3";

/// Application id sent with password logins when none is configured.
pub const DEFAULT_APP_ID: &str = "4AD027CA-88B3-46EC-9D3E-41C6E6A325E2";

/// Settings for the request/response call log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    /// Whether calls are handed to the call logger at all.
    pub enabled: bool,
    /// Directory the log files go to.
    pub path: Option<PathBuf>,
    /// File name format with `%date` and `%operation` placeholders.
    pub file_format: Option<String>,
    /// `strftime` format substituted for `%date`.
    pub date_format: Option<String>,
}

impl LogConfig {
    /// Enabled logging into the given directory.
    pub fn to_dir(path: impl Into<PathBuf>) -> Self {
        Self {
            enabled: true,
            path: Some(path.into()),
            ..Self::default()
        }
    }
}

/// Everything a [`SessionClient`](crate::SessionClient) needs to reach an
/// account.
#[derive(Debug, Clone)]
pub struct Config {
    host: ServiceUrl,
    endpoint: String,
    credentials: Credentials,
    app_id: Option<String>,
    logging: LogConfig,
}

impl Config {
    /// Create a configuration, validating the host, endpoint and credentials.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for a malformed host and
    /// [`Error::Config`] for an empty endpoint or incomplete credentials.
    pub fn new(
        host: &str,
        endpoint: impl Into<String>,
        credentials: Credentials,
    ) -> Result<Self, Error> {
        let host = ServiceUrl::new(host)?;
        let endpoint = endpoint.into();
        if endpoint.trim().is_empty() {
            return Err(ConfigError::Missing { key: "endpoint" }.into());
        }
        credentials.validate()?;

        Ok(Self {
            host,
            endpoint,
            credentials,
            app_id: None,
            logging: LogConfig::default(),
        })
    }

    /// Set the application id sent with password logins.
    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    /// Set the call log settings.
    pub fn with_logging(mut self, logging: LogConfig) -> Self {
        self.logging = logging;
        self
    }

    /// Read the configuration from `NETSUITE_*` environment variables.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup.
    ///
    /// Empty values count as absent. Token authentication is selected when
    /// `NETSUITE_TOKEN_KEY` is present.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing { key });

        let host = get("NETSUITE_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let endpoint = get("NETSUITE_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let account = require("NETSUITE_ACCOUNT")?;

        let credentials = if let Some(token) = get("NETSUITE_TOKEN_KEY") {
            let mut credentials = TokenCredentials::new(
                account,
                require("NETSUITE_CONSUMER_KEY")?,
                require("NETSUITE_CONSUMER_SECRET")?,
                token,
                require("NETSUITE_TOKEN_SECRET")?,
            );
            if let Some(alg) = get("NETSUITE_HASH_TYPE") {
                credentials = credentials.with_hash_algorithm(alg.parse::<HashAlgorithm>()?);
            }
            Credentials::Token(credentials)
        } else {
            Credentials::Password(PasswordCredentials::new(
                account,
                require("NETSUITE_EMAIL")?,
                require("NETSUITE_PASSWORD")?,
                get("NETSUITE_ROLE").unwrap_or_else(|| DEFAULT_ROLE.to_string()),
            ))
        };

        let logging = LogConfig {
            enabled: get("NETSUITE_LOGGING").is_some_and(|v| is_truthy(&v)),
            path: get("NETSUITE_LOG_PATH").map(PathBuf::from),
            file_format: get("NETSUITE_LOG_FORMAT"),
            date_format: get("NETSUITE_LOG_DATEFORMAT"),
        };

        let config = Self::new(&host, endpoint, credentials)?
            .with_app_id(get("NETSUITE_APP_ID").unwrap_or_else(|| DEFAULT_APP_ID.to_string()))
            .with_logging(logging);
        Ok(config)
    }

    /// Returns the account id.
    pub fn account(&self) -> &str {
        self.credentials.account()
    }

    pub fn host(&self) -> &ServiceUrl {
        &self.host
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn app_id(&self) -> Option<&str> {
        self.app_id.as_deref()
    }

    pub fn logging(&self) -> &LogConfig {
        &self.logging
    }

    /// Override the host after construction.
    pub fn set_host(&mut self, host: &str) -> Result<(), Error> {
        self.host = ServiceUrl::new(host)?;
        Ok(())
    }

    /// Override the endpoint version after construction.
    pub fn set_endpoint(&mut self, endpoint: impl Into<String>) -> Result<(), Error> {
        let endpoint = endpoint.into();
        if endpoint.trim().is_empty() {
            return Err(ConfigError::Missing { key: "endpoint" }.into());
        }
        self.endpoint = endpoint;
        Ok(())
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
