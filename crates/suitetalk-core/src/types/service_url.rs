//! Service host URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, InvalidInputError};

/// The generic web services host. Accounts configured with it must look up
/// their data center before the first real call.
pub const LEGACY_HOST: &str = "https://webservices.netsuite.com";

/// A validated web services host URL.
///
/// Must use HTTPS (HTTP is accepted for localhost only).
///
/// # Example
///
/// ```
/// use suitetalk_core::ServiceUrl;
///
/// let host = ServiceUrl::new("https://123456.suitetalk.api.netsuite.com").unwrap();
/// assert_eq!(host.port_location("2019_1"),
///            "https://123456.suitetalk.api.netsuite.com/services/NetSuitePort_2019_1");
/// assert!(!host.is_legacy());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ServiceUrl(Url);

impl ServiceUrl {
    /// Create a new service URL from a string, validating the format.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| InvalidInputError::ServiceUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;
        Ok(Self(url))
    }

    /// Returns the SOAP port location for an endpoint version.
    pub fn port_location(&self, endpoint: &str) -> String {
        port_location(self.as_str(), endpoint)
    }

    /// Returns true for the generic host that requires data center discovery.
    pub fn is_legacy(&self) -> bool {
        self.0.host_str() == Some("webservices.netsuite.com")
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the host string.
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        if url.cannot_be_a_base() {
            return Err(InvalidInputError::ServiceUrl {
                value: original.to_string(),
                reason: "must be an absolute URL".to_string(),
            }
            .into());
        }

        let is_localhost = url
            .host_str()
            .is_some_and(|h| h == "localhost" || h == "127.0.0.1" || h == "[::1]");

        let scheme = url.scheme();
        if scheme != "https" && !(scheme == "http" && is_localhost) {
            return Err(InvalidInputError::ServiceUrl {
                value: original.to_string(),
                reason: "must use HTTPS (HTTP allowed only for localhost)".to_string(),
            }
            .into());
        }

        if url.host_str().is_none() {
            return Err(InvalidInputError::ServiceUrl {
                value: original.to_string(),
                reason: "must have a host".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Build `<base>/services/NetSuitePort_<endpoint>` from any base domain.
pub(crate) fn port_location(base: &str, endpoint: &str) -> String {
    format!(
        "{}/services/NetSuitePort_{}",
        base.trim_end_matches('/'),
        endpoint
    )
}

impl fmt::Display for ServiceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ServiceUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for ServiceUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for ServiceUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ServiceUrl::new(&s).map_err(serde::de::Error::custom)
    }
}
