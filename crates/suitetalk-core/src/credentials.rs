//! Account credentials.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// HMAC digest used to sign token passports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Sha1,
    #[default]
    Sha256,
}

impl HashAlgorithm {
    /// Lowercase digest name, e.g. `sha256`.
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha256 => "sha256",
        }
    }

    /// The label the remote verifier expects next to the signature.
    pub fn signature_label(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha1 => "HMAC_SHA1",
            HashAlgorithm::Sha256 => "HMAC_SHA256",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = ConfigError;

    /// Accepts `sha256`, `SHA256`, `HMAC_SHA256` and `HMAC-SHA256` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        let name = normalized
            .strip_prefix("hmac_")
            .unwrap_or(normalized.as_str());
        match name {
            "sha1" => Ok(HashAlgorithm::Sha1),
            "sha256" => Ok(HashAlgorithm::Sha256),
            _ => Err(ConfigError::Invalid {
                key: "hash_algorithm",
                reason: format!("unsupported signature algorithm '{}'", s),
            }),
        }
    }
}

/// Email and password login with a role.
///
/// # Security
///
/// The password is never exposed in Debug output.
#[derive(Clone)]
pub struct PasswordCredentials {
    account: String,
    email: String,
    password: String,
    role: String,
}

impl PasswordCredentials {
    /// Create password credentials.
    ///
    /// Fields are validated when the credentials are handed to a signer.
    pub fn new(
        account: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            account: account.into(),
            email: email.into(),
            password: password.into(),
            role: role.into(),
        }
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the role internal id.
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Use only when building a passport. Never log this value.
    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    /// Check that every required field is present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require("account", &self.account)?;
        require("email", &self.email)?;
        require("password", &self.password)?;
        require("role", &self.role)
    }
}

impl fmt::Debug for PasswordCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordCredentials")
            .field("account", &self.account)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

/// Token-based authentication keys.
///
/// # Security
///
/// Both secrets are never exposed in Debug output.
#[derive(Clone)]
pub struct TokenCredentials {
    account: String,
    consumer_key: String,
    consumer_secret: String,
    token: String,
    token_secret: String,
    hash_algorithm: HashAlgorithm,
}

impl TokenCredentials {
    /// Create token credentials signed with HMAC-SHA256.
    pub fn new(
        account: impl Into<String>,
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        token: impl Into<String>,
        token_secret: impl Into<String>,
    ) -> Self {
        Self {
            account: account.into(),
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            token: token.into(),
            token_secret: token_secret.into(),
            hash_algorithm: HashAlgorithm::default(),
        }
    }

    /// Sign with a different digest.
    pub fn with_hash_algorithm(mut self, hash_algorithm: HashAlgorithm) -> Self {
        self.hash_algorithm = hash_algorithm;
        self
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash_algorithm
    }

    pub(crate) fn consumer_secret(&self) -> &str {
        &self.consumer_secret
    }

    pub(crate) fn token_secret(&self) -> &str {
        &self.token_secret
    }

    /// Check that every required field is present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require("account", &self.account)?;
        require("consumer_key", &self.consumer_key)?;
        require("consumer_secret", &self.consumer_secret)?;
        require("token", &self.token)?;
        require("token_secret", &self.token_secret)
    }
}

impl fmt::Debug for TokenCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCredentials")
            .field("account", &self.account)
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"[REDACTED]")
            .field("token", &self.token)
            .field("token_secret", &"[REDACTED]")
            .field("hash_algorithm", &self.hash_algorithm)
            .finish()
    }
}

/// The credentials a client authenticates with. Exactly one mode is active.
#[derive(Debug, Clone)]
pub enum Credentials {
    Password(PasswordCredentials),
    Token(TokenCredentials),
}

impl Credentials {
    /// Shorthand for [`PasswordCredentials::new`].
    pub fn password(
        account: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Credentials::Password(PasswordCredentials::new(account, email, password, role))
    }

    /// Shorthand for [`TokenCredentials::new`].
    pub fn token(
        account: impl Into<String>,
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        token: impl Into<String>,
        token_secret: impl Into<String>,
    ) -> Self {
        Credentials::Token(TokenCredentials::new(
            account,
            consumer_key,
            consumer_secret,
            token,
            token_secret,
        ))
    }

    /// Returns the account id.
    pub fn account(&self) -> &str {
        match self {
            Credentials::Password(c) => c.account(),
            Credentials::Token(c) => c.account(),
        }
    }

    /// Returns true when calls are signed with token passports.
    pub fn is_token_based(&self) -> bool {
        matches!(self, Credentials::Token(_))
    }

    /// Check that every required field of the active mode is present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Credentials::Password(c) => c.validate(),
            Credentials::Token(c) => c.validate(),
        }
    }
}

impl From<PasswordCredentials> for Credentials {
    fn from(credentials: PasswordCredentials) -> Self {
        Credentials::Password(credentials)
    }
}

impl From<TokenCredentials> for Credentials {
    fn from(credentials: TokenCredentials) -> Self {
        Credentials::Token(credentials)
    }
}

fn require(key: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        Err(ConfigError::Missing { key })
    } else {
        Ok(())
    }
}
