//! Per-call authentication payloads.
//!
//! A passport is built fresh for every dispatch and dropped with it. Password
//! passports carry the login as-is; token passports carry an HMAC signature
//! over the account, consumer key, token, a one-time nonce and a timestamp.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::Serialize;
use serde_json::Value;
use sha1::Sha1;
use sha2::Sha256;

use crate::credentials::{Credentials, HashAlgorithm, PasswordCredentials, TokenCredentials};
use crate::error::ConfigError;
use crate::types::RecordRef;

/// Length of generated token passport nonces.
pub const NONCE_LENGTH: usize = 32;

/// Header name for password passports.
pub const PASSPORT_HEADER: &str = "passport";

/// Header name for token passports.
pub const TOKEN_PASSPORT_HEADER: &str = "tokenPassport";

/// A password passport.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordPassport {
    pub account: String,
    pub email: String,
    pub password: String,
    pub role: RecordRef,
}

impl fmt::Debug for PasswordPassport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordPassport")
            .field("account", &self.account)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

/// A signed token passport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPassport {
    pub account: String,
    pub consumer_key: String,
    pub token: String,
    pub nonce: String,
    pub timestamp: i64,
    pub signature: TokenSignature,
}

/// The signature block of a token passport.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct TokenSignature {
    /// `HMAC_SHA256` or `HMAC_SHA1`.
    pub algorithm: String,
    /// Base64 encoded digest.
    pub value: String,
}

impl fmt::Debug for TokenSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSignature")
            .field("algorithm", &self.algorithm)
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// A call-scoped authentication payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Passport {
    Password(PasswordPassport),
    Token(TokenPassport),
}

impl Passport {
    /// The envelope header this passport travels in.
    pub fn header_name(&self) -> &'static str {
        match self {
            Passport::Password(_) => PASSPORT_HEADER,
            Passport::Token(_) => TOKEN_PASSPORT_HEADER,
        }
    }

    /// Serialize into the header value.
    pub fn to_header_value(&self) -> Value {
        let value = match self {
            Passport::Password(p) => serde_json::to_value(p),
            Passport::Token(p) => serde_json::to_value(p),
        };
        // Plain strings and integers only; serialization cannot fail.
        value.unwrap_or(Value::Null)
    }
}

/// Build a password passport.
///
/// # Errors
///
/// Returns [`ConfigError::Missing`] if any required field is empty.
pub fn build_password_passport(
    credentials: &PasswordCredentials,
) -> Result<PasswordPassport, ConfigError> {
    credentials.validate()?;

    Ok(PasswordPassport {
        account: credentials.account().to_string(),
        email: credentials.email().to_string(),
        password: credentials.password().to_string(),
        role: RecordRef::internal(credentials.role()),
    })
}

/// Build a token passport for the given nonce and epoch-second timestamp.
///
/// # Errors
///
/// Returns [`ConfigError::Missing`] if any required field is empty.
pub fn build_token_passport(
    credentials: &TokenCredentials,
    nonce: &str,
    timestamp: i64,
) -> Result<TokenPassport, ConfigError> {
    credentials.validate()?;

    let algorithm = credentials.hash_algorithm();
    let base = base_string(
        credentials.account(),
        credentials.consumer_key(),
        credentials.token(),
        nonce,
        timestamp,
    );
    let key = format!(
        "{}&{}",
        credentials.consumer_secret(),
        credentials.token_secret()
    );

    Ok(TokenPassport {
        account: credentials.account().to_string(),
        consumer_key: credentials.consumer_key().to_string(),
        token: credentials.token().to_string(),
        nonce: nonce.to_string(),
        timestamp,
        signature: TokenSignature {
            algorithm: algorithm.signature_label().to_string(),
            value: sign(algorithm, &base, &key)?,
        },
    })
}

/// The signed base string. The field order and separator are fixed by the
/// remote verifier.
pub fn base_string(
    account: &str,
    consumer_key: &str,
    token: &str,
    nonce: &str,
    timestamp: i64,
) -> String {
    format!("{account}&{consumer_key}&{token}&{nonce}&{timestamp}")
}

/// Base64 of the HMAC digest of `message` under `key`.
pub fn sign(algorithm: HashAlgorithm, message: &str, key: &str) -> Result<String, ConfigError> {
    let digest = match algorithm {
        HashAlgorithm::Sha1 => {
            let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes()).map_err(invalid_key)?;
            mac.update(message.as_bytes());
            mac.finalize().into_bytes().to_vec()
        }
        HashAlgorithm::Sha256 => {
            let mut mac = Hmac::<Sha256>::new_from_slice(key.as_bytes()).map_err(invalid_key)?;
            mac.update(message.as_bytes());
            mac.finalize().into_bytes().to_vec()
        }
    };
    Ok(STANDARD.encode(digest))
}

fn invalid_key(err: hmac::digest::InvalidLength) -> ConfigError {
    ConfigError::Invalid {
        key: "token_secret",
        reason: err.to_string(),
    }
}

/// Generate a random alphanumeric nonce of [`NONCE_LENGTH`] characters.
pub fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LENGTH)
        .map(char::from)
        .collect()
}

/// Produces a fresh passport for every call.
///
/// # Security
///
/// The signer never logs and never exposes secrets in Debug output.
#[derive(Debug, Clone)]
pub struct CredentialSigner {
    credentials: Credentials,
}

impl CredentialSigner {
    /// Create a signer, validating the credentials up front.
    pub fn new(credentials: Credentials) -> Result<Self, ConfigError> {
        credentials.validate()?;
        Ok(Self { credentials })
    }

    /// Returns the credentials this signer signs with.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns true when calls are signed with token passports.
    pub fn is_token_based(&self) -> bool {
        self.credentials.is_token_based()
    }

    /// Build the passport for one call, stamped with the current time.
    pub fn sign(&self) -> Result<Passport, ConfigError> {
        match &self.credentials {
            Credentials::Password(credentials) => {
                build_password_passport(credentials).map(Passport::Password)
            }
            Credentials::Token(credentials) => {
                let timestamp = chrono::Utc::now().timestamp();
                build_token_passport(credentials, &generate_nonce(), timestamp)
                    .map(Passport::Token)
            }
        }
    }
}
