//! suitetalk-core - Core types, request signing and search paging.
//!
//! All remote calls flow through a [`SessionClient`], which signs every
//! dispatch with a fresh [`Passport`] and hands the envelope to a
//! [`Transport`]. Searches are consumed through a [`SearchSession`], a
//! forward-only cursor that fetches further pages on demand.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use suitetalk_core::{Config, Credentials, SearchRecord, SessionClient, Transport};
//! use serde_json::json;
//!
//! # async fn example(transport: Arc<dyn Transport>) -> suitetalk_core::Result<()> {
//! let credentials = Credentials::token("123456", "ck", "cs", "tk", "ts");
//! let config = Config::new("https://123456.suitetalk.api.netsuite.com", "2019_1", credentials)?;
//! let client = SessionClient::new(config, transport)?;
//!
//! let criteria = SearchRecord::new(json!({ "$type": "CustomerSearchBasic" }))?;
//! let mut session = client.search_session(criteria);
//! println!("{} customers", session.count().await?);
//! while let Some(record) = session.next_record().await? {
//!     println!("{}", record.record_type());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod passport;
pub mod search;
pub mod status;
pub mod traits;
pub mod types;

pub use client::{DataCenterUrls, Envelope, Preferences, ReadResponse, SessionClient};
pub use config::{Config, LogConfig};
pub use credentials::{Credentials, HashAlgorithm, PasswordCredentials, TokenCredentials};
pub use error::Error;
pub use passport::{CredentialSigner, Passport};
pub use search::{
    Advance, SearchCursor, SearchPreferences, SearchRecord, SearchResult, SearchSession,
    SessionState,
};
pub use status::{Status, StatusDetail, StatusFailure};
pub use traits::{CallLogger, Transport};
pub use types::{Record, RecordRef, ServiceUrl};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
