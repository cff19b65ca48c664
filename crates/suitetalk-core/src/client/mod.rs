//! The session client.

mod envelope;
pub mod operations;
mod preferences;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::error::{Error, InvalidInputError, ProtocolError};
use crate::passport::{CredentialSigner, Passport};
use crate::search::{SearchPreferences, SearchRecord, SearchResult, SearchSession};
use crate::status::Status;
use crate::traits::{CallLogger, Transport};
use crate::types::{Record, RecordRef};

pub use envelope::{
    APPLICATION_INFO, Envelope, PASSPORT, PREFERENCES, SEARCH_PREFERENCES, TOKEN_PASSPORT,
};
pub use operations::{DataCenterUrls, ReadResponse};
pub use preferences::Preferences;

use envelope::AUTH_HEADERS;
use operations::{
    ADD, BaseRefRequest, DELETE, GET, GET_DATA_CENTER_URLS, GET_LIST, GetDataCenterUrlsRequest,
    GetDataCenterUrlsResponse, GetListRequest, GetListResponse, GetResponse, RecordRequest,
    SEARCH, SEARCH_MORE_WITH_ID, SearchMoreWithIdRequest, SearchRequest, SearchResponse, UPDATE,
    UPSERT, WriteOutput,
};

/// A client bound to one account.
///
/// Every call is signed with a fresh passport and sent to the account's
/// endpoint, which is resolved on first use. Headers set through
/// [`add_header`](Self::add_header) and the preference setters persist
/// across calls; authentication headers are always produced by the client.
///
/// # Thread Safety
///
/// Clients are cheap to clone (they use internal `Arc`) and safe to share.
/// Clones share the resolved endpoint and the persistent headers.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use suitetalk_core::{Config, Credentials, RecordRef, SessionClient, Transport};
///
/// # async fn example(transport: Arc<dyn Transport>) -> suitetalk_core::Result<()> {
/// let credentials = Credentials::password("123456", "ops@example.com", "pw", "3");
/// let config = Config::new("https://webservices.netsuite.com", "2019_1", credentials)?;
/// let client = SessionClient::new(config, transport)?;
///
/// let customer = client.get(&RecordRef::internal("42").with_type("customer")).await?;
/// println!("{}", customer.record_type());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SessionClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: Config,
    signer: CredentialSigner,
    transport: Arc<dyn Transport>,
    logger: Option<Arc<dyn CallLogger>>,
    location: OnceCell<String>,
    headers: RwLock<BTreeMap<String, Value>>,
}

impl fmt::Debug for SessionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionClient")
            .field("account", &self.inner.config.account())
            .field("host", &self.inner.config.host().as_str())
            .field("endpoint", &self.inner.config.endpoint())
            .field("location", &self.inner.location.get())
            .finish()
    }
}

impl SessionClient {
    /// Create a client without a call logger.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the credentials are incomplete.
    pub fn new(config: Config, transport: Arc<dyn Transport>) -> Result<Self, Error> {
        Self::build(config, transport, None)
    }

    /// Create a client that hands every call to `logger` while
    /// `config.logging().enabled` is set.
    pub fn with_call_logger(
        config: Config,
        transport: Arc<dyn Transport>,
        logger: Arc<dyn CallLogger>,
    ) -> Result<Self, Error> {
        Self::build(config, transport, Some(logger))
    }

    fn build(
        config: Config,
        transport: Arc<dyn Transport>,
        logger: Option<Arc<dyn CallLogger>>,
    ) -> Result<Self, Error> {
        let signer = CredentialSigner::new(config.credentials().clone())?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                config,
                signer,
                transport,
                logger,
                location: OnceCell::new(),
                headers: RwLock::new(BTreeMap::new()),
            }),
        })
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Returns the endpoint if it has already been resolved.
    pub fn resolved_endpoint(&self) -> Option<&str> {
        self.inner.location.get().map(String::as_str)
    }

    /// Resolve the account's endpoint, once.
    ///
    /// Accounts on the generic host get one `getDataCenterUrls` lookup; all
    /// others use the configured host directly. Concurrent first callers
    /// share a single lookup. A failed lookup is not remembered, so the next
    /// call tries again.
    #[instrument(skip(self), fields(account = %self.inner.config.account()))]
    pub async fn resolve_endpoint(&self) -> Result<&str, Error> {
        let location = self
            .inner
            .location
            .get_or_try_init(|| self.lookup_location())
            .await?;
        Ok(location.as_str())
    }

    async fn lookup_location(&self) -> Result<String, Error> {
        let config = &self.inner.config;
        if !config.host().is_legacy() {
            return Ok(config.host().port_location(config.endpoint()));
        }

        info!("Looking up data center");
        let urls = self.get_data_center_urls(config.account()).await?;
        let location = crate::types::port_location(&urls.webservices_domain, config.endpoint());
        info!(location = %location, "Resolved data center endpoint");
        Ok(location)
    }

    // ========================================================================
    // Persistent headers
    // ========================================================================

    /// Send a header with every following call.
    ///
    /// Authentication headers set this way are ignored.
    pub async fn add_header(&self, name: impl Into<String>, value: Value) {
        self.inner.headers.write().await.insert(name.into(), value);
    }

    /// Stop sending a header.
    pub async fn clear_header(&self, name: &str) {
        self.inner.headers.write().await.remove(name);
    }

    /// Send write preferences with every following call.
    pub async fn set_preferences(&self, preferences: &Preferences) -> Result<(), Error> {
        self.add_header(PREFERENCES, to_body(preferences)?).await;
        Ok(())
    }

    pub async fn clear_preferences(&self) {
        self.clear_header(PREFERENCES).await;
    }

    /// Send search preferences with every following call.
    ///
    /// Search sessions always override these for their own calls.
    pub async fn set_search_preferences(
        &self,
        preferences: &SearchPreferences,
    ) -> Result<(), Error> {
        self.add_header(SEARCH_PREFERENCES, to_body(preferences)?).await;
        Ok(())
    }

    pub async fn clear_search_preferences(&self) {
        self.clear_header(SEARCH_PREFERENCES).await;
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Send a raw operation and return the raw response body.
    pub async fn dispatch(&self, operation: &str, body: Value) -> Result<Value, Error> {
        self.dispatch_with(operation, body, &[]).await
    }

    /// Send a raw operation with extra headers that apply to this call only.
    ///
    /// Scoped headers take precedence over persistent ones and are never
    /// stored.
    #[instrument(skip(self, body, scoped), fields(operation = %operation))]
    pub async fn dispatch_with(
        &self,
        operation: &str,
        body: Value,
        scoped: &[(&str, Value)],
    ) -> Result<Value, Error> {
        let location = self.resolve_endpoint().await?;
        self.send(location, operation, body, scoped).await
    }

    async fn send(
        &self,
        location: &str,
        operation: &str,
        body: Value,
        scoped: &[(&str, Value)],
    ) -> Result<Value, Error> {
        let passport = self.inner.signer.sign()?;

        let mut header = self.inner.headers.read().await.clone();
        for (name, value) in scoped {
            header.insert((*name).to_string(), value.clone());
        }
        for name in AUTH_HEADERS {
            header.remove(name);
        }
        if matches!(passport, Passport::Password(_))
            && let Some(app_id) = self.inner.config.app_id()
        {
            header.insert(
                APPLICATION_INFO.to_string(),
                json!({ "applicationId": app_id }),
            );
        }
        header.insert(
            passport.header_name().to_string(),
            passport.to_header_value(),
        );

        let envelope = Envelope::new(operation, header, body);
        debug!(
            location,
            headers = ?envelope.header_names().collect::<Vec<_>>(),
            "Dispatching call"
        );

        let result = self.inner.transport.call(location, &envelope).await;
        self.log_call(&envelope, result.as_ref().ok()).await;

        match result {
            Ok(response) => Ok(response),
            Err(e) => {
                debug!(error = %e, "Transport fault");
                Err(e.into())
            }
        }
    }

    async fn log_call(&self, envelope: &Envelope, response: Option<&Value>) {
        let Some(logger) = &self.inner.logger else {
            return;
        };
        if !self.inner.config.logging().enabled {
            return;
        }
        if let Err(e) = logger
            .log_call(envelope.operation(), &envelope.to_value(), response)
            .await
        {
            warn!(operation = envelope.operation(), error = %e, "Failed to write call log");
        }
    }

    async fn invoke<B, R>(
        &self,
        operation: &str,
        body: &B,
        scoped: &[(&str, Value)],
    ) -> Result<R, Error>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let response = self.dispatch_with(operation, to_body(body)?, scoped).await?;
        decode(operation, response)
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Read one record.
    #[instrument(skip(self), fields(internal_id = ?record_ref.internal_id))]
    pub async fn get(&self, record_ref: &RecordRef) -> Result<Record, Error> {
        let body = BaseRefRequest {
            base_ref: record_ref,
        };
        let response: GetResponse = self.invoke(GET, &body, &[]).await?;
        check(GET, response.read_response.status)?;
        response
            .read_response
            .record
            .ok_or_else(|| malformed(GET, "missing record"))
    }

    /// Read several records. Each entry carries its own status.
    #[instrument(skip(self, record_refs), fields(count = record_refs.len()))]
    pub async fn get_list(&self, record_refs: &[RecordRef]) -> Result<Vec<ReadResponse>, Error> {
        let body = GetListRequest {
            base_ref: record_refs,
        };
        let response: GetListResponse = self.invoke(GET_LIST, &body, &[]).await?;
        check(GET_LIST, response.read_response_list.status)?;
        Ok(response.read_response_list.read_response)
    }

    /// Create a record and return its reference.
    pub async fn add(&self, record: &Record) -> Result<RecordRef, Error> {
        self.write(ADD, record).await
    }

    /// Update a record and return its reference.
    pub async fn update(&self, record: &Record) -> Result<RecordRef, Error> {
        self.write(UPDATE, record).await
    }

    /// Create or update a record by external id.
    pub async fn upsert(&self, record: &Record) -> Result<RecordRef, Error> {
        self.write(UPSERT, record).await
    }

    /// Delete a record.
    #[instrument(skip(self), fields(internal_id = ?record_ref.internal_id))]
    pub async fn delete(&self, record_ref: &RecordRef) -> Result<RecordRef, Error> {
        let body = BaseRefRequest {
            base_ref: record_ref,
        };
        let response: WriteOutput = self.invoke(DELETE, &body, &[]).await?;
        write_result(DELETE, response)
    }

    #[instrument(skip(self, record), fields(record_type = %record.record_type()))]
    async fn write(&self, operation: &'static str, record: &Record) -> Result<RecordRef, Error> {
        let response: WriteOutput = self
            .invoke(operation, &RecordRequest { record }, &[])
            .await?;
        write_result(operation, response)
    }

    /// Run a search and return its first page.
    ///
    /// `preferences` apply to this call only.
    #[instrument(skip(self, criteria), fields(search_type = %criteria.record_type()))]
    pub async fn search(
        &self,
        criteria: &SearchRecord,
        preferences: &SearchPreferences,
    ) -> Result<SearchResult, Error> {
        let body = SearchRequest {
            search_record: criteria,
        };
        let scoped = [(SEARCH_PREFERENCES, to_body(preferences)?)];
        let response: SearchResponse = self.invoke(SEARCH, &body, &scoped).await?;
        check(SEARCH, response.search_result.status.clone())?;
        Ok(response.search_result)
    }

    /// Fetch a further page of an earlier search.
    ///
    /// `preferences` apply to this call only.
    #[instrument(skip(self, preferences))]
    pub async fn search_more_with_id(
        &self,
        search_id: &str,
        page_index: u32,
        preferences: &SearchPreferences,
    ) -> Result<SearchResult, Error> {
        let body = SearchMoreWithIdRequest {
            search_id,
            page_index,
        };
        let scoped = [(SEARCH_PREFERENCES, to_body(preferences)?)];
        let response: SearchResponse = self.invoke(SEARCH_MORE_WITH_ID, &body, &scoped).await?;
        check(SEARCH_MORE_WITH_ID, response.search_result.status.clone())?;
        Ok(response.search_result)
    }

    /// Look up the data center domains for an account.
    ///
    /// Always sent to the configured host, without resolving the endpoint.
    #[instrument(skip(self))]
    pub async fn get_data_center_urls(&self, account: &str) -> Result<DataCenterUrls, Error> {
        let config = &self.inner.config;
        let location = config.host().port_location(config.endpoint());
        let body = to_body(&GetDataCenterUrlsRequest { account })?;

        let response = self
            .send(&location, GET_DATA_CENTER_URLS, body, &[])
            .await?;
        let response: GetDataCenterUrlsResponse = decode(GET_DATA_CENTER_URLS, response)?;

        let result = response.get_data_center_urls_result;
        check(GET_DATA_CENTER_URLS, result.status)?;
        result
            .data_center_urls
            .filter(|urls| !urls.webservices_domain.is_empty())
            .ok_or_else(|| malformed(GET_DATA_CENTER_URLS, "missing webservicesDomain"))
    }

    /// Start a lazily paged search.
    ///
    /// Nothing is sent until the session is first read.
    pub fn search_session(&self, criteria: SearchRecord) -> SearchSession {
        SearchSession::new(self.clone(), criteria)
    }
}

fn to_body<T: Serialize + ?Sized>(value: &T) -> Result<Value, Error> {
    serde_json::to_value(value).map_err(|e| {
        InvalidInputError::Other {
            message: e.to_string(),
        }
        .into()
    })
}

fn decode<R: DeserializeOwned>(operation: &str, response: Value) -> Result<R, Error> {
    serde_json::from_value(response).map_err(|e| malformed(operation, &e.to_string()))
}

fn malformed(operation: &str, reason: &str) -> Error {
    ProtocolError::MalformedResponse {
        operation: operation.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

fn check(operation: &str, status: Status) -> Result<(), Error> {
    status
        .into_result()
        .map(|_| ())
        .map_err(|failure| failure.with_context(format!("{} was rejected", operation)).into())
}

fn write_result(operation: &str, response: WriteOutput) -> Result<RecordRef, Error> {
    let response = response.write_response;
    check(operation, response.status)?;
    response
        .base_ref
        .ok_or_else(|| malformed(operation, "missing baseRef"))
}
