//! Lazily paged search sessions.

use std::collections::VecDeque;
use std::pin::Pin;

use futures_core::Stream;
use tracing::{debug, instrument, warn};

use crate::client::SessionClient;
use crate::error::{Error, ProtocolError};
use crate::types::Record;

use super::types::{SearchCursor, SearchPreferences, SearchRecord, SearchResult};

/// Where a session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing has been sent yet.
    Unstarted,
    /// At least one page has been fetched and more records may follow.
    PageLoaded,
    /// Every record has been handed out.
    Exhausted,
    /// A remote failure or a broken paging contract ended the session.
    Failed,
}

/// The outcome of one [`SearchSession::try_advance`].
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// The next record. `has_more` is false once nothing is buffered and no
    /// pages remain.
    Record { record: Record, has_more: bool },
    /// No records remain.
    Exhausted,
}

/// A forward-only cursor over all pages of one search.
///
/// The first read sends the search; further pages are requested with
/// `searchMoreWithId` only once the buffered page has been consumed. Search
/// preferences travel with each page request and never touch the client's
/// persistent headers.
///
/// A remote failure or a paging inconsistency moves the session to
/// [`SessionState::Failed`]; every later read returns
/// [`Error::SessionFailed`] without contacting the remote. A transport fault
/// leaves the session where it was, so the same read may be retried.
///
/// # Example
///
/// ```no_run
/// # use suitetalk_core::{SearchRecord, SessionClient};
/// # use serde_json::json;
/// # async fn example(client: SessionClient) -> suitetalk_core::Result<()> {
/// let criteria = SearchRecord::new(json!({ "$type": "ItemSearchBasic" }))?;
/// let mut session = client.search_session(criteria).with_page_size(200);
///
/// while let Some(item) = session.next_record().await? {
///     println!("{:?}", item.get("itemId"));
/// }
/// # Ok(())
/// # }
/// ```
pub struct SearchSession {
    client: SessionClient,
    criteria: SearchRecord,
    preferences: SearchPreferences,
    state: SessionState,
    cursor: Option<SearchCursor>,
    buffer: VecDeque<Record>,
}

impl std::fmt::Debug for SearchSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchSession")
            .field("search_type", &self.criteria.record_type())
            .field("state", &self.state)
            .field("cursor", &self.cursor)
            .field("buffered", &self.buffer.len())
            .finish()
    }
}

impl SearchSession {
    /// Create an unstarted session with default preferences.
    pub fn new(client: SessionClient, criteria: SearchRecord) -> Self {
        Self {
            client,
            criteria,
            preferences: SearchPreferences::default(),
            state: SessionState::Unstarted,
            cursor: None,
            buffer: VecDeque::new(),
        }
    }

    /// Set the page size. Only effective before the first read.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        if self.state == SessionState::Unstarted {
            self.preferences.page_size = page_size;
        }
        self
    }

    /// Replace the search preferences. Only effective before the first read.
    pub fn with_preferences(mut self, preferences: SearchPreferences) -> Self {
        if self.state == SessionState::Unstarted {
            self.preferences = preferences;
        }
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns the cursor once the first page has been fetched.
    pub fn cursor(&self) -> Option<&SearchCursor> {
        self.cursor.as_ref()
    }

    /// Total number of records the search matched.
    ///
    /// Fetches the first page if needed; never fetches further pages.
    pub async fn count(&mut self) -> Result<u64, Error> {
        self.ensure_started().await?;
        Ok(self.cursor.as_ref().map_or(0, SearchCursor::total_records))
    }

    /// Move to the next record, fetching the next page when the buffer is
    /// empty.
    pub async fn try_advance(&mut self) -> Result<Advance, Error> {
        loop {
            match self.state {
                SessionState::Failed => return Err(Error::SessionFailed),
                SessionState::Exhausted => return Ok(Advance::Exhausted),
                SessionState::Unstarted => self.ensure_started().await?,
                SessionState::PageLoaded => {
                    if let Some(record) = self.buffer.pop_front() {
                        let has_more = !self.buffer.is_empty() || self.has_more_pages();
                        return Ok(Advance::Record { record, has_more });
                    }
                    if self.has_more_pages() {
                        self.fetch_next().await?;
                    } else {
                        debug!("Search exhausted");
                        self.state = SessionState::Exhausted;
                    }
                }
            }
        }
    }

    /// The next record, or `None` once the search is exhausted.
    pub async fn next_record(&mut self) -> Result<Option<Record>, Error> {
        match self.try_advance().await? {
            Advance::Record { record, .. } => Ok(Some(record)),
            Advance::Exhausted => Ok(None),
        }
    }

    /// Consume the session as a stream of records. The stream ends after the
    /// first error.
    pub fn into_stream(mut self) -> Pin<Box<dyn Stream<Item = Result<Record, Error>> + Send>> {
        let stream = async_stream::stream! {
            loop {
                match self.try_advance().await {
                    Ok(Advance::Record { record, .. }) => yield Ok(record),
                    Ok(Advance::Exhausted) => break,
                    Err(e) => {
                        yield Err(e);
                        break;
                    }
                }
            }
        };
        Box::pin(stream)
    }

    fn has_more_pages(&self) -> bool {
        self.cursor.as_ref().is_some_and(SearchCursor::has_more_pages)
    }

    async fn ensure_started(&mut self) -> Result<(), Error> {
        match self.state {
            SessionState::Unstarted => self.fetch_first().await,
            SessionState::Failed => Err(Error::SessionFailed),
            SessionState::PageLoaded | SessionState::Exhausted => Ok(()),
        }
    }

    #[instrument(skip(self), fields(search_type = %self.criteria.record_type()))]
    async fn fetch_first(&mut self) -> Result<(), Error> {
        let result = self
            .client
            .search(&self.criteria, &self.preferences)
            .await;
        let result = self.settle(result)?;

        let Some(search_id) = result.search_id().map(str::to_string) else {
            return Err(self.fail(ProtocolError::MissingSearchId.into()));
        };

        debug!(
            search_id = %search_id,
            total_records = result.total_records,
            total_pages = result.total_pages,
            "Search started"
        );

        self.cursor = Some(SearchCursor {
            search_id,
            page_index: result.page_index,
            max_page: result.total_pages,
            total_records: result.total_records,
            page_size: self.preferences.page_size,
        });
        self.buffer.extend(result.into_records());
        self.state = SessionState::PageLoaded;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn fetch_next(&mut self) -> Result<(), Error> {
        let Some(cursor) = self.cursor.clone() else {
            return Err(self.fail(ProtocolError::MissingSearchId.into()));
        };
        let requested = cursor.page_index + 1;

        let result = self
            .client
            .search_more_with_id(&cursor.search_id, requested, &self.preferences)
            .await;
        let result = self.settle(result)?;

        if let Err(e) = validate_page(&cursor, requested, &result) {
            return Err(self.fail(e.into()));
        }

        debug!(
            search_id = %cursor.search_id,
            page_index = requested,
            max_page = cursor.max_page,
            "Fetched search page"
        );

        if let Some(cursor) = self.cursor.as_mut() {
            cursor.page_index = requested;
        }
        self.buffer.extend(result.into_records());
        Ok(())
    }

    /// Pass transport faults through untouched; anything else ends the
    /// session.
    fn settle(&mut self, result: Result<SearchResult, Error>) -> Result<SearchResult, Error> {
        match result {
            Ok(result) => Ok(result),
            Err(e) if e.is_transport() => Err(e),
            Err(e) => Err(self.fail(e)),
        }
    }

    fn fail(&mut self, error: Error) -> Error {
        warn!(error = %error, "Search session failed");
        self.state = SessionState::Failed;
        self.buffer.clear();
        error
    }
}

fn validate_page(
    cursor: &SearchCursor,
    requested: u32,
    result: &SearchResult,
) -> Result<(), ProtocolError> {
    let Some(search_id) = result.search_id() else {
        return Err(ProtocolError::MissingSearchId);
    };
    if search_id != cursor.search_id {
        return Err(ProtocolError::SearchIdMismatch {
            expected: cursor.search_id.clone(),
            actual: search_id.to_string(),
        });
    }
    if result.page_index != requested {
        return Err(ProtocolError::PageIndexMismatch {
            requested,
            received: result.page_index,
        });
    }
    if result.total_records != cursor.total_records {
        return Err(ProtocolError::CursorDrift {
            field: "totalRecords",
            expected: cursor.total_records,
            actual: result.total_records,
        });
    }
    if result.total_pages != cursor.max_page {
        return Err(ProtocolError::CursorDrift {
            field: "totalPages",
            expected: u64::from(cursor.max_page),
            actual: u64::from(result.total_pages),
        });
    }
    Ok(())
}
