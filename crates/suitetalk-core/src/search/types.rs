//! Search request and result types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;
use crate::status::Status;
use crate::types::Record;

/// Default number of records per page.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Search criteria, e.g. a `CustomerSearchBasic` or `TransactionSearchAdvanced`.
///
/// The criteria are opaque to the client apart from the `$type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchRecord(Record);

impl SearchRecord {
    /// Create search criteria from a JSON value carrying a `$type`.
    pub fn new(value: Value) -> Result<Self, Error> {
        Record::new(value).map(Self)
    }

    /// Returns the criteria's schema type.
    pub fn record_type(&self) -> &str {
        self.0.record_type()
    }

    /// Returns the underlying record.
    pub fn as_record(&self) -> &Record {
        &self.0
    }
}

impl From<Record> for SearchRecord {
    fn from(record: Record) -> Self {
        Self(record)
    }
}

/// Preferences sent with search calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPreferences {
    pub body_fields_only: bool,
    pub page_size: u32,
    pub return_search_columns: bool,
}

impl Default for SearchPreferences {
    fn default() -> Self {
        Self {
            body_fields_only: true,
            page_size: DEFAULT_PAGE_SIZE,
            return_search_columns: true,
        }
    }
}

impl SearchPreferences {
    /// Default preferences with a different page size.
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            page_size,
            ..Self::default()
        }
    }
}

/// One page of search results.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub status: Status,
    #[serde(default)]
    pub total_records: u64,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub page_index: u32,
    #[serde(default)]
    pub search_id: Option<String>,
    #[serde(default)]
    pub record_list: Option<RecordList>,
    #[serde(default)]
    pub search_row_list: Option<SearchRowList>,
}

/// Records returned by a basic search.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordList {
    #[serde(default)]
    pub record: Vec<Record>,
}

/// Rows returned by an advanced search with result columns.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRowList {
    #[serde(default)]
    pub search_row: Vec<Record>,
}

impl SearchResult {
    /// Returns the search id if it is present and non-empty.
    pub fn search_id(&self) -> Option<&str> {
        self.search_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Take the page's records, followed by any search rows.
    pub fn into_records(self) -> Vec<Record> {
        let mut records = self.record_list.map(|l| l.record).unwrap_or_default();
        if let Some(rows) = self.search_row_list {
            records.extend(rows.search_row);
        }
        records
    }
}

/// Position of a search session within its result pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCursor {
    pub(crate) search_id: String,
    pub(crate) page_index: u32,
    pub(crate) max_page: u32,
    pub(crate) total_records: u64,
    pub(crate) page_size: u32,
}

impl SearchCursor {
    pub fn search_id(&self) -> &str {
        &self.search_id
    }

    /// Index of the last page fetched, starting at 1.
    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    /// Total number of pages.
    pub fn max_page(&self) -> u32 {
        self.max_page
    }

    pub fn total_records(&self) -> u64 {
        self.total_records
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns true while pages remain to be fetched.
    pub fn has_more_pages(&self) -> bool {
        self.page_index < self.max_page
    }
}
