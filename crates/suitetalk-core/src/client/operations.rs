//! Operation names and request/response bodies.

use serde::{Deserialize, Serialize};

use crate::search::{SearchRecord, SearchResult};
use crate::status::Status;
use crate::types::{Record, RecordRef};

// ============================================================================
// Operation Names
// ============================================================================

pub const GET: &str = "get";
pub const GET_LIST: &str = "getList";
pub const ADD: &str = "add";
pub const UPDATE: &str = "update";
pub const UPSERT: &str = "upsert";
pub const DELETE: &str = "delete";
pub const SEARCH: &str = "search";
pub const SEARCH_MORE_WITH_ID: &str = "searchMoreWithId";
pub const GET_DATA_CENTER_URLS: &str = "getDataCenterUrls";

// ============================================================================
// Request Bodies
// ============================================================================

/// Body for get and delete.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseRefRequest<'a> {
    pub base_ref: &'a RecordRef,
}

/// Body for getList.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetListRequest<'a> {
    pub base_ref: &'a [RecordRef],
}

/// Body for add, update and upsert.
#[derive(Debug, Serialize)]
pub struct RecordRequest<'a> {
    pub record: &'a Record,
}

/// Body for search.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest<'a> {
    pub search_record: &'a SearchRecord,
}

/// Body for searchMoreWithId.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMoreWithIdRequest<'a> {
    pub search_id: &'a str,
    pub page_index: u32,
}

/// Body for getDataCenterUrls.
#[derive(Debug, Serialize)]
pub struct GetDataCenterUrlsRequest<'a> {
    pub account: &'a str,
}

// ============================================================================
// Response Bodies
// ============================================================================

/// Response from get.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetResponse {
    pub read_response: ReadResponse,
}

/// One record read, with its own status.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadResponse {
    pub status: Status,
    #[serde(default)]
    pub record: Option<Record>,
}

/// Response from getList.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetListResponse {
    pub read_response_list: ReadResponseList,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadResponseList {
    pub status: Status,
    #[serde(default)]
    pub read_response: Vec<ReadResponse>,
}

/// Response from add, update, upsert and delete.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteOutput {
    pub write_response: WriteResponse,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteResponse {
    pub status: Status,
    #[serde(default)]
    pub base_ref: Option<RecordRef>,
}

/// Response from search and searchMoreWithId.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub search_result: SearchResult,
}

/// Response from getDataCenterUrls.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetDataCenterUrlsResponse {
    pub get_data_center_urls_result: DataCenterUrlsResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataCenterUrlsResult {
    pub status: Status,
    #[serde(default)]
    pub data_center_urls: Option<DataCenterUrls>,
}

/// The account-specific domains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataCenterUrls {
    pub webservices_domain: String,
    #[serde(default)]
    pub rest_domain: Option<String>,
    #[serde(default)]
    pub system_domain: Option<String>,
}
