//! Search criteria, result pages and the paging session.

mod session;
mod types;

pub use session::{Advance, SearchSession, SessionState};
pub use types::{
    DEFAULT_PAGE_SIZE, RecordList, SearchCursor, SearchPreferences, SearchRecord, SearchResult,
    SearchRowList,
};
