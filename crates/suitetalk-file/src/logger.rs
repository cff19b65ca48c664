//! Request/response log files.

use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde_json::Value;
use tracing::{debug, instrument, trace};

use suitetalk_core::{CallLogger, LogConfig};

use crate::redact::redact;

/// File name format used unless configured otherwise.
pub const DEFAULT_FILE_FORMAT: &str = "suitetalk-%date-%operation";

/// `strftime` format substituted for `%date` unless configured otherwise.
pub const DEFAULT_DATE_FORMAT: &str = "%Y%m%d.%H%M%S.%6f";

/// Writes each call to a pair of JSON files in a directory.
///
/// Nothing is written while the directory does not exist, so logging can be
/// switched on and off by creating and removing it.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use suitetalk_core::{Config, SessionClient, Transport};
/// use suitetalk_file::FileCallLogger;
///
/// # fn example(config: Config, transport: Arc<dyn Transport>) -> suitetalk_core::Result<()> {
/// let logger = FileCallLogger::new("/var/log/suitetalk")
///     .with_file_format("%operation-%date");
/// let client = SessionClient::with_call_logger(config, transport, Arc::new(logger))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FileCallLogger {
    dir: PathBuf,
    file_format: String,
    date_format: String,
}

impl FileCallLogger {
    /// Log into `dir` with the default file and date formats.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            file_format: DEFAULT_FILE_FORMAT.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }

    /// Build a logger from the client's log settings.
    ///
    /// Returns `None` when no directory is configured.
    pub fn from_config(config: &LogConfig) -> Option<Self> {
        let mut logger = Self::new(config.path.as_ref()?);
        if let Some(format) = &config.file_format {
            logger = logger.with_file_format(format);
        }
        if let Some(format) = &config.date_format {
            logger = logger.with_date_format(format);
        }
        Some(logger)
    }

    /// Set the file name format. `%date` and `%operation` are substituted.
    pub fn with_file_format(mut self, format: impl Into<String>) -> Self {
        self.file_format = format.into();
        self
    }

    /// Set the `strftime` format used for `%date`.
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file name shared by a call's request and response files.
    pub fn file_stem(&self, operation: &str, at: DateTime<Local>) -> String {
        self.file_format
            .replace("%date", &format_date(at, &self.date_format))
            .replace("%operation", &sanitize(operation))
    }

    async fn write_json(&self, path: PathBuf, value: &Value) -> io::Result<()> {
        let mut value = value.clone();
        redact(&mut value);
        let bytes = serde_json::to_vec_pretty(&value)?;
        tokio::fs::write(&path, bytes).await?;
        trace!(path = %path.display(), "Wrote call log");
        Ok(())
    }
}

#[async_trait]
impl CallLogger for FileCallLogger {
    #[instrument(skip(self, request, response), fields(dir = %self.dir.display()))]
    async fn log_call(
        &self,
        operation: &str,
        request: &Value,
        response: Option<&Value>,
    ) -> io::Result<()> {
        if !tokio::fs::try_exists(&self.dir).await? {
            trace!("Log directory missing, skipping");
            return Ok(());
        }

        let stem = self.file_stem(operation, Local::now());
        self.write_json(self.dir.join(format!("{stem}-request.json")), request)
            .await?;
        if let Some(response) = response {
            self.write_json(self.dir.join(format!("{stem}-response.json")), response)
                .await?;
        }

        debug!(stem = %stem, "Logged call");
        Ok(())
    }
}

/// Format `at`, falling back to the default format if `format` is not a
/// valid `strftime` string.
fn format_date(at: DateTime<Local>, format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", at.format(format)).is_ok() {
        return out;
    }
    at.format(DEFAULT_DATE_FORMAT).to_string()
}

/// Keep operation names safe for use in file names.
fn sanitize(operation: &str) -> String {
    operation
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2019, 3, 14, 15, 9, 26)
            .single()
            .unwrap()
    }

    #[test]
    fn default_stem() {
        let logger = FileCallLogger::new("/tmp");
        assert_eq!(
            logger.file_stem("search", at()),
            "suitetalk-20190314.150926.000000-search"
        );
    }

    #[test]
    fn custom_formats() {
        let logger = FileCallLogger::new("/tmp")
            .with_file_format("%operation_%date")
            .with_date_format("%Y-%m-%d");
        assert_eq!(logger.file_stem("get", at()), "get_2019-03-14");
    }

    #[test]
    fn invalid_date_format_falls_back() {
        let logger = FileCallLogger::new("/tmp").with_date_format("%Q");
        assert_eq!(
            logger.file_stem("get", at()),
            "suitetalk-20190314.150926.000000-get"
        );
    }

    #[test]
    fn operation_names_are_sanitized() {
        assert_eq!(sanitize("../etc/passwd"), ".._etc_passwd");
        assert_eq!(sanitize("searchMoreWithId"), "searchMoreWithId");
    }

    #[test]
    fn from_config_requires_a_path() {
        assert!(FileCallLogger::from_config(&LogConfig::default()).is_none());

        let config = LogConfig {
            enabled: true,
            path: Some(PathBuf::from("/var/log/suitetalk")),
            file_format: Some("ns-%operation".to_string()),
            date_format: None,
        };
        let logger = FileCallLogger::from_config(&config).unwrap();
        assert_eq!(logger.dir(), Path::new("/var/log/suitetalk"));
        assert_eq!(logger.file_stem("add", at()), "ns-add");
    }
}
