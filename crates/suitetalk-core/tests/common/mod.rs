//! Shared helpers for suitetalk-core integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use suitetalk_core::error::TransportError;
use suitetalk_core::{
    CallLogger, Config, Credentials, Envelope, LogConfig, SessionClient, Transport,
};

pub const HOST: &str = "https://123456.suitetalk.api.netsuite.com";
pub const LOCATION: &str = "https://123456.suitetalk.api.netsuite.com/services/NetSuitePort_2019_1";

// ============================================================================
// Scripted transport
// ============================================================================

/// A transport that replays queued responses and records every envelope.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<Value, TransportError>>>,
    calls: Mutex<Vec<(String, Envelope)>>,
    delay: Option<Duration>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Each call sleeps before answering, so concurrent callers overlap.
    pub fn with_delay(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay: Some(delay),
            ..Self::default()
        })
    }

    pub fn push_ok(&self, response: Value) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    pub fn push_err(&self, error: TransportError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn calls(&self) -> Vec<(String, Envelope)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn operations(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, e)| e.operation().to_string())
            .collect()
    }

    pub fn last(&self) -> Envelope {
        self.calls.lock().unwrap().last().unwrap().1.clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn call(&self, location: &str, envelope: &Envelope) -> Result<Value, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((location.to_string(), envelope.clone()));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(TransportError::Connection {
                    message: "no scripted response".to_string(),
                })
            })
    }
}

// ============================================================================
// Call loggers
// ============================================================================

#[derive(Debug, Clone)]
pub struct LoggedCall {
    pub operation: String,
    pub request: Value,
    pub response: Option<Value>,
}

#[derive(Default)]
pub struct RecordingLogger {
    pub calls: Mutex<Vec<LoggedCall>>,
}

#[async_trait]
impl CallLogger for RecordingLogger {
    async fn log_call(
        &self,
        operation: &str,
        request: &Value,
        response: Option<&Value>,
    ) -> std::io::Result<()> {
        self.calls.lock().unwrap().push(LoggedCall {
            operation: operation.to_string(),
            request: request.clone(),
            response: response.cloned(),
        });
        Ok(())
    }
}

pub struct FailingLogger;

#[async_trait]
impl CallLogger for FailingLogger {
    async fn log_call(&self, _: &str, _: &Value, _: Option<&Value>) -> std::io::Result<()> {
        Err(std::io::Error::other("disk full"))
    }
}

// ============================================================================
// Clients
// ============================================================================

pub fn token_config(host: &str) -> Config {
    let credentials = Credentials::token("123456", "ck", "cs", "tk", "ts");
    Config::new(host, "2019_1", credentials).unwrap()
}

pub fn password_config(host: &str) -> Config {
    let credentials = Credentials::password("123456", "ops@example.com", "hunter2", "3");
    Config::new(host, "2019_1", credentials).unwrap()
}

pub fn token_client(transport: &Arc<ScriptedTransport>) -> SessionClient {
    SessionClient::new(token_config(HOST), transport.clone()).unwrap()
}

pub fn logged_client(
    transport: &Arc<ScriptedTransport>,
    logger: Arc<dyn CallLogger>,
    enabled: bool,
) -> SessionClient {
    let logging = LogConfig {
        enabled,
        ..LogConfig::default()
    };
    SessionClient::with_call_logger(
        token_config(HOST).with_logging(logging),
        transport.clone(),
        logger,
    )
    .unwrap()
}

// ============================================================================
// Response bodies
// ============================================================================

pub fn customer(id: &str) -> Value {
    json!({"$type": "Customer", "internalId": id})
}

pub fn search_page(
    search_id: &str,
    page_index: u32,
    total_records: u64,
    total_pages: u32,
    ids: &[&str],
) -> Value {
    let records: Vec<Value> = ids.iter().map(|id| customer(id)).collect();
    json!({
        "searchResult": {
            "status": {"isSuccess": true},
            "searchId": search_id,
            "pageIndex": page_index,
            "totalRecords": total_records,
            "totalPages": total_pages,
            "pageSize": 2,
            "recordList": {"record": records}
        }
    })
}

pub fn search_failure(code: &str, message: &str) -> Value {
    json!({
        "searchResult": {
            "status": {
                "isSuccess": false,
                "statusDetail": [
                    {"code": "WARNING_ONLY", "message": "first", "type": "WARN"},
                    {"code": code, "message": message, "type": "ERROR"}
                ]
            }
        }
    })
}

pub fn read_response(id: &str) -> Value {
    json!({
        "readResponse": {
            "status": {"isSuccess": true},
            "record": customer(id)
        }
    })
}

pub fn data_center_response(domain: &str) -> Value {
    json!({
        "getDataCenterUrlsResult": {
            "status": {"isSuccess": true},
            "dataCenterUrls": {
                "webservicesDomain": domain,
                "restDomain": "https://123456.restlets.api.netsuite.com",
                "systemDomain": "https://123456.app.netsuite.com"
            }
        }
    })
}
