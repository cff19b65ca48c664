//! HTTP transport tests against a mock web services endpoint.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use serde_json::json;
use suitetalk_core::error::TransportError;
use suitetalk_core::{Config, Credentials, Error, RecordRef, SearchRecord, SessionClient};
use suitetalk_http::{HttpTransport, HttpTransportConfig};
use wiremock::matchers::{body_partial_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PORT_PATH: &str = "/services/NetSuitePort_2019_1";

fn host(server: &MockServer) -> String {
    format!("http://127.0.0.1:{}", server.address().port())
}

fn client(server: &MockServer) -> SessionClient {
    let credentials = Credentials::token("123456", "ck", "cs", "tk", "ts");
    let config = Config::new(&host(server), "2019_1", credentials).unwrap();
    SessionClient::new(config, Arc::new(HttpTransport::new().unwrap())).unwrap()
}

fn search_page(page_index: u32, ids: &[&str]) -> serde_json::Value {
    let records: Vec<_> = ids
        .iter()
        .map(|id| json!({"$type": "Customer", "internalId": id}))
        .collect();
    json!({
        "searchResult": {
            "status": {"isSuccess": true},
            "searchId": "WEBSERVICES_123456_abc",
            "pageIndex": page_index,
            "totalRecords": 5,
            "totalPages": 3,
            "pageSize": 2,
            "recordList": {"record": records}
        }
    })
}

// ============================================================================
// Request shape
// ============================================================================

#[tokio::test]
async fn posts_envelope_to_operation_path() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{PORT_PATH}/get")))
        .and(header("SOAPAction", "get"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "operation": "get",
            "body": {"baseRef": {"internalId": "42", "type": "customer"}},
            "header": {"tokenPassport": {"account": "123456", "consumerKey": "ck"}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "readResponse": {
                "status": {"isSuccess": true},
                "record": {"$type": "Customer", "internalId": "42", "companyName": "Wolfe"}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let record = client(&server)
        .get(&RecordRef::internal("42").with_type("customer"))
        .await
        .unwrap();

    assert_eq!(record.get("companyName").unwrap(), "Wolfe");
}

#[tokio::test]
async fn user_agent_names_the_client() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let transport = HttpTransport::new().unwrap();
    let response = client_call(&transport, &server, "getDeleted").await.unwrap();
    assert_eq!(response, json!({}));

    let requests = server.received_requests().await.unwrap();
    let agent = requests[0].headers.get("user-agent").unwrap().to_str().unwrap();
    assert!(agent.starts_with("suitetalk/"));
}

async fn client_call(
    transport: &HttpTransport,
    server: &MockServer,
    operation: &str,
) -> Result<serde_json::Value, Error> {
    let credentials = Credentials::token("123456", "ck", "cs", "tk", "ts");
    let config = Config::new(&host(server), "2019_1", credentials).unwrap();
    let client = SessionClient::new(config, Arc::new(transport.clone())).unwrap();
    client.dispatch(operation, json!({})).await
}

// ============================================================================
// Error mapping
// ============================================================================

#[tokio::test]
async fn fault_body_is_a_fault() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "fault": {
                "code": "soapenv:Server.userException",
                "message": "Invalid login attempt."
            }
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .get(&RecordRef::internal("1"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Transport(TransportError::Fault { ref code, .. }) if code == "soapenv:Server.userException"
    ));
}

#[tokio::test]
async fn plain_error_status_is_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    let err = client(&server)
        .get(&RecordRef::internal("1"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Transport(TransportError::Http { status: 503, .. })
    ));
}

#[tokio::test]
async fn undecodable_success_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<soapenv:Envelope/>"))
        .mount(&server)
        .await;

    let err = client(&server)
        .get(&RecordRef::internal("1"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Transport(TransportError::Decode { .. })
    ));
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let transport = HttpTransport::with_config(HttpTransportConfig {
        timeout: Some(Duration::from_millis(50)),
        ..HttpTransportConfig::default()
    })
    .unwrap();

    let err = client_call(&transport, &server, "get").await.unwrap_err();
    assert!(matches!(
        err,
        Error::Transport(TransportError::Timeout { .. })
    ));
}

#[tokio::test]
async fn refused_connection_is_connection_error() {
    let credentials = Credentials::token("123456", "ck", "cs", "tk", "ts");
    let config = Config::new("http://127.0.0.1:1", "2019_1", credentials).unwrap();
    let client = SessionClient::new(config, Arc::new(HttpTransport::new().unwrap())).unwrap();

    let err = client.get(&RecordRef::internal("1")).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Transport(TransportError::Connection { .. })
    ));
}

// ============================================================================
// Paged search
// ============================================================================

#[tokio::test]
async fn search_session_pages_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{PORT_PATH}/search")))
        .and(body_partial_json(json!({
            "header": {"searchPreferences": {"pageSize": 2, "bodyFieldsOnly": true}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(1, &["1", "2"])))
        .expect(1)
        .mount(&server)
        .await;

    for (page, ids) in [(2, vec!["3", "4"]), (3, vec!["5"])] {
        Mock::given(method("POST"))
            .and(path(format!("{PORT_PATH}/searchMoreWithId")))
            .and(body_partial_json(json!({
                "body": {"searchId": "WEBSERVICES_123456_abc", "pageIndex": page}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_page(page, &ids)))
            .expect(1)
            .mount(&server)
            .await;
    }

    let criteria = SearchRecord::new(json!({
        "$type": "CustomerSearchBasic",
        "companyName": {"operator": "startsWith", "searchValue": "W"}
    }))
    .unwrap();

    let records: Vec<_> = client(&server)
        .search_session(criteria)
        .with_page_size(2)
        .into_stream()
        .map(|r| r.unwrap().get("internalId").cloned().unwrap())
        .collect()
        .await;

    assert_eq!(records, ["1", "2", "3", "4", "5"]);
}

#[tokio::test]
async fn search_status_failure_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{PORT_PATH}/search")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "searchResult": {
                "status": {
                    "isSuccess": false,
                    "statusDetail": [
                        {"code": "INVALID_SEARCH", "message": "Invalid search criteria", "type": "ERROR"}
                    ]
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let criteria = SearchRecord::new(json!({"$type": "CustomerSearchBasic"})).unwrap();
    let mut session = client(&server).search_session(criteria);

    let err = session.count().await.unwrap_err();
    assert!(err.contains_code("INVALID_SEARCH").is_some());
    assert!(matches!(session.count().await, Err(Error::SessionFailed)));
}
