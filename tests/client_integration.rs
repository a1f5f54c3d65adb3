use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use axum::{
    extract::{OriginalUri, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Router,
};
use mozscape_http::{
    endpoints, ClientOptions, LinksOptions, MetadataOption, MozscapeClient, MozscapeError, TopPagesOptions,
};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

#[derive(Clone)]
struct MockResponse {
    status: StatusCode,
    body: String,
    delay: Duration,
}

impl MockResponse {
    fn json(status: StatusCode, body: JsonValue) -> Self {
        Self::raw(status, body.to_string())
    }

    fn raw(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: Duration::from_millis(0),
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Clone, Debug)]
struct RecordedRequest {
    uri: String,
    headers: HeaderMap,
}

#[derive(Clone)]
struct MockState {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    hits: Arc<AtomicUsize>,
}

async fn api_handler(
    State(state): State<MockState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> impl IntoResponse {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state
        .requests
        .lock()
        .expect("request log mutex must not be poisoned")
        .push(RecordedRequest {
            uri: uri.to_string(),
            headers,
        });

    let response = {
        let mut queue = state
            .responses
            .lock()
            .expect("response queue mutex must not be poisoned");
        queue.pop_front().unwrap_or_else(|| {
            MockResponse::json(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error_message": "no mock response available"}),
            )
        })
    };

    if !response.delay.is_zero() {
        tokio::time::sleep(response.delay).await;
    }

    (
        response.status,
        [("content-type", "application/json"), ("x-mock", "1")],
        response.body,
    )
}

struct TestServer {
    host: String,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    task: tokio::task::JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl TestServer {
    fn client(&self) -> MozscapeClient {
        MozscapeClient::new("member-test", "secret-test")
            .with_options(ClientOptions::default().host(self.host.clone()))
    }

    fn last_request(&self) -> RecordedRequest {
        self.requests
            .lock()
            .expect("request log mutex must not be poisoned")
            .last()
            .cloned()
            .expect("server must have received a request")
    }
}

async fn spawn_server(responses: Vec<MockResponse>) -> TestServer {
    let state = MockState {
        responses: Arc::new(Mutex::new(responses.into())),
        requests: Arc::new(Mutex::new(Vec::new())),
        hits: Arc::new(AtomicUsize::new(0)),
    };

    let app = Router::new()
        .fallback(api_handler)
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("must bind test listener");
    let address = listener.local_addr().expect("must have local addr");
    let task = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("mock server must run");
    });

    TestServer {
        host: address.to_string(),
        hits: state.hits,
        requests: state.requests,
        task,
    }
}

#[tokio::test]
async fn success_delivers_parsed_body() {
    let server = spawn_server(vec![MockResponse::json(StatusCode::OK, json!({"pda": 42}))]).await;
    let moz = server.client();

    let body = moz
        .url_metrics("moz.com", ["domain_authority"])
        .await
        .expect("url metrics must succeed");

    assert_eq!(body, json!({"pda": 42}));
    assert_eq!(server.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn url_metrics_sends_path_cols_and_headers() {
    let server = spawn_server(vec![MockResponse::json(StatusCode::OK, json!({}))]).await;
    let moz = server.client();

    moz.url_metrics("moz.com/blog", ["title", "page_authority"])
        .await
        .expect("url metrics must succeed");

    let request = server.last_request();
    assert_eq!(
        request.uri,
        "/linkscape/url-metrics/moz.com%2Fblog?Cols=34359738369"
    );
    // base64("member-test:secret-test")
    assert_eq!(
        request.headers.get("authorization").unwrap(),
        "Basic bWVtYmVyLXRlc3Q6c2VjcmV0LXRlc3Q="
    );
    assert!(request
        .headers
        .get("user-agent")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("mozscape-http/"));
}

#[tokio::test]
async fn links_sends_only_present_options() {
    let server = spawn_server(vec![
        MockResponse::json(StatusCode::OK, json!([])),
        MockResponse::json(StatusCode::OK, json!([])),
    ])
    .await;
    let moz = server.client();

    moz.links("moz.com", "page_to_page", &LinksOptions::default())
        .await
        .expect("links must succeed");
    assert_eq!(server.last_request().uri, "/linkscape/links/moz.com?Scope=page_to_page");

    let options = LinksOptions::new()
        .sort("page_authority")
        .filter(["external", "follow"])
        .link_cols(["anchor_text"]);
    moz.links("moz.com", "page_to_domain", &options)
        .await
        .expect("links must succeed");
    assert_eq!(
        server.last_request().uri,
        "/linkscape/links/moz.com?Scope=page_to_domain&Sort=page_authority&Filter=external%2Bfollow&LinkCols=4"
    );
}

#[tokio::test]
async fn anchor_text_and_top_pages_send_fixed_and_default_params() {
    let server = spawn_server(vec![
        MockResponse::json(StatusCode::OK, json!([])),
        MockResponse::json(StatusCode::OK, json!([])),
        MockResponse::json(StatusCode::OK, json!([])),
    ])
    .await;
    let moz = server.client();

    moz.anchor_text("moz.com", "phrase_to_page", ["phrase"])
        .await
        .expect("anchor text must succeed");
    assert_eq!(
        server.last_request().uri,
        "/linkscape/anchor-text/moz.com?Scope=phrase_to_page&Cols=2&Sort=domains_linking_page"
    );

    moz.top_pages("moz.com", ["url"], &TopPagesOptions::default())
        .await
        .expect("top pages must succeed");
    assert_eq!(
        server.last_request().uri,
        "/linkscape/top-pages/moz.com?Cols=4&Offset=0&Limit=1000"
    );

    moz.top_pages("moz.com", ["url"], &TopPagesOptions::new().offset(50).limit(10))
        .await
        .expect("top pages must succeed");
    assert_eq!(
        server.last_request().uri,
        "/linkscape/top-pages/moz.com?Cols=4&Offset=50&Limit=10"
    );
}

#[tokio::test]
async fn metadata_sends_no_query_string() {
    let server = spawn_server(vec![MockResponse::json(StatusCode::OK, json!(1700000000))]).await;
    let moz = server.client();

    let body = moz
        .metadata(MetadataOption::LastUpdate)
        .await
        .expect("metadata must succeed");

    assert_eq!(body, json!(1700000000));
    assert_eq!(server.last_request().uri, "/linkscape/metadata/last_update");
}

#[tokio::test]
async fn non_200_status_becomes_api_error() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"error_message": "bad url"}),
    )])
    .await;
    let moz = server.client();

    let err = moz
        .url_metrics("not a url", ["title"])
        .await
        .expect_err("request must fail");

    assert_eq!(err.to_string(), "bad url");
    match err {
        MozscapeError::Api(api) => {
            assert_eq!(api.message, "bad url");
            assert_eq!(api.status, 500);
            assert_eq!(api.body, r#"{"error_message":"bad url"}"#);
            assert_eq!(api.headers.get("x-mock").unwrap(), "1");
            assert_eq!(api.request.method, reqwest::Method::GET);
            assert!(api.request.uri.contains("/linkscape/url-metrics/not%20a%20url"));
            assert!(api.request.headers.get("authorization").is_none());
            assert!(api.request.headers.get("user-agent").is_some());
        }
        other => panic!("expected api error, got {other:?}"),
    }
    assert_eq!(server.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn non_json_error_body_uses_fallback_message() {
    let server = spawn_server(vec![MockResponse::raw(
        StatusCode::SERVICE_UNAVAILABLE,
        "upstream down",
    )])
    .await;
    let moz = server.client();

    let err = moz
        .metadata(MetadataOption::IndexStatus)
        .await
        .expect_err("request must fail");

    assert_eq!(err.status(), Some(503));
    assert_eq!(err.to_string(), "http error 503: upstream down");
    // Failures are not retried.
    assert_eq!(server.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn other_success_statuses_are_errors() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::CREATED,
        json!({"error_message": "unexpected"}),
    )])
    .await;

    let err = server
        .client()
        .metadata(MetadataOption::NextUpdate)
        .await
        .expect_err("only 200 counts as success");

    assert_eq!(err.status(), Some(201));
}

#[tokio::test]
async fn invalid_json_on_success_is_decode_error() {
    let server = spawn_server(vec![MockResponse::raw(StatusCode::OK, "not json")]).await;

    let err = server
        .client()
        .url_metrics("moz.com", ["title"])
        .await
        .expect_err("decode must fail");

    assert!(matches!(err, MozscapeError::Decode(_)));
}

#[tokio::test]
async fn send_decodes_into_caller_type() {
    #[derive(Debug, Deserialize)]
    struct Metrics {
        upa: f64,
        pda: f64,
    }

    let server = spawn_server(vec![MockResponse::json(
        StatusCode::OK,
        json!({"upa": 55.5, "pda": 91.0}),
    )])
    .await;
    let moz = server.client();

    let request =
        endpoints::url_metrics("moz.com", ["page_authority", "domain_authority"]);
    let metrics: Metrics = moz.send(&request).await.expect("typed decode must succeed");

    assert_eq!(metrics.upa, 55.5);
    assert_eq!(metrics.pda, 91.0);
}

#[tokio::test]
async fn request_timeout_surfaces_transport_error() {
    let server = spawn_server(vec![
        MockResponse::json(StatusCode::OK, json!({})).with_delay(Duration::from_millis(150)),
    ])
    .await;

    let moz = MozscapeClient::new("id", "key")
        .with_options(ClientOptions::default().host(server.host.clone()).timeout_ms(20));

    let err = moz
        .metadata(MetadataOption::LastUpdate)
        .await
        .expect_err("request must timeout");

    match err {
        MozscapeError::Transport(inner) => assert!(inner.is_timeout()),
        other => panic!("expected transport timeout error, got {other:?}"),
    }
}

#[tokio::test]
async fn connection_refused_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("must bind");
    let address = listener.local_addr().expect("must have local addr");
    drop(listener);

    let moz = MozscapeClient::new("id", "key")
        .with_options(ClientOptions::default().host(address.to_string()));

    let err = moz
        .metadata(MetadataOption::LastUpdate)
        .await
        .expect_err("nothing is listening");

    assert!(matches!(err, MozscapeError::Transport(_)));
}
