//! Signed request execution and outcome classification
//!
//! The remote signals success and failure on two layers: the HTTP status and
//! an integer `result_code` embedded in the JSON body. A failure can arrive
//! inside an HTTP 200, so both layers are checked on every call.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::envelope::{HttpMethod, RequestEnvelope};
use crate::config::ClientConfig;
use crate::errors::{BandError, Result};

/// Embedded result code for a successful call.
pub(crate) const RESULT_CODE_OK: i64 = 1;

/// Embedded result code for an invalid or expired access token. The same
/// condition can also surface as a plain HTTP 401.
pub(crate) const RESULT_CODE_INVALID_TOKEN: i64 = 60400;

/// Outcome of one executed call.
///
/// Everything the remote actually said is a variant here; transport and
/// decode failures are `Err` at the [`RequestExecutor::execute`] level.
#[derive(Debug)]
pub enum ApiOutcome {
    /// `result_code == 1`; carries `result_data` (an empty object when the
    /// field was absent — "empty success" is valid success).
    Success(Value),
    /// The access token was rejected; the caller decides whether to refresh.
    Unauthorized,
    /// Business-logic failure despite valid auth.
    Failure {
        /// Embedded result code.
        code: i64,
        /// Message prefixed with the numeric code for diagnostics.
        message: String,
    },
}

#[derive(Debug, Deserialize)]
struct ResultBody {
    result_code: Option<i64>,
    result_data: Option<Value>,
    message: Option<String>,
}

/// Issues one signed HTTP call and classifies the response.
///
/// The access token is injected as one more parameter: query string for GET,
/// form body for POST. Never retries; retry policy lives in the API client.
#[derive(Debug, Clone)]
pub struct RequestExecutor {
    http: Client,
    api_base_url: String,
}

impl RequestExecutor {
    /// Build an executor using the configured API base URL and timeout.
    ///
    /// # Errors
    /// Returns [`BandError::Network`] if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BandError::Network(e.to_string()))?;

        Ok(Self { http, api_base_url: config.api_base_url.clone() })
    }

    /// Execute one envelope with the given access token.
    ///
    /// # Errors
    /// [`BandError::Network`] when the transport fails, [`BandError::Parse`]
    /// when the body is not the expected JSON envelope.
    pub async fn execute(&self, envelope: &RequestEnvelope, access_token: &str) -> Result<ApiOutcome> {
        let url = format!("{}{}", self.api_base_url, envelope.path);
        let mut params = envelope.present();
        params.push(("access_token", access_token.to_owned()));

        debug!(path = envelope.path, method = ?envelope.method, "sending API request");

        let response = match envelope.method {
            HttpMethod::Get => self.http.get(&url).query(&params).send().await,
            HttpMethod::Post => self.http.post(&url).form(&params).send().await,
        }
        .map_err(|e| BandError::Network(e.to_string()))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| BandError::Network(e.to_string()))?;

        debug!(path = envelope.path, status = status.as_u16(), "received API response");

        let decoded: ResultBody = serde_json::from_str(&body)
            .map_err(|e| BandError::Parse(format!("response body was not JSON: {e}")))?;

        Ok(classify(status, decoded))
    }
}

fn classify(status: StatusCode, body: ResultBody) -> ApiOutcome {
    let code = body.result_code.unwrap_or(0);

    // A stale token can be reported at either layer, sometimes inside an
    // HTTP 200; check before the general failure classification.
    if status == StatusCode::UNAUTHORIZED || code == RESULT_CODE_INVALID_TOKEN {
        return ApiOutcome::Unauthorized;
    }

    if code != RESULT_CODE_OK {
        let original = failure_message(&body);
        return ApiOutcome::Failure { code, message: format!("code {code}: {original}") };
    }

    ApiOutcome::Success(body.result_data.unwrap_or_else(|| Value::Object(Map::new())))
}

fn failure_message(body: &ResultBody) -> String {
    body.result_data
        .as_ref()
        .and_then(|data| data.get("message"))
        .and_then(Value::as_str)
        .map(str::to_owned)
        .or_else(|| body.message.clone())
        .unwrap_or_else(|| "unknown error".to_string())
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn executor_for(server: &MockServer) -> RequestExecutor {
        let config =
            ClientConfig::new("id", "secret", "http://localhost").with_api_base_url(server.uri());
        RequestExecutor::new(&config).unwrap()
    }

    #[tokio::test]
    async fn success_passes_result_data_through_unchanged() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/profile"))
            .and(query_param("access_token", "T"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "result_code": 1,
                "result_data": {"name": "june", "user_key": "U1"}
            })))
            .mount(&server)
            .await;

        let executor = executor_for(&server);
        let envelope = RequestEnvelope::get("/v2/profile");
        let outcome = executor.execute(&envelope, "T").await.unwrap();

        match outcome {
            ApiOutcome::Success(payload) => {
                assert_eq!(payload["name"], "june");
                assert_eq!(payload["user_key"], "U1");
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn absent_result_data_is_an_empty_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/band/albums"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"result_code": 1})),
            )
            .mount(&server)
            .await;

        let executor = executor_for(&server);
        let envelope = RequestEnvelope::get("/v2/band/albums").param("band_key", "B1");
        let outcome = executor.execute(&envelope, "T").await.unwrap();

        match outcome {
            ApiOutcome::Success(payload) => assert_eq!(payload, serde_json::json!({})),
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn failure_message_is_prefixed_with_the_code() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/band/posts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "result_code": 60104,
                "result_data": {"message": "Invalid parameters"}
            })))
            .mount(&server)
            .await;

        let executor = executor_for(&server);
        let envelope = RequestEnvelope::get("/v2/band/posts").param("band_key", "B1");
        let outcome = executor.execute(&envelope, "T").await.unwrap();

        match outcome {
            ApiOutcome::Failure { code, message } => {
                assert_eq!(code, 60104);
                assert_eq!(message, "code 60104: Invalid parameters");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn http_401_classifies_as_unauthorized() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/profile"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "result_code": 60400,
                "result_data": {"message": "Invalid access token"}
            })))
            .mount(&server)
            .await;

        let executor = executor_for(&server);
        let outcome =
            executor.execute(&RequestEnvelope::get("/v2/profile"), "stale").await.unwrap();

        assert!(matches!(outcome, ApiOutcome::Unauthorized));
    }

    #[tokio::test]
    async fn embedded_invalid_token_code_inside_http_200_is_unauthorized() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "result_code": 60400,
                "result_data": {"message": "Invalid access token"}
            })))
            .mount(&server)
            .await;

        let executor = executor_for(&server);
        let outcome =
            executor.execute(&RequestEnvelope::get("/v2/profile"), "stale").await.unwrap();

        assert!(matches!(outcome, ApiOutcome::Unauthorized));
    }

    #[tokio::test]
    async fn non_json_body_is_a_parse_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let executor = executor_for(&server);
        let result = executor.execute(&RequestEnvelope::get("/v2/profile"), "T").await;

        assert!(matches!(result, Err(BandError::Parse(_))));
    }

    #[tokio::test]
    async fn connection_failure_is_a_network_error() {
        let config = ClientConfig::new("id", "secret", "http://localhost")
            .with_api_base_url("http://127.0.0.1:1");

        let executor = RequestExecutor::new(&config).unwrap();
        let result = executor.execute(&RequestEnvelope::get("/v2/profile"), "T").await;

        assert!(matches!(result, Err(BandError::Network(_))));
    }

    #[tokio::test]
    async fn absent_params_never_reach_the_wire() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/band/posts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "result_code": 1,
                "result_data": {"items": []}
            })))
            .mount(&server)
            .await;

        let executor = executor_for(&server);
        let envelope = RequestEnvelope::get("/v2/band/posts")
            .param("band_key", "B1")
            .opt_param("after", None)
            .opt_param("limit", None);
        executor.execute(&envelope, "T").await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let query = requests[0].url.query().unwrap_or_default();
        assert!(query.contains("band_key=B1"));
        assert!(query.contains("access_token=T"));
        assert!(!query.contains("after"));
        assert!(!query.contains("limit"));
    }

    #[tokio::test]
    async fn post_sends_params_as_form_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v2.2/band/post/create"))
            .and(body_string_contains("band_key=B1"))
            .and(body_string_contains("access_token=T"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "result_code": 1,
                "result_data": {"post_key": "P1"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let executor = executor_for(&server);
        let envelope =
            RequestEnvelope::post("/v2.2/band/post/create").param("band_key", "B1").param(
                "content",
                "hello",
            );
        let outcome = executor.execute(&envelope, "T").await.unwrap();

        assert!(matches!(outcome, ApiOutcome::Success(_)));
    }
}
