use crate::config::AppConfig;
use crate::models::QueryRange;
use crate::table::ResultTable;
use reqwest::{
    header::{CONTENT_TYPE, USER_AGENT},
    StatusCode,
};
use secrecy::ExposeSecret;
use std::{sync::Arc, time::Duration, time::Instant};
use thiserror::Error;
use tracing::{error, info};

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const API_KEY_HEADER: &str = "x-api-key";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36";
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no response within {0:?}")]
    Timeout(Duration),
    #[error("connection failed: {0}")]
    ConnectionFailure(String),
    #[error("unexpected failure: {0}")]
    UnexpectedFailure(String),
}

impl FetchError {
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Timeout(_) => "timeout",
            FetchError::ConnectionFailure(_) => "connection_failure",
            FetchError::UnexpectedFailure(_) => "unexpected_failure",
        }
    }

    pub fn user_notice(&self) -> &'static str {
        match self {
            FetchError::Timeout(_) => "The IPR database took too long to respond.",
            FetchError::ConnectionFailure(_) | FetchError::UnexpectedFailure(_) => {
                "An error establishing connection with the IPR site occurred."
            }
        }
    }
}

#[derive(Clone)]
pub struct RemoteClient {
    http: reqwest::Client,
    config: Arc<AppConfig>,
    timeout: Duration,
}

impl RemoteClient {
    pub fn new(config: Arc<AppConfig>) -> Result<Self, reqwest::Error> {
        // SECURITY: certificate verification is disabled for the registry.
        // The API key travels over a channel whose peer is not authenticated.
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .build()?;

        Ok(Self {
            http,
            config,
            timeout: REQUEST_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn fetch(&self, range: &QueryRange) -> Result<ResultTable, FetchError> {
        let started = Instant::now();
        let (status, outcome) = self.execute(range).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        let status = status.map(|status| status.as_u16());

        match &outcome {
            Ok(table) => info!(
                status,
                category = range.category.as_str(),
                from = %range.start_date,
                to = %range.end_date,
                rows = table.len(),
                columns = table.columns().len(),
                elapsed_ms,
                "fetched applications"
            ),
            Err(err) => error!(
                status,
                kind = err.kind(),
                error = %err,
                category = range.category.as_str(),
                from = %range.start_date,
                to = %range.end_date,
                elapsed_ms,
                "failed to fetch applications"
            ),
        }

        outcome
    }

    async fn execute(
        &self,
        range: &QueryRange,
    ) -> (Option<StatusCode>, Result<ResultTable, FetchError>) {
        let form = [
            ("fromDate", range.start_date.format(DATE_FORMAT).to_string()),
            ("toDate", range.end_date.format(DATE_FORMAT).to_string()),
        ];

        let response = self
            .http
            .post(self.config.endpoint(range.category).clone())
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .header(API_KEY_HEADER, self.config.api_key.expose_secret())
            .form(&form)
            .timeout(self.timeout)
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(err) => return (None, Err(self.classify(err))),
        };

        let status = response.status();
        if status != StatusCode::OK {
            return (
                Some(status),
                Err(FetchError::ConnectionFailure(format!(
                    "upstream answered {status}"
                ))),
            );
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(err) => return (Some(status), Err(self.classify(err))),
        };

        (Some(status), parse_table(&body))
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            return FetchError::Timeout(self.timeout);
        }
        let err = err.without_url();
        if err.is_connect() || err.is_request() || err.is_body() || err.is_redirect() {
            FetchError::ConnectionFailure(err.to_string())
        } else {
            FetchError::UnexpectedFailure(err.to_string())
        }
    }
}

pub fn parse_table(body: &[u8]) -> Result<ResultTable, FetchError> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|err| FetchError::UnexpectedFailure(format!("invalid JSON body: {err}")))?;
    ResultTable::from_json(value).map_err(|err| FetchError::UnexpectedFailure(err.to_string()))
}
