//! Piston execution backend.
//!
//! Runs code through the Piston v2 HTTP API and lists its installed
//! runtimes for the language registry.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::domain::entities::{ExecutionOutput, LanguageEntry};
use crate::domain::errors::ExecutionError;
use crate::ports::{CodeExecutor, RuntimeCatalog};

/// Public Piston instance
pub const DEFAULT_BASE_URL: &str = "https://emkc.org/api/v2/piston";

/// How long to wait on the backend when no run timeout is forwarded
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Slack added on top of a forwarded run timeout for compile and transfer
const HTTP_TIMEOUT_SLACK: Duration = Duration::from_secs(5);

/// Signal Piston uses when it kills a run for exceeding its limits
const KILL_SIGNAL: &str = "SIGKILL";

/// Configuration for the Piston backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PistonConfig {
    /// API root, e.g. `http://localhost:2000/api/v2`
    pub base_url: String,
    /// Run timeout forwarded to Piston, in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_timeout_ms: Option<u64>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_user_agent() -> String {
    format!("runbot/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for PistonConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            run_timeout_ms: None,
            user_agent: default_user_agent(),
        }
    }
}

impl PistonConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Forward a run timeout to the backend
    pub fn with_run_timeout(mut self, timeout: Duration) -> Self {
        self.run_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    fn http_timeout(&self) -> Duration {
        self.run_timeout_ms
            .map(|ms| Duration::from_millis(ms) + HTTP_TIMEOUT_SLACK)
            .unwrap_or(DEFAULT_HTTP_TIMEOUT)
    }
}

/// Piston API client
#[derive(Clone)]
pub struct PistonExecutor {
    client: Client,
    base_url: String,
    run_timeout_ms: Option<u64>,
}

impl PistonExecutor {
    pub fn new(config: PistonConfig) -> Result<Self, ExecutionError> {
        let client = Client::builder()
            .timeout(config.http_timeout())
            .user_agent(&config.user_agent)
            .build()
            .map_err(|err| ExecutionError::RequestFailed(err.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            run_timeout_ms: config.run_timeout_ms,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn read_error(response: reqwest::Response) -> ExecutionError {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error body".to_string());
        map_http_error(status, body)
    }
}

#[async_trait]
impl CodeExecutor for PistonExecutor {
    async fn run(&self, language: &str, code: &str) -> Result<ExecutionOutput, ExecutionError> {
        let url = format!("{}/execute", self.base_url);
        let request = ExecuteRequest {
            language,
            version: "*",
            files: vec![SourceFile { content: code }],
            run_timeout: self.run_timeout_ms,
        };

        debug!(language = %language, code_len = %code.len(), "Sending code to Piston");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    ExecutionError::Timeout
                } else {
                    ExecutionError::RequestFailed(err.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(Self::read_error(response).await);
        }

        let payload: ExecuteResponse = response
            .json()
            .await
            .map_err(|err| ExecutionError::ParseError(err.to_string()))?;

        interpret(payload)
    }

    fn name(&self) -> &str {
        "piston"
    }
}

#[async_trait]
impl RuntimeCatalog for PistonExecutor {
    async fn runtimes(&self) -> Result<Vec<LanguageEntry>, ExecutionError> {
        let url = format!("{}/runtimes", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| ExecutionError::RequestFailed(err.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::read_error(response).await);
        }

        let runtimes: Vec<Runtime> = response
            .json()
            .await
            .map_err(|err| ExecutionError::ParseError(err.to_string()))?;

        debug!(count = runtimes.len(), "Fetched Piston runtimes");

        Ok(runtimes.into_iter().map(Runtime::into_entry).collect())
    }
}

// ============================================
// Request/Response Types
// ============================================

#[derive(Serialize)]
struct ExecuteRequest<'a> {
    language: &'a str,
    version: &'a str,
    files: Vec<SourceFile<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    run_timeout: Option<u64>,
}

#[derive(Serialize)]
struct SourceFile<'a> {
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ExecuteResponse {
    #[serde(default)]
    version: Option<String>,
    run: Stage,
    #[serde(default)]
    compile: Option<Stage>,
}

#[derive(Debug, Deserialize)]
struct Stage {
    #[serde(default)]
    output: String,
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    signal: Option<String>,
}

impl Stage {
    fn failed(&self) -> bool {
        self.code.is_some_and(|code| code != 0) || self.signal.is_some()
    }

    fn killed(&self) -> bool {
        self.signal.as_deref() == Some(KILL_SIGNAL)
    }
}

#[derive(Debug, Deserialize)]
struct Runtime {
    language: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    aliases: Vec<String>,
}

impl Runtime {
    fn into_entry(self) -> LanguageEntry {
        let entry = LanguageEntry::new(self.language).with_aliases(self.aliases);
        match self.version {
            Some(version) => entry.with_version(version),
            None => entry,
        }
    }
}

// ============================================
// Helper Functions
// ============================================

fn interpret(response: ExecuteResponse) -> Result<ExecutionOutput, ExecutionError> {
    if let Some(compile) = &response.compile {
        if compile.killed() {
            return Err(ExecutionError::Timeout);
        }
        if compile.failed() {
            return Err(ExecutionError::Compile(compile.output.clone()));
        }
    }

    if response.run.killed() {
        return Err(ExecutionError::Timeout);
    }

    let output = ExecutionOutput::new(response.run.output);
    Ok(match response.version {
        Some(version) => output.with_version(version),
        None => output,
    })
}

fn map_http_error(status: StatusCode, body: String) -> ExecutionError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return ExecutionError::RateLimited;
    }

    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|json| {
            json.get("message")
                .and_then(|msg| msg.as_str())
                .map(|msg| msg.to_string())
        })
        .unwrap_or(body);

    ExecutionError::Api {
        status: status.as_u16(),
        message,
    }
}
