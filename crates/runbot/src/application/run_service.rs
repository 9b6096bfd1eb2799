//! Run Application Service (Use Case)
//!
//! Orchestrates one chat message end to end: parse, resolve, execute,
//! render.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::application::reply::{
    render_execution_error, render_output, render_rejection, Reply, MIN_MESSAGE_LIMIT,
};
use crate::domain::entities::{ExecutionOutput, ResolvedRequest};
use crate::domain::errors::{DomainError, ExecutionError, RequestError};
use crate::domain::services::{
    extract, parse_command, Cropper, LanguageRegistry, DEFAULT_COMMAND_PREFIX,
};
use crate::domain::value_objects::OutputMode;
use crate::ports::CodeExecutor;

/// Default per-message character limit, kept low to stay clear of the
/// transport's rate limiter
pub const DEFAULT_MESSAGE_LIMIT: usize = 500;

/// Behaviour of the run pipeline
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Maximum characters per outbound message
    pub limit: usize,
    pub mode: OutputMode,
    /// First word of the `!run <language>` command form
    pub command_prefix: String,
    /// Whether bare fenced blocks (```lang ... ```) are executed too
    pub code_blocks: bool,
    /// Whether to list supported languages when a tag is not recognised
    pub list_languages: bool,
    /// Whether cropping avoids cutting right after a `/`
    pub avoid_separator_split: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            limit: DEFAULT_MESSAGE_LIMIT,
            mode: OutputMode::default(),
            command_prefix: DEFAULT_COMMAND_PREFIX.to_string(),
            code_blocks: true,
            list_languages: true,
            avoid_separator_split: true,
        }
    }
}

impl RunSettings {
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_mode(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_command_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.command_prefix = prefix.into();
        self
    }

    pub fn with_code_blocks(mut self, enable: bool) -> Self {
        self.code_blocks = enable;
        self
    }

    pub fn with_list_languages(mut self, enable: bool) -> Self {
        self.list_languages = enable;
        self
    }

    pub fn with_separator_avoidance(mut self, enable: bool) -> Self {
        self.avoid_separator_split = enable;
        self
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.limit < MIN_MESSAGE_LIMIT {
            return Err(DomainError::Validation(format!(
                "message limit must be at least {}, got {}",
                MIN_MESSAGE_LIMIT, self.limit
            )));
        }
        if self.command_prefix.trim().is_empty() || self.command_prefix.contains(char::is_whitespace)
        {
            return Err(DomainError::Validation(format!(
                "command prefix must be a single non-empty word, got '{}'",
                self.command_prefix
            )));
        }
        Ok(())
    }
}

/// Application service for running chat messages as code
///
/// Holds no mutable state; one instance serves concurrent messages.
pub struct RunService<E: ?Sized> {
    registry: Arc<LanguageRegistry>,
    executor: Arc<E>,
    settings: RunSettings,
    cropper: Cropper,
}

impl<E: CodeExecutor + ?Sized> RunService<E> {
    pub fn new(
        registry: Arc<LanguageRegistry>,
        executor: Arc<E>,
        settings: RunSettings,
    ) -> Result<Self, DomainError> {
        settings.validate()?;
        let cropper = Cropper::new().with_separator_avoidance(settings.avoid_separator_split);
        Ok(Self {
            registry,
            executor,
            settings,
            cropper,
        })
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    /// Parse and resolve a message.
    ///
    /// `Ok(None)` means the message is not addressed to us and gets no reply.
    pub fn prepare(&self, message: &str) -> Result<Option<ResolvedRequest>, RequestError> {
        if let Some(command) = parse_command(message, &self.settings.command_prefix) {
            let language = self.resolve(&command.language)?;
            let code = command.code()?;
            return Ok(Some(ResolvedRequest::new(language, code)));
        }

        if !self.settings.code_blocks {
            return Ok(None);
        }

        let parsed = extract(message);
        if !parsed.is_code_message {
            return Ok(None);
        }
        if !parsed.has_body() {
            return Err(RequestError::EmptyCode);
        }
        if !parsed.has_tag() {
            return Err(RequestError::MissingLanguage);
        }

        let language = self.resolve(&parsed.raw_tag)?;
        Ok(Some(ResolvedRequest::new(language, parsed.body)))
    }

    fn resolve(&self, tag: &str) -> Result<String, RequestError> {
        self.registry
            .resolve(tag)
            .map(str::to_string)
            .ok_or_else(|| RequestError::UnsupportedLanguage(tag.to_string()))
    }

    /// Issue the single backend call for a resolved request.
    pub async fn execute(
        &self,
        request: &ResolvedRequest,
    ) -> Result<ExecutionOutput, ExecutionError> {
        info!(
            request_id = %request.id,
            language = %request.language,
            backend = %self.executor.name(),
            code_len = request.code.len(),
            "Executing code"
        );

        let started = Utc::now();
        let result = self.executor.run(&request.language, &request.code).await;
        let elapsed_ms = (Utc::now() - started).num_milliseconds();

        match &result {
            Ok(output) => debug!(
                request_id = %request.id,
                output_len = output.output.len(),
                version = ?output.version,
                elapsed_ms = elapsed_ms,
                "Execution completed"
            ),
            Err(err) => warn!(
                request_id = %request.id,
                error = %err,
                elapsed_ms = elapsed_ms,
                "Execution failed"
            ),
        }

        result
    }

    /// Handle one chat message and build the reply, if any.
    pub async fn handle(&self, message: &str) -> Option<Reply> {
        let prepared = self.prepare(message).transpose()?;
        Some(self.handle_prepared(prepared).await)
    }

    /// Build the reply for a message [`prepare`](Self::prepare) addressed
    /// to us: the rejection, or the rendered result of the backend call.
    pub async fn handle_prepared(&self, prepared: Result<ResolvedRequest, RequestError>) -> Reply {
        let request = match prepared {
            Ok(request) => request,
            Err(err) => {
                debug!(reason = %err, "Rejected message");
                return render_rejection(
                    &err,
                    &self.registry,
                    self.settings.list_languages,
                    self.settings.limit,
                );
            }
        };

        let reply = match self.execute(&request).await {
            Ok(output) => render_output(
                &output.output,
                self.settings.mode,
                self.settings.limit,
                &self.cropper,
            ),
            Err(err) => render_execution_error(&err, self.settings.limit, &self.cropper),
        };

        debug!(
            request_id = %request.id,
            messages = reply.len(),
            "Reply ready"
        );
        reply
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::LanguageEntry;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records calls and answers with a canned result
    struct FakeExecutor {
        result: Result<ExecutionOutput, ExecutionError>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl FakeExecutor {
        fn returning(output: &str) -> Self {
            Self {
                result: Ok(ExecutionOutput::new(output)),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing(err: ExecutionError) -> Self {
            Self {
                result: Err(err),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CodeExecutor for FakeExecutor {
        async fn run(
            &self,
            language: &str,
            code: &str,
        ) -> Result<ExecutionOutput, ExecutionError> {
            self.calls
                .lock()
                .unwrap()
                .push((language.to_string(), code.to_string()));
            self.result.clone()
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    fn registry() -> Arc<LanguageRegistry> {
        Arc::new(
            LanguageRegistry::new(vec![
                LanguageEntry::new("python").with_aliases(["py", "py3"]),
                LanguageEntry::new("bash").with_aliases(["sh"]),
            ])
            .unwrap(),
        )
    }

    fn service(
        executor: FakeExecutor,
        settings: RunSettings,
    ) -> (RunService<FakeExecutor>, Arc<FakeExecutor>) {
        let executor = Arc::new(executor);
        let service = RunService::new(registry(), executor.clone(), settings).unwrap();
        (service, executor)
    }

    #[test]
    fn test_prepare_bare_block() {
        let (service, _) = service(FakeExecutor::returning(""), RunSettings::default());
        let request = service.prepare("```py3\nprint(1)\n```").unwrap().unwrap();
        assert_eq!(request.language, "python");
        assert_eq!(request.code, "print(1)");
    }

    #[test]
    fn test_prepare_command() {
        let (service, _) = service(FakeExecutor::returning(""), RunSettings::default());
        let request = service
            .prepare("!run SH\n```\necho hi\n```")
            .unwrap()
            .unwrap();
        assert_eq!(request.language, "bash");
        assert_eq!(request.code, "echo hi");
    }

    #[test]
    fn test_prepare_ignores_chat() {
        let (service, _) = service(FakeExecutor::returning(""), RunSettings::default());
        assert_eq!(service.prepare("hello everyone"), Ok(None));
        assert_eq!(service.prepare("!help"), Ok(None));
    }

    #[test]
    fn test_prepare_rejections() {
        let (service, _) = service(FakeExecutor::returning(""), RunSettings::default());
        assert_eq!(service.prepare("```\n```"), Err(RequestError::EmptyCode));
        assert_eq!(
            service.prepare("```\nprint(1)\n```"),
            Err(RequestError::MissingLanguage)
        );
        assert_eq!(
            service.prepare("```cobra\nprint(1)\n```"),
            Err(RequestError::UnsupportedLanguage("cobra".into()))
        );
        assert_eq!(
            service.prepare("!run cobra\n```\nx\n```"),
            Err(RequestError::UnsupportedLanguage("cobra".into()))
        );
        assert_eq!(
            service.prepare("!run python\n```\n```"),
            Err(RequestError::EmptyCode)
        );
        assert_eq!(
            service.prepare("!run python"),
            Err(RequestError::TooFewLines)
        );
    }

    #[test]
    fn test_language_is_checked_before_code() {
        let (service, _) = service(FakeExecutor::returning(""), RunSettings::default());
        assert_eq!(
            service.prepare("!run cobra"),
            Err(RequestError::UnsupportedLanguage("cobra".into()))
        );
    }

    #[test]
    fn test_bare_blocks_can_be_disabled() {
        let settings = RunSettings::default().with_code_blocks(false);
        let (service, _) = service(FakeExecutor::returning(""), settings);
        assert_eq!(service.prepare("```python\nprint(1)\n```"), Ok(None));
        assert!(service
            .prepare("!run python\n```\nprint(1)\n```")
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_invalid_settings() {
        let executor = Arc::new(FakeExecutor::returning(""));
        let settings = RunSettings::default().with_limit(8);
        assert!(RunService::new(registry(), executor.clone(), settings).is_err());

        // too small for a cropped reply
        let settings = RunSettings::default().with_mode(OutputMode::Crop).with_limit(40);
        assert!(RunService::new(registry(), executor.clone(), settings).is_err());

        let settings = RunSettings::default().with_limit(MIN_MESSAGE_LIMIT);
        assert!(RunService::new(registry(), executor.clone(), settings).is_ok());

        let settings = RunSettings::default().with_command_prefix("run now");
        assert!(RunService::new(registry(), executor, settings).is_err());
    }

    #[tokio::test]
    async fn test_handle_runs_once_and_chunks() {
        let (service, executor) = service(
            FakeExecutor::returning(&"A".repeat(1200)),
            RunSettings::default(),
        );

        let reply = service.handle("```python\nprint('A' * 1200)\n```").await.unwrap();
        assert_eq!(reply.len(), 3);
        assert_eq!(
            executor.calls(),
            vec![("python".to_string(), "print('A' * 1200)".to_string())]
        );
    }

    #[tokio::test]
    async fn test_handle_crop_mode() {
        let settings = RunSettings::default().with_mode(OutputMode::Crop);
        let (service, _) = service(FakeExecutor::returning("hello\n"), settings);

        let reply = service.handle("!run bash\n```\necho hello\n```").await.unwrap();
        assert_eq!(
            reply.messages(),
            &["Received Output:\n```\nhello\n\n```\n".to_string()]
        );
    }

    #[tokio::test]
    async fn test_crop_at_minimum_limit_fits() {
        let settings = RunSettings::default()
            .with_mode(OutputMode::Crop)
            .with_limit(MIN_MESSAGE_LIMIT);
        let (service, _) = service(FakeExecutor::returning(&"x".repeat(1000)), settings);

        let reply = service.handle("```py\nprint('x' * 1000)\n```").await.unwrap();
        assert_eq!(reply.len(), 1);
        assert!(reply.messages()[0].chars().count() < MIN_MESSAGE_LIMIT);
        assert!(reply.messages()[0].ends_with("characters)\n"));
    }

    #[tokio::test]
    async fn test_long_tag_rejection_stays_under_limit() {
        let (service, executor) = service(FakeExecutor::returning(""), RunSettings::default());

        let message = format!("```{}\nprint(1)\n```", "z".repeat(1900));
        let reply = service.handle(&message).await.unwrap();
        assert_eq!(reply.len(), 1);
        assert!(reply.messages()[0].chars().count() <= 500);
        assert!(executor.calls().is_empty());
    }

    #[tokio::test]
    async fn test_handle_prepared_runs_the_given_request() {
        let (service, executor) = service(FakeExecutor::returning("2\n"), RunSettings::default());

        let request = service.prepare("```py\nprint(1 + 1)\n```").unwrap().unwrap();
        let reply = service.handle_prepared(Ok(request)).await;
        assert_eq!(reply.messages(), &["```\n2\n\n```".to_string()]);
        assert_eq!(executor.calls().len(), 1);

        let reply = service.handle_prepared(Err(RequestError::EmptyCode)).await;
        assert_eq!(
            reply.messages(),
            &["Invalid input: do you have any code?".to_string()]
        );
        assert_eq!(executor.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_handle_backend_failure() {
        let (service, _) = service(
            FakeExecutor::failing(ExecutionError::Timeout),
            RunSettings::default(),
        );

        let reply = service.handle("```sh\nsleep 100\n```").await.unwrap();
        assert_eq!(
            reply.messages(),
            &["Encountered Error:\n```\nexecution timed out\n```\n".to_string()]
        );
    }

    #[tokio::test]
    async fn test_handle_rejection_skips_backend() {
        let (service, executor) = service(FakeExecutor::returning("x"), RunSettings::default());

        let reply = service.handle("```ruby\nputs 1\n```").await.unwrap();
        assert_eq!(reply.len(), 1);
        assert!(reply.messages()[0].starts_with("Invalid input: language 'ruby' is not supported"));
        assert!(reply.messages()[0].contains("Supported languages: python, bash"));

        assert!(service.handle("just chatting").await.is_none());
        assert!(executor.calls().is_empty());
    }

    #[tokio::test]
    async fn test_handle_empty_output() {
        let (service, _) = service(FakeExecutor::returning(""), RunSettings::default());
        let reply = service.handle("```python\npass\n```").await.unwrap();
        assert_eq!(reply.messages(), &["```\n\n```".to_string()]);
    }

    #[tokio::test]
    async fn test_handle_through_trait_object() {
        let executor: Arc<dyn CodeExecutor> = Arc::new(FakeExecutor::returning("ok"));
        let service = RunService::new(registry(), executor, RunSettings::default()).unwrap();
        let reply = service.handle("```py\nprint('ok')\n```").await.unwrap();
        assert_eq!(reply.messages(), &["```\nok\n```".to_string()]);
    }
}
