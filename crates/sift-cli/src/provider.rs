use std::process::Stdio;

use async_trait::async_trait;
use sift_core::config::AnalysisConfig;
use sift_core::llm::{CompletionProvider, CompletionRequest, CompletionResponse, ProviderError};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Provider that never answers. Every analysis step takes its fallback.
pub struct NoProvider;

#[async_trait]
impl CompletionProvider for NoProvider {
    async fn complete(
        &self,
        _request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        Err(ProviderError::Transport("no LLM provider configured".into()))
    }
}

/// Provider that pipes each request into an external command (for example
/// `claude -p`) and treats its stdout as the completion.
///
/// The system instruction and prompt are written to stdin separated by a
/// blank line. Model, token cap and temperature are exposed to the command
/// as `SIFT_MODEL`, `SIFT_MAX_TOKENS` and `SIFT_TEMPERATURE`.
pub struct CommandProvider {
    argv: Vec<String>,
}

impl CommandProvider {
    pub fn new(argv: Vec<String>) -> Result<Self, ProviderError> {
        if argv.is_empty() {
            return Err(ProviderError::Transport("empty LLM command".into()));
        }
        Ok(Self { argv })
    }
}

/// Split a command line into argv on whitespace. No shell quoting is interpreted.
pub fn split_command_line(line: &str) -> Vec<String> {
    line.split_whitespace().map(String::from).collect()
}

#[async_trait]
impl CompletionProvider for CommandProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let mut cmd = Command::new(&self.argv[0]);
        cmd.args(&self.argv[1..])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(model) = &request.model {
            cmd.env("SIFT_MODEL", model);
        }
        if let Some(max_tokens) = request.max_tokens {
            cmd.env("SIFT_MAX_TOKENS", max_tokens.to_string());
        }
        if let Some(temperature) = request.temperature {
            cmd.env("SIFT_TEMPERATURE", temperature.to_string());
        }

        let mut input = String::new();
        if let Some(system) = &request.system {
            input.push_str(system);
            input.push_str("\n\n");
        }
        input.push_str(&request.prompt);

        let mut child = cmd.spawn()?;
        let stdin = child.stdin.take();
        let feed = async move {
            let Some(mut stdin) = stdin else {
                return Ok(());
            };
            match stdin.write_all(input.as_bytes()).await {
                // The command may exit without reading; its status decides.
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
                other => other,
            }
        };
        let ((), output) = tokio::try_join!(feed, child.wait_with_output())?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProviderError::Transport(format!(
                "{} exited with {}: {}",
                self.argv[0],
                output.status,
                stderr.trim()
            )));
        }
        tracing::debug!("{} returned {} bytes", self.argv[0], output.stdout.len());
        Ok(CompletionResponse::new(
            String::from_utf8_lossy(&output.stdout).into_owned(),
        ))
    }
}

/// Fills per-run defaults from the config into every request.
pub struct ConfiguredProvider {
    inner: Box<dyn CompletionProvider>,
    model: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

impl ConfiguredProvider {
    pub fn new(inner: Box<dyn CompletionProvider>, config: &AnalysisConfig) -> Self {
        Self {
            inner,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

#[async_trait]
impl CompletionProvider for ConfiguredProvider {
    async fn complete(
        &self,
        mut request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        if request.model.is_none() {
            request.model = self.model.clone();
        }
        if request.temperature.is_none() {
            request.temperature = self.temperature;
        }
        request.max_tokens = match (request.max_tokens, self.max_tokens) {
            (Some(req), Some(cap)) => Some(req.min(cap)),
            (req, cap) => req.or(cap),
        };
        self.inner.complete(request).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Option<CompletionRequest>>>);

    #[async_trait]
    impl CompletionProvider for Recorder {
        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, ProviderError> {
            *self.0.lock().unwrap() = Some(request);
            Ok(CompletionResponse::new("{}"))
        }
    }

    #[tokio::test]
    async fn test_no_provider_always_fails() {
        let err = NoProvider
            .complete(CompletionRequest::new("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Transport(_)));
    }

    #[test]
    fn test_command_line_must_not_be_empty() {
        assert_eq!(split_command_line("  claude   -p "), vec!["claude", "-p"]);
        assert!(CommandProvider::new(split_command_line("   ")).is_err());
        assert!(CommandProvider::new(split_command_line("claude -p")).is_ok());
    }

    #[tokio::test]
    async fn test_configured_provider_fills_defaults_and_caps_tokens() {
        let recorder = Recorder::default();
        let mut config = AnalysisConfig::default_init();
        config.model = Some("small-model".into());
        config.max_tokens = Some(1000);
        let provider = ConfiguredProvider::new(Box::new(recorder.clone()), &config);

        provider
            .complete(CompletionRequest::new("p").with_max_tokens(4096))
            .await
            .unwrap();

        let seen = recorder.0.lock().unwrap().clone().unwrap();
        assert_eq!(seen.model.as_deref(), Some("small-model"));
        assert_eq!(seen.max_tokens, Some(1000));
        assert!(seen.temperature.is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_provider_round_trip() {
        let provider = CommandProvider::new(split_command_line("cat")).unwrap();
        let resp = provider
            .complete(CompletionRequest::new("hello").with_system("sys"))
            .await
            .unwrap();
        assert_eq!(resp.content, "sys\n\nhello");

        let failing = CommandProvider::new(split_command_line("false")).unwrap();
        assert!(failing.complete(CompletionRequest::new("x")).await.is_err());
    }
}
