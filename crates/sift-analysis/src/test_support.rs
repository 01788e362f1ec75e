use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use sift_core::llm::{CompletionProvider, CompletionRequest, CompletionResponse, ProviderError};
use sift_core::model::Signal;

/// Scripted completion provider: replays queued responses in order and
/// records every prompt it was asked to complete.
pub struct MockProvider {
    responses: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<CompletionRequest>>,
    calls: AtomicUsize,
}

impl MockProvider {
    pub fn replying(responses: &[&str]) -> Self {
        Self::scripted(responses.iter().map(|r| Ok(r.to_string())).collect())
    }

    /// Fails every call with a transport error.
    pub fn failing() -> Self {
        Self::scripted(VecDeque::new())
    }

    fn scripted(responses: VecDeque<Result<String, String>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request);
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(content)) => Ok(CompletionResponse::new(content)),
            Some(Err(e)) => Err(ProviderError::Transport(e)),
            None => Err(ProviderError::Transport("connection refused".into())),
        }
    }
}

pub fn signal(title: &str, path: &str, confidence: f64) -> Signal {
    Signal {
        title: title.into(),
        kind: "todo".into(),
        source: "todos".into(),
        file_path: path.into(),
        confidence,
        ..Default::default()
    }
}
