pub mod provider;
pub mod usage;

pub use provider::{
    complete_cancellable, CompletionProvider, CompletionRequest, CompletionResponse, ProviderError,
};
pub use usage::TokenUsage;
