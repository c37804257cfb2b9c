//! Generation request value objects.
//!
//! [`GenerationParams`] are the sampling settings sent with every prompt and
//! [`ChatRequest`] is the JSON body posted to the streaming endpoint.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Longest prompt the server accepts, in characters.
pub const MAX_PROMPT_CHARS: usize = 4096;

/// Largest `max_tokens` the server accepts.
pub const MAX_TOKENS_LIMIT: u32 = 1024;

/// Sampling parameters for one generation (Value Object)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Nucleus sampling threshold
    pub top_p: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 512,
            temperature: 0.7,
            top_p: 0.9,
        }
    }
}

impl GenerationParams {
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = top_p;
        self
    }

    /// Check the parameters against the ranges the server accepts.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(1..=MAX_TOKENS_LIMIT).contains(&self.max_tokens) {
            return Err(DomainError::InvalidParams(format!(
                "max_tokens must be between 1 and {}, got {}",
                MAX_TOKENS_LIMIT, self.max_tokens
            )));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(DomainError::InvalidParams(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(DomainError::InvalidParams(format!(
                "top_p must be between 0.0 and 1.0, got {}",
                self.top_p
            )));
        }
        Ok(())
    }
}

/// Body of a streaming chat request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl ChatRequest {
    /// Build a request from a prompt, trimming it and enforcing length limits.
    pub fn new(prompt: &str, params: GenerationParams) -> Result<Self, DomainError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(DomainError::InvalidPrompt("prompt is empty".to_string()));
        }
        let chars = prompt.chars().count();
        if chars > MAX_PROMPT_CHARS {
            return Err(DomainError::InvalidPrompt(format!(
                "prompt is {} characters, limit is {}",
                chars, MAX_PROMPT_CHARS
            )));
        }
        params.validate()?;

        Ok(Self {
            prompt: prompt.to_string(),
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            top_p: params.top_p,
        })
    }
}

/// Summary the server attaches to its `done` event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenerationStats {
    pub token_count: u64,
    pub generation_time: f64,
}

impl GenerationStats {
    /// Parse the `data:` payload of a `done` event. Returns `None` if malformed.
    pub fn parse(data: &str) -> Option<Self> {
        serde_json::from_str(data).ok()
    }
}
