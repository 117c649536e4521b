/// Gemini HTTP client module.
///
/// This module provides a blocking HTTP client for the Gemini text-generation and
/// embedding endpoints, with typed errors and builder-based configuration.
mod client;

pub use client::{GeminiClient, GeminiClientBuilder, GeminiClientTrait, GeminiError};
