//! # askdb LLM SDK
//!
//! A thin client for the Google Gemini `generateContent` API, plus a
//! provider-neutral [`LlmClient`] trait so callers (and tests) can swap
//! the hosted model out.
//!
//! ## Example
//!
//! ```rust,no_run
//! use askdb_llm_sdk::gemini::GeminiClient;
//! use askdb_llm_sdk::models::gemini::GEMINI_2_5_PRO;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GeminiClient::new("your-api-key")?;
//!     let response = client
//!         .message_builder()
//!         .model(GEMINI_2_5_PRO)
//!         .user_message("How many moons does Mars have?")
//!         .send()
//!         .await?;
//!
//!     println!("{}", response.text().unwrap_or_default());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod gemini;
pub mod models;
pub mod types;

pub use client::LlmClient;
pub use error::LlmError;
pub use types::{CompletionRequest, CompletionResponse, Usage};
