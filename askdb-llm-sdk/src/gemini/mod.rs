//! Google Gemini API client and wire types

pub mod builder;
pub mod client;
pub mod model;
pub mod types;

pub use builder::MessageBuilder;
pub use client::GeminiClient;
pub use model::GeminiModel;
pub use types::*;
