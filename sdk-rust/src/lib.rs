mod client_utils;
mod errors;
mod language_model;
pub mod llm_sdk_test;
pub mod openai;
mod opentelemetry;
mod types;
mod types_ext;

pub use errors::*;
pub use language_model::LanguageModel;
pub use reqwest::StatusCode;
pub use types::*;
