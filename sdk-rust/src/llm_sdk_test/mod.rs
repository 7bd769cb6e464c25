//! Test doubles for code built on top of [`LanguageModel`](crate::LanguageModel).

mod model;

pub use model::{MockGenerateResult, MockLanguageModel};
