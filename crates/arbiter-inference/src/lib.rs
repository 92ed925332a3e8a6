//! # arbiter-inference
//!
//! Uniform access to external NLI backends.
//!
//! - [`InferenceAdapter`] wraps any [`IInferenceBackend`](arbiter_core::traits::IInferenceBackend)
//!   with a per-call timeout, response validation, and a classification cache.
//! - [`HttpInferenceBackend`] talks JSON over HTTP to a hosted classifier.
//!
//! Failures always surface as `InferenceError`; nothing here substitutes a
//! default classification.

pub mod adapter;
pub mod cache;
pub mod http;

pub use adapter::InferenceAdapter;
pub use cache::ClassificationCache;
pub use http::HttpInferenceBackend;
