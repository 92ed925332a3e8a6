//! # arbiter-analysis
//!
//! The five contradiction dimensions and the reference-fact validator.
//!
//! Every analyzer takes the full source set and returns exactly one
//! [`DimensionResult`](arbiter_core::DimensionResult). Only the pairwise
//! dimension talks to an inference backend; the other four are pure
//! functions of the source texts.

pub mod dimensions;
pub mod lexicon;
pub mod progress;
pub mod reference;
pub mod text;

pub use progress::ScoreProgress;
pub use reference::{ReferenceValidator, StaticReferenceFacts};
