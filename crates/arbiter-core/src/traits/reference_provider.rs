use crate::models::ReferenceFact;

/// Domain-rule provider of reference values, keyed by measurement category.
pub trait IReferenceFactProvider: Send + Sync {
    /// Facts that apply to `category`; empty when the category is unknown.
    fn facts_for(&self, category: &str) -> Vec<ReferenceFact>;
}
