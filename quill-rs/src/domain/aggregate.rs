//! Aggregate root marker. The name is what `NotFound` errors report.

/// Aggregate root: a persisted domain object with its own identity.
pub trait AggregateRoot: Clone + Send + Sync + 'static {
    /// Human-readable entity name, e.g. "Blog post".
    fn name() -> &'static str;
}
