//! Infrastructure: repository and transaction implementations.

pub mod in_memory;

pub use in_memory::InMemoryStore;
