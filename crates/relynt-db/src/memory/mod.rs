//! In-memory repository implementations

mod store;

pub use store::MemoryStore;
