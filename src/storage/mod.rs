pub mod memory;
pub mod trait_def;

pub use memory::MemoryStore;
pub use trait_def::{Storage, StorageError, StorageResult};
