//! Storage backends for the session and summary collections.

pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use traits::{CollectionStore, Records};
