//! Sink implementations
//!
//! Contains DirectorySink and MemorySink.

mod directory;
mod memory;

pub use self::directory::{DirectorySink, SinkFile};
pub use self::memory::{MemoryHandle, MemorySink};
