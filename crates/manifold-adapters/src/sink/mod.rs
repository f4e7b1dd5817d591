//! Artifact sink adapters.

mod local;
mod memory;

pub use local::LocalSink;
pub use memory::MemorySink;
