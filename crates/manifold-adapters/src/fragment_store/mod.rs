//! Fragment store adapters.

mod memory;

pub use memory::InMemoryFragmentStore;
