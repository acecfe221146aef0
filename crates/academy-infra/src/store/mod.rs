//! Document store backends.

mod memory;
#[cfg(feature = "rest-store")]
mod rest;

pub use memory::InMemoryDocumentStore;
#[cfg(feature = "rest-store")]
pub use rest::{RestDocumentStore, RestStoreConfig};
