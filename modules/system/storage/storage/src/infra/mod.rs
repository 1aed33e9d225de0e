pub mod memory;

pub use memory::InMemoryStorageClient;
