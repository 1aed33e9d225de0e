pub mod memory;

pub use memory::InMemorySecurityStore;
