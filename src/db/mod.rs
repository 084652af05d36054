//! Storage layer (in-process).

pub mod memory;

pub use memory::MemoryDb;
