pub mod memory;

pub use memory::MemFs;
