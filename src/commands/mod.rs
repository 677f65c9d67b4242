//! Handlers for the commands users type, e.g. `elf notes`.
pub mod elf;
pub mod info;
pub mod misc;
pub mod tables;

#[cfg(test)]
pub mod testing;

pub use elf::*;
pub use info::*;
pub use misc::*;
