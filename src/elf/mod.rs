//! Generic ELF file support for exes, shared objects, and core files. The focus is on
//! notes, see notes.rs.
//! Quick ELF reference: https://gist.github.com/x0nu11byt3/bcb35c3de461e5fb66173071a2379779
//!
//! ELF files start with an ELF header which includes:
//! * A magic number to identify the file as an ELF file.
//! * The architecture, e.g. Linux AMD x86-64.
//! * The offset to and number of program headers.
//! * The offset to and number of section headers.
//!
//! Program headers identify segments. Segments are used by the OS to load an exe into
//! memory. Note segments (PT_NOTE) hold notes, e.g. in core files process and signal
//! info. Segments have no names.
//!
//! Section headers identify sections. Sections are used for static linking and don't
//! appear in core files. Note sections (SHT_NOTE) hold notes like the build id and are
//! usually also covered by a note segment.
pub mod decoder;
pub mod elf_file;
pub mod header;
pub mod io;
pub mod note_types;
pub mod notes;
pub mod primitives;
pub mod region;
pub mod sections;
pub mod segments;

#[cfg(test)]
pub mod testing;

pub use decoder::*;
pub use elf_file::*;
pub use header::*;
pub use io::*;
pub use note_types::*;
pub use notes::*;
pub use primitives::*;
pub use region::*;
pub use sections::*;
pub use segments::*;
