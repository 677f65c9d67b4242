//! Helpers for running commands against in-memory ELF images.
use crate::elf::ElfFile;
use crate::elf::testing::{ImageBuilder, PT_LOAD, PT_NOTE, SHT_NOBITS, SHT_PROGBITS, map_bytes};
use crate::utils::strip_escapes;
use std::path::PathBuf;

pub const BUILD_ID: [u8; 20] = [
    0x3b, 0x2f, 0x1e, 0x11, 0x00, 0x42, 0x99, 0xa0, 0xc4, 0x5d, 0x6e, 0x7f, 0x80, 0x91, 0xa2,
    0xb3, 0xc4, 0xd5, 0xe6, 0xf7,
];

pub fn load(bytes: &[u8]) -> ElfFile {
    ElfFile::from_mmap(PathBuf::from("test"), map_bytes(bytes)).unwrap()
}

/// A little endian x86-64 exe with ABI tag and build id note sections, a note segment
/// covering both, and a load segment covering everything.
pub fn exe_file() -> ElfFile {
    let mut abi = Vec::new();
    for word in [0u32, 3, 2, 0] {
        abi.extend(word.to_le_bytes());
    }
    let bytes = ImageBuilder::exe()
        .note_section(".note.ABI-tag", &[("GNU", 1, &abi[..])])
        .note_section(".note.gnu.build-id", &[("GNU", 3, &BUILD_ID[..])])
        .section(".text", SHT_PROGBITS, vec![0x90; 32])
        .section(".bss", SHT_NOBITS, vec![0; 64])
        .segment(PT_NOTE, 0..2)
        .segment(PT_LOAD, 0..3)
        .build();
    load(&bytes)
}

/// Runs a command and returns what it printed without styling. Runs of whitespace are
/// collapsed so that tests don't depend upon column widths.
pub fn capture(command: impl FnOnce(&mut Vec<u8>)) -> String {
    let mut out = Vec::new();
    command(&mut out);
    let text = strip_escapes(&String::from_utf8(out).unwrap());
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}
