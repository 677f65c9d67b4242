//! The ELF header at the very start of the file.
use super::{Reader, Stream};
use std::error::Error;

const ET_REL: u16 = 1;
const ET_EXEC: u16 = 2;
const ET_DYN: u16 = 3;
const ET_CORE: u16 = 4;

pub struct ElfHeader {
    /// Relocatable, executable, shared object, or core.
    pub etype: u16,

    /// Raw e_machine value, see machine().
    pub emachine: u16,

    /// Raw EI_OSABI value, see abi().
    pub osabi: u8,

    /// Zero for Linux.
    pub abiversion: u8,

    /// Virtual address of the entry point, zero if there isn't one.
    pub entry: u64,

    pub flags: u32,

    /// Offset to the Program Header table.
    pub ph_offset: u64,
    pub ph_entry_size: u16,
    pub num_ph_entries: u16,

    /// Offset to the section header table.
    pub section_offset: u64,
    pub section_entry_size: u16,
    pub num_section_entries: u16,

    /// Index of the section containing section names.
    pub string_table_index: u16,
}

impl ElfHeader {
    pub fn new(reader: &Reader) -> Result<Self, Box<dyn Error>> {
        // Reader::new has already checked e_ident so start after it. The only layout
        // difference between 32-bit and 64-bit is handled by read_addr/read_offset.
        let osabi = reader.read_byte(0x07)?;
        let abiversion = reader.read_byte(0x08)?;

        let mut s = Stream::new(reader, 0x10);
        let etype = s.read_half()?;
        let emachine = s.read_half()?;
        let _version = s.read_word()?;
        let entry = s.read_addr()?;
        let ph_offset = s.read_offset()?;
        let section_offset = s.read_offset()?;
        let flags = s.read_word()?;
        let _header_size = s.read_half()?;
        let ph_entry_size = s.read_half()?;
        let num_ph_entries = s.read_half()?;
        let section_entry_size = s.read_half()?;
        let num_section_entries = s.read_half()?;
        let string_table_index = s.read_half()?;

        Ok(ElfHeader {
            etype,
            emachine,
            osabi,
            abiversion,
            entry,
            flags,
            ph_offset,
            ph_entry_size,
            num_ph_entries,
            section_offset,
            section_entry_size,
            num_section_entries,
            string_table_index,
        })
    }

    pub fn is_core(&self) -> bool {
        self.etype == ET_CORE
    }

    pub fn stype(&self) -> &'static str {
        match self.etype {
            ET_REL => "relocatable",
            ET_EXEC => "executable",
            ET_DYN => "shared object",
            ET_CORE => "core",
            _ => "unknown",
        }
    }

    pub fn machine(&self) -> &'static str {
        match self.emachine {
            // see https://llvm.org/doxygen/BinaryFormat_2ELF_8h_source.html
            0x03 => "x86",
            0x08 => "MIPS",
            0x14 => "PowerPC",
            0x15 => "PowerPC 64",
            0x16 => "S390",
            0x28 => "ARM",
            0x2b => "SPARC v9",
            0x32 => "IA-64",
            0x3e => "x86-64",
            0xb7 => "AArch64",
            0xf3 => "RISC-V",
            0xf7 => "BPF",
            0x102 => "LoongArch",
            _ => "unknown machine",
        }
    }

    pub fn abi(&self) -> &'static str {
        match self.osabi {
            0x00 => "System V",
            0x01 => "HP-UX",
            0x02 => "NetBSD",
            0x03 => "Linux",
            0x04 => "GNU Hurd",
            0x06 => "Solaris",
            0x07 => "AIX",
            0x08 => "IRIX",
            0x09 => "FreeBSD",
            0x0c => "OpenBSD",
            _ => "unknown ABI",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elf::testing::{ImageBuilder, PT_NOTE, map_bytes};

    #[test]
    fn exe_header() {
        let bytes = ImageBuilder::exe()
            .note_section(".note.a", &[])
            .segment(PT_NOTE, 0..1)
            .build();
        let reader = Reader::new(map_bytes(&bytes)).unwrap();
        let header = ElfHeader::new(&reader).unwrap();
        let s = format!(
            "{} {} on {}, {} sections",
            header.stype(),
            header.machine(),
            header.abi(),
            header.num_section_entries
        );
        insta::assert_snapshot!(s, @"executable x86-64 on System V, 3 sections");
        assert!(!header.is_core());
        assert_eq!(header.ph_offset, 0x40);
        assert_eq!(header.ph_entry_size, 56);
        assert_eq!(header.section_entry_size, 64);
    }

    #[test]
    fn core_header() {
        let bytes = ImageBuilder::core().build();
        let reader = Reader::new(map_bytes(&bytes)).unwrap();
        let header = ElfHeader::new(&reader).unwrap();
        assert!(header.is_core());
        assert_eq!(header.stype(), "core");
        assert_eq!(header.num_section_entries, 0);
    }
}
