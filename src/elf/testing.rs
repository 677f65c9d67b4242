//! Builds small ELF images in memory so that tests don't need fixture files.
use memmap2::{Mmap, MmapMut};
use std::ops::Range;

pub const SHT_PROGBITS: u32 = 1;
pub const SHT_NOTE: u32 = 7;
pub const SHT_NOBITS: u32 = 8;
pub const PT_LOAD: u32 = 1;
pub const PT_NOTE: u32 = 4;

pub fn map_bytes(bytes: &[u8]) -> Mmap {
    let mut map = MmapMut::map_anon(bytes.len()).unwrap();
    map.copy_from_slice(bytes);
    map.make_read_only().unwrap()
}

struct TestSection {
    name: String,
    stype: u32,
    align: u64,
    data: Vec<u8>,
}

enum Contents {
    Sections(Range<usize>),
    Data(Vec<u8>),
}

struct TestSegment {
    ptype: u32,
    align: u64,
    contents: Contents,
}

struct Writer {
    bytes: Vec<u8>,
    little_endian: bool,
    sixty_four_bit: bool,
}

impl Writer {
    fn half(&mut self, value: u16) {
        if self.little_endian {
            self.bytes.extend(value.to_le_bytes());
        } else {
            self.bytes.extend(value.to_be_bytes());
        }
    }

    fn word(&mut self, value: u32) {
        if self.little_endian {
            self.bytes.extend(value.to_le_bytes());
        } else {
            self.bytes.extend(value.to_be_bytes());
        }
    }

    fn xword(&mut self, value: u64) {
        if self.little_endian {
            self.bytes.extend(value.to_le_bytes());
        } else {
            self.bytes.extend(value.to_be_bytes());
        }
    }

    fn addr(&mut self, value: u64) {
        if self.sixty_four_bit {
            self.xword(value);
        } else {
            self.word(value as u32);
        }
    }

    fn pad_to(&mut self, align: usize) {
        while self.bytes.len() % align != 0 {
            self.bytes.push(0);
        }
    }
}

pub struct ImageBuilder {
    etype: u16,
    little_endian: bool,
    sixty_four_bit: bool,
    sections: Vec<TestSection>,
    segments: Vec<TestSegment>,
}

impl ImageBuilder {
    pub fn exe() -> Self {
        ImageBuilder {
            etype: 2,
            little_endian: true,
            sixty_four_bit: true,
            sections: Vec::new(),
            segments: Vec::new(),
        }
    }

    pub fn core() -> Self {
        ImageBuilder {
            etype: 4,
            ..ImageBuilder::exe()
        }
    }

    pub fn big_endian(mut self) -> Self {
        self.little_endian = false;
        self
    }

    pub fn thirty_two_bit(mut self) -> Self {
        self.sixty_four_bit = false;
        self
    }

    /// Encode one note record the way a linker would, padding to 4 bytes.
    pub fn encode_note(&self, name: &str, ntype: u32, desc: &[u8]) -> Vec<u8> {
        let namesz = if name.is_empty() { 0 } else { name.len() + 1 };
        let mut w = Writer {
            bytes: Vec::new(),
            little_endian: self.little_endian,
            sixty_four_bit: self.sixty_four_bit,
        };
        w.word(namesz as u32);
        w.word(desc.len() as u32);
        w.word(ntype);
        if namesz > 0 {
            w.bytes.extend(name.as_bytes());
            w.bytes.push(0);
        }
        w.pad_to(4);
        w.bytes.extend(desc);
        w.pad_to(4);
        w.bytes
    }

    fn encode_notes(&self, notes: &[(&str, u32, &[u8])]) -> Vec<u8> {
        notes
            .iter()
            .flat_map(|(name, ntype, desc)| self.encode_note(name, *ntype, desc))
            .collect()
    }

    pub fn note_section(self, name: &str, notes: &[(&str, u32, &[u8])]) -> Self {
        let data = self.encode_notes(notes);
        self.section(name, SHT_NOTE, data)
    }

    pub fn section(mut self, name: &str, stype: u32, data: Vec<u8>) -> Self {
        self.sections.push(TestSection {
            name: name.to_string(),
            stype,
            align: 4,
            data,
        });
        self
    }

    /// A segment covering the data of sections (indexes don't include the null section).
    pub fn segment(mut self, ptype: u32, sections: Range<usize>) -> Self {
        self.segments.push(TestSegment {
            ptype,
            align: 4,
            contents: Contents::Sections(sections),
        });
        self
    }

    /// A note segment that doesn't correspond to any section, as in core files.
    pub fn note_segment(mut self, notes: &[(&str, u32, &[u8])]) -> Self {
        let data = self.encode_notes(notes);
        self.segments.push(TestSegment {
            ptype: PT_NOTE,
            align: 4,
            contents: Contents::Data(data),
        });
        self
    }

    pub fn raw_note_segment(mut self, data: Vec<u8>) -> Self {
        self.segments.push(TestSegment {
            ptype: PT_NOTE,
            align: 4,
            contents: Contents::Data(data),
        });
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let (ehdr_size, phent_size, shent_size) = if self.sixty_four_bit {
            (64, 56, 64)
        } else {
            (52, 32, 40)
        };
        let ph_offset = ehdr_size;

        // Lay out section data, then segment-only data, then the string table.
        let mut offset = ph_offset + phent_size * self.segments.len();
        let mut section_offsets = Vec::new();
        for section in self.sections.iter() {
            offset = (offset + 3) & !3;
            section_offsets.push(offset);
            if section.stype != SHT_NOBITS {
                offset += section.data.len();
            }
        }
        let mut segment_ranges = Vec::new();
        for segment in self.segments.iter() {
            let range = match &segment.contents {
                Contents::Sections(r) if r.is_empty() => offset..offset,
                Contents::Sections(r) => {
                    let last = &self.sections[r.end - 1];
                    let last_size = if last.stype == SHT_NOBITS {
                        0
                    } else {
                        last.data.len()
                    };
                    section_offsets[r.start]..section_offsets[r.end - 1] + last_size
                }
                Contents::Data(data) => {
                    offset = (offset + 3) & !3;
                    let start = offset;
                    offset += data.len();
                    start..offset
                }
            };
            segment_ranges.push(range);
        }

        let mut strings = vec![0u8];
        let mut name_indexes = Vec::new();
        for section in self.sections.iter() {
            name_indexes.push(strings.len());
            strings.extend(section.name.as_bytes());
            strings.push(0);
        }
        let shstrtab_name = strings.len();
        strings.extend(b".shstrtab\0");
        let strings_offset = offset;
        offset += strings.len();

        let num_sections = if self.sections.is_empty() {
            0
        } else {
            self.sections.len() + 2
        };
        let section_offset = if num_sections == 0 {
            0
        } else {
            (offset + 7) & !7
        };

        let mut w = Writer {
            bytes: Vec::new(),
            little_endian: self.little_endian,
            sixty_four_bit: self.sixty_four_bit,
        };

        // e_ident
        w.bytes.extend([0x7f, b'E', b'L', b'F']);
        w.bytes.push(if self.sixty_four_bit { 2 } else { 1 });
        w.bytes.push(if self.little_endian { 1 } else { 2 });
        w.bytes.push(1);
        w.bytes.resize(16, 0);

        w.half(self.etype);
        w.half(if self.sixty_four_bit { 0x3e } else { 0x03 });
        w.word(1);
        w.addr(0);
        w.addr(if self.segments.is_empty() { 0 } else { ph_offset as u64 });
        w.addr(section_offset as u64);
        w.word(0);
        w.half(ehdr_size as u16);
        w.half(phent_size as u16);
        w.half(self.segments.len() as u16);
        w.half(shent_size as u16);
        w.half(num_sections as u16);
        w.half(if num_sections == 0 { 0 } else { num_sections as u16 - 1 });
        assert_eq!(w.bytes.len(), ehdr_size);

        for (segment, range) in self.segments.iter().zip(segment_ranges.iter()) {
            let size = (range.end - range.start) as u64;
            let vaddr = 0x400000 + range.start as u64;
            if self.sixty_four_bit {
                w.word(segment.ptype);
                w.word(0x4);
                w.xword(range.start as u64);
                w.xword(vaddr);
                w.xword(vaddr);
                w.xword(size);
                w.xword(size);
                w.xword(segment.align);
            } else {
                w.word(segment.ptype);
                w.word(range.start as u32);
                w.word(vaddr as u32);
                w.word(vaddr as u32);
                w.word(size as u32);
                w.word(size as u32);
                w.word(0x4);
                w.word(segment.align as u32);
            }
        }

        for (section, offset) in self.sections.iter().zip(section_offsets.iter()) {
            w.bytes.resize(*offset, 0);
            if section.stype != SHT_NOBITS {
                w.bytes.extend(&section.data);
            }
        }
        for (segment, range) in self.segments.iter().zip(segment_ranges.iter()) {
            if let Contents::Data(data) = &segment.contents {
                w.bytes.resize(range.start, 0);
                w.bytes.extend(data);
            }
        }
        w.bytes.resize(strings_offset, 0);
        w.bytes.extend(&strings);

        if num_sections > 0 {
            w.bytes.resize(section_offset, 0);
            let write_header = |w: &mut Writer,
                                name: usize,
                                stype: u32,
                                flags: u64,
                                offset: usize,
                                size: usize,
                                align: u64| {
                w.word(name as u32);
                w.word(stype);
                if w.sixty_four_bit {
                    w.xword(flags);
                } else {
                    w.word(flags as u32);
                }
                w.addr(0);
                w.addr(offset as u64);
                if w.sixty_four_bit {
                    w.xword(size as u64);
                } else {
                    w.word(size as u32);
                }
                w.word(0); // link
                w.word(0); // info
                if w.sixty_four_bit {
                    w.xword(align);
                    w.xword(0);
                } else {
                    w.word(align as u32);
                    w.word(0);
                }
            };

            write_header(&mut w, 0, 0, 0, 0, 0, 0);
            for (i, section) in self.sections.iter().enumerate() {
                write_header(
                    &mut w,
                    name_indexes[i],
                    section.stype,
                    0x2, // ALLOC
                    section_offsets[i],
                    section.data.len(),
                    section.align,
                );
            }
            write_header(
                &mut w,
                shstrtab_name,
                3,
                0,
                strings_offset,
                strings.len(),
                1,
            );
        }

        // Reader insists on a minimum size.
        if w.bytes.len() < 0x40 {
            w.bytes.resize(0x40, 0);
        }
        w.bytes
    }
}
