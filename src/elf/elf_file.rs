//! An ELF file along with its sections and segments.
use super::{
    AbiTag, BuildId, ElfHeader, GnuNoteType, Note, NoteType, Notes, Offset, ProgramHeader,
    Reader, Region, Section, SectionHeader, SectionType, SegmentType, StringIndex, Stream,
    decode_notes,
};
use crate::utils;
use memmap2::Mmap;
use rangemap::RangeMap;
use std::error::Error;
use std::fs::File;
use std::path::PathBuf;

/// Identifies a section or segment within an ElfFile.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RegionId {
    Section(usize),
    Segment(usize),
}

pub struct ElfFile {
    pub header: ElfHeader,
    pub path: PathBuf,
    pub reader: Reader,
    pub sections: Vec<Section>, // usually empty for core files
    pub segments: Vec<ProgramHeader>,
    regions: RangeMap<u64, RegionId>,
}

impl ElfFile {
    pub fn new(path: PathBuf) -> Result<Self, Box<dyn Error>> {
        let file = File::open(&path)?;

        // This is unsafe because it has undefined behavior if the underlying file is
        // modified while the memory map is in use.
        let bytes = unsafe { Mmap::map(&file) }?;
        ElfFile::from_mmap(path, bytes)
    }

    pub fn from_mmap(path: PathBuf, bytes: Mmap) -> Result<Self, Box<dyn Error>> {
        let reader = Reader::new(bytes)?;
        let header = ElfHeader::new(&reader)?;
        let segments = ElfFile::load_segments(&reader, &header);
        let sections = ElfFile::load_sections(&reader, &header);
        let regions = ElfFile::load_regions(&sections, &segments);
        Ok(ElfFile {
            header,
            path,
            reader,
            sections,
            segments,
            regions,
        })
    }

    pub fn is_core(&self) -> bool {
        self.header.is_core()
    }

    /// Decodes the notes in every note section followed by the notes in every note
    /// segment, each paired with the region it came from. Note that in exes the note
    /// segments typically overlap the note sections so the same note can appear twice.
    pub fn find_notes(&self) -> Vec<(RegionId, Notes<'_>)> {
        let mut result = Vec::new();
        for (i, section) in self.sections.iter().enumerate() {
            if section.header.stype == SectionType::Note {
                let notes = decode_notes(&self.reader, section, section.header.align);
                result.push((RegionId::Section(i), notes));
            }
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if segment.stype == SegmentType::Note {
                let notes = decode_notes(&self.reader, segment, segment.align);
                result.push((RegionId::Segment(i), notes));
            }
        }
        result
    }

    /// Returns the first note with the given type.
    pub fn find_note(&self, ntype: NoteType) -> Option<Note> {
        self.find_notes()
            .iter()
            .flat_map(|(_, notes)| notes.iter())
            .find(|note| NoteType::of(note) == ntype)
            .cloned()
    }

    /// Go binaries built with the gcc toolchain have both a GNU and a Go build id, the
    /// GNU one is preferred.
    pub fn find_build_id(&self) -> Option<BuildId> {
        self.find_note(NoteType::Gnu(GnuNoteType::BuildId))
            .or_else(|| self.find_note(NoteType::GoBuildId))
            .and_then(|note| BuildId::from_note(&note))
    }

    pub fn find_abi_tag(&self) -> Option<AbiTag> {
        self.find_note(NoteType::Gnu(GnuNoteType::AbiTag))
            .and_then(|note| AbiTag::from_note(&note, self.reader.little_endian))
    }

    /// Returns the section or, if there isn't one, the segment holding the byte at
    /// offset.
    pub fn find_region(&self, offset: Offset) -> Option<RegionId> {
        self.regions.get(&offset.0).copied()
    }

    pub fn region(&self, id: RegionId) -> Option<&dyn Region> {
        match id {
            RegionId::Section(i) => self.sections.get(i).map(|s| s as &dyn Region),
            RegionId::Segment(i) => self.segments.get(i).map(|s| s as &dyn Region),
        }
    }

    pub fn region_label(&self, id: RegionId) -> String {
        match id {
            RegionId::Section(i) => match self.sections.get(i) {
                Some(s) if !s.name.is_empty() => format!("section {i} ({})", s.name),
                _ => format!("section {i}"),
            },
            RegionId::Segment(i) => match self.segments.get(i) {
                Some(s) => format!("segment {i} ({:?})", s.stype),
                None => format!("segment {i}"),
            },
        }
    }
}

impl ElfFile {
    fn read_table_string(
        reader: &Reader,
        table: &SectionHeader,
        str_index: StringIndex,
    ) -> Option<String> {
        if str_index.0 as u64 >= table.obytes.size {
            utils::warn(&format!("string index {} is out of bounds", str_index.0));
            return None;
        }
        let offset = table.obytes.start.0 + str_index.0 as u64;
        match Stream::new(reader, offset as usize).read_string() {
            Ok(s) => Some(s),
            Err(err) => {
                utils::warn(&format!("failed to read string {}: {err}", str_index.0));
                None
            }
        }
    }

    fn load_segments(reader: &Reader, header: &ElfHeader) -> Vec<ProgramHeader> {
        let mut segments = Vec::new();
        let mut offset = header.ph_offset as usize;

        // Note that files can sometimes be damaged (typically because they are
        // truncated) so we'll keep going if a header can't be read.
        for _ in 0..header.num_ph_entries {
            match ProgramHeader::new(reader, offset) {
                Ok(ph) => segments.push(ph),
                Err(err) => {
                    utils::warn(&format!("failed to read program header at {offset:x}: {err}"))
                }
            }
            offset += header.ph_entry_size as usize;
        }
        segments
    }

    fn load_sections(reader: &Reader, header: &ElfHeader) -> Vec<Section> {
        let mut headers = Vec::new();
        let mut offset = header.section_offset as usize;

        for _ in 0..header.num_section_entries {
            match SectionHeader::new(reader, offset) {
                Ok(h) => headers.push(h),
                Err(err) => {
                    utils::warn(&format!("failed to read section header at {offset:x}: {err}"))
                }
            }
            offset += header.section_entry_size as usize;
        }

        let names = headers.get(header.string_table_index as usize).cloned();
        headers
            .into_iter()
            .map(|h| {
                let name = match &names {
                    Some(table) if h.name.0 != 0 => {
                        ElfFile::read_table_string(reader, table, h.name).unwrap_or_default()
                    }
                    _ => String::new(),
                };
                Section { header: h, name }
            })
            .collect()
    }

    // Segments go in first so that the (smaller) sections within them win.
    fn load_regions(sections: &[Section], segments: &[ProgramHeader]) -> RangeMap<u64, RegionId> {
        let mut regions = RangeMap::new();
        for (i, segment) in segments.iter().enumerate() {
            let start = segment.offset;
            let end = start.saturating_add(segment.file_size);
            if end > start {
                regions.insert(start..end, RegionId::Segment(i));
            }
        }
        for (i, section) in sections.iter().enumerate() {
            let start = section.header.obytes.start.0;
            let end = start.saturating_add(section.size_in_file());
            if end > start {
                regions.insert(start..end, RegionId::Section(i));
            }
        }
        regions
    }
}
