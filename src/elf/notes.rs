//! Notes are small self-describing records, e.g. a build id, the ABI an exe targets,
//! or the registers of a cored process. They live in note sections and note segments
//! (often both, with the segment covering the sections). This module only holds
//! already decoded notes, see decoder for reading them and note_types for making
//! sense of them.
use super::{Offset, Region};

/// One note record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Note {
    name: String,
    ntype: u32,
    description: Vec<u8>,
}

impl Note {
    pub fn new(name: impl Into<String>, ntype: u32, description: Vec<u8>) -> Self {
        Note {
            name: name.into(),
            ntype,
            description,
        }
    }

    /// The owner of the note, e.g. "GNU" or "CORE".
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Meaning depends upon the name.
    pub fn ntype(&self) -> u32 {
        self.ntype
    }

    pub fn description(&self) -> &[u8] {
        &self.description
    }

    /// Notes without a name are reserved by the system and are used for things like
    /// padding out a note table.
    pub fn is_empty_note(&self) -> bool {
        self.name.is_empty()
    }
}

/// The notes stored within one section or segment, in the order they appear in the
/// file. Notes can be added but never removed. The region is borrowed so it's
/// guaranteed to outlive the notes.
#[derive(Clone)]
pub struct Notes<'a> {
    region: &'a dyn Region,
    entries: Vec<Note>,
}

impl<'a> Notes<'a> {
    pub fn new(region: &'a dyn Region) -> Self {
        Notes {
            region,
            entries: Vec::new(),
        }
    }

    pub fn add_note(&mut self, note: Note) {
        self.entries.push(note);
    }

    /// Like add_note but for callers that want to keep their note.
    pub fn add_note_ref(&mut self, note: &Note) {
        self.entries.push(note.clone());
    }

    /// Returns a copy of the notes so later additions won't affect the result.
    pub fn get_notes(&self) -> Vec<Note> {
        self.entries.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get_region_offset(&self) -> Offset {
        self.region.offset()
    }

    pub fn get_region_length(&self) -> u64 {
        self.region.size_in_file()
    }

    /// Empty if the notes are in a segment.
    pub fn get_section_name(&self) -> &str {
        self.region.name()
    }

    pub fn is_named_section(&self) -> bool {
        !self.region.name().is_empty()
    }
}

impl Extend<Note> for Notes<'_> {
    fn extend<T: IntoIterator<Item = Note>>(&mut self, iter: T) {
        self.entries.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct FakeRegion {
        name: &'static str,
        offset: Cell<u64>,
        size: u64,
    }

    impl FakeRegion {
        fn new(name: &'static str, offset: u64, size: u64) -> Self {
            FakeRegion {
                name,
                offset: Cell::new(offset),
                size,
            }
        }
    }

    impl Region for FakeRegion {
        fn offset(&self) -> Offset {
            Offset(self.offset.get())
        }

        fn size_in_file(&self) -> u64 {
            self.size
        }

        fn name(&self) -> &str {
            self.name
        }
    }

    fn abi_note() -> Note {
        Note::new("GNU", 1, vec![0, 0, 0, 0])
    }

    #[test]
    fn empty_note() {
        assert!(Note::new("", 0, Vec::new()).is_empty_note());
        assert!(Note::new("", 7, vec![1, 2]).is_empty_note());
        assert!(!abi_note().is_empty_note());
        assert!(!Note::new(" ", 0, Vec::new()).is_empty_note());
    }

    #[test]
    fn named_section() {
        let region = FakeRegion::new(".note.ABI-tag", 0x1c8, 0x20);
        let notes = Notes::new(&region);
        assert!(notes.is_empty());
        assert_eq!(notes.len(), 0);
        assert!(notes.get_notes().is_empty());
        assert!(notes.is_named_section());
        assert_eq!(notes.get_section_name(), ".note.ABI-tag");
        assert_eq!(notes.get_region_offset(), Offset(0x1c8));
        assert_eq!(notes.get_region_length(), 0x20);
    }

    #[test]
    fn unnamed_segment() {
        let region = FakeRegion::new("", 0x40, 0x60);
        let notes = Notes::new(&region);
        assert!(!notes.is_named_section());
        assert_eq!(notes.get_section_name(), "");
        assert_eq!(notes.get_region_offset(), Offset(0x40));
        assert_eq!(notes.get_region_length(), 0x60);
    }

    #[test]
    fn adding_notes() {
        let region = FakeRegion::new(".note.ABI-tag", 0x1c8, 0x20);
        let mut notes = Notes::new(&region);

        notes.add_note(abi_note());
        assert!(!notes.is_empty());
        let entries = notes.get_notes();
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].is_empty_note());

        let padding = Note::new("", 0, Vec::new());
        notes.add_note_ref(&padding);
        assert!(padding.is_empty_note()); // still usable
        let entries = notes.get_notes();
        assert_eq!(entries, vec![abi_note(), padding]);
        assert!(entries[1].is_empty_note());
        assert_eq!(notes.len(), 2);
    }

    #[test]
    fn preserves_order() {
        let region = FakeRegion::new("", 0, 0);
        let mut notes = Notes::new(&region);
        let e1 = Note::new("GNU", 3, vec![0xaa; 20]);
        let e2 = Note::new("Go", 4, b"abc".to_vec());
        let e3 = Note::new("GNU", 1, vec![0; 16]);
        notes.add_note(e1.clone());
        notes.add_note_ref(&e2);
        notes.extend([e3.clone()]);
        assert_eq!(notes.get_notes(), vec![e1.clone(), e2.clone(), e3.clone()]);

        let types: Vec<u32> = notes.iter().map(|n| n.ntype()).collect();
        assert_eq!(types, vec![3, 4, 1]);
    }

    #[test]
    fn duplicates_are_kept() {
        let region = FakeRegion::new("", 0, 0);
        let mut notes = Notes::new(&region);
        notes.add_note(abi_note());
        notes.add_note(abi_note());
        assert_eq!(notes.len(), 2);
    }

    #[test]
    fn copies_are_independent() {
        let region = FakeRegion::new(".note", 0, 0);
        let mut notes = Notes::new(&region);
        notes.add_note(abi_note());

        let mut copy = notes.get_notes();
        copy.clear();
        copy.push(Note::new("", 0, Vec::new()));
        assert_eq!(notes.get_notes(), vec![abi_note()]);

        let before = notes.get_notes();
        notes.add_note(Note::new("CORE", 1, Vec::new()));
        assert_eq!(before.len(), 1);
        assert_eq!(notes.len(), 2);
    }

    #[test]
    fn sees_live_region() {
        let region = FakeRegion::new(".note", 0x100, 0x10);
        let notes = Notes::new(&region);
        region.offset.set(0x200);
        assert_eq!(notes.get_region_offset(), Offset(0x200));
    }

    #[test]
    fn is_empty_matches_notes() {
        let region = FakeRegion::new("", 0, 0);
        let mut notes = Notes::new(&region);
        for i in 0..3 {
            assert_eq!(notes.is_empty(), notes.get_notes().is_empty());
            notes.add_note(Note::new("", i, Vec::new()));
        }
        assert_eq!(notes.is_empty(), notes.get_notes().is_empty());
    }
}
