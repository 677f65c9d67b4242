//! Turns the raw bytes of a note section or segment into Notes.
use super::{Note, Notes, Reader, Region, Stream};
use crate::utils;
use std::error::Error;

/// Size of the namesz, descsz, and type fields.
const NOTE_HEADER_SIZE: usize = 12;

/// Reads one note starting at the stream's offset. end is the offset just past the
/// region so that a damaged note can't run into whatever follows it. align is the
/// padding used after the name and the descriptor.
pub fn read_note(s: &mut Stream, end: usize, align: usize) -> Result<Note, Box<dyn Error>> {
    let start = s.offset;
    let n_namesz = s.read_word()? as usize;
    let n_descsz = s.read_word()? as usize;
    let n_type = s.read_word()?;

    let name_end = s.offset.checked_add(n_namesz).unwrap_or(usize::MAX);
    utils::require(
        name_end <= end,
        &format!("note name at {start:x} runs past the end of its region"),
    )?;
    let name_bytes = s.read_bytes(n_namesz)?;

    // namesz includes the terminating NUL but some producers pad with extra NULs.
    let name_len = name_bytes
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(name_bytes.len());
    let name = String::from_utf8(name_bytes[..name_len].to_vec())?;
    align_within(s, align, end);

    let desc_end = s.offset.checked_add(n_descsz).unwrap_or(usize::MAX);
    utils::require(
        desc_end <= end,
        &format!("note descriptor at {start:x} runs past the end of its region"),
    )?;
    let description = s.read_bytes(n_descsz)?.to_vec();
    align_within(s, align, end);

    Ok(Note::new(name, n_type, description))
}

// Producers don't always pad the last note out to the alignment.
fn align_within(s: &mut Stream, align: usize, end: usize) {
    s.align_to(align);
    s.offset = s.offset.min(end);
}

/// Decodes all the notes within a region. If a note is damaged a warning is printed
/// and the notes before it are returned.
pub fn decode_notes<'a>(reader: &Reader, region: &'a dyn Region, align: u64) -> Notes<'a> {
    // Notes are normally padded to 4 bytes, gnu property notes in 64-bit files use 8.
    let align = if align == 8 { 8 } else { 4 };

    let mut notes = Notes::new(region);
    let start = region.offset().0 as usize;
    let end = start.saturating_add(region.size_in_file() as usize);
    if end > reader.len() {
        utils::warn(&format!(
            "notes at {start:x} extend past the end of the file (which may be truncated)"
        ));
    }
    let end = end.min(reader.len());

    let mut s = Stream::new(reader, start);
    while s.offset + NOTE_HEADER_SIZE <= end {
        match read_note(&mut s, end, align) {
            Ok(note) => notes.add_note(note),
            Err(err) => {
                utils::warn(&format!("Failed to read note at offset {:x}: {err}", s.offset));
                break;
            }
        }
    }
    notes
}
