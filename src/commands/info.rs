use super::tables::Fields;
use crate::elf::{
    AbiTag, BuildId, CoreNoteType, ElfFile, GnuNoteType, Note, NoteType, Offset, gold_version,
};
use crate::repl::{ExplainArgs, LocateArgs};
use crate::utils::{Styling, uwriteln};
use std::io::Write;

/// One line description of a note's descriptor, empty if we don't know how to
/// interpret it.
pub fn summarize(file: &ElfFile, note: &Note) -> String {
    match NoteType::of(note) {
        NoteType::Gnu(GnuNoteType::AbiTag) => AbiTag::from_note(note, file.reader.little_endian)
            .map_or("bad ABI tag".to_string(), |t| t.to_string()),
        NoteType::Gnu(GnuNoteType::BuildId) | NoteType::GoBuildId => BuildId::from_note(note)
            .map_or("empty build id".to_string(), |id| id.to_string()),
        NoteType::Gnu(GnuNoteType::GoldVersion) => gold_version(note).unwrap_or_default(),
        NoteType::Core(CoreNoteType::File) => "memory mapped files".to_string(),
        NoteType::Core(CoreNoteType::PrStatus) => "signal, pid, and registers".to_string(),
        _ => String::new(),
    }
}

pub fn info_abi(out: &mut impl Write, file: &ElfFile, args: &ExplainArgs) {
    let Some(tag) = file.find_abi_tag() else {
        uwriteln!(out, "No ABI tag note found.");
        return;
    };

    let mut fields = Fields::new();
    fields.add("os", format!("{:?}", tag.os), "the OS the file was built for");
    fields.add(
        "kernel",
        format!("{}.{}.{}", tag.major, tag.minor, tag.patch),
        "the oldest kernel version the file will run on",
    );
    if let Some(version) = file
        .find_note(NoteType::Gnu(GnuNoteType::GoldVersion))
        .and_then(|note| gold_version(&note))
    {
        fields.add("linker", version, "the linker that built the file");
    }
    fields.write(out, args.explain);
}

pub fn info_build_id(out: &mut impl Write, file: &ElfFile) {
    match file.find_build_id() {
        Some(id) => uwriteln!(out, "{id}"),
        None if file.is_core() => uwriteln!(
            out,
            "No build id note found (core files record the build ids of mapped files, not their own)."
        ),
        None => uwriteln!(out, "No build id note found."),
    }
}

pub fn info_locate(out: &mut impl Write, file: &ElfFile, args: &LocateArgs) {
    if args.offset as usize >= file.reader.len() {
        uwriteln!(out, "{:x} is past the end of the file", args.offset);
        return;
    }
    let Some(id) = file.find_region(Offset(args.offset)) else {
        uwriteln!(out, "{:x} isn't within a section or segment", args.offset);
        return;
    };

    let label = file.region_label(id);
    match file.region(id) {
        Some(region) => uwriteln!(
            out,
            "{:x} is in {} at +{:x}",
            args.offset,
            label.table_field(),
            args.offset - region.offset().0
        ),
        None => uwriteln!(out, "{:x} is in {label}", args.offset),
    }
}
