use super::tables::{Column, Fields, Table};
use crate::elf::{ElfFile, NoteType, Notes, ProgramHeader, RegionId, SectionHeader};
use crate::repl::{ExplainArgs, HexdumpLabels, NotesArgs, TableArgs};
use crate::utils::{self, Styling, uwriteln};
use std::io::Write;

const NOTE_COLUMNS: [Column; 5] = [
    Column::left("name", "the owner of the note, [empty] for padding notes"),
    Column::left("type", "how the note should be interpreted"),
    Column::right("raw type", "the type code in the file (hex)"),
    Column::right("size", "size of the descriptor in bytes"),
    Column::left("summary", "interpretation of the descriptor (if known)"),
];

const SECTION_COLUMNS: [Column; 11] = [
    Column::right("index", "index into sections"),
    Column::left("name", "from the section name string table"),
    Column::left("type", "type of the section"),
    Column::right("vaddr", "virtual address at execution"),
    Column::right("offset", "offset into the ELF file for the start of the section"),
    Column::right("size", "section size in bytes"),
    Column::right("align", "section alignment"),
    Column::right("entry size", "size of each entry for sections that are tables"),
    Column::right("link", "index of a related section, usually a string or symbol table"),
    Column::right("info", "additional section info"),
    Column::left("flags", "write, alloc, and/or exec"),
];

const SEGMENT_COLUMNS: [Column; 8] = [
    Column::right("index", "index into the program headers"),
    Column::left("type", "the segment type"),
    Column::right("offset", "the offset into the ELF file at which the segment appears"),
    Column::right("vaddr", "the virtual address the segment starts at"),
    Column::right("file size", "the size of the segment on disk"),
    Column::right("memory size", "the size of the segment in memory"),
    Column::right("align", "alignment, for notes the padding between fields"),
    Column::right("flags", "executable, writeable, and/or readable"),
];

pub fn elf_header(out: &mut impl Write, file: &ElfFile, args: &ExplainArgs) {
    let h = &file.header;
    let mut fields = Fields::new();

    fields.add("type", h.stype(), "type of ELF file");
    let endian_help = if file.reader.little_endian {
        "words are laid out in memory with the most significant byte last"
    } else {
        "words are laid out in memory with the most significant byte first"
    };
    fields.add("little endian", file.reader.little_endian, endian_help);
    let pointer_help = if file.reader.sixty_four_bit {
        "pointers are eight bytes"
    } else {
        "pointers are four bytes"
    };
    fields.add("64-bit", file.reader.sixty_four_bit, pointer_help);
    fields.add("osabi", h.abi(), "the OS the binary was compiled for");
    fields.add("abiversion", h.abiversion, "zero for Linux");
    fields.add("machine", h.machine(), "CPU architecture");
    fields.add("entry", format!("{:x}", h.entry), "address of the first instruction");
    fields.add("flags", h.flags, "Linux has no defined flags");
    fields.add(
        "ph_offset",
        format!("{:x}", h.ph_offset),
        "offset in the ELF file to the Program Header table",
    );
    fields.add(
        "num_ph_entries",
        h.num_ph_entries,
        "number of entries in the Program Header table",
    );
    fields.add(
        "section_offset",
        format!("{:x}", h.section_offset),
        "offset in the ELF file to the section header table",
    );
    fields.add(
        "num_section_entries",
        h.num_section_entries,
        "number of entries in the section header table",
    );
    fields.add(
        "string_table_index",
        h.string_table_index,
        "section index containing the section names",
    );
    fields.write(out, args.explain);
}

pub fn elf_notes(out: &mut impl Write, file: &ElfFile, args: &NotesArgs) {
    let all = file.find_notes();
    if all.is_empty() {
        uwriteln!(out, "No note sections or segments found.");
        return;
    }

    let mut explained = false;
    let mut first = true;
    for (id, notes) in all.iter() {
        if args.skip_empty && notes.is_empty() {
            continue;
        }
        if !first {
            uwriteln!(out);
        }
        first = false;

        let title = region_title(file, *id, notes);
        uwriteln!(out, "{}", title.table_title());
        if notes.is_empty() {
            uwriteln!(out, "   no notes");
            continue;
        }

        let mut table = Table::new(&NOTE_COLUMNS);
        for note in notes.iter() {
            let name = if note.is_empty_note() {
                "[empty]"
            } else {
                note.name()
            };
            table.push(vec![
                name.to_string(),
                NoteType::of(note).to_string(),
                format!("{:x}", note.ntype()),
                note.description().len().to_string(),
                super::summarize(file, note),
            ]);
        }

        // The columns are the same for every region so only explain them once.
        table.write(out, args.titles, args.explain && !explained);
        explained = true;

        if args.dump {
            for (i, note) in notes.iter().enumerate() {
                if !note.description().is_empty() {
                    uwriteln!(out, "note {i}:");
                    utils::hex_dump(out, 0, note.description(), HexdumpLabels::Zero);
                }
            }
        }
    }
}

fn region_title(file: &ElfFile, id: RegionId, notes: &Notes) -> String {
    format!(
        "{} at {:x}, {} bytes",
        file.region_label(id),
        notes.get_region_offset().0,
        notes.get_region_length()
    )
}

pub fn elf_sections(out: &mut impl Write, file: &ElfFile, args: &TableArgs) {
    if file.sections.is_empty() {
        if file.is_core() {
            uwriteln!(out, "Core files don't have sections.");
        } else {
            uwriteln!(out, "No sections (the file may have been stripped).");
        }
        return;
    }

    // Sections are referenced by index so don't sort these.
    let mut table = Table::new(&SECTION_COLUMNS);
    for (i, section) in file.sections.iter().enumerate() {
        let h = &section.header;
        table.push(vec![
            i.to_string(),
            section.name.clone(),
            format!("{:?}", h.stype),
            format!("{:x}", h.vbytes.start.0),
            format!("{:x}", h.obytes.start.0),
            h.obytes.size.to_string(),
            h.align.to_string(),
            h.entry_size.to_string(),
            h.link.to_string(),
            h.info.to_string(),
            SectionHeader::flags(h.flags),
        ]);
    }
    table.write(out, args.titles, args.explain);
}

pub fn elf_segments(out: &mut impl Write, file: &ElfFile, args: &TableArgs) {
    let mut table = Table::new(&SEGMENT_COLUMNS);
    for (i, segment) in file.segments.iter().enumerate() {
        table.push(vec![
            i.to_string(),
            format!("{:?}", segment.stype),
            format!("{:x}", segment.offset),
            format!("{:x}", segment.vaddr),
            format!("{:x}", segment.file_size),
            format!("{:x}", segment.mem_size),
            segment.align.to_string(),
            ProgramHeader::flags(segment.flags),
        ]);
    }

    if table.is_empty() && !args.titles {
        uwriteln!(out, "No segments.");
        return;
    }
    table.write(out, args.titles, args.explain);
    if args.explain {
        uwriteln!(out);
        uwriteln!(out, "Numeric fields are in hex except for index and align.");
    }
}
