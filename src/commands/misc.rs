use crate::elf::{ElfFile, Offset};
use crate::repl::HexdumpArgs;
use crate::utils::uwriteln;
use std::io::Write;

pub fn hexdump(out: &mut impl Write, file: &ElfFile, args: &HexdumpArgs) {
    if args.offset as usize >= file.reader.len() {
        uwriteln!(
            out,
            "{:x} is past the end of the file ({:x} bytes)",
            args.offset,
            file.reader.len()
        );
        return;
    }
    if let Some(id) = file.find_region(Offset(args.offset)) {
        uwriteln!(out, "{}:", file.region_label(id));
    }
    if let Err(err) = file
        .reader
        .hex_dump(out, args.offset as usize, args.count, args.labels)
    {
        uwriteln!(out, "{err}");
    }
}
