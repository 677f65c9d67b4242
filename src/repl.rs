//! Definitions for the commands that are used interactively, e.g.
//! `elf notes` and `info build-id`.
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fmt;

#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(infer_subcommands(true))] // allow abreviations
pub struct Repl {
    #[command(subcommand)]
    pub command: MainCommand,
}

#[derive(Subcommand)]
pub enum MainCommand {
    /// Show low level information about the ELF file
    Elf(ElfCommand),

    /// Show facts derived from the notes
    Info(InfoCommand),

    /// Print a range of the file as hex and ascii
    Hexdump(HexdumpArgs),

    /// Exit elfnotes
    Quit,
}

#[derive(Args)]
pub struct ElfCommand {
    #[clap(subcommand)]
    pub action: ElfAction,
}

#[derive(Args)]
pub struct InfoCommand {
    #[clap(subcommand)]
    pub action: InfoAction,
}

#[derive(Subcommand)]
pub enum ElfAction {
    /// Show ELF header
    Header(ExplainArgs),

    /// Show the notes in each note section and segment
    Notes(NotesArgs),

    /// Show sections
    Sections(TableArgs),

    /// Show segments
    Segments(TableArgs),
}

#[derive(Subcommand)]
pub enum InfoAction {
    /// Show the OS and kernel version the file was built for
    Abi(ExplainArgs),

    /// Show the unique id of the build
    BuildId,

    /// Show which section or segment holds a file offset
    Locate(LocateArgs),
}

#[derive(Args)]
pub struct ExplainArgs {
    /// Explain columns, fields, etc.
    #[arg(short, long)]
    pub explain: bool,
}

#[derive(Args)]
pub struct TableArgs {
    /// Explain columns, fields, etc.
    #[arg(short, long)]
    pub explain: bool,

    /// Add column headers
    #[arg(short, long)]
    pub titles: bool,
}

#[derive(Args)]
pub struct NotesArgs {
    /// Hexdump each note's descriptor
    #[arg(short, long)]
    pub dump: bool,

    /// Explain columns, fields, etc.
    #[arg(short, long)]
    pub explain: bool,

    /// Skip note sections and segments without any notes
    #[arg(long)]
    pub skip_empty: bool,

    /// Add column headers
    #[arg(short, long)]
    pub titles: bool,
}

#[derive(Args)]
pub struct LocateArgs {
    /// An offset into the ELF file
    #[arg(value_parser = parse_u64_expr)]
    pub offset: u64,
}

#[derive(Args)]
pub struct HexdumpArgs {
    /// Number of bytes to dump
    #[arg(short, long)]
    #[arg(default_value_t = 16)]
    pub count: usize,

    /// How to display the start of each row
    #[arg(short, long, name = "TYPE")]
    #[arg(default_value_t = HexdumpLabels::Offset)]
    pub labels: HexdumpLabels,

    /// Offset into the ELF file
    #[arg(value_parser = parse_u64_expr)]
    pub offset: u64,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum HexdumpLabels {
    /// Show nothing at the start of lines
    None,

    /// Show the file offset for the first byte on each line
    Offset,

    /// Show the offset from zero for the first byte on each line
    Zero,
}

impl fmt::Display for HexdumpLabels {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HexdumpLabels::None => fmt.write_str("none"),
            HexdumpLabels::Offset => fmt.write_str("offset"),
            HexdumpLabels::Zero => fmt.write_str("zero"),
        }
    }
}

// TODO this should parse at least simple expressions, e.g. 0x1c8+0x10
fn parse_u64_expr(s: &str) -> Result<u64, String> {
    if let Some(t) = s.strip_prefix("0x") {
        u64::from_str_radix(t, 16).map_err(|_| format!("`{s}` isn't a hex or decimal number"))
    } else {
        s.parse()
            .map_err(|_| format!("`{s}` isn't a hex or decimal number"))
    }
}
