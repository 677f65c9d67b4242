//! Interpretation of the notes that we know about. The meaning of a note's type depends
//! upon the note's name, e.g. type 1 is an ABI tag for "GNU" notes but process status
//! for "CORE" notes.
use super::Note;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NoteType {
    Core(CoreNoteType),
    Gnu(GnuNoteType),

    /// Build id written by the Go linker.
    GoBuildId,

    /// SystemTap statically defined tracing (SDT) marker.
    Stapsdt,

    /// A note we don't know how to interpret.
    Unknown(u32),
}

/// Notes emitted by the linker, see https://refspecs.linuxfoundation.org/LSB_1.2.0/gLSB/noteabitag.html
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GnuNoteType {
    /// The OS and minimum kernel version the exe requires.
    AbiTag,

    /// Hardware capabilities.
    HwCap,

    /// Unique identifier for the build, usually a SHA1 of the contents.
    BuildId,

    /// Version of the gold linker used.
    GoldVersion,

    /// Program properties, e.g. whether the exe supports CET.
    Property,
}

/// Notes in core files, see https://elixir.bootlin.com/linux/v6.6/source/include/uapi/linux/elf.h
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CoreNoteType {
    /// Signal info, pid, and general purpose registers.
    PrStatus,

    /// Floating point register values.
    PrFPReg,

    /// Process state info, e.g. whether it's running, sleeping, or a zombie.
    PrPsInfo,

    /// Auxiliary vector passed from the kernel to the process.
    AuxV,

    /// Details on the signal that terminated the process.
    SigInfo,

    /// Memory-mapped files.
    File,

    /// Extended x86 register state (AVX etc).
    X86XState,

    /// A CORE or LINUX note we don't have a name for.
    Other(u32),
}

impl NoteType {
    pub fn new(name: &str, ntype: u32) -> Self {
        match name {
            "GNU" => match ntype {
                1 => NoteType::Gnu(GnuNoteType::AbiTag),
                2 => NoteType::Gnu(GnuNoteType::HwCap),
                3 => NoteType::Gnu(GnuNoteType::BuildId),
                4 => NoteType::Gnu(GnuNoteType::GoldVersion),
                5 => NoteType::Gnu(GnuNoteType::Property),
                _ => NoteType::Unknown(ntype),
            },
            "CORE" | "LINUX" => NoteType::Core(CoreNoteType::from_u32(ntype)),
            "Go" if ntype == 4 => NoteType::GoBuildId,
            "stapsdt" if ntype == 3 => NoteType::Stapsdt,
            _ => NoteType::Unknown(ntype),
        }
    }

    pub fn of(note: &Note) -> Self {
        NoteType::new(note.name(), note.ntype())
    }
}

impl CoreNoteType {
    pub fn from_u32(value: u32) -> Self {
        match value {
            1 => CoreNoteType::PrStatus,
            2 => CoreNoteType::PrFPReg,
            3 => CoreNoteType::PrPsInfo,
            6 => CoreNoteType::AuxV,
            0x202 => CoreNoteType::X86XState,
            0x53494749 => CoreNoteType::SigInfo, // "SIGI"
            0x46494c45 => CoreNoteType::File,    // "FILE"
            _ => CoreNoteType::Other(value),
        }
    }
}

impl fmt::Display for NoteType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NoteType::Core(CoreNoteType::Other(t)) => write!(f, "Core({t:x})"),
            NoteType::Core(t) => write!(f, "{t:?}"),
            NoteType::Gnu(t) => write!(f, "{t:?}"),
            NoteType::GoBuildId => write!(f, "GoBuildId"),
            NoteType::Stapsdt => write!(f, "Stapsdt"),
            NoteType::Unknown(t) => write!(f, "Unknown({t:x})"),
        }
    }
}

/// Contents of a GNU build id note.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BuildId(pub Vec<u8>);

impl BuildId {
    pub fn from_note(note: &Note) -> Option<Self> {
        match NoteType::of(note) {
            NoteType::Gnu(GnuNoteType::BuildId) | NoteType::GoBuildId
                if !note.description().is_empty() =>
            {
                Some(BuildId(note.description().to_vec()))
            }
            _ => None,
        }
    }
}

impl fmt::Display for BuildId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for byte in self.0.iter() {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AbiOs {
    Linux,
    Hurd,
    Solaris,
    FreeBSD,
    NetBSD,
    Syllable,
    NaCl,
    Unknown(u32),
}

/// Contents of a GNU ABI tag note: the OS and the earliest kernel the exe will run on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AbiTag {
    pub os: AbiOs,
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl AbiTag {
    /// The descriptor is four words in the file's byte order.
    pub fn from_note(note: &Note, little_endian: bool) -> Option<Self> {
        if NoteType::of(note) != NoteType::Gnu(GnuNoteType::AbiTag) {
            return None;
        }
        let word = |i: usize| -> Option<u32> {
            let bytes: [u8; 4] = note.description().get(i * 4..i * 4 + 4)?.try_into().ok()?;
            if little_endian {
                Some(u32::from_le_bytes(bytes))
            } else {
                Some(u32::from_be_bytes(bytes))
            }
        };
        let os = match word(0)? {
            0 => AbiOs::Linux,
            1 => AbiOs::Hurd,
            2 => AbiOs::Solaris,
            3 => AbiOs::FreeBSD,
            4 => AbiOs::NetBSD,
            5 => AbiOs::Syllable,
            6 => AbiOs::NaCl,
            n => AbiOs::Unknown(n),
        };
        Some(AbiTag {
            os,
            major: word(1)?,
            minor: word(2)?,
            patch: word(3)?,
        })
    }
}

impl fmt::Display for AbiTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?} {}.{}.{}", self.os, self.major, self.minor, self.patch)
    }
}

/// The version string from a gold linker note.
pub fn gold_version(note: &Note) -> Option<String> {
    if NoteType::of(note) != NoteType::Gnu(GnuNoteType::GoldVersion) {
        return None;
    }
    let desc = note.description();
    let len = desc.iter().position(|&b| b == 0).unwrap_or(desc.len());
    Some(String::from_utf8_lossy(&desc[..len]).into_owned())
}
